use std::io;

/// Represents all fatal conditions the generator can hit.
///
/// Every core-phase error aborts the whole run: a half-resolved type graph
/// cannot be emitted safely, so there is no partial-success mode. The only
/// degraded (non-fatal) condition is a numeric threshold that fails heuristic
/// extraction; that is reported as a warning and counted on the generation
/// context instead of surfacing here.
#[derive(Debug, thiserror::Error)]
pub enum GenError {
    /// A type reference does not resolve to any declaration in the schema.
    #[error("could not resolve type reference `{0}`")]
    Resolution(String),

    /// A schema feature outside the supported dialect subset was encountered.
    #[error("unsupported schema construct at `{at}`: {what}")]
    UnsupportedConstruct { at: String, what: String },

    /// An annotation constraint kind or underlying-type combination has no
    /// rendering rule. Signals the rule deriver needs extension, not bad data.
    #[error("no validation rendering for `{field}`: {detail}")]
    UnimplementedRule { field: String, detail: String },

    /// An exported call names a root element the schema does not declare.
    #[error("could not find element `{0}`")]
    MissingElement(String),

    /// The API version could not be determined from the document or flags.
    #[error("could not identify API version; pass --apiver with the version number")]
    MissingVersion,

    /// The schema document is not well-formed XML.
    #[error("malformed schema document: {0}")]
    Xml(#[from] roxmltree::Error),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("config error: {0}")]
    Config(#[from] serde_json::Error),
}

/// A Result type specialized for generator operations
pub type GenResult<T> = Result<T, GenError>;
