//! XSD/WSDL to Go code generator.
//!
//! This library reads an XML Schema document (standalone `.xsd` or embedded
//! in a `.wsdl`), resolves its named types against the dialect's closed
//! lookup tables, and generates a single Go source file: struct declarations
//! with XML/JSON tags, enum aliases with literal consts and checked setters,
//! request plumbing, and per-call `Validate` methods derived from the
//! schema's appinfo annotations.

pub mod gen;
pub mod node;
pub mod schema;
pub mod util;

use std::fs;
use std::path::Path;

use log::info;

use crate::gen::writer::assemble;
use crate::gen::{exported_calls, GenContext};
use crate::schema::error::{GenError, GenResult};
use crate::schema::loader::{self, SourceKind};

/// The product of one generation run.
pub struct Generated {
    /// Assembled Go source text.
    pub source: String,
    /// Schema version the output was generated against.
    pub version: String,
    /// Constraints dropped because their threshold failed heuristic
    /// extraction. Non-zero means a weaker `Validate` than the schema asked
    /// for.
    pub warnings: u32,
}

/// One full generation run: parse, resolve, generate, assemble.
///
/// `exported` is the explicit comma-separated call list; `None` exports every
/// declared `*Request` root. `api_version` overrides the version the document
/// declares, and is required when the document declares none.
pub fn generate<P: AsRef<Path>>(
    input: P,
    exported: Option<&str>,
    api_version: Option<&str>,
) -> GenResult<Generated> {
    let input = input.as_ref();
    let kind = SourceKind::from_path(input)?;
    info!("reading {}", input.display());
    let text = fs::read_to_string(input)?;

    let mut schema = loader::load(&text, kind)?;
    if let Some(v) = api_version {
        schema.version = Some(v.to_string());
    }
    let version = schema.version.clone().ok_or(GenError::MissingVersion)?;
    info!("API version: {}", version);

    let calls = exported_calls(&schema, exported);
    let mut ctx = GenContext::new(&schema, calls);
    ctx.run()?;

    Ok(Generated {
        source: assemble(&ctx, &version),
        warnings: ctx.warnings(),
        version,
    })
}
