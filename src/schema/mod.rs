//! Schema tree for the supported XSD/WSDL dialect.
//!
//! This module contains the deserialized schema structures, the type
//! reference resolver, and the annotation policy engine. The tree is built
//! once by the loader and read many times during generation; nothing here
//! mutates after loading.

pub mod annotation;
pub mod error;
pub mod loader;
pub mod types;


pub use annotation::{Annotation, RuleKind, ValidationRule};
pub use error::{GenError, GenResult};
pub use types::TypeRef;

use annotation::Annotation as Ann;

/// The deserialized `<schema>` element: the dialect subset this tool
/// understands. Choice groups, attribute groups, unions and the other
/// XML-Schema constructs the dialect never uses are rejected at load time.
#[derive(Debug, Default)]
pub struct Schema {
    pub target_namespace: Option<String>,
    pub version: Option<String>,
    pub elements: Vec<Element>,
    pub simple_types: Vec<SimpleType>,
    pub complex_types: Vec<ComplexType>,
}

impl Schema {
    pub fn find_complex(&self, name: &str) -> Option<&ComplexType> {
        self.complex_types.iter().find(|c| c.name == name)
    }

    pub fn find_simple(&self, name: &str) -> Option<&SimpleType> {
        self.simple_types.iter().find(|s| s.name == name)
    }

    pub fn find_root_element(&self, name: &str) -> Option<&Element> {
        self.elements.iter().find(|e| e.name == name)
    }
}

/// A field declaration (`<element>` inside a sequence, or a root element).
#[derive(Debug, Default)]
pub struct Element {
    pub name: String,
    pub type_ref: TypeRef,
    pub min_occurs: Option<String>,
    pub max_occurs: Option<String>,
    pub nillable: bool,
    pub annotation: Option<Ann>,
    /// Inline nested declarations. Carried for completeness; the dialect's
    /// exported types reference named declarations instead.
    pub simple_type: Option<Box<SimpleType>>,
    pub complex_type: Option<Box<ComplexType>>,
}

impl Element {
    /// The repetition bound: `(bound, repeated)`. Unbounded or greater-than-one
    /// maxOccurs means repeated; base64Binary content is a byte slice either way.
    pub fn slice_len(&self) -> GenResult<(usize, bool)> {
        if self.type_ref.0.contains("base64Binary") {
            return Ok((0, true));
        }
        match self.max_occurs.as_deref() {
            None | Some("") => Ok((0, false)),
            Some("unbounded") => Ok((0, true)),
            Some(n) => {
                let mo: usize = n.parse().map_err(|_| GenError::UnsupportedConstruct {
                    at: self.name.clone(),
                    what: format!("maxOccurs `{}` is not a number", n),
                })?;
                Ok((mo, mo > 1))
            }
        }
    }
}

/// A struct-like declaration (`<complexType>`), optionally extending a base
/// type or wrapping simple content with attributes.
#[derive(Debug, Default)]
pub struct ComplexType {
    pub name: String,
    pub is_abstract: bool,
    pub annotation: Option<Ann>,
    pub simple_content: Option<SimpleContent>,
    pub complex_content: Option<ComplexContent>,
    pub sequence: Option<Sequence>,
    pub attributes: Vec<Attribute>,
}

/// Simple content: character data plus attributes. Only the extension form
/// appears in the dialect.
#[derive(Debug, Default)]
pub struct SimpleContent {
    pub extension: Option<SimpleExtension>,
}

#[derive(Debug, Default)]
pub struct SimpleExtension {
    pub base: TypeRef,
    pub annotation: Option<Ann>,
    pub attributes: Vec<Attribute>,
}

/// Complex content: single-level inheritance. A restriction here is outside
/// the supported dialect and fails fatally when walked.
#[derive(Debug, Default)]
pub struct ComplexContent {
    pub extension: Option<ComplexExtension>,
    pub has_restriction: bool,
}

#[derive(Debug, Default)]
pub struct ComplexExtension {
    pub base: TypeRef,
    pub attributes: Vec<Attribute>,
    pub sequence: Option<Sequence>,
}

#[derive(Debug, Default)]
pub struct Sequence {
    pub elements: Vec<Element>,
}

/// An `<attribute>` declaration.
#[derive(Debug, Default)]
pub struct Attribute {
    pub name: String,
    pub type_ref: TypeRef,
    pub use_marker: Option<String>,
    pub annotation: Option<Ann>,
}

impl Attribute {
    pub fn is_required(&self) -> bool {
        self.use_marker.as_deref() == Some("required")
    }
}

/// An enumeration/alias declaration (`<simpleType>` with a restriction).
#[derive(Debug)]
pub struct SimpleType {
    pub name: String,
    pub annotation: Option<Ann>,
    pub restriction: SimpleRestriction,
}

#[derive(Debug, Default)]
pub struct SimpleRestriction {
    pub base: TypeRef,
    pub enumerations: Vec<Enumeration>,
}

/// One allowed literal value of an enumeration, with its own annotation.
#[derive(Debug, Default)]
pub struct Enumeration {
    pub value: String,
    pub annotation: Option<Ann>,
}

impl Default for TypeRef {
    fn default() -> Self {
        TypeRef(String::new())
    }
}
