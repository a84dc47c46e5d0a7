//! Type reference resolution.
//!
//! A [`TypeRef`] is the raw, possibly namespace-qualified `type=` attribute
//! string from the schema. This module classifies it against the closed
//! lookup tables of the dialect: xs primitive -> Go type, Go primitive ->
//! Null wrapper, naturally-nullable Go types, and slice substitutions.

use std::collections::HashMap;
use std::fmt;

use lazy_static::lazy_static;

use crate::schema::error::{GenError, GenResult};
use crate::schema::Schema;

lazy_static! {
    /// xs primitive name -> raw Go type.
    pub static ref TYPE_MAP: HashMap<&'static str, &'static str> = {
        let mut m = HashMap::new();
        m.insert("other", "string");
        m.insert("token", "string");
        m.insert("dateTime", "string");
        m.insert("duration", "string");
        m.insert("time", "string");
        m.insert("anyURI", "string");
        m.insert("base64Binary", "[]byte");
        m.insert("string", "string");
        m.insert("boolean", "bool");
        m.insert("float", "float64");
        m.insert("double", "float64");
        m.insert("decimal", "float64");
        m.insert("int", "int64");
        m.insert("long", "int64");
        m
    };

    /// Raw Go type -> Null wrapper used in generated declarations.
    pub static ref SUBSTITUTE_MAP: HashMap<&'static str, &'static str> = {
        let mut m = HashMap::new();
        m.insert("int32", "NullInt64");
        m.insert("int64", "NullInt64");
        m.insert("string", "NullString");
        m.insert("float32", "NullFloat64");
        m.insert("float64", "NullFloat64");
        m.insert("bool", "NullBool");
        m
    };

    /// Go types whose zero value already expresses absence.
    pub static ref NULLABLE_TYPES: HashMap<&'static str, bool> = {
        let mut m = HashMap::new();
        m.insert("[]byte", true);
        m.insert("string", true);
        m.insert("time.Time", true);
        m.insert("NullInt64", true);
        m.insert("NullString", true);
        m.insert("NullFloat64", true);
        m.insert("NullBool", true);
        m
    };

    /// Null wrapper -> list wrapper for repeated fields.
    pub static ref SLICEABLE_TYPES: HashMap<&'static str, &'static str> = {
        let mut m = HashMap::new();
        m.insert("NullString", "NullStringList");
        m.insert("NullInt64", "NullInt64List");
        m.insert("NullFloat64", "NullFloat64List");
        m
    };
}

/// A namespace-qualified type reference, as written in the schema.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeRef(pub String);

impl TypeRef {
    pub fn new<S: Into<String>>(s: S) -> Self {
        TypeRef(s.into())
    }

    /// The reference with any namespace prefix stripped.
    pub fn local_name(&self) -> &str {
        match self.0.find(':') {
            Some(idx) => &self.0[idx + 1..],
            None => &self.0,
        }
    }

    /// True when the reference lives in the XML-Schema namespace (a primitive).
    pub fn is_xs(&self) -> bool {
        self.0.starts_with("xs:")
    }

    /// True when the reference is qualified into the schema's own namespace.
    pub fn is_ns(&self) -> bool {
        match self.0.find(':') {
            Some(_) => !self.0.starts_with("xs:"),
            None => false,
        }
    }

    /// True when the reference maps to a known primitive category.
    pub fn is_basic(&self) -> bool {
        TYPE_MAP.contains_key(self.local_name())
    }

    pub fn is_request(&self) -> bool {
        self.0.ends_with("RequestType")
    }

    /// The Go type for this reference, with the Null substitution applied.
    ///
    /// Named (non-xs) references map to their own local name. An xs reference
    /// outside the primitive table means the dialect assumption is violated.
    pub fn go_type(&self) -> GenResult<String> {
        self.go_type_inner(true)
    }

    /// The Go type without the Null substitution (e.g. `string`, not
    /// `NullString`). Used for enum alias underlying types and append-style
    /// mutator arguments.
    pub fn go_type_raw(&self) -> GenResult<String> {
        self.go_type_inner(false)
    }

    fn go_type_inner(&self, substitute: bool) -> GenResult<String> {
        if !self.is_xs() {
            return Ok(self.local_name().to_string());
        }
        let mut t = *TYPE_MAP
            .get(self.local_name())
            .ok_or_else(|| GenError::Resolution(self.0.clone()))?;
        if substitute {
            if let Some(sub) = SUBSTITUTE_MAP.get(t) {
                t = sub;
            }
        }
        Ok(t.to_string())
    }

    /// Whether the generated Go representation can express absence without a
    /// pointer. Transitive through simple-type aliases: an alias of a
    /// nullable primitive is itself nullable.
    pub fn nullable(&self, schema: &Schema) -> GenResult<bool> {
        if NULLABLE_TYPES.contains_key(self.go_type()?.as_str()) {
            return Ok(true);
        }
        if let Some(simple) = schema.find_simple(self.local_name()) {
            if NULLABLE_TYPES.contains_key(simple.restriction.base.go_type()?.as_str()) {
                return Ok(true);
            }
        }
        Ok(false)
    }

}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for TypeRef {
    fn from(s: &str) -> Self {
        TypeRef(s.to_string())
    }
}
