//! The polymorphic schema node model.
//!
//! A closed set of variants — named type, field, attribute, enum alias,
//! simple-content extension wrapper — exposed through one dispatch surface.
//! The variant set is fixed by the schema dialect; nothing here is open for
//! runtime extension.

mod attribute;
mod complex;
pub mod details;
mod element;
mod extension;
mod simple;

#[cfg(test)]
mod tests;

pub use details::TypeDetails;

use crate::gen::GenContext;
use crate::schema::error::{GenError, GenResult};
use crate::schema::types::TypeRef;
use crate::schema::{Attribute, ComplexType, Element, Schema, SimpleExtension, SimpleType};

/// One schema construct, with the shared capability set dispatched over the
/// closed variant set.
#[derive(Debug, Clone, Copy)]
pub enum Node<'a> {
    Complex(&'a ComplexType),
    Element(&'a Element),
    Attribute(&'a Attribute),
    Simple(&'a SimpleType),
    Extension(&'a SimpleExtension),
}

/// Resolve a declaration name against the schema, complex types first.
pub fn find<'a>(schema: &'a Schema, name: &str) -> GenResult<Node<'a>> {
    if let Some(c) = schema.find_complex(name) {
        return Ok(Node::Complex(c));
    }
    if let Some(s) = schema.find_simple(name) {
        return Ok(Node::Simple(s));
    }
    Err(GenError::Resolution(name.to_string()))
}

impl<'a> Node<'a> {
    pub fn name(&self) -> &'a str {
        match self {
            Node::Complex(c) => &c.name,
            Node::Element(e) => &e.name,
            Node::Attribute(a) => &a.name,
            Node::Simple(s) => &s.name,
            // Simple content is surfaced as a synthetic chardata field.
            Node::Extension(_) => "Value",
        }
    }

    pub fn type_ref(&self) -> TypeRef {
        match self {
            Node::Complex(c) => TypeRef::new(c.name.clone()),
            Node::Element(e) => e.type_ref.clone(),
            Node::Attribute(a) => a.type_ref.clone(),
            Node::Simple(s) => s.restriction.base.clone(),
            Node::Extension(x) => x.base.clone(),
        }
    }

    /// The node reachable by following this node's type reference, or `None`
    /// for primitives and terminal aliases.
    pub fn related(&self, schema: &'a Schema) -> GenResult<Option<Node<'a>>> {
        match self {
            Node::Complex(_) | Node::Simple(_) => Ok(None),
            Node::Element(e) => {
                if e.type_ref.is_xs() {
                    Ok(None)
                } else {
                    find(schema, e.type_ref.local_name()).map(Some)
                }
            }
            Node::Attribute(a) => {
                if a.type_ref.is_ns() {
                    find(schema, a.type_ref.local_name()).map(Some)
                } else {
                    Ok(None)
                }
            }
            Node::Extension(x) => {
                if x.base.is_ns() {
                    find(schema, x.base.local_name()).map(Some)
                } else {
                    Ok(None)
                }
            }
        }
    }

    /// The effective child list. For a named type this is the field list
    /// after annotation inclusion filtering for the type's own call context;
    /// leaf variants have no children.
    pub fn children(&self, schema: &'a Schema, exported: &[String]) -> GenResult<Vec<Node<'a>>> {
        match self {
            Node::Complex(c) => complex::children(c, schema, exported),
            Node::Extension(x) => Ok(x.attributes.iter().map(Node::Attribute).collect()),
            _ => Ok(Vec::new()),
        }
    }

    /// The declaration fragment a parent type embeds for this node.
    pub fn decl_line(&self, schema: &Schema) -> GenResult<String> {
        match self {
            Node::Complex(c) => Ok(complex::decl_line(c)),
            Node::Element(e) => element::decl_line(e, schema),
            Node::Attribute(a) => attribute::decl_line(a, schema),
            Node::Simple(s) => simple::decl_line(s),
            Node::Extension(x) => extension::decl_line(x),
        }
    }

    /// Render this node's declaration into the accumulators, scheduling every
    /// referenced named type for later generation. Idempotent per name.
    pub fn generate(&self, ctx: &mut GenContext<'a>) -> GenResult<()> {
        match self {
            Node::Complex(c) => complex::generate(c, ctx),
            Node::Element(e) => element::generate(e, ctx),
            Node::Attribute(a) => attribute::generate(a, ctx),
            Node::Simple(s) => simple::generate(s, ctx),
            Node::Extension(x) => extension::generate(x, ctx),
        }
    }

    /// Register mutator helpers: append-style setters for repeated request
    /// fields, per-literal predicates for the response acknowledgement enum.
    pub fn emit_accessors(&self, ctx: &mut GenContext<'a>, owner: &str) -> GenResult<()> {
        match self {
            Node::Complex(c) => complex::emit_accessors(c, ctx),
            Node::Element(e) => element::emit_accessors(e, ctx, owner),
            _ => Ok(()),
        }
    }

    /// True when any reachable descendant carries a required rule for this
    /// call. Descendants whose type reference equals the immediate ancestor's
    /// own name are skipped (self-recursion guard); a nesting-depth cutoff on
    /// a field stops descent below it.
    pub fn deep_requires_validation(
        &self,
        ctx: &GenContext<'a>,
        call: &str,
        path: &str,
    ) -> GenResult<bool> {
        match self {
            Node::Complex(c) => complex::deep_requires_validation(c, ctx, call, path),
            Node::Element(e) => element::deep_requires_validation(e, ctx, call, path),
            Node::Attribute(_) => Ok(false),
            Node::Simple(s) => Ok(s
                .annotation
                .as_ref()
                .map_or(false, |a| a.required_for(call))),
            Node::Extension(x) => Ok(x
                .annotation
                .as_ref()
                .map_or(false, |a| a.required_for(call))),
        }
    }

    /// Append this node's constraint checks for the call at `path`, then
    /// recurse through related/child nodes with an extended path.
    pub fn validate(&self, ctx: &mut GenContext<'a>, call: &str, path: &str) -> GenResult<()> {
        match self {
            Node::Complex(c) => complex::validate(c, ctx, call, path),
            Node::Element(e) => element::validate(e, ctx, call, path),
            Node::Attribute(a) => attribute::validate(a, ctx, call, path),
            Node::Simple(s) => {
                simple::validate(s, ctx, call, path);
                Ok(())
            }
            Node::Extension(x) => {
                extension::validate(x, ctx, call, path);
                Ok(())
            }
        }
    }
}
