//! Simple-content extension wrapper: a chardata `Value` field plus the
//! extension's attributes, embedded into the owning type.

use crate::gen::GenContext;
use crate::node::Node;
use crate::schema::error::GenResult;
use crate::schema::SimpleExtension;

pub(super) fn decl_line(x: &SimpleExtension) -> GenResult<String> {
    Ok(format!(
        "Value {} `xml:\",chardata\" json:\"value,omitempty\"`",
        x.base.go_type()?
    ))
}

/// Queue the base type and every attribute's named type.
pub(super) fn generate<'a>(x: &'a SimpleExtension, ctx: &mut GenContext<'a>) -> GenResult<()> {
    for a in &x.attributes {
        Node::Attribute(a).generate(ctx)?;
    }
    if x.base.is_ns() {
        ctx.schedule(x.base.local_name());
    }
    Ok(())
}

/// The chardata value itself has no structural checks; requiredness leaves a
/// breadcrumb comment.
pub(super) fn validate(x: &SimpleExtension, ctx: &mut GenContext<'_>, call: &str, path: &str) {
    let required = x.annotation.as_ref().map_or(false, |a| a.required_for(call));
    if required {
        ctx.validator_mut(call)
            .push_str(&format!("//{}.Value // chardata: {}\r\n", path, call));
    }
}
