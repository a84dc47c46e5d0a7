//! Attribute behavior. Attributes are scalar, never repeated; their
//! requiredness comes from either annotation policy or the schema-level
//! `use="required"` marker.

use crate::gen::GenContext;
use crate::node::details::TypeDetails;
use crate::node::Node;
use crate::schema::annotation::{RuleKind, ValidationRule};
use crate::schema::error::GenResult;
use crate::schema::{Attribute, Schema};
use crate::util::{to_snake, upper_first};

pub(super) fn type_details(a: &Attribute, schema: &Schema) -> GenResult<TypeDetails> {
    let mut t = TypeDetails::new(&a.name, a.type_ref.clone());
    if let Some(simple) = schema.find_simple(a.type_ref.local_name()) {
        t.simple_type = true;
        t.alias_for = simple.restriction.base.clone();
    }
    t.is_pointer = !a.type_ref.nullable(schema)?;
    Ok(t)
}

pub(super) fn decl_line(a: &Attribute, _schema: &Schema) -> GenResult<String> {
    // Optional attributes get the Null wrapper so absence survives marshal.
    let go_type = if a.use_marker.as_deref() == Some("optional") {
        a.type_ref.go_type()?
    } else {
        a.type_ref.go_type_raw()?
    };
    Ok(format!(
        "{} {} `xml:\"{},attr,omitempty\" json:\"{},omitempty\"` //attribute",
        upper_first(&a.name),
        go_type,
        a.name,
        to_snake(&a.name)
    ))
}

pub(super) fn generate<'a>(a: &'a Attribute, ctx: &mut GenContext<'a>) -> GenResult<()> {
    if a.type_ref.is_ns() {
        ctx.schedule(a.type_ref.local_name());
    }
    Ok(())
}

pub(super) fn needs_validation(a: &Attribute, call: &str) -> Vec<ValidationRule> {
    let mut list = Vec::new();
    if call.ends_with("Response") {
        return list;
    }
    let Some(ann) = &a.annotation else {
        return list;
    };
    if ann.required_for(call) || a.is_required() {
        list.push(ValidationRule::new(RuleKind::Required, None));
    }
    list.extend(ann.validation_rules(call));
    list
}

pub(super) fn validate<'a>(
    a: &'a Attribute,
    ctx: &mut GenContext<'a>,
    call: &str,
    path: &str,
) -> GenResult<()> {
    let rules = needs_validation(a, call);
    if rules.is_empty() {
        return Ok(());
    }

    let details = type_details(a, ctx.schema)?;
    for rule in &rules {
        if let Some(line) = details.validation_string(rule, path, ctx)? {
            ctx.validator_mut(call).push_str(&line);
        }
    }

    let new_path = format!("{}.{}", path, upper_first(&a.name));
    if let Some(rel) = Node::Attribute(a).related(ctx.schema)? {
        rel.validate(ctx, call, &new_path)?;
    }
    Ok(())
}
