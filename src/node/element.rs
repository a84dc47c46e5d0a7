//! Field (`element`) behavior: declaration rendering, accessor emission, and
//! the per-field validation derivation that orders existence guards, bound
//! checks, loop wrapping and recursion into the field's target type.

use log::debug;

use crate::gen::GenContext;
use crate::node::details::TypeDetails;
use crate::node::Node;
use crate::schema::annotation::{RuleKind, RuleList, ValidationRule};
use crate::schema::error::{GenError, GenResult};
use crate::schema::types::{TypeRef, SLICEABLE_TYPES};
use crate::schema::{Element, Schema};
use crate::util::{fnv1a, to_snake, upper_first};

/// Derive the field semantics: repetition, pointer-ness, and alias
/// indirection through a `listBasedOn` override or the field's own simple
/// type.
pub(super) fn type_details(e: &Element, schema: &Schema) -> GenResult<TypeDetails> {
    let mut t = TypeDetails::new(&e.name, e.type_ref.clone());
    t.is_slice = e.slice_len()?.1;

    let list_based_on = e
        .annotation
        .as_ref()
        .and_then(|a| a.app_info.list_based_on.clone());
    match list_based_on {
        // A comma list names several aliases; none of them can stand in as
        // the single underlying type.
        Some(lbo) => {
            if !lbo.contains(',') {
                let simple = schema
                    .find_simple(&lbo)
                    .ok_or_else(|| GenError::Resolution(lbo.clone()))?;
                t.simple_type = true;
                t.alias_for = simple.restriction.base.clone();
            }
        }
        None => {
            if let Some(simple) = schema.find_simple(e.type_ref.local_name()) {
                t.simple_type = true;
                t.alias_for = simple.restriction.base.clone();
            }
        }
    }

    t.is_pointer = !e.type_ref.nullable(schema)? && !t.is_slice;
    Ok(t)
}

/// The generated Go type for the field, after the `listBasedOn` override and
/// slice/pointer wrapping.
fn transform_type(e: &Element, schema: &Schema) -> GenResult<String> {
    let mut nominal = e.type_ref.clone();
    if let Some(ann) = &e.annotation {
        if let Some(lbo) = &ann.app_info.list_based_on {
            if !lbo.contains(',') && TypeRef::new(lbo.clone()).nullable(schema)? {
                nominal = TypeRef::new(lbo.clone());
            }
        }
    }

    if e.slice_len()?.1 {
        let go = nominal.go_type()?;
        if let Some(list) = SLICEABLE_TYPES.get(go.as_str()) {
            return Ok(list.to_string());
        }
        return Ok(format!("[]{}", go));
    }
    if nominal.nullable(schema)? {
        return Ok(nominal.go_type()?);
    }
    Ok(format!("*{}", nominal.go_type()?))
}

pub(super) fn decl_line(e: &Element, schema: &Schema) -> GenResult<String> {
    Ok(format!(
        "{} {} `xml:\"{},omitempty\" json:\"{},omitempty\"`",
        upper_first(&e.name),
        transform_type(e, schema)?,
        e.name,
        to_snake(&e.name)
    ))
}

/// Queue the field's referenced declarations: its related named type plus
/// any `listBasedOn` aliases (comma-separated lists name several).
pub(super) fn generate<'a>(e: &'a Element, ctx: &mut GenContext<'a>) -> GenResult<()> {
    if !e.type_ref.is_xs() {
        ctx.schedule(e.type_ref.local_name());
    }
    if let Some(ann) = &e.annotation {
        if let Some(lbo) = &ann.app_info.list_based_on {
            for name in lbo.replace(' ', "").split(',') {
                if ctx.schema.find_simple(name).is_some() {
                    ctx.schedule(name);
                }
            }
        }
    }
    Ok(())
}

pub(super) fn emit_accessors<'a>(
    e: &'a Element,
    ctx: &mut GenContext<'a>,
    owner: &str,
) -> GenResult<()> {
    if TypeRef::from(owner).is_request() && type_details(e, ctx.schema)?.is_slice {
        let func_key = format!("{}_Append{}", owner, upper_first(&e.name));
        let body = if SLICEABLE_TYPES.contains_key(e.type_ref.go_type()?.as_str()) {
            format!(
                "func (x *{0}) Append{1}(v ...{2}) {{\r\n\tx.{1}.Append(v...)\r\n}}\r\n",
                owner,
                upper_first(&e.name),
                e.type_ref.go_type_raw()?
            )
        } else {
            format!(
                "func (x *{0}) Append{1}(v ...{2}) {{\r\n\tx.{1} = append(x.{1}, v...)\r\n}}\r\n",
                owner,
                upper_first(&e.name),
                e.type_ref.go_type()?
            )
        };
        ctx.funcs.insert(func_key, body);
    }

    // The response acknowledgement enum gets one predicate per live literal.
    if owner.ends_with("ResponseType") && e.type_ref.go_type()? == "AckCodeType" && e.name == "Ack"
    {
        if let Some(simple) = ctx.schema.find_simple("AckCodeType") {
            let exported = ctx.exported.clone();
            let mut body = String::new();
            let mut count = 0usize;
            for lit in &simple.restriction.enumerations {
                let skipped = lit
                    .annotation
                    .as_ref()
                    .map_or(false, |a| a.skip(&exported));
                if skipped || lit.value == "CustomCode" {
                    continue;
                }
                body.push_str(&format!(
                    "func (x {0}) {1}() bool {{\r\n\treturn x.Ack == Ack_{1}\r\n}}\r\n",
                    owner,
                    upper_first(&lit.value)
                ));
                count += 1;
            }
            if count > 0 {
                let func_key = format!("{}_AckCodeType{}", owner, upper_first(&e.name));
                ctx.funcs.insert(func_key, body);
            }
        }
    }
    Ok(())
}

/// The field's own constraint list for this call. Only required fields carry
/// derived rules; response directions never validate.
pub(super) fn needs_validation(e: &Element, call: &str) -> Vec<ValidationRule> {
    let mut list = Vec::new();
    if call.ends_with("Response") {
        return list;
    }
    let Some(ann) = &e.annotation else {
        return list;
    };
    if !ann.required_for(call) {
        return list;
    }
    list.push(ValidationRule::new(RuleKind::Required, None));
    list.extend(ann.validation_rules(call));
    list
}

pub(super) fn deep_requires_validation<'a>(
    e: &'a Element,
    ctx: &GenContext<'a>,
    call: &str,
    path: &str,
) -> GenResult<bool> {
    if e.type_ref.is_basic() && type_details(e, ctx.schema)?.is_slice {
        return Ok(false);
    }
    if !needs_validation(e, call).is_empty() {
        return Ok(true);
    }
    // A depth cutoff on the field bounds descent below it.
    let cutoff = e
        .annotation
        .as_ref()
        .map_or(false, |a| a.app_info.max_depth.is_some());
    if cutoff {
        return Ok(false);
    }
    let path = format!("{}.{}", path, e.name);
    match Node::Element(e).related(ctx.schema)? {
        Some(rel) => rel.deep_requires_validation(ctx, call, &path),
        None => Ok(false),
    }
}

/// Derive this field's validation sequence: bound check, existence guard,
/// pointer guard around nested validation, loop wrapping for repeated
/// fields, value constraints, then recursion into the target type. Brackets
/// close in reverse order of opening.
pub(super) fn validate<'a>(
    e: &'a Element,
    ctx: &mut GenContext<'a>,
    call: &str,
    path: &str,
) -> GenResult<()> {
    let rules = needs_validation(e, call);
    if rules.is_empty() {
        return Ok(());
    }
    debug!("validating {}.{} for {}", path, e.name, call);

    let schema = ctx.schema;
    let value_rules = rules.except(&[RuleKind::Required, RuleKind::MaxOccurs]);
    let related = Node::Element(e).related(schema)?;
    let mut new_path = format!("{}.{}", path, upper_first(&e.name));

    let mut deep = false;
    if let Some(rel) = &related {
        let no_cutoff = e
            .annotation
            .as_ref()
            .map_or(true, |a| a.app_info.max_depth.is_none());
        if no_cutoff {
            deep = rel.deep_requires_validation(ctx, call, &new_path)?;
        }
    }

    let mut details = type_details(e, schema)?;

    if let Some(rule) = rules.find_rule(RuleKind::MaxOccurs) {
        if let Some(line) = details.validation_string(rule, path, ctx)? {
            ctx.validator_mut(call).push_str(&line);
        }
    }
    if let Some(rule) = rules.find_rule(RuleKind::Required) {
        if let Some(line) = details.validation_string(rule, path, ctx)? {
            ctx.validator_mut(call).push_str(&line);
        }
    }

    // Existence guard before anything dereferences an absent value.
    let pointer_bracket = details.is_pointer && deep;
    if pointer_bracket {
        ctx.validator_mut(call)
            .push_str(&format!("if {} != nil {{\r\n", new_path));
    }

    let mut loop_bracket = false;
    if details.is_slice {
        let key = format!("i{}", fnv1a(path));
        let field_expr = format!("{}.{}", path, upper_first(&e.name));
        new_path = format!("{}[{}]", field_expr, key);
        if !value_rules.is_empty() || deep {
            loop_bracket = true;
            ctx.validator_mut(call)
                .push_str(&format!("for {} := range {} {{\r\n", key, field_expr));
        }
        details = details.with_key(&key);
    }

    for rule in &value_rules {
        if let Some(line) = details.validation_string(rule, path, ctx)? {
            ctx.validator_mut(call).push_str(&line);
        }
    }

    if let Some(rel) = &related {
        rel.validate(ctx, call, &new_path)?;
    }

    if loop_bracket {
        ctx.validator_mut(call).push_str("}\r\n");
    }
    if pointer_bracket {
        ctx.validator_mut(call).push_str("}\r\n");
    }
    Ok(())
}
