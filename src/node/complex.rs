//! Named-type (`complexType`) behavior: body rendering with deduplicated,
//! work-queue-deferred generation of referenced types, inclusion-filtered
//! child lists, and validation seeding.

use log::debug;

use crate::gen::GenContext;
use crate::node::Node;
use crate::schema::annotation::Annotation;
use crate::schema::error::{GenError, GenResult};
use crate::schema::{ComplexType, Element, Schema};

/// The call context a type's own name implies: request/response roots filter
/// their children against that call, everything else keeps all fields.
fn call_context(c: &ComplexType) -> (&str, bool) {
    if c.is_abstract {
        return ("", false);
    }
    if let Some(call) = c.name.strip_suffix("RequestType") {
        return (call, true);
    }
    if let Some(call) = c.name.strip_suffix("ResponseType") {
        return (call, false);
    }
    ("", false)
}

fn keep(annotation: &Option<Annotation>, call: &str, request: bool, exported: &[String]) -> bool {
    match annotation {
        Some(a) => !a.skip(exported) && a.included_in(call, request),
        // An unannotated member only survives outside any call context.
        None => call.is_empty(),
    }
}

fn keep_element(e: &Element, call: &str, request: bool, exported: &[String]) -> bool {
    keep(&e.annotation, call, request, exported)
}

/// The effective field list: simple-content attributes plus the synthetic
/// value field, a single level of inherited base fields, then the type's own
/// sequence — each inclusion-filtered for the type's call context.
pub(super) fn children<'a>(
    c: &'a ComplexType,
    schema: &'a Schema,
    exported: &[String],
) -> GenResult<Vec<Node<'a>>> {
    let (call, request) = call_context(c);
    let mut out = Vec::new();

    if let Some(sc) = &c.simple_content {
        let ext = sc.extension.as_ref().ok_or_else(|| GenError::UnsupportedConstruct {
            at: c.name.clone(),
            what: "simpleContent without an extension".to_string(),
        })?;
        for a in &ext.attributes {
            if keep(&a.annotation, call, request, exported) {
                out.push(Node::Attribute(a));
            }
        }
        out.push(Node::Extension(ext));
    }

    if let Some(cc) = &c.complex_content {
        if cc.has_restriction {
            return Err(GenError::UnsupportedConstruct {
                at: c.name.clone(),
                what: "complexContent restriction".to_string(),
            });
        }
        if let Some(ext) = &cc.extension {
            let base = schema
                .find_complex(ext.base.local_name())
                .ok_or_else(|| GenError::Resolution(ext.base.0.clone()))?;
            if let Some(seq) = &base.sequence {
                for e in &seq.elements {
                    if keep_element(e, call, request, exported) {
                        out.push(Node::Element(e));
                    }
                }
            }
            if !ext.attributes.is_empty() {
                return Err(GenError::UnsupportedConstruct {
                    at: c.name.clone(),
                    what: "attributes on a complexContent extension".to_string(),
                });
            }
            if let Some(seq) = &ext.sequence {
                for e in &seq.elements {
                    if keep_element(e, call, request, exported) {
                        out.push(Node::Element(e));
                    }
                }
            }
        }
    }

    if let Some(seq) = &c.sequence {
        for e in &seq.elements {
            if keep_element(e, call, request, exported) {
                out.push(Node::Element(e));
            }
        }
    }
    Ok(out)
}

/// Render and register this type's declaration. The body is fully rendered
/// and registered before any referenced type generates: children only queue
/// their related types, and the context drains the queue afterwards.
pub(super) fn generate<'a>(c: &'a ComplexType, ctx: &mut GenContext<'a>) -> GenResult<()> {
    if ctx.types.contains_key(&c.name) {
        return Ok(());
    }
    debug!("generating type {}", c.name);
    let schema = ctx.schema;
    let exported = ctx.exported.clone();

    let mut body = format!("type {} struct {{\r\n", c.name);
    if let Some(call) = c.name.strip_suffix("RequestType") {
        if !c.is_abstract && exported.iter().any(|e| e == call) {
            let wire_name = c.name.strip_suffix("Type").unwrap_or(&c.name);
            body.push_str(&format!(
                "\tXMLName\txml.Name `xml:\"{}\" json:\"-\"`\r\n",
                wire_name
            ));
            body.push_str("\tXmlnsAttr `xml:\"xmlns,attr\" json:\"-\"`\r\n\r\n");
        }
    }

    for child in children(c, schema, &exported)? {
        body.push_str(&format!("\t{}\r\n", child.decl_line(schema)?));
        child.generate(ctx)?;
    }
    body.push_str("}\r\n");

    ctx.types.insert(c.name.clone(), body);
    Ok(())
}

pub(super) fn emit_accessors<'a>(c: &'a ComplexType, ctx: &mut GenContext<'a>) -> GenResult<()> {
    let schema = ctx.schema;
    let exported = ctx.exported.clone();
    for child in children(c, schema, &exported)? {
        child.emit_accessors(ctx, &c.name)?;
    }
    Ok(())
}

pub(super) fn deep_requires_validation<'a>(
    c: &'a ComplexType,
    ctx: &GenContext<'a>,
    call: &str,
    path: &str,
) -> GenResult<bool> {
    let child_path = format!("{}.{}", path, c.name);
    for child in children(c, ctx.schema, &ctx.exported)? {
        // Self-recursion guard: a field typed as its own container.
        if child.type_ref().local_name() == c.name {
            continue;
        }
        if child.deep_requires_validation(ctx, call, &child_path)? {
            return Ok(true);
        }
    }
    Ok(false)
}

pub(super) fn validate<'a>(
    c: &'a ComplexType,
    ctx: &mut GenContext<'a>,
    call: &str,
    path: &str,
) -> GenResult<()> {
    // Seeding a request root registers the call even when no checks follow.
    ctx.validator_mut(call);
    let path = if path.is_empty() { "x" } else { path };
    let schema = ctx.schema;
    let exported = ctx.exported.clone();
    for child in children(c, schema, &exported)? {
        child.validate(ctx, call, path)?;
    }
    Ok(())
}

pub(super) fn decl_line(c: &ComplexType) -> String {
    format!("{} {} //complexType", c.name, c.name)
}
