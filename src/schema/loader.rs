//! XML -> schema tree deserialization.
//!
//! Mechanical by design: the document is trusted to be a well-formed instance
//! of the dialect, and everything semantic happens after this module. Both
//! `.xsd` documents and `.wsdl` wrappers (`definitions > types > schema`) are
//! accepted.

use std::path::Path;

use lazy_static::lazy_static;
use log::{debug, info};
use regex::Regex;
use roxmltree::{Document, Node};

use crate::schema::annotation::{Annotation, AppInfo, CallInfo, Documentation, RuleSet};
use crate::schema::error::{GenError, GenResult};
use crate::schema::types::TypeRef;
use crate::schema::{
    Attribute, ComplexContent, ComplexExtension, ComplexType, Element, Enumeration, Schema,
    Sequence, SimpleContent, SimpleExtension, SimpleRestriction, SimpleType,
};

/// The two input document shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Xsd,
    Wsdl,
}

impl SourceKind {
    /// Pick the document shape from the input file name.
    pub fn from_path(path: &Path) -> GenResult<SourceKind> {
        match path.extension().and_then(|e| e.to_str()) {
            Some("xsd") => Ok(SourceKind::Xsd),
            Some("wsdl") => Ok(SourceKind::Wsdl),
            _ => Err(GenError::UnsupportedConstruct {
                at: path.display().to_string(),
                what: "input must be a .xsd or .wsdl file".to_string(),
            }),
        }
    }
}

lazy_static! {
    static ref VERSION_COMMENT_RE: Regex = Regex::new(r"<!-- Version (\d{4}) -->").unwrap();
}

/// Deserialize a schema document. The returned schema carries the API
/// version when the document declares one (a WSDL service documentation
/// block, or the version comment near the head of an XSD).
pub fn load(text: &str, kind: SourceKind) -> GenResult<Schema> {
    let doc = Document::parse(text)?;
    let root = doc.root_element();

    let mut schema = match kind {
        SourceKind::Xsd => parse_schema(root)?,
        SourceKind::Wsdl => {
            let schema_node = root
                .descendants()
                .find(|n| n.is_element() && n.tag_name().name() == "schema")
                .ok_or_else(|| GenError::UnsupportedConstruct {
                    at: "definitions".to_string(),
                    what: "WSDL document carries no embedded schema".to_string(),
                })?;
            parse_schema(schema_node)?
        }
    };

    schema.version = match kind {
        SourceKind::Wsdl => wsdl_version(root),
        // The XSD declares its version only in a leading comment.
        SourceKind::Xsd => VERSION_COMMENT_RE
            .captures(text.get(..200).unwrap_or(text))
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().to_string()),
    };
    if let Some(v) = &schema.version {
        info!("API version: {}", v);
    }

    debug!(
        "loaded schema: {} elements, {} complex types, {} simple types",
        schema.elements.len(),
        schema.complex_types.len(),
        schema.simple_types.len()
    );
    Ok(schema)
}

fn wsdl_version(root: Node) -> Option<String> {
    let service = root
        .children()
        .find(|n| n.is_element() && n.tag_name().name() == "service")?;
    let documentation = child(service, "documentation")?;
    child(documentation, "Version").and_then(|n| n.text()).map(|t| t.trim().to_string())
}

fn child<'a, 'i>(node: Node<'a, 'i>, name: &str) -> Option<Node<'a, 'i>> {
    node.children()
        .find(|n| n.is_element() && n.tag_name().name() == name)
}

fn children<'a, 'i>(node: Node<'a, 'i>, name: &'a str) -> impl Iterator<Item = Node<'a, 'i>> {
    node.children()
        .filter(move |n| n.is_element() && n.tag_name().name() == name)
}

fn attr(node: Node, name: &str) -> Option<String> {
    node.attribute(name).map(str::to_string)
}

fn parse_schema(node: Node) -> GenResult<Schema> {
    let mut schema = Schema {
        target_namespace: attr(node, "targetNamespace"),
        version: attr(node, "version"),
        ..Schema::default()
    };
    for e in children(node, "element") {
        schema.elements.push(parse_element(e)?);
    }
    for s in children(node, "simpleType") {
        schema.simple_types.push(parse_simple_type(s)?);
    }
    for c in children(node, "complexType") {
        schema.complex_types.push(parse_complex_type(c)?);
    }
    Ok(schema)
}

fn parse_element(node: Node) -> GenResult<Element> {
    Ok(Element {
        name: attr(node, "name").unwrap_or_default(),
        type_ref: TypeRef::new(attr(node, "type").unwrap_or_default()),
        min_occurs: attr(node, "minOccurs"),
        max_occurs: attr(node, "maxOccurs"),
        nillable: attr(node, "nillable").as_deref() == Some("true"),
        annotation: child(node, "annotation").map(parse_annotation).transpose()?,
        simple_type: child(node, "simpleType")
            .map(|n| parse_simple_type(n).map(Box::new))
            .transpose()?,
        complex_type: child(node, "complexType")
            .map(|n| parse_complex_type(n).map(Box::new))
            .transpose()?,
    })
}

fn parse_attribute(node: Node) -> GenResult<Attribute> {
    Ok(Attribute {
        name: attr(node, "name").unwrap_or_default(),
        type_ref: TypeRef::new(attr(node, "type").unwrap_or_default()),
        use_marker: attr(node, "use"),
        annotation: child(node, "annotation").map(parse_annotation).transpose()?,
    })
}

fn parse_simple_type(node: Node) -> GenResult<SimpleType> {
    let name = attr(node, "name").unwrap_or_default();
    let restriction = child(node, "restriction").ok_or_else(|| GenError::UnsupportedConstruct {
        at: name.clone(),
        what: "simpleType without a restriction (list/union are unsupported)".to_string(),
    })?;
    let mut enums = Vec::new();
    for e in children(restriction, "enumeration") {
        enums.push(Enumeration {
            value: attr(e, "value").unwrap_or_default(),
            annotation: child(e, "annotation").map(parse_annotation).transpose()?,
        });
    }
    Ok(SimpleType {
        name,
        annotation: child(node, "annotation").map(parse_annotation).transpose()?,
        restriction: SimpleRestriction {
            base: TypeRef::new(attr(restriction, "base").unwrap_or_default()),
            enumerations: enums,
        },
    })
}

fn parse_complex_type(node: Node) -> GenResult<ComplexType> {
    let mut complex = ComplexType {
        name: attr(node, "name").unwrap_or_default(),
        is_abstract: attr(node, "abstract").as_deref() == Some("true"),
        annotation: child(node, "annotation").map(parse_annotation).transpose()?,
        ..ComplexType::default()
    };

    if let Some(sc) = child(node, "simpleContent") {
        complex.simple_content = Some(SimpleContent {
            extension: child(sc, "extension")
                .map(|ext| -> GenResult<SimpleExtension> {
                    let mut attrs = Vec::new();
                    for a in children(ext, "attribute") {
                        attrs.push(parse_attribute(a)?);
                    }
                    Ok(SimpleExtension {
                        base: TypeRef::new(attr(ext, "base").unwrap_or_default()),
                        annotation: child(ext, "annotation").map(parse_annotation).transpose()?,
                        attributes: attrs,
                    })
                })
                .transpose()?,
        });
    }

    if let Some(cc) = child(node, "complexContent") {
        complex.complex_content = Some(ComplexContent {
            has_restriction: child(cc, "restriction").is_some(),
            extension: child(cc, "extension")
                .map(|ext| -> GenResult<ComplexExtension> {
                    let mut attrs = Vec::new();
                    for a in children(ext, "attribute") {
                        attrs.push(parse_attribute(a)?);
                    }
                    Ok(ComplexExtension {
                        base: TypeRef::new(attr(ext, "base").unwrap_or_default()),
                        attributes: attrs,
                        sequence: child(ext, "sequence").map(parse_sequence).transpose()?,
                    })
                })
                .transpose()?,
        });
    }

    complex.sequence = child(node, "sequence").map(parse_sequence).transpose()?;
    for a in children(node, "attribute") {
        complex.attributes.push(parse_attribute(a)?);
    }
    Ok(complex)
}

fn parse_sequence(node: Node) -> GenResult<Sequence> {
    let mut seq = Sequence::default();
    for e in children(node, "element") {
        seq.elements.push(parse_element(e)?);
    }
    Ok(seq)
}

fn parse_annotation(node: Node) -> GenResult<Annotation> {
    let mut ann = Annotation::default();
    if let Some(ai) = child(node, "appinfo") {
        ann.app_info = parse_app_info(ai);
    }
    for d in children(node, "documentation") {
        ann.documentation.push(Documentation {
            source: attr(d, "source"),
            contents: d.text().unwrap_or_default().trim().to_string(),
        });
    }
    Ok(ann)
}

/// Directive tags appear with either capitalization of the first letter in
/// the real corpus, so matching is case-insensitive throughout appinfo.
fn tag_is(node: Node, want: &str) -> bool {
    node.tag_name().name().eq_ignore_ascii_case(want)
}

fn text_of(node: Node) -> String {
    node.text().unwrap_or_default().trim().to_string()
}

fn fill_rule(rules: &mut RuleSet, node: Node) -> bool {
    let text = text_of(node);
    if tag_is(node, "maxOccurs") {
        rules.max_occurs = text.parse().ok();
    } else if tag_is(node, "allValuesExcept") {
        rules.all_values_except = Some(text);
    } else if tag_is(node, "onlyTheseValues") {
        rules.only_these_values = Some(text);
    } else if tag_is(node, "maxLength") {
        rules.max_length = Some(text);
    } else if tag_is(node, "min") {
        rules.min = Some(text);
    } else if tag_is(node, "max") {
        rules.max = Some(text);
    } else if tag_is(node, "default") {
        rules.default_value = Some(text);
    } else {
        return false;
    }
    true
}

fn parse_app_info(node: Node) -> AppInfo {
    let mut info = AppInfo::default();
    for c in node.children().filter(|n| n.is_element()) {
        if fill_rule(&mut info.rules, c) {
            continue;
        }
        if tag_is(c, "MaxDepth") {
            info.max_depth = text_of(c).parse().ok();
        } else if tag_is(c, "CallName") {
            info.call_name = Some(text_of(c));
        } else if tag_is(c, "noCalls") {
            info.no_calls = true;
        } else if tag_is(c, "listBasedOn") {
            let text = text_of(c);
            if !text.is_empty() {
                info.list_based_on = Some(text);
            }
        } else if tag_is(c, "CallInfo") {
            info.call_info.push(parse_call_info(c));
        }
    }
    info
}

fn parse_call_info(node: Node) -> CallInfo {
    let mut ci = CallInfo::default();
    for c in node.children().filter(|n| n.is_element()) {
        if fill_rule(&mut ci.rules, c) {
            continue;
        }
        if tag_is(c, "AllCallsExcept") {
            ci.all_calls_except = Some(text_of(c));
        } else if tag_is(c, "AllCalls") {
            ci.all_calls = true;
        } else if tag_is(c, "CallName") {
            ci.call_names.push(text_of(c));
        } else if tag_is(c, "RequiredInput") {
            ci.required_input = Some(text_of(c));
        } else if tag_is(c, "Returned") {
            ci.returned = Some(text_of(c));
        } else if tag_is(c, "noCalls") {
            ci.no_calls = true;
        }
    }
    ci
}
