//! Field semantics derivation.
//!
//! `TypeDetails` answers, for one field or attribute: is it a slice, is it a
//! pointer, is it an alias of a primitive, and how is it spelled in generated
//! guard conditions. All downstream condition rendering goes through the
//! underlying (`alias_for`) type, not the nominal one.

use log::warn;

use crate::gen::GenContext;
use crate::schema::annotation::{RuleKind, ValidationRule};
use crate::schema::error::{GenError, GenResult};
use crate::schema::types::TypeRef;
use crate::util::upper_first;

#[derive(Debug, Clone)]
pub struct TypeDetails {
    pub field: String,
    pub type_ref: TypeRef,
    /// The underlying type once alias indirection is resolved; equals
    /// `type_ref` for plain fields.
    pub alias_for: TypeRef,
    pub is_pointer: bool,
    pub is_slice: bool,
    /// True when the declared type is itself an enum alias over a primitive.
    pub simple_type: bool,
    key: String,
}

impl TypeDetails {
    pub fn new(field: &str, type_ref: TypeRef) -> Self {
        TypeDetails {
            field: field.to_string(),
            alias_for: type_ref.clone(),
            type_ref,
            is_pointer: false,
            is_slice: false,
            simple_type: false,
            key: String::new(),
        }
    }

    /// Set the loop index used when rendering paths inside an iteration.
    pub fn with_key(mut self, key: &str) -> Self {
        self.key = key.to_string();
        self
    }

    /// The access-path expression for this field under `base`. Appends a
    /// textual coercion only when the nominal type differs from the
    /// underlying primitive and that primitive is textual.
    pub fn path(&self, base: &str) -> GenResult<String> {
        let mut expr = if self.key.is_empty() {
            format!("{}.{}", base, upper_first(&self.field))
        } else {
            format!("{}.{}[{}]", base, upper_first(&self.field), self.key)
        };
        if self.alias_for != self.type_ref && self.alias_for.go_type()? == "string" {
            expr.push_str(".String()");
        }
        Ok(expr)
    }

    /// The Go type all condition rendering keys off.
    fn t(&self) -> GenResult<String> {
        if self.simple_type {
            self.alias_for.go_type_raw()
        } else {
            self.alias_for.go_type()
        }
    }

    /// The "field is absent" condition, or an error when no rendering exists
    /// for the underlying type.
    pub fn is_set(&self, path: &str) -> GenResult<String> {
        if self.is_pointer {
            return Ok(format!("{} == nil", path));
        }
        if self.is_slice {
            return Ok(format!("len({}) == 0", path));
        }
        match self.t()?.as_str() {
            "string" => Ok(format!("{} == \"\"", path)),
            "int32" | "int64" => Ok(format!("{} == 0", path)),
            "NullString" | "NullFloat64" | "NullInt64" | "NullBool" => {
                Ok(format!("!{}.Valid", path))
            }
            other => Err(GenError::UnimplementedRule {
                field: self.field.clone(),
                detail: format!("no is-set rendering for `{}`", other),
            }),
        }
    }

    /// Length-bound condition; `None` when the underlying type has no
    /// measurable length.
    fn check_max_length(&self, path: &str, value: i64) -> GenResult<Option<String>> {
        let cond = match self.t()?.as_str() {
            "string" => format!("len({}) > {}", path, value),
            "int32" | "int64" => format!("{} > {}", path, value),
            "NullString" => format!("len({}.NullString.String) > {}", path, value),
            "AmountType" => format!("{0}.Value.Valid && len({0}.Value.String()) > {1}", path, value),
            "NullFloat64" => format!("{0}.Valid && len({0}.String()) > {1}", path, value),
            "CategoryType" => return Ok(None),
            other => {
                return Err(GenError::UnimplementedRule {
                    field: self.field.clone(),
                    detail: format!("no max-length rendering for `{}`", other),
                })
            }
        };
        Ok(Some(cond))
    }

    fn min_cond(&self, path: &str, value: i64) -> GenResult<String> {
        match self.t()?.as_str() {
            "int32" | "int64" => Ok(format!("{} < {}", path, value)),
            "NullFloat64" | "NullInt64" => Ok(format!("{}.Value() < {}", path, value)),
            "AmountType" => Ok(format!("{}.Value.Value() < {}", path, value)),
            other => Err(GenError::UnimplementedRule {
                field: self.field.clone(),
                detail: format!("no minimum rendering for `{}`", other),
            }),
        }
    }

    fn max_cond(&self, path: &str, value: i64) -> GenResult<String> {
        match self.t()?.as_str() {
            "int32" | "int64" => Ok(format!("{} > {}", path, value)),
            "NullFloat64" | "NullInt64" => Ok(format!("{}.Value() > {}", path, value)),
            "AmountType" => Ok(format!("{}.Value.Value() > {}", path, value)),
            other => Err(GenError::UnimplementedRule {
                field: self.field.clone(),
                detail: format!("no maximum rendering for `{}`", other),
            }),
        }
    }

    fn quoted_list(raw: &str) -> String {
        raw.split(',')
            .map(str::trim)
            .collect::<Vec<_>>()
            .join("\", \"")
    }

    /// Render one rule as a guard + failure return, or `None` when the rule
    /// does not apply (non-slice maxOccurs, unmeasurable max-length) or its
    /// threshold failed heuristic extraction (degraded: warned and counted).
    pub fn validation_string(
        &self,
        rule: &ValidationRule,
        path: &str,
        ctx: &mut GenContext,
    ) -> GenResult<Option<String>> {
        let fpath = format!("{}.{}", path, upper_first(&self.field));
        let condition;
        let message;

        match rule.kind {
            RuleKind::MaxOccurs => {
                if !self.is_slice {
                    return Ok(None);
                }
                let value = rule.value.as_deref().unwrap_or("0");
                condition = format!("len({}) > {}", self.path(path)?, value);
                message = format!("field {} must be between 0 and {}", fpath, value);
            }
            RuleKind::Required => {
                condition = self.is_set(&fpath)?;
                message = format!("field {} must be set", self.field);
            }
            RuleKind::AllValuesExcept => {
                let raw = rule.value.as_deref().unwrap_or("");
                condition = format!(
                    "contains([]string{{\"{}\"}}, string({}))",
                    Self::quoted_list(raw),
                    self.path(path)?
                );
                message = format!("field {} contains invalid value", fpath);
            }
            RuleKind::OnlyTheseValues => {
                let raw = rule.value.as_deref().unwrap_or("");
                condition = format!(
                    "!contains([]string{{\"{}\"}}, string({}))",
                    Self::quoted_list(raw),
                    self.path(path)?
                );
                message = format!("field {} contains invalid value", fpath);
            }
            RuleKind::MaxLength => {
                let value = match rule.value_int(ctx.schema) {
                    Ok(v) => v,
                    Err(err) => {
                        warn!(
                            "could not parse MaxLength for {}, skipping validation line: {}",
                            fpath, err
                        );
                        ctx.note_warning();
                        return Ok(None);
                    }
                };
                match self.check_max_length(&self.path(path)?, value)? {
                    Some(cond) => {
                        condition = cond;
                        message = format!(
                            "field {} must be between 1 and {} characters long",
                            fpath, value
                        );
                    }
                    None => return Ok(None),
                }
            }
            RuleKind::Min => {
                let value = match rule.value_int(ctx.schema) {
                    Ok(v) => v,
                    Err(err) => {
                        warn!(
                            "could not parse Min for {}, skipping validation line: {}",
                            fpath, err
                        );
                        ctx.note_warning();
                        return Ok(None);
                    }
                };
                condition = self.min_cond(&self.path(path)?, value)?;
                message = format!("field {} must be at least {}", fpath, value);
            }
            RuleKind::Max => {
                let value = match rule.value_int(ctx.schema) {
                    Ok(v) => v,
                    Err(err) => {
                        warn!(
                            "could not parse Max for {}, skipping validation line: {}",
                            fpath, err
                        );
                        ctx.note_warning();
                        return Ok(None);
                    }
                };
                condition = self.max_cond(&self.path(path)?, value)?;
                message = format!("field {} must be at most {}", fpath, value);
            }
        }

        Ok(Some(format!(
            "if {} {{ return errors.New(\"{}\") }}\r\n",
            condition, message
        )))
    }
}
