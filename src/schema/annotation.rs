//! The proprietary documentation-annotation convention and its policy engine.
//!
//! Each field/attribute/enumeration member carries an `<annotation>` whose
//! `<appinfo>` holds call-scoped clauses: which calls the member applies to,
//! whether it is required on input or merely returned, and constraint
//! directives (maxOccurs, maxLength, value allow/deny lists, numeric bounds,
//! a nesting-depth cutoff). The corpus mixes capitalizations of every
//! directive tag; the loader accepts both.

use lazy_static::lazy_static;
use log::debug;
use regex::Regex;

use crate::schema::error::{GenError, GenResult};
use crate::schema::Schema;

/// `<annotation>`: appinfo directives plus free-form documentation.
#[derive(Debug, Default, Clone)]
pub struct Annotation {
    pub app_info: AppInfo,
    pub documentation: Vec<Documentation>,
}

#[derive(Debug, Default, Clone)]
pub struct Documentation {
    pub source: Option<String>,
    pub contents: String,
}

/// Directives shared between the appinfo level and each call-scoped clause.
#[derive(Debug, Default, Clone)]
pub struct RuleSet {
    pub max_occurs: Option<i64>,
    pub all_values_except: Option<String>,
    pub only_these_values: Option<String>,
    pub max_length: Option<String>,
    pub min: Option<String>,
    pub max: Option<String>,
    pub default_value: Option<String>,
}

impl RuleSet {
    fn collect(&self, out: &mut Vec<ValidationRule>) {
        if let Some(n) = self.max_occurs {
            out.push(ValidationRule::new(RuleKind::MaxOccurs, Some(n.to_string())));
        }
        if let Some(v) = &self.all_values_except {
            out.push(ValidationRule::new(RuleKind::AllValuesExcept, Some(v.clone())));
        }
        if let Some(v) = &self.only_these_values {
            out.push(ValidationRule::new(RuleKind::OnlyTheseValues, Some(v.clone())));
        }
        if let Some(v) = &self.max_length {
            out.push(ValidationRule::new(RuleKind::MaxLength, Some(v.clone())));
        }
        if let Some(v) = &self.min {
            out.push(ValidationRule::new(RuleKind::Min, Some(v.clone())));
        }
        if let Some(v) = &self.max {
            out.push(ValidationRule::new(RuleKind::Max, Some(v.clone())));
        }
    }
}

/// `<appinfo>` contents.
#[derive(Debug, Default, Clone)]
pub struct AppInfo {
    /// Nesting-depth cutoff: suppresses the deep-validation check entirely.
    pub max_depth: Option<i64>,
    /// Member-level single call name (used on root-element annotations).
    pub call_name: Option<String>,
    /// Explicit opt-out marker.
    pub no_calls: bool,
    /// Overrides the field's nominal type with a named alias (or, comma
    /// separated, schedules several aliases for generation).
    pub list_based_on: Option<String>,
    pub rules: RuleSet,
    pub call_info: Vec<CallInfo>,
}

/// One call-scoped clause inside `<appinfo>`.
#[derive(Debug, Default, Clone)]
pub struct CallInfo {
    /// `<allCalls/>` marker: the clause governs every operation.
    pub all_calls: bool,
    /// `<allCallsExcept>` comma-separated exclusion set.
    pub all_calls_except: Option<String>,
    /// Explicit operation set (one `<CallName>` child per member).
    pub call_names: Vec<String>,
    pub required_input: Option<String>,
    pub returned: Option<String>,
    pub no_calls: bool,
    pub rules: RuleSet,
}

fn split_comma_list(s: &str) -> Vec<String> {
    s.replace(' ', "")
        .split(',')
        .filter(|p| !p.is_empty())
        .map(str::to_string)
        .collect()
}

impl Annotation {
    /// Inclusion filter: is this member part of the given call's message in
    /// the given direction? First matching clause wins; no clause excludes.
    /// An empty call context (a type outside any request/response root)
    /// includes everything.
    pub fn included_in(&self, call: &str, request: bool) -> bool {
        if call.is_empty() {
            return true;
        }
        for ci in &self.app_info.call_info {
            if let Some(except) = &ci.all_calls_except {
                return !split_comma_list(except).iter().any(|c| c == call);
            }
            if ci.all_calls {
                return if request {
                    ci.required_input.as_deref().map_or(false, |s| !s.is_empty())
                } else {
                    ci.returned.as_deref().map_or(false, |s| !s.is_empty())
                };
            }
            if ci.call_names.iter().any(|c| c == call) {
                return if request {
                    ci.required_input.as_deref().map_or(false, |s| !s.is_empty())
                } else {
                    ci.returned.as_deref().map_or(false, |s| !s.is_empty())
                };
            }
        }
        false
    }

    /// Request-direction requiredness. Same precedence as [`included_in`],
    /// but an all-except clause that does not exclude the call counts as
    /// required outright, and explicit clauses demand the literal `Yes`.
    ///
    /// [`included_in`]: Annotation::included_in
    pub fn required_for(&self, call: &str) -> bool {
        for ci in &self.app_info.call_info {
            if let Some(except) = &ci.all_calls_except {
                return !split_comma_list(except).iter().any(|c| c == call);
            }
            if ci.all_calls {
                return ci.required_input.as_deref() == Some("Yes");
            }
            if ci.call_names.iter().any(|c| c == call) {
                return ci.required_input.as_deref() == Some("Yes");
            }
        }
        false
    }

    /// Node-level short-circuit: the member is dropped for every exported
    /// call. Covers the explicit opt-out marker, a member-level call name
    /// outside the exported set, an exclusion set covering every exported
    /// call, and clause sets disjoint from the exported set.
    pub fn skip(&self, exported: &[String]) -> bool {
        if self.app_info.no_calls {
            return true;
        }
        if let Some(cn) = &self.app_info.call_name {
            if !exported.iter().any(|e| e == cn) {
                return true;
            }
        }
        for ci in &self.app_info.call_info {
            if ci.all_calls {
                return false;
            }
            if ci.no_calls {
                return true;
            }
            if let Some(except) = &ci.all_calls_except {
                let excepts = split_comma_list(except);
                let found = exported
                    .iter()
                    .filter(|m| excepts.iter().any(|x| x == *m))
                    .count();
                return found == exported.len();
            }
            if ci.call_names.iter().any(|m| exported.iter().any(|e| e == m)) {
                return false;
            }
        }
        !self.app_info.call_info.is_empty()
    }

    /// Ordered constraint directives applying to the given call: appinfo-level
    /// directives first, then each matching clause's. Response calls carry no
    /// generated validation.
    pub fn validation_rules(&self, call: &str) -> Vec<ValidationRule> {
        let mut list = Vec::new();
        if call.ends_with("Response") {
            return list;
        }
        self.app_info.rules.collect(&mut list);
        for ci in &self.app_info.call_info {
            if ci.call_names.iter().any(|c| c == call) {
                ci.rules.collect(&mut list);
            }
        }
        list
    }
}

/// The constraint kinds the rule deriver can render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleKind {
    MaxOccurs,
    AllValuesExcept,
    OnlyTheseValues,
    MaxLength,
    Required,
    Min,
    Max,
}

/// One derived constraint: a kind plus its (usually textual) threshold.
#[derive(Debug, Clone)]
pub struct ValidationRule {
    pub kind: RuleKind,
    pub value: Option<String>,
}

lazy_static! {
    static ref MAX_LENGTH_IS_RE: Regex =
        Regex::new(r"Currently, the maximum length is (\d+) ").unwrap();
    static ref ALLOCATES_UP_TO_RE: Regex =
        Regex::new(r"allocates up to (\d+) characters").unwrap();
}

/// The one threshold in the corpus that is not textual at all: computed as
/// the longest literal across these two enumerations.
const LONGEST_NAME_PHRASE: &str =
    "length of longest name in ShippingRegionCodeType and CountryCodeType";
const LONGEST_NAME_TYPES: [&str; 2] = ["ShippingRegionCodeType", "CountryCodeType"];

impl ValidationRule {
    pub fn new(kind: RuleKind, value: Option<String>) -> Self {
        ValidationRule { kind, value }
    }

    /// Extract the numeric threshold. Some thresholds are embedded in
    /// free-form documentation prose and recovered by pattern-matching known
    /// phrasings; failure here is degraded-not-fatal at the call site.
    pub fn value_int(&self, schema: &Schema) -> GenResult<i64> {
        let raw = self.value.as_deref().unwrap_or("");

        if raw == LONGEST_NAME_PHRASE {
            let mut longest = 0usize;
            for name in LONGEST_NAME_TYPES {
                let simple = schema
                    .find_simple(name)
                    .ok_or_else(|| GenError::Resolution(name.to_string()))?;
                for e in &simple.restriction.enumerations {
                    longest = longest.max(e.value.len());
                }
            }
            return Ok(longest as i64);
        }

        let mut text = raw;
        if let Some(caps) = MAX_LENGTH_IS_RE.captures(raw) {
            text = caps.get(1).map_or(raw, |m| m.as_str());
        } else if let Some(caps) = ALLOCATES_UP_TO_RE.captures(raw) {
            text = caps.get(1).map_or(raw, |m| m.as_str());
        }

        let word = text.split_whitespace().next().unwrap_or("");
        let value: f64 = word.parse().map_err(|_| GenError::UnimplementedRule {
            field: String::new(),
            detail: format!("threshold `{}` is not numeric", raw),
        })?;
        debug!("extracted threshold {} from `{}`", value as i64, raw);
        Ok(value as i64)
    }
}

/// Ordered list of derived constraints for one member and call.
pub trait RuleList {
    fn find_rule(&self, kind: RuleKind) -> Option<&ValidationRule>;
    fn except(&self, kinds: &[RuleKind]) -> Vec<ValidationRule>;
}

impl RuleList for Vec<ValidationRule> {
    fn find_rule(&self, kind: RuleKind) -> Option<&ValidationRule> {
        self.iter().find(|r| r.kind == kind)
    }

    fn except(&self, kinds: &[RuleKind]) -> Vec<ValidationRule> {
        self.iter()
            .filter(|r| !kinds.contains(&r.kind))
            .cloned()
            .collect()
    }
}
