//! Code model building.
//!
//! `GenContext` is the single generation state threaded by reference through
//! the traversal: the append-only declaration accumulators, the per-call
//! validation accumulator, and the work queue of named types still awaiting
//! generation. One schema document in, one fully-resolved code model out;
//! everything is single-threaded and single-writer.

pub mod templates;
pub mod writer;


use std::collections::{BTreeMap, VecDeque};
use std::fs;
use std::path::Path;

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::node::{find, Node};
use crate::schema::error::{GenError, GenResult};
use crate::schema::Schema;

/// Options for one generation run, loadable from a JSON config file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GenOptions {
    /// Comma-separated call list; empty means every declared `*Request` root.
    #[serde(default)]
    pub exported: Option<String>,

    /// API version override when the document declares none.
    #[serde(default)]
    pub api_version: Option<String>,

    /// Output file path; the writer picks a default when absent.
    #[serde(default)]
    pub output: Option<String>,
}

impl GenOptions {
    pub fn from_file<P: AsRef<Path>>(path: P) -> GenResult<Self> {
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Fold command-line values over the loaded options. A flag given on the
    /// command line wins over the config file.
    pub fn override_with(
        mut self,
        exported: Option<&str>,
        api_version: Option<&str>,
        output: Option<&str>,
    ) -> Self {
        if exported.is_some() {
            self.exported = exported.map(str::to_string);
        }
        if api_version.is_some() {
            self.api_version = api_version.map(str::to_string);
        }
        if output.is_some() {
            self.output = output.map(str::to_string);
        }
        self
    }
}

/// The exported-operations set: explicit comma-separated list when given,
/// otherwise every root element whose name ends in the request suffix.
pub fn exported_calls(schema: &Schema, explicit: Option<&str>) -> Vec<String> {
    if let Some(list) = explicit {
        if !list.is_empty() {
            return list
                .replace(' ', "")
                .split(',')
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect();
        }
    }
    schema
        .elements
        .iter()
        .filter_map(|e| e.name.strip_suffix("Request"))
        .map(str::to_string)
        .collect()
}

/// Mutable state of one generation run.
pub struct GenContext<'a> {
    pub schema: &'a Schema,
    pub exported: Vec<String>,

    /// Named type -> rendered struct declaration. Presence here is the
    /// at-most-once generation check.
    pub types: BTreeMap<String, String>,
    /// Enum alias -> rendered alias + constants block.
    pub enums: BTreeMap<String, String>,
    /// Helper name -> rendered function (setters, membership lists, predicates).
    pub funcs: BTreeMap<String, String>,
    /// Call name -> ordered validation statements for its request root.
    pub validators: BTreeMap<String, String>,

    /// Named types referenced but not yet generated. Drained after the
    /// referencing type's own body is fully registered, so a declaration
    /// never blocks on completion of a type it references.
    pending: VecDeque<String>,
    warnings: u32,
}

impl<'a> GenContext<'a> {
    pub fn new(schema: &'a Schema, exported: Vec<String>) -> Self {
        GenContext {
            schema,
            exported,
            types: BTreeMap::new(),
            enums: BTreeMap::new(),
            funcs: BTreeMap::new(),
            validators: BTreeMap::new(),
            pending: VecDeque::new(),
            warnings: 0,
        }
    }

    /// Count of constraints dropped because their threshold failed heuristic
    /// extraction. Non-zero means the generated validation is weaker than
    /// the schema asked for.
    pub fn warnings(&self) -> u32 {
        self.warnings
    }

    pub fn note_warning(&mut self) {
        self.warnings += 1;
    }

    pub fn validator_mut(&mut self, call: &str) -> &mut String {
        self.validators.entry(call.to_string()).or_default()
    }

    /// Queue a named type for generation once the current body is done.
    pub fn schedule<S: Into<String>>(&mut self, name: S) {
        let name = name.into();
        if !name.is_empty() {
            self.pending.push_back(name);
        }
    }

    fn drain_pending(&mut self) -> GenResult<()> {
        while let Some(name) = self.pending.pop_front() {
            if self.types.contains_key(&name) || self.enums.contains_key(&name) {
                continue;
            }
            let node = find(self.schema, &name)?;
            node.generate(self)?;
        }
        Ok(())
    }

    /// Generate everything reachable from the exported-operations set.
    pub fn run(&mut self) -> GenResult<()> {
        for call in self.exported.clone() {
            info!("Call: {}", call);
            self.from_request(&call)?;
            self.from_response(&call)?;
        }
        if self.warnings > 0 {
            warn!(
                "{} validation constraint(s) skipped after failed threshold extraction",
                self.warnings
            );
        }
        Ok(())
    }

    fn root_complex(&self, element_name: &str) -> GenResult<Node<'a>> {
        let root = self
            .schema
            .find_root_element(element_name)
            .ok_or_else(|| GenError::MissingElement(element_name.to_string()))?;
        let complex = self
            .schema
            .find_complex(root.type_ref.local_name())
            .ok_or_else(|| GenError::Resolution(root.type_ref.0.clone()))?;
        Ok(Node::Complex(complex))
    }

    fn from_request(&mut self, call: &str) -> GenResult<()> {
        let node = self.root_complex(&format!("{}Request", call))?;
        node.generate(self)?;
        self.drain_pending()?;
        node.validate(self, call, "")?;
        node.emit_accessors(self, "")?;
        debug!("request root for {} generated", call);
        Ok(())
    }

    fn from_response(&mut self, call: &str) -> GenResult<()> {
        let node = self.root_complex(&format!("{}Response", call))?;
        node.generate(self)?;
        self.drain_pending()?;
        node.emit_accessors(self, "")?;
        Ok(())
    }
}
