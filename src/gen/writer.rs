//! Output assembly and file writing. The accumulators are stitched into one
//! Go source file: fixed preamble, Null wrappers, the `Request` index struct,
//! declarations in name order, then the per-call request plumbing.

use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info};

use crate::gen::templates;
use crate::gen::GenContext;
use crate::schema::error::GenResult;

/// Stitch the generation context into the final Go source text. Accumulator
/// maps are keyed by declaration name, so output order is stable across runs.
pub fn assemble(ctx: &GenContext<'_>, version: &str) -> String {
    let mut out = templates::package_header(version);
    out.push_str(templates::NULL_TYPES);

    out.push_str("type Request struct {\r\n");
    for call in &ctx.exported {
        out.push_str(&format!("{0}Request {0}RequestType\r\n", call));
    }
    out.push_str("}\r\n\r\n");

    for map in [&ctx.types, &ctx.enums, &ctx.funcs] {
        for body in map.values() {
            out.push_str(body);
            out.push_str("\r\n");
        }
    }

    // Calls with no derived checks get no Validate method and no wrappers
    // that would call one.
    for (call, body) in &ctx.validators {
        if body.is_empty() {
            continue;
        }
        out.push_str(&templates::requester(call));
        out.push_str(&templates::xml_encoder(call));
        out.push_str(&templates::xml_marshaler(call));
        out.push_str(&templates::validator(call, body));
    }

    out
}

/// Writer for the assembled Go source file.
pub struct GoWriter {
    output_path: PathBuf,
}

impl GoWriter {
    pub fn new<P: AsRef<Path>>(output_path: P) -> Self {
        GoWriter {
            output_path: output_path.as_ref().to_path_buf(),
        }
    }

    /// The default output name next to the input: `<stem>_<version>.go`.
    pub fn default_path(input: &Path, version: &str) -> PathBuf {
        let stem = input
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "schema".to_string());
        PathBuf::from(format!("./{}_{}.go", stem, version))
    }

    pub fn write(&self, content: &str) -> GenResult<()> {
        if let Some(parent) = self.output_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        debug!("writing {} bytes", content.len());
        fs::write(&self.output_path, content)?;
        info!("wrote {}", self.output_path.display());
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.output_path
    }
}
