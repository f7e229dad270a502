//! `<stem>.provenance.json` sidecars next to every GeoJSON the CLI writes.
//!
//! A sidecar records which code revision and library version produced the
//! file, with which parameters, from which inputs, and the batch counts.

use std::fs;
use std::panic::Location;
use std::path::{Path, PathBuf};
use std::process::Command;

use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::Value;

/// Run metadata collected by the caller.
pub struct Payload {
    pub params: Value,
    pub inputs: Vec<String>,
    /// Extra outputs besides the artifact the sidecar belongs to.
    pub outputs: Vec<String>,
    pub stats: Value,
}

impl Payload {
    pub fn new(params: Value) -> Self {
        Self {
            params,
            inputs: Vec::new(),
            outputs: Vec::new(),
            stats: Value::Null,
        }
    }

    pub fn input(mut self, path: &Path) -> Self {
        self.inputs.push(display(path));
        self
    }

    pub fn output(mut self, path: &Path) -> Self {
        self.outputs.push(display(path));
        self
    }

    pub fn stats(mut self, stats: Value) -> Self {
        self.stats = stats;
        self
    }
}

#[derive(Serialize)]
struct Callsite {
    file: &'static str,
    line: u32,
}

#[derive(Serialize)]
struct Sidecar {
    code_rev: String,
    ortho_version: &'static str,
    callsite: Callsite,
    params: Value,
    inputs: Vec<String>,
    /// The artifact itself comes first.
    outputs: Vec<String>,
    stats: Value,
}

fn display(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

/// `out/buildings.geojson` → `out/buildings.provenance.json`.
fn sidecar_path(artifact: &Path) -> PathBuf {
    artifact.with_extension("provenance.json")
}

/// Write the sidecar for `artifact` and return its path.
#[track_caller]
pub fn write_sidecar(artifact: &Path, payload: Payload) -> Result<PathBuf> {
    let caller = Location::caller();
    let sidecar = Sidecar {
        code_rev: code_rev(),
        ortho_version: ortho::VERSION,
        callsite: Callsite {
            file: caller.file(),
            line: caller.line(),
        },
        params: payload.params,
        inputs: payload.inputs,
        outputs: std::iter::once(display(artifact))
            .chain(payload.outputs)
            .collect(),
        stats: payload.stats,
    };
    let path = sidecar_path(artifact);
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
    }
    let bytes = serde_json::to_vec_pretty(&sidecar)?;
    fs::write(&path, bytes).with_context(|| format!("writing {}", path.display()))?;
    tracing::debug!(path = %path.display(), "provenance_written");
    Ok(path)
}

/// Revision of the code that produced an artifact.
///
/// `ORTHO_CODE_REV` (build time, then run time) wins over `git rev-parse`;
/// `unknown` outside a checkout.
pub fn code_rev() -> String {
    let pinned = option_env!("ORTHO_CODE_REV")
        .map(str::to_owned)
        .or_else(|| std::env::var("ORTHO_CODE_REV").ok())
        .filter(|rev| !rev.is_empty());
    pinned
        .or_else(|| {
            let out = Command::new("git").args(["rev-parse", "HEAD"]).output().ok()?;
            out.status.success().then_some(())?;
            let rev = String::from_utf8(out.stdout).ok()?;
            Some(rev.trim().to_owned())
        })
        .unwrap_or_else(|| "unknown".to_owned())
}
