use anyhow::{Context, Result};
use serde_json::{json, Value};
use std::ffi::OsString;
use std::fs;
use std::panic::Location;
use std::path::{Path, PathBuf};
use std::process::Command;

/// What produced a solution file.
pub struct Payload {
    pub instance: String,
    pub seed: u64,
    /// Search configuration and sizes along the pipeline.
    pub params: Value,
}

/// Write `<solution>.provenance.json` next to a solution file.
#[track_caller]
pub fn write_sidecar<P: AsRef<Path>>(solution: P, payload: Payload) -> Result<PathBuf> {
    let solution = solution.as_ref();
    let provenance_path = provenance_path(solution);
    if let Some(parent) = provenance_path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating provenance dir {}", parent.display()))?;
        }
    }

    let callsite = Location::caller();
    let doc = json!({
        "code_rev": current_git_rev(),
        "version": polycover::VERSION,
        "callsite": {
            "file": callsite.file(),
            "line": callsite.line()
        },
        "instance": payload.instance,
        "seed": payload.seed,
        "params": payload.params,
        "outputs": [solution.to_string_lossy()]
    });
    fs::write(&provenance_path, serde_json::to_vec_pretty(&doc)?)
        .with_context(|| format!("writing {}", provenance_path.display()))?;
    Ok(provenance_path)
}

/// `square.solution.json` -> `square.solution.provenance.json`
fn provenance_path(solution: &Path) -> PathBuf {
    let stem = solution
        .file_stem()
        .map(|s| s.to_os_string())
        .unwrap_or_else(|| OsString::from("solution"));
    let mut name = stem;
    name.push(".provenance.json");
    solution.with_file_name(name)
}

pub fn current_git_rev() -> String {
    if let Some(from_env) = option_env!("GIT_COMMIT") {
        if !from_env.is_empty() {
            return from_env.to_string();
        }
    }
    if let Ok(env_override) = std::env::var("GIT_COMMIT") {
        if !env_override.is_empty() {
            return env_override;
        }
    }
    Command::new("git")
        .args(["rev-parse", "HEAD"])
        .output()
        .ok()
        .filter(|output| output.status.success())
        .and_then(|output| String::from_utf8(output.stdout).ok())
        .map(|s| s.trim().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}
