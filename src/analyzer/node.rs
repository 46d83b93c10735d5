use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde_json::Value;
use tracing::warn;

use crate::models::{Dependency, Ecosystem};

/// Reads the top-level packages installed in `node_modules`.
pub struct NodeAnalyzer;

impl NodeAnalyzer {
    pub fn new() -> Self {
        Self
    }
}

impl super::Analyzer for NodeAnalyzer {
    fn analyze(&self, path: &Path) -> Result<Vec<Dependency>> {
        let modules = path.join("node_modules");
        if !modules.is_dir() {
            return Ok(Vec::new());
        }

        let mut deps = Vec::new();
        for dir in package_dirs(&modules)? {
            let manifest = dir.join("package.json");
            let content = std::fs::read_to_string(&manifest)
                .with_context(|| format!("failed to read {}", manifest.display()))?;
            let json: Value = match serde_json::from_str(&content) {
                Ok(json) => json,
                Err(e) => {
                    warn!("skipping {}: {e}", manifest.display());
                    continue;
                }
            };

            let name = json
                .get("name")
                .and_then(|n| n.as_str())
                .map(str::to_string)
                .unwrap_or_else(|| fallback_name(&modules, &dir));
            let version = json
                .get("version")
                .and_then(|v| v.as_str())
                .map(str::to_string);

            deps.push(Dependency::new(name, version, Ecosystem::Node, dir));
        }

        Ok(super::dedup_by_name(deps))
    }
}

/// Package directories directly under `node_modules`, descending one level
/// into `@scope` directories. Dot-directories such as `.bin` are skipped.
fn package_dirs(modules: &Path) -> Result<Vec<PathBuf>> {
    let mut out = Vec::new();
    for entry in sorted_subdirs(modules)? {
        let name = entry
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        if name.starts_with('.') {
            continue;
        }
        if name.starts_with('@') {
            out.extend(
                sorted_subdirs(&entry)?
                    .into_iter()
                    .filter(|p| p.join("package.json").is_file()),
            );
        } else if entry.join("package.json").is_file() {
            out.push(entry);
        }
    }
    Ok(out)
}

fn sorted_subdirs(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut dirs: Vec<PathBuf> = std::fs::read_dir(dir)
        .with_context(|| format!("failed to list {}", dir.display()))?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.is_dir())
        .collect();
    dirs.sort();
    Ok(dirs)
}

fn fallback_name(modules: &Path, dir: &Path) -> String {
    dir.strip_prefix(modules)
        .unwrap_or(dir)
        .to_string_lossy()
        .replace('\\', "/")
}
