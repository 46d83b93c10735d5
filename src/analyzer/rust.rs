use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::warn;

use crate::models::{Dependency, Ecosystem};

#[derive(Debug, Deserialize)]
struct CargoManifest {
    package: Option<CargoPackage>,
}

#[derive(Debug, Deserialize)]
struct CargoPackage {
    name: String,
    /// Normally a string; vendored manifests are normalized, but stay lenient.
    version: Option<toml::Value>,
}

/// Reads crates laid out by `cargo vendor` under `vendor/<crate>`.
pub struct RustAnalyzer;

impl RustAnalyzer {
    pub fn new() -> Self {
        Self
    }
}

impl super::Analyzer for RustAnalyzer {
    fn analyze(&self, path: &Path) -> Result<Vec<Dependency>> {
        let vendor = path.join("vendor");
        if !vendor.is_dir() {
            return Ok(Vec::new());
        }

        let mut dirs: Vec<_> = std::fs::read_dir(&vendor)
            .with_context(|| format!("failed to list {}", vendor.display()))?
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| p.join("Cargo.toml").is_file())
            .collect();
        dirs.sort();

        let mut deps = Vec::new();
        for dir in dirs {
            let manifest = dir.join("Cargo.toml");
            let content = std::fs::read_to_string(&manifest)
                .with_context(|| format!("failed to read {}", manifest.display()))?;

            let parsed: CargoManifest = match toml::from_str(&content) {
                Ok(parsed) => parsed,
                Err(e) => {
                    warn!("skipping {}: {e}", manifest.display());
                    continue;
                }
            };

            // Virtual manifests have no package.
            let Some(package) = parsed.package else {
                continue;
            };
            let version = package
                .version
                .as_ref()
                .and_then(|v| v.as_str())
                .map(str::to_string);

            deps.push(Dependency::new(package.name, version, Ecosystem::Rust, dir));
        }

        Ok(super::dedup_by_name(deps))
    }
}
