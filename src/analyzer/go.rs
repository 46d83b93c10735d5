use std::path::Path;

use anyhow::{Context, Result};

use crate::models::{Dependency, Ecosystem};

/// Reads the package list `go mod vendor` writes to `vendor/modules.txt`.
pub struct GoAnalyzer;

impl GoAnalyzer {
    pub fn new() -> Self {
        Self
    }
}

impl super::Analyzer for GoAnalyzer {
    fn analyze(&self, path: &Path) -> Result<Vec<Dependency>> {
        let vendor = path.join("vendor");
        let modules = vendor.join("modules.txt");
        if !modules.exists() {
            return Ok(Vec::new());
        }

        let content = std::fs::read_to_string(&modules)
            .with_context(|| format!("failed to read {}", modules.display()))?;

        let deps = parse_modules_txt(&content)
            .into_iter()
            .map(|(package, version)| {
                let dir = package
                    .split('/')
                    .fold(vendor.clone(), |dir, segment| dir.join(segment));
                Dependency::new(package, version, Ecosystem::Go, dir)
            })
            .collect();

        Ok(super::dedup_by_name(deps))
    }
}

/// Parse `modules.txt` into `(package, module version)` pairs.
///
/// `# <module> <version>` lines open a module (a `=>` replacement keeps the
/// original version), `## ...` lines are annotations, and every other
/// non-empty line is a package path belonging to the current module.
fn parse_modules_txt(content: &str) -> Vec<(String, Option<String>)> {
    let mut packages = Vec::new();
    let mut version: Option<String> = None;

    for line in content.lines().map(str::trim) {
        if line.is_empty() || line.starts_with("##") {
            continue;
        }
        if let Some(header) = line.strip_prefix('#') {
            version = header
                .split_whitespace()
                .nth(1)
                .filter(|v| *v != "=>")
                .map(str::to_string);
            continue;
        }
        packages.push((line.to_string(), version.clone()));
    }

    packages
}
