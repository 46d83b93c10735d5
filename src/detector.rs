use std::path::Path;

use crate::models::Ecosystem;

/// Auto-detect which vendoring layouts a project uses.
pub fn detect_ecosystems(path: &Path) -> Vec<Ecosystem> {
    let mut ecosystems = Vec::new();
    let vendor = path.join("vendor");

    if vendor.join("modules.txt").is_file() {
        ecosystems.push(Ecosystem::Go);
    }

    if path.join("Cargo.toml").is_file() && vendor.is_dir() {
        ecosystems.push(Ecosystem::Rust);
    }

    if path.join("node_modules").is_dir() {
        ecosystems.push(Ecosystem::Node);
    }

    ecosystems
}
