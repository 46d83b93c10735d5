use std::collections::HashSet;
use std::path::Path;

use anyhow::Result;

use crate::models::Dependency;

pub mod go;
pub mod node;
pub mod rust;

/// Enumerates the vendored dependencies of one ecosystem in a project.
pub trait Analyzer {
    fn analyze(&self, path: &Path) -> Result<Vec<Dependency>>;
}

/// Drop later duplicates of the same import identifier, keeping order.
fn dedup_by_name(deps: Vec<Dependency>) -> Vec<Dependency> {
    let mut seen: HashSet<String> = HashSet::new();
    deps.into_iter()
        .filter(|d| seen.insert(d.name.clone()))
        .collect()
}
