//! Providers for the directories that bound the ancestor walk.

use std::ffi::OsStr;
use std::path::PathBuf;

use anyhow::{bail, Result};
use tracing::warn;

/// Environment variable read by [`EnvRoots::default`].
pub const ROOTS_ENV: &str = "LICENSE_SCOUT_ROOTS";

/// Supplies the workspace root boundaries.
pub trait WorkspaceRoots {
    fn roots(&self) -> Result<Vec<PathBuf>>;
}

/// A fixed list of roots.
#[derive(Debug, Default, Clone)]
pub struct StaticRoots(pub Vec<PathBuf>);

impl WorkspaceRoots for StaticRoots {
    fn roots(&self) -> Result<Vec<PathBuf>> {
        Ok(self.0.clone())
    }
}

/// Roots listed in a path-list environment variable, separated like `PATH`.
#[derive(Debug, Clone)]
pub struct EnvRoots {
    pub var: String,
    /// Joined onto every entry, e.g. `src` for `GOPATH`.
    pub subdir: Option<PathBuf>,
}

impl Default for EnvRoots {
    fn default() -> Self {
        EnvRoots {
            var: ROOTS_ENV.to_string(),
            subdir: None,
        }
    }
}

impl EnvRoots {
    /// The `src` directory of every `GOPATH` workspace. Packages fetched into
    /// a GOPATH never inherit a license from above their own import path.
    pub fn gopath() -> Self {
        EnvRoots {
            var: "GOPATH".to_string(),
            subdir: Some(PathBuf::from("src")),
        }
    }

    /// Parse a path list. Empty entries are skipped; relative entries are rejected.
    pub fn parse(&self, value: &OsStr) -> Result<Vec<PathBuf>> {
        let mut roots = Vec::new();
        for entry in std::env::split_paths(value) {
            if entry.as_os_str().is_empty() {
                continue;
            }
            if entry.is_relative() {
                bail!("{} entry {} is not an absolute path", self.var, entry.display());
            }
            match &self.subdir {
                Some(subdir) => roots.push(entry.join(subdir)),
                None => roots.push(entry),
            }
        }
        Ok(roots)
    }
}

impl WorkspaceRoots for EnvRoots {
    fn roots(&self) -> Result<Vec<PathBuf>> {
        match std::env::var_os(&self.var) {
            Some(value) => self.parse(&value),
            None => Ok(Vec::new()),
        }
    }
}

/// Union of several providers. A failing provider is logged and skipped.
#[derive(Default)]
pub struct RootSet {
    providers: Vec<Box<dyn WorkspaceRoots + Send + Sync>>,
}

impl RootSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, provider: impl WorkspaceRoots + Send + Sync + 'static) -> Self {
        self.providers.push(Box::new(provider));
        self
    }
}

impl WorkspaceRoots for RootSet {
    fn roots(&self) -> Result<Vec<PathBuf>> {
        let mut all = Vec::new();
        for provider in &self.providers {
            match provider.roots() {
                Ok(roots) => all.extend(roots),
                Err(e) => warn!("ignoring workspace roots provider: {e:#}"),
            }
        }
        Ok(all)
    }
}
