use std::collections::HashSet;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::debug;

use crate::error::{ClassifyError, DetectError};
use crate::license::UNKNOWN_LICENSE;
use crate::models::LicenseStatus;
use crate::paths::absolutize;

/// Root configuration structure, deserialized from `.license-scout.toml`.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    /// Extra directories that bound the ancestor walk. Relative entries are
    /// resolved against the directory holding the config file.
    #[serde(default)]
    pub roots: Vec<PathBuf>,
    /// License policy rules.
    #[serde(default)]
    pub policy: PolicyConfig,
}

/// The three policy lists. Only membership matters, so duplicates are harmless.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct PolicyConfig {
    /// License types treated as acceptable.
    #[serde(default)]
    pub whitelist: HashSet<String>,
    /// License types treated as forbidden. Wins over everything else.
    #[serde(default)]
    pub blacklist: HashSet<String>,
    /// Import identifiers allowed regardless of their detected license.
    #[serde(default)]
    pub exceptions: HashSet<String>,
}

impl PolicyConfig {
    /// Built-in policy used when no config file is found.
    ///
    /// Permissive licenses are whitelisted and strong-copyleft licenses (GPL,
    /// AGPL) are blacklisted; everything else is marginal.
    pub fn builtin() -> Self {
        let whitelist = [
            "MIT",
            "Apache-2.0",
            "BSD-2-Clause",
            "BSD-3-Clause",
            "ISC",
            "Unlicense",
        ];
        let blacklist = ["GPL-2.0", "GPL-3.0", "AGPL-3.0"];

        PolicyConfig {
            whitelist: whitelist.iter().map(|s| s.to_string()).collect(),
            blacklist: blacklist.iter().map(|s| s.to_string()).collect(),
            exceptions: HashSet::new(),
        }
    }
}

/// Load the configuration, searching in order:
///
/// 1. `config_override` — path passed via `--config`
/// 2. `<project_path>/.license-scout.toml`
/// 3. `~/.config/license-scout/config.toml`
/// 4. Built-in defaults ([`PolicyConfig::builtin`], no extra roots)
pub fn load_config(project_path: &Path, config_override: Option<&Path>) -> Result<Config> {
    if let Some(path) = config_override {
        return read_config(path);
    }

    let project_config = project_path.join(".license-scout.toml");
    if project_config.exists() {
        return read_config(&project_config);
    }

    if let Some(home) = dirs::home_dir() {
        let home_config = home
            .join(".config")
            .join("license-scout")
            .join("config.toml");
        if home_config.exists() {
            return read_config(&home_config);
        }
    }

    debug!("no config file found, using built-in policy");
    Ok(Config {
        roots: Vec::new(),
        policy: PolicyConfig::builtin(),
    })
}

fn read_config(path: &Path) -> Result<Config> {
    debug!(path = %path.display(), "loading config");
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    let mut config: Config = toml::from_str(&content)
        .with_context(|| format!("failed to parse config {}", path.display()))?;

    let base = std::path::absolute(path)
        .with_context(|| format!("failed to resolve {}", path.display()))?;
    let base = base.parent().unwrap_or(Path::new("/"));
    config.roots = config.roots.iter().map(|r| absolutize(base, r)).collect();
    Ok(config)
}

/// Verdict of the policy for a single directory.
#[derive(Debug)]
pub struct PolicyOutcome {
    pub status: LicenseStatus,
    pub license_type: String,
    pub error: Option<ClassifyError>,
}

impl PolicyOutcome {
    fn new(status: LicenseStatus, license_type: impl Into<String>) -> Self {
        PolicyOutcome {
            status,
            license_type: license_type.into(),
            error: None,
        }
    }
}

/// Apply the policy to what a detector reported for `import_id`.
///
/// For a detected type the precedence is blacklist, whitelist, exceptions,
/// then marginal. A missing or unrecognized license file can only be
/// overridden by an exception. Any other detector failure is wrapped into a
/// [`ClassifyError`] with status [`LicenseStatus::Unknown`].
pub fn apply_policy(
    policy: &PolicyConfig,
    detected: Result<String, DetectError>,
    import_id: &str,
) -> PolicyOutcome {
    let excepted = policy.exceptions.contains(import_id);

    let license_type = match detected {
        Ok(license_type) => license_type,
        Err(DetectError::NoLicenseFile) if excepted => {
            return PolicyOutcome::new(LicenseStatus::Allowed, UNKNOWN_LICENSE)
        }
        Err(DetectError::NoLicenseFile) => {
            return PolicyOutcome::new(LicenseStatus::NoLicense, UNKNOWN_LICENSE)
        }
        Err(DetectError::UnrecognizedLicense) if excepted => {
            return PolicyOutcome::new(LicenseStatus::Allowed, UNKNOWN_LICENSE)
        }
        Err(DetectError::UnrecognizedLicense) => {
            return PolicyOutcome::new(LicenseStatus::Unknown, UNKNOWN_LICENSE)
        }
        Err(source) => {
            return PolicyOutcome {
                status: LicenseStatus::Unknown,
                license_type: UNKNOWN_LICENSE.to_string(),
                error: Some(ClassifyError {
                    import_id: import_id.to_string(),
                    source,
                }),
            }
        }
    };

    let status = if policy.blacklist.contains(&license_type) {
        LicenseStatus::Banned
    } else if policy.whitelist.contains(&license_type) || excepted {
        LicenseStatus::Allowed
    } else {
        LicenseStatus::Marginal
    };

    PolicyOutcome::new(status, license_type)
}
