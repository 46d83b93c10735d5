use std::path::PathBuf;

use serde::Serialize;

use crate::error::ClassifyError;

/// A vendored dependency discovered by an [`Analyzer`](crate::analyzer::Analyzer),
/// with the classification filled in once it has been scanned.
#[derive(Debug, Clone, Serialize)]
pub struct Dependency {
    /// Ecosystem-specific import identifier (Go package path, crate name, npm name).
    pub name: String,
    pub version: Option<String>,
    pub ecosystem: Ecosystem,
    /// Directory the dependency's sources live in.
    pub dir: PathBuf,
    pub status: LicenseStatus,
    pub license_type: String,
    /// Directory the verdict was produced at.
    pub license_dir: Option<PathBuf>,
    pub error: Option<String>,
}

impl Dependency {
    pub fn new(name: String, version: Option<String>, ecosystem: Ecosystem, dir: PathBuf) -> Self {
        Dependency {
            name,
            version,
            ecosystem,
            dir,
            status: LicenseStatus::NoLicense,
            license_type: crate::license::UNKNOWN_LICENSE.to_string(),
            license_dir: None,
            error: None,
        }
    }

    /// Record the outcome of a classification on this dependency.
    pub fn apply(&mut self, classification: Classification) {
        self.status = classification.status;
        self.license_type = classification.license_type;
        self.license_dir = Some(classification.path);
        self.error = classification
            .error
            .map(|e| format!("{:#}", anyhow::Error::new(e)));
    }
}

/// Outcome of classifying one directory tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LicenseStatus {
    /// Nothing found; the only status that lets the ancestor walk continue.
    NoLicense,
    Allowed,
    Banned,
    /// A license file exists but its type could not be recognized.
    Unknown,
    /// Recognized, but neither whitelisted nor blacklisted.
    Marginal,
}

impl LicenseStatus {
    /// Statuses that make the run exit non-zero.
    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            LicenseStatus::Banned | LicenseStatus::Unknown | LicenseStatus::NoLicense
        )
    }
}

impl std::fmt::Display for LicenseStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LicenseStatus::NoLicense => write!(f, "no license"),
            LicenseStatus::Allowed => write!(f, "allowed"),
            LicenseStatus::Banned => write!(f, "banned"),
            LicenseStatus::Unknown => write!(f, "unknown"),
            LicenseStatus::Marginal => write!(f, "marginal"),
        }
    }
}

/// Result of [`Classifier::classify`](crate::license::classifier::Classifier::classify).
#[derive(Debug)]
pub struct Classification {
    pub status: LicenseStatus,
    /// Directory the verdict was produced at, or the starting directory when
    /// nothing was found.
    pub path: PathBuf,
    pub license_type: String,
    pub error: Option<ClassifyError>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Ecosystem {
    Go,
    Rust,
    Node,
}

impl std::fmt::Display for Ecosystem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Ecosystem::Go => write!(f, "Go"),
            Ecosystem::Rust => write!(f, "Rust"),
            Ecosystem::Node => write!(f, "Node"),
        }
    }
}
