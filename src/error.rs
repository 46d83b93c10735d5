use std::path::PathBuf;

use thiserror::Error;

/// Failure reported by a [`LicenseDetector`](crate::license::detect::LicenseDetector).
///
/// `NoLicenseFile` and `UnrecognizedLicense` are inconclusive results that the
/// classifier handles; every other variant is a hard failure for the checked
/// directory.
#[derive(Debug, Error)]
pub enum DetectError {
    #[error("no license file found")]
    NoLicenseFile,

    #[error("license type could not be recognized")]
    UnrecognizedLicense,

    #[error("multiple license files found: {}", .0.join(", "))]
    MultipleLicenseFiles(Vec<String>),

    #[error("failed to read {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{0}")]
    Other(String),
}

/// A hard detector failure, tagged with the dependency it was classifying.
#[derive(Debug, Error)]
#[error("could not determine license for: {import_id}")]
pub struct ClassifyError {
    pub import_id: String,
    #[source]
    pub source: DetectError,
}
