use std::path::{Path, PathBuf};

use tracing::{debug, trace};

use crate::error::DetectError;
use crate::license::spdx::recognize;

/// Something that can tell which license governs a directory.
pub trait LicenseDetector {
    /// Return the license type of `dir`, or why none could be determined.
    fn detect(&self, dir: &Path) -> Result<String, DetectError>;
}

const PRIMARY_STEMS: &[&str] = &["license", "licence", "copying", "unlicense"];
const PRIMARY_EXTENSIONS: &[&str] = &["", ".txt", ".md", ".rst", ".code"];
const VARIANT_PREFIXES: &[&str] = &["license-", "license_", "licence-", "copying-"];

/// Detects licenses by reading well-known license files from disk.
#[derive(Debug, Default, Clone, Copy)]
pub struct FsLicenseDetector;

impl FsLicenseDetector {
    pub fn new() -> Self {
        Self
    }
}

impl LicenseDetector for FsLicenseDetector {
    fn detect(&self, dir: &Path) -> Result<String, DetectError> {
        let io_err = |source| DetectError::Io {
            path: dir.to_path_buf(),
            source,
        };

        let mut primary: Vec<PathBuf> = Vec::new();
        let mut variants: Vec<PathBuf> = Vec::new();

        for entry in std::fs::read_dir(dir).map_err(io_err)? {
            let entry = entry.map_err(io_err)?;
            let name = entry.file_name().to_string_lossy().to_lowercase();
            let is_primary = is_primary_name(&name);
            let is_variant = !is_primary && VARIANT_PREFIXES.iter().any(|p| name.starts_with(p));
            if !is_primary && !is_variant {
                continue;
            }
            // Follows symlinks so a linked LICENSE still counts.
            if !entry.path().is_file() {
                continue;
            }
            if is_primary {
                primary.push(entry.path());
            } else {
                variants.push(entry.path());
            }
        }

        match primary.len() {
            0 => {}
            1 => {
                let text = read_license(&primary[0])?;
                return recognize(&text)
                    .map(str::to_string)
                    .ok_or(DetectError::UnrecognizedLicense);
            }
            _ => {
                primary.sort();
                return Err(DetectError::MultipleLicenseFiles(
                    primary.iter().map(|p| file_name(p)).collect(),
                ));
            }
        }

        if variants.is_empty() {
            trace!(dir = %dir.display(), "no license file");
            return Err(DetectError::NoLicenseFile);
        }

        variants.sort();
        for path in &variants {
            let text = read_license(path)?;
            if let Some(id) = recognize(&text) {
                debug!(file = %path.display(), license = id, "recognized license variant file");
                return Ok(id.to_string());
            }
        }

        Err(DetectError::UnrecognizedLicense)
    }
}

fn is_primary_name(lower: &str) -> bool {
    PRIMARY_STEMS.iter().any(|stem| {
        lower
            .strip_prefix(stem)
            .is_some_and(|rest| PRIMARY_EXTENSIONS.contains(&rest))
    })
}

fn read_license(path: &Path) -> Result<String, DetectError> {
    let bytes = std::fs::read(path).map_err(|source| DetectError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}
