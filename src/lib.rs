//! `license-scout` — find the license that governs each vendored dependency and
//! judge it against a whitelist / blacklist / exceptions policy.
//!
//! The heart of the crate is [`license::classifier::Classifier`]: starting from
//! a dependency's directory it walks up through its ancestors (never past a
//! workspace root), asks a [`license::detect::LicenseDetector`] what it finds
//! at each step, reverses flattened `vendor/` layouts, and applies
//! [`config::apply_policy`] to the first conclusive answer.
//!
//! ```no_run
//! use std::path::Path;
//! use license_scout::config::PolicyConfig;
//! use license_scout::license::classifier::Classifier;
//! use license_scout::license::detect::FsLicenseDetector;
//! use license_scout::roots::StaticRoots;
//!
//! let roots = StaticRoots(vec!["/src/project".into()]);
//! let classifier = Classifier::new(PolicyConfig::builtin(), FsLicenseDetector::new(), &roots);
//! let result = classifier.classify(
//!     Path::new("/src/project/vendor/github.com/acme/widget"),
//!     "github.com/acme/widget",
//! );
//! println!("{} ({})", result.status, result.license_type);
//! ```

pub mod analyzer;
pub mod cli;
pub mod config;
pub mod detector;
pub mod error;
pub mod license;
pub mod models;
pub mod paths;
pub mod report;
pub mod roots;
