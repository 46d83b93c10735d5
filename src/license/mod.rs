//! Locating and classifying the license that governs a dependency directory.
//!
//! - [`detect`] — the [`LicenseDetector`](detect::LicenseDetector) seam and its
//!   filesystem implementation.
//! - [`spdx`] — recognizes license text and maps it to an SPDX-style identifier.
//! - [`classifier`] — the ancestor walk, vendored-path reconstruction, and the
//!   entry point that ties them to the policy.

pub mod classifier;
pub mod detect;
pub mod spdx;

/// License type reported when none could be detected.
pub const UNKNOWN_LICENSE: &str = "Unknown";
