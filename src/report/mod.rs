//! Report renderers for classification results.
//!
//! - [`terminal`] — colored, tabular output with summary box; respects `--verbose` / `--quiet`.
//! - JSON output is plain `serde_json` over [`Dependency`](crate::models::Dependency)
//!   and lives in `main`.

pub mod terminal;
