use std::collections::HashSet;
use std::path::{Path, PathBuf};

use tracing::{debug, trace, warn};

use crate::config::{apply_policy, PolicyConfig, PolicyOutcome};
use crate::license::detect::LicenseDetector;
use crate::license::UNKNOWN_LICENSE;
use crate::models::{Classification, LicenseStatus};
use crate::paths::{ancestor, base_name, clean};
use crate::roots::WorkspaceRoots;

/// Upper bound on how many directories the walk visits, starting directory included.
pub const MAX_PARENT_HOPS: usize = 10;

/// Name of the directory that marks a flattened vendoring layout.
pub const VENDOR_DIR: &str = "vendor";

/// Resolves the license of a dependency by walking up from its directory.
///
/// Holds the policy, the detector and the workspace roots resolved at
/// construction; classification itself keeps no state, so one classifier can
/// serve many threads.
pub struct Classifier<D> {
    policy: PolicyConfig,
    detector: D,
    roots: HashSet<PathBuf>,
}

impl<D: LicenseDetector> Classifier<D> {
    /// Build a classifier. A failing roots provider yields no boundaries
    /// rather than an error.
    pub fn new(policy: PolicyConfig, detector: D, roots: &dyn WorkspaceRoots) -> Self {
        let roots = roots.roots().unwrap_or_else(|e| {
            warn!("could not resolve workspace roots, walking without boundaries: {e:#}");
            Vec::new()
        });

        Classifier {
            policy,
            detector,
            roots: roots.iter().map(|r| clean(r)).collect(),
        }
    }

    /// Classify the dependency `import_id` living in `start`.
    ///
    /// Visits `start` and up to `MAX_PARENT_HOPS - 1` ancestors, stopping before
    /// any workspace root or once the filesystem root has been visited. At each
    /// directory the policy is applied; when that is inconclusive the
    /// vendored-path candidate (if any) is tried as well. A verdict found through
    /// a vendored candidate is reported against the ancestor that led to it.
    pub fn classify(&self, start: &Path, import_id: &str) -> Classification {
        let mut previous: Option<PathBuf> = None;

        for hop in 0..MAX_PARENT_HOPS {
            let dir = ancestor(start, hop);
            if previous.as_ref() == Some(&dir) {
                trace!(import_id, dir = %dir.display(), hop, "no further ancestors");
                break;
            }
            if self.roots.contains(&dir) {
                debug!(import_id, dir = %dir.display(), hop, "reached workspace root");
                break;
            }

            trace!(import_id, dir = %dir.display(), hop, "checking");
            let outcome = self.evaluate_directory(&dir, import_id);
            if outcome.status != LicenseStatus::NoLicense {
                return conclude(outcome, dir);
            }

            if let Some(candidate) = vendor_candidate(&dir) {
                debug!(import_id, candidate = %candidate.display(), "checking vendored path");
                let outcome = self.evaluate_directory(&candidate, import_id);
                if outcome.status != LicenseStatus::NoLicense {
                    return conclude(outcome, dir);
                }
            }

            previous = Some(dir);
        }

        Classification {
            status: LicenseStatus::NoLicense,
            path: start.to_path_buf(),
            license_type: UNKNOWN_LICENSE.to_string(),
            error: None,
        }
    }

    /// Run the detector on `dir` and apply the policy to its answer.
    pub fn evaluate_directory(&self, dir: &Path, import_id: &str) -> PolicyOutcome {
        apply_policy(&self.policy, self.detector.detect(dir), import_id)
    }
}

fn conclude(outcome: PolicyOutcome, path: PathBuf) -> Classification {
    Classification {
        status: outcome.status,
        path,
        license_type: outcome.license_type,
        error: outcome.error,
    }
}

/// Candidate directories for a dependency whose path was flattened by a
/// vendoring tool, in the order they are tried.
///
/// Applies only when the directory three levels above `path` is named
/// `vendor`. With `repo`, `a` and `b` being the base names two levels up, one
/// level up and of `path` itself, the flattened names are `repo_a` and
/// `repo_a_b`, tried first inside `path` and then inside its parent.
pub fn vendor_candidates(path: &Path) -> Option<[PathBuf; 4]> {
    if base_name(&ancestor(path, 3)) != VENDOR_DIR {
        return None;
    }

    let repo = base_name(&ancestor(path, 2));
    let segment_a = base_name(&ancestor(path, 1));
    let segment_b = base_name(path);

    let short = format!("{repo}_{segment_a}");
    let long = format!("{short}_{segment_b}");
    let here = clean(path);
    let parent = ancestor(path, 1);

    Some([
        here.join(&short),
        here.join(&long),
        parent.join(&short),
        parent.join(&long),
    ])
}

/// The first vendored-path candidate that exists on disk.
pub fn vendor_candidate(path: &Path) -> Option<PathBuf> {
    vendor_candidates(path)?
        .into_iter()
        .find(|candidate| candidate.exists())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    use crate::error::DetectError;
    use crate::roots::StaticRoots;

    #[derive(Clone, Copy)]
    enum Fake {
        License(&'static str),
        Unrecognized,
        Broken,
    }

    /// Answers from a fixed table (anything else has no license file) and
    /// records every directory it was asked about.
    #[derive(Default)]
    struct FakeDetector {
        answers: HashMap<PathBuf, Fake>,
        visited: Mutex<Vec<PathBuf>>,
    }

    impl FakeDetector {
        fn with(mut self, dir: impl Into<PathBuf>, answer: Fake) -> Self {
            self.answers.insert(dir.into(), answer);
            self
        }

        fn visited(&self) -> Vec<PathBuf> {
            self.visited.lock().unwrap().clone()
        }
    }

    impl LicenseDetector for FakeDetector {
        fn detect(&self, dir: &Path) -> Result<String, DetectError> {
            self.visited.lock().unwrap().push(dir.to_path_buf());
            match self.answers.get(dir) {
                Some(Fake::License(id)) => Ok(id.to_string()),
                Some(Fake::Unrecognized) => Err(DetectError::UnrecognizedLicense),
                Some(Fake::Broken) => Err(DetectError::Other("broken".into())),
                None => Err(DetectError::NoLicenseFile),
            }
        }
    }

    struct FailingRoots;

    impl WorkspaceRoots for FailingRoots {
        fn roots(&self) -> anyhow::Result<Vec<PathBuf>> {
            anyhow::bail!("GOPATH unavailable")
        }
    }

    fn policy() -> PolicyConfig {
        PolicyConfig {
            whitelist: ["MIT".to_string()].into(),
            blacklist: ["GPL-3.0".to_string()].into(),
            exceptions: ["example.com/lib".to_string()].into(),
        }
    }

    fn classifier(detector: FakeDetector, roots: &[&str]) -> Classifier<FakeDetector> {
        let roots = StaticRoots(roots.iter().map(PathBuf::from).collect());
        Classifier::new(policy(), detector, &roots)
    }

    #[test]
    fn test_license_in_start_directory() {
        let c = classifier(FakeDetector::default().with("/ws/dep", Fake::License("MIT")), &["/ws"]);
        let result = c.classify(Path::new("/ws/dep"), "example.org/dep");
        assert_eq!(result.status, LicenseStatus::Allowed);
        assert_eq!(result.path, PathBuf::from("/ws/dep"));
        assert_eq!(result.license_type, "MIT");
        assert_eq!(c.detector.visited(), vec![PathBuf::from("/ws/dep")]);
    }

    #[test]
    fn test_license_found_in_ancestor() {
        let c = classifier(
            FakeDetector::default().with("/ws/mod", Fake::License("MPL-2.0")),
            &["/ws"],
        );
        let result = c.classify(Path::new("/ws/mod/sub/pkg"), "example.org/mod/sub/pkg");
        assert_eq!(result.status, LicenseStatus::Marginal);
        assert_eq!(result.path, PathBuf::from("/ws/mod"));
        assert_eq!(result.license_type, "MPL-2.0");
    }

    #[test]
    fn test_stops_before_workspace_root() {
        // the root itself has a license but must never be checked
        let c = classifier(
            FakeDetector::default().with("/ws", Fake::License("MIT")),
            &["/ws"],
        );
        let result = c.classify(Path::new("/ws/a/b"), "example.org/a/b");
        assert_eq!(result.status, LicenseStatus::NoLicense);
        assert_eq!(result.path, PathBuf::from("/ws/a/b"));
        assert_eq!(result.license_type, "Unknown");
        assert_eq!(
            c.detector.visited(),
            vec![PathBuf::from("/ws/a/b"), PathBuf::from("/ws/a")]
        );
    }

    #[test]
    fn test_start_at_root_checks_nothing() {
        let c = classifier(FakeDetector::default(), &["/ws/"]);
        let result = c.classify(Path::new("/ws"), "example.org/ws");
        assert_eq!(result.status, LicenseStatus::NoLicense);
        assert!(c.detector.visited().is_empty());
    }

    #[test]
    fn test_hop_ceiling() {
        let deep: PathBuf = (0..15).fold(PathBuf::from("/"), |p, i| p.join(format!("d{i}")));
        let c = classifier(FakeDetector::default().with("/", Fake::License("MIT")), &[]);
        let result = c.classify(&deep, "example.org/deep");

        assert_eq!(result.status, LicenseStatus::NoLicense);
        assert_eq!(result.path, deep);
        let visited = c.detector.visited();
        assert_eq!(visited.len(), MAX_PARENT_HOPS);
        assert_eq!(visited[0], deep);
        assert_eq!(visited[MAX_PARENT_HOPS - 1], ancestor(&deep, MAX_PARENT_HOPS - 1));
    }

    #[test]
    fn test_returns_original_start_path() {
        let c = classifier(FakeDetector::default(), &["/ws"]);
        let result = c.classify(Path::new("/ws/dep/sub/.."), "example.org/dep");
        assert_eq!(result.status, LicenseStatus::NoLicense);
        assert_eq!(result.path, PathBuf::from("/ws/dep/sub/.."));
        assert_ne!(result.path, PathBuf::from("/ws/dep"));
        assert_eq!(c.detector.visited(), vec![PathBuf::from("/ws/dep")]);
    }

    #[test]
    fn test_exception_without_license_is_allowed() {
        let c = classifier(FakeDetector::default(), &["/ws"]);
        let result = c.classify(Path::new("/ws/lib"), "example.com/lib");
        assert_eq!(result.status, LicenseStatus::Allowed);
        assert_eq!(result.path, PathBuf::from("/ws/lib"));
        assert_eq!(result.license_type, "Unknown");
    }

    #[test]
    fn test_blacklist_beats_exception() {
        let c = classifier(
            FakeDetector::default().with("/ws/lib", Fake::License("GPL-3.0")),
            &["/ws"],
        );
        let result = c.classify(Path::new("/ws/lib"), "example.com/lib");
        assert_eq!(result.status, LicenseStatus::Banned);
        assert_eq!(result.license_type, "GPL-3.0");
    }

    #[test]
    fn test_unrecognized_stops_walk() {
        let c = classifier(
            FakeDetector::default()
                .with("/ws/a/b", Fake::Unrecognized)
                .with("/ws/a", Fake::License("MIT")),
            &["/ws"],
        );
        let result = c.classify(Path::new("/ws/a/b"), "example.org/a/b");
        assert_eq!(result.status, LicenseStatus::Unknown);
        assert_eq!(result.path, PathBuf::from("/ws/a/b"));
        assert!(result.error.is_none());
    }

    #[test]
    fn test_detector_failure_is_reported() {
        let c = classifier(FakeDetector::default().with("/ws/a", Fake::Broken), &["/ws"]);
        let result = c.classify(Path::new("/ws/a"), "example.org/a");
        assert_eq!(result.status, LicenseStatus::Unknown);
        assert_eq!(result.license_type, "Unknown");
        let err = result.error.expect("hard failure should carry an error");
        assert_eq!(err.to_string(), "could not determine license for: example.org/a");
    }

    #[test]
    fn test_failing_roots_provider_means_no_boundary() {
        let detector = FakeDetector::default().with("/ws", Fake::License("MIT"));
        let c = Classifier::new(policy(), detector, &FailingRoots);
        let result = c.classify(Path::new("/ws/a"), "example.org/a");
        assert_eq!(result.status, LicenseStatus::Allowed);
        assert_eq!(result.path, PathBuf::from("/ws"));
    }

    #[test]
    fn test_vendor_candidates_order() {
        let candidates =
            vendor_candidates(Path::new("/ws/proj/vendor/github.com/acme/widget")).unwrap();
        assert_eq!(
            candidates,
            [
                PathBuf::from("/ws/proj/vendor/github.com/acme/widget/github.com_acme"),
                PathBuf::from("/ws/proj/vendor/github.com/acme/widget/github.com_acme_widget"),
                PathBuf::from("/ws/proj/vendor/github.com/acme/github.com_acme"),
                PathBuf::from("/ws/proj/vendor/github.com/acme/github.com_acme_widget"),
            ]
        );
    }

    #[test]
    fn test_vendor_candidates_require_vendor_dir() {
        assert!(vendor_candidates(Path::new("/ws/proj/third_party/github.com/acme/widget")).is_none());
        assert!(vendor_candidates(Path::new("/ws/vendor/github.com/acme")).is_none());
        assert!(vendor_candidates(Path::new("/a")).is_none());
        // no vendor dir, so nothing is checked even though the paths do not exist
        assert!(vendor_candidate(Path::new("/nonexistent/x/y/z/w")).is_none());
    }

    #[test]
    fn test_vendor_candidate_first_existing_wins() {
        let tmp = tempfile::tempdir().unwrap();
        let dep = tmp.path().join("vendor/github.com/acme/widget");
        std::fs::create_dir_all(&dep).unwrap();
        assert!(vendor_candidate(&dep).is_none());

        let long_here = dep.join("github.com_acme_widget");
        let short_parent = dep.parent().unwrap().join("github.com_acme");
        std::fs::create_dir_all(&long_here).unwrap();
        std::fs::create_dir_all(&short_parent).unwrap();
        assert_eq!(vendor_candidate(&dep), Some(long_here.clone()));

        let short_here = dep.join("github.com_acme");
        std::fs::create_dir_all(&short_here).unwrap();
        assert_eq!(vendor_candidate(&dep), Some(short_here));
    }

    #[test]
    fn test_classify_through_vendor_candidate() {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path().to_path_buf();
        let dep = root.join("vendor/github.com/acme/widget");
        let flattened = dep.join("github.com_acme_widget");
        std::fs::create_dir_all(&flattened).unwrap();

        let detector = FakeDetector::default().with(flattened.clone(), Fake::License("MIT"));
        let roots = StaticRoots(vec![root]);
        let c = Classifier::new(policy(), detector, &roots);

        let result = c.classify(&dep, "github.com/acme/widget");
        assert_eq!(result.status, LicenseStatus::Allowed);
        assert_eq!(result.path, dep);
        assert_eq!(result.license_type, "MIT");
        // the walk ends at the candidate; no ancestor of `dep` is visited
        assert_eq!(c.detector.visited(), vec![dep.clone(), flattened]);
    }

    #[test]
    fn test_failing_vendor_candidate_ends_walk() {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path().to_path_buf();
        let dep = root.join("vendor/github.com/acme/widget");
        let flattened = dep.parent().unwrap().join("github.com_acme");
        std::fs::create_dir_all(&dep).unwrap();
        std::fs::create_dir_all(&flattened).unwrap();

        let detector = FakeDetector::default()
            .with(flattened.clone(), Fake::Broken)
            .with(dep.parent().unwrap(), Fake::License("MIT"));
        let roots = StaticRoots(vec![root]);
        let c = Classifier::new(policy(), detector, &roots);

        let result = c.classify(&dep, "github.com/acme/widget");
        assert_eq!(result.status, LicenseStatus::Unknown);
        assert_eq!(result.path, dep);
        assert_eq!(result.license_type, "Unknown");
        let err = result.error.expect("candidate failure should carry an error");
        assert_eq!(err.import_id, "github.com/acme/widget");
        assert_eq!(c.detector.visited(), vec![dep.clone(), flattened]);
    }

    #[test]
    fn test_detector_failure_at_ancestor_ends_walk() {
        let c = classifier(
            FakeDetector::default()
                .with("/ws/mod", Fake::Broken)
                .with("/ws", Fake::License("MIT")),
            &[],
        );
        let result = c.classify(Path::new("/ws/mod/pkg"), "example.org/mod/pkg");
        assert_eq!(result.status, LicenseStatus::Unknown);
        assert_eq!(result.path, PathBuf::from("/ws/mod"));
        assert!(result.error.is_some());
        assert_eq!(
            c.detector.visited(),
            vec![PathBuf::from("/ws/mod/pkg"), PathBuf::from("/ws/mod")]
        );
    }

    #[test]
    fn test_filesystem_root_checked_once() {
        let c = classifier(FakeDetector::default(), &[]);
        let result = c.classify(Path::new("/a"), "example.org/a");
        assert_eq!(result.status, LicenseStatus::NoLicense);
        assert_eq!(result.path, PathBuf::from("/a"));
        assert_eq!(
            c.detector.visited(),
            vec![PathBuf::from("/a"), PathBuf::from("/")]
        );
    }

    #[test]
    fn test_relative_root_resolved_before_walk() {
        // a root given as `..` from inside the project, resolved to an absolute path
        let tmp = tempfile::tempdir().unwrap();
        let proj = tmp.path().join("proj");
        let dep = proj.join("third_party/dep");
        std::fs::create_dir_all(&dep).unwrap();

        let outer = crate::paths::clean(tmp.path());
        let detector = FakeDetector::default().with(outer.clone(), Fake::License("MIT"));
        let roots = StaticRoots(vec![crate::paths::absolutize(&proj, Path::new(".."))]);
        let c = Classifier::new(policy(), detector, &roots);

        let result = c.classify(&dep, "example.org/dep");
        assert_eq!(result.status, LicenseStatus::NoLicense);
        assert!(!c.detector.visited().contains(&outer));
    }
}
