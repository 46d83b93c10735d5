//! Lexical path arithmetic used by the ancestor walk.
//!
//! Nothing here touches the filesystem: `..` is resolved against the textual
//! path, never against symlinks.

use std::path::{Component, Path, PathBuf};

/// Lexically normalize `path`: drop `.` segments, fold `name/..` pairs and
/// collapse repeated separators. `..` directly under the root is discarded;
/// leading `..` segments of a relative path are kept. An empty result is `.`.
pub fn clean(path: &Path) -> PathBuf {
    let mut out: Vec<Component> = Vec::new();

    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.last() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => out.push(component),
            },
            other => out.push(other),
        }
    }

    if out.is_empty() {
        return PathBuf::from(".");
    }
    out.iter().collect()
}

/// The directory `hops` levels above `path`, normalized.
pub fn ancestor(path: &Path, hops: usize) -> PathBuf {
    let mut joined = path.to_path_buf();
    for _ in 0..hops {
        joined.push("..");
    }
    clean(&joined)
}

/// `path` made absolute against `base` when it is relative, then normalized.
pub fn absolutize(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        clean(path)
    } else {
        clean(&base.join(path))
    }
}

/// Last segment of the normalized path. The root yields `/`, an empty path `.`.
pub fn base_name(path: &Path) -> String {
    let cleaned = clean(path);
    match cleaned.components().next_back() {
        Some(Component::Normal(name)) => name.to_string_lossy().into_owned(),
        Some(Component::ParentDir) => "..".to_string(),
        Some(Component::RootDir) => std::path::MAIN_SEPARATOR.to_string(),
        Some(Component::Prefix(prefix)) => prefix.as_os_str().to_string_lossy().into_owned(),
        Some(Component::CurDir) | None => ".".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean() {
        assert_eq!(clean(Path::new("/a/./b//c/")), PathBuf::from("/a/b/c"));
        assert_eq!(clean(Path::new("/a/b/../c")), PathBuf::from("/a/c"));
        assert_eq!(clean(Path::new("/../..")), PathBuf::from("/"));
        assert_eq!(clean(Path::new("a/../..")), PathBuf::from(".."));
        assert_eq!(clean(Path::new("")), PathBuf::from("."));
        assert_eq!(clean(Path::new("./")), PathBuf::from("."));
    }

    #[test]
    fn test_ancestor() {
        let p = Path::new("/ws/proj/vendor/github.com/acme/widget");
        assert_eq!(ancestor(p, 0), PathBuf::from("/ws/proj/vendor/github.com/acme/widget"));
        assert_eq!(ancestor(p, 1), PathBuf::from("/ws/proj/vendor/github.com/acme"));
        assert_eq!(ancestor(p, 3), PathBuf::from("/ws/proj/vendor"));
        assert_eq!(ancestor(p, 20), PathBuf::from("/"));
    }

    #[test]
    fn test_ancestor_relative() {
        assert_eq!(ancestor(Path::new("a/b"), 1), PathBuf::from("a"));
        assert_eq!(ancestor(Path::new("a/b"), 2), PathBuf::from("."));
        assert_eq!(ancestor(Path::new("a/b"), 3), PathBuf::from(".."));
    }

    #[test]
    fn test_absolutize() {
        let base = Path::new("/tmp/work/proj");
        assert_eq!(absolutize(base, Path::new("..")), PathBuf::from("/tmp/work"));
        assert_eq!(absolutize(base, Path::new("./third_party")), PathBuf::from("/tmp/work/proj/third_party"));
        assert_eq!(absolutize(base, Path::new("/opt/go/src/")), PathBuf::from("/opt/go/src"));
    }

    #[test]
    fn test_base_name() {
        assert_eq!(base_name(Path::new("/ws/proj/vendor/")), "vendor");
        assert_eq!(base_name(Path::new("github.com")), "github.com");
        assert_eq!(base_name(Path::new("/")), "/");
        assert_eq!(base_name(Path::new("")), ".");
        assert_eq!(base_name(Path::new("../..")), "..");
    }
}
