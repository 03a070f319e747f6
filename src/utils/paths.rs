//! Path display and resolution helpers

use std::path::{Component, Path, PathBuf};

/// Render a relative path with `/` separators on every platform.
pub fn normalize_path(path: &Path) -> String {
    path.components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// Path of `path` relative to `root`, normalized for display.
///
/// Falls back to the full path when `path` is not under `root`.
pub fn display_relative(root: &Path, path: &Path) -> String {
    match path.strip_prefix(root) {
        Ok(rel) => normalize_path(rel),
        Err(_) => path.display().to_string(),
    }
}

/// Drop `.` components and fold `..` into its parent without touching the
/// filesystem. `..` above the root is discarded.
pub fn normalize_lexically(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.components().next_back() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir | Component::Prefix(_)) => {}
                _ => out.push(".."),
            },
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// Lexically normalize `path`, then resolve symlinks in its longest
/// existing ancestor. Works for paths that do not exist yet.
pub fn resolve_path(path: &Path) -> PathBuf {
    let path = normalize_lexically(path);
    for ancestor in path.ancestors() {
        let Ok(real) = ancestor.canonicalize() else {
            continue;
        };
        if let Ok(rest) = path.strip_prefix(ancestor) {
            return if rest.as_os_str().is_empty() { real } else { real.join(rest) };
        }
    }
    path
}

#[cfg(test)]
mod tests {
    use super::{display_relative, normalize_lexically, normalize_path, resolve_path};
    use std::fs;
    use std::path::{Path, PathBuf};
    use tempfile::TempDir;

    #[test]
    fn normalizes_nested_paths() {
        assert_eq!(normalize_path(Path::new("src/cli/mod.rs")), "src/cli/mod.rs");
        assert_eq!(normalize_path(Path::new("./docs/x.md")), "docs/x.md");
    }

    #[test]
    fn relative_to_root() {
        let root = Path::new("/work/demo");
        assert_eq!(display_relative(root, Path::new("/work/demo/docs/x.md")), "docs/x.md");
        assert_eq!(display_relative(root, Path::new("/elsewhere/y.md")), "/elsewhere/y.md");
    }

    #[test]
    fn lexical_normalization_folds_dot_segments() {
        assert_eq!(
            normalize_lexically(Path::new("/run/demo/../demo/./x.txt")),
            PathBuf::from("/run/demo/x.txt")
        );
        assert_eq!(normalize_lexically(Path::new("/../a")), PathBuf::from("/a"));
        assert_eq!(normalize_lexically(Path::new("../../a")), PathBuf::from("../../a"));
        assert_eq!(normalize_lexically(Path::new("a/b/../..")), PathBuf::new());
    }

    #[test]
    fn resolves_paths_that_do_not_exist_yet() {
        let dir = TempDir::new().expect("temp dir");
        let real = dir.path().canonicalize().expect("canonical temp dir");

        let resolved = resolve_path(&dir.path().join("demo").join("..").join("out.txt"));
        assert_eq!(resolved, real.join("out.txt"));

        let missing = resolve_path(&dir.path().join("not").join("yet").join("x.txt"));
        assert_eq!(missing, real.join("not/yet/x.txt"));
    }

    #[cfg(unix)]
    #[test]
    fn resolves_symlinked_directories() {
        let dir = TempDir::new().expect("temp dir");
        let real = dir.path().canonicalize().expect("canonical temp dir");
        fs::create_dir(real.join("target")).expect("mkdir");
        std::os::unix::fs::symlink(real.join("target"), real.join("link")).expect("symlink");

        assert_eq!(resolve_path(&real.join("link").join("demo")), real.join("target/demo"));
    }
}
