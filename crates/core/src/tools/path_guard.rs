//! # Path Guard
//!
//! Resolves tool-supplied paths against the project root and rejects
//! anything that lands outside it. Resolution is lexical: `.` and `..` are
//! folded without touching the filesystem, so the root does not need to
//! exist yet. Symlinks are not followed.

use crate::error::ToolError;
use std::path::{Component, Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathGuard {
    root: PathBuf,
}

impl PathGuard {
    /// Fix the root. Relative roots are anchored at the current directory.
    pub fn new(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref();
        let absolute = if root.is_absolute() {
            root.to_path_buf()
        } else {
            std::env::current_dir()
                .unwrap_or_else(|_| PathBuf::from("."))
                .join(root)
        };
        Self {
            root: normalize(&absolute),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve `relative` under the root.
    ///
    /// Succeeds for the root itself, a direct child, or any descendant.
    pub fn resolve(&self, relative: &str) -> Result<PathBuf, ToolError> {
        let resolved = normalize(&self.root.join(relative));
        if resolved.starts_with(&self.root) {
            Ok(resolved)
        } else {
            Err(ToolError::PathEscape {
                path: relative.to_string(),
                root: self.root.clone(),
            })
        }
    }

    /// Root-relative form of an already resolved path, `/`-separated.
    pub fn relative(&self, path: &Path) -> Option<String> {
        let rel = path.strip_prefix(&self.root).ok()?;
        Some(
            rel.components()
                .map(|c| c.as_os_str().to_string_lossy())
                .collect::<Vec<_>>()
                .join("/"),
        )
    }
}

fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                // Popping past the filesystem root leaves it in place
                let at_root = matches!(
                    out.components().next_back(),
                    None | Some(Component::RootDir) | Some(Component::Prefix(_))
                );
                if !at_root {
                    out.pop();
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn guard() -> PathGuard {
        PathGuard::new("/tmp/blueprint-root")
    }

    #[test]
    fn test_root_itself_is_allowed() {
        let g = guard();
        assert_eq!(g.resolve(".").unwrap(), PathBuf::from("/tmp/blueprint-root"));
        assert_eq!(g.resolve("").unwrap(), PathBuf::from("/tmp/blueprint-root"));
    }

    #[test]
    fn test_children_and_descendants_are_allowed() {
        let g = guard();
        assert_eq!(
            g.resolve("index.html").unwrap(),
            PathBuf::from("/tmp/blueprint-root/index.html")
        );
        assert_eq!(
            g.resolve("src/js/../app.js").unwrap(),
            PathBuf::from("/tmp/blueprint-root/src/app.js")
        );
    }

    #[test]
    fn test_escapes_are_rejected() {
        let g = guard();
        for bad in ["..", "../x", "src/../../x", "/etc/passwd", "../blueprint-root-evil/x"] {
            let err = g.resolve(bad).unwrap_err();
            assert!(
                matches!(err, ToolError::PathEscape { .. }),
                "expected escape for {bad}"
            );
        }
    }

    #[test]
    fn test_absolute_path_inside_root_is_allowed() {
        let g = guard();
        assert!(g.resolve("/tmp/blueprint-root/a.txt").is_ok());
    }

    #[test]
    fn test_relative_root_is_anchored() {
        let g = PathGuard::new("generated_project");
        assert!(g.root().is_absolute());
        assert!(g.root().ends_with("generated_project"));
    }

    #[test]
    fn test_relative_rendering() {
        let g = guard();
        let p = g.resolve("a/b/c.txt").unwrap();
        assert_eq!(g.relative(&p).as_deref(), Some("a/b/c.txt"));
    }
}
