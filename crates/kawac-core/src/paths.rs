//! Path normalisation shared by classification and mapping.
//!
//! Source lists are compared and deduplicated as absolute, lexically
//! normalised paths. Symlinks are not resolved: a source reached through two
//! different links is two entries, matching what the compilers themselves see.

use std::path::{Component, Path, PathBuf};

use crate::error::Result;

/// Make `path` absolute against the current directory and fold `.` and `..`
/// components without touching the file system.
pub fn absolutize(path: &Path) -> Result<PathBuf> {
    let absolute = std::path::absolute(path)?;
    Ok(normalize(&absolute))
}

/// Lexically normalise a path.
///
/// `..` at the root stays at the root.
pub fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.components().next_back() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir | Component::Prefix(_)) => {}
                _ => out.push(component),
            },
            other => out.push(other),
        }
    }
    out
}

/// Whether a file or directory name is hidden (dot-prefixed).
pub fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(|n| n.starts_with('.'))
        .unwrap_or(false)
}

/// Base name of a source file: everything before the first `.`.
///
/// `Foo.scm` → `Foo`, `Foo.test.scm` → `Foo`.
pub fn base_name(path: &Path) -> Option<&str> {
    let name = path.file_name()?.to_str()?;
    name.split('.').next().filter(|n| !n.is_empty())
}
