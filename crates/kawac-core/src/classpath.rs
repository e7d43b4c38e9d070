//! Classpath composition for the primary and secondary compilers.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Ordered search path handed to a compiler.
///
/// Declared dependency artifacts always come before source roots, so already
/// built artifacts win symbol resolution over same-round sources.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClasspathSpec {
    dependencies: Vec<PathBuf>,
    source_roots: Vec<PathBuf>,
}

impl ClasspathSpec {
    /// Declared dependency artifacts, in caller order.
    pub fn dependencies(&self) -> &[PathBuf] {
        &self.dependencies
    }

    /// Directory-form source entries appended after the dependencies.
    pub fn source_roots(&self) -> &[PathBuf] {
        &self.source_roots
    }

    /// All entries in search order.
    pub fn entries(&self) -> impl Iterator<Item = &Path> {
        self.dependencies
            .iter()
            .chain(&self.source_roots)
            .map(PathBuf::as_path)
    }

    pub fn is_empty(&self) -> bool {
        self.dependencies.is_empty() && self.source_roots.is_empty()
    }

    /// Join the entries with the platform path separator.
    ///
    /// # Errors
    /// Returns [`Error::Classpath`] if an entry contains the separator.
    pub fn join(&self) -> Result<OsString> {
        join(self.entries())
    }

    /// Dependency list for the secondary compiler: the declared dependencies,
    /// then the primary compiler's support artifacts, then the freshly built
    /// target directory. Source roots are left out.
    pub fn for_secondary(&self, support: &[PathBuf], target: &Path) -> Vec<PathBuf> {
        self.dependencies
            .iter()
            .chain(support)
            .cloned()
            .chain(std::iter::once(target.to_path_buf()))
            .collect()
    }
}

/// Join arbitrary classpath entries with the platform separator.
pub fn join<I, P>(entries: I) -> Result<OsString>
where
    I: IntoIterator<Item = P>,
    P: AsRef<Path>,
{
    let entries: Vec<P> = entries.into_iter().collect();
    std::env::join_paths(entries.iter().map(|p| p.as_ref())).map_err(|e| {
        let offending = entries
            .iter()
            .map(|p| p.as_ref().display().to_string())
            .collect::<Vec<_>>()
            .join(", ");
        Error::Classpath(format!("{e} (entries: {offending})"))
    })
}

/// Merges declared dependencies with directory source roots.
pub struct ClasspathComposer;

impl ClasspathComposer {
    /// Compose a classpath: `dependencies` as given, then every entry of
    /// `source_entries` that is a directory. File entries are not classpath
    /// roots and are skipped.
    pub fn compose<D, S>(dependencies: &[D], source_entries: &[S]) -> ClasspathSpec
    where
        D: AsRef<Path>,
        S: AsRef<Path>,
    {
        ClasspathSpec {
            dependencies: dependencies
                .iter()
                .map(|d| d.as_ref().to_path_buf())
                .collect(),
            source_roots: source_entries
                .iter()
                .map(|entry| entry.as_ref())
                .filter(|entry| entry.is_dir())
                .map(Path::to_path_buf)
                .collect(),
        }
    }
}
