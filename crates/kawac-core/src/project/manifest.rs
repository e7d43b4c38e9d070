//! `kawac.toml` project manifests.
//!
//! ```toml
//! name = "app"
//! dependencies = ["lib/commons.jar"]
//!
//! [options]
//! warnings = true
//! kawac = ["--full-tailcalls"]
//!
//! [[modules]]
//! name = "core"
//! sources = ["src"]
//!
//! [[modules]]
//! name = "web"
//! depends_on = ["core"]
//!
//! [modules.options.javac]
//! source = "11"
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{Error, Result};
use crate::options::LocalOptions;

/// Manifest file name looked up by [`Manifest::find`].
pub const MANIFEST_FILE: &str = "kawac.toml";

/// One module of a manifest, possibly with nested modules.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ModuleManifest {
    pub name: String,

    /// Module directory relative to the enclosing module. Defaults to the
    /// enclosing directory for the root and to `name` for nested modules.
    pub path: Option<PathBuf>,

    /// Source directories or files. Defaults to `src/main/kawa` and
    /// `src/main/java`, where present.
    pub sources: Option<Vec<PathBuf>>,

    /// Output directory. Defaults to `target/classes`.
    pub target: Option<PathBuf>,

    /// Dependency artifacts, relative to the module directory.
    #[serde(default)]
    pub dependencies: Vec<PathBuf>,

    /// Modules whose output this module compiles against.
    #[serde(default)]
    pub depends_on: Vec<String>,

    #[serde(default)]
    pub options: LocalOptions,

    #[serde(default)]
    pub modules: Vec<ModuleManifest>,
}

/// A parsed manifest and the directory it was loaded from.
#[derive(Debug, Clone)]
pub struct Manifest {
    path: PathBuf,
    root: ModuleManifest,
}

impl Manifest {
    /// Load and parse the manifest at `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        Self::parse(&content, path)
    }

    /// Parse manifest text; `path` is used for base directories and errors.
    pub fn parse(content: &str, path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let root: ModuleManifest = toml::from_str(content).map_err(|source| Error::Manifest {
            path: path.clone(),
            source,
        })?;
        if root.name.trim().is_empty() {
            return Err(Error::Configuration(format!(
                "{}: module name must not be empty",
                path.display()
            )));
        }
        Ok(Self { path, root })
    }

    /// Find the nearest manifest in `start` or its ancestors.
    pub fn find(start: &Path) -> Option<PathBuf> {
        start
            .ancestors()
            .map(|dir| dir.join(MANIFEST_FILE))
            .find(|candidate| candidate.is_file())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Directory containing the manifest.
    pub fn base_dir(&self) -> &Path {
        self.path
            .parent()
            .filter(|dir| !dir.as_os_str().is_empty())
            .unwrap_or(Path::new("."))
    }

    pub fn root(&self) -> &ModuleManifest {
        &self.root
    }
}
