//! Projects loaded from a `kawac.toml` manifest.
//!
//! This module provides:
//! - Manifest parsing (root module with nested `[[modules]]`)
//! - Module flattening with resolved paths and option scopes
//! - Build ordering over `depends_on` edges
//!
//! Nested modules get a child option scope of their enclosing module and a
//! colon-qualified name (`app:core`). A `depends_on` entry names either a
//! qualified module or a sibling; the target directory of each named module
//! is appended to the dependent's dependency artifacts.

mod graph;
mod manifest;

pub use graph::ModuleGraph;
pub use manifest::{MANIFEST_FILE, Manifest, ModuleManifest};

use std::path::{Path, PathBuf};
use std::sync::Arc;

use rustc_hash::{FxHashMap, FxHashSet};

use crate::compiler::BuildProject;
use crate::error::{Error, Result};
use crate::options::OptionScope;
use crate::paths;

/// Default source roots, relative to the module directory.
pub const DEFAULT_SOURCES: [&str; 2] = ["src/main/kawa", "src/main/java"];

/// Default output directory, relative to the module directory.
pub const DEFAULT_TARGET: &str = "target/classes";

/// A resolved module of a project.
#[derive(Debug, Clone)]
pub struct Module {
    /// Qualified name
    name: String,

    /// Absolute module directory
    base_dir: PathBuf,

    source_roots: Vec<PathBuf>,

    /// Declared artifacts, then target directories of `depends_on` modules
    dependencies: Vec<PathBuf>,

    /// Qualified names of the modules this one depends on
    depends_on: Vec<String>,

    target: PathBuf,

    scope: Arc<OptionScope>,
}

impl Module {
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    pub fn depends_on(&self) -> &[String] {
        &self.depends_on
    }
}

impl BuildProject for Module {
    fn name(&self) -> &str {
        &self.name
    }

    fn source_roots(&self) -> &[PathBuf] {
        &self.source_roots
    }

    fn dependencies(&self) -> &[PathBuf] {
        &self.dependencies
    }

    fn target_dir(&self) -> &Path {
        &self.target
    }

    fn option_scope(&self) -> &Arc<OptionScope> {
        &self.scope
    }
}

/// All modules of a manifest with their build order.
#[derive(Debug)]
pub struct Project {
    manifest_path: PathBuf,
    modules: Vec<Module>,
    graph: ModuleGraph,
}

/// A module awaiting dependency resolution.
struct Pending {
    module: Module,
    parent: Option<String>,
    depends_on: Vec<String>,
}

impl Project {
    /// Load the project described by the manifest at `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_manifest(&Manifest::load(path)?)
    }

    /// Resolve a parsed manifest.
    ///
    /// # Errors
    /// [`Error::Configuration`] for duplicate module names, modules sharing a
    /// target directory, or unknown `depends_on` entries;
    /// [`Error::CyclicDependency`] if `depends_on` edges form a cycle.
    pub fn from_manifest(manifest: &Manifest) -> Result<Self> {
        let base = paths::absolutize(manifest.base_dir())?;

        let mut pending = Vec::new();
        flatten(manifest.root(), &base, None, None, &mut pending);

        let mut positions = FxHashMap::default();
        let mut targets = FxHashMap::default();
        for (position, entry) in pending.iter().enumerate() {
            let module = &entry.module;
            if positions.insert(module.name.clone(), position).is_some() {
                return Err(Error::Configuration(format!(
                    "duplicate module name '{}'",
                    module.name
                )));
            }
            if let Some(other) = targets.insert(module.target.clone(), module.name.clone()) {
                return Err(Error::Configuration(format!(
                    "modules '{other}' and '{}' share target directory {}",
                    module.name,
                    module.target.display()
                )));
            }
        }

        let mut graph = ModuleGraph::new();
        for entry in &pending {
            graph.add_module(entry.module.name.clone());
        }

        let mut resolved = Vec::with_capacity(pending.len());
        for entry in &pending {
            let mut seen = FxHashSet::default();
            let mut names = Vec::new();
            for dep in &entry.depends_on {
                let name = qualify(dep, entry.parent.as_deref(), &positions).ok_or_else(|| {
                    Error::Configuration(format!(
                        "module '{}' depends on unknown module '{dep}'",
                        entry.module.name
                    ))
                })?;
                graph.add_dependency(&entry.module.name, &name)?;
                if seen.insert(name.clone()) {
                    names.push(name);
                }
            }
            resolved.push(names);
        }
        graph.detect_cycles()?;

        let mut modules: Vec<Module> = pending.into_iter().map(|entry| entry.module).collect();
        for (position, names) in resolved.into_iter().enumerate() {
            let extra: Vec<PathBuf> = names
                .iter()
                .map(|name| modules[positions[name]].target.clone())
                .collect();
            let module = &mut modules[position];
            module.dependencies.extend(extra);
            module.depends_on = names;
        }

        tracing::debug!(
            "Loaded {} module(s) from {}",
            modules.len(),
            manifest.path().display()
        );

        Ok(Self {
            manifest_path: manifest.path().to_path_buf(),
            modules,
            graph,
        })
    }

    pub fn manifest_path(&self) -> &Path {
        &self.manifest_path
    }

    /// Modules in manifest order (root first, then depth first).
    pub fn modules(&self) -> &[Module] {
        &self.modules
    }

    /// Look up a module by qualified name, or by unqualified name when that is
    /// unique.
    pub fn module(&self, name: &str) -> Option<&Module> {
        self.modules.iter().find(|m| m.name == name).or_else(|| {
            let mut matches = self
                .modules
                .iter()
                .filter(|m| m.name.rsplit(':').next() == Some(name));
            match (matches.next(), matches.next()) {
                (Some(module), None) => Some(module),
                _ => None,
            }
        })
    }

    /// Every module in build order.
    pub fn build_order(&self) -> Result<Vec<&Module>> {
        Ok(self
            .graph
            .topological_order()?
            .into_iter()
            .map(|position| &self.modules[position])
            .collect())
    }

    /// `name` and its transitive dependencies in build order.
    pub fn build_order_for(&self, name: &str) -> Result<Vec<&Module>> {
        let module = self
            .module(name)
            .ok_or_else(|| Error::Configuration(format!("no module named '{name}'")))?;
        Ok(self
            .graph
            .build_order_for(&module.name)?
            .into_iter()
            .map(|position| &self.modules[position])
            .collect())
    }
}

fn flatten(
    manifest: &ModuleManifest,
    parent_dir: &Path,
    parent_name: Option<&str>,
    parent_scope: Option<&Arc<OptionScope>>,
    out: &mut Vec<Pending>,
) {
    let name = match parent_name {
        Some(parent) => format!("{parent}:{}", manifest.name),
        None => manifest.name.clone(),
    };

    let base_dir = match (&manifest.path, parent_name) {
        (Some(path), _) => paths::normalize(&parent_dir.join(path)),
        (None, Some(_)) => parent_dir.join(&manifest.name),
        (None, None) => parent_dir.to_path_buf(),
    };

    let source_roots = match &manifest.sources {
        Some(sources) => sources.iter().map(|s| paths::normalize(&base_dir.join(s))).collect(),
        None => DEFAULT_SOURCES
            .iter()
            .map(|s| base_dir.join(s))
            .filter(|dir| dir.is_dir())
            .collect(),
    };

    let target = paths::normalize(
        &base_dir.join(manifest.target.as_deref().unwrap_or(Path::new(DEFAULT_TARGET))),
    );

    let scope = match parent_scope {
        Some(parent) => OptionScope::child(parent, name.clone(), manifest.options.clone()),
        None => OptionScope::root(name.clone(), manifest.options.clone()),
    };

    out.push(Pending {
        module: Module {
            name: name.clone(),
            dependencies: manifest
                .dependencies
                .iter()
                .map(|d| paths::normalize(&base_dir.join(d)))
                .collect(),
            depends_on: Vec::new(),
            source_roots,
            target,
            scope: Arc::clone(&scope),
            base_dir: base_dir.clone(),
        },
        parent: parent_name.map(str::to_string),
        depends_on: manifest.depends_on.clone(),
    });

    for child in &manifest.modules {
        flatten(child, &base_dir, Some(&name), Some(&scope), out);
    }
}

/// Resolve a `depends_on` entry: exact qualified name first, then a sibling
/// under the same parent.
fn qualify(dep: &str, parent: Option<&str>, known: &FxHashMap<String, usize>) -> Option<String> {
    if known.contains_key(dep) {
        return Some(dep.to_string());
    }
    let sibling = format!("{}:{dep}", parent?);
    known.contains_key(&sibling).then_some(sibling)
}
