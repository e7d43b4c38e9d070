//! Prediction of class files produced for each source file.
//!
//! Neither compiler reports which classes a source produced, so the mapping
//! is inferred from the source text. A nested path is only claimed when the
//! file declares exactly one qualifier and defines a type named after itself;
//! any other file maps to the target directory as a whole. The mapping may
//! therefore over-report staleness but never names an artifact that the
//! evidence does not support.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::Error;

use super::{ClassifiedSources, Inspection, ModuleInspector, SourceSet};

/// Extension of compiled artifacts.
pub const TARGET_EXT: &str = "class";

/// Predicted output for one source file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "path", rename_all = "lowercase")]
pub enum ArtifactTarget {
    /// A specific class file under the target directory.
    Nested(PathBuf),
    /// Somewhere under the target directory.
    Flat(PathBuf),
}

impl ArtifactTarget {
    pub fn path(&self) -> &Path {
        match self {
            Self::Nested(path) | Self::Flat(path) => path,
        }
    }

    pub fn is_nested(&self) -> bool {
        matches!(self, Self::Nested(_))
    }
}

/// Source file → predicted artifact, in source order.
#[derive(Debug, Default)]
pub struct ArtifactMapping {
    entries: Vec<(PathBuf, ArtifactTarget)>,
    failures: Vec<Error>,
}

impl ArtifactMapping {
    pub fn entries(&self) -> &[(PathBuf, ArtifactTarget)] {
        &self.entries
    }

    /// Predicted artifact for a source file.
    pub fn get(&self, source: &Path) -> Option<&ArtifactTarget> {
        self.entries
            .iter()
            .find(|(s, _)| s == source)
            .map(|(_, target)| target)
    }

    /// Files that could not be inspected. Each of them is mapped flat.
    pub fn failures(&self) -> &[Error] {
        &self.failures
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// JSON view for tooling: `{ "<source>": { "kind": ..., "path": ... } }`.
    pub fn to_json(&self) -> serde_json::Value {
        let map = self
            .entries
            .iter()
            .map(|(source, target)| {
                (
                    source.display().to_string(),
                    serde_json::to_value(target).unwrap_or(serde_json::Value::Null),
                )
            })
            .collect::<serde_json::Map<_, _>>();
        serde_json::Value::Object(map)
    }
}

/// Builds an [`ArtifactMapping`] from classified sources.
pub struct TargetMapper;

impl TargetMapper {
    /// Map every Kawa and Java source under `target_root`.
    pub fn map(sources: &ClassifiedSources, target_root: &Path) -> ArtifactMapping {
        let mut mapping = ArtifactMapping::default();
        for set in sources.iter() {
            Self::map_set(set, target_root, &mut mapping);
        }
        tracing::debug!(
            "Mapped {} sources ({} nested, {} uninspectable)",
            mapping.len(),
            mapping.entries.iter().filter(|(_, t)| t.is_nested()).count(),
            mapping.failures.len()
        );
        mapping
    }

    fn map_set(set: &SourceSet, target_root: &Path, mapping: &mut ArtifactMapping) {
        for source in set {
            let target = match ModuleInspector::inspect(source, set.language()) {
                Ok(inspection) => Self::target_for(source, &inspection, target_root),
                Err(err) => {
                    tracing::warn!("Mapping {} to the whole target: {}", source.display(), err);
                    mapping.failures.push(err);
                    ArtifactTarget::Flat(target_root.to_path_buf())
                }
            };
            mapping.entries.push((source.clone(), target));
        }
    }

    /// Target for a single inspected file.
    pub fn target_for(
        source: &Path,
        inspection: &Inspection,
        target_root: &Path,
    ) -> ArtifactTarget {
        let nested = inspection
            .declaration
            .unambiguous()
            .filter(|_| inspection.has_primary_type)
            .zip(crate::paths::base_name(source));

        match nested {
            Some((qualifier, name)) => {
                let mut path = target_root.to_path_buf();
                path.extend(qualifier.split('.').filter(|segment| !segment.is_empty()));
                path.push(format!("{name}.{TARGET_EXT}"));
                ArtifactTarget::Nested(path)
            }
            None => ArtifactTarget::Flat(target_root.to_path_buf()),
        }
    }
}
