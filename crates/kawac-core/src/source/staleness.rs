//! Incremental build decisions over an [`ArtifactMapping`].

use std::fs;
use std::path::Path;
use std::time::SystemTime;

use super::{ArtifactMapping, ArtifactTarget};

fn modified(path: &Path) -> Option<SystemTime> {
    fs::metadata(path).and_then(|m| m.modified()).ok()
}

/// Whether a compilation unit must be rebuilt.
///
/// - Nothing mapped: nothing to do.
/// - Missing target directory, any flat entry or any missing artifact:
///   rebuild. A flat entry names no artifact, so it is always stale.
/// - Any source newer than its artifact: rebuild.
/// - Otherwise rebuild only if a dependency is newer than the oldest artifact.
///
/// Unreadable timestamps count as stale.
pub fn needs_compile<P: AsRef<Path>>(
    mapping: &ArtifactMapping,
    target: &Path,
    dependencies: &[P],
) -> bool {
    if mapping.is_empty() {
        return false;
    }
    if !target.exists() {
        return true;
    }

    let mut oldest: Option<SystemTime> = None;
    for (source, artifact) in mapping.entries() {
        let ArtifactTarget::Nested(artifact) = artifact else {
            tracing::debug!("{} has no predicted artifact", source.display());
            return true;
        };
        let (Some(source_time), Some(artifact_time)) = (modified(source), modified(artifact)) else {
            tracing::debug!("{} has no compiled artifact yet", source.display());
            return true;
        };
        if source_time > artifact_time {
            tracing::debug!("{} is newer than {}", source.display(), artifact.display());
            return true;
        }
        oldest = Some(oldest.map_or(artifact_time, |t| t.min(artifact_time)));
    }

    let Some(oldest) = oldest else {
        return true;
    };
    dependencies
        .iter()
        .any(|dep| modified(dep.as_ref()).is_some_and(|t| t > oldest))
}
