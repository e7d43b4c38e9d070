//! Source inspection for mixed Kawa/Java modules.
//!
//! This module provides:
//! - Source classification (files and directories → per-language source sets)
//! - Module inspection (qualifier declarations and type-definition evidence)
//! - Target mapping (source file → predicted class file)
//! - Staleness checks over a target mapping
//!
//! # Architecture
//!
//! ```text
//! source entries ──► SourceClassifier ──► SourceSet (kawa) ──┐
//!                                    └──► SourceSet (java) ──┤
//!                                                            ▼
//!                                 ModuleInspector ──► TargetMapper ──► ArtifactMapping
//! ```
//!
//! Inspection is deliberately pattern based. A mapping only names a specific
//! class file when the evidence is unambiguous; everything else maps to the
//! target directory as a whole.

mod classifier;
mod inspector;
mod language;
mod mapper;
mod staleness;

pub use classifier::{ClassifiedSources, SourceClassifier};
pub use inspector::{Inspection, ModuleDeclaration, ModuleInspector};
pub use language::Language;
pub use mapper::{ArtifactMapping, ArtifactTarget, TARGET_EXT, TargetMapper};
pub use staleness::needs_compile;

use std::path::{Path, PathBuf};

/// An ordered, deduplicated list of absolute source files of one language.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceSet {
    language: Language,
    files: Vec<PathBuf>,
}

impl SourceSet {
    /// Create an empty source set.
    pub fn new(language: Language) -> Self {
        Self {
            language,
            files: Vec::new(),
        }
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Path> {
        self.files.iter().map(PathBuf::as_path)
    }

    /// Append a file. The classifier guarantees the path is absolute, unseen,
    /// and carries this set's extension.
    pub(crate) fn push(&mut self, file: PathBuf) {
        self.files.push(file);
    }
}

impl<'a> IntoIterator for &'a SourceSet {
    type Item = &'a PathBuf;
    type IntoIter = std::slice::Iter<'a, PathBuf>;

    fn into_iter(self) -> Self::IntoIter {
        self.files.iter()
    }
}
