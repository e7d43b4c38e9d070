//! Partitioning of source entries into per-language source sets.

use std::fs;
use std::path::{Path, PathBuf};

use rustc_hash::FxHashSet;

use crate::error::Result;
use crate::paths;

use super::{Language, SourceSet};

/// Kawa and Java sources of one compilation unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedSources {
    pub kawa: SourceSet,
    pub java: SourceSet,
}

impl ClassifiedSources {
    /// Both sets, primary first.
    pub fn iter(&self) -> impl Iterator<Item = &SourceSet> {
        [&self.kawa, &self.java].into_iter()
    }

    pub fn is_empty(&self) -> bool {
        self.kawa.is_empty() && self.java.is_empty()
    }
}

/// Expands files and directories into language-tagged source sets.
pub struct SourceClassifier;

impl SourceClassifier {
    /// Classify source entries.
    ///
    /// Directories are walked recursively (hidden entries skipped, contents
    /// sorted); files outside both languages are dropped. Plain file entries
    /// are kept when their extension matches, whether or not they exist.
    ///
    /// # Errors
    /// Returns an error if a directory cannot be read.
    pub fn classify<P: AsRef<Path>>(entries: &[P]) -> Result<ClassifiedSources> {
        let mut classified = ClassifiedSources {
            kawa: SourceSet::new(Language::Kawa),
            java: SourceSet::new(Language::Java),
        };
        let mut seen = FxHashSet::default();

        for entry in entries {
            let entry = paths::absolutize(entry.as_ref())?;
            if entry.is_dir() {
                let mut files = Vec::new();
                collect_files(&entry, &mut files)?;
                for file in files {
                    add(&mut classified, &mut seen, file);
                }
            } else {
                add(&mut classified, &mut seen, entry);
            }
        }

        tracing::debug!(
            "Classified {} kawa and {} java sources from {} entries",
            classified.kawa.len(),
            classified.java.len(),
            entries.len()
        );

        Ok(classified)
    }

    /// Whether any entry tree holds at least one file of `language`.
    ///
    /// Stops at the first match instead of classifying everything.
    pub fn contains_any<P: AsRef<Path>>(entries: &[P], language: Language) -> bool {
        entries.iter().any(|entry| tree_contains(entry.as_ref(), language))
    }
}

fn add(classified: &mut ClassifiedSources, seen: &mut FxHashSet<PathBuf>, file: PathBuf) {
    let Some(language) = Language::of(&file) else {
        return;
    };
    if !seen.insert(file.clone()) {
        return;
    }
    match language {
        Language::Kawa => classified.kawa.push(file),
        Language::Java => classified.java.push(file),
    }
}

fn collect_files(dir: &Path, files: &mut Vec<PathBuf>) -> Result<()> {
    let mut entries = fs::read_dir(dir)?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<std::io::Result<Vec<_>>>()?;
    entries.sort();

    for path in entries {
        if paths::is_hidden(&path) {
            continue;
        }
        if path.is_dir() {
            collect_files(&path, files)?;
        } else if Language::of(&path).is_some() {
            files.push(path);
        }
    }

    Ok(())
}

fn tree_contains(path: &Path, language: Language) -> bool {
    if !path.is_dir() {
        return Language::of(path) == Some(language) && path.is_file();
    }
    let Ok(entries) = fs::read_dir(path) else {
        return false;
    };
    entries.flatten().any(|entry| {
        let path = entry.path();
        !paths::is_hidden(&path) && tree_contains(&path, language)
    })
}
