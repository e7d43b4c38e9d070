//! Line-based inspection of a single source file.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use serde::Serialize;

use crate::error::{Error, Result};
use crate::paths;

use super::Language;

/// Module/package qualifier declarations found in a file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ModuleDeclaration {
    /// Qualifier from the first matching line, e.g. `com.example`.
    pub qualifier: Option<String>,

    /// Number of lines matching the qualifier pattern anywhere in the file.
    pub count: usize,
}

impl ModuleDeclaration {
    /// The qualifier, only when exactly one declaration was seen.
    pub fn unambiguous(&self) -> Option<&str> {
        if self.count == 1 {
            self.qualifier.as_deref()
        } else {
            None
        }
    }
}

/// Result of inspecting one file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Inspection {
    pub declaration: ModuleDeclaration,

    /// Whether the file defines a type named after its base name.
    pub has_primary_type: bool,
}

/// Scans a source file against its language's qualifier and type patterns.
pub struct ModuleInspector;

impl ModuleInspector {
    /// Inspect a file on disk.
    ///
    /// # Errors
    /// Returns [`Error::Inspection`] if the file cannot be opened or read.
    pub fn inspect(file: &Path, language: Language) -> Result<Inspection> {
        let handle = File::open(file).map_err(|source| Error::Inspection {
            path: file.to_path_buf(),
            source,
        })?;
        Self::inspect_reader(BufReader::new(handle), file, language)
    }

    /// Inspect already-open content. `file` supplies the base name that the
    /// type-definition pattern must match.
    pub fn inspect_reader<R: BufRead>(
        mut reader: R,
        file: &Path,
        language: Language,
    ) -> Result<Inspection> {
        let qualifier_re = language.qualifier_pattern();
        let type_re = paths::base_name(file).map(|name| language.type_pattern(name));

        let mut inspection = Inspection::default();
        let mut buf = Vec::new();
        loop {
            buf.clear();
            let read = reader
                .read_until(b'\n', &mut buf)
                .map_err(|source| Error::Inspection {
                    path: file.to_path_buf(),
                    source,
                })?;
            if read == 0 {
                break;
            }
            // Sources in legacy encodings are still readable; only the
            // ASCII keywords and names have to match.
            let line = String::from_utf8_lossy(&buf);
            let line = line.trim_end_matches(['\n', '\r']);

            if let Some(caps) = qualifier_re.captures(line) {
                inspection.declaration.count += 1;
                if inspection.declaration.qualifier.is_none() {
                    inspection.declaration.qualifier = Some(caps[1].to_string());
                }
            }

            if !inspection.has_primary_type {
                inspection.has_primary_type = type_re.as_ref().is_some_and(|re| re.is_match(line));
            }
        }

        Ok(inspection)
    }

    /// Inspect in-memory source text.
    pub fn inspect_str(source: &str, file: &Path, language: Language) -> Inspection {
        // Reading from a string slice cannot fail.
        Self::inspect_reader(source.as_bytes(), file, language).unwrap_or_default()
    }
}
