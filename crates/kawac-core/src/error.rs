//! Error types for kawac-core.

use std::path::PathBuf;

use thiserror::Error;

use crate::source::Language;

/// Result type for kawac-core operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in kawac-core.
#[derive(Debug, Error)]
pub enum Error {
    /// The toolchain or project configuration is unusable.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A source file could not be read while predicting its artifact.
    #[error("failed to inspect {}: {source}", path.display())]
    Inspection {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A compiler process exited unsuccessfully and no retry is left.
    #[error("{language} compilation failed after {attempts} attempt{}", if *attempts == 1 { "" } else { "s" })]
    CompileFailure { language: Language, attempts: u8 },

    /// A compiler process could not be started.
    #[error("failed to launch {}: {source}", program.display())]
    Launch {
        program: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Classpath entries could not be joined for the platform.
    #[error("invalid classpath: {0}")]
    Classpath(String),

    /// Cyclic dependency between project modules.
    #[error("cyclic dependency detected: {0}")]
    CyclicDependency(String),

    /// Failed to parse a project manifest.
    #[error("manifest error in {}: {source}", path.display())]
    Manifest {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Human-readable recovery hint for errors a user can fix directly.
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Self::Configuration(msg) if msg.contains(crate::compile::KAWA_HOME_ENV) => {
                Some("set KAWA_HOME to the Kawa installation directory containing kawa.jar")
            }
            Self::CompileFailure { .. } => {
                Some("compiler diagnostics are printed above; partial output was kept under the target directory")
            }
            Self::CyclicDependency(_) => Some("remove one of the depends_on entries forming the cycle"),
            _ => None,
        }
    }

    /// Format the error together with its hint, if any.
    pub fn with_hint(&self) -> String {
        match self.hint() {
            Some(hint) => format!("{self}\n  hint: {hint}"),
            None => self.to_string(),
        }
    }
}
