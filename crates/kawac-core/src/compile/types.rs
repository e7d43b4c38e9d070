//! Common types for the compilation pipeline.

use std::path::PathBuf;

use crate::classpath::ClasspathSpec;
use crate::options::BuildOptions;
use crate::source::{Language, SourceSet};

/// Flags making the Kawa compiler fail on undefined variables and unknown
/// method invocations.
pub const STRICT_DIAGNOSTIC_FLAGS: [&str; 3] = [
    "--warn-undefined-variable",
    "--warn-invoke-unknown-method",
    "--warn-as-error",
];

/// Input of one orchestrated build step.
#[derive(Debug, Clone)]
pub struct CompileRequest {
    /// Kawa sources, compiled first.
    pub primary_sources: SourceSet,

    /// Java sources, compiled against the Kawa output.
    pub secondary_sources: SourceSet,

    /// Output directory shared by both compilers.
    pub target: PathBuf,

    /// Classpath for the primary compiler.
    pub classpath: ClasspathSpec,

    pub options: BuildOptions,
}

/// Stages of the orchestration state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Primary,
    Secondary { primary_succeeded: bool },
    PrimaryRetry,
    Done,
}

/// What happened to one language's compiler during a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepOutcome {
    pub language: Language,

    /// Number of invocations (0 in a dry run).
    pub attempts: u8,

    pub succeeded: bool,
}

/// Successful (or dry-run) result of a build step.
#[derive(Debug, Clone, Default)]
pub struct BuildReport {
    /// Primary compiler outcome; `None` when there were no Kawa sources.
    pub primary: Option<StepOutcome>,

    /// Secondary compiler outcome; `None` when there were no Java sources.
    pub secondary: Option<StepOutcome>,

    /// Whether the build was traced rather than executed.
    pub dry_run: bool,

    /// Rendered commands, in the order they ran (or would run).
    pub commands: Vec<String>,

    /// Skipped because every mapped artifact was current.
    pub up_to_date: bool,
}

impl BuildReport {
    /// Whether the primary step needed its retry.
    pub fn retried(&self) -> bool {
        self.primary.is_some_and(|p| p.attempts > 1)
    }

    /// Report for a unit skipped by the incremental check.
    pub fn skipped(dry_run: bool) -> Self {
        Self {
            dry_run,
            up_to_date: true,
            ..Default::default()
        }
    }

    /// Whether anything was compiled (or would be, in a dry run).
    pub fn is_empty(&self) -> bool {
        self.primary.is_none() && self.secondary.is_none()
    }
}
