//! Compilation pipeline for mixed Kawa/Java modules.
//!
//! This module provides:
//! - Toolchain management (`KAWA_HOME` and `javac` discovery)
//! - Compiler invocations and the process runner seam
//! - The secondary (Java) compiler
//! - Orchestration of both compilers over a shared target directory
//!
//! # Architecture
//!
//! ```text
//! CompileRequest
//!     │
//!     ├── Kawa sources ──► kawa -d <target> -C ... ──┐  (retried once on failure)
//!     │                                              ▼
//!     └── Java sources ──► javac -d <target> ...  ◄── target on classpath
//! ```

mod invocation;
mod javac;
mod orchestrator;
mod toolchain;
mod types;

pub use invocation::{Invocation, ProcessRunner, SystemRunner};
pub use javac::{Javac, ResolvedJavacOptions, SecondaryCompiler};
pub use orchestrator::CompilerOrchestrator;
pub use toolchain::{KAWA_HOME_ENV, KAWA_JAR, KawaToolchain, find_javac};
pub use types::{BuildReport, CompileRequest, STRICT_DIAGNOSTIC_FLAGS, Stage, StepOutcome};
