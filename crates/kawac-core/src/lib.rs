//! Core engine for kawac, the mixed Kawa/Java build driver.
//!
//! This crate provides:
//! - Source classification and class-file target prediction
//! - Classpath composition for both compilers
//! - Option resolution through nested module scopes
//! - Compiler orchestration with a single primary retry
//! - Project manifests and module ordering

pub mod classpath;
pub mod compile;
pub mod compiler;
pub mod error;
pub mod options;
pub mod paths;
pub mod project;
pub mod source;

pub use classpath::{ClasspathComposer, ClasspathSpec};
pub use compile::{
    BuildReport, CompileRequest, CompilerOrchestrator, Javac, KawaToolchain, ProcessRunner,
    SecondaryCompiler, SystemRunner,
};
pub use compiler::{BuildProject, Kawac};
pub use error::{Error, Result};
pub use options::{AmbientSettings, BuildOptions, LocalOptions, OptionScope, OptionsResolver};
pub use project::{Manifest, ModuleGraph, Project};
pub use source::{
    ArtifactMapping, ArtifactTarget, ClassifiedSources, Language, ModuleInspector, SourceClassifier,
    SourceSet, TargetMapper,
};
