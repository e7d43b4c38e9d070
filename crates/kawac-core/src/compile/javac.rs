//! Secondary compiler for Java sources co-located with Kawa sources.

use std::path::{Path, PathBuf};

use crate::classpath;
use crate::error::Result;
use crate::options::{BuildOptions, JavacOptions};
use crate::source::Language;

use super::invocation::{Invocation, ProcessRunner};

/// A compiler run after the primary compiler, against its output.
pub trait SecondaryCompiler {
    /// Language this compiler handles.
    fn language(&self) -> Language {
        Language::Java
    }

    /// Compile `sources` into `target` with `dependencies` on the classpath.
    /// Returns whether the compiler succeeded.
    fn compile(
        &self,
        sources: &[PathBuf],
        target: &Path,
        dependencies: &[PathBuf],
    ) -> Result<bool>;

    /// Rendered command for dry runs and traces.
    fn describe(&self, sources: &[PathBuf], target: &Path, dependencies: &[PathBuf]) -> String;
}

impl<S: SecondaryCompiler + ?Sized> SecondaryCompiler for &S {
    fn language(&self) -> Language {
        (**self).language()
    }

    fn compile(
        &self,
        sources: &[PathBuf],
        target: &Path,
        dependencies: &[PathBuf],
    ) -> Result<bool> {
        (**self).compile(sources, target, dependencies)
    }

    fn describe(&self, sources: &[PathBuf], target: &Path, dependencies: &[PathBuf]) -> String {
        (**self).describe(sources, target, dependencies)
    }
}

/// `javac` driven through a [`ProcessRunner`].
#[derive(Debug, Clone)]
pub struct Javac<R> {
    program: PathBuf,
    options: ResolvedJavacOptions,
    runner: R,
}

/// Javac options with inherited defaults applied.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedJavacOptions {
    pub warnings: bool,
    pub debug: bool,
    pub deprecation: bool,
    pub source: Option<String>,
    pub target: Option<String>,
    pub lint: Option<String>,
    pub extra_args: Vec<String>,
}

impl ResolvedJavacOptions {
    /// Apply build-level defaults to the javac option block.
    pub fn from_build(options: &BuildOptions) -> Self {
        let JavacOptions {
            warnings,
            debug,
            deprecation,
            source,
            target,
            lint,
            extra_args,
        } = options.javac.clone();
        Self {
            warnings: warnings.unwrap_or(options.diagnostics_strict),
            debug: debug.unwrap_or(options.debug_symbols),
            deprecation,
            source,
            target,
            lint,
            extra_args,
        }
    }
}

impl<R: ProcessRunner> Javac<R> {
    pub fn new(program: impl Into<PathBuf>, options: ResolvedJavacOptions, runner: R) -> Self {
        Self {
            program: program.into(),
            options,
            runner,
        }
    }

    /// Build the javac invocation.
    pub fn invocation(
        &self,
        sources: &[PathBuf],
        target: &Path,
        dependencies: &[PathBuf],
    ) -> Result<Invocation> {
        let opts = &self.options;
        let mut inv = Invocation::new(&self.program);

        if !opts.warnings {
            inv = inv.arg("-nowarn");
        }
        if opts.debug {
            inv = inv.arg("-g");
        }
        if opts.deprecation {
            inv = inv.arg("-deprecation");
        }
        if let Some(source) = &opts.source {
            inv = inv.arg("-source").arg(source);
        }
        if let Some(release) = &opts.target {
            inv = inv.arg("-target").arg(release);
        }
        match opts.lint.as_deref() {
            Some("") => inv = inv.arg("-Xlint"),
            Some(lint) => inv = inv.arg(format!("-Xlint:{lint}")),
            None => {}
        }
        inv = inv.args(&opts.extra_args);

        if !dependencies.is_empty() {
            inv = inv.arg("-classpath").arg(classpath::join(dependencies)?);
        }
        Ok(inv.arg("-d").arg(target).args(sources))
    }
}

impl<R: ProcessRunner> SecondaryCompiler for Javac<R> {
    fn compile(
        &self,
        sources: &[PathBuf],
        target: &Path,
        dependencies: &[PathBuf],
    ) -> Result<bool> {
        let inv = self.invocation(sources, target, dependencies)?;
        tracing::debug!("javac: {}", inv);
        self.runner.run(&inv)
    }

    fn describe(&self, sources: &[PathBuf], target: &Path, dependencies: &[PathBuf]) -> String {
        self.invocation(sources, target, dependencies)
            .map(|inv| inv.to_string())
            .unwrap_or_else(|e| format!("{} <{e}>", self.program.display()))
    }
}
