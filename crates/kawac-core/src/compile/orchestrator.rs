//! Sequencing of the Kawa and Java compilers for one build step.
//!
//! ```text
//!            ┌──────────┐  java sources   ┌───────────┐  kawa failed  ┌──────────────┐
//!  start ──► │ Primary  │ ──────────────► │ Secondary │ ────────────► │ PrimaryRetry │
//!            └──────────┘                 └───────────┘               └──────────────┘
//!                 │ no java sources             │ kawa succeeded             │
//!                 ▼                             ▼                            ▼
//!                Done ◄──────────────────────  Done  ◄─────────────────────  Done
//! ```
//!
//! The retry covers Kawa sources that reference Java classes: those resolve
//! only once javac has written them to the shared target directory. There is
//! exactly one retry; its failure is terminal.

use std::fs;
use std::path::Path;

use crate::error::{Error, Result};
use crate::paths;
use crate::source::Language;

use super::invocation::{Invocation, ProcessRunner};
use super::javac::SecondaryCompiler;
use super::toolchain::KawaToolchain;
use super::types::{BuildReport, CompileRequest, STRICT_DIAGNOSTIC_FLAGS, Stage, StepOutcome};

/// Drives one build step through its stages.
pub struct CompilerOrchestrator<R, S> {
    /// Kawa installation
    toolchain: KawaToolchain,

    /// Runs the primary compiler process
    runner: R,

    /// Compiler for co-located Java sources
    secondary: S,
}

impl<R: ProcessRunner, S: SecondaryCompiler> CompilerOrchestrator<R, S> {
    pub fn new(toolchain: KawaToolchain, runner: R, secondary: S) -> Self {
        Self {
            toolchain,
            runner,
            secondary,
        }
    }

    pub fn toolchain(&self) -> &KawaToolchain {
        &self.toolchain
    }

    /// The Kawa invocation for `request`, compiling into `target`.
    ///
    /// `kawa -d <target> [strict flags] [extra args] -C <sources...>` with the
    /// composed classpath in `CLASSPATH`.
    pub fn primary_invocation(
        &self,
        request: &CompileRequest,
        target: &Path,
    ) -> Result<Invocation> {
        let options = &request.options;
        let mut inv = Invocation::new(self.toolchain.launcher())
            .env("CLASSPATH", request.classpath.join()?)
            .arg("-d")
            .arg(target);
        if options.diagnostics_strict {
            inv = inv.args(STRICT_DIAGNOSTIC_FLAGS);
        }
        Ok(inv
            .args(&options.extra_args)
            .arg("-C")
            .args(request.primary_sources.files()))
    }

    /// Run the build step.
    ///
    /// With `dry_run` no process is spawned and nothing is written; the
    /// report lists the commands that would run.
    ///
    /// # Errors
    /// - [`Error::CompileFailure`] naming the language whose compiler failed
    ///   terminally. The target directory keeps whatever was produced.
    /// - [`Error::Launch`] if a compiler could not be started.
    pub fn run(&self, request: &CompileRequest, dry_run: bool) -> Result<BuildReport> {
        let mut report = BuildReport {
            dry_run,
            ..Default::default()
        };

        let has_primary = !request.primary_sources.is_empty();
        let has_secondary = !request.secondary_sources.is_empty();
        if !has_primary && !has_secondary {
            tracing::info!("No sources to compile for {}", request.target.display());
            return Ok(report);
        }

        let target = paths::absolutize(&request.target)?;
        let primary = if has_primary {
            Some(self.primary_invocation(request, &target)?)
        } else {
            None
        };
        let secondary_deps = request
            .classpath
            .for_secondary(&self.toolchain.support_artifacts(), &target);

        if dry_run {
            if let Some(inv) = &primary {
                report.commands.push(inv.to_string());
                report.primary = Some(skipped(Language::Kawa));
            }
            if has_secondary {
                report.commands.push(self.secondary.describe(
                    request.secondary_sources.files(),
                    &target,
                    &secondary_deps,
                ));
                report.secondary = Some(skipped(self.secondary.language()));
            }
            for command in &report.commands {
                tracing::info!("dry run: {}", command);
            }
            return Ok(report);
        }

        fs::create_dir_all(&target)?;

        let mut stage = match &primary {
            Some(_) => Stage::Primary,
            None => Stage::Secondary {
                primary_succeeded: true,
            },
        };

        loop {
            stage = match (stage, &primary) {
                (Stage::Primary, Some(inv)) => {
                    tracing::info!(
                        "Compiling {} Kawa sources into {}",
                        request.primary_sources.len(),
                        target.display()
                    );
                    let succeeded = self.run_primary(inv, &mut report)?;
                    report.primary = Some(StepOutcome {
                        language: Language::Kawa,
                        attempts: 1,
                        succeeded,
                    });

                    if has_secondary {
                        Stage::Secondary {
                            primary_succeeded: succeeded,
                        }
                    } else if succeeded {
                        Stage::Done
                    } else {
                        return Err(failure(Language::Kawa, 1));
                    }
                }

                (Stage::Secondary { primary_succeeded }, _) => {
                    tracing::info!(
                        "Compiling {} mixed {} sources against {}",
                        request.secondary_sources.len(),
                        self.secondary.language(),
                        target.display()
                    );
                    let sources = request.secondary_sources.files();
                    report
                        .commands
                        .push(self.secondary.describe(sources, &target, &secondary_deps));
                    let succeeded = self.secondary.compile(sources, &target, &secondary_deps)?;
                    report.secondary = Some(StepOutcome {
                        language: self.secondary.language(),
                        attempts: 1,
                        succeeded,
                    });

                    if !succeeded {
                        if !primary_succeeded {
                            tracing::error!("Kawa compilation had failed before the Java step");
                        }
                        return Err(failure(self.secondary.language(), 1));
                    }
                    if primary_succeeded {
                        Stage::Done
                    } else {
                        Stage::PrimaryRetry
                    }
                }

                (Stage::PrimaryRetry, Some(inv)) => {
                    tracing::warn!("Retrying Kawa compilation after Java compilation");
                    let succeeded = self.run_primary(inv, &mut report)?;
                    report.primary = Some(StepOutcome {
                        language: Language::Kawa,
                        attempts: 2,
                        succeeded,
                    });
                    if !succeeded {
                        return Err(failure(Language::Kawa, 2));
                    }
                    Stage::Done
                }

                // Primary stages are only entered with a primary invocation.
                (Stage::Primary | Stage::PrimaryRetry, None) | (Stage::Done, _) => break,
            };
        }

        Ok(report)
    }

    fn run_primary(&self, inv: &Invocation, report: &mut BuildReport) -> Result<bool> {
        report.commands.push(inv.to_string());
        tracing::debug!("kawac: {}", inv);
        self.runner.run(inv)
    }
}

fn skipped(language: Language) -> StepOutcome {
    StepOutcome {
        language,
        attempts: 0,
        succeeded: true,
    }
}

fn failure(language: Language, attempts: u8) -> Error {
    tracing::error!("{} compilation failed after {} attempt(s)", language, attempts);
    Error::CompileFailure { language, attempts }
}
