//! Host-facing compiler identity.
//!
//! A host build tool sees kawac through [`Kawac`]: static metadata, an
//! applicability check, the artifact mapping used for staleness, and
//! `compile` for one [`BuildProject`].

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::classpath::ClasspathComposer;
use crate::compile::{
    BuildReport, CompileRequest, CompilerOrchestrator, Javac, KawaToolchain, ProcessRunner,
    ResolvedJavacOptions, find_javac,
};
use crate::error::Result;
use crate::options::{AmbientSettings, OptionScope};
use crate::source::{
    ArtifactMapping, Language, SourceClassifier, TARGET_EXT, TargetMapper, needs_compile,
};

/// What the compiler needs from the host's notion of a module.
pub trait BuildProject {
    /// Module name, used in logs.
    fn name(&self) -> &str;

    /// Source directories and files.
    fn source_roots(&self) -> &[PathBuf];

    /// Dependency artifacts (jars or class directories), in search order.
    fn dependencies(&self) -> &[PathBuf];

    /// Output directory for class files.
    fn target_dir(&self) -> &Path;

    /// Option scope of this module.
    fn option_scope(&self) -> &Arc<OptionScope>;
}

/// The kawac compiler: a Kawa toolchain plus the `javac` used for
/// co-located Java sources.
#[derive(Debug, Clone)]
pub struct Kawac {
    toolchain: KawaToolchain,
    javac: PathBuf,
}

impl Kawac {
    pub const IDENTITY: &'static str = "kawac";
    pub const LANGUAGE: Language = Language::Kawa;
    pub const SOURCE_LANGUAGES: [Language; 2] = Language::ALL;
    pub const SOURCE_EXTENSIONS: [&'static str; 2] = ["scm", "java"];
    pub const TARGET: &'static str = "classes";
    pub const TARGET_EXT: &'static str = TARGET_EXT;
    pub const PACKAGING: &'static str = "jar";

    pub fn new(toolchain: KawaToolchain, javac: impl Into<PathBuf>) -> Self {
        Self {
            toolchain,
            javac: javac.into(),
        }
    }

    /// Detect Kawa from `KAWA_HOME` and `javac` from `JAVA_HOME` or `PATH`.
    ///
    /// A missing `javac` is not an error here; it only matters once a module
    /// with Java sources is compiled, and then surfaces as a launch failure.
    pub fn detect() -> Result<Self> {
        let toolchain = KawaToolchain::detect()?;
        let javac = find_javac().unwrap_or_else(|e| {
            tracing::debug!("{e}; falling back to `javac`");
            PathBuf::from("javac")
        });
        Ok(Self::new(toolchain, javac))
    }

    pub fn toolchain(&self) -> &KawaToolchain {
        &self.toolchain
    }

    pub fn javac(&self) -> &Path {
        &self.javac
    }

    /// Whether any of `paths` holds a Kawa source.
    pub fn applies_to<P: AsRef<Path>>(paths: &[P]) -> bool {
        SourceClassifier::contains_any(paths, Self::LANGUAGE)
    }

    /// Predicted artifacts of `sources` compiled into `target`.
    pub fn compile_map<P: AsRef<Path>>(sources: &[P], target: &Path) -> Result<ArtifactMapping> {
        let classified = SourceClassifier::classify(sources)?;
        Ok(TargetMapper::map(&classified, target))
    }

    /// Build the orchestrator input for `project`.
    pub fn request(
        project: &dyn BuildProject,
        ambient: &AmbientSettings,
    ) -> Result<CompileRequest> {
        let classified = SourceClassifier::classify(project.source_roots())?;
        Ok(CompileRequest {
            primary_sources: classified.kawa,
            secondary_sources: classified.java,
            target: project.target_dir().to_path_buf(),
            classpath: ClasspathComposer::compose(project.dependencies(), project.source_roots()),
            options: project.option_scope().resolve(ambient),
        })
    }

    /// Whether `project` must be compiled. Always true unless its resolved
    /// options are incremental.
    pub fn needed(project: &dyn BuildProject, ambient: &AmbientSettings) -> Result<bool> {
        let options = project.option_scope().resolve(ambient);
        if !options.incremental {
            return Ok(true);
        }
        let mapping = Self::compile_map(project.source_roots(), project.target_dir())?;
        Ok(needs_compile(&mapping, project.target_dir(), project.dependencies()))
    }

    /// Compile `project`, spawning processes through `runner`.
    ///
    /// Incremental modules whose artifacts are current are skipped and
    /// reported as up to date.
    pub fn compile<R: ProcessRunner>(
        &self,
        project: &dyn BuildProject,
        ambient: &AmbientSettings,
        runner: R,
    ) -> Result<BuildReport> {
        if !Self::needed(project, ambient)? {
            tracing::info!("{} is up to date", project.name());
            return Ok(BuildReport::skipped(ambient.dry_run));
        }

        let request = Self::request(project, ambient)?;

        let javac = Javac::new(
            &self.javac,
            ResolvedJavacOptions::from_build(&request.options),
            &runner,
        );
        let orchestrator = CompilerOrchestrator::new(self.toolchain.clone(), &runner, javac);

        tracing::info!("Compiling {}", project.name());
        orchestrator.run(&request, ambient.dry_run)
    }
}
