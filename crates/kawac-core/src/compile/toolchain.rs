//! Toolchain management for kawac compilation.
//!
//! Locates the Kawa installation named by `KAWA_HOME` and the `javac` used
//! for co-located Java sources.

use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Environment variable naming the Kawa installation root.
pub const KAWA_HOME_ENV: &str = "KAWA_HOME";

/// Runtime jar that must exist under `KAWA_HOME`.
pub const KAWA_JAR: &str = "kawa.jar";

/// A usable Kawa installation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KawaToolchain {
    /// Installation root
    home: PathBuf,

    /// Program launched for compilation
    launcher: PathBuf,
}

impl KawaToolchain {
    /// Detect the toolchain from `KAWA_HOME`.
    ///
    /// # Errors
    /// Returns [`Error::Configuration`] if the variable is unset or does not
    /// name a valid installation.
    pub fn detect() -> Result<Self> {
        let home = std::env::var_os(KAWA_HOME_ENV)
            .filter(|v| !v.is_empty())
            .ok_or_else(|| Error::Configuration(format!("{KAWA_HOME_ENV} is not set")))?;
        Self::from_home(home)
    }

    /// Use the installation rooted at `home`.
    ///
    /// The launcher is `<home>/bin/kawa` when present, otherwise `kawa` from
    /// `PATH`.
    pub fn from_home(home: impl Into<PathBuf>) -> Result<Self> {
        let home: PathBuf = home.into();
        let jar = home.join(KAWA_JAR);
        if !jar.is_file() {
            return Err(Error::Configuration(format!(
                "{KAWA_HOME_ENV}={} does not contain {KAWA_JAR}",
                home.display()
            )));
        }

        let launcher = Self::find_launcher(&home)?;
        tracing::debug!("Using Kawa at {} (launcher {})", home.display(), launcher.display());

        Ok(Self { home, launcher })
    }

    /// Use an explicit launcher, still validating the installation jar.
    pub fn with_launcher(home: impl Into<PathBuf>, launcher: impl Into<PathBuf>) -> Result<Self> {
        let home: PathBuf = home.into();
        if !home.join(KAWA_JAR).is_file() {
            return Err(Error::Configuration(format!(
                "{} does not contain {KAWA_JAR}",
                home.display()
            )));
        }
        Ok(Self {
            home,
            launcher: launcher.into(),
        })
    }

    pub fn home(&self) -> &Path {
        &self.home
    }

    pub fn launcher(&self) -> &Path {
        &self.launcher
    }

    /// Path to `kawa.jar`.
    pub fn runtime_jar(&self) -> PathBuf {
        self.home.join(KAWA_JAR)
    }

    /// Artifacts compiled Kawa code needs at compile and run time. Java
    /// sources compiled in the same step see these on their classpath.
    pub fn support_artifacts(&self) -> Vec<PathBuf> {
        vec![self.runtime_jar()]
    }

    fn find_launcher(home: &Path) -> Result<PathBuf> {
        let bundled = home.join("bin").join(if cfg!(windows) { "kawa.bat" } else { "kawa" });
        if bundled.is_file() {
            return Ok(bundled);
        }
        which::which("kawa").map_err(|_| {
            Error::Configuration(format!(
                "no kawa launcher in {} or on PATH",
                home.join("bin").display()
            ))
        })
    }
}

/// Locate `javac` from `JAVA_HOME`, falling back to `PATH`.
pub fn find_javac() -> Result<PathBuf> {
    if let Some(java_home) = std::env::var_os("JAVA_HOME").filter(|v| !v.is_empty()) {
        let javac = PathBuf::from(java_home)
            .join("bin")
            .join(if cfg!(windows) { "javac.exe" } else { "javac" });
        if javac.is_file() {
            return Ok(javac);
        }
    }
    which::which("javac")
        .map_err(|_| Error::Configuration("javac not found in JAVA_HOME or PATH".to_string()))
}
