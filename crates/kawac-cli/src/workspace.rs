//! Locating and loading the project for a command.

use std::path::Path;

use anyhow::Context;
use kawac_core::Project;
use kawac_core::project::{MANIFEST_FILE, Manifest, Module};

/// Load the project from `manifest`, or from the nearest `kawac.toml`.
pub fn load(manifest: Option<&Path>) -> anyhow::Result<Project> {
    let path = match manifest {
        Some(path) => path.to_path_buf(),
        None => {
            let cwd = std::env::current_dir().context("Failed to read current directory")?;
            Manifest::find(&cwd).ok_or_else(|| {
                anyhow::anyhow!(
                    "No {} found in {} or its parents",
                    MANIFEST_FILE,
                    cwd.display()
                )
            })?
        }
    };

    if !path.is_file() {
        anyhow::bail!("Manifest not found: {}", path.display());
    }

    Ok(Project::load(&path)?)
}

/// Modules to build: one module with its dependencies, or everything.
pub fn build_order<'a>(
    project: &'a Project,
    module: Option<&str>,
) -> anyhow::Result<Vec<&'a Module>> {
    Ok(match module {
        Some(name) => project.build_order_for(name)?,
        None => project.build_order()?,
    })
}

/// Modules to inspect: exactly the named one, or everything in manifest order.
pub fn selected<'a>(project: &'a Project, module: Option<&str>) -> anyhow::Result<Vec<&'a Module>> {
    match module {
        Some(name) => {
            let found = project
                .module(name)
                .ok_or_else(|| anyhow::anyhow!("No module named '{}'", name))?;
            Ok(vec![found])
        }
        None => Ok(project.modules().iter().collect()),
    }
}
