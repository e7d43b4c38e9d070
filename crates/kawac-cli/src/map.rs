//! Map command implementation for kawac CLI.
//!
//! Prints the class file each source is predicted to produce. Needs no
//! toolchain.

use std::path::Path;

use kawac_core::{ArtifactTarget, BuildProject, Kawac};

use crate::colors;
use crate::workspace;

/// Print the artifact mapping of the selected modules.
pub fn execute(manifest: Option<&Path>, module: Option<&str>, json: bool) -> anyhow::Result<()> {
    let project = workspace::load(manifest)?;
    let modules = workspace::selected(&project, module)?;

    if json {
        let mut out = serde_json::Map::new();
        for module in &modules {
            let mapping = Kawac::compile_map(module.source_roots(), module.target_dir())?;
            out.insert(module.name().to_string(), mapping.to_json());
        }
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    for module in &modules {
        let mapping = Kawac::compile_map(module.source_roots(), module.target_dir())?;
        println!(
            "\n{}{}{} → {}",
            colors::BOLD,
            module.name(),
            colors::RESET,
            module.target_dir().display()
        );

        if mapping.is_empty() {
            println!("  {}no sources{}", colors::DIM, colors::RESET);
            continue;
        }

        for (source, target) in mapping.entries() {
            let shown = source
                .strip_prefix(module.base_dir())
                .unwrap_or(source.as_path())
                .display();
            match target {
                ArtifactTarget::Nested(path) => {
                    let rel = path.strip_prefix(module.target_dir()).unwrap_or(path.as_path());
                    println!("  {} → {}", shown, rel.display());
                }
                ArtifactTarget::Flat(_) => {
                    println!("  {} → {}(whole target){}", shown, colors::DIM, colors::RESET);
                }
            }
        }

        for failure in mapping.failures() {
            println!("  {}warning:{} {}", colors::YELLOW, colors::RESET, failure);
        }
    }

    Ok(())
}
