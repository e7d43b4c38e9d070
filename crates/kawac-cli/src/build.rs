//! Build command implementation for kawac CLI.
//!
//! Compiles the selected modules in dependency order, stopping at the first
//! failure.

use std::path::Path;
use std::time::Instant;

use kawac_core::{AmbientSettings, BuildProject, Kawac, SystemRunner};

use crate::colors;
use crate::workspace;

/// Build the project's modules.
pub fn execute(
    manifest: Option<&Path>,
    module: Option<&str>,
    ambient: &AmbientSettings,
) -> anyhow::Result<()> {
    let start = Instant::now();

    let project = workspace::load(manifest)?;
    let modules = workspace::build_order(&project, module)?;
    let kawac = Kawac::detect()?;

    let verb = if ambient.dry_run { "Planning" } else { "Building" };
    println!(
        "\n{}{}{} {} ({} module{})",
        colors::BOLD,
        verb,
        colors::RESET,
        project.manifest_path().display(),
        modules.len(),
        if modules.len() == 1 { "" } else { "s" }
    );

    let mut compiled = 0;
    for module in &modules {
        if !Kawac::applies_to(module.source_roots()) {
            println!(
                "  {}{} skipped (no Kawa sources){}",
                colors::DIM,
                module.name(),
                colors::RESET
            );
            continue;
        }

        let report = kawac.compile(*module, ambient, SystemRunner)?;

        if report.up_to_date {
            println!("  {}{} up to date{}", colors::DIM, module.name(), colors::RESET);
        } else if report.dry_run {
            println!("  {}{}{}", colors::CYAN, module.name(), colors::RESET);
            for command in &report.commands {
                println!("    {}", command);
            }
        } else {
            compiled += 1;
            let retry = if report.retried() {
                format!(" {}(Kawa retried after Java){}", colors::YELLOW, colors::RESET)
            } else {
                String::new()
            };
            println!("  {}✓{} {}{}", colors::GREEN, colors::RESET, module.name(), retry);
        }
    }

    if !ambient.dry_run {
        println!(
            "\n{}Completed{} {} module{} in {:.2}s",
            colors::GREEN,
            colors::RESET,
            compiled,
            if compiled == 1 { "" } else { "s" },
            start.elapsed().as_secs_f64()
        );
    }

    Ok(())
}
