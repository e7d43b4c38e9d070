//! Doctor command implementation for kawac CLI.

use kawac_core::compile::{KAWA_HOME_ENV, KAWA_JAR, find_javac};
use kawac_core::KawaToolchain;

use crate::colors;

/// Report the toolchains kawac would use.
pub fn execute() -> anyhow::Result<()> {
    println!("\n{}kawac doctor{}", colors::BOLD, colors::RESET);

    let kawa = KawaToolchain::detect();
    match &kawa {
        Ok(toolchain) => {
            ok(KAWA_HOME_ENV, &toolchain.home().display().to_string());
            ok(KAWA_JAR, &toolchain.runtime_jar().display().to_string());
            ok("launcher", &toolchain.launcher().display().to_string());
        }
        Err(err) => {
            println!("  {}✗{} {}", colors::RED, colors::RESET, err.with_hint());
        }
    }

    match find_javac() {
        Ok(javac) => ok("javac", &javac.display().to_string()),
        Err(err) => println!(
            "  {}!{} {} {}(only needed for modules with Java sources){}",
            colors::YELLOW,
            colors::RESET,
            err,
            colors::DIM,
            colors::RESET
        ),
    }

    if kawa.is_err() {
        anyhow::bail!("Kawa toolchain is not usable");
    }
    Ok(())
}

fn ok(label: &str, value: &str) {
    println!("  {}✓{} {:<10} {}", colors::GREEN, colors::RESET, label, value);
}
