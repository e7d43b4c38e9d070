//! End-to-end tests for kawac CLI commands.
//!
//! These run the binary against manifests in temporary directories. Builds
//! use `--dry-run` against a fake Kawa installation, so no JVM is needed.

#![allow(deprecated)] // Allow deprecated Command::cargo_bin for tests

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

// =============================================================================
// Test Helpers
// =============================================================================

/// A temporary project with one mixed module.
struct TestProject {
    temp_dir: TempDir,
}

impl TestProject {
    fn new(manifest: &str) -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let root = temp_dir.path();

        let kawa = root.join("src/main/kawa/com/example");
        let java = root.join("src/main/java/com/example");
        fs::create_dir_all(&kawa).expect("Failed to create source dirs");
        fs::create_dir_all(&java).expect("Failed to create source dirs");
        fs::write(
            kawa.join("Foo.scm"),
            "(module-name com.example.)\n(define-simple-class Foo ())\n",
        )
        .expect("Failed to write Foo.scm");
        fs::write(
            java.join("Bar.java"),
            "package com.example;\npublic class Bar extends Foo {}\n",
        )
        .expect("Failed to write Bar.java");
        fs::write(kawa.join("helpers.scm"), "(define (twice x) (* 2 x))\n")
            .expect("Failed to write helpers.scm");
        fs::write(root.join("kawac.toml"), manifest).expect("Failed to write manifest");

        Self { temp_dir }
    }

    fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// A Kawa installation with an empty jar and launcher.
    fn fake_kawa_home(&self) -> PathBuf {
        let home = self.path().join("kawa-home");
        fs::create_dir_all(home.join("bin")).expect("Failed to create kawa home");
        fs::write(home.join("kawa.jar"), b"").expect("Failed to write kawa.jar");
        let launcher = if cfg!(windows) { "kawa.bat" } else { "kawa" };
        fs::write(home.join("bin").join(launcher), b"").expect("Failed to write launcher");
        home
    }

    fn kawac(&self) -> Command {
        let mut cmd = Command::cargo_bin("kawac").expect("Failed to find kawac binary");
        cmd.current_dir(self.path()).env_remove("KAWA_HOME");
        cmd
    }
}

// =============================================================================
// Map Command Tests
// =============================================================================

#[test]
fn test_map_json() {
    let project = TestProject::new("name = \"app\"\n");

    let output = project
        .kawac()
        .args(["map", "--json"])
        .output()
        .expect("Failed to execute command");
    assert!(
        output.status.success(),
        "kawac map should succeed. stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let json: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("map --json should print JSON");
    let app = json["app"].as_object().expect("Should have an entry for module 'app'");
    assert_eq!(app.len(), 3, "Should map all three sources: {app:?}");

    let foo = app
        .iter()
        .find(|(source, _)| source.ends_with("Foo.scm"))
        .map(|(_, target)| target)
        .expect("Should map Foo.scm");
    assert_eq!(foo["kind"], "nested");
    let foo_path = PathBuf::from(foo["path"].as_str().unwrap());
    assert!(foo_path.ends_with("target/classes/com/example/Foo.class"));

    let helpers = app
        .iter()
        .find(|(source, _)| source.ends_with("helpers.scm"))
        .map(|(_, target)| target)
        .expect("Should map helpers.scm");
    assert_eq!(helpers["kind"], "flat");
}

#[test]
fn test_map_text() {
    let project = TestProject::new("name = \"app\"\n");

    project
        .kawac()
        .arg("map")
        .assert()
        .success()
        .stdout(predicate::str::contains("app"))
        .stdout(predicate::str::contains("Foo.class"))
        .stdout(predicate::str::contains("(whole target)"));
}

#[test]
fn test_map_unknown_module() {
    let project = TestProject::new("name = \"app\"\n");

    project
        .kawac()
        .args(["map", "--module", "nope"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("nope"));
}

// =============================================================================
// Build Command Tests
// =============================================================================

#[test]
fn test_build_dry_run() {
    let project = TestProject::new("name = \"app\"\n[options]\nwarnings = true\n");
    let home = project.fake_kawa_home();

    project
        .kawac()
        .env("KAWA_HOME", &home)
        .args(["build", "--dry-run"])
        .assert()
        .success()
        .stdout(predicate::str::contains("CLASSPATH="))
        .stdout(predicate::str::contains("--warn-as-error"))
        .stdout(predicate::str::contains("-C"))
        .stdout(predicate::str::contains("Foo.scm"))
        .stdout(predicate::str::contains("Bar.java"));

    assert!(
        !project.path().join("target").exists(),
        "Dry run must not create the target directory"
    );
}

#[test]
fn test_build_requires_kawa_home() {
    let project = TestProject::new("name = \"app\"\n");

    project
        .kawac()
        .arg("build")
        .assert()
        .failure()
        .stderr(predicate::str::contains("KAWA_HOME"));
}

#[test]
fn test_build_without_manifest() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");

    Command::cargo_bin("kawac")
        .expect("Failed to find kawac binary")
        .current_dir(temp_dir.path())
        .arg("build")
        .assert()
        .failure()
        .stderr(predicate::str::contains("kawac.toml"));
}

#[test]
fn test_build_rejects_unknown_option() {
    let project = TestProject::new("name = \"app\"\n[options]\nturbo = true\n");
    let home = project.fake_kawa_home();

    project
        .kawac()
        .env("KAWA_HOME", &home)
        .args(["build", "--dry-run"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("turbo"));
}

// =============================================================================
// Doctor Command Tests
// =============================================================================

#[test]
fn test_doctor_without_kawa_home() {
    let project = TestProject::new("name = \"app\"\n");

    project
        .kawac()
        .arg("doctor")
        .assert()
        .failure()
        .stdout(predicate::str::contains("KAWA_HOME"));
}

#[test]
fn test_doctor_with_kawa_home() {
    let project = TestProject::new("name = \"app\"\n");
    let home = project.fake_kawa_home();

    project
        .kawac()
        .env("KAWA_HOME", &home)
        .arg("doctor")
        .assert()
        .success()
        .stdout(predicate::str::contains("kawa.jar"));
}
