//! End-to-end mixed Kawa/Java build against recording fakes.

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use kawac_core::compile::Invocation;
use kawac_core::{
    AmbientSettings, ArtifactTarget, BuildProject, Error, Kawac, KawaToolchain, Language,
    LocalOptions, OptionScope, ProcessRunner, Result,
};
use tempfile::TempDir;

/// Records every invocation; the first `failures` Kawa runs fail.
#[derive(Default)]
struct RecordingRunner {
    calls: Mutex<Vec<Invocation>>,
    kawa_failures: Mutex<usize>,
}

impl RecordingRunner {
    fn failing_kawa(times: usize) -> Self {
        Self {
            kawa_failures: Mutex::new(times),
            ..Default::default()
        }
    }

    fn calls(&self) -> Vec<Invocation> {
        self.calls.lock().unwrap().clone()
    }
}

impl ProcessRunner for RecordingRunner {
    fn run(&self, invocation: &Invocation) -> Result<bool> {
        self.calls.lock().unwrap().push(invocation.clone());
        if invocation.program().ends_with("kawa") {
            let mut remaining = self.kawa_failures.lock().unwrap();
            if *remaining > 0 {
                *remaining -= 1;
                return Ok(false);
            }
        }
        Ok(true)
    }
}

struct TestProject {
    roots: Vec<PathBuf>,
    deps: Vec<PathBuf>,
    target: PathBuf,
    scope: Arc<OptionScope>,
}

impl BuildProject for TestProject {
    fn name(&self) -> &str {
        "mixed"
    }

    fn source_roots(&self) -> &[PathBuf] {
        &self.roots
    }

    fn dependencies(&self) -> &[PathBuf] {
        &self.deps
    }

    fn target_dir(&self) -> &Path {
        &self.target
    }

    fn option_scope(&self) -> &Arc<OptionScope> {
        &self.scope
    }
}

struct Fixture {
    _temp: TempDir,
    kawac: Kawac,
    project: TestProject,
    src: PathBuf,
}

fn fixture() -> Fixture {
    let temp = TempDir::new().unwrap();
    let root = temp.path();

    let home = root.join("kawa-home");
    fs::create_dir_all(home.join("bin")).unwrap();
    fs::write(home.join("kawa.jar"), b"").unwrap();
    let toolchain = KawaToolchain::with_launcher(&home, home.join("bin/kawa")).unwrap();

    let src = root.join("src");
    fs::create_dir_all(src.join("com/example")).unwrap();
    fs::write(
        src.join("com/example/Foo.scm"),
        "(module-name com.example.)\n(define-simple-class Foo ()\n  ((greet) \"hi\"))\n",
    )
    .unwrap();
    fs::write(
        src.join("com/example/Bar.java"),
        "package com.example;\n\npublic class Bar {\n    String greet() { return new Foo().greet(); }\n}\n",
    )
    .unwrap();

    let project = TestProject {
        roots: vec![src.clone()],
        deps: vec![root.join("lib/dep.jar")],
        target: root.join("out"),
        scope: OptionScope::root("mixed", LocalOptions::default()),
    };

    Fixture {
        kawac: Kawac::new(toolchain, "javac"),
        project,
        src,
        _temp: temp,
    }
}

fn strings(args: &[OsString]) -> Vec<String> {
    args.iter().map(|a| a.to_string_lossy().into_owned()).collect()
}

#[test]
fn test_mapping_predicts_nested_artifacts() {
    let f = fixture();
    let mapping = Kawac::compile_map(&[&f.src], &f.project.target).unwrap();

    let foo = f.src.join("com/example/Foo.scm");
    assert_eq!(
        mapping.get(&foo),
        Some(&ArtifactTarget::Nested(f.project.target.join("com/example/Foo.class")))
    );
    let bar = f.src.join("com/example/Bar.java");
    assert_eq!(
        mapping.get(&bar),
        Some(&ArtifactTarget::Nested(f.project.target.join("com/example/Bar.class")))
    );
    assert!(mapping.failures().is_empty());
}

#[test]
fn test_primary_retries_after_java() {
    let f = fixture();
    let runner = RecordingRunner::failing_kawa(1);

    let report = f
        .kawac
        .compile(&f.project, &AmbientSettings::default(), &runner)
        .unwrap();
    assert!(report.retried());
    assert!(f.project.target.is_dir());

    let calls = runner.calls();
    let programs: Vec<&Path> = calls.iter().map(Invocation::program).collect();
    assert_eq!(
        programs,
        vec![
            f.kawac.toolchain().launcher(),
            Path::new("javac"),
            f.kawac.toolchain().launcher(),
        ]
    );
    assert_eq!(calls[0], calls[2]);

    // Primary: declared dependencies, then source roots. Never the target.
    let primary_cp = calls[0].env_var("CLASSPATH").unwrap().to_os_string();
    let entries: Vec<PathBuf> = std::env::split_paths(&primary_cp).collect();
    assert_eq!(entries, vec![f.project.deps[0].clone(), f.src.clone()]);

    let primary_args = strings(calls[0].arguments());
    assert_eq!(primary_args[0], "-d");
    assert!(primary_args.contains(&"-C".to_string()));
    assert!(primary_args.last().unwrap().ends_with("Foo.scm"));

    // Secondary: dependencies, kawa.jar, then the freshly built target.
    let java_args = strings(calls[1].arguments());
    let cp_at = java_args.iter().position(|a| a == "-classpath").unwrap();
    let cp: Vec<PathBuf> = std::env::split_paths(&java_args[cp_at + 1]).collect();
    assert_eq!(
        cp,
        vec![
            f.project.deps[0].clone(),
            f.kawac.toolchain().runtime_jar(),
            f.project.target.clone(),
        ]
    );
    assert!(java_args.last().unwrap().ends_with("Bar.java"));
}

#[test]
fn test_persistent_kawa_failure_is_reported() {
    let f = fixture();
    let runner = RecordingRunner::failing_kawa(2);

    let err = f
        .kawac
        .compile(&f.project, &AmbientSettings::default(), &runner)
        .unwrap_err();
    assert!(matches!(
        err,
        Error::CompileFailure {
            language: Language::Kawa,
            attempts: 2
        }
    ));
    assert_eq!(runner.calls().len(), 3);
}

#[test]
fn test_dry_run_lists_commands() {
    let f = fixture();
    let runner = RecordingRunner::default();
    let ambient = AmbientSettings {
        dry_run: true,
        verbose: true,
        ..Default::default()
    };

    let report = f.kawac.compile(&f.project, &ambient, &runner).unwrap();
    assert!(runner.calls().is_empty());
    assert!(!f.project.target.exists());
    assert_eq!(report.commands.len(), 2);
    assert!(report.commands[0].contains("--warn-as-error"));
    assert!(report.commands[1].starts_with("javac"));
}

#[test]
fn test_incremental_skips_current_artifacts() {
    let f = fixture();
    let project = TestProject {
        scope: OptionScope::root(
            "mixed",
            LocalOptions {
                incremental: Some(true),
                ..Default::default()
            },
        ),
        roots: f.project.roots.clone(),
        deps: Vec::new(),
        target: f.project.target.clone(),
    };

    let runner = RecordingRunner::default();
    f.kawac
        .compile(&project, &AmbientSettings::default(), &runner)
        .unwrap();
    assert_eq!(runner.calls().len(), 2);

    // The fake runner writes nothing, so produce the artifacts by hand.
    let classes = project.target.join("com/example");
    fs::create_dir_all(&classes).unwrap();
    fs::write(classes.join("Foo.class"), b"").unwrap();
    fs::write(classes.join("Bar.class"), b"").unwrap();

    let runner = RecordingRunner::default();
    let report = f
        .kawac
        .compile(&project, &AmbientSettings::default(), &runner)
        .unwrap();
    assert!(report.up_to_date);
    assert!(runner.calls().is_empty());
}

#[test]
fn test_incremental_rebuilds_after_failure() {
    let f = fixture();
    let lib = f.src.parent().unwrap().join("lib-src");
    fs::create_dir_all(&lib).unwrap();
    fs::write(lib.join("helpers.scm"), "(define (twice x) (* 2 x))\n").unwrap();
    let project = TestProject {
        scope: OptionScope::root(
            "helpers",
            LocalOptions {
                incremental: Some(true),
                ..Default::default()
            },
        ),
        roots: vec![lib],
        deps: Vec::new(),
        target: f.project.target.join("helpers"),
    };

    let runner = RecordingRunner::failing_kawa(usize::MAX);
    let err = f
        .kawac
        .compile(&project, &AmbientSettings::default(), &runner)
        .unwrap_err();
    assert!(matches!(err, Error::CompileFailure { .. }));
    assert!(project.target.is_dir());

    // The failed build left a fresh target directory but no artifacts.
    let err = f
        .kawac
        .compile(&project, &AmbientSettings::default(), &runner)
        .unwrap_err();
    assert!(matches!(err, Error::CompileFailure { .. }));
    assert_eq!(runner.calls().len(), 2);
}
