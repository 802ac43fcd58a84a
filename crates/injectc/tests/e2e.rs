//! End-to-end tests for the injectc binary.

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

fn injectc_bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_injectc"))
}

const VALID_MODEL: &str = r#"{
    "classes": [
        {
            "package": "com.example",
            "name": "Foo",
            "annotations": ["me.tatarka.inject.annotations.Inject"],
            "constructor": { "params": [] }
        },
        {
            "package": "com.example",
            "name": "AppComponent",
            "abstract": true,
            "annotations": ["me.tatarka.inject.annotations.Component"],
            "members": [
                { "name": "foo", "kind": "val", "returns": "com.example.Foo", "abstract": true }
            ]
        }
    ]
}"#;

const MISSING_BINDING_MODEL: &str = r#"{
    "source": "AppComponent.kt",
    "classes": [
        {
            "package": "com.example",
            "name": "AppComponent",
            "abstract": true,
            "annotations": ["me.tatarka.inject.annotations.Component"],
            "members": [
                {
                    "name": "bar",
                    "kind": "val",
                    "returns": "com.example.Bar",
                    "abstract": true,
                    "span": { "start": 58, "end": 61 }
                }
            ]
        }
    ]
}"#;

const MISSING_BINDING_SOURCE: &str = "@Component\nabstract class AppComponent {\n    abstract val bar: Bar\n}\n";

fn write_model(dir: &Path, model: &str) -> PathBuf {
    let path = dir.join("model.json");
    std::fs::write(&path, model).unwrap();
    path
}

fn run(dir: &Path, args: &[&str]) -> Output {
    Command::new(injectc_bin())
        .current_dir(dir)
        .args(args)
        .env_remove("INJECT_LOG")
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to run injectc")
}

#[test]
fn generates_component_file() {
    let dir = tempfile::tempdir().unwrap();
    write_model(dir.path(), VALID_MODEL);

    let output = run(dir.path(), &["model.json", "--output", "out", "--no-color"]);
    assert!(
        output.status.success(),
        "injectc failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let generated = dir.path().join("out/com/example/InjectAppComponent.kt");
    let contents = std::fs::read_to_string(&generated).unwrap();
    assert!(contents.starts_with("package com.example\n"));
    assert!(contents.contains("class InjectAppComponent : com.example.AppComponent() {"));
    assert!(contents.contains("get() = com.example.Foo()"));
    assert!(contents.contains(
        "fun kotlin.reflect.KClass<com.example.AppComponent>.create(): com.example.AppComponent = InjectAppComponent()"
    ));
}

#[test]
fn missing_binding_fails_with_json_diagnostic() {
    let dir = tempfile::tempdir().unwrap();
    write_model(dir.path(), MISSING_BINDING_MODEL);
    std::fs::write(dir.path().join("AppComponent.kt"), MISSING_BINDING_SOURCE).unwrap();

    let output = run(dir.path(), &["model.json", "--output", "out", "--json"]);
    assert!(!output.status.success(), "expected generation to fail");

    let stderr = String::from_utf8_lossy(&output.stderr);
    let mut stream = serde_json::Deserializer::from_str(&stderr).into_iter::<serde_json::Value>();
    let json = stream
        .next()
        .expect("no JSON object in stderr")
        .expect("first JSON object is not valid");

    assert_eq!(json["code"], "E0002");
    assert_eq!(json["severity"], "error");
    assert_eq!(
        json["message"],
        "Cannot find an @Inject constructor or provider for: com.example.Bar"
    );
    assert_eq!(json["file"], "AppComponent.kt");
    assert_eq!(json["spans"][0]["start"], 58);
    assert_eq!(json["spans"][0]["line"], 3);

    // The stub is still written.
    let stub = dir.path().join("out/com/example/InjectAppComponent.kt");
    let contents = std::fs::read_to_string(stub).unwrap();
    assert!(contents.contains("class InjectAppComponent : com.example.AppComponent()\n"));
}

#[test]
fn human_readable_diagnostics() {
    let dir = tempfile::tempdir().unwrap();
    write_model(dir.path(), MISSING_BINDING_MODEL);

    let output = run(dir.path(), &["model.json", "--output", "out", "--no-color"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    // The source file is absent, so the element trace stands in for it.
    assert!(
        stderr.contains("error[E0002]: Cannot find an @Inject constructor or provider for: com.example.Bar"),
        "{}",
        stderr
    );
    assert!(stderr.contains("error: Generation failed due to errors above."));
}

#[test]
fn config_file_enables_companion_extensions() {
    let dir = tempfile::tempdir().unwrap();
    write_model(dir.path(), VALID_MODEL);
    std::fs::write(
        dir.path().join("inject.toml"),
        "[options]\ngenerate-companion-extensions = true\n",
    )
    .unwrap();

    let output = run(dir.path(), &["model.json", "--output", "out", "--json"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    let first = serde_json::Deserializer::from_str(&stderr)
        .into_iter::<serde_json::Value>()
        .next()
        .expect("no JSON object in stderr")
        .expect("first JSON object is not valid");
    assert_eq!(first["code"], "E0010");
}

#[test]
fn processor_option_overrides_config_file() {
    let dir = tempfile::tempdir().unwrap();
    write_model(dir.path(), VALID_MODEL);
    std::fs::write(
        dir.path().join("inject.toml"),
        "[options]\ngenerate-companion-extensions = true\n",
    )
    .unwrap();

    let output = run(
        dir.path(),
        &[
            "model.json",
            "--output",
            "out",
            "-P",
            "inject.generateCompanionExtensions=false",
        ],
    );
    assert!(
        output.status.success(),
        "{}",
        String::from_utf8_lossy(&output.stderr)
    );
}

#[test]
fn unreadable_model_is_reported() {
    let dir = tempfile::tempdir().unwrap();

    let output = run(dir.path(), &["missing.json", "--no-color"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("error: Failed to read missing.json"), "{}", stderr);
}
