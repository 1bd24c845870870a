use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const EMBEDDED_MANIFEST: &str = r#"
families: [datasource]
facts:
  types:
    - javax.sql.DataSource
    - org.springframework.jdbc.datasource.embedded.EmbeddedDatabaseType
    - org.h2.Driver
"#;

fn write(dir: &Path, name: &str, body: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, body).unwrap();
    path
}

fn activation(dir: &Path) -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("activation");
    cmd.env_remove("RUST_LOG")
        .args(["--config", dir.join("missing.toml").to_str().unwrap()]);
    cmd
}

#[test]
fn test_cli_help() {
    let mut cmd = cargo_bin_cmd!("activation");
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Resolve conditional module activations"))
        .stdout(predicate::str::contains("resolve"))
        .stdout(predicate::str::contains("order"));
}

#[test]
fn test_resolve_text_report() {
    let dir = TempDir::new().unwrap();
    let manifest = write(dir.path(), "app.yaml", EMBEDDED_MANIFEST);

    activation(dir.path())
        .args(["resolve", "--manifest", manifest.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Positive matches:"))
        .stdout(predicate::str::contains("embedded-datasource [datasource]:"))
        .stdout(predicate::str::contains("* datasource.embedded-engine = H2"))
        .stdout(predicate::str::contains("1 of 2 modules activated"));
}

#[test]
fn test_resolve_json_is_stable() {
    let dir = TempDir::new().unwrap();
    let manifest = write(dir.path(), "app.yaml", EMBEDDED_MANIFEST);

    let run = || {
        activation(dir.path())
            .args(["resolve", "-m", manifest.to_str().unwrap(), "-o", "json"])
            .output()
            .unwrap()
            .stdout
    };
    let first = run();
    assert!(!first.is_empty());
    assert_eq!(first, run());
}

#[test]
fn test_family_flag_overrides_manifest() {
    let dir = TempDir::new().unwrap();
    let manifest = write(dir.path(), "app.yaml", EMBEDDED_MANIFEST);

    activation(dir.path())
        .args(["order", "-m", manifest.to_str().unwrap(), "--family", "cache,jms"])
        .assert()
        .success()
        .stdout(predicate::str::contains("simple-cache"))
        .stdout(predicate::str::contains("jms-listener-container-factory"))
        .stdout(predicate::str::contains("embedded-datasource").not());
}

#[test]
fn test_missing_required_group_fails_with_report() {
    let dir = TempDir::new().unwrap();
    let manifest = write(dir.path(), "app.json", r#"{"families":["datasource"]}"#);
    let config = write(
        dir.path(),
        "config.toml",
        "[engine.datasource]\nrequired = true\n",
    );

    let mut cmd = cargo_bin_cmd!("activation");
    cmd.args(["--config", config.to_str().unwrap()])
        .args(["resolve", "--manifest", manifest.to_str().unwrap()])
        .assert()
        .failure()
        .stdout(predicate::str::contains("Negative matches:"))
        .stderr(predicate::str::contains("group 'datasource'"));
}

#[test]
fn test_unknown_family_rejected() {
    let dir = TempDir::new().unwrap();
    let manifest = write(dir.path(), "app.yaml", EMBEDDED_MANIFEST);

    activation(dir.path())
        .args(["resolve", "-m", manifest.to_str().unwrap(), "--family", "servlet"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown module family 'servlet'"));
}
