//! End-to-end tests for the `resolve` command.

mod common;
use common::prelude::*;

#[test]
#[cfg_attr(not(feature = "integration-tests"), ignore)]
fn test_resolve_after_prepare() {
    let fixture = TestFixture::with_library()
        .with_file("migration-ci/rules/var-map.properties", "app.name=Orders Application\nservice.name=orders\n");

    fixture
        .command()
        .args(["prepare", "--group-id", "com.example", "--artifact-id", "orders-service"])
        .assert()
        .success();

    // groupId com.example does not match com.example.*, so only base.yml is merged.
    fixture
        .command()
        .arg("resolve")
        .assert()
        .success()
        .stdout(predicate::str::contains("Resolved 1 placeholder(s), 0 unresolved"));

    fixture
        .child("openrewrite/rewrite.yml")
        .assert(predicate::str::contains("Orders Application"));
}

#[test]
#[cfg_attr(not(feature = "integration-tests"), ignore)]
fn test_resolve_explicit_paths_and_unresolved_warning() {
    let fixture = TestFixture::new()
        .with_file("out/rewrite.yml", "name: ${app.name}\nowner: ${team}\n")
        .with_file("vars.properties", "app.name = Demo\n");

    fixture
        .command()
        .args(["resolve", "--target", "out/rewrite.yml", "--var-map", "vars.properties"])
        .assert()
        .success()
        .stderr(predicate::str::contains("team"));

    fixture
        .child("out/rewrite.yml")
        .assert("name: Demo\nowner: ${team}\n");
}

#[test]
#[cfg_attr(not(feature = "integration-tests"), ignore)]
fn test_resolve_directory_target() {
    let fixture = TestFixture::new()
        .with_file("out/a.yml", "x: $v\n")
        .with_file("out/nested/b.yaml", "y: ${v}\n")
        .with_file("vars.properties", "v=1\n");

    let assert = fixture
        .command()
        .args(["--json", "resolve", "--target", "out", "--var-map", "vars.properties"])
        .assert()
        .success();

    let report: serde_json::Value = serde_json::from_slice(&assert.get_output().stdout).unwrap();
    assert_eq!(report["summary"]["files_processed"], 2);
    assert_eq!(report["summary"]["files_changed"], 2);
    fixture.child("out/nested/b.yaml").assert("y: 1\n");
}

#[test]
#[cfg_attr(not(feature = "integration-tests"), ignore)]
fn test_resolve_missing_var_map_is_not_an_error() {
    let fixture = TestFixture::new().with_file("openrewrite/rewrite.yml", "name: ${x}\n");

    fixture
        .command()
        .arg("resolve")
        .assert()
        .success()
        .stderr(predicate::str::contains("Variable map not found"));

    fixture
        .child("openrewrite/rewrite.yml")
        .assert("name: ${x}\n");
}
