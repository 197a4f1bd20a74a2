//! Integration tests for the prepare and resolve pipelines.
//!
//! These run the library against the recipe library in
//! `tests/testdata/recipe-library`, writing output to a temporary directory.

mod common;

use std::fs;
use std::path::Path;

use recipe_prepare::diagnostics::{Diagnostics, Warning};
use recipe_prepare::error::Error;
use recipe_prepare::model::RecipeDocument;
use recipe_prepare::pipeline::{run_prepare, run_resolve, PrepareRequest, ResolveRequest};
use recipe_prepare::store;
use tempfile::TempDir;

use common::library_dir;

fn request(out: &TempDir, group: Option<&str>, artifact: &str) -> PrepareRequest {
    PrepareRequest {
        rules_path: library_dir().join("merge-rules.yml"),
        recipe_dir: library_dir(),
        group_id: group.map(str::to_string),
        artifact_id: artifact.to_string(),
        output: out.path().join("openrewrite").join("rewrite.yml"),
    }
}

fn read_recipes(path: &Path) -> Vec<RecipeDocument> {
    let text = fs::read_to_string(path).unwrap();
    store::parse_recipe_documents(&text, path, &mut Diagnostics::new()).recipes
}

#[test]
fn test_prepare_orders_service_end_to_end() {
    let out = TempDir::new().unwrap();
    let mut diagnostics = Diagnostics::new();
    let summary = run_prepare(
        &request(&out, Some("com.example.shop"), "orders-service"),
        &mut diagnostics,
    )
    .unwrap();

    assert_eq!(summary.rules_matched, 2);
    assert_eq!(summary.files_merged, 3);
    assert_eq!(summary.files_skipped, 1);
    assert_eq!(summary.merge_documents, 1);
    assert_eq!(summary.edits_applied, 2);
    assert_eq!(summary.entries_inserted, 5);
    assert!(diagnostics.is_clean());
    assert_eq!(diagnostics.notes().len(), 1);

    let recipes = read_recipes(summary.output.as_deref().unwrap());
    let names: Vec<_> = recipes.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, ["com.example.Migration", "com.example.OrdersSetup"]);
    assert_eq!(
        recipes[0].entry_names(),
        [
            "com.example.OrdersSetup",
            "com.example.UpgradeBuild",
            "com.example.UpgradeDependencies",
            "com.example.UpgradePlugins",
            "org.openrewrite.text.ChangeText",
            "com.example.MigrateOrders",
            "com.example.Cleanup",
            "com.example.Verify",
        ]
    );
    assert_eq!(recipes[0].tags, ["migration"]);
    assert_eq!(recipes[1].causes_another_cycle, Some(true));
    assert_eq!(
        recipes[1].estimated_effort_per_occurrence.as_deref(),
        Some("PT5M")
    );
}

#[test]
fn test_prepare_output_excludes_merge_documents() {
    let out = TempDir::new().unwrap();
    let summary = run_prepare(
        &request(&out, Some("com.example.billing"), "orders-billing-api"),
        &mut Diagnostics::new(),
    )
    .unwrap();
    let text = fs::read_to_string(summary.output.unwrap()).unwrap();
    assert!(!text.contains("org.yourcompany.openrewrite/v1/merge"));
    assert!(!text.contains("updateRecipeList"));
    assert!(text.starts_with("---\n"));
}

#[test]
fn test_prepare_tolerates_bad_documents_and_missing_files() {
    let out = TempDir::new().unwrap();
    let mut diagnostics = Diagnostics::new();
    let summary = run_prepare(&request(&out, None, "billing"), &mut diagnostics).unwrap();

    assert_eq!(summary.rules_matched, 2);
    assert_eq!(summary.recipes_written, 3);
    assert_eq!(
        diagnostics.count(|w| matches!(w, Warning::MalformedDocument { index: 2, .. })),
        1
    );
    assert_eq!(
        diagnostics.count(|w| matches!(w, Warning::MissingMergeFile { .. })),
        1
    );
}

#[test]
fn test_group_pattern_filters_rules() {
    let out = TempDir::new().unwrap();
    let summary = run_prepare(
        &request(&out, Some("org.other"), "orders-service"),
        &mut Diagnostics::new(),
    )
    .unwrap();
    // Only the catch-all rule applies, so no ordering edits run.
    assert_eq!(summary.rules_matched, 1);
    assert_eq!(summary.edits_applied, 0);
    let recipes = read_recipes(summary.output.as_deref().unwrap());
    assert_eq!(
        recipes[0].entry_names(),
        [
            "com.example.UpgradeBuild",
            "org.openrewrite.text.ChangeText",
            "com.example.Cleanup",
        ]
    );
}

#[test]
fn test_no_matching_rule_writes_nothing() {
    let out = TempDir::new().unwrap();
    let rules = out.path().join("merge-rules.yml");
    fs::write(
        &rules,
        "rules:\n  - artifactId: billing\n    mergeFiles: [base.yml]\n",
    )
    .unwrap();
    let mut req = request(&out, None, "orders-service");
    req.rules_path = rules;

    let summary = run_prepare(&req, &mut Diagnostics::new()).unwrap();
    assert!(summary.output.is_none());
    assert!(!req.output.exists());
}

#[test]
fn test_missing_rule_table_is_fatal() {
    let out = TempDir::new().unwrap();
    let mut req = request(&out, None, "orders-service");
    req.rules_path = out.path().join("nope.yml");
    let err = run_prepare(&req, &mut Diagnostics::new()).unwrap_err();
    assert!(matches!(err, Error::RuleTableNotFound { .. }));
}

#[test]
fn test_prepare_then_resolve() {
    let out = TempDir::new().unwrap();
    let summary = run_prepare(
        &request(&out, Some("com.example.shop"), "orders-service"),
        &mut Diagnostics::new(),
    )
    .unwrap();
    let output = summary.output.unwrap();

    let mut diagnostics = Diagnostics::new();
    let resolved = run_resolve(
        &ResolveRequest {
            target: output.clone(),
            var_map: library_dir().join("var-map.properties"),
        },
        &mut diagnostics,
    )
    .unwrap();

    assert_eq!(resolved.files_changed, 1);
    assert_eq!(resolved.variables_loaded, 2);
    assert_eq!(resolved.resolved, 2);
    assert_eq!(resolved.unresolved, 0);
    assert!(diagnostics.is_clean());

    let recipes = read_recipes(&output);
    let change_text = &recipes[0].recipe_list.as_ref().unwrap()[4];
    assert_eq!(
        change_text.attributes.get("toText").and_then(|v| v.as_str()),
        Some("Orders Application")
    );
    let configure = &recipes[1].recipe_list.as_ref().unwrap()[0];
    assert_eq!(
        configure.attributes.get("serviceName").and_then(|v| v.as_str()),
        Some("orders")
    );
}
