//! End-to-end CLI tests via the compiled binary.

mod common;

use assert_cmd::Command;
use common::PresetTree;
use predicates::prelude::*;

fn xpdeck() -> Command {
    Command::cargo_bin("xpdeck").expect("binary builds")
}

#[test]
fn check_passes_on_complete_tree() {
    let tree = PresetTree::basic();

    xpdeck()
        .args(["check", "-d", tree.path_str()])
        .assert()
        .success()
        .stdout(predicate::str::contains("2 keysets"));
}

#[test]
fn check_fails_on_missing_icon() {
    let tree = PresetTree::new();
    tree.keyset(
        "actions.yaml",
        "actions: [{index: 0, name: gear, icon: gear, dataref: sim/gear}]",
    );
    tree.icon("none");
    // gear state icons absent.

    xpdeck()
        .args(["check", "-d", tree.path_str()])
        .assert()
        .failure();
}

#[test]
fn check_robot_mode_emits_json() {
    let tree = PresetTree::basic();

    let output = xpdeck()
        .args(["check", "--robot", "-d", tree.path_str()])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let report: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(report["keysets_loaded"], 2);
    assert_eq!(report["dataref_buttons"], 2);
    assert!(report["icons_missing"].as_array().unwrap().is_empty());
}

#[test]
fn datarefs_json_lists_bindings() {
    let tree = PresetTree::basic();

    let output = xpdeck()
        .args(["datarefs", "-f", "json", "-d", tree.path_str()])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let datarefs: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(
        datarefs["actions"][0]["dataref"],
        "sim/cockpit2/annunciators/gear"
    );
    assert_eq!(datarefs["radios"][0]["states"], serde_json::json!([0, 1]));
}

#[test]
fn datarefs_unknown_keyset_fails() {
    let tree = PresetTree::basic();

    xpdeck()
        .args(["datarefs", "-d", tree.path_str(), "--keyset", "nonexistent"])
        .assert()
        .failure();
}

#[test]
fn render_writes_native_images() {
    let tree = PresetTree::basic();
    let out = tempfile::TempDir::new().unwrap();

    xpdeck()
        .args(["render", out.path().to_str().unwrap(), "-d", tree.path_str()])
        .assert()
        .success();

    // Mk2 is the default model, so outputs are JPEG.
    assert!(out.path().join("none.jpg").exists());
    assert!(out.path().join("gear.0.0.jpg").exists());
    assert!(out.path().join("com1.1.jpg").exists());
}

#[test]
fn render_missing_icon_reports_error() {
    let tree = PresetTree::new();
    tree.keyset(
        "actions.yaml",
        "actions: [{index: 0, name: gear, icon: gear, dataref: sim/gear}]",
    );
    let out = tempfile::TempDir::new().unwrap();

    xpdeck()
        .args(["render", out.path().to_str().unwrap(), "-d", tree.path_str()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Icon file not found"));
}

#[test]
fn out_of_range_index_mentions_key_count() {
    let tree = PresetTree::new();
    tree.keyset(
        "actions.yaml",
        "actions: [{index: 6, name: over, icon: x, command: c}]",
    );
    tree.icon("x");
    tree.icon("none");

    xpdeck()
        .args(["check", "-d", tree.path_str(), "-m", "mini"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("out of range"));
}

#[test]
fn key_count_override_admits_larger_index() {
    let tree = PresetTree::new();
    tree.keyset(
        "actions.yaml",
        "actions: [{index: 6, name: over, icon: x, command: c}]",
    );
    tree.icon("x");
    tree.icon("none");

    xpdeck()
        .args(["check", "-d", tree.path_str(), "-m", "mini", "--key-count", "15"])
        .assert()
        .success();
}

#[test]
fn version_prints_build_info() {
    xpdeck()
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains("xpdeck"));
}

#[test]
fn no_subcommand_prints_quick_start() {
    xpdeck()
        .assert()
        .success()
        .stdout(predicate::str::contains("xpdeck check"));
}
