use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::{tempdir, TempDir};

const TAXONOMY: &str = r#"{"msg": [{"children": [
    {"id": 1, "acronym": "Br", "name": "Brain", "color_hex_triplet": "ffffff", "children": [
        {"id": 10, "acronym": "Ctx", "name": "Cortex", "color_hex_triplet": "aa0000", "children": [
            {"id": 11, "acronym": "CP-FCTx", "name": "Cortical plate, frontal", "color_hex_triplet": "bb0000"},
            {"id": 12, "acronym": "SP-FCTx", "name": "Subplate, frontal", "color_hex_triplet": "cc0000"}
        ]},
        {"id": 20, "acronym": "TH", "name": "Thalamus", "color_hex_triplet": "00aa00", "children": [
            {"id": 21, "acronym": "LGN", "name": "Lateral geniculate nucleus", "color_hex_triplet": "00bb00"}
        ]}
    ]},
    {"id": 2, "acronym": "Vs", "name": "Ventricles", "color_hex_triplet": "0000aa"}
]}]}"#;

const ANNOTATION: &str = r#"[
    {"id": 11, "rings": [[[0,0],[2,0],[2,2],[0,2]]]},
    {"id": 12, "rings": [[[2,0],[4,0],[4,2],[2,2]]]},
    {"id": 21, "rings": [[[10,10],[11,10],[11,11],[10,11]]]}
]"#;

const NEXT_SECTION: &str = r#"[
    {"id": 99, "rings": [[[0.5,0],[2.5,0],[2.5,2],[0.5,2]]]}
]"#;

struct Fixture {
    _dir: TempDir,
    taxonomy: PathBuf,
    annotation: PathBuf,
    next_section: PathBuf,
}

fn fixture() -> Fixture {
    let dir = tempdir().unwrap();
    let write = |name: &str, body: &str| {
        let path = dir.path().join(name);
        fs::write(&path, body).unwrap();
        path
    };
    let taxonomy = write("taxonomy.json", TAXONOMY);
    let annotation = write("section_1.json", ANNOTATION);
    let next_section = write("section_2.json", NEXT_SECTION);
    Fixture {
        _dir: dir,
        taxonomy,
        annotation,
        next_section,
    }
}

#[allow(deprecated)]
fn atlas(taxonomy: &Path) -> Command {
    let mut cmd = Command::cargo_bin("atlas").expect("binary");
    cmd.arg("--taxonomy").arg(taxonomy);
    cmd
}

fn run_json(cmd: &mut Command) -> Value {
    let output = cmd.arg("--json").output().expect("command run");
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("valid json")
}

#[test]
fn lookup_reports_level_and_parent() {
    let fx = fixture();
    let node = run_json(atlas(&fx.taxonomy).args(["lookup", "21"]));

    assert_eq!(node["acronym"], "LGN");
    assert_eq!(node["level"], 2);
    assert_eq!(node["parent_id"], 20);
    assert_eq!(node["label"], "LGN : Lateral geniculate nucleus");
}

#[test]
fn ancestors_most_general_first() {
    let fx = fixture();
    let nodes = run_json(atlas(&fx.taxonomy).args(["ancestors", "21"]));
    let ids: Vec<u64> = nodes
        .as_array()
        .unwrap()
        .iter()
        .map(|n| n["id"].as_u64().unwrap())
        .collect();

    assert_eq!(ids, vec![1, 20]);
}

#[test]
fn path_with_acronyms() {
    let fx = fixture();
    atlas(&fx.taxonomy)
        .args(["path", "21", "--label", "acronym", "--separator", "/"])
        .assert()
        .success()
        .stdout("Br/TH\n");
}

#[test]
fn tree_marks_layered_zones() {
    let fx = fixture();
    atlas(&fx.taxonomy)
        .arg("tree")
        .assert()
        .success()
        .stdout(predicate::str::contains("  [1] 10 (Ctx) Cortex"))
        .stdout(predicate::str::contains("[*] 11 (CP-FCTx)"))
        .stdout(predicate::str::contains("[0] 2 (Vs) Ventricles"));
}

#[test]
fn group_membership() {
    let fx = fixture();
    let lgn = run_json(atlas(&fx.taxonomy).args(["group", "21"]));
    assert_eq!(lgn["group"], "TH");

    let brain = run_json(atlas(&fx.taxonomy).args(["group", "1"]));
    assert_eq!(brain["group"], Value::Null);
}

#[test]
fn search_exact_name() {
    let fx = fixture();
    let hits = run_json(atlas(&fx.taxonomy).args(["search", "Thalamus"]));
    let hits = hits.as_array().unwrap();

    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0]["id"], 20);
    assert_eq!(hits[0]["score"], 100.0);
}

#[test]
fn search_rejects_blank_query() {
    let fx = fixture();
    atlas(&fx.taxonomy)
        .args(["search", "   "])
        .assert()
        .failure()
        .stderr(predicate::str::contains("query"));
}

#[test]
fn supershape_unions_children() {
    let fx = fixture();
    let out = run_json(
        atlas(&fx.taxonomy)
            .args(["supershape", "10", "--annotation"])
            .arg(&fx.annotation),
    );

    assert_eq!(out["contributors"], serde_json::json!([11, 12]));
    assert_eq!(out["components"], 1);
}

#[test]
fn classify_partitions_taxonomy() {
    let fx = fixture();
    let out = run_json(
        atlas(&fx.taxonomy)
            .args(["classify", "--annotation"])
            .arg(&fx.annotation),
    );

    assert_eq!(out["counts"]["annotated"], 3);
    assert_eq!(out["counts"]["aggregatable"], 3);
    assert_eq!(out["counts"]["unreachable"], 1);
    assert_eq!(out["reachable_parents"]["10"]["annotated_children"], serde_json::json!([11, 12]));
    assert_eq!(out["reachable_parents"]["1"]["aggregatable"], serde_json::json!([10, 20]));
    assert_eq!(out["nonreachable"]["leaves"], serde_json::json!([2]));
}

#[test]
fn adjacency_undirected_touches() {
    let fx = fixture();
    let out = run_json(
        atlas(&fx.taxonomy)
            .args(["adjacency", "--predicate", "touches", "--undirected", "--annotation"])
            .arg(&fx.annotation),
    );

    assert_eq!(out["touches"], serde_json::json!([[11, 12]]));
}

#[test]
fn nearest_across_sections() {
    let fx = fixture();
    let out = run_json(
        atlas(&fx.taxonomy)
            .args(["nearest", "99", "--from"])
            .arg(&fx.next_section)
            .arg("--annotation")
            .arg(&fx.annotation),
    );

    assert_eq!(out["id"], 11);
    assert!((out["distance"].as_f64().unwrap() - 0.5).abs() < 1e-9);
}

#[test]
fn properties_of_square() {
    let fx = fixture();
    let out = run_json(
        atlas(&fx.taxonomy)
            .args(["properties", "11", "--annotation"])
            .arg(&fx.annotation),
    );

    assert!((out["area"].as_f64().unwrap() - 4.0).abs() < 1e-9);
    assert!((out["perimeter"].as_f64().unwrap() - 8.0).abs() < 1e-9);
    assert_eq!(out["components"], 1);
}

#[test]
fn unknown_id_fails() {
    let fx = fixture();
    atlas(&fx.taxonomy)
        .args(["lookup", "404"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("404"));
}

#[test]
#[allow(deprecated)]
fn missing_taxonomy_flag_fails() {
    Command::cargo_bin("atlas")
        .expect("binary")
        .args(["lookup", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--taxonomy"));
}

#[test]
fn adult_mouse_groups_preset() {
    let fx = fixture();
    let groups = run_json(atlas(&fx.taxonomy).args(["group", "--groups", "adult-mouse"]));
    let names: Vec<&str> = groups
        .as_array()
        .unwrap()
        .iter()
        .map(|g| g["name"].as_str().unwrap())
        .collect();

    assert!(!names.is_empty());
    assert!(!names.contains(&"Mig"));
}
