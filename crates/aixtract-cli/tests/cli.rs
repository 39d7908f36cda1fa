use std::fs;
use std::path::PathBuf;

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn aixtract() -> Command {
    Command::cargo_bin("aixtract").unwrap()
}

#[test]
fn preprocess_prints_segmented_pages() {
    let output = aixtract()
        .arg("preprocess")
        .arg(fixture("datasheet.xml"))
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let json: Value = serde_json::from_slice(&output).unwrap();
    let page = &json["1"];

    let upper = page["0"].as_array().unwrap();
    let lower = page["1"].as_array().unwrap();
    // Nine fragments, one duplicated footer.
    assert_eq!(upper.len() + lower.len(), 8);
    assert!(upper[0].as_str().unwrap().contains("EMPU-3401"));
    assert!(upper.last().unwrap().as_str().unwrap().contains("Specifications"));
    assert!(lower.last().unwrap().as_str().unwrap().contains("www.innodisk.com"));
}

#[test]
fn preprocess_then_evaluate_scores_perfect_extraction() {
    let dir = tempfile::tempdir().unwrap();
    let preprocessed = dir.path().join("preprocessed.json");

    aixtract()
        .arg("preprocess")
        .arg(fixture("datasheet.xml"))
        .arg("-o")
        .arg(&preprocessed)
        .assert()
        .success()
        .stdout(predicate::str::contains("Output written to"));

    let output = aixtract()
        .arg("evaluate")
        .arg(&preprocessed)
        .arg(fixture("generated.json"))
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let scores: Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(scores["1"], 1.0);
    assert_eq!(scores["2"], 1.0);
    assert_eq!(scores["mean"], 1.0);
}

#[test]
fn evaluate_against_raw_fragments_as_csv() {
    aixtract()
        .arg("evaluate")
        .arg(fixture("datasheet.xml"))
        .arg(fixture("generated.json"))
        .arg("--format")
        .arg("csv")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("page,score\n"))
        .stdout(predicate::str::contains("2,1.00\n"))
        .stdout(predicate::str::contains("mean,"));
}

#[test]
fn evaluate_reports_missing_page() {
    aixtract()
        .arg("evaluate")
        .arg(fixture("datasheet.xml"))
        .arg(fixture("generated_missing_page.json"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("no generated data for page 2"));
}

#[test]
fn evaluate_rejects_unknown_metric() {
    aixtract()
        .arg("evaluate")
        .arg(fixture("datasheet.xml"))
        .arg(fixture("generated.json"))
        .arg("--metric")
        .arg("bleu")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown metric: bleu"));
}

#[test]
fn preprocess_rejects_non_list_page() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("pages.json");
    fs::write(&input, r#"{"1": "<text top=\"1\">a</text>"}"#).unwrap();

    aixtract()
        .arg("preprocess")
        .arg(&input)
        .assert()
        .failure()
        .stderr(predicate::str::contains("expected a list of text elements for page 1"));
}

#[test]
fn convert_rejects_missing_pdf() {
    aixtract()
        .arg("convert")
        .arg("does-not-exist.pdf")
        .assert()
        .failure()
        .stderr(predicate::str::contains("file not found"));
}

#[test]
fn extract_fails_when_service_is_unreachable() {
    let dir = tempfile::tempdir().unwrap();
    let preprocessed = dir.path().join("preprocessed.json");
    fs::write(&preprocessed, r#"{"1": {"0": [], "1": []}}"#).unwrap();

    aixtract()
        .arg("extract")
        .arg(&preprocessed)
        .arg("--endpoint")
        .arg("http://127.0.0.1:9/")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to reach"));
}

#[test]
fn config_init_get_set() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("aixtract.json");

    aixtract()
        .arg("-c")
        .arg(&config)
        .args(["config", "init"])
        .assert()
        .success();
    assert!(config.exists());

    aixtract()
        .arg("-c")
        .arg(&config)
        .args(["config", "init"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));

    aixtract()
        .arg("-c")
        .arg(&config)
        .args(["config", "get", "generation.model"])
        .assert()
        .success()
        .stdout("llama3.2:1b\n");

    aixtract()
        .arg("-c")
        .arg(&config)
        .args(["config", "set", "generation.max_retries", "3"])
        .assert()
        .success();

    aixtract()
        .arg("-c")
        .arg(&config)
        .args(["config", "get", "generation.max_retries"])
        .assert()
        .success()
        .stdout("3\n");
}

#[test]
fn config_set_rejects_invalid_values() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("aixtract.json");

    aixtract()
        .arg("-c")
        .arg(&config)
        .args(["config", "set", "generation.max_retries", "0"])
        .assert()
        .failure();

    aixtract()
        .arg("-c")
        .arg(&config)
        .args(["config", "set", "generation.prompt_template", "no placeholder"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("xml_content"));

    aixtract()
        .arg("-c")
        .arg(&config)
        .args(["config", "set", "generation.nope", "1"])
        .assert()
        .failure();

    assert!(!config.exists());
}
