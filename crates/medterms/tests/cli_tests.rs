use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

// Helper function to set up a test Command instance isolated in `dir`
fn set_up_command(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("medterms").unwrap();
    cmd.env_clear()
        .env("HOME", dir)
        .env("MEDTERMS_STORAGE__DOCUMENT_PATH", dir.join("MedicalTerms.json"))
        .arg("--config")
        .arg(dir.join("config.toml"));
    cmd
}

#[test]
fn test_cli_help() {
    let dir = TempDir::new().unwrap();
    set_up_command(dir.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("medical abbreviations"));
}

#[test]
fn test_status_uses_bundled_seed() {
    let dir = TempDir::new().unwrap();
    set_up_command(dir.path())
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("Loaded from:   bundled seed"))
        .stdout(predicate::str::contains("Sections:      27"));

    // Reading never creates the document
    assert!(!dir.path().join("MedicalTerms.json").exists());
}

#[test]
fn test_add_then_search() {
    let dir = TempDir::new().unwrap();

    set_up_command(dir.path())
        .args(["add", "Xa", "factor Xa", "--comment", "clotting factor"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Added Xa: factor Xa (clotting factor)"))
        .stdout(predicate::str::contains("Favorites: 1"));

    assert!(dir.path().join("MedicalTerms.json").exists());

    set_up_command(dir.path())
        .args(["search", "XA"])
        .assert()
        .success()
        .stdout(predicate::str::contains("* Xa: factor Xa"));

    set_up_command(dir.path())
        .args(["list", "--section", "x"])
        .assert()
        .success()
        .stdout(predicate::str::contains("XR"))
        .stdout(predicate::str::contains("Xa"));
}

#[test]
fn test_quiet_still_prints_results() {
    let dir = TempDir::new().unwrap();
    set_up_command(dir.path())
        .args(["-q", "search", "obstructive"])
        .assert()
        .success()
        .stdout(predicate::str::contains("COPD"))
        .stderr(predicate::str::is_empty());
}

#[test]
fn test_search_matches_terms() {
    let dir = TempDir::new().unwrap();
    set_up_command(dir.path())
        .args(["search", "obstructive"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "COPD: chronic obstructive pulmonary disease",
        ));
}

#[test]
fn test_search_without_matches() {
    let dir = TempDir::new().unwrap();
    set_up_command(dir.path())
        .args(["search", "zzzz"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No entries match"));
}

#[test]
fn test_delete_seed_entry_is_refused() {
    let dir = TempDir::new().unwrap();
    set_up_command(dir.path())
        .args(["delete", "BP"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot be deleted"));

    assert!(!dir.path().join("MedicalTerms.json").exists());
}

#[test]
fn test_add_then_delete() {
    let dir = TempDir::new().unwrap();

    set_up_command(dir.path())
        .args(["add", "ROSC", "return of spontaneous circulation"])
        .assert()
        .success();

    set_up_command(dir.path())
        .args(["delete", "rosc"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Deleted ROSC"))
        .stdout(predicate::str::contains("Favorites: 0"));

    set_up_command(dir.path())
        .args(["show", "ROSC"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no entry with abbreviation"));
}

#[test]
fn test_shared_abbreviation_needs_index() {
    let dir = TempDir::new().unwrap();

    set_up_command(dir.path())
        .args(["add", "CT", "connective tissue", "--no-favorite"])
        .assert()
        .success();

    set_up_command(dir.path())
        .args(["show", "CT"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--index"));

    set_up_command(dir.path())
        .args(["show", "CT", "--index", "2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Term:         connective tissue"))
        .stdout(predicate::str::contains("Added by you: yes"));
}

#[test]
fn test_favorite_toggle() {
    let dir = TempDir::new().unwrap();

    set_up_command(dir.path())
        .args(["favorite", "BP"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Added BP to favorites"));

    set_up_command(dir.path())
        .arg("favorites")
        .assert()
        .success()
        .stdout(predicate::str::contains("* BP: blood pressure"));

    set_up_command(dir.path())
        .args(["favorite", "bp"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Removed BP from favorites"));
}

#[test]
fn test_edit_comment() {
    let dir = TempDir::new().unwrap();

    set_up_command(dir.path())
        .args(["edit", "SOB", "--comment", "dyspnoea"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Updated SOB: shortness of breath (dyspnoea)"));

    set_up_command(dir.path())
        .args(["edit", "SOB", "--comment", "dyspnoea"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No changes."));
}

#[test]
fn test_edit_without_changes_is_rejected() {
    let dir = TempDir::new().unwrap();
    set_up_command(dir.path())
        .args(["edit", "SOB"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("nothing to change"));
}

#[test]
fn test_list_json() {
    let dir = TempDir::new().unwrap();
    let output = set_up_command(dir.path())
        .args(["list", "--format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["sections"].as_array().unwrap().len(), 27);
    assert!(value["favorites"].as_array().unwrap().is_empty());
}

#[test]
fn test_ingest_and_load_as_seed() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("dump.txt");
    let csv = dir.path().join("out.csv");
    let json = dir.path().join("out.json");
    fs::write(
        &input,
        "A\nACE\u{00A0}: angiotensin-converting enzyme\n\nB\nBP: blood pressure\nZZ\nSOB: shortness of breath\n",
    )
    .unwrap();

    set_up_command(dir.path())
        .arg("ingest")
        .arg(&input)
        .arg("--csv")
        .arg(&csv)
        .arg("--json")
        .arg(&json)
        .assert()
        .success()
        .stdout(predicate::str::contains("Converted 3 entries under 4 headers"))
        .stdout(predicate::str::contains("Sections: # 1, A 1, B 1"));

    assert_eq!(
        fs::read_to_string(&csv).unwrap(),
        "A\nACE;angiotensin-converting enzyme\n\"\"\nB\nBP;blood pressure\nZZ\nSOB;shortness of breath\n"
    );

    set_up_command(dir.path())
        .env("MEDTERMS_STORAGE__SEED_PATH", &json)
        .args(["list", "--section", "#"])
        .assert()
        .success()
        .stdout(predicate::str::contains("SOB: shortness of breath"));
}

#[test]
fn test_config_show_json() {
    let dir = TempDir::new().unwrap();
    set_up_command(dir.path())
        .args(["config", "show", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("csv_delimiter"))
        .stdout(predicate::str::contains("MedicalTerms.json"));
}

#[test]
fn test_config_env_validation() {
    let dir = TempDir::new().unwrap();
    set_up_command(dir.path())
        .env("MEDTERMS_INGEST__CSV_DELIMITER", "::")
        .arg("status")
        .assert()
        .failure()
        .stderr(predicate::str::contains("csv_delimiter"));
}
