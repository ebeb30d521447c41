//! End-to-end tests of the `curator` binary.

use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const CARD: &str = "\
NORTHWIND TRADING CO.
Where Quality Meets Value
Maria Clara Reyes, CPA
Finance Manager
2F Northwind Bldg., 88 Rizal Avenue
Cebu City 6000 Tel: (032) 412-5566
maria.reyes@northwind.com.ph
0917-555-0101";

/// Command isolated from the user's config, keys and contacts.
fn curator(dir: &Path) -> Command {
    let config = dir.join("config.json");
    if !config.exists() {
        let json = serde_json::json!({
            "ai": { "mode": "off" },
            "store": { "path": dir.join("contacts.json") }
        });
        fs::write(&config, json.to_string()).unwrap();
    }

    let mut cmd = Command::cargo_bin("curator").unwrap();
    cmd.current_dir(dir)
        .env("XDG_CONFIG_HOME", dir)
        .env_remove("GEMINI_API_KEY")
        .env_remove("GOOGLE_API_KEY")
        .env_remove("RUST_LOG")
        .arg("-c")
        .arg(&config);
    cmd
}

#[test]
fn test_parse_text_to_json() {
    let dir = TempDir::new().unwrap();

    let output = curator(dir.path())
        .args(["parse", "--text", CARD])
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["card"]["name"], "Maria Clara Reyes, CPA");
    assert_eq!(json["card"]["company"], "NORTHWIND TRADING CO.");
    assert_eq!(json["card"]["email"][0], "maria.reyes@northwind.com.ph");
    assert_eq!(json["source"], "rules");
}

#[test]
fn test_parse_stdin_as_text() {
    let dir = TempDir::new().unwrap();

    curator(dir.path())
        .args(["parse", "-", "--format", "text"])
        .write_stdin("Jane Roe\nSenior Engineer\nAcme Corp.\njane@acme.com\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Name:     Jane Roe"))
        .stdout(predicate::str::contains("Position: Senior Engineer"))
        .stdout(predicate::str::contains("Email:    jane@acme.com"));
}

#[test]
fn test_parse_missing_file() {
    let dir = TempDir::new().unwrap();

    curator(dir.path())
        .args(["parse", "no-such-card.txt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Input file not found"));
}

#[test]
fn test_ai_only_without_key_fails() {
    let dir = TempDir::new().unwrap();

    curator(dir.path())
        .args(["parse", "--ai", "only", "--text", "Jane Roe"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not configured"));
}

#[test]
fn test_ai_prefer_without_key_falls_back() {
    let dir = TempDir::new().unwrap();

    curator(dir.path())
        .args(["parse", "--ai", "prefer", "--text", "Jane Roe\nAcme Corp."])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"source\": \"rules\""))
        .stderr(predicate::str::contains("used rule-based parser"));
}

#[test]
fn test_save_list_export_and_duplicates() {
    let dir = TempDir::new().unwrap();

    curator(dir.path())
        .args(["parse", "--text", CARD, "--save", "--notes", "met at expo"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Saved contact"));

    // Same card again is an exact duplicate and is skipped.
    curator(dir.path())
        .args(["parse", "--text", CARD, "--save"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Possible duplicate"))
        .stderr(predicate::str::contains("Not saved"));

    curator(dir.path())
        .args(["parse", "--text", CARD, "--save", "--force"])
        .assert()
        .success();

    curator(dir.path())
        .args(["contacts", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Maria Clara Reyes, CPA"))
        .stdout(predicate::str::contains("2 contacts"));

    curator(dir.path())
        .args(["contacts", "export", "--format", "csv"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with(
            "Name,Position,Company,Phone,Email,Address,Notes,ScannedAt,UpdatedAt",
        ))
        .stdout(predicate::str::contains("met at expo"));

    curator(dir.path())
        .args(["contacts", "duplicates"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Same email address"));

    curator(dir.path())
        .args(["contacts", "clear"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--yes"));

    curator(dir.path())
        .args(["contacts", "clear", "--yes"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Deleted 2 contacts"));
}

#[test]
fn test_batch_text_files() {
    let dir = TempDir::new().unwrap();
    let cards = dir.path().join("cards");
    fs::create_dir_all(&cards).unwrap();
    fs::write(cards.join("northwind.txt"), CARD).unwrap();
    fs::write(cards.join("acme.txt"), "Jane Roe\nSenior Engineer\nAcme Corp.").unwrap();
    fs::write(cards.join("blank.txt"), "  \n").unwrap();

    let out = dir.path().join("out");
    let pattern = format!("{}/*.txt", cards.display());

    curator(dir.path())
        .args(["batch", &pattern, "--continue-on-error", "--summary", "-o"])
        .arg(&out)
        .assert()
        .success()
        .stderr(predicate::str::contains("2 successful, 1 failed"));

    let acme: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(out.join("acme.json")).unwrap()).unwrap();
    assert_eq!(acme["card"]["name"], "Jane Roe");
    assert!(out.join("northwind.json").exists());

    let summary = fs::read_to_string(out.join("summary.csv")).unwrap();
    assert!(summary.starts_with("filename,status,source"));
    assert!(summary.contains("blank.txt,error"));
}

#[test]
fn test_batch_files_sharing_a_stem() {
    let dir = TempDir::new().unwrap();
    let cards = dir.path().join("cards");
    fs::create_dir_all(&cards).unwrap();
    fs::write(cards.join("card.txt"), "Jane Roe\nAcme Corp.").unwrap();
    fs::write(cards.join("card.text"), "John Doe\nZentro Inc.").unwrap();

    let out = dir.path().join("out");
    let pattern = format!("{}/card.*", cards.display());

    curator(dir.path())
        .args(["batch", &pattern, "-o"])
        .arg(&out)
        .assert()
        .success();

    let jane = fs::read_to_string(out.join("card.txt.json")).unwrap();
    let john = fs::read_to_string(out.join("card.text.json")).unwrap();
    assert!(jane.contains("Jane Roe"));
    assert!(john.contains("John Doe"));
    assert!(!out.join("card.json").exists());
}

#[test]
fn test_config_set_and_get() {
    let dir = TempDir::new().unwrap();

    curator(dir.path())
        .args(["config", "set", "parser.weights.tagline", "-7"])
        .assert()
        .success();

    curator(dir.path())
        .args(["config", "get", "parser.weights.tagline"])
        .assert()
        .success()
        .stdout(predicate::str::diff("-7\n"));

    curator(dir.path())
        .args(["config", "set", "ai.mode", "sometimes"])
        .assert()
        .failure();

    curator(dir.path())
        .args(["config", "get", "no.such.key"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}
