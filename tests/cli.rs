//! End-to-end runs of the `restype` binary

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::json;
use std::fs;
use tempfile::TempDir;

fn catalog(dir: &TempDir) -> std::path::PathBuf {
    let path = dir.path().join("catalog.json");
    let catalog = json!({
        "types": [
            {
                "name": "Book",
                "properties": [
                    {"name": "title", "kind": "attribute", "readable": true, "initializable": true, "required": true},
                    {"name": "author", "kind": "to_one", "target": "Person", "readable": true}
                ]
            },
            {"name": "Person", "exposed_as_primary_resource": false}
        ],
        "internal_types": ["AuditLog"],
        "entities": [{"type": "Person", "id": "1"}]
    });
    fs::write(&path, catalog.to_string()).unwrap();
    path
}

#[test]
fn test_inspect() {
    let dir = TempDir::new().unwrap();
    let catalog = catalog(&dir);

    Command::cargo_bin("restype")
        .unwrap()
        .env("NO_COLOR", "1")
        .args(["inspect", "--catalog"])
        .arg(&catalog)
        .assert()
        .success()
        .stdout(predicate::str::contains("Book"))
        .stdout(predicate::str::contains("to-one -> Person"))
        .stdout(predicate::str::contains("AuditLog"));
}

#[test]
fn test_catalog_from_environment() {
    let dir = TempDir::new().unwrap();
    let catalog = catalog(&dir);

    Command::cargo_bin("restype")
        .unwrap()
        .env("RESTYPE_CATALOG", &catalog)
        .arg("docs")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"openapi\": \"3.0.2\""))
        .stdout(predicate::str::contains("#/components/schemas/Person"));
}

#[test]
fn test_resolve_duplicate_field_fails() {
    let dir = TempDir::new().unwrap();
    let catalog = catalog(&dir);
    let request = dir.path().join("request.json");
    fs::write(
        &request,
        json!({
            "attributes": {"author": "x"},
            "relationships": {"author": {"data": {"type": "Person", "id": "1"}}}
        })
        .to_string(),
    )
    .unwrap();

    Command::cargo_bin("restype")
        .unwrap()
        .args(["resolve", "--type", "Book", "--catalog"])
        .arg(&catalog)
        .arg("--request")
        .arg(&request)
        .assert()
        .failure()
        .stderr(predicate::str::contains("author"));
}

#[test]
fn test_missing_subcommand() {
    Command::cargo_bin("restype").unwrap().assert().failure();
}
