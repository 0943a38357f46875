//! Integration tests for the file-backed session store and the `ss` binary

use assert_cmd::Command;
use predicates::prelude::*;
use sessionstore::{FileStore, SessionStore};
use tempfile::TempDir;

#[test]
fn test_values_survive_reopen() {
    let temp = TempDir::new().expect("Failed to create temp dir");
    let path = temp.path().join("session.json");

    {
        let store = FileStore::open(&path).unwrap();
        store.set("walletConnected", "true").unwrap();
    }

    let reopened = FileStore::open(&path).unwrap();
    assert_eq!(reopened.get("walletConnected").unwrap().as_deref(), Some("true"));
}

#[test]
fn test_two_handles_see_each_others_writes() {
    let temp = TempDir::new().expect("Failed to create temp dir");
    let path = temp.path().join("session.json");

    let a = FileStore::open(&path).unwrap();
    let b = FileStore::open(&path).unwrap();

    a.set("first", "1").unwrap();
    b.set("second", "2").unwrap();

    let entries = a.entries().unwrap();
    assert_eq!(
        entries,
        vec![
            ("first".to_string(), "1".to_string()),
            ("second".to_string(), "2".to_string())
        ]
    );
}

#[test]
fn test_no_temp_file_left_behind() {
    let temp = TempDir::new().expect("Failed to create temp dir");
    let store = FileStore::open(temp.path().join("session.json")).unwrap();
    store.set("k", "v").unwrap();
    assert!(!temp.path().join("session.json.tmp").exists());
}

#[test]
fn test_cli_set_get_remove() {
    let temp = TempDir::new().expect("Failed to create temp dir");
    let path = temp.path().join("session.json");
    let path_str = path.to_string_lossy().to_string();

    Command::cargo_bin("ss")
        .unwrap()
        .args(["--store", &path_str, "set", "walletConnected", "true"])
        .assert()
        .success();

    Command::cargo_bin("ss")
        .unwrap()
        .args(["--store", &path_str, "get", "walletConnected"])
        .assert()
        .success()
        .stdout(predicate::str::contains("true"));

    Command::cargo_bin("ss")
        .unwrap()
        .args(["--store", &path_str, "remove", "walletConnected"])
        .assert()
        .success();

    Command::cargo_bin("ss")
        .unwrap()
        .args(["--store", &path_str, "get", "walletConnected"])
        .assert()
        .failure();
}

#[test]
fn test_cli_list_empty() {
    let temp = TempDir::new().expect("Failed to create temp dir");
    let path_str = temp.path().join("session.json").to_string_lossy().to_string();

    Command::cargo_bin("ss")
        .unwrap()
        .args(["--store", &path_str, "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No keys stored"));
}
