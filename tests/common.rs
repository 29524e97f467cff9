#![allow(dead_code)]
use assert_cmd::{Command, cargo_bin_cmd};
use std::env;
use std::fs;
use std::path::PathBuf;

/// Binary under test, with the classifier disabled.
pub fn rcl() -> Command {
    let mut cmd = cargo_bin_cmd!("rcarelog");
    cmd.env("OPENAI_API_KEY", "");
    cmd
}

/// Create a unique test DB path inside the system temp dir and remove any existing file
pub fn setup_test_db(name: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_rcarelog.sqlite", name));
    let db_path = path.to_string_lossy().to_string();
    fs::remove_file(&db_path).ok();
    db_path
}

/// Create a temporary output file path inside tempdir and ensure it's removed
pub fn temp_out(name: &str, ext: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_out.{}", name, ext));
    let p = path.to_string_lossy().to_string();
    fs::remove_file(&p).ok();
    p
}

/// Initialize the DB and add a few records directly through the library API
pub fn init_db_with_data(db_path: &str) {
    rcl()
        .args(["--db", db_path, "--test", "init"])
        .assert()
        .success();

    let store = rcarelog::db::EventStore::open(db_path).expect("open db");
    store.init().expect("init db");
    store
        .append("OHCA", "patient found unresponsive", Some("2025/09/01 10:00"), None)
        .expect("append");
    store
        .append(
            "Epinephrine 1mg IV-push",
            "",
            Some("2025/09/01 10:04"),
            Some(&serde_json::json!({"dose": "1mg", "route": "IV"})),
        )
        .expect("append");
}
