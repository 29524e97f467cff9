use predicates::prelude::PredicateBooleanExt;
use predicates::str::contains;
use std::fs;

mod common;
use common::{init_db_with_data, rcl, setup_test_db, temp_out};

#[test]
fn test_init_creates_schema() {
    let db_path = setup_test_db("cli_init");

    rcl()
        .args(["--db", &db_path, "--test", "init"])
        .assert()
        .success()
        .stdout(contains("Database initialized"));

    // second init is a no-op
    rcl()
        .args(["--db", &db_path, "--test", "init"])
        .assert()
        .success();

    rcl()
        .args(["--db", &db_path, "list"])
        .assert()
        .success()
        .stdout(contains("No events recorded."));
}

#[test]
fn test_list_newest_first_with_limit() {
    let db_path = setup_test_db("cli_list");
    init_db_with_data(&db_path);

    let out = rcl()
        .args(["--db", &db_path, "list"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let text = String::from_utf8_lossy(&out);
    let epi = text.find("Epinephrine").expect("epi listed");
    let ohca = text.find("OHCA").expect("ohca listed");
    assert!(epi < ohca);

    rcl()
        .args(["--db", &db_path, "list", "--limit", "1"])
        .assert()
        .success()
        .stdout(contains("Epinephrine").and(contains("OHCA").not()));
}

#[test]
fn test_clear_twice() {
    let db_path = setup_test_db("cli_clear");
    init_db_with_data(&db_path);

    rcl()
        .args(["--db", &db_path, "clear"])
        .assert()
        .success()
        .stdout(contains("Removed 2 records."));

    rcl()
        .args(["--db", &db_path, "clear"])
        .assert()
        .success()
        .stdout(contains("Removed 0 records."));

    rcl()
        .args(["--db", &db_path, "log", "--print"])
        .assert()
        .success()
        .stdout(contains("clear"));
}

#[test]
fn test_export_csv_and_json() {
    let db_path = setup_test_db("cli_export");
    init_db_with_data(&db_path);

    let csv_out = temp_out("cli_export", "csv");
    rcl()
        .args(["--db", &db_path, "export", "--format", "csv", "--file", &csv_out])
        .assert()
        .success();
    let content = fs::read_to_string(&csv_out).expect("read exported csv");
    assert!(content.starts_with("id,event_name,note,timestamp,extra"));
    assert!(content.contains("2025/09/01 10:04"));

    let json_out = temp_out("cli_export", "json");
    rcl()
        .args(["--db", &db_path, "export", "--format", "json", "--file", &json_out])
        .assert()
        .success();
    let rows: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&json_out).expect("read json")).expect("parse json");
    assert_eq!(rows.as_array().map(|a| a.len()), Some(2));
    assert_eq!(rows[0]["event_name"], "Epinephrine 1mg IV-push");
    assert_eq!(rows[1]["extra"], "");
}

#[test]
fn test_export_xml_and_xlsx() {
    let db_path = setup_test_db("cli_export_xml");
    init_db_with_data(&db_path);

    let xml_out = temp_out("cli_export_xml", "xml");
    rcl()
        .args(["--db", &db_path, "export", "--format", "xml", "--file", &xml_out])
        .assert()
        .success();
    let xml = fs::read_to_string(&xml_out).expect("read xml");
    assert!(xml.contains("<name>OHCA</name>"));

    let xlsx_out = temp_out("cli_export_xml", "xlsx");
    rcl()
        .args(["--db", &db_path, "export", "--file", &xlsx_out])
        .assert()
        .success();
    assert!(fs::metadata(&xlsx_out).map(|m| m.len() > 0).unwrap_or(false));

    // existing file without --force and a declined prompt
    rcl()
        .args(["--db", &db_path, "export", "--file", &xlsx_out])
        .write_stdin("n\n")
        .assert()
        .failure()
        .stderr(contains("Export cancelled"));
}

#[test]
fn test_session_auto_records_keyword_and_shows_logs() {
    let db_path = setup_test_db("cli_session");
    init_db_with_data(&db_path);

    rcl()
        .args(["--db", &db_path, "run"])
        .write_stdin("record ROSC achieved\nshow logs\nexit\n")
        .assert()
        .success()
        .stdout(contains("Auto-recorded event"))
        .stdout(contains("<name>auto-record</name>"))
        .stdout(contains("not configured"))
        .stdout(contains("bye"));

    // previous records were cleared at session start
    rcl()
        .args(["--db", &db_path, "list"])
        .assert()
        .success()
        .stdout(contains("auto-record").and(contains("OHCA").not()));
}

#[test]
fn test_session_keep_preserves_history() {
    let db_path = setup_test_db("cli_session_keep");
    init_db_with_data(&db_path);

    rcl()
        .args(["--db", &db_path, "run", "--keep"])
        .write_stdin("help\nq\n")
        .assert()
        .success()
        .stdout(contains("Available commands"));

    rcl()
        .args(["--db", &db_path, "list"])
        .assert()
        .success()
        .stdout(contains("OHCA"));
}

#[test]
fn test_foreground_timer() {
    rcl()
        .args(["timer", "--seconds", "1", "--label", "pulse check"])
        .assert()
        .success()
        .stdout(contains("pulse check: time's up! (1s)"))
        .stdout(contains("[callback] timer 'pulse check' finished (1s)"));
}
