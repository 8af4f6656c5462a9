use std::path::PathBuf;
use std::process::Command;
use std::time::{SystemTime, UNIX_EPOCH};

fn temp_path(file_name: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    std::env::temp_dir().join(format!("agenda-{nanos}-{file_name}"))
}

fn write_store(path: &PathBuf, events: serde_json::Value) {
    let content = serde_json::json!({
        "schema_version": 1,
        "events": events
    });
    std::fs::write(path, serde_json::to_string_pretty(&content).unwrap()).unwrap();
}

fn store_with_open_task() -> serde_json::Value {
    serde_json::json!([
        {
            "name": "Launch",
            "start_date": "2026-03-01",
            "end_date": "2026-03-05",
            "tasks": [
                {
                    "title": "Announce opening",
                    "area": "marketing",
                    "due_date": "2026-04-10",
                    "assignee_ids": [42],
                    "progress": 80,
                    "done": false
                }
            ]
        }
    ])
}

#[test]
fn done_then_review_exclusivity() {
    let exe = env!("CARGO_BIN_EXE_agenda");
    let store_path = temp_path("cli-review.json");
    write_store(&store_path, store_with_open_task());
    let no_config = temp_path("no-config.json");

    // Assignee 42 submits, naming Alice (7) as the reviewer.
    let output = Command::new(exe)
        .args([
            "done",
            "1",
            "1",
            "https://example.com/doc",
            "--reviewer",
            "7",
            "--reviewer-roles",
            "diretoria",
            "--actor",
            "42",
        ])
        .env("AGENDA_STORE_PATH", &store_path)
        .env("AGENDA_CONFIG_PATH", &no_config)
        .output()
        .expect("failed to run done");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("submitted for review to @7"));

    // Bob (8) is a manager but not the assigned reviewer.
    let output = Command::new(exe)
        .args([
            "review", "1", "1", "approve", "--actor", "8", "--roles", "diretoria",
        ])
        .env("AGENDA_STORE_PATH", &store_path)
        .env("AGENDA_CONFIG_PATH", &no_config)
        .output()
        .expect("failed to run review");
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("ERROR: authorization"));

    // Alice approves.
    let output = Command::new(exe)
        .args([
            "review", "1", "1", "approve", "--actor", "7", "--roles", "diretoria",
        ])
        .env("AGENDA_STORE_PATH", &store_path)
        .env("AGENDA_CONFIG_PATH", &no_config)
        .output()
        .expect("failed to run review");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Review approved."));

    let stored: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&store_path).unwrap()).unwrap();
    std::fs::remove_file(&store_path).ok();

    let task = &stored["events"][0]["tasks"][0];
    assert_eq!(task["done"], true);
    assert_eq!(task["reviewed"], true);
    assert_eq!(task["progress"], 100);
}

#[test]
fn rejection_reopens_at_90_with_comment() {
    let exe = env!("CARGO_BIN_EXE_agenda");
    let store_path = temp_path("cli-review-reject.json");
    write_store(&store_path, store_with_open_task());
    let no_config = temp_path("no-config.json");

    let output = Command::new(exe)
        .args([
            "done",
            "1",
            "1",
            "https://example.com/doc",
            "--reviewer",
            "7",
            "--reviewer-roles",
            "lideranca",
            "--actor",
            "42",
        ])
        .env("AGENDA_STORE_PATH", &store_path)
        .env("AGENDA_CONFIG_PATH", &no_config)
        .output()
        .expect("failed to run done");
    assert!(output.status.success());

    let output = Command::new(exe)
        .args([
            "review",
            "1",
            "1",
            "reject",
            "-m",
            "missing the final numbers",
            "--actor",
            "7",
            "--roles",
            "lideranca",
        ])
        .env("AGENDA_STORE_PATH", &store_path)
        .env("AGENDA_CONFIG_PATH", &no_config)
        .output()
        .expect("failed to run review");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("reopened at 90%"));
    assert!(stdout.contains("Comment: missing the final numbers"));

    let stored: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&store_path).unwrap()).unwrap();
    std::fs::remove_file(&store_path).ok();

    let task = &stored["events"][0]["tasks"][0];
    assert_eq!(task["done"], false);
    assert_eq!(task["progress"], 90);
    assert_eq!(task["reviewer_id"], 7);
    assert_eq!(task["delivery_link"], "https://example.com/doc");
}

#[test]
fn done_rejects_non_manager_reviewer() {
    let exe = env!("CARGO_BIN_EXE_agenda");
    let store_path = temp_path("cli-review-candidate.json");
    write_store(&store_path, store_with_open_task());

    let output = Command::new(exe)
        .args([
            "done",
            "1",
            "1",
            "https://example.com/doc",
            "--reviewer",
            "9",
            "--reviewer-roles",
            "membro",
            "--actor",
            "42",
        ])
        .env("AGENDA_STORE_PATH", &store_path)
        .env("AGENDA_CONFIG_PATH", temp_path("no-config.json"))
        .output()
        .expect("failed to run done");

    let stored: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&store_path).unwrap()).unwrap();
    std::fs::remove_file(&store_path).ok();

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("ERROR: authorization"));
    // Nothing was mutated.
    assert_eq!(stored["events"][0]["tasks"][0]["progress"], 80);
    assert_eq!(stored["events"][0]["tasks"][0]["done"], false);
}

#[test]
fn review_requires_manager_role() {
    let exe = env!("CARGO_BIN_EXE_agenda");
    let store_path = temp_path("cli-review-role.json");
    write_store(&store_path, store_with_open_task());

    let output = Command::new(exe)
        .args([
            "review", "1", "1", "approve", "--actor", "42", "--roles", "membro",
        ])
        .env("AGENDA_STORE_PATH", &store_path)
        .env("AGENDA_CONFIG_PATH", temp_path("no-config.json"))
        .output()
        .expect("failed to run review");

    std::fs::remove_file(&store_path).ok();
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("ERROR: authorization"));
}
