//! CLI integration tests for taskrank
//!
//! These tests run the binary end to end: project setup, the stored task
//! list, and ranking batches read from files and stdin.

use predicates::prelude::*;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

const SAMPLE_BATCH: &str = r#"[
  {"id": "t1", "title": "A", "estimated_hours": 0.5, "importance": 5, "dependencies": []},
  {"id": "t2", "title": "B", "due_date": "2025-12-01", "estimated_hours": 8, "importance": 9, "dependencies": []},
  {"id": "t3", "title": "C", "due_date": "2025-11-20", "estimated_hours": 2, "importance": 7, "dependencies": ["t1"]}
]"#;

const CYCLE_BATCH: &str = r#"[
  {"id": "a", "title": "A", "dependencies": ["b"]},
  {"id": "b", "title": "B", "dependencies": ["a"]}
]"#;

/// Get a command instance for the taskrank binary
fn taskrank_cmd() -> assert_cmd::Command {
    let mut cmd = assert_cmd::Command::new(assert_cmd::cargo::cargo_bin!("taskrank"));
    cmd.env_remove("TASKRANK_STRATEGY");
    cmd
}

/// Create a temporary directory and initialize a taskrank project
fn setup_project() -> TempDir {
    let dir = TempDir::new().unwrap();
    taskrank_cmd().arg("init").arg(dir.path()).assert().success();
    dir
}

/// Write a batch file into the directory and return its path
fn write_batch(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

fn json_stdout(output: &std::process::Output) -> serde_json::Value {
    serde_json::from_slice(&output.stdout).unwrap()
}

fn ids(list: &serde_json::Value) -> Vec<String> {
    list.as_array()
        .unwrap()
        .iter()
        .map(|t| t["id"].as_str().unwrap().to_string())
        .collect()
}

// =============================================================================
// Initialization Tests
// =============================================================================

#[test]
fn test_init_creates_structure() {
    let dir = TempDir::new().unwrap();

    taskrank_cmd()
        .arg("init")
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Initialized taskrank project"));

    assert!(dir.path().join(".taskrank").is_dir());
    assert!(dir.path().join(".taskrank/config.toml").is_file());
    assert!(dir.path().join(".taskrank/tasks.jsonl").is_file());
}

#[test]
fn test_init_is_idempotent() {
    let dir = TempDir::new().unwrap();

    taskrank_cmd().arg("init").arg(dir.path()).assert().success();
    taskrank_cmd().arg("init").arg(dir.path()).assert().success();
}

#[test]
fn test_not_in_project_error() {
    let dir = TempDir::new().unwrap();

    taskrank_cmd()
        .current_dir(dir.path())
        .args(["task", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Not in a taskrank project"));
}

// =============================================================================
// Task Store Tests
// =============================================================================

#[test]
fn test_task_add_and_list() {
    let dir = setup_project();

    taskrank_cmd()
        .current_dir(dir.path())
        .args(["task", "add", "Write report", "--id", "r1", "--hours", "3", "--importance", "8"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created task: r1 - Write report"));

    taskrank_cmd()
        .current_dir(dir.path())
        .args(["task", "add", "Send report", "--id", "r2", "--due", "2025-11-20", "--depends-on", "r1"])
        .assert()
        .success();

    taskrank_cmd()
        .current_dir(dir.path())
        .args(["task", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Write report"))
        .stdout(predicate::str::contains("Send report"))
        .stdout(predicate::str::contains("2025-11-20"));
}

#[test]
fn test_task_add_generates_id() {
    let dir = setup_project();

    let output = taskrank_cmd()
        .current_dir(dir.path())
        .args(["--format", "json", "task", "add", "Fix typo"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let task = json_stdout(&output);
    assert!(task["id"].as_str().unwrap().starts_with("t-"));
    assert_eq!(task["title"], "Fix typo");
    assert_eq!(task["estimated_hours"], 1.0);
    assert_eq!(task["importance"], 5);
}

#[test]
fn test_task_add_duplicate_id_fails() {
    let dir = setup_project();

    taskrank_cmd()
        .current_dir(dir.path())
        .args(["task", "add", "First", "--id", "x"])
        .assert()
        .success();

    taskrank_cmd()
        .current_dir(dir.path())
        .args(["task", "add", "Second", "--id", "x"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Task already exists: x"));
}

#[test]
fn test_task_add_rejects_bad_due_date() {
    let dir = setup_project();

    taskrank_cmd()
        .current_dir(dir.path())
        .args(["task", "add", "Later", "--due", "next week"])
        .assert()
        .failure();
}

#[test]
fn test_task_add_rejects_reserved_prefix() {
    let dir = setup_project();

    taskrank_cmd()
        .current_dir(dir.path())
        .args(["task", "add", "Sneaky", "--id", "__tmp__abc"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("must not start with '__tmp__'"));
}

#[test]
fn test_task_add_warns_about_new_cycle() {
    let dir = setup_project();

    taskrank_cmd()
        .current_dir(dir.path())
        .args(["task", "add", "First", "--id", "a", "--depends-on", "b"])
        .assert()
        .success()
        .stderr(predicate::str::contains("circular").not());

    taskrank_cmd()
        .current_dir(dir.path())
        .args(["task", "add", "Second", "--id", "b", "--depends-on", "a"])
        .assert()
        .success()
        .stderr(predicate::str::contains("b is part of a circular dependency"));
}

#[test]
fn test_task_remove() {
    let dir = setup_project();

    taskrank_cmd()
        .current_dir(dir.path())
        .args(["task", "add", "Base", "--id", "base"])
        .assert()
        .success();
    taskrank_cmd()
        .current_dir(dir.path())
        .args(["task", "add", "Top", "--id", "top", "--depends-on", "base"])
        .assert()
        .success();

    taskrank_cmd()
        .current_dir(dir.path())
        .args(["task", "remove", "base"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Removed task: base"))
        .stderr(predicate::str::contains("still listed as a dependency by: top"));

    taskrank_cmd()
        .current_dir(dir.path())
        .args(["task", "remove", "base"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Task not found: base"));
}

#[test]
fn test_empty_task_list() {
    let dir = setup_project();

    taskrank_cmd()
        .current_dir(dir.path())
        .args(["task", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No tasks"));
}

// =============================================================================
// Analyze Tests
// =============================================================================

#[test]
fn test_analyze_file_orders_by_score() {
    let dir = TempDir::new().unwrap();
    let path = write_batch(&dir, "tasks.json", SAMPLE_BATCH);

    let output = taskrank_cmd()
        .current_dir(dir.path())
        .args(["--format", "json", "analyze"])
        .arg(&path)
        .args(["--today", "2025-11-15"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let json = json_stdout(&output);
    let sorted = &json["sorted_tasks"];
    assert_eq!(ids(sorted), vec!["t3", "t2", "t1"]);
    assert_eq!(sorted[0]["score"], 66.12);
    assert_eq!(sorted[1]["score"], 53.21);
    assert_eq!(sorted[2]["score"], 44.62);
    assert_eq!(
        sorted[2]["explanation"],
        "urgency(0.2)*0.35; importance(0.5)*0.35; effort(0.71)*0.2; dependency(0.6)*0.1"
    );
    assert_eq!(sorted[2]["circular_dependency"], false);
    assert_eq!(sorted[0]["priority"], "medium");
    assert_eq!(json["cycles"], serde_json::json!([]));
}

#[test]
fn test_analyze_text_output() {
    let dir = TempDir::new().unwrap();
    let path = write_batch(&dir, "tasks.json", SAMPLE_BATCH);

    taskrank_cmd()
        .current_dir(dir.path())
        .arg("analyze")
        .arg(&path)
        .args(["--today", "2025-11-15"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Ranked tasks (3), as of 2025-11-15"))
        .stdout(predicate::str::contains("66.12"))
        .stdout(predicate::str::contains("urgency(0.47)*0.35; importance(0.9)*0.35; effort(0.27)*0.2"));
}

#[test]
fn test_analyze_flags_mutual_dependency() {
    let dir = TempDir::new().unwrap();
    let path = write_batch(&dir, "cycle.json", CYCLE_BATCH);

    let output = taskrank_cmd()
        .current_dir(dir.path())
        .args(["-f", "json", "analyze"])
        .arg(&path)
        .args(["--today", "2025-11-15"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let json = json_stdout(&output);
    assert_eq!(json["cycles"], serde_json::json!([["a", "b", "a"]]));
    for task in json["sorted_tasks"].as_array().unwrap() {
        assert_eq!(task["circular_dependency"], true);
        assert!(task["explanation"]
            .as_str()
            .unwrap()
            .ends_with(" | Note: involved in circular dependency"));
    }
}

#[test]
fn test_unknown_strategy_matches_smart_balance() {
    let dir = TempDir::new().unwrap();
    let path = write_batch(&dir, "tasks.json", SAMPLE_BATCH);

    let run = |strategy: &str| {
        let output = taskrank_cmd()
            .current_dir(dir.path())
            .args(["--format", "json", "analyze"])
            .arg(&path)
            .args(["--today", "2025-11-15", "--strategy", strategy])
            .output()
            .unwrap();
        assert!(output.status.success());
        json_stdout(&output)
    };

    assert_eq!(run("not_a_strategy"), run("smart_balance"));
}

#[test]
fn test_strategy_changes_order() {
    let dir = TempDir::new().unwrap();
    let path = write_batch(
        &dir,
        "tasks.json",
        r#"[
          {"id": "quick", "title": "Quick", "estimated_hours": 0.5, "importance": 3},
          {"id": "big", "title": "Big", "estimated_hours": 20, "importance": 10}
        ]"#,
    );

    let top = |strategy: &str| {
        let output = taskrank_cmd()
            .current_dir(dir.path())
            .args(["--format", "json", "analyze"])
            .arg(&path)
            .args(["--today", "2025-11-15", "--strategy", strategy])
            .output()
            .unwrap();
        ids(&json_stdout(&output)["sorted_tasks"])[0].clone()
    };

    assert_eq!(top("fastest_wins"), "quick");
    assert_eq!(top("high_impact"), "big");
}

#[test]
fn test_analyze_reads_stdin() {
    let dir = TempDir::new().unwrap();

    let output = taskrank_cmd()
        .current_dir(dir.path())
        .args(["--format", "json", "analyze", "-", "--today", "2025-11-15"])
        .write_stdin(SAMPLE_BATCH)
        .output()
        .unwrap();

    assert!(output.status.success());
    assert_eq!(ids(&json_stdout(&output)["sorted_tasks"]), vec!["t3", "t2", "t1"]);
}

#[test]
fn test_analyze_yaml_batch() {
    let dir = TempDir::new().unwrap();
    let path = write_batch(
        &dir,
        "tasks.yaml",
        "- id: t1\n  title: A\n  estimated_hours: 0.5\n  importance: 5\n\
         - id: t2\n  title: B\n  due_date: 2025-12-01\n  estimated_hours: 8\n  importance: 9\n\
         - id: t3\n  title: C\n  due_date: 2025-11-20\n  estimated_hours: 2\n  importance: 7\n  dependencies: [t1]\n",
    );

    let output = taskrank_cmd()
        .current_dir(dir.path())
        .args(["--format", "json", "analyze"])
        .arg(&path)
        .args(["--today", "2025-11-15"])
        .output()
        .unwrap();

    assert!(output.status.success());
    assert_eq!(ids(&json_stdout(&output)["sorted_tasks"]), vec!["t3", "t2", "t1"]);
}

#[test]
fn test_missing_title_is_rejected() {
    let dir = TempDir::new().unwrap();
    let path = write_batch(
        &dir,
        "bad.json",
        r#"[{"id": "ok", "title": "Fine"}, {"id": "bad"}, {"importance": 3}]"#,
    );

    taskrank_cmd()
        .current_dir(dir.path())
        .arg("analyze")
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("#1: missing title"))
        .stderr(predicate::str::contains("#2: missing title"));
}

#[test]
fn test_invalid_records_are_listed_as_json() {
    let dir = TempDir::new().unwrap();
    let path = write_batch(&dir, "bad.json", r#"[{"id": "a"}, {"id": "b", "title": "B"}]"#);

    let output = taskrank_cmd()
        .current_dir(dir.path())
        .args(["--format", "json", "analyze"])
        .arg(&path)
        .output()
        .unwrap();

    assert!(!output.status.success());
    assert_eq!(
        json_stdout(&output),
        serde_json::json!({"errors": [{"index": 0, "error": "missing title"}]})
    );
}

#[test]
fn test_whitespace_title_is_accepted() {
    let dir = TempDir::new().unwrap();
    let path = write_batch(&dir, "tasks.json", r#"[{"id": "a", "title": " "}]"#);

    taskrank_cmd()
        .current_dir(dir.path())
        .args(["--format", "json", "analyze"])
        .arg(&path)
        .assert()
        .success();
}

#[test]
fn test_missing_id_gets_temporary_id() {
    let dir = TempDir::new().unwrap();
    let path = write_batch(&dir, "tasks.json", r#"[{"title": "Anonymous"}]"#);

    let output = taskrank_cmd()
        .current_dir(dir.path())
        .args(["--format", "json", "analyze"])
        .arg(&path)
        .output()
        .unwrap();

    assert!(output.status.success());
    let id = ids(&json_stdout(&output)["sorted_tasks"]).remove(0);
    assert!(id.starts_with("__tmp__"));
}

#[test]
fn test_analyze_stored_tasks() {
    let dir = setup_project();

    taskrank_cmd()
        .current_dir(dir.path())
        .args(["task", "add", "Low", "--id", "low", "--importance", "1", "--hours", "10"])
        .assert()
        .success();
    taskrank_cmd()
        .current_dir(dir.path())
        .args(["task", "add", "High", "--id", "high", "--importance", "10", "--hours", "0.5"])
        .assert()
        .success();

    let output = taskrank_cmd()
        .current_dir(dir.path())
        .args(["--format", "json", "analyze", "--today", "2025-11-15"])
        .output()
        .unwrap();

    assert!(output.status.success());
    assert_eq!(ids(&json_stdout(&output)["sorted_tasks"]), vec!["high", "low"]);
}

// =============================================================================
// Suggest Tests
// =============================================================================

#[test]
fn test_suggest_top_three() {
    let dir = TempDir::new().unwrap();
    let path = write_batch(
        &dir,
        "tasks.json",
        r#"[
          {"id": "a", "title": "A", "importance": 1},
          {"id": "b", "title": "B", "importance": 9},
          {"id": "c", "title": "C", "importance": 5},
          {"id": "d", "title": "D", "importance": 7},
          {"id": "e", "title": "E", "importance": 3}
        ]"#,
    );

    let output = taskrank_cmd()
        .current_dir(dir.path())
        .args(["--format", "json", "suggest"])
        .arg(&path)
        .args(["--today", "2025-11-15"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let json = json_stdout(&output);
    assert_eq!(ids(&json["suggestions"]), vec!["b", "d", "c"]);
    assert!(json["suggestions"][0]["why"]
        .as_str()
        .unwrap()
        .starts_with("urgency("));
}

#[test]
fn test_suggest_limit() {
    let dir = TempDir::new().unwrap();
    let path = write_batch(&dir, "tasks.json", SAMPLE_BATCH);

    taskrank_cmd()
        .current_dir(dir.path())
        .arg("suggest")
        .arg(&path)
        .args(["--today", "2025-11-15", "-n", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Suggested next (1 of 3):"))
        .stdout(predicate::str::contains("1. t3 - C (66.12, medium)"));
}

#[test]
fn test_suggest_empty_batch() {
    let dir = TempDir::new().unwrap();
    let path = write_batch(&dir, "empty.json", "[]");

    let output = taskrank_cmd()
        .current_dir(dir.path())
        .args(["--format", "json", "suggest"])
        .arg(&path)
        .output()
        .unwrap();

    assert!(output.status.success());
    assert_eq!(
        json_stdout(&output),
        serde_json::json!({"suggestions": [], "message": "no tasks found"})
    );

    taskrank_cmd()
        .current_dir(dir.path())
        .arg("suggest")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("No tasks found."));
}

#[test]
fn test_suggest_uses_configured_limit() {
    let dir = setup_project();
    fs::write(
        dir.path().join(".taskrank/config.toml"),
        "default_strategy = \"smart_balance\"\nsuggest_limit = 2\n",
    )
    .unwrap();
    let path = write_batch(&dir, "tasks.json", SAMPLE_BATCH);

    let output = taskrank_cmd()
        .current_dir(dir.path())
        .args(["--format", "json", "suggest"])
        .arg(&path)
        .args(["--today", "2025-11-15"])
        .output()
        .unwrap();

    assert!(output.status.success());
    assert_eq!(ids(&json_stdout(&output)["suggestions"]), vec!["t3", "t2"]);
}

// =============================================================================
// Strategy Precedence Tests
// =============================================================================

const TRADEOFF_BATCH: &str = r#"[
  {"id": "quick", "title": "Quick", "estimated_hours": 0.5, "importance": 3},
  {"id": "big", "title": "Big", "estimated_hours": 20, "importance": 10}
]"#;

/// Project whose config prefers quick wins
fn setup_fastest_wins_project() -> (TempDir, PathBuf) {
    let dir = setup_project();
    fs::write(
        dir.path().join(".taskrank/config.toml"),
        "default_strategy = \"fastest_wins\"\nsuggest_limit = 1\n",
    )
    .unwrap();
    let path = write_batch(&dir, "tasks.json", TRADEOFF_BATCH);
    (dir, path)
}

fn top_suggestion(mut cmd: assert_cmd::Command) -> String {
    let output = cmd.output().unwrap();
    assert!(output.status.success());
    ids(&json_stdout(&output)["suggestions"]).remove(0)
}

#[test]
fn test_default_strategy_prefers_impact() {
    let dir = TempDir::new().unwrap();
    let path = write_batch(&dir, "tasks.json", TRADEOFF_BATCH);

    let mut cmd = taskrank_cmd();
    cmd.current_dir(dir.path())
        .args(["--format", "json", "suggest"])
        .arg(&path);
    assert_eq!(top_suggestion(cmd), "big");
}

#[test]
fn test_project_strategy_overrides_default() {
    let (dir, path) = setup_fastest_wins_project();

    let mut cmd = taskrank_cmd();
    cmd.current_dir(dir.path())
        .args(["--format", "json", "suggest"])
        .arg(&path);
    assert_eq!(top_suggestion(cmd), "quick");
}

#[test]
fn test_env_strategy_overrides_project() {
    let (dir, path) = setup_fastest_wins_project();

    let mut cmd = taskrank_cmd();
    cmd.current_dir(dir.path())
        .env("TASKRANK_STRATEGY", "high_impact")
        .args(["--format", "json", "suggest"])
        .arg(&path);
    assert_eq!(top_suggestion(cmd), "big");
}

#[test]
fn test_flag_strategy_overrides_env_and_project() {
    let (dir, path) = setup_fastest_wins_project();

    let mut cmd = taskrank_cmd();
    cmd.current_dir(dir.path())
        .env("TASKRANK_STRATEGY", "high_impact")
        .args(["--format", "json", "suggest"])
        .arg(&path)
        .args(["--strategy", "fastest_wins"]);
    assert_eq!(top_suggestion(cmd), "quick");

    let mut cmd = taskrank_cmd();
    cmd.current_dir(dir.path())
        .args(["--format", "json", "suggest"])
        .arg(&path)
        .args(["--strategy", "high_impact"]);
    assert_eq!(top_suggestion(cmd), "big");
}

// =============================================================================
// Cycles and Strategies Tests
// =============================================================================

#[test]
fn test_cycles_command() {
    let dir = TempDir::new().unwrap();
    let cycle = write_batch(&dir, "cycle.json", CYCLE_BATCH);
    let acyclic = write_batch(&dir, "tasks.json", SAMPLE_BATCH);

    taskrank_cmd()
        .current_dir(dir.path())
        .arg("cycles")
        .arg(&cycle)
        .assert()
        .success()
        .stdout(predicate::str::contains("Circular dependencies (1):"))
        .stdout(predicate::str::contains("a -> b -> a"));

    taskrank_cmd()
        .current_dir(dir.path())
        .arg("cycles")
        .arg(&acyclic)
        .assert()
        .success()
        .stdout(predicate::str::contains("No circular dependencies."));
}

#[test]
fn test_strategies_lists_presets() {
    let output = taskrank_cmd()
        .args(["--format", "json", "strategies"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let json = json_stdout(&output);
    let names: Vec<&str> = json
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["name"].as_str().unwrap())
        .collect();
    assert_eq!(
        names,
        vec!["fastest_wins", "high_impact", "deadline_driven", "smart_balance"]
    );
    assert_eq!(json[3]["weights"]["urgency"], 0.35);
}

#[test]
fn test_verbose_flag() {
    let dir = TempDir::new().unwrap();
    let path = write_batch(&dir, "tasks.json", SAMPLE_BATCH);

    taskrank_cmd()
        .current_dir(dir.path())
        .args(["--verbose", "analyze"])
        .arg(&path)
        .args(["--today", "2025-11-15"])
        .assert()
        .success()
        .stderr(predicate::str::contains("[verbose:rank]"));
}
