//! End-to-end workflow tests driving the compiled binary in a temp workspace.

use std::fs;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

fn bin() -> &'static str {
    env!("CARGO_BIN_EXE_huntlock")
}

fn run(workspace: &Path, args: &[&str]) -> Output {
    Command::new(bin())
        .args(args)
        .arg("--workspace")
        .arg(workspace)
        .output()
        .expect("run huntlock")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

fn new_hunt(workspace: &Path, title: &str, technique: &str, tactic: &str) {
    let output = run(
        workspace,
        &[
            "new",
            "--title",
            title,
            "--technique",
            technique,
            "--tactic",
            tactic,
            "--platform",
            "windows",
            "--data-source",
            "windows-event-logs",
            "--hunter",
            "Integration Tester",
        ],
    );
    assert!(output.status.success(), "new failed: {}", stderr(&output));
}

#[test]
fn new_creates_file_and_increments_ids() {
    let dir = TempDir::new().expect("tempdir");
    new_hunt(dir.path(), "First Hunt", "T1003.001", "credential-access");
    new_hunt(dir.path(), "Second Hunt", "T1558.003", "credential-access");

    assert!(dir.path().join("hunts/H-0001.md").is_file());
    assert!(dir.path().join("hunts/H-0002.md").is_file());

    let content = fs::read_to_string(dir.path().join("hunts/H-0001.md")).expect("read hunt");
    assert!(content.contains("hunt_id: H-0001"));
    assert!(content.contains("status: planning"));
    assert!(content.contains("credential-access"));
    assert!(content.contains("windows-event-logs"));
    for heading in ["## LEARN", "## OBSERVE", "## CHECK", "## KEEP"] {
        assert!(content.contains(heading), "missing {heading}");
    }
}

#[test]
fn new_respects_configured_prefix() {
    let dir = TempDir::new().expect("tempdir");
    fs::write(dir.path().join(".huntlock.yaml"), "hunt_prefix: TH\n").expect("write config");
    new_hunt(dir.path(), "Prefixed Hunt", "T1053.003", "persistence");
    assert!(dir.path().join("hunts/TH-0001.md").is_file());
}

#[test]
fn new_rejects_invalid_technique() {
    let dir = TempDir::new().expect("tempdir");
    let output = run(
        dir.path(),
        &["new", "--title", "Bad Hunt", "--technique", "INVALID"],
    );
    assert!(!output.status.success());
    assert!(stderr(&output).contains("Invalid technique format"));
    assert!(!dir.path().join("hunts/H-0001.md").exists());
}

#[test]
fn new_skips_over_externally_numbered_files() {
    let dir = TempDir::new().expect("tempdir");
    fs::create_dir(dir.path().join("hunts")).expect("mkdir");
    fs::write(dir.path().join("hunts/H-0007.md"), "externally created\n").expect("write");
    new_hunt(dir.path(), "Next Hunt", "T1003.001", "credential-access");
    assert!(dir.path().join("hunts/H-0008.md").is_file());
}

#[test]
fn list_filters_and_sorts_by_id() {
    let dir = TempDir::new().expect("tempdir");
    new_hunt(dir.path(), "Cron Persistence", "T1053.003", "persistence");
    new_hunt(dir.path(), "LSASS Dumping", "T1003.001", "credential-access");

    let output = run(dir.path(), &["list", "--json"]);
    assert!(output.status.success(), "list failed: {}", stderr(&output));
    let hunts: serde_json::Value = serde_json::from_str(&stdout(&output)).expect("list json");
    let hunts = hunts.as_array().expect("array");
    assert_eq!(hunts.len(), 2);
    assert_eq!(hunts[0]["hunt_id"], "H-0001");
    assert_eq!(hunts[1]["hunt_id"], "H-0002");
    assert_eq!(hunts[0]["status"], "planning");

    let output = run(dir.path(), &["list", "--tactic", "persistence", "--json"]);
    let filtered: serde_json::Value = serde_json::from_str(&stdout(&output)).expect("list json");
    let filtered = filtered.as_array().expect("array");
    assert_eq!(filtered.len(), 1);
    assert_eq!(filtered[0]["title"], "Cron Persistence");

    let output = run(dir.path(), &["list", "--status", "completed", "--json"]);
    let none: serde_json::Value = serde_json::from_str(&stdout(&output)).expect("list json");
    assert!(none.as_array().expect("array").is_empty());
}

#[test]
fn workspace_flag_may_precede_the_subcommand() {
    let dir = TempDir::new().expect("tempdir");
    new_hunt(dir.path(), "Global Flag Hunt", "T1003.001", "credential-access");

    let output = Command::new(bin())
        .arg("--workspace")
        .arg(dir.path())
        .args(["list", "--json"])
        .output()
        .expect("run huntlock");
    assert!(output.status.success(), "list failed: {}", stderr(&output));
    let hunts: serde_json::Value = serde_json::from_str(&stdout(&output)).expect("list json");
    assert_eq!(hunts.as_array().expect("array").len(), 1);
}

#[test]
fn list_rejects_unknown_status_filter() {
    let dir = TempDir::new().expect("tempdir");
    new_hunt(dir.path(), "Any Hunt", "T1003.001", "credential-access");
    let output = run(dir.path(), &["list", "--status", "done"]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("unknown status filter"));
}

#[test]
fn corrupt_file_does_not_block_listing() {
    let dir = TempDir::new().expect("tempdir");
    new_hunt(dir.path(), "Good Hunt", "T1003.001", "credential-access");
    fs::write(dir.path().join("hunts/broken.md"), "no front matter here\n").expect("write");

    let output = run(dir.path(), &["list", "--json"]);
    assert!(output.status.success(), "list failed: {}", stderr(&output));
    let hunts: serde_json::Value = serde_json::from_str(&stdout(&output)).expect("list json");
    assert_eq!(hunts.as_array().expect("array").len(), 1);
}

#[test]
fn validate_accepts_freshly_created_hunt() {
    let dir = TempDir::new().expect("tempdir");
    new_hunt(dir.path(), "Valid Hunt", "T1003.001", "credential-access");
    let output = run(dir.path(), &["validate", "H-0001"]);
    assert!(output.status.success(), "validate failed: {}", stderr(&output));
    assert!(stdout(&output).contains("✓ H-0001"));
}

#[test]
fn validate_reports_each_problem() {
    let dir = TempDir::new().expect("tempdir");
    fs::create_dir(dir.path().join("hunts")).expect("mkdir");
    fs::write(
        dir.path().join("hunts/H-0001.md"),
        "---\nhunt_id: H-0001\ntitle: Broken\nstatus: bogus\ntechniques: [T1003]\n---\n\n## LEARN: x\n",
    )
    .expect("write");

    let output = run(dir.path(), &["validate", "H-0001"]);
    assert!(!output.status.success());
    let text = stdout(&output);
    assert!(text.contains("Missing required field: date"));
    assert!(text.contains("Missing required field: hunter"));
    assert!(text.contains("Invalid status: bogus"));
    assert!(text.contains("Invalid technique format: T1003"));
    assert!(text.contains("Missing LOCK section: OBSERVE"));
    assert!(text.contains("Missing LOCK section: CHECK"));
    assert!(text.contains("Missing LOCK section: KEEP"));
}

#[test]
fn validate_all_summarizes_the_corpus() {
    let dir = TempDir::new().expect("tempdir");
    new_hunt(dir.path(), "Valid Hunt", "T1003.001", "credential-access");
    fs::write(dir.path().join("hunts/H-0099.md"), "not a hunt\n").expect("write");

    let output = run(dir.path(), &["validate"]);
    assert!(output.status.success(), "validate failed: {}", stderr(&output));
    let text = stdout(&output);
    assert!(text.contains("✓ H-0001.md"));
    assert!(text.contains("✗ H-0099.md"));
    assert!(text.contains("Results: 1 valid, 1 invalid"));
}

#[test]
fn validate_all_fails_on_unreadable_entry() {
    let dir = TempDir::new().expect("tempdir");
    new_hunt(dir.path(), "Valid Hunt", "T1003.001", "credential-access");
    // A directory with a .md name is enumerated but cannot be read as a file.
    fs::create_dir(dir.path().join("hunts/H-0042.md")).expect("mkdir");

    let output = run(dir.path(), &["validate"]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("read hunt file"));
}

#[test]
fn validate_unknown_hunt_fails() {
    let dir = TempDir::new().expect("tempdir");
    fs::create_dir(dir.path().join("hunts")).expect("mkdir");
    let output = run(dir.path(), &["validate", "H-9999"]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("hunt not found"));
}

#[test]
fn stats_reflect_completed_hunts_and_findings() {
    let dir = TempDir::new().expect("tempdir");
    fs::create_dir(dir.path().join("hunts")).expect("mkdir");
    let doc = |id: &str, status: &str, tp: i64, fp: i64| {
        format!(
            "---\nhunt_id: {id}\ntitle: Hunt {id}\nstatus: {status}\ndate: 2025-12-02\n\
hunter: T\ntechniques: [T1003.001]\ntrue_positives: {tp}\nfalse_positives: {fp}\n---\n\
\n## LEARN: a\n## OBSERVE: b\n## CHECK: c\n## KEEP: d\n"
        )
    };
    fs::write(dir.path().join("hunts/H-0001.md"), doc("H-0001", "completed", 2, 1)).expect("write");
    fs::write(dir.path().join("hunts/H-0002.md"), doc("H-0002", "completed", 0, 3)).expect("write");
    fs::write(dir.path().join("hunts/H-0003.md"), doc("H-0003", "planning", 0, 0)).expect("write");

    let output = run(dir.path(), &["stats", "--json"]);
    assert!(output.status.success(), "stats failed: {}", stderr(&output));
    let stats: serde_json::Value = serde_json::from_str(&stdout(&output)).expect("stats json");
    assert_eq!(stats["total"], 3);
    assert_eq!(stats["completed"], 2);
    assert_eq!(stats["total_findings"], 6);
    assert_eq!(stats["true_positives"], 2);
    assert_eq!(stats["false_positives"], 4);
    assert_eq!(stats["success_rate"], 50.0);
    assert_eq!(stats["tp_fp_ratio"], 0.5);
}

#[test]
fn stats_on_empty_corpus_are_all_zero() {
    let dir = TempDir::new().expect("tempdir");
    fs::create_dir(dir.path().join("hunts")).expect("mkdir");
    let output = run(dir.path(), &["stats", "--json"]);
    assert!(output.status.success());
    let stats: serde_json::Value = serde_json::from_str(&stdout(&output)).expect("stats json");
    assert_eq!(stats["total"], 0);
    assert_eq!(stats["success_rate"], 0.0);
}

#[test]
fn coverage_crosses_tactics_with_techniques() {
    let dir = TempDir::new().expect("tempdir");
    let output = run(
        dir.path(),
        &[
            "new",
            "--title",
            "Cross Product Hunt",
            "--technique",
            "T1053.003",
            "--tactic",
            "persistence",
            "--tactic",
            "collection",
        ],
    );
    assert!(output.status.success(), "new failed: {}", stderr(&output));

    let output = run(dir.path(), &["coverage", "--json"]);
    assert!(output.status.success(), "coverage failed: {}", stderr(&output));
    let coverage: serde_json::Value = serde_json::from_str(&stdout(&output)).expect("json");
    assert_eq!(coverage["persistence"][0], "T1053.003");
    assert_eq!(coverage["collection"][0], "T1053.003");
}

#[test]
fn search_is_case_insensitive_over_body_text() {
    let dir = TempDir::new().expect("tempdir");
    new_hunt(dir.path(), "LSASS Dumping Detection", "T1003.001", "credential-access");
    new_hunt(dir.path(), "Cron Persistence", "T1053.003", "persistence");

    let upper = run(dir.path(), &["search", "LSASS", "--json"]);
    let lower = run(dir.path(), &["search", "lsass", "--json"]);
    assert!(upper.status.success() && lower.status.success());
    assert_eq!(stdout(&upper), stdout(&lower));

    let results: serde_json::Value = serde_json::from_str(&stdout(&upper)).expect("json");
    let hits = results["hits"].as_array().expect("hits");
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0]["hunt_id"], "H-0001");
}
