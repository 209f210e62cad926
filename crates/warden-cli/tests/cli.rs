//! CLI exit-code behaviour

use warden_cli::run_with_args;

fn write_file(dir: &tempfile::TempDir, name: &str, contents: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, contents).unwrap();
    path
}

const VALID_RULES: &str = r#"[
  {"id":"R1","name":"High","condition":"score >= 80","action":"APPROVED","reason":"High score","priority":1},
  {"id":"R2","name":"Low","condition":"score < 30","action":"REJECTED","reason":"Low score","priority":2}
]"#;

#[tokio::test]
async fn validate_accepts_a_clean_rule_file() {
    let dir = tempfile::tempdir().unwrap();
    let rules = write_file(&dir, "rules.json", VALID_RULES);

    let code = run_with_args(["warden", "validate", rules.to_str().unwrap()])
        .await
        .unwrap();
    assert_eq!(code, 0);
}

#[tokio::test]
async fn validate_flags_bad_conditions() {
    let dir = tempfile::tempdir().unwrap();
    let rules = write_file(
        &dir,
        "rules.json",
        r#"[{"id":"bad","name":"Bad","condition":"score >=","action":"REVIEW","reason":"r","priority":1}]"#,
    );

    let code = run_with_args(["warden", "validate", rules.to_str().unwrap()])
        .await
        .unwrap();
    assert_eq!(code, 1);
}

#[tokio::test]
async fn validate_flags_conflicting_actions() {
    let dir = tempfile::tempdir().unwrap();
    let rules = write_file(
        &dir,
        "rules.json",
        r#"[
          {"id":"a","name":"A","condition":"x > 1","action":"APPROVED","reason":"r","priority":1},
          {"id":"b","name":"B","condition":"x > 1","action":"REJECTED","reason":"r","priority":2}
        ]"#,
    );

    let code = run_with_args(["warden", "validate", rules.to_str().unwrap()])
        .await
        .unwrap();
    assert_eq!(code, 1);
}

#[tokio::test]
async fn validate_rejects_a_non_array_document() {
    let dir = tempfile::tempdir().unwrap();
    let rules = write_file(&dir, "rules.json", r#"{"not":"an array"}"#);

    let err = run_with_args(["warden", "validate", rules.to_str().unwrap()])
        .await
        .unwrap_err();
    assert_eq!(err.exit_code(), 2);
}

#[tokio::test]
async fn decide_writes_a_journal_entry_and_exits_zero() {
    let dir = tempfile::tempdir().unwrap();
    let rules = write_file(&dir, "rules.json", VALID_RULES);
    let facts = write_file(&dir, "facts.json", r#"{"score": 90}"#);
    let journal = dir.path().join("audit.jsonl");
    std::env::set_var("AUDIT_PATH", &journal);

    let code = run_with_args([
        "warden",
        "--output",
        "json",
        "decide",
        rules.to_str().unwrap(),
        facts.to_str().unwrap(),
    ])
    .await
    .unwrap();

    assert_eq!(code, 0);
    let written = std::fs::read_to_string(&journal).unwrap();
    assert_eq!(written.lines().count(), 1);
    assert!(written.contains("\"APPROVED\""));
    std::env::remove_var("AUDIT_PATH");
}

#[tokio::test]
async fn decide_rejects_malformed_facts() {
    let dir = tempfile::tempdir().unwrap();
    let rules = write_file(&dir, "rules.json", VALID_RULES);
    let facts = write_file(&dir, "facts.json", "[1, 2, 3]");

    let err = run_with_args([
        "warden",
        "decide",
        rules.to_str().unwrap(),
        facts.to_str().unwrap(),
    ])
    .await
    .unwrap_err();
    assert_eq!(err.exit_code(), 2);
}
