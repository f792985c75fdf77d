use std::path::PathBuf;

use assert_cmd::Command;
use tempfile::TempDir;

fn write_file(dir: &TempDir, name: &str, body: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, body).unwrap();
    path
}

fn run_stdout(script: &PathBuf, stdin: &str, extra: &[&str]) -> String {
    let mut cmd = Command::cargo_bin("ask-flow").unwrap();
    cmd.arg("run").arg("--script").arg(script);
    for arg in extra {
        cmd.arg(arg);
    }
    let assert = cmd.write_stdin(stdin.to_string()).assert().success();
    String::from_utf8(assert.get_output().stdout.clone()).unwrap()
}

#[test]
fn collects_answers_from_stdin() {
    let dir = TempDir::new().unwrap();
    let script = write_file(
        &dir,
        "script.json",
        r#"{
            "questions": [
                { "type": "text", "name": "name", "message": "What is your name?" },
                { "type": "number", "name": "age", "message": "How old are you?" }
            ]
        }"#,
    );

    let stdout = run_stdout(&script, "amy\n31\n", &[]);
    assert!(stdout.contains("What is your name?"));
    assert!(stdout.contains("\"name\": \"amy\""));
    assert!(stdout.contains("\"age\": 31"));
}

#[test]
fn conditional_questions_are_skipped() {
    let dir = TempDir::new().unwrap();
    let script = write_file(
        &dir,
        "script.json",
        r#"{
            "questions": [
                { "type": "confirm", "name": "pro", "message": "Pro user?" },
                {
                    "type": "text",
                    "name": "license",
                    "message": "License key?",
                    "ask_if": { "name": "pro", "equals": true }
                }
            ]
        }"#,
    );

    let stdout = run_stdout(&script, "no\n", &[]);
    assert!(stdout.contains("\"pro\": false"));
    assert!(!stdout.contains("License key?"));
    assert!(!stdout.contains("\"license\""));
}

#[test]
fn back_navigation_reasks_the_previous_question() {
    let dir = TempDir::new().unwrap();
    let script = write_file(
        &dir,
        "script.json",
        r#"{
            "questions": [
                { "type": "text", "name": "first", "message": "First?" },
                { "type": "text", "name": "second", "message": "Second?" }
            ]
        }"#,
    );

    let stdout = run_stdout(&script, "one\n:back\nredo\ntwo\n", &[]);
    assert!(stdout.contains("\"first\": \"redo\""));
    assert!(stdout.contains("\"second\": \"two\""));
}

#[test]
fn invalid_answers_reprompt() {
    let dir = TempDir::new().unwrap();
    let script = write_file(
        &dir,
        "script.json",
        r#"{
            "questions": [
                { "type": "number", "name": "age", "message": "Age?", "min": 18 }
            ]
        }"#,
    );

    let stdout = run_stdout(&script, "7\n21\n", &[]);
    assert!(stdout.contains("Invalid answer: must be at least 18"));
    assert!(stdout.contains("\"age\": 21"));
}

#[test]
fn forced_answers_skip_prompting() {
    let dir = TempDir::new().unwrap();
    let script = write_file(
        &dir,
        "script.json",
        r#"{
            "questions": [
                { "type": "text", "name": "name", "message": "What is your name?" }
            ]
        }"#,
    );
    let answers = write_file(&dir, "answers.json", r#"{ "name": "forced" }"#);

    let stdout = run_stdout(
        &script,
        "",
        &["--answers", answers.to_str().unwrap()],
    );
    assert!(stdout.contains("\"name\": \"forced\""));
    assert!(!stdout.contains(" > "));
}

#[test]
fn empty_lines_fall_back_to_the_initial_value() {
    let dir = TempDir::new().unwrap();
    let script = write_file(
        &dir,
        "script.json",
        r#"{
            "questions": [
                {
                    "type": "text",
                    "name": "handle",
                    "message": "Twitter handle?",
                    "initial": "terkelg"
                }
            ]
        }"#,
    );

    let stdout = run_stdout(&script, "\n", &[]);
    assert!(stdout.contains("\"handle\": \"terkelg\""));
}

#[test]
fn select_answers_store_the_choice_value() {
    let dir = TempDir::new().unwrap();
    let script = write_file(
        &dir,
        "script.json",
        r##"{
            "questions": [
                {
                    "type": "select",
                    "name": "color",
                    "message": "Pick a color",
                    "choices": [
                        { "title": "Red", "value": "#ff0000" },
                        { "title": "Green", "value": "#00ff00" }
                    ]
                }
            ]
        }"##,
    );

    let stdout = run_stdout(&script, "2\n", &[]);
    assert!(stdout.contains("1) Red"));
    assert!(stdout.contains("\"color\": \"#00ff00\""));
}

#[test]
fn tags_lists_the_registered_renderers() {
    let assert = Command::cargo_bin("ask-flow")
        .unwrap()
        .arg("tags")
        .assert()
        .success();
    let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    for tag in ["text", "number", "confirm", "select", "date"] {
        assert!(stdout.lines().any(|line| line == tag), "missing tag {tag}");
    }
}

#[test]
fn empty_scripts_fail() {
    let dir = TempDir::new().unwrap();
    let script = write_file(&dir, "script.json", r#"{ "questions": [] }"#);

    Command::cargo_bin("ask-flow")
        .unwrap()
        .arg("run")
        .arg("--script")
        .arg(&script)
        .assert()
        .failure();
}
