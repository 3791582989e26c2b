use std::io::Write;

use flowbot_cli::commands::validate;
use tempfile::NamedTempFile;

fn definition_file(document: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("temp file");
    file.write_all(document.as_bytes()).expect("write definition");
    file
}

#[test]
fn a_valid_definition_passes() {
    let file = definition_file(
        r#"{
            "states": [
                {"type": "start", "id": "start"},
                {"type": "send-message", "id": "greet", "text": "hello world"},
                {"type": "end", "id": "end"}
            ],
            "relationships": [
                {"from": "start", "to": "greet"},
                {"from": "greet", "to": "end"}
            ]
        }"#,
    );

    let result = validate::run(file.path());
    assert_eq!(result.exit_code, 0, "unexpected output: {}", result.output);
    assert!(result.output.contains("3 states"));
    assert!(result.output.contains("start 'start'"));
}

#[test]
fn malformed_json_fails_with_a_parse_message() {
    let file = definition_file("{\"states\": [");

    let result = validate::run(file.path());
    assert_eq!(result.exit_code, 1);
    assert!(result.output.contains("not well-formed json"), "got: {}", result.output);
}

#[test]
fn semantic_problems_fail_with_the_check_message() {
    let file = definition_file(
        r#"{
            "states": [
                {"type": "start", "id": "s1"},
                {"type": "start", "id": "s2"},
                {"type": "end", "id": "end"}
            ],
            "relationships": [
                {"from": "s1", "to": "end"},
                {"from": "s2", "to": "end"}
            ]
        }"#,
    );

    let result = validate::run(file.path());
    assert_eq!(result.exit_code, 1);
    assert!(result.output.contains("exactly one start state"), "got: {}", result.output);
}

#[test]
fn a_missing_file_fails_cleanly() {
    let result = validate::run(std::path::Path::new("/definitely/not/here.json"));
    assert_eq!(result.exit_code, 1);
    assert!(result.output.contains("can't read bot definition"));
}
