//! Command-line tests against the built `clumio-tf` binary.

use std::io::Write;
use std::process::{Command, Output, Stdio};

fn clumio_tf(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_clumio-tf"))
        .args(args)
        .output()
        .unwrap()
}

fn clumio_tf_with_stdin(args: &[&str], stdin: &str) -> Output {
    let mut child = Command::new(env!("CARGO_BIN_EXE_clumio-tf"))
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .unwrap();
    child
        .stdin
        .take()
        .unwrap()
        .write_all(stdin.as_bytes())
        .unwrap();
    child.wait_with_output().unwrap()
}

fn write_temp(dir: &tempfile::TempDir, name: &str, content: &str) -> String {
    let path = dir.path().join(name);
    std::fs::write(&path, content).unwrap();
    path.to_string_lossy().into_owned()
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

const POLICY: &str = r#"{
    "policy_name": "gold",
    "display_name": "Gold",
    "operations": [{
        "type": "aws_ebs_volume_backup",
        "slas": [{"retention_duration": {"unit": "days", "value": 7},
                  "rpo_frequency": {"unit": "days", "value": 1}}]
    }]
}"#;

#[test]
fn tools_lists_every_operation() {
    let output = clumio_tf(&["tools"]);
    assert!(output.status.success());
    let text = stdout(&output);
    assert_eq!(text.lines().count(), 12);
    assert!(text.lines().next().unwrap().starts_with("check_bundle_references"));
    assert!(text.contains("generate_policy"));
    assert!(text.contains("Generate a Clumio backup policy"));
}

#[test]
fn schema_prints_json() {
    let output = clumio_tf(&["schema", "validate_configuration"]);
    assert!(output.status.success());
    let schema: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(schema["properties"]["config_text"]["type"], "string");

    let unknown = clumio_tf(&["schema", "nope"]);
    assert!(!unknown.status.success());
    assert!(stderr(&unknown).contains("unknown tool 'nope'"));
}

#[test]
fn call_reads_arguments_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let args = write_temp(&dir, "policy.json", POLICY);
    let output = clumio_tf(&["call", "generate_policy", "--args", &args]);
    assert!(output.status.success(), "{}", stderr(&output));
    assert!(stdout(&output).starts_with("resource \"clumio_policy\" \"gold\""));
}

#[test]
fn call_reads_arguments_from_stdin() {
    let output = clumio_tf_with_stdin(&["call", "generate_policy", "--args", "-"], POLICY);
    assert!(output.status.success(), "{}", stderr(&output));
    assert!(stdout(&output).contains("rpo_frequency"));
}

#[test]
fn call_error_exits_nonzero() {
    let output = clumio_tf_with_stdin(
        &["--no-arg-validation", "call", "generate_policy", "--args", "-"],
        r#"{"policy_name": "gold", "display_name": "Gold", "operations": []}"#,
    );
    assert_eq!(output.status.code(), Some(1));
    assert!(stdout(&output).is_empty());
    assert!(stderr(&output).contains("schema error at operations"));
}

#[test]
fn compose_and_validate_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let bundle = format!(r#"{{"clumio_accounts": [{{}}], "policies": [{POLICY}]}}"#);
    let bundle = write_temp(&dir, "bundle.json", &bundle);

    let composed = clumio_tf(&["compose", "--bundle", &bundle]);
    assert!(composed.status.success(), "{}", stderr(&composed));
    let document = stdout(&composed);
    assert!(document.contains("# Providers"));
    assert!(document.contains("# Policies"));

    let main_tf = write_temp(&dir, "main.tf", &document);
    let validated = clumio_tf(&["validate", "--file", &main_tf]);
    assert!(validated.status.success(), "{}", stdout(&validated));
    let diagnostics: serde_json::Value = serde_json::from_str(&stdout(&validated)).unwrap();
    assert_eq!(diagnostics["is_valid"], true);
}

#[test]
fn validate_fails_on_hardcoded_token() {
    let dir = tempfile::tempdir().unwrap();
    let file = write_temp(
        &dir,
        "main.tf",
        "provider \"clumio\" {\n  clumio_api_token = \"secret\"\n}\n",
    );
    let output = clumio_tf(&["validate", "--file", &file]);
    assert_eq!(output.status.code(), Some(1));
    let diagnostics: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(diagnostics["is_valid"], false);
}

#[test]
fn strict_references_flag() {
    let dir = tempfile::tempdir().unwrap();
    let bundle = write_temp(
        &dir,
        "bundle.json",
        r#"{"policy_rules": [{
            "rule_name": "r",
            "display_name": "R",
            "policy_name": "missing",
            "condition_expression": {"aws_region": {"$eq": "us-east-1"}}
        }]}"#,
    );
    assert!(clumio_tf(&["compose", "--bundle", &bundle]).status.success());

    let strict = clumio_tf(&["--strict-references", "compose", "--bundle", &bundle]);
    assert_eq!(strict.status.code(), Some(1));
    assert!(stderr(&strict).contains("policy rule 'r' references unknown policy 'missing'"));
}

#[test]
fn missing_file_is_reported() {
    let output = clumio_tf(&["validate", "--file", "/nonexistent/main.tf"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("failed to read"));
}
