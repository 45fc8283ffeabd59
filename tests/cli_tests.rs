//! Integration tests for the CLI interface
//!
//! Runs the binary end to end against temporary input, cache and config
//! files.

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

struct Fixture {
    dir: TempDir,
    config: PathBuf,
}

impl Fixture {
    fn new(input: &str) -> Self {
        Self::with_config(input, "")
    }

    /// Fixture whose config file also carries `extra` TOML sections.
    fn with_config(input: &str, extra: &str) -> Self {
        let dir = TempDir::new().unwrap();
        let config = dir.path().join("config.toml");
        std::fs::write(
            &config,
            format!(
                "[paths]\ninput = {:?}\noutput = {:?}\n\n{}",
                dir.path().join("in.txt").display().to_string(),
                dir.path().join("out.txt").display().to_string(),
                extra,
            ),
        )
        .unwrap();
        std::fs::write(dir.path().join("in.txt"), input).unwrap();
        Self { dir, config }
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    fn command(&self) -> Command {
        let mut cmd = Command::cargo_bin("process-text").unwrap();
        cmd.env_remove("PROCESS_TEXT_CONFIG")
            .env_remove("PROCESS_TEXT_INPUT")
            .env_remove("PROCESS_TEXT_OUTPUT")
            .env_remove("PROCESS_TEXT_THEME")
            .env_remove("PROCESS_TEXT_PYTHON")
            .env_remove("PROCESS_TEXT_JQ")
            .env_remove("RUST_LOG")
            .arg("--config")
            .arg(&self.config);
        cmd
    }
}

fn item(stdout: &[u8]) -> Value {
    let feedback: Value = serde_json::from_slice(stdout).unwrap();
    assert_eq!(feedback["items"].as_array().unwrap().len(), 1);
    feedback["items"][0].clone()
}

fn read(path: &Path) -> String {
    std::fs::read_to_string(path).unwrap()
}

#[test]
fn test_cli_help_flag() {
    let mut cmd = Command::cargo_bin("process-text").unwrap();
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage:"))
        .stdout(predicate::str::contains("shell_txt"));
}

#[test]
fn test_missing_arguments() {
    let mut cmd = Command::cargo_bin("process-text").unwrap();
    cmd.arg("shell_txt")
        .assert()
        .failure()
        .stderr(predicate::str::contains("error:"));
}

#[test]
fn test_unknown_transform() {
    let mut cmd = Command::cargo_bin("process-text").unwrap();
    cmd.args(["perl", "print"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid value"));
}

#[test]
fn test_shell_transform_success() {
    let fixture = Fixture::new("b\na\n");

    let assert = fixture
        .command()
        .args(["shell_txt", "printf '%s' \"$txt\" | sort"])
        .assert()
        .success();

    let item = item(&assert.get_output().stdout);
    assert_eq!(item["arg"], "a\nb\n");
    assert_eq!(item["text"]["largetype"], Value::Null);
    assert_eq!(
        item["quicklookurl"],
        fixture.path("out.txt.html").display().to_string()
    );

    assert_eq!(read(&fixture.path("out.txt")), "a\nb\n");
    let html = read(&fixture.path("out.txt.html"));
    assert!(html.contains("<code id=\"out\">"));
}

#[test]
fn test_shell_transform_failure_reports_largetype() {
    let fixture = Fixture::new("original");

    let assert = fixture
        .command()
        .args(["shell_txt", "false"])
        .assert()
        .success();

    let item = item(&assert.get_output().stdout);
    assert_eq!(item["arg"], "original");
    assert_eq!(item["text"]["largetype"], "\n");

    let html = read(&fixture.path("out.txt.html"));
    assert!(html.contains("class=\"faded\""));
    assert!(html.contains("id=\"err\""));
}

#[test]
fn test_previous_output_survives_failure() {
    let fixture = Fixture::new("hello");
    fixture
        .command()
        .args(["shell_txt", "echo \"$txt world\""])
        .assert()
        .success();

    let assert = fixture
        .command()
        .args(["shell_txt", "exit 1"])
        .assert()
        .success();

    assert_eq!(item(&assert.get_output().stdout)["arg"], "hello world\n");
}

#[test]
fn test_missing_input_file_fails() {
    let fixture = Fixture::new("");
    std::fs::remove_file(fixture.path("in.txt")).unwrap();

    fixture
        .command()
        .args(["shell_txt", "cat"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Error:"))
        .stdout(predicate::str::is_empty());
}

#[test]
fn test_missing_explicit_config_fails() {
    let fixture = Fixture::new("x");

    let mut cmd = Command::cargo_bin("process-text").unwrap();
    cmd.arg("--config")
        .arg(fixture.path("absent.toml"))
        .args(["shell_txt", "cat"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error:"));
}

#[test]
fn test_env_overrides_config_paths() {
    let fixture = Fixture::new("from config");
    let other_input = fixture.path("other.txt");
    std::fs::write(&other_input, "from env").unwrap();

    let assert = fixture
        .command()
        .env("PROCESS_TEXT_INPUT", &other_input)
        .args(["shell_txt", "printf '%s' \"$txt\""])
        .assert()
        .success();

    assert_eq!(item(&assert.get_output().stdout)["arg"], "from env");
}

#[test]
fn test_jsc_transform_runs_in_process() {
    let fixture = Fixture::new("{\"a\": [1, 2, 3]}");

    let assert = fixture
        .command()
        .args(["jsc_json", "j.a.map(x => x * 2)"])
        .assert()
        .success();

    let item = item(&assert.get_output().stdout);
    let arg: Value = serde_json::from_str(item["arg"].as_str().unwrap()).unwrap();
    assert_eq!(arg, serde_json::json!([2, 4, 6]));
}

fn run_ok(fixture: &Fixture, transform: &str, code: &str) -> Value {
    let assert = fixture.command().args([transform, code]).assert().success();
    item(&assert.get_output().stdout)
}

#[test]
fn test_py_json_selects_key() {
    let fixture = Fixture::new(r#"{"a": 1}"#);

    let item = run_ok(&fixture, "py_json", r#"j["a"]"#);

    assert_eq!(item["arg"], "1");
    assert_eq!(item["text"]["largetype"], Value::Null);
}

#[test]
fn test_py_json_keeps_key_order() {
    let fixture = Fixture::new(r#"{"b": 1, "a": 2}"#);

    let item = run_ok(&fixture, "py_json", "list(j)");
    assert_eq!(item["arg"], "[\n  \"b\",\n  \"a\"\n]");

    let item = run_ok(&fixture, "py_json", "j");
    assert_eq!(item["arg"], "{\n  \"b\": 1,\n  \"a\": 2\n}");
}

#[test]
fn test_py_json_big_integers_are_exact() {
    let fixture = Fixture::new("{}");

    let item = run_ok(&fixture, "py_json", "2**100");

    assert_eq!(item["arg"], "1267650600228229401496703205376");
}

#[test]
fn test_py_txt_auto_imports_standard_modules() {
    let fixture = Fixture::new("ignored");

    let item = run_ok(&fixture, "py_txt", "str(round(math.pi, 5))");
    assert_eq!(item["arg"], "3.14159");

    let item = run_ok(&fixture, "py_txt", "re.sub('i', 'o', txt) + os.sep");
    assert_eq!(item["arg"], "ognored/");
}

#[test]
fn test_py_txt_unknown_name_reports_name_error() {
    let fixture = Fixture::new("text");

    let item = run_ok(&fixture, "py_txt", "nosuchmodule_xyz.upper()");

    assert_eq!(item["arg"], "text");
    assert_eq!(
        item["text"]["largetype"],
        "name 'nosuchmodule_xyz' is not defined"
    );
}

#[test]
fn test_py_txt_failed_import_reports_name_error() {
    let fixture = Fixture::with_config(
        "text",
        "[python]\nextra_modules = [\"nosuchmodule_xyz\"]\n",
    );

    let item = run_ok(&fixture, "py_txt", "nosuchmodule_xyz.upper()");

    assert_eq!(
        item["text"]["largetype"],
        "name 'nosuchmodule_xyz' is not defined"
    );
}

#[test]
fn test_py_json_help_renders_pydoc() {
    let fixture = Fixture::new("{}");

    let item = run_ok(&fixture, "py_json", "json.dumps?");

    assert_eq!(item["text"]["largetype"], Value::Null);
    let arg = item["arg"].as_str().unwrap();
    assert!(arg.contains("dumps"), "unexpected help text: {arg}");
    assert!(arg.contains("Serialize"), "unexpected help text: {arg}");
}

#[test]
fn test_py_txt_prints_do_not_corrupt_result() {
    let fixture = Fixture::new("x");

    let item = run_ok(&fixture, "py_txt", "print('noise') or txt * 2");

    assert_eq!(item["arg"], "xx");
}

#[test]
fn test_jq_filter() {
    let fixture = Fixture::new(r#"{"a": 1}"#);

    let item = run_ok(&fixture, "jq", ".a");

    assert_eq!(item["arg"], "1\n");
    assert_eq!(item["text"]["largetype"], Value::Null);
}

#[test]
fn test_jq_stderr_is_an_error() {
    let fixture = Fixture::new(r#"{"a": 1}"#);

    let item = run_ok(&fixture, "jq", r#"error("boom")"#);

    assert_eq!(item["arg"], r#"{"a": 1}"#);
    let err = item["text"]["largetype"].as_str().unwrap();
    assert!(err.contains("boom"), "unexpected stderr: {err}");
}

#[test]
fn test_jq_large_multi_document_input() {
    let line = format!("{{\"k\":\"{}\"}}\n", "x".repeat(100));
    let input = line.repeat(1_000);
    let fixture = Fixture::with_config(
        &input,
        "[jq]\nargs = [\"-c\"]\n\n[process]\ntimeout_secs = 30\n",
    );

    let item = run_ok(&fixture, "jq", ".");

    assert_eq!(item["text"]["largetype"], Value::Null);
    assert_eq!(item["arg"].as_str().unwrap(), input);
}
