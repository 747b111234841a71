use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use std::time::{SystemTime, UNIX_EPOCH};

fn make_temp_dir(prefix: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system clock is before UNIX_EPOCH")
        .as_nanos();
    let pid = std::process::id();
    let dir = std::env::temp_dir().join(format!("optline-integ-{prefix}-{pid}-{nanos}"));
    fs::create_dir_all(&dir).expect("failed to create temp dir");
    dir
}

fn optline() -> Command {
    Command::new(env!("CARGO_BIN_EXE_optline"))
}

fn write_schema(dir: &Path, json: &str) -> PathBuf {
    let path = dir.join("optline.json");
    fs::write(&path, json).expect("failed to write schema");
    path
}

fn assert_success(out: &Output, what: &str) {
    assert!(
        out.status.success(),
        "{what} failed:\nstatus: {}\nstderr:\n{}",
        out.status,
        String::from_utf8_lossy(&out.stderr),
    );
}

const SCHEMA: &str = r#"{
  "name": "tool",
  "syntax": "[OPTIONS] FILE...",
  "options": [
    { "short": "v", "long": "verbose", "description": "Print more" },
    { "short": "o", "long": "output", "arity": 1, "arg-name": "file", "required": true },
    { "short": "D", "arity": 2, "value-separator": "=" }
  ],
  "groups": [
    {
      "required": false,
      "options": [ { "long": "json" }, { "long": "text" } ]
    }
  ]
}"#;

#[test]
fn help_works() {
    let out = optline()
        .arg("--help")
        .output()
        .expect("failed to run optline --help");
    assert_success(&out, "optline --help");
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(
        stdout.contains("optline") && stdout.contains("init") && stdout.contains("parse"),
        "unexpected help output:\n{stdout}"
    );
}

#[test]
fn init_writes_a_schema_that_checks() {
    let dir = make_temp_dir("init");

    let out = optline()
        .arg("init")
        .arg(&dir)
        .output()
        .expect("failed to run optline init");
    assert_success(&out, "optline init");
    let schema = dir.join("optline.json");
    assert!(schema.is_file(), "optline.json not created");

    let out = optline()
        .arg("check")
        .arg("-s")
        .arg(&schema)
        .output()
        .expect("failed to run optline check");
    assert_success(&out, "optline check");
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("OK: 5 option(s)"), "unexpected output:\n{stdout}");

    let out = optline()
        .arg("init")
        .arg(&dir)
        .output()
        .expect("failed to run optline init");
    assert!(!out.status.success(), "second init should refuse to overwrite");
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("already exists"), "stderr:\n{stderr}");

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn parse_prints_matches_in_order() {
    let dir = make_temp_dir("parse");
    let schema = write_schema(&dir, SCHEMA);

    let out = optline()
        .args(["parse", "-s"])
        .arg(&schema)
        .args(["--", "-v", "--out=a.txt", "-Dkey=value", "input", "--", "-x"])
        .output()
        .expect("failed to run optline parse");
    assert_success(&out, "optline parse");
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert_eq!(
        stdout,
        "--verbose\n--output = a.txt\n-D = key, value\nleftovers: input -x\n"
    );

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn parse_json_output() {
    let dir = make_temp_dir("parse-json");
    let schema = write_schema(&dir, SCHEMA);

    let out = optline()
        .args(["parse", "--json", "-s"])
        .arg(&schema)
        .args(["--", "-vo", "out", "--json"])
        .output()
        .expect("failed to run optline parse --json");
    assert_success(&out, "optline parse --json");
    let report: serde_json::Value =
        serde_json::from_slice(&out.stdout).expect("parse output is not JSON");
    assert_eq!(report["options"][0]["option"], "--verbose");
    assert_eq!(report["options"][1]["values"][0], "out");
    assert_eq!(report["options"][2]["option"], "--json");
    assert_eq!(report["leftovers"].as_array().map(Vec::len), Some(0));

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn parse_errors_exit_with_status_two() {
    let dir = make_temp_dir("parse-errors");
    let schema = write_schema(&dir, SCHEMA);

    let cases: &[(&[&str], &str)] = &[
        (&["-o", "x", "--bogus"], "unrecognized option: --bogus"),
        (&["-v"], "missing required option: --output"),
        (&["-o", "x", "--json", "--text"], "already been selected"),
        (&["-o"], "missing argument for option: --output"),
    ];

    for (args, expected) in cases {
        let out = optline()
            .args(["parse", "-s"])
            .arg(&schema)
            .arg("--")
            .args(*args)
            .output()
            .expect("failed to run optline parse");
        assert_eq!(out.status.code(), Some(2), "args: {args:?}");
        let stderr = String::from_utf8_lossy(&out.stderr);
        assert!(
            stderr.contains("error: ") && stderr.contains(expected),
            "args: {args:?}\nstderr:\n{stderr}"
        );
    }

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn no_required_skips_the_required_check() {
    let dir = make_temp_dir("no-required");
    let schema = write_schema(&dir, SCHEMA);

    let out = optline()
        .args(["parse", "--no-required", "-s"])
        .arg(&schema)
        .args(["--", "-v"])
        .output()
        .expect("failed to run optline parse");
    assert_success(&out, "optline parse --no-required");
    assert_eq!(String::from_utf8_lossy(&out.stdout), "--verbose\n");

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn invalid_schema_exits_with_status_one() {
    let dir = make_temp_dir("bad-schema");
    let schema = write_schema(
        &dir,
        r#"{ "options": [ { "long": "dup" }, { "long": "dup" } ] }"#,
    );

    let out = optline()
        .arg("check")
        .arg("-s")
        .arg(&schema)
        .output()
        .expect("failed to run optline check");
    assert_eq!(out.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("invalid schema"), "stderr:\n{stderr}");

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn help_renders_the_schema() {
    let dir = make_temp_dir("help");
    let schema = write_schema(&dir, SCHEMA);

    let out = optline()
        .args(["help", "--auto-usage", "-s"])
        .arg(&schema)
        .output()
        .expect("failed to run optline help");
    assert_success(&out, "optline help");
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(
        stdout.starts_with("usage: tool [-v] -o <file> [-D <arg>] [--json | --text]"),
        "unexpected help:\n{stdout}"
    );
    assert!(stdout.contains("-v,--verbose"), "unexpected help:\n{stdout}");

    let _ = fs::remove_dir_all(&dir);
}
