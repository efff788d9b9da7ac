// Integration tests for the `exohunt` shell contract: stdout JSON shape and exit codes.
//
// stdout from --json commands must be exactly one JSON value; logs, summaries
// and errors go to stderr.
//
// Run with: cargo test -p exohunt-cli --test cli_contract -- --nocapture

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};

const KOI_CSV: &str = "\
# NASA Exoplanet Archive export
#
kepoi_name,kepler_name,koi_disposition,koi_score,koi_prad,koi_period
K00752.01,Kepler-227 b,CONFIRMED,1.0,2.26,9.49
K00753.01,,CANDIDATE,0.0,14.6,19.9
K00754.01,,FALSE POSITIVE,0.0,33.46,1.74
";

fn exohunt() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_exohunt"));
    cmd.current_dir(env!("CARGO_MANIFEST_DIR"));
    cmd.env_remove("EXOHUNT_CONFIG");
    cmd.env_remove("RUST_LOG");
    cmd
}

fn write_file(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, contents).unwrap();
    path
}

fn run(args: &[&str]) -> Output {
    exohunt().args(args).output().expect("spawn exohunt")
}

fn run_with_stdin(args: &[&str], input: &str) -> Output {
    let mut child = exohunt()
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("spawn exohunt");
    child.stdin.take().unwrap().write_all(input.as_bytes()).unwrap();
    child.wait_with_output().unwrap()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

/// Assert stdout is a single, parseable JSON value with no extra lines.
fn assert_single_json(output: &Output) -> serde_json::Value {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let trimmed = stdout.trim();
    assert!(!trimmed.is_empty(), "stdout should not be empty\nstderr: {}", stderr(output));

    serde_json::from_str(trimmed).unwrap_or_else(|e| {
        panic!("stdout must be valid JSON.\nParse error: {}\nstdout:\n{}", e, trimmed)
    })
}

// ===========================================================================
// exohunt classify
// ===========================================================================

#[test]
fn classify_json_is_single_value() {
    let dir = tempfile::tempdir().unwrap();
    let csv = write_file(dir.path(), "koi.csv", KOI_CSV);

    let output = run(&["classify", csv.to_str().unwrap(), "--json"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let val = assert_single_json(&output);
    assert_eq!(val["summary"]["total"], 3);
    assert_eq!(val["summary"]["confirmed"], 1);
    assert_eq!(val["summary"]["falsePositives"], 1);

    let results = val["results"].as_array().expect("results must be array");
    assert_eq!(results.len(), 3);
    assert_eq!(results[0]["planetName"], "Kepler-227 b");
    assert_eq!(results[0]["confidence"], 95);
    assert_eq!(results[2]["classification"], "False Positive");

    // Human summary still goes to stderr.
    assert!(stderr(&output).contains("3 rows: 1 confirmed, 1 candidates, 1 false positives"));
}

#[test]
fn classify_without_json_keeps_stdout_empty() {
    let dir = tempfile::tempdir().unwrap();
    let csv = write_file(dir.path(), "koi.csv", KOI_CSV);

    let output = run(&["classify", csv.to_str().unwrap()]);
    assert!(output.status.success());
    assert!(output.stdout.is_empty());

    let err = stderr(&output);
    assert!(err.contains("sources: NASA KOI (Kepler)"), "{err}");
    assert!(err.contains("Kepler-227 b"), "{err}");
}

#[test]
fn classify_output_file() {
    let dir = tempfile::tempdir().unwrap();
    let csv = write_file(dir.path(), "koi.csv", KOI_CSV);
    let out = dir.path().join("result.json");

    let output = run(&["classify", csv.to_str().unwrap(), "--output", out.to_str().unwrap()]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(output.stdout.is_empty());

    let written: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&out).unwrap()).unwrap();
    assert_eq!(written["summary"]["total"], 3);
    assert!(written["meta"]["runAt"].is_string());
}

#[test]
fn classify_stdin() {
    let output = run_with_stdin(&["classify", "-", "--format", "csv", "--json"], KOI_CSV);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let val = assert_single_json(&output);
    assert_eq!(val["summary"]["total"], 3);
}

#[test]
fn classify_json_stays_clean_with_debug_logging() {
    let dir = tempfile::tempdir().unwrap();
    let csv = write_file(dir.path(), "koi.csv", KOI_CSV);

    let output = run(&["-vv", "classify", csv.to_str().unwrap(), "--json", "--parallel"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let val = assert_single_json(&output);
    assert_eq!(val["meta"]["parallel"], true);
}

#[test]
fn classify_json_file_input() {
    let dir = tempfile::tempdir().unwrap();
    let json = write_file(
        dir.path(),
        "planets.json",
        r#"[{"name": "TRAPPIST-1e", "radius": 0.92, "mass": 0.69, "period": 6.1, "star_temperature": 2566}]"#,
    );

    let output = run(&["classify", json.to_str().unwrap(), "--json"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let val = assert_single_json(&output);
    assert_eq!(val["results"][0]["classification"], "Confirmed Exoplanet");
    assert_eq!(val["results"][0]["dataSource"], "Habitability Analysis");
}

// ===========================================================================
// Exit codes
// ===========================================================================

#[test]
fn batch_too_large_exits_6() {
    let dir = tempfile::tempdir().unwrap();
    let csv = write_file(dir.path(), "koi.csv", KOI_CSV);

    let output = run(&["classify", csv.to_str().unwrap(), "--max-rows", "2", "--json"]);
    assert_eq!(output.status.code(), Some(6));
    assert!(output.stdout.is_empty());
    let err = stderr(&output);
    assert!(err.contains("error: batch of 3 rows exceeds maximum of 2"), "{err}");
    assert!(err.contains("hint:"), "{err}");
}

#[test]
fn config_file_row_cap_applies() {
    let dir = tempfile::tempdir().unwrap();
    let csv = write_file(dir.path(), "koi.csv", KOI_CSV);
    let config = write_file(dir.path(), "exohunt.toml", "max_rows = 1\n");

    let output = run(&["classify", csv.to_str().unwrap(), "--config", config.to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(6));

    // Flag overrides the file.
    let output = run(&[
        "classify",
        csv.to_str().unwrap(),
        "--config",
        config.to_str().unwrap(),
        "--max-rows",
        "10",
    ]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
}

#[test]
fn missing_file_exits_3() {
    let output = run(&["classify", "does/not/exist.csv"]);
    assert_eq!(output.status.code(), Some(3));
    assert!(stderr(&output).contains("file not found"));
}

#[test]
fn malformed_json_exits_4() {
    let dir = tempfile::tempdir().unwrap();
    let json = write_file(dir.path(), "bad.json", "{\"planets\": [1, 2]}");

    let output = run(&["classify", json.to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(4));
    assert!(stderr(&output).contains("row 0 is not an object"));
}

#[test]
fn empty_stdin_exits_4() {
    let output = run_with_stdin(&["classify", "-"], "");
    assert_eq!(output.status.code(), Some(4));
    assert!(stderr(&output).contains("no input received on stdin"));
}

#[test]
fn zero_max_rows_is_usage_error() {
    let dir = tempfile::tempdir().unwrap();
    let csv = write_file(dir.path(), "koi.csv", KOI_CSV);

    let output = run(&["classify", csv.to_str().unwrap(), "--max-rows", "0"]);
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn unknown_format_is_usage_error() {
    let output = run(&["classify", "-", "--format", "xlsx"]);
    assert_eq!(output.status.code(), Some(2));
}

// ===========================================================================
// exohunt config validate
// ===========================================================================

#[test]
fn config_validate_ok_and_invalid() {
    let dir = tempfile::tempdir().unwrap();
    let good = write_file(dir.path(), "good.toml", "max_rows = 500\ntimeout_ms = 2000\n[input]\ndelimiter = \";\"\n");
    let bad = write_file(dir.path(), "bad.toml", "max_rows = 500\nunknown_key = true\n");
    let zero = write_file(dir.path(), "zero.toml", "timeout_ms = 0\n");

    let output = run(&["config", "validate", good.to_str().unwrap()]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stderr(&output).contains("config OK: max_rows=500"));

    let output = run(&["config", "validate", bad.to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(5));

    let output = run(&["config", "validate", zero.to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(5));
    assert!(stderr(&output).contains("timeout_ms must be greater than 0"));
}

// ===========================================================================
// exohunt inspect / aliases
// ===========================================================================

#[test]
fn inspect_json_shape() {
    let dir = tempfile::tempdir().unwrap();
    let csv = write_file(dir.path(), "koi.csv", KOI_CSV);

    let output = run(&["inspect", csv.to_str().unwrap(), "--json"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let val = assert_single_json(&output);

    let rows = val["rows"].as_array().expect("rows must be array");
    assert_eq!(rows.len(), 3);
    // Inspect keeps input order.
    assert_eq!(rows[0]["result"]["rowIndex"], 0);
    assert_eq!(rows[0]["schema"]["family"], "NASA_KOI");
    assert_eq!(rows[0]["branch"], "disposition");
    assert_eq!(rows[2]["schema"]["disposition"], "FALSE POSITIVE");

    let coverage = val["coverage"].as_array().expect("coverage must be array");
    assert_eq!(coverage.len(), 6);
    let radius = coverage.iter().find(|c| c["field"] == "radius").unwrap();
    assert_eq!(radius["resolved"], 3);
    assert_eq!(radius["topAlias"], "koi_prad");
    let mass = coverage.iter().find(|c| c["field"] == "mass").unwrap();
    assert_eq!(mass["resolved"], 0);
    assert!(mass.get("topAlias").is_none());
}

#[test]
fn inspect_table_lists_fields() {
    let dir = tempfile::tempdir().unwrap();
    let csv = write_file(dir.path(), "koi.csv", KOI_CSV);

    let output = run(&["inspect", csv.to_str().unwrap()]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("NASA_KOI"));
    assert!(stdout.contains("starTemperature"));
    assert!(stdout.contains("3/3"));
}

#[test]
fn aliases_json() {
    let output = run(&["aliases", "--json"]);
    assert!(output.status.success());
    let val = assert_single_json(&output);

    let keys: Vec<&str> = val.as_object().unwrap().keys().map(String::as_str).collect();
    assert_eq!(keys, ["planetName", "radius", "mass", "period", "starTemperature", "distance"]);
    assert_eq!(val["radius"][0], "koi_prad");
    assert_eq!(val["planetName"][0], "pl_name");
}
