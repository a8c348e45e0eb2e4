//! End-to-end smoke tests for the `vellum` binary.

use serde_json::Value;
use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use std::time::{SystemTime, UNIX_EPOCH};

struct TempDirGuard {
    path: PathBuf,
}

impl TempDirGuard {
    fn new(prefix: &str) -> Self {
        let unique = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock should be after unix epoch")
            .as_nanos();
        let path = std::env::temp_dir().join(format!(
            "vellum-cli-{prefix}-{}-{unique}",
            std::process::id()
        ));
        fs::create_dir_all(&path).expect("temp dir should be created");
        Self { path }
    }

    fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for TempDirGuard {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.path);
    }
}

fn run_vellum<I, S>(args: I) -> Output
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let bin = env!("CARGO_BIN_EXE_vellum");
    Command::new(bin)
        .args(args)
        .output()
        .expect("vellum command should execute")
}

fn assert_success(output: &Output) {
    if !output.status.success() {
        panic!(
            "command failed with status {:?}\nstdout:\n{}\nstderr:\n{}",
            output.status.code(),
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr),
        );
    }
}

fn write_json(path: &Path, text: &str) {
    fs::write(path, text).expect("fixture should be written");
}

fn parse_stdout(output: &Output) -> Value {
    serde_json::from_slice(&output.stdout).unwrap_or_else(|e| {
        panic!(
            "stdout should be JSON: {e}\n{}",
            String::from_utf8_lossy(&output.stdout)
        )
    })
}

#[test]
fn apply_writes_the_patched_document() {
    let dir = TempDirGuard::new("apply");
    let doc = dir.path().join("doc.json");
    let patches = dir.path().join("patches.json");
    let out = dir.path().join("out.json");
    write_json(&doc, r#"{"title": "test", "done": false}"#);
    write_json(
        &patches,
        r#"[{"op": "replace", "path": "/done", "value": true}]"#,
    );

    let output = run_vellum([
        "apply",
        doc.to_str().unwrap(),
        "--patches",
        patches.to_str().unwrap(),
        "--output",
        out.to_str().unwrap(),
    ]);
    assert_success(&output);

    let result: Value = serde_json::from_str(&fs::read_to_string(&out).unwrap()).unwrap();
    assert_eq!(result["done"], Value::Bool(true));
    assert_eq!(result["title"], Value::String("test".to_string()));
    // Base file untouched.
    let base: Value = serde_json::from_str(&fs::read_to_string(&doc).unwrap()).unwrap();
    assert_eq!(base["done"], Value::Bool(false));
}

#[test]
fn apply_without_output_prints_the_document() {
    let dir = TempDirGuard::new("apply-stdout");
    let doc = dir.path().join("doc.json");
    let patches = dir.path().join("patches.json");
    write_json(&doc, r#"{"done": false}"#);
    write_json(&patches, r#"[]"#);

    let output = run_vellum(["apply", doc.to_str().unwrap(), "--patches", patches.to_str().unwrap()]);
    assert_success(&output);
    let result = parse_stdout(&output);
    assert_eq!(result["done"], Value::Bool(false));
}

#[test]
fn diff_json_payload_lists_patches() {
    let dir = TempDirGuard::new("diff");
    let base = dir.path().join("base.json");
    let next = dir.path().join("next.json");
    write_json(&base, r#"{"title": "test", "done": true}"#);
    write_json(&next, r#"{"title": "test", "done": false}"#);

    let output = run_vellum([
        "diff",
        base.to_str().unwrap(),
        next.to_str().unwrap(),
        "--json",
    ]);
    assert_success(&output);
    let payload = parse_stdout(&output);
    assert_eq!(payload["patch_count"], Value::from(1));
    assert_eq!(payload["patches"][0]["op"], Value::String("replace".to_string()));
    assert_eq!(payload["patches"][0]["path"], Value::String("/done".to_string()));
    assert_ne!(payload["base_hash"], payload["next_hash"]);
}

#[test]
fn record_then_replay_reproduces_the_target() {
    let dir = TempDirGuard::new("record-replay");
    let v0 = dir.path().join("v0.json");
    let v1 = dir.path().join("v1.json");
    let v2 = dir.path().join("v2.json");
    let log = dir.path().join("patches.jsonl");
    let out = dir.path().join("replayed.json");
    write_json(&v0, r#"{"todos": []}"#);
    write_json(&v1, r#"{"todos": [{"title": "a", "done": false}]}"#);
    write_json(&v2, r#"{"todos": [{"title": "a", "done": true}]}"#);

    let output = run_vellum([
        "record",
        v0.to_str().unwrap(),
        v1.to_str().unwrap(),
        "--log",
        log.to_str().unwrap(),
        "--json",
    ]);
    assert_success(&output);
    assert_eq!(parse_stdout(&output)["seq"], Value::from(1));

    let output = run_vellum([
        "record",
        v1.to_str().unwrap(),
        v2.to_str().unwrap(),
        "--log",
        log.to_str().unwrap(),
        "--json",
    ]);
    assert_success(&output);
    assert_eq!(parse_stdout(&output)["seq"], Value::from(2));

    let output = run_vellum([
        "replay",
        v0.to_str().unwrap(),
        "--log",
        log.to_str().unwrap(),
        "--output",
        out.to_str().unwrap(),
    ]);
    assert_success(&output);

    let replayed: Value = serde_json::from_str(&fs::read_to_string(&out).unwrap()).unwrap();
    let target: Value = serde_json::from_str(&fs::read_to_string(&v2).unwrap()).unwrap();
    assert_eq!(replayed, target);
}

#[test]
fn hash_is_stable_across_formatting() {
    let dir = TempDirGuard::new("hash");
    let compact = dir.path().join("compact.json");
    let spaced = dir.path().join("spaced.json");
    write_json(&compact, r#"{"a":1,"b":[true,null]}"#);
    write_json(&spaced, "{\n  \"b\": [true, null],\n  \"a\": 1\n}");

    let first = run_vellum(["hash", compact.to_str().unwrap()]);
    let second = run_vellum(["hash", spaced.to_str().unwrap()]);
    assert_success(&first);
    assert_success(&second);
    assert_eq!(first.stdout, second.stdout);
    assert!(!first.stdout.is_empty());
}

#[test]
fn missing_document_fails_with_an_error() {
    let dir = TempDirGuard::new("missing");
    let absent = dir.path().join("absent.json");

    let output = run_vellum(["hash", absent.to_str().unwrap()]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.starts_with("error:"), "stderr was: {stderr}");
}
