use assert_cmd::Command;
use serde_json::json;
use serde_json::Value;
use tempfile::tempdir;

fn xref_js_cli() -> Command {
  Command::cargo_bin("xref-js-cli").unwrap()
}

// `let n = 1; n < 2` with `n` declared by the first statement.
fn comparison_input() -> Value {
  json!({
    "source": "let n = 1; n < 2",
    "nodes": [
      { "kind": "SourceFile", "start": 0, "end": 16 },
      { "kind": "Other", "start": 0, "end": 10, "parent": 0 },
      { "kind": "Identifier", "role": "Name", "start": 4, "end": 5, "parent": 1 },
      { "kind": "Other", "start": 11, "end": 16, "parent": 0 },
      { "kind": "Identifier", "start": 11, "end": 12, "parent": 3 }
    ],
    "resolution": {
      "symbols": [{ "declarations": [{ "Local": 2 }] }],
      "occurrences": [{ "node": 2, "symbol": 0 }, { "node": 4, "symbol": 0 }]
    }
  })
}

const COMPARISON_HTML: &str = concat!(
  r#"let <span class="definition" id="symbol-n">n</span> = 1; "#,
  r##"<a class="ref" href="#symbol-n">n</a> &lt; 2"##,
);

#[test]
fn annotates_input_file_to_stdout() {
  let dir = tempdir().unwrap();
  let path = dir.path().join("input.json");
  std::fs::write(&path, comparison_input().to_string()).unwrap();

  let assert = xref_js_cli().arg("--input").arg(&path).assert().success();
  let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
  assert_eq!(stdout, COMPARISON_HTML);
  assert!(assert.get_output().stderr.is_empty());
}

#[test]
fn json_output_wraps_html_and_diagnostics() {
  let assert = xref_js_cli()
    .arg("--json")
    .write_stdin(comparison_input().to_string())
    .assert()
    .success();
  let output: Value = serde_json::from_slice(&assert.get_output().stdout).unwrap();
  assert_eq!(output["schema_version"], 1);
  assert_eq!(output["html"], COMPARISON_HTML);
  assert_eq!(output["diagnostics"], json!([]));
}

#[test]
fn writes_output_file() {
  let dir = tempdir().unwrap();
  let input = dir.path().join("input.json");
  let output = dir.path().join("out.html");
  std::fs::write(&input, comparison_input().to_string()).unwrap();

  xref_js_cli()
    .arg("-i")
    .arg(&input)
    .arg("-o")
    .arg(&output)
    .assert()
    .success();
  assert_eq!(std::fs::read_to_string(&output).unwrap(), COMPARISON_HTML);
}

#[test]
fn ambiguous_declarations_are_reported_on_stderr() {
  let input = json!({
    "source": "var q; var q;",
    "nodes": [
      { "kind": "SourceFile", "start": 0, "end": 13 },
      { "kind": "Other", "start": 0, "end": 6, "parent": 0 },
      { "kind": "Identifier", "role": "Name", "start": 4, "end": 5, "parent": 1 },
      { "kind": "Other", "start": 7, "end": 13, "parent": 0 },
      { "kind": "Identifier", "role": "Name", "start": 11, "end": 12, "parent": 3 }
    ],
    "resolution": {
      "symbols": [{ "declarations": [{ "Local": 1 }, { "Local": 3 }] }],
      "occurrences": [{ "node": 2, "symbol": 0 }, { "node": 4, "symbol": 0 }]
    }
  });

  let assert = xref_js_cli()
    .write_stdin(input.to_string())
    .assert()
    .success();
  let stderr = String::from_utf8(assert.get_output().stderr.clone()).unwrap();
  assert!(stderr.contains("note[XR0001]"), "stderr: {stderr}");
  assert!(stderr.contains("--> <stdin>:1:5"), "stderr: {stderr}");
  assert!(stderr.contains("<stdin>:1:12: also declared here"), "stderr: {stderr}");

  let assert = xref_js_cli()
    .arg("--json")
    .write_stdin(input.to_string())
    .assert()
    .success();
  assert!(assert.get_output().stderr.is_empty());
  let output: Value = serde_json::from_slice(&assert.get_output().stdout).unwrap();
  assert_eq!(output["diagnostics"][0]["code"], "XR0001");
  assert_eq!(output["diagnostics"][0]["severity"], "note");
}

#[test]
fn no_linkify_keeps_urls_as_text() {
  let input = json!({
    "source": "// see https://example.com",
    "nodes": [{ "kind": "SourceFile", "start": 0, "end": 26 }]
  });

  let assert = xref_js_cli()
    .write_stdin(input.to_string())
    .assert()
    .success();
  assert_eq!(
    String::from_utf8(assert.get_output().stdout.clone()).unwrap(),
    r#"// see <a href="https://example.com">https://example.com</a>"#
  );

  let assert = xref_js_cli()
    .arg("--no-linkify")
    .write_stdin(input.to_string())
    .assert()
    .success();
  assert_eq!(
    String::from_utf8(assert.get_output().stdout.clone()).unwrap(),
    "// see https://example.com"
  );
}

#[test]
fn malformed_input_fails() {
  let assert = xref_js_cli()
    .write_stdin("{ not json")
    .assert()
    .failure()
    .code(1);
  let stderr = String::from_utf8(assert.get_output().stderr.clone()).unwrap();
  assert!(stderr.contains("invalid annotation input"), "stderr: {stderr}");
  assert!(assert.get_output().stdout.is_empty());
}

#[test]
fn tree_not_matching_source_fails() {
  let input = json!({
    "source": "let",
    "nodes": [{ "kind": "SourceFile", "start": 0, "end": 10 }]
  });
  let assert = xref_js_cli()
    .write_stdin(input.to_string())
    .assert()
    .failure()
    .code(1);
  let stderr = String::from_utf8(assert.get_output().stderr.clone()).unwrap();
  assert!(stderr.starts_with("error: <stdin>:"), "stderr: {stderr}");
}

#[test]
fn resolution_naming_missing_nodes_fails() {
  let input = json!({
    "source": "x;",
    "nodes": [
      { "kind": "SourceFile", "start": 0, "end": 2 },
      { "kind": "Identifier", "start": 0, "end": 1, "parent": 0 }
    ],
    "resolution": {
      "symbols": [{ "declarations": [{ "Local": 99 }] }],
      "occurrences": [{ "node": 1, "symbol": 0 }]
    }
  });
  let assert = xref_js_cli()
    .write_stdin(input.to_string())
    .assert()
    .failure()
    .code(1);
  let stderr = String::from_utf8(assert.get_output().stderr.clone()).unwrap();
  assert!(stderr.contains("node 99 which is not in the syntax tree"), "stderr: {stderr}");
  assert!(assert.get_output().stdout.is_empty());
}
