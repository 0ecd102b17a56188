//! End-to-end integration tests for the Silt driver.
//!
//! Each test writes a `.silt` source file, invokes `siltc` in a particular
//! mode, and asserts on stdout/stderr/exit code -- the black-box view of the
//! pipeline a tool invoking the binary would see.

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

fn siltc_bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_siltc"))
}

/// Runs `siltc` with `dir` as the working directory so that the relative
/// paths in `args` are also what the module/file layout check sees.
fn run_in(dir: &Path, args: &[&str]) -> Output {
    Command::new(siltc_bin()).current_dir(dir).args(args).output().expect("failed to invoke siltc")
}

fn write_source(dir: &Path, name: &str, contents: &str) {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("failed to create parent dir");
    }
    std::fs::write(&path, contents).expect("failed to write source file");
}

#[test]
fn compile_succeeds_on_a_well_formed_module() {
    let tmp = tempfile::tempdir().unwrap();
    write_source(tmp.path(), "M.silt", "module M where\n  x : Type\n  x = Type\n");

    let output = run_in(tmp.path(), &["--mode", "compile", "M.silt"]);
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
}

#[test]
fn compile_fails_and_exits_nonzero_on_undeclared_identifier() {
    let tmp = tempfile::tempdir().unwrap();
    write_source(tmp.path(), "M.silt", "module M where\n  x : Type\n  x = y\n");

    let output = run_in(tmp.path(), &["--mode", "compile", "M.silt"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("undeclared identifier"), "stderr was: {stderr}");
}

#[test]
fn verify_parse_reports_malformed_input() {
    let tmp = tempfile::tempdir().unwrap();
    write_source(tmp.path(), "M.silt", "data : where\n");

    let output = run_in(tmp.path(), &["--mode", "verify-parse", "M.silt"]);
    assert!(!output.status.success());
}

#[test]
fn dump_tokens_emits_a_json_array_including_an_eof_token() {
    let tmp = tempfile::tempdir().unwrap();
    write_source(tmp.path(), "M.silt", "module M where\n  x : Type\n  x = Type\n");

    let output = run_in(tmp.path(), &["--mode", "dump-tokens", "M.silt"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let json: serde_json::Value = serde_json::from_str(&stdout).expect("dump-tokens must print valid JSON");
    let tokens = json["tokens"].as_array().expect("tokens field must be an array");
    assert!(!tokens.is_empty());
    assert!(tokens.iter().any(|t| t["kind"] == "Eof"));
}

#[test]
fn dump_shined_inserts_implicit_layout_tokens() {
    // Mirrors the literal layout scenario: implicit `{`, `;`, `}` around the
    // two declarations inside `where`.
    let tmp = tempfile::tempdir().unwrap();
    write_source(tmp.path(), "M.silt", "module M where\n  x : Type\n  x = Type\n");

    let output = run_in(tmp.path(), &["--mode", "dump-shined", "M.silt"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let json: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    let tokens = json["tokens"].as_array().unwrap();
    let implicit_count = tokens.iter().filter(|t| t["presence"] == "Implicit").count();
    assert!(implicit_count >= 3, "expected at least the implicit {{, ;, }} trio, got {implicit_count}");
}

#[test]
fn dump_file_reconstructs_the_source_byte_for_byte() {
    let tmp = tempfile::tempdir().unwrap();
    let source = "module M where\n  x : Type\n  x = Type\n";
    write_source(tmp.path(), "M.silt", source);

    let output = run_in(tmp.path(), &["--mode", "dump-file", "M.silt"]);
    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout), source);
}

#[test]
fn dump_parse_emits_a_json_tree_rooted_at_source_file() {
    let tmp = tempfile::tempdir().unwrap();
    write_source(tmp.path(), "M.silt", "module M where\n  x : Type\n  x = Type\n");

    let output = run_in(tmp.path(), &["--mode", "dump-parse", "M.silt"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let json: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(json["tree"]["kind"], "SOURCE_FILE");
}

#[test]
fn dump_scopes_names_every_declaration_with_its_module_prefix() {
    let tmp = tempfile::tempdir().unwrap();
    write_source(tmp.path(), "M.silt", "module M where\n  x : Type\n  x = Type\n");

    let output = run_in(tmp.path(), &["--mode", "dump-scopes", "M.silt"]);
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    let stdout = String::from_utf8_lossy(&output.stdout);
    let json: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(json["moduleName"], "M");
    let decls = json["decls"].as_array().unwrap();
    assert_eq!(decls.len(), 2);
    assert_eq!(decls[0]["name"], "M.x");
}

#[test]
fn mismatched_module_file_layout_is_reported_and_exits_nonzero() {
    let tmp = tempfile::tempdir().unwrap();
    write_source(tmp.path(), "Wrong.silt", "module M where\n  x : Type\n  x = Type\n");

    let output = run_in(tmp.path(), &["--mode", "verify-scopes", "Wrong.silt"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("incorrectModuleStructure") || stderr.contains("must be declared in a file"));
}

#[test]
fn no_color_flag_suppresses_ansi_escapes_in_diagnostics() {
    let tmp = tempfile::tempdir().unwrap();
    write_source(tmp.path(), "M.silt", "module M where\n  x : Type\n  x = y\n");

    let output = run_in(tmp.path(), &["--mode", "compile", "--no-color", "M.silt"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(!stderr.contains('\u{1b}'), "expected no ANSI escapes with --no-color, got: {stderr:?}");
}

#[test]
fn missing_input_file_is_reported_as_could_not_read_input() {
    let tmp = tempfile::tempdir().unwrap();

    let output = run_in(tmp.path(), &["--mode", "compile", "DoesNotExist.silt"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("could not read input"), "stderr was: {stderr}");
}

#[test]
fn multiple_paths_are_each_checked_and_any_error_fails_the_whole_run() {
    let tmp = tempfile::tempdir().unwrap();
    write_source(tmp.path(), "Good.silt", "module Good where\n  x : Type\n  x = Type\n");
    write_source(tmp.path(), "Bad.silt", "module Bad where\n  x : Type\n  x = y\n");

    let output = run_in(tmp.path(), &["--mode", "compile", "Good.silt", "Bad.silt"]);
    assert!(!output.status.success());
}
