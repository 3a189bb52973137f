//! Integration tests for the graphwire binary.

use std::fs;
use std::path::Path;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use tempfile::TempDir;

/// A small project: an entry document importing a bus definition from a
/// shared directory, plus a capability manifest.
fn project() -> TempDir {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    fs::create_dir_all(root.join("config")).unwrap();
    fs::create_dir_all(root.join("shared")).unwrap();

    write(
        root,
        "config/services.json",
        r#"{
            "imports": [{"resource": "bus.json"}],
            "parameters": {"app.ns": "App"},
            "services": {
                "mailer": {"class": "%app.ns%\\Mailer", "tags": [{"name": "acme.event_subscriber"}]},
                "mail": "@mailer"
            }
        }"#,
    );
    write(
        root,
        "shared/bus.json",
        r#"{"services": {"acme.event_dispatcher": {"class": "Bus\\Dispatcher"}}}"#,
    );
    write(
        root,
        "caps.json",
        r#"{"classes": {"App\\Mailer": ["event_subscriber"]}}"#,
    );
    dir
}

fn write(root: &Path, path: &str, body: &str) {
    fs::write(root.join(path), body).unwrap();
}

fn graphwire(dir: &TempDir) -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("graphwire");
    cmd.current_dir(dir.path())
        .env_remove("RUST_LOG")
        .env("NO_COLOR", "1");
    cmd
}

// ── help & usage ──────────────────────────────────────────────────────────────

#[test]
fn help_lists_subcommands() {
    cargo_bin_cmd!("graphwire")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("compile"))
        .stdout(predicate::str::contains("resolve"));
}

#[test]
fn version_flag() {
    cargo_bin_cmd!("graphwire")
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn usage_errors_exit_two() {
    cargo_bin_cmd!("graphwire").assert().code(2);
    cargo_bin_cmd!("graphwire")
        .args(["compile", "--no-such-flag", "a.json"])
        .assert()
        .code(2);
}

// ── compile ───────────────────────────────────────────────────────────────────

#[test]
fn compile_prints_summary() {
    let dir = project();
    graphwire(&dir)
        .args([
            "compile",
            "config/services.json",
            "-I",
            "shared",
            "--prefix",
            "acme",
            "--capabilities",
            "caps.json",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Compiled graph"))
        .stdout(predicate::str::contains("2 definitions, 1 aliases, 1 parameters"))
        .stdout(predicate::str::contains("mail -> mailer"))
        .stdout(predicate::str::contains("bus.json"));
}

#[test]
fn compile_json_output_wires_subscribers() {
    let dir = project();
    let output = graphwire(&dir)
        .args([
            "--output-format",
            "json",
            "compile",
            "config/services.json",
            "-I",
            "shared",
            "--prefix",
            "acme",
            "--capabilities",
            "caps.json",
        ])
        .output()
        .unwrap();
    assert!(output.status.success());

    let graph: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let ids: Vec<_> = graph["definitions"]
        .as_object()
        .unwrap()
        .keys()
        .cloned()
        .collect();
    assert_eq!(ids, ["acme.event_dispatcher", "mailer"]);

    let call = &graph["definitions"]["acme.event_dispatcher"]["calls"][0];
    assert_eq!(call["method"], "registerService");
    assert_eq!(call["arguments"][0]["string"], "App\\Mailer");
    assert_eq!(call["arguments"][1]["string"], "mailer");
}

#[test]
fn compile_writes_graph_file() {
    let dir = project();
    graphwire(&dir)
        .args(["compile", "config/services.json", "-I", "shared", "--out", "graph.json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Graph written to graph.json"));

    let text = fs::read_to_string(dir.path().join("graph.json")).unwrap();
    assert!(text.contains("\"mailer\""));
}

#[test]
fn unregistered_subscriber_fails_wiring() {
    let dir = project();
    write(dir.path(), "caps.json", r#"{"classes": {}}"#);
    graphwire(&dir)
        .args([
            "compile",
            "config/services.json",
            "-I",
            "shared",
            "--prefix",
            "acme",
            "--capabilities",
            "caps.json",
        ])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("\"mailer\""));
}

#[test]
fn parameters_extension_flag_accepts_blocks() {
    let dir = project();
    write(
        dir.path(),
        "mailer.json",
        r#"{"mailer": {"transport": "smtp"}, "services": {}}"#,
    );

    graphwire(&dir)
        .args(["check", "mailer.json"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("mailer"));

    let output = graphwire(&dir)
        .args(["--output-format", "json", "compile", "mailer.json", "-e", "mailer"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let graph: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(graph["parameters"]["mailer.transport"]["string"], "smtp");
}

// ── check ─────────────────────────────────────────────────────────────────────

#[test]
fn check_reports_success() {
    let dir = project();
    graphwire(&dir)
        .args(["check", "config/services.json", "-I", "shared"])
        .assert()
        .success()
        .stdout(predicate::str::contains("OK"));
}

#[test]
fn check_reports_unsupported_key() {
    let dir = project();
    write(
        dir.path(),
        "bad.json",
        r#"{"services": {"paint": {"class": "P", "colour": "red"}}}"#,
    );
    graphwire(&dir)
        .args(["check", "bad.json"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("\"colour\""))
        .stderr(predicate::str::contains("\"paint\""));
}

#[test]
fn missing_import_exits_three() {
    let dir = project();
    // without -I the bus import cannot be found
    graphwire(&dir)
        .args(["check", "config/services.json"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("bus.json"));
}

#[test]
fn import_cycle_is_reported() {
    let dir = project();
    write(dir.path(), "a.json", r#"{"imports": [{"resource": "b.json"}]}"#);
    write(dir.path(), "b.json", r#"{"imports": [{"resource": "a.json"}]}"#);
    graphwire(&dir)
        .args(["check", "a.json"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("a.json -> "));
}

// ── resolve ───────────────────────────────────────────────────────────────────

#[test]
fn resolve_describes_sigils() {
    cargo_bin_cmd!("graphwire")
        .args(["--output-format", "plain", "resolve", "@?logger", "@@d"])
        .assert()
        .success()
        .stdout(predicate::str::contains("optional reference to service \"logger\""))
        .stdout(predicate::str::contains("literal string \"@d\""));
}

// ── config ────────────────────────────────────────────────────────────────────

#[test]
fn environment_overrides_config() {
    let dir = project();
    graphwire(&dir)
        .env("GRAPHWIRE__WIRING__PREFIX", "acme")
        .args(["config", "get", "wiring.prefix"])
        .assert()
        .success()
        .stdout(predicate::str::diff("acme\n"));
}

#[test]
fn config_file_supplies_search_paths() {
    let dir = project();
    write(
        dir.path(),
        "graphwire.toml",
        "[loader]\nsearch_paths = [\"shared\"]\n\n[wiring]\nprefix = \"acme\"\ncapabilities = \"caps.json\"\n",
    );
    graphwire(&dir)
        .args(["--config", "graphwire.toml", "check", "config/services.json"])
        .assert()
        .success();
}

#[test]
fn unknown_config_key_exits_four() {
    let dir = project();
    graphwire(&dir)
        .args(["config", "get", "nope"])
        .assert()
        .code(4)
        .stderr(predicate::str::contains("Unknown config key"));
}

#[test]
fn missing_config_file_exits_four() {
    let dir = project();
    graphwire(&dir)
        .args(["--config", "absent.toml", "config", "list"])
        .assert()
        .code(4);
}

// ── completions ───────────────────────────────────────────────────────────────

#[test]
fn completions_mention_binary() {
    cargo_bin_cmd!("graphwire")
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("graphwire"));
}
