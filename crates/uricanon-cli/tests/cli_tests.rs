//! Integration tests for the uricanon CLI
//!
//! These tests invoke the actual uricanon-cli binary and verify:
//! - Exit codes (0 = success, 1 = input rejected, 2 = error)
//! - stdout/stderr output
//! - JSON output format
//! - All commands work end-to-end

use std::path::PathBuf;
use std::process::Command;

// ── Helpers ───────────────────────────────────────────────

fn uricanon_bin() -> PathBuf {
    let mut path = PathBuf::from(env!("CARGO_BIN_EXE_uricanon-cli"));
    if !path.exists() {
        path = PathBuf::from("target/debug/uricanon-cli");
    }
    path
}

fn run_uricanon(args: &[&str]) -> std::process::Output {
    Command::new(uricanon_bin())
        .args(args)
        .current_dir(env!("CARGO_MANIFEST_DIR"))
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to execute uricanon-cli")
}

fn stdout_of(output: &std::process::Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

fn write_config(name: &str, json: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("uricanon_test_{}.json", name));
    std::fs::write(&path, json).expect("write temp config");
    path
}

// ── Version ───────────────────────────────────────────────

#[test]
fn test_version_command() {
    let output = run_uricanon(&["version"]);
    assert!(output.status.success(), "version should exit 0");
    let stdout = stdout_of(&output);
    assert!(stdout.contains("uricanon"), "should contain 'uricanon'");
    assert!(
        stdout.contains(env!("CARGO_PKG_VERSION")),
        "should contain version"
    );
}

#[test]
fn test_version_flag() {
    let output = run_uricanon(&["--version"]);
    assert!(output.status.success(), "--version should exit 0");
    assert!(stdout_of(&output).contains(env!("CARGO_PKG_VERSION")));
}

// ── Normalize ─────────────────────────────────────────────

#[test]
fn test_normalize_single_uri() {
    let output = run_uricanon(&["normalize", "HTTP://0xC0.0250.01:80/index.html?jsessionid=42"]);
    assert!(output.status.success(), "normalize should exit 0");
    assert_eq!(stdout_of(&output), "http://192.168.0.1/index.html\n");
}

#[test]
fn test_normalize_many_uris_in_order() {
    let output = run_uricanon(&[
        "normalize",
        "https://Example.COM:443/a?q=1&phpsessionid=x",
        "http://[FEDC:0:7654:0:0:BA98:7654:3210]/",
    ]);
    assert!(output.status.success());
    let lines: Vec<String> = stdout_of(&output).lines().map(str::to_string).collect();
    assert_eq!(
        lines,
        vec![
            "https://example.com/a?q=1".to_string(),
            "http://[fedc:0:7654::ba98:7654:3210]/".to_string(),
        ]
    );
}

#[test]
fn test_normalize_rejected_ipv4() {
    let output = run_uricanon(&["normalize", "http://192.168.0.257/"]);
    assert_eq!(output.status.code(), Some(1), "bad IPv4 host should exit 1");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("canonicalize-ip-host"), "should name the failing rule");
}

#[test]
fn test_normalize_malformed_uri() {
    let output = run_uricanon(&["normalize", "no scheme here"]);
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn test_normalize_partial_failure_still_prints_good_uris() {
    let output = run_uricanon(&["normalize", "http://HOST/", "http://[1::2::3]/", "http://h:80/"]);
    assert_eq!(output.status.code(), Some(1));
    assert_eq!(stdout_of(&output), "http://host/\nhttp://h/\n");
}

#[test]
fn test_normalize_idempotent() {
    let output1 = run_uricanon(&["normalize", "HTTP://0300.0250.0.1.:80/x?jsessionid=1&a#f"]);
    assert!(output1.status.success());
    let canonical1 = stdout_of(&output1).trim().to_string();

    let output2 = run_uricanon(&["normalize", &canonical1]);
    assert!(output2.status.success());
    let canonical2 = stdout_of(&output2).trim().to_string();

    assert_eq!(canonical1, canonical2, "normalize must be idempotent");
}

#[test]
fn test_normalize_json_output() {
    let output = run_uricanon(&["normalize", "--json", "http://3232235521/", "http://[::1::]/"]);
    assert_eq!(output.status.code(), Some(1));
    let json: serde_json::Value =
        serde_json::from_str(&stdout_of(&output)).expect("should be valid JSON");
    let results = json.as_array().expect("array of results");
    assert_eq!(results.len(), 2);
    assert_eq!(results[0]["canonical"], "http://192.168.0.1/");
    assert_eq!(results[0]["dedup_key"].as_str().unwrap().len(), 64);
    assert_eq!(results[1]["rule"], "canonicalize-ip-host");
    assert!(results[1]["error"].as_str().unwrap().contains("IPv6"));
}

#[test]
fn test_normalize_quiet() {
    let output = run_uricanon(&["--quiet", "normalize", "http://HOST/"]);
    assert!(output.status.success());
    assert!(stdout_of(&output).is_empty(), "quiet mode should produce no stdout");

    let output = run_uricanon(&["--quiet", "normalize", "http://0x100000000/"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(output.stderr.is_empty(), "quiet mode should produce no stderr");
}

#[test]
fn test_normalize_requires_an_argument() {
    let output = run_uricanon(&["normalize"]);
    assert_eq!(output.status.code(), Some(2), "usage error should exit 2");
}

// ── Config ────────────────────────────────────────────────

#[test]
fn test_config_changes_pipeline() {
    let config = write_config(
        "upper_fragment",
        r#"{ "hex_case": "upper", "strip_fragment": true, "strip_default_port": false }"#,
    );
    let output = run_uricanon(&[
        "--config",
        config.to_str().unwrap(),
        "normalize",
        "http://[fedc::1]:80/#top",
    ]);
    assert!(output.status.success());
    assert_eq!(stdout_of(&output), "http://[FEDC::1]:80/\n");
    let _ = std::fs::remove_file(&config);
}

#[test]
fn test_config_hex_case_applies_to_ip() {
    let config = write_config("upper_ip", r#"{ "hex_case": "upper" }"#);
    let path = config.to_str().unwrap();

    let output = run_uricanon(&["--config", path, "ip", "::a"]);
    assert!(output.status.success());
    assert_eq!(stdout_of(&output), "::A\n");

    let output = run_uricanon(&["--config", path, "normalize", "http://[::a]/"]);
    assert_eq!(stdout_of(&output), "http://[::A]/\n");
    let _ = std::fs::remove_file(&config);
}

#[test]
fn test_config_missing_file() {
    let output = run_uricanon(&["--config", "nonexistent.json", "normalize", "http://h/"]);
    assert_eq!(output.status.code(), Some(2), "missing config should exit 2");
}

#[test]
fn test_config_unknown_field() {
    let config = write_config("unknown_field", r#"{ "strip_everything": true }"#);
    let output = run_uricanon(&["--config", config.to_str().unwrap(), "rules"]);
    assert_eq!(output.status.code(), Some(2));
    let _ = std::fs::remove_file(&config);
}

// ── Hash ──────────────────────────────────────────────────

#[test]
fn test_hash_is_sha256_hex() {
    let output = run_uricanon(&["hash", "http://example.com/"]);
    assert!(output.status.success(), "hash should exit 0");
    let stdout = stdout_of(&output).trim().to_string();
    assert_eq!(stdout.len(), 64, "SHA-256 hash should be 64 hex chars");
    assert!(stdout.chars().all(|c| c.is_ascii_hexdigit()), "hash should be hex");
}

#[test]
fn test_hash_equivalent_uris_share_key() {
    let a = run_uricanon(&["hash", "HTTP://0xc0.0250.01:80/?jsessionid=9"]);
    let b = run_uricanon(&["hash", "http://192.168.0.1/"]);
    assert!(a.status.success() && b.status.success());
    assert_eq!(stdout_of(&a), stdout_of(&b));
}

#[test]
fn test_hash_determinism() {
    let first = stdout_of(&run_uricanon(&["hash", "https://example.com/a?b=c"]));
    for _ in 0..10 {
        let output = run_uricanon(&["hash", "https://example.com/a?b=c"]);
        assert_eq!(first, stdout_of(&output), "hash must be deterministic");
    }
}

#[test]
fn test_hash_rejected() {
    let output = run_uricanon(&["hash", "http://8584905.168.0.254/"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stdout_of(&output).is_empty());
}

// ── Ip ────────────────────────────────────────────────────

#[test]
fn test_ip_ipv4_encodings() {
    for literal in ["0xc0.0250.01", "3232235521", "192.168.0.1", "0Xc0.0250.01"] {
        let output = run_uricanon(&["ip", literal]);
        assert!(output.status.success(), "{} should exit 0", literal);
        assert_eq!(stdout_of(&output), "192.168.0.1\n", "literal {}", literal);
    }
}

#[test]
fn test_ip_ipv6() {
    let output = run_uricanon(&["ip", "[1080:0:0:0:8:800:200C:417A]"]);
    assert!(output.status.success());
    assert_eq!(stdout_of(&output), "1080::8:800:200c:417a\n");

    let output = run_uricanon(&["ip", "::FFFF:129.144.52.38"]);
    assert_eq!(stdout_of(&output), "::ffff:8190:3426\n");
}

#[test]
fn test_ip_base85() {
    let output = run_uricanon(&["ip", "--base85", "1080:0:0:0:8:800:200C:417A"]);
    assert!(output.status.success());
    assert_eq!(stdout_of(&output), "4)+k&C#VzJ4br>0wv%Yp\n");

    let output = run_uricanon(&["ip", "4)+k&C#VzJ4br>0wv%Yp"]);
    assert_eq!(stdout_of(&output), "1080::8:800:200c:417a\n");
}

#[test]
fn test_ip_base85_rejects_ipv4() {
    let output = run_uricanon(&["ip", "--base85", "192.168.0.1"]);
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn test_ip_not_a_literal() {
    let output = run_uricanon(&["ip", "www.example.com"]);
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("not an IP literal"));
}

#[test]
fn test_ip_malformed() {
    for literal in ["192.168.0.257", "1::2::3", "1:2:3:4:5:6:7:8:9"] {
        let output = run_uricanon(&["ip", literal]);
        assert_eq!(output.status.code(), Some(1), "{} should exit 1", literal);
    }
}

// ── Rules ─────────────────────────────────────────────────

#[test]
fn test_rules_lists_default_pipeline() {
    let output = run_uricanon(&["rules"]);
    assert!(output.status.success());
    let stdout = stdout_of(&output);
    for name in [
        "lower-case-scheme-and-host",
        "canonicalize-ip-host",
        "strip-session-id",
        "strip-default-port",
    ] {
        assert!(stdout.contains(name), "should list {}", name);
    }
    assert!(!stdout.contains("strip-fragment"), "fragment rule is off by default");
}

#[test]
fn test_rules_json_output() {
    let output = run_uricanon(&["rules", "--json"]);
    assert!(output.status.success());
    let json: serde_json::Value =
        serde_json::from_str(&stdout_of(&output)).expect("should be valid JSON");
    let rules = json.as_array().expect("array of rules");
    assert_eq!(rules.len(), 4);
    assert_eq!(rules[0]["name"], "lower-case-scheme-and-host");
    assert_eq!(rules[0]["stage"], "pre-parse");
    assert_eq!(rules[2]["name"], "strip-session-id");
    assert_eq!(rules[2]["schemes"], serde_json::json!(["http", "https"]));
}

// ── Logging ───────────────────────────────────────────

#[test]
fn test_rust_log_enables_diagnostics_on_stderr() {
    let output = Command::new(uricanon_bin())
        .args(["normalize", "http://HOST/"])
        .current_dir(env!("CARGO_MANIFEST_DIR"))
        .env("RUST_LOG", "debug")
        .output()
        .expect("failed to execute uricanon-cli");
    assert!(output.status.success());
    assert_eq!(stdout_of(&output), "http://host/\n", "logs must not reach stdout");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("normalized"), "debug events expected on stderr");
}

#[test]
fn test_default_log_level_is_silent() {
    let output = run_uricanon(&["normalize", "http://HOST/"]);
    assert!(output.status.success());
    assert!(output.stderr.is_empty());
}

// ── Determinism ───────────────────────────────────────────

#[test]
fn test_cli_normalize_determinism_100_iterations() {
    let input = "https://[FEDC:BA98:7654:3210:FEDC:BA98:0:0]:443/?phpsessionid=1&q=a";
    let first = stdout_of(&run_uricanon(&["normalize", input]));
    assert_eq!(first, "https://[fedc:ba98:7654:3210:fedc:ba98::]/?q=a\n");

    for i in 0..100 {
        let output = run_uricanon(&["normalize", input]);
        assert_eq!(first, stdout_of(&output), "Determinism failure at iteration {}", i);
    }
}
