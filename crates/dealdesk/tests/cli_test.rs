//! Integration tests for the `dealdesk` CLI binary.
//!
//! These tests validate argument parsing, help output, shell completions,
//! and error handling — all without requiring a live marketplace API.
#![allow(clippy::unwrap_used)]

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a [`Command`] for the `dealdesk` binary with env isolation.
///
/// Clears all `DEALDESK_*` env vars and points config directories at a
/// nonexistent path so tests never touch the user's real configuration.
fn dealdesk_cmd() -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("dealdesk");
    cmd.env("HOME", "/tmp/dealdesk-cli-test-nonexistent")
        .env("XDG_CONFIG_HOME", "/tmp/dealdesk-cli-test-nonexistent")
        .env_remove("DEALDESK_PROFILE")
        .env_remove("DEALDESK_API_URL")
        .env_remove("DEALDESK_IDENTITY_URL")
        .env_remove("DEALDESK_TOKEN")
        .env_remove("DEALDESK_REFRESH_TOKEN")
        .env_remove("DEALDESK_PASSWORD")
        .env_remove("DEALDESK_OUTPUT")
        .env_remove("DEALDESK_INSECURE")
        .env_remove("DEALDESK_TIMEOUT")
        .env_remove("DEALDESK_DEFAULT_PROFILE");
    cmd
}

/// Concatenate stdout + stderr from a command output for flexible matching.
fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let output = dealdesk_cmd().output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
    let text = combined_output(&output);
    assert!(
        text.contains("Usage"),
        "Expected 'Usage' in output:\n{text}"
    );
}

#[test]
fn test_help_flag() {
    dealdesk_cmd().arg("--help").assert().success().stdout(
        predicate::str::contains("marketplace")
            .and(predicate::str::contains("categories"))
            .and(predicate::str::contains("products"))
            .and(predicate::str::contains("coupons"))
            .and(predicate::str::contains("vendors")),
    );
}

#[test]
fn test_version_flag() {
    dealdesk_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("dealdesk"));
}

// ── Shell completions ───────────────────────────────────────────────

#[test]
fn test_completions_bash() {
    dealdesk_cmd()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty().not());
}

#[test]
fn test_completions_zsh() {
    dealdesk_cmd()
        .args(["completions", "zsh"])
        .assert()
        .success()
        .stdout(predicate::str::contains("#compdef"));
}

#[test]
fn test_completions_fish() {
    dealdesk_cmd()
        .args(["completions", "fish"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty().not());
}

// ── Error cases ─────────────────────────────────────────────────────

#[test]
fn test_invalid_subcommand() {
    let output = dealdesk_cmd().arg("foobar").output().unwrap();
    assert!(
        !output.status.success(),
        "Expected failure for invalid subcommand"
    );
    let text = combined_output(&output);
    assert!(
        text.contains("invalid") || text.contains("unrecognized") || text.contains("foobar"),
        "Expected error mentioning invalid subcommand:\n{text}"
    );
}

#[test]
fn test_whoami_without_credentials() {
    // No config file, no token: the auth failure family exits with 3.
    let output = dealdesk_cmd().arg("whoami").output().unwrap();
    assert_eq!(output.status.code(), Some(3), "Expected exit code 3");
    let text = combined_output(&output);
    assert!(
        text.contains("credentials") || text.contains("login"),
        "Expected a credentials hint:\n{text}"
    );
}

#[test]
fn test_products_list_no_config() {
    dealdesk_cmd()
        .args(["products", "list"])
        .assert()
        .failure()
        .stderr(
            predicate::str::contains("credentials")
                .or(predicate::str::contains("profile"))
                .or(predicate::str::contains("login")),
        );
}

#[test]
fn test_token_alone_still_needs_an_api_url() {
    // A bearer token satisfies credentials; the URL check fails next,
    // in the config family (exit code 2).
    let output = dealdesk_cmd()
        .args(["--token", "tok-123", "products", "list"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
    let text = combined_output(&output);
    assert!(
        text.contains("api-url"),
        "Expected the missing flag to be named:\n{text}"
    );
}

#[test]
fn test_config_show_no_config() {
    // `config show` uses load_config_or_default() so it succeeds even
    // when no config file exists — it just renders the default config.
    dealdesk_cmd().args(["config", "show"]).assert().success();
}

#[test]
fn test_config_path_prints_a_path() {
    dealdesk_cmd()
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.toml"));
}

#[test]
fn test_config_set_default_unknown_profile() {
    let output = dealdesk_cmd()
        .args(["config", "set-default", "missing"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
    let text = combined_output(&output);
    assert!(
        text.contains("missing"),
        "Expected the profile name in the error:\n{text}"
    );
}

#[test]
fn test_invalid_output_format() {
    let output = dealdesk_cmd()
        .args(["--output", "invalid", "products", "list"])
        .output()
        .unwrap();
    assert!(
        !output.status.success(),
        "Expected failure for invalid output format"
    );
    let text = combined_output(&output);
    assert!(
        text.contains("invalid")
            || text.contains("possible values")
            || text.contains("valid value"),
        "Expected error about valid output formats:\n{text}"
    );
}

#[test]
fn test_global_flags_parsing() {
    // All flags should parse correctly — the failure should be about
    // missing credentials, not about argument parsing.
    dealdesk_cmd()
        .args([
            "--output",
            "json",
            "--verbose",
            "--insecure",
            "--timeout",
            "60",
            "products",
            "list",
        ])
        .assert()
        .failure()
        .stderr(
            predicate::str::contains("credentials")
                .or(predicate::str::contains("profile"))
                .or(predicate::str::contains("login")),
        );
}

// ── Subcommand help discovery ───────────────────────────────────────

#[test]
fn test_categories_subcommands_exist() {
    dealdesk_cmd()
        .args(["categories", "--help"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("list")
                .and(predicate::str::contains("create"))
                .and(predicate::str::contains("move"))
                .and(predicate::str::contains("save-order"))
                .and(predicate::str::contains("delete")),
        );
}

#[test]
fn test_products_subcommands_exist() {
    dealdesk_cmd()
        .args(["products", "--help"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("list")
                .and(predicate::str::contains("show"))
                .and(predicate::str::contains("reorder"))
                .and(predicate::str::contains("variants"))
                .and(predicate::str::contains("remove-variant")),
        );
}

#[test]
fn test_coupons_subcommands_exist() {
    dealdesk_cmd()
        .args(["coupons", "--help"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("list")
                .and(predicate::str::contains("approve"))
                .and(predicate::str::contains("mark-used")),
        );
}

#[test]
fn test_deals_subcommands_exist() {
    dealdesk_cmd()
        .args(["deals", "--help"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("top")
                .and(predicate::str::contains("by-vendor"))
                .and(predicate::str::contains("analytics")),
        );
}

#[test]
fn test_config_subcommands_exist() {
    dealdesk_cmd()
        .args(["config", "--help"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("show")
                .and(predicate::str::contains("path"))
                .and(predicate::str::contains("set-default")),
        );
}

#[test]
fn test_resource_aliases_resolve() {
    // `cat` → categories, `inf` → influencers, `media` → gallery.
    for alias in ["cat", "inf", "media"] {
        dealdesk_cmd().args([alias, "--help"]).assert().success();
    }
}
