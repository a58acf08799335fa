use assert_cmd::Command;
use predicates::prelude::*;

use crate::common::{TestConfig, uplift};

#[test]
fn test_help_lists_upgrade() {
    Command::cargo_bin("uplift")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("upgrade"))
        .stdout(predicate::str::contains("--config"));
}

#[test]
fn test_upgrade_help_mentions_check() {
    Command::cargo_bin("uplift")
        .unwrap()
        .args(["upgrade", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--check"));
}

#[test]
fn test_version_flag() {
    Command::cargo_bin("uplift")
        .unwrap()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_missing_subcommand_is_a_usage_error() {
    Command::cargo_bin("uplift").unwrap().assert().failure();
}

#[test]
fn test_invalid_config_is_reported() {
    let config = TestConfig::raw("[upgrade\nreleases_url = ");

    uplift(&config.path)
        .args(["upgrade", "--check"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Failed to parse global config"));
}

#[test]
fn test_zero_timeout_is_rejected() {
    let config = TestConfig::raw("[upgrade]\nrequest_timeout_secs = 0\n");

    uplift(&config.path)
        .args(["upgrade", "--check"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("request_timeout_secs"));
}

#[test]
fn test_unreachable_feed_fails_the_check() {
    let config = TestConfig::raw(
        "[upgrade]\nreleases_url = \"http://127.0.0.1:9/releases.json\"\nrequest_timeout_secs = 5\n",
    );

    uplift(&config.path)
        .arg("upgrade")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("could not check for updates"));
}

#[test]
fn test_config_from_environment() {
    let config = TestConfig::raw("[upgrade\n");

    Command::cargo_bin("uplift")
        .unwrap()
        .env("UPLIFT_CONFIG", &config.path)
        .args(["--no-progress", "upgrade", "--check"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Failed to parse global config"));
}

#[test]
fn test_config_flag_overrides_environment() {
    let from_env = TestConfig::raw("[upgrade\n");
    let from_flag = TestConfig::raw("[upgrade]\nrequest_timeout_secs = 0\n");

    uplift(&from_flag.path)
        .env("UPLIFT_CONFIG", &from_env.path)
        .args(["upgrade", "--check"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("request_timeout_secs"))
        .stderr(predicate::str::contains("Failed to parse global config").not());
}
