use predicates::prelude::*;
use uplift_cli::upgrade::platform::artifact_name;
use wiremock::matchers::{method, path, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::common::{TestConfig, feed, uplift};

const CURRENT: &str = env!("CARGO_PKG_VERSION");

async fn serve_feed(server: &MockServer, names: &[&str]) {
    Mock::given(method("GET"))
        .and(path("/releases.json"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(feed(names), "application/json"))
        .mount(server)
        .await;
}

async fn forbid_downloads(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path_regex("^/releases/"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(server)
        .await;
}

fn artifact_path(version: &str) -> String {
    format!(
        "/releases/{version}/{}",
        artifact_name("uplift", std::env::consts::OS, std::env::consts::ARCH)
    )
}

#[tokio::test(flavor = "multi_thread")]
async fn test_check_reports_available_update() {
    let server = MockServer::start().await;
    serve_feed(&server, &["v99.0.0", "v1.0.0"]).await;
    forbid_downloads(&server).await;
    let config = TestConfig::for_server(&server.uri());

    uplift(&config.path)
        .args(["upgrade", "--check"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Update available"))
        .stdout(predicate::str::contains("v99.0.0"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_check_when_up_to_date() {
    let server = MockServer::start().await;
    let latest = format!("v{CURRENT}");
    serve_feed(&server, &[latest.as_str()]).await;
    forbid_downloads(&server).await;
    let config = TestConfig::for_server(&server.uri());

    uplift(&config.path)
        .args(["upgrade", "--check"])
        .assert()
        .success()
        .stdout(predicate::str::contains("You are on the latest version"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_upgrade_same_version_downloads_nothing() {
    let server = MockServer::start().await;
    serve_feed(&server, &[CURRENT]).await;
    forbid_downloads(&server).await;
    let config = TestConfig::for_server(&server.uri());

    uplift(&config.path)
        .arg("upgrade")
        .assert()
        .success()
        .stdout(predicate::str::contains("Current version:"))
        .stdout(predicate::str::contains("Already on the latest version"));

    let staged = config
        .scratch_dir()
        .join(format!("uplift{}", std::env::consts::EXE_SUFFIX));
    assert!(!staged.exists());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_upgrade_never_downgrades() {
    let server = MockServer::start().await;
    serve_feed(&server, &["v0.0.0-alpha"]).await;
    forbid_downloads(&server).await;
    let config = TestConfig::for_server(&server.uri());

    uplift(&config.path)
        .arg("upgrade")
        .assert()
        .success()
        .stdout(predicate::str::contains("Already on the latest version"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_empty_release_list_fails_the_check() {
    let server = MockServer::start().await;
    serve_feed(&server, &[]).await;
    forbid_downloads(&server).await;
    let config = TestConfig::for_server(&server.uri());

    uplift(&config.path)
        .arg("upgrade")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("could not check for updates"))
        .stderr(predicate::str::contains("empty release list"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_unparsable_latest_version_fails_the_check() {
    let server = MockServer::start().await;
    serve_feed(&server, &["nightly"]).await;
    forbid_downloads(&server).await;
    let config = TestConfig::for_server(&server.uri());

    uplift(&config.path)
        .arg("upgrade")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("could not check for updates"))
        .stderr(predicate::str::contains("nightly"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_missing_artifact_fails_the_download() {
    let server = MockServer::start().await;
    serve_feed(&server, &["v99.0.0"]).await;
    Mock::given(method("GET"))
        .and(path_regex("^/releases/v99.0.0/"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    let config = TestConfig::for_server(&server.uri());

    let executable = assert_cmd::cargo::cargo_bin("uplift");
    let before = std::fs::read(&executable).unwrap();

    uplift(&config.path)
        .arg("upgrade")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("found an update but could not download it"))
        .stderr(predicate::str::contains("404"));

    assert_eq!(std::fs::read(&executable).unwrap(), before);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_checksum_mismatch_fails_the_download() {
    let server = MockServer::start().await;
    serve_feed(&server, &["v99.0.0"]).await;

    let artifact = artifact_path("v99.0.0");
    Mock::given(method("GET"))
        .and(path(format!("{artifact}.sha256")))
        .respond_with(ResponseTemplate::new(200).set_body_string("0".repeat(64)))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(artifact))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"not really uplift".to_vec()))
        .mount(&server)
        .await;
    let config = TestConfig::for_server(&server.uri());

    uplift(&config.path)
        .arg("upgrade")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("found an update but could not download it"))
        .stderr(predicate::str::contains("checksum mismatch"));

    let staged = config
        .scratch_dir()
        .join(format!("uplift{}", std::env::consts::EXE_SUFFIX));
    assert!(!staged.exists(), "rejected download should be removed");
}
