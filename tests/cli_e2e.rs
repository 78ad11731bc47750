//! End-to-end CLI tests for the portal-fetch binary.

// `Command::cargo_bin` is deprecated in assert_cmd >=2.0.17 in favor of
// `cargo::cargo_bin_cmd!` macro. Suppressed until migration to the new API.
#![allow(deprecated)]

mod support;
use support::socket_guard::start_mock_server_or_skip;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, ResponseTemplate};

#[test]
fn test_binary_help_displays_usage() {
    let mut cmd = Command::cargo_bin("portal-fetch").unwrap();
    cmd.arg("--help");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("portal-fetch"))
        .stdout(predicate::str::contains("--headless"));
}

#[test]
fn test_binary_version_displays_version() {
    let mut cmd = Command::cargo_bin("portal-fetch").unwrap();
    cmd.arg("--version");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_binary_missing_batch_code_fails() {
    let mut cmd = Command::cargo_bin("portal-fetch").unwrap();
    cmd.assert().failure();
}

#[test]
fn test_binary_headless_without_credentials_exits_nonzero() {
    let tempdir = TempDir::new().unwrap();

    let mut cmd = Command::cargo_bin("portal-fetch").unwrap();
    cmd.current_dir(tempdir.path())
        .arg("202510")
        .arg("--headless")
        .arg("-q");

    // No cached credentials and no interactive channel: authentication
    // cannot be established, which is the one condition that fails the run.
    cmd.assert().failure();
}

#[tokio::test]
async fn test_binary_headless_run_downloads_batch_with_cached_cookies() {
    let Some(mock_server) = start_mock_server_or_skip().await else {
        return;
    };

    Mock::given(method("GET"))
        .and(path("/upload/202510/list_files.php"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"{ "files": [
                { "meta": { "original_name": "agenda.pdf", "group": "Plenary" }, "size": 6 }
            ] }"#,
        ))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/upload/202510/getfile.php"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"agenda"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let tempdir = TempDir::new().unwrap();
    let cookie_file = tempdir.path().join("cookies.json");
    std::fs::write(
        &cookie_file,
        r#"{ "cookies": [ { "name": "session", "value": "tok", "domain": "127.0.0.1", "path": "/" } ],
            "user_agent": "TestAgent/1.0" }"#,
    )
    .unwrap();

    let mut cmd = Command::cargo_bin("portal-fetch").unwrap();
    cmd.current_dir(tempdir.path())
        .arg("202510")
        .arg("--headless")
        .arg("--no-progress")
        .arg("--portal-root")
        .arg(mock_server.uri())
        .arg("--entry-url")
        .arg(mock_server.uri())
        .arg("--cookie-file")
        .arg(&cookie_file)
        .arg("--base-dir")
        .arg(tempdir.path().join("downloads"));

    cmd.assert().success();

    let downloaded = tempdir.path().join("downloads/Plenary/agenda.pdf");
    assert_eq!(std::fs::read(&downloaded).unwrap(), b"agenda");
}

#[tokio::test]
async fn test_binary_exits_zero_despite_per_file_failures() {
    let Some(mock_server) = start_mock_server_or_skip().await else {
        return;
    };

    Mock::given(method("GET"))
        .and(path("/upload/202510/list_files.php"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"{ "files": [ { "meta": { "original_name": "broken.pdf" } } ] }"#,
        ))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/upload/202510/getfile.php"))
        .respond_with(ResponseTemplate::new(500))
        .expect(3)
        .mount(&mock_server)
        .await;

    let tempdir = TempDir::new().unwrap();
    let cookie_file = tempdir.path().join("cookies.json");
    std::fs::write(
        &cookie_file,
        r#"{ "cookies": [ { "name": "session", "value": "tok", "domain": "127.0.0.1", "path": "/" } ],
            "user_agent": "TestAgent/1.0" }"#,
    )
    .unwrap();

    let mut cmd = Command::cargo_bin("portal-fetch").unwrap();
    cmd.current_dir(tempdir.path())
        .timeout(std::time::Duration::from_secs(60))
        .arg("202510")
        .arg("--headless")
        .arg("--no-progress")
        .arg("--portal-root")
        .arg(mock_server.uri())
        .arg("--entry-url")
        .arg(mock_server.uri())
        .arg("--cookie-file")
        .arg(&cookie_file);

    // Partial (or even total) per-file failure is reported in the summary,
    // not via the exit code.
    cmd.assert().success();
}
