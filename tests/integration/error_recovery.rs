//! Tests for error reporting and exit codes

use crate::common::{run, TestEnv};
use predicates::prelude::*;
use wiremock::matchers::method;
use wiremock::{Mock, MockServer, ResponseTemplate};

#[test]
fn test_invalid_config_is_setup_failure() {
    let env = TestEnv::bare();
    env.write_config("request_timeout_secs: [broken");

    env.command()
        .arg("list")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to parse config"));
}

#[test]
fn test_missing_subcommand_is_usage_error() {
    let env = TestEnv::bare();
    env.command().assert().failure();
}

#[tokio::test(flavor = "multi_thread")]
async fn test_catalog_server_error_exits_cleanly() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;
    let env = TestEnv::new(&format!("{}/sdkVersions.json", server.uri()));

    let mut cmd = env.command();
    cmd.arg("list");
    run(cmd)
        .await
        .success()
        .stderr(predicate::str::contains("Network error"))
        .stderr(predicate::str::contains("help:"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_malformed_catalog_exits_cleanly() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&server)
        .await;
    let env = TestEnv::new(&format!("{}/sdkVersions.json", server.uri()));

    let mut cmd = env.command();
    cmd.args(["use", "java", "21.0.6"]);
    run(cmd)
        .await
        .success()
        .stderr(predicate::str::contains("Parse error"));
    assert!(!env.root().join("sdks").exists());
}
