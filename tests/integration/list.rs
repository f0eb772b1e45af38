//! Tests for `switchy list`

use crate::common::{java_catalog, run, TestEnv};
use predicates::prelude::*;
use std::fs;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn catalog_server() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/sdkVersions.json"))
        .respond_with(ResponseTemplate::new(200).set_body_string(java_catalog(&server.uri(), "")))
        .mount(&server)
        .await;
    server
}

#[tokio::test(flavor = "multi_thread")]
async fn test_list_sdk_types() {
    let server = catalog_server().await;
    let env = TestEnv::new(&format!("{}/sdkVersions.json", server.uri()));

    let mut cmd = env.command();
    cmd.arg("list");
    run(cmd)
        .await
        .success()
        .stdout(predicate::str::contains("Available SDKs:"))
        .stdout(predicate::str::contains("java"))
        .stdout(predicate::str::contains("node"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_list_versions_marks_installed_and_active() {
    let server = catalog_server().await;
    let env = TestEnv::new(&format!("{}/sdkVersions.json", server.uri()));

    let java = env.root().join("sdks").join("java");
    fs::create_dir_all(java.join("17.0.2")).unwrap();
    fs::create_dir_all(java.join("21.0.6")).unwrap();
    fs::create_dir_all(java.join("default")).unwrap();
    fs::write(
        java.join(".active.yaml"),
        "version: 21.0.6\nactivated_at: 2026-01-01T00:00:00Z\n",
    )
    .unwrap();

    let mut cmd = env.command();
    cmd.args(["list", "java"]);
    run(cmd)
        .await
        .success()
        .stdout(predicate::str::contains("Versions for java:"))
        .stdout(predicate::str::contains("* 21.0.6 (default)"))
        .stdout(predicate::str::contains("✓ 17.0.2"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_list_versions_shows_download_links() {
    let server = catalog_server().await;
    let env = TestEnv::new(&format!("{}/sdkVersions.json", server.uri()));

    let mut cmd = env.command();
    cmd.args(["list", "java"]);
    run(cmd)
        .await
        .success()
        .stdout(predicate::str::contains(format!(
            "21.0.6 (default) ({}/jdk-21.0.6_bin.tar.gz)",
            server.uri()
        )))
        .stdout(predicate::str::contains(format!(
            "17.0.2 ({}/jdk-17.0.2_bin.tar.gz)",
            server.uri()
        )));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_list_unknown_type_reports_not_found() {
    let server = catalog_server().await;
    let env = TestEnv::new(&format!("{}/sdkVersions.json", server.uri()));

    let mut cmd = env.command();
    cmd.args(["list", "cobol"]);
    run(cmd)
        .await
        .success()
        .stderr(predicate::str::contains("Not found: SDK type 'cobol'"))
        .stderr(predicate::str::contains("help:"));
}
