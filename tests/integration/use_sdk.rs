//! Tests for `switchy use`

use crate::common::{java_catalog, jdk_tarball, run, sha256_hex, TestEnv};
use predicates::prelude::*;
use std::fs;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn serve(server: &MockServer, catalog: String, tarball: Vec<u8>, downloads: u64) {
    Mock::given(method("GET"))
        .and(path("/sdkVersions.json"))
        .respond_with(ResponseTemplate::new(200).set_body_string(catalog))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/jdk-21.0.6_bin.tar.gz"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(tarball))
        .expect(downloads)
        .mount(server)
        .await;
}

#[tokio::test(flavor = "multi_thread")]
async fn test_use_installs_and_activates() {
    let server = MockServer::start().await;
    let tarball = jdk_tarball("21.0.6");
    let catalog = java_catalog(&server.uri(), &sha256_hex(&tarball));
    serve(&server, catalog, tarball, 1).await;
    let env = TestEnv::new(&format!("{}/sdkVersions.json", server.uri()));

    let mut cmd = env.command();
    cmd.args(["use", "java", "21.0.6"]);
    run(cmd)
        .await
        .success()
        .stdout(predicate::str::contains("Now using java 21.0.6"));

    let root = env.root();
    assert!(root.join("cache").join("java-21.0.6.tar.gz").is_file());
    assert!(root.join("sdks/java/21.0.6/bin/java").is_file());
    assert_eq!(
        fs::read_to_string(root.join("sdks/java/default/release")).unwrap(),
        "21.0.6"
    );

    // second use is served from the extracted directory; the mock expects one download
    let mut cmd = env.command();
    cmd.args(["use", "java", "21.0.6"]);
    run(cmd)
        .await
        .success()
        .stdout(predicate::str::contains("Installed").not());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_use_with_corrupted_digest() {
    let server = MockServer::start().await;
    let catalog = java_catalog(&server.uri(), &sha256_hex(b"something else entirely"));
    serve(&server, catalog, jdk_tarball("21.0.6"), 1).await;
    let env = TestEnv::new(&format!("{}/sdkVersions.json", server.uri()));

    let mut cmd = env.command();
    cmd.args(["use", "java", "21.0.6"]);
    run(cmd)
        .await
        .success()
        .stderr(predicate::str::contains("Checksum mismatch"));

    let root = env.root();
    assert!(!root.join("cache").join("java-21.0.6.tar.gz").exists());
    assert!(!root.join("sdks/java/default").exists());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_use_unknown_version() {
    let server = MockServer::start().await;
    serve(&server, java_catalog(&server.uri(), ""), Vec::new(), 0).await;
    let env = TestEnv::new(&format!("{}/sdkVersions.json", server.uri()));

    let mut cmd = env.command();
    cmd.args(["use", "java", "99"]);
    run(cmd)
        .await
        .success()
        .stderr(predicate::str::contains("Version '99'"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_use_switches_between_installed_versions() {
    let server = MockServer::start().await;
    let env = TestEnv::new(&format!("{}/sdkVersions.json", server.uri()));
    let java = env.root().join("sdks").join("java");
    for version in ["17.0.2", "21.0.6"] {
        fs::create_dir_all(java.join(version).join("bin")).unwrap();
        fs::write(java.join(version).join("bin").join("java"), version).unwrap();
    }

    for version in ["17.0.2", "21.0.6"] {
        let mut cmd = env.command();
        cmd.args(["use", "java", version]);
        run(cmd).await.success();
    }

    assert_eq!(
        fs::read_to_string(java.join("default").join("bin").join("java")).unwrap(),
        "21.0.6"
    );
}
