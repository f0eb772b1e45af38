//! Common utilities for integration tests

use assert_cmd::assert::{Assert, OutputAssertExt};
use assert_cmd::Command;
use sha2::{Digest, Sha256};
use std::fs;
use std::io::Write;
use std::path::PathBuf;
use tempfile::TempDir;

/// Isolated home, config directory and SDK root for one CLI run.
pub struct TestEnv {
    temp: TempDir,
}

impl TestEnv {
    /// Environment whose config points the catalog at `catalog_url`
    pub fn new(catalog_url: &str) -> Self {
        let env = Self::bare();
        let config = format!(
            "sdk_root: {}\ncatalog_url: {}\nrequest_timeout_secs: 10\n",
            env.root().display(),
            catalog_url
        );
        env.write_config(&config);
        env
    }

    /// Environment without a config file
    pub fn bare() -> Self {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join("home")).unwrap();
        Self { temp }
    }

    pub fn root(&self) -> PathBuf {
        self.temp.path().join("root")
    }

    /// Write config.yaml wherever `dirs::config_dir` looks on this platform
    pub fn write_config(&self, content: &str) {
        for dir in self.config_dirs() {
            fs::create_dir_all(&dir).unwrap();
            fs::write(dir.join("config.yaml"), content).unwrap();
        }
    }

    fn config_dirs(&self) -> Vec<PathBuf> {
        vec![
            self.temp.path().join("xdg").join("switchy"),
            self.temp
                .path()
                .join("home")
                .join("Library")
                .join("Application Support")
                .join("switchy"),
        ]
    }

    pub fn command(&self) -> Command {
        let mut cmd = Command::cargo_bin("switchy").unwrap();
        cmd.env("HOME", self.temp.path().join("home"))
            .env("XDG_CONFIG_HOME", self.temp.path().join("xdg"))
            .env("APPDATA", self.temp.path().join("xdg"))
            .env_remove("SWITCHY_HOME")
            .env_remove("RUST_LOG");
        cmd
    }
}

/// Run a prepared command off the async runtime so the mock server keeps serving.
pub async fn run(mut cmd: Command) -> Assert {
    let output = tokio::task::spawn_blocking(move || cmd.output())
        .await
        .unwrap()
        .unwrap();
    output.assert()
}

/// A gzip'd tarball laid out like a JDK download: one wrapper directory.
pub fn jdk_tarball(version: &str) -> Vec<u8> {
    let mut builder = tar::Builder::new(Vec::new());
    let java = format!("#!/bin/sh\necho {}\n", version);
    for (name, data) in [
        (format!("jdk-{}/bin/java", version), java.as_bytes()),
        (format!("jdk-{}/release", version), version.as_bytes()),
    ] {
        let mut header = tar::Header::new_gnu();
        header.set_size(data.len() as u64);
        header.set_mode(0o755);
        header.set_cksum();
        builder.append_data(&mut header, &name, data).unwrap();
    }
    let tar = builder.into_inner().unwrap();

    let mut gz = flate2::write::GzEncoder::new(Vec::new(), flate2::Compression::default());
    gz.write_all(&tar).unwrap();
    gz.finish().unwrap()
}

pub fn sha256_hex(data: &[u8]) -> String {
    hex::encode(Sha256::digest(data))
}

/// Catalog with one java version served from `base_url`
pub fn java_catalog(base_url: &str, sha256: &str) -> String {
    format!(
        r#"{{"sdks":[
            {{"name":"java","defaultVersion":"21.0.6","versions":[
                {{"version":"21.0.6","link":"{base}/jdk-21.0.6_bin.tar.gz","sha256":"{sha}"}},
                {{"version":"17.0.2","link":"{base}/jdk-17.0.2_bin.tar.gz","sha256":""}}
            ]}},
            {{"name":"node","versions":[
                {{"version":"20.11.0","link":"{base}/node-v20.11.0.tar.xz"}}
            ]}}
        ]}}"#,
        base = base_url,
        sha = sha256
    )
}
