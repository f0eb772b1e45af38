//! Tests for `switchy version`

use crate::common::TestEnv;
use predicates::prelude::*;

#[test]
fn test_version_command() {
    let env = TestEnv::bare();
    env.command()
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains(format!(
            "switchy {}",
            env!("CARGO_PKG_VERSION")
        )));
}

#[test]
fn test_version_does_not_need_config() {
    let env = TestEnv::bare();
    env.write_config("request_timeout_secs: [broken");
    env.command().arg("version").assert().success();
}
