//! Integration tests for `plens config` commands.
//!
//! These tests verify that:
//! - `config show` reports values and their sources
//! - Precedence is CLI flag > environment > config.kdl > defaults
//! - `config set` writes config.kdl and validates values

mod common;

use common::{TestEnv, stdout_json};
use predicates::prelude::*;

#[test]
fn test_config_show_defaults() {
    let env = TestEnv::new();

    let output = env.plens().args(["config", "show"]).output().unwrap();
    assert!(output.status.success());
    let json = stdout_json(&output);

    let config = &json["config"];
    assert_eq!(config["base_radius"]["value"], 200.0);
    assert_eq!(config["base_radius"]["source"], "default");
    assert_eq!(config["min_spacing"]["value"], 120.0);
    assert_eq!(config["cluster_problem_cap"]["value"], 12);
    assert_eq!(config["include_orphaned"]["value"], true);
    assert_eq!(config["output_format"]["value"], "json");
    assert!(config.get("api_url").is_none());
    assert!(json["path"].as_str().unwrap().ends_with("config.kdl"));
}

#[test]
fn test_config_show_reads_file() {
    let env = TestEnv::new();
    env.write_config(
        r#"
api-url "http://pipeline.internal:3000"
cluster-problem-cap 20
"#,
    );

    let output = env.plens().args(["config", "show"]).output().unwrap();
    let config = &stdout_json(&output)["config"];
    assert_eq!(config["api_url"]["value"], "http://pipeline.internal:3000");
    assert_eq!(config["api_url"]["source"], "config");
    assert_eq!(config["cluster_problem_cap"]["value"], 20);
}

#[test]
fn test_config_api_url_precedence() {
    let env = TestEnv::new();
    env.write_config("api-url \"http://from-file\"\n");

    let output = env
        .plens()
        .env("PLENS_API_URL", "http://from-env")
        .args(["config", "show"])
        .output()
        .unwrap();
    let config = &stdout_json(&output)["config"];
    assert_eq!(config["api_url"]["value"], "http://from-env");
    assert_eq!(config["api_url"]["source"], "env:PLENS_API_URL");

    let output = env
        .plens()
        .env("PLENS_API_URL", "http://from-env")
        .args(["--api", "http://from-flag", "config", "show"])
        .output()
        .unwrap();
    let config = &stdout_json(&output)["config"];
    assert_eq!(config["api_url"]["value"], "http://from-flag");
    assert_eq!(config["api_url"]["source"], "cli");
}

#[test]
fn test_config_output_format_human_from_file() {
    let env = TestEnv::new();
    env.write_config("output-format \"human\"\n");

    env.plens()
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("output-format: human (config)"));
}

#[test]
fn test_config_set_then_show() {
    let env = TestEnv::new();

    env.plens()
        .args(["config", "set", "base-radius", "260"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"key\":\"base-radius\""));

    env.plens()
        .args(["config", "set", "include-orphaned", "false"])
        .assert()
        .success();

    let output = env.plens().args(["config", "show"]).output().unwrap();
    let config = &stdout_json(&output)["config"];
    assert_eq!(config["base_radius"]["value"], 260.0);
    assert_eq!(config["base_radius"]["source"], "config");
    assert_eq!(config["include_orphaned"]["value"], false);
}

#[test]
fn test_config_set_rejects_invalid_value() {
    let env = TestEnv::new();

    env.plens()
        .args(["config", "set", "cluster-problem-cap", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cluster-problem-cap must be at least 1"));

    env.plens()
        .args(["config", "set", "editor", "vim"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown config key"));
}

#[test]
fn test_config_invalid_file_values_are_ignored() {
    let env = TestEnv::new();
    env.write_config("base-radius -10.0\nmin-spacing 80.0\n");

    let output = env.plens().args(["config", "show"]).output().unwrap();
    let config = &stdout_json(&output)["config"];
    assert_eq!(config["base_radius"]["source"], "default");
    assert_eq!(config["min_spacing"]["value"], 80.0);
}

#[test]
fn test_config_unparsable_file_fails() {
    let env = TestEnv::new();
    env.write_config("base-radius {{{\n");

    env.plens()
        .args(["config", "show"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Config parse error"));
}

#[test]
fn test_config_path() {
    let env = TestEnv::new();

    let output = env.plens().args(["config", "path"]).output().unwrap();
    let json = stdout_json(&output);
    assert_eq!(json["exists"], false);
    assert_eq!(
        json["path"].as_str().unwrap(),
        env.config_path().join("config.kdl").to_str().unwrap()
    );
}
