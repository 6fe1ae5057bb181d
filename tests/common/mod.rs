//! Common test utilities for pipelens integration tests.
//!
//! Provides `TestEnv` for isolated test environments that don't read the
//! user's `~/.config/pipelens/` directory or environment.

#![allow(dead_code)]

use assert_cmd::Command;
use std::path::{Path, PathBuf};
pub use tempfile::TempDir;

/// Snapshot with the pipeline scenario used across CLI tests:
///
/// - Cluster C1 "Billing" with problem 1
/// - Problem 2 unclustered but linked by solution S
/// - Problem 3 orphaned (cluster deleted), problem 4 unclustered, neither linked
/// - Solution S from C1 addressing `{1,2}`, project P executing S
pub const PIPELINE_SNAPSHOT: &str = r#"{
  "problems": [
    {"id": 1, "title": "Late invoice payments", "impact": "high", "clusterId": "C1", "clusterLabel": "Billing"},
    {"id": 2, "title": "Manual payment reminders", "impact": "medium"},
    {"id": 3, "title": "Duplicate vendor records", "clusterId": "C9", "clusterLabel": "Vendor data"},
    {"id": 4, "title": "Slow onboarding"}
  ],
  "clusters": [
    {"id": "C1", "label": "Billing", "problemCount": 1, "solutionCount": 1}
  ],
  "solutions": {"data": [
    {"id": "S", "title": "Automated dunning", "status": "approved", "overallViability": 82, "sourceClusterId": "C1", "problemIds": "{1,2}"}
  ]},
  "projects": [
    {"id": "P", "name": "Dunning rollout", "solutionId": "S", "linearProjectId": "LIN-7"}
  ]
}"#;

/// A test environment with isolated config and data directories.
///
/// The `plens()` method returns a `Command` that sets `PLENS_CONFIG_DIR`
/// per-invocation and clears the source variables, making tests
/// parallel-safe.
pub struct TestEnv {
    pub config_dir: TempDir,
    pub data_dir: TempDir,
}

impl TestEnv {
    pub fn new() -> Self {
        Self {
            config_dir: TempDir::new().unwrap(),
            data_dir: TempDir::new().unwrap(),
        }
    }

    /// Create a test environment with the pipeline snapshot written.
    pub fn with_pipeline() -> Self {
        let env = Self::new();
        env.write_snapshot("pipeline.json", PIPELINE_SNAPSHOT);
        env
    }

    /// Get a Command for the plens binary with isolated configuration.
    pub fn plens(&self) -> Command {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_plens"));
        cmd.env("PLENS_CONFIG_DIR", self.config_dir.path());
        cmd.env_remove("PLENS_DATA");
        cmd.env_remove("PLENS_API_URL");
        cmd.env_remove("PLENS_LOG");
        cmd
    }

    /// Command preloaded with `--data` pointing at the pipeline snapshot.
    pub fn plens_with_data(&self) -> Command {
        let mut cmd = self.plens();
        cmd.arg("--data").arg(self.snapshot_path("pipeline.json"));
        cmd
    }

    /// Write a snapshot file into the data directory.
    pub fn write_snapshot(&self, name: &str, json: &str) -> PathBuf {
        let path = self.snapshot_path(name);
        std::fs::write(&path, json).unwrap();
        path
    }

    pub fn snapshot_path(&self, name: &str) -> PathBuf {
        self.data_dir.path().join(name)
    }

    /// Write config.kdl into the isolated config directory.
    pub fn write_config(&self, kdl: &str) {
        std::fs::write(self.config_dir.path().join("config.kdl"), kdl).unwrap();
    }

    pub fn config_path(&self) -> &Path {
        self.config_dir.path()
    }
}

impl Default for TestEnv {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse command stdout as JSON.
pub fn stdout_json(output: &std::process::Output) -> serde_json::Value {
    serde_json::from_slice(&output.stdout).unwrap()
}
