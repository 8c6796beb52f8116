//! Test harness for loading policy and dataset files from disk.

#![allow(dead_code)]

use std::path::{Path, PathBuf};

use tempfile::TempDir;

use filetrack::config::load_policy;
use filetrack::store::{load_dataset, Dataset};
use filetrack::{Policy, Result, Tracker};

/// Isolated directory holding `policy.json` and `data.yaml`.
pub struct TestHarness {
    temp_dir: TempDir,
    pub policy_path: PathBuf,
    pub data_path: PathBuf,
}

impl TestHarness {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let policy_path = temp_dir.path().join("policy.json");
        let data_path = temp_dir.path().join("data.yaml");
        Self {
            temp_dir,
            policy_path,
            data_path,
        }
    }

    pub fn temp_path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Write the policy file. Serializes the given policy as pretty JSON.
    pub fn write_policy(&self, policy: &Policy) -> &Path {
        let json = serde_json::to_string_pretty(policy).expect("Failed to serialize policy");
        std::fs::write(&self.policy_path, json).expect("Failed to write policy file");
        &self.policy_path
    }

    pub fn write_policy_json(&self, json: &str) -> &Path {
        std::fs::write(&self.policy_path, json).expect("Failed to write policy file");
        &self.policy_path
    }

    pub fn write_dataset_yaml(&self, yaml: &str) -> &Path {
        std::fs::write(&self.data_path, yaml).expect("Failed to write dataset file");
        &self.data_path
    }

    /// Load both files the way the CLI does.
    pub fn load(&self) -> Result<(Policy, Dataset)> {
        let policy = load_policy(&self.policy_path)?;
        let dataset = load_dataset(&self.data_path, &policy)?;
        Ok((policy, dataset))
    }

    pub fn tracker(&self) -> Result<Tracker> {
        let (policy, dataset) = self.load()?;
        Ok(Tracker::from_dataset(policy, dataset))
    }
}
