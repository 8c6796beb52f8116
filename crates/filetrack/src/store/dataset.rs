//! YAML dataset of case files and officers.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::Policy;
use crate::error::ConfigError;
use crate::model::{CaseFile, Officer};

const SAMPLE_YAML: &str = include_str!("../../../../fixtures/sample.yaml");

/// Files, officers and the instant the data was captured at.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dataset {
    /// Default evaluation instant for sessions over this data.
    pub snapshot_at: DateTime<Utc>,
    #[serde(default)]
    pub files: Vec<CaseFile>,
    #[serde(default)]
    pub officers: Vec<Officer>,
}

impl Dataset {
    /// The dataset bundled with the crate, validated against `policy`.
    pub fn sample(policy: &Policy) -> Result<Self, ConfigError> {
        load_dataset_from_str(SAMPLE_YAML, Path::new("<embedded sample>"), policy)
    }
}

pub fn load_dataset<P: AsRef<Path>>(path: P, policy: &Policy) -> Result<Dataset, ConfigError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|e| ConfigError::ReadFile {
        path: path.to_path_buf(),
        source: e,
    })?;

    let dataset = load_dataset_from_str(&content, path, policy)?;
    log::info!(
        "Loaded dataset from {:?}: {} files, {} officers",
        path,
        dataset.files.len(),
        dataset.officers.len()
    );
    Ok(dataset)
}

/// Parses and validates a dataset. `origin` is only used in error messages.
pub fn load_dataset_from_str(
    content: &str,
    origin: &Path,
    policy: &Policy,
) -> Result<Dataset, ConfigError> {
    let dataset: Dataset = serde_yaml::from_str(content).map_err(|e| ConfigError::ParseYaml {
        path: origin.to_path_buf(),
        message: e.to_string(),
    })?;

    validate_dataset(&dataset, policy)?;
    Ok(dataset)
}

/// Rejects data the derivation rules cannot evaluate: duplicate ids, broken
/// timelines, and files whose department or workflow the policy lacks.
pub fn validate_dataset(dataset: &Dataset, policy: &Policy) -> Result<(), ConfigError> {
    let mut file_ids = HashSet::new();
    for file in &dataset.files {
        if !file_ids.insert(file.id.as_str()) {
            return Err(ConfigError::Validation {
                message: format!("Duplicate file id '{}'", file.id),
            });
        }

        file.validate_timeline()
            .map_err(|e| ConfigError::Validation {
                message: e.to_string(),
            })?;
        policy.department(file.department)?;
        policy.workflow_for(file)?;
    }

    let mut officer_ids = HashSet::new();
    for officer in &dataset.officers {
        officer.validate()?;
        if !officer_ids.insert(officer.id.as_str()) {
            return Err(ConfigError::Validation {
                message: format!("Duplicate officer id '{}'", officer.id),
            });
        }
    }

    Ok(())
}
