use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::model::file::Department;

static RE_OFFICER_ID: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^OFF-\d{3,}$").unwrap());

/// An officer and the workload figures reported for them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Officer {
    pub id: String,
    pub name: String,
    pub department: Department,
    /// Number of files currently assigned.
    pub active_files: u32,
    /// Average days taken per handled stage.
    pub avg_handling_days: f64,
    #[serde(default)]
    pub completed_this_month: u32,
}

impl Officer {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !RE_OFFICER_ID.is_match(&self.id) {
            return Err(ConfigError::Validation {
                message: format!("Invalid officer id '{}': expected OFF-<seq>", self.id),
            });
        }
        if self.name.trim().is_empty() {
            return Err(ConfigError::Validation {
                message: format!("Officer {} has an empty name", self.id),
            });
        }
        if !self.avg_handling_days.is_finite() || self.avg_handling_days < 0.0 {
            return Err(ConfigError::Validation {
                message: format!(
                    "Officer {} has an invalid average handling time: {}",
                    self.id, self.avg_handling_days
                ),
            });
        }
        Ok(())
    }
}
