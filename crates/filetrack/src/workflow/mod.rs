//! Derivation rules: everything here is a pure function of a file's stage
//! history, the policy table and the evaluation instant.

pub mod alerts;
pub mod efficiency;
pub mod escalation;
pub mod progress;
pub mod status;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::Policy;
use crate::error::ConfigError;
use crate::model::CaseFile;

pub use alerts::{format_relative, generate_alerts, Alert, AlertSummary, AlertType};
pub use efficiency::{
    efficiency_band, needs_redistribution, workload_bucket, EfficiencyBand, EfficiencyInputs,
    EfficiencyScorer, WeightedScorer, WorkloadBucket,
};
pub use escalation::{escalation_level, EscalationLevel};
pub use progress::progress_percent;
pub use status::{derive_status, FileStatus, StatusFilter};

/// Derived state of one file at an evaluation instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileAssessment {
    pub days_pending: u32,
    pub status: FileStatus,
    pub escalation: EscalationLevel,
    pub progress: u8,
}

/// Runs every per-file rule once.
///
/// Closed files are reported as on time, not escalated and complete.
pub fn assess(
    file: &CaseFile,
    policy: &Policy,
    as_of: DateTime<Utc>,
) -> Result<FileAssessment, ConfigError> {
    let progress = progress_percent(file, policy)?;
    if file.is_closed() {
        // Department must still be known.
        policy.department(file.department)?;
        return Ok(FileAssessment {
            days_pending: 0,
            status: FileStatus::OnTime,
            escalation: EscalationLevel::Normal,
            progress,
        });
    }

    let days_pending = file.days_pending(as_of);
    Ok(FileAssessment {
        days_pending,
        status: derive_status(days_pending, file.department, policy)?,
        escalation: escalation_level(days_pending, &policy.escalation),
        progress,
    })
}
