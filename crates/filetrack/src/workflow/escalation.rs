use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::EscalationPolicy;

/// Escalation state of a file, ordered from least to most severe.
///
/// Derived from the days spent in the current stage on every read; nothing
/// about past escalations is stored, so a new stage drops the file back to
/// `Normal`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EscalationLevel {
    Normal,
    Warning,
    SupervisorNotified,
    AutoEscalated,
    ExecutiveReview,
}

impl EscalationLevel {
    /// Who is told about a file at this level.
    pub fn notifies(&self) -> &'static str {
        match self {
            EscalationLevel::Normal => "nobody",
            EscalationLevel::Warning => "officer",
            EscalationLevel::SupervisorNotified => "officer and supervisor",
            EscalationLevel::AutoEscalated => "department head",
            EscalationLevel::ExecutiveReview => "executive review board",
        }
    }

    pub fn is_alerting(&self) -> bool {
        *self >= EscalationLevel::Warning
    }
}

impl fmt::Display for EscalationLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EscalationLevel::Normal => write!(f, "Normal"),
            EscalationLevel::Warning => write!(f, "Warning"),
            EscalationLevel::SupervisorNotified => write!(f, "Supervisor notified"),
            EscalationLevel::AutoEscalated => write!(f, "Auto-escalated"),
            EscalationLevel::ExecutiveReview => write!(f, "Executive review"),
        }
    }
}

/// Flat, department-independent escalation ladder.
pub fn escalation_level(days_pending: u32, policy: &EscalationPolicy) -> EscalationLevel {
    if days_pending >= policy.executive_review_at {
        EscalationLevel::ExecutiveReview
    } else if days_pending >= policy.auto_escalate_at {
        EscalationLevel::AutoEscalated
    } else if days_pending >= policy.supervisor_at {
        EscalationLevel::SupervisorNotified
    } else if days_pending >= policy.warning_at {
        EscalationLevel::Warning
    } else {
        EscalationLevel::Normal
    }
}
