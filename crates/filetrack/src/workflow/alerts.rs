//! Alert feed derived from escalation levels.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::Policy;
use crate::error::ConfigError;
use crate::model::{CaseFile, Department, Priority};
use crate::workflow::escalation::{escalation_level, EscalationLevel};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AlertType {
    Critical,
    SlaBreach,
    Warning,
    Escalation,
}

impl fmt::Display for AlertType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AlertType::Critical => write!(f, "critical"),
            AlertType::SlaBreach => write!(f, "sla-breach"),
            AlertType::Warning => write!(f, "warning"),
            AlertType::Escalation => write!(f, "escalation"),
        }
    }
}

/// Maps an escalation level to the alert it raises, if any.
///
/// Legal files are treated as critical as soon as they are auto-escalated,
/// and every file under executive review is critical.
pub fn alert_type(level: EscalationLevel, department: Department) -> Option<AlertType> {
    match level {
        EscalationLevel::Normal => None,
        EscalationLevel::Warning => Some(AlertType::Warning),
        EscalationLevel::SupervisorNotified => Some(AlertType::SlaBreach),
        EscalationLevel::AutoEscalated if department == Department::Legal => {
            Some(AlertType::Critical)
        }
        EscalationLevel::AutoEscalated => Some(AlertType::Escalation),
        EscalationLevel::ExecutiveReview => Some(AlertType::Critical),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Alert {
    pub id: String,
    #[serde(rename = "type")]
    pub alert_type: AlertType,
    pub escalation: EscalationLevel,
    pub file_id: String,
    pub subject: String,
    pub department: Department,
    pub officer: String,
    pub days_pending: u32,
    /// Inherited from the file, independent of escalation severity.
    pub priority: Priority,
    pub message: String,
    /// Relative time since the current stage began, e.g. "2 hours ago".
    pub timestamp: String,
    pub updated_at: DateTime<Utc>,
}

/// Alert counts per type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertSummary {
    pub total: usize,
    pub critical: usize,
    pub sla_breach: usize,
    pub warning: usize,
    pub escalation: usize,
}

impl AlertSummary {
    pub fn from_alerts(alerts: &[Alert]) -> Self {
        let mut summary = AlertSummary {
            total: alerts.len(),
            ..Default::default()
        };
        for alert in alerts {
            match alert.alert_type {
                AlertType::Critical => summary.critical += 1,
                AlertType::SlaBreach => summary.sla_breach += 1,
                AlertType::Warning => summary.warning += 1,
                AlertType::Escalation => summary.escalation += 1,
            }
        }
        summary
    }
}

/// Builds the alert feed: one alert per open file at `Warning` or above,
/// newest stage first, ties broken by days pending and then file id.
pub fn generate_alerts<'a, I>(
    files: I,
    policy: &Policy,
    as_of: DateTime<Utc>,
) -> Result<Vec<Alert>, ConfigError>
where
    I: IntoIterator<Item = &'a CaseFile>,
{
    let _span = tracing::debug_span!("workflow.alerts").entered();
    let mut alerts = Vec::new();

    for file in files {
        let (Some(stage), Some(updated_at)) = (file.current_stage(), file.last_updated()) else {
            continue;
        };

        let days_pending = file.days_pending(as_of);
        let level = escalation_level(days_pending, &policy.escalation);
        let Some(kind) = alert_type(level, file.department) else {
            continue;
        };
        let sla_days = policy.department(file.department)?.sla_days;

        alerts.push(Alert {
            id: String::new(),
            alert_type: kind,
            escalation: level,
            file_id: file.id.to_string(),
            subject: file.subject.clone(),
            department: file.department,
            officer: stage.officer.clone(),
            days_pending,
            priority: file.priority,
            message: alert_message(kind, level, days_pending, sla_days),
            timestamp: format_relative(updated_at, as_of),
            updated_at,
        });
    }

    alerts.sort_by(|a, b| {
        b.updated_at
            .cmp(&a.updated_at)
            .then_with(|| b.days_pending.cmp(&a.days_pending))
            .then_with(|| a.file_id.cmp(&b.file_id))
    });
    for (index, alert) in alerts.iter_mut().enumerate() {
        alert.id = format!("ALT-{:03}", index + 1);
    }

    log::debug!("Generated {} alerts", alerts.len());
    Ok(alerts)
}

fn alert_message(
    alert_type: AlertType,
    level: EscalationLevel,
    days_pending: u32,
    sla_days: u32,
) -> String {
    match (alert_type, level) {
        (_, EscalationLevel::ExecutiveReview) => format!(
            "File pending for {} days. Executive review required.",
            days_pending
        ),
        (AlertType::Critical, _) => format!(
            "File pending for {} days. Critical delay affecting citizen services.",
            days_pending
        ),
        (AlertType::SlaBreach, _) => format!(
            "SLA breach imminent. Standard processing time is {} days.",
            sla_days
        ),
        (AlertType::Escalation, _) => "Auto-escalated to department head for review.".to_string(),
        (AlertType::Warning, _) if days_pending + 2 >= sla_days => {
            "Approaching SLA deadline. Requires immediate attention.".to_string()
        }
        (AlertType::Warning, _) => {
            format!("File pending for {} days. Monitor closely.", days_pending)
        }
    }
}

/// Renders the time between `then` and `now` as "N hours ago" style text.
pub fn format_relative(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let elapsed = now - then;
    let minutes = elapsed.num_minutes();
    if minutes < 1 {
        return "just now".to_string();
    }
    if minutes < 60 {
        return plural(minutes, "minute");
    }
    let hours = elapsed.num_hours();
    if hours < 24 {
        return plural(hours, "hour");
    }
    plural(elapsed.num_days(), "day")
}

fn plural(count: i64, unit: &str) -> String {
    if count == 1 {
        format!("1 {} ago", unit)
    } else {
        format!("{} {}s ago", count, unit)
    }
}
