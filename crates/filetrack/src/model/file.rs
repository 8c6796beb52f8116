//! Case files and their stage timelines.
//!
//! A file's history is an ordered list of [`StageEvent`]s. At most one event
//! is `current` (the stage the file is sitting in), everything before it is
//! `completed` and everything after it is a `pending` placeholder for a stage
//! that has not started yet. A file with no `current` event is closed.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, WorkflowError};

static RE_FILE_ID: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^FN-\d{4}-\d{3,}$").unwrap());

/// Fixed set of departments a file or stage can belong to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Department {
    Reception,
    Revenue,
    Planning,
    Welfare,
    Legal,
    Admin,
}

impl Department {
    pub const ALL: [Department; 6] = [
        Department::Reception,
        Department::Revenue,
        Department::Planning,
        Department::Welfare,
        Department::Legal,
        Department::Admin,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Department::Reception => "Reception",
            Department::Revenue => "Revenue",
            Department::Planning => "Planning",
            Department::Welfare => "Welfare",
            Department::Legal => "Legal",
            Department::Admin => "Admin",
        }
    }

    /// Long form used on citizen-facing pages, e.g. "Revenue Department".
    pub fn long_name(&self) -> String {
        format!("{} Department", self.as_str())
    }
}

impl fmt::Display for Department {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Department {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let name = trimmed
            .strip_suffix(" Department")
            .or_else(|| trimmed.strip_suffix(" department"))
            .unwrap_or(trimmed);

        Department::ALL
            .iter()
            .copied()
            .find(|d| d.as_str().eq_ignore_ascii_case(name))
            .ok_or_else(|| ConfigError::UnknownDepartment(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Priority::High => write!(f, "High"),
            Priority::Medium => write!(f, "Medium"),
            Priority::Low => write!(f, "Low"),
        }
    }
}

/// Status tag of a single stage event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StageStatus {
    Completed,
    Current,
    Pending,
}

/// File identifier of the form `FN-<year>-<seq>`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct FileId(String);

impl FileId {
    /// Validates and wraps an identifier. Input is trimmed and upper-cased first.
    pub fn parse(raw: &str) -> Result<Self, ConfigError> {
        let normalized = Self::normalize(raw);
        if !RE_FILE_ID.is_match(&normalized) {
            return Err(ConfigError::Validation {
                message: format!("Invalid file id '{}': expected FN-<year>-<seq>", raw),
            });
        }
        Ok(Self(normalized))
    }

    /// Canonical lookup form of a user-supplied id.
    pub fn normalize(raw: &str) -> String {
        raw.trim().to_uppercase()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for FileId {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        FileId::parse(&value)
    }
}

impl From<FileId> for String {
    fn from(id: FileId) -> Self {
        id.0
    }
}

/// Who handles a stage and what they do in it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageAssignment {
    pub officer: String,
    pub department: Department,
    pub action: String,
}

impl StageAssignment {
    pub fn new(officer: &str, department: Department, action: &str) -> Self {
        Self {
            officer: officer.to_string(),
            department,
            action: action.to_string(),
        }
    }
}

/// One step in a file's processing history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StageEvent {
    pub officer: String,
    pub department: Department,
    pub action: String,
    /// When the stage started. Absent for pending placeholders.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub started_at: Option<DateTime<Utc>>,
    /// Days spent in the stage once it completed.
    #[serde(default)]
    pub duration_days: f64,
    pub status: StageStatus,
}

impl StageEvent {
    pub fn pending(assignment: StageAssignment) -> Self {
        Self {
            officer: assignment.officer,
            department: assignment.department,
            action: assignment.action,
            started_at: None,
            duration_days: 0.0,
            status: StageStatus::Pending,
        }
    }

    fn current(assignment: StageAssignment, at: DateTime<Utc>) -> Self {
        Self {
            officer: assignment.officer,
            department: assignment.department,
            action: assignment.action,
            started_at: Some(at),
            duration_days: 0.0,
            status: StageStatus::Current,
        }
    }
}

/// A case file tracked through departmental approval stages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaseFile {
    pub id: FileId,
    pub subject: String,
    pub department: Department,
    pub priority: Priority,
    pub submitted_at: DateTime<Utc>,
    /// Workflow template name; falls back to the department default.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workflow: Option<String>,
    pub events: Vec<StageEvent>,
}

impl CaseFile {
    /// Creates a file from its reception stage, which becomes the current stage.
    pub fn open(
        id: FileId,
        subject: &str,
        department: Department,
        priority: Priority,
        reception: StageAssignment,
        at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            subject: subject.to_string(),
            department,
            priority,
            submitted_at: at,
            workflow: None,
            events: vec![StageEvent::current(reception, at)],
        }
    }

    /// Sets the workflow template name.
    pub fn with_workflow(mut self, workflow: &str) -> Self {
        self.workflow = Some(workflow.to_string());
        self
    }

    /// Adds a placeholder for a stage that has not started yet.
    pub fn plan_stage(&mut self, assignment: StageAssignment) -> Result<(), WorkflowError> {
        if self.is_closed() {
            return Err(self.transition_error("file is closed"));
        }
        self.events.push(StageEvent::pending(assignment));
        Ok(())
    }

    pub fn current_index(&self) -> Option<usize> {
        self.events
            .iter()
            .position(|e| e.status == StageStatus::Current)
    }

    pub fn current_stage(&self) -> Option<&StageEvent> {
        self.current_index().map(|i| &self.events[i])
    }

    pub fn completed_count(&self) -> usize {
        self.events
            .iter()
            .filter(|e| e.status == StageStatus::Completed)
            .count()
    }

    /// A file is closed once it has history and nothing is current or pending.
    pub fn is_closed(&self) -> bool {
        !self.events.is_empty()
            && self
                .events
                .iter()
                .all(|e| e.status == StageStatus::Completed)
    }

    /// Officer holding the file, or the last one who handled it when closed.
    pub fn current_officer(&self) -> Option<&str> {
        match self.current_stage() {
            Some(stage) => Some(stage.officer.as_str()),
            None => self
                .events
                .iter()
                .rev()
                .find(|e| e.status == StageStatus::Completed)
                .map(|e| e.officer.as_str()),
        }
    }

    /// Total days from submission to closing; `None` while the file is open.
    pub fn disposal_days(&self) -> Option<f64> {
        if !self.is_closed() {
            return None;
        }
        let days: f64 = self.events.iter().map(|e| e.duration_days).sum();
        Some((days * 10.0).round() / 10.0)
    }

    /// When the current stage began.
    pub fn last_updated(&self) -> Option<DateTime<Utc>> {
        self.current_stage().and_then(|s| s.started_at)
    }

    /// Whole days the file has been sitting in its current stage.
    ///
    /// Zero for closed files and for evaluation instants before the stage began.
    pub fn days_pending(&self, as_of: DateTime<Utc>) -> u32 {
        self.last_updated()
            .map(|started| whole_days_between(started, as_of))
            .unwrap_or(0)
    }

    /// Completes the current stage and starts the next one.
    ///
    /// The first pending placeholder is activated with the given assignment;
    /// when there is none the stage is appended.
    pub fn advance(
        &mut self,
        next: StageAssignment,
        at: DateTime<Utc>,
    ) -> Result<(), WorkflowError> {
        let current = self
            .current_index()
            .ok_or_else(|| self.transition_error("file is closed"))?;
        self.complete_stage(current, at)?;

        log::debug!(
            "File {} advanced to '{}' ({})",
            self.id,
            next.action,
            next.officer
        );
        match self
            .events
            .iter()
            .position(|e| e.status == StageStatus::Pending)
        {
            Some(pending) => self.events[pending] = StageEvent::current(next, at),
            None => self.events.push(StageEvent::current(next, at)),
        }
        Ok(())
    }

    /// Completes the current stage and closes the file.
    pub fn close(&mut self, at: DateTime<Utc>) -> Result<(), WorkflowError> {
        let current = self
            .current_index()
            .ok_or_else(|| self.transition_error("file is already closed"))?;
        if self
            .events
            .iter()
            .any(|e| e.status == StageStatus::Pending)
        {
            return Err(self.transition_error("pending stages remain"));
        }
        self.complete_stage(current, at)?;
        log::debug!("File {} closed", self.id);
        Ok(())
    }

    fn complete_stage(&mut self, index: usize, at: DateTime<Utc>) -> Result<(), WorkflowError> {
        let started = self.events[index]
            .started_at
            .ok_or_else(|| self.transition_error("current stage has no start time"))?;
        if at < started {
            return Err(self.transition_error("transition happens before the stage started"));
        }

        let stage = &mut self.events[index];
        stage.status = StageStatus::Completed;
        stage.duration_days = fractional_days_between(started, at);
        Ok(())
    }

    /// Checks the completed/current/pending ordering invariant and that start
    /// times never run backwards from submission.
    pub fn validate_timeline(&self) -> Result<(), WorkflowError> {
        if self.events.is_empty() {
            return Err(self.timeline_error("file has no stage events"));
        }

        let mut seen_current = false;
        let mut seen_pending = false;
        let mut previous_start = self.submitted_at;
        for (index, event) in self.events.iter().enumerate() {
            match event.status {
                StageStatus::Completed => {
                    if seen_current || seen_pending {
                        return Err(self.timeline_error(&format!(
                            "completed stage {} follows the current stage",
                            index + 1
                        )));
                    }
                }
                StageStatus::Current => {
                    if seen_current {
                        return Err(self.timeline_error("more than one current stage"));
                    }
                    if seen_pending {
                        return Err(self.timeline_error(&format!(
                            "current stage {} follows a pending stage",
                            index + 1
                        )));
                    }
                    seen_current = true;
                }
                StageStatus::Pending => {
                    if !seen_current {
                        return Err(self.timeline_error(&format!(
                            "pending stage {} without a current stage",
                            index + 1
                        )));
                    }
                    seen_pending = true;
                }
            }

            match (event.status, event.started_at) {
                (StageStatus::Pending, Some(_)) => {
                    return Err(self.timeline_error(&format!(
                        "pending stage {} already has a start time",
                        index + 1
                    )));
                }
                (StageStatus::Pending, None) => {}
                (_, None) => {
                    return Err(self.timeline_error(&format!(
                        "stage {} ('{}') has no start time",
                        index + 1,
                        event.action
                    )));
                }
                (_, Some(started)) => {
                    if started < previous_start {
                        return Err(self.timeline_error(&format!(
                            "stage {} ('{}') starts before the previous stage or submission",
                            index + 1,
                            event.action
                        )));
                    }
                    previous_start = started;
                }
            }
            if !event.duration_days.is_finite() || event.duration_days < 0.0 {
                return Err(self.timeline_error(&format!(
                    "stage {} has a negative duration",
                    index + 1
                )));
            }
        }

        Ok(())
    }

    fn timeline_error(&self, reason: &str) -> WorkflowError {
        WorkflowError::InvalidTimeline {
            file_id: self.id.to_string(),
            reason: reason.to_string(),
        }
    }

    fn transition_error(&self, reason: &str) -> WorkflowError {
        WorkflowError::InvalidTransition {
            file_id: self.id.to_string(),
            reason: reason.to_string(),
        }
    }
}

pub(crate) fn whole_days_between(from: DateTime<Utc>, to: DateTime<Utc>) -> u32 {
    u32::try_from((to - from).num_days().max(0)).unwrap_or(u32::MAX)
}

fn fractional_days_between(from: DateTime<Utc>, to: DateTime<Utc>) -> f64 {
    let days = (to - from).num_minutes() as f64 / (24.0 * 60.0);
    (days * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 18, 9, 0, 0).unwrap()
    }

    fn new_file() -> CaseFile {
        CaseFile::open(
            FileId::parse("FN-2024-001").unwrap(),
            "Land Registration Application",
            Department::Revenue,
            Priority::High,
            StageAssignment::new("R. Venkat", Department::Reception, "File Received"),
            t0(),
        )
    }

    fn current_count(file: &CaseFile) -> usize {
        file.events
            .iter()
            .filter(|e| e.status == StageStatus::Current)
            .count()
    }

    #[test]
    fn test_file_id_is_normalized() {
        let id = FileId::parse("  fn-2024-001 ").unwrap();
        assert_eq!(id.as_str(), "FN-2024-001");
    }

    #[test]
    fn test_file_id_rejects_bad_pattern() {
        assert!(FileId::parse("FN-24-001").is_err());
        assert!(FileId::parse("XX-2024-001").is_err());
        assert!(FileId::parse("").is_err());
    }

    #[test]
    fn test_department_from_str() {
        assert_eq!("revenue".parse::<Department>().unwrap(), Department::Revenue);
        assert_eq!(
            "Legal Department".parse::<Department>().unwrap(),
            Department::Legal
        );
        assert!(matches!(
            "Fisheries".parse::<Department>(),
            Err(ConfigError::UnknownDepartment(_))
        ));
    }

    #[test]
    fn test_open_creates_single_current_stage() {
        let file = new_file();
        assert_eq!(file.events.len(), 1);
        assert_eq!(current_count(&file), 1);
        assert!(!file.is_closed());
        assert!(file.validate_timeline().is_ok());
    }

    #[test]
    fn test_advance_flips_current_to_completed() {
        let mut file = new_file();
        let at = t0() + Duration::hours(12);
        file.advance(
            StageAssignment::new("P. Meena", Department::Revenue, "Initial Verification"),
            at,
        )
        .unwrap();

        assert_eq!(file.events[0].status, StageStatus::Completed);
        assert_eq!(file.events[0].duration_days, 0.5);
        assert_eq!(file.events[1].status, StageStatus::Current);
        assert_eq!(file.current_officer(), Some("P. Meena"));
        assert_eq!(current_count(&file), 1);
        assert!(file.validate_timeline().is_ok());
    }

    #[test]
    fn test_advance_activates_first_pending_placeholder() {
        let mut file = new_file();
        file.plan_stage(StageAssignment::new("Dept Head", Department::Revenue, "Final Approval"))
            .unwrap();
        file.plan_stage(StageAssignment::new("Dept Head", Department::Revenue, "Dispatch"))
            .unwrap();

        file.advance(
            StageAssignment::new("S. Kumar", Department::Revenue, "Final Approval"),
            t0() + Duration::days(1),
        )
        .unwrap();

        assert_eq!(file.events.len(), 3);
        assert_eq!(file.events[1].officer, "S. Kumar");
        assert_eq!(file.events[1].status, StageStatus::Current);
        assert_eq!(file.events[2].status, StageStatus::Pending);
        assert!(file.validate_timeline().is_ok());
    }

    #[test]
    fn test_days_pending_resets_on_new_stage() {
        let mut file = new_file();
        let later = t0() + Duration::days(6);
        assert_eq!(file.days_pending(later), 6);

        file.advance(
            StageAssignment::new("P. Meena", Department::Revenue, "Verification"),
            later,
        )
        .unwrap();
        assert_eq!(file.days_pending(later), 0);
    }

    #[test]
    fn test_days_pending_before_stage_start_is_zero() {
        let file = new_file();
        assert_eq!(file.days_pending(t0() - Duration::days(3)), 0);
    }

    #[test]
    fn test_close_completes_file() {
        let mut file = new_file();
        file.close(t0() + Duration::days(2)).unwrap();

        assert!(file.is_closed());
        assert_eq!(current_count(&file), 0);
        assert_eq!(file.current_officer(), Some("R. Venkat"));
        assert_eq!(file.days_pending(t0() + Duration::days(30)), 0);
        assert!(file.validate_timeline().is_ok());
    }

    #[test]
    fn test_closed_file_is_immutable() {
        let mut file = new_file();
        file.close(t0() + Duration::days(1)).unwrap();

        let advance = file.advance(
            StageAssignment::new("P. Meena", Department::Revenue, "Reopen"),
            t0() + Duration::days(2),
        );
        assert!(matches!(advance, Err(WorkflowError::InvalidTransition { .. })));
        assert!(matches!(
            file.close(t0() + Duration::days(2)),
            Err(WorkflowError::InvalidTransition { .. })
        ));
    }

    #[test]
    fn test_close_with_pending_stages_fails() {
        let mut file = new_file();
        file.plan_stage(StageAssignment::new("Dept Head", Department::Revenue, "Approval"))
            .unwrap();
        assert!(matches!(
            file.close(t0() + Duration::days(1)),
            Err(WorkflowError::InvalidTransition { .. })
        ));
    }

    #[test]
    fn test_advance_before_stage_start_fails() {
        let mut file = new_file();
        let result = file.advance(
            StageAssignment::new("P. Meena", Department::Revenue, "Verification"),
            t0() - Duration::hours(1),
        );
        assert!(matches!(result, Err(WorkflowError::InvalidTransition { .. })));
        assert_eq!(current_count(&file), 1);
    }

    #[test]
    fn test_validate_rejects_two_current_stages() {
        let mut file = new_file();
        file.events.push(StageEvent::current(
            StageAssignment::new("P. Meena", Department::Revenue, "Verification"),
            t0(),
        ));
        assert!(matches!(
            file.validate_timeline(),
            Err(WorkflowError::InvalidTimeline { .. })
        ));
    }

    #[test]
    fn test_validate_rejects_completed_after_current() {
        let mut file = new_file();
        let mut stray = StageEvent::current(
            StageAssignment::new("P. Meena", Department::Revenue, "Verification"),
            t0(),
        );
        stray.status = StageStatus::Completed;
        file.events.push(stray);
        assert!(file.validate_timeline().is_err());
    }

    #[test]
    fn test_validate_rejects_out_of_order_start_times() {
        let mut file = new_file();
        file.advance(
            StageAssignment::new("S. Kumar", Department::Revenue, "Officer Review"),
            t0() + Duration::days(3),
        )
        .unwrap();
        assert!(file.validate_timeline().is_ok());

        // Completed stage now starts after the current one.
        file.events[0].started_at = Some(t0() + Duration::days(4));
        let err = file.validate_timeline().unwrap_err();
        assert!(err.to_string().contains("starts before the previous stage"));
    }

    #[test]
    fn test_validate_rejects_start_before_submission() {
        let mut file = new_file();
        file.events[0].started_at = Some(t0() - Duration::days(16));
        assert!(matches!(
            file.validate_timeline(),
            Err(WorkflowError::InvalidTimeline { .. })
        ));
    }

    #[test]
    fn test_validate_rejects_pending_with_start_time() {
        let mut file = new_file();
        let mut planned = StageEvent::pending(StageAssignment::new(
            "Dept Head",
            Department::Revenue,
            "Approval",
        ));
        planned.started_at = Some(t0() + Duration::days(2));
        file.events.push(planned);
        let err = file.validate_timeline().unwrap_err();
        assert!(err.to_string().contains("already has a start time"));
    }

    #[test]
    fn test_disposal_days_only_for_closed_files() {
        let mut file = new_file();
        assert_eq!(file.disposal_days(), None);

        file.advance(
            StageAssignment::new("S. Kumar", Department::Revenue, "Officer Review"),
            t0() + Duration::hours(12),
        )
        .unwrap();
        file.close(t0() + Duration::days(3)).unwrap();
        assert_eq!(file.disposal_days(), Some(3.0));
    }

    #[test]
    fn test_validate_rejects_pending_without_current() {
        let mut file = new_file();
        file.events[0].status = StageStatus::Completed;
        file.events.push(StageEvent::pending(StageAssignment::new(
            "Dept Head",
            Department::Revenue,
            "Approval",
        )));
        assert!(file.validate_timeline().is_err());
    }

    #[test]
    fn test_validate_rejects_empty_history() {
        let mut file = new_file();
        file.events.clear();
        assert!(file.validate_timeline().is_err());
    }
}
