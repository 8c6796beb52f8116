//! Builders for creating test data programmatically.
//!
//! Timelines are described relative to an evaluation instant so a test can
//! say "current stage started 8 days ago" without doing date arithmetic.

#![allow(dead_code)]

use chrono::{DateTime, Duration, TimeZone, Utc};

use filetrack::model::{
    CaseFile, Department, FileId, Officer, Priority, StageEvent, StageStatus,
};

/// Evaluation instant used across the integration tests.
pub fn as_of() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 1, 22, 10, 0, 0).unwrap()
}

/// Builder for creating `CaseFile` instances.
pub struct CaseFileBuilder {
    id: String,
    subject: String,
    department: Department,
    priority: Priority,
    workflow: Option<String>,
    completed: Vec<(String, f64)>,
    current: Option<(String, String, i64)>,
    pending: Vec<String>,
}

impl CaseFileBuilder {
    pub fn new(id: &str, department: Department) -> Self {
        Self {
            id: id.to_string(),
            subject: format!("Subject of {}", id),
            department,
            priority: Priority::Medium,
            workflow: None,
            completed: vec![],
            current: None,
            pending: vec![],
        }
    }

    pub fn subject(mut self, subject: &str) -> Self {
        self.subject = subject.to_string();
        self
    }

    pub fn priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    pub fn workflow(mut self, name: &str) -> Self {
        self.workflow = Some(name.to_string());
        self
    }

    /// Add a completed stage that took `days`.
    pub fn completed(mut self, action: &str, days: f64) -> Self {
        self.completed.push((action.to_string(), days));
        self
    }

    /// Set the current stage, started `days_ago` days before [`as_of`].
    pub fn current(mut self, action: &str, officer: &str, days_ago: i64) -> Self {
        self.current = Some((action.to_string(), officer.to_string(), days_ago));
        self
    }

    /// Add a pending placeholder after the current stage.
    pub fn pending(mut self, action: &str) -> Self {
        self.pending.push(action.to_string());
        self
    }

    /// Build the file. Completed stages are laid out back to back so the
    /// last one ends when the current stage begins.
    pub fn build(self) -> CaseFile {
        let days_ago = self.current.as_ref().map(|c| c.2).unwrap_or(0);
        let current_start = as_of() - Duration::days(days_ago);
        let completed_minutes: i64 = self
            .completed
            .iter()
            .map(|(_, d)| (d * 24.0 * 60.0).round() as i64)
            .sum();
        let submitted_at = current_start - Duration::minutes(completed_minutes);

        let mut events = Vec::new();
        let mut cursor = submitted_at;
        for (index, (action, days)) in self.completed.iter().enumerate() {
            let department = if index == 0 {
                Department::Reception
            } else {
                self.department
            };
            events.push(StageEvent {
                officer: "Clerk".to_string(),
                department,
                action: action.clone(),
                started_at: Some(cursor),
                duration_days: *days,
                status: StageStatus::Completed,
            });
            cursor += Duration::minutes((days * 24.0 * 60.0).round() as i64);
        }
        if let Some((action, officer, _)) = self.current {
            events.push(StageEvent {
                officer,
                department: self.department,
                action,
                started_at: Some(current_start),
                duration_days: 0.0,
                status: StageStatus::Current,
            });
        }
        for action in self.pending {
            events.push(StageEvent {
                officer: "Unassigned".to_string(),
                department: self.department,
                action,
                started_at: None,
                duration_days: 0.0,
                status: StageStatus::Pending,
            });
        }

        CaseFile {
            id: FileId::parse(&self.id).unwrap(),
            subject: self.subject,
            department: self.department,
            priority: self.priority,
            submitted_at,
            workflow: self.workflow,
            events,
        }
    }
}

/// Shorthand: an open file sitting `days` in its first real stage.
pub fn pending_for(id: &str, department: Department, days: i64) -> CaseFile {
    CaseFileBuilder::new(id, department)
        .completed("Application Received", 0.5)
        .current("Review", "Officer", days)
        .build()
}

/// Builder for creating `Officer` instances.
pub struct OfficerBuilder {
    officer: Officer,
}

impl OfficerBuilder {
    pub fn new(id: &str, department: Department) -> Self {
        Self {
            officer: Officer {
                id: id.to_string(),
                name: format!("Officer {}", id),
                department,
                active_files: 0,
                avg_handling_days: 3.0,
                completed_this_month: 0,
            },
        }
    }

    pub fn name(mut self, name: &str) -> Self {
        self.officer.name = name.to_string();
        self
    }

    pub fn active_files(mut self, count: u32) -> Self {
        self.officer.active_files = count;
        self
    }

    pub fn avg_handling_days(mut self, days: f64) -> Self {
        self.officer.avg_handling_days = days;
        self
    }

    pub fn completed_this_month(mut self, count: u32) -> Self {
        self.officer.completed_this_month = count;
        self
    }

    pub fn build(self) -> Officer {
        self.officer
    }
}
