//! Query facade: the read operations each screen is built on.

use chrono::{DateTime, Days, Utc};
use serde::Serialize;

use crate::config::Policy;
use crate::error::{Result, SessionError};
use crate::model::{CaseFile, Officer, StageStatus};
use crate::reports::{self, DashboardSummary, OfficerWorkload, WorkloadReport};
use crate::session::{Screen, Session};
use crate::store::{
    CaseRepository, Dataset, FileListResponse, FileQueryParams, FileSummary, InMemoryStore,
};
use crate::workflow::{
    assess, generate_alerts, Alert, AlertSummary, EscalationLevel, FileStatus, WeightedScorer,
};

/// One row of a file's stage list.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StageView {
    pub name: String,
    pub status: StageStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub officer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_days: Option<f64>,
}

/// Everything the tracking page shows for one file.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileStatusReport {
    pub file_id: String,
    pub subject: String,
    pub department: String,
    pub current_status: String,
    pub current_officer: String,
    pub submitted_at: DateTime<Utc>,
    pub expected_completion: DateTime<Utc>,
    pub progress: u8,
    pub days_pending: u32,
    pub status: FileStatus,
    pub escalation: EscalationLevel,
    pub stages: Vec<StageView>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertFeed {
    pub alerts: Vec<Alert>,
    pub summary: AlertSummary,
}

/// Read side of the tracker over a repository and a policy table.
pub struct Tracker<R = InMemoryStore> {
    policy: Policy,
    repo: R,
}

impl Tracker<InMemoryStore> {
    /// Tracker over an in-memory copy of `dataset`.
    pub fn from_dataset(policy: Policy, dataset: Dataset) -> Self {
        Self::new(policy, InMemoryStore::from_dataset(dataset))
    }

    pub fn store_mut(&mut self) -> &mut InMemoryStore {
        &mut self.repo
    }
}

impl<R: CaseRepository> Tracker<R> {
    pub fn new(policy: Policy, repo: R) -> Self {
        Self { policy, repo }
    }

    pub fn policy(&self) -> &Policy {
        &self.policy
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    /// Citizen tracking page / file timeline.
    pub fn query_by_id(&self, session: &Session, id: &str) -> Result<FileStatusReport> {
        authorize(session, &[Screen::Track, Screen::Files])?;
        let file = self.repo.get_file(id)?;
        log::debug!("Query for {} at {}", file.id, session.as_of);
        self.status_report(file, session.as_of)
    }

    pub fn list_files(&self, session: &Session, params: &FileQueryParams) -> Result<FileListResponse> {
        authorize(session, &[Screen::Files])?;
        let _span = tracing::debug_span!("tracker.list_files", status = ?params.status).entered();

        let mut files = Vec::new();
        for file in self.repo.files() {
            if params.department.is_some_and(|d| d != file.department) {
                continue;
            }
            let assessment = assess(file, &self.policy, session.as_of)?;
            if !params.status.matches(assessment.status) {
                continue;
            }
            files.push(FileSummary {
                id: file.id.to_string(),
                subject: file.subject.clone(),
                department: file.department,
                officer: file.current_officer().unwrap_or_default().to_string(),
                days_pending: assessment.days_pending,
                status: assessment.status,
                priority: file.priority,
            });
        }

        let total = files.len() as u64;
        let offset = params.offset.unwrap_or(0) as usize;
        let limit = params.limit.unwrap_or(100) as usize;
        let files = files.into_iter().skip(offset).take(limit).collect();

        Ok(FileListResponse {
            files,
            total,
            limit: params.limit,
            offset: params.offset,
        })
    }

    pub fn alert_feed(&self, session: &Session) -> Result<AlertFeed> {
        authorize(session, &[Screen::Alerts])?;
        let alerts = generate_alerts(self.repo.files(), &self.policy, session.as_of)?;
        let summary = AlertSummary::from_alerts(&alerts);
        log::debug!("{} alerts at {}", summary.total, session.as_of);
        Ok(AlertFeed { alerts, summary })
    }

    pub fn officer_roster(&self, session: &Session) -> Result<WorkloadReport> {
        authorize(session, &[Screen::Officers])?;
        Ok(reports::workload_report(self.repo.officers(), &self.policy)?)
    }

    pub fn officer(&self, session: &Session, id: &str) -> Result<OfficerWorkload> {
        authorize(session, &[Screen::Officers])?;
        let officer: &Officer = self.repo.get_officer(id)?;
        let scorer = WeightedScorer::new(&self.policy.efficiency);
        Ok(reports::officer_workload(officer, &self.policy, &scorer)?)
    }

    pub fn dashboard(&self, session: &Session) -> Result<DashboardSummary> {
        authorize(session, &[Screen::Dashboard, Screen::Reports])?;
        let files = self.repo.files();
        Ok(reports::dashboard_summary(
            &files,
            self.repo.officers(),
            &self.policy,
            session.as_of,
        )?)
    }

    fn status_report(&self, file: &CaseFile, as_of: DateTime<Utc>) -> Result<FileStatusReport> {
        let assessment = assess(file, &self.policy, as_of)?;
        let department_policy = self.policy.department(file.department)?;
        let template = self.policy.workflow_for(file)?;

        let mut stages: Vec<StageView> = file
            .events
            .iter()
            .map(|e| StageView {
                name: e.action.clone(),
                status: e.status,
                officer: Some(e.officer.clone()),
                date: e.started_at,
                duration_days: (e.status == StageStatus::Completed).then_some(e.duration_days),
            })
            .collect();
        // Template stages the history has not reached yet.
        if !file.is_closed() {
            stages.extend(template.stages.iter().skip(file.events.len()).map(|name| {
                StageView {
                    name: name.clone(),
                    status: StageStatus::Pending,
                    officer: None,
                    date: None,
                    duration_days: None,
                }
            }));
        }

        let expected_completion = file
            .submitted_at
            .checked_add_days(Days::new(u64::from(department_policy.turnaround_days())))
            .unwrap_or(file.submitted_at);

        Ok(FileStatusReport {
            file_id: file.id.to_string(),
            subject: file.subject.clone(),
            department: file.department.long_name(),
            current_status: status_label(file, assessment.escalation).to_string(),
            current_officer: file.current_officer().unwrap_or_default().to_string(),
            submitted_at: file.submitted_at,
            expected_completion,
            progress: assessment.progress,
            days_pending: assessment.days_pending,
            status: assessment.status,
            escalation: assessment.escalation,
            stages,
        })
    }
}

fn status_label(file: &CaseFile, escalation: EscalationLevel) -> &'static str {
    if file.is_closed() {
        "Completed"
    } else if escalation >= EscalationLevel::AutoEscalated {
        "Escalated"
    } else {
        "Under Review"
    }
}

/// Passes when the session's role may open at least one of `screens`.
fn authorize(session: &Session, screens: &[Screen]) -> std::result::Result<(), SessionError> {
    let role = session.role.ok_or(SessionError::NotLoggedIn)?;
    if screens.iter().any(|s| role.can_view(*s)) {
        Ok(())
    } else {
        Err(SessionError::Forbidden {
            role: role.to_string(),
            screen: screens[0].to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TrackerError;
    use crate::model::{Department, StageAssignment};
    use crate::session::Role;
    use crate::workflow::StatusFilter;

    fn tracker() -> (Tracker, Dataset) {
        let policy = Policy::default();
        let dataset = Dataset::sample(&policy).unwrap();
        (Tracker::from_dataset(policy, dataset.clone()), dataset)
    }

    #[test]
    fn test_query_by_id_builds_timeline() {
        let (tracker, dataset) = tracker();
        let session = Session::login(Role::Citizen, dataset.snapshot_at);
        let report = tracker.query_by_id(&session, "fn-2024-001").unwrap();

        assert_eq!(report.file_id, "FN-2024-001");
        assert_eq!(report.department, "Revenue Department");
        assert_eq!(report.current_officer, "S. Kumar");
        assert_eq!(report.current_status, "Under Review");
        assert_eq!(report.progress, 40);
        assert_eq!(report.stages.len(), 5);
        assert_eq!(report.stages[2].status, StageStatus::Current);
        assert_eq!(
            report.expected_completion,
            report.submitted_at + chrono::Duration::days(7)
        );
    }

    #[test]
    fn test_short_history_is_padded_from_template() {
        let (tracker, dataset) = tracker();
        let session = Session::login(Role::Admin, dataset.snapshot_at);
        let report = tracker.query_by_id(&session, "FN-2024-003").unwrap();
        assert_eq!(report.stages.len(), 5);
        assert_eq!(report.stages[4].name, "Completed");
        assert_eq!(report.stages[4].officer, None);
    }

    #[test]
    fn test_unknown_id_is_not_found() {
        let (tracker, dataset) = tracker();
        let session = Session::login(Role::Citizen, dataset.snapshot_at);
        let err = tracker.query_by_id(&session, "FN-9999-999").unwrap_err();
        assert!(err.is_not_found());
        assert!(err.to_string().contains("not found"));
    }

    #[test]
    fn test_role_gates_queries() {
        let (tracker, dataset) = tracker();
        let citizen = Session::login(Role::Citizen, dataset.snapshot_at);
        assert!(matches!(
            tracker.alert_feed(&citizen),
            Err(TrackerError::Session(SessionError::Forbidden { .. }))
        ));

        let anonymous = Session::anonymous(dataset.snapshot_at);
        assert!(matches!(
            tracker.query_by_id(&anonymous, "FN-2024-001"),
            Err(TrackerError::Session(SessionError::NotLoggedIn))
        ));
    }

    #[test]
    fn test_list_files_pagination() {
        let (tracker, dataset) = tracker();
        let session = Session::login(Role::Officer, dataset.snapshot_at);
        let params = FileQueryParams {
            limit: Some(3),
            offset: Some(2),
            ..Default::default()
        };
        let page = tracker.list_files(&session, &params).unwrap();
        assert_eq!(page.total, dataset.files.len() as u64);
        assert_eq!(page.files.len(), 3);
        assert_eq!(page.files[0].id, "FN-2024-003");
    }

    #[test]
    fn test_list_files_filters() {
        let (tracker, dataset) = tracker();
        let session = Session::login(Role::Admin, dataset.snapshot_at);
        let params = FileQueryParams {
            status: StatusFilter::Critical,
            ..Default::default()
        };
        let critical = tracker.list_files(&session, &params).unwrap();
        assert!(critical
            .files
            .iter()
            .all(|f| f.status == FileStatus::Critical));

        let params = FileQueryParams {
            department: Some(Department::Planning),
            ..Default::default()
        };
        let planning = tracker.list_files(&session, &params).unwrap();
        assert!(planning.total > 0);
        assert!(planning
            .files
            .iter()
            .all(|f| f.department == Department::Planning));
    }

    #[test]
    fn test_officer_lookup_through_tracker() {
        let (tracker, dataset) = tracker();
        let session = Session::login(Role::Admin, dataset.snapshot_at);
        assert_eq!(tracker.officer(&session, "OFF-001").unwrap().efficiency, 94);
        assert!(tracker.officer(&session, "OFF-404").unwrap_err().is_not_found());
    }

    #[test]
    fn test_store_mutation_is_visible() {
        let (mut tracker, dataset) = tracker();
        let at = dataset.snapshot_at;

        let session = Session::login(Role::Citizen, at);
        let before = tracker.query_by_id(&session, "FN-2024-004").unwrap();
        assert_eq!(before.current_status, "Escalated");

        tracker
            .store_mut()
            .advance_file(
                "FN-2024-004",
                StageAssignment::new("A. Lakshmi", Department::Legal, "Opinion Draft"),
                at,
            )
            .unwrap();
        let after = tracker.query_by_id(&session, "FN-2024-004").unwrap();
        assert_eq!(after.escalation, EscalationLevel::Normal);
        assert_eq!(after.days_pending, 0);
    }
}
