pub mod config;
pub mod error;
pub mod model;
pub mod reports;
pub mod session;
pub mod store;
pub mod tracker;
pub mod workflow;

pub use config::{load_policy, load_policy_from_str, Policy};
pub use error::{ConfigError, LookupError, Result, SessionError, TrackerError, WorkflowError};
pub use model::{CaseFile, Department, FileId, Officer, Priority, StageAssignment, StageEvent, StageStatus};
pub use reports::{DashboardSummary, WorkloadReport};
pub use session::{Role, Screen, Session};
pub use store::{
    load_dataset, CaseRepository, Dataset, FileListResponse, FileQueryParams, FileSummary,
    InMemoryStore,
};
pub use tracker::{AlertFeed, FileStatusReport, StageView, Tracker};
pub use workflow::{
    assess, Alert, AlertType, EscalationLevel, FileAssessment, FileStatus, StatusFilter,
    WorkloadBucket,
};
