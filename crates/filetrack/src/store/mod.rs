//! Storage seam between the derivation rules and where files live.

pub mod dataset;

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::LookupError;
use crate::model::{CaseFile, Department, FileId, Officer, Priority, StageAssignment};
use crate::workflow::{FileStatus, StatusFilter};

pub use dataset::{load_dataset, load_dataset_from_str, validate_dataset, Dataset};

/// Read access to files and officers.
pub trait CaseRepository {
    /// Looks a file up by id. The id is trimmed and upper-cased first.
    fn get_file(&self, id: &str) -> Result<&CaseFile, LookupError>;

    /// All files, ordered by id.
    fn files(&self) -> Vec<&CaseFile>;

    /// All officers, in roster order.
    fn officers(&self) -> &[Officer];

    fn get_officer(&self, id: &str) -> Result<&Officer, LookupError> {
        let wanted = id.trim();
        self.officers()
            .iter()
            .find(|o| o.id.eq_ignore_ascii_case(wanted))
            .ok_or_else(|| LookupError::OfficerNotFound(wanted.to_string()))
    }
}

// ─── Query types ────────────────────────────────────────────────────────────

/// Query parameters for file listing.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileQueryParams {
    #[serde(default)]
    pub status: StatusFilter,
    pub department: Option<Department>,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

/// One row of the file list.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileSummary {
    pub id: String,
    pub subject: String,
    pub department: Department,
    pub officer: String,
    pub days_pending: u32,
    pub status: FileStatus,
    pub priority: Priority,
}

/// Response for file listing with pagination.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileListResponse {
    pub files: Vec<FileSummary>,
    pub total: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<u64>,
}

// ─── InMemoryStore ──────────────────────────────────────────────────────────

/// Files and officers held in memory for the life of the process.
#[derive(Debug, Default, Clone)]
pub struct InMemoryStore {
    files: BTreeMap<String, CaseFile>,
    officers: Vec<Officer>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a store from an already validated dataset.
    pub fn from_dataset(dataset: Dataset) -> Self {
        let mut store = Self {
            files: BTreeMap::new(),
            officers: dataset.officers,
        };
        for file in dataset.files {
            store.insert(file);
        }
        store
    }

    /// Adds or replaces a file.
    pub fn insert(&mut self, file: CaseFile) -> Option<CaseFile> {
        self.files.insert(file.id.as_str().to_string(), file)
    }

    pub fn add_officer(&mut self, officer: Officer) {
        self.officers.push(officer);
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Moves a file to its next stage.
    pub fn advance_file(
        &mut self,
        id: &str,
        next: StageAssignment,
        at: DateTime<Utc>,
    ) -> crate::Result<&CaseFile> {
        let file = self.file_mut(id)?;
        file.advance(next, at)?;
        Ok(&*file)
    }

    /// Completes the current stage of a file and closes it.
    pub fn close_file(
        &mut self,
        id: &str,
        at: DateTime<Utc>,
    ) -> crate::Result<&CaseFile> {
        let file = self.file_mut(id)?;
        file.close(at)?;
        Ok(&*file)
    }

    fn file_mut(&mut self, id: &str) -> Result<&mut CaseFile, LookupError> {
        let key = FileId::normalize(id);
        self.files
            .get_mut(&key)
            .ok_or(LookupError::FileNotFound(key))
    }
}

impl CaseRepository for InMemoryStore {
    fn get_file(&self, id: &str) -> Result<&CaseFile, LookupError> {
        let key = FileId::normalize(id);
        self.files
            .get(&key)
            .ok_or(LookupError::FileNotFound(key))
    }

    fn files(&self) -> Vec<&CaseFile> {
        self.files.values().collect()
    }

    fn officers(&self) -> &[Officer] {
        &self.officers
    }
}
