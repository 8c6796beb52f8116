//! Application state built once per invocation.

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use log::info;

use filetrack::config::load_policy;
use filetrack::store::load_dataset;
use filetrack::{Dataset, Policy, Role, Session, Tracker};

/// Loaded policy and data plus the session every query runs in.
pub struct AppState {
    pub tracker: Tracker,
    pub session: Session,
}

/// Where to load from and how to evaluate.
pub struct StateOptions {
    pub policy: Option<PathBuf>,
    pub data: Option<PathBuf>,
    pub as_of: Option<DateTime<Utc>>,
    pub role: Role,
}

impl AppState {
    /// Loads the policy and dataset, falling back to the bundled ones.
    ///
    /// The evaluation instant defaults to the dataset snapshot so the sample
    /// data reads the same whenever it is run.
    pub fn load(options: StateOptions) -> Result<Self> {
        let policy = match &options.policy {
            Some(path) => load_policy(path)
                .with_context(|| format!("Failed to load policy from {:?}", path))?,
            None => Policy::default(),
        };

        let dataset = match &options.data {
            Some(path) => load_dataset(path, &policy)
                .with_context(|| format!("Failed to load dataset from {:?}", path))?,
            None => Dataset::sample(&policy).context("Bundled sample dataset is invalid")?,
        };

        let as_of = options.as_of.unwrap_or(dataset.snapshot_at);
        info!(
            "Tracking {} files and {} officers as of {}",
            dataset.files.len(),
            dataset.officers.len(),
            as_of
        );

        Ok(Self {
            tracker: Tracker::from_dataset(policy, dataset),
            session: Session::login(options.role, as_of),
        })
    }
}
