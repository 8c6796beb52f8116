use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TrackerError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Lookup(#[from] LookupError),

    #[error("Workflow error: {0}")]
    Workflow(#[from] WorkflowError),

    #[error("Session error: {0}")]
    Session(#[from] SessionError),
}

impl TrackerError {
    /// Returns true for the "unknown id" family, the only failures shown to end users.
    pub fn is_not_found(&self) -> bool {
        matches!(self, TrackerError::Lookup(_))
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse policy JSON: {0}")]
    ParseJson(#[from] serde_json::Error),

    #[error("Failed to parse YAML in '{path}': {message}")]
    ParseYaml { path: PathBuf, message: String },

    #[error("Config validation failed: {message}")]
    Validation { message: String },

    #[error("Schema validation failed: {errors}")]
    SchemaValidation { errors: String },

    #[error("Unknown department: {0}")]
    UnknownDepartment(String),

    #[error("Invalid workflow template '{name}': {reason}")]
    InvalidWorkflowTemplate { name: String, reason: String },
}

#[derive(Error, Debug)]
pub enum LookupError {
    #[error("File '{0}' not found. Please check your file ID and try again.")]
    FileNotFound(String),

    #[error("Officer '{0}' not found. Please check the officer ID and try again.")]
    OfficerNotFound(String),
}

#[derive(Error, Debug)]
pub enum WorkflowError {
    #[error("Invalid timeline for file {file_id}: {reason}")]
    InvalidTimeline { file_id: String, reason: String },

    #[error("Cannot update file {file_id}: {reason}")]
    InvalidTransition { file_id: String, reason: String },
}

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Screen '{screen}' is not available to role '{role}'")]
    Forbidden { role: String, screen: String },

    #[error("No role is logged in")]
    NotLoggedIn,
}

pub type Result<T> = std::result::Result<T, TrackerError>;
