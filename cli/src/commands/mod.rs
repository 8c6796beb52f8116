//! Commands for the filetrack CLI.
//!
//! Commands are organized by screen:
//! - `files`: file tracking and listing
//! - `alerts`: alert feed
//! - `officers`: officer workload
//! - `reports`: dashboard summary
//! - `session`: role and screen table

pub mod alerts;
pub mod files;
pub mod officers;
pub mod reports;
pub mod session;

pub use alerts::*;
pub use files::*;
pub use officers::*;
pub use reports::*;
pub use session::*;

use serde::Serialize;

/// Response wrapper for command output.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn err(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }

    /// Wraps a library result, rendering the error for display.
    pub fn from_result<E: std::fmt::Display>(result: Result<T, E>) -> Self {
        match result {
            Ok(data) => Self::ok(data),
            Err(e) => Self::err(e.to_string()),
        }
    }
}
