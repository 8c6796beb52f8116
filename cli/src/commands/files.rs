//! File tracking and listing commands.

use filetrack::{
    Department, FileListResponse, FileQueryParams, FileStatusReport, StatusFilter,
};

use super::ApiResponse;
use crate::state::AppState;

/// Get the tracking page for one file.
pub fn show_file(state: &AppState, id: &str) -> ApiResponse<FileStatusReport> {
    ApiResponse::from_result(state.tracker.query_by_id(&state.session, id))
}

/// Query files with filters and pagination.
pub fn list_files(
    state: &AppState,
    status: StatusFilter,
    department: Option<Department>,
    limit: Option<u64>,
    offset: Option<u64>,
) -> ApiResponse<FileListResponse> {
    let params = FileQueryParams {
        status,
        department,
        limit,
        offset,
    };
    ApiResponse::from_result(state.tracker.list_files(&state.session, &params))
}
