//! Officer workload commands.

use filetrack::reports::OfficerWorkload;
use filetrack::WorkloadReport;

use super::ApiResponse;
use crate::state::AppState;

/// Get the whole roster with totals.
pub fn get_officers(state: &AppState) -> ApiResponse<WorkloadReport> {
    ApiResponse::from_result(state.tracker.officer_roster(&state.session))
}

/// Get a single officer by ID.
pub fn get_officer(state: &AppState, id: &str) -> ApiResponse<OfficerWorkload> {
    ApiResponse::from_result(state.tracker.officer(&state.session, id))
}
