//! Dashboard command.

use filetrack::DashboardSummary;

use super::ApiResponse;
use crate::state::AppState;

pub fn get_dashboard(state: &AppState) -> ApiResponse<DashboardSummary> {
    ApiResponse::from_result(state.tracker.dashboard(&state.session))
}
