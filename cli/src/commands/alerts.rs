//! Alert feed command.

use filetrack::AlertFeed;

use super::ApiResponse;
use crate::state::AppState;

pub fn get_alerts(state: &AppState) -> ApiResponse<AlertFeed> {
    ApiResponse::from_result(state.tracker.alert_feed(&state.session))
}
