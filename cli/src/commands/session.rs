//! Role and screen table command.

use filetrack::{Role, Screen};
use serde::Serialize;

use super::ApiResponse;
use crate::state::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScreensResponse {
    pub role: Option<Role>,
    pub current: Screen,
    pub screens: Vec<Screen>,
}

/// Screens available to the session's role, landing screen first.
pub fn get_screens(state: &AppState) -> ApiResponse<ScreensResponse> {
    let session = &state.session;
    let screens = session
        .role
        .map(|role| role.screens().to_vec())
        .unwrap_or_default();
    ApiResponse::ok(ScreensResponse {
        role: session.role,
        current: session.screen,
        screens,
    })
}
