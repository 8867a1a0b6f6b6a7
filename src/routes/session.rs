use axum::{Json, extract::State};
use serde::Serialize;

use crate::AppState;
use crate::session::Phase;

#[derive(Debug, Serialize)]
pub struct SessionInfo {
    pub phase: Phase,
    pub active_report_id: Option<String>,
    /// Last-used signatory, pre-filled into the drafting form.
    pub sender_name: Option<String>,
}

pub async fn session_info(State(state): State<AppState>) -> Json<SessionInfo> {
    let ws = state.workspace();
    Json(SessionInfo {
        phase: ws.session.phase(),
        active_report_id: ws.session.active_id().map(str::to_string),
        sender_name: ws.repo.sender_name(),
    })
}
