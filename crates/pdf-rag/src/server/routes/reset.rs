//! History and index reset endpoints

use axum::{
    extract::{Query, State},
    Json,
};

use crate::error::Result;
use crate::server::state::AppState;
use crate::types::{HistoryResponse, SessionParams, StatusResponse};

/// GET /clear - Delete the index and forget every session's history
pub async fn clear(State(state): State<AppState>) -> Result<Json<StatusResponse>> {
    state.reset().await?;
    Ok(Json(StatusResponse::new("Chat history cleared.")))
}

/// POST /clear/history - Forget the session's history only
pub async fn clear_history(
    State(state): State<AppState>,
    Query(params): Query<SessionParams>,
) -> Json<StatusResponse> {
    state.clear_history(params.session_id());
    Json(StatusResponse::new("Chat history cleared."))
}

/// POST /clear/index - Delete the index only
pub async fn clear_index(State(state): State<AppState>) -> Result<Json<StatusResponse>> {
    state.clear_index().await?;
    Ok(Json(StatusResponse::new("Index cleared.")))
}

/// GET /history - Turns recorded for a session
pub async fn history(
    State(state): State<AppState>,
    Query(params): Query<SessionParams>,
) -> Json<HistoryResponse> {
    let session = params.session_id();
    let conversation = state.sessions().snapshot(session);

    Json(HistoryResponse {
        session: session.to_string(),
        turns: conversation.turns().to_vec(),
    })
}
