//! Grounded question endpoint

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Json,
};
use std::time::Instant;

use crate::error::{Error, Result};
use crate::server::state::AppState;
use crate::types::{AskResponse, QueryParams};

/// POST /ask_pdf - Answer from the indexed documents using the session's history
pub async fn ask_pdf(
    State(state): State<AppState>,
    params: std::result::Result<Query<QueryParams>, QueryRejection>,
) -> Result<Json<AskResponse>> {
    let Query(params) = params.map_err(|e| Error::BadRequest(e.body_text()))?;
    let session = params.session_id();
    let start = Instant::now();

    tracing::info!("Query [{}]: \"{}\"", session, params.query);

    // Work on a copy; the exchange is recorded only once the answer exists
    let history = state.sessions().snapshot(session);
    let result = state.query().query(&params.query, &history).await?;
    state
        .sessions()
        .record_exchange(session, &params.query, &result.answer);

    tracing::info!(
        "Answered in {}ms with {} sources",
        start.elapsed().as_millis(),
        result.context.len()
    );

    Ok(Json(AskResponse::from(result)))
}
