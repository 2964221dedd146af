//! Direct chat endpoint

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Json,
};

use crate::error::{Error, Result};
use crate::server::state::AppState;
use crate::types::{ChatResponse, QueryParams};

/// POST /ai - Send a message straight to the model
pub async fn chat(
    State(state): State<AppState>,
    params: std::result::Result<Query<QueryParams>, QueryRejection>,
) -> Result<Json<ChatResponse>> {
    let Query(params) = params.map_err(|e| Error::BadRequest(e.body_text()))?;

    tracing::info!("Chat: \"{}\"", params.query);
    let answer = state.query().chat(&params.query).await?;

    Ok(Json(ChatResponse { answer }))
}
