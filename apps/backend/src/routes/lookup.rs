//! Dictionary lookup endpoints

use axum::{
    extract::{Path, State},
    Extension, Json,
};

use crate::error::{ApiError, ApiErrorWithEvents, Result};
use crate::models::*;
use crate::routes::auth::AuthenticatedUser;
use crate::AppState;

/// GET /api/lookup/{word}
/// Holds the result as the user's current lookup
pub async fn lookup(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(word): Path<String>,
) -> std::result::Result<Json<LookupResponse>, ApiErrorWithEvents> {
    let mut ws = auth.workspace(&state).await?;
    let outcome = ws
        .lookup(state.dictionary.as_ref(), &word)
        .await
        .cloned();
    let events = ws.take_events();

    match outcome {
        Ok(result) => Ok(Json(LookupResponse { result, events })),
        Err(err) => Err(ApiError::from(err).with_events(events)),
    }
}

/// POST /api/lookup
/// Saves the current lookup to the collection
pub async fn save(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
) -> Result<Json<SaveWordResponse>> {
    let mut ws = auth.workspace(&state).await?;
    ws.ensure_loaded(state.records.as_ref()).await?;
    let record = ws.save_lookup(state.records.as_ref()).await?;

    tracing::info!(user_id = %ws.owner_id(), word = %record.word, "saved word");

    Ok(Json(SaveWordResponse {
        word: WordView::from(record),
        events: ws.take_events(),
    }))
}
