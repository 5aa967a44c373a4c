//! Flashcard drill endpoints

use axum::{
    extract::{Path, State},
    Extension, Json,
};
use vocab_core::DrillAction;

use crate::error::Result;
use crate::models::DrillResponse;
use crate::routes::auth::AuthenticatedUser;
use crate::AppState;

/// GET /api/flashcards
pub async fn current(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
) -> Result<Json<DrillResponse>> {
    let mut ws = auth.workspace(&state).await?;

    Ok(Json(DrillResponse {
        drill: ws.drill_snapshot(),
        transition: None,
        events: ws.take_events(),
    }))
}

/// POST /api/flashcards/start
/// Deals a shuffled deck from the current collection
pub async fn start(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
) -> Result<Json<DrillResponse>> {
    let mut ws = auth.workspace(&state).await?;
    ws.ensure_loaded(state.records.as_ref()).await?;
    let snapshot = ws.start_drill()?;

    Ok(Json(DrillResponse {
        drill: Some(snapshot),
        transition: None,
        events: ws.take_events(),
    }))
}

/// POST /api/flashcards/{action}
pub async fn action(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(action): Path<DrillAction>,
) -> Result<Json<DrillResponse>> {
    let mut ws = auth.workspace(&state).await?;
    let (transition, snapshot) = ws.drill_action(action)?;

    Ok(Json(DrillResponse {
        drill: Some(snapshot),
        transition: Some(transition),
        events: ws.take_events(),
    }))
}
