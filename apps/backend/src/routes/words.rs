//! Saved word endpoints

use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use uuid::Uuid;

use crate::error::Result;
use crate::models::*;
use crate::routes::auth::AuthenticatedUser;
use crate::AppState;

/// GET /api/words
pub async fn list(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Query(query): Query<WordsQuery>,
) -> Result<Json<WordListResponse>> {
    let mut ws = auth.workspace(&state).await?;
    if query.refresh {
        ws.load(state.records.as_ref()).await?;
    } else {
        ws.ensure_loaded(state.records.as_ref()).await?;
    }

    let words: Vec<WordView> = ws
        .collection()
        .records()
        .iter()
        .cloned()
        .map(WordView::from)
        .collect();

    Ok(Json(WordListResponse {
        count: words.len(),
        words,
        events: ws.take_events(),
    }))
}

/// DELETE /api/words/{id}
pub async fn delete(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<DeleteWordResponse>> {
    let mut ws = auth.workspace(&state).await?;
    ws.ensure_loaded(state.records.as_ref()).await?;
    let deleted = ws.delete_word(state.records.as_ref(), id).await?;

    Ok(Json(DeleteWordResponse {
        deleted,
        count: ws.collection().len(),
        events: ws.take_events(),
    }))
}
