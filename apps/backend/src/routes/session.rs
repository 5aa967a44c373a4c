//! Session endpoints

use axum::{extract::State, Extension, Json};

use crate::error::Result;
use crate::models::{SessionResponse, SignOutResponse};
use crate::routes::auth::AuthenticatedUser;
use crate::AppState;

/// GET /api/session
pub async fn current(Extension(auth): Extension<AuthenticatedUser>) -> Json<SessionResponse> {
    Json(SessionResponse {
        user_id: auth.session.user_id,
        email: auth.session.email,
    })
}

/// POST /api/session/sign-out
/// Ends the session and discards the user's workspace
pub async fn sign_out(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
) -> Result<Json<SignOutResponse>> {
    let user_id = auth.session.user_id;
    state.auth.sign_out(&auth.session.access_token).await?;
    state.sessions.publish(user_id, None);

    tracing::info!(%user_id, "signed out");

    Ok(Json(SignOutResponse { signed_out: true }))
}
