//! Authentication middleware

use axum::{
    body::Body,
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use tokio::sync::OwnedMutexGuard;
use vocab_core::{CoreError, Session, VocabularyWorkspace};

use crate::error::{ApiError, Result};
use crate::AppState;

/// Authenticated session stored in request extensions
#[derive(Clone, Debug)]
pub struct AuthenticatedUser {
    pub session: Session,
}

impl AuthenticatedUser {
    /// Lock this user's workspace for the rest of the request.
    pub async fn workspace(&self, state: &AppState) -> Result<OwnedMutexGuard<VocabularyWorkspace>> {
        let workspace = state.workspaces.acquire(&self.session).await;
        if workspace.is_torn_down() {
            return Err(CoreError::Discarded.into());
        }
        Ok(workspace)
    }
}

/// Auth middleware - resolves the bearer token with the session provider
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response> {
    // Extract Bearer token
    let auth_header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| ApiError::Unauthorized("Missing Authorization header".to_string()))?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .filter(|t| !t.is_empty())
        .ok_or_else(|| ApiError::Unauthorized("Invalid Authorization format".to_string()))?
        .to_string();

    let session = state
        .auth
        .current_session(&token)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Invalid or expired session".to_string()))?;

    if state.sessions.publish(session.user_id, Some(session.clone())) {
        tracing::debug!(user_id = %session.user_id, "session resolved");
    }

    request
        .extensions_mut()
        .insert(AuthenticatedUser { session });

    Ok(next.run(request).await)
}
