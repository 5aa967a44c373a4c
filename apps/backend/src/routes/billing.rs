//! Entitlement and checkout endpoints

use axum::{extract::State, Extension, Json};
use vocab_core::{product_by_price_id, CheckoutRequest, CoreError};

use crate::error::Result;
use crate::models::*;
use crate::routes::auth::AuthenticatedUser;
use crate::AppState;

/// GET /api/entitlement
pub async fn entitlement(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
) -> Result<Json<EntitlementResponse>> {
    let mut ws = auth.workspace(&state).await?;
    let snapshot = ws.refresh_entitlement(state.billing.as_ref()).await?;

    Ok(Json(EntitlementResponse::new(snapshot, ws.take_events())))
}

/// POST /api/checkout
/// Creates a hosted checkout session for a catalog price
pub async fn checkout(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Json(body): Json<CheckoutBody>,
) -> Result<Json<CheckoutResponse>> {
    let product = product_by_price_id(&body.price_id)
        .ok_or_else(|| CoreError::InvalidInput(format!("unknown price: {}", body.price_id)))?;

    let request = CheckoutRequest {
        price_id: product.price_id.to_string(),
        mode: product.mode,
        success_url: state.config.success_url(),
        cancel_url: state.config.cancel_url(),
    };

    let session = state
        .checkout
        .create_checkout_session(&request, &auth.session.access_token)
        .await?;

    tracing::info!(user_id = %auth.session.user_id, product = product.id, "checkout session created");

    Ok(Json(CheckoutResponse {
        session_id: session.session_id,
        url: session.url,
        mode: product.mode,
    }))
}
