//! Product catalog endpoint

use axum::Json;
use vocab_core::PRODUCTS;

use crate::models::ProductListResponse;

/// GET /api/products
pub async fn list() -> Json<ProductListResponse> {
    Json(ProductListResponse { products: PRODUCTS })
}
