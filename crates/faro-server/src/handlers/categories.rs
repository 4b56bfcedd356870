//! Category catalog endpoint.

use axum::Json;
use serde_json::Value;

/// `GET /api/categories` — the bundled taxonomy metadata clients use to
/// label and style markers.
pub async fn catalog() -> Json<Value> {
  Json(faro_core::catalog::catalog_json())
}
