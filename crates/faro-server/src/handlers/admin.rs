//! Privileged admin surface: login, full listing, physical delete.
//!
//! The public surface never deletes records; this is the separate,
//! token-guarded path that does.

use axum::{
  Json,
  extract::{Query, State},
  http::HeaderMap,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::{Value, json};

use faro_core::{incident::Incident, store::IncidentStore};

use crate::{
  AppState, auth,
  error::ApiError,
  handlers::incidents::invalidate_read_cache,
};

// ─── Login ────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct LoginBody {
  pub username: String,
  pub password: String,
}

/// `POST /api/admin/login` — body: `{"username": …, "password": …}`
pub async fn login<S>(
  State(state): State<AppState<S>>,
  Json(body): Json<LoginBody>,
) -> Result<Json<Value>, ApiError>
where
  S: IncidentStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  auth::verify_login(&state.admin, &body.username, &body.password)?;
  let token = auth::issue_token(&body.username, Utc::now());
  Ok(Json(json!({ "token": token })))
}

// ─── Full listing ─────────────────────────────────────────────────────────────

/// `GET /api/admin/incidents` — every record, hidden ones included.
pub async fn list<S>(
  State(state): State<AppState<S>>,
  headers: HeaderMap,
) -> Result<Json<Vec<Incident>>, ApiError>
where
  S: IncidentStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  auth::verify_bearer(&headers, &state.admin, Utc::now())?;

  let incidents = state
    .store
    .list_all()
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(incidents))
}

// ─── Delete ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct DeleteParams {
  pub id: Option<i64>,
}

/// `DELETE /api/admin/incidents?id=N`
pub async fn delete<S>(
  State(state): State<AppState<S>>,
  Query(params): Query<DeleteParams>,
  headers: HeaderMap,
) -> Result<Json<Value>, ApiError>
where
  S: IncidentStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  auth::verify_bearer(&headers, &state.admin, Utc::now())?;

  let id = params
    .id
    .ok_or_else(|| ApiError::Validation("incident id is required".into()))?;

  let deleted = state
    .store
    .delete_incident(id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  if !deleted {
    return Err(ApiError::NotFound(format!("incident {id} not found")));
  }

  invalidate_read_cache(state.cache.clone());

  Ok(Json(json!({ "success": true })))
}
