//! Handlers for the public `/api/incidents` endpoint.
//!
//! | Method | Notes |
//! |--------|-------|
//! | `GET`  | Visible incidents, newest-first, served through the read cache |
//! | `POST` | `{action:"vote_delete", incidentId}` registers a deletion vote; any other body is a creation submission |

use std::sync::Arc;

use axum::{
  Json,
  body::Body,
  extract::State,
  http::{StatusCode, Uri, header},
  response::{IntoResponse, Response},
};
use serde_json::{Value, json};

use faro_core::{incident::NewIncident, store::IncidentStore};

use crate::{AppState, cache::ReadCache, error::ApiError};

/// Path whose cache entries every write must invalidate.
pub const INCIDENTS_PATH: &str = "/api/incidents";

// ─── List ─────────────────────────────────────────────────────────────────────

/// `GET /api/incidents`
pub async fn list<S>(
  State(state): State<AppState<S>>,
  uri: Uri,
) -> Result<Response, ApiError>
where
  S: IncidentStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let key = uri.to_string();
  let ttl_secs = state.cache.ttl().as_secs();

  match state.cache.lookup(&key) {
    Ok(Some(body)) => return Ok(json_response(body, "HIT", ttl_secs)),
    Ok(None) => {}
    Err(e) => {
      tracing::warn!(error = %e, "cache lookup failed; serving from store");
    }
  }

  let incidents = state
    .store
    .list_visible()
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  let body =
    serde_json::to_vec(&incidents).map_err(|e| ApiError::Store(Box::new(e)))?;

  if let Err(e) = state.cache.insert(key, body.clone()) {
    tracing::warn!(error = %e, "cache insert failed; response served uncached");
  }

  Ok(json_response(body, "MISS", ttl_secs))
}

fn json_response(body: Vec<u8>, cache_status: &str, ttl_secs: u64) -> Response {
  Response::builder()
    .status(StatusCode::OK)
    .header(header::CONTENT_TYPE, "application/json")
    .header(header::CACHE_CONTROL, format!("public, max-age={ttl_secs}"))
    .header("x-cache", cache_status)
    .body(Body::from(body))
    .unwrap()
}

// ─── Write (create or vote) ───────────────────────────────────────────────────

/// `POST /api/incidents` — dispatches on the `action` field.
pub async fn write<S>(
  State(state): State<AppState<S>>,
  Json(body): Json<Value>,
) -> Result<Response, ApiError>
where
  S: IncidentStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  if body.get("action").and_then(Value::as_str) == Some("vote_delete") {
    vote(&state, &body).await
  } else {
    create(&state, &body).await
  }
}

async fn create<S>(
  state: &AppState<S>,
  body: &Value,
) -> Result<Response, ApiError>
where
  S: IncidentStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let input = NewIncident::from_json(body)?;

  let incident = state
    .store
    .create_incident(input)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;

  invalidate_read_cache(state.cache.clone());

  Ok(
    (
      StatusCode::CREATED,
      Json(json!({
        "success": true,
        "id": incident.id,
        "message": "Incident reported successfully",
      })),
    )
      .into_response(),
  )
}

async fn vote<S>(state: &AppState<S>, body: &Value) -> Result<Response, ApiError>
where
  S: IncidentStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let id = vote_target(body)?;

  let outcome = state
    .store
    .register_deletion_vote(id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?
    .ok_or_else(|| ApiError::NotFound(format!("incident {id} not found")))?;

  if outcome.crossed_threshold() {
    tracing::info!(
      incident = id,
      votes = outcome.deletion_votes,
      "incident hidden by community vote"
    );
  }

  invalidate_read_cache(state.cache.clone());

  Ok(
    (
      StatusCode::OK,
      Json(json!({
        "success": true,
        "deletion_votes": outcome.deletion_votes,
      })),
    )
      .into_response(),
  )
}

/// Clients send `incidentId` as either a number or a numeric string.
fn vote_target(body: &Value) -> Result<i64, ApiError> {
  let raw = body
    .get("incidentId")
    .ok_or_else(|| ApiError::Validation("incidentId is required".into()))?;

  match raw {
    Value::Number(n) => n.as_i64(),
    Value::String(s) => s.parse().ok(),
    _ => None,
  }
  .ok_or_else(|| ApiError::Validation("incidentId must be an integer".into()))
}

// ─── Cache invalidation ──────────────────────────────────────────────────────

/// Invalidate list-endpoint cache entries in the background. The write's
/// response never waits on cache teardown; the spawned task is guaranteed to
/// run, so an entry can outlive a write only until it expires.
pub(crate) fn invalidate_read_cache(cache: Arc<ReadCache>) {
  tokio::spawn(async move {
    match cache.invalidate_path(INCIDENTS_PATH) {
      Ok(removed) if removed > 0 => {
        tracing::debug!(entries = removed, "read cache invalidated");
      }
      Ok(_) => {}
      Err(e) => tracing::warn!(error = %e, "read cache invalidation failed"),
    }
  });
}
