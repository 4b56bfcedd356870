//! KML export of the visible incident set.

use axum::{
  body::Body,
  extract::State,
  http::{StatusCode, header},
  response::Response,
};

use faro_core::store::IncidentStore;

use crate::{AppState, error::ApiError};

/// `GET /api/kml` — the same visibility filter as the public list, rendered
/// as a downloadable KML document.
pub async fn export<S>(State(state): State<AppState<S>>) -> Result<Response, ApiError>
where
  S: IncidentStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let incidents = state
    .store
    .list_visible()
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;

  let kml = faro_kml::render(&incidents);

  Ok(
    Response::builder()
      .status(StatusCode::OK)
      .header(header::CONTENT_TYPE, "application/vnd.google-earth.kml+xml")
      .header(
        header::CONTENT_DISPOSITION,
        "attachment; filename=incidencias.kml",
      )
      .body(Body::from(kml))
      .unwrap(),
  )
}
