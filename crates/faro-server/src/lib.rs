//! HTTP layer for the Faro incident map.
//!
//! Exposes an axum [`Router`] with the public incident API, the KML export
//! and the token-guarded admin surface, backed by any [`IncidentStore`].
//! Requests are handled independently; the store and the read cache are the
//! only shared state.

pub mod auth;
pub mod cache;
pub mod error;
pub mod handlers;

pub use error::ApiError;

use std::{path::PathBuf, sync::Arc, time::Duration};

use axum::{
  Router,
  routing::{get, post},
};
use serde::Deserialize;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use auth::AdminConfig;
use cache::ReadCache;
use faro_core::store::IncidentStore;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml`.
#[derive(Deserialize, Clone)]
pub struct ServerConfig {
  pub host:                String,
  pub port:                u16,
  pub store_path:          PathBuf,
  /// Freshness window of the public list cache, in seconds.
  #[serde(default = "default_cache_ttl_secs")]
  pub cache_ttl_secs:      u64,
  pub admin_username:      String,
  pub admin_password_hash: String,
}

fn default_cache_ttl_secs() -> u64 { 60 }

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all axum handlers.
#[derive(Clone)]
pub struct AppState<S: IncidentStore> {
  pub store: Arc<S>,
  pub cache: Arc<ReadCache>,
  pub admin: Arc<AdminConfig>,
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build an axum [`Router`] for the incident API.
///
/// CORS is fully permissive — the API is an anonymous public surface and the
/// original deployment serves browsers from arbitrary origins.
pub fn router<S>(state: AppState<S>) -> Router
where
  S: IncidentStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  Router::new()
    .route(
      "/api/incidents",
      get(handlers::incidents::list::<S>).post(handlers::incidents::write::<S>),
    )
    .route("/api/kml", get(handlers::kml::export::<S>))
    .route("/api/categories", get(handlers::categories::catalog))
    .route("/api/admin/login", post(handlers::admin::login::<S>))
    .route(
      "/api/admin/incidents",
      get(handlers::admin::list::<S>).delete(handlers::admin::delete::<S>),
    )
    .layer(TraceLayer::new_for_http())
    .layer(CorsLayer::permissive())
    .with_state(state)
}

/// Build the state for a store and config pair.
pub fn app_state<S>(store: S, config: &ServerConfig) -> AppState<S>
where
  S: IncidentStore,
{
  AppState {
    store: Arc::new(store),
    cache: Arc::new(ReadCache::new(Duration::from_secs(config.cache_ttl_secs))),
    admin: Arc::new(AdminConfig {
      username:      config.admin_username.clone(),
      password_hash: config.admin_password_hash.clone(),
    }),
  }
}

// ─── Integration tests ────────────────────────────────────────────────────────
