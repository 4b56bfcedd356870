//! Admin login and bearer-token verification.
//!
//! The password is checked against an argon2 PHC hash from the config. A
//! successful login issues a base64 `username:timestamp_millis` token valid
//! for 24 hours; admin endpoints require it as `Authorization: Bearer …`.

use argon2::{Argon2, PasswordHash, PasswordVerifier};
use axum::http::HeaderMap;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as B64;
use chrono::{DateTime, Utc};

use crate::error::ApiError;

/// Credentials accepted for the admin surface of this server instance.
#[derive(Clone)]
pub struct AdminConfig {
  pub username:      String,
  /// PHC string produced by argon2, e.g. `$argon2id$v=19$…`
  pub password_hash: String,
}

const TOKEN_TTL_MILLIS: i64 = 24 * 60 * 60 * 1000;

/// Check a login attempt against the configured credentials.
pub fn verify_login(
  config: &AdminConfig,
  username: &str,
  password: &str,
) -> Result<(), ApiError> {
  if username != config.username {
    return Err(ApiError::Unauthorized);
  }

  let parsed_hash = PasswordHash::new(&config.password_hash)
    .map_err(|_| ApiError::Unauthorized)?;

  Argon2::default()
    .verify_password(password.as_bytes(), &parsed_hash)
    .map_err(|_| ApiError::Unauthorized)?;

  Ok(())
}

/// Mint a token for a freshly authenticated admin.
pub fn issue_token(username: &str, now: DateTime<Utc>) -> String {
  B64.encode(format!("{username}:{}", now.timestamp_millis()))
}

/// Verify the `Authorization: Bearer` header of an admin request.
pub fn verify_bearer(
  headers: &HeaderMap,
  config: &AdminConfig,
  now: DateTime<Utc>,
) -> Result<(), ApiError> {
  let header_val = headers
    .get(axum::http::header::AUTHORIZATION)
    .and_then(|v| v.to_str().ok())
    .ok_or(ApiError::Unauthorized)?;

  let encoded = header_val
    .strip_prefix("Bearer ")
    .ok_or(ApiError::Unauthorized)?;

  let decoded = B64.decode(encoded).map_err(|_| ApiError::Unauthorized)?;
  let token = std::str::from_utf8(&decoded).map_err(|_| ApiError::Unauthorized)?;

  let (username, millis_str) =
    token.split_once(':').ok_or(ApiError::Unauthorized)?;
  let issued_millis: i64 =
    millis_str.parse().map_err(|_| ApiError::Unauthorized)?;

  if now.timestamp_millis() - issued_millis > TOKEN_TTL_MILLIS {
    return Err(ApiError::Unauthorized);
  }
  if username != config.username {
    return Err(ApiError::Unauthorized);
  }

  Ok(())
}
