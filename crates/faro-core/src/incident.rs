//! Incident — a single user-submitted, location-tagged report.
//!
//! The record is created once by a public submission and afterwards mutated
//! only by anonymous deletion votes (see [`crate::moderation`]). There is no
//! update path for category or description after creation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Author-supplied coordinates. Stored as opaque structured data; no
/// geographic validation is applied beyond "both fields are numbers".
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
  pub lat: f64,
  pub lng: f64,
}

/// A persisted incident report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Incident {
  /// Assigned by the store on creation; immutable.
  pub id:             i64,
  pub category:       String,
  pub subcategory:    String,
  pub description:    String,
  pub urgent:         bool,
  pub location:       Location,
  /// Set by the store at insert time; immutable.
  pub timestamp:      DateTime<Utc>,
  /// False once the community has voted the incident off the map.
  pub visibility:     bool,
  pub deletion_votes: i64,
}

/// A validated submission, ready for the store to persist.
///
/// `id`, `timestamp`, `visibility` and `deletion_votes` are assigned by the
/// store, not the submitter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewIncident {
  pub category:    String,
  pub subcategory: String,
  pub description: String,
  #[serde(default)]
  pub urgent:      bool,
  pub location:    Location,
}

impl NewIncident {
  /// Validate a raw JSON submission body.
  ///
  /// `category`, `subcategory` and `description` must be present, non-empty
  /// strings; `location.lat` and `location.lng` must be numbers. `urgent` is
  /// an optional boolean defaulting to false. Category and subcategory are
  /// NOT checked against the catalog — the taxonomy is supplied externally
  /// and unknown keys are allowed through.
  pub fn from_json(body: &serde_json::Value) -> Result<Self> {
    let category = required_string(body, "category")?;
    let subcategory = required_string(body, "subcategory")?;
    let description = required_string(body, "description")?;

    let location = body
      .get("location")
      .ok_or_else(|| Error::Validation("missing required fields".into()))?;
    let lat = location.get("lat").and_then(serde_json::Value::as_f64);
    let lng = location.get("lng").and_then(serde_json::Value::as_f64);
    let (Some(lat), Some(lng)) = (lat, lng) else {
      return Err(Error::Validation("invalid location format".into()));
    };

    let urgent = body
      .get("urgent")
      .and_then(serde_json::Value::as_bool)
      .unwrap_or(false);

    Ok(Self {
      category,
      subcategory,
      description,
      urgent,
      location: Location { lat, lng },
    })
  }
}

fn required_string(body: &serde_json::Value, field: &str) -> Result<String> {
  body
    .get(field)
    .and_then(serde_json::Value::as_str)
    .filter(|s| !s.is_empty())
    .map(str::to_owned)
    .ok_or_else(|| Error::Validation("missing required fields".into()))
}
