//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as RFC 3339 strings. The location pair is stored as
//! compact JSON so `json_extract` keeps working for ad-hoc queries. Booleans
//! (`urgent`, `visibility`) are stored as INTEGER 0/1.

use chrono::{DateTime, Utc};
use faro_core::incident::{Incident, Location};

use crate::{Error, Result};

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Location ────────────────────────────────────────────────────────────────

pub fn encode_location(location: &Location) -> Result<String> {
  Ok(serde_json::to_string(location)?)
}

pub fn decode_location(s: &str) -> Result<Location> {
  Ok(serde_json::from_str(s)?)
}

// ─── Row type ────────────────────────────────────────────────────────────────

/// Raw values read directly from an `incidents` row.
pub struct RawIncident {
  pub id:             i64,
  pub category:       String,
  pub subcategory:    String,
  pub description:    String,
  pub urgent:         i64,
  pub location:       String,
  pub timestamp:      String,
  pub visibility:     i64,
  pub deletion_votes: i64,
}

impl RawIncident {
  pub fn into_incident(self) -> Result<Incident> {
    Ok(Incident {
      id:             self.id,
      category:       self.category,
      subcategory:    self.subcategory,
      description:    self.description,
      urgent:         self.urgent != 0,
      location:       decode_location(&self.location)?,
      timestamp:      decode_dt(&self.timestamp)?,
      visibility:     self.visibility != 0,
      deletion_votes: self.deletion_votes,
    })
  }
}
