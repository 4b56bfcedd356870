//! [`SqliteStore`] — the SQLite implementation of [`IncidentStore`].

use std::path::Path;

use chrono::Utc;
use rusqlite::OptionalExtension as _;

use faro_core::{
  incident::{Incident, NewIncident},
  moderation::{VOTE_THRESHOLD, VoteOutcome},
  store::IncidentStore,
};

use crate::{
  Error, Result,
  encode::{RawIncident, encode_dt, encode_location},
  schema::SCHEMA,
};

const INCIDENT_COLUMNS: &str = "id, category, subcategory, description, \
   urgent, location, timestamp, visibility, deletion_votes";

fn row_to_raw(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawIncident> {
  Ok(RawIncident {
    id:             row.get(0)?,
    category:       row.get(1)?,
    subcategory:    row.get(2)?,
    description:    row.get(3)?,
    urgent:         row.get(4)?,
    location:       row.get(5)?,
    timestamp:      row.get(6)?,
    visibility:     row.get(7)?,
    deletion_votes: row.get(8)?,
  })
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Faro incident store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── IncidentStore impl ──────────────────────────────────────────────────────

impl IncidentStore for SqliteStore {
  type Error = Error;

  async fn create_incident(&self, input: NewIncident) -> Result<Incident> {
    let timestamp = Utc::now();

    let category     = input.category.clone();
    let subcategory  = input.subcategory.clone();
    let description  = input.description.clone();
    let urgent       = i64::from(input.urgent);
    let location_str = encode_location(&input.location)?;
    let at_str       = encode_dt(timestamp);

    let id: i64 = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO incidents
             (category, subcategory, description, urgent, location, timestamp)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
          rusqlite::params![
            category,
            subcategory,
            description,
            urgent,
            location_str,
            at_str,
          ],
        )?;
        Ok(conn.last_insert_rowid())
      })
      .await?;

    Ok(Incident {
      id,
      category:       input.category,
      subcategory:    input.subcategory,
      description:    input.description,
      urgent:         input.urgent,
      location:       input.location,
      timestamp,
      visibility:     true,
      deletion_votes: 0,
    })
  }

  async fn get_incident(&self, id: i64) -> Result<Option<Incident>> {
    let raw: Option<RawIncident> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {INCIDENT_COLUMNS} FROM incidents WHERE id = ?1"),
              rusqlite::params![id],
              row_to_raw,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawIncident::into_incident).transpose()
  }

  async fn list_visible(&self) -> Result<Vec<Incident>> {
    let raws: Vec<RawIncident> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {INCIDENT_COLUMNS} FROM incidents
           WHERE visibility = 1 AND deletion_votes < ?1
           ORDER BY timestamp DESC"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![VOTE_THRESHOLD], row_to_raw)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawIncident::into_incident).collect()
  }

  async fn list_all(&self) -> Result<Vec<Incident>> {
    let raws: Vec<RawIncident> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {INCIDENT_COLUMNS} FROM incidents ORDER BY timestamp DESC"
        ))?;
        let rows = stmt
          .query_map([], row_to_raw)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawIncident::into_incident).collect()
  }

  async fn register_deletion_vote(&self, id: i64) -> Result<Option<VoteOutcome>> {
    // Increment and threshold check in one conditional statement, so a
    // concurrent vote on the same incident can never land between them.
    // Once visibility drops to 0 no branch here ever sets it back.
    let updated: Option<(i64, i64)> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "UPDATE incidents
                 SET deletion_votes = deletion_votes + 1,
                     visibility = CASE
                       WHEN deletion_votes + 1 >= ?2 THEN 0
                       ELSE visibility
                     END
               WHERE id = ?1
               RETURNING deletion_votes, visibility",
              rusqlite::params![id, VOTE_THRESHOLD],
              |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()?,
        )
      })
      .await?;

    Ok(updated.map(|(deletion_votes, visibility)| VoteOutcome {
      deletion_votes,
      hidden: visibility == 0,
    }))
  }

  async fn delete_incident(&self, id: i64) -> Result<bool> {
    let affected = self
      .conn
      .call(move |conn| {
        Ok(conn.execute("DELETE FROM incidents WHERE id = ?1", rusqlite::params![id])?)
      })
      .await?;

    Ok(affected > 0)
  }
}
