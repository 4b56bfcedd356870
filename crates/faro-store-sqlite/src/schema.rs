//! SQL schema for the Faro SQLite store.
//!
//! Executed once at connection startup via `PRAGMA user_version`. Future
//! migrations will be gated on that version number.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

CREATE TABLE IF NOT EXISTS incidents (
    id             INTEGER PRIMARY KEY AUTOINCREMENT,
    category       TEXT NOT NULL,
    subcategory    TEXT NOT NULL,
    description    TEXT NOT NULL,
    urgent         INTEGER NOT NULL DEFAULT 0,   -- boolean as 0/1
    location       TEXT NOT NULL,                -- JSON {\"lat\":..,\"lng\":..}
    timestamp      TEXT NOT NULL,                -- ISO 8601 UTC; server-assigned
    visibility     INTEGER NOT NULL DEFAULT 1,   -- boolean as 0/1
    deletion_votes INTEGER NOT NULL DEFAULT 0
);

CREATE INDEX IF NOT EXISTS incidents_timestamp_idx  ON incidents(timestamp);
CREATE INDEX IF NOT EXISTS incidents_visibility_idx ON incidents(visibility);

PRAGMA user_version = 1;
";
