//! The `IncidentStore` trait.
//!
//! The trait is implemented by storage backends (e.g. `faro-store-sqlite`).
//! Higher layers (`faro-server`) depend on this abstraction, not on any
//! concrete backend.

use std::future::Future;

use crate::{
  incident::{Incident, NewIncident},
  moderation::VoteOutcome,
};

/// Abstraction over a Faro incident store backend.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait IncidentStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Persist a validated submission. The store assigns `id` and `timestamp`
  /// and starts the record at `visibility = true`, `deletion_votes = 0`.
  fn create_incident(
    &self,
    input: NewIncident,
  ) -> impl Future<Output = Result<Incident, Self::Error>> + Send + '_;

  /// Retrieve a single incident by id. Returns `None` if not found.
  fn get_incident(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Option<Incident>, Self::Error>> + Send + '_;

  /// The public read path: visible incidents only
  /// (`visibility` true and `deletion_votes` below the threshold),
  /// ordered newest-first by timestamp.
  fn list_visible(
    &self,
  ) -> impl Future<Output = Result<Vec<Incident>, Self::Error>> + Send + '_;

  /// Every incident regardless of visibility, newest-first. Privileged
  /// callers only.
  fn list_all(
    &self,
  ) -> impl Future<Output = Result<Vec<Incident>, Self::Error>> + Send + '_;

  /// Apply one anonymous deletion vote: increment `deletion_votes` and hide
  /// the incident once the count reaches the threshold.
  ///
  /// The increment and the visibility flip must be applied atomically for
  /// the target incident — a concurrent vote on the same row must never be
  /// lost between the two — while votes on different incidents proceed
  /// independently. Returns `None` if the id does not exist, in which case
  /// nothing is written.
  fn register_deletion_vote(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Option<VoteOutcome>, Self::Error>> + Send + '_;

  /// Physically delete a record. Privileged administrative path; the public
  /// surface never deletes. Returns false if the id does not exist.
  fn delete_incident(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;
}
