//! Integration tests for `SqliteStore` against an in-memory database.

use faro_core::{
  incident::{Location, NewIncident},
  moderation::VOTE_THRESHOLD,
  store::IncidentStore,
};

use crate::SqliteStore;

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn submission(description: &str) -> NewIncident {
  NewIncident {
    category:    "servicios".into(),
    subcategory: "centro_salud".into(),
    description: description.into(),
    urgent:      false,
    location:    Location { lat: -38.7, lng: -62.26 },
  }
}

// ─── Creation ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn create_assigns_defaults() {
  let s = store().await;

  let incident = s.create_incident(submission("x")).await.unwrap();
  assert!(incident.id > 0);
  assert!(incident.visibility);
  assert_eq!(incident.deletion_votes, 0);
  assert!(!incident.urgent);

  let fetched = s.get_incident(incident.id).await.unwrap().unwrap();
  assert_eq!(fetched.category, "servicios");
  assert_eq!(fetched.subcategory, "centro_salud");
  assert_eq!(fetched.description, "x");
  assert_eq!(fetched.location, Location { lat: -38.7, lng: -62.26 });
  assert_eq!(fetched.timestamp, incident.timestamp);
}

#[tokio::test]
async fn get_incident_missing_returns_none() {
  let s = store().await;
  assert!(s.get_incident(9999).await.unwrap().is_none());
}

#[tokio::test]
async fn create_then_list_round_trip() {
  let s = store().await;
  s.create_incident(submission("x")).await.unwrap();

  let visible = s.list_visible().await.unwrap();
  assert_eq!(visible.len(), 1);
  let incident = &visible[0];
  assert_eq!(incident.category, "servicios");
  assert_eq!(incident.subcategory, "centro_salud");
  assert_eq!(incident.description, "x");
  assert_eq!(incident.deletion_votes, 0);
  assert!(!incident.urgent);
}

#[tokio::test]
async fn list_visible_is_newest_first() {
  let s = store().await;
  let first = s.create_incident(submission("older")).await.unwrap();
  let second = s.create_incident(submission("newer")).await.unwrap();
  assert!(second.timestamp >= first.timestamp);

  let visible = s.list_visible().await.unwrap();
  assert_eq!(visible.len(), 2);
  assert_eq!(visible[0].description, "newer");
  assert_eq!(visible[1].description, "older");
}

// ─── Deletion votes ──────────────────────────────────────────────────────────

#[tokio::test]
async fn vote_below_threshold_keeps_visible() {
  let s = store().await;
  let incident = s.create_incident(submission("x")).await.unwrap();

  for expected in 1..VOTE_THRESHOLD {
    let outcome = s
      .register_deletion_vote(incident.id)
      .await
      .unwrap()
      .unwrap();
    assert_eq!(outcome.deletion_votes, expected);
    assert!(!outcome.hidden);
    assert!(!outcome.crossed_threshold());
  }

  let fetched = s.get_incident(incident.id).await.unwrap().unwrap();
  assert!(fetched.visibility);
  assert_eq!(fetched.deletion_votes, VOTE_THRESHOLD - 1);
}

#[tokio::test]
async fn threshold_vote_hides_incident() {
  let s = store().await;
  let incident = s.create_incident(submission("x")).await.unwrap();

  for _ in 0..VOTE_THRESHOLD - 1 {
    s.register_deletion_vote(incident.id).await.unwrap();
  }
  let outcome = s
    .register_deletion_vote(incident.id)
    .await
    .unwrap()
    .unwrap();
  assert_eq!(outcome.deletion_votes, VOTE_THRESHOLD);
  assert!(outcome.hidden);
  assert!(outcome.crossed_threshold());

  assert!(s.list_visible().await.unwrap().is_empty());
  let fetched = s.get_incident(incident.id).await.unwrap().unwrap();
  assert!(!fetched.visibility);
}

#[tokio::test]
async fn votes_after_hiding_still_count_and_never_unhide() {
  let s = store().await;
  let incident = s.create_incident(submission("x")).await.unwrap();

  for _ in 0..VOTE_THRESHOLD {
    s.register_deletion_vote(incident.id).await.unwrap();
  }

  let outcome = s
    .register_deletion_vote(incident.id)
    .await
    .unwrap()
    .unwrap();
  assert_eq!(outcome.deletion_votes, VOTE_THRESHOLD + 1);
  assert!(outcome.hidden);
  assert!(!outcome.crossed_threshold());

  let fetched = s.get_incident(incident.id).await.unwrap().unwrap();
  assert!(!fetched.visibility);
}

#[tokio::test]
async fn vote_on_unknown_id_is_none_and_writes_nothing() {
  let s = store().await;
  let incident = s.create_incident(submission("x")).await.unwrap();

  let outcome = s.register_deletion_vote(incident.id + 100).await.unwrap();
  assert!(outcome.is_none());

  // The only record is untouched.
  let fetched = s.get_incident(incident.id).await.unwrap().unwrap();
  assert_eq!(fetched.deletion_votes, 0);
  assert!(fetched.visibility);
  assert_eq!(s.list_all().await.unwrap().len(), 1);
}

#[tokio::test]
async fn concurrent_votes_lose_none() {
  let s = store().await;
  let incident = s.create_incident(submission("x")).await.unwrap();

  let mut tasks = Vec::new();
  for _ in 0..5 {
    let s = s.clone();
    let id = incident.id;
    tasks.push(tokio::spawn(async move {
      s.register_deletion_vote(id).await.unwrap().unwrap()
    }));
  }
  for task in tasks {
    task.await.unwrap();
  }

  let fetched = s.get_incident(incident.id).await.unwrap().unwrap();
  assert_eq!(fetched.deletion_votes, 5);
  assert!(!fetched.visibility);
}

// ─── Visibility filter ───────────────────────────────────────────────────────

#[tokio::test]
async fn hidden_incidents_are_excluded_from_visible_list() {
  let s = store().await;
  let kept = s.create_incident(submission("kept")).await.unwrap();
  let hidden = s.create_incident(submission("hidden")).await.unwrap();

  for _ in 0..VOTE_THRESHOLD {
    s.register_deletion_vote(hidden.id).await.unwrap();
  }

  let visible = s.list_visible().await.unwrap();
  assert_eq!(visible.len(), 1);
  assert_eq!(visible[0].id, kept.id);

  // The privileged view still sees both.
  let all = s.list_all().await.unwrap();
  assert_eq!(all.len(), 2);
  assert!(all.iter().any(|i| i.id == hidden.id && !i.visibility));
}

// ─── Administrative delete ───────────────────────────────────────────────────

#[tokio::test]
async fn delete_removes_record() {
  let s = store().await;
  let incident = s.create_incident(submission("x")).await.unwrap();

  assert!(s.delete_incident(incident.id).await.unwrap());
  assert!(s.get_incident(incident.id).await.unwrap().is_none());
}

#[tokio::test]
async fn delete_unknown_id_returns_false() {
  let s = store().await;
  assert!(!s.delete_incident(12345).await.unwrap());
}
