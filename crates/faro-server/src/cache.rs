//! In-process read cache for the public list endpoint.
//!
//! One entry per distinct request URL (path + query string), holding the
//! serialized response body with a fixed TTL. Writes invalidate entries for
//! the affected path as a background action; a stale entry can therefore be
//! observed briefly after a write, but never past its TTL.
//!
//! Every method degrades instead of failing the request: on any
//! [`CacheError`] the caller falls through to the store.

use std::{
  collections::HashMap,
  sync::Mutex,
  time::{Duration, Instant},
};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CacheError {
  #[error("cache lock poisoned")]
  Poisoned,
}

struct CacheEntry {
  body:        Vec<u8>,
  inserted_at: Instant,
}

/// URL-keyed response cache with a fixed time-to-live.
pub struct ReadCache {
  ttl:     Duration,
  entries: Mutex<HashMap<String, CacheEntry>>,
}

impl ReadCache {
  pub fn new(ttl: Duration) -> Self {
    Self { ttl, entries: Mutex::new(HashMap::new()) }
  }

  pub fn ttl(&self) -> Duration { self.ttl }

  /// Exact-URL lookup. Expired entries are evicted and reported as a miss —
  /// an entry can never be served past its TTL.
  pub fn lookup(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError> {
    let mut entries = self.entries.lock().map_err(|_| CacheError::Poisoned)?;
    let fresh = match entries.get(key) {
      Some(entry) if entry.inserted_at.elapsed() < self.ttl => {
        Some(entry.body.clone())
      }
      Some(_) => None,
      None => return Ok(None),
    };
    if fresh.is_none() {
      entries.remove(key);
    }
    Ok(fresh)
  }

  /// Store a response body under its request URL. Expired entries from other
  /// URLs are purged on the way in to bound growth.
  pub fn insert(&self, key: String, body: Vec<u8>) -> Result<(), CacheError> {
    let mut entries = self.entries.lock().map_err(|_| CacheError::Poisoned)?;
    entries.retain(|_, entry| entry.inserted_at.elapsed() < self.ttl);
    entries.insert(key, CacheEntry { body, inserted_at: Instant::now() });
    Ok(())
  }

  /// Drop every entry whose URL path matches `path`, regardless of query
  /// string. Returns the number of entries removed.
  pub fn invalidate_path(&self, path: &str) -> Result<usize, CacheError> {
    let mut entries = self.entries.lock().map_err(|_| CacheError::Poisoned)?;
    let before = entries.len();
    entries.retain(|key, _| key.split('?').next() != Some(path));
    Ok(before - entries.len())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn lookup_returns_inserted_body() {
    let cache = ReadCache::new(Duration::from_secs(60));
    cache.insert("/api/incidents".into(), b"[]".to_vec()).unwrap();
    assert_eq!(cache.lookup("/api/incidents").unwrap(), Some(b"[]".to_vec()));
    assert_eq!(cache.lookup("/api/other").unwrap(), None);
  }

  #[test]
  fn zero_ttl_expires_immediately() {
    let cache = ReadCache::new(Duration::ZERO);
    cache.insert("/api/incidents".into(), b"[]".to_vec()).unwrap();
    assert_eq!(cache.lookup("/api/incidents").unwrap(), None);
  }

  #[test]
  fn invalidate_path_ignores_query_string() {
    let cache = ReadCache::new(Duration::from_secs(60));
    cache.insert("/api/incidents".into(), b"a".to_vec()).unwrap();
    cache
      .insert("/api/incidents?page=2".into(), b"b".to_vec())
      .unwrap();
    cache.insert("/api/kml".into(), b"c".to_vec()).unwrap();

    let removed = cache.invalidate_path("/api/incidents").unwrap();
    assert_eq!(removed, 2);
    assert_eq!(cache.lookup("/api/incidents").unwrap(), None);
    assert_eq!(cache.lookup("/api/incidents?page=2").unwrap(), None);
    assert_eq!(cache.lookup("/api/kml").unwrap(), Some(b"c".to_vec()));
  }

  #[test]
  fn invalidate_unknown_path_is_a_noop() {
    let cache = ReadCache::new(Duration::from_secs(60));
    cache.insert("/api/incidents".into(), b"a".to_vec()).unwrap();
    assert_eq!(cache.invalidate_path("/api/nada").unwrap(), 0);
    assert!(cache.lookup("/api/incidents").unwrap().is_some());
  }
}
