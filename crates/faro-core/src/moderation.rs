//! Community moderation policy.
//!
//! Anonymous "vote to remove" signals accumulate on an incident until a fixed
//! threshold hides it from the public read path. No single vote can hide
//! content on its own, and no human moderator is in the loop.
//!
//! Per incident the visibility dimension is a two-state machine:
//! VISIBLE (`deletion_votes < VOTE_THRESHOLD`) transitions to HIDDEN exactly
//! once, on the vote that crosses the threshold from below. Nothing defined
//! here moves HIDDEN back to VISIBLE. Votes on an already-hidden incident
//! still increment the counter but produce no further visible change.
//!
//! Voting is not idempotent: there is no per-voter identity, so duplicate
//! votes from the same origin are indistinguishable and all count.

/// Votes required before an incident is hidden. Fixed policy, not
/// configurable per incident.
pub const VOTE_THRESHOLD: i64 = 3;

/// Whether a vote count is enough to hide an incident.
pub fn hides(deletion_votes: i64) -> bool {
  deletion_votes >= VOTE_THRESHOLD
}

/// Result of registering one deletion vote.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VoteOutcome {
  /// The counter after the increment.
  pub deletion_votes: i64,
  /// Visibility after the vote was applied.
  pub hidden:         bool,
}

impl VoteOutcome {
  /// True when this vote was the one that crossed the threshold from below.
  /// Telemetry only; callers are not required to look at it.
  pub fn crossed_threshold(&self) -> bool {
    self.deletion_votes == VOTE_THRESHOLD
  }
}
