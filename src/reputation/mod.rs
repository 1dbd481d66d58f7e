//! Reputation scoring.
//!
//! Converts a user's [`ActivityCounts`] into weighted points and a
//! [`ReputationLevel`]:
//!
//! | Activity | Points each |
//! |---|---|
//! | Item submitted | 50 |
//! | Vote cast | 2 |
//! | Comment authored | 5 |
//! | Collection created | 25 |
//! | Vote received | 3 |
//!
//! Achievement bonuses are added on top. The computation is total and
//! idempotent: the same counts and bonus always give the same points and level.

pub mod types;

pub use types::{ActivityCounts, ActivityKind, PointBreakdown, ReputationLevel, UserReputation};

use crate::types::{Timestamp, UserId};

/// Points per submitted item.
pub const POINTS_PER_SUBMISSION: u64 = 50;

/// Points per vote cast.
pub const POINTS_PER_VOTE_CAST: u64 = 2;

/// Points per comment.
pub const POINTS_PER_COMMENT: u64 = 5;

/// Points per collection.
pub const POINTS_PER_COLLECTION: u64 = 25;

/// Points per up vote received.
pub const POINTS_PER_VOTE_RECEIVED: u64 = 3;

/// Weighs activity counts into a point breakdown.
pub fn breakdown(counts: &ActivityCounts, achievement_bonus: u64) -> PointBreakdown {
    PointBreakdown {
        submission: counts.submissions.saturating_mul(POINTS_PER_SUBMISSION),
        voting: counts.votes_cast.saturating_mul(POINTS_PER_VOTE_CAST),
        commenting: counts.comments.saturating_mul(POINTS_PER_COMMENT),
        curation: counts.collections.saturating_mul(POINTS_PER_COLLECTION),
        recognition: counts.votes_received.saturating_mul(POINTS_PER_VOTE_RECEIVED),
        achievement_bonus,
    }
}

/// Computes a user's reputation from counts and granted achievement points.
pub fn compute_reputation(
    user_id: &UserId,
    counts: ActivityCounts,
    achievement_bonus: u64,
    computed_at: Timestamp,
) -> UserReputation {
    let breakdown = breakdown(&counts, achievement_bonus);
    let total_points = breakdown.total();
    UserReputation {
        user_id: user_id.clone(),
        counts,
        breakdown,
        total_points,
        level: ReputationLevel::for_points(total_points),
        computed_at,
    }
}
