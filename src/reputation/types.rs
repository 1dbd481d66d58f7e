//! Data types for reputation.

use serde::{Deserialize, Serialize};

use crate::types::{Timestamp, UserId};

/// Per-user activity counts, gathered from facts.
///
/// Every field defaults to zero, so a user with no activity is a valid input.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityCounts {
    /// Items the user submitted.
    pub submissions: u64,
    /// Votes the user cast (either polarity).
    pub votes_cast: u64,
    /// Comments the user wrote.
    pub comments: u64,
    /// Collections the user created.
    pub collections: u64,
    /// Up votes other users gave to the user's items.
    pub votes_received: u64,
}

/// The user action that prompted a recomputation.
///
/// Informational only: recomputation is always wholesale.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActivityKind {
    /// An item was submitted.
    Submission,
    /// A vote was cast or removed.
    Vote,
    /// A comment was posted.
    Comment,
    /// A collection was created.
    Collection,
}

/// Reputation points split by category.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointBreakdown {
    /// From submitted items.
    pub submission: u64,
    /// From votes cast.
    pub voting: u64,
    /// From comments written.
    pub commenting: u64,
    /// From collections created.
    pub curation: u64,
    /// From up votes received on owned items.
    pub recognition: u64,
    /// From achievement grants.
    pub achievement_bonus: u64,
}

impl PointBreakdown {
    /// Sum of all categories.
    pub fn total(&self) -> u64 {
        [
            self.submission,
            self.voting,
            self.commenting,
            self.curation,
            self.recognition,
            self.achievement_bonus,
        ]
        .iter()
        .fold(0u64, |acc, points| acc.saturating_add(*points))
    }
}

/// Discrete reputation band.
///
/// Variants are declared in ascending order so `Ord` follows rank.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ReputationLevel {
    /// 0–99 points.
    Newcomer,
    /// 100–499 points.
    Contributor,
    /// 500–1499 points.
    Expert,
    /// 1500–4999 points.
    Veteran,
    /// 5000+ points.
    Legend,
}

impl ReputationLevel {
    /// All levels in ascending order.
    pub const ALL: [ReputationLevel; 5] = [
        Self::Newcomer,
        Self::Contributor,
        Self::Expert,
        Self::Veteran,
        Self::Legend,
    ];

    /// Lowest point total that reaches this level.
    pub const fn min_points(self) -> u64 {
        match self {
            Self::Newcomer => 0,
            Self::Contributor => 100,
            Self::Expert => 500,
            Self::Veteran => 1500,
            Self::Legend => 5000,
        }
    }

    /// The level whose band contains `points`.
    pub fn for_points(points: u64) -> Self {
        Self::ALL
            .iter()
            .rev()
            .copied()
            .find(|level| points >= level.min_points())
            .unwrap_or(Self::Newcomer)
    }

    /// Display name.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Newcomer => "newcomer",
            Self::Contributor => "contributor",
            Self::Expert => "expert",
            Self::Veteran => "veteran",
            Self::Legend => "legend",
        }
    }
}

/// A user's derived reputation.
///
/// Always a pure function of current facts plus granted achievement
/// points; it is recomputed from scratch and overwritten, never patched.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserReputation {
    /// Whose reputation this is.
    pub user_id: UserId,

    /// The counts the points were derived from.
    pub counts: ActivityCounts,

    /// Points by category.
    pub breakdown: PointBreakdown,

    /// Sum of the breakdown.
    pub total_points: u64,

    /// Band for `total_points`.
    pub level: ReputationLevel,

    /// When this value was computed.
    pub computed_at: Timestamp,
}
