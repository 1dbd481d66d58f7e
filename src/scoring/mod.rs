//! Trending and hot scoring for item listings.
//!
//! Scores exist only to order items against each other; they carry no
//! meaning as absolute values.
//!
//! # Trending
//!
//! ```text
//! score = 10 * votes_last_24h
//!       + 3  * votes_last_7d
//!       + 5  * comments_last_24h
//!       + 1  * total_votes
//!       + recency_bonus
//!
//! recency_bonus = (168 - age_hours) / 10   while age_hours <= 168, else 0
//! ```
//!
//! Ties: higher score, then more votes in the last 24h, then newer item.
//!
//! # Hot
//!
//! `total_votes * ln(age_hours + 2)`. Ties: higher score, then newer item.
//!
//! The remaining modes (newest, most voted, alphabetical) are direct
//! field sorts over the item record and need no facts.

mod filter;

pub use filter::RankQuery;

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::item::Item;
use crate::types::Timestamp;

/// Smallest page size a listing returns.
pub const MIN_RANK_LIMIT: usize = 1;

/// Largest page size a listing returns.
pub const MAX_RANK_LIMIT: usize = 50;

/// Points per up vote in the last 24 hours.
pub const WEIGHT_VOTES_24H: f64 = 10.0;

/// Points per up vote in the last 7 days.
pub const WEIGHT_VOTES_7D: f64 = 3.0;

/// Points per comment in the last 24 hours.
pub const WEIGHT_COMMENTS_24H: f64 = 5.0;

/// Points per up vote, all time.
pub const WEIGHT_TOTAL_VOTES: f64 = 1.0;

/// Age after which an item stops earning a recency bonus (7 days).
pub const RECENCY_WINDOW_HOURS: f64 = 168.0;

/// Divisor applied to the remaining recency hours.
pub const RECENCY_DIVISOR: f64 = 10.0;

/// Ordering applied to a listing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SortMode {
    /// Multi-factor recent-engagement score.
    Trending,
    /// Time-weighted popularity. The default listing.
    #[default]
    Hot,
    /// Most recently submitted first.
    Newest,
    /// Highest vote counter first.
    MostVoted,
    /// By name, A to Z.
    Alphabetical,
}

impl SortMode {
    /// Parses a request parameter.
    ///
    /// Unrecognized values fall back to [`SortMode::Hot`] instead of failing.
    pub fn from_param(param: &str) -> Self {
        match param.trim().to_ascii_lowercase().as_str() {
            "trending" => Self::Trending,
            "hot" | "default" | "" => Self::Hot,
            "newest" | "new" => Self::Newest,
            "most_voted" | "most-voted" | "top" => Self::MostVoted,
            "alphabetical" | "az" | "name" => Self::Alphabetical,
            other => {
                warn!(mode = other, "Unrecognized sort mode, using hot");
                Self::Hot
            }
        }
    }

    /// Returns the canonical parameter string.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Trending => "trending",
            Self::Hot => "hot",
            Self::Newest => "newest",
            Self::MostVoted => "most_voted",
            Self::Alphabetical => "alphabetical",
        }
    }

    /// Returns true if this mode scores items from engagement facts.
    pub const fn needs_signals(&self) -> bool {
        matches!(self, Self::Trending | Self::Hot)
    }
}

/// Engagement counts for one item, taken from facts at a point in time.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngagementSignals {
    /// Up votes in the last 24 hours.
    pub votes_last_24h: u64,
    /// Up votes in the last 7 days (includes the last 24 hours).
    pub votes_last_7d: u64,
    /// Comments in the last 24 hours.
    pub comments_last_24h: u64,
    /// Up votes, all time.
    pub total_votes: u64,
}

/// Recency bonus for an item of the given age. Never negative.
pub fn recency_bonus(age_hours: f64) -> f64 {
    if age_hours <= RECENCY_WINDOW_HOURS {
        ((RECENCY_WINDOW_HOURS - age_hours) / RECENCY_DIVISOR).max(0.0)
    } else {
        0.0
    }
}

/// Trending score for an item created at `created_at`, evaluated at `now`.
///
/// A creation time in the future is treated as age zero.
pub fn trending_score(signals: &EngagementSignals, created_at: Timestamp, now: Timestamp) -> f64 {
    let age_hours = now.hours_since(created_at);
    WEIGHT_VOTES_24H * signals.votes_last_24h as f64
        + WEIGHT_VOTES_7D * signals.votes_last_7d as f64
        + WEIGHT_COMMENTS_24H * signals.comments_last_24h as f64
        + WEIGHT_TOTAL_VOTES * signals.total_votes as f64
        + recency_bonus(age_hours)
}

/// Hot score: `total_votes * ln(age_hours + 2)`.
pub fn hot_score(signals: &EngagementSignals, created_at: Timestamp, now: Timestamp) -> f64 {
    let age_hours = now.hours_since(created_at);
    signals.total_votes as f64 * (age_hours + 2.0).ln()
}

/// Clamps a requested page size to `[1, 50]`, using `default` when absent.
pub fn clamp_limit(requested: Option<usize>, default: usize) -> usize {
    requested
        .unwrap_or(default)
        .clamp(MIN_RANK_LIMIT, MAX_RANK_LIMIT)
}

/// An item waiting to be ordered.
#[derive(Clone, Debug)]
pub struct RankCandidate {
    /// The item record.
    pub item: Item,
    /// Fact-derived counts; `None` for modes that don't score.
    pub signals: Option<EngagementSignals>,
}

/// One row of a ranked listing.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RankedItem {
    /// The item record.
    pub item: Item,
    /// Score for trending and hot listings; `None` for field sorts.
    pub score: Option<f64>,
    /// The counts the score was computed from, when gathered.
    pub signals: Option<EngagementSignals>,
}

/// Orders candidates for `mode` and keeps the first `limit`.
///
/// `limit` is clamped to `[1, 50]`. The ordering is total: every tie chain
/// ends on the item ID, so equal inputs always produce equal listings.
pub fn rank_candidates(
    candidates: Vec<RankCandidate>,
    mode: SortMode,
    limit: usize,
    now: Timestamp,
) -> Vec<RankedItem> {
    let limit = limit.clamp(MIN_RANK_LIMIT, MAX_RANK_LIMIT);

    let mut ranked: Vec<RankedItem> = candidates
        .into_iter()
        .map(|candidate| {
            let score = match mode {
                SortMode::Trending => Some(trending_score(
                    &candidate.signals.unwrap_or_default(),
                    candidate.item.created_at,
                    now,
                )),
                SortMode::Hot => Some(hot_score(
                    &candidate.signals.unwrap_or_default(),
                    candidate.item.created_at,
                    now,
                )),
                _ => None,
            };
            RankedItem {
                item: candidate.item,
                score,
                signals: candidate.signals,
            }
        })
        .collect();

    ranked.sort_by(|a, b| compare(mode, a, b));
    ranked.truncate(limit);
    ranked
}

/// Comparator for `mode`; `Less` means `a` is listed first.
pub fn compare(mode: SortMode, a: &RankedItem, b: &RankedItem) -> Ordering {
    let by_score = || {
        let sa = a.score.unwrap_or(0.0);
        let sb = b.score.unwrap_or(0.0);
        sb.total_cmp(&sa)
    };
    let newer_first = || b.item.created_at.cmp(&a.item.created_at);
    let by_id = || a.item.id.cmp(&b.item.id);

    match mode {
        SortMode::Trending => {
            let v24 = |r: &RankedItem| r.signals.map(|s| s.votes_last_24h).unwrap_or(0);
            by_score()
                .then_with(|| v24(b).cmp(&v24(a)))
                .then_with(newer_first)
                .then_with(by_id)
        }
        SortMode::Hot => by_score().then_with(newer_first).then_with(by_id),
        SortMode::Newest => newer_first().then_with(by_id),
        SortMode::MostVoted => b
            .item
            .vote_count
            .cmp(&a.item.vote_count)
            .then_with(newer_first)
            .then_with(by_id),
        SortMode::Alphabetical => a
            .item
            .name
            .to_lowercase()
            .cmp(&b.item.name.to_lowercase())
            .then_with(newer_first)
            .then_with(by_id),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ItemId, UserId, MILLIS_PER_HOUR};

    const NOW: Timestamp = Timestamp::from_millis(1_000 * MILLIS_PER_HOUR);

    fn item_aged(name: &str, hours: i64, vote_count: u64) -> Item {
        Item {
            id: ItemId::new(),
            owner_id: UserId::new("maker"),
            name: name.to_string(),
            tagline: String::new(),
            description: String::new(),
            tags: vec![],
            created_at: NOW.minus_hours(hours),
            vote_count,
            comment_count: 0,
            view_count: 0,
            click_count: 0,
        }
    }

    fn signals(v24: u64, v7: u64, c24: u64, total: u64) -> EngagementSignals {
        EngagementSignals {
            votes_last_24h: v24,
            votes_last_7d: v7,
            comments_last_24h: c24,
            total_votes: total,
        }
    }

    #[test]
    fn test_trending_score_worked_example() {
        let score = trending_score(&signals(3, 3, 1, 10), NOW.minus_hours(2), NOW);
        assert!((score - 70.6).abs() < 1e-9, "got {}", score);
    }

    #[test]
    fn test_old_item_scores_total_votes_only() {
        let score = trending_score(&signals(0, 0, 0, 10), NOW.minus_hours(200), NOW);
        assert!((score - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_zero_facts_yields_recency_only() {
        let fresh = trending_score(&EngagementSignals::default(), NOW.minus_hours(8), NOW);
        assert!((fresh - 16.0).abs() < 1e-9);

        let stale = trending_score(&EngagementSignals::default(), NOW.minus_hours(169), NOW);
        assert_eq!(stale, 0.0);
    }

    #[test]
    fn test_recency_bonus_boundaries() {
        assert!((recency_bonus(0.0) - 16.8).abs() < 1e-9);
        assert_eq!(recency_bonus(168.0), 0.0);
        assert_eq!(recency_bonus(500.0), 0.0);
    }

    #[test]
    fn test_future_creation_clamped() {
        let future = Timestamp::from_millis(NOW.as_millis() + 5 * MILLIS_PER_HOUR);
        let score = trending_score(&EngagementSignals::default(), future, NOW);
        assert!((score - 16.8).abs() < 1e-9);
        assert_eq!(hot_score(&signals(0, 0, 0, 4), future, NOW), 4.0 * 2f64.ln());
    }

    #[test]
    fn test_hot_score() {
        let score = hot_score(&signals(0, 0, 0, 5), NOW.minus_hours(10), NOW);
        assert!((score - 5.0 * 12f64.ln()).abs() < 1e-9);
        assert_eq!(hot_score(&EngagementSignals::default(), NOW, NOW), 0.0);
    }

    #[test]
    fn test_sort_mode_from_param() {
        assert_eq!(SortMode::from_param("trending"), SortMode::Trending);
        assert_eq!(SortMode::from_param(" Newest "), SortMode::Newest);
        assert_eq!(SortMode::from_param("most_voted"), SortMode::MostVoted);
        assert_eq!(SortMode::from_param("alphabetical"), SortMode::Alphabetical);
        assert_eq!(SortMode::from_param("bogus"), SortMode::Hot);
        assert_eq!(SortMode::from_param(""), SortMode::Hot);
    }

    #[test]
    fn test_sort_mode_param_roundtrip() {
        for mode in [
            SortMode::Trending,
            SortMode::Hot,
            SortMode::Newest,
            SortMode::MostVoted,
            SortMode::Alphabetical,
        ] {
            assert_eq!(SortMode::from_param(mode.as_str()), mode);
        }
    }

    #[test]
    fn test_clamp_limit() {
        assert_eq!(clamp_limit(None, 20), 20);
        assert_eq!(clamp_limit(Some(0), 20), 1);
        assert_eq!(clamp_limit(Some(500), 20), 50);
        assert_eq!(clamp_limit(Some(7), 20), 7);
    }

    #[test]
    fn test_trending_tie_breaks_on_recent_votes_then_newness() {
        // Same score (40): 4 recent votes vs 0 recent votes + 40 total.
        let a = RankCandidate {
            item: item_aged("a", 300, 0),
            signals: Some(signals(0, 0, 0, 40)),
        };
        let b = RankCandidate {
            item: item_aged("b", 300, 0),
            signals: Some(signals(4, 0, 0, 0)),
        };
        let ranked = rank_candidates(vec![a, b], SortMode::Trending, 10, NOW);
        assert_eq!(ranked[0].item.name, "b");

        let older = RankCandidate {
            item: item_aged("older", 400, 0),
            signals: Some(signals(1, 0, 0, 0)),
        };
        let newer = RankCandidate {
            item: item_aged("newer", 300, 0),
            signals: Some(signals(1, 0, 0, 0)),
        };
        let ranked = rank_candidates(vec![older, newer], SortMode::Trending, 10, NOW);
        assert_eq!(ranked[0].item.name, "newer");
    }

    #[test]
    fn test_field_sorts() {
        let candidates = vec![
            RankCandidate {
                item: item_aged("beta", 5, 9),
                signals: None,
            },
            RankCandidate {
                item: item_aged("Alpha", 50, 1),
                signals: None,
            },
            RankCandidate {
                item: item_aged("gamma", 1, 3),
                signals: None,
            },
        ];

        let names = |mode| {
            rank_candidates(candidates.clone(), mode, 10, NOW)
                .into_iter()
                .map(|r| r.item.name)
                .collect::<Vec<_>>()
        };

        assert_eq!(names(SortMode::Newest), vec!["gamma", "beta", "Alpha"]);
        assert_eq!(names(SortMode::MostVoted), vec!["beta", "gamma", "Alpha"]);
        assert_eq!(names(SortMode::Alphabetical), vec!["Alpha", "beta", "gamma"]);
        assert!(rank_candidates(candidates, SortMode::Newest, 10, NOW)
            .iter()
            .all(|r| r.score.is_none()));
    }

    #[test]
    fn test_limit_is_clamped() {
        let candidates: Vec<RankCandidate> = (0..60)
            .map(|i| RankCandidate {
                item: item_aged(&format!("item-{}", i), i, 0),
                signals: None,
            })
            .collect();
        assert_eq!(
            rank_candidates(candidates.clone(), SortMode::Newest, 0, NOW).len(),
            1
        );
        assert_eq!(
            rank_candidates(candidates, SortMode::Newest, 100, NOW).len(),
            50
        );
    }
}
