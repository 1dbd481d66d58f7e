//! Fact aggregation.
//!
//! Turns stored facts into the inputs of the pure engines: per-item
//! [`EngagementSignals`] for scoring, per-user [`ActivityCounts`] for
//! reputation and achievements, and [`ItemStats`] for an item's
//! performance summary.
//!
//! Counting rules:
//!
//! - Only `Up` votes count toward an item's signals and a user's votes
//!   received. Down votes are recorded and count as votes cast.
//! - An owner's up votes on their own items count as votes received.
//! - Windows include their boundary instant: `timestamp >= now - window`.

use serde::{Deserialize, Serialize};

use crate::comment::CommentFact;
use crate::error::Result;
use crate::fact::{EngagementEvent, EngagementKind, VoteFact};
use crate::reputation::ActivityCounts;
use crate::scoring::EngagementSignals;
use crate::storage::ActivityStore;
use crate::types::{ItemId, Timestamp, UserId};

/// Hours in the short window.
pub const DAY_HOURS: i64 = 24;

/// Hours in the long window.
pub const WEEK_HOURS: i64 = 168;

/// Computes an item's scoring signals from its vote and comment facts.
pub fn engagement_signals(
    votes: &[VoteFact],
    comments: &[CommentFact],
    now: Timestamp,
) -> EngagementSignals {
    let day_start = now.minus_hours(DAY_HOURS);
    let week_start = now.minus_hours(WEEK_HOURS);

    let mut signals = EngagementSignals::default();
    for vote in votes.iter().filter(|v| v.polarity.is_up()) {
        signals.total_votes += 1;
        if vote.timestamp >= week_start {
            signals.votes_last_7d += 1;
        }
        if vote.timestamp >= day_start {
            signals.votes_last_24h += 1;
        }
    }

    signals.comments_last_24h = comments
        .iter()
        .filter(|c| c.timestamp >= day_start)
        .count() as u64;

    signals
}

/// Reads a user's activity counts from the store.
pub fn gather_activity_counts(store: &dyn ActivityStore, user: &UserId) -> Result<ActivityCounts> {
    let owned = store.items_by_owner(user)?;

    let mut votes_received = 0u64;
    for item in &owned {
        votes_received += store
            .votes_for_item(item.id)?
            .iter()
            .filter(|v| v.polarity.is_up())
            .count() as u64;
    }

    Ok(ActivityCounts {
        submissions: owned.len() as u64,
        votes_cast: store.votes_by_voter(user)?.len() as u64,
        comments: store.count_comments_by_author(user)?,
        collections: store.collections_by_owner(user)?.len() as u64,
        votes_received,
    })
}

/// Performance summary of one item, counted from facts.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ItemStats {
    /// The item summarized.
    pub item_id: ItemId,
    /// Views in the last 24 hours.
    pub views_last_24h: u64,
    /// Views in the last 7 days.
    pub views_last_7d: u64,
    /// Views, all time.
    pub total_views: u64,
    /// Clicks in the last 24 hours.
    pub clicks_last_24h: u64,
    /// Clicks in the last 7 days.
    pub clicks_last_7d: u64,
    /// Clicks, all time.
    pub total_clicks: u64,
    /// Up votes, all time.
    pub up_votes: u64,
    /// Down votes, all time.
    pub down_votes: u64,
    /// Comments, all time.
    pub comments: u64,
    /// When the summary was taken.
    pub computed_at: Timestamp,
}

impl ItemStats {
    /// Clicks per view, or `None` before the first view.
    pub fn click_through_rate(&self) -> Option<f64> {
        if self.total_views == 0 {
            None
        } else {
            Some(self.total_clicks as f64 / self.total_views as f64)
        }
    }
}

/// Summarizes an item's facts as of `now`.
pub fn item_stats(
    item_id: ItemId,
    votes: &[VoteFact],
    comments: &[CommentFact],
    events: &[EngagementEvent],
    now: Timestamp,
) -> ItemStats {
    let day_start = now.minus_hours(DAY_HOURS);
    let week_start = now.minus_hours(WEEK_HOURS);

    let mut stats = ItemStats {
        item_id,
        views_last_24h: 0,
        views_last_7d: 0,
        total_views: 0,
        clicks_last_24h: 0,
        clicks_last_7d: 0,
        total_clicks: 0,
        up_votes: 0,
        down_votes: 0,
        comments: comments.len() as u64,
        computed_at: now,
    };

    for event in events {
        let (last_24h, last_7d, total) = match event.kind {
            EngagementKind::View => (
                &mut stats.views_last_24h,
                &mut stats.views_last_7d,
                &mut stats.total_views,
            ),
            EngagementKind::Click => (
                &mut stats.clicks_last_24h,
                &mut stats.clicks_last_7d,
                &mut stats.total_clicks,
            ),
        };
        *total += 1;
        if event.timestamp >= week_start {
            *last_7d += 1;
        }
        if event.timestamp >= day_start {
            *last_24h += 1;
        }
    }

    for vote in votes {
        if vote.polarity.is_up() {
            stats.up_votes += 1;
        } else {
            stats.down_votes += 1;
        }
    }

    stats
}
