//! Data types for vote and engagement facts.
//!
//! Facts are immutable once written. Votes can be deleted (unvote);
//! views and clicks are append-only.

use serde::{Deserialize, Serialize};

use crate::types::{EventId, ItemId, Timestamp, UserId};

/// Direction of a vote.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VotePolarity {
    /// An endorsement. The only polarity that counts toward rankings.
    Up,
    /// A disapproval. Recorded, counted as a vote cast, never scored.
    Down,
}

impl VotePolarity {
    /// One-byte tag used inside storage keys.
    #[inline]
    pub const fn tag(self) -> u8 {
        match self {
            Self::Up => 0,
            Self::Down => 1,
        }
    }

    /// Inverse of [`tag`](Self::tag).
    #[inline]
    pub const fn from_tag(tag: u8) -> Option<Self> {
        match tag {
            0 => Some(Self::Up),
            1 => Some(Self::Down),
            _ => None,
        }
    }

    /// Returns true for [`VotePolarity::Up`].
    #[inline]
    pub const fn is_up(self) -> bool {
        matches!(self, Self::Up)
    }
}

/// A stored vote.
///
/// Unique per `(item_id, polarity, voter_id)`: the triple is the storage key.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteFact {
    /// The voted item.
    pub item_id: ItemId,

    /// Who voted.
    pub voter_id: UserId,

    /// Up or down.
    pub polarity: VotePolarity,

    /// When the vote was cast.
    pub timestamp: Timestamp,
}

/// Input for casting a vote.
#[derive(Clone, Debug)]
pub struct NewVote {
    /// The item to vote on (must exist).
    pub item_id: ItemId,

    /// The voting user (must be registered).
    pub voter_id: UserId,

    /// Up or down.
    pub polarity: VotePolarity,

    /// Vote time for backfilled imports. Defaults to now.
    pub timestamp: Option<Timestamp>,
}

impl NewVote {
    /// An up vote cast now.
    pub fn up(item_id: ItemId, voter_id: UserId) -> Self {
        Self {
            item_id,
            voter_id,
            polarity: VotePolarity::Up,
            timestamp: None,
        }
    }

    /// A down vote cast now.
    pub fn down(item_id: ItemId, voter_id: UserId) -> Self {
        Self {
            polarity: VotePolarity::Down,
            ..Self::up(item_id, voter_id)
        }
    }

    /// Sets an explicit vote time.
    pub fn at(mut self, timestamp: Timestamp) -> Self {
        self.timestamp = Some(timestamp);
        self
    }
}

/// Who triggered a view or click.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Actor {
    /// A signed-in user.
    User(UserId),
    /// A visitor without a session.
    Anonymous,
}

impl Actor {
    /// Returns the user ID for signed-in actors.
    pub fn user_id(&self) -> Option<&UserId> {
        match self {
            Self::User(id) => Some(id),
            Self::Anonymous => None,
        }
    }
}

/// Classification of an engagement event.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EngagementKind {
    /// The item page was displayed.
    View,
    /// The outbound link to the tool was followed.
    Click,
}

/// A stored view or click.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngagementEvent {
    /// Unique identifier (UUID v7).
    pub id: EventId,

    /// The item that was viewed or clicked.
    pub item_id: ItemId,

    /// Who did it.
    pub actor: Actor,

    /// View or click.
    pub kind: EngagementKind,

    /// When it happened.
    pub timestamp: Timestamp,
}
