//! The achievement catalog.
//!
//! The catalog is a closed enum: each kind carries its display strings,
//! point value and a monotonic threshold over one activity counter.
//! Storage keys use [`AchievementKind::tag`], so tags are append-only:
//! new kinds get new tags, existing tags are never renumbered or reused.

use serde::{Deserialize, Serialize};

use crate::reputation::ActivityCounts;

/// Catalog version. Bump when kinds are added.
pub const CATALOG_VERSION: u32 = 1;

/// The activity counter an achievement watches.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Counter {
    /// Items submitted.
    Submissions,
    /// Votes cast.
    VotesCast,
    /// Comments written.
    Comments,
    /// Collections created.
    Collections,
    /// Up votes received.
    VotesReceived,
}

impl Counter {
    /// Reads this counter from `counts`.
    pub const fn read(self, counts: &ActivityCounts) -> u64 {
        match self {
            Self::Submissions => counts.submissions,
            Self::VotesCast => counts.votes_cast,
            Self::Comments => counts.comments,
            Self::Collections => counts.collections,
            Self::VotesReceived => counts.votes_received,
        }
    }
}

/// A one-time milestone.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[allow(non_camel_case_types)]
pub enum AchievementKind {
    /// First item submitted.
    FIRST_SUBMISSION,
    /// Five items submitted.
    SUBMISSION_STREAK_5,
    /// Twenty-five items submitted.
    PROLIFIC_MAKER,
    /// First vote cast.
    FIRST_VOTE,
    /// One hundred votes cast.
    ENGAGED_VOTER,
    /// First comment written.
    FIRST_COMMENT,
    /// Fifty comments written.
    CONVERSATIONALIST,
    /// First collection created.
    FIRST_COLLECTION,
    /// Ten collections created.
    MASTER_CURATOR,
    /// Fifty up votes received.
    RISING_STAR,
    /// Five hundred up votes received.
    COMMUNITY_FAVORITE,
}

impl AchievementKind {
    /// Every kind, in catalog order.
    pub const ALL: [AchievementKind; 11] = [
        Self::FIRST_SUBMISSION,
        Self::SUBMISSION_STREAK_5,
        Self::PROLIFIC_MAKER,
        Self::FIRST_VOTE,
        Self::ENGAGED_VOTER,
        Self::FIRST_COMMENT,
        Self::CONVERSATIONALIST,
        Self::FIRST_COLLECTION,
        Self::MASTER_CURATOR,
        Self::RISING_STAR,
        Self::COMMUNITY_FAVORITE,
    ];

    /// Stable one-byte storage tag.
    pub const fn tag(self) -> u8 {
        match self {
            Self::FIRST_SUBMISSION => 1,
            Self::SUBMISSION_STREAK_5 => 2,
            Self::PROLIFIC_MAKER => 3,
            Self::FIRST_VOTE => 4,
            Self::ENGAGED_VOTER => 5,
            Self::FIRST_COMMENT => 6,
            Self::CONVERSATIONALIST => 7,
            Self::FIRST_COLLECTION => 8,
            Self::MASTER_CURATOR => 9,
            Self::RISING_STAR => 10,
            Self::COMMUNITY_FAVORITE => 11,
        }
    }

    /// Inverse of [`tag`](Self::tag). Unknown tags yield `None`.
    pub fn from_tag(tag: u8) -> Option<Self> {
        Self::ALL.iter().copied().find(|kind| kind.tag() == tag)
    }

    /// The counter this achievement watches.
    pub const fn counter(self) -> Counter {
        match self {
            Self::FIRST_SUBMISSION | Self::SUBMISSION_STREAK_5 | Self::PROLIFIC_MAKER => {
                Counter::Submissions
            }
            Self::FIRST_VOTE | Self::ENGAGED_VOTER => Counter::VotesCast,
            Self::FIRST_COMMENT | Self::CONVERSATIONALIST => Counter::Comments,
            Self::FIRST_COLLECTION | Self::MASTER_CURATOR => Counter::Collections,
            Self::RISING_STAR | Self::COMMUNITY_FAVORITE => Counter::VotesReceived,
        }
    }

    /// Counter value at which the achievement unlocks.
    pub const fn threshold(self) -> u64 {
        match self {
            Self::FIRST_SUBMISSION => 1,
            Self::SUBMISSION_STREAK_5 => 5,
            Self::PROLIFIC_MAKER => 25,
            Self::FIRST_VOTE => 1,
            Self::ENGAGED_VOTER => 100,
            Self::FIRST_COMMENT => 1,
            Self::CONVERSATIONALIST => 50,
            Self::FIRST_COLLECTION => 1,
            Self::MASTER_CURATOR => 10,
            Self::RISING_STAR => 50,
            Self::COMMUNITY_FAVORITE => 500,
        }
    }

    /// Bonus points awarded once on grant.
    pub const fn points(self) -> u64 {
        match self {
            Self::FIRST_SUBMISSION => 10,
            Self::SUBMISSION_STREAK_5 => 50,
            Self::PROLIFIC_MAKER => 250,
            Self::FIRST_VOTE => 5,
            Self::ENGAGED_VOTER => 50,
            Self::FIRST_COMMENT => 5,
            Self::CONVERSATIONALIST => 75,
            Self::FIRST_COLLECTION => 10,
            Self::MASTER_CURATOR => 100,
            Self::RISING_STAR => 50,
            Self::COMMUNITY_FAVORITE => 250,
        }
    }

    /// Display name.
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::FIRST_SUBMISSION => "First Launch",
            Self::SUBMISSION_STREAK_5 => "Serial Launcher",
            Self::PROLIFIC_MAKER => "Prolific Maker",
            Self::FIRST_VOTE => "First Vote",
            Self::ENGAGED_VOTER => "Engaged Voter",
            Self::FIRST_COMMENT => "Ice Breaker",
            Self::CONVERSATIONALIST => "Conversationalist",
            Self::FIRST_COLLECTION => "Collector",
            Self::MASTER_CURATOR => "Master Curator",
            Self::RISING_STAR => "Rising Star",
            Self::COMMUNITY_FAVORITE => "Community Favorite",
        }
    }

    /// One-line description.
    pub const fn description(self) -> &'static str {
        match self {
            Self::FIRST_SUBMISSION => "Submitted your first tool",
            Self::SUBMISSION_STREAK_5 => "Submitted five tools",
            Self::PROLIFIC_MAKER => "Submitted twenty-five tools",
            Self::FIRST_VOTE => "Cast your first vote",
            Self::ENGAGED_VOTER => "Cast one hundred votes",
            Self::FIRST_COMMENT => "Wrote your first comment",
            Self::CONVERSATIONALIST => "Wrote fifty comments",
            Self::FIRST_COLLECTION => "Created your first collection",
            Self::MASTER_CURATOR => "Created ten collections",
            Self::RISING_STAR => "Received fifty upvotes on your tools",
            Self::COMMUNITY_FAVORITE => "Received five hundred upvotes on your tools",
        }
    }

    /// Returns true if `counts` satisfies this achievement.
    ///
    /// Monotonic: once true, more activity keeps it true.
    pub const fn qualifies(self, counts: &ActivityCounts) -> bool {
        self.counter().read(counts) >= self.threshold()
    }
}
