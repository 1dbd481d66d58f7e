//! # EngageDB
//!
//! Embedded engagement scoring and gamification engine for community
//! discovery sites.
//!
//! EngageDB stores raw engagement facts (submissions, votes, comments,
//! views, clicks, collections) and derives from them, on every request:
//!
//! - **Listings** ordered by a multi-factor trending score, a time-decayed
//!   hot score, or plain field sorts
//! - **Reputation**: weighted points per activity and a discrete level
//! - **Achievements**: one-time milestones granted at most once per user
//! - **Threads**: a flat comment relation rebuilt into reply trees
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use engagedb::prelude::*;
//!
//! # fn main() -> engagedb::Result<()> {
//! let db = EngageDB::open("./engage.db", Config::default())?;
//!
//! let alice = UserId::new("alice");
//! db.register_user(alice.clone(), "Alice")?;
//!
//! let item = db.submit_item(NewItem {
//!     owner_id: alice.clone(),
//!     name: "htop".to_string(),
//!     tagline: "Interactive process viewer".to_string(),
//!     ..Default::default()
//! })?;
//!
//! let trending = db.rank(RankQuery::new(SortMode::Trending))?;
//! let thread = db.build_thread(item)?;
//! let report = db.recompute_reputation(&alice, Some(ActivityKind::Submission))?;
//!
//! db.close()?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Key Concepts
//!
//! ### Facts
//!
//! A **fact** is an immutable, timestamped record of one user action.
//! Items carry denormalized counters for display, but every score is
//! counted from facts.
//!
//! ### Derived state
//!
//! Reputation and achievement grants are derived. Reputation is recomputed
//! wholesale on each call; grants are append-only and unique per
//! (user, kind) at the storage layer.
//!
//! ## Thread Safety
//!
//! `EngageDB` is `Send + Sync` and can be shared across threads using `Arc`.
//! The database uses MVCC for concurrent reads with exclusive write locking.

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![deny(unsafe_op_in_unsafe_fn)]

// ============================================================================
// Module declarations
// ============================================================================

mod config;
mod db;
mod error;
mod types;

pub mod aggregate;
pub mod storage;

// Domain modules
mod collection;
mod comment;
mod fact;
mod item;
mod user;

// Engines
pub mod achievement;
pub mod reputation;
pub mod scoring;
pub mod thread;

// ============================================================================
// Public API re-exports
// ============================================================================

// Main database interface
pub use db::{EngageDB, ReputationReport};

// Configuration
pub use config::{Config, RankingConfig, SyncMode};

// Error handling
pub use error::{EngageError, NotFoundError, Result, StorageError, ValidationError};

// Core types
pub use types::{CollectionId, CommentId, EventId, ItemId, Timestamp, UserId, MILLIS_PER_HOUR};

// Domain types
pub use collection::{Collection, NewCollection};
pub use comment::{CommentFact, NewComment};
pub use fact::{Actor, EngagementEvent, EngagementKind, NewVote, VoteFact, VotePolarity};
pub use item::{Item, NewItem};
pub use user::UserRecord;

// Engines
pub use achievement::{AchievementGrant, AchievementKind};
pub use aggregate::ItemStats;
pub use reputation::{
    ActivityCounts, ActivityKind, PointBreakdown, ReputationLevel, UserReputation,
};
pub use scoring::{EngagementSignals, RankQuery, RankedItem, SortMode};
pub use thread::ThreadNode;

// Storage (for advanced users)
pub use storage::DatabaseMetadata;

// ============================================================================
// Prelude module for convenient imports
// ============================================================================

/// Convenient imports for common EngageDB usage.
///
/// ```rust
/// use engagedb::prelude::*;
/// ```
pub mod prelude {
    pub use crate::comment::NewComment;
    pub use crate::config::{Config, SyncMode};
    pub use crate::db::EngageDB;
    pub use crate::error::{EngageError, Result};
    pub use crate::fact::{Actor, NewVote, VotePolarity};
    pub use crate::item::NewItem;
    pub use crate::reputation::ActivityKind;
    pub use crate::scoring::{RankQuery, SortMode};
    pub use crate::types::{CommentId, ItemId, Timestamp, UserId};
}
