//! Storage layer abstractions for EngageDB.
//!
//! This module provides a trait-based abstraction over the storage engine,
//! allowing different backends to be used.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      EngageDB                                │
//! │          (validates, gathers facts, runs engines)            │
//! │                         │                                    │
//! │                         ▼                                    │
//! │              ┌─────────────────────┐                        │
//! │              │   ActivityStore     │  ← Trait               │
//! │              └─────────────────────┘                        │
//! │                         ▲                                    │
//! │                         │                                    │
//! │                  ┌──────┴──────┐                            │
//! │                  │  RedbStore  │                            │
//! │                  └─────────────┘                            │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! The store persists facts and derived records. It does no scoring: the
//! facade reads facts out, hands them to the pure engines, and writes the
//! results back.

pub mod redb;
pub mod schema;

pub use self::redb::RedbStore;
pub use schema::{DatabaseMetadata, SCHEMA_VERSION};

use std::path::Path;

use crate::achievement::AchievementGrant;
use crate::collection::Collection;
use crate::comment::CommentFact;
use crate::config::Config;
use crate::error::Result;
use crate::fact::{EngagementEvent, VoteFact, VotePolarity};
use crate::item::Item;
use crate::reputation::UserReputation;
use crate::types::{CollectionId, CommentId, ItemId, UserId};
use crate::user::UserRecord;

/// Storage engine trait for EngageDB.
///
/// This trait defines the contract that any storage backend must implement.
/// The primary implementation is [`RedbStore`].
///
/// # Atomicity
///
/// Each method runs in its own transaction. Methods that append a fact
/// also bump the owning item's denormalized counter inside that same
/// transaction, so a fact and its counter are never observed apart.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync` to allow the database to be shared
/// across threads. The engine handles internal synchronization.
pub trait ActivityStore: Send + Sync {
    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Returns the database metadata.
    fn metadata(&self) -> &DatabaseMetadata;

    /// Closes the storage engine, flushing any pending writes.
    ///
    /// This method consumes the storage engine. After calling `close()`,
    /// the engine cannot be used.
    fn close(self: Box<Self>) -> Result<()>;

    /// Returns the path to the database file, if applicable.
    fn path(&self) -> Option<&Path>;

    // =========================================================================
    // Users
    // =========================================================================

    /// Saves a user record, overwriting any existing record with the same ID.
    fn save_user(&self, user: &UserRecord) -> Result<()>;

    /// Retrieves a user record. Returns `None` if the user is not registered.
    fn get_user(&self, id: &UserId) -> Result<Option<UserRecord>>;

    // =========================================================================
    // Items
    // =========================================================================

    /// Inserts a new item and its owner index entry.
    fn insert_item(&self, item: &Item) -> Result<()>;

    /// Retrieves an item with its current counters.
    fn get_item(&self, id: ItemId) -> Result<Option<Item>>;

    /// Lists every item, in ID (creation) order.
    fn list_items(&self) -> Result<Vec<Item>>;

    /// Lists items owned by `owner`.
    fn items_by_owner(&self, owner: &UserId) -> Result<Vec<Item>>;

    // =========================================================================
    // Votes
    // =========================================================================

    /// Records a vote fact.
    ///
    /// Returns `false` without side effects when a vote with the same
    /// (item, polarity, voter) already exists. Up votes bump the item's
    /// `vote_count` in the same transaction.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the item does not exist.
    fn insert_vote(&self, vote: &VoteFact) -> Result<bool>;

    /// Removes a vote fact.
    ///
    /// Returns `false` when no such vote exists. Removing an up vote
    /// decrements `vote_count` (saturating) in the same transaction.
    fn delete_vote(&self, item_id: ItemId, voter: &UserId, polarity: VotePolarity)
        -> Result<bool>;

    /// All vote facts on an item, both polarities.
    fn votes_for_item(&self, item_id: ItemId) -> Result<Vec<VoteFact>>;

    /// All vote facts cast by a user, both polarities.
    fn votes_by_voter(&self, voter: &UserId) -> Result<Vec<VoteFact>>;

    // =========================================================================
    // Comments
    // =========================================================================

    /// Records a comment fact and bumps the item's `comment_count`.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the item does not exist.
    fn insert_comment(&self, comment: &CommentFact) -> Result<()>;

    /// Retrieves a comment by ID.
    fn get_comment(&self, id: CommentId) -> Result<Option<CommentFact>>;

    /// All comment facts on an item, in no particular order.
    fn comments_for_item(&self, item_id: ItemId) -> Result<Vec<CommentFact>>;

    /// Number of comments written by a user.
    fn count_comments_by_author(&self, author: &UserId) -> Result<u64>;

    // =========================================================================
    // Engagement events
    // =========================================================================

    /// Appends a view or click event and bumps the matching item counter.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the item does not exist.
    fn insert_engagement(&self, event: &EngagementEvent) -> Result<()>;

    /// All engagement events on an item.
    fn engagements_for_item(&self, item_id: ItemId) -> Result<Vec<EngagementEvent>>;

    // =========================================================================
    // Collections
    // =========================================================================

    /// Inserts a collection and its owner index entry.
    fn insert_collection(&self, collection: &Collection) -> Result<()>;

    /// Retrieves a collection by ID.
    fn get_collection(&self, id: CollectionId) -> Result<Option<Collection>>;

    /// Collections created by `owner`, in ID (creation) order.
    fn collections_by_owner(&self, owner: &UserId) -> Result<Vec<Collection>>;

    // =========================================================================
    // Achievements and reputation
    // =========================================================================

    /// Inserts a grant unless the user already holds that kind.
    ///
    /// The existence check and the insert share one write transaction, so
    /// two concurrent evaluations can't both grant the same kind. Returns
    /// `false` when the grant already existed.
    fn insert_grant_if_absent(&self, grant: &AchievementGrant) -> Result<bool>;

    /// All grants held by a user, in catalog order.
    fn grants_for_user(&self, user: &UserId) -> Result<Vec<AchievementGrant>>;

    /// Stores the latest computed reputation for a user.
    fn save_reputation(&self, reputation: &UserReputation) -> Result<()>;

    /// Retrieves the last stored reputation for a user.
    fn get_reputation(&self, user: &UserId) -> Result<Option<UserReputation>>;

    /// All stored reputations.
    fn list_reputations(&self) -> Result<Vec<UserReputation>>;
}

/// Opens a storage engine at the given path.
///
/// This is a convenience function that creates a [`RedbStore`] instance.
/// For more control, use `RedbStore::open()` directly.
///
/// # Errors
///
/// Returns an error if:
/// - The database file is corrupted
/// - The database is locked by another process
/// - Schema version doesn't match
pub fn open_store(path: impl AsRef<Path>, config: &Config) -> Result<Box<dyn ActivityStore>> {
    let store = RedbStore::open(path, config)?;
    Ok(Box::new(store))
}
