//! EngageDB main struct and request-facing operations.
//!
//! The [`EngageDB`] struct is the primary interface for interacting with
//! the engine. It provides methods for:
//!
//! - Opening and closing the database
//! - Recording facts (items, votes, comments, views, clicks, collections)
//! - Ranking item listings
//! - Recomputing reputation and awarding achievements
//! - Rebuilding comment threads
//!
//! Every derived result is recomputed from stored facts on each call.
//! Nothing is cached between calls.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use engagedb::{Config, EngageDB, NewItem, NewVote, RankQuery, SortMode, UserId};
//!
//! # fn main() -> engagedb::Result<()> {
//! let db = EngageDB::open("./engage.db", Config::default())?;
//!
//! let maker = UserId::new("maker");
//! db.register_user(maker.clone(), "Maker")?;
//!
//! let item = db.submit_item(NewItem {
//!     owner_id: maker.clone(),
//!     name: "ripgrep".to_string(),
//!     tags: vec!["cli".to_string()],
//!     ..Default::default()
//! })?;
//!
//! db.cast_vote(NewVote::up(item, maker.clone()))?;
//!
//! let listing = db.rank(RankQuery::new(SortMode::Trending))?;
//! let report = db.recompute_reputation(&maker, None)?;
//! println!("{} items, {} points", listing.len(), report.reputation.total_points);
//!
//! db.close()?;
//! # Ok(())
//! # }
//! ```
//!
//! # Thread Safety
//!
//! `EngageDB` is `Send + Sync` and can be shared across threads using `Arc`.
//! Concurrent recomputations for one user are safe: grants are unique per
//! (user, kind) in storage and a losing insert awards nothing.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use crate::achievement::{self, AchievementGrant, AchievementKind};
use crate::aggregate::{self, ItemStats};
use crate::collection::{validate_new_collection, Collection, NewCollection};
use crate::comment::{validate_new_comment, validate_parent, CommentFact, NewComment};
use crate::config::Config;
use crate::error::{EngageError, NotFoundError, Result, ValidationError};
use crate::fact::{Actor, EngagementEvent, EngagementKind, NewVote, VoteFact, VotePolarity};
use crate::item::{normalize_tags, validate_new_item, Item, NewItem};
use crate::reputation::{compute_reputation, ActivityKind, UserReputation};
use crate::scoring::{clamp_limit, rank_candidates, RankCandidate, RankQuery, RankedItem};
use crate::storage::{open_store, ActivityStore, DatabaseMetadata};
use crate::thread::{build_thread, ThreadNode};
use crate::types::{CollectionId, CommentId, EventId, ItemId, Timestamp, UserId};
use crate::user::{validate_user_id, UserRecord};

/// Outcome of a reputation recomputation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReputationReport {
    /// The recomputed reputation, as persisted.
    pub reputation: UserReputation,

    /// Achievements awarded by this call. Empty when nothing new qualified
    /// or a concurrent call won the insert.
    pub newly_granted: Vec<AchievementGrant>,

    /// The activity the caller reported as the reason for recomputing.
    pub trigger: Option<ActivityKind>,
}

/// The main EngageDB database handle.
///
/// Create an instance with [`EngageDB::open()`] and close it with
/// [`EngageDB::close()`].
pub struct EngageDB {
    /// Storage engine.
    store: Box<dyn ActivityStore>,

    /// Configuration used to open this database.
    config: Config,
}

impl std::fmt::Debug for EngageDB {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EngageDB")
            .field("config", &self.config)
            .field("path", &self.store.path())
            .finish_non_exhaustive()
    }
}

impl EngageDB {
    /// Opens or creates an EngageDB database at the specified path.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Configuration is invalid (see [`Config::validate`])
    /// - Database file is corrupted
    /// - Database is locked by another process
    /// - Schema version doesn't match
    #[instrument(skip(config), fields(path = %path.as_ref().display()))]
    pub fn open(path: impl AsRef<Path>, config: Config) -> Result<Self> {
        config.validate().map_err(EngageError::from)?;

        info!("Opening EngageDB");

        let store = open_store(&path, &config)?;

        info!(sync_mode = ?config.sync_mode, "EngageDB opened successfully");

        Ok(Self { store, config })
    }

    /// Closes the database, flushing all pending writes.
    ///
    /// This method consumes the `EngageDB` instance.
    #[instrument(skip(self))]
    pub fn close(self) -> Result<()> {
        info!("Closing EngageDB");
        self.store.close()?;
        info!("EngageDB closed successfully");
        Ok(())
    }

    /// Returns a reference to the database configuration.
    #[inline]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns the database metadata.
    #[inline]
    pub fn metadata(&self) -> &DatabaseMetadata {
        self.store.metadata()
    }

    /// Direct store access for integration tests.
    #[doc(hidden)]
    pub fn storage_for_test(&self) -> &dyn ActivityStore {
        self.store.as_ref()
    }

    // =========================================================================
    // Lookups shared by operations
    // =========================================================================

    fn require_user(&self, id: &UserId) -> Result<UserRecord> {
        self.store
            .get_user(id)?
            .ok_or_else(|| NotFoundError::user(id).into())
    }

    fn require_item(&self, id: ItemId) -> Result<Item> {
        self.store
            .get_item(id)?
            .ok_or_else(|| NotFoundError::item(id).into())
    }

    // =========================================================================
    // Users
    // =========================================================================

    /// Registers a user, or updates the display name of a registered one.
    ///
    /// The original join time is kept on re-registration.
    #[instrument(skip(self, display_name), fields(user_id = %id))]
    pub fn register_user(&self, id: UserId, display_name: impl Into<String>) -> Result<UserRecord> {
        validate_user_id(&id)?;

        let joined_at = match self.store.get_user(&id)? {
            Some(existing) => existing.joined_at,
            None => Timestamp::now(),
        };
        let record = UserRecord {
            id,
            display_name: display_name.into(),
            joined_at,
        };
        self.store.save_user(&record)?;

        info!("User registered");
        Ok(record)
    }

    /// Looks up a registered user.
    pub fn get_user(&self, id: &UserId) -> Result<Option<UserRecord>> {
        self.store.get_user(id)
    }

    // =========================================================================
    // Items
    // =========================================================================

    /// Submits a new item. Tags are stored lowercased and de-duplicated.
    ///
    /// # Errors
    ///
    /// - `Validation` if a field is out of bounds
    /// - `NotFound` if the owner is not registered
    #[instrument(skip(self, item), fields(owner = %item.owner_id))]
    pub fn submit_item(&self, item: NewItem) -> Result<ItemId> {
        validate_new_item(&item)?;
        self.require_user(&item.owner_id)?;

        let record = Item {
            id: ItemId::new(),
            owner_id: item.owner_id,
            name: item.name.trim().to_string(),
            tagline: item.tagline,
            description: item.description,
            tags: normalize_tags(&item.tags),
            created_at: item.created_at.unwrap_or_else(Timestamp::now),
            vote_count: 0,
            comment_count: 0,
            view_count: 0,
            click_count: 0,
        };
        self.store.insert_item(&record)?;

        info!(id = %record.id, "Item submitted");
        Ok(record.id)
    }

    /// Retrieves an item with its current counters.
    pub fn get_item(&self, id: ItemId) -> Result<Option<Item>> {
        self.store.get_item(id)
    }

    /// Lists every item in submission order.
    pub fn list_items(&self) -> Result<Vec<Item>> {
        self.store.list_items()
    }

    // =========================================================================
    // Votes
    // =========================================================================

    /// Records a vote.
    ///
    /// Returns `false` if the voter already holds a vote of this polarity
    /// on the item; nothing changes in that case.
    #[instrument(skip(self, vote), fields(item_id = %vote.item_id, voter = %vote.voter_id))]
    pub fn cast_vote(&self, vote: NewVote) -> Result<bool> {
        self.require_user(&vote.voter_id)?;
        self.require_item(vote.item_id)?;

        let fact = VoteFact {
            item_id: vote.item_id,
            voter_id: vote.voter_id,
            polarity: vote.polarity,
            timestamp: vote.timestamp.unwrap_or_else(Timestamp::now),
        };
        self.store.insert_vote(&fact)
    }

    /// Removes a vote. Returns `false` if there was no such vote.
    #[instrument(skip(self))]
    pub fn remove_vote(
        &self,
        item_id: ItemId,
        voter: &UserId,
        polarity: VotePolarity,
    ) -> Result<bool> {
        self.require_user(voter)?;
        self.require_item(item_id)?;
        self.store.delete_vote(item_id, voter, polarity)
    }

    // =========================================================================
    // Comments
    // =========================================================================

    /// Adds a comment or reply.
    ///
    /// # Errors
    ///
    /// - `Validation` for an empty or oversized body, or a parent that is
    ///   missing, on another item, or not older than the reply
    /// - `NotFound` if the author or item doesn't exist
    #[instrument(skip(self, comment), fields(item_id = %comment.item_id, author = %comment.author_id))]
    pub fn add_comment(&self, comment: NewComment) -> Result<CommentId> {
        validate_new_comment(&comment)?;
        self.require_user(&comment.author_id)?;
        self.require_item(comment.item_id)?;

        let id = CommentId::new();
        let timestamp = comment.timestamp.unwrap_or_else(Timestamp::now);

        if let Some(parent_id) = comment.parent_id {
            let parent = self.store.get_comment(parent_id)?.ok_or_else(|| {
                EngageError::from(ValidationError::invalid_field(
                    "parent_id",
                    format!("comment {} does not exist", parent_id),
                ))
            })?;
            validate_parent(&comment, &parent, id, timestamp)?;
        }

        let fact = CommentFact {
            id,
            item_id: comment.item_id,
            author_id: comment.author_id,
            parent_id: comment.parent_id,
            body: comment.body,
            timestamp,
        };
        self.store.insert_comment(&fact)?;

        debug!(id = %id, "Comment added");
        Ok(id)
    }

    /// Retrieves a comment by ID.
    pub fn get_comment(&self, id: CommentId) -> Result<Option<CommentFact>> {
        self.store.get_comment(id)
    }

    // =========================================================================
    // Engagement
    // =========================================================================

    /// Records a view of an item.
    pub fn record_view(&self, item_id: ItemId, actor: Actor) -> Result<EventId> {
        self.record_engagement(item_id, actor, EngagementKind::View)
    }

    /// Records a click through to an item's site.
    pub fn record_click(&self, item_id: ItemId, actor: Actor) -> Result<EventId> {
        self.record_engagement(item_id, actor, EngagementKind::Click)
    }

    #[instrument(skip(self, actor))]
    fn record_engagement(
        &self,
        item_id: ItemId,
        actor: Actor,
        kind: EngagementKind,
    ) -> Result<EventId> {
        if let Some(user) = actor.user_id() {
            self.require_user(user)?;
        }
        self.require_item(item_id)?;

        let event = EngagementEvent {
            id: EventId::new(),
            item_id,
            actor,
            kind,
            timestamp: Timestamp::now(),
        };
        self.store.insert_engagement(&event)?;
        Ok(event.id)
    }

    /// Performance summary of an item, counted from facts as of now.
    pub fn item_stats(&self, item_id: ItemId) -> Result<ItemStats> {
        self.require_item(item_id)?;
        Ok(aggregate::item_stats(
            item_id,
            &self.store.votes_for_item(item_id)?,
            &self.store.comments_for_item(item_id)?,
            &self.store.engagements_for_item(item_id)?,
            Timestamp::now(),
        ))
    }

    // =========================================================================
    // Collections
    // =========================================================================

    /// Creates a collection. Repeated item IDs are kept once.
    ///
    /// # Errors
    ///
    /// - `Validation` if a field is out of bounds
    /// - `NotFound` if the owner or any listed item doesn't exist
    #[instrument(skip(self, collection), fields(owner = %collection.owner_id))]
    pub fn create_collection(&self, collection: NewCollection) -> Result<CollectionId> {
        validate_new_collection(&collection)?;
        self.require_user(&collection.owner_id)?;

        let mut item_ids: Vec<ItemId> = Vec::with_capacity(collection.item_ids.len());
        for id in collection.item_ids {
            if !item_ids.contains(&id) {
                self.require_item(id)?;
                item_ids.push(id);
            }
        }

        let record = Collection {
            id: CollectionId::new(),
            owner_id: collection.owner_id,
            name: collection.name.trim().to_string(),
            description: collection.description,
            item_ids,
            created_at: Timestamp::now(),
        };
        self.store.insert_collection(&record)?;

        info!(id = %record.id, "Collection created");
        Ok(record.id)
    }

    /// Retrieves a collection by ID.
    pub fn get_collection(&self, id: CollectionId) -> Result<Option<Collection>> {
        self.store.get_collection(id)
    }

    /// Collections created by `owner`, oldest first.
    pub fn list_collections_by_owner(&self, owner: &UserId) -> Result<Vec<Collection>> {
        self.require_user(owner)?;
        self.store.collections_by_owner(owner)
    }

    // =========================================================================
    // Ranking
    // =========================================================================

    /// Ranks items for a listing as of now.
    pub fn rank(&self, query: RankQuery) -> Result<Vec<RankedItem>> {
        self.rank_at(query, Timestamp::now())
    }

    /// Ranks items for a listing as of `now`.
    ///
    /// Filters apply before scoring, so facts are read only for items that
    /// can appear in the result.
    #[instrument(skip(self, query), fields(mode = query.mode.as_str()))]
    pub fn rank_at(&self, query: RankQuery, now: Timestamp) -> Result<Vec<RankedItem>> {
        let limit = clamp_limit(query.limit, self.config.ranking.default_limit);

        let mut candidates = Vec::new();
        for item in self.store.list_items()? {
            if !query.matches(&item) {
                continue;
            }
            let signals = if query.mode.needs_signals() {
                Some(aggregate::engagement_signals(
                    &self.store.votes_for_item(item.id)?,
                    &self.store.comments_for_item(item.id)?,
                    now,
                ))
            } else {
                None
            };
            candidates.push(RankCandidate { item, signals });
        }

        debug!(candidates = candidates.len(), limit, "Ranking items");
        Ok(rank_candidates(candidates, query.mode, limit, now))
    }

    // =========================================================================
    // Reputation and achievements
    // =========================================================================

    /// Recomputes a user's reputation from current facts and awards any
    /// newly qualifying achievements.
    ///
    /// The result depends only on stored facts and grants, so repeating
    /// the call with no new facts returns the same points and level.
    /// A grant insert that loses to a concurrent call is skipped and
    /// awards nothing.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the user is not registered
    #[instrument(skip(self), fields(user_id = %user_id))]
    pub fn recompute_reputation(
        &self,
        user_id: &UserId,
        trigger: Option<ActivityKind>,
    ) -> Result<ReputationReport> {
        self.require_user(user_id)?;
        let now = Timestamp::now();

        let counts = aggregate::gather_activity_counts(self.store.as_ref(), user_id)?;

        // Pre-read only skips pointless inserts; the store decides.
        let held: Vec<AchievementKind> = self
            .store
            .grants_for_user(user_id)?
            .iter()
            .map(|g| g.kind)
            .collect();

        let mut newly_granted = Vec::new();
        for kind in achievement::evaluate(&counts, &held) {
            let grant = AchievementGrant::new(user_id.clone(), kind, now);
            if self.store.insert_grant_if_absent(&grant)? {
                info!(kind = kind.display_name(), points = grant.points, "Achievement unlocked");
                newly_granted.push(grant);
            } else {
                warn!(kind = kind.display_name(), "Achievement already granted concurrently");
            }
        }

        // Bonus comes from the stored grants, never from this call's tally.
        let bonus = achievement::bonus_points(&self.store.grants_for_user(user_id)?);
        let reputation = compute_reputation(user_id, counts, bonus, now);
        self.store.save_reputation(&reputation)?;

        info!(
            total_points = reputation.total_points,
            level = reputation.level.as_str(),
            trigger = ?trigger,
            "Reputation recomputed"
        );

        Ok(ReputationReport {
            reputation,
            newly_granted,
            trigger,
        })
    }

    /// The last persisted reputation, or `None` if never computed.
    pub fn get_reputation(&self, user_id: &UserId) -> Result<Option<UserReputation>> {
        self.store.get_reputation(user_id)
    }

    /// Top users by persisted total points, ties by user ID.
    ///
    /// `limit` is clamped to `[1, 50]`.
    pub fn leaderboard(&self, limit: usize) -> Result<Vec<UserReputation>> {
        let limit = clamp_limit(Some(limit), self.config.ranking.default_limit);
        let mut reputations = self.store.list_reputations()?;
        reputations.sort_by(|a, b| {
            b.total_points
                .cmp(&a.total_points)
                .then_with(|| a.user_id.cmp(&b.user_id))
        });
        reputations.truncate(limit);
        Ok(reputations)
    }

    /// Achievements held by a user, in award order.
    pub fn list_achievements(&self, user_id: &UserId) -> Result<Vec<AchievementGrant>> {
        self.require_user(user_id)?;
        let mut grants = self.store.grants_for_user(user_id)?;
        grants.sort_by_key(|g| (g.awarded_at, g.kind.tag()));
        Ok(grants)
    }

    /// Every achievement kind in the current catalog.
    pub fn achievement_catalog(&self) -> &'static [AchievementKind] {
        &AchievementKind::ALL
    }

    // =========================================================================
    // Threads
    // =========================================================================

    /// Rebuilds an item's discussion as a forest of reply trees.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the item doesn't exist
    #[instrument(skip(self))]
    pub fn build_thread(&self, item_id: ItemId) -> Result<Vec<ThreadNode>> {
        self.require_item(item_id)?;
        let comments = self.store.comments_for_item(item_id)?;
        Ok(build_thread(comments))
    }
}

// EngageDB is auto Send + Sync: Box<dyn ActivityStore + Send + Sync> and
// Config are both Send + Sync.
