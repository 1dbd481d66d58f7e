//! Database schema definitions and versioning.
//!
//! This module defines the table structure for the redb storage engine.
//! All table definitions are compile-time constants to ensure consistency.
//!
//! # Schema Versioning
//!
//! The schema version is stored in the metadata table. When opening an
//! existing database, we check the version and fail if it doesn't match.
//!
//! # Table Layout
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │ Records (bincode values)                                     │
//! │   metadata      &str            -> DatabaseMetadata          │
//! │   users         &str            -> UserRecord                │
//! │   items         ItemId          -> Item                      │
//! │   comments      CommentId       -> CommentFact               │
//! │   engagements   EventId         -> EngagementEvent           │
//! │   collections   CollectionId    -> Collection                │
//! │   reputations   &str            -> UserReputation            │
//! └─────────────────────────────────────────────────────────────┘
//!
//! ┌─────────────────────────────────────────────────────────────┐
//! │ Facts keyed by identity                                      │
//! │   votes   item(16) | polarity(1) | voter  -> i64 timestamp   │
//! │   grants  len(2) | user | kind(1)         -> AchievementGrant│
//! └─────────────────────────────────────────────────────────────┘
//!
//! ┌─────────────────────────────────────────────────────────────┐
//! │ Secondary indexes (multimap)                                 │
//! │   items_by_owner        user  -> ItemId                      │
//! │   votes_by_voter        user  -> item(16) | polarity(1)      │
//! │   comments_by_item      item  -> CommentId                   │
//! │   comments_by_author    user  -> CommentId                   │
//! │   engagements_by_item   item  -> EventId                     │
//! │   collections_by_owner  user  -> CollectionId                │
//! └─────────────────────────────────────────────────────────────┘
//! ```

use redb::{MultimapTableDefinition, TableDefinition};
use serde::{Deserialize, Serialize};

use crate::fact::VotePolarity;
use crate::types::{ItemId, Timestamp, UserId};

/// Current schema version.
///
/// Increment this when making breaking changes to the schema.
/// The database will refuse to open if versions don't match.
pub const SCHEMA_VERSION: u32 = 1;

/// Maximum item name length in bytes.
pub const MAX_ITEM_NAME_LENGTH: usize = 120;

/// Maximum tagline length in bytes.
pub const MAX_TAGLINE_LENGTH: usize = 280;

/// Maximum description size in bytes (10 KB).
pub const MAX_DESCRIPTION_SIZE: usize = 10 * 1024;

/// Maximum number of tags per item.
pub const MAX_TAGS: usize = 10;

/// Maximum length of a single tag.
pub const MAX_TAG_LENGTH: usize = 50;

/// Maximum comment body size in bytes (10 KB).
pub const MAX_COMMENT_SIZE: usize = 10 * 1024;

/// Maximum number of items in one collection.
pub const MAX_COLLECTION_ITEMS: usize = 100;

/// Maximum user ID length in bytes. Must fit the grant key's u16 prefix.
pub const MAX_USER_ID_LENGTH: usize = 255;

// ============================================================================
// Table Definitions
// ============================================================================

/// Metadata table for database-level information.
pub const METADATA_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("metadata");

/// Registered users, keyed by user ID.
pub const USERS_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("users");

/// Items.
///
/// Key: ItemId as 16-byte UUID
/// Value: bincode-serialized Item, including its denormalized counters
pub const ITEMS_TABLE: TableDefinition<&[u8; 16], &[u8]> = TableDefinition::new("items");

/// Index: items by owner.
pub const ITEMS_BY_OWNER_TABLE: MultimapTableDefinition<&str, &[u8; 16]> =
    MultimapTableDefinition::new("items_by_owner");

/// Votes.
///
/// The key is the fact's identity, so a second vote with the same
/// (item, polarity, voter) finds the key already present.
/// Key: see [`encode_vote_key`]
/// Value: vote timestamp in Unix milliseconds
pub const VOTES_TABLE: TableDefinition<&[u8], i64> = TableDefinition::new("votes");

/// Index: votes by voter.
///
/// Value: `item(16) | polarity(1)`; together with the voter this rebuilds
/// the vote key.
pub const VOTES_BY_VOTER_TABLE: MultimapTableDefinition<&str, &[u8; 17]> =
    MultimapTableDefinition::new("votes_by_voter");

/// Comments.
///
/// Key: CommentId as 16-byte UUID
/// Value: bincode-serialized CommentFact
pub const COMMENTS_TABLE: TableDefinition<&[u8; 16], &[u8]> = TableDefinition::new("comments");

/// Index: comments by item.
pub const COMMENTS_BY_ITEM_TABLE: MultimapTableDefinition<&[u8; 16], &[u8; 16]> =
    MultimapTableDefinition::new("comments_by_item");

/// Index: comments by author.
pub const COMMENTS_BY_AUTHOR_TABLE: MultimapTableDefinition<&str, &[u8; 16]> =
    MultimapTableDefinition::new("comments_by_author");

/// Append-only view and click events.
pub const ENGAGEMENTS_TABLE: TableDefinition<&[u8; 16], &[u8]> =
    TableDefinition::new("engagements");

/// Index: engagement events by item.
pub const ENGAGEMENTS_BY_ITEM_TABLE: MultimapTableDefinition<&[u8; 16], &[u8; 16]> =
    MultimapTableDefinition::new("engagements_by_item");

/// Collections.
pub const COLLECTIONS_TABLE: TableDefinition<&[u8; 16], &[u8]> =
    TableDefinition::new("collections");

/// Index: collections by owner.
pub const COLLECTIONS_BY_OWNER_TABLE: MultimapTableDefinition<&str, &[u8; 16]> =
    MultimapTableDefinition::new("collections_by_owner");

/// Achievement grants.
///
/// Key: see [`encode_grant_key`]; at most one grant per (user, kind).
/// Value: bincode-serialized AchievementGrant
pub const GRANTS_TABLE: TableDefinition<&[u8], &[u8]> = TableDefinition::new("grants");

/// Last computed reputation per user.
pub const REPUTATIONS_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("reputations");

// ============================================================================
// Database Metadata
// ============================================================================

/// Database metadata stored in the metadata table.
///
/// This is serialized with bincode and stored under the key "db_metadata".
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DatabaseMetadata {
    /// Schema version for compatibility checking.
    pub schema_version: u32,

    /// Achievement catalog version the stored grants were evaluated under.
    pub catalog_version: u32,

    /// Timestamp when the database was created.
    pub created_at: Timestamp,

    /// Last time the database was opened (updated on each open).
    pub last_opened_at: Timestamp,
}

impl DatabaseMetadata {
    /// Creates new metadata for a fresh database.
    pub fn new(catalog_version: u32) -> Self {
        let now = Timestamp::now();
        Self {
            schema_version: SCHEMA_VERSION,
            catalog_version,
            created_at: now,
            last_opened_at: now,
        }
    }

    /// Updates the last_opened_at timestamp.
    pub fn touch(&mut self) {
        self.last_opened_at = Timestamp::now();
    }

    /// Checks if this metadata is compatible with the current schema.
    pub fn is_compatible(&self) -> bool {
        self.schema_version == SCHEMA_VERSION
    }
}

// ============================================================================
// Key Encoding Helpers
// ============================================================================

/// Encodes the identity key of a vote fact.
///
/// Format: `[item_id: 16][polarity: 1][voter: utf-8 bytes]`
///
/// All votes on one item share the 16-byte prefix, so they form one
/// contiguous range (see [`item_votes_range`]).
pub fn encode_vote_key(item_id: ItemId, polarity: VotePolarity, voter: &UserId) -> Vec<u8> {
    let mut key = Vec::with_capacity(17 + voter.as_str().len());
    key.extend_from_slice(item_id.as_bytes());
    key.push(polarity.tag());
    key.extend_from_slice(voter.as_str().as_bytes());
    key
}

/// Decodes a vote key. Returns `None` for malformed keys.
pub fn decode_vote_key(key: &[u8]) -> Option<(ItemId, VotePolarity, UserId)> {
    if key.len() < 17 {
        return None;
    }
    let mut item = [0u8; 16];
    item.copy_from_slice(&key[..16]);
    let polarity = VotePolarity::from_tag(key[16])?;
    let voter = std::str::from_utf8(&key[17..]).ok()?;
    Some((ItemId::from_bytes(item), polarity, UserId::new(voter)))
}

/// Encodes the `item | polarity` value of the votes-by-voter index.
#[inline]
pub fn encode_voter_index_value(item_id: ItemId, polarity: VotePolarity) -> [u8; 17] {
    let mut value = [0u8; 17];
    value[..16].copy_from_slice(item_id.as_bytes());
    value[16] = polarity.tag();
    value
}

/// Decodes a votes-by-voter index value.
#[inline]
pub fn decode_voter_index_value(value: &[u8; 17]) -> Option<(ItemId, VotePolarity)> {
    let mut item = [0u8; 16];
    item.copy_from_slice(&value[..16]);
    Some((ItemId::from_bytes(item), VotePolarity::from_tag(value[16])?))
}

/// Half-open key range covering every vote on `item_id`.
///
/// Polarity tags are 0 and 1, so `item | 2` sorts after every vote key
/// of the item and before the next item's keys.
#[inline]
pub fn item_votes_range(item_id: ItemId) -> ([u8; 16], [u8; 17]) {
    let start = *item_id.as_bytes();
    let mut end = [0u8; 17];
    end[..16].copy_from_slice(item_id.as_bytes());
    end[16] = 2;
    (start, end)
}

/// Encodes the key prefix shared by all grants of one user.
///
/// Format: `[len: u16 BE][user: utf-8 bytes]`. The length prefix keeps
/// one user's keys from running into another user whose ID starts with
/// the same bytes.
pub fn encode_grant_prefix(user_id: &UserId) -> Vec<u8> {
    let user = user_id.as_str().as_bytes();
    let len = u16::try_from(user.len()).unwrap_or(u16::MAX);
    let mut key = Vec::with_capacity(3 + user.len());
    key.extend_from_slice(&len.to_be_bytes());
    key.extend_from_slice(user);
    key
}

/// Encodes the identity key of an achievement grant.
pub fn encode_grant_key(user_id: &UserId, kind_tag: u8) -> Vec<u8> {
    let mut key = encode_grant_prefix(user_id);
    key.push(kind_tag);
    key
}
