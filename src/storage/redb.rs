//! redb storage engine implementation.
//!
//! This module provides the primary storage backend for EngageDB using
//! [redb](https://docs.rs/redb), a pure Rust embedded key-value store.
//!
//! # Features
//!
//! - ACID transactions with MVCC
//! - Single-writer, multiple-reader concurrency
//! - Automatic crash recovery
//!
//! redb serializes write transactions, so a read-modify-write of an item's
//! counters inside one write transaction behaves as an atomic increment.
//!
//! # File Layout
//!
//! When you open a database at `./engage.db`, redb creates:
//! - `./engage.db` - Main database file
//! - `./engage.db.lock` - Lock file for writer coordination (may not be visible)

use std::path::{Path, PathBuf};

use ::redb::{
    Database, Durability, ReadTransaction, ReadableMultimapTable, ReadableTable, WriteTransaction,
};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use super::schema::{
    decode_vote_key, decode_voter_index_value, encode_grant_key, encode_grant_prefix,
    encode_vote_key, encode_voter_index_value, item_votes_range, DatabaseMetadata,
    COLLECTIONS_BY_OWNER_TABLE, COLLECTIONS_TABLE, COMMENTS_BY_AUTHOR_TABLE,
    COMMENTS_BY_ITEM_TABLE, COMMENTS_TABLE, ENGAGEMENTS_BY_ITEM_TABLE, ENGAGEMENTS_TABLE,
    GRANTS_TABLE, ITEMS_BY_OWNER_TABLE, ITEMS_TABLE, METADATA_TABLE, REPUTATIONS_TABLE,
    SCHEMA_VERSION, USERS_TABLE, VOTES_BY_VOTER_TABLE, VOTES_TABLE,
};
use super::ActivityStore;
use crate::achievement::{AchievementGrant, CATALOG_VERSION};
use crate::collection::Collection;
use crate::comment::CommentFact;
use crate::config::{Config, SyncMode};
use crate::error::{EngageError, NotFoundError, Result, StorageError};
use crate::fact::{EngagementEvent, EngagementKind, VoteFact, VotePolarity};
use crate::item::Item;
use crate::reputation::UserReputation;
use crate::types::{CollectionId, CommentId, ItemId, Timestamp, UserId};
use crate::user::UserRecord;

/// Metadata key in the metadata table.
const METADATA_KEY: &str = "db_metadata";

/// redb storage engine wrapper.
///
/// This struct holds the redb database handle and cached metadata.
/// It implements [`ActivityStore`] for use with EngageDB.
///
/// # Thread Safety
///
/// `RedbStore` is `Send + Sync`. redb handles internal synchronization
/// using MVCC for readers and exclusive locking for writers.
#[derive(Debug)]
pub struct RedbStore {
    /// The redb database handle.
    db: Database,

    /// Cached database metadata.
    metadata: DatabaseMetadata,

    /// Path to the database file.
    path: PathBuf,

    /// Durability applied to every write transaction.
    sync_mode: SyncMode,
}

fn encode<T: Serialize>(value: &T) -> Result<Vec<u8>> {
    bincode::serialize(value).map_err(|e| StorageError::serialization(e.to_string()).into())
}

fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T> {
    bincode::deserialize(bytes).map_err(|e| StorageError::serialization(e.to_string()).into())
}

/// Loads records by ID from a UUID-keyed table, skipping IDs with no record.
fn load_records<T, Tbl>(table: &Tbl, ids: &[[u8; 16]]) -> Result<Vec<T>>
where
    T: DeserializeOwned,
    Tbl: ReadableTable<&'static [u8; 16], &'static [u8]>,
{
    let mut records = Vec::with_capacity(ids.len());
    for id in ids {
        if let Some(value) = table.get(id)? {
            records.push(decode(value.value())?);
        }
    }
    Ok(records)
}

/// Applies `apply` to a stored item inside an open write transaction.
///
/// # Errors
///
/// Returns `NotFound` if the item does not exist; the caller's transaction
/// is then dropped uncommitted.
fn update_item_in(
    txn: &WriteTransaction,
    item_id: ItemId,
    apply: impl FnOnce(&mut Item),
) -> Result<()> {
    let mut table = txn.open_table(ITEMS_TABLE)?;
    let mut item: Item = match table.get(item_id.as_bytes())? {
        Some(value) => decode(value.value())?,
        None => return Err(NotFoundError::item(item_id).into()),
    };
    apply(&mut item);
    let bytes = encode(&item)?;
    table.insert(item_id.as_bytes(), bytes.as_slice())?;
    Ok(())
}

impl RedbStore {
    /// Opens or creates a database at the given path.
    ///
    /// If the database doesn't exist, it will be created with every table
    /// and a metadata row. If it exists, the stored metadata is validated.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The database file is corrupted
    /// - The database is locked by another process
    /// - Schema version doesn't match
    #[instrument(skip(config), fields(path = %path.as_ref().display()))]
    pub fn open(path: impl AsRef<Path>, config: &Config) -> Result<Self> {
        let path = path.as_ref();
        let db_exists = path.exists();

        debug!(db_exists = db_exists, "Opening storage engine");

        let db = Self::create_database(path, config)?;

        if db_exists {
            Self::open_existing(db, path.to_path_buf(), config)
        } else {
            Self::initialize_new(db, path.to_path_buf(), config)
        }
    }

    /// Creates the redb database with appropriate settings.
    fn create_database(path: &Path, config: &Config) -> Result<Database> {
        let mut builder = Database::builder();
        builder.set_cache_size(config.cache_size_mb.saturating_mul(1024 * 1024));

        // redb has no typed lock-conflict error; match on the message.
        let db = builder.create(path).map_err(|e| {
            if e.to_string().contains("locked") {
                StorageError::DatabaseLocked
            } else {
                StorageError::Redb(e.to_string())
            }
        })?;

        debug!("Database file opened successfully");
        Ok(db)
    }

    /// Initializes a new database with tables and metadata.
    #[instrument(skip(db, config), fields(path = %path.display()))]
    fn initialize_new(db: Database, path: PathBuf, config: &Config) -> Result<Self> {
        info!("Initializing new database");

        let metadata = DatabaseMetadata::new(CATALOG_VERSION);

        let write_txn = db.begin_write().map_err(StorageError::from)?;
        {
            let mut meta_table = write_txn.open_table(METADATA_TABLE)?;
            let metadata_bytes = encode(&metadata)?;
            meta_table.insert(METADATA_KEY, metadata_bytes.as_slice())?;

            // Tables are created on first open
            let _ = write_txn.open_table(USERS_TABLE)?;
            let _ = write_txn.open_table(ITEMS_TABLE)?;
            let _ = write_txn.open_multimap_table(ITEMS_BY_OWNER_TABLE)?;
            let _ = write_txn.open_table(VOTES_TABLE)?;
            let _ = write_txn.open_multimap_table(VOTES_BY_VOTER_TABLE)?;
            let _ = write_txn.open_table(COMMENTS_TABLE)?;
            let _ = write_txn.open_multimap_table(COMMENTS_BY_ITEM_TABLE)?;
            let _ = write_txn.open_multimap_table(COMMENTS_BY_AUTHOR_TABLE)?;
            let _ = write_txn.open_table(ENGAGEMENTS_TABLE)?;
            let _ = write_txn.open_multimap_table(ENGAGEMENTS_BY_ITEM_TABLE)?;
            let _ = write_txn.open_table(COLLECTIONS_TABLE)?;
            let _ = write_txn.open_multimap_table(COLLECTIONS_BY_OWNER_TABLE)?;
            let _ = write_txn.open_table(GRANTS_TABLE)?;
            let _ = write_txn.open_table(REPUTATIONS_TABLE)?;
        }
        write_txn.commit().map_err(StorageError::from)?;

        info!(
            schema_version = SCHEMA_VERSION,
            catalog_version = CATALOG_VERSION,
            "Database initialized"
        );

        Ok(Self {
            db,
            metadata,
            path,
            sync_mode: config.sync_mode,
        })
    }

    /// Opens and validates an existing database.
    #[instrument(skip(db, config), fields(path = %path.display()))]
    fn open_existing(db: Database, path: PathBuf, config: &Config) -> Result<Self> {
        info!("Opening existing database");

        let read_txn = db.begin_read().map_err(StorageError::from)?;
        let metadata = {
            let meta_table = read_txn.open_table(METADATA_TABLE).map_err(|e| {
                StorageError::corrupted(format!("Cannot open metadata table: {}", e))
            })?;

            let metadata_bytes = meta_table
                .get(METADATA_KEY)
                .map_err(StorageError::from)?
                .ok_or_else(|| StorageError::corrupted("Missing database metadata"))?;

            bincode::deserialize::<DatabaseMetadata>(metadata_bytes.value())
                .map_err(|e| StorageError::corrupted(format!("Invalid metadata format: {}", e)))?
        };
        drop(read_txn);

        if metadata.schema_version != SCHEMA_VERSION {
            warn!(
                expected = SCHEMA_VERSION,
                found = metadata.schema_version,
                "Schema version mismatch"
            );
            return Err(EngageError::Storage(StorageError::SchemaVersionMismatch {
                expected: SCHEMA_VERSION,
                found: metadata.schema_version,
            }));
        }

        let mut metadata = metadata;
        if metadata.catalog_version != CATALOG_VERSION {
            // Kind tags are never reused, so grants stay valid across versions.
            warn!(
                stored = metadata.catalog_version,
                current = CATALOG_VERSION,
                "Achievement catalog version changed"
            );
            metadata.catalog_version = CATALOG_VERSION;
        }
        metadata.touch();

        let write_txn = db.begin_write().map_err(StorageError::from)?;
        {
            let mut meta_table = write_txn.open_table(METADATA_TABLE)?;
            let metadata_bytes = encode(&metadata)?;
            meta_table.insert(METADATA_KEY, metadata_bytes.as_slice())?;
        }
        write_txn.commit().map_err(StorageError::from)?;

        info!(
            schema_version = metadata.schema_version,
            "Database opened successfully"
        );

        Ok(Self {
            db,
            metadata,
            path,
            sync_mode: config.sync_mode,
        })
    }

    /// Returns a reference to the underlying redb database.
    #[cfg(test)]
    pub(crate) fn database(&self) -> &Database {
        &self.db
    }

    /// Begins a write transaction with the configured durability.
    fn begin_write(&self) -> Result<WriteTransaction> {
        let mut txn = self.db.begin_write().map_err(StorageError::from)?;
        match self.sync_mode {
            SyncMode::Fast => txn.set_durability(Durability::Eventual),
            SyncMode::Normal => txn.set_durability(Durability::Immediate),
            SyncMode::Paranoid => {
                txn.set_durability(Durability::Immediate);
                txn.set_two_phase_commit(true);
            }
        }
        Ok(txn)
    }

    fn begin_read(&self) -> Result<ReadTransaction> {
        Ok(self.db.begin_read().map_err(StorageError::from)?)
    }
}

impl ActivityStore for RedbStore {
    // =========================================================================
    // Lifecycle
    // =========================================================================

    fn metadata(&self) -> &DatabaseMetadata {
        &self.metadata
    }

    #[instrument(skip(self))]
    fn close(self: Box<Self>) -> Result<()> {
        info!("Closing storage engine");

        // redb flushes on drop, which is infallible.
        drop(self.db);

        info!("Storage engine closed");
        Ok(())
    }

    fn path(&self) -> Option<&Path> {
        Some(&self.path)
    }

    // =========================================================================
    // Users
    // =========================================================================

    fn save_user(&self, user: &UserRecord) -> Result<()> {
        let bytes = encode(user)?;
        let write_txn = self.begin_write()?;
        {
            let mut table = write_txn.open_table(USERS_TABLE)?;
            table.insert(user.id.as_str(), bytes.as_slice())?;
        }
        write_txn.commit().map_err(StorageError::from)?;

        debug!(user_id = %user.id, "User saved");
        Ok(())
    }

    fn get_user(&self, id: &UserId) -> Result<Option<UserRecord>> {
        let read_txn = self.begin_read()?;
        let table = read_txn.open_table(USERS_TABLE)?;
        match table.get(id.as_str())? {
            Some(value) => Ok(Some(decode(value.value())?)),
            None => Ok(None),
        }
    }

    // =========================================================================
    // Items
    // =========================================================================

    fn insert_item(&self, item: &Item) -> Result<()> {
        let bytes = encode(item)?;
        let write_txn = self.begin_write()?;
        {
            let mut table = write_txn.open_table(ITEMS_TABLE)?;
            table.insert(item.id.as_bytes(), bytes.as_slice())?;

            let mut by_owner = write_txn.open_multimap_table(ITEMS_BY_OWNER_TABLE)?;
            by_owner.insert(item.owner_id.as_str(), item.id.as_bytes())?;
        }
        write_txn.commit().map_err(StorageError::from)?;

        debug!(id = %item.id, owner = %item.owner_id, "Item saved");
        Ok(())
    }

    fn get_item(&self, id: ItemId) -> Result<Option<Item>> {
        let read_txn = self.begin_read()?;
        let table = read_txn.open_table(ITEMS_TABLE)?;
        match table.get(id.as_bytes())? {
            Some(value) => Ok(Some(decode(value.value())?)),
            None => Ok(None),
        }
    }

    fn list_items(&self) -> Result<Vec<Item>> {
        let read_txn = self.begin_read()?;
        let table = read_txn.open_table(ITEMS_TABLE)?;

        let mut items = Vec::new();
        for result in table.iter()? {
            let (_, value) = result.map_err(StorageError::from)?;
            items.push(decode(value.value())?);
        }
        Ok(items)
    }

    fn items_by_owner(&self, owner: &UserId) -> Result<Vec<Item>> {
        let read_txn = self.begin_read()?;
        let index = read_txn.open_multimap_table(ITEMS_BY_OWNER_TABLE)?;
        let table = read_txn.open_table(ITEMS_TABLE)?;

        let mut ids = Vec::new();
        for entry in index.get(owner.as_str())? {
            ids.push(*entry.map_err(StorageError::from)?.value());
        }
        load_records(&table, &ids)
    }

    // =========================================================================
    // Votes
    // =========================================================================

    fn insert_vote(&self, vote: &VoteFact) -> Result<bool> {
        let key = encode_vote_key(vote.item_id, vote.polarity, &vote.voter_id);

        let write_txn = self.begin_write()?;
        let inserted = {
            let mut votes = write_txn.open_table(VOTES_TABLE)?;
            if votes.get(key.as_slice())?.is_some() {
                false
            } else {
                votes.insert(key.as_slice(), vote.timestamp.as_millis())?;
                let mut by_voter = write_txn.open_multimap_table(VOTES_BY_VOTER_TABLE)?;
                by_voter.insert(
                    vote.voter_id.as_str(),
                    &encode_voter_index_value(vote.item_id, vote.polarity),
                )?;
                true
            }
        };

        if !inserted {
            write_txn.abort().map_err(StorageError::from)?;
            debug!(item_id = %vote.item_id, voter = %vote.voter_id, "Duplicate vote ignored");
            return Ok(false);
        }

        let is_up = vote.polarity.is_up();
        update_item_in(&write_txn, vote.item_id, |item| {
            if is_up {
                item.vote_count = item.vote_count.saturating_add(1);
            }
        })?;
        write_txn.commit().map_err(StorageError::from)?;

        debug!(
            item_id = %vote.item_id,
            voter = %vote.voter_id,
            polarity = ?vote.polarity,
            "Vote recorded"
        );
        Ok(true)
    }

    fn delete_vote(
        &self,
        item_id: ItemId,
        voter: &UserId,
        polarity: VotePolarity,
    ) -> Result<bool> {
        let key = encode_vote_key(item_id, polarity, voter);

        let write_txn = self.begin_write()?;
        let existed = {
            let mut votes = write_txn.open_table(VOTES_TABLE)?;
            let existed = votes.remove(key.as_slice())?.is_some();
            if existed {
                let mut by_voter = write_txn.open_multimap_table(VOTES_BY_VOTER_TABLE)?;
                by_voter.remove(
                    voter.as_str(),
                    &encode_voter_index_value(item_id, polarity),
                )?;
            }
            existed
        };

        if !existed {
            write_txn.abort().map_err(StorageError::from)?;
            return Ok(false);
        }

        if polarity.is_up() {
            update_item_in(&write_txn, item_id, |item| {
                item.vote_count = item.vote_count.saturating_sub(1);
            })?;
        }
        write_txn.commit().map_err(StorageError::from)?;

        debug!(item_id = %item_id, voter = %voter, polarity = ?polarity, "Vote removed");
        Ok(true)
    }

    fn votes_for_item(&self, item_id: ItemId) -> Result<Vec<VoteFact>> {
        let read_txn = self.begin_read()?;
        let table = read_txn.open_table(VOTES_TABLE)?;
        let (start, end) = item_votes_range(item_id);

        let mut votes = Vec::new();
        for entry in table.range(start.as_slice()..end.as_slice())? {
            let (key, value) = entry.map_err(StorageError::from)?;
            let (item_id, polarity, voter_id) = decode_vote_key(key.value())
                .ok_or_else(|| StorageError::corrupted("Malformed vote key"))?;
            votes.push(VoteFact {
                item_id,
                voter_id,
                polarity,
                timestamp: Timestamp::from_millis(value.value()),
            });
        }
        Ok(votes)
    }

    fn votes_by_voter(&self, voter: &UserId) -> Result<Vec<VoteFact>> {
        let read_txn = self.begin_read()?;
        let index = read_txn.open_multimap_table(VOTES_BY_VOTER_TABLE)?;
        let table = read_txn.open_table(VOTES_TABLE)?;

        let mut votes = Vec::new();
        for entry in index.get(voter.as_str())? {
            let entry = entry.map_err(StorageError::from)?;
            let (item_id, polarity) = decode_voter_index_value(entry.value())
                .ok_or_else(|| StorageError::corrupted("Malformed vote index entry"))?;

            let key = encode_vote_key(item_id, polarity, voter);
            if let Some(value) = table.get(key.as_slice())? {
                votes.push(VoteFact {
                    item_id,
                    voter_id: voter.clone(),
                    polarity,
                    timestamp: Timestamp::from_millis(value.value()),
                });
            }
        }
        Ok(votes)
    }

    // =========================================================================
    // Comments
    // =========================================================================

    fn insert_comment(&self, comment: &CommentFact) -> Result<()> {
        let bytes = encode(comment)?;
        let write_txn = self.begin_write()?;
        {
            let mut table = write_txn.open_table(COMMENTS_TABLE)?;
            table.insert(comment.id.as_bytes(), bytes.as_slice())?;

            let mut by_item = write_txn.open_multimap_table(COMMENTS_BY_ITEM_TABLE)?;
            by_item.insert(comment.item_id.as_bytes(), comment.id.as_bytes())?;

            let mut by_author = write_txn.open_multimap_table(COMMENTS_BY_AUTHOR_TABLE)?;
            by_author.insert(comment.author_id.as_str(), comment.id.as_bytes())?;
        }
        update_item_in(&write_txn, comment.item_id, |item| {
            item.comment_count = item.comment_count.saturating_add(1);
        })?;
        write_txn.commit().map_err(StorageError::from)?;

        debug!(id = %comment.id, item_id = %comment.item_id, "Comment saved");
        Ok(())
    }

    fn get_comment(&self, id: CommentId) -> Result<Option<CommentFact>> {
        let read_txn = self.begin_read()?;
        let table = read_txn.open_table(COMMENTS_TABLE)?;
        match table.get(id.as_bytes())? {
            Some(value) => Ok(Some(decode(value.value())?)),
            None => Ok(None),
        }
    }

    fn comments_for_item(&self, item_id: ItemId) -> Result<Vec<CommentFact>> {
        let read_txn = self.begin_read()?;
        let index = read_txn.open_multimap_table(COMMENTS_BY_ITEM_TABLE)?;
        let table = read_txn.open_table(COMMENTS_TABLE)?;

        let mut ids = Vec::new();
        for entry in index.get(item_id.as_bytes())? {
            ids.push(*entry.map_err(StorageError::from)?.value());
        }
        load_records(&table, &ids)
    }

    fn count_comments_by_author(&self, author: &UserId) -> Result<u64> {
        let read_txn = self.begin_read()?;
        let index = read_txn.open_multimap_table(COMMENTS_BY_AUTHOR_TABLE)?;

        let mut count = 0u64;
        for entry in index.get(author.as_str())? {
            entry.map_err(StorageError::from)?;
            count += 1;
        }
        Ok(count)
    }

    // =========================================================================
    // Engagement events
    // =========================================================================

    fn insert_engagement(&self, event: &EngagementEvent) -> Result<()> {
        let bytes = encode(event)?;
        let write_txn = self.begin_write()?;
        {
            let mut table = write_txn.open_table(ENGAGEMENTS_TABLE)?;
            table.insert(event.id.as_bytes(), bytes.as_slice())?;

            let mut by_item = write_txn.open_multimap_table(ENGAGEMENTS_BY_ITEM_TABLE)?;
            by_item.insert(event.item_id.as_bytes(), event.id.as_bytes())?;
        }
        let kind = event.kind;
        update_item_in(&write_txn, event.item_id, |item| match kind {
            EngagementKind::View => item.view_count = item.view_count.saturating_add(1),
            EngagementKind::Click => item.click_count = item.click_count.saturating_add(1),
        })?;
        write_txn.commit().map_err(StorageError::from)?;

        debug!(item_id = %event.item_id, kind = ?event.kind, "Engagement recorded");
        Ok(())
    }

    fn engagements_for_item(&self, item_id: ItemId) -> Result<Vec<EngagementEvent>> {
        let read_txn = self.begin_read()?;
        let index = read_txn.open_multimap_table(ENGAGEMENTS_BY_ITEM_TABLE)?;
        let table = read_txn.open_table(ENGAGEMENTS_TABLE)?;

        let mut ids = Vec::new();
        for entry in index.get(item_id.as_bytes())? {
            ids.push(*entry.map_err(StorageError::from)?.value());
        }
        load_records(&table, &ids)
    }

    // =========================================================================
    // Collections
    // =========================================================================

    fn insert_collection(&self, collection: &Collection) -> Result<()> {
        let bytes = encode(collection)?;
        let write_txn = self.begin_write()?;
        {
            let mut table = write_txn.open_table(COLLECTIONS_TABLE)?;
            table.insert(collection.id.as_bytes(), bytes.as_slice())?;

            let mut by_owner = write_txn.open_multimap_table(COLLECTIONS_BY_OWNER_TABLE)?;
            by_owner.insert(collection.owner_id.as_str(), collection.id.as_bytes())?;
        }
        write_txn.commit().map_err(StorageError::from)?;

        debug!(id = %collection.id, name = %collection.name, "Collection saved");
        Ok(())
    }

    fn get_collection(&self, id: CollectionId) -> Result<Option<Collection>> {
        let read_txn = self.begin_read()?;
        let table = read_txn.open_table(COLLECTIONS_TABLE)?;
        match table.get(id.as_bytes())? {
            Some(value) => Ok(Some(decode(value.value())?)),
            None => Ok(None),
        }
    }

    fn collections_by_owner(&self, owner: &UserId) -> Result<Vec<Collection>> {
        let read_txn = self.begin_read()?;
        let index = read_txn.open_multimap_table(COLLECTIONS_BY_OWNER_TABLE)?;
        let table = read_txn.open_table(COLLECTIONS_TABLE)?;

        // Multimap values iterate in byte order, which is v7 creation order.
        let mut ids = Vec::new();
        for entry in index.get(owner.as_str())? {
            ids.push(*entry.map_err(StorageError::from)?.value());
        }
        load_records(&table, &ids)
    }

    // =========================================================================
    // Achievements and reputation
    // =========================================================================

    fn insert_grant_if_absent(&self, grant: &AchievementGrant) -> Result<bool> {
        let key = encode_grant_key(&grant.user_id, grant.kind.tag());
        let bytes = encode(grant)?;

        let write_txn = self.begin_write()?;
        let inserted = {
            let mut table = write_txn.open_table(GRANTS_TABLE)?;
            if table.get(key.as_slice())?.is_some() {
                false
            } else {
                table.insert(key.as_slice(), bytes.as_slice())?;
                true
            }
        };

        if inserted {
            write_txn.commit().map_err(StorageError::from)?;
            debug!(user_id = %grant.user_id, kind = ?grant.kind, "Achievement granted");
        } else {
            write_txn.abort().map_err(StorageError::from)?;
        }
        Ok(inserted)
    }

    fn grants_for_user(&self, user: &UserId) -> Result<Vec<AchievementGrant>> {
        let read_txn = self.begin_read()?;
        let table = read_txn.open_table(GRANTS_TABLE)?;
        let prefix = encode_grant_prefix(user);

        let mut grants = Vec::new();
        for entry in table.range(prefix.as_slice()..)? {
            let (key, value) = entry.map_err(StorageError::from)?;
            if !key.value().starts_with(&prefix) {
                break;
            }
            grants.push(decode(value.value())?);
        }
        Ok(grants)
    }

    fn save_reputation(&self, reputation: &UserReputation) -> Result<()> {
        let bytes = encode(reputation)?;
        let write_txn = self.begin_write()?;
        {
            let mut table = write_txn.open_table(REPUTATIONS_TABLE)?;
            table.insert(reputation.user_id.as_str(), bytes.as_slice())?;
        }
        write_txn.commit().map_err(StorageError::from)?;
        Ok(())
    }

    fn get_reputation(&self, user: &UserId) -> Result<Option<UserReputation>> {
        let read_txn = self.begin_read()?;
        let table = read_txn.open_table(REPUTATIONS_TABLE)?;
        match table.get(user.as_str())? {
            Some(value) => Ok(Some(decode(value.value())?)),
            None => Ok(None),
        }
    }

    fn list_reputations(&self) -> Result<Vec<UserReputation>> {
        let read_txn = self.begin_read()?;
        let table = read_txn.open_table(REPUTATIONS_TABLE)?;

        let mut reputations = Vec::new();
        for result in table.iter()? {
            let (_, value) = result.map_err(StorageError::from)?;
            reputations.push(decode(value.value())?);
        }
        Ok(reputations)
    }
}

// RedbStore is auto Send + Sync: Database, DatabaseMetadata, PathBuf and
// SyncMode are all Send + Sync.
