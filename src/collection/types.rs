//! Data types for collections.

use serde::{Deserialize, Serialize};

use crate::types::{CollectionId, ItemId, Timestamp, UserId};

/// A user-curated list of items.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Collection {
    /// Unique identifier (UUID v7).
    pub id: CollectionId,

    /// The curator.
    pub owner_id: UserId,

    /// Display name.
    pub name: String,

    /// Optional blurb.
    pub description: String,

    /// Curated items in display order.
    pub item_ids: Vec<ItemId>,

    /// When the collection was created.
    pub created_at: Timestamp,
}

/// Input for creating a collection.
#[derive(Clone, Debug, Default)]
pub struct NewCollection {
    /// The curator (must be registered).
    pub owner_id: UserId,

    /// Display name (non-empty, max 120 bytes).
    pub name: String,

    /// Optional blurb (max 10KB).
    pub description: String,

    /// Items to include (max 100, each must exist).
    pub item_ids: Vec<ItemId>,
}
