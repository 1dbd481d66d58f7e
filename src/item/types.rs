//! Data types for submitted items.

use serde::{Deserialize, Serialize};

use crate::types::{ItemId, Timestamp, UserId};

/// A submitted tool, as stored.
///
/// The four counters are a denormalized read side maintained by the store
/// inside the same write transaction as the fact that changed them. They
/// are for display only; ranking and reputation always count facts.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Item {
    /// Unique identifier (UUID v7).
    pub id: ItemId,

    /// The user who submitted the item.
    pub owner_id: UserId,

    /// Display name, also the key for alphabetical listings.
    pub name: String,

    /// One-line pitch.
    pub tagline: String,

    /// Long-form description.
    pub description: String,

    /// Lowercased tags.
    pub tags: Vec<String>,

    /// When the item was submitted.
    pub created_at: Timestamp,

    /// Current number of up votes.
    pub vote_count: u64,

    /// Number of comments.
    pub comment_count: u64,

    /// Number of recorded views.
    pub view_count: u64,

    /// Number of recorded outbound clicks.
    pub click_count: u64,
}

impl Item {
    /// Returns true if the item carries `tag` (Unicode case-insensitive).
    pub fn has_tag(&self, tag: &str) -> bool {
        let wanted = tag.trim().to_lowercase();
        self.tags.iter().any(|t| t.to_lowercase() == wanted)
    }
}

/// Input for submitting a new item.
///
/// # Example
///
/// ```rust,ignore
/// let id = db.submit_item(NewItem {
///     owner_id: UserId::new("maker"),
///     name: "ripgrep".to_string(),
///     tagline: "Fast recursive search".to_string(),
///     tags: vec!["cli".to_string()],
///     ..Default::default()
/// })?;
/// ```
#[derive(Clone, Debug, Default)]
pub struct NewItem {
    /// Submitting user (must be registered).
    pub owner_id: UserId,

    /// Display name (non-empty, max 120 bytes).
    pub name: String,

    /// One-line pitch (max 280 bytes).
    pub tagline: String,

    /// Long-form description (max 10 KB).
    pub description: String,

    /// Tags (max 10, each max 50 bytes). Stored lowercased.
    pub tags: Vec<String>,

    /// Creation time for backfilled imports. Defaults to now.
    pub created_at: Option<Timestamp>,
}
