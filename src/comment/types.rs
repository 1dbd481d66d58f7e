//! Data types for comments.

use serde::{Deserialize, Serialize};

use crate::types::{CommentId, ItemId, Timestamp, UserId};

/// A stored comment.
///
/// `parent_id`, when set, names an older comment on the same item. Stored
/// data is not trusted to honour this: the thread builder promotes a
/// comment whose parent is missing to a root.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentFact {
    /// Unique identifier (UUID v7).
    pub id: CommentId,

    /// The item under discussion.
    pub item_id: ItemId,

    /// Who wrote it.
    pub author_id: UserId,

    /// The comment this replies to, if any.
    pub parent_id: Option<CommentId>,

    /// Comment text.
    pub body: String,

    /// When it was posted.
    pub timestamp: Timestamp,
}

impl CommentFact {
    /// Returns true if this comment replies to another.
    #[inline]
    pub fn is_reply(&self) -> bool {
        self.parent_id.is_some()
    }
}

/// Input for posting a comment.
#[derive(Clone, Debug)]
pub struct NewComment {
    /// The item to comment on (must exist).
    pub item_id: ItemId,

    /// The author (must be registered).
    pub author_id: UserId,

    /// Parent comment for replies. Must be on the same item and older.
    pub parent_id: Option<CommentId>,

    /// Comment text (non-empty, max 10KB).
    pub body: String,

    /// Post time for backfilled imports. Defaults to now.
    pub timestamp: Option<Timestamp>,
}
