//! Comment module.
//!
//! Comments form a discussion per item. Replies point at their parent;
//! the tree is rebuilt on read by [`crate::thread`].
//!
//! # Operations
//!
//! - [`add_comment(comment)`](crate::EngageDB::add_comment)
//! - [`get_comment(id)`](crate::EngageDB::get_comment)
//! - [`build_thread(item)`](crate::EngageDB::build_thread)
//!
//! # Constraints
//!
//! - Body must be non-empty and ≤ 10KB
//! - A parent must exist, belong to the same item and be strictly older

pub mod types;

pub use types::{CommentFact, NewComment};

use crate::error::{EngageError, ValidationError};
use crate::storage::schema::MAX_COMMENT_SIZE;
use crate::types::{CommentId, Timestamp};

/// Validates the caller-provided fields of a new comment.
pub(crate) fn validate_new_comment(comment: &NewComment) -> Result<(), EngageError> {
    if comment.body.trim().is_empty() {
        return Err(ValidationError::required_field("body").into());
    }

    if comment.body.len() > MAX_COMMENT_SIZE {
        return Err(ValidationError::content_too_large(comment.body.len(), MAX_COMMENT_SIZE).into());
    }

    Ok(())
}

/// Validates a reply against its stored parent.
///
/// The parent must be on the same item and sort strictly before the reply
/// in `(timestamp, id)` order, which rules out cycles.
pub(crate) fn validate_parent(
    comment: &NewComment,
    parent: &CommentFact,
    id: CommentId,
    timestamp: Timestamp,
) -> Result<(), EngageError> {
    if parent.item_id != comment.item_id {
        return Err(ValidationError::invalid_field(
            "parent_id",
            format!("comment {} belongs to a different item", parent.id),
        )
        .into());
    }

    if (parent.timestamp, parent.id) >= (timestamp, id) {
        return Err(ValidationError::invalid_field(
            "parent_id",
            "parent must be created before the reply",
        )
        .into());
    }

    Ok(())
}
