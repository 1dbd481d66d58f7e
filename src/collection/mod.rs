//! Collection module.
//!
//! Collections count toward the *curation* reputation category.
//!
//! # Operations
//!
//! - [`create_collection(collection)`](crate::EngageDB::create_collection)
//! - [`get_collection(id)`](crate::EngageDB::get_collection)
//! - [`list_collections_by_owner(user)`](crate::EngageDB::list_collections_by_owner)

pub mod types;

pub use types::{Collection, NewCollection};

use crate::error::{EngageError, ValidationError};
use crate::storage::schema::{MAX_COLLECTION_ITEMS, MAX_DESCRIPTION_SIZE, MAX_ITEM_NAME_LENGTH};

/// Validates a new collection before storage.
///
/// Item existence is checked by the facade.
pub(crate) fn validate_new_collection(collection: &NewCollection) -> Result<(), EngageError> {
    if collection.name.trim().is_empty() {
        return Err(ValidationError::required_field("name").into());
    }

    if collection.name.len() > MAX_ITEM_NAME_LENGTH {
        return Err(ValidationError::invalid_field(
            "name",
            format!("must be at most {} bytes", MAX_ITEM_NAME_LENGTH),
        )
        .into());
    }

    if collection.description.len() > MAX_DESCRIPTION_SIZE {
        return Err(ValidationError::content_too_large(
            collection.description.len(),
            MAX_DESCRIPTION_SIZE,
        )
        .into());
    }

    if collection.item_ids.len() > MAX_COLLECTION_ITEMS {
        return Err(ValidationError::too_many_items(
            "item_ids",
            collection.item_ids.len(),
            MAX_COLLECTION_ITEMS,
        )
        .into());
    }

    Ok(())
}
