//! Item submission module.
//!
//! An **item** is a submitted tool that gets listed, voted on and discussed.
//!
//! # Operations
//!
//! - [`submit_item(item)`](crate::EngageDB::submit_item)
//! - [`get_item(id)`](crate::EngageDB::get_item)
//! - [`list_items()`](crate::EngageDB::list_items)
//!
//! # Constraints
//!
//! - Name must be non-empty and ≤ 120 bytes
//! - Tagline ≤ 280 bytes, description ≤ 10KB
//! - At most 10 tags, each non-empty and ≤ 50 bytes

pub mod types;

pub use types::{Item, NewItem};

use crate::error::{EngageError, ValidationError};
use crate::storage::schema::{
    MAX_DESCRIPTION_SIZE, MAX_ITEM_NAME_LENGTH, MAX_TAGLINE_LENGTH, MAX_TAGS, MAX_TAG_LENGTH,
};

/// Validates a new item before storage.
///
/// Does NOT check that the owner is registered; that needs a storage
/// lookup and is handled by the facade.
pub(crate) fn validate_new_item(item: &NewItem) -> Result<(), EngageError> {
    if item.owner_id.as_str().is_empty() {
        return Err(ValidationError::required_field("owner_id").into());
    }

    if item.name.trim().is_empty() {
        return Err(ValidationError::required_field("name").into());
    }

    if item.name.len() > MAX_ITEM_NAME_LENGTH {
        return Err(ValidationError::invalid_field(
            "name",
            format!(
                "must be at most {} bytes, got {}",
                MAX_ITEM_NAME_LENGTH,
                item.name.len()
            ),
        )
        .into());
    }

    if item.tagline.len() > MAX_TAGLINE_LENGTH {
        return Err(ValidationError::invalid_field(
            "tagline",
            format!(
                "must be at most {} bytes, got {}",
                MAX_TAGLINE_LENGTH,
                item.tagline.len()
            ),
        )
        .into());
    }

    if item.description.len() > MAX_DESCRIPTION_SIZE {
        return Err(
            ValidationError::content_too_large(item.description.len(), MAX_DESCRIPTION_SIZE)
                .into(),
        );
    }

    if item.tags.len() > MAX_TAGS {
        return Err(ValidationError::too_many_items("tags", item.tags.len(), MAX_TAGS).into());
    }

    for (i, tag) in item.tags.iter().enumerate() {
        if tag.trim().is_empty() || tag.len() > MAX_TAG_LENGTH {
            return Err(ValidationError::invalid_field(
                format!("tags[{}]", i),
                format!("must be 1 to {} bytes", MAX_TAG_LENGTH),
            )
            .into());
        }
    }

    Ok(())
}

/// Lowercases, trims and de-duplicates tags, keeping first-seen order.
pub(crate) fn normalize_tags(tags: &[String]) -> Vec<String> {
    let mut normalized: Vec<String> = Vec::with_capacity(tags.len());
    for tag in tags {
        let tag = tag.trim().to_lowercase();
        if !normalized.contains(&tag) {
            normalized.push(tag);
        }
    }
    normalized
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::UserId;

    fn valid_new_item() -> NewItem {
        NewItem {
            owner_id: UserId::new("maker"),
            name: "ripgrep".to_string(),
            tagline: "Recursively search directories".to_string(),
            description: "Line-oriented search tool".to_string(),
            tags: vec!["cli".to_string(), "search".to_string()],
            created_at: None,
        }
    }

    #[test]
    fn test_valid_item_passes() {
        assert!(validate_new_item(&valid_new_item()).is_ok());
    }

    #[test]
    fn test_empty_name_rejected() {
        let mut item = valid_new_item();
        item.name = "   ".to_string();
        let err = validate_new_item(&item).unwrap_err();
        assert!(err.is_validation());
        assert!(err.to_string().contains("name"));
    }

    #[test]
    fn test_missing_owner_rejected() {
        let mut item = valid_new_item();
        item.owner_id = UserId::default();
        let err = validate_new_item(&item).unwrap_err();
        assert!(err.to_string().contains("owner_id"));
    }

    #[test]
    fn test_name_at_limit_passes() {
        let mut item = valid_new_item();
        item.name = "x".repeat(MAX_ITEM_NAME_LENGTH);
        assert!(validate_new_item(&item).is_ok());
        item.name.push('x');
        assert!(validate_new_item(&item).is_err());
    }

    #[test]
    fn test_description_too_large_rejected() {
        let mut item = valid_new_item();
        item.description = "x".repeat(MAX_DESCRIPTION_SIZE + 1);
        let err = validate_new_item(&item).unwrap_err();
        assert!(err.to_string().contains("too large"));
    }

    #[test]
    fn test_too_many_tags_rejected() {
        let mut item = valid_new_item();
        item.tags = (0..=MAX_TAGS).map(|i| format!("tag{}", i)).collect();
        let err = validate_new_item(&item).unwrap_err();
        assert!(err.to_string().contains("Too many items"));
    }

    #[test]
    fn test_blank_tag_rejected() {
        let mut item = valid_new_item();
        item.tags.push(" ".to_string());
        let err = validate_new_item(&item).unwrap_err();
        assert!(err.to_string().contains("tags[2]"));
    }

    #[test]
    fn test_normalize_tags() {
        let tags = vec![
            "CLI".to_string(),
            " search ".to_string(),
            "cli".to_string(),
        ];
        assert_eq!(normalize_tags(&tags), vec!["cli", "search"]);
    }
}
