//! Listing query and candidate filtering.
//!
//! [`RankQuery`] carries the already-validated listing parameters. Tag and
//! text filters are applied to item records before any scoring work, so
//! facts are only gathered for items that can appear in the result.

use crate::item::Item;

use super::SortMode;

/// Parameters of one listing request.
///
/// # Example
///
/// ```rust
/// use engagedb::{RankQuery, SortMode};
///
/// let query = RankQuery {
///     mode: SortMode::Trending,
///     tags: vec!["cli".to_string()],
///     text: Some("grep".to_string()),
///     limit: Some(10),
/// };
/// assert_eq!(query.mode, SortMode::Trending);
/// ```
#[derive(Clone, Debug, Default)]
pub struct RankQuery {
    /// Ordering to apply.
    pub mode: SortMode,

    /// Keep items carrying at least one of these tags (case-insensitive).
    ///
    /// Empty means no tag filtering.
    pub tags: Vec<String>,

    /// Keep items whose name, tagline or description contains this text
    /// (case-insensitive). `None` or blank means no text filtering.
    pub text: Option<String>,

    /// Page size, clamped to `[1, 50]`. `None` uses the configured default.
    pub limit: Option<usize>,
}

impl RankQuery {
    /// A query for `mode` with no filters and the default page size.
    pub fn new(mode: SortMode) -> Self {
        Self {
            mode,
            ..Default::default()
        }
    }

    /// Returns `true` if the item passes the tag and text filters.
    pub fn matches(&self, item: &Item) -> bool {
        if !self.tags.is_empty() && !self.tags.iter().any(|t| item.has_tag(t.trim())) {
            return false;
        }

        if let Some(text) = self.text.as_deref().map(str::trim) {
            if !text.is_empty() {
                let needle = text.to_lowercase();
                let hit = [&item.name, &item.tagline, &item.description]
                    .iter()
                    .any(|field| field.to_lowercase().contains(&needle));
                if !hit {
                    return false;
                }
            }
        }

        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ItemId, Timestamp, UserId};

    fn test_item() -> Item {
        Item {
            id: ItemId::new(),
            owner_id: UserId::new("maker"),
            name: "Ripgrep".to_string(),
            tagline: "Search your code".to_string(),
            description: "Respects .gitignore".to_string(),
            tags: vec!["cli".to_string(), "search".to_string()],
            created_at: Timestamp::now(),
            vote_count: 0,
            comment_count: 0,
            view_count: 0,
            click_count: 0,
        }
    }

    #[test]
    fn test_default_matches_everything() {
        assert!(RankQuery::default().matches(&test_item()));
    }

    #[test]
    fn test_tag_filter_any_match() {
        let mut query = RankQuery::default();
        query.tags = vec!["gui".to_string(), "CLI".to_string()];
        assert!(query.matches(&test_item()));

        query.tags = vec!["gui".to_string()];
        assert!(!query.matches(&test_item()));
    }

    #[test]
    fn test_tag_filter_folds_non_ascii_case() {
        let mut item = test_item();
        item.tags = vec!["éditeur".to_string()];

        let mut query = RankQuery::default();
        query.tags = vec!["ÉDITEUR".to_string()];
        assert!(query.matches(&item));

        query.tags = vec!["Éditeurs".to_string()];
        assert!(!query.matches(&item));
    }

    #[test]
    fn test_text_filter_is_case_insensitive() {
        let mut query = RankQuery::default();
        query.text = Some("GITIGNORE".to_string());
        assert!(query.matches(&test_item()));

        query.text = Some("compiler".to_string());
        assert!(!query.matches(&test_item()));
    }

    #[test]
    fn test_blank_text_is_ignored() {
        let mut query = RankQuery::default();
        query.text = Some("   ".to_string());
        assert!(query.matches(&test_item()));
    }
}
