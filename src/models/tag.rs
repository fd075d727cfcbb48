//! Tag model
//!
//! This module defines the Tag entity and the normalisation rules shared by
//! post creation and tag search.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Tag entity.
///
/// `name` is always stored normalised (trimmed, lower-case) and is unique,
/// so equivalent spellings resolve to the same row.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Tag {
    /// Unique identifier
    pub id: i64,
    /// Normalised tag name
    pub name: String,
}

/// Tag with the number of posts that use it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TagWithCount {
    /// The tag itself
    #[serde(flatten)]
    pub tag: Tag,
    /// Number of posts with this tag
    pub post_count: i64,
}

impl TagWithCount {
    /// Create a new TagWithCount
    pub fn new(tag: Tag, post_count: i64) -> Self {
        Self { tag, post_count }
    }
}

/// Normalise a single tag name: trim surrounding whitespace and lower-case.
pub fn normalize_tag_name(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Parse comma-separated tag input into normalised names.
///
/// Entries are trimmed and lower-cased, empty entries are dropped and
/// duplicates are removed keeping the first occurrence, so the result is in
/// input order.
///
/// ```
/// use blog_manager::models::parse_tag_list;
///
/// assert_eq!(parse_tag_list(" Rust, web,,RUST "), vec!["rust", "web"]);
/// ```
pub fn parse_tag_list(raw: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    raw.split(',')
        .map(normalize_tag_name)
        .filter(|name| !name.is_empty())
        .filter(|name| seen.insert(name.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_normalize_tag_name() {
        assert_eq!(normalize_tag_name("  Rust Programming "), "rust programming");
        assert_eq!(normalize_tag_name("\tWEB\n"), "web");
        assert_eq!(normalize_tag_name("   "), "");
    }

    #[test]
    fn test_tag_with_count_new() {
        let tag = Tag {
            id: 7,
            name: "rust".to_string(),
        };
        let tag_with_count = TagWithCount::new(tag.clone(), 42);

        assert_eq!(tag_with_count.tag, tag);
        assert_eq!(tag_with_count.post_count, 42);
    }

    #[test]
    fn test_tag_with_count_serializes_flat() {
        let value = serde_json::to_value(TagWithCount::new(
            Tag {
                id: 3,
                name: "web".to_string(),
            },
            2,
        ))
        .unwrap();

        assert_eq!(value, serde_json::json!({"id": 3, "name": "web", "post_count": 2}));
    }

    #[test]
    fn test_parse_tag_list_basic() {
        assert_eq!(
            parse_tag_list("python,web,development"),
            vec!["python", "web", "development"]
        );
    }

    #[test]
    fn test_parse_tag_list_trims_and_lowercases() {
        assert_eq!(parse_tag_list("  Python ,  WEB"), vec!["python", "web"]);
    }

    #[test]
    fn test_parse_tag_list_drops_empty_entries() {
        assert_eq!(parse_tag_list(",, ,rust,"), vec!["rust"]);
        assert!(parse_tag_list("").is_empty());
        assert!(parse_tag_list(" , ,").is_empty());
    }

    #[test]
    fn test_parse_tag_list_deduplicates_in_order() {
        assert_eq!(
            parse_tag_list("web, Rust, rust ,WEB,cli"),
            vec!["web", "rust", "cli"]
        );
    }

    #[test]
    fn test_parse_tag_list_keeps_inner_spaces() {
        assert_eq!(parse_tag_list("Machine Learning"), vec!["machine learning"]);
    }

    proptest! {
        /// Every parsed tag is non-empty, normalised and unique, and the set
        /// of tags equals the set of normalised non-empty inputs.
        #[test]
        fn parse_tag_list_normalised_unique(parts in proptest::collection::vec("[ a-zA-Z]{0,8}", 0..10)) {
            let raw = parts.join(",");
            let tags = parse_tag_list(&raw);

            let unique: HashSet<&String> = tags.iter().collect();
            prop_assert_eq!(unique.len(), tags.len());

            for tag in &tags {
                prop_assert!(!tag.is_empty());
                prop_assert_eq!(tag, &normalize_tag_name(tag));
            }

            let expected: HashSet<String> = parts
                .iter()
                .map(|p| normalize_tag_name(p))
                .filter(|p| !p.is_empty())
                .collect();
            let actual: HashSet<String> = tags.into_iter().collect();
            prop_assert_eq!(actual, expected);
        }
    }
}
