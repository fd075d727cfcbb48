//! Post model
//!
//! This module provides:
//! - `Post` entity representing a blog post
//! - `CreatePostInput` carrying a new post and its normalised tags
//! - Read projections returned by the list, view and search operations

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::tag::parse_tag_list;

/// Post entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    /// Unique identifier
    pub id: i64,
    /// Post title (not unique)
    pub title: String,
    /// Post body
    pub content: String,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

/// A post together with the names of its tags
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostWithTags {
    #[serde(flatten)]
    pub post: Post,
    /// Normalised tag names
    pub tags: Vec<String>,
}

impl PostWithTags {
    /// Create a new PostWithTags
    pub fn new(post: Post, tags: Vec<String>) -> Self {
        Self { post, tags }
    }
}

/// Row of the post listing: identifier and title only
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostSummary {
    pub id: i64,
    pub title: String,
}

/// Row of a tag search result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaggedPost {
    pub id: i64,
    pub title: String,
    pub created_at: DateTime<Utc>,
}

/// Input for creating a new post
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreatePostInput {
    /// Post title
    pub title: String,
    /// Post body
    pub content: String,
    /// Normalised, de-duplicated tag names in input order
    pub tags: Vec<String>,
}

impl CreatePostInput {
    /// Create an input with no tags
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            tags: Vec::new(),
        }
    }

    /// Set the tags from comma-separated user input
    pub fn with_raw_tags(mut self, raw_tags: &str) -> Self {
        self.tags = parse_tag_list(raw_tags);
        self
    }
}
