//! Data models
//!
//! This module contains the data structures used throughout the blog manager:
//! - Database entities (Post, Tag)
//! - Read projections returned by the post store
//! - Input types and tag normalisation

mod post;
mod tag;

pub use post::{CreatePostInput, Post, PostSummary, PostWithTags, TaggedPost};
pub use tag::{normalize_tag_name, parse_tag_list, Tag, TagWithCount};
