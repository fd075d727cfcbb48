//! Post store
//!
//! Implements the blog operations on top of the post and tag repositories:
//! - Create a post with tags (find-or-create tags, link, all in one transaction)
//! - List posts, newest first
//! - View a post by exact title together with its tags
//! - Search posts by tag
//! - List tags with usage counts
//!
//! Failures are split into two categories: `ConnectionError` when the store
//! cannot be opened, and `QueryError` for any failing statement, tagged with
//! the operation that was attempted.

use crate::config::DatabaseConfig;
use crate::db::repositories::{
    PostRepository, SqlxPostRepository, SqlxTagRepository, TagRepository,
};
use crate::db::{self, migrations, DynDatabasePool};
use crate::models::{
    normalize_tag_name, CreatePostInput, PostSummary, PostWithTags, TagWithCount, TaggedPost,
};
use std::sync::Arc;

/// Error types for post store operations
#[derive(Debug, thiserror::Error)]
pub enum PostStoreError {
    /// The database could not be reached, authenticated against or migrated
    #[error("Failed to connect to database")]
    ConnectionError(#[source] anyhow::Error),

    /// A statement failed while performing `operation`
    #[error("Failed to {operation}")]
    QueryError {
        operation: &'static str,
        #[source]
        source: anyhow::Error,
    },
}

impl PostStoreError {
    fn query(operation: &'static str) -> impl FnOnce(anyhow::Error) -> Self {
        move |source| {
            tracing::warn!("Failed to {}: {:#}", operation, source);
            PostStoreError::QueryError { operation, source }
        }
    }
}

/// Post store owning the database handle for its whole lifetime
///
/// Acquire with [`PostStore::connect`], release with [`PostStore::close`].
pub struct PostStore {
    pool: DynDatabasePool,
    posts: Arc<dyn PostRepository>,
    tags: Arc<dyn TagRepository>,
}

impl PostStore {
    /// Open the database described by `config` and bring its schema up to date
    ///
    /// # Errors
    /// - `ConnectionError` if the pool cannot be created, the database does
    ///   not answer a ping, or migrations fail
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, PostStoreError> {
        let pool = db::create_pool(config)
            .await
            .map_err(PostStoreError::ConnectionError)?;

        if let Err(e) = Self::prepare(&pool).await {
            pool.close().await;
            return Err(PostStoreError::ConnectionError(e));
        }

        tracing::info!(driver = %config.driver, "Post store connected");
        Ok(Self::new(pool))
    }

    async fn prepare(pool: &DynDatabasePool) -> anyhow::Result<()> {
        pool.ping().await?;
        migrations::run_migrations(pool).await?;
        Ok(())
    }

    /// Create a post store on an existing, migrated pool
    pub fn new(pool: DynDatabasePool) -> Self {
        let posts = SqlxPostRepository::boxed(pool.clone());
        let tags = SqlxTagRepository::boxed(pool.clone());
        Self::with_repositories(pool, posts, tags)
    }

    /// Create a post store with explicit repositories
    pub fn with_repositories(
        pool: DynDatabasePool,
        posts: Arc<dyn PostRepository>,
        tags: Arc<dyn TagRepository>,
    ) -> Self {
        Self { pool, posts, tags }
    }

    /// Create a new post with comma-separated tags
    ///
    /// Tags are trimmed, lower-cased, emptied entries dropped and duplicates
    /// removed. The post, any new tags and the associations are written in
    /// one transaction.
    ///
    /// # Returns
    /// The created post and its resolved tag names, in input order
    ///
    /// # Errors
    /// - `QueryError` if any statement fails; nothing is persisted
    pub async fn create_post(
        &self,
        title: &str,
        content: &str,
        raw_tags: &str,
    ) -> Result<PostWithTags, PostStoreError> {
        let input = CreatePostInput::new(title, content).with_raw_tags(raw_tags);

        let created = self
            .posts
            .create_with_tags(&input)
            .await
            .map_err(PostStoreError::query("create post"))?;

        tracing::info!(
            post_id = created.post.id,
            tags = ?created.tags,
            "Created post '{}'",
            created.post.title
        );
        Ok(created)
    }

    /// List every post's ID and title, newest first
    pub async fn list_posts(&self) -> Result<Vec<PostSummary>, PostStoreError> {
        self.posts
            .list_summaries()
            .await
            .map_err(PostStoreError::query("list posts"))
    }

    /// Get a post by exact title, with its tag names sorted alphabetically
    ///
    /// # Returns
    /// `None` if no post has this title. When several posts share the title
    /// the earliest created (lowest ID) is returned.
    pub async fn get_post_by_title(
        &self,
        title: &str,
    ) -> Result<Option<PostWithTags>, PostStoreError> {
        let Some(post) = self
            .posts
            .get_by_title(title)
            .await
            .map_err(PostStoreError::query("view post"))?
        else {
            tracing::debug!("No post titled '{}'", title);
            return Ok(None);
        };

        let tags = self
            .tags
            .get_by_post_id(post.id)
            .await
            .map_err(PostStoreError::query("view post"))?
            .into_iter()
            .map(|tag| tag.name)
            .collect();

        Ok(Some(PostWithTags::new(post, tags)))
    }

    /// Find posts with the given tag, newest first
    ///
    /// The tag name is normalised before lookup. An unknown tag, or one that
    /// normalises to the empty string, yields an empty list.
    pub async fn find_posts_by_tag(
        &self,
        tag_name: &str,
    ) -> Result<Vec<TaggedPost>, PostStoreError> {
        let tag_name = normalize_tag_name(tag_name);
        if tag_name.is_empty() {
            return Ok(Vec::new());
        }

        self.posts
            .list_by_tag_name(&tag_name)
            .await
            .map_err(PostStoreError::query("search posts by tag"))
    }

    /// List all tags with their post counts, most used first
    pub async fn list_tags(&self) -> Result<Vec<TagWithCount>, PostStoreError> {
        self.tags
            .list_with_counts()
            .await
            .map_err(PostStoreError::query("list tags"))
    }

    /// Release the database connection
    pub async fn close(self) {
        self.pool.close().await;
        tracing::debug!("Post store closed");
    }
}
