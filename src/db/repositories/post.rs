//! Post repository
//!
//! Database operations for posts.
//!
//! This module provides:
//! - `PostRepository` trait defining the interface for post data access
//! - `SqlxPostRepository` implementing the trait for SQLite and MySQL
//!
//! Post creation writes the post, its tags and the associations in one
//! transaction; any failing statement rolls the whole unit back. The
//! creation time comes from the column default, so every row shares the
//! database's timestamp format.

use super::tag::{
    add_tag_to_post_mysql, add_tag_to_post_sqlite, find_or_create_tag_mysql,
    find_or_create_tag_sqlite,
};
use crate::db::{Backend, DynDatabasePool};
use crate::models::{CreatePostInput, Post, PostSummary, PostWithTags, TaggedPost};
use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::{MySqlConnection, MySqlPool, Row, SqliteConnection, SqlitePool};
use std::sync::Arc;

/// Post repository trait
#[async_trait]
pub trait PostRepository: Send + Sync {
    /// Create a post and link its tags, all or nothing
    async fn create_with_tags(&self, input: &CreatePostInput) -> Result<PostWithTags>;

    /// Get the first post (lowest ID) with exactly this title
    async fn get_by_title(&self, title: &str) -> Result<Option<Post>>;

    /// List every post's ID and title, newest first
    async fn list_summaries(&self) -> Result<Vec<PostSummary>>;

    /// List posts linked to the tag with this exact name, newest first
    async fn list_by_tag_name(&self, tag_name: &str) -> Result<Vec<TaggedPost>>;
}

/// SQLx-based post repository implementation
///
/// Supports both SQLite and MySQL databases.
pub struct SqlxPostRepository {
    pool: DynDatabasePool,
}

impl SqlxPostRepository {
    /// Create a new SQLx post repository
    pub fn new(pool: DynDatabasePool) -> Self {
        Self { pool }
    }

    /// Create a boxed repository for use with dependency injection
    pub fn boxed(pool: DynDatabasePool) -> Arc<dyn PostRepository> {
        Arc::new(Self::new(pool))
    }
}

#[async_trait]
impl PostRepository for SqlxPostRepository {
    async fn create_with_tags(&self, input: &CreatePostInput) -> Result<PostWithTags> {
        match self.pool.backend() {
            Backend::Sqlite(pool) => create_post_sqlite(pool, input).await,
            Backend::Mysql(pool) => create_post_mysql(pool, input).await,
        }
    }

    async fn get_by_title(&self, title: &str) -> Result<Option<Post>> {
        match self.pool.backend() {
            Backend::Sqlite(pool) => get_post_by_title_sqlite(pool, title).await,
            Backend::Mysql(pool) => get_post_by_title_mysql(pool, title).await,
        }
    }

    async fn list_summaries(&self) -> Result<Vec<PostSummary>> {
        match self.pool.backend() {
            Backend::Sqlite(pool) => list_summaries_sqlite(pool).await,
            Backend::Mysql(pool) => list_summaries_mysql(pool).await,
        }
    }

    async fn list_by_tag_name(&self, tag_name: &str) -> Result<Vec<TaggedPost>> {
        match self.pool.backend() {
            Backend::Sqlite(pool) => list_by_tag_name_sqlite(pool, tag_name).await,
            Backend::Mysql(pool) => list_by_tag_name_mysql(pool, tag_name).await,
        }
    }
}

// ============================================================================
// SQLite implementations
// ============================================================================

async fn create_post_sqlite(pool: &SqlitePool, input: &CreatePostInput) -> Result<PostWithTags> {
    let mut tx = pool.begin().await.context("Failed to begin transaction")?;

    match insert_post_with_tags_sqlite(&mut tx, input).await {
        Ok(created) => {
            tx.commit().await.context("Failed to commit post")?;
            Ok(created)
        }
        Err(e) => {
            if let Err(rollback_err) = tx.rollback().await {
                tracing::error!("Failed to roll back post creation: {}", rollback_err);
            }
            Err(e)
        }
    }
}

async fn insert_post_with_tags_sqlite(
    conn: &mut SqliteConnection,
    input: &CreatePostInput,
) -> Result<PostWithTags> {
    let row =
        sqlx::query("INSERT INTO posts (title, content) VALUES (?, ?) RETURNING id, created_at")
            .bind(&input.title)
            .bind(&input.content)
            .fetch_one(&mut *conn)
            .await
            .context("Failed to insert post")?;

    let post_id: i64 = row.get("id");
    let created_at = row.get("created_at");

    for name in &input.tags {
        let tag_id = find_or_create_tag_sqlite(conn, name).await?;
        add_tag_to_post_sqlite(conn, tag_id, post_id).await?;
    }

    Ok(PostWithTags::new(
        Post {
            id: post_id,
            title: input.title.clone(),
            content: input.content.clone(),
            created_at,
        },
        input.tags.clone(),
    ))
}

async fn get_post_by_title_sqlite(pool: &SqlitePool, title: &str) -> Result<Option<Post>> {
    let row = sqlx::query(
        r#"
        SELECT id, title, content, created_at
        FROM posts
        WHERE title = ?
        ORDER BY id
        LIMIT 1
        "#,
    )
    .bind(title)
    .fetch_optional(pool)
    .await
    .context("Failed to get post by title")?;

    Ok(row.map(|row| row_to_post_sqlite(&row)))
}

async fn list_summaries_sqlite(pool: &SqlitePool) -> Result<Vec<PostSummary>> {
    let rows = sqlx::query("SELECT id, title FROM posts ORDER BY created_at DESC, id DESC")
        .fetch_all(pool)
        .await
        .context("Failed to list posts")?;

    Ok(rows
        .iter()
        .map(|row| PostSummary {
            id: row.get("id"),
            title: row.get("title"),
        })
        .collect())
}

async fn list_by_tag_name_sqlite(pool: &SqlitePool, tag_name: &str) -> Result<Vec<TaggedPost>> {
    let rows = sqlx::query(
        r#"
        SELECT p.id, p.title, p.created_at
        FROM posts p
        INNER JOIN post_tags pt ON p.id = pt.post_id
        INNER JOIN tags t ON pt.tag_id = t.id
        WHERE t.name = ?
        ORDER BY p.created_at DESC, p.id DESC
        "#,
    )
    .bind(tag_name)
    .fetch_all(pool)
    .await
    .context("Failed to list posts by tag")?;

    Ok(rows
        .iter()
        .map(|row| TaggedPost {
            id: row.get("id"),
            title: row.get("title"),
            created_at: row.get("created_at"),
        })
        .collect())
}

fn row_to_post_sqlite(row: &sqlx::sqlite::SqliteRow) -> Post {
    Post {
        id: row.get("id"),
        title: row.get("title"),
        content: row.get("content"),
        created_at: row.get("created_at"),
    }
}

// ============================================================================
// MySQL implementations
// ============================================================================

async fn create_post_mysql(pool: &MySqlPool, input: &CreatePostInput) -> Result<PostWithTags> {
    let mut tx = pool.begin().await.context("Failed to begin transaction")?;

    match insert_post_with_tags_mysql(&mut tx, input).await {
        Ok(created) => {
            tx.commit().await.context("Failed to commit post")?;
            Ok(created)
        }
        Err(e) => {
            if let Err(rollback_err) = tx.rollback().await {
                tracing::error!("Failed to roll back post creation: {}", rollback_err);
            }
            Err(e)
        }
    }
}

async fn insert_post_with_tags_mysql(
    conn: &mut MySqlConnection,
    input: &CreatePostInput,
) -> Result<PostWithTags> {
    let result = sqlx::query("INSERT INTO posts (title, content) VALUES (?, ?)")
        .bind(&input.title)
        .bind(&input.content)
        .execute(&mut *conn)
        .await
        .context("Failed to insert post")?;

    let post_id = result.last_insert_id() as i64;

    let created_at = sqlx::query_scalar("SELECT created_at FROM posts WHERE id = ?")
        .bind(post_id)
        .fetch_one(&mut *conn)
        .await
        .context("Failed to read post timestamp")?;

    for name in &input.tags {
        let tag_id = find_or_create_tag_mysql(conn, name).await?;
        add_tag_to_post_mysql(conn, tag_id, post_id).await?;
    }

    Ok(PostWithTags::new(
        Post {
            id: post_id,
            title: input.title.clone(),
            content: input.content.clone(),
            created_at,
        },
        input.tags.clone(),
    ))
}

async fn get_post_by_title_mysql(pool: &MySqlPool, title: &str) -> Result<Option<Post>> {
    let row = sqlx::query(
        r#"
        SELECT id, title, content, created_at
        FROM posts
        WHERE title = ?
        ORDER BY id
        LIMIT 1
        "#,
    )
    .bind(title)
    .fetch_optional(pool)
    .await
    .context("Failed to get post by title")?;

    Ok(row.map(|row| row_to_post_mysql(&row)))
}

async fn list_summaries_mysql(pool: &MySqlPool) -> Result<Vec<PostSummary>> {
    let rows = sqlx::query("SELECT id, title FROM posts ORDER BY created_at DESC, id DESC")
        .fetch_all(pool)
        .await
        .context("Failed to list posts")?;

    Ok(rows
        .iter()
        .map(|row| PostSummary {
            id: row.get("id"),
            title: row.get("title"),
        })
        .collect())
}

async fn list_by_tag_name_mysql(pool: &MySqlPool, tag_name: &str) -> Result<Vec<TaggedPost>> {
    let rows = sqlx::query(
        r#"
        SELECT p.id, p.title, p.created_at
        FROM posts p
        INNER JOIN post_tags pt ON p.id = pt.post_id
        INNER JOIN tags t ON pt.tag_id = t.id
        WHERE t.name = ?
        ORDER BY p.created_at DESC, p.id DESC
        "#,
    )
    .bind(tag_name)
    .fetch_all(pool)
    .await
    .context("Failed to list posts by tag")?;

    Ok(rows
        .iter()
        .map(|row| TaggedPost {
            id: row.get("id"),
            title: row.get("title"),
            created_at: row.get("created_at"),
        })
        .collect())
}

fn row_to_post_mysql(row: &sqlx::mysql::MySqlRow) -> Post {
    Post {
        id: row.get("id"),
        title: row.get("title"),
        content: row.get("content"),
        created_at: row.get("created_at"),
    }
}
