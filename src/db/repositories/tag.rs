//! Tag repository
//!
//! Database operations for tags.
//!
//! This module provides:
//! - `TagRepository` trait defining the read interface for tags
//! - `SqlxTagRepository` implementing the trait for SQLite and MySQL
//! - connection-level find-or-create and link helpers that the post
//!   repository runs inside its creation transaction

use crate::db::{Backend, DynDatabasePool};
use crate::models::{Tag, TagWithCount};
use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::{MySqlConnection, MySqlPool, Row, SqliteConnection, SqlitePool};
use std::sync::Arc;

/// Tag repository trait
#[async_trait]
pub trait TagRepository: Send + Sync {
    /// List all tags with their post counts, most used first
    async fn list_with_counts(&self) -> Result<Vec<TagWithCount>>;

    /// Get tags for a post, ordered by name
    async fn get_by_post_id(&self, post_id: i64) -> Result<Vec<Tag>>;
}

/// SQLx-based tag repository implementation
///
/// Supports both SQLite and MySQL databases.
pub struct SqlxTagRepository {
    pool: DynDatabasePool,
}

impl SqlxTagRepository {
    /// Create a new SQLx tag repository
    pub fn new(pool: DynDatabasePool) -> Self {
        Self { pool }
    }

    /// Create a boxed repository for use with dependency injection
    pub fn boxed(pool: DynDatabasePool) -> Arc<dyn TagRepository> {
        Arc::new(Self::new(pool))
    }
}

#[async_trait]
impl TagRepository for SqlxTagRepository {
    async fn list_with_counts(&self) -> Result<Vec<TagWithCount>> {
        match self.pool.backend() {
            Backend::Sqlite(pool) => list_tags_with_counts_sqlite(pool).await,
            Backend::Mysql(pool) => list_tags_with_counts_mysql(pool).await,
        }
    }

    async fn get_by_post_id(&self, post_id: i64) -> Result<Vec<Tag>> {
        match self.pool.backend() {
            Backend::Sqlite(pool) => get_tags_by_post_sqlite(pool, post_id).await,
            Backend::Mysql(pool) => get_tags_by_post_mysql(pool, post_id).await,
        }
    }
}

// ============================================================================
// SQLite implementations
// ============================================================================

/// Look up a tag by exact name on `conn`, inserting it when absent.
/// Returns the tag ID.
pub(crate) async fn find_or_create_tag_sqlite(
    conn: &mut SqliteConnection,
    name: &str,
) -> Result<i64> {
    let existing: Option<i64> = sqlx::query_scalar("SELECT id FROM tags WHERE name = ?")
        .bind(name)
        .fetch_optional(&mut *conn)
        .await
        .with_context(|| format!("Failed to look up tag '{}'", name))?;

    if let Some(id) = existing {
        return Ok(id);
    }

    let result = sqlx::query("INSERT INTO tags (name) VALUES (?)")
        .bind(name)
        .execute(&mut *conn)
        .await
        .with_context(|| format!("Failed to create tag '{}'", name))?;

    tracing::debug!(tag = name, "Created tag");
    Ok(result.last_insert_rowid())
}

/// Link a tag to a post on `conn`
pub(crate) async fn add_tag_to_post_sqlite(
    conn: &mut SqliteConnection,
    tag_id: i64,
    post_id: i64,
) -> Result<()> {
    sqlx::query("INSERT INTO post_tags (post_id, tag_id) VALUES (?, ?)")
        .bind(post_id)
        .bind(tag_id)
        .execute(&mut *conn)
        .await
        .context("Failed to add tag to post")?;

    Ok(())
}

async fn list_tags_with_counts_sqlite(pool: &SqlitePool) -> Result<Vec<TagWithCount>> {
    let rows = sqlx::query(
        r#"
        SELECT t.id, t.name, COUNT(pt.post_id) AS post_count
        FROM tags t
        LEFT JOIN post_tags pt ON t.id = pt.tag_id
        GROUP BY t.id, t.name
        ORDER BY post_count DESC, t.name ASC
        "#,
    )
    .fetch_all(pool)
    .await
    .context("Failed to list tags with counts")?;

    Ok(rows
        .iter()
        .map(|row| TagWithCount::new(row_to_tag_sqlite(row), row.get("post_count")))
        .collect())
}

async fn get_tags_by_post_sqlite(pool: &SqlitePool, post_id: i64) -> Result<Vec<Tag>> {
    let rows = sqlx::query(
        r#"
        SELECT t.id, t.name
        FROM tags t
        INNER JOIN post_tags pt ON t.id = pt.tag_id
        WHERE pt.post_id = ?
        ORDER BY t.name
        "#,
    )
    .bind(post_id)
    .fetch_all(pool)
    .await
    .context("Failed to get tags by post")?;

    Ok(rows.iter().map(row_to_tag_sqlite).collect())
}

fn row_to_tag_sqlite(row: &sqlx::sqlite::SqliteRow) -> Tag {
    Tag {
        id: row.get("id"),
        name: row.get("name"),
    }
}

// ============================================================================
// MySQL implementations
// ============================================================================

/// Look up a tag by exact name on `conn`, inserting it when absent.
/// Returns the tag ID.
pub(crate) async fn find_or_create_tag_mysql(
    conn: &mut MySqlConnection,
    name: &str,
) -> Result<i64> {
    let existing: Option<i64> = sqlx::query_scalar("SELECT id FROM tags WHERE name = ?")
        .bind(name)
        .fetch_optional(&mut *conn)
        .await
        .with_context(|| format!("Failed to look up tag '{}'", name))?;

    if let Some(id) = existing {
        return Ok(id);
    }

    let result = sqlx::query("INSERT INTO tags (name) VALUES (?)")
        .bind(name)
        .execute(&mut *conn)
        .await
        .with_context(|| format!("Failed to create tag '{}'", name))?;

    tracing::debug!(tag = name, "Created tag");
    Ok(result.last_insert_id() as i64)
}

/// Link a tag to a post on `conn`
pub(crate) async fn add_tag_to_post_mysql(
    conn: &mut MySqlConnection,
    tag_id: i64,
    post_id: i64,
) -> Result<()> {
    sqlx::query("INSERT INTO post_tags (post_id, tag_id) VALUES (?, ?)")
        .bind(post_id)
        .bind(tag_id)
        .execute(&mut *conn)
        .await
        .context("Failed to add tag to post")?;

    Ok(())
}

async fn list_tags_with_counts_mysql(pool: &MySqlPool) -> Result<Vec<TagWithCount>> {
    let rows = sqlx::query(
        r#"
        SELECT t.id, t.name, COUNT(pt.post_id) AS post_count
        FROM tags t
        LEFT JOIN post_tags pt ON t.id = pt.tag_id
        GROUP BY t.id, t.name
        ORDER BY post_count DESC, t.name ASC
        "#,
    )
    .fetch_all(pool)
    .await
    .context("Failed to list tags with counts")?;

    Ok(rows
        .iter()
        .map(|row| TagWithCount::new(row_to_tag_mysql(row), row.get("post_count")))
        .collect())
}

async fn get_tags_by_post_mysql(pool: &MySqlPool, post_id: i64) -> Result<Vec<Tag>> {
    let rows = sqlx::query(
        r#"
        SELECT t.id, t.name
        FROM tags t
        INNER JOIN post_tags pt ON t.id = pt.tag_id
        WHERE pt.post_id = ?
        ORDER BY t.name
        "#,
    )
    .bind(post_id)
    .fetch_all(pool)
    .await
    .context("Failed to get tags by post")?;

    Ok(rows.iter().map(row_to_tag_mysql).collect())
}

fn row_to_tag_mysql(row: &sqlx::mysql::MySqlRow) -> Tag {
    Tag {
        id: row.get("id"),
        name: row.get("name"),
    }
}
