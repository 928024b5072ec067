// ABOUTME: Tag storage layer using SQLite
// ABOUTME: Filtered listing on the pool, mutations inside caller-owned transactions

use chrono::{DateTime, SubsecRound, TimeDelta, Utc};
use sqlx::{Executor, QueryBuilder, Row, Sqlite, SqlitePool, Transaction};
use tracing::debug;

use super::query::{SortField, TagQuery};
use super::types::{Tag, TagCreateInput, TagUpdateInput};
use quillpad_storage::{format_timestamp, parse_timestamp, StorageError};

pub struct TagStorage {
    pool: SqlitePool,
}

impl TagStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// List tags matching `query`.
    /// Returns the requested page and the number of matching rows before paging.
    pub async fn list_tags(&self, query: &TagQuery) -> Result<(Vec<Tag>, i64), StorageError> {
        debug!(
            "Fetching tags (name: {:?}, since: {:?}, sort: {} {}, page: {:?})",
            query.name_contains,
            query.since,
            query.sort.column(),
            query.direction.keyword(),
            query.page
        );

        let mut count_query = QueryBuilder::<Sqlite>::new("SELECT COUNT(*) FROM tags");
        push_filters(&mut count_query, query);
        let total = count_query
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await?;

        // Column and direction come from allow-listed enums; values are bound
        let mut select = QueryBuilder::<Sqlite>::new("SELECT * FROM tags");
        push_filters(&mut select, query);
        select.push(format!(
            " ORDER BY {} {}",
            query.sort.column(),
            query.direction.keyword()
        ));
        if query.sort != SortField::Id {
            select.push(", id ASC");
        }

        if let Some(page) = &query.page {
            select.push(" LIMIT ");
            select.push_bind(page.limit());
            select.push(" OFFSET ");
            select.push_bind(page.offset());
        }

        let rows = select.build().fetch_all(&self.pool).await?;

        let tags = rows
            .iter()
            .map(row_to_tag)
            .collect::<Result<Vec<_>, _>>()?;

        Ok((tags, total))
    }

    /// Get a single tag by ID
    pub async fn get_tag(&self, tag_id: &str) -> Result<Option<Tag>, StorageError> {
        debug!("Fetching tag: {}", tag_id);
        fetch_tag(&self.pool, tag_id).await
    }

    /// Open a transaction for a mutation. The caller commits or rolls back.
    pub async fn begin(&self) -> Result<TagTransaction, StorageError> {
        let tx = self.pool.begin().await?;
        Ok(TagTransaction { tx })
    }
}

/// Tag mutations sharing one database transaction
pub struct TagTransaction {
    tx: Transaction<'static, Sqlite>,
}

impl TagTransaction {
    /// Insert a new tag. A taken name surfaces as `StorageError::UniqueViolation`.
    pub async fn create_tag(&mut self, input: TagCreateInput) -> Result<Tag, StorageError> {
        let tag_id = format!("tag-{}", nanoid::nanoid!());
        let now = quillpad_storage::now();

        debug!("Creating tag: {} (name: {})", tag_id, input.name);

        sqlx::query(
            r#"
            INSERT INTO tags (id, name, created_at, updated_at)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(&tag_id)
        .bind(&input.name)
        .bind(format_timestamp(&now))
        .bind(format_timestamp(&now))
        .execute(&mut *self.tx)
        .await?;

        Ok(Tag {
            id: tag_id,
            name: input.name,
            created_at: now,
            updated_at: now,
        })
    }

    /// Apply the provided fields and refresh `updated_at`.
    /// Returns `None` when the tag does not exist.
    pub async fn update_tag(
        &mut self,
        tag_id: &str,
        input: TagUpdateInput,
    ) -> Result<Option<Tag>, StorageError> {
        debug!("Updating tag: {}", tag_id);

        let now = quillpad_storage::now();
        let mut query = QueryBuilder::<Sqlite>::new("UPDATE tags SET updated_at = ");
        query.push_bind(format_timestamp(&now));

        if let Some(name) = input.name {
            query.push(", name = ");
            query.push_bind(name);
        }

        query.push(" WHERE id = ");
        query.push_bind(tag_id);

        let result = query.build().execute(&mut *self.tx).await?;
        if result.rows_affected() == 0 {
            return Ok(None);
        }

        fetch_tag(&mut *self.tx, tag_id).await
    }

    /// Delete a tag. Returns false when the tag does not exist.
    pub async fn delete_tag(&mut self, tag_id: &str) -> Result<bool, StorageError> {
        debug!("Deleting tag: {}", tag_id);

        let result = sqlx::query("DELETE FROM tags WHERE id = ?")
            .bind(tag_id)
            .execute(&mut *self.tx)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn commit(self) -> Result<(), StorageError> {
        self.tx.commit().await?;
        Ok(())
    }

    pub async fn rollback(self) -> Result<(), StorageError> {
        self.tx.rollback().await?;
        Ok(())
    }
}

fn push_filters(builder: &mut QueryBuilder<'_, Sqlite>, query: &TagQuery) {
    let mut separator = " WHERE ";

    if let Some(name) = &query.name_contains {
        // instr() is case-sensitive and treats % and _ literally, unlike LIKE
        builder.push(separator);
        builder.push("instr(name, ");
        builder.push_bind(name.clone());
        builder.push(") > 0");
        separator = " AND ";
    }

    if let Some(since) = &query.since {
        builder.push(separator);
        builder.push("updated_at >= ");
        builder.push_bind(format_timestamp(&lower_bound(since)));
    }
}

/// Round up to the stored microsecond precision so the inclusive bound never
/// admits a row earlier than `since`
fn lower_bound(since: &DateTime<Utc>) -> DateTime<Utc> {
    let truncated = since.trunc_subsecs(6);
    if truncated < *since {
        truncated + TimeDelta::microseconds(1)
    } else {
        truncated
    }
}

async fn fetch_tag<'e, E>(executor: E, tag_id: &str) -> Result<Option<Tag>, StorageError>
where
    E: Executor<'e, Database = Sqlite>,
{
    let row = sqlx::query("SELECT * FROM tags WHERE id = ?")
        .bind(tag_id)
        .fetch_optional(executor)
        .await?;

    row.as_ref().map(row_to_tag).transpose()
}

/// Convert a database row to a Tag
fn row_to_tag(row: &sqlx::sqlite::SqliteRow) -> Result<Tag, StorageError> {
    let created_at: String = row.try_get("created_at")?;
    let updated_at: String = row.try_get("updated_at")?;

    Ok(Tag {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        created_at: parse_timestamp(&created_at)?,
        updated_at: parse_timestamp(&updated_at)?,
    })
}
