use axum::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::RepoError;
use crate::movies::repo_types::{CatalogEntry, EntryChanges, EntryFields};

/// Catalog persistence, scoped by owner on every call. Rows owned by someone else are
/// indistinguishable from rows that do not exist.
#[async_trait]
pub trait CatalogRepo: Send + Sync {
    /// All entries of `owner`, oldest first.
    async fn list(&self, owner: Uuid) -> Result<Vec<CatalogEntry>, RepoError>;

    async fn get(&self, owner: Uuid, id: Uuid) -> Result<Option<CatalogEntry>, RepoError>;

    async fn create(&self, owner: Uuid, fields: EntryFields) -> Result<CatalogEntry, RepoError>;

    async fn update(
        &self,
        owner: Uuid,
        id: Uuid,
        changes: EntryChanges,
    ) -> Result<Option<CatalogEntry>, RepoError>;

    async fn delete(&self, owner: Uuid, id: Uuid) -> Result<bool, RepoError>;
}

/// Postgres-backed catalog, table `catalog_entries`.
#[derive(Clone)]
pub struct PgCatalogRepo {
    db: PgPool,
}

impl PgCatalogRepo {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CatalogRepo for PgCatalogRepo {
    async fn list(&self, owner: Uuid) -> Result<Vec<CatalogEntry>, RepoError> {
        let rows = sqlx::query_as::<_, CatalogEntry>(
            r#"
            SELECT id, user_id, title, kind, director, budget, location, duration, year, created_at
            FROM catalog_entries
            WHERE user_id = $1
            ORDER BY created_at ASC, id ASC
            "#,
        )
        .bind(owner)
        .fetch_all(&self.db)
        .await?;
        Ok(rows)
    }

    async fn get(&self, owner: Uuid, id: Uuid) -> Result<Option<CatalogEntry>, RepoError> {
        let row = sqlx::query_as::<_, CatalogEntry>(
            r#"
            SELECT id, user_id, title, kind, director, budget, location, duration, year, created_at
            FROM catalog_entries
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(id)
        .bind(owner)
        .fetch_optional(&self.db)
        .await?;
        Ok(row)
    }

    async fn create(&self, owner: Uuid, fields: EntryFields) -> Result<CatalogEntry, RepoError> {
        let row = sqlx::query_as::<_, CatalogEntry>(
            r#"
            INSERT INTO catalog_entries
                (user_id, title, kind, director, budget, location, duration, year)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id, user_id, title, kind, director, budget, location, duration, year, created_at
            "#,
        )
        .bind(owner)
        .bind(fields.title)
        .bind(fields.kind)
        .bind(fields.director)
        .bind(fields.budget)
        .bind(fields.location)
        .bind(fields.duration)
        .bind(fields.year)
        .fetch_one(&self.db)
        .await?;
        Ok(row)
    }

    async fn update(
        &self,
        owner: Uuid,
        id: Uuid,
        changes: EntryChanges,
    ) -> Result<Option<CatalogEntry>, RepoError> {
        let row = sqlx::query_as::<_, CatalogEntry>(
            r#"
            UPDATE catalog_entries
               SET title    = COALESCE($3, title),
                   kind     = COALESCE($4, kind),
                   director = COALESCE($5, director),
                   budget   = COALESCE($6, budget),
                   location = COALESCE($7, location),
                   duration = COALESCE($8, duration),
                   year     = COALESCE($9, year)
             WHERE id = $1 AND user_id = $2
            RETURNING id, user_id, title, kind, director, budget, location, duration, year, created_at
            "#,
        )
        .bind(id)
        .bind(owner)
        .bind(changes.title)
        .bind(changes.kind)
        .bind(changes.director)
        .bind(changes.budget)
        .bind(changes.location)
        .bind(changes.duration)
        .bind(changes.year)
        .fetch_optional(&self.db)
        .await?;
        Ok(row)
    }

    async fn delete(&self, owner: Uuid, id: Uuid) -> Result<bool, RepoError> {
        let res = sqlx::query("DELETE FROM catalog_entries WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(owner)
            .execute(&self.db)
            .await?;
        Ok(res.rows_affected() == 1)
    }
}
