use axum::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::RepoError;
use crate::users::repo_types::{Account, AccountChanges, NewAccount};

/// Account persistence. Every lookup made on behalf of a caller only ever sees the
/// caller's own row; a foreign id behaves exactly like a missing one.
#[async_trait]
pub trait AccountRepo: Send + Sync {
    /// Insert a new account. Fails with `RepoError::Duplicate` on a taken username/email.
    async fn create(&self, new: NewAccount) -> Result<Account, RepoError>;

    /// Credential lookup for login; not caller-scoped.
    async fn find_by_username(&self, username: &str) -> Result<Option<Account>, RepoError>;

    /// Accounts visible to `caller`: its own, and nothing else.
    async fn list_visible(&self, caller: Uuid) -> Result<Vec<Account>, RepoError>;

    async fn get(&self, caller: Uuid, id: Uuid) -> Result<Option<Account>, RepoError>;

    async fn update(
        &self,
        caller: Uuid,
        id: Uuid,
        changes: AccountChanges,
    ) -> Result<Option<Account>, RepoError>;

    /// Delete the account and, through the owner foreign key, all of its entries.
    async fn delete(&self, caller: Uuid, id: Uuid) -> Result<bool, RepoError>;
}

/// Postgres-backed accounts, table `users`.
#[derive(Clone)]
pub struct PgAccountRepo {
    db: PgPool,
}

impl PgAccountRepo {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl AccountRepo for PgAccountRepo {
    async fn create(&self, new: NewAccount) -> Result<Account, RepoError> {
        sqlx::query_as::<_, Account>(
            r#"
            INSERT INTO users (username, email, password_hash)
            VALUES ($1, $2, $3)
            RETURNING id, username, email, password_hash
            "#,
        )
        .bind(&new.username)
        .bind(&new.email)
        .bind(&new.password_hash)
        .fetch_one(&self.db)
        .await
        .map_err(RepoError::from_sqlx)
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<Account>, RepoError> {
        let account = sqlx::query_as::<_, Account>(
            r#"
            SELECT id, username, email, password_hash
            FROM users
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(&self.db)
        .await?;
        Ok(account)
    }

    async fn list_visible(&self, caller: Uuid) -> Result<Vec<Account>, RepoError> {
        Ok(self.get(caller, caller).await?.into_iter().collect())
    }

    async fn get(&self, caller: Uuid, id: Uuid) -> Result<Option<Account>, RepoError> {
        if id != caller {
            return Ok(None);
        }
        let account = sqlx::query_as::<_, Account>(
            r#"
            SELECT id, username, email, password_hash
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await?;
        Ok(account)
    }

    async fn update(
        &self,
        caller: Uuid,
        id: Uuid,
        changes: AccountChanges,
    ) -> Result<Option<Account>, RepoError> {
        if id != caller {
            return Ok(None);
        }
        sqlx::query_as::<_, Account>(
            r#"
            UPDATE users
               SET username      = COALESCE($2, username),
                   email         = COALESCE($3, email),
                   password_hash = COALESCE($4, password_hash)
             WHERE id = $1
            RETURNING id, username, email, password_hash
            "#,
        )
        .bind(id)
        .bind(changes.username)
        .bind(changes.email)
        .bind(changes.password_hash)
        .fetch_optional(&self.db)
        .await
        .map_err(RepoError::from_sqlx)
    }

    async fn delete(&self, caller: Uuid, id: Uuid) -> Result<bool, RepoError> {
        if id != caller {
            return Ok(false);
        }
        let res = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await?;
        Ok(res.rows_affected() == 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_account(name: &str) -> NewAccount {
        NewAccount {
            username: name.into(),
            email: format!("{name}@example.com"),
            password_hash: "hash".into(),
        }
    }

    #[sqlx::test]
    #[ignore = "needs DATABASE_URL"]
    async fn pg_update_keeps_unset_columns(pool: PgPool) {
        let repo = PgAccountRepo::new(pool);
        let al = repo.create(new_account("al")).await.unwrap();

        let changes = AccountChanges {
            email: Some("new@example.com".into()),
            ..Default::default()
        };
        let updated = repo.update(al.id, al.id, changes).await.unwrap().unwrap();
        assert_eq!(updated.email, "new@example.com");
        assert_eq!(updated.username, "al");
        assert_eq!(updated.password_hash, "hash");
    }

    #[sqlx::test]
    #[ignore = "needs DATABASE_URL"]
    async fn pg_duplicates_and_foreign_ids(pool: PgPool) {
        let repo = PgAccountRepo::new(pool);
        let al = repo.create(new_account("al")).await.unwrap();
        let bo = repo.create(new_account("bo")).await.unwrap();

        let err = repo.create(new_account("al")).await.unwrap_err();
        assert!(matches!(err, RepoError::Duplicate("username")));

        let mut clash = new_account("cy");
        clash.email = al.email.clone();
        let err = repo.create(clash).await.unwrap_err();
        assert!(matches!(err, RepoError::Duplicate("email")));

        assert!(repo.get(al.id, bo.id).await.unwrap().is_none());
        assert!(!repo.delete(al.id, bo.id).await.unwrap());
        assert!(repo.delete(bo.id, bo.id).await.unwrap());
        assert!(repo.find_by_username("bo").await.unwrap().is_none());
    }
}
