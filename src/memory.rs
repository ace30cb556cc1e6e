use std::sync::{Arc, Mutex, MutexGuard};

use axum::async_trait;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::error::RepoError;
use crate::movies::repo::CatalogRepo;
use crate::movies::repo_types::{CatalogEntry, EntryChanges, EntryFields};
use crate::users::repo::AccountRepo;
use crate::users::repo_types::{Account, AccountChanges, NewAccount};

#[derive(Debug, Default)]
struct Tables {
    accounts: Vec<Account>,
    entries: Vec<CatalogEntry>,
}

/// In-memory accounts and catalog for local runs and tests. Both repositories share one
/// lock so that deleting an account removes its entries in the same step.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    tables: Arc<Mutex<Tables>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Tables> {
        // Poisoning is ignored: every mutation is a single push, retain or field swap.
        self.tables.lock().unwrap_or_else(|p| p.into_inner())
    }
}

impl Tables {
    fn check_unique(
        &self,
        except: Option<Uuid>,
        username: Option<&str>,
        email: Option<&str>,
    ) -> Result<(), RepoError> {
        let others = self.accounts.iter().filter(|a| Some(a.id) != except);
        for a in others {
            if username.is_some_and(|u| a.username == u) {
                return Err(RepoError::Duplicate("username"));
            }
            if email.is_some_and(|e| a.email == e) {
                return Err(RepoError::Duplicate("email"));
            }
        }
        Ok(())
    }
}

#[async_trait]
impl AccountRepo for MemoryStore {
    async fn create(&self, new: NewAccount) -> Result<Account, RepoError> {
        let mut t = self.lock();
        t.check_unique(None, Some(&new.username), Some(&new.email))?;
        let account = Account {
            id: Uuid::new_v4(),
            username: new.username,
            email: new.email,
            password_hash: new.password_hash,
        };
        t.accounts.push(account.clone());
        Ok(account)
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<Account>, RepoError> {
        Ok(self.lock().accounts.iter().find(|a| a.username == username).cloned())
    }

    async fn list_visible(&self, caller: Uuid) -> Result<Vec<Account>, RepoError> {
        Ok(AccountRepo::get(self, caller, caller).await?.into_iter().collect())
    }

    async fn get(&self, caller: Uuid, id: Uuid) -> Result<Option<Account>, RepoError> {
        if id != caller {
            return Ok(None);
        }
        Ok(self.lock().accounts.iter().find(|a| a.id == id).cloned())
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
        let mut t = self.lock();
        t.check_unique(Some(id), changes.username.as_deref(), changes.email.as_deref())?;
        let Some(account) = t.accounts.iter_mut().find(|a| a.id == id) else {
            return Ok(None);
        };
        if let Some(v) = changes.username {
            account.username = v;
        }
        if let Some(v) = changes.email {
            account.email = v;
        }
        if let Some(v) = changes.password_hash {
            account.password_hash = v;
        }
        Ok(Some(account.clone()))
    }

    async fn delete(&self, caller: Uuid, id: Uuid) -> Result<bool, RepoError> {
        if id != caller {
            return Ok(false);
        }
        let mut t = self.lock();
        let before = t.accounts.len();
        t.accounts.retain(|a| a.id != id);
        if t.accounts.len() == before {
            return Ok(false);
        }
        t.entries.retain(|e| e.user_id != id);
        Ok(true)
    }
}

#[async_trait]
impl CatalogRepo for MemoryStore {
    async fn list(&self, owner: Uuid) -> Result<Vec<CatalogEntry>, RepoError> {
        let mut rows: Vec<_> = self
            .lock()
            .entries
            .iter()
            .filter(|e| e.user_id == owner)
            .cloned()
            .collect();
        // Stable, so same-instant entries keep insertion order.
        rows.sort_by_key(|e| e.created_at);
        Ok(rows)
    }

    async fn get(&self, owner: Uuid, id: Uuid) -> Result<Option<CatalogEntry>, RepoError> {
        Ok(self
            .lock()
            .entries
            .iter()
            .find(|e| e.id == id && e.user_id == owner)
            .cloned())
    }

    async fn create(&self, owner: Uuid, fields: EntryFields) -> Result<CatalogEntry, RepoError> {
        let mut t = self.lock();
        // Mirrors the owner foreign key.
        if !t.accounts.iter().any(|a| a.id == owner) {
            return Err(RepoError::Database(sqlx::Error::RowNotFound));
        }
        let entry = CatalogEntry {
            id: Uuid::new_v4(),
            user_id: owner,
            title: fields.title,
            kind: fields.kind,
            director: fields.director,
            budget: fields.budget,
            location: fields.location,
            duration: fields.duration,
            year: fields.year,
            created_at: OffsetDateTime::now_utc(),
        };
        t.entries.push(entry.clone());
        Ok(entry)
    }

    async fn update(
        &self,
        owner: Uuid,
        id: Uuid,
        changes: EntryChanges,
    ) -> Result<Option<CatalogEntry>, RepoError> {
        let mut t = self.lock();
        let Some(entry) = t.entries.iter_mut().find(|e| e.id == id && e.user_id == owner) else {
            return Ok(None);
        };
        entry.apply(changes);
        Ok(Some(entry.clone()))
    }

    async fn delete(&self, owner: Uuid, id: Uuid) -> Result<bool, RepoError> {
        let mut t = self.lock();
        let before = t.entries.len();
        t.entries.retain(|e| !(e.id == id && e.user_id == owner));
        Ok(t.entries.len() != before)
    }
}
