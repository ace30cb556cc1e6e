use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::{Date, OffsetDateTime};
use uuid::Uuid;

/// What a catalog entry describes. Stored as the Postgres enum `catalog_kind`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "catalog_kind")]
pub enum EntryKind {
    Movie,
    Show,
}

/// Catalog entry row. `user_id` is the owning account and never changes.
#[derive(Debug, Clone, FromRow)]
pub struct CatalogEntry {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub kind: EntryKind,
    pub director: String,
    pub budget: String,
    pub location: String,
    pub duration: String,
    pub year: Date,
    pub created_at: OffsetDateTime,
}

/// Writable columns of a new entry. The owner is passed separately.
#[derive(Debug, Clone)]
pub struct EntryFields {
    pub title: String,
    pub kind: EntryKind,
    pub director: String,
    pub budget: String,
    pub location: String,
    pub duration: String,
    pub year: Date,
}

/// Column updates; `None` keeps the stored value.
#[derive(Debug, Clone, Default)]
pub struct EntryChanges {
    pub title: Option<String>,
    pub kind: Option<EntryKind>,
    pub director: Option<String>,
    pub budget: Option<String>,
    pub location: Option<String>,
    pub duration: Option<String>,
    pub year: Option<Date>,
}

impl From<EntryFields> for EntryChanges {
    fn from(f: EntryFields) -> Self {
        Self {
            title: Some(f.title),
            kind: Some(f.kind),
            director: Some(f.director),
            budget: Some(f.budget),
            location: Some(f.location),
            duration: Some(f.duration),
            year: Some(f.year),
        }
    }
}

impl CatalogEntry {
    pub fn apply(&mut self, changes: EntryChanges) {
        if let Some(v) = changes.title {
            self.title = v;
        }
        if let Some(v) = changes.kind {
            self.kind = v;
        }
        if let Some(v) = changes.director {
            self.director = v;
        }
        if let Some(v) = changes.budget {
            self.budget = v;
        }
        if let Some(v) = changes.location {
            self.location = v;
        }
        if let Some(v) = changes.duration {
            self.duration = v;
        }
        if let Some(v) = changes.year {
            self.year = v;
        }
    }
}
