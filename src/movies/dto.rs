use serde::{de, Deserialize, Deserializer, Serialize};
use time::Date;
use uuid::Uuid;

use crate::error::ApiError;
use crate::movies::repo_types::{CatalogEntry, EntryChanges, EntryFields, EntryKind};
use crate::validation::{
    non_null, non_null_trimmed, optional_text, require_text, trimmed, NULL_FIELD,
};

time::serde::format_description!(iso_date, Date, "[year]-[month]-[day]");

const TEXT_MAX: usize = 200;
const DURATION_MAX: usize = 30;

/// Body for `POST /movies/` and `PUT /movies/{id}/`. A client-sent `user` is ignored.
#[derive(Debug, Deserialize)]
pub struct EntryRequest {
    #[serde(rename = "Title", deserialize_with = "trimmed")]
    pub title: String,
    #[serde(rename = "Type")]
    pub kind: EntryKind,
    #[serde(rename = "Director", deserialize_with = "trimmed")]
    pub director: String,
    #[serde(rename = "Budget", deserialize_with = "trimmed")]
    pub budget: String,
    #[serde(rename = "Location", deserialize_with = "trimmed")]
    pub location: String,
    #[serde(rename = "Duration", deserialize_with = "trimmed")]
    pub duration: String,
    #[serde(with = "iso_date")]
    pub year: Date,
}

impl EntryRequest {
    pub fn validate(&self) -> Result<(), ApiError> {
        require_text("Title", &self.title, TEXT_MAX)?;
        require_text("Director", &self.director, TEXT_MAX)?;
        require_text("Budget", &self.budget, TEXT_MAX)?;
        require_text("Location", &self.location, TEXT_MAX)?;
        require_text("Duration", &self.duration, DURATION_MAX)
    }
}

impl From<EntryRequest> for EntryFields {
    fn from(r: EntryRequest) -> Self {
        Self {
            title: r.title,
            kind: r.kind,
            director: r.director,
            budget: r.budget,
            location: r.location,
            duration: r.duration,
            year: r.year,
        }
    }
}

/// Body for `PATCH /movies/{id}/`.
#[derive(Debug, Default, Deserialize)]
pub struct EntryPatch {
    #[serde(rename = "Title", default, deserialize_with = "non_null_trimmed")]
    pub title: Option<String>,
    #[serde(rename = "Type", default, deserialize_with = "non_null")]
    pub kind: Option<EntryKind>,
    #[serde(rename = "Director", default, deserialize_with = "non_null_trimmed")]
    pub director: Option<String>,
    #[serde(rename = "Budget", default, deserialize_with = "non_null_trimmed")]
    pub budget: Option<String>,
    #[serde(rename = "Location", default, deserialize_with = "non_null_trimmed")]
    pub location: Option<String>,
    #[serde(rename = "Duration", default, deserialize_with = "non_null_trimmed")]
    pub duration: Option<String>,
    #[serde(default, deserialize_with = "non_null_year")]
    pub year: Option<Date>,
}

impl EntryPatch {
    pub fn validate(&self) -> Result<(), ApiError> {
        optional_text("Title", self.title.as_deref(), TEXT_MAX)?;
        optional_text("Director", self.director.as_deref(), TEXT_MAX)?;
        optional_text("Budget", self.budget.as_deref(), TEXT_MAX)?;
        optional_text("Location", self.location.as_deref(), TEXT_MAX)?;
        optional_text("Duration", self.duration.as_deref(), DURATION_MAX)
    }
}

fn non_null_year<'de, D>(d: D) -> Result<Option<Date>, D::Error>
where
    D: Deserializer<'de>,
{
    iso_date::option::deserialize(d)?
        .map(Some)
        .ok_or_else(|| de::Error::custom(NULL_FIELD))
}

impl From<EntryPatch> for EntryChanges {
    fn from(p: EntryPatch) -> Self {
        Self {
            title: p.title,
            kind: p.kind,
            director: p.director,
            budget: p.budget,
            location: p.location,
            duration: p.duration,
            year: p.year,
        }
    }
}

/// Entry as returned to its owner.
#[derive(Debug, Serialize)]
pub struct EntryResponse {
    pub id: Uuid,
    pub user: Uuid,
    #[serde(rename = "Type")]
    pub kind: EntryKind,
    #[serde(rename = "Title")]
    pub title: String,
    #[serde(rename = "Director")]
    pub director: String,
    #[serde(rename = "Budget")]
    pub budget: String,
    #[serde(rename = "Location")]
    pub location: String,
    #[serde(rename = "Duration")]
    pub duration: String,
    #[serde(with = "iso_date")]
    pub year: Date,
}

impl From<CatalogEntry> for EntryResponse {
    fn from(e: CatalogEntry) -> Self {
        Self {
            id: e.id,
            user: e.user_id,
            kind: e.kind,
            title: e.title,
            director: e.director,
            budget: e.budget,
            location: e.location,
            duration: e.duration,
            year: e.year,
        }
    }
}
