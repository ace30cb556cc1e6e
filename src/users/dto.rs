use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ApiError;
use crate::users::repo_types::Account;
use crate::validation::{
    is_valid_email, non_null, non_null_trimmed, optional_text, require_text, trimmed,
};

const USERNAME_MAX: usize = 150;
const EMAIL_MAX: usize = 254;

/// Body for `POST /users/` and `PUT /users/{id}/`. The password is write-only and kept
/// byte-for-byte; username and email are trimmed.
#[derive(Debug, Deserialize)]
pub struct AccountRequest {
    #[serde(deserialize_with = "trimmed")]
    pub username: String,
    #[serde(deserialize_with = "trimmed")]
    pub email: String,
    pub password: String,
}

impl AccountRequest {
    pub fn validate(&self) -> Result<(), ApiError> {
        require_text("username", &self.username, USERNAME_MAX)?;
        check_email(&self.email)?;
        require_text("password", &self.password, usize::MAX)
    }
}

/// Body for `PATCH /users/{id}/`.
#[derive(Debug, Default, Deserialize)]
pub struct AccountPatch {
    #[serde(default, deserialize_with = "non_null_trimmed")]
    pub username: Option<String>,
    #[serde(default, deserialize_with = "non_null_trimmed")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "non_null")]
    pub password: Option<String>,
}

impl AccountPatch {
    pub fn validate(&self) -> Result<(), ApiError> {
        optional_text("username", self.username.as_deref(), USERNAME_MAX)?;
        if let Some(email) = &self.email {
            check_email(email)?;
        }
        optional_text("password", self.password.as_deref(), usize::MAX)
    }
}

impl From<AccountRequest> for AccountPatch {
    fn from(r: AccountRequest) -> Self {
        Self {
            username: Some(r.username),
            email: Some(r.email),
            password: Some(r.password),
        }
    }
}

fn check_email(email: &str) -> Result<(), ApiError> {
    require_text("email", email, EMAIL_MAX)?;
    if !is_valid_email(email) {
        return Err(ApiError::validation("email: Enter a valid email address."));
    }
    Ok(())
}

/// Public part of the account returned to the client.
#[derive(Debug, Serialize)]
pub struct PublicAccount {
    pub id: Uuid,
    pub username: String,
    pub email: String,
}

impl From<Account> for PublicAccount {
    fn from(a: Account) -> Self {
        Self {
            id: a.id,
            username: a.username,
            email: a.email,
        }
    }
}
