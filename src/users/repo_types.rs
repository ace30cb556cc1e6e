use sqlx::FromRow;
use uuid::Uuid;

/// Account record in the database.
#[derive(Debug, Clone, FromRow)]
pub struct Account {
    pub id: Uuid,              // unique account ID
    pub username: String,      // login name, unique
    pub email: String,         // unique
    pub password_hash: String, // Argon2 hash, never leaves the server
}

/// Values for a new account row; the password is already hashed.
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub username: String,
    pub email: String,
    pub password_hash: String,
}

/// Column updates for an account; `None` keeps the stored value.
#[derive(Debug, Clone, Default)]
pub struct AccountChanges {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password_hash: Option<String>,
}
