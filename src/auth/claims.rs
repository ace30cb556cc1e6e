use serde::{Deserialize, Serialize};
use time::{Duration, OffsetDateTime};
use uuid::Uuid;

/// Access tokens open protected routes; refresh tokens only mint new access tokens.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

/// Registered JWT claims plus the token kind. `sub` is the account id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub iat: usize,
    pub exp: usize,
    pub iss: String,
    pub aud: String,
    pub kind: TokenKind,
}

impl Claims {
    pub fn issue(account_id: Uuid, kind: TokenKind, ttl: Duration, iss: &str, aud: &str) -> Self {
        let now = OffsetDateTime::now_utc();
        Self {
            sub: account_id,
            iat: now.unix_timestamp() as usize,
            exp: (now + ttl).unix_timestamp() as usize,
            iss: iss.to_owned(),
            aud: aud.to_owned(),
            kind,
        }
    }
}
