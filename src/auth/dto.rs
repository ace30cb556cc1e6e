use serde::{Deserialize, Serialize};

use crate::validation::trimmed;

/// Request body for `POST /token/`.
#[derive(Debug, Deserialize)]
pub struct TokenRequest {
    #[serde(deserialize_with = "trimmed")]
    pub username: String,
    pub password: String,
}

/// Response returned after a successful login.
#[derive(Debug, Serialize)]
pub struct TokenPair {
    pub access: String,
    pub refresh: String,
}

/// Request body for `POST /token/refresh/`.
#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh: String,
}

#[derive(Debug, Serialize)]
pub struct AccessToken {
    pub access: String,
}
