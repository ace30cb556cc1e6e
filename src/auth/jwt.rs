use std::time::Duration;

use axum::extract::FromRef;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use time::Duration as TimeDuration;
use tracing::debug;
use uuid::Uuid;

use super::claims::{Claims, TokenKind};
use crate::{config::JwtConfig, state::AppState};

/// Signing and verification keys plus the claims every token must carry.
#[derive(Clone)]
pub struct JwtKeys {
    pub encoding: EncodingKey,
    pub decoding: DecodingKey,
    pub issuer: String,
    pub audience: String,
    pub access_ttl: Duration,
    pub refresh_ttl: Duration,
}

impl From<&JwtConfig> for JwtKeys {
    fn from(cfg: &JwtConfig) -> Self {
        Self {
            encoding: EncodingKey::from_secret(cfg.secret.as_bytes()),
            decoding: DecodingKey::from_secret(cfg.secret.as_bytes()),
            issuer: cfg.issuer.clone(),
            audience: cfg.audience.clone(),
            access_ttl: Duration::from_secs((cfg.ttl_minutes.max(0) as u64) * 60),
            refresh_ttl: Duration::from_secs((cfg.refresh_ttl_minutes.max(0) as u64) * 60),
        }
    }
}

impl FromRef<AppState> for JwtKeys {
    fn from_ref(state: &AppState) -> Self {
        Self::from(&state.config.jwt)
    }
}

impl JwtKeys {
    fn sign_with_kind(&self, account_id: Uuid, kind: TokenKind) -> anyhow::Result<String> {
        let ttl = match kind {
            TokenKind::Access => self.access_ttl,
            TokenKind::Refresh => self.refresh_ttl,
        };
        let ttl = TimeDuration::seconds(ttl.as_secs() as i64);
        let claims = Claims::issue(account_id, kind, ttl, &self.issuer, &self.audience);
        let token = encode(&Header::default(), &claims, &self.encoding)?;
        debug!(account_id = %account_id, kind = ?kind, "jwt signed");
        Ok(token)
    }

    pub fn sign_access(&self, account_id: Uuid) -> anyhow::Result<String> {
        self.sign_with_kind(account_id, TokenKind::Access)
    }

    pub fn sign_refresh(&self, account_id: Uuid) -> anyhow::Result<String> {
        self.sign_with_kind(account_id, TokenKind::Refresh)
    }

    pub fn verify(&self, token: &str) -> anyhow::Result<Claims> {
        let mut validation = Validation::default();
        validation.set_audience(std::slice::from_ref(&self.audience));
        validation.set_issuer(std::slice::from_ref(&self.issuer));
        let data = decode::<Claims>(token, &self.decoding, &validation)?;
        debug!(account_id = %data.claims.sub, kind = ?data.claims.kind, "jwt verified");
        Ok(data.claims)
    }

    pub fn verify_access(&self, token: &str) -> anyhow::Result<Claims> {
        let claims = self.verify(token)?;
        if claims.kind != TokenKind::Access {
            anyhow::bail!("not an access token");
        }
        Ok(claims)
    }

    pub fn verify_refresh(&self, token: &str) -> anyhow::Result<Claims> {
        let claims = self.verify(token)?;
        if claims.kind != TokenKind::Refresh {
            anyhow::bail!("not a refresh token");
        }
        Ok(claims)
    }
}
