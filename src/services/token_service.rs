//! Session token issue, validation and revocation.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::Config;
use crate::errors::{AppError, AppResult};
use crate::infra::RevocationList;
use domain::{RevocationEntry, SessionToken};

/// JWT claims payload
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub jti: String,
    pub iat: i64,
    pub exp: i64,
}

/// Signs session tokens and checks them against the revocation list.
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl: Duration,
    revocations: Arc<dyn RevocationList>,
}

impl TokenService {
    pub fn new(secret: &[u8], ttl: Duration, revocations: Arc<dyn RevocationList>) -> Self {
        // Expiry is checked by hand after the signature so it can be reported separately
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
            ttl,
            revocations,
        }
    }

    /// # Errors
    /// Returns `AppError::Config` if the configured session lifetime is out of range.
    pub fn from_config(config: &Config, revocations: Arc<dyn RevocationList>) -> AppResult<Self> {
        Ok(Self::new(
            config.jwt_secret_bytes(),
            config.session_ttl()?,
            revocations,
        ))
    }

    /// Issue a token for `user_id` starting now.
    pub fn issue(&self, user_id: Uuid) -> AppResult<SessionToken> {
        self.issue_at(user_id, Utc::now())
    }

    /// Issue a token as if the current time were `now`.
    pub fn issue_at(&self, user_id: Uuid, now: DateTime<Utc>) -> AppResult<SessionToken> {
        let iat = now.timestamp();
        let exp = iat + self.ttl.num_seconds();
        let claims = Claims {
            sub: user_id,
            jti: Uuid::new_v4().to_string(),
            iat,
            exp,
        };

        let value = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AppError::internal(format!("Token signing failed: {}", e)))?;

        Ok(SessionToken {
            value,
            token_id: claims.jti,
            user_id,
            issued_at: timestamp(iat)?,
            expires_at: timestamp(exp)?,
        })
    }

    /// Validate a token and return the user it is bound to.
    pub async fn validate(&self, token: &str) -> AppResult<Uuid> {
        self.validate_at(token, Utc::now()).await
    }

    /// Validate as of `now`.
    ///
    /// Checks run in order: signature and format, expiry, revocation.
    pub async fn validate_at(&self, token: &str, now: DateTime<Utc>) -> AppResult<Uuid> {
        let claims = self.decode_claims(token).ok_or(AppError::InvalidToken)?;

        if claims.exp <= now.timestamp() {
            return Err(AppError::ExpiredToken);
        }

        if self.revocations.is_revoked(&claims.jti).await? {
            return Err(AppError::RevokedToken);
        }

        Ok(claims.sub)
    }

    /// Revoke a token. Malformed and already expired tokens are ignored.
    pub async fn revoke(&self, token: &str) -> AppResult<()> {
        self.revoke_at(token, Utc::now()).await
    }

    /// Revoke as of `now`.
    pub async fn revoke_at(&self, token: &str, now: DateTime<Utc>) -> AppResult<()> {
        let Some(claims) = self.decode_claims(token) else {
            tracing::debug!("Ignoring revocation of malformed token");
            return Ok(());
        };

        if claims.exp <= now.timestamp() {
            tracing::debug!(token_id = %claims.jti, "Ignoring revocation of expired token");
            return Ok(());
        }

        let entry = RevocationEntry {
            token_id: claims.jti,
            revoked_at: now,
            expires_at: timestamp(claims.exp)?,
        };
        tracing::info!(token_id = %entry.token_id, user_id = %claims.sub, "Token revoked");

        self.revocations.revoke(entry).await
    }

    fn decode_claims(&self, token: &str) -> Option<Claims> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .ok()
    }
}

fn timestamp(secs: i64) -> AppResult<DateTime<Utc>> {
    DateTime::from_timestamp(secs, 0)
        .ok_or_else(|| AppError::internal(format!("Timestamp out of range: {}", secs)))
}
