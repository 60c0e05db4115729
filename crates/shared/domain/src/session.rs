//! Session token and revocation entry types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A signed bearer credential issued on successful login.
///
/// Never mutated after issue; revocation is recorded separately.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionToken {
    /// Opaque token string handed to the client
    pub value: String,
    /// Unique token identifier embedded in the token
    pub token_id: String,
    /// User the token is bound to
    pub user_id: Uuid,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl SessionToken {
    /// Seconds until expiry relative to `now`, never negative.
    pub fn remaining_seconds(&self, now: DateTime<Utc>) -> i64 {
        (self.expires_at - now).num_seconds().max(0)
    }
}

/// Record that a token was explicitly invalidated before its natural expiry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevocationEntry {
    /// Identifier of the revoked token
    pub token_id: String,
    pub revoked_at: DateTime<Utc>,
    /// Expiry of the revoked token; the entry is useless after this instant
    pub expires_at: DateTime<Utc>,
}

impl RevocationEntry {
    /// Whether the entry can be dropped because its token expired anyway.
    pub fn is_prunable(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}
