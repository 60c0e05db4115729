//! User domain entity and related types.

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::constants::{EMAIL_PATTERN, MIN_NAME_LENGTH, MIN_PASSWORD_LENGTH};
use crate::error::{DomainError, DomainResult};
use crate::password::{Password, PasswordHasher};

static EMAIL_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(EMAIL_PATTERN).expect("email pattern is a valid regex"));

/// Trim and lowercase an email address.
///
/// Every lookup and every write goes through this, so `" A@B.com "` and
/// `"a@b.com"` address the same account.
pub fn normalize_email(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Check an already normalized email against the address grammar.
pub fn is_valid_email(normalized: &str) -> bool {
    EMAIL_REGEX.is_match(normalized)
}

/// User domain entity.
///
/// Carries no password material; see [`UserCredentials`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A user together with the stored password hash.
///
/// Only returned by explicit credential lookups used for login.
#[derive(Debug, Clone)]
pub struct UserCredentials {
    pub user: User,
    pub password: Password,
}

/// Registration input that passed every format rule.
///
/// Holds the plaintext only until [`Registration::hash_password`] consumes it.
pub struct Registration {
    name: String,
    email: String,
    password: String,
}

// Never print the plaintext
impl std::fmt::Debug for Registration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registration")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

impl Registration {
    /// Normalize and validate raw registration fields.
    ///
    /// # Errors
    /// `DomainError::Validation` naming the first rule that failed.
    pub fn parse(name: &str, email: &str, password: &str) -> DomainResult<Self> {
        let name = name.trim();
        if name.chars().count() < MIN_NAME_LENGTH {
            return Err(DomainError::validation("Name is required"));
        }

        let email = normalize_email(email);
        if email.is_empty() {
            return Err(DomainError::validation("Email is required"));
        }
        if !is_valid_email(&email) {
            return Err(DomainError::validation("Please fill a valid email address"));
        }

        if password.chars().count() < MIN_PASSWORD_LENGTH {
            return Err(DomainError::validation(format!(
                "Password must be at least {} characters long",
                MIN_PASSWORD_LENGTH
            )));
        }

        Ok(Self {
            name: name.to_string(),
            email,
            password: password.to_string(),
        })
    }

    /// Normalized email of this registration.
    pub fn email(&self) -> &str {
        &self.email
    }

    /// Trimmed display name of this registration.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Hash the password, producing a record ready for persistence.
    pub fn hash_password(self, hasher: &PasswordHasher) -> DomainResult<NewUser> {
        let password = hasher.hash(&self.password)?;
        Ok(NewUser {
            name: self.name,
            email: self.email,
            password,
        })
    }
}

/// A validated user whose password is already hashed.
///
/// The only input accepted by credential store `create`.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password: Password,
}

/// User response (safe to return to client)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    /// Unique user identifier
    pub id: Uuid,
    /// User display name
    pub name: String,
    /// Normalized email address
    pub email: String,
    /// Account creation timestamp
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            created_at: user.created_at,
        }
    }
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            created_at: user.created_at,
        }
    }
}
