//! Domain-level constants.
//!
//! These constants define business rules and validation requirements.

// =============================================================================
// Validation
// =============================================================================

/// Minimum password length requirement (counted in characters, before hashing)
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Minimum name length requirement (after trimming)
pub const MIN_NAME_LENGTH: usize = 1;

/// Address grammar every normalized email must match.
pub const EMAIL_PATTERN: &str = r#"^(([^<>()\[\]\\.,;:\s@"]+(\.[^<>()\[\]\\.,;:\s@"]+)*)|(".+"))@((\[[0-9]{1,3}\.[0-9]{1,3}\.[0-9]{1,3}\.[0-9]{1,3}\])|(([a-zA-Z\-0-9]+\.)+[a-zA-Z]{2,}))$"#;

// =============================================================================
// Sessions
// =============================================================================

/// Default session token lifetime in hours
pub const DEFAULT_SESSION_TTL_HOURS: i64 = 24;
