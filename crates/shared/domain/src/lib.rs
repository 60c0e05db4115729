//! Domain layer - Core business entities and value objects.
//!
//! This crate contains pure domain logic with no infrastructure dependencies:
//! user records, registration rules, password hashing and session types.

pub mod constants;
pub mod error;
pub mod password;
pub mod session;
pub mod user;

pub use constants::*;
pub use error::{DomainError, DomainResult};
pub use password::{HashCost, Password, PasswordHasher};
pub use session::{RevocationEntry, SessionToken};
pub use user::{
    is_valid_email, normalize_email, NewUser, Registration, User, UserCredentials, UserResponse,
};
