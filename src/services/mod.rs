//! Application services layer - Use cases and business logic.
//!
//! Services orchestrate domain logic and infrastructure to fulfill
//! application use cases. They depend on abstractions (traits) for
//! dependency inversion.

mod auth_service;
pub mod container;
mod notifier;
mod token_service;

// Service Container
pub use container::{ServiceContainer, Services};

// Service traits and implementations
pub use auth_service::{AuthService, Authenticator, LoginOutcome};
pub use notifier::{EmailMessage, LogNotifier, Notifier};
pub use token_service::{Claims, TokenService};

#[cfg(any(test, feature = "test-utils"))]
pub use notifier::MockNotifier;
