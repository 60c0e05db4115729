//! Authentication service - Register, login and logout.
//!
//! Registration runs as explicit stages: validate, hash, persist.

use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use super::notifier::{EmailMessage, Notifier};
use super::token_service::TokenService;
use crate::errors::{AppError, AppResult};
use crate::infra::UserRepository;
use domain::{PasswordHasher, Registration, SessionToken, User};

/// Result of a successful login
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    pub user: User,
    pub token: SessionToken,
}

/// Authentication service trait for dependency injection.
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Register a new user
    async fn register(&self, name: String, email: String, password: String) -> AppResult<User>;

    /// Verify credentials and issue a session token
    async fn login(&self, email: String, password: String) -> AppResult<LoginOutcome>;

    /// Revoke a session token. Succeeds for unknown or expired tokens.
    async fn logout(&self, token: &str) -> AppResult<()>;

    /// Validate a session token and return its user id
    async fn authenticate(&self, token: &str) -> AppResult<Uuid>;

    /// Load the user behind an authenticated session
    async fn profile(&self, user_id: Uuid) -> AppResult<User>;
}

/// Concrete implementation of AuthService.
pub struct Authenticator {
    users: Arc<dyn UserRepository>,
    tokens: TokenService,
    hasher: PasswordHasher,
    notifier: Arc<dyn Notifier>,
}

impl Authenticator {
    pub fn new(
        users: Arc<dyn UserRepository>,
        tokens: TokenService,
        hasher: PasswordHasher,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            users,
            tokens,
            hasher,
            notifier,
        }
    }

    /// Send the welcome email in the background. Failures are only logged.
    fn send_welcome(&self, user: &User) {
        let notifier = self.notifier.clone();
        let message = EmailMessage::welcome(&user.name, &user.email);
        let user_id = user.id;

        tokio::spawn(async move {
            if let Err(e) = notifier.send(message).await {
                tracing::warn!(user_id = %user_id, error = %e, "Welcome email failed");
            }
        });
    }
}

#[async_trait]
impl AuthService for Authenticator {
    async fn register(&self, name: String, email: String, password: String) -> AppResult<User> {
        let registration = Registration::parse(&name, &email, &password)?;

        if self.users.find_by_email(registration.email()).await?.is_some() {
            return Err(AppError::DuplicateEmail);
        }

        let hasher = self.hasher.clone();
        let new_user =
            tokio::task::spawn_blocking(move || registration.hash_password(&hasher)).await??;

        // The store rejects a concurrent winner with DuplicateEmail
        let user = self.users.create(new_user).await?;
        tracing::info!(user_id = %user.id, "User registered");

        self.send_welcome(&user);
        Ok(user)
    }

    async fn login(&self, email: String, password: String) -> AppResult<LoginOutcome> {
        let credentials = self.users.find_credentials_by_email(&email).await?;

        // Unknown emails still pay for one verification
        let hasher = self.hasher.clone();
        let verified = tokio::task::spawn_blocking(move || match credentials {
            Some(credentials) if hasher.verify(&password, &credentials.password) => {
                Some(credentials.user)
            }
            Some(_) => None,
            None => {
                hasher.verify_decoy(&password);
                None
            }
        })
        .await?;

        let Some(user) = verified else {
            tracing::debug!("Login rejected");
            return Err(AppError::InvalidCredentials);
        };

        let token = self.tokens.issue(user.id)?;
        tracing::info!(user_id = %user.id, token_id = %token.token_id, "User logged in");

        Ok(LoginOutcome { user, token })
    }

    async fn logout(&self, token: &str) -> AppResult<()> {
        self.tokens.revoke(token).await
    }

    async fn authenticate(&self, token: &str) -> AppResult<Uuid> {
        self.tokens.validate(token).await
    }

    async fn profile(&self, user_id: Uuid) -> AppResult<User> {
        self.users
            .find_by_id(user_id)
            .await?
            .ok_or(AppError::InvalidToken)
    }
}
