//! Service Container - Wires one backend set behind the service traits.
//!
//! Two backend sets exist: PostgreSQL + Redis for deployments, and
//! in-process maps for `serve --in-memory` and tests.

use std::sync::Arc;

use chrono::Utc;
use tokio::task::JoinHandle;
use tokio::time::{interval, Duration, MissedTickBehavior};

use super::{AuthService, Authenticator, LogNotifier, Notifier, TokenService};
use crate::config::Config;
use crate::errors::AppResult;
use crate::infra::{
    Cache, Database, MemoryRevocationList, MemoryUserStore, RedisRevocationList, RevocationList,
    UserRepository, UserStore,
};
use domain::PasswordHasher;

/// Service container trait for dependency injection.
pub trait ServiceContainer: Send + Sync {
    /// Get authentication service
    fn auth(&self) -> Arc<dyn AuthService>;

    /// Get the revocation list backing the token service
    fn revocations(&self) -> Arc<dyn RevocationList>;
}

/// Concrete implementation of ServiceContainer
#[derive(Clone)]
pub struct Services {
    auth_service: Arc<dyn AuthService>,
    revocations: Arc<dyn RevocationList>,
}

impl Services {
    /// Assemble services from explicit components.
    pub fn new(
        users: Arc<dyn UserRepository>,
        revocations: Arc<dyn RevocationList>,
        notifier: Arc<dyn Notifier>,
        config: &Config,
    ) -> AppResult<Self> {
        let hasher = PasswordHasher::new(config.hash_cost)?;
        let tokens = TokenService::from_config(config, revocations.clone())?;
        let auth_service = Arc::new(Authenticator::new(users, tokens, hasher, notifier));

        Ok(Self {
            auth_service,
            revocations,
        })
    }

    /// PostgreSQL credential store with a Redis revocation list.
    pub fn postgres(database: &Database, cache: &Cache, config: &Config) -> AppResult<Self> {
        Self::new(
            Arc::new(UserStore::new(database.get_connection())),
            Arc::new(RedisRevocationList::new(cache.clone())),
            Arc::new(LogNotifier::from_config(config)),
            config,
        )
    }

    /// Process-local backends. State is lost on restart.
    pub fn in_memory(config: &Config) -> AppResult<Self> {
        Self::new(
            Arc::new(MemoryUserStore::new()),
            Arc::new(MemoryRevocationList::new()),
            Arc::new(LogNotifier::from_config(config)),
            config,
        )
    }

    /// Start the periodic sweep of expired revocation entries.
    ///
    /// The returned handle must be aborted on shutdown.
    pub fn spawn_revocation_pruner(&self, every: Duration) -> JoinHandle<()> {
        let revocations = self.revocations.clone();

        tokio::spawn(async move {
            let mut ticker = interval(every);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                ticker.tick().await;
                match revocations.prune(Utc::now()).await {
                    Ok(0) => {}
                    Ok(removed) => tracing::debug!(removed, "Pruned expired revocations"),
                    Err(e) => tracing::warn!(error = %e, "Revocation prune failed"),
                }
            }
        })
    }
}

impl ServiceContainer for Services {
    fn auth(&self) -> Arc<dyn AuthService> {
        self.auth_service.clone()
    }

    fn revocations(&self) -> Arc<dyn RevocationList> {
        self.revocations.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::MockRevocationList;
    use domain::HashCost;

    fn config() -> Config {
        let mut config = Config::with_secret("a-test-secret-that-is-long-enough!!").unwrap();
        config.hash_cost = HashCost::minimal();
        config
    }

    #[tokio::test]
    async fn test_in_memory_round_trip() {
        let services = Services::in_memory(&config()).unwrap();
        let auth = services.auth();

        let user = auth
            .register("Sarah".into(), "sarah@x.com".into(), "secret1".into())
            .await
            .unwrap();
        let outcome = auth.login("sarah@x.com".into(), "secret1".into()).await.unwrap();
        assert_eq!(auth.authenticate(&outcome.token.value).await.unwrap(), user.id);
    }

    #[test]
    fn test_invalid_hash_cost_rejected() {
        let mut config = config();
        config.hash_cost = HashCost {
            memory_kib: 1,
            iterations: 0,
            parallelism: 1,
        };
        assert!(Services::in_memory(&config).is_err());
    }

    #[test]
    fn test_invalid_session_lifetime_rejected() {
        for hours in [0, -24, i64::MAX / 10] {
            let mut config = config();
            config.jwt_expiration_hours = hours;
            let result = Services::in_memory(&config);
            assert!(
                matches!(result, Err(crate::errors::AppError::Config(_))),
                "hours {hours}"
            );
        }
    }

    #[tokio::test]
    async fn test_pruner_sweeps_periodically() {
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
        let mut revocations = MockRevocationList::new();
        revocations.expect_prune().returning(move |_| {
            let _ = tx.send(());
            Ok(0)
        });

        let services = Services::new(
            Arc::new(MemoryUserStore::new()),
            Arc::new(revocations),
            Arc::new(LogNotifier::new("noreply@skincare.local", None)),
            &config(),
        )
        .unwrap();

        let handle = services.spawn_revocation_pruner(Duration::from_millis(10));
        rx.recv().await.unwrap();
        rx.recv().await.unwrap();
        handle.abort();
    }
}
