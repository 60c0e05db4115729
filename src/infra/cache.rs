//! Redis cache connection.
//!
//! Thin wrapper over a pooled `ConnectionManager` exposing the few primitives
//! the revocation list needs.

use redis::{aio::ConnectionManager, AsyncCommands, Client, RedisError};

use crate::errors::AppResult;

/// Redis cache wrapper with connection pooling.
#[derive(Clone)]
pub struct Cache {
    connection: ConnectionManager,
}

impl Cache {
    /// Connect to Redis.
    ///
    /// # Errors
    /// Returns the Redis error if the URL is invalid or the server is unreachable.
    pub async fn connect(redis_url: &str) -> Result<Self, RedisError> {
        let client = Client::open(redis_url)?;
        let connection = ConnectionManager::new(client).await?;

        tracing::info!("Redis cache connected");

        Ok(Self { connection })
    }

    /// Set a key only if it does not exist yet, expiring after `ttl_seconds`.
    ///
    /// Returns `true` when this call created the key.
    pub async fn set_nx_with_ttl(&self, key: &str, value: &str, ttl_seconds: u64) -> AppResult<bool> {
        let mut conn = self.connection.clone();

        // SET key value NX EX ttl replies OK or nil
        let reply: Option<String> = redis::cmd("SET")
            .arg(key)
            .arg(value)
            .arg("NX")
            .arg("EX")
            .arg(ttl_seconds.max(1))
            .query_async(&mut conn)
            .await?;

        Ok(reply.is_some())
    }

    /// Check if a key exists in cache.
    pub async fn exists(&self, key: &str) -> AppResult<bool> {
        let mut conn = self.connection.clone();
        let exists: bool = conn.exists(key).await?;
        Ok(exists)
    }

    /// Round-trip a PING, used by the health endpoint.
    pub async fn ping(&self) -> AppResult<()> {
        let mut conn = self.connection.clone();
        let _: String = redis::cmd("PING").query_async(&mut conn).await?;
        Ok(())
    }
}
