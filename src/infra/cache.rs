//! Redis cache implementation.
//!
//! Backs the request rate limiter with fixed-window counters.

use redis::{aio::ConnectionManager, AsyncCommands, Client, RedisError};

use crate::config::{Config, CACHE_PREFIX_RATE_LIMIT};
use crate::errors::{AppError, AppResult};

/// Redis handle; `ConnectionManager` multiplexes and reconnects internally.
#[derive(Clone)]
pub struct Cache {
    connection: ConnectionManager,
}

impl Cache {
    /// Connect to Redis.
    ///
    /// # Panics
    /// Panics if the connection fails; the rate limiter fails closed, so
    /// a server without Redis would reject every request anyway.
    pub async fn connect(config: &Config) -> Self {
        Self::try_connect(config)
            .await
            .expect("Failed to connect to Redis")
    }

    /// Connect to Redis, returning an error instead of panicking.
    pub async fn try_connect(config: &Config) -> Result<Self, RedisError> {
        let client = Client::open(config.redis_url.as_str())?;
        let connection = ConnectionManager::new(client).await?;

        tracing::info!("Redis cache connected");

        Ok(Self { connection })
    }

    /// Connectivity probe used by the health endpoint.
    pub async fn ping(&self) -> AppResult<()> {
        let mut conn = self.connection.clone();
        let _: String = redis::cmd("PING")
            .query_async(&mut conn)
            .await
            .map_err(cache_error)?;
        Ok(())
    }

    /// Count a hit against a fixed window and report whether it is allowed.
    ///
    /// Returns `(current_count, is_allowed)`. The window starts at the
    /// first hit; INCR then EXPIRE keeps this to one round trip for every
    /// hit after the first.
    pub async fn check_rate_limit(
        &self,
        identifier: &str,
        max_requests: u64,
        window_seconds: u64,
    ) -> AppResult<(u64, bool)> {
        let key = format!("{}{}", CACHE_PREFIX_RATE_LIMIT, identifier);
        let mut conn = self.connection.clone();

        let count: i64 = conn.incr(&key, 1).await.map_err(cache_error)?;
        if count == 1 {
            let _: bool = conn
                .expire(&key, window_seconds as i64)
                .await
                .map_err(cache_error)?;
        }

        let count = count as u64;
        Ok((count, count <= max_requests))
    }

    /// Remaining hits in the current window, for response headers.
    pub async fn get_rate_limit_remaining(
        &self,
        identifier: &str,
        max_requests: u64,
    ) -> AppResult<u64> {
        let key = format!("{}{}", CACHE_PREFIX_RATE_LIMIT, identifier);
        let mut conn = self.connection.clone();

        let count: Option<i64> = conn.get(&key).await.map_err(cache_error)?;

        Ok(max_requests.saturating_sub(count.unwrap_or(0) as u64))
    }
}

fn cache_error(e: RedisError) -> AppError {
    AppError::internal(format!("Cache error: {}", e))
}
