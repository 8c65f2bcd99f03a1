use crate::ratelimit::{RateLimitStore, WindowHit};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use redis::AsyncCommands;

#[derive(Clone)]
pub struct RedisRateLimitStore {
    pub client: redis::Client,
}

#[async_trait]
impl RateLimitStore for RedisRateLimitStore {
    async fn hit(
        &self,
        key: &str,
        limit: u32,
        window_seconds: i64,
        now: DateTime<Utc>,
    ) -> anyhow::Result<WindowHit> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;

        let window_start = now.timestamp() - now.timestamp().rem_euclid(window_seconds);
        let reset_epoch_seconds = window_start + window_seconds;
        let redis_key = format!("rate:{}:{}", key, window_start);

        let count: i64 = conn.incr(&redis_key, 1).await?;
        let _: bool = conn.expire(&redis_key, window_seconds + 60).await?;

        let count = u32::try_from(count).unwrap_or(u32::MAX);
        Ok(WindowHit {
            allowed: count <= limit,
            count: count.min(limit),
            reset_epoch_seconds,
        })
    }

    async fn sweep(&self, _now: DateTime<Utc>) -> anyhow::Result<usize> {
        // keys carry their own TTL
        Ok(0)
    }
}
