use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;

pub mod store_memory;
pub mod store_redis;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationClass {
    Payment,
    Refund,
    General,
}

impl OperationClass {
    pub fn key_prefix(&self) -> &'static str {
        match self {
            OperationClass::Payment => "payment",
            OperationClass::Refund => "refund",
            OperationClass::General => "general",
        }
    }

    pub fn policy(&self) -> RatePolicy {
        match self {
            OperationClass::Payment => RatePolicy { limit: 5, window_seconds: 60 },
            OperationClass::Refund => RatePolicy { limit: 3, window_seconds: 60 },
            OperationClass::General => RatePolicy { limit: 100, window_seconds: 60 },
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct RatePolicy {
    pub limit: u32,
    pub window_seconds: i64,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct Quota {
    pub limit: u32,
    pub remaining: u32,
    pub reset_epoch_seconds: i64,
}

#[derive(Debug, Clone, Copy)]
pub struct RateDecision {
    pub allowed: bool,
    pub quota: Quota,
}

#[derive(Debug, Clone, Copy)]
pub struct WindowHit {
    pub allowed: bool,
    pub count: u32,
    pub reset_epoch_seconds: i64,
}

#[async_trait]
pub trait RateLimitStore: Send + Sync {
    async fn hit(
        &self,
        key: &str,
        limit: u32,
        window_seconds: i64,
        now: DateTime<Utc>,
    ) -> anyhow::Result<WindowHit>;

    async fn sweep(&self, now: DateTime<Utc>) -> anyhow::Result<usize>;
}

#[derive(Clone)]
pub struct RateLimiter {
    pub store: Arc<dyn RateLimitStore>,
}

impl RateLimiter {
    pub async fn check(&self, identity: &str, class: OperationClass) -> anyhow::Result<RateDecision> {
        self.check_at(identity, class, Utc::now()).await
    }

    pub async fn check_at(
        &self,
        identity: &str,
        class: OperationClass,
        now: DateTime<Utc>,
    ) -> anyhow::Result<RateDecision> {
        let policy = class.policy();
        let key = format!("{}:{}", class.key_prefix(), identity);
        let hit = self
            .store
            .hit(&key, policy.limit, policy.window_seconds, now)
            .await?;

        Ok(RateDecision {
            allowed: hit.allowed,
            quota: Quota {
                limit: policy.limit,
                remaining: policy.limit.saturating_sub(hit.count),
                reset_epoch_seconds: hit.reset_epoch_seconds,
            },
        })
    }
}

pub fn spawn_sweeper(store: Arc<dyn RateLimitStore>, every: std::time::Duration) {
    tokio::spawn(async move {
        loop {
            tokio::time::sleep(every).await;
            if let Err(err) = store.sweep(Utc::now()).await {
                tracing::error!("rate limit sweep error: {}", err);
            }
        }
    });
}
