use crate::ratelimit::{RateLimitStore, WindowHit};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use tokio::sync::Mutex;

struct Window {
    count: u32,
    reset_epoch_seconds: i64,
}

#[derive(Default)]
pub struct MemoryRateLimitStore {
    windows: Mutex<HashMap<String, Window>>,
}

impl MemoryRateLimitStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.windows.lock().await.len()
    }
}

#[async_trait]
impl RateLimitStore for MemoryRateLimitStore {
    async fn hit(
        &self,
        key: &str,
        limit: u32,
        window_seconds: i64,
        now: DateTime<Utc>,
    ) -> anyhow::Result<WindowHit> {
        let now_epoch = now.timestamp();
        let mut windows = self.windows.lock().await;

        match windows.get_mut(key) {
            Some(window) if window.reset_epoch_seconds > now_epoch => {
                if window.count < limit {
                    window.count += 1;
                    Ok(WindowHit {
                        allowed: true,
                        count: window.count,
                        reset_epoch_seconds: window.reset_epoch_seconds,
                    })
                } else {
                    Ok(WindowHit {
                        allowed: false,
                        count: window.count,
                        reset_epoch_seconds: window.reset_epoch_seconds,
                    })
                }
            }
            _ => {
                let reset_epoch_seconds = now_epoch + window_seconds;
                windows.insert(
                    key.to_string(),
                    Window {
                        count: 1,
                        reset_epoch_seconds,
                    },
                );
                Ok(WindowHit {
                    allowed: true,
                    count: 1,
                    reset_epoch_seconds,
                })
            }
        }
    }

    async fn sweep(&self, now: DateTime<Utc>) -> anyhow::Result<usize> {
        let now_epoch = now.timestamp();
        let mut windows = self.windows.lock().await;
        let before = windows.len();
        windows.retain(|_, w| w.reset_epoch_seconds > now_epoch);
        Ok(before - windows.len())
    }
}
