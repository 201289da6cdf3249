use std::time::Duration;

use async_trait::async_trait;

/// Paces calls to the metadata provider. Awaited once after every lookup attempt.
#[async_trait]
pub trait RateLimiter: Send + Sync {
    async fn wait_turn(&self);
}

pub struct FixedDelay {
    delay: Duration,
}

impl FixedDelay {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

#[async_trait]
impl RateLimiter for FixedDelay {
    async fn wait_turn(&self) {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
    }
}

pub struct Unthrottled;

#[async_trait]
impl RateLimiter for Unthrottled {
    async fn wait_turn(&self) {}
}
