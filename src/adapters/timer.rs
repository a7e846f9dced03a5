//! Tokio retry timer.

use std::time::Duration;

use async_trait::async_trait;

use crate::ports::Scheduler;

/// `Scheduler` backed by `tokio::time::sleep`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioScheduler;

#[async_trait]
impl Scheduler for TokioScheduler {
    async fn wait(&self, delay: Duration) {
        tokio::time::sleep(delay).await;
    }
}
