//! Courtesy delays between upstream requests.

use std::time::Duration;

use async_trait::async_trait;
use rand::Rng;

/// Pacing between consecutive upstream requests. Production code sleeps for a
/// random interval; tests substitute [`NoThrottle`] to avoid real elapsed time.
#[async_trait]
pub trait Throttle: Send + Sync {
    async fn wait(&self, range_ms: (u64, u64));
}

/// Sleeps for a duration drawn uniformly from the given range.
pub struct UniformJitter;

#[async_trait]
impl Throttle for UniformJitter {
    async fn wait(&self, range_ms: (u64, u64)) {
        // ThreadRng is not Send, so the draw must finish before the await.
        let delay_ms = {
            let mut rng = rand::thread_rng();
            rng.gen_range(range_ms.0..=range_ms.1)
        };
        tokio::time::sleep(Duration::from_millis(delay_ms)).await;
    }
}

/// Never waits.
pub struct NoThrottle;

#[async_trait]
impl Throttle for NoThrottle {
    async fn wait(&self, _range_ms: (u64, u64)) {}
}
