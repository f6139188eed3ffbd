//! TTL Sweep Task
//!
//! Background task that periodically purges expired entries from a
//! [`MemoryCache`].

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::cache::MemoryCache;

// == Sweep Handle ==
/// Owner of a running sweep task.
///
/// [`SweepHandle::shutdown`] consumes the handle, so the stop signal is sent
/// exactly once and the task has exited by the time the call returns.
/// Dropping the handle without calling it still signals the task, which then
/// exits at its next wake-up.
#[derive(Debug)]
pub struct SweepHandle {
    token: CancellationToken,
    handle: Option<JoinHandle<()>>,
}

impl SweepHandle {
    /// Stops the sweep task and waits for it to finish.
    pub async fn shutdown(mut self) {
        self.token.cancel();
        if let Some(handle) = self.handle.take() {
            if let Err(err) = handle.await {
                warn!("TTL sweep task ended abnormally: {}", err);
            }
        }
    }

    pub fn is_finished(&self) -> bool {
        self.handle
            .as_ref()
            .map(|handle| handle.is_finished())
            .unwrap_or(true)
    }
}

impl Drop for SweepHandle {
    fn drop(&mut self) {
        self.token.cancel();
    }
}

/// Spawns a background task that purges expired entries every `interval`.
///
/// Must be called from within a tokio runtime.
///
/// # Example
/// ```ignore
/// let cache = Arc::new(MemoryCache::<String>::new());
/// let sweeper = spawn_sweep_task(cache.clone(), Duration::from_secs(1));
/// // Later, during shutdown:
/// sweeper.shutdown().await;
/// ```
pub fn spawn_sweep_task<V>(cache: Arc<MemoryCache<V>>, interval: Duration) -> SweepHandle
where
    V: Send + Sync + 'static,
{
    let token = CancellationToken::new();
    let stop = token.clone();

    let handle = tokio::spawn(async move {
        info!("Starting TTL sweep task with interval of {:?}", interval);

        loop {
            tokio::select! {
                _ = stop.cancelled() => break,
                _ = tokio::time::sleep(interval) => {}
            }

            let removed = cache.purge_expired();
            if removed > 0 {
                info!("TTL sweep: removed {} expired entries", removed);
            } else {
                debug!("TTL sweep: no expired entries found");
            }
        }

        info!("TTL sweep task stopped");
    });

    SweepHandle {
        token,
        handle: Some(handle),
    }
}
