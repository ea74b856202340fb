use std::future::Future;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Default spacing between staggered provider requests in milliseconds
pub const DEFAULT_STAGGER_MS: u64 = 600;

/// Delay for the request at position `index` of a staggered batch
pub fn stagger_delay(index: usize, interval: Duration) -> Duration {
    let factor = u32::try_from(index).unwrap_or(u32::MAX);
    interval.saturating_mul(factor)
}

/// Handle to work that runs after a delay unless cancelled first
#[derive(Debug)]
pub struct ScheduledTask<T> {
    token: CancellationToken,
    handle: JoinHandle<Option<T>>,
    delay: Duration,
}

/// Spawn `work` to start after `delay`.
///
/// Cancelling before the delay elapses guarantees `work` is never polled.
/// Cancelling after it started has no effect on it.
pub fn schedule<F>(delay: Duration, work: F) -> ScheduledTask<F::Output>
where
    F: Future + Send + 'static,
    F::Output: Send + 'static,
{
    let token = CancellationToken::new();
    let cancelled = token.clone();

    let handle = tokio::spawn(async move {
        tokio::select! {
            biased;
            _ = cancelled.cancelled() => None,
            _ = tokio::time::sleep(delay) => Some(work.await),
        }
    });

    ScheduledTask {
        token,
        handle,
        delay,
    }
}

impl<T> ScheduledTask<T> {
    /// Stop the task if it has not fired yet
    pub fn cancel(&self) {
        if !self.token.is_cancelled() {
            debug!("Cancelling scheduled task (delay {:?})", self.delay);
            self.token.cancel();
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Wait for the task. `None` if it was cancelled before firing.
    pub async fn join(self) -> Option<T> {
        match self.handle.await {
            Ok(output) => output,
            Err(err) => {
                warn!("Scheduled task failed: {}", err);
                None
            }
        }
    }
}
