use std::panic;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// A spawned task paired with the token that stops it.
pub(super) struct CancellableTask<T> {
    pub(super) join_handle: JoinHandle<T>,
    pub(super) token: CancellationToken,
}

impl<T> CancellableTask<T> {
    /// Signals cancellation without waiting for the task to exit.
    pub(super) fn abort(&self) {
        self.token.cancel();
        self.join_handle.abort();
    }

    /// Signals cancellation and waits for the task, re-raising its panic.
    pub(super) async fn cancel(self) {
        self.token.cancel();
        if let Err(err) = self.join_handle.await {
            if let Ok(panic) = err.try_into_panic() {
                panic::resume_unwind(panic)
            }
        }
    }
}
