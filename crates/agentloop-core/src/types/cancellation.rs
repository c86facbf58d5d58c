//! Cancellation token for in-flight turns

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::Notify;

/// Cancels an agent turn from outside it, e.g. from a Ctrl-C watcher
///
/// Clones share one flag. Once fired the token stays fired.
#[derive(Clone, Default)]
pub struct CancellationToken {
    shared: Arc<Shared>,
}

#[derive(Default)]
struct Shared {
    fired: AtomicBool,
    waiters: Notify,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_cancelled(&self) -> bool {
        self.shared.fired.load(Ordering::SeqCst)
    }

    /// Fire the token and wake every task in [`cancelled`](Self::cancelled)
    pub fn cancel(&self) {
        if !self.shared.fired.swap(true, Ordering::SeqCst) {
            self.shared.waiters.notify_waiters();
        }
    }

    /// Resolves once the token has fired
    pub async fn cancelled(&self) {
        let mut wakeup = std::pin::pin!(self.shared.waiters.notified());
        // Registered before the flag check, so a cancel() in between still wakes us
        wakeup.as_mut().enable();

        if !self.is_cancelled() {
            wakeup.await;
        }
    }
}

impl std::fmt::Debug for CancellationToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("CancellationToken")
            .field(&self.is_cancelled())
            .finish()
    }
}
