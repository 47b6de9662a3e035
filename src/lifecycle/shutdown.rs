//! Shutdown coordination for the gateway.

use std::future::Future;
use tokio::sync::broadcast;

/// Fan-out shutdown signal.
///
/// The gateway listener and the admin listener each hold a [`Shutdown::notified`]
/// future; one [`Shutdown::trigger`] stops both.
#[derive(Debug, Clone)]
pub struct Shutdown {
    tx: broadcast::Sender<()>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1);
        Self { tx }
    }

    /// Resolves once `trigger` is called after this future was created.
    pub fn notified(&self) -> impl Future<Output = ()> + Send + 'static {
        let mut rx = self.tx.subscribe();
        async move {
            let _ = rx.recv().await;
        }
    }

    pub fn trigger(&self) {
        let _ = self.tx.send(());
    }

    /// Listeners still waiting for the signal.
    pub fn pending(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}
