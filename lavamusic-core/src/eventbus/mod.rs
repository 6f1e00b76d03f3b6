//! src/eventbus/mod.rs
//!
//! In-process event bus with guaranteed delivery to every subscriber via
//! bounded MPSC queues. The platform client and the audio-node client each
//! own one bus, typed by the events of their scope.

use std::sync::Arc;

use tokio::sync::{mpsc, watch, Mutex};

/// Each subscriber gets its own `mpsc::Sender<E>`.
///
/// - If a subscriber's buffer is full, `publish` waits for space.
/// - Subscribers that dropped their receiver are pruned on the next publish.
pub struct EventBus<E> {
    subscribers: Arc<Mutex<Vec<mpsc::Sender<E>>>>,
    shutdown_tx: Arc<watch::Sender<bool>>,
    pub shutdown_rx: watch::Receiver<bool>,
}

impl<E> Clone for EventBus<E> {
    fn clone(&self) -> Self {
        Self {
            subscribers: self.subscribers.clone(),
            shutdown_tx: self.shutdown_tx.clone(),
            shutdown_rx: self.shutdown_rx.clone(),
        }
    }
}

const DEFAULT_BUFFER_SIZE: usize = 1024;

impl<E: Clone + Send + 'static> Default for EventBus<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Clone + Send + 'static> EventBus<E> {
    pub fn new() -> Self {
        let (tx, rx) = watch::channel(false);
        Self {
            subscribers: Arc::new(Mutex::new(vec![])),
            shutdown_tx: Arc::new(tx),
            shutdown_rx: rx,
        }
    }

    /// Flag shutdown and drop every subscriber queue, which ends the
    /// `recv` loops of all listeners once they drain.
    pub async fn shutdown(&self) {
        let _ = self.shutdown_tx.send(true);
        self.subscribers.lock().await.clear();
    }

    pub fn is_shutdown(&self) -> bool {
        *self.shutdown_rx.borrow()
    }

    pub async fn subscribe(&self, buffer_size: Option<usize>) -> mpsc::Receiver<E> {
        let size = buffer_size.unwrap_or(DEFAULT_BUFFER_SIZE);
        let (tx, rx) = mpsc::channel(size);
        let mut subs = self.subscribers.lock().await;
        subs.push(tx);
        rx
    }

    pub async fn subscriber_count(&self) -> usize {
        self.subscribers.lock().await.len()
    }

    /// Publish an event to all subscribers.
    pub async fn publish(&self, event: E) {
        if self.is_shutdown() {
            return;
        }
        let senders = {
            let mut subs = self.subscribers.lock().await;
            subs.retain(|s| !s.is_closed());
            subs.clone()
        };
        for s in senders {
            let _ = s.send(event.clone()).await;
        }
    }
}
