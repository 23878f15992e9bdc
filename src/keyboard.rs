//! Keyboard visibility observation.
//!
//! Screens shift their layout while the on-screen keyboard is up. Each
//! screen acquires a subscription on entry and the subscription releases
//! itself when dropped, so every exit path (including unmount during a
//! pending async call) gives the listener back.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use futures::stream;
use tokio::sync::watch;

/// Broadcasts keyboard visibility to subscribed screens.
pub struct KeyboardMonitor {
    tx: watch::Sender<bool>,
    subscribers: Arc<AtomicUsize>,
}

impl KeyboardMonitor {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(false);
        Self {
            tx,
            subscribers: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Host-side: report a visibility change.
    pub fn set_visible(&self, visible: bool) {
        // send_replace never fails even with zero receivers.
        self.tx.send_replace(visible);
    }

    pub fn is_visible(&self) -> bool {
        *self.tx.borrow()
    }

    pub fn subscribe(&self) -> KeyboardSubscription {
        self.subscribers.fetch_add(1, Ordering::SeqCst);
        KeyboardSubscription {
            rx: self.tx.subscribe(),
            subscribers: Arc::clone(&self.subscribers),
        }
    }

    /// Number of live subscriptions. Zero after every screen has exited.
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.load(Ordering::SeqCst)
    }
}

impl Default for KeyboardMonitor {
    fn default() -> Self {
        Self::new()
    }
}

/// A live visibility subscription. Dropping it releases the listener.
pub struct KeyboardSubscription {
    rx: watch::Receiver<bool>,
    subscribers: Arc<AtomicUsize>,
}

impl KeyboardSubscription {
    pub fn is_visible(&self) -> bool {
        *self.rx.borrow()
    }

    /// Wait for the next visibility change and return the new value.
    /// Returns the current value if the monitor has gone away.
    pub async fn changed(&mut self) -> bool {
        let _ = self.rx.changed().await;
        *self.rx.borrow_and_update()
    }

    /// The subscription as a stream of visibility values, for hosts that
    /// drive rendering off an event loop. Yields the current value first,
    /// then every change; ends when the monitor goes away.
    pub fn into_stream(self) -> impl futures::Stream<Item = bool> {
        stream::unfold((self, true), |(mut sub, first)| async move {
            if first {
                let value = sub.is_visible();
                return Some((value, (sub, false)));
            }
            match sub.rx.changed().await {
                Ok(()) => {
                    let value = *sub.rx.borrow_and_update();
                    Some((value, (sub, false)))
                }
                Err(_) => None,
            }
        })
    }
}

impl Drop for KeyboardSubscription {
    fn drop(&mut self) {
        self.subscribers.fetch_sub(1, Ordering::SeqCst);
    }
}
