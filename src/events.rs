//! Change notification bus - broadcasts storage writes to live views.
//!
//! Notifications carry no payload diff; a [`StoreChange`] only names the key
//! that was written or removed, and subscribers re-read whatever state they
//! care about and recompute from scratch. Publishing with no live
//! subscribers is not an error.

use tokio::sync::broadcast;

/// Default capacity of the broadcast channel.
///
/// A lagging subscriber loses the oldest notifications once the channel
/// fills up; since consumers re-read full state on every notification, the
/// next one catches them up.
const DEFAULT_CAPACITY: usize = 64;

/// A single storage mutation, identified by the key that changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreChange {
    /// Storage key whose value was written or removed.
    pub key: String,
}

/// Broadcast bus carrying [`StoreChange`] notifications.
#[derive(Debug, Clone)]
pub struct ChangeNotifier {
    sender: broadcast::Sender<StoreChange>,
}

impl ChangeNotifier {
    /// Creates a notifier whose channel buffers up to `capacity`
    /// notifications per subscriber.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publishes a change for `key`.
    ///
    /// Dropped silently when nobody is subscribed.
    pub fn notify(&self, key: impl Into<String>) {
        let _ = self.sender.send(StoreChange { key: key.into() });
    }

    /// Subscribes to change notifications published after this call.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<StoreChange> {
        self.sender.subscribe()
    }

    /// Number of live subscribers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for ChangeNotifier {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}
