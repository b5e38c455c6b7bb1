//! Advisory change notification.
//!
//! Observers (other views, other tabs) may subscribe and re-fetch state on
//! every event. Delivery is best-effort; dropped events only mean a stale
//! read until the next re-fetch, never lost data.

use tokio::sync::broadcast;

use lingo_core::model::AccountId;

const CHANNEL_CAPACITY: usize = 16;

/// What changed; the payload is deliberately coarse so observers re-read
/// state instead of trusting the event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChangeEvent {
    /// The account collection changed.
    Accounts,
    /// The session pointer changed, or the signed-in account was updated.
    Session,
    /// One account's progress or unlock records changed.
    Progress(AccountId),
}

#[derive(Clone)]
pub struct ChangeNotifier {
    tx: broadcast::Sender<ChangeEvent>,
}

impl ChangeNotifier {
    #[must_use]
    pub fn new() -> Self {
        let (tx, _rx) = broadcast::channel(CHANNEL_CAPACITY);
        Self { tx }
    }

    /// Registers a new observer.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<ChangeEvent> {
        self.tx.subscribe()
    }

    /// Fans the event out to whoever is listening; nobody listening is
    /// not an error.
    pub(crate) fn notify(&self, event: ChangeEvent) {
        let _ = self.tx.send(event);
    }
}

impl Default for ChangeNotifier {
    fn default() -> Self {
        Self::new()
    }
}
