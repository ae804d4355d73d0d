//! Guard against overlapping manual syncs.
//!
//! Single-threaded: the flag lives in an `Rc<Cell<_>>` shared by clones, so
//! the UI and its async handlers see the same state.

use std::cell::Cell;
use std::rc::Rc;

use crate::error::ApiError;
use crate::services::MessagesService;

#[derive(Debug, Clone, PartialEq)]
pub enum SyncOutcome {
    /// The server accepted the sync request.
    Started,
    /// Another sync from this client is still pending; nothing was sent.
    AlreadyRunning,
    Failed(ApiError),
}

#[derive(Debug, Clone, Default)]
pub struct SyncGate {
    in_flight: Rc<Cell<bool>>,
}

impl PartialEq for SyncGate {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.in_flight, &other.in_flight)
    }
}

/// Released when dropped, including when the sync future is cancelled.
struct Held(Rc<Cell<bool>>);

impl Drop for Held {
    fn drop(&mut self) {
        self.0.set(false);
    }
}

impl SyncGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_running(&self) -> bool {
        self.in_flight.get()
    }

    fn acquire(&self) -> Option<Held> {
        if self.in_flight.replace(true) {
            return None;
        }
        Some(Held(self.in_flight.clone()))
    }

    pub async fn trigger(&self, messages: &MessagesService) -> SyncOutcome {
        let Some(_held) = self.acquire() else {
            tracing::debug!("Sync already in progress, ignoring trigger");
            return SyncOutcome::AlreadyRunning;
        };

        match messages.sync_emails().await {
            Ok(()) => SyncOutcome::Started,
            Err(err) => SyncOutcome::Failed(err),
        }
    }
}
