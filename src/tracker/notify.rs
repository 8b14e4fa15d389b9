//! Change notification for alignment trackers.
//!
//! Observers either register a callback, invoked synchronously after each
//! mutation, or hold a [`LatestSnapshot`] cell that always contains the most
//! recent state. Neither keeps a backlog of intermediate frames.

use super::Snapshot;
use std::sync::{Arc, Mutex, PoisonError};

/// Handle returned by `subscribe`, used to remove the callback again.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Callback = Box<dyn FnMut(&Snapshot) + Send>;

#[derive(Default)]
pub(crate) struct Observers {
    next_id: u64,
    callbacks: Vec<(SubscriptionId, Callback)>,
    cells: Vec<LatestSnapshot>,
}

impl Observers {
    pub(crate) fn subscribe(&mut self, callback: Callback) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.callbacks.push((id, callback));
        id
    }

    pub(crate) fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.callbacks.len();
        self.callbacks.retain(|(existing, _)| *existing != id);
        self.callbacks.len() != before
    }

    pub(crate) fn watch(&mut self, current: Option<Snapshot>) -> LatestSnapshot {
        let cell = LatestSnapshot::new(current);
        self.cells.push(cell.clone());
        cell
    }

    pub(crate) fn len(&self) -> usize {
        self.callbacks.len()
    }

    pub(crate) fn publish(&mut self, snapshot: &Snapshot) {
        // Cells nobody else holds any more are dropped here.
        self.cells.retain(|cell| Arc::strong_count(&cell.inner) > 1);
        for cell in &self.cells {
            cell.store(*snapshot);
        }
        for (_, callback) in &mut self.callbacks {
            callback(snapshot);
        }
    }
}

/// Shared cell holding the most recent tracker snapshot.
///
/// Cloning shares the same cell, so it can be handed to a display thread while
/// the acquisition loop keeps mutating the tracker.
#[derive(Clone, Debug, Default)]
pub struct LatestSnapshot {
    inner: Arc<Mutex<Option<Snapshot>>>,
}

impl LatestSnapshot {
    fn new(current: Option<Snapshot>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(current)),
        }
    }

    /// Returns the latest snapshot, or `None` before the first image.
    pub fn get(&self) -> Option<Snapshot> {
        *self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn store(&self, snapshot: Snapshot) {
        *self.inner.lock().unwrap_or_else(PoisonError::into_inner) = Some(snapshot);
    }
}
