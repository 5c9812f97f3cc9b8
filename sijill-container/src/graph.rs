//! Wait-for graph between threads building services.
//!
//! Every slot under construction has exactly one builder thread, and every
//! blocked thread waits on exactly one slot. Following
//! `slot → builder → slot it waits on → builder → ...` either ends, or comes
//! back to the thread that is about to wait. The second case is a dependency
//! cycle split across threads: blocking would deadlock, so the caller gets
//! the chain instead.
//!
//! Same-thread cycles are caught earlier from the resolution path; this
//! graph covers races such as thread 1 building `A → B` while thread 2
//! builds `B → A`.

use std::collections::HashMap;
use std::thread::ThreadId;

use parking_lot::Mutex;
use tracing::warn;

use crate::key::ServiceKey;

/// Identifies a slot for the lifetime of the process.
pub(crate) type SlotId = u64;

/// Who builds what, and who waits on what.
#[derive(Debug, Default)]
pub(crate) struct WaitGraph {
    edges: Mutex<Edges>,
}

#[derive(Debug, Default)]
struct Edges {
    /// Slot under construction → thread running its factory
    builders: HashMap<SlotId, ThreadId>,
    /// Blocked thread → slot it waits on
    waits: HashMap<ThreadId, (SlotId, ServiceKey)>,
}

impl WaitGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `thread` as the builder of `slot`.
    pub fn begin_build(&self, slot: SlotId, thread: ThreadId) {
        self.edges.lock().builders.insert(slot, thread);
    }

    /// Forgets the builder of `slot`.
    pub fn end_build(&self, slot: SlotId) {
        self.edges.lock().builders.remove(&slot);
    }

    /// Registers `waiter` as blocked on `slot`.
    ///
    /// # Errors
    /// Returns the dependency chain (first and last element equal) if
    /// waiting would close a cycle. Nothing is registered in that case.
    pub fn begin_wait(&self, waiter: ThreadId, slot: SlotId, key: &ServiceKey) -> Result<(), Vec<ServiceKey>> {
        let mut edges = self.edges.lock();

        let mut chain = vec![key.clone()];
        let mut current = slot;
        // each hop consumes one distinct wait edge, so this bounds the walk
        for _ in 0..=edges.waits.len() {
            let Some(&builder) = edges.builders.get(&current) else {
                break;
            };

            if builder == waiter {
                chain.push(key.clone());
                warn!(cycle = ?chain, "Cyclic dependency across threads");
                return Err(chain);
            }

            match edges.waits.get(&builder) {
                Some((next, next_key)) => {
                    chain.push(next_key.clone());
                    current = *next;
                }
                None => break,
            }
        }

        edges.waits.insert(waiter, (slot, key.clone()));
        Ok(())
    }

    /// Removes the wait edge of `waiter`.
    pub fn end_wait(&self, waiter: ThreadId) {
        self.edges.lock().waits.remove(&waiter);
    }

    #[cfg(test)]
    fn is_idle(&self) -> bool {
        let edges = self.edges.lock();
        edges.builders.is_empty() && edges.waits.is_empty()
    }
}
