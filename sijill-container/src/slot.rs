//! Registry slots: one factory plus its build state.
//!
//! A slot moves `Unbuilt → Building → Built`. `Built` is terminal. A failed
//! or panicking build goes back to `Unbuilt` so a later request can retry.
//! Threads that find a slot `Building` block on its condition variable
//! instead of running the factory a second time.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::thread::{self, ThreadId};

use parking_lot::{Condvar, Mutex};
use tracing::trace;

use crate::error::{CyclicDependencyError, Result, SijillError};
use crate::graph::{SlotId, WaitGraph};
use crate::key::ServiceKey;
use crate::service::{Factory, Service};

static NEXT_SLOT_ID: AtomicU64 = AtomicU64::new(1);

/// Build state of a slot.
#[derive(Debug)]
pub(crate) enum SlotState {
    /// Never built, or the last attempt failed.
    Unbuilt,
    /// The factory is running on this thread.
    Building(ThreadId),
    /// Constructed; never replaced.
    Built(Service),
}

/// One registered service.
pub(crate) struct Slot {
    id: SlotId,
    key: ServiceKey,
    factory: Factory,
    state: Mutex<SlotState>,
    ready: Condvar,
}

impl Slot {
    pub fn new(key: ServiceKey, factory: Factory) -> Self {
        Self {
            id: NEXT_SLOT_ID.fetch_add(1, Ordering::Relaxed),
            key,
            factory,
            state: Mutex::new(SlotState::Unbuilt),
            ready: Condvar::new(),
        }
    }

    pub fn key(&self) -> &ServiceKey {
        &self.key
    }

    pub fn is_built(&self) -> bool {
        matches!(*self.state.lock(), SlotState::Built(_))
    }

    /// Returns the cached service, building it with `build` if needed.
    ///
    /// At most one thread runs `build` at a time; the others wait for its
    /// outcome. `build` runs without any lock held.
    ///
    /// # Errors
    /// Whatever `build` returns, untouched, or
    /// [`SijillError::CyclicDependency`] if waiting would deadlock.
    pub fn get_or_build<F>(&self, graph: &WaitGraph, build: F) -> Result<Service>
    where
        F: FnOnce(&Factory) -> Result<Service>,
    {
        let me = thread::current().id();
        let mut state = self.state.lock();

        loop {
            match &*state {
                SlotState::Built(service) => {
                    trace!(service = %self.key, "Cache hit");
                    return Ok(service.clone());
                }
                SlotState::Unbuilt => break,
                SlotState::Building(builder) => {
                    trace!(service = %self.key, builder = ?builder, "Construction in flight, waiting");
                    if let Err(chain) = graph.begin_wait(me, self.id, &self.key) {
                        return Err(SijillError::CyclicDependency(CyclicDependencyError { chain }));
                    }
                    self.ready.wait(&mut state);
                    graph.end_wait(me);
                }
            }
        }

        *state = SlotState::Building(me);
        graph.begin_build(self.id, me);
        drop(state);

        let guard = BuildGuard { slot: self, graph, done: false };
        let outcome = build(&self.factory);
        guard.finish(outcome)
    }
}

impl fmt::Debug for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Slot")
            .field("id", &self.id)
            .field("key", &self.key)
            .field("state", &*self.state.lock())
            .finish()
    }
}

/// Publishes the outcome of a build, and resets the slot if the factory
/// unwinds instead of returning.
struct BuildGuard<'a> {
    slot: &'a Slot,
    graph: &'a WaitGraph,
    done: bool,
}

impl BuildGuard<'_> {
    fn finish(mut self, outcome: Result<Service>) -> Result<Service> {
        let next = match &outcome {
            Ok(service) => SlotState::Built(service.clone()),
            Err(_) => SlotState::Unbuilt,
        };
        self.publish(next);
        self.done = true;
        outcome
    }

    fn publish(&self, next: SlotState) {
        let mut state = self.slot.state.lock();
        *state = next;
        self.graph.end_build(self.slot.id);
        self.slot.ready.notify_all();
    }
}

impl Drop for BuildGuard<'_> {
    fn drop(&mut self) {
        if !self.done {
            trace!(service = %self.slot.key, "Factory unwound, resetting slot");
            self.publish(SlotState::Unbuilt);
        }
    }
}
