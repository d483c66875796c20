//! FleetRegistry — insertion-ordered bookkeeping of live workers.

use std::collections::VecDeque;
use std::sync::Arc;

use crate::error::FleetError;
use crate::handle::{WorkerHandle, WorkerId};

/// The registry shared between the lifecycle manager and the controller.
///
/// All mutation normally happens on the single control-loop task; the mutex
/// gives at-most-one mutator if a second caller (e.g. a signal handler)
/// ever drives the lifecycle manager concurrently.
pub type SharedFleet = Arc<tokio::sync::Mutex<FleetRegistry>>;

/// The set of currently live worker handles, in insertion order.
#[derive(Debug, Default)]
pub struct FleetRegistry {
    workers: VecDeque<WorkerHandle>,
}

impl FleetRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current live-worker count.
    pub fn size(&self) -> usize {
        self.workers.len()
    }

    /// Record a new worker at the back of the insertion order.
    pub fn add(&mut self, handle: WorkerHandle) -> Result<(), FleetError> {
        if self.workers.iter().any(|w| w.id == handle.id) {
            return Err(FleetError::DuplicateHandle(handle.id));
        }
        self.workers.push_back(handle);
        Ok(())
    }

    /// Remove a worker and hand its handle back for termination.
    pub fn remove(&mut self, id: WorkerId) -> Result<WorkerHandle, FleetError> {
        let index = self
            .workers
            .iter()
            .position(|w| w.id == id)
            .ok_or(FleetError::NotFound(id))?;
        self.workers.remove(index).ok_or(FleetError::NotFound(id))
    }

    /// The scale-down candidate: the oldest surviving worker (FIFO).
    /// Selection does not remove the worker.
    pub fn select_victim(&self) -> Result<WorkerId, FleetError> {
        self.workers
            .front()
            .map(|w| w.id)
            .ok_or(FleetError::EmptyFleet)
    }

    /// Ids of all live workers, in insertion order.
    pub fn worker_ids(&self) -> Vec<WorkerId> {
        self.workers.iter().map(|w| w.id).collect()
    }

    /// Empty the registry, handing back every handle (daemon shutdown).
    pub fn drain(&mut self) -> Vec<WorkerHandle> {
        self.workers.drain(..).collect()
    }
}
