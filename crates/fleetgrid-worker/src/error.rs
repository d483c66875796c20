//! Worker lifecycle error types.

use thiserror::Error;

use fleetgrid_fleet::FleetError;

/// Errors that can occur during worker lifecycle operations.
#[derive(Debug, Error)]
pub enum LifecycleError {
    /// The OS refused to create the worker process (resource limits,
    /// missing binary). The registry is never mutated on this path.
    #[error("worker spawn failed: {0}")]
    SpawnFailed(String),

    /// Registry bookkeeping error (`NotFound`, `EmptyFleet`,
    /// `DuplicateHandle`).
    #[error("fleet registry error: {0}")]
    Fleet(#[from] FleetError),
}
