//! Error types for fleet registry operations.

use thiserror::Error;

use crate::handle::WorkerId;

/// Errors that can occur during registry bookkeeping.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FleetError {
    /// A handle with this id is already registered. Unreachable while ids
    /// are assigned from a single counter; observing it means two spawners
    /// are racing the same id space.
    #[error("duplicate worker handle: {0}")]
    DuplicateHandle(WorkerId),

    /// The referenced worker is not in the registry, which indicates a
    /// desync between the registry and its caller.
    #[error("worker not found: {0}")]
    NotFound(WorkerId),

    /// Scale-down was attempted against an empty fleet. The controller's
    /// floor guard makes this unreachable; observing it means the size
    /// invariant broke.
    #[error("fleet is empty")]
    EmptyFleet,
}
