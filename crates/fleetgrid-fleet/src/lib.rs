//! fleetgrid-fleet — bookkeeping for the live worker fleet.
//!
//! The `FleetRegistry` tracks every live worker handle in insertion order.
//! It is pure in-memory state: no process interaction happens here. The
//! lifecycle manager is the only component that adds or removes entries;
//! everything above it refers to workers by `WorkerId` only.
//!
//! Victim selection for scale-down is deterministic FIFO: the oldest
//! surviving worker goes first, never the most recently created one, so
//! workers still warming up or mid-request are spared.

pub mod error;
pub mod handle;
pub mod registry;

pub use error::FleetError;
pub use handle::{ProcessHandle, WorkerHandle, WorkerId};
pub use registry::{FleetRegistry, SharedFleet};
