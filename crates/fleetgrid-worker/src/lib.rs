//! fleetgrid-worker — worker process lifecycle management.
//!
//! The `WorkerLifecycle` manager is the only component that mutates the
//! fleet registry's membership. It sits between the controller (which asks
//! for one spawn or terminate at a time) and the OS-level process primitive
//! (abstracted behind `ProcessDriver`).
//!
//! # Termination contract
//!
//! Termination is fire-and-forget at the OS level: the handle is removed
//! from the registry synchronously, the kill signal is issued, and the
//! manager does not wait for process exit before considering the operation
//! issued. The registry therefore never lags the intended fleet size.

pub mod driver;
pub mod error;
pub mod lifecycle;

pub use driver::{CommandDriver, ProcessDriver};
pub use error::LifecycleError;
pub use lifecycle::WorkerLifecycle;
