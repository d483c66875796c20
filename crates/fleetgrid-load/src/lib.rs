//! fleetgrid-load — load metric sources for the autoscaler.
//!
//! A `LoadSource` supplies one normalized load sample in `[0, 1]` on demand.
//! The controller only ever sees the trait, so the measurement mechanism
//! (CPU load average, queue depth, request rate) is swappable without
//! touching the control loop.
//!
//! Two implementations ship with the crate:
//! - [`CpuLoadSource`] reads the 1-minute load average from `/proc/loadavg`
//!   and normalizes it by the logical core count.
//! - [`FixedLoadSource`] returns a constant, for tests and embedders.

pub mod source;

pub use source::{CpuLoadSource, FixedLoadSource, LoadSource};
