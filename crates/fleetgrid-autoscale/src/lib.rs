//! fleetgrid-autoscale — the fleet-sizing control loop.
//!
//! Samples a normalized load metric once per tick, compares it against a
//! single threshold, and moves the fleet size by at most one worker,
//! bounded to `[1, max_workers]`.
//!
//! # Scaling Algorithm
//!
//! ```text
//! load = source.sample()          // in [0, 1]
//! n    = fleet.size()
//!
//! if load > threshold and n < max_workers:
//!     spawn one worker            // scale_up
//! else if load < threshold and n > 1:
//!     terminate the oldest worker // scale_down
//! else:
//!     no action                   // exact threshold, or bounds saturated
//! ```
//!
//! Exactly one action per tick: convergence to the right fleet size happens
//! gradually, trading responsiveness for stability. Requests at the bounds
//! are dropped, not queued; the loop simply re-evaluates next tick. The
//! hysteresis band is zero-width (one shared threshold); a sample exactly
//! equal to the threshold fires neither branch.
//!
//! A lifecycle failure inside a tick is caught at the tick boundary and
//! reported through the emitted `TickEvent`; the loop itself never fails.

pub mod controller;

pub use controller::{Controller, ScaleAction, ScalePolicy, TickEvent, TickObserver};
