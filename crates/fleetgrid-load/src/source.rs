//! Load sources — where the autoscaler's input samples come from.

use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};

/// Supplies one normalized load sample on demand.
///
/// The contract the controller relies on: the returned value is always in
/// `[0, 1]`, the call never blocks indefinitely, and sampling has no side
/// effects observable to the caller besides the return value. A source that
/// cannot measure must return a best-effort value rather than fail the tick.
pub trait LoadSource: Send + Sync {
    fn sample(&self) -> f64;
}

/// CPU load source backed by the kernel's load average.
///
/// Reads the 1-minute average from `/proc/loadavg`, divides by the logical
/// core count, and clamps to `[0, 1]` (a fully saturated machine reads 1.0,
/// anything beyond saturation is still 1.0). If the file cannot be read or
/// parsed — non-Linux hosts, mostly — the most recent successful sample is
/// returned instead, 0.0 before any read has succeeded.
pub struct CpuLoadSource {
    path: PathBuf,
    cores: f64,
    /// Bits of the last successfully computed sample.
    last: AtomicU64,
}

impl CpuLoadSource {
    pub fn new() -> Self {
        Self::from_path("/proc/loadavg")
    }

    /// Read the load average from a non-default path.
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let cores = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        Self {
            path: path.into(),
            cores: cores as f64,
            last: AtomicU64::new(0f64.to_bits()),
        }
    }

    /// Normalize against a core count other than the detected one
    /// (e.g. a cgroup CPU quota narrower than the physical machine).
    pub fn with_cores(mut self, cores: usize) -> Self {
        self.cores = cores.max(1) as f64;
        self
    }

    fn read_loadavg(&self) -> Option<f64> {
        let text = std::fs::read_to_string(&self.path).ok()?;
        text.split_whitespace().next()?.parse::<f64>().ok()
    }
}

impl Default for CpuLoadSource {
    fn default() -> Self {
        Self::new()
    }
}

impl LoadSource for CpuLoadSource {
    fn sample(&self) -> f64 {
        match self.read_loadavg() {
            Some(raw) => {
                let load = (raw / self.cores).clamp(0.0, 1.0);
                self.last.store(load.to_bits(), Ordering::Relaxed);
                load
            }
            None => f64::from_bits(self.last.load(Ordering::Relaxed)),
        }
    }
}

/// A source that always returns the same sample, clamped at construction.
pub struct FixedLoadSource {
    value: f64,
}

impl FixedLoadSource {
    pub fn new(value: f64) -> Self {
        Self {
            value: value.clamp(0.0, 1.0),
        }
    }
}

impl LoadSource for FixedLoadSource {
    fn sample(&self) -> f64 {
        self.value
    }
}
