//! Controller — per-tick evaluation and actuation of the fleet size.

use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use fleetgrid_fleet::{SharedFleet, WorkerId};
use fleetgrid_load::LoadSource;
use fleetgrid_worker::{LifecycleError, WorkerLifecycle};

/// Load threshold the fleet grows above and shrinks below.
pub const DEFAULT_THRESHOLD: f64 = 0.7;

/// Time between control-loop ticks.
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_secs(10);

/// Immutable, process-lifetime scaling parameters.
#[derive(Debug, Clone)]
pub struct ScalePolicy {
    /// Ceiling on the fleet size.
    pub max_workers: usize,
    /// Load value in [0, 1]; strictly above triggers scale-up, strictly
    /// below triggers scale-down, exactly equal is a no-op.
    pub threshold: f64,
    /// Time between samples.
    pub tick_interval: Duration,
}

impl ScalePolicy {
    /// Derive the policy from detected hardware concurrency: the ceiling is
    /// twice the logical core count.
    pub fn from_parallelism() -> Self {
        let cores = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        Self {
            max_workers: cores * 2,
            threshold: DEFAULT_THRESHOLD,
            tick_interval: DEFAULT_TICK_INTERVAL,
        }
    }

    /// Initial fleet size: one worker per detected logical core.
    pub fn baseline(&self) -> usize {
        (self.max_workers / 2).max(1)
    }
}

impl Default for ScalePolicy {
    fn default() -> Self {
        Self::from_parallelism()
    }
}

/// What a tick did to the fleet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScaleAction {
    None,
    ScaleUp,
    ScaleDown,
}

/// Structured record of one control-loop tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TickEvent {
    /// Unix timestamp (seconds) of the evaluation.
    pub tick_time: u64,
    pub load_sample: f64,
    pub fleet_size_before: usize,
    pub action: ScaleAction,
    pub fleet_size_after: usize,
    /// Set when a lifecycle operation failed inside the tick; the intended
    /// action then reports as `none`.
    pub error: Option<String>,
}

/// Callback invoked with every emitted tick event.
pub type TickObserver = Box<dyn Fn(&TickEvent) + Send + Sync>;

/// The autoscale controller owns the control loop: it samples the metric,
/// applies policy, and asks the lifecycle manager to act. It never touches
/// registry membership itself.
///
/// Stateless between ticks beyond the immutable policy: no history, no
/// momentum.
pub struct Controller {
    policy: ScalePolicy,
    source: Arc<dyn LoadSource>,
    fleet: SharedFleet,
    lifecycle: Arc<WorkerLifecycle>,
    observer: Option<TickObserver>,
}

impl Controller {
    pub fn new(
        policy: ScalePolicy,
        source: Arc<dyn LoadSource>,
        fleet: SharedFleet,
        lifecycle: Arc<WorkerLifecycle>,
    ) -> Self {
        Self {
            policy,
            source,
            fleet,
            lifecycle,
            observer: None,
        }
    }

    /// Set a callback that receives every tick event.
    pub fn with_observer(mut self, observer: TickObserver) -> Self {
        self.observer = Some(observer);
        self
    }

    pub fn policy(&self) -> &ScalePolicy {
        &self.policy
    }

    /// Spawn workers up to the baseline before the first tick.
    ///
    /// This is the startup fill, not part of the per-tick loop; a failure
    /// here propagates because the fleet floor invariant only holds after a
    /// successful fill.
    pub async fn fill_to_baseline(&self) -> Result<usize, LifecycleError> {
        let baseline = self.policy.baseline();
        let current = self.fleet.lock().await.size();

        for _ in current..baseline {
            self.lifecycle.spawn().await?;
        }

        info!(baseline, "fleet filled to baseline");
        Ok(baseline)
    }

    /// Evaluate one tick and act on it.
    ///
    /// Never fails: lifecycle errors are caught here, reported in the
    /// returned event, and retried only on the next natural tick.
    pub async fn tick(&self) -> TickEvent {
        let load = self.source.sample();
        let before = self.fleet.lock().await.size();

        let (action, error) = if load > self.policy.threshold && before < self.policy.max_workers {
            match self.lifecycle.spawn().await {
                Ok(id) => {
                    info!(worker_id = id, load, fleet_size = before + 1, "scaled up");
                    (ScaleAction::ScaleUp, None)
                }
                Err(e) => {
                    warn!(load, error = %e, "scale-up failed");
                    (ScaleAction::None, Some(e.to_string()))
                }
            }
        } else if load < self.policy.threshold && before > 1 {
            match self.scale_down().await {
                Ok(victim) => {
                    info!(victim, load, fleet_size = before - 1, "scaled down");
                    (ScaleAction::ScaleDown, None)
                }
                Err(e) => {
                    warn!(load, error = %e, "scale-down failed");
                    (ScaleAction::None, Some(e.to_string()))
                }
            }
        } else {
            debug!(load, fleet_size = before, "no action");
            (ScaleAction::None, None)
        };

        let after = self.fleet.lock().await.size();
        let event = TickEvent {
            tick_time: epoch_secs(),
            load_sample: load,
            fleet_size_before: before,
            action,
            fleet_size_after: after,
            error,
        };

        if let Some(ref observer) = self.observer {
            observer(&event);
        }
        event
    }

    async fn scale_down(&self) -> Result<WorkerId, LifecycleError> {
        let victim = self.fleet.lock().await.select_victim()?;
        self.lifecycle.terminate(victim).await?;
        Ok(victim)
    }

    /// Run the control loop.
    ///
    /// Ticks are sequential by construction: each evaluate/act sequence
    /// completes before the next interval is armed.
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) {
        info!(
            interval_secs = self.policy.tick_interval.as_secs(),
            max_workers = self.policy.max_workers,
            threshold = self.policy.threshold,
            "autoscale controller started"
        );

        loop {
            tokio::select! {
                _ = tokio::time::sleep(self.policy.tick_interval) => {
                    self.tick().await;
                }
                _ = shutdown.changed() => {
                    info!("autoscale controller shutting down");
                    break;
                }
            }
        }
    }
}

fn epoch_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}
