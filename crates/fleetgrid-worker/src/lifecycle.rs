//! WorkerLifecycle — the sole mutator of fleet membership.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tracing::{info, warn};

use fleetgrid_fleet::{SharedFleet, WorkerHandle, WorkerId};

use crate::driver::ProcessDriver;
use crate::error::LifecycleError;

/// Creates and terminates worker processes, keeping the fleet registry in
/// sync with every operation it issues.
pub struct WorkerLifecycle {
    driver: Arc<dyn ProcessDriver>,
    fleet: SharedFleet,
    /// Next worker id; process-unique by construction.
    next_id: AtomicU64,
}

impl WorkerLifecycle {
    pub fn new(driver: Arc<dyn ProcessDriver>, fleet: SharedFleet) -> Self {
        Self {
            driver,
            fleet,
            next_id: AtomicU64::new(1),
        }
    }

    /// Spawn one worker and register it.
    ///
    /// The process is forked first; only a successful fork touches the
    /// registry, so a `SpawnFailed` leaves the fleet exactly as it was.
    pub async fn spawn(&self) -> Result<WorkerId, LifecycleError> {
        let process = self
            .driver
            .fork()
            .map_err(|e| LifecycleError::SpawnFailed(e.to_string()))?;

        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let pid = process.pid();
        self.fleet.lock().await.add(WorkerHandle::new(id, process))?;

        info!(worker_id = id, pid, "worker spawned");
        Ok(id)
    }

    /// Terminate the identified worker.
    ///
    /// The handle is removed from the registry before the kill signal is
    /// issued; OS-level completion is not awaited. A failed signal is
    /// reported but the operation still counts as issued.
    pub async fn terminate(&self, id: WorkerId) -> Result<(), LifecycleError> {
        let mut handle = self.fleet.lock().await.remove(id)?;

        if let Err(e) = self.driver.kill(&mut handle.process) {
            warn!(worker_id = id, pid = handle.pid(), error = %e, "kill signal failed");
        }

        info!(worker_id = id, pid = handle.pid(), "worker terminated");
        Ok(())
    }

    /// Drain the registry and issue kills for every remaining worker.
    pub async fn shutdown(&self) {
        let handles = self.fleet.lock().await.drain();
        let count = handles.len();

        for mut handle in handles {
            if let Err(e) = self.driver.kill(&mut handle.process) {
                warn!(worker_id = handle.id, pid = handle.pid(), error = %e, "kill signal failed during shutdown");
            }
        }

        info!(workers = count, "fleet drained");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicBool, AtomicU32};

    use fleetgrid_fleet::{FleetError, FleetRegistry, ProcessHandle};

    /// Records forks and kills instead of touching the OS.
    #[derive(Default)]
    struct FakeDriver {
        next_pid: AtomicU32,
        fail_forks: AtomicBool,
        fail_kills: AtomicBool,
        killed_pids: Mutex<Vec<u32>>,
    }

    impl ProcessDriver for FakeDriver {
        fn fork(&self) -> io::Result<ProcessHandle> {
            if self.fail_forks.load(Ordering::Relaxed) {
                return Err(io::Error::other("resource limit reached"));
            }
            let pid = 1000 + self.next_pid.fetch_add(1, Ordering::Relaxed);
            Ok(ProcessHandle::detached(pid))
        }

        fn kill(&self, process: &mut ProcessHandle) -> io::Result<()> {
            if self.fail_kills.load(Ordering::Relaxed) {
                return Err(io::Error::other("no such process"));
            }
            self.killed_pids.lock().unwrap().push(process.pid());
            Ok(())
        }
    }

    fn rig() -> (WorkerLifecycle, SharedFleet, Arc<FakeDriver>) {
        let driver = Arc::new(FakeDriver::default());
        let fleet: SharedFleet = Arc::new(tokio::sync::Mutex::new(FleetRegistry::new()));
        let lifecycle = WorkerLifecycle::new(driver.clone(), fleet.clone());
        (lifecycle, fleet, driver)
    }

    #[tokio::test]
    async fn spawn_registers_the_worker() {
        let (lifecycle, fleet, _) = rig();

        let id = lifecycle.spawn().await.unwrap();
        let registry = fleet.lock().await;
        assert_eq!(registry.size(), 1);
        assert_eq!(registry.worker_ids(), vec![id]);
    }

    #[tokio::test]
    async fn spawn_failure_leaves_registry_untouched() {
        let (lifecycle, fleet, driver) = rig();
        driver.fail_forks.store(true, Ordering::Relaxed);

        let err = lifecycle.spawn().await.unwrap_err();
        assert!(matches!(err, LifecycleError::SpawnFailed(_)));
        assert_eq!(fleet.lock().await.size(), 0);
    }

    #[tokio::test]
    async fn worker_ids_are_unique_and_monotonic() {
        let (lifecycle, _, _) = rig();

        let first = lifecycle.spawn().await.unwrap();
        let second = lifecycle.spawn().await.unwrap();
        let third = lifecycle.spawn().await.unwrap();
        assert!(first < second && second < third);
    }

    #[tokio::test]
    async fn terminate_removes_before_signaling() {
        let (lifecycle, fleet, driver) = rig();
        let first = lifecycle.spawn().await.unwrap();
        let second = lifecycle.spawn().await.unwrap();

        lifecycle.terminate(first).await.unwrap();

        let registry = fleet.lock().await;
        assert_eq!(registry.size(), 1);
        assert_eq!(registry.worker_ids(), vec![second]);
        assert_eq!(driver.killed_pids.lock().unwrap().as_slice(), &[1000]);
    }

    #[tokio::test]
    async fn terminate_unknown_worker_is_not_found() {
        let (lifecycle, _, _) = rig();

        let err = lifecycle.terminate(99).await.unwrap_err();
        assert!(matches!(
            err,
            LifecycleError::Fleet(FleetError::NotFound(99))
        ));
    }

    #[tokio::test]
    async fn failed_kill_still_counts_as_issued() {
        let (lifecycle, fleet, driver) = rig();
        let id = lifecycle.spawn().await.unwrap();
        driver.fail_kills.store(true, Ordering::Relaxed);

        lifecycle.terminate(id).await.unwrap();
        assert_eq!(fleet.lock().await.size(), 0);
    }

    #[tokio::test]
    async fn shutdown_drains_the_fleet() {
        let (lifecycle, fleet, driver) = rig();
        for _ in 0..3 {
            lifecycle.spawn().await.unwrap();
        }

        lifecycle.shutdown().await;

        assert_eq!(fleet.lock().await.size(), 0);
        assert_eq!(driver.killed_pids.lock().unwrap().len(), 3);
    }
}
