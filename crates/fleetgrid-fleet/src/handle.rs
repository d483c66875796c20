//! Worker handle types.

use std::time::{SystemTime, UNIX_EPOCH};

use tokio::process::Child;

/// Unique identifier for a live worker, assigned by the lifecycle manager.
pub type WorkerId = u64;

/// Opaque handle to a worker's OS process.
///
/// Usually wraps the `Child` returned by the spawn primitive. A handle can
/// also be detached (a bare pid with no attached child) for drivers that
/// manage processes they did not parent; killing a detached handle is the
/// owning driver's responsibility.
#[derive(Debug)]
pub struct ProcessHandle {
    pid: u32,
    child: Option<Child>,
}

impl ProcessHandle {
    /// Wrap a freshly spawned child process.
    pub fn from_child(child: Child) -> Self {
        // A just-spawned child always has an id; 0 only if it already exited
        // and was reaped before we got here.
        let pid = child.id().unwrap_or(0);
        Self {
            pid,
            child: Some(child),
        }
    }

    /// A handle carrying only a pid, with no attached child process.
    pub fn detached(pid: u32) -> Self {
        Self { pid, child: None }
    }

    pub fn pid(&self) -> u32 {
        self.pid
    }

    /// Issue the kill signal to the attached child without awaiting process
    /// exit. Detached handles are a no-op.
    pub fn start_kill(&mut self) -> std::io::Result<()> {
        match &mut self.child {
            Some(child) => child.start_kill(),
            None => Ok(()),
        }
    }
}

/// One live worker: identifier, process handle, and spawn timestamp.
///
/// Owned exclusively by the `FleetRegistry` from registration until removal.
#[derive(Debug)]
pub struct WorkerHandle {
    pub id: WorkerId,
    pub process: ProcessHandle,
    /// Unix timestamp (seconds) when the worker was spawned.
    pub spawned_at: u64,
}

impl WorkerHandle {
    pub fn new(id: WorkerId, process: ProcessHandle) -> Self {
        Self {
            id,
            process,
            spawned_at: epoch_secs(),
        }
    }

    pub fn pid(&self) -> u32 {
        self.process.pid()
    }
}

fn epoch_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}
