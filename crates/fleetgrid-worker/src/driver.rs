//! Process drivers — the seam over the OS-level spawn/kill primitive.

use std::io;
use std::path::PathBuf;
use std::process::Stdio;

use tokio::process::Command;

use fleetgrid_fleet::ProcessHandle;

/// The OS-level process primitive the lifecycle manager drives.
///
/// `fork` creates a worker process and `kill` issues its termination
/// signal. Neither call awaits OS-level completion; a `fork` that returns
/// `Ok` means the process was created, a `kill` that returns `Ok` means the
/// signal was issued.
pub trait ProcessDriver: Send + Sync {
    fn fork(&self) -> io::Result<ProcessHandle>;

    fn kill(&self, process: &mut ProcessHandle) -> io::Result<()>;
}

/// Production driver: spawns a configured worker command.
///
/// Workers inherit the daemon's stdout/stderr so their logs interleave with
/// the daemon's. `fork` must be called from within a tokio runtime.
pub struct CommandDriver {
    program: PathBuf,
    args: Vec<String>,
}

impl CommandDriver {
    pub fn new(program: impl Into<PathBuf>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    pub fn program(&self) -> &PathBuf {
        &self.program
    }
}

impl ProcessDriver for CommandDriver {
    fn fork(&self) -> io::Result<ProcessHandle> {
        let child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::null())
            .spawn()?;
        Ok(ProcessHandle::from_child(child))
    }

    fn kill(&self, process: &mut ProcessHandle) -> io::Result<()> {
        process.start_kill()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn fork_spawns_a_real_process() {
        let driver = CommandDriver::new("sleep", vec!["30".to_string()]);

        let mut process = driver.fork().unwrap();
        assert!(process.pid() > 0);

        driver.kill(&mut process).unwrap();
    }

    #[tokio::test]
    async fn fork_missing_binary_fails() {
        let driver = CommandDriver::new("/nonexistent/fleetgrid-worker-binary", vec![]);
        assert!(driver.fork().is_err());
    }

    #[tokio::test]
    async fn kill_twice_is_harmless() {
        let driver = CommandDriver::new("sleep", vec!["30".to_string()]);

        let mut process = driver.fork().unwrap();
        driver.kill(&mut process).unwrap();
        // Second signal to an already-killed child.
        let _ = driver.kill(&mut process);
    }
}
