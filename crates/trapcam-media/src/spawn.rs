//! Capture process spawning and lifetime handles.
//!
//! The spawn seam is a trait so camera tests can substitute a fake process
//! table. The real implementation hands the rendered command line to a
//! shell in its own process group, which is how the capture tool is driven
//! on the device.

use std::process::{ExitStatus, Stdio};
use std::time::Duration;

use async_trait::async_trait;
use nix::errno::Errno;
use nix::sys::signal::{self, Signal};
use nix::unistd::Pid;
use tokio::process::{Child, Command};
use tracing::debug;

use crate::error::{MediaError, MediaResult};

/// A live (or recently exited) capture process owned by a camera channel.
#[async_trait]
pub trait CaptureHandle: Send + Sync {
    /// OS pid of the spawned process, if known.
    fn pid(&self) -> Option<u32>;

    /// Send SIGINT to the process group. A group that has already exited
    /// is not an error.
    fn interrupt(&mut self) -> MediaResult<()>;

    /// Non-blocking liveness poll; `Some(status)` once the process exited.
    fn try_wait(&mut self) -> MediaResult<Option<ExitStatus>>;

    /// Wait up to `timeout` for the process to exit. Returns `false` on
    /// timeout.
    async fn wait_exit(&mut self, timeout: Duration) -> MediaResult<bool>;

    /// Forcibly terminate the process.
    async fn kill(&mut self) -> MediaResult<()>;
}

/// Spawner for capture command lines.
pub trait CaptureSpawn: Send + Sync {
    /// Start the command. Fire-and-forget: returns once the process has
    /// been spawned, without waiting for it to reach a ready state.
    fn spawn(&self, command: &str, quiet: bool) -> MediaResult<Box<dyn CaptureHandle>>;
}

/// Real spawner: `sh -c <command>` in a fresh process group.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShellSpawn;

impl CaptureSpawn for ShellSpawn {
    fn spawn(&self, command: &str, quiet: bool) -> MediaResult<Box<dyn CaptureHandle>> {
        let mut cmd = Command::new("sh");
        cmd.arg("-c").arg(command).stdin(Stdio::null());
        if quiet {
            cmd.stdout(Stdio::null()).stderr(Stdio::null());
        }
        // Fresh process group so one SIGINT reaches the launcher and every
        // helper it forks.
        cmd.process_group(0);
        let child = cmd.spawn()?;
        let pid = child.id();
        debug!(?pid, %command, "spawned capture process");
        Ok(Box::new(ShellHandle { pid, child }))
    }
}

struct ShellHandle {
    pid: Option<u32>,
    child: Child,
}

#[async_trait]
impl CaptureHandle for ShellHandle {
    fn pid(&self) -> Option<u32> {
        self.pid
    }

    fn interrupt(&mut self) -> MediaResult<()> {
        let pid = self.pid.ok_or(MediaError::NoActiveProcess)?;
        let pgid = Pid::from_raw(pid as i32);
        match signal::killpg(pgid, Signal::SIGINT) {
            Ok(()) => Ok(()),
            // Group already gone: nothing left to stop.
            Err(Errno::ESRCH) => Ok(()),
            Err(source) => Err(MediaError::Signal {
                pgid: pid as i32,
                source,
            }),
        }
    }

    fn try_wait(&mut self) -> MediaResult<Option<ExitStatus>> {
        Ok(self.child.try_wait()?)
    }

    async fn wait_exit(&mut self, timeout: Duration) -> MediaResult<bool> {
        match tokio::time::timeout(timeout, self.child.wait()).await {
            Ok(status) => {
                status?;
                Ok(true)
            }
            Err(_) => Ok(false),
        }
    }

    async fn kill(&mut self) -> MediaResult<()> {
        self.child.kill().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_shell_spawn_runs_and_exits() {
        let handle = ShellSpawn.spawn("true", true);
        let mut handle = handle.unwrap();
        assert!(handle.pid().is_some());
        assert!(handle.wait_exit(Duration::from_secs(5)).await.unwrap());
        assert!(handle.try_wait().unwrap().is_some());
    }

    #[tokio::test]
    async fn test_interrupt_stops_sleeping_group() {
        let mut handle = ShellSpawn.spawn("sleep 30", true).unwrap();
        assert!(handle.try_wait().unwrap().is_none());
        handle.interrupt().unwrap();
        assert!(handle.wait_exit(Duration::from_secs(5)).await.unwrap());
    }

    #[tokio::test]
    async fn test_interrupt_after_exit_is_ok() {
        let mut handle = ShellSpawn.spawn("true", true).unwrap();
        assert!(handle.wait_exit(Duration::from_secs(5)).await.unwrap());
        // The group is gone; interrupting it is not an error.
        handle.interrupt().unwrap();
    }
}
