/*!
 * Process Launcher
 * Spawns applications as OS processes and controls them with signals
 */

use super::traits::ProcessControl;
use super::types::{ExitInfo, ProcessResult, TerminationEvent};
use crate::core::errors::ProcessError;
use crate::core::types::Pid;
use std::io;
use std::process::Stdio;
use tokio::process::{Child, Command};
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, error, info, warn};

#[cfg(unix)]
use std::os::unix::process::CommandExt;
#[cfg(unix)]
use nix::sys::signal::{killpg, Signal as UnixSignal};
#[cfg(unix)]
use nix::unistd::Pid as NixPid;

/// `ENOEXEC`: the file exists but is not a loadable image
const ENOEXEC: i32 = 8;

/// A launched OS process
#[derive(Debug)]
pub struct ProcessHandle {
    os_pid: Pid,
    name: String,
    child: Child,
}

impl ProcessHandle {
    pub fn os_pid(&self) -> Pid {
        self.os_pid
    }

    /// Block until the process terminates
    pub async fn wait_for_exit(mut self) -> ProcessResult<ExitInfo> {
        match self.child.wait().await {
            Ok(status) => {
                let exit = ExitInfo::from(status);
                info!(
                    name = %self.name,
                    os_pid = self.os_pid,
                    code = ?exit.code,
                    signal = ?exit.signal,
                    "Process exited"
                );
                Ok(exit)
            }
            Err(e) => {
                error!(name = %self.name, os_pid = self.os_pid, error = %e, "Failed to wait for process");
                Err(ProcessError::WaitFailure {
                    name: self.name,
                    os_pid: self.os_pid,
                    reason: e.to_string(),
                })
            }
        }
    }
}

/// Launches applications as real OS processes
#[derive(Debug, Clone, Default)]
pub struct ProcessLauncher;

impl ProcessLauncher {
    pub fn new() -> Self {
        debug!("Process launcher initialized");
        Self
    }

    /// Spawn `name` with no arguments, inheriting stdout and stderr
    ///
    /// The child leads its own process group so that signals reach anything
    /// it starts, and it is killed if its handle is dropped unreaped.
    pub fn spawn(&self, name: &str) -> ProcessResult<ProcessHandle> {
        let mut std_command = std::process::Command::new(name);
        std_command
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());
        #[cfg(unix)]
        std_command.process_group(0);

        let child = Command::from(std_command)
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| classify_spawn_error(name, e))?;

        let os_pid = child.id().ok_or_else(|| ProcessError::LaunchFailure {
            name: name.to_string(),
            reason: "process exited before its pid could be read".to_string(),
        })?;

        info!(name, os_pid, "Spawned OS process");

        Ok(ProcessHandle {
            os_pid,
            name: name.to_string(),
            child,
        })
    }

    /// Wait for `handle` on a background task and report its termination
    pub fn watch(handle: ProcessHandle, events: UnboundedSender<TerminationEvent>) {
        tokio::spawn(async move {
            let os_pid = handle.os_pid();
            let exit = handle.wait_for_exit().await;
            if events.send(TerminationEvent { os_pid, exit }).is_err() {
                debug!(os_pid, "Scheduler gone, dropping termination event");
            }
        });
    }

    /// Signal the whole process group led by `os_pid`
    ///
    /// The group outlives its leader only while members remain, so a reaped
    /// leader with no children left yields ESRCH instead of hitting a reused pid.
    #[cfg(unix)]
    fn signal(&self, os_pid: Pid, signal: UnixSignal) -> bool {
        match killpg(NixPid::from_raw(os_pid as i32), signal) {
            Ok(()) => true,
            Err(e) => {
                warn!(os_pid, ?signal, error = %e, "Failed to signal process");
                false
            }
        }
    }
}

impl ProcessControl for ProcessLauncher {
    fn launch(&self, name: &str, events: &UnboundedSender<TerminationEvent>) -> ProcessResult<Pid> {
        let handle = self.spawn(name)?;
        let os_pid = handle.os_pid();
        Self::watch(handle, events.clone());
        Ok(os_pid)
    }

    #[cfg(unix)]
    fn suspend(&self, os_pid: Pid) -> bool {
        self.signal(os_pid, UnixSignal::SIGSTOP)
    }

    #[cfg(unix)]
    fn resume(&self, os_pid: Pid) -> bool {
        self.signal(os_pid, UnixSignal::SIGCONT)
    }

    #[cfg(unix)]
    fn terminate(&self, os_pid: Pid) -> bool {
        self.signal(os_pid, UnixSignal::SIGKILL)
    }

    /// Non-Unix stubs
    #[cfg(not(unix))]
    fn suspend(&self, os_pid: Pid) -> bool {
        warn!(os_pid, "Process suspension not supported on this platform");
        false
    }

    #[cfg(not(unix))]
    fn resume(&self, os_pid: Pid) -> bool {
        warn!(os_pid, "Process resumption not supported on this platform");
        false
    }

    #[cfg(not(unix))]
    fn terminate(&self, os_pid: Pid) -> bool {
        warn!(os_pid, "Process termination not supported on this platform");
        false
    }
}

/// Image-loading problems are exec failures; everything else means the
/// process could not be created at all
fn classify_spawn_error(name: &str, err: io::Error) -> ProcessError {
    let exec_failed = matches!(
        err.kind(),
        io::ErrorKind::NotFound | io::ErrorKind::PermissionDenied
    ) || err.raw_os_error() == Some(ENOEXEC);

    error!(name, error = %err, exec_failed, "Failed to launch process");

    if exec_failed {
        ProcessError::ExecFailure {
            name: name.to_string(),
            reason: err.to_string(),
        }
    } else {
        ProcessError::LaunchFailure {
            name: name.to_string(),
            reason: err.to_string(),
        }
    }
}
