/*!
 * Process Types
 * Application records and lifecycle events
 */

use crate::core::errors::ProcessError;
use crate::core::types::Pid;
use serde::{Deserialize, Serialize};
use std::process::ExitStatus;
use std::time::Duration;

/// Process operation result
pub type ProcessResult<T> = Result<T, ProcessError>;

/// Lifecycle status of an application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcessStatus {
    /// Parsed from the input, not launched yet
    New,
    /// Launched or resumed, currently allowed to run
    Running,
    /// Suspended with SIGSTOP, waiting in the queue for its next turn
    Stopped,
    /// Terminated (terminal state)
    Exited,
}

impl ProcessStatus {
    /// Whether `self -> to` is a legal lifecycle step
    #[inline]
    pub const fn can_transition_to(self, to: ProcessStatus) -> bool {
        matches!(
            (self, to),
            (Self::New, Self::Running)
                | (Self::Running, Self::Stopped)
                | (Self::Stopped, Self::Running)
                | (Self::Running, Self::Exited)
                | (Self::Stopped, Self::Exited)
        )
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::New => "NEW",
            Self::Running => "RUNNING",
            Self::Stopped => "STOPPED",
            Self::Exited => "EXITED",
        }
    }
}

/// How a child process terminated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ExitInfo {
    pub code: Option<i32>,
    pub signal: Option<i32>,
}

impl ExitInfo {
    pub const fn with_code(code: i32) -> Self {
        Self {
            code: Some(code),
            signal: None,
        }
    }

    pub const fn success(&self) -> bool {
        matches!(self.code, Some(0))
    }
}

impl From<ExitStatus> for ExitInfo {
    fn from(status: ExitStatus) -> Self {
        #[cfg(unix)]
        let signal = {
            use std::os::unix::process::ExitStatusExt;
            status.signal()
        };
        #[cfg(not(unix))]
        let signal = None;

        Self {
            code: status.code(),
            signal,
        }
    }
}

/// Notification that a child process terminated
///
/// `exit` is an error when the watcher could not collect the exit status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TerminationEvent {
    pub os_pid: Pid,
    pub exit: ProcessResult<ExitInfo>,
}

impl TerminationEvent {
    pub fn exited(os_pid: Pid, exit: ExitInfo) -> Self {
        Self {
            os_pid,
            exit: Ok(exit),
        }
    }
}

/// One schedulable application
///
/// The OS pid is present exactly when the status is RUNNING, STOPPED or
/// EXITED; the transition methods keep that invariant.
#[derive(Debug, Clone, PartialEq)]
pub struct Application {
    name: String,
    os_pid: Option<Pid>,
    status: ProcessStatus,
    accumulated: Duration,
    turns: u32,
    exit: Option<ExitInfo>,
}

impl Application {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            os_pid: None,
            status: ProcessStatus::New,
            accumulated: Duration::ZERO,
            turns: 0,
            exit: None,
        }
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn os_pid(&self) -> Option<Pid> {
        self.os_pid
    }

    #[inline]
    pub fn status(&self) -> ProcessStatus {
        self.status
    }

    #[inline]
    pub fn accumulated(&self) -> Duration {
        self.accumulated
    }

    /// Number of times the application was dispatched
    #[inline]
    pub fn turns(&self) -> u32 {
        self.turns
    }

    #[inline]
    pub fn exit(&self) -> Option<ExitInfo> {
        self.exit
    }

    /// NEW -> RUNNING, binding the OS pid
    pub fn start(&mut self, os_pid: Pid) -> ProcessResult<()> {
        self.expect_status(ProcessStatus::New, ProcessStatus::Running)?;
        self.transition(ProcessStatus::Running)?;
        self.os_pid = Some(os_pid);
        self.turns += 1;
        Ok(())
    }

    /// STOPPED -> RUNNING
    pub fn resume(&mut self) -> ProcessResult<()> {
        self.expect_status(ProcessStatus::Stopped, ProcessStatus::Running)?;
        self.transition(ProcessStatus::Running)?;
        self.turns += 1;
        Ok(())
    }

    /// RUNNING -> STOPPED
    pub fn suspend(&mut self) -> ProcessResult<()> {
        self.transition(ProcessStatus::Stopped)
    }

    /// RUNNING | STOPPED -> EXITED
    pub fn finish(&mut self, exit: ExitInfo) -> ProcessResult<()> {
        self.transition(ProcessStatus::Exited)?;
        self.exit = Some(exit);
        Ok(())
    }

    /// Raise the accumulated time to `elapsed` if it is larger
    pub fn record_elapsed(&mut self, elapsed: Duration) {
        self.accumulated = self.accumulated.max(elapsed);
    }

    /// Add a run span to the accumulated time
    pub fn add_span(&mut self, span: Duration) {
        self.accumulated += span;
    }

    fn transition(&mut self, to: ProcessStatus) -> ProcessResult<()> {
        if !self.status.can_transition_to(to) {
            return Err(self.invalid_transition(to));
        }
        self.status = to;
        Ok(())
    }

    fn expect_status(&self, from: ProcessStatus, to: ProcessStatus) -> ProcessResult<()> {
        if self.status != from {
            return Err(self.invalid_transition(to));
        }
        Ok(())
    }

    fn invalid_transition(&self, to: ProcessStatus) -> ProcessError {
        ProcessError::InvalidStateTransition {
            name: self.name.clone(),
            from: self.status,
            to,
        }
    }
}
