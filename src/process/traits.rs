/*!
 * Process Traits
 * Process control abstractions used by the schedulers
 */

use super::types::{ProcessResult, TerminationEvent};
use crate::core::types::Pid;
use tokio::sync::mpsc::UnboundedSender;

/// Launch, suspend and resume OS processes
pub trait ProcessControl: Send + Sync {
    /// Start the executable `name` with no arguments and return its OS pid.
    ///
    /// When the process terminates, exactly one [`TerminationEvent`] for the
    /// returned pid is sent on `events`.
    fn launch(&self, name: &str, events: &UnboundedSender<TerminationEvent>) -> ProcessResult<Pid>;

    /// Stop a running process (SIGSTOP). Returns false if the signal failed.
    fn suspend(&self, os_pid: Pid) -> bool;

    /// Continue a stopped process (SIGCONT). Returns false if the signal failed.
    fn resume(&self, os_pid: Pid) -> bool;

    /// Kill a process whether it is running or stopped (SIGKILL). Used to
    /// tear down launched applications when a run is aborted.
    fn terminate(&self, os_pid: Pid) -> bool;
}
