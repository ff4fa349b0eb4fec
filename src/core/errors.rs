/*!
 * Error Types
 * Centralized error handling with thiserror and miette
 */

use crate::process::types::ProcessStatus;
use miette::Diagnostic;
use thiserror::Error;

/// Process-related errors
#[derive(Error, Debug, Clone, PartialEq, Eq, Diagnostic)]
pub enum ProcessError {
    #[error("Failed to create process for '{name}': {reason}")]
    #[diagnostic(
        code(process::launch_failure),
        help("The OS refused to create a new process. Check process limits and system resources.")
    )]
    LaunchFailure { name: String, reason: String },

    #[error("Failed to execute '{name}': {reason}")]
    #[diagnostic(
        code(process::exec_failure),
        help("Check that the input file lists executable paths and that they have execute permission.")
    )]
    ExecFailure { name: String, reason: String },

    #[error("Failed to wait for '{name}' (PID {os_pid}): {reason}")]
    #[diagnostic(
        code(process::wait_failure),
        help("The exit status of the child could not be collected. Nothing about its completion is known.")
    )]
    WaitFailure {
        name: String,
        os_pid: u32,
        reason: String,
    },

    #[error("Invalid state transition for '{name}': {from:?} -> {to:?}")]
    #[diagnostic(
        code(process::invalid_transition),
        help("Applications move NEW -> RUNNING -> (STOPPED -> RUNNING)* -> EXITED.")
    )]
    InvalidStateTransition {
        name: String,
        from: ProcessStatus,
        to: ProcessStatus,
    },
}

/// Scheduler-related errors
#[derive(Error, Debug, Clone, PartialEq, Eq, Diagnostic)]
pub enum SchedulerError {
    #[error("Execution queue is empty")]
    #[diagnostic(
        code(scheduler::empty_queue),
        help("A record was dequeued from an empty queue. This is a scheduler bug, please report it.")
    )]
    EmptyQueue,

    #[error("Failed to allocate queue entry: {0}")]
    #[diagnostic(
        code(scheduler::allocation),
        help("System may be low on memory. Shorten the input file or free resources.")
    )]
    Allocation(String),

    #[error("Termination event channel closed while waiting for PID {0}")]
    #[diagnostic(
        code(scheduler::event_channel_closed),
        help("The exit watcher stopped before reporting. This is a scheduler bug, please report it.")
    )]
    EventChannelClosed(u32),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Process(#[from] ProcessError),
}

/// Unified simulator error type with miette diagnostics
#[derive(Error, Debug, Diagnostic)]
pub enum SimError {
    #[error("Usage error: {0}")]
    #[diagnostic(
        code(sim::usage),
        help("Usage: scheduler <FCFS|RR> [<quantum>] <input_filename>")
    )]
    Usage(String),

    #[error("Cannot read input file '{path}': {reason}")]
    #[diagnostic(
        code(sim::file_error),
        help("Check that the file exists and is readable.")
    )]
    File { path: String, reason: String },

    #[error("Configuration error: {0}")]
    #[diagnostic(
        code(sim::configuration_error),
        help("Review the SCHED_* environment variables.")
    )]
    Config(String),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Scheduler(#[from] SchedulerError),
}

impl From<ProcessError> for SimError {
    fn from(err: ProcessError) -> Self {
        SimError::Scheduler(SchedulerError::Process(err))
    }
}

impl From<std::collections::TryReserveError> for SchedulerError {
    fn from(err: std::collections::TryReserveError) -> Self {
        SchedulerError::Allocation(err.to_string())
    }
}
