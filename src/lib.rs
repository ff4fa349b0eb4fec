/*!
 * Process Scheduling Simulator Library
 * Launches programs as child processes and schedules them with FCFS or Round-Robin
 */

pub mod cli;
pub mod config;
pub mod core;
pub mod monitoring;
pub mod process;
pub mod report;
pub mod scheduler;
pub mod simulator;
pub mod workload;

// Re-exports
pub use cli::{Algorithm, Args, Invocation};
pub use config::{QuantumUnit, SimulatorConfig};
pub use crate::core::errors::{ProcessError, SchedulerError, SimError};
pub use crate::core::types::{Pid, SimResult};
pub use monitoring::init_tracing;
pub use process::{Application, ExitInfo, ProcessControl, ProcessLauncher, ProcessStatus, TerminationEvent};
pub use report::{ConsoleReporter, ReportFormat, Reporter};
pub use scheduler::{
    Completion, ExecutionQueue, RoundRobinMode, ScheduleSummary, Scheduler, SchedulerStats,
    SchedulingPolicy, TimeAnchor,
};
pub use simulator::simulate;
