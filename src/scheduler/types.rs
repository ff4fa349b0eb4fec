/*!
 * Scheduler Types
 * Policies, completion reports and run statistics
 */

use crate::core::errors::SchedulerError;
use crate::core::types::Pid;
use crate::process::types::Application;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Scheduler operation result
pub type SchedulerResult<T> = Result<T, SchedulerError>;

/// How Round-Robin hands out turns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundRobinMode {
    /// A preempted application goes to the tail and the next head runs
    #[default]
    Interleaved,
    /// One quantum, then suspend/resume and block until exit before the next head
    Sequential,
}

impl RoundRobinMode {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Interleaved => "interleaved",
            Self::Sequential => "sequential",
        }
    }
}

impl FromStr for RoundRobinMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "interleaved" => Ok(Self::Interleaved),
            "sequential" => Ok(Self::Sequential),
            _ => Err(format!(
                "Invalid round-robin mode '{}'. Valid: interleaved, sequential",
                s
            )),
        }
    }
}

/// What an application's accumulated time is measured from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeAnchor {
    /// Wall time elapsed since the scheduler started
    #[default]
    Scheduler,
    /// Sum of the application's own run spans
    Process,
}

impl TimeAnchor {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Scheduler => "scheduler",
            Self::Process => "process",
        }
    }
}

impl FromStr for TimeAnchor {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "scheduler" => Ok(Self::Scheduler),
            "process" => Ok(Self::Process),
            _ => Err(format!(
                "Invalid time anchor '{}'. Valid: scheduler, process",
                s
            )),
        }
    }
}

/// Scheduling discipline for one run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulingPolicy {
    /// First-Come-First-Served: run each application to completion in order
    Fcfs,
    /// Round-Robin with a fixed time quantum
    RoundRobin {
        quantum: Duration,
        mode: RoundRobinMode,
    },
}

impl SchedulingPolicy {
    pub fn round_robin(quantum: Duration) -> Self {
        Self::RoundRobin {
            quantum,
            mode: RoundRobinMode::default(),
        }
    }
}

impl fmt::Display for SchedulingPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fcfs => write!(f, "FCFS"),
            Self::RoundRobin { quantum, mode } => {
                write!(f, "RR(quantum={:?}, {})", quantum, mode.as_str())
            }
        }
    }
}

/// One finished application, as reported to the console
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Completion {
    pub name: String,
    pub pid: Option<Pid>,
    pub exit_code: Option<i32>,
    pub signal: Option<i32>,
    #[serde(rename = "execution_time_secs", serialize_with = "secs_f64")]
    pub execution_time: Duration,
    pub turns: u32,
}

impl From<&Application> for Completion {
    fn from(app: &Application) -> Self {
        let exit = app.exit().unwrap_or_default();
        Self {
            name: app.name().to_string(),
            pid: app.os_pid(),
            exit_code: exit.code,
            signal: exit.signal,
            execution_time: app.accumulated(),
            turns: app.turns(),
        }
    }
}

/// Counters collected during a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct SchedulerStats {
    /// Applications started as new OS processes
    pub launches: u64,
    /// Turns handed to an already launched application
    pub resumes: u64,
    /// Quantum expirations that suspended an application
    pub preemptions: u64,
    /// Terminations finalized outside the owning application's turn
    pub reconciled: u64,
}

/// Result of a complete scheduling run
#[derive(Debug, Clone, Default, Serialize)]
pub struct ScheduleSummary {
    /// Completions in the order they were reported
    pub completions: Vec<Completion>,
    pub stats: SchedulerStats,
    #[serde(rename = "elapsed_secs", serialize_with = "secs_f64")]
    pub elapsed: Duration,
}

impl ScheduleSummary {
    pub fn completed_names(&self) -> Vec<&str> {
        self.completions.iter().map(|c| c.name.as_str()).collect()
    }
}

fn secs_f64<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64(value.as_secs_f64())
}
