/*!
 * Command Line
 * `scheduler <FCFS|RR> [<quantum>] <input_filename>`
 */

use crate::config::SimulatorConfig;
use crate::core::errors::SimError;
use crate::core::types::SimResult;
use crate::scheduler::types::SchedulingPolicy;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Scheduling algorithm named on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Algorithm {
    /// First-Come-First-Served
    #[value(name = "FCFS")]
    Fcfs,
    /// Round-Robin, requires a quantum
    #[value(name = "RR")]
    Rr,
}

#[derive(Parser, Debug)]
#[command(
    name = "scheduler",
    about = "Run the programs listed in a file under FCFS or Round-Robin scheduling"
)]
pub struct Args {
    /// Scheduling algorithm
    #[arg(value_enum)]
    pub algorithm: Algorithm,

    /// `[<quantum>] <input_filename>`; RR needs the quantum, FCFS must not have one
    #[arg(value_name = "ARGS", num_args = 1..=2, required = true)]
    pub operands: Vec<String>,
}

/// A validated command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub algorithm: Algorithm,
    pub quantum: Option<u64>,
    pub input: PathBuf,
}

impl Args {
    /// Check the algorithm/operand combination
    pub fn invocation(self) -> SimResult<Invocation> {
        let mut operands = self.operands.into_iter();
        match (self.algorithm, operands.next(), operands.next()) {
            (Algorithm::Fcfs, Some(input), None) => Ok(Invocation {
                algorithm: Algorithm::Fcfs,
                quantum: None,
                input: PathBuf::from(input),
            }),
            (Algorithm::Fcfs, Some(_), Some(_)) => Err(SimError::Usage(
                "FCFS takes no quantum, expected: FCFS <input_filename>".to_string(),
            )),
            (Algorithm::Rr, Some(quantum), Some(input)) => Ok(Invocation {
                algorithm: Algorithm::Rr,
                quantum: Some(parse_quantum(&quantum)?),
                input: PathBuf::from(input),
            }),
            (Algorithm::Rr, _, None) => Err(SimError::Usage(
                "RR requires a quantum, expected: RR <quantum> <input_filename>".to_string(),
            )),
            (_, None, _) => Err(SimError::Usage("missing input filename".to_string())),
        }
    }
}

impl Invocation {
    /// Parse a full argv (program name first)
    pub fn parse_from<I, T>(args: I) -> SimResult<Self>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        Args::try_parse_from(args)
            .map_err(|e| SimError::Usage(e.to_string()))?
            .invocation()
    }

    /// Scheduling policy for this invocation
    pub fn policy(&self, config: &SimulatorConfig) -> SchedulingPolicy {
        match (self.algorithm, self.quantum) {
            (Algorithm::Rr, Some(quantum)) => SchedulingPolicy::RoundRobin {
                quantum: config.quantum_unit.to_duration(quantum),
                mode: config.rr_mode,
            },
            _ => SchedulingPolicy::Fcfs,
        }
    }
}

fn parse_quantum(raw: &str) -> SimResult<u64> {
    match raw.parse::<u64>() {
        Ok(quantum) if quantum > 0 => Ok(quantum),
        _ => Err(SimError::Usage(format!(
            "quantum must be a positive integer, got '{}'",
            raw
        ))),
    }
}
