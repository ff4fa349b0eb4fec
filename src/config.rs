/*!
 * Simulator Configuration
 * Environment-driven settings read once at startup
 *
 * Environment variables:
 * - SCHED_QUANTUM_UNIT: `s` or `ms` (default: s)
 * - SCHED_TIME_ANCHOR: `scheduler` or `process` (default: scheduler)
 * - SCHED_RR_MODE: `interleaved` or `sequential` (default: interleaved)
 * - SCHED_REPORT_FORMAT: `text` or `json` (default: text)
 * - SCHED_TRACE_JSON: `1`/`true` for JSON logs (default: false)
 */

use crate::core::errors::SimError;
use crate::core::types::SimResult;
use crate::report::ReportFormat;
use crate::scheduler::types::{RoundRobinMode, TimeAnchor};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::time::Duration;

pub const QUANTUM_UNIT_VAR: &str = "SCHED_QUANTUM_UNIT";
pub const TIME_ANCHOR_VAR: &str = "SCHED_TIME_ANCHOR";
pub const RR_MODE_VAR: &str = "SCHED_RR_MODE";
pub const REPORT_FORMAT_VAR: &str = "SCHED_REPORT_FORMAT";
pub const TRACE_JSON_VAR: &str = "SCHED_TRACE_JSON";

/// Unit of the quantum given on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuantumUnit {
    #[default]
    Seconds,
    Millis,
}

impl QuantumUnit {
    pub fn to_duration(self, quantum: u64) -> Duration {
        match self {
            Self::Seconds => Duration::from_secs(quantum),
            Self::Millis => Duration::from_millis(quantum),
        }
    }
}

impl FromStr for QuantumUnit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "s" | "sec" | "secs" | "seconds" => Ok(Self::Seconds),
            "ms" | "millis" | "milliseconds" => Ok(Self::Millis),
            _ => Err(format!("Invalid quantum unit '{}'. Valid: s, ms", s)),
        }
    }
}

/// Runtime settings that are not part of the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SimulatorConfig {
    pub quantum_unit: QuantumUnit,
    pub time_anchor: TimeAnchor,
    pub rr_mode: RoundRobinMode,
    pub report_format: ReportFormat,
    pub trace_json: bool,
}

impl SimulatorConfig {
    /// Load from the process environment
    pub fn from_env() -> SimResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load from an arbitrary key lookup; unset keys keep their defaults
    pub fn from_lookup<F>(lookup: F) -> SimResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Ok(Self {
            quantum_unit: parse_var(&lookup, QUANTUM_UNIT_VAR, defaults.quantum_unit)?,
            time_anchor: parse_var(&lookup, TIME_ANCHOR_VAR, defaults.time_anchor)?,
            rr_mode: parse_var(&lookup, RR_MODE_VAR, defaults.rr_mode)?,
            report_format: parse_var(&lookup, REPORT_FORMAT_VAR, defaults.report_format)?,
            trace_json: lookup(TRACE_JSON_VAR)
                .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
                .unwrap_or(false),
        })
    }
}

fn parse_var<T, F>(lookup: &F, key: &str, default: T) -> SimResult<T>
where
    T: FromStr<Err = String>,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map_err(|e| SimError::Config(format!("{}: {}", key, e))),
        _ => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = SimulatorConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config, SimulatorConfig::default());
        assert_eq!(config.quantum_unit.to_duration(2), Duration::from_secs(2));
    }

    #[test]
    fn test_overrides() {
        let config = SimulatorConfig::from_lookup(lookup_from(&[
            (QUANTUM_UNIT_VAR, "ms"),
            (TIME_ANCHOR_VAR, "process"),
            (RR_MODE_VAR, "sequential"),
            (REPORT_FORMAT_VAR, "json"),
            (TRACE_JSON_VAR, "true"),
        ]))
        .unwrap();

        assert_eq!(config.quantum_unit, QuantumUnit::Millis);
        assert_eq!(config.quantum_unit.to_duration(250), Duration::from_millis(250));
        assert_eq!(config.time_anchor, TimeAnchor::Process);
        assert_eq!(config.rr_mode, RoundRobinMode::Sequential);
        assert_eq!(config.report_format, ReportFormat::Json);
        assert!(config.trace_json);
    }

    #[test]
    fn test_invalid_value_is_config_error() {
        let err = SimulatorConfig::from_lookup(lookup_from(&[(QUANTUM_UNIT_VAR, "hours")]))
            .unwrap_err();
        assert!(matches!(err, SimError::Config(msg) if msg.contains(QUANTUM_UNIT_VAR)));
    }

    #[test]
    #[serial]
    fn test_from_env() {
        std::env::set_var(RR_MODE_VAR, "sequential");
        let config = SimulatorConfig::from_env();
        std::env::remove_var(RR_MODE_VAR);

        assert_eq!(config.unwrap().rr_mode, RoundRobinMode::Sequential);
    }
}
