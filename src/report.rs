/*!
 * Completion Reporting
 * Console output for finished applications
 */

use crate::scheduler::types::Completion;
use serde::{Deserialize, Serialize};
use std::io::{self, Write};
use std::str::FromStr;
use tracing::warn;

/// Output format of completion lines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportFormat {
    /// `Process <name> completed. Execution time: <secs>`
    #[default]
    Text,
    /// One JSON object per line
    Json,
}

impl FromStr for ReportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            _ => Err(format!("Invalid report format '{}'. Valid: text, json", s)),
        }
    }
}

/// Receives completions as the scheduler finalizes them
pub trait Reporter: Send {
    fn report(&mut self, completion: &Completion);
}

/// Writes one line per completion
pub struct ConsoleReporter<W: Write + Send> {
    out: W,
    format: ReportFormat,
}

impl ConsoleReporter<io::Stdout> {
    pub fn stdout(format: ReportFormat) -> Self {
        Self::new(io::stdout(), format)
    }
}

impl<W: Write + Send> ConsoleReporter<W> {
    pub fn new(out: W, format: ReportFormat) -> Self {
        Self { out, format }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write + Send> Reporter for ConsoleReporter<W> {
    fn report(&mut self, completion: &Completion) {
        let line = format_completion(completion, self.format);
        if let Err(e) = writeln!(self.out, "{}", line).and_then(|_| self.out.flush()) {
            warn!(error = %e, "Failed to write completion report");
        }
    }
}

/// Render a completion in `format`
pub fn format_completion(completion: &Completion, format: ReportFormat) -> String {
    match format {
        ReportFormat::Text => format!(
            "Process {} completed. Execution time: {:.6}",
            completion.name,
            completion.execution_time.as_secs_f64()
        ),
        ReportFormat::Json => serde_json::to_string(completion).unwrap_or_else(|e| {
            warn!(error = %e, "Failed to serialize completion");
            format!("{{\"name\":{:?}}}", completion.name)
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::time::Duration;

    fn completion() -> Completion {
        Completion {
            name: "./a.out".to_string(),
            pid: Some(1234),
            exit_code: Some(0),
            signal: None,
            execution_time: Duration::from_millis(2500),
            turns: 3,
        }
    }

    #[test]
    fn test_text_line() {
        assert_eq!(
            format_completion(&completion(), ReportFormat::Text),
            "Process ./a.out completed. Execution time: 2.500000"
        );
    }

    #[test]
    fn test_json_line() {
        let line = format_completion(&completion(), ReportFormat::Json);
        let value: serde_json::Value = serde_json::from_str(&line).unwrap();
        assert_eq!(value["name"], "./a.out");
        assert_eq!(value["pid"], 1234);
        assert_eq!(value["execution_time_secs"], 2.5);
        assert_eq!(value["turns"], 3);
    }

    #[test]
    fn test_console_reporter_writes_lines() {
        let mut reporter = ConsoleReporter::new(Vec::new(), ReportFormat::Text);
        reporter.report(&completion());
        reporter.report(&completion());

        let output = String::from_utf8(reporter.into_inner()).unwrap();
        assert_eq!(output.lines().count(), 2);
        assert!(output.starts_with("Process ./a.out completed."));
    }

    #[test]
    fn test_format_parsing() {
        assert_eq!("JSON".parse(), Ok(ReportFormat::Json));
        assert!("yaml".parse::<ReportFormat>().is_err());
    }
}
