/*!
 * Simulator
 * Wires the workload, launcher, reporter and scheduler for one run
 */

use crate::cli::Invocation;
use crate::config::SimulatorConfig;
use crate::core::types::SimResult;
use crate::process::launcher::ProcessLauncher;
use crate::report::ConsoleReporter;
use crate::scheduler::{ScheduleSummary, Scheduler};
use crate::workload::load_queue;
use tracing::{info, instrument};

/// Load the input file and schedule every application in it
///
/// An empty input file is not an error: nothing is launched and nothing is
/// printed.
#[instrument(skip_all, fields(input = %invocation.input.display()))]
pub async fn simulate(
    invocation: &Invocation,
    config: &SimulatorConfig,
) -> SimResult<ScheduleSummary> {
    let queue = load_queue(&invocation.input).await?;
    if queue.is_empty() {
        info!("Nothing to schedule");
        return Ok(ScheduleSummary::default());
    }

    let policy = invocation.policy(config);
    let summary = Scheduler::new(queue, ProcessLauncher::new())
        .with_reporter(Box::new(ConsoleReporter::stdout(config.report_format)))
        .with_time_anchor(config.time_anchor)
        .run(policy)
        .await?;

    info!(
        launches = summary.stats.launches,
        resumes = summary.stats.resumes,
        preemptions = summary.stats.preemptions,
        reconciled = summary.stats.reconciled,
        "Simulation complete"
    );
    Ok(summary)
}
