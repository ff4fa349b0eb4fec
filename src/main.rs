/*!
 * Process Scheduling Simulator - Main Entry Point
 *
 * Usage: scheduler <FCFS|RR> [<quantum>] <input_filename>
 */

use clap::Parser;
use tracing::info;

use proc_scheduler::{init_tracing, simulate, Args, SimulatorConfig};

#[tokio::main]
async fn main() -> miette::Result<()> {
    // Arguments are validated before anything touches the file system
    let invocation = Args::parse().invocation()?;
    let config = SimulatorConfig::from_env()?;

    init_tracing(config.trace_json);
    info!(?invocation, ?config, "Scheduler simulator starting");

    simulate(&invocation, &config).await?;
    Ok(())
}
