/*!
 * Workload Loading
 * Builds the execution queue from the input file
 */

use crate::core::errors::SimError;
use crate::core::types::SimResult;
use crate::process::types::Application;
use crate::scheduler::queue::ExecutionQueue;
use std::path::Path;
use tracing::info;

/// One application per non-blank line, in file order
pub fn parse_applications(contents: &str) -> Vec<Application> {
    contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(Application::new)
        .collect()
}

/// Read `path` and build a queue of NEW applications
pub async fn load_queue(path: &Path) -> SimResult<ExecutionQueue> {
    let contents = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| SimError::File {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

    let queue = ExecutionQueue::from_applications(parse_applications(&contents))?;
    info!(path = %path.display(), applications = queue.len(), "Workload loaded");
    Ok(queue)
}
