/*!
 * FCFS Scheduling
 * Runs each application to completion in arrival order
 */

use super::types::SchedulerResult;
use super::Scheduler;
use crate::process::traits::ProcessControl;

impl<L: ProcessControl> Scheduler<L> {
    pub(super) async fn run_fcfs(&mut self) -> SchedulerResult<()> {
        while !self.queue.is_empty() {
            let mut app = self.queue.dequeue_head()?;
            let os_pid = self.dispatch(&mut app)?;
            let exit = self.wait_for_exit(os_pid).await?;
            self.complete(app, exit)?;
        }
        Ok(())
    }
}
