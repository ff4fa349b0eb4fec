/*!
 * Round-Robin Scheduling
 * Fixed-quantum time slicing with SIGSTOP/SIGCONT preemption
 */

use super::types::SchedulerResult;
use super::Scheduler;
use crate::process::traits::ProcessControl;
use std::time::Duration;
use tracing::debug;

impl<L: ProcessControl> Scheduler<L> {
    /// Each turn runs the head for at most one quantum. An application that
    /// is still alive afterwards is suspended and goes to the tail, and the
    /// next head gets the CPU.
    pub(super) async fn run_round_robin(&mut self, quantum: Duration) -> SchedulerResult<()> {
        while !self.queue.is_empty() {
            // Finalize queued applications that already exited before
            // resuming anything
            self.poll_exit(None)?;
            if self.queue.is_empty() {
                break;
            }

            let mut app = self.queue.dequeue_head()?;
            let os_pid = self.dispatch(&mut app)?;

            let exit = match self.wait_for_quantum(os_pid, quantum).await? {
                Some(exit) => Some(exit),
                None => self.poll_exit(Some(os_pid))?,
            };
            match exit {
                Some(exit) => self.complete(app, exit)?,
                None => {
                    self.preempt(&mut app, os_pid)?;
                    self.queue.enqueue(app)?;
                    self.current = None;
                    debug!(os_pid, waiting = self.queue.len(), "Application requeued");
                }
            }
        }
        Ok(())
    }

    /// One quantum, then suspend and resume, then block until exit before
    /// the next head is taken. Arrival order is preserved.
    pub(super) async fn run_sequential_round_robin(
        &mut self,
        quantum: Duration,
    ) -> SchedulerResult<()> {
        while !self.queue.is_empty() {
            let mut app = self.queue.dequeue_head()?;
            let os_pid = self.dispatch(&mut app)?;

            let exit = match self.wait_for_quantum(os_pid, quantum).await? {
                Some(exit) => Some(exit),
                None => self.poll_exit(Some(os_pid))?,
            };
            if let Some(exit) = exit {
                self.complete(app, exit)?;
                continue;
            }

            self.preempt(&mut app, os_pid)?;
            self.dispatch(&mut app)?;
            let exit = self.wait_for_exit(os_pid).await?;
            self.complete(app, exit)?;
        }
        Ok(())
    }
}
