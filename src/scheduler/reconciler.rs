/*!
 * Completion Reconciler
 * Finalizes applications whose process terminated outside their own turn
 */

use super::types::SchedulerResult;
use super::Scheduler;
use crate::core::errors::SchedulerError;
use crate::core::types::Pid;
use crate::process::traits::ProcessControl;
use crate::process::types::{ExitInfo, TerminationEvent};
use tokio::sync::mpsc::error::TryRecvError;
use tracing::{debug, info};

impl<L: ProcessControl> Scheduler<L> {
    /// Match a termination event against the queued applications.
    ///
    /// A match is marked EXITED, charged, reported and spliced out of the
    /// queue wherever it sits. Events for unknown pids are dropped. Returns
    /// whether the event matched.
    pub fn reconcile(&mut self, event: TerminationEvent) -> SchedulerResult<bool> {
        let TerminationEvent { os_pid, exit } = event;
        let Some(mut app) = self.queue.remove_by_pid(os_pid) else {
            debug!(os_pid, "No queued application for terminated process");
            return Ok(false);
        };

        app.finish(exit?)?;
        self.clock.charge_idle(&mut app);
        self.summary.stats.reconciled += 1;
        info!(
            name = app.name(),
            os_pid,
            "Reconciled termination of queued application"
        );
        self.report(&app);
        Ok(true)
    }

    /// Drain termination events that are already pending, without waiting.
    ///
    /// Returns the exit of `current` if its event was among them; every other
    /// event is reconciled. Checked before signalling so that a reaped pid is
    /// not stopped or continued.
    pub(super) fn poll_exit(&mut self, current: Option<Pid>) -> SchedulerResult<Option<ExitInfo>> {
        loop {
            match self.events_rx.try_recv() {
                Ok(event) if Some(event.os_pid) == current => return Ok(Some(event.exit?)),
                Ok(event) => {
                    self.reconcile(event)?;
                }
                Err(TryRecvError::Empty) => return Ok(None),
                Err(TryRecvError::Disconnected) => {
                    return Err(SchedulerError::EventChannelClosed(current.unwrap_or_default()))
                }
            }
        }
    }
}
