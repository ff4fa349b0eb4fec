/*!
 * Scheduler
 * Runs an execution queue of applications under FCFS or Round-Robin
 *
 * The scheduler context owns the queue, the current-process cursor and the
 * receiving end of the termination channel. Exit watchers never touch the
 * queue; they only send events, which are reconciled on the scheduler's own
 * task while it waits.
 */

use crate::core::errors::{ProcessError, SchedulerError};
use crate::core::types::Pid;
use crate::process::traits::ProcessControl;
use crate::process::types::{Application, ExitInfo, ProcessStatus, TerminationEvent};
use crate::report::Reporter;
use std::time::Duration;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::time::{timeout_at, Instant};
use tracing::{debug, info, warn};

mod clock;
mod fcfs;
pub mod queue;
mod reconciler;
mod round_robin;
pub mod types;

pub use clock::Clock;
pub use queue::ExecutionQueue;
pub use types::{
    Completion, RoundRobinMode, ScheduleSummary, SchedulerResult, SchedulerStats,
    SchedulingPolicy, TimeAnchor,
};

/// Scheduler context for one run
pub struct Scheduler<L: ProcessControl> {
    queue: ExecutionQueue,
    launcher: L,
    // Pid of the application currently dispatched, if any
    current: Option<Pid>,
    dispatched_at: Instant,
    events_tx: UnboundedSender<TerminationEvent>,
    events_rx: UnboundedReceiver<TerminationEvent>,
    clock: Clock,
    reporter: Option<Box<dyn Reporter>>,
    summary: ScheduleSummary,
}

impl<L: ProcessControl> Scheduler<L> {
    pub fn new(queue: ExecutionQueue, launcher: L) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        Self {
            queue,
            launcher,
            current: None,
            dispatched_at: Instant::now(),
            events_tx,
            events_rx,
            clock: Clock::start(TimeAnchor::default()),
            reporter: None,
            summary: ScheduleSummary::default(),
        }
    }

    /// Send every completion to `reporter` as it happens
    pub fn with_reporter(mut self, reporter: Box<dyn Reporter>) -> Self {
        self.reporter = Some(reporter);
        self
    }

    pub fn with_time_anchor(mut self, anchor: TimeAnchor) -> Self {
        self.clock = Clock::start(anchor);
        self
    }

    pub fn queue(&self) -> &ExecutionQueue {
        &self.queue
    }

    pub fn stats(&self) -> SchedulerStats {
        self.summary.stats
    }

    /// Drain the queue under `policy`
    pub async fn run(mut self, policy: SchedulingPolicy) -> SchedulerResult<ScheduleSummary> {
        self.clock = Clock::start(self.clock.anchor());
        info!(
            %policy,
            applications = self.queue.len(),
            anchor = self.clock.anchor().as_str(),
            "Scheduler starting"
        );

        let outcome = match policy {
            SchedulingPolicy::Fcfs => self.run_fcfs().await,
            SchedulingPolicy::RoundRobin {
                quantum,
                mode: RoundRobinMode::Interleaved,
            } => self.run_round_robin(quantum).await,
            SchedulingPolicy::RoundRobin {
                quantum,
                mode: RoundRobinMode::Sequential,
            } => self.run_sequential_round_robin(quantum).await,
        };
        if let Err(e) = outcome {
            self.abort(&e);
            return Err(e);
        }

        self.summary.elapsed = self.clock.elapsed();
        info!(
            completed = self.summary.completions.len(),
            elapsed = ?self.summary.elapsed,
            "Scheduler finished"
        );
        Ok(self.summary)
    }

    /// Make `app` current and let it run: launch if NEW, resume if STOPPED
    fn dispatch(&mut self, app: &mut Application) -> SchedulerResult<Pid> {
        let os_pid = match (app.status(), app.os_pid()) {
            (ProcessStatus::Stopped, Some(os_pid)) => {
                app.resume()?;
                self.launcher.resume(os_pid);
                self.summary.stats.resumes += 1;
                debug!(name = app.name(), os_pid, turn = app.turns(), "Resumed application");
                os_pid
            }
            (ProcessStatus::New, _) => {
                let os_pid = self.launcher.launch(app.name(), &self.events_tx)?;
                app.start(os_pid)?;
                self.summary.stats.launches += 1;
                info!(name = app.name(), os_pid, "Launched application");
                os_pid
            }
            (from, _) => {
                return Err(ProcessError::InvalidStateTransition {
                    name: app.name().to_string(),
                    from,
                    to: ProcessStatus::Running,
                }
                .into());
            }
        };

        self.current = Some(os_pid);
        self.dispatched_at = Instant::now();
        Ok(os_pid)
    }

    /// Kill every application that was launched but not finalized
    ///
    /// Stopped children would otherwise outlive the run and hold on to the
    /// inherited stdout.
    fn abort(&mut self, cause: &SchedulerError) {
        let queue = std::mem::take(&mut self.queue);
        let launched: Vec<Pid> = self
            .current
            .take()
            .into_iter()
            .chain(queue.iter().filter_map(Application::os_pid))
            .collect();

        warn!(error = %cause, launched = launched.len(), abandoned = queue.len(), "Run aborted");
        for os_pid in launched {
            self.launcher.terminate(os_pid);
        }
    }

    /// Suspend the current application at the end of its quantum
    fn preempt(&mut self, app: &mut Application, os_pid: Pid) -> SchedulerResult<()> {
        // A failed SIGSTOP means the process already exited; its termination
        // event is still in flight and gets reconciled later.
        self.launcher.suspend(os_pid);
        app.suspend()?;
        self.clock.charge_turn(app, self.dispatched_at);
        self.summary.stats.preemptions += 1;
        debug!(
            name = app.name(),
            os_pid,
            accumulated = ?app.accumulated(),
            "Quantum expired, application suspended"
        );
        Ok(())
    }

    /// Finalize the current application after its exit
    fn complete(&mut self, mut app: Application, exit: ExitInfo) -> SchedulerResult<()> {
        self.clock.charge_turn(&mut app, self.dispatched_at);
        app.finish(exit)?;
        self.current = None;
        self.report(&app);
        Ok(())
    }

    /// Block until `os_pid` exits
    async fn wait_for_exit(&mut self, os_pid: Pid) -> SchedulerResult<ExitInfo> {
        loop {
            let event = self
                .events_rx
                .recv()
                .await
                .ok_or(SchedulerError::EventChannelClosed(os_pid))?;
            if event.os_pid == os_pid {
                return Ok(event.exit?);
            }
            self.reconcile(event)?;
        }
    }

    /// Wait for `os_pid` to exit until its quantum runs out
    ///
    /// Returns `None` when the quantum expired first. A quantum too large to
    /// form a deadline never expires.
    async fn wait_for_quantum(
        &mut self,
        os_pid: Pid,
        quantum: Duration,
    ) -> SchedulerResult<Option<ExitInfo>> {
        let Some(deadline) = self.dispatched_at.checked_add(quantum) else {
            return self.wait_for_exit(os_pid).await.map(Some);
        };
        loop {
            let received = match timeout_at(deadline, self.events_rx.recv()).await {
                Ok(received) => received,
                Err(_) => return Ok(None),
            };
            let event = received.ok_or(SchedulerError::EventChannelClosed(os_pid))?;
            if event.os_pid == os_pid {
                return Ok(Some(event.exit?));
            }
            self.reconcile(event)?;
        }
    }

    fn report(&mut self, app: &Application) {
        let completion = Completion::from(app);
        info!(
            name = %completion.name,
            execution_time = ?completion.execution_time,
            turns = completion.turns,
            "Application completed"
        );
        if let Some(reporter) = self.reporter.as_mut() {
            reporter.report(&completion);
        }
        self.summary.completions.push(completion);
    }
}
