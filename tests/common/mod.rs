/*!
 * Shared test helpers
 * A scripted launcher whose "processes" are tokio tasks burning virtual time
 */

#![allow(dead_code)]

use proc_scheduler::process::ProcessResult;
use proc_scheduler::{
    Completion, ExitInfo, Pid, ProcessControl, ProcessError, Reporter, TerminationEvent,
};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::mpsc::UnboundedSender;
use tokio::sync::watch;
use tokio::time::Instant;

/// Control operations observed by the launcher, in order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Op {
    Launch(String),
    Suspend(String),
    Resume(String),
    Terminate(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum JobState {
    Running,
    Stopped,
    Killed,
}

struct Job {
    name: String,
    control: watch::Sender<JobState>,
}

#[derive(Default)]
struct Inner {
    work: HashMap<String, Duration>,
    failing: HashSet<String>,
    exit_delays: HashMap<String, Duration>,
    lost: HashSet<String>,
    next_pid: AtomicU32,
    jobs: Mutex<HashMap<Pid, Job>>,
    ops: Mutex<Vec<Op>>,
}

/// Launcher double: each program needs a fixed amount of running time and
/// makes progress only while not suspended
#[derive(Clone, Default)]
pub struct ScriptedLauncher {
    inner: Arc<Inner>,
}

impl ScriptedLauncher {
    pub fn new(work: &[(&str, u64)]) -> Self {
        Self::with_failing(work, &[])
    }

    /// `failing` programs cannot be executed
    pub fn with_failing(work: &[(&str, u64)], failing: &[&str]) -> Self {
        Self {
            inner: Arc::new(Inner {
                work: work
                    .iter()
                    .map(|(name, ms)| (name.to_string(), Duration::from_millis(*ms)))
                    .collect(),
                failing: failing.iter().map(|name| name.to_string()).collect(),
                next_pid: AtomicU32::new(1000),
                ..Inner::default()
            }),
        }
    }

    /// `name` finishes its work but its exit is only reported `ms` later,
    /// so signals sent in between fail
    pub fn with_exit_delay(mut self, name: &str, ms: u64) -> Self {
        self.inner_mut()
            .exit_delays
            .insert(name.to_string(), Duration::from_millis(ms));
        self
    }

    /// The exit status of `name` cannot be collected
    pub fn with_lost_exit(mut self, name: &str) -> Self {
        self.inner_mut().lost.insert(name.to_string());
        self
    }

    fn inner_mut(&mut self) -> &mut Inner {
        Arc::get_mut(&mut self.inner).expect("configure the launcher before cloning it")
    }

    /// Programs whose last control state is stopped
    pub fn stopped_jobs(&self) -> Vec<String> {
        let jobs = self.inner.jobs.lock().unwrap();
        let mut names: Vec<String> = jobs
            .values()
            .filter(|job| *job.control.borrow() == JobState::Stopped)
            .map(|job| job.name.clone())
            .collect();
        names.sort();
        names
    }

    pub fn ops(&self) -> Vec<Op> {
        self.inner.ops.lock().unwrap().clone()
    }

    /// Terminate `name` from outside the scheduler (like SIGKILL)
    pub fn kill(&self, name: &str) -> bool {
        let jobs = self.inner.jobs.lock().unwrap();
        jobs.values()
            .find(|job| job.name == name)
            .map(|job| job.control.send(JobState::Killed).is_ok())
            .unwrap_or(false)
    }

    fn record(&self, op: Op) {
        self.inner.ops.lock().unwrap().push(op);
    }

    fn signal(&self, os_pid: Pid, state: JobState) -> bool {
        let jobs = self.inner.jobs.lock().unwrap();
        let Some(job) = jobs.get(&os_pid) else {
            return false;
        };
        let op = match state {
            JobState::Stopped => Op::Suspend(job.name.clone()),
            JobState::Running => Op::Resume(job.name.clone()),
            JobState::Killed => Op::Terminate(job.name.clone()),
        };
        // Fails once the job finished and dropped its receiver
        let delivered = job.control.send(state).is_ok();
        drop(jobs);
        self.record(op);
        delivered
    }
}

impl ProcessControl for ScriptedLauncher {
    fn launch(&self, name: &str, events: &UnboundedSender<TerminationEvent>) -> ProcessResult<Pid> {
        if self.inner.failing.contains(name) {
            return Err(ProcessError::ExecFailure {
                name: name.to_string(),
                reason: "No such file or directory".to_string(),
            });
        }

        let os_pid = self.inner.next_pid.fetch_add(1, Ordering::SeqCst);
        let plan = JobPlan {
            name: name.to_string(),
            work: self.inner.work.get(name).copied().unwrap_or_default(),
            exit_delay: self.inner.exit_delays.get(name).copied(),
            lost: self.inner.lost.contains(name),
        };
        let (control, state) = watch::channel(JobState::Running);

        self.inner.jobs.lock().unwrap().insert(
            os_pid,
            Job {
                name: name.to_string(),
                control,
            },
        );
        self.record(Op::Launch(name.to_string()));

        tokio::spawn(run_job(os_pid, plan, state, events.clone()));
        Ok(os_pid)
    }

    fn suspend(&self, os_pid: Pid) -> bool {
        self.signal(os_pid, JobState::Stopped)
    }

    fn resume(&self, os_pid: Pid) -> bool {
        self.signal(os_pid, JobState::Running)
    }

    fn terminate(&self, os_pid: Pid) -> bool {
        self.signal(os_pid, JobState::Killed)
    }
}

struct JobPlan {
    name: String,
    work: Duration,
    exit_delay: Option<Duration>,
    lost: bool,
}

fn killed() -> ExitInfo {
    ExitInfo {
        code: None,
        signal: Some(9),
    }
}

async fn run_job(
    os_pid: Pid,
    plan: JobPlan,
    mut state: watch::Receiver<JobState>,
    events: UnboundedSender<TerminationEvent>,
) {
    let mut remaining = plan.work;
    loop {
        // Parked while stopped
        loop {
            match *state.borrow_and_update() {
                JobState::Running => break,
                JobState::Killed => {
                    let _ = events.send(TerminationEvent::exited(os_pid, killed()));
                    return;
                }
                JobState::Stopped => {}
            }
            if state.changed().await.is_err() {
                return;
            }
        }

        let started = Instant::now();
        tokio::select! {
            _ = tokio::time::sleep(remaining) => break,
            changed = state.changed() => {
                if changed.is_err() {
                    return;
                }
                remaining = remaining.saturating_sub(started.elapsed());
                if *state.borrow() == JobState::Killed {
                    let _ = events.send(TerminationEvent::exited(os_pid, killed()));
                    return;
                }
            }
        }
    }

    // The process is gone: signals fail from here on
    drop(state);
    if let Some(delay) = plan.exit_delay {
        tokio::time::sleep(delay).await;
    }

    let exit = if plan.lost {
        Err(ProcessError::WaitFailure {
            name: plan.name,
            os_pid,
            reason: "No child processes".to_string(),
        })
    } else {
        Ok(ExitInfo::with_code(0))
    };
    let _ = events.send(TerminationEvent { os_pid, exit });
}

/// Reporter that keeps every completion for inspection
#[derive(Clone, Default)]
pub struct CollectingReporter {
    pub completions: Arc<Mutex<Vec<Completion>>>,
}

impl CollectingReporter {
    pub fn names(&self) -> Vec<String> {
        self.completions
            .lock()
            .unwrap()
            .iter()
            .map(|c| c.name.clone())
            .collect()
    }
}

impl Reporter for CollectingReporter {
    fn report(&mut self, completion: &Completion) {
        self.completions.lock().unwrap().push(completion.clone());
    }
}

/// Assert `actual` lies within a small tolerance above `expected_ms`
pub fn assert_near(actual: Duration, expected_ms: u64) {
    let expected = Duration::from_millis(expected_ms);
    assert!(
        actual >= expected && actual < expected + Duration::from_millis(20),
        "expected ~{:?}, got {:?}",
        expected,
        actual
    );
}
