/*!
 * Scheduler Clock
 * Charges wall time to applications
 */

use super::types::TimeAnchor;
use crate::process::types::Application;
use std::time::Duration;
use tokio::time::Instant;

/// Start timestamp of a run plus the accounting rule
#[derive(Debug, Clone, Copy)]
pub struct Clock {
    start: Instant,
    anchor: TimeAnchor,
}

impl Clock {
    /// Record the start timestamp
    pub fn start(anchor: TimeAnchor) -> Self {
        Self {
            start: Instant::now(),
            anchor,
        }
    }

    pub fn anchor(&self) -> TimeAnchor {
        self.anchor
    }

    /// Wall time since the run started
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// Charge a turn that began at `dispatched_at` and is ending now
    pub fn charge_turn(&self, app: &mut Application, dispatched_at: Instant) {
        match self.anchor {
            TimeAnchor::Scheduler => app.record_elapsed(self.elapsed()),
            TimeAnchor::Process => app.add_span(dispatched_at.elapsed()),
        }
    }

    /// Charge an application that terminated while waiting in the queue
    pub fn charge_idle(&self, app: &mut Application) {
        if self.anchor == TimeAnchor::Scheduler {
            app.record_elapsed(self.elapsed());
        }
    }
}
