/*!
 * Execution Queue
 * FIFO of applications waiting for a turn
 */

use super::types::SchedulerResult;
use crate::core::errors::SchedulerError;
use crate::core::types::Pid;
use crate::process::types::Application;
use std::collections::VecDeque;

/// FIFO execution queue
///
/// New entries go to the tail and the scheduler always takes the head. A
/// dequeued application is no longer a member; the scheduler holds it as the
/// current process until it requeues or discards it.
#[derive(Debug, Default, Clone)]
pub struct ExecutionQueue {
    entries: VecDeque<Application>,
}

impl ExecutionQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a queue from applications in arrival order
    pub fn from_applications<I>(apps: I) -> SchedulerResult<Self>
    where
        I: IntoIterator<Item = Application>,
    {
        let mut queue = Self::new();
        for app in apps {
            queue.enqueue(app)?;
        }
        Ok(queue)
    }

    /// Append to the tail
    pub fn enqueue(&mut self, app: Application) -> SchedulerResult<()> {
        self.entries.try_reserve(1)?;
        self.entries.push_back(app);
        Ok(())
    }

    /// Remove and return the head
    pub fn dequeue_head(&mut self) -> SchedulerResult<Application> {
        self.entries.pop_front().ok_or(SchedulerError::EmptyQueue)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Splice out the application bound to `os_pid`, wherever it sits
    pub fn remove_by_pid(&mut self, os_pid: Pid) -> Option<Application> {
        let pos = self
            .entries
            .iter()
            .position(|app| app.os_pid() == Some(os_pid))?;
        self.entries.remove(pos)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Application> {
        self.entries.iter()
    }

    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(Application::name).collect()
    }
}

impl<'a> IntoIterator for &'a ExecutionQueue {
    type Item = &'a Application;
    type IntoIter = std::collections::vec_deque::Iter<'a, Application>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
