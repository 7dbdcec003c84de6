//! Task timer engine.
//!
//! Owns the task list and advances every running task by one second per
//! `tick()`. It does not use internal threads: the caller (normally the
//! session runtime) invokes `tick()` on a fixed cadence, and only while
//! [`TaskTimerEngine::has_running_tasks`] is true.
//!
//! ## Task lifecycle
//!
//! ```text
//! Idle <-> Running -> Completed (points fixed)
//!    \________________/
//! ```
//!
//! Completion happens either by `complete_task()` (scored) or by the clock
//! reaching zero during `tick()` (zero points). Both paths go through
//! `Task::finish`, which refuses a second transition.

use chrono::Utc;
use tracing::{debug, info, warn};

use super::task::{Task, TaskId};
use crate::assistant::TaskProposal;
use crate::error::ValidationError;
use crate::events::{Event, FeedEvent};
use crate::scoring::{score_with, ScoringPolicy};

/// A task reaching its terminal state, with the feed event it produced.
#[derive(Debug, Clone)]
pub struct Completion {
    pub task_id: TaskId,
    pub feed: FeedEvent,
    pub timed_out: bool,
}

impl Completion {
    pub fn to_event(&self) -> Event {
        Event::TaskCompleted {
            task_id: self.task_id,
            title: self.feed.task_title.clone(),
            points: self.feed.points,
            timed_out: self.timed_out,
            at: self.feed.awarded_at,
        }
    }
}

#[derive(Debug, Clone)]
pub struct TaskTimerEngine {
    tasks: Vec<Task>,
    next_id: u64,
    policy: ScoringPolicy,
    min_task_seconds: u64,
}

impl Default for TaskTimerEngine {
    fn default() -> Self {
        Self::new(ScoringPolicy::default(), 5)
    }
}

impl TaskTimerEngine {
    pub fn new(policy: ScoringPolicy, min_task_seconds: u64) -> Self {
        Self {
            tasks: Vec::new(),
            next_id: 1,
            policy,
            min_task_seconds: min_task_seconds.max(1),
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn task(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id() == id)
    }

    /// The cadence predicate: some task is counting down.
    pub fn has_running_tasks(&self) -> bool {
        self.tasks.iter().any(Task::counts_down)
    }

    pub fn total_points(&self) -> u32 {
        self.tasks.iter().filter_map(Task::points).sum()
    }

    /// Convert a minute count into allotted seconds.
    pub fn duration_seconds(&self, minutes: f64) -> u64 {
        ((minutes * 60.0).round() as u64).max(self.min_task_seconds)
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Append a new idle task.
    ///
    /// # Errors
    ///
    /// Fails if the title is blank or `minutes` is not a finite number > 0.
    pub fn add_task(&mut self, title: &str, minutes: f64) -> Result<Task, ValidationError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(ValidationError::EmptyTitle);
        }
        if !minutes.is_finite() || minutes <= 0.0 {
            return Err(ValidationError::InvalidDuration { value: minutes });
        }

        let id = TaskId(self.next_id);
        self.next_id += 1;
        let task = Task::new(id, title, self.duration_seconds(minutes));
        info!(task_id = %id, title, duration = task.duration(), "task added");
        self.tasks.push(task.clone());
        Ok(task)
    }

    /// Add every usable proposal; returns the tasks that were created.
    pub fn apply_proposals(&mut self, proposals: &[TaskProposal]) -> Vec<Task> {
        proposals
            .iter()
            .filter_map(|p| match self.add_task(&p.title, p.duration_minutes) {
                Ok(task) => Some(task),
                Err(e) => {
                    warn!(title = %p.title, error = %e, "skipping task proposal");
                    None
                }
            })
            .collect()
    }

    /// Start or pause a task.
    ///
    /// Completed tasks are left alone; a task with no time left is forced
    /// to not running.
    pub fn toggle_timer(&mut self, id: TaskId) -> Result<Option<Event>, ValidationError> {
        let task = self.task_mut(id)?;
        if task.is_completed() {
            return Ok(None);
        }

        let was_running = task.is_running();
        if task.remaining() == 0 {
            task.set_running(false);
        } else {
            task.set_running(!was_running);
        }

        let event = match (was_running, task.is_running()) {
            (false, true) => Some(Event::TimerStarted {
                task_id: id,
                remaining: task.remaining(),
                at: Utc::now(),
            }),
            (true, false) => Some(Event::TimerPaused {
                task_id: id,
                remaining: task.remaining(),
                at: Utc::now(),
            }),
            _ => None,
        };
        debug!(task_id = %id, running = task.is_running(), "timer toggled");
        Ok(event)
    }

    /// Advance all running tasks by one second.
    ///
    /// Tasks whose clock reaches zero complete with the timeout score and
    /// produce one feed event each.
    pub fn tick(&mut self) -> Vec<Completion> {
        let timeout_points = self.policy.timeout_points;
        let mut completions = Vec::new();

        for task in self.tasks.iter_mut().filter(|t| t.counts_down()) {
            if task.count_down() && task.finish(timeout_points) {
                info!(task_id = %task.id(), title = task.title(), "task timed out");
                completions.push(Completion {
                    task_id: task.id(),
                    feed: FeedEvent::new(task.title(), timeout_points),
                    timed_out: true,
                });
            }
        }
        completions
    }

    /// Finish a task early and score it.
    ///
    /// Returns `Ok(None)` when the task is already completed or has no time
    /// left, so repeated presses never produce a second feed event.
    pub fn complete_task(&mut self, id: TaskId) -> Result<Option<Completion>, ValidationError> {
        let policy = self.policy;
        let task = self.task_mut(id)?;
        if task.is_completed() || task.remaining() == 0 {
            return Ok(None);
        }

        let points = score_with(&policy, task.duration(), task.remaining());
        if !task.finish(points) {
            return Ok(None);
        }
        info!(task_id = %id, title = task.title(), points, "task completed");
        Ok(Some(Completion {
            task_id: id,
            feed: FeedEvent::new(task.title(), points),
            timed_out: false,
        }))
    }

    /// Delete a task. Never produces a feed event.
    pub fn remove_task(&mut self, id: TaskId) -> Result<Task, ValidationError> {
        let index = self
            .tasks
            .iter()
            .position(|t| t.id() == id)
            .ok_or(ValidationError::UnknownTask(id))?;
        let task = self.tasks.remove(index);
        info!(task_id = %id, "task removed");
        Ok(task)
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn task_mut(&mut self, id: TaskId) -> Result<&mut Task, ValidationError> {
        self.tasks
            .iter_mut()
            .find(|t| t.id() == id)
            .ok_or(ValidationError::UnknownTask(id))
    }
}
