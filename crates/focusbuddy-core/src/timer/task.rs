use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque task identifier, assigned in creation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(pub u64);

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One timed unit of work.
///
/// Fields are private so that the running/completed invariants can only be
/// changed through the engine:
/// - running implies not completed and `remaining > 0`
/// - `remaining` never increases
/// - completion is one-way and freezes `remaining` and `points`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    id: TaskId,
    title: String,
    duration: u64,
    remaining: u64,
    is_running: bool,
    is_completed: bool,
    points: Option<u32>,
}

impl Task {
    pub(crate) fn new(id: TaskId, title: impl Into<String>, duration: u64) -> Self {
        Self {
            id,
            title: title.into(),
            duration,
            remaining: duration,
            is_running: false,
            is_completed: false,
            points: None,
        }
    }

    pub fn id(&self) -> TaskId {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Total allotted seconds.
    pub fn duration(&self) -> u64 {
        self.duration
    }

    /// Seconds left on the clock.
    pub fn remaining(&self) -> u64 {
        self.remaining
    }

    pub fn is_running(&self) -> bool {
        self.is_running
    }

    pub fn is_completed(&self) -> bool {
        self.is_completed
    }

    /// `None` while the task is active.
    pub fn points(&self) -> Option<u32> {
        self.points
    }

    /// Whether the tick should count this task down.
    pub fn counts_down(&self) -> bool {
        self.is_running && !self.is_completed && self.remaining > 0
    }

    /// Percentage of the allotted time used, capped at 100.
    pub fn progress_pct(&self) -> u8 {
        if self.is_completed && self.points == Some(0) {
            return 100;
        }
        if self.duration == 0 {
            return 0;
        }
        let used = self.duration.saturating_sub(self.remaining);
        ((used as f64 / self.duration as f64) * 100.0).round().min(100.0) as u8
    }

    pub(crate) fn set_running(&mut self, running: bool) {
        self.is_running = running && !self.is_completed && self.remaining > 0;
    }

    /// Count down one second. Returns true when the clock hit zero.
    pub(crate) fn count_down(&mut self) -> bool {
        self.remaining = self.remaining.saturating_sub(1);
        self.remaining == 0
    }

    /// Terminal transition. Returns false if the task was already completed.
    pub(crate) fn finish(&mut self, points: u32) -> bool {
        if self.is_completed {
            return false;
        }
        self.is_running = false;
        self.is_completed = true;
        self.points = Some(points);
        true
    }
}

/// Render seconds as `MM:SS`.
pub fn format_clock(total_seconds: u64) -> String {
    format!("{:02}:{:02}", total_seconds / 60, total_seconds % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_task_is_idle_and_full() {
        let task = Task::new(TaskId(7), "Read", 300);
        assert_eq!(task.remaining(), 300);
        assert!(!task.is_running());
        assert!(!task.is_completed());
        assert_eq!(task.points(), None);
        assert_eq!(task.progress_pct(), 0);
    }

    #[test]
    fn finish_is_one_way() {
        let mut task = Task::new(TaskId(1), "Read", 10);
        task.set_running(true);
        assert!(task.finish(3));
        assert!(!task.is_running());
        assert!(!task.finish(0));
        assert_eq!(task.points(), Some(3));
    }

    #[test]
    fn completed_task_cannot_run() {
        let mut task = Task::new(TaskId(1), "Read", 10);
        task.finish(2);
        task.set_running(true);
        assert!(!task.is_running());
    }

    #[test]
    fn format_clock_pads() {
        assert_eq!(format_clock(0), "00:00");
        assert_eq!(format_clock(65), "01:05");
        assert_eq!(format_clock(1500), "25:00");
    }

    #[test]
    fn serializes_with_camel_case_fields() {
        let task = Task::new(TaskId(3), "Read", 60);
        let json = serde_json::to_value(&task).unwrap();
        assert_eq!(json["id"], 3);
        assert_eq!(json["isRunning"], false);
        assert!(json["points"].is_null());
    }
}
