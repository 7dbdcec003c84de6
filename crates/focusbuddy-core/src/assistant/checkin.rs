use serde::{Deserialize, Serialize};

use super::Assistant;
use crate::error::AssistantError;
use crate::timer::Task;

const DEFAULT_FEELING: &str = "The bear is quietly observing.";
const DEFAULT_NOTE: &str = "I'm here when you're ready to start a timer!";

/// What the assistant is allowed to see of a task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskSnapshot {
    pub title: String,
    pub is_running: bool,
    pub is_completed: bool,
    pub duration: u64,
    pub remaining: u64,
}

impl From<&Task> for TaskSnapshot {
    fn from(task: &Task) -> Self {
        Self {
            title: task.title().to_string(),
            is_running: task.is_running(),
            is_completed: task.is_completed(),
            duration: task.duration(),
            remaining: task.remaining(),
        }
    }
}

/// The first `max` tasks, in list order.
pub fn snapshot_tasks(tasks: &[Task], max: usize) -> Vec<TaskSnapshot> {
    tasks.iter().take(max).map(TaskSnapshot::from).collect()
}

/// Untrusted reply from the status endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckInReply {
    #[serde(default)]
    pub feeling_summary: Option<String>,
    #[serde(default)]
    pub buddy_note: Option<String>,
}

/// Normalized status line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckIn {
    pub feeling_summary: String,
    pub buddy_note: String,
}

impl Default for CheckIn {
    fn default() -> Self {
        Self {
            feeling_summary: DEFAULT_FEELING.to_string(),
            buddy_note: DEFAULT_NOTE.to_string(),
        }
    }
}

impl From<CheckInReply> for CheckIn {
    fn from(reply: CheckInReply) -> Self {
        let pick = |value: Option<String>, fallback: &str| {
            value
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| fallback.to_string())
        };
        Self {
            feeling_summary: pick(reply.feeling_summary, DEFAULT_FEELING),
            buddy_note: pick(reply.buddy_note, DEFAULT_NOTE),
        }
    }
}

/// Ask for a short status line about the first `max_tasks` tasks.
///
/// Blank or missing fields are replaced with friendly defaults; only
/// transport failures are errors.
pub async fn check_in_status(
    assistant: &dyn Assistant,
    tasks: &[Task],
    max_tasks: usize,
) -> Result<CheckIn, AssistantError> {
    let snapshot = snapshot_tasks(tasks, max_tasks);
    let reply = assistant.check_in(&snapshot).await?;
    Ok(CheckIn::from(reply))
}
