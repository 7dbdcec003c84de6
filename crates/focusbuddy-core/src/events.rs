use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::mood::Mood;
use crate::pet::{PetSnapshot, PetStatus};
use crate::timer::{Task, TaskId};

/// Message from the timer engine to the pet engine.
///
/// Emitted exactly once per task completion, including timeouts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedEvent {
    pub event_id: Uuid,
    pub task_title: String,
    pub points: u32,
    pub awarded_at: DateTime<Utc>,
}

impl FeedEvent {
    pub fn new(task_title: impl Into<String>, points: u32) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            task_title: task_title.into(),
            points,
            awarded_at: Utc::now(),
        }
    }

    pub fn is_reward(&self) -> bool {
        self.points > 0
    }
}

/// Every state change in a session produces an Event.
/// The view renders them; nothing reads them back into the engines.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    TaskAdded {
        task: Task,
        at: DateTime<Utc>,
    },
    TimerStarted {
        task_id: TaskId,
        remaining: u64,
        at: DateTime<Utc>,
    },
    TimerPaused {
        task_id: TaskId,
        remaining: u64,
        at: DateTime<Utc>,
    },
    TaskCompleted {
        task_id: TaskId,
        title: String,
        points: u32,
        /// True when the clock ran out rather than the user finishing.
        timed_out: bool,
        at: DateTime<Utc>,
    },
    TaskRemoved {
        task_id: TaskId,
        at: DateTime<Utc>,
    },
    PetFed {
        feed: FeedEvent,
        previous_status: PetStatus,
        status: PetStatus,
        happiness: u8,
        hunger_strikes: u8,
        revived: bool,
    },
    SpeechChanged {
        text: Option<String>,
        at: DateTime<Utc>,
    },
    NotificationSent {
        title: String,
        body: String,
        at: DateTime<Utc>,
    },
    /// The one-second cadence began (some task is running).
    TickScheduled {
        at: DateTime<Utc>,
    },
    /// The cadence stopped (no task is running).
    TickStopped {
        at: DateTime<Utc>,
    },
    ProposalsApplied {
        titles: Vec<String>,
        at: DateTime<Utc>,
    },
    CheckIn {
        feeling_summary: String,
        buddy_note: String,
        mood: Mood,
        at: DateTime<Utc>,
    },
    /// A collaborator call failed; engine state is untouched.
    AssistantFailed {
        operation: String,
        message: String,
        at: DateTime<Utc>,
    },
    StateSnapshot {
        tasks: Vec<Task>,
        pet: PetSnapshot,
        total_points: u32,
        mood: Mood,
        at: DateTime<Utc>,
    },
}
