use std::fmt;

use serde::{Deserialize, Serialize};

use crate::events::FeedEvent;

/// Health/mood status of the companion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PetStatus {
    Idle,
    Content,
    Ecstatic,
    Hungry,
    Hurt,
    Critical,
    Dead,
}

impl PetStatus {
    /// Short user-facing label.
    pub fn label(&self) -> &'static str {
        match self {
            PetStatus::Idle => "Waiting for snacks",
            PetStatus::Content => "Well fed",
            PetStatus::Ecstatic => "Euphoric",
            PetStatus::Hungry => "Hungry",
            PetStatus::Hurt => "Hurt",
            PetStatus::Critical => "Critical",
            PetStatus::Dead => "RIP",
        }
    }

    /// Status reached after `strikes` consecutive misses.
    pub fn from_hunger(strikes: u8, max_strikes: u8) -> Self {
        if strikes >= max_strikes {
            PetStatus::Dead
        } else if strikes + 1 == max_strikes {
            PetStatus::Critical
        } else if strikes + 2 == max_strikes {
            PetStatus::Hurt
        } else {
            PetStatus::Hungry
        }
    }
}

impl fmt::Display for PetStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PetStatus::Idle => "idle",
            PetStatus::Content => "content",
            PetStatus::Ecstatic => "ecstatic",
            PetStatus::Hungry => "hungry",
            PetStatus::Hurt => "hurt",
            PetStatus::Critical => "critical",
            PetStatus::Dead => "dead",
        };
        f.write_str(s)
    }
}

/// Policy constants of the pet state machine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PetPolicy {
    pub name: String,
    pub initial_happiness: u8,
    pub max_hunger_strikes: u8,
    pub history_limit: usize,
    pub hunger_penalty: u8,
    pub points_multiplier: u8,
    pub positive_speech_ms: u64,
    pub hunger_speech_ms: u64,
    pub death_speech_ms: u64,
    pub revival_speech_ms: u64,
}

impl Default for PetPolicy {
    fn default() -> Self {
        Self {
            name: "Buddy".into(),
            initial_happiness: 55,
            max_hunger_strikes: 4,
            history_limit: 5,
            hunger_penalty: 25,
            points_multiplier: 9,
            positive_speech_ms: 5000,
            hunger_speech_ms: 6500,
            death_speech_ms: 8000,
            revival_speech_ms: 7000,
        }
    }
}

/// The pet's durable (per-session) state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PetState {
    pub status: PetStatus,
    pub hunger_strikes: u8,
    pub happiness: u8,
    /// Most recent first.
    pub history: Vec<FeedEvent>,
    pub total_fed: u32,
}

impl PetState {
    pub fn new(initial_happiness: u8) -> Self {
        Self {
            status: PetStatus::Idle,
            hunger_strikes: 0,
            happiness: initial_happiness.min(100),
            history: Vec::new(),
            total_fed: 0,
        }
    }
}

/// Read-only view of the pet for rendering.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PetSnapshot {
    pub name: String,
    pub status: PetStatus,
    pub label: String,
    pub happiness: u8,
    pub hunger_strikes: u8,
    pub history: Vec<FeedEvent>,
    pub total_fed: u32,
    pub speech: Option<String>,
}
