//! Display mood classification.
//!
//! The mood only picks which sprite to show. It is derived on demand and
//! never written back into task or pet state.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::timer::Task;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mood {
    Happy,
    Curious,
    Sad,
}

impl Mood {
    pub const ALL: [Mood; 3] = [Mood::Happy, Mood::Curious, Mood::Sad];

    pub fn as_str(&self) -> &'static str {
        match self {
            Mood::Happy => "happy",
            Mood::Curious => "curious",
            Mood::Sad => "sad",
        }
    }
}

impl fmt::Display for Mood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// Checked in this order; the first group with a hit wins.
const KEYWORDS: [(Mood, &[&str]); 3] = [
    (Mood::Happy, &["happy", "proud", "glow"]),
    (Mood::Sad, &["sad", "tired"]),
    (Mood::Curious, &["curious", "excited"]),
];

/// Mood implied by a free-text feeling summary, if any keyword matches.
pub fn mood_from_feeling(feeling: &str) -> Option<Mood> {
    let feeling = feeling.to_lowercase();
    KEYWORDS
        .iter()
        .find(|(_, words)| words.iter().any(|w| feeling.contains(w)))
        .map(|(mood, _)| *mood)
}

/// Classify the display mood.
///
/// Priority: feeling keywords, then any running task (curious), then any
/// completed task worth at least 2 points (happy), else sad.
pub fn classify(feeling: Option<&str>, tasks: &[Task]) -> Mood {
    if let Some(mood) = feeling.and_then(mood_from_feeling) {
        return mood;
    }
    if tasks.iter().any(Task::is_running) {
        return Mood::Curious;
    }
    if tasks
        .iter()
        .any(|t| t.is_completed() && t.points().unwrap_or(0) >= 2)
    {
        return Mood::Happy;
    }
    Mood::Sad
}
