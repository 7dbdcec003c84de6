//! Completion scoring.
//!
//! A task is worth more when it is finished early. The score is a pure
//! function of `duration` and `remaining` at the instant of completion.

use serde::{Deserialize, Serialize};

use crate::timer::Task;

/// Point thresholds used by [`score_with`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoringPolicy {
    /// Finishing while less than this fraction of the time is used earns `fast_points`.
    pub fast_finish_ratio: f64,
    pub fast_points: u32,
    pub finish_points: u32,
    /// Awarded when the timer ran out.
    pub timeout_points: u32,
}

impl Default for ScoringPolicy {
    fn default() -> Self {
        Self {
            fast_finish_ratio: 0.7,
            fast_points: 3,
            finish_points: 2,
            timeout_points: 0,
        }
    }
}

/// Score a task with the default policy: 0, 2 or 3 points.
pub fn score(task: &Task) -> u32 {
    score_with(&ScoringPolicy::default(), task.duration(), task.remaining())
}

/// Score a `(duration, remaining)` pair in seconds.
pub fn score_with(policy: &ScoringPolicy, duration: u64, remaining: u64) -> u32 {
    if remaining == 0 || duration == 0 {
        return policy.timeout_points;
    }
    let used = duration.saturating_sub(remaining) as f64;
    let percent_used = used / duration as f64;
    if percent_used < policy.fast_finish_ratio {
        policy.fast_points
    } else {
        policy.finish_points
    }
}
