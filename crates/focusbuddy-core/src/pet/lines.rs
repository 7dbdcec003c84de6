//! Speech lines and notification copy.

use rand::{Rng, RngCore};

use super::state::PetStatus;

pub const INITIAL_SPEECH: &str = "Complete a task to feed your panda friend!";

pub const REVIVAL_LINE: &str = "A miracle snack! I'm back from the void!";

const POSITIVE_LINES: [&str; 4] = [
    "Yum! {task} was tasty!",
    "Thanks for finishing {task}!",
    "Mmm, productivity snacks taste best.",
    "Chewing on {task} made me giddy!",
];

const FALLBACK_TITLE: &str = "that task";

/// Pick a positive template and fill in the task title.
pub fn positive_line<R: RngCore + ?Sized>(rng: &mut R, task_title: &str) -> String {
    let template = POSITIVE_LINES[rng.gen_range(0..POSITIVE_LINES.len())];
    let title = task_title.trim();
    let title = if title.is_empty() { FALLBACK_TITLE } else { title };
    template.replacen("{task}", title, 1)
}

pub fn hunger_line(status: PetStatus) -> &'static str {
    match status {
        PetStatus::Hurt => "Missing snacks hurts. Please finish something soon!",
        PetStatus::Critical => "I’m fading fast. Another zero might finish me.",
        PetStatus::Dead => "I starved… adopt a new one by refreshing.",
        _ => "Uh oh… timers ran out. I’m getting hungry.",
    }
}

pub fn hunger_title(name: &str, status: PetStatus) -> String {
    if status == PetStatus::Dead {
        format!("{name} has died")
    } else {
        format!("{name} is starving")
    }
}

pub fn revival_title(name: &str) -> String {
    format!("{name} revived")
}
