mod engine;
mod task;

pub use engine::{Completion, TaskTimerEngine};
pub use task::{format_clock, Task, TaskId};
