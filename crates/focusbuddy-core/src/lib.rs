//! # FocusBuddy Core Library
//!
//! Core logic for a focus timer with a virtual pet. Finishing a task feeds
//! the pet; letting a timer run out starves it. All behavior lives here so
//! the CLI (or any other front end) stays a thin layer over the same state
//! machines.
//!
//! ## Architecture
//!
//! - **Timer Engine**: task list with per-task countdowns, advanced one
//!   second per `tick()` by the caller
//! - **Scoring**: maps a finished task to the points that feed the pet
//! - **Pet**: the pet's status machine plus the speech and notification
//!   effects each transition requests
//! - **Mood**: the single `happy`/`curious`/`sad` mood shown for the session
//! - **Assistant**: the hosted service that plans tasks, checks in and
//!   draws sprites, behind a trait
//! - **Runtime**: an async loop that owns a [`Session`] and drives its ticks
//!
//! ## Key Components
//!
//! - [`TaskTimerEngine`]: task list and countdown state machine
//! - [`PetMoodEngine`]: reaction to each feed event
//! - [`Session`]: both engines plus pending effects, one transaction per call
//! - [`SessionRuntime`]: tick cadence, speech expiry and assistant calls
//! - [`Config`]: application configuration management

pub mod assistant;
pub mod error;
pub mod events;
pub mod mood;
pub mod pet;
pub mod runtime;
pub mod scoring;
pub mod session;
pub mod storage;
pub mod timer;

pub use assistant::{Assistant, DisabledAssistant, RemoteAssistant};
pub use error::{AssistantError, ConfigError, CoreError, ValidationError};
pub use events::{Event, FeedEvent};
pub use mood::Mood;
pub use pet::{NoopNotifier, Notifier, PetMoodEngine, PetStatus};
pub use runtime::{Command, SessionHandle, SessionRuntime};
pub use scoring::{score, score_with, ScoringPolicy};
pub use session::Session;
pub use storage::Config;
pub use timer::{Task, TaskId, TaskTimerEngine};
