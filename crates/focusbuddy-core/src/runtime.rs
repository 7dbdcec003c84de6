//! Async driver for a [`Session`].
//!
//! A single task owns the session and serializes every input: commands
//! from [`SessionHandle`], the one-second tick, speech expiry and results
//! of assistant calls. Assistant calls run on their own tasks and re-enter
//! the loop as messages, so a slow request never delays a tick.

use std::future::pending;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use rand::RngCore;
use tokio::sync::{mpsc, oneshot};
use tokio::time::{interval_at, sleep_until, Instant, Interval, MissedTickBehavior, Sleep};
use tracing::{debug, info, warn};

use crate::assistant::{check_in_status, interpret_task_intent, Assistant, CheckIn, TaskProposal};
use crate::error::{AssistantError, CoreError, Result};
use crate::events::Event;
use crate::pet::Notifier;
use crate::session::Session;
use crate::storage::Config;
use crate::timer::TaskId;

const COMMAND_CAPACITY: usize = 32;
/// Each tick takes exactly one second off the running task.
const TICK_EVERY: Duration = Duration::from_secs(1);

/// Inputs accepted by the runtime.
#[derive(Debug, Clone)]
pub enum Command {
    AddTask { title: String, minutes: f64 },
    Toggle(TaskId),
    Complete(TaskId),
    Remove(TaskId),
    /// Ask the assistant to plan tasks from free text.
    Plan(String),
    /// Ask the assistant how the session is going.
    CheckIn,
    Snapshot,
    Shutdown,
}

struct Request {
    command: Command,
    respond: oneshot::Sender<Result<()>>,
}

enum Reply {
    Proposals(std::result::Result<Vec<TaskProposal>, AssistantError>),
    CheckIn(std::result::Result<CheckIn, AssistantError>),
}

#[derive(Debug, Clone, Copy)]
struct Limits {
    max_proposals: usize,
    max_snapshot_tasks: usize,
}

/// Cloneable sender side of a running session.
#[derive(Clone)]
pub struct SessionHandle {
    tx: mpsc::Sender<Request>,
}

impl SessionHandle {
    /// Submit a command and wait until it has been applied.
    ///
    /// Events produced by the command arrive on the event stream. For
    /// `Plan` and `CheckIn` this only confirms that the request was sent.
    pub async fn send(&self, command: Command) -> Result<()> {
        let (respond, rx) = oneshot::channel();
        self.tx
            .send(Request { command, respond })
            .await
            .map_err(|_| CoreError::RuntimeClosed)?;
        rx.await.map_err(|_| CoreError::RuntimeClosed)?
    }

    pub async fn add_task(&self, title: impl Into<String>, minutes: f64) -> Result<()> {
        self.send(Command::AddTask {
            title: title.into(),
            minutes,
        })
        .await
    }

    pub async fn toggle(&self, id: TaskId) -> Result<()> {
        self.send(Command::Toggle(id)).await
    }

    pub async fn complete(&self, id: TaskId) -> Result<()> {
        self.send(Command::Complete(id)).await
    }

    pub async fn remove(&self, id: TaskId) -> Result<()> {
        self.send(Command::Remove(id)).await
    }

    pub async fn plan(&self, prompt: impl Into<String>) -> Result<()> {
        self.send(Command::Plan(prompt.into())).await
    }

    pub async fn check_in(&self) -> Result<()> {
        self.send(Command::CheckIn).await
    }

    pub async fn snapshot(&self) -> Result<()> {
        self.send(Command::Snapshot).await
    }

    pub async fn shutdown(&self) -> Result<()> {
        self.send(Command::Shutdown).await
    }
}

pub struct SessionRuntime<N: Notifier, R: RngCore> {
    session: Session<N, R>,
    assistant: Arc<dyn Assistant>,
    limits: Limits,
    requests: mpsc::Receiver<Request>,
    replies_tx: mpsc::UnboundedSender<Reply>,
    replies: mpsc::UnboundedReceiver<Reply>,
    events: mpsc::UnboundedSender<Event>,
    ticker: Option<Interval>,
    speech: Option<(u64, Pin<Box<Sleep>>)>,
}

impl<N, R> SessionRuntime<N, R>
where
    N: Notifier + 'static,
    R: RngCore + Send + 'static,
{
    /// Wire a session to its command handle and event stream.
    pub fn new(
        session: Session<N, R>,
        assistant: Arc<dyn Assistant>,
        config: &Config,
    ) -> (Self, SessionHandle, mpsc::UnboundedReceiver<Event>) {
        let (tx, requests) = mpsc::channel(COMMAND_CAPACITY);
        let (replies_tx, replies) = mpsc::unbounded_channel();
        let (events, events_rx) = mpsc::unbounded_channel();
        let limits = Limits {
            max_proposals: config.assistant.max_proposals,
            max_snapshot_tasks: config.assistant.max_snapshot_tasks,
        };
        let runtime = Self {
            session,
            assistant,
            limits,
            requests,
            replies_tx,
            replies,
            events,
            ticker: None,
            speech: None,
        };
        (runtime, SessionHandle { tx }, events_rx)
    }

    /// Run until `Shutdown` or until every handle is dropped.
    pub async fn run(mut self) -> Session<N, R> {
        info!("session runtime started");

        loop {
            self.sync_timers();
            tokio::select! {
                request = self.requests.recv() => {
                    let Some(Request { command, respond }) = request else { break };
                    let stop = matches!(command, Command::Shutdown);
                    let outcome = self.handle(command);
                    let _ = respond.send(outcome);
                    if stop {
                        break;
                    }
                }
                Some(reply) = self.replies.recv() => self.handle_reply(reply),
                _ = next_tick(&mut self.ticker) => {
                    let events = self.session.tick(Instant::now().into_std());
                    self.emit(events);
                }
                generation = speech_expiry(&mut self.speech) => {
                    self.speech = None;
                    let events = self.session.expire_speech(generation);
                    self.emit(events);
                }
            }
        }

        info!("session runtime stopped");
        self.session
    }

    fn handle(&mut self, command: Command) -> Result<()> {
        let now = Instant::now().into_std();
        let events = match command {
            Command::AddTask { title, minutes } => self.session.add_task(&title, minutes)?,
            Command::Toggle(id) => self.session.toggle_timer(id)?,
            Command::Complete(id) => self.session.complete_task(id, now)?,
            Command::Remove(id) => self.session.remove_task(id)?,
            Command::Plan(prompt) => {
                self.spawn_plan(prompt);
                Vec::new()
            }
            Command::CheckIn => {
                self.spawn_check_in();
                Vec::new()
            }
            Command::Snapshot => vec![self.session.snapshot()],
            Command::Shutdown => Vec::new(),
        };
        self.emit(events);
        Ok(())
    }

    fn handle_reply(&mut self, reply: Reply) {
        let events = match reply {
            Reply::Proposals(Ok(proposals)) => self.session.apply_proposals(&proposals),
            Reply::Proposals(Err(e)) => vec![failed("plan", &e)],
            Reply::CheckIn(Ok(check_in)) => self.session.record_check_in(check_in),
            Reply::CheckIn(Err(e)) => vec![failed("check_in", &e)],
        };
        self.emit(events);
    }

    fn spawn_plan(&self, prompt: String) {
        let assistant = Arc::clone(&self.assistant);
        let tx = self.replies_tx.clone();
        let max = self.limits.max_proposals;
        debug!("spawning task intent request");
        tokio::spawn(async move {
            let result = interpret_task_intent(assistant.as_ref(), &prompt, max).await;
            let _ = tx.send(Reply::Proposals(result));
        });
    }

    fn spawn_check_in(&self) {
        let assistant = Arc::clone(&self.assistant);
        let tx = self.replies_tx.clone();
        let max = self.limits.max_snapshot_tasks;
        let tasks = self.session.tasks().to_vec();
        debug!(tasks = tasks.len(), "spawning check-in request");
        tokio::spawn(async move {
            let result = check_in_status(assistant.as_ref(), &tasks, max).await;
            let _ = tx.send(Reply::CheckIn(result));
        });
    }

    /// Start or drop the interval and speech sleep to match the session.
    fn sync_timers(&mut self) {
        match (self.session.is_ticking(), self.ticker.is_some()) {
            (true, false) => {
                let every = TICK_EVERY;
                let mut ticker = interval_at(Instant::now() + every, every);
                ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
                self.ticker = Some(ticker);
                debug!(?every, "tick cadence started");
            }
            (false, true) => {
                self.ticker = None;
                debug!("tick cadence stopped");
            }
            _ => {}
        }

        let wanted = self.session.speech_timer();
        let current = self.speech.as_ref().map(|(generation, _)| *generation);
        if wanted.map(|t| t.generation) != current {
            self.speech = wanted.map(|t| {
                (
                    t.generation,
                    Box::pin(sleep_until(Instant::from_std(t.deadline))),
                )
            });
        }
    }

    fn emit(&self, events: Vec<Event>) {
        for event in events {
            if self.events.send(event).is_err() {
                debug!("event stream closed");
                return;
            }
        }
    }
}

async fn next_tick(ticker: &mut Option<Interval>) {
    match ticker {
        Some(ticker) => {
            ticker.tick().await;
        }
        None => pending().await,
    }
}

async fn speech_expiry(speech: &mut Option<(u64, Pin<Box<Sleep>>)>) -> u64 {
    match speech {
        Some((generation, sleep)) => {
            sleep.as_mut().await;
            *generation
        }
        None => pending().await,
    }
}

fn failed(operation: &str, err: &AssistantError) -> Event {
    warn!(operation, error = %err, "assistant call failed");
    Event::AssistantFailed {
        operation: operation.to_string(),
        message: err.to_string(),
        at: Utc::now(),
    }
}
