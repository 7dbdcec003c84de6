//! One in-memory session: tasks, pet and pending effects.
//!
//! Every public method is a single transaction over the whole state. It
//! applies the change, feeds any completions to the pet, runs the effects
//! the pet asked for, updates the tick cadence flag, and returns the
//! events produced in that order.

use std::time::Instant;

use chrono::Utc;
use rand::RngCore;
use rand_pcg::Mcg128Xsl64;

use crate::assistant::{CheckIn, TaskProposal};
use crate::error::ValidationError;
use crate::events::Event;
use crate::mood::{classify, Mood};
use crate::pet::{
    lines, EffectRunner, Notifier, NotificationPermission, PetMoodEngine, PetSnapshot, SpeechSlot,
    SpeechTimer,
};
use crate::storage::Config;
use crate::timer::{Completion, Task, TaskId, TaskTimerEngine};

pub struct Session<N: Notifier, R: RngCore = Mcg128Xsl64> {
    engine: TaskTimerEngine,
    pet: PetMoodEngine<R>,
    effects: EffectRunner<N>,
    check_in: Option<CheckIn>,
    ticking: bool,
}

impl<N: Notifier> Session<N, Mcg128Xsl64> {
    /// Fresh session from configuration.
    pub fn new(config: &Config, notifier: N) -> Self {
        let pet = match config.pet.seed {
            Some(seed) => PetMoodEngine::with_seed(config.pet_policy(), seed),
            None => PetMoodEngine::new(config.pet_policy()),
        };
        let engine = TaskTimerEngine::new(config.scoring_policy(), config.timer.min_task_seconds);
        Self::from_parts(engine, pet, notifier, config.notifications.enabled)
    }
}

impl<N: Notifier, R: RngCore> Session<N, R> {
    pub fn from_parts(
        engine: TaskTimerEngine,
        pet: PetMoodEngine<R>,
        notifier: N,
        notifications_enabled: bool,
    ) -> Self {
        let effects = EffectRunner::new(
            notifier,
            notifications_enabled,
            SpeechSlot::with_text(lines::INITIAL_SPEECH),
        );
        Self {
            engine,
            pet,
            effects,
            check_in: None,
            ticking: false,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn tasks(&self) -> &[Task] {
        self.engine.tasks()
    }

    pub fn engine(&self) -> &TaskTimerEngine {
        &self.engine
    }

    pub fn pet(&self) -> PetSnapshot {
        self.pet.snapshot(self.effects.speech().text())
    }

    pub fn speech(&self) -> Option<&str> {
        self.effects.speech().text()
    }

    pub fn speech_timer(&self) -> Option<SpeechTimer> {
        self.effects.speech().timer()
    }

    pub fn notification_permission(&self) -> NotificationPermission {
        self.effects.permission()
    }

    /// Whether the one-second cadence should be scheduled.
    pub fn is_ticking(&self) -> bool {
        self.ticking
    }

    pub fn mood(&self) -> Mood {
        let feeling = self.check_in.as_ref().map(|c| c.feeling_summary.as_str());
        classify(feeling, self.engine.tasks())
    }

    pub fn snapshot(&self) -> Event {
        Event::StateSnapshot {
            tasks: self.engine.tasks().to_vec(),
            pet: self.pet(),
            total_points: self.engine.total_points(),
            mood: self.mood(),
            at: Utc::now(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    pub fn add_task(&mut self, title: &str, minutes: f64) -> Result<Vec<Event>, ValidationError> {
        let task = self.engine.add_task(title, minutes)?;
        Ok(vec![Event::TaskAdded {
            task,
            at: Utc::now(),
        }])
    }

    pub fn apply_proposals(&mut self, proposals: &[TaskProposal]) -> Vec<Event> {
        let added = self.engine.apply_proposals(proposals);
        let mut events: Vec<Event> = added
            .iter()
            .map(|task| Event::TaskAdded {
                task: task.clone(),
                at: Utc::now(),
            })
            .collect();
        events.push(Event::ProposalsApplied {
            titles: added.iter().map(|t| t.title().to_string()).collect(),
            at: Utc::now(),
        });
        events
    }

    pub fn toggle_timer(&mut self, id: TaskId) -> Result<Vec<Event>, ValidationError> {
        let mut events: Vec<Event> = self.engine.toggle_timer(id)?.into_iter().collect();
        self.sync_cadence(&mut events);
        Ok(events)
    }

    pub fn tick(&mut self, now: Instant) -> Vec<Event> {
        let completions = self.engine.tick();
        let mut events = Vec::new();
        for completion in completions {
            self.feed(completion, now, &mut events);
        }
        self.sync_cadence(&mut events);
        events
    }

    pub fn complete_task(&mut self, id: TaskId, now: Instant) -> Result<Vec<Event>, ValidationError> {
        let mut events = Vec::new();
        if let Some(completion) = self.engine.complete_task(id)? {
            self.feed(completion, now, &mut events);
        }
        self.sync_cadence(&mut events);
        Ok(events)
    }

    pub fn remove_task(&mut self, id: TaskId) -> Result<Vec<Event>, ValidationError> {
        self.engine.remove_task(id)?;
        let mut events = vec![Event::TaskRemoved {
            task_id: id,
            at: Utc::now(),
        }];
        self.sync_cadence(&mut events);
        Ok(events)
    }

    pub fn record_check_in(&mut self, check_in: CheckIn) -> Vec<Event> {
        self.check_in = Some(check_in.clone());
        vec![Event::CheckIn {
            feeling_summary: check_in.feeling_summary,
            buddy_note: check_in.buddy_note,
            mood: self.mood(),
            at: Utc::now(),
        }]
    }

    /// Handle a fired speech timer.
    pub fn expire_speech(&mut self, generation: u64) -> Vec<Event> {
        self.effects.expire_speech(generation).into_iter().collect()
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn feed(&mut self, completion: Completion, now: Instant, events: &mut Vec<Event>) {
        events.push(completion.to_event());
        let transition = self.pet.feed(&completion.feed);
        events.push(self.pet.fed_event(&completion.feed, &transition));
        events.extend(self.effects.run(transition.effects, now));
    }

    fn sync_cadence(&mut self, events: &mut Vec<Event>) {
        let wanted = self.engine.has_running_tasks();
        if wanted == self.ticking {
            return;
        }
        self.ticking = wanted;
        events.push(if wanted {
            Event::TickScheduled { at: Utc::now() }
        } else {
            Event::TickStopped { at: Utc::now() }
        });
    }
}
