//! Pet mood engine.
//!
//! A state machine driven solely by feed events:
//!
//! ```text
//!            0 pts        0 pts       0 pts          0 pts
//! (any) ---> Hungry ----> Hurt ----> Critical ----> Dead
//!   ^                                                 |
//!   |  >0 pts: Content / Ecstatic (>= 3 pts)          | >0 pts (revival)
//!   +-------------------------------------------------+--> Content
//! ```
//!
//! `feed()` computes the next state and the effects to fire in one step.
//! Executing those effects is the caller's job (see [`super::EffectRunner`]).

use std::time::Duration;

use rand::{RngCore, SeedableRng};
use rand_pcg::Mcg128Xsl64;
use tracing::{debug, info};

use super::effects::Effect;
use super::lines;
use super::state::{PetPolicy, PetSnapshot, PetState, PetStatus};
use crate::events::{Event, FeedEvent};

/// Outcome of applying one feed event.
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub previous_status: PetStatus,
    pub status: PetStatus,
    pub revived: bool,
    pub effects: Vec<Effect>,
}

pub struct PetMoodEngine<R: RngCore = Mcg128Xsl64> {
    state: PetState,
    policy: PetPolicy,
    rng: R,
}

impl PetMoodEngine<Mcg128Xsl64> {
    /// Engine with speech lines chosen from an entropy-seeded generator.
    pub fn new(policy: PetPolicy) -> Self {
        Self::with_rng(policy, Mcg128Xsl64::from_entropy())
    }

    /// Engine with reproducible speech line selection.
    pub fn with_seed(policy: PetPolicy, seed: u64) -> Self {
        Self::with_rng(policy, Mcg128Xsl64::seed_from_u64(seed))
    }
}

impl<R: RngCore> PetMoodEngine<R> {
    pub fn with_rng(policy: PetPolicy, rng: R) -> Self {
        Self {
            state: PetState::new(policy.initial_happiness),
            policy,
            rng,
        }
    }

    pub fn state(&self) -> &PetState {
        &self.state
    }

    pub fn snapshot(&self, speech: Option<&str>) -> PetSnapshot {
        PetSnapshot {
            name: self.policy.name.clone(),
            status: self.state.status,
            label: self.state.status.label().to_string(),
            happiness: self.state.happiness,
            hunger_strikes: self.state.hunger_strikes,
            history: self.state.history.clone(),
            total_fed: self.state.total_fed,
            speech: speech.map(str::to_string),
        }
    }

    /// Apply one feed event.
    pub fn feed(&mut self, feed: &FeedEvent) -> Transition {
        let previous_status = self.state.status;
        let (status, revived, effects) = if feed.is_reward() {
            self.reward(feed)
        } else {
            self.starve()
        };

        self.state.status = status;
        self.state.history.insert(0, feed.clone());
        self.state.history.truncate(self.policy.history_limit);

        if status != previous_status {
            info!(%previous_status, %status, happiness = self.state.happiness, "pet status changed");
        } else {
            debug!(%status, happiness = self.state.happiness, "pet fed");
        }

        Transition {
            previous_status,
            status,
            revived,
            effects,
        }
    }

    /// Build the `PetFed` event describing the current state after `feed`.
    pub fn fed_event(&self, feed: &FeedEvent, transition: &Transition) -> Event {
        Event::PetFed {
            feed: feed.clone(),
            previous_status: transition.previous_status,
            status: transition.status,
            happiness: self.state.happiness,
            hunger_strikes: self.state.hunger_strikes,
            revived: transition.revived,
        }
    }

    fn starve(&mut self) -> (PetStatus, bool, Vec<Effect>) {
        let max = self.policy.max_hunger_strikes;
        self.state.hunger_strikes = self.state.hunger_strikes.saturating_add(1).min(max);
        let status = PetStatus::from_hunger(self.state.hunger_strikes, max);
        self.state.happiness = self.adjust_happiness(-i32::from(self.policy.hunger_penalty));

        let message = lines::hunger_line(status);
        let duration_ms = if status == PetStatus::Dead {
            self.policy.death_speech_ms
        } else {
            self.policy.hunger_speech_ms
        };
        let effects = vec![
            Effect::Speak {
                text: message.to_string(),
                duration: Duration::from_millis(duration_ms),
            },
            Effect::Notify {
                title: lines::hunger_title(&self.policy.name, status),
                body: message.to_string(),
            },
        ];
        (status, false, effects)
    }

    fn reward(&mut self, feed: &FeedEvent) -> (PetStatus, bool, Vec<Effect>) {
        let revived = self.state.status == PetStatus::Dead;
        self.state.hunger_strikes = 0;
        self.state.total_fed = self.state.total_fed.saturating_add(feed.points);
        let gain = i64::from(feed.points) * i64::from(self.policy.points_multiplier);
        self.state.happiness = self.adjust_happiness(gain.min(i64::from(i32::MAX)) as i32);

        if revived {
            let effects = vec![
                Effect::Speak {
                    text: lines::REVIVAL_LINE.to_string(),
                    duration: Duration::from_millis(self.policy.revival_speech_ms),
                },
                Effect::Notify {
                    title: lines::revival_title(&self.policy.name),
                    body: lines::REVIVAL_LINE.to_string(),
                },
            ];
            return (PetStatus::Content, true, effects);
        }

        let status = if feed.points >= 3 {
            PetStatus::Ecstatic
        } else {
            PetStatus::Content
        };
        let effects = vec![Effect::Speak {
            text: lines::positive_line(&mut self.rng, &feed.task_title),
            duration: Duration::from_millis(self.policy.positive_speech_ms),
        }];
        (status, false, effects)
    }

    fn adjust_happiness(&self, delta: i32) -> u8 {
        (i32::from(self.state.happiness).saturating_add(delta)).clamp(0, 100) as u8
    }
}
