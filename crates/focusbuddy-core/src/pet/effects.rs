//! Transient side effects of pet transitions.
//!
//! A transition returns a list of [`Effect`] descriptors together with the
//! new state. The [`EffectRunner`] executes each list exactly once, after
//! the state change has been committed.

use std::time::{Duration, Instant};

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::events::Event;

/// What a transition asks the outside world to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    Speak { text: String, duration: Duration },
    Notify { title: String, body: String },
}

/// Whether the notification channel may be used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationPermission {
    Granted,
    Denied,
    /// Not decided yet.
    Default,
    Unsupported,
}

/// Desktop (or terminal) notification channel.
///
/// Delivery is best-effort: errors are logged by the runner and never
/// reach the engines.
pub trait Notifier: Send {
    fn permission(&self) -> NotificationPermission;

    /// Ask the user for permission. Called while the permission is still
    /// [`NotificationPermission::Default`].
    fn request_permission(&self) -> NotificationPermission {
        self.permission()
    }

    fn notify(&self, title: &str, body: &str) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;
}

/// Channel that is never available.
pub struct NoopNotifier;

impl Notifier for NoopNotifier {
    fn permission(&self) -> NotificationPermission {
        NotificationPermission::Unsupported
    }

    fn notify(&self, _title: &str, _body: &str) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        Ok(())
    }
}

impl<N: Notifier + ?Sized + Sync> Notifier for std::sync::Arc<N> {
    fn permission(&self) -> NotificationPermission {
        (**self).permission()
    }

    fn request_permission(&self) -> NotificationPermission {
        (**self).request_permission()
    }

    fn notify(&self, title: &str, body: &str) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        (**self).notify(title, body)
    }
}

/// Handle for the currently scheduled speech expiry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpeechTimer {
    pub generation: u64,
    pub deadline: Instant,
}

/// The single speech bubble.
///
/// Each assignment bumps the generation; an expiry carrying an older
/// generation is ignored, so only the latest line's timer can clear it.
#[derive(Debug, Clone, Default)]
pub struct SpeechSlot {
    text: Option<String>,
    timer: Option<SpeechTimer>,
    generation: u64,
}

impl SpeechSlot {
    /// A slot showing `text` until replaced.
    pub fn with_text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            timer: None,
            generation: 0,
        }
    }

    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    pub fn timer(&self) -> Option<SpeechTimer> {
        self.timer
    }

    /// Show `text` for `duration`, cancelling the previous expiry.
    /// Blank text is ignored.
    pub fn set(&mut self, text: &str, duration: Duration, now: Instant) -> Option<SpeechTimer> {
        if text.trim().is_empty() {
            return None;
        }
        self.generation += 1;
        let timer = SpeechTimer {
            generation: self.generation,
            deadline: now + duration,
        };
        self.text = Some(text.to_string());
        self.timer = Some(timer);
        Some(timer)
    }

    /// Clear the bubble if `generation` is still the current one.
    pub fn expire(&mut self, generation: u64) -> bool {
        match self.timer {
            Some(timer) if timer.generation == generation => {
                self.text = None;
                self.timer = None;
                true
            }
            _ => false,
        }
    }
}

/// Executes effect lists against the speech slot and notifier.
pub struct EffectRunner<N: Notifier> {
    notifier: N,
    notifications_enabled: bool,
    speech: SpeechSlot,
}

impl<N: Notifier> EffectRunner<N> {
    pub fn new(notifier: N, notifications_enabled: bool, speech: SpeechSlot) -> Self {
        Self {
            notifier,
            notifications_enabled,
            speech,
        }
    }

    pub fn speech(&self) -> &SpeechSlot {
        &self.speech
    }

    pub fn permission(&self) -> NotificationPermission {
        if self.notifications_enabled {
            self.notifier.permission()
        } else {
            NotificationPermission::Denied
        }
    }

    /// Run every effect once, in order.
    pub fn run(&mut self, effects: Vec<Effect>, now: Instant) -> Vec<Event> {
        let mut events = Vec::new();
        for effect in effects {
            match effect {
                Effect::Speak { text, duration } => {
                    if self.speech.set(&text, duration, now).is_some() {
                        events.push(Event::SpeechChanged {
                            text: Some(text),
                            at: Utc::now(),
                        });
                    }
                }
                Effect::Notify { title, body } => {
                    if let Some(event) = self.deliver(title, body) {
                        events.push(event);
                    }
                }
            }
        }
        events
    }

    /// Handle a fired speech timer.
    pub fn expire_speech(&mut self, generation: u64) -> Option<Event> {
        self.speech.expire(generation).then(|| Event::SpeechChanged {
            text: None,
            at: Utc::now(),
        })
    }

    fn deliver(&self, title: String, body: String) -> Option<Event> {
        let mut permission = self.permission();
        if permission == NotificationPermission::Default {
            permission = self.notifier.request_permission();
            debug!(?permission, "notification permission requested");
        }
        if permission != NotificationPermission::Granted {
            debug!(?permission, %title, "notification skipped");
            return None;
        }
        match self.notifier.notify(&title, &body) {
            Ok(()) => Some(Event::NotificationSent {
                title,
                body,
                at: Utc::now(),
            }),
            Err(e) => {
                warn!(error = %e, %title, "notification failed");
                None
            }
        }
    }
}
