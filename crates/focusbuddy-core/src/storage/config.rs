//! TOML-based application configuration.
//!
//! Holds the policy constants of the timer and the companion pet:
//! - Tick cadence and minimum task length
//! - Scoring thresholds and point values
//! - Pet hunger ceiling, happiness deltas, history size
//! - Speech bubble durations
//! - Notification and assistant endpoint settings
//!
//! Configuration is stored at `~/.config/focusbuddy/config.toml`.
//! Tasks and pet state are never written here; they live for one session.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::data_dir;
use crate::error::ConfigError;
use crate::pet::PetPolicy;
use crate::scoring::ScoringPolicy;

/// Timer cadence configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimerConfig {
    #[serde(default = "default_min_task_seconds")]
    pub min_task_seconds: u64,
    /// Pre-filled duration for new tasks in the interactive session.
    #[serde(default = "default_duration_minutes")]
    pub default_duration_minutes: f64,
}

/// Point thresholds applied at completion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringConfig {
    /// Finishing with less than this fraction of the time used earns `fast_points`.
    #[serde(default = "default_fast_finish_ratio")]
    pub fast_finish_ratio: f64,
    #[serde(default = "default_fast_points")]
    pub fast_points: u32,
    #[serde(default = "default_finish_points")]
    pub finish_points: u32,
    #[serde(default)]
    pub timeout_points: u32,
}

/// Companion pet configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PetConfig {
    #[serde(default = "default_pet_name")]
    pub name: String,
    #[serde(default = "default_initial_happiness")]
    pub initial_happiness: u8,
    #[serde(default = "default_max_hunger_strikes")]
    pub max_hunger_strikes: u8,
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,
    #[serde(default = "default_hunger_penalty")]
    pub hunger_penalty: u8,
    #[serde(default = "default_points_multiplier")]
    pub points_multiplier: u8,
    /// Fixed seed for speech line selection (None = entropy).
    #[serde(default)]
    pub seed: Option<u64>,
}

/// Speech bubble durations in milliseconds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpeechConfig {
    #[serde(default = "default_positive_ms")]
    pub positive: u64,
    #[serde(default = "default_hunger_ms")]
    pub hunger: u64,
    #[serde(default = "default_death_ms")]
    pub death: u64,
    #[serde(default = "default_revival_ms")]
    pub revival: u64,
}

/// Notification configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationsConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
}

/// Assistant (collaborator) endpoint configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssistantConfig {
    /// Base URL of the assistant service, e.g. `http://localhost:3000/api`.
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_max_photo_bytes")]
    pub max_photo_bytes: usize,
    #[serde(default = "default_max_proposals")]
    pub max_proposals: usize,
    #[serde(default = "default_max_snapshot_tasks")]
    pub max_snapshot_tasks: usize,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/focusbuddy/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub timer: TimerConfig,
    #[serde(default)]
    pub scoring: ScoringConfig,
    #[serde(default)]
    pub pet: PetConfig,
    #[serde(default)]
    pub speech: SpeechConfig,
    #[serde(default)]
    pub notifications: NotificationsConfig,
    #[serde(default)]
    pub assistant: AssistantConfig,
}

fn default_min_task_seconds() -> u64 {
    5
}
fn default_duration_minutes() -> f64 {
    25.0
}
fn default_fast_finish_ratio() -> f64 {
    0.7
}
fn default_fast_points() -> u32 {
    3
}
fn default_finish_points() -> u32 {
    2
}
fn default_pet_name() -> String {
    "Buddy".into()
}
fn default_initial_happiness() -> u8 {
    55
}
fn default_max_hunger_strikes() -> u8 {
    4
}
fn default_history_limit() -> usize {
    5
}
fn default_hunger_penalty() -> u8 {
    25
}
fn default_points_multiplier() -> u8 {
    9
}
fn default_positive_ms() -> u64 {
    5000
}
fn default_hunger_ms() -> u64 {
    6500
}
fn default_death_ms() -> u64 {
    8000
}
fn default_revival_ms() -> u64 {
    7000
}
fn default_true() -> bool {
    true
}
fn default_timeout_secs() -> u64 {
    30
}
fn default_max_photo_bytes() -> usize {
    8 * 1024 * 1024
}
fn default_max_proposals() -> usize {
    4
}
fn default_max_snapshot_tasks() -> usize {
    8
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            min_task_seconds: default_min_task_seconds(),
            default_duration_minutes: default_duration_minutes(),
        }
    }
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            fast_finish_ratio: default_fast_finish_ratio(),
            fast_points: default_fast_points(),
            finish_points: default_finish_points(),
            timeout_points: 0,
        }
    }
}

impl Default for PetConfig {
    fn default() -> Self {
        Self {
            name: default_pet_name(),
            initial_happiness: default_initial_happiness(),
            max_hunger_strikes: default_max_hunger_strikes(),
            history_limit: default_history_limit(),
            hunger_penalty: default_hunger_penalty(),
            points_multiplier: default_points_multiplier(),
            seed: None,
        }
    }
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            positive: default_positive_ms(),
            hunger: default_hunger_ms(),
            death: default_death_ms(),
            revival: default_revival_ms(),
        }
    }
}

impl Default for NotificationsConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            timeout_secs: default_timeout_secs(),
            max_photo_bytes: default_max_photo_bytes(),
            max_proposals: default_max_proposals(),
            max_snapshot_tasks: default_max_snapshot_tasks(),
        }
    }
}

impl Config {
    fn lookup<'a>(root: &'a serde_json::Value, key: &str) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }
        key.split('.').try_fold(root, |node, part| node.get(part))
    }

    fn assign(root: &mut serde_json::Value, key: &str, raw: &str) -> Result<(), ConfigError> {
        let unknown = || ConfigError::UnknownKey(key.to_string());
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let (parent_path, leaf) = match key.rsplit_once('.') {
            Some((parent, leaf)) => (Some(parent), leaf),
            None => (None, key),
        };
        if leaf.is_empty() {
            return Err(unknown());
        }

        let mut parent = root;
        if let Some(path) = parent_path {
            for part in path.split('.') {
                parent = parent.get_mut(part).ok_or_else(unknown)?;
            }
        }
        let table = parent.as_object_mut().ok_or_else(unknown)?;
        let existing = table.get(leaf).ok_or_else(unknown)?;

        let value = match existing {
            serde_json::Value::Bool(_) => serde_json::Value::Bool(
                raw.parse::<bool>()
                    .map_err(|_| invalid(format!("cannot parse '{raw}' as bool")))?,
            ),
            serde_json::Value::Number(_) => parse_number(raw)
                .ok_or_else(|| invalid(format!("cannot parse '{raw}' as number")))?,
            serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                serde_json::from_str(raw).map_err(|e| invalid(e.to_string()))?
            }
            // Unset optionals take a number when the text looks like one.
            serde_json::Value::Null => parse_number(raw)
                .unwrap_or_else(|| serde_json::Value::String(raw.to_string())),
            serde_json::Value::String(_) => serde_json::Value::String(raw.to_string()),
        };

        table.insert(leaf.to_string(), value);
        Ok(())
    }

    fn path() -> Result<PathBuf, ConfigError> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from the default location, writing defaults if no file exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::path()?;
        if path.exists() {
            Self::load_from(&path)
        } else {
            let cfg = Self::default();
            cfg.save_to(&path)?;
            Ok(cfg)
        }
    }

    /// Load from an explicit path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let failed = |message: String| ConfigError::LoadFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = std::fs::read_to_string(path).map_err(|e| failed(e.to_string()))?;
        let cfg: Config = toml::from_str(&content).map_err(|e| failed(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Persist to the default location.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::path()?)
    }

    /// Persist to an explicit path.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| failed(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| failed(e.to_string()))
    }

    /// Load from disk, returning default on error.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_default()
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        match Self::lookup(&json, key)? {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a config value by dot-separated key without saving.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown, the value cannot be parsed,
    /// or the resulting configuration violates a policy bound.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };
        let mut json = serde_json::to_value(&*self).map_err(|e| invalid(e.to_string()))?;
        Self::assign(&mut json, key, value)?;
        let updated: Config = serde_json::from_value(json).map_err(|e| invalid(e.to_string()))?;
        updated.validate()?;
        *self = updated;
        Ok(())
    }

    /// Check the policy bounds that the engines rely on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let bad = |key: &str, message: &str| {
            Err(ConfigError::InvalidValue {
                key: key.to_string(),
                message: message.to_string(),
            })
        };
        if self.timer.min_task_seconds == 0 {
            return bad("timer.min_task_seconds", "must be greater than 0");
        }
        if !(self.scoring.fast_finish_ratio > 0.0 && self.scoring.fast_finish_ratio <= 1.0) {
            return bad("scoring.fast_finish_ratio", "must be in (0, 1]");
        }
        if self.scoring.finish_points == 0 || self.scoring.fast_points == 0 {
            return bad("scoring", "completion points must be positive");
        }
        if self.scoring.fast_points < self.scoring.finish_points {
            return bad("scoring.fast_points", "must be at least scoring.finish_points");
        }
        if self.scoring.timeout_points != 0 {
            return bad("scoring.timeout_points", "a timed-out task always scores 0");
        }
        if self.pet.max_hunger_strikes == 0 {
            return bad("pet.max_hunger_strikes", "must be at least 1");
        }
        if self.pet.history_limit == 0 {
            return bad("pet.history_limit", "must be at least 1");
        }
        if self.pet.initial_happiness > 100 {
            return bad("pet.initial_happiness", "must be within 0..=100");
        }
        Ok(())
    }

    pub fn scoring_policy(&self) -> ScoringPolicy {
        ScoringPolicy {
            fast_finish_ratio: self.scoring.fast_finish_ratio,
            fast_points: self.scoring.fast_points,
            finish_points: self.scoring.finish_points,
            timeout_points: self.scoring.timeout_points,
        }
    }

    pub fn pet_policy(&self) -> PetPolicy {
        PetPolicy {
            name: self.pet.name.clone(),
            initial_happiness: self.pet.initial_happiness,
            max_hunger_strikes: self.pet.max_hunger_strikes,
            history_limit: self.pet.history_limit,
            hunger_penalty: self.pet.hunger_penalty,
            points_multiplier: self.pet.points_multiplier,
            positive_speech_ms: self.speech.positive,
            hunger_speech_ms: self.speech.hunger,
            death_speech_ms: self.speech.death,
            revival_speech_ms: self.speech.revival,
        }
    }
}

fn parse_number(raw: &str) -> Option<serde_json::Value> {
    if let Ok(n) = raw.parse::<u64>() {
        return Some(serde_json::Value::Number(n.into()));
    }
    raw.parse::<f64>()
        .ok()
        .and_then(serde_json::Number::from_f64)
        .map(serde_json::Value::Number)
}
