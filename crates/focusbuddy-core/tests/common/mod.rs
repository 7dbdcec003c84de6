//! Shared test doubles.

#![allow(dead_code)]

use std::sync::Mutex;

use async_trait::async_trait;
use focusbuddy_core::assistant::{AspectRatio, Assistant, CheckInReply, IntentReply, TaskSnapshot};
use focusbuddy_core::AssistantError;
use serde_json::Value;

/// Scripted assistant that records every call it receives.
#[derive(Default)]
pub struct FakeAssistant {
    pub intent: Value,
    pub check_in: CheckInReply,
    pub description: String,
    pub image: Vec<u8>,
    pub offline: bool,
    pub calls: Mutex<Vec<Call>>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Propose(String),
    CheckIn(Vec<TaskSnapshot>),
    Describe { len: usize, mime_type: String },
    Generate { prompt: String, aspect_ratio: AspectRatio },
}

impl FakeAssistant {
    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: Call) -> Result<(), AssistantError> {
        self.calls.lock().unwrap().push(call);
        if self.offline {
            Err(AssistantError::Transport("connection refused".into()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl Assistant for FakeAssistant {
    async fn propose_tasks(&self, prompt: &str) -> Result<IntentReply, AssistantError> {
        self.record(Call::Propose(prompt.to_string()))?;
        Ok(serde_json::from_value(self.intent.clone()).unwrap_or_default())
    }

    async fn check_in(&self, snapshot: &[TaskSnapshot]) -> Result<CheckInReply, AssistantError> {
        self.record(Call::CheckIn(snapshot.to_vec()))?;
        Ok(self.check_in.clone())
    }

    async fn describe_image(&self, photo: &[u8], mime_type: &str) -> Result<String, AssistantError> {
        self.record(Call::Describe {
            len: photo.len(),
            mime_type: mime_type.to_string(),
        })?;
        Ok(self.description.clone())
    }

    async fn generate_image(
        &self,
        prompt: &str,
        aspect_ratio: AspectRatio,
    ) -> Result<Vec<u8>, AssistantError> {
        self.record(Call::Generate {
            prompt: prompt.to_string(),
            aspect_ratio,
        })?;
        Ok(self.image.clone())
    }
}
