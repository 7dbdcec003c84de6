//! Boundary to the hosted assistant service.
//!
//! The service is a black box behind the [`Assistant`] trait. The free
//! functions in the submodules wrap each call with input validation and
//! response normalization so that nothing malformed reaches the engines.
//! Every failure is returned as an [`AssistantError`] value.

mod checkin;
mod intent;
mod media;
mod remote;

pub use checkin::{check_in_status, snapshot_tasks, CheckIn, CheckInReply, TaskSnapshot};
pub use intent::{interpret_task_intent, normalize_proposals, IntentReply, TaskProposal};
pub use media::{
    build_sprite_set, describe_image, generate_image, validate_photo, AspectRatio, SpriteSet,
};
pub use remote::RemoteAssistant;

use async_trait::async_trait;

use crate::error::AssistantError;

/// Raw transport contract of the assistant service.
#[async_trait]
pub trait Assistant: Send + Sync {
    /// Turn free text into task proposals.
    async fn propose_tasks(&self, prompt: &str) -> Result<IntentReply, AssistantError>;

    /// Short status line about the current tasks.
    async fn check_in(&self, snapshot: &[TaskSnapshot]) -> Result<CheckInReply, AssistantError>;

    /// Describe the subject of a photo.
    async fn describe_image(&self, photo: &[u8], mime_type: &str) -> Result<String, AssistantError>;

    /// Render an image; may return no bytes.
    async fn generate_image(
        &self,
        prompt: &str,
        aspect_ratio: AspectRatio,
    ) -> Result<Vec<u8>, AssistantError>;
}

/// Stand-in used when no endpoint is configured.
pub struct DisabledAssistant;

#[async_trait]
impl Assistant for DisabledAssistant {
    async fn propose_tasks(&self, _prompt: &str) -> Result<IntentReply, AssistantError> {
        Err(AssistantError::NotConfigured)
    }

    async fn check_in(&self, _snapshot: &[TaskSnapshot]) -> Result<CheckInReply, AssistantError> {
        Err(AssistantError::NotConfigured)
    }

    async fn describe_image(&self, _photo: &[u8], _mime_type: &str) -> Result<String, AssistantError> {
        Err(AssistantError::NotConfigured)
    }

    async fn generate_image(
        &self,
        _prompt: &str,
        _aspect_ratio: AspectRatio,
    ) -> Result<Vec<u8>, AssistantError> {
        Err(AssistantError::NotConfigured)
    }
}
