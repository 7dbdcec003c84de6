//! Photo description and sprite generation.

use serde::{Deserialize, Serialize};
use tracing::info;

use super::Assistant;
use crate::error::AssistantError;
use crate::mood::Mood;

const FALLBACK_DESCRIPTION: &str = "a cheerful companion";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AspectRatio {
    #[serde(rename = "1:1")]
    Square,
    #[serde(rename = "16:9")]
    Wide,
}

impl AspectRatio {
    pub fn as_str(&self) -> &'static str {
        match self {
            AspectRatio::Square => "1:1",
            AspectRatio::Wide => "16:9",
        }
    }
}

/// Reject a photo before any request is made.
pub fn validate_photo(photo: &[u8], mime_type: &str, max_bytes: usize) -> Result<(), AssistantError> {
    if photo.is_empty() {
        return Err(AssistantError::EmptyPhoto);
    }
    if photo.len() > max_bytes {
        return Err(AssistantError::PayloadTooLarge {
            size: photo.len(),
            limit: max_bytes,
        });
    }
    if !mime_type.trim().to_ascii_lowercase().starts_with("image/") {
        return Err(AssistantError::UnsupportedMedia {
            mime_type: mime_type.to_string(),
        });
    }
    Ok(())
}

/// Validated photo description; blank answers fall back to a generic one.
pub async fn describe_image(
    assistant: &dyn Assistant,
    photo: &[u8],
    mime_type: &str,
    max_bytes: usize,
) -> Result<String, AssistantError> {
    validate_photo(photo, mime_type, max_bytes)?;
    let description = assistant.describe_image(photo, mime_type).await?;
    let description = description.trim();
    Ok(if description.is_empty() {
        FALLBACK_DESCRIPTION.to_string()
    } else {
        description.to_string()
    })
}

/// Render one image; an empty result is a `Generation` error.
pub async fn generate_image(
    assistant: &dyn Assistant,
    prompt: &str,
    aspect_ratio: AspectRatio,
) -> Result<Vec<u8>, AssistantError> {
    let bytes = assistant.generate_image(prompt, aspect_ratio).await?;
    if bytes.is_empty() {
        return Err(AssistantError::Generation(format!(
            "no {} image was returned",
            aspect_ratio.as_str()
        )));
    }
    Ok(bytes)
}

fn mood_style(mood: Mood) -> (&'static str, &'static str) {
    match mood {
        Mood::Happy => ("joyful", "a big bright smile"),
        Mood::Curious => ("curious", "a playful head tilt"),
        Mood::Sad => ("melancholy", "a tiny pout"),
    }
}

pub(crate) fn sprite_prompt(description: &str, mood: Mood) -> String {
    let (tone, extra) = mood_style(mood);
    format!(
        "Pixel art portrait, 8-bit sprite of {description}. Expression: {tone} with {extra}. \
         Transparent background, centered, crisp edges."
    )
}

pub(crate) fn backdrop_prompt(description: &str) -> String {
    format!(
        "Wide 8-bit pixel art backdrop inspired by {description}. Cozy minimal room, \
         soft gradients, no characters."
    )
}

/// One sprite per mood plus a wide backdrop, all derived from one photo.
#[derive(Debug, Clone)]
pub struct SpriteSet {
    pub description: String,
    pub happy: Vec<u8>,
    pub curious: Vec<u8>,
    pub sad: Vec<u8>,
    pub background: Vec<u8>,
}

impl SpriteSet {
    pub fn for_mood(&self, mood: Mood) -> &[u8] {
        match mood {
            Mood::Happy => &self.happy,
            Mood::Curious => &self.curious,
            Mood::Sad => &self.sad,
        }
    }
}

/// Describe the photo, then generate the three mood sprites and a backdrop.
///
/// Stops at the first failure; nothing partial is returned.
pub async fn build_sprite_set(
    assistant: &dyn Assistant,
    photo: &[u8],
    mime_type: &str,
    max_bytes: usize,
) -> Result<SpriteSet, AssistantError> {
    let description = describe_image(assistant, photo, mime_type, max_bytes).await?;
    info!(%description, "photo described");

    let happy = generate_image(assistant, &sprite_prompt(&description, Mood::Happy), AspectRatio::Square).await?;
    let curious = generate_image(assistant, &sprite_prompt(&description, Mood::Curious), AspectRatio::Square).await?;
    let sad = generate_image(assistant, &sprite_prompt(&description, Mood::Sad), AspectRatio::Square).await?;
    let background = generate_image(assistant, &backdrop_prompt(&description), AspectRatio::Wide).await?;

    Ok(SpriteSet {
        description,
        happy,
        curious,
        sad,
        background,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const MIB: usize = 1024 * 1024;

    #[test]
    fn accepts_images_within_limit() {
        assert!(validate_photo(&[1, 2, 3], "image/png", 8 * MIB).is_ok());
        assert!(validate_photo(&[1], "IMAGE/JPEG", 8 * MIB).is_ok());
    }

    #[test]
    fn rejects_non_images() {
        assert!(matches!(
            validate_photo(&[1], "application/pdf", 8 * MIB),
            Err(AssistantError::UnsupportedMedia { .. })
        ));
    }

    #[test]
    fn rejects_oversized_photos() {
        let photo = vec![0u8; 8 * MIB + 1];
        assert!(matches!(
            validate_photo(&photo, "image/png", 8 * MIB),
            Err(AssistantError::PayloadTooLarge { size, limit }) if size == 8 * MIB + 1 && limit == 8 * MIB
        ));
        assert!(validate_photo(&photo[..8 * MIB], "image/png", 8 * MIB).is_ok());
    }

    #[test]
    fn rejects_empty_photo() {
        assert!(matches!(
            validate_photo(&[], "image/png", 8 * MIB),
            Err(AssistantError::EmptyPhoto)
        ));
    }

    #[test]
    fn prompts_carry_mood_and_description() {
        let prompt = sprite_prompt("a grey cat", Mood::Sad);
        assert!(prompt.contains("a grey cat"));
        assert!(prompt.contains("melancholy"));
        assert!(backdrop_prompt("a grey cat").contains("no characters"));
    }

    #[test]
    fn aspect_ratio_serializes_as_ratio() {
        assert_eq!(serde_json::to_string(&AspectRatio::Wide).unwrap(), "\"16:9\"");
    }
}
