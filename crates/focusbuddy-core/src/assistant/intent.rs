use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use super::Assistant;
use crate::error::AssistantError;

/// A task the assistant suggests creating.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskProposal {
    pub title: String,
    pub duration_minutes: f64,
}

impl TaskProposal {
    pub fn new(title: impl Into<String>, duration_minutes: f64) -> Self {
        Self {
            title: title.into(),
            duration_minutes,
        }
    }
}

/// Untrusted reply from the intent endpoint.
///
/// The current shape is `{ "tasks": [...] }`. Older replies carried a
/// single `{ "title", "durationMinutes" }` pair at the top level; that
/// shape is still accepted when `tasks` yields nothing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntentReply {
    #[serde(default)]
    pub tasks: Vec<Value>,
    #[serde(default)]
    pub title: Value,
    #[serde(default)]
    pub duration_minutes: Value,
}

fn clean(title: &Value, minutes: &Value) -> Option<TaskProposal> {
    let title = title.as_str()?.trim();
    let minutes = match minutes {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    if title.is_empty() || !minutes.is_finite() || minutes <= 0.0 {
        return None;
    }
    Some(TaskProposal::new(title, minutes))
}

/// Keep at most `max` usable proposals from a raw reply.
pub fn normalize_proposals(reply: &IntentReply, max: usize) -> Vec<TaskProposal> {
    let mut proposals: Vec<TaskProposal> = reply
        .tasks
        .iter()
        .take(max)
        .filter_map(|task| {
            let proposal = clean(
                task.get("title").unwrap_or(&Value::Null),
                task.get("durationMinutes").unwrap_or(&Value::Null),
            );
            if proposal.is_none() {
                debug!(?task, "discarding unusable proposal");
            }
            proposal
        })
        .collect();

    if proposals.is_empty() && max > 0 {
        if let Some(legacy) = clean(&reply.title, &reply.duration_minutes) {
            debug!("accepting legacy single-task reply");
            proposals.push(legacy);
        }
    }
    proposals
}

/// Ask the assistant to plan tasks from free text.
///
/// # Errors
///
/// Returns `Interpretation` when the prompt is blank or no usable task
/// comes back, and passes transport errors through.
pub async fn interpret_task_intent(
    assistant: &dyn Assistant,
    prompt: &str,
    max_proposals: usize,
) -> Result<Vec<TaskProposal>, AssistantError> {
    let prompt = prompt.trim();
    if prompt.is_empty() {
        return Err(AssistantError::Interpretation(
            "Describe what you'd like me to plan.".into(),
        ));
    }

    let reply = assistant.propose_tasks(prompt).await.map_err(|e| {
        warn!(error = %e, "task intent request failed");
        e
    })?;
    let proposals = normalize_proposals(&reply, max_proposals);
    if proposals.is_empty() {
        return Err(AssistantError::Interpretation(
            "The assistant could not understand that task. Try rephrasing.".into(),
        ));
    }
    Ok(proposals)
}
