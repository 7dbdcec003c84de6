//! Collaborator wrappers driven through a scripted assistant.

mod common;

use common::{Call, FakeAssistant};
use focusbuddy_core::assistant::{
    build_sprite_set, check_in_status, interpret_task_intent, AspectRatio, CheckIn, CheckInReply,
    TaskProposal,
};
use focusbuddy_core::mood::Mood;
use focusbuddy_core::{AssistantError, TaskTimerEngine};
use serde_json::json;

const MIB: usize = 1024 * 1024;

#[tokio::test]
async fn plan_returns_at_most_four_proposals() {
    let assistant = FakeAssistant {
        intent: json!({
            "tasks": [
                {"title": "Outline", "durationMinutes": 15},
                {"title": "Draft", "durationMinutes": 30},
                {"title": "Edit", "durationMinutes": 20},
                {"title": "Publish", "durationMinutes": 5},
                {"title": "Tweet", "durationMinutes": 2}
            ]
        }),
        ..Default::default()
    };

    let proposals = interpret_task_intent(&assistant, "  write a blog post ", 4)
        .await
        .unwrap();

    assert_eq!(proposals.len(), 4);
    assert_eq!(proposals[0], TaskProposal::new("Outline", 15.0));
    assert_eq!(assistant.calls(), vec![Call::Propose("write a blog post".into())]);
}

#[tokio::test]
async fn blank_prompt_never_reaches_the_service() {
    let assistant = FakeAssistant::default();
    let err = interpret_task_intent(&assistant, "   ", 4).await.unwrap_err();
    assert!(matches!(err, AssistantError::Interpretation(_)));
    assert!(assistant.calls().is_empty());
}

#[tokio::test]
async fn unusable_reply_is_an_interpretation_error() {
    let assistant = FakeAssistant {
        intent: json!({"tasks": [{"title": "", "durationMinutes": 0}]}),
        ..Default::default()
    };
    let err = interpret_task_intent(&assistant, "something", 4).await.unwrap_err();
    assert!(matches!(err, AssistantError::Interpretation(msg) if msg.contains("rephrasing")));
}

#[tokio::test]
async fn transport_failure_passes_through() {
    let assistant = FakeAssistant {
        offline: true,
        ..Default::default()
    };
    let err = interpret_task_intent(&assistant, "plan", 4).await.unwrap_err();
    assert!(matches!(err, AssistantError::Transport(_)));
}

#[tokio::test]
async fn proposals_feed_the_timer_engine() {
    let assistant = FakeAssistant {
        intent: json!({"title": "Water plants", "durationMinutes": "10"}),
        ..Default::default()
    };
    let proposals = interpret_task_intent(&assistant, "garden", 4).await.unwrap();

    let mut engine = TaskTimerEngine::default();
    let added = engine.apply_proposals(&proposals);
    assert_eq!(added.len(), 1);
    assert_eq!(added[0].title(), "Water plants");
    assert_eq!(added[0].duration(), 600);
}

#[tokio::test]
async fn check_in_sends_first_eight_tasks() {
    let assistant = FakeAssistant {
        check_in: CheckInReply {
            feeling_summary: Some("Steady and focused".into()),
            buddy_note: Some("".into()),
        },
        ..Default::default()
    };
    let mut engine = TaskTimerEngine::default();
    for i in 0..12 {
        engine.add_task(&format!("Task {i}"), 1.0).unwrap();
    }

    let check_in = check_in_status(&assistant, engine.tasks(), 8).await.unwrap();

    assert_eq!(check_in.feeling_summary, "Steady and focused");
    assert_eq!(check_in.buddy_note, CheckIn::default().buddy_note);
    match &assistant.calls()[0] {
        Call::CheckIn(snapshot) => {
            assert_eq!(snapshot.len(), 8);
            assert_eq!(snapshot[7].title, "Task 7");
        }
        other => panic!("unexpected call {other:?}"),
    }
}

#[tokio::test]
async fn sprite_set_has_three_moods_and_a_backdrop() {
    let assistant = FakeAssistant {
        description: "a sleepy corgi".into(),
        image: vec![0x89, b'P', b'N', b'G'],
        ..Default::default()
    };

    let set = build_sprite_set(&assistant, &[1, 2, 3], "image/jpeg", 8 * MIB)
        .await
        .unwrap();

    assert_eq!(set.description, "a sleepy corgi");
    assert_eq!(set.for_mood(Mood::Curious), &[0x89, b'P', b'N', b'G'][..]);

    let calls = assistant.calls();
    assert_eq!(calls.len(), 5);
    assert_eq!(
        calls[0],
        Call::Describe {
            len: 3,
            mime_type: "image/jpeg".into()
        }
    );
    let ratios: Vec<AspectRatio> = calls[1..]
        .iter()
        .map(|c| match c {
            Call::Generate { aspect_ratio, .. } => *aspect_ratio,
            other => panic!("unexpected call {other:?}"),
        })
        .collect();
    assert_eq!(
        ratios,
        vec![AspectRatio::Square, AspectRatio::Square, AspectRatio::Square, AspectRatio::Wide]
    );
    assert!(matches!(&calls[1], Call::Generate { prompt, .. } if prompt.contains("a sleepy corgi")));
}

#[tokio::test]
async fn blank_description_uses_fallback() {
    let assistant = FakeAssistant {
        description: "  ".into(),
        image: vec![1],
        ..Default::default()
    };
    let set = build_sprite_set(&assistant, &[1], "image/png", 8 * MIB).await.unwrap();
    assert_eq!(set.description, "a cheerful companion");
}

#[tokio::test]
async fn invalid_photo_makes_no_requests() {
    let assistant = FakeAssistant::default();
    let err = build_sprite_set(&assistant, &[1], "text/plain", 8 * MIB)
        .await
        .unwrap_err();
    assert!(matches!(err, AssistantError::UnsupportedMedia { .. }));
    assert!(assistant.calls().is_empty());
}

#[tokio::test]
async fn empty_generation_fails_the_whole_set() {
    let assistant = FakeAssistant {
        description: "a fox".into(),
        image: Vec::new(),
        ..Default::default()
    };
    let err = build_sprite_set(&assistant, &[1], "image/png", 8 * MIB)
        .await
        .unwrap_err();
    assert!(matches!(err, AssistantError::Generation(_)));
    assert_eq!(assistant.calls().len(), 2);
}
