//! HTTP assistant client against a mock server.

use std::time::Duration;

use focusbuddy_core::assistant::{
    check_in_status, describe_image, generate_image, interpret_task_intent, AspectRatio,
    TaskProposal,
};
use focusbuddy_core::{AssistantError, RemoteAssistant, TaskTimerEngine};
use mockito::{Matcher, Server};
use serde_json::json;

fn client(server: &Server) -> RemoteAssistant {
    RemoteAssistant::new(&server.url(), Duration::from_secs(5)).unwrap()
}

#[tokio::test]
async fn task_intent_posts_prompt_and_normalizes_reply() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/task-intent")
        .match_body(Matcher::PartialJson(json!({"prompt": "clean the kitchen"})))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{"tasks":[{"title":"Dishes","durationMinutes":15},{"title":"Floor","durationMinutes":"10"}]}"#,
        )
        .create_async()
        .await;

    let proposals = interpret_task_intent(&client(&server), "clean the kitchen", 4)
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(
        proposals,
        vec![TaskProposal::new("Dishes", 15.0), TaskProposal::new("Floor", 10.0)]
    );
}

#[tokio::test]
async fn task_intent_422_is_an_interpretation_error() {
    let mut server = Server::new_async().await;
    let _m = server
        .mock("POST", "/task-intent")
        .with_status(422)
        .with_header("content-type", "application/json")
        .with_body(r#"{"error":"Could not understand the task."}"#)
        .create_async()
        .await;

    let err = interpret_task_intent(&client(&server), "???", 4).await.unwrap_err();
    assert!(matches!(err, AssistantError::Interpretation(msg) if msg == "Could not understand the task."));
}

#[tokio::test]
async fn server_error_is_a_transport_error() {
    let mut server = Server::new_async().await;
    let _m = server
        .mock("POST", "/task-intent")
        .with_status(500)
        .with_body("boom")
        .create_async()
        .await;

    let err = interpret_task_intent(&client(&server), "plan", 4).await.unwrap_err();
    assert!(matches!(err, AssistantError::Transport(msg) if msg.contains("500")));
}

#[tokio::test]
async fn bear_status_sends_task_snapshot() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/bear-status")
        .match_body(Matcher::PartialJson(json!({
            "tasksSnapshot": [{"title": "Read", "isRunning": false, "isCompleted": false, "duration": 60, "remaining": 60}]
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"feelingSummary":"Curious about the day","buddyNote":"Pick one thing."}"#)
        .create_async()
        .await;

    let mut engine = TaskTimerEngine::default();
    engine.add_task("Read", 1.0).unwrap();
    let check_in = check_in_status(&client(&server), engine.tasks(), 8).await.unwrap();

    mock.assert_async().await;
    assert_eq!(check_in.feeling_summary, "Curious about the day");
    assert_eq!(check_in.buddy_note, "Pick one thing.");
}

#[tokio::test]
async fn describe_image_sends_base64_photo() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/describe-image")
        .match_body(Matcher::PartialJson(json!({"mimeType": "image/png", "data": "AQID"})))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"description":"a round hamster"}"#)
        .create_async()
        .await;

    let description = describe_image(&client(&server), &[1, 2, 3], "image/png", 1024)
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(description, "a round hamster");
}

#[tokio::test]
async fn generate_image_decodes_bytes() {
    let mut server = Server::new_async().await;
    let _m = server
        .mock("POST", "/generate-image")
        .match_body(Matcher::PartialJson(json!({"aspectRatio": "16:9"})))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"imageBytes":"AQID"}"#)
        .create_async()
        .await;

    let bytes = generate_image(&client(&server), "backdrop", AspectRatio::Wide)
        .await
        .unwrap();
    assert_eq!(bytes, vec![1, 2, 3]);
}

#[tokio::test]
async fn generate_image_without_bytes_fails() {
    let mut server = Server::new_async().await;
    let _m = server
        .mock("POST", "/generate-image")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{}"#)
        .create_async()
        .await;

    let err = generate_image(&client(&server), "sprite", AspectRatio::Square)
        .await
        .unwrap_err();
    assert!(matches!(err, AssistantError::Generation(_)));
}
