//! Session runtime on a paused clock.

mod common;

use std::sync::Arc;
use std::time::Duration;

use common::FakeAssistant;
use focusbuddy_core::pet::PetStatus;
use focusbuddy_core::storage::Config;
use focusbuddy_core::{
    CoreError, DisabledAssistant, Event, NoopNotifier, Session, SessionHandle, SessionRuntime,
    TaskId,
};
use serde_json::json;
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::task::JoinHandle;
use tokio::time::sleep;

type Running = (
    SessionHandle,
    UnboundedReceiver<Event>,
    JoinHandle<Session<NoopNotifier>>,
);

fn start(assistant: Arc<dyn focusbuddy_core::Assistant>) -> Running {
    let mut config = Config::default();
    config.pet.seed = Some(1);
    let session = Session::new(&config, NoopNotifier);
    let (runtime, handle, events) = SessionRuntime::new(session, assistant, &config);
    (handle, events, tokio::spawn(runtime.run()))
}

fn drain(events: &mut UnboundedReceiver<Event>) -> Vec<Event> {
    let mut out = Vec::new();
    while let Ok(event) = events.try_recv() {
        out.push(event);
    }
    out
}

async fn added_id(events: &mut UnboundedReceiver<Event>) -> TaskId {
    loop {
        match events.recv().await {
            Some(Event::TaskAdded { task, .. }) => return task.id(),
            Some(_) => continue,
            None => panic!("event stream closed"),
        }
    }
}

#[tokio::test(start_paused = true)]
async fn timer_runs_out_and_starves_pet() {
    let (handle, mut events, join) = start(Arc::new(DisabledAssistant));

    handle.add_task("Sprint", 0.1).await.unwrap();
    let id = added_id(&mut events).await;
    handle.toggle(id).await.unwrap();

    sleep(Duration::from_secs(7)).await;
    let seen = drain(&mut events);

    assert!(seen.iter().any(|e| matches!(e, Event::TickScheduled { .. })));
    assert!(seen
        .iter()
        .any(|e| matches!(e, Event::TaskCompleted { timed_out: true, points: 0, .. })));
    assert!(seen
        .iter()
        .any(|e| matches!(e, Event::PetFed { status: PetStatus::Hungry, .. })));
    assert!(matches!(seen.last(), Some(Event::TickStopped { .. })));

    handle.shutdown().await.unwrap();
    let session = join.await.unwrap();
    assert!(session.tasks()[0].is_completed());
    assert_eq!(session.pet().hunger_strikes, 1);
}

#[tokio::test(start_paused = true)]
async fn paused_task_does_not_count_down() {
    let (handle, mut events, join) = start(Arc::new(DisabledAssistant));

    handle.add_task("Read", 1.0).await.unwrap();
    let id = added_id(&mut events).await;
    handle.toggle(id).await.unwrap();
    sleep(Duration::from_millis(3500)).await;
    handle.toggle(id).await.unwrap();
    sleep(Duration::from_secs(10)).await;

    handle.shutdown().await.unwrap();
    let session = join.await.unwrap();
    assert_eq!(session.tasks()[0].remaining(), 57);
    assert!(!session.is_ticking());
}

#[tokio::test(start_paused = true)]
async fn remaining_tracks_wall_clock_seconds() {
    let (handle, mut events, join) = start(Arc::new(DisabledAssistant));

    handle.add_task("Outline", 1.0).await.unwrap();
    let id = added_id(&mut events).await;
    handle.toggle(id).await.unwrap();
    sleep(Duration::from_millis(30_500)).await;

    handle.shutdown().await.unwrap();
    let session = join.await.unwrap();
    assert_eq!(session.tasks()[0].remaining(), 30);
    assert!(!session.tasks()[0].is_completed());
}

#[tokio::test(start_paused = true)]
async fn speech_bubble_clears_after_its_duration() {
    let (handle, mut events, join) = start(Arc::new(DisabledAssistant));

    handle.add_task("Write", 1.0).await.unwrap();
    let id = added_id(&mut events).await;
    handle.complete(id).await.unwrap();
    let seen = drain(&mut events);
    assert!(seen
        .iter()
        .any(|e| matches!(e, Event::SpeechChanged { text: Some(_), .. })));

    sleep(Duration::from_millis(4900)).await;
    assert!(drain(&mut events).is_empty());

    sleep(Duration::from_millis(200)).await;
    let seen = drain(&mut events);
    assert!(matches!(seen.as_slice(), [Event::SpeechChanged { text: None, .. }]));

    handle.shutdown().await.unwrap();
    let session = join.await.unwrap();
    assert_eq!(session.speech(), None);
}

#[tokio::test(start_paused = true)]
async fn plan_adds_proposed_tasks() {
    let assistant = FakeAssistant {
        intent: json!({"tasks": [
            {"title": "Stretch", "durationMinutes": 5},
            {"title": "Inbox zero", "durationMinutes": 20}
        ]}),
        ..Default::default()
    };
    let (handle, mut events, join) = start(Arc::new(assistant));

    handle.plan("morning routine").await.unwrap();
    loop {
        match events.recv().await {
            Some(Event::ProposalsApplied { titles, .. }) => {
                assert_eq!(titles, vec!["Stretch".to_string(), "Inbox zero".to_string()]);
                break;
            }
            Some(_) => continue,
            None => panic!("event stream closed"),
        }
    }

    handle.shutdown().await.unwrap();
    assert_eq!(join.await.unwrap().tasks().len(), 2);
}

#[tokio::test(start_paused = true)]
async fn assistant_failure_is_reported_not_fatal() {
    let (handle, mut events, join) = start(Arc::new(DisabledAssistant));

    handle.check_in().await.unwrap();
    loop {
        match events.recv().await {
            Some(Event::AssistantFailed { operation, .. }) => {
                assert_eq!(operation, "check_in");
                break;
            }
            Some(_) => continue,
            None => panic!("event stream closed"),
        }
    }

    handle.add_task("Still works", 1.0).await.unwrap();
    handle.shutdown().await.unwrap();
    assert_eq!(join.await.unwrap().tasks().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn validation_errors_come_back_to_the_caller() {
    let (handle, _events, join) = start(Arc::new(DisabledAssistant));

    let err = handle.add_task("   ", 5.0).await.unwrap_err();
    assert!(matches!(err, CoreError::Validation(_)));
    let err = handle.toggle(TaskId(99)).await.unwrap_err();
    assert!(matches!(err, CoreError::Validation(_)));

    handle.shutdown().await.unwrap();
    join.await.unwrap();
    assert!(matches!(
        handle.snapshot().await,
        Err(CoreError::RuntimeClosed)
    ));
}
