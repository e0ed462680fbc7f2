/// Test fixtures: fake notification sinks and ready-made sessions
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

use gift_swap::{
    AssignmentDispatcher, DispatchPayload, DispatchResponse, EventDetailsInput, ExchangeConfig,
    ExchangeCoordinator, Participant, ParticipantField,
};

/// How a fake sink answers.
#[derive(Debug, Clone)]
pub enum SinkReply {
    Respond(DispatchResponse),
    Fail(String),
    /// Wait until released, then report success
    WaitForRelease,
    /// Never resolve
    Hang,
}

/// Sink that records every payload it is handed.
#[derive(Debug)]
pub struct RecordingDispatcher {
    reply: SinkReply,
    calls: AtomicUsize,
    payloads: Mutex<Vec<DispatchPayload>>,
    release: Notify,
    entered: Notify,
}

impl RecordingDispatcher {
    pub fn new(reply: SinkReply) -> Arc<Self> {
        Arc::new(Self {
            reply,
            calls: AtomicUsize::new(0),
            payloads: Mutex::new(Vec::new()),
            release: Notify::new(),
            entered: Notify::new(),
        })
    }

    pub fn succeeding() -> Arc<Self> {
        Self::new(SinkReply::Respond(DispatchResponse::delivered()))
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn payloads(&self) -> Vec<DispatchPayload> {
        self.payloads.lock().unwrap().clone()
    }

    /// Let a `WaitForRelease` dispatch finish.
    pub fn release(&self) {
        self.release.notify_one();
    }

    /// Resolves once a dispatch has started.
    pub async fn wait_until_entered(&self) {
        self.entered.notified().await;
    }
}

#[async_trait]
impl AssignmentDispatcher for RecordingDispatcher {
    async fn dispatch(&self, payload: &DispatchPayload) -> Result<DispatchResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.payloads.lock().unwrap().push(payload.clone());
        self.entered.notify_one();

        match &self.reply {
            SinkReply::Respond(response) => Ok(response.clone()),
            SinkReply::Fail(message) => Err(anyhow!(message.clone())),
            SinkReply::WaitForRelease => {
                self.release.notified().await;
                Ok(DispatchResponse::delivered())
            }
            SinkReply::Hang => std::future::pending().await,
        }
    }

    fn name(&self) -> &str {
        "recording"
    }
}

pub fn participants(n: usize) -> Vec<Participant> {
    (0..n)
        .map(|i| Participant::new(format!("Friend {i}"), format!("friend{i}@example.com")))
        .collect()
}

pub fn event_input(count: u32) -> EventDetailsInput {
    EventDetailsInput::new(count, "2026-12-20", 25.0)
}

/// Coordinator that has passed the event stage with every participant filled in.
pub async fn ready_coordinator(
    settings: &ExchangeConfig,
    dispatcher: Arc<RecordingDispatcher>,
    people: &[Participant],
) -> ExchangeCoordinator {
    let coordinator = ExchangeCoordinator::new(settings, dispatcher);
    assert!(coordinator
        .submit_event_details(&event_input(people.len() as u32))
        .await
        .is_success());

    for (i, person) in people.iter().enumerate() {
        coordinator
            .update_participant(i, ParticipantField::Name, person.name.as_str())
            .await
            .unwrap();
        coordinator
            .update_participant(i, ParticipantField::Email, person.email.as_str())
            .await
            .unwrap();
    }
    coordinator
}
