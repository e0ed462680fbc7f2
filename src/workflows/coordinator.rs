use anyhow::anyhow;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{info, warn, Instrument};

use super::session::{DispatchStep, ExchangeSession, SessionSnapshot, TransitionResult};
use crate::config::ExchangeConfig;
use crate::dispatch::AssignmentDispatcher;
use crate::exchange::errors::DISPATCH_INTERRUPTED;
use crate::exchange::{DispatchResponse, EventDetailsInput, ParticipantField, SessionError};
use crate::observability::{exchange_metrics, OperationTimer};
use crate::telemetry::create_session_span;

/// Drives one [`ExchangeSession`] against a notification sink.
///
/// The session sits behind a single lock that is released while the sink is
/// being awaited, so a second `generate_and_dispatch` arriving in that window
/// sees the dispatch flag and is refused rather than queued.
#[derive(Clone)]
pub struct ExchangeCoordinator {
    session: Arc<Mutex<ExchangeSession>>,
    dispatcher: Arc<dyn AssignmentDispatcher>,
    dispatch_timeout: Option<Duration>,
}

impl ExchangeCoordinator {
    pub fn new(settings: &ExchangeConfig, dispatcher: Arc<dyn AssignmentDispatcher>) -> Self {
        let dispatch_timeout = match settings.dispatch_timeout_seconds {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        };

        Self {
            session: Arc::new(Mutex::new(ExchangeSession::new(settings))),
            dispatcher,
            dispatch_timeout,
        }
    }

    pub async fn snapshot(&self) -> SessionSnapshot {
        self.session.lock().await.snapshot()
    }

    pub async fn submit_event_details(&self, input: &EventDetailsInput) -> TransitionResult {
        self.session.lock().await.submit_event_details(input)
    }

    pub async fn update_participant(
        &self,
        index: usize,
        field: ParticipantField,
        value: impl Into<String>,
    ) -> Result<(), SessionError> {
        self.session.lock().await.update_participant(index, field, value)
    }

    /// Validates, draws and dispatches. Every failure is settled on the
    /// session as an error message and reported in the returned result.
    pub async fn generate_and_dispatch(&self) -> TransitionResult {
        let (step, session_id) = {
            let mut session = self.session.lock().await;
            (session.begin_dispatch(), session.id().to_string())
        };

        let payload = match step {
            DispatchStep::Ready(payload) => payload,
            DispatchStep::Finished(result) => {
                if matches!(result, TransitionResult::Refused { .. }) {
                    exchange_metrics().record_refusal();
                }
                return result;
            }
        };

        let pending = PendingDispatch::new(Arc::clone(&self.session), session_id.clone());
        let span = create_session_span(
            "dispatch_assignments",
            &session_id,
            Some(payload.assignments.len()),
        );

        let outcome = async {
            exchange_metrics().record_dispatch_attempt();
            let timer = OperationTimer::new("dispatch_assignments");
            info!(sink = self.dispatcher.name(), "Handing assignments to sink");

            let delivery = self.dispatcher.dispatch(&payload);
            let outcome = match self.dispatch_timeout {
                Some(limit) => match tokio::time::timeout(limit, delivery).await {
                    Ok(outcome) => outcome,
                    Err(_) => {
                        warn!(timeout_secs = limit.as_secs(), "Dispatch timed out");
                        Err(anyhow!(
                            "Timed out after {}s waiting for assignments to be sent. Please try again.",
                            limit.as_secs()
                        ))
                    }
                },
                None => delivery.await,
            };

            timer.finish();
            outcome
        }
        .instrument(span)
        .await;

        let result = pending.settle(outcome).await;
        if result.is_success() {
            exchange_metrics().record_dispatch_success();
        } else {
            exchange_metrics().record_dispatch_failure();
        }
        result
    }
}

/// A dispatch that has set the session's flag but not yet reported back.
///
/// If the `generate_and_dispatch` future is dropped while the sink is being
/// awaited (an outer timeout, a lost `select!`, an aborted task), dropping this
/// settles the session as a failed dispatch so the flag is cleared.
struct PendingDispatch {
    session: Arc<Mutex<ExchangeSession>>,
    session_id: String,
    settled: bool,
}

impl PendingDispatch {
    fn new(session: Arc<Mutex<ExchangeSession>>, session_id: String) -> Self {
        Self {
            session,
            session_id,
            settled: false,
        }
    }

    async fn settle(mut self, outcome: anyhow::Result<DispatchResponse>) -> TransitionResult {
        let mut session = self.session.lock().await;
        self.settled = true;
        session.finish_dispatch(outcome)
    }
}

impl Drop for PendingDispatch {
    fn drop(&mut self) {
        if self.settled {
            return;
        }

        warn!(session_id = %self.session_id, "Dispatch dropped before the sink answered");
        exchange_metrics().record_dispatch_failure();

        match self.session.try_lock() {
            Ok(mut session) => {
                session.finish_dispatch(Err(anyhow!(DISPATCH_INTERRUPTED)));
            }
            Err(_) => {
                // Someone else holds the lock; settle once they let go.
                let session = Arc::clone(&self.session);
                match tokio::runtime::Handle::try_current() {
                    Ok(handle) => {
                        handle.spawn(async move {
                            session
                                .lock()
                                .await
                                .finish_dispatch(Err(anyhow!(DISPATCH_INTERRUPTED)));
                        });
                    }
                    Err(_) => warn!(
                        session_id = %self.session_id,
                        "No runtime to settle the dropped dispatch on"
                    ),
                }
            }
        }
    }
}
