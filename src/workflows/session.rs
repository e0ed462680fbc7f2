use statig::prelude::*;
use tracing::{info, warn};

use super::state_machine::{current_stage, ExchangeStages, Stage, StageEvent};
use crate::assignment::AssignmentGenerator;
use crate::config::ExchangeConfig;
use crate::exchange::{
    validate_event_details, validate_participants, DispatchPayload, DispatchResponse, EventDetails,
    EventDetailsInput, ExchangeError, Participant, ParticipantField, SessionError,
};
use crate::telemetry::generate_correlation_id;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefusalReason {
    DispatchInProgress,
    WrongStage,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TransitionResult {
    Success { previous_stage: Stage, new_stage: Stage },
    Failed { error: ExchangeError, state_preserved: Stage },
    Refused { reason: RefusalReason, stage: Stage },
}

impl TransitionResult {
    pub fn is_success(&self) -> bool {
        matches!(self, TransitionResult::Success { .. })
    }

    pub fn error(&self) -> Option<&ExchangeError> {
        match self {
            TransitionResult::Failed { error, .. } => Some(error),
            _ => None,
        }
    }
}

/// First half of a dispatch: either a payload ready to hand to the sink, or
/// the transition already settled without reaching it.
#[derive(Debug, Clone, PartialEq)]
pub enum DispatchStep {
    Ready(DispatchPayload),
    Finished(TransitionResult),
}

/// Point-in-time copy of a session for display and assertions.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSnapshot {
    pub session_id: String,
    pub stage: Stage,
    pub event_details: Option<EventDetails>,
    pub participants: Vec<Participant>,
    pub error_message: Option<String>,
    pub dispatch_in_progress: bool,
}

/// All state for one run of the exchange workflow.
///
/// Every operation is synchronous. Dispatch is split in two
/// ([`begin_dispatch`](Self::begin_dispatch) and
/// [`finish_dispatch`](Self::finish_dispatch)) so an async driver can await the
/// sink without holding on to the session.
pub struct ExchangeSession {
    id: String,
    machine: StateMachine<ExchangeStages>,
    min_participants: u32,
    generator: AssignmentGenerator,
    event_details: Option<EventDetails>,
    participants: Vec<Participant>,
    error_message: Option<String>,
    dispatch_in_progress: bool,
}

impl Default for ExchangeSession {
    fn default() -> Self {
        Self::new(&ExchangeConfig::default())
    }
}

impl ExchangeSession {
    pub fn new(settings: &ExchangeConfig) -> Self {
        let id = generate_correlation_id();
        Self {
            machine: ExchangeStages::new(id.clone()).state_machine(),
            id,
            min_participants: settings.min_participants,
            generator: AssignmentGenerator::new(settings.max_attempts),
            event_details: None,
            participants: Vec::new(),
            error_message: None,
            dispatch_in_progress: false,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn stage(&self) -> Stage {
        current_stage(&self.machine)
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    pub fn is_dispatching(&self) -> bool {
        self.dispatch_in_progress
    }

    pub fn event_details(&self) -> Option<&EventDetails> {
        self.event_details.as_ref()
    }

    pub fn participants(&self) -> &[Participant] {
        &self.participants
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            session_id: self.id.clone(),
            stage: self.stage(),
            event_details: self.event_details.clone(),
            participants: self.participants.clone(),
            error_message: self.error_message.clone(),
            dispatch_in_progress: self.dispatch_in_progress,
        }
    }

    /// Accepts stage-one details and sizes the participant list.
    ///
    /// Re-submitting from the participants stage resizes the list, keeping
    /// entries that still fit.
    pub fn submit_event_details(&mut self, input: &EventDetailsInput) -> TransitionResult {
        let previous_stage = self.stage();

        if self.dispatch_in_progress {
            return self.refuse(RefusalReason::DispatchInProgress, "submit_event_details");
        }
        if previous_stage == Stage::Confirmed {
            return self.refuse(RefusalReason::WrongStage, "submit_event_details");
        }

        let details = match validate_event_details(input, self.min_participants) {
            Ok(details) => details,
            Err(error) => return self.fail(error),
        };

        let count = details.participant_count;
        self.participants.truncate(count as usize);
        self.participants.resize_with(count as usize, Participant::default);
        self.event_details = Some(details);
        self.error_message = None;

        self.machine.handle(&StageEvent::EventDetailsAccepted {
            participant_count: count,
        });

        TransitionResult::Success {
            previous_stage,
            new_stage: self.stage(),
        }
    }

    /// Overwrites one field of one participant. No validation happens here.
    pub fn update_participant(
        &mut self,
        index: usize,
        field: ParticipantField,
        value: impl Into<String>,
    ) -> Result<(), SessionError> {
        const OPERATION: &str = "update_participant";

        if self.dispatch_in_progress {
            return Err(SessionError::DispatchInProgress { operation: OPERATION });
        }
        let stage = self.stage();
        if stage != Stage::CollectingParticipants {
            return Err(SessionError::WrongStage {
                operation: OPERATION,
                stage,
            });
        }

        let len = self.participants.len();
        let participant = self
            .participants
            .get_mut(index)
            .ok_or(SessionError::ParticipantIndexOutOfRange { index, len })?;

        match field {
            ParticipantField::Name => participant.name = value.into(),
            ParticipantField::Email => participant.email = value.into(),
        }
        Ok(())
    }

    /// Validates participants and draws assignments. On success the session
    /// is marked as dispatching and the payload is returned for delivery.
    pub fn begin_dispatch(&mut self) -> DispatchStep {
        if self.dispatch_in_progress {
            return DispatchStep::Finished(
                self.refuse(RefusalReason::DispatchInProgress, "generate_and_dispatch"),
            );
        }

        let Some(event_details) = self
            .event_details
            .clone()
            .filter(|_| self.stage() == Stage::CollectingParticipants)
        else {
            return DispatchStep::Finished(
                self.refuse(RefusalReason::WrongStage, "generate_and_dispatch"),
            );
        };

        if let Err(error) = validate_participants(&self.participants) {
            return DispatchStep::Finished(self.fail(error));
        }

        self.dispatch_in_progress = true;
        self.error_message = None;

        match self.generator.generate(&self.participants) {
            Ok(assignments) => {
                info!(
                    session_id = %self.id,
                    assignments = assignments.len(),
                    "Assignments drawn, dispatching"
                );
                DispatchStep::Ready(DispatchPayload {
                    assignments,
                    event_details,
                })
            }
            Err(error) => {
                self.dispatch_in_progress = false;
                DispatchStep::Finished(self.fail(error))
            }
        }
    }

    /// Settles an outstanding dispatch with whatever the sink reported.
    pub fn finish_dispatch(
        &mut self,
        outcome: anyhow::Result<DispatchResponse>,
    ) -> TransitionResult {
        if !self.dispatch_in_progress {
            return self.refuse(RefusalReason::WrongStage, "finish_dispatch");
        }
        self.dispatch_in_progress = false;

        let previous_stage = self.stage();
        match outcome {
            Ok(DispatchResponse { success: true, .. }) => {
                self.error_message = None;
                self.machine.handle(&StageEvent::DispatchSucceeded {
                    assignments: self.participants.len(),
                });
                TransitionResult::Success {
                    previous_stage,
                    new_stage: self.stage(),
                }
            }
            Ok(DispatchResponse { success: false, message }) => {
                self.fail(ExchangeError::dispatch(message.as_deref()))
            }
            Err(e) => self.fail(ExchangeError::dispatch(Some(&e.to_string()))),
        }
    }

    fn fail(&mut self, error: ExchangeError) -> TransitionResult {
        let stage = self.stage();
        warn!(session_id = %self.id, stage = %stage, error = %error, "Transition failed");
        self.error_message = Some(error.to_string());
        TransitionResult::Failed {
            error,
            state_preserved: stage,
        }
    }

    fn refuse(&self, reason: RefusalReason, operation: &str) -> TransitionResult {
        let stage = self.stage();
        warn!(
            session_id = %self.id,
            stage = %stage,
            reason = ?reason,
            operation = operation,
            "Transition refused"
        );
        TransitionResult::Refused { reason, stage }
    }
}
