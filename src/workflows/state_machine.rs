use serde::{Deserialize, Serialize};
use statig::prelude::*;
use std::fmt;

/// Public view of where a session is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Stage {
    CollectingEvent,
    CollectingParticipants,
    Confirmed,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::CollectingEvent => write!(f, "collecting event details"),
            Stage::CollectingParticipants => write!(f, "collecting participants"),
            Stage::Confirmed => write!(f, "confirmed"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StageEvent {
    EventDetailsAccepted { participant_count: u32 },
    DispatchSucceeded { assignments: usize },
}

/// Stage bookkeeping for one session. Validation and dispatch live in the
/// session; this only decides which edges exist.
#[derive(Debug, Default)]
pub struct ExchangeStages {
    pub session_id: String,
}

impl ExchangeStages {
    pub fn new(session_id: String) -> Self {
        Self { session_id }
    }
}

#[state_machine(initial = "State::collecting_event()", state(derive(Debug, Clone, PartialEq, Eq)))]
impl ExchangeStages {
    #[state]
    fn collecting_event(&mut self, event: &StageEvent) -> Outcome<State> {
        match event {
            StageEvent::EventDetailsAccepted { participant_count } => {
                tracing::info!(
                    session_id = %self.session_id,
                    participant_count = %participant_count,
                    "Event details accepted"
                );
                Transition(State::collecting_participants())
            }
            _ => Handled,
        }
    }

    #[state]
    fn collecting_participants(&mut self, event: &StageEvent) -> Outcome<State> {
        match event {
            StageEvent::EventDetailsAccepted { participant_count } => {
                tracing::info!(
                    session_id = %self.session_id,
                    participant_count = %participant_count,
                    "Event details revised"
                );
                Handled
            }
            StageEvent::DispatchSucceeded { assignments } => {
                tracing::info!(
                    session_id = %self.session_id,
                    assignments = %assignments,
                    "Assignments dispatched"
                );
                Transition(State::confirmed())
            }
        }
    }

    #[state]
    fn confirmed(&mut self, event: &StageEvent) -> Outcome<State> {
        tracing::debug!(
            session_id = %self.session_id,
            event = ?event,
            "Session already confirmed, ignoring event"
        );
        Handled
    }
}

/// Reads the public stage off a running machine.
pub fn current_stage(sm: &StateMachine<ExchangeStages>) -> Stage {
    match sm.state() {
        State::CollectingEvent { .. } => Stage::CollectingEvent,
        State::CollectingParticipants { .. } => Stage::CollectingParticipants,
        State::Confirmed { .. } => Stage::Confirmed,
    }
}
