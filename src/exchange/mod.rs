// Gift exchange domain: event details, participants, assignments and the
// checks applied to them before a draw.

pub mod errors;
pub mod types;
pub mod validation;

pub use errors::{ExchangeError, SessionError};
pub use types::{
    Assignment, DispatchPayload, DispatchResponse, EventDetails, EventDetailsInput, Participant,
    ParticipantField,
};
pub use validation::{is_valid_email, validate_event_details, validate_participants};
