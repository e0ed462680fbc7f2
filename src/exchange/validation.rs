use regex::Regex;
use std::sync::LazyLock;

use super::errors::ExchangeError;
use super::types::{EventDetails, EventDetailsInput, Participant};

// Deliberately loose: local@domain.tld with no whitespace and a single '@'.
static EMAIL_SHAPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid"));

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_SHAPE.is_match(email)
}

/// Turns the stage-one form into accepted event details.
///
/// Blank fields are reported together with one "fill in all fields" notice.
/// Filled-in values that are out of range get a message naming the field.
pub fn validate_event_details(
    input: &EventDetailsInput,
    min_participants: u32,
) -> Result<EventDetails, ExchangeError> {
    let (Some(participant_count), Some(exchange_date), Some(budget)) = (
        input.participant_count,
        input.exchange_date.as_deref().filter(|d| !d.trim().is_empty()),
        input.budget,
    ) else {
        return Err(ExchangeError::missing_fields());
    };

    if participant_count < min_participants {
        return Err(ExchangeError::Validation {
            reason: format!("A gift exchange needs at least {min_participants} participants"),
        });
    }

    if !budget.is_finite() || budget <= 0.0 {
        return Err(ExchangeError::Validation {
            reason: "Budget must be a positive amount".to_string(),
        });
    }

    Ok(EventDetails {
        participant_count,
        exchange_date: exchange_date.to_string(),
        budget,
    })
}

/// Checks every participant before generation. All entries are checked for
/// completeness first, then all e-mails for shape; the first failure wins.
pub fn validate_participants(participants: &[Participant]) -> Result<(), ExchangeError> {
    if let Some(index) = participants.iter().position(|p| !p.is_complete()) {
        return Err(ExchangeError::IncompleteParticipant { position: index + 1 });
    }

    if let Some((index, participant)) = participants
        .iter()
        .enumerate()
        .find(|(_, p)| !is_valid_email(&p.email))
    {
        return Err(ExchangeError::InvalidEmail {
            position: index + 1,
            email: participant.email.clone(),
        });
    }

    Ok(())
}
