use serde::{Deserialize, Serialize};
use std::fmt;

/// Raw stage-one form as entered by the organiser. Every field is optional so
/// that "left blank" can be told apart from "filled in with a bad value".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventDetailsInput {
    pub participant_count: Option<u32>,
    pub exchange_date: Option<String>,
    pub budget: Option<f64>,
}

impl EventDetailsInput {
    pub fn new(participant_count: u32, exchange_date: impl Into<String>, budget: f64) -> Self {
        Self {
            participant_count: Some(participant_count),
            exchange_date: Some(exchange_date.into()),
            budget: Some(budget),
        }
    }
}

/// Accepted event details. Read-only once assignment generation begins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventDetails {
    pub participant_count: u32,
    pub exchange_date: String,
    pub budget: f64,
}

impl EventDetails {
    /// Human-readable date for the confirmation screen. Dates in `YYYY-MM-DD`
    /// form are spelled out, anything else is shown as entered.
    pub fn formatted_exchange_date(&self) -> String {
        match chrono::NaiveDate::parse_from_str(self.exchange_date.trim(), "%Y-%m-%d") {
            Ok(date) => date.format("%B %-d, %Y").to_string(),
            Err(_) => self.exchange_date.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Participant {
    pub name: String,
    pub email: String,
}

impl Participant {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
        }
    }

    pub fn is_complete(&self) -> bool {
        !self.name.is_empty() && !self.email.is_empty()
    }
}

/// Editable participant field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParticipantField {
    Name,
    Email,
}

impl fmt::Display for ParticipantField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParticipantField::Name => write!(f, "name"),
            ParticipantField::Email => write!(f, "email"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    pub giver: Participant,
    pub receiver: Participant,
}

/// Body handed to the notification sink.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DispatchPayload {
    pub assignments: Vec<Assignment>,
    pub event_details: EventDetails,
}

/// What the notification sink reports back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatchResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl DispatchResponse {
    pub fn delivered() -> Self {
        Self {
            success: true,
            message: None,
        }
    }

    pub fn rejected(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
        }
    }
}
