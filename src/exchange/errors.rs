use thiserror::Error;

use crate::workflows::Stage;

pub const FILL_ALL_FIELDS: &str = "Please fill in all fields";
pub const DISPATCH_FALLBACK: &str = "Failed to send assignments. Please try again.";
pub const DISPATCH_INTERRUPTED: &str =
    "Sending assignments was interrupted before the sink answered. Please try again.";

/// User-visible failures. The `Display` text is what the session shows as its
/// error message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExchangeError {
    #[error("{reason}")]
    Validation { reason: String },
    #[error("Please fill in the name and email for participant {position}")]
    IncompleteParticipant { position: usize },
    #[error("Please enter a valid email address for participant {position} ({email})")]
    InvalidEmail { position: usize, email: String },
    #[error("Could not generate valid assignments after {attempts} attempts. Please try again.")]
    AssignmentExhausted { attempts: u32 },
    #[error("{message}")]
    DispatchFailure { message: String },
}

impl ExchangeError {
    pub fn missing_fields() -> Self {
        ExchangeError::Validation {
            reason: FILL_ALL_FIELDS.to_string(),
        }
    }

    /// Builds a dispatch failure, falling back to the generic notice when the
    /// sink gave no usable message. A usable message is kept as sent.
    pub fn dispatch(message: Option<&str>) -> Self {
        let message = message
            .filter(|m| !m.trim().is_empty())
            .unwrap_or(DISPATCH_FALLBACK);
        ExchangeError::DispatchFailure {
            message: message.to_string(),
        }
    }

    /// Failures worth retrying with the same input.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            ExchangeError::AssignmentExhausted { .. } | ExchangeError::DispatchFailure { .. }
        )
    }
}

/// Caller contract violations. These never become a session error message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("participant index {index} out of range (session has {len} participants)")]
    ParticipantIndexOutOfRange { index: usize, len: usize },
    #[error("{operation} is not allowed while the session is {stage}")]
    WrongStage { operation: &'static str, stage: Stage },
    #[error("{operation} is not allowed while assignments are being dispatched")]
    DispatchInProgress { operation: &'static str },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dispatch_failure_fallback() {
        assert_eq!(
            ExchangeError::dispatch(None).to_string(),
            "Failed to send assignments. Please try again."
        );
        assert_eq!(ExchangeError::dispatch(Some("  ")).to_string(), DISPATCH_FALLBACK);
        assert_eq!(
            ExchangeError::dispatch(Some("quota exceeded")).to_string(),
            "quota exceeded"
        );
    }

    #[test]
    fn test_dispatch_failure_keeps_sink_text_untrimmed() {
        assert_eq!(
            ExchangeError::dispatch(Some("  quota exceeded\n")),
            ExchangeError::DispatchFailure {
                message: "  quota exceeded\n".to_string()
            }
        );
    }

    #[test]
    fn test_transient_classification() {
        assert!(ExchangeError::AssignmentExhausted { attempts: 100 }.is_transient());
        assert!(ExchangeError::dispatch(None).is_transient());
        assert!(!ExchangeError::missing_fields().is_transient());
        assert!(!ExchangeError::IncompleteParticipant { position: 1 }.is_transient());
    }
}
