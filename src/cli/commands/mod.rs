use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::path::Path;

use crate::exchange::{EventDetailsInput, Participant, ParticipantField};
use crate::workflows::{ExchangeCoordinator, TransitionResult};

pub mod check;
pub mod draw;

#[allow(async_fn_in_trait)]
pub trait Command {
    async fn execute(&self) -> Result<()>;
}

/// On-disk form of one exchange.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EventFile {
    #[serde(default)]
    pub event: EventDetailsInput,
    #[serde(default)]
    pub participants: Vec<Participant>,
}

impl EventFile {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Could not read event file {}", path.display()))?;
        Self::parse(&text).with_context(|| format!("Invalid event file {}", path.display()))
    }

    pub fn parse(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }
}

/// Runs the event and participant stages of a session from an event file.
/// Leaves the coordinator ready for `generate_and_dispatch`.
pub async fn fill_session(coordinator: &ExchangeCoordinator, file: &EventFile) -> Result<()> {
    match coordinator.submit_event_details(&file.event).await {
        TransitionResult::Success { .. } => {}
        TransitionResult::Failed { error, .. } => bail!("❌ {error}"),
        TransitionResult::Refused { stage, .. } => bail!("❌ Event details refused while {stage}"),
    }

    let expected = coordinator.snapshot().await.participants.len();
    if file.participants.len() > expected {
        bail!(
            "❌ Event file lists {} participants but participant_count is {}",
            file.participants.len(),
            expected
        );
    }

    for (index, participant) in file.participants.iter().enumerate() {
        coordinator
            .update_participant(index, ParticipantField::Name, participant.name.as_str())
            .await?;
        coordinator
            .update_participant(index, ParticipantField::Email, participant.email.as_str())
            .await?;
    }
    Ok(())
}

pub async fn show_how_to_get_started() -> Result<()> {
    println!("🎁 gift-swap - Gift exchange draws");
    println!();
    println!("To get started:");
    println!("  🔍 gift-swap check --event event.toml   # Validate your event file");
    println!("  🎲 gift-swap draw --event event.toml    # Draw and send assignments");
    println!();
    println!("Event file layout:");
    println!("  [event]");
    println!("  participant_count = 3");
    println!("  exchange_date = \"2026-12-20\"");
    println!("  budget = 25.0");
    println!();
    println!("  [[participants]]");
    println!("  name = \"Alice\"");
    println!("  email = \"alice@example.com\"");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ExchangeConfig;
    use crate::dispatch::ConsoleDispatcher;
    use crate::exchange::ExchangeError;
    use crate::workflows::Stage;
    use std::sync::Arc;

    fn coordinator() -> ExchangeCoordinator {
        ExchangeCoordinator::new(&ExchangeConfig::default(), Arc::new(ConsoleDispatcher::new()))
    }

    #[test]
    fn test_parse_event_file() {
        let file = EventFile::parse(
            r#"
            [event]
            participant_count = 3
            exchange_date = "2026-12-20"
            budget = 25.0

            [[participants]]
            name = "Alice"
            email = "alice@example.com"

            [[participants]]
            name = "Bob"
            "#,
        )
        .unwrap();

        assert_eq!(file.event, EventDetailsInput::new(3, "2026-12-20", 25.0));
        assert_eq!(file.participants.len(), 2);
        assert_eq!(file.participants[1].email, "");
    }

    #[test]
    fn test_missing_event_fields_parse_as_blank() {
        let file = EventFile::parse("[event]\nparticipant_count = 4\n").unwrap();
        assert_eq!(file.event.participant_count, Some(4));
        assert!(file.event.budget.is_none());
        assert!(file.participants.is_empty());
    }

    #[tokio::test]
    async fn test_fill_session_rejects_surplus_participants() {
        let file = EventFile::parse(
            r#"
            [event]
            participant_count = 3
            exchange_date = "2026-12-20"
            budget = 25.0

            [[participants]]
            name = "A"
            email = "a@example.com"
            [[participants]]
            name = "B"
            email = "b@example.com"
            [[participants]]
            name = "C"
            email = "c@example.com"
            [[participants]]
            name = "D"
            email = "d@example.com"
            "#,
        )
        .unwrap();
        let coordinator = coordinator();

        let err = fill_session(&coordinator, &file).await.unwrap_err();

        assert!(err
            .to_string()
            .contains("Event file lists 4 participants but participant_count is 3"));
        let snapshot = coordinator.snapshot().await;
        assert!(snapshot.participants.iter().all(|p| p.name.is_empty()));
    }

    #[tokio::test]
    async fn test_short_participant_list_fails_at_draw() {
        let file = EventFile::parse(
            r#"
            [event]
            participant_count = 3
            exchange_date = "2026-12-20"
            budget = 25.0

            [[participants]]
            name = "A"
            email = "a@example.com"
            [[participants]]
            name = "B"
            email = "b@example.com"
            "#,
        )
        .unwrap();
        let coordinator = coordinator();

        fill_session(&coordinator, &file).await.unwrap();
        let result = coordinator.generate_and_dispatch().await;

        assert_eq!(
            result.error(),
            Some(&ExchangeError::IncompleteParticipant { position: 3 })
        );
        assert_eq!(coordinator.snapshot().await.stage, Stage::CollectingParticipants);
    }

    #[tokio::test]
    async fn test_fill_session_reports_event_validation() {
        let file = EventFile::parse("[event]\nparticipant_count = 3\n").unwrap();

        let err = fill_session(&coordinator(), &file).await.unwrap_err();

        assert!(err.to_string().contains("Please fill in all fields"));
    }
}
