use anyhow::Result;
use async_trait::async_trait;
use tracing::info;

use super::traits::AssignmentDispatcher;
use crate::exchange::{DispatchPayload, DispatchResponse};

/// Prints one notice per giver to stdout.
#[derive(Debug, Default)]
pub struct ConsoleDispatcher;

impl ConsoleDispatcher {
    pub fn new() -> Self {
        Self
    }

    pub fn render_notices(payload: &DispatchPayload) -> Vec<String> {
        let details = &payload.event_details;
        payload
            .assignments
            .iter()
            .map(|assignment| {
                format!(
                    "📧 To {} <{}>: you are buying a gift for {} (budget ${:.2}, exchange on {})",
                    assignment.giver.name,
                    assignment.giver.email,
                    assignment.receiver.name,
                    details.budget,
                    details.formatted_exchange_date(),
                )
            })
            .collect()
    }
}

#[async_trait]
impl AssignmentDispatcher for ConsoleDispatcher {
    async fn dispatch(&self, payload: &DispatchPayload) -> Result<DispatchResponse> {
        for notice in Self::render_notices(payload) {
            println!("{notice}");
        }
        info!(
            assignments = payload.assignments.len(),
            "Printed assignment notices"
        );
        Ok(DispatchResponse::delivered())
    }

    fn name(&self) -> &str {
        "console"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exchange::{Assignment, EventDetails, Participant};

    #[tokio::test]
    async fn test_console_dispatch_reports_success() {
        let payload = DispatchPayload {
            assignments: vec![Assignment {
                giver: Participant::new("Ann", "ann@example.com"),
                receiver: Participant::new("Bob", "bob@example.com"),
            }],
            event_details: EventDetails {
                participant_count: 3,
                exchange_date: "2026-12-20".to_string(),
                budget: 25.0,
            },
        };

        let notices = ConsoleDispatcher::render_notices(&payload);
        assert_eq!(notices.len(), 1);
        assert!(notices[0].contains("Ann <ann@example.com>"));
        assert!(notices[0].contains("gift for Bob"));
        assert!(notices[0].contains("$25.00"));
        assert!(notices[0].contains("December 20, 2026"));

        let response = ConsoleDispatcher::new().dispatch(&payload).await.unwrap();
        assert!(response.success);
    }
}
