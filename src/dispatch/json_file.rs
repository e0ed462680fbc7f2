use anyhow::{Context, Result};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tracing::info;

use super::traits::AssignmentDispatcher;
use crate::exchange::{DispatchPayload, DispatchResponse};

/// Writes the dispatch payload as pretty JSON, for handing off to a mailer
/// that runs elsewhere.
#[derive(Debug, Clone)]
pub struct JsonFileDispatcher {
    path: PathBuf,
}

impl JsonFileDispatcher {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl AssignmentDispatcher for JsonFileDispatcher {
    async fn dispatch(&self, payload: &DispatchPayload) -> Result<DispatchResponse> {
        let body = serde_json::to_string_pretty(payload)?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("Could not create {}", parent.display()))?;
        }
        tokio::fs::write(&self.path, body)
            .await
            .with_context(|| format!("Could not write assignments to {}", self.path.display()))?;

        info!(
            path = %self.path.display(),
            assignments = payload.assignments.len(),
            "Wrote assignment payload"
        );
        Ok(DispatchResponse::delivered())
    }

    fn name(&self) -> &str {
        "json-file"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exchange::{Assignment, EventDetails, Participant};

    fn payload() -> DispatchPayload {
        DispatchPayload {
            assignments: vec![
                Assignment {
                    giver: Participant::new("Ann", "ann@example.com"),
                    receiver: Participant::new("Bob", "bob@example.com"),
                },
                Assignment {
                    giver: Participant::new("Bob", "bob@example.com"),
                    receiver: Participant::new("Ann", "ann@example.com"),
                },
            ],
            event_details: EventDetails {
                participant_count: 2,
                exchange_date: "2026-12-20".to_string(),
                budget: 15.0,
            },
        }
    }

    #[tokio::test]
    async fn test_writes_payload_json() {
        let dir = std::env::temp_dir().join(format!("gift-swap-{}", uuid::Uuid::new_v4()));
        let path = dir.join("nested").join("assignments.json");
        let dispatcher = JsonFileDispatcher::new(&path);

        let response = dispatcher.dispatch(&payload()).await.unwrap();
        assert!(response.success);

        let written = tokio::fs::read_to_string(&path).await.unwrap();
        let value: serde_json::Value = serde_json::from_str(&written).unwrap();
        assert_eq!(value["eventDetails"]["budget"], 15.0);
        assert_eq!(value["assignments"].as_array().unwrap().len(), 2);

        let _ = tokio::fs::remove_dir_all(&dir).await;
    }

    #[tokio::test]
    async fn test_unwritable_path_is_an_error() {
        let dir = std::env::temp_dir().join(format!("gift-swap-{}", uuid::Uuid::new_v4()));
        tokio::fs::create_dir_all(&dir).await.unwrap();

        // The target is an existing directory, so the write must fail.
        let dispatcher = JsonFileDispatcher::new(&dir);
        let err = dispatcher.dispatch(&payload()).await.unwrap_err();
        assert!(err.to_string().contains("Could not write assignments"));

        let _ = tokio::fs::remove_dir_all(&dir).await;
    }
}
