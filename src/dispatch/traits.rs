// Notification sink interface - separated so the workflow can be driven
// against fakes in tests

use anyhow::Result;
use async_trait::async_trait;

use crate::exchange::{DispatchPayload, DispatchResponse};

/// Delivers a finished draw to whoever needs to hear about it.
///
/// An `Err` is treated exactly like a `success: false` response.
#[async_trait]
pub trait AssignmentDispatcher: Send + Sync {
    async fn dispatch(&self, payload: &DispatchPayload) -> Result<DispatchResponse>;

    /// Short label used in logs
    fn name(&self) -> &str;
}
