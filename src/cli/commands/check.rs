use anyhow::{bail, Result};
use std::path::PathBuf;

use super::{fill_session, Command, EventFile};
use crate::config::GiftSwapConfig;
use crate::dispatch::dispatcher_from_config;
use crate::exchange::validate_participants;
use crate::workflows::ExchangeCoordinator;

pub struct CheckCommand {
    pub event: PathBuf,
    pub config: GiftSwapConfig,
}

impl CheckCommand {
    pub fn new(event: PathBuf, config: GiftSwapConfig) -> Self {
        Self { event, config }
    }
}

impl Command for CheckCommand {
    async fn execute(&self) -> Result<()> {
        let file = EventFile::load(&self.event)?;
        let coordinator = ExchangeCoordinator::new(
            &self.config.exchange,
            dispatcher_from_config(&self.config.dispatch),
        );

        fill_session(&coordinator, &file).await?;

        let snapshot = coordinator.snapshot().await;
        if let Err(error) = validate_participants(&snapshot.participants) {
            bail!("❌ {error}");
        }

        println!(
            "✅ {} is ready: {} participants",
            self.event.display(),
            snapshot.participants.len()
        );
        Ok(())
    }
}
