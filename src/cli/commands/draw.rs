use anyhow::{bail, Result};
use std::path::PathBuf;
use tracing::info;

use super::{fill_session, Command, EventFile};
use crate::config::GiftSwapConfig;
use crate::dispatch::dispatcher_from_config;
use crate::observability::exchange_metrics;
use crate::workflows::{ExchangeCoordinator, TransitionResult};

pub struct DrawCommand {
    pub event: PathBuf,
    pub config: GiftSwapConfig,
}

impl DrawCommand {
    pub fn new(event: PathBuf, config: GiftSwapConfig) -> Self {
        Self { event, config }
    }
}

impl Command for DrawCommand {
    async fn execute(&self) -> Result<()> {
        let file = EventFile::load(&self.event)?;
        let dispatcher = dispatcher_from_config(&self.config.dispatch);
        let coordinator = ExchangeCoordinator::new(&self.config.exchange, dispatcher);

        fill_session(&coordinator, &file).await?;

        println!("🎲 Drawing assignments...");
        let result = coordinator.generate_and_dispatch().await;
        let snapshot = coordinator.snapshot().await;
        exchange_metrics().log_stats();

        match result {
            TransitionResult::Success { .. } => {
                println!();
                println!("✅ Assignments sent!");
                if let Some(details) = &snapshot.event_details {
                    println!(
                        "🎁 {} participants will exchange gifts on {} (budget ${:.2})",
                        details.participant_count,
                        details.formatted_exchange_date(),
                        details.budget
                    );
                }
                info!(session_id = %snapshot.session_id, "Exchange confirmed");
                Ok(())
            }
            TransitionResult::Failed { error, .. } => {
                if error.is_transient() {
                    bail!("❌ {error}\n   → Run the draw again to reshuffle");
                }
                bail!("❌ {error}")
            }
            TransitionResult::Refused { stage, reason } => {
                bail!("❌ Draw refused ({reason:?}) while {stage}")
            }
        }
    }
}
