use anyhow::Result;
use clap::Parser;

use gift_swap::cli::commands::{check::CheckCommand, draw::DrawCommand, Command};
use gift_swap::cli::{Cli, Commands};
use gift_swap::{config, init_config, init_telemetry};

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = config()?.clone();
    init_telemetry(&config.observability)?;
    init_config()?;

    tokio::runtime::Runtime::new()?.block_on(async {
        match cli.command {
            None => gift_swap::cli::commands::show_how_to_get_started().await,
            Some(Commands::Draw {
                event,
                sink,
                output,
            }) => {
                if let Some(sink) = sink {
                    config.dispatch.sink = sink;
                }
                if let Some(output) = output {
                    config.dispatch.output_path = output.display().to_string();
                }
                DrawCommand::new(event, config).execute().await
            }
            Some(Commands::Check { event }) => CheckCommand::new(event, config).execute().await,
        }
    })
}
