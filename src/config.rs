use anyhow::Result;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main configuration structure for gift-swap
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct GiftSwapConfig {
    /// Draw and workflow settings
    pub exchange: ExchangeConfig,
    /// Where finished draws are sent
    pub dispatch: DispatchConfig,
    /// Logging settings
    pub observability: ObservabilityConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ExchangeConfig {
    /// Smallest participant count accepted at the event stage
    pub min_participants: u32,
    /// Shuffles tried before giving up on a derangement
    pub max_attempts: u32,
    /// Upper bound on waiting for the sink; 0 waits forever
    pub dispatch_timeout_seconds: u64,
}

impl Default for ExchangeConfig {
    fn default() -> Self {
        Self {
            min_participants: 3,
            max_attempts: 100,
            dispatch_timeout_seconds: 60,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SinkKind {
    /// Print one notice per giver
    Console,
    /// Write the payload as JSON
    File,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct DispatchConfig {
    pub sink: SinkKind,
    /// Target for the file sink
    pub output_path: String,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            sink: SinkKind::Console,
            output_path: "gift-swap-assignments.json".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ObservabilityConfig {
    /// Log level used when RUST_LOG is unset
    pub log_level: String,
    /// Emit JSON lines instead of plain text
    pub json_logs: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json_logs: false,
        }
    }
}

impl GiftSwapConfig {
    /// Load configuration from multiple sources with precedence:
    /// 1. Default values
    /// 2. Configuration files (gift-swap.toml, .gift-swap-rc)
    /// 3. Environment variables (GIFT_SWAP__EXCHANGE__MAX_ATTEMPTS=50)
    pub fn load() -> Result<Self> {
        let mut builder = Config::builder().add_source(Config::try_from(&Self::default())?);

        if Path::new("gift-swap.toml").exists() {
            builder = builder.add_source(File::with_name("gift-swap"));
        }

        if Path::new(".gift-swap-rc").exists() {
            builder = builder.add_source(
                File::with_name(".gift-swap-rc").format(config::FileFormat::Toml),
            );
        }

        builder = builder.add_source(
            Environment::with_prefix("GIFT_SWAP")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build()?;
        Ok(config.try_deserialize()?)
    }

    /// Save configuration to file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let toml_content = toml::to_string_pretty(self)?;
        std::fs::write(path, toml_content)?;
        Ok(())
    }

    /// Load .env file if it exists
    pub fn load_env_file() -> Result<()> {
        if Path::new(".env").exists() {
            dotenvy::dotenv()?;
            tracing::info!("Loaded environment variables from .env file");
        }
        Ok(())
    }
}

/// Global configuration instance
static CONFIG: std::sync::LazyLock<Result<GiftSwapConfig, anyhow::Error>> =
    std::sync::LazyLock::new(|| {
        let _ = GiftSwapConfig::load_env_file();
        GiftSwapConfig::load()
    });

/// Get the global configuration
pub fn config() -> Result<&'static GiftSwapConfig> {
    CONFIG
        .as_ref()
        .map_err(|e| anyhow::anyhow!("Failed to load configuration: {}", e))
}

/// Initialize configuration (called at startup)
pub fn init_config() -> Result<()> {
    let config = config()?;
    tracing::info!(
        sink = ?config.dispatch.sink,
        max_attempts = config.exchange.max_attempts,
        dispatch_timeout_secs = config.exchange.dispatch_timeout_seconds,
        "Configuration loaded successfully"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = GiftSwapConfig::default();
        assert_eq!(config.exchange.min_participants, 3);
        assert_eq!(config.exchange.max_attempts, 100);
        assert_eq!(config.exchange.dispatch_timeout_seconds, 60);
        assert_eq!(config.dispatch.sink, SinkKind::Console);
        assert_eq!(config.observability.log_level, "info");
    }

    #[test]
    fn test_save_and_reload_toml() {
        let mut config = GiftSwapConfig::default();
        config.exchange.max_attempts = 250;
        config.dispatch.sink = SinkKind::File;

        let path = std::env::temp_dir().join(format!("gift-swap-{}.toml", uuid::Uuid::new_v4()));
        config.save_to_file(&path).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("max_attempts = 250"));
        assert!(text.contains("sink = \"file\""));

        let reloaded: GiftSwapConfig = toml::from_str(&text).unwrap();
        assert_eq!(reloaded.exchange, config.exchange);
        assert_eq!(reloaded.dispatch, config.dispatch);

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_layered_file_overrides_defaults() {
        let built = Config::builder()
            .add_source(Config::try_from(&GiftSwapConfig::default()).unwrap())
            .add_source(File::from_str(
                "[exchange]\nmax_attempts = 7\n",
                config::FileFormat::Toml,
            ))
            .build()
            .unwrap();

        let config: GiftSwapConfig = built.try_deserialize().unwrap();
        assert_eq!(config.exchange.max_attempts, 7);
        assert_eq!(config.exchange.min_participants, 3);
        assert_eq!(config.dispatch.sink, SinkKind::Console);
    }

    #[test]
    fn test_init_config_reads_global() {
        init_config().unwrap();
        assert!(config().unwrap().exchange.max_attempts > 0);
    }
}
