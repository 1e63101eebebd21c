use thiserror::Error;

/// Failures loading a [`BridgeConfig`](crate::config::BridgeConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid bridge config: {0}")]
    Parse(#[from] toml::de::Error),
}
