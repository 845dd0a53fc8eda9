//! Client configuration loader for Mesa.
//!
//! Reads `config.toml` from the data directory (`~/.mesa/` by default) and
//! deserializes it into [`ClientConfig`]. Falls back to defaults when the
//! file is missing or malformed.

use std::path::Path;

use mesa_types::config::ClientConfig;

/// Load client configuration from `{data_dir}/config.toml`.
///
/// - Missing file: [`ClientConfig::default()`].
/// - Unreadable or unparseable file: logs a warning and returns the default.
/// - A `history_limit` of 0 is raised to 1.
pub async fn load_client_config(data_dir: &Path) -> ClientConfig {
    let config_path = data_dir.join("config.toml");

    let content = match tokio::fs::read_to_string(&config_path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No config.toml found at {}, using defaults", config_path.display());
            return ClientConfig::default();
        }
        Err(err) => {
            tracing::warn!("Failed to read {}: {err}, using defaults", config_path.display());
            return ClientConfig::default();
        }
    };

    match toml::from_str::<ClientConfig>(&content) {
        Ok(config) => normalize(config),
        Err(err) => {
            tracing::warn!("Failed to parse {}: {err}, using defaults", config_path.display());
            ClientConfig::default()
        }
    }
}

fn normalize(mut config: ClientConfig) -> ClientConfig {
    if config.history_limit == 0 {
        tracing::warn!("history_limit = 0 in config.toml, using 1");
        config.history_limit = 1;
    }
    config.base_url = config.base_url.trim_end_matches('/').to_string();
    config
}
