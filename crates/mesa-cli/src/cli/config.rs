//! `mesa config`: print the effective client configuration.

use std::path::Path;

use anyhow::Result;
use comfy_table::{Cell, Color, ContentArrangement, Table, presets};
use console::style;

use mesa_types::config::ClientConfig;

const REDACTED: &str = "[redacted]";

/// Copy of `config` that is safe to print.
fn redacted(config: &ClientConfig) -> ClientConfig {
    let mut config = config.clone();
    if config.auth.anon_key.is_some() {
        config.auth.anon_key = Some(REDACTED.to_string());
    }
    config
}

fn rows(config: &ClientConfig) -> Vec<(&'static str, String)> {
    let or_unset = |value: &Option<String>| value.clone().unwrap_or_else(|| "(unset)".to_string());
    vec![
        ("base_url", config.base_url.clone()),
        ("request_path", config.request_path.clone()),
        ("history_limit", config.history_limit.to_string()),
        ("require_auth", config.require_auth.to_string()),
        ("stream_replies", config.stream_replies.to_string()),
        ("request_timeout_secs", config.request_timeout_secs.to_string()),
        ("auth.auth_url", or_unset(&config.auth.auth_url)),
        ("auth.anon_key", or_unset(&config.auth.anon_key)),
        ("auth.login_path", config.auth.login_path.clone()),
    ]
}

pub fn show_config(config: &ClientConfig, data_dir: &Path, json: bool) -> Result<()> {
    let config = redacted(config);

    if json {
        let value = serde_json::json!({
            "data_dir": data_dir.display().to_string(),
            "config": config,
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    println!();
    println!(
        "  {} {}",
        style("Config:").bold(),
        style(data_dir.join("config.toml").display()).dim()
    );
    println!();

    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("Key").fg(Color::White),
        Cell::new("Value").fg(Color::White),
    ]);
    for (key, value) in rows(&config) {
        table.add_row(vec![Cell::new(key).fg(Color::Cyan), Cell::new(value)]);
    }
    println!("{table}");
    println!();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_anon_key_redacted() {
        let mut config = ClientConfig::default();
        config.auth.anon_key = Some("eyJhbGciOi".to_string());
        let shown = redacted(&config);
        assert_eq!(shown.auth.anon_key.as_deref(), Some(REDACTED));
        assert!(!serde_json::to_string(&shown).unwrap().contains("eyJhbGciOi"));
    }

    #[test]
    fn test_rows_mark_unset_values() {
        let rows = rows(&ClientConfig::default());
        assert!(rows.contains(&("auth.auth_url", "(unset)".to_string())));
        assert!(rows.contains(&("history_limit", "6".to_string())));
    }
}
