//! Configuration commands.
//!
//! - `config show`: Display current configuration
//! - `config set`: Set a configuration value

use owo_colors::OwoColorize;
use serde_json::json;

use super::CommandOutput;
use crate::cli::OutputOptions;
use crate::config::{API_URL_ENV, Config};
use crate::error::Result;

/// Show current configuration
pub fn cmd_config_show(output: OutputOptions) -> Result<()> {
    let config = Config::load()?;
    let effective_url = config.api_url()?;

    let json_output = json!({
        "api": {
            "url": config.api_url,
            "effective_url": effective_url.as_str(),
            "request_timeout": config.request_timeout,
            "connect_timeout": config.connect_timeout,
        },
        "locations": config.locations,
        "config_file": Config::config_path().to_string_lossy(),
    });

    let mut text_output = String::new();
    text_output.push_str(&format!("{}\n\n", "Configuration:".cyan().bold()));

    text_output.push_str(&format!("{}:\n", "api".cyan()));
    text_output.push_str(&format!("  url: {}\n", config.api_url));
    if effective_url.as_str().trim_end_matches('/') != config.api_url.trim_end_matches('/') {
        text_output.push_str(&format!(
            "  {}\n",
            format!("(overridden by {API_URL_ENV}: {effective_url})").dimmed()
        ));
    }
    text_output.push_str(&format!("  request_timeout: {}s\n", config.request_timeout));
    text_output.push_str(&format!("  connect_timeout: {}s\n", config.connect_timeout));

    text_output.push('\n');
    text_output.push_str(&format!(
        "{}: {}\n",
        "locations".cyan(),
        config.locations.join(", ")
    ));

    text_output.push('\n');
    text_output.push_str(&format!(
        "{}",
        format!("Config file: {}", Config::config_path().display()).dimmed()
    ));

    CommandOutput::new(json_output)
        .with_text(text_output)
        .print(output)
}

/// Set a configuration value
pub fn cmd_config_set(key: &str, value: &str, output: OutputOptions) -> Result<()> {
    let mut config = Config::load()?;
    config.set(key, value)?;
    config.save()?;

    let json_output = json!({
        "action": "config_set",
        "key": key,
        "value": value,
        "success": true,
    });
    let text_output = format!("Set {} to {}", key.cyan(), value);

    CommandOutput::new(json_output)
        .with_text(text_output)
        .print(output)
}
