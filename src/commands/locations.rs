use owo_colors::OwoColorize;
use serde_json::json;

use super::{CommandOutput, use_color};
use crate::cli::OutputOptions;
use crate::config::Config;
use crate::error::Result;

/// List the configured locations
pub fn cmd_locations(output: OutputOptions) -> Result<()> {
    let config = Config::load()?;
    let colored = use_color(output);

    let text = config
        .locations
        .iter()
        .map(|l| {
            if colored {
                l.cyan().to_string()
            } else {
                l.clone()
            }
        })
        .collect::<Vec<_>>()
        .join("\n");

    CommandOutput::new(json!({ "locations": config.locations }))
        .with_text(text)
        .print(output)
}
