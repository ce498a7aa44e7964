use super::{CommandOutput, start_session, use_color};
use crate::cli::GlobalArgs;
use crate::config::Config;
use crate::display::render_grid;
use crate::error::Result;

/// Print the reconciled cabinets at a location
pub async fn cmd_ls(global: &GlobalArgs, location: &str) -> Result<()> {
    let output = global.output();
    let config = Config::load()?;
    let location = config.parse_location(location)?;

    let mut session = start_session(&config, global).await?;
    session.select_location(Some(location));

    let view = session.view();
    CommandOutput::new(serde_json::to_value(&view)?)
        .with_text(render_grid(&view, use_color(output)))
        .print(output)
}
