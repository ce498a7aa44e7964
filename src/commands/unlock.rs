use serde_json::json;

use super::{CommandOutput, start_session, use_color};
use crate::cli::GlobalArgs;
use crate::config::Config;
use crate::display::render_grid;
use crate::error::Result;

/// Try one access code at a location and print the resulting grid
pub async fn cmd_unlock(global: &GlobalArgs, location: &str, code: &str) -> Result<()> {
    let output = global.output();
    let config = Config::load()?;
    let location = config.parse_location(location)?;

    let mut session = start_session(&config, global).await?;
    session.select_location(Some(location.clone()));
    session.enter_code(code);
    let outcome = session.unlock().await?;

    let json_output = json!({
        "action": "unlock",
        "location": location,
        "locker_id": outcome.locker_id,
        "cabinet_id": outcome.cabinet_id,
        "cabinet_number": outcome.cabinet_number,
        "previous_status": outcome.previous_status,
        "new_status": outcome.new_status,
        "transaction": outcome.transaction,
    });

    CommandOutput::new(json_output)
        .with_text(render_grid(&session.view(), use_color(output)))
        .print(output)
}
