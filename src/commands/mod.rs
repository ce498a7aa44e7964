mod config;
mod locations;
mod ls;
mod terminal;
mod unlock;

pub use config::{cmd_config_set, cmd_config_show};
pub use locations::cmd_locations;
pub use ls::cmd_ls;
pub use terminal::{TerminalInput, cmd_terminal, parse_input_line};
pub use unlock::cmd_unlock;

use std::io::IsTerminal;

use serde_json::Value;

use crate::cli::{GlobalArgs, OutputOptions};
use crate::config::Config;
use crate::error::Result;
use crate::gateway::HttpGateway;
use crate::session::TerminalSession;

/// A command result with a JSON form and an optional human-readable form.
pub struct CommandOutput {
    json: Value,
    text: Option<String>,
}

impl CommandOutput {
    pub fn new(json: Value) -> Self {
        Self { json, text: None }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// The string `print` would write.
    pub fn render(&self, output: OutputOptions) -> Result<String> {
        match (&self.text, output.json) {
            (Some(text), false) => Ok(text.clone()),
            _ => Ok(serde_json::to_string_pretty(&self.json)?),
        }
    }

    pub fn print(self, output: OutputOptions) -> Result<()> {
        println!("{}", self.render(output)?);
        Ok(())
    }
}

/// Whether text output should carry ANSI colors.
pub(crate) fn use_color(output: OutputOptions) -> bool {
    !output.json && std::io::stdout().is_terminal()
}

/// Gateway for the backend named by `--api-url`, `LOCKER_API_URL` or the
/// config file, in that order.
pub(crate) fn open_gateway(config: &Config, global: &GlobalArgs) -> Result<HttpGateway> {
    match &global.api_url {
        Some(url) => HttpGateway::with_base_url(url, config),
        None => HttpGateway::from_config(config),
    }
}

/// Bring up a session with lockers already fetched.
pub(crate) async fn start_session(
    config: &Config,
    global: &GlobalArgs,
) -> Result<TerminalSession<HttpGateway>> {
    let gateway = open_gateway(config, global)?;
    let mut session = TerminalSession::new(gateway);
    session.start().await;
    Ok(session)
}
