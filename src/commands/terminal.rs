//! Interactive terminal session over stdin.
//!
//! Each line is one of:
//! - `:location <name>` (or `:l <name>`) to switch location
//! - `:quit` (or `:q`) to exit
//! - `::<code>` to try a code that itself starts with `:`
//! - anything else is tried as an access code, exactly as typed
//!
//! A line of only whitespace is ignored. Codes are never trimmed, so a code
//! typed with surrounding spaces will not match.
//!
//! The grid is printed again after every line that changes state.

use owo_colors::OwoColorize;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::debug;

use super::{CommandOutput, start_session, use_color};
use crate::cli::{GlobalArgs, OutputOptions};
use crate::config::Config;
use crate::display::render_grid;
use crate::error::Result;
use crate::presentation::TerminalViewModel;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TerminalInput {
    Quit,
    SelectLocation(String),
    Unlock(String),
    Blank,
    Unknown(String),
}

pub fn parse_input_line(line: &str) -> TerminalInput {
    let line = line.trim_end_matches(['\r', '\n']);
    if line.trim().is_empty() {
        return TerminalInput::Blank;
    }

    let Some(command) = line.strip_prefix(':') else {
        return TerminalInput::Unlock(line.to_string());
    };
    if command.starts_with(':') {
        return TerminalInput::Unlock(command.to_string());
    }

    let command = command.trim();
    let (name, arg) = match command.split_once(char::is_whitespace) {
        Some((name, arg)) => (name, arg.trim()),
        None => (command, ""),
    };

    match name {
        "q" | "quit" => TerminalInput::Quit,
        "l" | "location" if !arg.is_empty() => TerminalInput::SelectLocation(arg.to_string()),
        _ => TerminalInput::Unknown(format!(":{command}")),
    }
}

fn emit(view: &TerminalViewModel, output: OutputOptions, colored: bool) -> Result<()> {
    CommandOutput::new(serde_json::to_value(view)?)
        .with_text(render_grid(view, colored))
        .print(output)
}

/// Run the terminal until `:quit` or end of input
pub async fn cmd_terminal(global: &GlobalArgs, location: Option<&str>) -> Result<()> {
    let output = global.output();
    let colored = use_color(output);
    let config = Config::load()?;
    let initial = location.map(|l| config.parse_location(l)).transpose()?;

    let mut session = start_session(&config, global).await?;
    session.select_location(initial);
    emit(&session.view(), output, colored)?;

    if !output.json {
        println!(
            "\n{}",
            format!(
                "Enter a code (prefix '::' for codes starting with ':'), ':location <{}>' or ':quit'",
                config.locations.join("|")
            )
            .dimmed()
        );
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match parse_input_line(&line) {
            TerminalInput::Quit => break,
            TerminalInput::Blank => continue,
            TerminalInput::SelectLocation(name) => match config.parse_location(&name) {
                Ok(location) => session.select_location(Some(location)),
                Err(e) => {
                    eprintln!("{}", e.to_string().red());
                    continue;
                }
            },
            TerminalInput::Unlock(code) => {
                session.enter_code(code);
                // The outcome is reflected in the view's notice.
                if let Err(e) = session.unlock().await {
                    debug!("unlock attempt failed: {e}");
                }
            }
            TerminalInput::Unknown(command) => {
                eprintln!(
                    "{}",
                    format!("unknown command '{command}'. Use :location <name> or :quit").red()
                );
                continue;
            }
        }
        emit(&session.view(), output, colored)?;
    }

    Ok(())
}
