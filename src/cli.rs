use clap::{Args, Parser, Subcommand};

use crate::config::VALID_CONFIG_KEYS;

#[derive(Parser)]
#[command(name = "locker")]
#[command(about = "Parcel locker terminal")]
#[command(version)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Args, Debug, Clone, Default)]
pub struct GlobalArgs {
    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Backend base URL (overrides config and LOCKER_API_URL)
    #[arg(long, global = true, value_name = "URL")]
    pub api_url: Option<String>,
}

impl GlobalArgs {
    pub fn output(&self) -> OutputOptions {
        OutputOptions { json: self.json }
    }
}

/// How command results are printed
#[derive(Debug, Clone, Copy, Default)]
pub struct OutputOptions {
    pub json: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List the locations this terminal offers
    Locations,

    /// Show the cabinets at a location
    Ls {
        /// Location name (case-insensitive)
        #[arg(short, long)]
        location: String,
    },

    /// Try an access code at a location
    Unlock {
        /// Location name (case-insensitive)
        #[arg(short, long)]
        location: String,

        /// Access code, compared exactly
        code: String,
    },

    /// Run an interactive terminal session on stdin
    #[command(visible_alias = "t")]
    Terminal {
        /// Location to start at
        #[arg(short, long)]
        location: Option<String>,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Set a configuration value
    Set {
        /// Key to set
        #[arg(value_parser = parse_config_key)]
        key: String,

        /// New value (locations: comma-separated)
        value: String,
    },
}

fn parse_config_key(s: &str) -> Result<String, String> {
    if VALID_CONFIG_KEYS.contains(&s) {
        Ok(s.to_string())
    } else {
        Err(format!(
            "invalid key '{}'. Must be one of: {}",
            s,
            VALID_CONFIG_KEYS.join(", ")
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_unlock() {
        let cli = Cli::try_parse_from(["locker", "unlock", "--location", "espoo", "9921"]).unwrap();
        match cli.command {
            Commands::Unlock { location, code } => {
                assert_eq!(location, "espoo");
                assert_eq!(code, "9921");
            }
            _ => panic!("expected unlock"),
        }
        assert!(!cli.global.json);
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "locker",
            "ls",
            "-l",
            "Oulu",
            "--json",
            "--api-url",
            "http://backend:5005",
        ])
        .unwrap();
        assert!(cli.global.output().json);
        assert_eq!(cli.global.api_url.as_deref(), Some("http://backend:5005"));
    }

    #[test]
    fn test_config_set_rejects_unknown_key() {
        assert!(Cli::try_parse_from(["locker", "config", "set", "api.token", "x"]).is_err());
        assert!(Cli::try_parse_from(["locker", "config", "set", "api.url", "http://x"]).is_ok());
    }

    #[test]
    fn test_unlock_requires_location() {
        assert!(Cli::try_parse_from(["locker", "unlock", "9921"]).is_err());
    }
}
