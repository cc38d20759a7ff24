//! Shared utilities for CLI commands.

use std::path::PathBuf;

use chessbot::bot::{BotConfig, ConfigError, Roster};
use structopt::StructOpt;

/// Roster selection shared by every command.
#[derive(StructOpt)]
pub struct RosterArgs {
    #[structopt(
        long = "config",
        parse(from_os_str),
        help = "TOML roster file (default: built-in roster)"
    )]
    pub config: Option<PathBuf>,
    #[structopt(long, help = "Override the seed of every selected bot")]
    pub seed: Option<u64>,
}

impl RosterArgs {
    pub(crate) fn roster(&self) -> Result<Roster, ConfigError> {
        match &self.config {
            Some(path) => Roster::load(path),
            None => Ok(Roster::default()),
        }
    }

    pub(crate) fn bot(&self, roster: &Roster, name: &str) -> Result<BotConfig, ConfigError> {
        let mut config = roster.get(name)?.clone();
        if let Some(seed) = self.seed {
            config.seed = seed;
        }
        Ok(config)
    }
}
