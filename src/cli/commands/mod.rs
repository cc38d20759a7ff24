//! CLI command implementations.

use std::error::Error;

pub type CommandResult = Result<(), Box<dyn Error>>;

pub trait Command {
    fn execute(self) -> CommandResult;
}

pub mod best_move;
pub mod list_bots;
pub mod play_match;

// Shared utilities for commands
pub(crate) mod util;
