//! Bots command - list the roster.

use chessbot::bot::Bot;
use structopt::StructOpt;

use super::util::RosterArgs;
use super::{Command, CommandResult};

#[derive(StructOpt)]
pub struct ListBotsArgs {
    #[structopt(flatten)]
    pub roster: RosterArgs,
}

impl Command for ListBotsArgs {
    fn execute(self) -> CommandResult {
        let roster = self.roster.roster()?;
        for name in roster.names() {
            let bot = Bot::from_config(&self.roster.bot(&roster, name)?)?;
            println!("{:<10} {:<4} {}", bot.name(), bot.short_code(), bot.display_name());
        }
        Ok(())
    }
}
