//! Match command - play a series of games between two bots.

use std::time::Duration;

use chessbot::arena::{run_match, MatchConfig};
use structopt::StructOpt;

use super::util::RosterArgs;
use super::{Command, CommandResult};

#[derive(StructOpt)]
pub struct PlayMatchArgs {
    #[structopt(short, long)]
    pub white: String,
    #[structopt(short, long)]
    pub black: String,
    #[structopt(short, long, default_value = "4")]
    pub rounds: u32,
    #[structopt(
        long = "timeout-ms",
        default_value = "10000",
        help = "Per-move deadline in milliseconds (0 = no limit)"
    )]
    pub timeout_ms: u64,
    #[structopt(long, help = "Score unfinished games as draws after this many plies")]
    pub max_plies: Option<u32>,
    #[structopt(flatten)]
    pub roster: RosterArgs,
}

impl Command for PlayMatchArgs {
    fn execute(self) -> CommandResult {
        let roster = self.roster.roster()?;
        let white = self.roster.bot(&roster, &self.white)?;
        let black = self.roster.bot(&roster, &self.black)?;

        let config = MatchConfig {
            rounds: self.rounds,
            move_timeout: if self.timeout_ms == 0 {
                None
            } else {
                Some(Duration::from_millis(self.timeout_ms))
            },
            max_plies: self.max_plies,
        };

        let report = run_match(&white, &black, &config)?;
        println!("{}", report);
        Ok(())
    }
}
