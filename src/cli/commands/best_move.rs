//! Best move command - ask one bot for its move in a given position.

use chessbot::bot::Bot;
use chessbot::position::{Position, STARTING_POSITION_FEN};
use structopt::StructOpt;

use super::util::RosterArgs;
use super::{Command, CommandResult};

#[derive(StructOpt)]
pub struct BestMoveArgs {
    #[structopt(long = "fen", default_value = STARTING_POSITION_FEN)]
    pub position: Position,
    #[structopt(short, long, default_value = "victor")]
    pub bot: String,
    #[structopt(flatten)]
    pub roster: RosterArgs,
}

impl Command for BestMoveArgs {
    fn execute(self) -> CommandResult {
        let roster = self.roster.roster()?;
        let mut bot = Bot::from_config(&self.roster.bot(&roster, &self.bot)?)?;

        if self.position.is_game_over() {
            eprintln!("The game is already over ({}).", self.position.result());
            return Ok(());
        }

        let chosen = bot.choose_move(&self.position)?;
        println!("{}", chosen);
        Ok(())
    }
}
