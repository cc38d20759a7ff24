//! CLI argument parsing using StructOpt.

use structopt::StructOpt;

use crate::cli::commands::{
    best_move::BestMoveArgs, list_bots::ListBotsArgs, play_match::PlayMatchArgs, CommandResult,
};

#[derive(StructOpt)]
#[structopt(
    name = "chessbot",
    about = "A suite of chess bots, from weighted-random movers to alpha-beta and Monte Carlo searchers ♛"
)]
pub enum Chessbot {
    #[structopt(
        name = "best-move",
        about = "Ask a bot (`--bot`, default: victor) for its move in a position given in FEN notation with `--fen` (default: starting position). The move is printed in UCI notation."
    )]
    BestMove(BestMoveArgs),
    #[structopt(
        name = "match",
        about = "Play `--rounds` games (default: 4) between `--white` and `--black`, alternating colours every round. A bot that misses the `--timeout-ms` deadline (default: 10000, 0 disables it) forfeits the game."
    )]
    Match(PlayMatchArgs),
    #[structopt(
        name = "bots",
        about = "List the bots in the roster (the built-in one, or the TOML file given with `--config`)."
    )]
    Bots(ListBotsArgs),
}

impl crate::cli::commands::Command for Chessbot {
    fn execute(self) -> CommandResult {
        macro_rules! execute_command {
            ($($variant:ident($cmd:ident)),+ $(,)?) => {
                match self {
                    $(Self::$variant($cmd) => $cmd.execute(),)+
                }
            };
        }

        execute_command! {
            BestMove(cmd),
            Match(cmd),
            Bots(cmd),
        }
    }
}
