mod cli;

use std::process;

use env_logger::Env;
use structopt::StructOpt;

use cli::commands::Command;
use cli::Chessbot;

fn main() {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    if let Err(err) = Chessbot::from_args().execute() {
        eprintln!("error: {}", err);
        process::exit(1);
    }
}
