//! Match runner for playing games between bots.
//!
//! With a move deadline, each move is computed on a worker thread. A bot that
//! misses the deadline or produces no legal move forfeits the game. The
//! abandoned worker keeps the old bot, so a fresh one is built from the same
//! configuration. The worker's search is told to abort and winds down on its
//! own; its late answer is dropped.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use log::{info, warn};
use thiserror::Error;

use crate::bot::{Bot, BotConfig, ConfigError};
use crate::position::{Color, GameResult, Move, Position};
use crate::traits::SearchError;

#[derive(Error, Debug)]
pub enum ArenaError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("failed to spawn move worker: {0}")]
    Spawn(#[source] std::io::Error),
}

/// Result of asking a bot for one move.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MoveOutcome {
    Played(Move),
    /// The bot reported that it has nothing to play.
    NoLegalMove,
    /// The deadline passed, or the worker died, before a move arrived.
    Aborted,
}

impl From<Result<Move, SearchError>> for MoveOutcome {
    fn from(result: Result<Move, SearchError>) -> Self {
        match result {
            Ok(chosen) => MoveOutcome::Played(chosen),
            Err(_) => MoveOutcome::NoLegalMove,
        }
    }
}

/// Asks `bot` for a move on `position`. With a timeout, the search runs on a
/// worker thread; if it misses the deadline the result is discarded and `bot`
/// is replaced by a fresh instance built from the same configuration.
pub fn play_move_with_deadline(
    bot: &mut Bot,
    position: &Position,
    timeout: Option<Duration>,
) -> Result<MoveOutcome, ArenaError> {
    let timeout = match timeout {
        Some(timeout) => timeout,
        None => return Ok(bot.choose_move(position).into()),
    };

    let fresh = Bot::from_config(bot.config())?;
    let mut worker_bot = std::mem::replace(bot, fresh);
    let abort = Arc::new(AtomicBool::new(false));
    worker_bot.set_abort(Some(abort.clone()));
    let worker_position = position.clone();
    let (sender, receiver) = mpsc::channel();

    thread::Builder::new()
        .name(format!("move-{}", worker_bot.short_code()))
        .spawn(move || {
            let result = worker_bot.choose_move(&worker_position);
            // the receiver is gone once the deadline has passed
            let _ = sender.send((worker_bot, result));
        })
        .map_err(ArenaError::Spawn)?;

    match receiver.recv_timeout(timeout) {
        Ok((mut worker_bot, result)) => {
            worker_bot.set_abort(None);
            *bot = worker_bot;
            Ok(result.into())
        }
        Err(mpsc::RecvTimeoutError::Timeout) => {
            abort.store(true, Ordering::Relaxed);
            warn!("{} missed the {:?} deadline", bot.display_name(), timeout);
            Ok(MoveOutcome::Aborted)
        }
        Err(mpsc::RecvTimeoutError::Disconnected) => {
            warn!("{} move worker stopped without a result", bot.display_name());
            Ok(MoveOutcome::Aborted)
        }
    }
}

/// Configuration for a match
#[derive(Debug, Clone)]
pub struct MatchConfig {
    /// Number of games; colours alternate, the first bot is white in even rounds.
    pub rounds: u32,
    /// Maximum time per move (None = no limit)
    pub move_timeout: Option<Duration>,
    /// Plies after which an unfinished game is scored as a draw
    pub max_plies: Option<u32>,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            rounds: 4,
            move_timeout: Some(Duration::from_secs(10)),
            max_plies: None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Termination {
    /// Checkmate or a rules draw.
    Rules,
    PlyLimit,
    /// The side that failed to produce a legal move in time.
    Forfeit(Color),
}

#[derive(Clone, Debug)]
pub struct GameRecord {
    pub white: String,
    pub black: String,
    pub moves: Vec<String>,
    pub result: GameResult,
    pub termination: Termination,
}

impl fmt::Display for GameRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} vs {}: {} ({:?}, {} plies)",
            self.white,
            self.black,
            self.result,
            self.termination,
            self.moves.len()
        )
    }
}

#[derive(Clone, Debug)]
pub struct MatchReport {
    /// Display names, in the order the bots were passed to [`run_match`].
    pub players: [String; 2],
    pub scores: [f64; 2],
    pub games: Vec<GameRecord>,
}

impl MatchReport {
    pub fn score_of(&self, display_name: &str) -> Option<f64> {
        self.players
            .iter()
            .position(|player| player == display_name)
            .map(|index| self.scores[index])
    }
}

impl fmt::Display for MatchReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, game) in self.games.iter().enumerate() {
            writeln!(f, "Game {}: {}", index + 1, game)?;
        }
        write!(
            f,
            "{}: {} - {}: {}",
            self.players[0], self.scores[0], self.players[1], self.scores[1]
        )
    }
}

/// Plays `config.rounds` games between two bots. Win = 1, draw = 0.5 each,
/// forfeit = loss.
pub fn run_match(
    first: &BotConfig,
    second: &BotConfig,
    config: &MatchConfig,
) -> Result<MatchReport, ArenaError> {
    let mut bots = [Bot::from_config(first)?, Bot::from_config(second)?];
    let players = [bots[0].display_name(), bots[1].display_name()];
    let mut scores = [0.0, 0.0];
    let mut games = Vec::new();

    for round in 0..config.rounds {
        let first_is_white = round % 2 == 0;
        let (white, black) = {
            let (first_bot, rest) = bots.split_at_mut(1);
            if first_is_white {
                (&mut first_bot[0], &mut rest[0])
            } else {
                (&mut rest[0], &mut first_bot[0])
            }
        };

        let game = play_game(white, black, config)?;
        info!("Game {}/{}: {}", round + 1, config.rounds, game);

        let (white_index, black_index) = if first_is_white { (0, 1) } else { (1, 0) };
        match game.result.winner() {
            Some(Color::White) => scores[white_index] += 1.0,
            Some(Color::Black) => scores[black_index] += 1.0,
            None => {
                scores[0] += 0.5;
                scores[1] += 0.5;
            }
        }
        games.push(game);
    }

    info!("{}: {} - {}: {}", players[0], scores[0], players[1], scores[1]);
    Ok(MatchReport {
        players,
        scores,
        games,
    })
}

fn play_game(
    white: &mut Bot,
    black: &mut Bot,
    config: &MatchConfig,
) -> Result<GameRecord, ArenaError> {
    let mut position = Position::starting();
    let mut moves = Vec::new();

    let termination = loop {
        if position.is_game_over() {
            break Termination::Rules;
        }
        if let Some(max_plies) = config.max_plies {
            if moves.len() as u32 >= max_plies {
                break Termination::PlyLimit;
            }
        }

        let side = position.side_to_move();
        let bot = match side {
            Color::White => &mut *white,
            Color::Black => &mut *black,
        };

        match play_move_with_deadline(bot, &position, config.move_timeout)? {
            MoveOutcome::Played(chosen) => match position.try_play(&chosen) {
                Ok(next) => {
                    moves.push(chosen.to_string());
                    position = next;
                }
                Err(err) => {
                    warn!("{}: {}", bot.display_name(), err);
                    break Termination::Forfeit(side);
                }
            },
            MoveOutcome::NoLegalMove | MoveOutcome::Aborted => {
                break Termination::Forfeit(side);
            }
        }
    };

    let result = match termination {
        Termination::Rules => position.result(),
        Termination::PlyLimit => GameResult::Draw,
        Termination::Forfeit(Color::White) => GameResult::BlackWins,
        Termination::Forfeit(Color::Black) => GameResult::WhiteWins,
    };

    Ok(GameRecord {
        white: white.display_name(),
        black: black.display_name(),
        moves,
        result,
        termination,
    })
}
