//! Bots: a name, a strategy built from a [`BotConfig`], and an owned seeded
//! random source.

mod config;

use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use log::debug;
use rand::rngs::StdRng;
use rand::SeedableRng;

pub use self::config::{BotConfig, ConfigError, Roster, StrategyConfig};
use crate::alpha_beta_searcher::AlphaBetaSearcher;
use crate::mcts::MonteCarloSearcher;
use crate::move_selector::{AttackBiased, DistanceBiased, UniformRandom};
use crate::position::{Move, Position};
use crate::traits::{MoveSelector, SearchError, Searcher};

enum Strategy {
    Selector(Box<dyn MoveSelector + Send>),
    Searcher(Box<dyn Searcher + Send>),
}

impl Strategy {
    fn from_config(config: &StrategyConfig) -> Self {
        match config {
            StrategyConfig::UniformRandom => Strategy::Selector(Box::new(UniformRandom)),
            StrategyConfig::DistanceBiased => Strategy::Selector(Box::new(DistanceBiased)),
            StrategyConfig::AttackBiased { attack_probability } => {
                Strategy::Selector(Box::new(AttackBiased::new(*attack_probability)))
            }
            StrategyConfig::AlphaBeta {
                evaluator,
                ordering,
                depth,
            } => {
                let searcher = AlphaBetaSearcher::new(*evaluator, *ordering, *depth);
                Strategy::Searcher(Box::new(searcher))
            }
            StrategyConfig::MonteCarlo(mcts) => {
                Strategy::Searcher(Box::new(MonteCarloSearcher::new(*mcts)))
            }
        }
    }
}

pub struct Bot {
    config: BotConfig,
    strategy: Strategy,
    rng: StdRng,
}

impl Bot {
    pub fn from_config(config: &BotConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config: config.clone(),
            strategy: Strategy::from_config(&config.strategy),
            rng: StdRng::seed_from_u64(config.seed),
        })
    }

    pub fn config(&self) -> &BotConfig {
        &self.config
    }

    pub fn name(&self) -> &str {
        &self.config.name
    }

    /// `"<strategy> <name>"`, e.g. `"AlphaBeta victor"`.
    pub fn display_name(&self) -> String {
        format!("{} {}", self.config.strategy.label(), self.config.name)
    }

    /// The first three characters of the name.
    pub fn short_code(&self) -> String {
        self.config.name.chars().take(3).collect()
    }

    /// Picks a move for the side to move. Never mutates `position`.
    pub fn choose_move(&mut self, position: &Position) -> Result<Move, SearchError> {
        let chosen = match &mut self.strategy {
            Strategy::Selector(selector) => selector.select_move(position, &mut self.rng),
            Strategy::Searcher(searcher) => searcher.best_move(position, &mut self.rng),
        }?;
        debug!("{} chose {}", self.display_name(), chosen);
        Ok(chosen)
    }

    /// Hands `abort` to the search, if any; move selectors finish in linear
    /// time and ignore it.
    pub fn set_abort(&mut self, abort: Option<Arc<AtomicBool>>) {
        if let Strategy::Searcher(searcher) = &mut self.strategy {
            searcher.set_abort(abort);
        }
    }
}
