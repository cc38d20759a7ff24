//! Monte Carlo Tree Search.

mod search;
mod tree;


use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use rand::RngCore;

pub use self::search::{
    grow_tree, monte_carlo_search, rollout, Expansion, MctsConfig, RootPolicy, TerminalLeaf,
    TreeStats,
};
pub use self::tree::{NodeId, SearchNode, SearchTree};
use crate::position::{Move, Position};
use crate::traits::{SearchError, Searcher};

/// Chess-facing MCTS player. Nothing carries over between calls: every
/// search builds a fresh tree.
pub struct MonteCarloSearcher {
    config: MctsConfig,
    last_stats: Option<TreeStats>,
    abort: Option<Arc<AtomicBool>>,
}

impl MonteCarloSearcher {
    pub fn new(config: MctsConfig) -> Self {
        Self {
            config,
            last_stats: None,
            abort: None,
        }
    }

    pub fn config(&self) -> &MctsConfig {
        &self.config
    }

    pub fn last_stats(&self) -> Option<TreeStats> {
        self.last_stats
    }
}

impl Searcher for MonteCarloSearcher {
    fn best_move(
        &mut self,
        position: &Position,
        rng: &mut dyn RngCore,
    ) -> Result<Move, SearchError> {
        let abort = self.abort.as_deref();
        let (best_move, stats) = monte_carlo_search(position, &self.config, rng, abort)?;
        self.last_stats = Some(stats);
        Ok(best_move)
    }

    fn set_abort(&mut self, abort: Option<Arc<AtomicBool>>) {
        self.abort = abort;
    }
}
