//! Depth-limited minimax with alpha-beta pruning.
//!
//! The algorithm in [`search`] is generic over [`GameState`] and is tested on
//! a toy game; [`AlphaBetaSearcher`] binds it to chess positions, the
//! configurable evaluator, and a depth policy.

mod adaptive_depth;
mod search;

#[cfg(test)]
mod tests;

use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::time::Instant;

use log::debug;
use rand::RngCore;

pub use self::adaptive_depth::{AdaptiveDepth, DepthPolicy};
pub use self::search::{
    alpha_beta_search, exhaustive_minimax, minimax, MoveOrdering, SearchContext,
};
use crate::evaluate::{ChessEvaluator, EvaluatorConfig};
use crate::position::{Move, Position};
use crate::traits::{Score, SearchError, Searcher};

pub struct AlphaBetaSearcher {
    evaluator_config: EvaluatorConfig,
    ordering: MoveOrdering,
    depth: DepthPolicy,
    context: SearchContext,
}

impl AlphaBetaSearcher {
    pub fn new(
        evaluator_config: EvaluatorConfig,
        ordering: MoveOrdering,
        depth: DepthPolicy,
    ) -> Self {
        Self {
            evaluator_config,
            ordering,
            depth,
            context: SearchContext::new(),
        }
    }

    pub fn with_fixed_depth(evaluator_config: EvaluatorConfig, depth: u8) -> Self {
        Self::new(evaluator_config, MoveOrdering::default(), DepthPolicy::Fixed(depth))
    }

    /// Depth the next search will use (before any opening reset).
    pub fn current_depth(&self) -> u8 {
        self.depth.current_depth()
    }

    /// Searches `position` and returns the chosen move with its score.
    pub fn search(
        &mut self,
        position: &Position,
        rng: &mut dyn RngCore,
    ) -> Result<(Move, Score), SearchError> {
        let depth = self.depth.prepare(position.fullmove_number());
        let evaluator = ChessEvaluator::new(self.evaluator_config).anchored_at(position);
        let start = Instant::now();

        let (best_move, score) = alpha_beta_search(
            &mut self.context,
            position,
            &evaluator,
            self.ordering,
            depth,
            rng,
        )?;

        let scorings = self.context.scorings();
        self.depth.record(scorings);
        debug!(
            "{:?} plays {} (score {}, depth {}, {} scorings, {:?})",
            position.side_to_move(),
            best_move,
            score,
            depth,
            scorings,
            start.elapsed()
        );

        Ok((best_move, score))
    }
}

impl Searcher for AlphaBetaSearcher {
    fn best_move(
        &mut self,
        position: &Position,
        rng: &mut dyn RngCore,
    ) -> Result<Move, SearchError> {
        self.search(position, rng).map(|(best_move, _)| best_move)
    }

    fn set_abort(&mut self, abort: Option<Arc<AtomicBool>>) {
        self.context.set_abort(abort);
    }
}
