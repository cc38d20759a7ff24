//! Core traits shared by the searchers and the baseline move selectors.

use std::fmt::Debug;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use rand::RngCore;
use thiserror::Error;

use crate::position::{Move, Position};

/// Signed evaluation from one side's point of view; positive favors that side.
pub type Score = i32;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum SearchError {
    #[error("no available moves")]
    NoAvailableMoves,
    #[error("depth must be at least 1")]
    DepthTooLow,
}

/// How a finished game ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome<Side> {
    Winner(Side),
    Draw,
}

/// Represents the state of a two-player zero-sum game that can be explored
/// copy-on-branch: `play` returns the next state and leaves `self` untouched.
pub trait GameState: Clone {
    type Side: Copy + Eq + Debug;
    type Move: Clone + PartialEq + Debug;

    fn side_to_move(&self) -> Self::Side;

    /// All legal moves for the side to move, in no meaningful order. Callers
    /// check [`GameState::outcome`] first: a drawn state may still list moves.
    fn legal_moves(&self) -> Vec<Self::Move>;

    fn play(&self, game_move: &Self::Move) -> Self;

    /// `None` while the game is still in progress.
    fn outcome(&self) -> Option<Outcome<Self::Side>>;

    fn is_terminal(&self) -> bool {
        self.outcome().is_some()
    }
}

/// Scores a state from the point of view of `perspective`.
pub trait Evaluator<S: GameState> {
    fn evaluate(&self, state: &S, perspective: S::Side) -> Score;
}

/// A recursive or iterative search that picks one move per call.
pub trait Searcher {
    fn best_move(
        &mut self,
        position: &Position,
        rng: &mut dyn RngCore,
    ) -> Result<Move, SearchError>;

    /// Shares a flag that, once raised, makes the running and every later
    /// search wind down and return whatever it has.
    fn set_abort(&mut self, abort: Option<Arc<AtomicBool>>);
}

/// A non-recursive policy that picks a move in time linear in the number of
/// legal moves.
pub trait MoveSelector {
    fn select_move(
        &self,
        position: &Position,
        rng: &mut dyn RngCore,
    ) -> Result<Move, SearchError>;
}
