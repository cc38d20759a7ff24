//! Monte Carlo Tree Search with random rollouts and UCT selection.
//!
//! Each iteration selects a leaf by UCT, expands it with one or more of its
//! untried moves, plays random games from every new child, and adds the
//! results to the child and all its ancestors. A win is any rollout won by
//! the side to move at the root, at every level of the tree.

use std::sync::atomic::{AtomicBool, Ordering};

use log::debug;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::tree::{NodeId, SearchTree};
use crate::traits::{GameState, Outcome, SearchError};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Expansion {
    /// One random child per expansion.
    Single,
    /// Up to half of the leaf's legal moves (at least one).
    Batched,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RootPolicy {
    /// The root starts empty and grows like any other node.
    Incremental,
    /// Every first move is added and simulated before the main loop.
    AllCandidates,
}

/// What an iteration does when selection ends on a finished game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TerminalLeaf {
    /// End the search.
    Stop,
    /// Count the known result once per rollout and keep searching.
    Rescore,
}

/// Configuration for Monte Carlo Tree Search.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MctsConfig {
    /// Upper bound on select/expand/simulate/backpropagate iterations.
    pub iterations: u32,
    /// Random playouts run from every new child.
    pub rollouts_per_expansion: u32,
    /// `c` in the UCT formula.
    pub exploration: f64,
    pub expansion: Expansion,
    pub root: RootPolicy,
    pub terminal_leaf: TerminalLeaf,
    /// Plies after which a rollout is abandoned and counted as not won.
    pub rollout_ply_limit: u32,
}

impl Default for MctsConfig {
    fn default() -> Self {
        Self {
            iterations: 500,
            rollouts_per_expansion: 5,
            exploration: 2.0,
            expansion: Expansion::Single,
            root: RootPolicy::AllCandidates,
            terminal_leaf: TerminalLeaf::Stop,
            rollout_ply_limit: 200,
        }
    }
}

/// Summary of a finished search, for logging and tests.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TreeStats {
    pub iterations: u32,
    pub nodes: usize,
    pub depth: usize,
    pub root_simulations: u32,
    pub best_win_rate: f64,
}

/// Runs MCTS from `state` and returns the chosen move with tree statistics.
/// Once `abort` is raised the search stops as soon as the root has a child
/// and returns the best move found so far.
pub fn monte_carlo_search<S, R>(
    state: &S,
    config: &MctsConfig,
    rng: &mut R,
    abort: Option<&AtomicBool>,
) -> Result<(S::Move, TreeStats), SearchError>
where
    S: GameState,
    R: Rng + ?Sized,
{
    let (tree, iterations) = grow_tree(state, config, rng, abort)?;

    let best = tree.best_root_child().ok_or(SearchError::NoAvailableMoves)?;
    let best_node = tree.get(best);
    let best_move = best_node
        .game_move
        .clone()
        .ok_or(SearchError::NoAvailableMoves)?;

    let stats = TreeStats {
        iterations,
        nodes: tree.len(),
        depth: tree.depth(),
        root_simulations: tree.get(tree.root()).simulations,
        best_win_rate: best_node.win_rate(),
    };
    debug!("{:?}", stats);

    Ok((best_move, stats))
}

/// Builds the search tree for `state` and returns it with the number of
/// select/expand/simulate/backpropagate iterations that ran. With
/// [`TerminalLeaf::Stop`] the loop ends early once selection reaches a
/// finished game.
pub fn grow_tree<S, R>(
    state: &S,
    config: &MctsConfig,
    rng: &mut R,
    abort: Option<&AtomicBool>,
) -> Result<(SearchTree<S>, u32), SearchError>
where
    S: GameState,
    R: Rng + ?Sized,
{
    if state.is_terminal() || state.legal_moves().is_empty() {
        return Err(SearchError::NoAvailableMoves);
    }

    let aborted = || abort.map_or(false, |flag| flag.load(Ordering::Relaxed));
    let engine = state.side_to_move();
    let mut tree = SearchTree::new(state.clone());

    if config.root == RootPolicy::AllCandidates {
        let root = tree.root();
        for candidate in state.legal_moves() {
            let child = tree.add_child(root, candidate);
            if !aborted() {
                simulate(&mut tree, child, engine, config, rng);
            }
        }
    }

    let mut iterations = 0;
    while iterations < config.iterations {
        if aborted() && !tree.get(tree.root()).children.is_empty() {
            break;
        }
        let leaf = tree.select_leaf(config.exploration);
        let node = tree.get(leaf);
        if node.untried_moves().is_empty() {
            match config.terminal_leaf {
                TerminalLeaf::Stop => break,
                TerminalLeaf::Rescore => {
                    simulate(&mut tree, leaf, engine, config, rng);
                    iterations += 1;
                    continue;
                }
            }
        }

        let expand_count = match config.expansion {
            Expansion::Single => 1,
            Expansion::Batched => {
                let legal = node.children.len() + node.untried_moves().len();
                (legal / 2).max(1)
            }
        };
        let mut moves = node.untried_moves().to_vec();
        moves.shuffle(rng);
        moves.truncate(expand_count);

        for game_move in moves {
            let child = tree.add_child(leaf, game_move);
            simulate(&mut tree, child, engine, config, rng);
        }
        iterations += 1;
    }

    Ok((tree, iterations))
}

fn simulate<S, R>(
    tree: &mut SearchTree<S>,
    node: NodeId,
    engine: S::Side,
    config: &MctsConfig,
    rng: &mut R,
) where
    S: GameState,
    R: Rng + ?Sized,
{
    let start = &tree.get(node).state;
    let wins = (0..config.rollouts_per_expansion)
        .filter(|_| rollout(start, engine, config.rollout_ply_limit, rng))
        .count() as u32;
    tree.backpropagate(node, wins, config.rollouts_per_expansion);
}

/// Plays uniformly random moves from `state` until the game ends; true when
/// `engine` wins within `ply_limit` plies. A finished `state` is scored as is.
pub fn rollout<S, R>(state: &S, engine: S::Side, ply_limit: u32, rng: &mut R) -> bool
where
    S: GameState,
    R: Rng + ?Sized,
{
    let mut current = state.clone();
    for _ in 0..ply_limit {
        if let Some(outcome) = current.outcome() {
            return outcome == Outcome::Winner(engine);
        }
        let moves = current.legal_moves();
        let game_move = match moves.choose(rng) {
            Some(game_move) => game_move,
            None => return false,
        };
        current = current.play(game_move);
    }
    current.outcome() == Some(Outcome::Winner(engine))
}
