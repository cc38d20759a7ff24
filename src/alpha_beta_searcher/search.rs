//! Alpha-beta search algorithm implementation.
//!
//! # Core Algorithm
//!
//! Alpha-beta pruning is an optimization of minimax search that maintains a window [alpha, beta]
//! representing the range of scores that matter. Moves that fall outside this window can be
//! pruned without affecting the final result. For a fixed move order the root returns the same
//! move and score as an unpruned minimax, while exploring fewer nodes.
//!
//! Scores are always taken from the point of view of the side to move at the root (the
//! "perspective"): nodes where that side moves maximize, the others minimize.
//!
//! # Move Ordering
//!
//! Moves at every node are explored in one of three orders (see [`MoveOrdering`]):
//! 1. As generated.
//! 2. Shuffled with the caller's random source.
//! 3. Prioritized: every child is scored statically one ply down, the best `K` are explored
//!    best-first, and when there are more than `K + M` children only a random sample of `M`
//!    of the rest is explored at all.

use std::cmp::{max, min};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use log::debug;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::evaluate::ScoringCounter;
use crate::traits::{Evaluator, GameState, Score, SearchError};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MoveOrdering {
    InOrder,
    Shuffled,
    Prioritized { best: usize, random: usize },
}

impl Default for MoveOrdering {
    fn default() -> Self {
        MoveOrdering::Shuffled
    }
}

/// Statistics and counters shared by one top-level search.
#[derive(Debug, Default)]
pub struct SearchContext {
    scoring_counter: ScoringCounter,
    searched_position_count: usize,
    last_score: Option<Score>,
    last_search_duration: Option<Duration>,
    abort: Option<Arc<AtomicBool>>,
}

impl SearchContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset_stats(&mut self) {
        self.scoring_counter.reset();
        self.searched_position_count = 0;
        self.last_score = None;
        self.last_search_duration = None;
    }

    /// Evaluator invocations made by the last search.
    pub fn scorings(&self) -> usize {
        self.scoring_counter.get()
    }

    pub fn searched_position_count(&self) -> usize {
        self.searched_position_count
    }

    pub fn last_score(&self) -> Option<Score> {
        self.last_score
    }

    pub fn last_search_duration(&self) -> Option<Duration> {
        self.last_search_duration
    }

    /// Once the flag is raised every node is scored statically and the root
    /// stops after its first candidate. Survives [`SearchContext::reset_stats`].
    pub fn set_abort(&mut self, abort: Option<Arc<AtomicBool>>) {
        self.abort = abort;
    }

    #[inline]
    fn is_aborted(&self) -> bool {
        self.abort
            .as_ref()
            .map_or(false, |flag| flag.load(Ordering::Relaxed))
    }

    #[inline(always)]
    fn score<S, E>(&mut self, evaluator: &E, state: &S, perspective: S::Side) -> Score
    where
        S: GameState,
        E: Evaluator<S>,
    {
        self.scoring_counter.increment();
        evaluator.evaluate(state, perspective)
    }
}

/// Picks the best move for the side to move in `state`, searching `depth`
/// plies. Returns the move together with its score.
pub fn alpha_beta_search<S, E, R>(
    context: &mut SearchContext,
    state: &S,
    evaluator: &E,
    ordering: MoveOrdering,
    depth: u8,
    rng: &mut R,
) -> Result<(S::Move, Score), SearchError>
where
    S: GameState,
    E: Evaluator<S>,
    R: Rng + ?Sized,
{
    context.reset_stats();

    if depth < 1 {
        return Err(SearchError::DepthTooLow);
    }
    if state.is_terminal() {
        return Err(SearchError::NoAvailableMoves);
    }

    let candidates = state.legal_moves();
    if candidates.is_empty() {
        return Err(SearchError::NoAvailableMoves);
    }

    let start = Instant::now();
    let perspective = state.side_to_move();
    let candidates = order_moves(
        context,
        state,
        evaluator,
        perspective,
        ordering,
        candidates,
        true,
        rng,
    );

    let mut alpha = Score::MIN;
    let beta = Score::MAX;
    let mut best: Option<(S::Move, Score)> = None;

    for candidate in candidates {
        if best.is_some() && context.is_aborted() {
            break;
        }
        let child = state.play(&candidate);
        let score = minimax(
            context,
            &child,
            perspective,
            evaluator,
            ordering,
            depth - 1,
            alpha,
            beta,
            rng,
        );

        let improves = match &best {
            Some((_, best_score)) => score > *best_score,
            None => true,
        };
        if improves {
            best = Some((candidate, score));
        }
        alpha = max(alpha, score);
    }

    let (best_move, best_score) = best.ok_or(SearchError::NoAvailableMoves)?;

    let duration = start.elapsed();
    context.last_score = Some(best_score);
    context.last_search_duration = Some(duration);
    debug!(
        "depth {}: score {} after {} positions, {} scorings in {:?}",
        depth,
        best_score,
        context.searched_position_count,
        context.scorings(),
        duration
    );

    Ok((best_move, best_score))
}

/// Minimax with alpha-beta pruning, scored from `perspective`.
///
/// Fail-soft: a node cut off by the window returns the bound that caused the
/// cutoff, which is never better for the caller than the exact value.
#[allow(clippy::too_many_arguments)]
pub fn minimax<S, E, R>(
    context: &mut SearchContext,
    state: &S,
    perspective: S::Side,
    evaluator: &E,
    ordering: MoveOrdering,
    depth: u8,
    mut alpha: Score,
    mut beta: Score,
    rng: &mut R,
) -> Score
where
    S: GameState,
    E: Evaluator<S>,
    R: Rng + ?Sized,
{
    context.searched_position_count += 1;

    if depth == 0 || state.is_terminal() || context.is_aborted() {
        return context.score(evaluator, state, perspective);
    }

    let moves = state.legal_moves();
    if moves.is_empty() {
        return context.score(evaluator, state, perspective);
    }

    let maximizing = state.side_to_move() == perspective;
    let moves = order_moves(
        context,
        state,
        evaluator,
        perspective,
        ordering,
        moves,
        maximizing,
        rng,
    );

    if maximizing {
        let mut best_score = Score::MIN;
        for game_move in moves {
            let child = state.play(&game_move);
            let score = minimax(
                context,
                &child,
                perspective,
                evaluator,
                ordering,
                depth - 1,
                alpha,
                beta,
                rng,
            );
            best_score = max(best_score, score);
            alpha = max(alpha, best_score);
            if alpha >= beta {
                break;
            }
        }
        best_score
    } else {
        let mut best_score = Score::MAX;
        for game_move in moves {
            let child = state.play(&game_move);
            let score = minimax(
                context,
                &child,
                perspective,
                evaluator,
                ordering,
                depth - 1,
                alpha,
                beta,
                rng,
            );
            best_score = min(best_score, score);
            beta = min(beta, best_score);
            if alpha >= beta {
                break;
            }
        }
        best_score
    }
}

/// Plain minimax over every move in generation order, without pruning.
pub fn exhaustive_minimax<S, E>(
    state: &S,
    perspective: S::Side,
    evaluator: &E,
    depth: u8,
) -> Score
where
    S: GameState,
    E: Evaluator<S>,
{
    if depth == 0 || state.is_terminal() {
        return evaluator.evaluate(state, perspective);
    }

    let moves = state.legal_moves();
    if moves.is_empty() {
        return evaluator.evaluate(state, perspective);
    }

    let scores = moves.iter().map(|game_move| {
        exhaustive_minimax(&state.play(game_move), perspective, evaluator, depth - 1)
    });

    if state.side_to_move() == perspective {
        scores.max().unwrap_or(Score::MIN)
    } else {
        scores.min().unwrap_or(Score::MAX)
    }
}

#[allow(clippy::too_many_arguments)]
fn order_moves<S, E, R>(
    context: &mut SearchContext,
    state: &S,
    evaluator: &E,
    perspective: S::Side,
    ordering: MoveOrdering,
    mut moves: Vec<S::Move>,
    maximizing: bool,
    rng: &mut R,
) -> Vec<S::Move>
where
    S: GameState,
    E: Evaluator<S>,
    R: Rng + ?Sized,
{
    match ordering {
        MoveOrdering::InOrder => moves,
        MoveOrdering::Shuffled => {
            moves.shuffle(rng);
            moves
        }
        MoveOrdering::Prioritized { best, random } => prioritize(
            context,
            state,
            evaluator,
            perspective,
            moves,
            maximizing,
            best,
            random,
            rng,
        ),
    }
}

#[allow(clippy::too_many_arguments)]
fn prioritize<S, E, R>(
    context: &mut SearchContext,
    state: &S,
    evaluator: &E,
    perspective: S::Side,
    moves: Vec<S::Move>,
    maximizing: bool,
    best: usize,
    random: usize,
    rng: &mut R,
) -> Vec<S::Move>
where
    S: GameState,
    E: Evaluator<S>,
    R: Rng + ?Sized,
{
    let mut scored: Vec<(Score, S::Move)> = moves
        .into_iter()
        .map(|game_move| {
            let score = context.score(evaluator, &state.play(&game_move), perspective);
            (score, game_move)
        })
        .collect();

    // Ascending, then flipped for the maximizer so the most promising child
    // for the side to move always comes first.
    scored.sort_by_key(|(score, _)| *score);
    if maximizing {
        scored.reverse();
    }

    if scored.len() > best + random {
        let mut rest = scored.split_off(best);
        rest.shuffle(rng);
        rest.truncate(random);
        scored.extend(rest);
    }

    scored.into_iter().map(|(_, game_move)| game_move).collect()
}
