//! Weighted-random baseline policies. None of them searches: each picks a
//! move in time linear in the number of legal moves.

use rand::distributions::{Distribution, WeightedIndex};
use rand::seq::SliceRandom;
use rand::{Rng, RngCore};

use crate::evaluate::material_value;
use crate::position::{king_distance, Move, Position};
use crate::traits::{MoveSelector, SearchError};

/// Prefers moves landing close to the enemy king: a move landing `d` squares
/// (king distance) away weighs `(max + 1 - d)^3`, where `max` is the largest
/// distance among the candidates.
#[derive(Clone, Copy, Debug, Default)]
pub struct DistanceBiased;

/// With probability `attack_probability`, and when any capture is available,
/// samples a capture weighted by the captured piece's value; otherwise falls
/// back to [`DistanceBiased`].
#[derive(Clone, Copy, Debug)]
pub struct AttackBiased {
    attack_probability: f64,
}

/// Any legal move, uniformly.
#[derive(Clone, Copy, Debug, Default)]
pub struct UniformRandom;

impl AttackBiased {
    pub fn new(attack_probability: f64) -> Self {
        Self {
            attack_probability: attack_probability.max(0.0).min(1.0),
        }
    }

    pub fn attack_probability(&self) -> f64 {
        self.attack_probability
    }
}

pub fn distance_weights(position: &Position, moves: &[Move]) -> Vec<u64> {
    let enemy_king = position.king_square(!position.side_to_move());
    let distances: Vec<u64> = moves
        .iter()
        .map(|chess_move| u64::from(king_distance(chess_move.to, enemy_king)))
        .collect();
    let max_distance = distances.iter().copied().max().unwrap_or(0);
    distances
        .into_iter()
        .map(|distance| (max_distance + 1 - distance).pow(3))
        .collect()
}

fn sample_weighted<R: Rng + ?Sized>(
    moves: &[Move],
    weights: &[u64],
    rng: &mut R,
) -> Result<Move, SearchError> {
    let index = WeightedIndex::new(weights).map_err(|_| SearchError::NoAvailableMoves)?;
    Ok(moves[index.sample(rng)])
}

fn legal_moves(position: &Position) -> Result<Vec<Move>, SearchError> {
    if position.is_game_over() {
        return Err(SearchError::NoAvailableMoves);
    }
    let moves = position.legal_moves();
    if moves.is_empty() {
        return Err(SearchError::NoAvailableMoves);
    }
    Ok(moves)
}

impl MoveSelector for DistanceBiased {
    fn select_move(&self, position: &Position, rng: &mut dyn RngCore) -> Result<Move, SearchError> {
        let moves = legal_moves(position)?;
        let weights = distance_weights(position, &moves);
        sample_weighted(&moves, &weights, rng)
    }
}

impl MoveSelector for AttackBiased {
    fn select_move(&self, position: &Position, rng: &mut dyn RngCore) -> Result<Move, SearchError> {
        let moves = legal_moves(position)?;

        let (captures, capture_weights): (Vec<Move>, Vec<u64>) = moves
            .iter()
            .filter_map(|chess_move| {
                position
                    .captured_piece(chess_move)
                    .map(|piece| (*chess_move, material_value(piece) as u64))
            })
            .unzip();

        if !captures.is_empty() && rng.gen_bool(self.attack_probability) {
            return sample_weighted(&captures, &capture_weights, rng);
        }

        let weights = distance_weights(position, &moves);
        sample_weighted(&moves, &weights, rng)
    }
}

impl MoveSelector for UniformRandom {
    fn select_move(&self, position: &Position, rng: &mut dyn RngCore) -> Result<Move, SearchError> {
        let moves = legal_moves(position)?;
        moves.choose(rng).copied().ok_or(SearchError::NoAvailableMoves)
    }
}
