//! Attacker/defender counting evaluation.
//!
//! Instead of a piece-square table, every occupied square is judged by how
//! many enemy pieces attack it and how many friendly pieces defend it, and
//! every empty square is awarded to the side that controls it.

use std::cmp::max;

use crate::position::{Color, Piece, Position, Square};
use crate::traits::Score;

/// Larger than any real attacker weight; marks "no attacker seen yet".
const NO_ATTACKER: Score = 12;
const BASE_MULTIPLIER: Score = 100;
const PENALTY_MULTIPLIER: Score = 50;
const DEFENDED_BONUS_MULTIPLIER: Score = 10;
const TERRITORY_WORTH: Score = 5;
const CENTER_TERRITORY_WORTH: Score = 10;
const CENTER: [Square; 4] = [Square::D4, Square::D5, Square::E4, Square::E5];

pub fn attack_weight(piece: Piece) -> Score {
    match piece {
        Piece::Pawn => 1,
        Piece::Knight => 3,
        Piece::Bishop => 3,
        Piece::Rook => 5,
        Piece::Queen => 9,
        Piece::King => 10,
    }
}

/// Per-side attack counts and the weight of the weakest attacker on every
/// square, indexed `[color][square]`.
struct AttackMap {
    attackers: [[u32; 64]; 2],
    weakest_attacker: [[Score; 64]; 2],
}

impl AttackMap {
    fn build(position: &Position) -> Self {
        let mut map = Self {
            attackers: [[0; 64]; 2],
            weakest_attacker: [[NO_ATTACKER; 64]; 2],
        };

        for square in position.occupied() {
            if let Some((piece, color)) = position.piece_at(square) {
                let weight = attack_weight(piece);
                for target in position.attacks(square) {
                    let side = color as usize;
                    let target = target as usize;
                    map.attackers[side][target] += 1;
                    if weight < map.weakest_attacker[side][target] {
                        map.weakest_attacker[side][target] = weight;
                    }
                }
            }
        }

        map
    }

    fn count(&self, color: Color, square: Square) -> i32 {
        self.attackers[color as usize][square as usize] as i32
    }

    fn weakest(&self, color: Color, square: Square) -> Score {
        self.weakest_attacker[color as usize][square as usize]
    }
}

/// Score of the position from white's point of view.
pub fn attack_defense_score(position: &Position) -> Score {
    let map = AttackMap::build(position);
    let mut score = 0;

    for &square in Square::ALL.iter() {
        match position.piece_at(square) {
            Some((piece, color)) => {
                let piece_score = occupied_square_score(position, &map, piece, color, square);
                score += signed(color, piece_score);
            }
            None => {
                let worth = if CENTER.contains(&square) {
                    CENTER_TERRITORY_WORTH
                } else {
                    TERRITORY_WORTH
                };
                let white = map.count(Color::White, square);
                let black = map.count(Color::Black, square);
                if white > black {
                    score += worth;
                } else if black > white {
                    score -= worth;
                }
            }
        }
    }

    score
}

fn occupied_square_score(
    position: &Position,
    map: &AttackMap,
    piece: Piece,
    color: Color,
    square: Square,
) -> Score {
    let weight = attack_weight(piece);
    let enemy = !color;
    let attackers = map.count(enemy, square);
    let defenders = map.count(color, square);

    let mut piece_score = BASE_MULTIPLIER * weight;

    if attackers > 0 {
        if defenders > 0 {
            let exchange_loss = weight - map.weakest(enemy, square);
            piece_score -= max(0, PENALTY_MULTIPLIER * exchange_loss);
        } else {
            piece_score -= PENALTY_MULTIPLIER * weight;
        }
    }

    // The side to move can answer one attacker by itself.
    let required_defenders = if position.side_to_move() == color {
        attackers - 1
    } else {
        attackers
    };
    if defenders >= required_defenders {
        piece_score += DEFENDED_BONUS_MULTIPLIER * weight;
    }

    piece_score
}

#[inline(always)]
fn signed(color: Color, score: Score) -> Score {
    match color {
        Color::White => score,
        Color::Black => -score,
    }
}
