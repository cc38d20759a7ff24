//! Piece-square tables, written from white's side of the board (rank 8 on
//! the first row, rank 1 on the last). Black uses the same tables mirrored
//! across the middle of the board.
//!
//! Every entry stays within `[-50, 50]` so positional terms never outweigh a
//! pawn's worth of material.

use crate::position::{Color, Piece, Square};
use crate::traits::Score;

pub const MAX_PIECE_SQUARE_MAGNITUDE: Score = 50;

type Table = [Score; 64];

#[rustfmt::skip]
const PAWN_TABLE: Table = [
     0,  0,  0,  0,  0,  0,  0,  0,
    50, 50, 50, 50, 50, 50, 50, 50,
    10, 10, 20, 30, 30, 20, 10, 10,
     5,  5, 10, 25, 25, 10,  5,  5,
     0,  0,  0, 20, 20,  0,  0,  0,
     5, -5,-10,  0,  0,-10, -5,  5,
     5, 10, 10,-20,-20, 10, 10,  5,
     0,  0,  0,  0,  0,  0,  0,  0,
];

#[rustfmt::skip]
const KNIGHT_TABLE: Table = [
    -50,-40,-30,-30,-30,-30,-40,-50,
    -40,-20,  0,  0,  0,  0,-20,-40,
    -30,  0, 10, 15, 15, 10,  0,-30,
    -30,  5, 15, 20, 20, 15,  5,-30,
    -30,  0, 15, 20, 20, 15,  0,-30,
    -30,  5, 10, 15, 15, 10,  5,-30,
    -40,-20,  0,  5,  5,  0,-20,-40,
    -50,-40,-30,-30,-30,-30,-40,-50,
];

#[rustfmt::skip]
const BISHOP_TABLE: Table = [
    -20,-10,-10,-10,-10,-10,-10,-20,
    -10,  0,  0,  0,  0,  0,  0,-10,
    -10,  0,  5, 10, 10,  5,  0,-10,
    -10,  5,  5, 10, 10,  5,  5,-10,
    -10,  0, 10, 10, 10, 10,  0,-10,
    -10, 10, 10, 10, 10, 10, 10,-10,
    -10,  5,  0,  0,  0,  0,  5,-10,
    -20,-10,-10,-10,-10,-10,-10,-20,
];

#[rustfmt::skip]
const ROOK_TABLE: Table = [
     0,  0,  0,  0,  0,  0,  0,  0,
     5, 10, 10, 10, 10, 10, 10,  5,
    -5,  0,  0,  0,  0,  0,  0, -5,
    -5,  0,  0,  0,  0,  0,  0, -5,
    -5,  0,  0,  0,  0,  0,  0, -5,
    -5,  0,  0,  0,  0,  0,  0, -5,
    -5,  0,  0,  0,  0,  0,  0, -5,
     0,  0,  0,  5,  5,  0,  0,  0,
];

#[rustfmt::skip]
const QUEEN_TABLE: Table = [
    -20,-10,-10, -5, -5,-10,-10,-20,
    -10,  0,  0,  0,  0,  0,  0,-10,
    -10,  0,  5,  5,  5,  5,  0,-10,
     -5,  0,  5,  5,  5,  5,  0, -5,
      0,  0,  5,  5,  5,  5,  0, -5,
    -10,  5,  5,  5,  5,  5,  0,-10,
    -10,  0,  5,  0,  0,  0,  0,-10,
    -20,-10,-10, -5, -5,-10,-10,-20,
];

#[rustfmt::skip]
const KING_MIDDLEGAME_TABLE: Table = [
    -30,-40,-40,-50,-50,-40,-40,-30,
    -30,-40,-40,-50,-50,-40,-40,-30,
    -30,-40,-40,-50,-50,-40,-40,-30,
    -30,-40,-40,-50,-50,-40,-40,-30,
    -20,-30,-30,-40,-40,-30,-30,-20,
    -10,-20,-20,-20,-20,-20,-20,-10,
     20, 20,  0,  0,  0,  0, 20, 20,
     20, 30, 10,  0,  0, 10, 30, 20,
];

#[rustfmt::skip]
const KING_ENDGAME_TABLE: Table = [
    -50,-40,-30,-20,-20,-30,-40,-50,
    -30,-20,-10,  0,  0,-10,-20,-30,
    -30,-10, 20, 30, 30, 20,-10,-30,
    -30,-10, 30, 40, 40, 30,-10,-30,
    -30,-10, 30, 40, 40, 30,-10,-30,
    -30,-10, 20, 30, 30, 20,-10,-30,
    -30,-30,  0,  0,  0,  0,-30,-30,
    -50,-30,-30,-30,-30,-30,-30,-50,
];

fn table(piece: Piece, endgame: bool) -> &'static Table {
    match piece {
        Piece::Pawn => &PAWN_TABLE,
        Piece::Knight => &KNIGHT_TABLE,
        Piece::Bishop => &BISHOP_TABLE,
        Piece::Rook => &ROOK_TABLE,
        Piece::Queen => &QUEEN_TABLE,
        Piece::King if endgame => &KING_ENDGAME_TABLE,
        Piece::King => &KING_MIDDLEGAME_TABLE,
    }
}

/// Row-major index into a table for a piece of `color` on `square`.
#[inline(always)]
fn table_index(color: Color, square: Square) -> usize {
    let file = square.file() as usize;
    let rank = square.rank() as usize;
    match color {
        Color::White => (7 - rank) * 8 + file,
        Color::Black => rank * 8 + file,
    }
}

/// Positional bonus of `piece` of `color` standing on `square`, seen from
/// that piece's own side.
#[inline(always)]
pub fn piece_square_value(piece: Piece, color: Color, square: Square, endgame: bool) -> Score {
    table(piece, endgame)[table_index(color, square)]
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_TABLES: [&Table; 7] = [
        &PAWN_TABLE,
        &KNIGHT_TABLE,
        &BISHOP_TABLE,
        &ROOK_TABLE,
        &QUEEN_TABLE,
        &KING_MIDDLEGAME_TABLE,
        &KING_ENDGAME_TABLE,
    ];

    #[test]
    fn test_entries_are_bounded() {
        for table in ALL_TABLES.iter() {
            for value in table.iter() {
                assert!(value.abs() <= MAX_PIECE_SQUARE_MAGNITUDE);
            }
        }
    }

    #[test]
    fn test_black_table_mirrors_white() {
        for &piece in Piece::ALL.iter() {
            for &square in Square::ALL.iter() {
                let mirrored = square.flip_rank();
                assert_eq!(
                    piece_square_value(piece, Color::White, square, false),
                    piece_square_value(piece, Color::Black, mirrored, false),
                    "{:?} on {}",
                    piece,
                    square
                );
            }
        }
    }

    #[test]
    fn test_pawns_prefer_advancing() {
        let home = piece_square_value(Piece::Pawn, Color::White, Square::E2, false);
        let center = piece_square_value(Piece::Pawn, Color::White, Square::E4, false);
        let seventh = piece_square_value(Piece::Pawn, Color::White, Square::E7, false);
        assert_eq!(home, -20);
        assert_eq!(center, 20);
        assert_eq!(seventh, 50);
        assert_eq!(
            piece_square_value(Piece::Pawn, Color::Black, Square::E2, false),
            50
        );
    }

    #[test]
    fn test_king_tables_differ_by_phase() {
        let middlegame = piece_square_value(Piece::King, Color::White, Square::G1, false);
        let endgame = piece_square_value(Piece::King, Color::White, Square::G1, true);
        assert_eq!(middlegame, 30);
        assert_eq!(endgame, -30);
    }
}
