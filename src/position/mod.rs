//! Thin adapter over the `cozy-chess` rules engine.
//!
//! The search code never touches `cozy_chess::Board` directly: every rule
//! query goes through [`Position`], which is cheap to clone and is explored
//! copy-on-branch, so a caller's position is never mutated by a search.

pub mod error;

use std::fmt;
use std::str::FromStr;

pub use cozy_chess::{BitBoard, Color, File, Move, Piece, Rank, Square};
use cozy_chess::{
    get_bishop_moves, get_king_moves, get_knight_moves, get_pawn_attacks, get_rook_moves, Board,
    GameStatus,
};

pub use self::error::PositionError;
use crate::traits::{GameState, Outcome};

pub const STARTING_POSITION_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// Final (or current) state of a game, from white's point of view.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameResult {
    WhiteWins,
    BlackWins,
    Draw,
    InProgress,
}

impl GameResult {
    pub fn winner(self) -> Option<Color> {
        match self {
            GameResult::WhiteWins => Some(Color::White),
            GameResult::BlackWins => Some(Color::Black),
            GameResult::Draw | GameResult::InProgress => None,
        }
    }
}

impl fmt::Display for GameResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let result = match self {
            GameResult::WhiteWins => "1-0",
            GameResult::BlackWins => "0-1",
            GameResult::Draw => "1/2-1/2",
            GameResult::InProgress => "*",
        };
        write!(f, "{}", result)
    }
}

#[derive(Clone, Debug)]
pub struct Position {
    board: Board,
}

impl PartialEq for Position {
    fn eq(&self, other: &Self) -> bool {
        self.to_fen() == other.to_fen()
    }
}

impl Eq for Position {}

impl Default for Position {
    fn default() -> Self {
        Self::starting()
    }
}

impl Position {
    pub fn starting() -> Self {
        Self {
            board: Board::default(),
        }
    }

    pub fn from_fen(fen: &str) -> Result<Self, PositionError> {
        let board = fen
            .trim()
            .parse::<Board>()
            .map_err(|err| PositionError::InvalidFen {
                fen: fen.to_string(),
                reason: format!("{:?}", err),
            })?;
        Ok(Self { board })
    }

    pub fn to_fen(&self) -> String {
        format!("{}", self.board)
    }

    pub fn legal_moves(&self) -> Vec<Move> {
        let mut moves = Vec::new();
        self.board.generate_moves(|piece_moves| {
            moves.extend(piece_moves);
            false
        });
        moves
    }

    pub fn is_legal(&self, chess_move: &Move) -> bool {
        self.board.is_legal(*chess_move)
    }

    /// Returns the position reached after `chess_move`. The move must come
    /// from [`Position::legal_moves`] of this position.
    pub fn play(&self, chess_move: &Move) -> Position {
        let mut board = self.board.clone();
        board.play_unchecked(*chess_move);
        Position { board }
    }

    /// Validating variant of [`Position::play`] for moves of unknown origin.
    pub fn try_play(&self, chess_move: &Move) -> Result<Position, PositionError> {
        let mut board = self.board.clone();
        board
            .try_play(*chess_move)
            .map_err(|_| PositionError::IllegalMove {
                chess_move: chess_move.to_string(),
                fen: self.to_fen(),
            })?;
        Ok(Position { board })
    }

    pub fn parse_move(&self, uci: &str) -> Result<Move, PositionError> {
        let chess_move = Move::from_str(uci.trim())
            .map_err(|_| PositionError::UnparsableMove(uci.to_string()))?;
        if !self.is_legal(&chess_move) {
            return Err(PositionError::IllegalMove {
                chess_move: uci.to_string(),
                fen: self.to_fen(),
            });
        }
        Ok(chess_move)
    }

    pub fn side_to_move(&self) -> Color {
        self.board.side_to_move()
    }

    pub fn fullmove_number(&self) -> u16 {
        self.board.fullmove_number()
    }

    pub fn is_check(&self) -> bool {
        !self.board.checkers().is_empty()
    }

    pub fn is_checkmate(&self) -> bool {
        matches!(self.board.status(), GameStatus::Won)
    }

    pub fn is_game_over(&self) -> bool {
        self.result() != GameResult::InProgress
    }

    pub fn result(&self) -> GameResult {
        match self.board.status() {
            // `Won` means the side that just moved delivered mate.
            GameStatus::Won => match self.side_to_move() {
                Color::White => GameResult::BlackWins,
                Color::Black => GameResult::WhiteWins,
            },
            GameStatus::Drawn => GameResult::Draw,
            GameStatus::Ongoing if self.has_insufficient_material() => GameResult::Draw,
            GameStatus::Ongoing => GameResult::InProgress,
        }
    }

    pub fn piece_at(&self, square: Square) -> Option<(Piece, Color)> {
        let piece = self.board.piece_on(square)?;
        let color = self.board.color_on(square)?;
        Some((piece, color))
    }

    pub fn pieces(&self, piece: Piece, color: Color) -> BitBoard {
        self.board.colored_pieces(color, piece)
    }

    pub fn occupied(&self) -> BitBoard {
        self.board.occupied()
    }

    pub fn piece_count(&self) -> u32 {
        self.board.occupied().len()
    }

    /// Both kings are always on the board: `cozy-chess` refuses to build a
    /// position without them.
    pub fn king_square(&self, color: Color) -> Square {
        self.board.king(color)
    }

    /// Squares attacked by the piece standing on `square`, empty if the
    /// square is empty.
    pub fn attacks(&self, square: Square) -> BitBoard {
        let (piece, color) = match self.piece_at(square) {
            Some(found) => found,
            None => return BitBoard::EMPTY,
        };
        let blockers = self.board.occupied();
        match piece {
            Piece::Pawn => get_pawn_attacks(square, color),
            Piece::Knight => get_knight_moves(square),
            Piece::Bishop => get_bishop_moves(square, blockers),
            Piece::Rook => get_rook_moves(square, blockers),
            Piece::Queen => get_bishop_moves(square, blockers) | get_rook_moves(square, blockers),
            Piece::King => get_king_moves(square),
        }
    }

    /// The piece captured by `chess_move`, if any. Castling is encoded as the
    /// king moving onto its own rook and never counts as a capture.
    pub fn captured_piece(&self, chess_move: &Move) -> Option<Piece> {
        match self.piece_at(chess_move.to) {
            Some((piece, color)) if color != self.side_to_move() => Some(piece),
            _ => None,
        }
    }

    /// Bare kings, or a single minor piece against a bare king.
    fn has_insufficient_material(&self) -> bool {
        let heavy_or_pawns = self.board.pieces(Piece::Pawn)
            | self.board.pieces(Piece::Rook)
            | self.board.pieces(Piece::Queen);
        if !heavy_or_pawns.is_empty() {
            return false;
        }
        let minors = self.board.pieces(Piece::Knight) | self.board.pieces(Piece::Bishop);
        minors.len() <= 1
    }
}

impl FromStr for Position {
    type Err = PositionError;

    fn from_str(fen: &str) -> Result<Self, Self::Err> {
        Position::from_fen(fen)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for rank in Rank::ALL.iter().rev() {
            for file in File::ALL.iter() {
                let square = Square::new(*file, *rank);
                let symbol = match self.piece_at(square) {
                    Some((piece, color)) => piece_char(piece, color),
                    None => '.',
                };
                write!(f, "{}", symbol)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

fn piece_char(piece: Piece, color: Color) -> char {
    let c = match piece {
        Piece::Pawn => 'p',
        Piece::Knight => 'n',
        Piece::Bishop => 'b',
        Piece::Rook => 'r',
        Piece::Queen => 'q',
        Piece::King => 'k',
    };
    match color {
        Color::White => c.to_ascii_uppercase(),
        Color::Black => c,
    }
}

impl GameState for Position {
    type Side = Color;
    type Move = Move;

    #[inline]
    fn side_to_move(&self) -> Color {
        Position::side_to_move(self)
    }

    #[inline]
    fn legal_moves(&self) -> Vec<Move> {
        Position::legal_moves(self)
    }

    #[inline]
    fn play(&self, game_move: &Move) -> Position {
        Position::play(self, game_move)
    }

    fn outcome(&self) -> Option<Outcome<Color>> {
        match self.result() {
            GameResult::WhiteWins => Some(Outcome::Winner(Color::White)),
            GameResult::BlackWins => Some(Outcome::Winner(Color::Black)),
            GameResult::Draw => Some(Outcome::Draw),
            GameResult::InProgress => None,
        }
    }
}

/// Chebyshev ("king move") distance between two squares.
pub fn king_distance(a: Square, b: Square) -> u8 {
    let file_delta = (a.file() as i8 - b.file() as i8).abs();
    let rank_delta = (a.rank() as i8 - b.rank() as i8).abs();
    file_delta.max(rank_delta) as u8
}
