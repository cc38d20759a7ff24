use thiserror::Error;

#[derive(Error, Debug)]
pub enum PositionError {
    #[error("Invalid FEN `{fen}`: {reason}")]
    InvalidFen { fen: String, reason: String },
    #[error("Illegal move {chess_move} in position {fen}")]
    IllegalMove { chess_move: String, fen: String },
    #[error("Cannot parse move `{0}`")]
    UnparsableMove(String),
}
