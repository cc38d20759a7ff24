//! Static evaluation of chess positions.
//!
//! A single [`ChessEvaluator`] covers every scoring variant the bots use; the
//! variants differ only in their [`EvaluatorConfig`]. Score magnitudes come in
//! bands that never overlap: a checkmate (9000) always outranks material, and
//! a queen's worth of material (900) always outranks the piece-square terms
//! (at most 50 per square).

mod attack_defense;
mod piece_square_tables;
mod scoring_counter;

use serde::{Deserialize, Serialize};

use crate::position::{Color, Piece, Position};
use crate::traits::{Evaluator, Score};

pub use self::attack_defense::{attack_defense_score, attack_weight};
pub use self::piece_square_tables::{piece_square_value, MAX_PIECE_SQUARE_MAGNITUDE};
pub use self::scoring_counter::ScoringCounter;

pub const DEFAULT_MATE_BONUS: Score = 9000;

/// Piece kinds that carry a material bonus, most valuable first.
pub const MATERIAL_PIECES: [Piece; 5] = [
    Piece::Queen,
    Piece::Rook,
    Piece::Bishop,
    Piece::Knight,
    Piece::Pawn,
];

pub fn material_value(piece: Piece) -> Score {
    match piece {
        Piece::Pawn => 100,
        Piece::Knight => 300,
        Piece::Bishop => 300,
        Piece::Rook => 500,
        Piece::Queen => 900,
        Piece::King => 0,
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScoringModel {
    /// Material count only; drawn positions score zero.
    Material,
    /// Piece-square tables plus per-kind material bonuses.
    PieceSquare,
    /// Attacker/defender counting per square plus territory.
    AttackDefense,
}

/// What the per-kind material bonus is measured against.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MaterialBaseline {
    /// The opponent's current count of the same kind.
    Opponent,
    /// The balance of that kind when the search started.
    SearchStart,
}

/// When the endgame king table replaces the middlegame one.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EndgameTrigger {
    /// Past this full-move number.
    MoveNumber(u16),
    /// At or below this many pieces on the board, kings included.
    PieceCount(u32),
}

impl EndgameTrigger {
    pub fn is_endgame(self, position: &Position) -> bool {
        match self {
            EndgameTrigger::MoveNumber(move_number) => position.fullmove_number() > move_number,
            EndgameTrigger::PieceCount(pieces) => position.piece_count() <= pieces,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvaluatorConfig {
    pub model: ScoringModel,
    pub material_baseline: MaterialBaseline,
    pub mate_bonus: Score,
    pub endgame: EndgameTrigger,
}

impl Default for EvaluatorConfig {
    fn default() -> Self {
        Self {
            model: ScoringModel::PieceSquare,
            material_baseline: MaterialBaseline::Opponent,
            mate_bonus: DEFAULT_MATE_BONUS,
            endgame: EndgameTrigger::PieceCount(22),
        }
    }
}

impl EvaluatorConfig {
    pub fn material() -> Self {
        Self {
            model: ScoringModel::Material,
            ..Self::default()
        }
    }

    pub fn attack_defense() -> Self {
        Self {
            model: ScoringModel::AttackDefense,
            ..Self::default()
        }
    }
}

/// Per-kind material balance (own count minus opponent count), indexed by
/// `Piece as usize`.
type MaterialBalance = [i32; 6];

#[derive(Clone, Debug)]
pub struct ChessEvaluator {
    config: EvaluatorConfig,
    /// Balance seen from white; only consulted with `MaterialBaseline::SearchStart`.
    baseline: MaterialBalance,
}

impl Default for ChessEvaluator {
    fn default() -> Self {
        Self::new(EvaluatorConfig::default())
    }
}

impl ChessEvaluator {
    pub fn new(config: EvaluatorConfig) -> Self {
        Self {
            config,
            baseline: [0; 6],
        }
    }

    pub fn config(&self) -> &EvaluatorConfig {
        &self.config
    }

    /// Takes the material snapshot used by `MaterialBaseline::SearchStart`.
    pub fn anchored_at(mut self, root: &Position) -> Self {
        if self.config.material_baseline == MaterialBaseline::SearchStart {
            self.baseline = material_balance(root, Color::White);
        }
        self
    }

    /// Scores `position` for `perspective`; positive favors `perspective`.
    pub fn score(&self, position: &Position, perspective: Color) -> Score {
        match self.config.model {
            ScoringModel::Material => self.material_score(position, perspective),
            ScoringModel::PieceSquare => self.piece_square_score(position, perspective),
            ScoringModel::AttackDefense => self.attack_defense_score(position, perspective),
        }
    }

    fn material_score(&self, position: &Position, perspective: Color) -> Score {
        if position.is_checkmate() {
            return self.mate_score(position, perspective);
        }
        if position.is_game_over() {
            return 0;
        }

        let balance = material_balance(position, perspective);
        MATERIAL_PIECES
            .iter()
            .map(|&piece| balance[piece as usize] * material_value(piece))
            .sum()
    }

    fn piece_square_score(&self, position: &Position, perspective: Color) -> Score {
        let endgame = self.config.endgame.is_endgame(position);
        let mut score = 0;

        for square in position.occupied() {
            if let Some((piece, color)) = position.piece_at(square) {
                let value = piece_square_value(piece, color, square, endgame);
                score += if color == perspective { value } else { -value };
            }
        }

        if position.is_checkmate() {
            score += self.mate_score(position, perspective);
        }

        score + self.material_bonus(position, perspective)
    }

    fn attack_defense_score(&self, position: &Position, perspective: Color) -> Score {
        if position.is_checkmate() {
            return self.mate_score(position, perspective);
        }
        if position.is_game_over() {
            return 0;
        }

        let white_score = attack_defense_score(position);
        match perspective {
            Color::White => white_score,
            Color::Black => -white_score,
        }
    }

    /// Positive when the side to move (the mated side) is not `perspective`.
    fn mate_score(&self, position: &Position, perspective: Color) -> Score {
        if position.side_to_move() == perspective {
            -self.config.mate_bonus
        } else {
            self.config.mate_bonus
        }
    }

    /// Adds the fixed bonus of every kind where `perspective` is ahead of the
    /// baseline and subtracts it where it is behind.
    fn material_bonus(&self, position: &Position, perspective: Color) -> Score {
        let balance = material_balance(position, perspective);
        let baseline = self.baseline_for(perspective);

        MATERIAL_PIECES
            .iter()
            .map(|&piece| {
                let index = piece as usize;
                match balance[index].cmp(&baseline[index]) {
                    std::cmp::Ordering::Greater => material_value(piece),
                    std::cmp::Ordering::Less => -material_value(piece),
                    std::cmp::Ordering::Equal => 0,
                }
            })
            .sum()
    }

    fn baseline_for(&self, perspective: Color) -> MaterialBalance {
        match (self.config.material_baseline, perspective) {
            (MaterialBaseline::Opponent, _) => [0; 6],
            (MaterialBaseline::SearchStart, Color::White) => self.baseline,
            (MaterialBaseline::SearchStart, Color::Black) => {
                let mut flipped = self.baseline;
                flipped.iter_mut().for_each(|balance| *balance = -*balance);
                flipped
            }
        }
    }
}

impl Evaluator<Position> for ChessEvaluator {
    #[inline]
    fn evaluate(&self, state: &Position, perspective: Color) -> Score {
        self.score(state, perspective)
    }
}

fn material_balance(position: &Position, perspective: Color) -> MaterialBalance {
    let mut balance = [0; 6];
    for &piece in Piece::ALL.iter() {
        let own = position.pieces(piece, perspective).len() as i32;
        let theirs = position.pieces(piece, !perspective).len() as i32;
        balance[piece as usize] = own - theirs;
    }
    balance
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::position::Square;

    fn piece_square() -> ChessEvaluator {
        ChessEvaluator::new(EvaluatorConfig::default())
    }

    #[test]
    fn test_starting_position_scores_zero() {
        let position = Position::starting();
        for config in [
            EvaluatorConfig::default(),
            EvaluatorConfig::material(),
            EvaluatorConfig::attack_defense(),
        ]
        .iter()
        {
            let evaluator = ChessEvaluator::new(*config);
            assert_eq!(evaluator.score(&position, Color::White), 0);
            assert_eq!(evaluator.score(&position, Color::Black), 0);
        }
    }

    #[test]
    fn test_perspectives_are_symmetric() {
        let position =
            Position::from_fen("r1bqkbnr/pppp1ppp/2n5/4p3/4P3/5N2/PPPP1PPP/RNBQKB1R w KQkq - 2 3")
                .unwrap();
        let evaluator = piece_square();
        assert_eq!(
            evaluator.score(&position, Color::White),
            -evaluator.score(&position, Color::Black)
        );
    }

    #[test]
    fn test_checkmate_bonus() {
        // fool's mate: white to move and mated
        let position =
            Position::from_fen("rnb1kbnr/pppp1ppp/8/4p3/6Pq/5P2/PPPPP2P/RNBQKBNR w KQkq - 1 3")
                .unwrap();
        let evaluator = piece_square();
        assert!(evaluator.score(&position, Color::Black) > 8000);
        assert!(evaluator.score(&position, Color::White) < -8000);

        let material = ChessEvaluator::new(EvaluatorConfig::material());
        assert_eq!(material.score(&position, Color::Black), DEFAULT_MATE_BONUS);
    }

    #[test]
    fn test_magnitude_bands_do_not_overlap() {
        assert!(DEFAULT_MATE_BONUS > material_value(Piece::Queen));
        assert!(material_value(Piece::Queen) > MAX_PIECE_SQUARE_MAGNITUDE);
        for &piece in MATERIAL_PIECES.iter() {
            assert!(material_value(piece) > MAX_PIECE_SQUARE_MAGNITUDE);
        }
    }

    #[test]
    fn test_missing_kind_contributes_nothing_positionally() {
        // identical except for the knights; with equal knight counts the
        // material bonus is zero, so only the knight squares can differ
        let with_knights = Position::from_fen("1n2k3/8/8/8/8/8/8/4K1N1 w - - 0 1").unwrap();
        let without_knights = Position::from_fen("4k3/8/8/8/8/8/8/4K3 w - - 0 1").unwrap();
        let evaluator = piece_square();

        let knight_terms = piece_square_value(Piece::Knight, Color::White, Square::G1, true)
            - piece_square_value(Piece::Knight, Color::Black, Square::B8, true);
        assert_eq!(knight_terms, 0);
        assert_eq!(
            evaluator.score(&with_knights, Color::White),
            evaluator.score(&without_knights, Color::White)
        );
    }

    #[test]
    fn test_material_bonus_against_opponent() {
        // white is a queen up; everything else mirrors
        let position = Position::from_fen("4k3/8/8/8/8/8/8/3QK3 w - - 0 1").unwrap();
        let evaluator = piece_square();
        let score = evaluator.score(&position, Color::White);
        let queen_square = piece_square_value(Piece::Queen, Color::White, Square::D1, true);
        let kings = piece_square_value(Piece::King, Color::White, Square::E1, true)
            - piece_square_value(Piece::King, Color::Black, Square::E8, true);
        assert_eq!(score, 900 + queen_square + kings);
    }

    #[test]
    fn test_material_bonus_against_search_start() {
        // material is already unequal at the root, so only changes count
        let root = Position::from_fen("4k3/8/8/8/8/8/8/3QK3 w - - 0 1").unwrap();
        let config = EvaluatorConfig {
            material_baseline: MaterialBaseline::SearchStart,
            ..EvaluatorConfig::default()
        };
        let anchored = ChessEvaluator::new(config).anchored_at(&root);
        let opponent_based = piece_square();

        let root_white = anchored.score(&root, Color::White);
        assert_eq!(root_white, opponent_based.score(&root, Color::White) - 900);
        assert_eq!(anchored.score(&root, Color::Black), -root_white);

        // after white loses the queen the balance is worse than at the root
        let queen_lost = Position::from_fen("4k3/8/8/8/8/8/8/4K3 w - - 0 1").unwrap();
        let lost_score = anchored.score(&queen_lost, Color::White);
        assert_eq!(lost_score, opponent_based.score(&queen_lost, Color::White) - 900);
    }

    #[test]
    fn test_endgame_triggers() {
        let position = Position::starting();
        assert!(!EndgameTrigger::PieceCount(22).is_endgame(&position));
        assert!(EndgameTrigger::PieceCount(32).is_endgame(&position));
        assert!(!EndgameTrigger::MoveNumber(15).is_endgame(&position));

        let late = Position::from_fen("4k3/8/8/8/8/8/8/4K3 w - - 0 40").unwrap();
        assert!(EndgameTrigger::MoveNumber(15).is_endgame(&late));
    }

    #[test]
    fn test_material_model_counts_pieces() {
        let position = Position::from_fen("4k3/8/8/8/8/8/8/R3K3 b - - 0 1").unwrap();
        let evaluator = ChessEvaluator::new(EvaluatorConfig::material());
        assert_eq!(evaluator.score(&position, Color::White), 500);
        assert_eq!(evaluator.score(&position, Color::Black), -500);
    }

    #[test]
    fn test_material_model_scores_draws_as_zero() {
        let stalemate = Position::from_fen("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1").unwrap();
        let evaluator = ChessEvaluator::new(EvaluatorConfig::material());
        assert_eq!(evaluator.score(&stalemate, Color::White), 0);
    }
}
