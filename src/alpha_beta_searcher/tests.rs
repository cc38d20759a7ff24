//! Tests for the alpha-beta search.
//!
//! Test coverage:
//! - Basic search functionality on Nim (winning moves, losing positions, game completion)
//! - Error handling (zero depth, no moves)
//! - Pruning equivalence against an unpruned minimax on a synthetic tree
//! - Move ordering (prioritized exploration, sampling limits)
//! - Chess scenarios (legal opening move, mate in one)

use rand::rngs::StdRng;
use rand::SeedableRng;

use super::*;
use crate::evaluate::ScoringModel;
use crate::position::Color;
use crate::traits::{Evaluator, GameState, Outcome};

/// State of a Nim game: players take 1-3 objects, last to take wins.
#[derive(Clone, Debug)]
struct NimState {
    pile: u8,
    is_player_one_turn: bool,
}

impl NimState {
    fn new(pile: u8) -> Self {
        Self {
            pile,
            is_player_one_turn: true,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
struct NimMove {
    take: u8,
}

impl GameState for NimState {
    type Side = bool;
    type Move = NimMove;

    fn side_to_move(&self) -> bool {
        self.is_player_one_turn
    }

    fn legal_moves(&self) -> Vec<NimMove> {
        (1..=std::cmp::min(3, self.pile))
            .map(|take| NimMove { take })
            .collect()
    }

    fn play(&self, game_move: &NimMove) -> Self {
        Self {
            pile: self.pile - game_move.take,
            is_player_one_turn: !self.is_player_one_turn,
        }
    }

    fn outcome(&self) -> Option<Outcome<bool>> {
        if self.pile == 0 {
            // the previous player took the last object
            Some(Outcome::Winner(!self.is_player_one_turn))
        } else {
            None
        }
    }
}

struct NimEvaluator;

impl Evaluator<NimState> for NimEvaluator {
    fn evaluate(&self, state: &NimState, perspective: bool) -> Score {
        let to_move_score = if state.pile == 0 {
            -1000
        } else if state.pile % 4 == 0 {
            // pile % 4 == 0 is a losing position for the player to move
            -100
        } else {
            100
        };
        if state.is_player_one_turn == perspective {
            to_move_score
        } else {
            -to_move_score
        }
    }
}

fn rng() -> StdRng {
    StdRng::seed_from_u64(7)
}

fn search_nim(
    pile: u8,
    depth: u8,
    ordering: MoveOrdering,
) -> Result<(NimMove, Score), SearchError> {
    let state = NimState::new(pile);
    let mut context = SearchContext::new();
    alpha_beta_search(&mut context, &state, &NimEvaluator, ordering, depth, &mut rng())
}

#[test]
fn test_nim_finds_winning_move_from_5() {
    let (best_move, _) = search_nim(5, 10, MoveOrdering::Shuffled).unwrap();
    assert_eq!(
        best_move.take, 1,
        "From pile of 5, should take 1 to leave opponent with 4"
    );
}

#[test]
fn test_nim_finds_winning_move_from_6() {
    let (best_move, _) = search_nim(6, 10, MoveOrdering::Shuffled).unwrap();
    assert_eq!(
        best_move.take, 2,
        "From pile of 6, should take 2 to leave opponent with 4"
    );
}

#[test]
fn test_nim_finds_winning_move_from_7() {
    let (best_move, _) = search_nim(7, 10, MoveOrdering::Shuffled).unwrap();
    assert_eq!(
        best_move.take, 3,
        "From pile of 7, should take 3 to leave opponent with 4"
    );
}

#[test]
fn test_nim_losing_position() {
    let result = search_nim(4, 10, MoveOrdering::InOrder);
    assert!(
        result.is_ok(),
        "Should return a move even from losing position"
    );
    let (best_move, score) = result.unwrap();
    assert!(best_move.take >= 1 && best_move.take <= 3);
    assert!(score < 0, "every move from 4 loses, got {}", score);
}

#[test]
fn test_nim_exhaustive_winning_positions() {
    for pile in 1..=20u8 {
        if pile % 4 == 0 {
            continue;
        }
        let (best_move, score) = search_nim(pile, 8, MoveOrdering::Shuffled).unwrap();
        assert_eq!(
            (pile - best_move.take) % 4,
            0,
            "From pile of {}, should leave a multiple of 4",
            pile
        );
        assert!(score > 0);
    }
}

#[test]
fn test_nim_game_to_completion() {
    let mut state = NimState::new(15);
    let mut context = SearchContext::new();
    let mut rng = rng();

    while !state.is_terminal() {
        let (best_move, _) = alpha_beta_search(
            &mut context,
            &state,
            &NimEvaluator,
            MoveOrdering::Shuffled,
            6,
            &mut rng,
        )
        .unwrap();
        state = state.play(&best_move);
    }

    // 15 is a win for the first player
    assert_eq!(state.outcome(), Some(Outcome::Winner(true)));
}

#[test]
fn test_search_returns_error_for_zero_depth() {
    let result = search_nim(5, 0, MoveOrdering::InOrder);
    assert!(matches!(result, Err(SearchError::DepthTooLow)));
}

#[test]
fn test_search_returns_error_for_no_moves() {
    let result = search_nim(0, 3, MoveOrdering::InOrder);
    assert!(matches!(result, Err(SearchError::NoAvailableMoves)));
}

#[test]
fn test_maximizer_keeps_running_best() {
    // Regression: the maximizing branch must update its best score even when
    // the best child is not the first one explored.
    let state = NimState::new(6);
    let mut context = SearchContext::new();
    let score = minimax(
        &mut context,
        &state,
        true,
        &NimEvaluator,
        MoveOrdering::InOrder,
        1,
        Score::MIN,
        Score::MAX,
        &mut rng(),
    );
    // taking 2 leaves 4 for the opponent
    assert_eq!(score, 100);
}

#[test]
fn test_scorings_are_counted_and_reset() {
    let state = NimState::new(5);
    let mut context = SearchContext::new();
    let mut rng = rng();

    let ordering = MoveOrdering::InOrder;
    alpha_beta_search(&mut context, &state, &NimEvaluator, ordering, 1, &mut rng).unwrap();
    assert_eq!(context.scorings(), 3);
    assert_eq!(context.searched_position_count(), 3);

    alpha_beta_search(&mut context, &state, &NimEvaluator, ordering, 1, &mut rng).unwrap();
    assert_eq!(context.scorings(), 3, "counter resets per top-level search");
    assert!(context.last_score().is_some());
}

#[test]
fn test_raised_abort_flag_stops_after_first_candidate() {
    let state = NimState::new(5);
    let flag = Arc::new(AtomicBool::new(true));
    let mut context = SearchContext::new();
    context.set_abort(Some(flag.clone()));
    let mut rng = rng();

    let ordering = MoveOrdering::InOrder;
    let (first, _) =
        alpha_beta_search(&mut context, &state, &NimEvaluator, ordering, 4, &mut rng).unwrap();
    assert_eq!(first, NimMove { take: 1 });
    assert_eq!(context.searched_position_count(), 1);
    assert_eq!(context.scorings(), 1);

    flag.store(false, std::sync::atomic::Ordering::Relaxed);
    alpha_beta_search(&mut context, &state, &NimEvaluator, ordering, 4, &mut rng).unwrap();
    assert!(context.searched_position_count() > 3);
}

/// A fixed game tree with arbitrary leaf values: three moves per node, and
/// the game ends after `height` plies.
#[derive(Clone, Debug)]
struct ScoreTree {
    path: Vec<u8>,
    height: usize,
}

impl GameState for ScoreTree {
    type Side = bool;
    type Move = u8;

    fn side_to_move(&self) -> bool {
        self.path.len() % 2 == 0
    }

    fn legal_moves(&self) -> Vec<u8> {
        vec![0, 1, 2]
    }

    fn play(&self, game_move: &u8) -> Self {
        let mut path = self.path.clone();
        path.push(*game_move);
        Self {
            path,
            height: self.height,
        }
    }

    fn outcome(&self) -> Option<Outcome<bool>> {
        if self.path.len() >= self.height {
            Some(Outcome::Draw)
        } else {
            None
        }
    }
}

struct PathEvaluator;

impl Evaluator<ScoreTree> for PathEvaluator {
    fn evaluate(&self, state: &ScoreTree, perspective: bool) -> Score {
        let hash = state
            .path
            .iter()
            .fold(17i32, |acc, &m| (acc * 31 + i32::from(m) * 7 + 3) % 1009);
        let value = hash % 101 - 50;
        if perspective {
            value
        } else {
            -value
        }
    }
}

#[test]
fn test_pruning_matches_exhaustive_minimax() {
    for depth in 1..=5u8 {
        let state = ScoreTree {
            path: Vec::new(),
            height: 6,
        };
        let mut context = SearchContext::new();
        let (_, score) = alpha_beta_search(
            &mut context,
            &state,
            &PathEvaluator,
            MoveOrdering::InOrder,
            depth,
            &mut rng(),
        )
        .unwrap();

        let exhaustive = exhaustive_minimax(&state, true, &PathEvaluator, depth);
        assert_eq!(score, exhaustive, "depth {}", depth);
    }
}

#[test]
fn test_pruning_skips_positions() {
    let state = ScoreTree {
        path: Vec::new(),
        height: 6,
    };
    let mut context = SearchContext::new();
    alpha_beta_search(
        &mut context,
        &state,
        &PathEvaluator,
        MoveOrdering::InOrder,
        5,
        &mut rng(),
    )
    .unwrap();

    // an unpruned depth-5 search over three moves per node scores 3^5 leaves
    assert!(context.scorings() < 243, "{} scorings", context.scorings());
}

#[test]
fn test_prioritized_ordering_samples_extra_moves() {
    // with K = 1 and M = 1 only two of the three children are explored at
    // the root, so exactly two first-ply scorings plus two leaf scorings
    let state = ScoreTree {
        path: Vec::new(),
        height: 6,
    };
    let mut context = SearchContext::new();
    alpha_beta_search(
        &mut context,
        &state,
        &PathEvaluator,
        MoveOrdering::Prioritized { best: 1, random: 1 },
        1,
        &mut rng(),
    )
    .unwrap();
    assert_eq!(context.scorings(), 3 + 2);
    assert_eq!(context.searched_position_count(), 2);
}

#[test]
fn test_prioritized_ordering_keeps_best_move() {
    // at depth 1 the statically best child is always explored, so the choice
    // matches an in-order search
    let state = ScoreTree {
        path: Vec::new(),
        height: 6,
    };
    let mut in_order_context = SearchContext::new();
    let (_, expected) = alpha_beta_search(
        &mut in_order_context,
        &state,
        &PathEvaluator,
        MoveOrdering::InOrder,
        1,
        &mut rng(),
    )
    .unwrap();

    let mut context = SearchContext::new();
    let (_, score) = alpha_beta_search(
        &mut context,
        &state,
        &PathEvaluator,
        MoveOrdering::Prioritized { best: 1, random: 0 },
        1,
        &mut rng(),
    )
    .unwrap();
    assert_eq!(score, expected);
}

#[test]
fn test_chess_starting_position_returns_legal_move() {
    let position = Position::starting();
    let mut searcher = AlphaBetaSearcher::with_fixed_depth(EvaluatorConfig::material(), 2);
    let best_move = searcher.best_move(&position, &mut rng()).unwrap();

    assert!(position.legal_moves().contains(&best_move));
    assert_eq!(position, Position::starting(), "search must not mutate the position");
}

#[test]
fn test_chess_finds_mate_in_one() {
    // white mates with Ra8
    let position = Position::from_fen("6k1/5ppp/8/8/8/8/5PPP/R5K1 w - - 0 1").unwrap();
    for &depth in [1u8, 2].iter() {
        for &model in [ScoringModel::Material, ScoringModel::PieceSquare].iter() {
            let config = EvaluatorConfig {
                model,
                ..EvaluatorConfig::default()
            };
            let mut searcher = AlphaBetaSearcher::with_fixed_depth(config, depth);
            let (best_move, score) = searcher.search(&position, &mut rng()).unwrap();

            assert_eq!(best_move.to_string(), "a1a8", "depth {} {:?}", depth, model);
            assert!(score > 8000, "depth {} {:?}: score {}", depth, model, score);
            assert!(position.play(&best_move).is_checkmate());
        }
    }
}

#[test]
fn test_chess_no_legal_moves_is_an_error() {
    let stalemate = Position::from_fen("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1").unwrap();
    let mut searcher = AlphaBetaSearcher::with_fixed_depth(EvaluatorConfig::default(), 2);
    assert_eq!(
        searcher.best_move(&stalemate, &mut rng()),
        Err(SearchError::NoAvailableMoves)
    );
}

#[test]
fn test_adaptive_searcher_adjusts_depth() {
    let position = Position::from_fen("6k1/5ppp/8/8/8/8/5PPP/R5K1 w - - 0 10").unwrap();
    let policy = DepthPolicy::Adaptive(AdaptiveDepth::new(1, 1_000_000));
    let mut searcher =
        AlphaBetaSearcher::new(EvaluatorConfig::material(), MoveOrdering::Shuffled, policy);

    assert_eq!(searcher.current_depth(), 1);
    searcher.best_move(&position, &mut rng()).unwrap();
    assert_eq!(searcher.current_depth(), 2);
    assert_eq!(position.side_to_move(), Color::White);
}
