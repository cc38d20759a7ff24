use chessbot::alpha_beta_searcher::{AlphaBetaSearcher, DepthPolicy, MoveOrdering};
use chessbot::evaluate::EvaluatorConfig;
use chessbot::position::Position;

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn criterion_benchmark(c: &mut Criterion) {
    let position =
        Position::from_fen("r1bqkbnr/pppp1ppp/2n5/4p3/4P3/5N2/PPPP1PPP/RNBQKB1R w KQkq - 2 3")
            .unwrap();

    c.bench_function("alpha beta depth 3", |b| {
        b.iter(|| search(&position, MoveOrdering::Shuffled, 3))
    });
    c.bench_function("alpha beta prioritized depth 3", |b| {
        b.iter(|| search(&position, MoveOrdering::Prioritized { best: 5, random: 3 }, 3))
    });
    c.bench_function("alpha beta back rank mate", |b| {
        b.iter(find_back_rank_mate)
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);

fn search(position: &Position, ordering: MoveOrdering, depth: u8) {
    let mut searcher =
        AlphaBetaSearcher::new(EvaluatorConfig::default(), ordering, DepthPolicy::Fixed(depth));
    let mut rng = StdRng::seed_from_u64(0);
    black_box(searcher.search(black_box(position), &mut rng).unwrap());
}

fn find_back_rank_mate() {
    let position = Position::from_fen("6k1/5ppp/8/8/8/8/5PPP/R5K1 w - - 0 1").unwrap();
    let mut searcher = AlphaBetaSearcher::with_fixed_depth(EvaluatorConfig::default(), 2);
    let mut rng = StdRng::seed_from_u64(0);
    let (best_move, _) = searcher.search(&position, &mut rng).unwrap();
    assert!(position.play(&best_move).is_checkmate());
}
