use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use rust_piecework::analyzer::{Analyzer, Phase};
use rust_piecework::board::{Board, Coord, Nation, Piece, Player};
use rust_piecework::conditions::PrimitiveRegistry;
use rust_piecework::core::{PieceId, PlayerId};
use rust_piecework::rules::{ActionHeader, Behaviour, BehaviourType, ConditionStep, LoseAction, MoveAction};

const QUEEN: [(i32, i32); 8] = [(0, 1), (1, 1), (1, 0), (1, -1), (0, -1), (-1, -1), (-1, 0), (-1, 1)];

fn queen(id: String) -> Piece {
    Piece::new(id.clone(), "queen").with_behaviour(
        Behaviour::new(format!("{id}-slide"), "slide", BehaviourType::Initiative)
            .with_action(MoveAction::new(ActionHeader::default()).sliding().with_steps(QUEEN)),
    )
}

fn king(id: &str, primitives: &PrimitiveRegistry) -> Piece {
    Piece::new(id, "king")
        .with_behaviour(
            Behaviour::new(format!("{id}-step"), "step", BehaviourType::Initiative)
                .with_action(MoveAction::new(ActionHeader::default()).with_steps(QUEEN)),
        )
        .with_behaviour(
            Behaviour::new(format!("{id}-fall"), "fall", BehaviourType::Passive)
                .with_condition(ConditionStep::compile(
                    ActionHeader::default(),
                    "(not (is-null (vanilla.attacker)))",
                    primitives,
                ))
                .with_action(LoseAction::default()),
        )
}

/// `queens` queens per side plus a king each.
fn setup(queens: i32) -> Board {
    let primitives = PrimitiveRegistry::with_vanilla();
    let mut board = Board::new("bench", 8, 8);
    board.add_player(Player::new("white", 1));
    board.add_player(Player::new("black", 3));

    let mut white = vec![PieceId::new("wk")];
    let mut black = vec![PieceId::new("bk")];
    board.add_piece(king("wk", &primitives), Some(Coord::new(4, 0)));
    board.add_piece(king("bk", &primitives), Some(Coord::new(4, 7)));
    for i in 0..queens {
        let (w, b) = (format!("wq{i}"), format!("bq{i}"));
        white.push(PieceId::new(w.clone()));
        black.push(PieceId::new(b.clone()));
        board.add_piece(queen(w), Some(Coord::new(i, 1)));
        board.add_piece(queen(b), Some(Coord::new(i, 6)));
    }

    let nations = board.nations_mut();
    let w = nations.add_root(Nation::new("nw", "White").with_monarch("white"));
    for id in white {
        nations.add_piece(w, id);
    }
    let b = nations.add_root(Nation::new("nb", "Black").with_monarch("black"));
    for id in black {
        nations.add_piece(b, id);
    }
    board
}

fn bench_analyze(c: &mut Criterion) {
    let analyzer = Analyzer::default();
    let white = PlayerId::new("white");
    let mut group = c.benchmark_group("analyze_player");
    for queens in [1, 4, 8] {
        let board = setup(queens);
        group.bench_with_input(BenchmarkId::from_parameter(queens), &board, |b, board| {
            b.iter(|| black_box(analyzer.analyze_player(board, Phase::Initiative, &white).candidate_count()));
        });
    }
    group.finish();
}

fn bench_board_clone(c: &mut Criterion) {
    let board = setup(8);
    c.bench_function("board_clone_and_move", |b| {
        b.iter(|| {
            let mut next = board.clone();
            next.set_position(&PieceId::new("wq0"), Coord::new(0, 3));
            black_box(next.piece_at(Coord::new(0, 3)).is_some())
        });
    });
}

criterion_group!(benches, bench_analyze, bench_board_clone);
criterion_main!(benches);
