use criterion::{black_box, criterion_group, criterion_main, Criterion};
use tui_arcade::core::bubble::{find_cluster, find_floating, trace};
use tui_arcade::core::match3::{find_matches, generate};
use tui_arcade::core::sudoku::{self, Difficulty};
use tui_arcade::core::{BubbleGame, Match3Game, SimpleRng};
use tui_arcade::engine::{best_aim, best_swap};
use tui_arcade::term::{FrameBuffer, Match3View, Viewport};
use tui_arcade::types::{Pos, MATCH3_COLORS, MATCH3_HEIGHT, MATCH3_WIDTH};

fn bench_match3_generate(c: &mut Criterion) {
    let mut rng = SimpleRng::new(12345);
    c.bench_function("match3_generate_8x8", |b| {
        b.iter(|| generate(MATCH3_WIDTH, MATCH3_HEIGHT, MATCH3_COLORS, black_box(&mut rng)))
    });
}

fn bench_match3_find_matches(c: &mut Criterion) {
    let game = Match3Game::new(12345);
    c.bench_function("match3_find_matches", |b| {
        b.iter(|| find_matches(black_box(game.grid())))
    });
}

fn bench_match3_swap(c: &mut Criterion) {
    let game = Match3Game::new(12345);
    let (a, b) = game.valid_moves()[0];
    c.bench_function("match3_swap_and_resolve", |bench| {
        bench.iter(|| {
            let mut trial = game.clone();
            trial.try_swap(black_box(a), black_box(b))
        })
    });
}

fn bench_match3_hint(c: &mut Criterion) {
    let game = Match3Game::new(12345);
    c.bench_function("match3_best_swap", |b| b.iter(|| best_swap(black_box(&game))));
}

fn bench_bubble_trace(c: &mut Criterion) {
    let game = BubbleGame::new(12345);
    c.bench_function("bubble_trace_bank_shot", |b| {
        b.iter(|| trace(black_box(game.grid()), black_box(30.0)))
    });
}

fn bench_bubble_clusters(c: &mut Criterion) {
    let game = BubbleGame::new(12345);
    c.bench_function("bubble_cluster_and_floating", |b| {
        b.iter(|| {
            let cluster = find_cluster(black_box(game.grid()), Pos::new(0, 0), true);
            let floating = find_floating(black_box(game.grid()));
            (cluster, floating)
        })
    });
}

fn bench_bubble_aim(c: &mut Criterion) {
    let game = BubbleGame::new(12345);
    c.bench_function("bubble_best_aim", |b| b.iter(|| best_aim(black_box(&game))));
}

fn bench_sudoku_generate(c: &mut Criterion) {
    let mut rng = SimpleRng::new(12345);
    c.bench_function("sudoku_generate_medium", |b| {
        b.iter(|| sudoku::generate(Difficulty::Medium, black_box(&mut rng)))
    });
}

fn bench_render_match3(c: &mut Criterion) {
    let game = Match3Game::new(12345);
    let view = Match3View::default();
    let mut fb = FrameBuffer::new(80, 24);
    c.bench_function("render_match3_80x24", |b| {
        b.iter(|| view.render_into(black_box(&game), Viewport::new(80, 24), &mut fb))
    });
}

criterion_group!(
    benches,
    bench_match3_generate,
    bench_match3_find_matches,
    bench_match3_swap,
    bench_match3_hint,
    bench_bubble_trace,
    bench_bubble_clusters,
    bench_bubble_aim,
    bench_sudoku_generate,
    bench_render_match3
);
criterion_main!(benches);
