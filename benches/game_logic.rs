use criterion::{black_box, criterion_group, criterion_main, Criterion};
use quintris::core::{Game, GamePiece, Grid};

fn bench_can_place(c: &mut Criterion) {
    let mut grid = Grid::new(5, 5);
    let piece = GamePiece::from_type(11).unwrap();
    grid.play_piece(&GamePiece::from_type(0).unwrap(), 0, 0);

    c.bench_function("can_place_piece", |b| {
        b.iter(|| grid.can_place_piece(black_box(&piece), black_box(2), black_box(2)))
    });
}

fn bench_pattern_rotation(c: &mut Criterion) {
    let piece = GamePiece::from_type(14).unwrap();

    c.bench_function("pattern_rotated_3x", |b| {
        b.iter(|| black_box(piece.rotated().rotated().rotated().pattern()))
    });
}

fn bench_placement_and_scan(c: &mut Criterion) {
    c.bench_function("placement_and_clear_scan", |b| {
        b.iter(|| {
            let mut game = Game::single_player_seeded(5, 5, 12345);
            game.start();
            black_box(game.attempt_placement(2, 2))
        })
    });
}

criterion_group!(
    benches,
    bench_can_place,
    bench_pattern_rotation,
    bench_placement_and_scan
);
criterion_main!(benches);
