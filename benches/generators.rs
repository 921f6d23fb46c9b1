use criterion::{criterion_group, criterion_main, Criterion};
use labyrinth::{
    generators,
    units::{Height, Width},
    utils::seeded_rng,
};

fn bench_binary_maze_25(c: &mut Criterion) {
    let mut rng = seeded_rng(25);
    c.bench_function("binary_maze_25", move |b| {
        b.iter(|| generators::binary_tree(Height(25), Width(25), &mut rng))
    });
}

fn bench_sidewinder_maze_25(c: &mut Criterion) {
    let mut rng = seeded_rng(25);
    c.bench_function("sidewinder_maze_25", move |b| {
        b.iter(|| generators::sidewinder(Height(25), Width(25), &mut rng))
    });
}

fn bench_fusion_maze_25(c: &mut Criterion) {
    let mut rng = seeded_rng(25);
    c.bench_function("fusion_maze_25", move |b| {
        b.iter(|| generators::fusion(Height(25), Width(25), &mut rng))
    });
}

fn bench_exploration_maze_25(c: &mut Criterion) {
    let mut rng = seeded_rng(25);
    c.bench_function("exploration_maze_25", move |b| {
        b.iter(|| generators::exploration(Height(25), Width(25), &mut rng))
    });
}

fn bench_wilson_maze_25(c: &mut Criterion) {
    let mut rng = seeded_rng(25);
    c.bench_function("wilson_maze_25", move |b| {
        b.iter(|| generators::wilson(Height(25), Width(25), &mut rng))
    });
}

criterion_group!(
    benches,
    bench_binary_maze_25,
    bench_sidewinder_maze_25,
    bench_fusion_maze_25,
    bench_exploration_maze_25,
    bench_wilson_maze_25
);
criterion_main!(benches);
