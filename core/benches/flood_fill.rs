use criterion::{BatchSize, Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use sweeper_core::*;

fn bench_first_reveal(c: &mut Criterion) {
    let mut group = c.benchmark_group("first_reveal");

    for difficulty in Difficulty::ALL {
        let (rows, columns) = difficulty.size();
        let center = (rows / 2, columns / 2);
        group.bench_function(format!("{difficulty:?}"), |b| {
            let mut seed = 0;
            b.iter_batched(
                || {
                    seed += 1;
                    Board::with_seed(difficulty, seed)
                },
                |mut board| black_box(board.reveal(black_box(center))),
                BatchSize::SmallInput,
            )
        });
    }

    group.finish();
}

criterion_group!(benches, bench_first_reveal);
criterion_main!(benches);
