use std::hint::black_box;
use std::sync::Arc;

use criterion::{Criterion, criterion_group, criterion_main};
use sapper_core::*;

fn generate(c: &mut Criterion) {
    let mut group = c.benchmark_group("generate");
    for mines in [10, 50, 90] {
        let config = GameConfig::classic(mines).unwrap();
        group.bench_function(format!("classic_{mines}"), |b| {
            let mut seed = 0;
            b.iter(|| {
                seed += 1;
                black_box(RandomBoardGenerator::new(seed).generate(config))
            })
        });
    }
    group.finish();
}

fn flood(c: &mut Criterion) {
    let config = GameConfig::new((200, 200), 1).unwrap();
    let board = RandomBoardGenerator::new(1).generate(config);
    let start = if board[(0, 0)].is_mine() { (199, 199) } else { (0, 0) };

    c.bench_function("flood_200x200", |b| {
        b.iter_batched(
            || GameSession::new(board.clone(), Arc::new(MemoryRecordStore::default())),
            |mut session| black_box(session.reveal(start).unwrap()),
            criterion::BatchSize::LargeInput,
        )
    });
}

criterion_group!(benches, generate, flood);
criterion_main!(benches);
