use chained_table::{ChainedTable, ChainedTableBuilder, GrowTrigger};
use criterion::{black_box, criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

fn keys(n: usize) -> Vec<String> {
    (0..n).map(|i| format!("key_{:08X}", i)).collect()
}

fn filled(keys: &[String]) -> ChainedTable {
    let mut table = ChainedTable::new().unwrap();
    for (i, key) in keys.iter().enumerate() {
        table.insert(key, i as i32).unwrap();
    }
    table
}

fn bench_insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("chained_table_insert");
    for size in [100, 1_000, 10_000] {
        let keys = keys(size);
        for trigger in [GrowTrigger::EveryInsert, GrowTrigger::NewKeyOnly] {
            group.bench_with_input(
                BenchmarkId::new(format!("{:?}", trigger), size),
                &keys,
                |b, keys| {
                    b.iter_batched(
                        || {
                            ChainedTableBuilder::new()
                                .with_grow_trigger(trigger)
                                .build()
                                .unwrap()
                        },
                        |mut table| {
                            for (i, key) in keys.iter().enumerate() {
                                table.insert(key, i as i32).unwrap();
                            }
                            table
                        },
                        BatchSize::SmallInput,
                    )
                },
            );
        }
    }
    group.finish();
}

fn bench_search(c: &mut Criterion) {
    let mut group = c.benchmark_group("chained_table_search");
    for size in [100, 1_000, 10_000] {
        let mut keys = keys(size);
        let table = filled(&keys);
        keys.shuffle(&mut StdRng::seed_from_u64(42));
        group.bench_with_input(BenchmarkId::from_parameter(size), &keys, |b, keys| {
            b.iter(|| {
                for key in keys {
                    black_box(table.search(key).unwrap());
                }
            })
        });
    }
    group.finish();
}

fn bench_remove(c: &mut Criterion) {
    let mut group = c.benchmark_group("chained_table_remove_all");
    for size in [100, 1_000, 10_000] {
        let keys = keys(size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &keys, |b, keys| {
            b.iter_batched(
                || filled(keys),
                |mut table| {
                    for key in keys {
                        table.remove(key).unwrap();
                    }
                    table
                },
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

criterion_group!(benches, bench_insert, bench_search, bench_remove);
criterion_main!(benches);
