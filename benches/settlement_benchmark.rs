use criterion::{black_box, criterion_group, criterion_main, Criterion};
use settle_up::optimization::engine::SettlementEngine;
use settle_up::simulation::generator::{generate_random_group, GroupConfig};

fn bench_group(c: &mut Criterion, name: &str, member_count: usize, expense_count: usize) {
    let config = GroupConfig {
        member_count,
        expense_count,
        seed: Some(42),
        ..Default::default()
    };
    let snapshot = generate_random_group(&config);
    let members = snapshot.members.clone();
    let expenses = snapshot.expenses();
    let engine = SettlementEngine::default();

    c.bench_function(name, |b| {
        b.iter(|| engine.settle(black_box(&members), black_box(&expenses)))
    });
}

fn bench_settle_5_members(c: &mut Criterion) {
    bench_group(c, "settle_5_members", 5, 20);
}

fn bench_settle_30_members(c: &mut Criterion) {
    bench_group(c, "settle_30_members", 30, 200);
}

fn bench_settle_300_members(c: &mut Criterion) {
    bench_group(c, "settle_300_members", 300, 3_000);
}

criterion_group!(
    benches,
    bench_settle_5_members,
    bench_settle_30_members,
    bench_settle_300_members
);
criterion_main!(benches);
