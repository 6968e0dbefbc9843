//! Performance benchmarks for the combat core
//!
//! 1. **Combat** - a full seeded combat per iteration, per controller
//! 2. **Resolution** - roll, place and activate one tile
//! 3. **Filters** - the filter pipeline over a long filter list
//!
//! Run with `--no-default-features` to compile verbose logging out.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use dice_combat::{
    core::{apply_filters_of_type, ActionFilter, FilterOp, FilterType},
    game::{
        CombatContext, CombatController, CombatLoop, GreedyController, RandomController, TurnStateMachine,
        VerbosityLevel,
    },
    loader::Catalog,
    CombatConfig,
};

fn silent_context(seed: u64) -> CombatContext {
    let config = CombatConfig::default()
        .with_seed(seed)
        .with_verbosity(VerbosityLevel::Silent);
    CombatContext::new(Catalog::builtin(), "Beast", config).expect("builtin catalog has a Beast")
}

fn bench_combat(c: &mut Criterion) {
    let mut group = c.benchmark_group("combat");

    for name in ["random", "greedy"] {
        group.bench_with_input(BenchmarkId::new("full", name), &name, |b, &name| {
            let mut seed = 0u64;
            b.iter(|| {
                seed += 1;
                let mut controller: Box<dyn CombatController> = match name {
                    "random" => Box::new(RandomController::with_seed(seed)),
                    _ => Box::new(GreedyController::new()),
                };
                let mut machine = TurnStateMachine::new(silent_context(seed));
                let result = CombatLoop::new(&mut machine).run(controller.as_mut()).unwrap();
                black_box(result)
            });
        });
    }

    group.finish();
}

fn bench_resolution(c: &mut Criterion) {
    c.bench_function("resolve_strike", |b| {
        b.iter_batched(
            || {
                let mut machine = TurnStateMachine::new(silent_context(7));
                machine.run_until_input().unwrap();
                machine
            },
            |mut machine| {
                let zone = machine
                    .context()
                    .tiles()
                    .find(|t| t.template == "strike")
                    .map(|t| t.zone)
                    .unwrap();
                let mut turn = machine.player_turn().unwrap();
                let a = turn.roll_die("d6").unwrap().id;
                let b = turn.roll_die("d6").unwrap().id;
                turn.move_die(a, zone).unwrap();
                turn.move_die(b, zone).unwrap();
                black_box(turn.activate_tile_zone(zone).unwrap())
            },
            criterion::BatchSize::SmallInput,
        );
    });
}

fn bench_filters(c: &mut Criterion) {
    let filters: Vec<ActionFilter> = (0..32)
        .map(|i| {
            let op = match i % 4 {
                0 => FilterOp::Add(2),
                1 => FilterOp::Multiply(1.1),
                2 => FilterOp::Min(500),
                _ => FilterOp::Max(0),
            };
            let filter_type = if i % 2 == 0 {
                FilterType::AttackActor
            } else {
                FilterType::AttackRecipient
            };
            ActionFilter::new(filter_type, op)
        })
        .collect();

    c.bench_function("filter_chain_32", |b| {
        b.iter(|| {
            let outgoing = apply_filters_of_type(black_box(17), &filters, FilterType::AttackActor);
            apply_filters_of_type(outgoing, &filters, FilterType::AttackRecipient)
        });
    });
}

criterion_group!(benches, bench_combat, bench_resolution, bench_filters);
criterion_main!(benches);
