//! Catalog fixture tests
//!
//! One test per catalog in test_catalogs/: the catalog must load, a seeded
//! combat against its first enemy must run to an end, and running it again
//! with the same seeds must produce the same notification stream.

use dice_combat::game::{
    CombatContext, CombatController, CombatLoop, GreedyController, RandomController, TurnStateMachine,
    VerbosityLevel,
};
use dice_combat::loader::Catalog;
use dice_combat::CombatConfig;
use dir_test::{dir_test, Fixture};
use similar_asserts::assert_eq;

/// Run one silent combat and return its notifications as JSON lines
fn event_log(catalog: &Catalog, seed: u64, controller: &mut dyn CombatController) -> String {
    let enemy = catalog.enemies[0].name.clone();
    let config = CombatConfig::default()
        .with_seed(seed)
        .with_verbosity(VerbosityLevel::Silent);
    let ctx = CombatContext::new(catalog.clone(), &enemy, config).unwrap();
    let mut machine = TurnStateMachine::new(ctx);

    let result = CombatLoop::new(&mut machine).run(controller).unwrap();
    assert!(machine.is_finished());
    assert!(machine.context().zones.is_consistent());
    assert!(result.rounds >= 1);

    machine
        .drain_events()
        .iter()
        .map(|e| serde_json::to_string(e).unwrap())
        .collect::<Vec<_>>()
        .join("\n")
}

#[dir_test(
    dir: "$CARGO_MANIFEST_DIR/test_catalogs",
    glob: "**/*.json",
)]
fn test_catalog_determinism(fixture: Fixture<&str>) {
    let catalog = Catalog::from_json_str(fixture.content()).unwrap();

    for seed in [1u64, 42, 9001] {
        let run1 = event_log(&catalog, seed, &mut RandomController::with_seed(seed));
        let run2 = event_log(&catalog, seed, &mut RandomController::with_seed(seed));
        assert_eq!(run1, run2, "random controller diverged for {} (seed {seed})", fixture.path());

        let greedy1 = event_log(&catalog, seed, &mut GreedyController::new());
        let greedy2 = event_log(&catalog, seed, &mut GreedyController::new());
        assert_eq!(greedy1, greedy2, "greedy controller diverged for {} (seed {seed})", fixture.path());
    }
}

#[dir_test(
    dir: "$CARGO_MANIFEST_DIR/test_catalogs",
    glob: "**/*.json",
)]
fn test_catalog_survives_json_round_trip(fixture: Fixture<&str>) {
    let catalog = Catalog::from_json_str(fixture.content()).unwrap();
    let reparsed = Catalog::from_json_str(&serde_json::to_string(&catalog).unwrap()).unwrap();
    assert_eq!(catalog, reparsed);
}
