//! Batch simulation: many seeded combats in parallel
//!
//! Every combat gets its own seeds derived from the batch seed and its
//! index, so a batch is reproducible regardless of how rayon schedules it.

use crate::game::{
    CombatContext, CombatController, CombatEndReason, CombatLoop, CombatResult, GreedyController, RandomController,
    TurnStateMachine, VerbosityLevel,
};
use crate::loader::Catalog;
use crate::{CombatConfig, CombatError, Result};
use rand::{RngCore, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;
use rayon::prelude::*;
use std::fmt;
use std::str::FromStr;
use std::time::{Duration, Instant};

/// Controller used for the player side of a batch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerType {
    Random,
    Greedy,
}

impl FromStr for ControllerType {
    type Err = CombatError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "random" => Ok(ControllerType::Random),
            "greedy" => Ok(ControllerType::Greedy),
            _ => Err(CombatError::InvalidArgument(format!("unknown controller '{s}'"))),
        }
    }
}

impl ControllerType {
    pub fn build(&self, seed: u64) -> Box<dyn CombatController> {
        match self {
            ControllerType::Random => Box::new(RandomController::with_seed(seed)),
            ControllerType::Greedy => Box::new(GreedyController::new()),
        }
    }
}

/// Aggregate results of a batch
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchStats {
    pub games: usize,
    pub victories: usize,
    pub defeats: usize,
    pub round_limited: usize,
    pub total_rounds: u64,
    pub duration: Duration,
}

impl BatchStats {
    fn record(&mut self, result: &CombatResult) {
        self.games += 1;
        self.total_rounds += result.rounds as u64;
        match result.end_reason {
            CombatEndReason::Victory => self.victories += 1,
            CombatEndReason::Defeat => self.defeats += 1,
            CombatEndReason::RoundLimit | CombatEndReason::Aborted => self.round_limited += 1,
        }
    }

    pub fn win_rate(&self) -> f64 {
        if self.games == 0 {
            return 0.0;
        }
        self.victories as f64 / self.games as f64
    }

    pub fn avg_rounds(&self) -> f64 {
        if self.games == 0 {
            return 0.0;
        }
        self.total_rounds as f64 / self.games as f64
    }
}

impl fmt::Display for BatchStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Games:        {}", self.games)?;
        writeln!(
            f,
            "Victories:    {} ({:.1}%)",
            self.victories,
            self.win_rate() * 100.0
        )?;
        writeln!(f, "Defeats:      {}", self.defeats)?;
        writeln!(f, "Round limit:  {}", self.round_limited)?;
        writeln!(f, "Avg rounds:   {:.2}", self.avg_rounds())?;
        write!(f, "Elapsed:      {:.2}s", self.duration.as_secs_f64())
    }
}

/// (combat seed, controller seed) for the combat at `index`
pub fn derive_seeds(batch_seed: u64, index: usize) -> (u64, u64) {
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(batch_seed.wrapping_add(index as u64));
    (rng.next_u64(), rng.next_u64())
}

/// Play one silent combat
pub fn run_single(
    catalog: &Catalog,
    enemy: &str,
    config: &CombatConfig,
    controller: ControllerType,
    combat_seed: u64,
    controller_seed: u64,
) -> Result<CombatResult> {
    let config = config
        .clone()
        .with_seed(combat_seed)
        .with_verbosity(VerbosityLevel::Silent);
    let ctx = CombatContext::new(catalog.clone(), enemy, config)?;
    let mut machine = TurnStateMachine::new(ctx);
    let mut controller = controller.build(controller_seed);
    let result = CombatLoop::new(&mut machine)
        .with_event_handler(|_| {})
        .run(controller.as_mut());
    result
}

/// Run `games` combats in parallel and aggregate the results
pub fn run_batch(
    catalog: &Catalog,
    enemy: &str,
    config: &CombatConfig,
    controller: ControllerType,
    games: usize,
    batch_seed: u64,
) -> Result<BatchStats> {
    let start = Instant::now();

    let results: Vec<CombatResult> = (0..games)
        .into_par_iter()
        .map(|index| {
            let (combat_seed, controller_seed) = derive_seeds(batch_seed, index);
            run_single(catalog, enemy, config, controller, combat_seed, controller_seed)
        })
        .collect::<Result<Vec<_>>>()?;

    let mut stats = BatchStats::default();
    for result in &results {
        stats.record(result);
    }
    stats.duration = start.elapsed();
    Ok(stats)
}
