//! Dice Combat - command-line driver
//!
//! Plays single combats with a chosen controller or runs seeded batches in
//! parallel to compare controllers against an enemy.

use clap::{Parser, Subcommand, ValueEnum};
use dice_combat::{
    batch::{self, ControllerType as BatchController},
    game::{
        CombatContext, CombatController, CombatLoop, GreedyController, OutputFormat, PlayerCommand,
        RandomController, ScriptedController, TurnStateMachine, VerbosityLevel,
    },
    loader::{load_catalog, Catalog},
    CombatConfig, CombatError, Result,
};
use std::path::{Path, PathBuf};

/// Controller playing the player's side
#[derive(Debug, Clone, Copy, ValueEnum)]
enum ControllerType {
    /// Makes random choices
    Random,
    /// Spends all energy and stacks the best tiles
    Greedy,
    /// Follows a JSON script (requires --script)
    Script,
}

/// Verbosity level for combat output (custom parser supporting both names and numbers)
#[derive(Debug, Clone, Copy)]
struct VerbosityArg(VerbosityLevel);

impl std::str::FromStr for VerbosityArg {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "silent" | "0" => Ok(VerbosityArg(VerbosityLevel::Silent)),
            "minimal" | "1" => Ok(VerbosityArg(VerbosityLevel::Minimal)),
            "normal" | "2" => Ok(VerbosityArg(VerbosityLevel::Normal)),
            "verbose" | "3" => Ok(VerbosityArg(VerbosityLevel::Verbose)),
            _ => Err(format!(
                "invalid verbosity level '{s}' (expected: silent/0, minimal/1, normal/2, verbose/3)"
            )),
        }
    }
}

impl From<VerbosityArg> for VerbosityLevel {
    fn from(arg: VerbosityArg) -> Self {
        arg.0
    }
}

#[derive(Parser)]
#[command(name = "dice-combat")]
#[command(about = "Dice Combat - turn-based dice and tile combat", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play one combat and print its notifications
    Fight {
        /// Catalog file (default: built-in catalog)
        #[arg(long, value_name = "CATALOG")]
        catalog: Option<PathBuf>,

        /// Enemy to fight
        #[arg(long, default_value = "Beast")]
        enemy: String,

        /// Player controller type
        #[arg(long, value_enum, default_value = "greedy")]
        controller: ControllerType,

        /// Script file for --controller script (JSON list of turns)
        #[arg(long, value_name = "SCRIPT")]
        script: Option<PathBuf>,

        /// Combat config file (JSON)
        #[arg(long, value_name = "CONFIG")]
        config: Option<PathBuf>,

        /// Set random seed for deterministic runs
        #[arg(long)]
        seed: Option<u64>,

        /// Rounds before the combat is abandoned
        #[arg(long)]
        max_rounds: Option<u32>,

        /// Verbosity level (0=silent, 1=minimal, 2=normal, 3=verbose)
        #[arg(long, default_value = "normal", short = 'v')]
        verbosity: VerbosityArg,

        /// Print notifications as JSON lines
        #[arg(long)]
        json: bool,
    },

    /// Run many seeded combats in parallel and report win rates
    Batch {
        /// Catalog file (default: built-in catalog)
        #[arg(long, value_name = "CATALOG")]
        catalog: Option<PathBuf>,

        /// Enemy to fight
        #[arg(long, default_value = "Beast")]
        enemy: String,

        /// Player controller type (random or greedy)
        #[arg(long, value_enum, default_value = "random")]
        controller: ControllerType,

        /// Number of combats
        #[arg(long, default_value = "1000")]
        games: usize,

        /// Batch seed
        #[arg(long, default_value = "42")]
        seed: u64,

        /// Combat config file (JSON)
        #[arg(long, value_name = "CONFIG")]
        config: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Fight {
            catalog,
            enemy,
            controller,
            script,
            config,
            seed,
            max_rounds,
            verbosity,
            json,
        } => {
            let catalog = read_catalog(catalog.as_deref()).await?;
            let mut config = read_config(config.as_deref())?.with_verbosity(verbosity.into());
            if let Some(seed) = seed {
                config = config.with_seed(seed);
            }
            if let Some(max_rounds) = max_rounds {
                config.max_rounds = max_rounds;
            }
            let controller = build_controller(controller, script.as_deref(), seed)?;
            run_fight(catalog, &enemy, config, controller, json)
        }
        Commands::Batch {
            catalog,
            enemy,
            controller,
            games,
            seed,
            config,
        } => {
            let catalog = read_catalog(catalog.as_deref()).await?;
            let config = read_config(config.as_deref())?;
            let controller = match controller {
                ControllerType::Random => BatchController::Random,
                ControllerType::Greedy => BatchController::Greedy,
                ControllerType::Script => {
                    return Err(CombatError::InvalidArgument(
                        "scripted controllers cannot run in batch mode".to_string(),
                    ))
                }
            };

            println!("=== Dice Combat - Batch Mode ===\n");
            println!("Enemy: {enemy}, controller: {controller:?}, games: {games}, seed: {seed}\n");
            let stats = tokio::task::spawn_blocking(move || {
                batch::run_batch(&catalog, &enemy, &config, controller, games, seed)
            })
            .await??;
            println!("{stats}");
            Ok(())
        }
    }
}

async fn read_catalog(path: Option<&Path>) -> Result<Catalog> {
    match path {
        Some(path) => load_catalog(path).await,
        None => Ok(Catalog::builtin()),
    }
}

fn read_config(path: Option<&Path>) -> Result<CombatConfig> {
    match path {
        Some(path) => CombatConfig::load_from_file(path),
        None => Ok(CombatConfig::default()),
    }
}

fn build_controller(
    controller: ControllerType,
    script: Option<&Path>,
    seed: Option<u64>,
) -> Result<Box<dyn CombatController>> {
    Ok(match controller {
        ControllerType::Random => match seed {
            Some(seed) => Box::new(RandomController::with_seed(seed)),
            None => Box::new(RandomController::new()),
        },
        ControllerType::Greedy => Box::new(GreedyController::new()),
        ControllerType::Script => {
            let path = script.ok_or_else(|| {
                CombatError::InvalidArgument("--controller script requires --script".to_string())
            })?;
            let text = std::fs::read_to_string(path)?;
            let turns: Vec<Vec<PlayerCommand>> = serde_json::from_str(&text)?;
            Box::new(ScriptedController::new(turns))
        }
    })
}

fn run_fight(
    catalog: Catalog,
    enemy: &str,
    config: CombatConfig,
    mut controller: Box<dyn CombatController>,
    json: bool,
) -> Result<()> {
    let mut ctx = CombatContext::new(catalog, enemy, config)?;
    if json {
        ctx.logger.set_output_format(OutputFormat::Json);
    }

    println!(
        "=== {} vs {} ({} controller) ===",
        ctx.player.name,
        ctx.enemy.name(),
        controller.name()
    );
    let mut machine = TurnStateMachine::new(ctx);
    // Events are already printed by the logger
    let result = CombatLoop::new(&mut machine)
        .with_event_handler(|_| {})
        .run(controller.as_mut())?;

    println!(
        "\n{:?} after {} rounds: player {} / enemy {}",
        result.end_reason, result.rounds, result.player_health, result.enemy_health
    );
    Ok(())
}
