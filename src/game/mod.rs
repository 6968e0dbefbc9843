//! Combat flow: turn state machine, tile resolution, enemy AI and controllers

pub mod combat_loop;
pub mod commands;
pub mod context;
pub mod controller;
pub mod enemy;
pub mod events;
pub mod greedy_controller;
pub mod logger;
pub mod machine;
pub mod random_controller;
pub mod resolution;
pub mod scripted_controller;
pub mod state;

pub use combat_loop::{CombatEndReason, CombatLoop, CombatResult};
pub use commands::PlayerTurn;
pub use context::CombatContext;
pub use controller::CombatController;
pub use enemy::{ActionOutcome, DecisionPolicy, Enemy, EnemyAction, EnemyActionKind, EnemyArchetype, WeightedUniform};
pub use events::{CombatEvent, CombatOutcome, DisplayColor};
pub use greedy_controller::GreedyController;
pub use logger::{CombatLogger, OutputFormat, OutputMode, VerbosityLevel};
pub use machine::{Continuation, Tick, TurnStateMachine};
pub use random_controller::RandomController;
pub use resolution::{resolve_tile, Resolution, TileEffect};
pub use scripted_controller::{PlayerCommand, ScriptedController};
pub use state::{next_state, CombatState, TransitionFlags};
