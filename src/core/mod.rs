//! Core combat types: combatants, dice, tiles and filters

pub mod combatant;
pub mod dice;
pub mod entity;
pub mod filter;
pub mod status;
pub mod tile;

pub use combatant::{Combatant, Side};
pub use dice::{Die, DieTemplate};
pub use entity::{EntityId, IdAllocator};
pub use filter::{apply_filters_of_type, ActionFilter, FilterOp, FilterType};
pub use status::StatusEffect;
pub use tile::{Tile, TileKind, TileParameter, TileTemplate};

/// ID of a live die
pub type DieId = EntityId<Die>;

/// ID of a zone (a tile's slot group or the dice pool)
pub type ZoneId = EntityId<crate::zones::Zone>;
