//! Dice, tile and enemy catalog
//!
//! A catalog is a JSON document listing die templates, tile templates,
//! enemy archetypes and the player's inventory (the keys of the tiles and
//! dice the player brings into a fight).

use crate::core::{DieTemplate, TileKind, TileTemplate};
use crate::game::enemy::{EnemyAction, EnemyArchetype};
use crate::{CombatError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

/// The player's persistent bank
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Inventory {
    /// Tile template keys, one live tile per entry
    pub tiles: Vec<String>,

    /// Die template keys the player can roll
    pub dice: Vec<String>,

    pub max_health: i32,

    /// Starting health (defaults to max_health)
    #[serde(default)]
    pub health: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    pub dice: Vec<DieTemplate>,
    pub tiles: Vec<TileTemplate>,
    pub enemies: Vec<EnemyArchetype>,
    pub inventory: Inventory,
}

impl Catalog {
    /// Starter content: three dice, four tiles, two enemies
    pub fn builtin() -> Self {
        Catalog {
            dice: vec![
                DieTemplate::new("d4", &[1, 2, 3, 4]),
                DieTemplate::new("d6", &[1, 2, 3, 4, 5, 6]),
                DieTemplate::new("d8", &[1, 2, 3, 4, 5, 6, 7, 8]),
            ],
            tiles: vec![
                TileTemplate::new("strike", TileKind::Attack, 2),
                TileTemplate::new("smash", TileKind::Attack, 3)
                    .with_level(2)
                    .with_parameter("bonus", 2),
                TileTemplate::new("mend", TileKind::Heal, 1),
                TileTemplate::new("brace", TileKind::Fortify, 1),
            ],
            enemies: vec![EnemyArchetype::beast(), EnemyArchetype::troll()],
            inventory: Inventory {
                tiles: vec![
                    "strike".to_string(),
                    "smash".to_string(),
                    "mend".to_string(),
                    "brace".to_string(),
                ],
                dice: vec!["d4".to_string(), "d6".to_string(), "d8".to_string()],
                max_health: 40,
                health: None,
            },
        }
    }

    pub fn from_json_str(text: &str) -> Result<Self> {
        let catalog: Catalog = serde_json::from_str(text)?;
        catalog.validate()?;
        Ok(catalog)
    }

    pub fn load_from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn die(&self, key: &str) -> Option<&DieTemplate> {
        self.dice.iter().find(|d| d.key == key)
    }

    pub fn tile(&self, key: &str) -> Option<&TileTemplate> {
        self.tiles.iter().find(|t| t.key == key)
    }

    /// Enemy archetype by name (case-insensitive)
    pub fn enemy(&self, name: &str) -> Option<&EnemyArchetype> {
        self.enemies.iter().find(|e| e.name.eq_ignore_ascii_case(name))
    }

    /// Check keys are unique and the inventory only references known templates
    ///
    /// Unrecognised tile kinds are allowed here; they fail when activated.
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for die in &self.dice {
            if !seen.insert(die.key.as_str()) {
                return Err(CombatError::InvalidCatalog(format!("duplicate die template '{}'", die.key)));
            }
            if die.faces.is_empty() {
                return Err(CombatError::InvalidCatalog(format!("die template '{}' has no faces", die.key)));
            }
        }

        seen.clear();
        for tile in &self.tiles {
            if !seen.insert(tile.key.as_str()) {
                return Err(CombatError::InvalidCatalog(format!("duplicate tile template '{}'", tile.key)));
            }
        }

        for enemy in &self.enemies {
            if enemy.candidates.iter().any(|a: &EnemyAction| a.magnitude < 0) {
                return Err(CombatError::InvalidCatalog(format!(
                    "enemy '{}' has an action with negative magnitude",
                    enemy.name
                )));
            }
        }

        for key in &self.inventory.tiles {
            if self.tile(key).is_none() {
                return Err(CombatError::InvalidCatalog(format!("inventory tile '{key}' is not in the catalog")));
            }
        }
        for key in &self.inventory.dice {
            if self.die(key).is_none() {
                return Err(CombatError::InvalidCatalog(format!("inventory die '{key}' is not in the catalog")));
            }
        }
        Ok(())
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}
