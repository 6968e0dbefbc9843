//! Tile templates and live tiles

use crate::core::ZoneId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// What a tile does when activated
///
/// Parsed from the catalog by name. Names with no known effect are kept
/// as `Unrecognized` so the failure surfaces when the tile is activated,
/// not when the catalog is read.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TileKind {
    Attack,
    Heal,
    Fortify,
    Unrecognized(String),
}

impl TileKind {
    pub fn as_str(&self) -> &str {
        match self {
            TileKind::Attack => "attack",
            TileKind::Heal => "heal",
            TileKind::Fortify => "fortify",
            TileKind::Unrecognized(name) => name,
        }
    }
}

impl From<String> for TileKind {
    fn from(s: String) -> Self {
        match s.to_lowercase().as_str() {
            "attack" => TileKind::Attack,
            "heal" => TileKind::Heal,
            "fortify" => TileKind::Fortify,
            _ => TileKind::Unrecognized(s),
        }
    }
}

impl From<&str> for TileKind {
    fn from(s: &str) -> Self {
        TileKind::from(s.to_string())
    }
}

impl From<TileKind> for String {
    fn from(kind: TileKind) -> Self {
        kind.as_str().to_string()
    }
}

impl fmt::Display for TileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Named integer knob on a tile (e.g., "bonus")
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileParameter {
    pub name: String,
    pub value: i32,
}

impl TileParameter {
    pub fn new(name: impl Into<String>, value: i32) -> Self {
        TileParameter {
            name: name.into(),
            value,
        }
    }
}

/// Immutable catalog entry describing a tile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TileTemplate {
    pub key: String,
    pub kind: TileKind,

    /// Number of dice the tile accepts
    pub dice_slots: usize,

    #[serde(default = "default_level")]
    pub level: u32,

    #[serde(default)]
    pub parameters: Vec<TileParameter>,
}

fn default_level() -> u32 {
    1
}

impl TileTemplate {
    pub fn new(key: impl Into<String>, kind: TileKind, dice_slots: usize) -> Self {
        TileTemplate {
            key: key.into(),
            kind,
            dice_slots,
            level: default_level(),
            parameters: Vec::new(),
        }
    }

    pub fn with_parameter(mut self, name: impl Into<String>, value: i32) -> Self {
        self.parameters.push(TileParameter::new(name, value));
        self
    }

    pub fn with_level(mut self, level: u32) -> Self {
        self.level = level;
        self
    }

    /// Make a live copy for one encounter, bound to its slot zone
    pub fn copy(&self, zone: ZoneId) -> Tile {
        Tile {
            zone,
            template: self.key.clone(),
            kind: self.kind.clone(),
            dice_slots: self.dice_slots,
            level: self.level,
            parameters: self.parameters.clone(),
        }
    }
}

/// A tile in play for the current encounter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tile {
    /// Zone holding the dice placed on this tile
    pub zone: ZoneId,
    pub template: String,
    pub kind: TileKind,
    pub dice_slots: usize,
    pub level: u32,
    pub parameters: Vec<TileParameter>,
}

impl Tile {
    pub fn parameter(&self, name: &str) -> Option<i32> {
        self.parameters.iter().find(|p| p.name == name).map(|p| p.value)
    }

    /// Flat amount added to the dice sum before filters
    pub fn bonus(&self) -> i32 {
        self.parameter("bonus").unwrap_or(0)
    }
}
