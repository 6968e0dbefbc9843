//! Dice zones (tile slot groups and the shared pool)
//!
//! Every live die sits in exactly one zone. The registry keeps a location
//! index next to the per-zone member lists and updates both inside a single
//! `&mut self` call, so no reader ever sees a die in two zones or in none.

use crate::core::{Die, DieId, ZoneId};
use crate::{CombatError, Result};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// What a zone belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ZoneKind {
    /// Slot group of a tile
    Tile,
    /// Shared pool freshly rolled dice land in
    Pool,
}

/// A group of dice slots
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Zone {
    pub id: ZoneId,
    pub kind: ZoneKind,

    /// Maximum number of dice (None = unbounded)
    pub capacity: Option<usize>,

    /// Dice in slot order
    members: Vec<DieId>,
}

impl Zone {
    pub fn new(id: ZoneId, kind: ZoneKind, capacity: Option<usize>) -> Self {
        Zone {
            id,
            kind,
            capacity,
            members: Vec::new(),
        }
    }

    pub fn members(&self) -> &[DieId] {
        &self.members
    }

    pub fn contains(&self, die: DieId) -> bool {
        self.members.contains(&die)
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.capacity.is_some_and(|cap| self.members.len() >= cap)
    }

    /// Free slots left (None = unbounded)
    pub fn free_slots(&self) -> Option<usize> {
        self.capacity.map(|cap| cap.saturating_sub(self.members.len()))
    }

    fn position(&self, die: DieId) -> Option<usize> {
        self.members.iter().position(|&id| id == die)
    }
}

/// Tracks which die is in which zone
#[derive(Debug, Clone, Default)]
pub struct ZoneRegistry {
    /// Zones by id (BTreeMap for deterministic iteration order)
    zones: BTreeMap<ZoneId, Zone>,

    /// Live dice
    dice: FxHashMap<DieId, Die>,

    /// Authoritative die -> zone index
    locations: FxHashMap<DieId, ZoneId>,

    pool: Option<ZoneId>,
}

impl ZoneRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a zone. Returns false if the id is already taken.
    pub fn add_zone(&mut self, id: ZoneId, kind: ZoneKind, capacity: Option<usize>) -> bool {
        if self.zones.contains_key(&id) {
            return false;
        }
        if kind == ZoneKind::Pool {
            self.pool = Some(id);
        }
        self.zones.insert(id, Zone::new(id, kind, capacity));
        true
    }

    pub fn zone(&self, id: ZoneId) -> Option<&Zone> {
        self.zones.get(&id)
    }

    pub fn zones(&self) -> impl Iterator<Item = &Zone> {
        self.zones.values()
    }

    /// The shared dice pool, once registered
    pub fn pool(&self) -> Option<ZoneId> {
        self.pool
    }

    /// Put a new die into a zone
    pub fn add_die(&mut self, zone_id: ZoneId, die: Die) -> Result<()> {
        if self.locations.contains_key(&die.id) {
            return Err(CombatError::DuplicateDie(die.id));
        }
        let zone = self
            .zones
            .get_mut(&zone_id)
            .ok_or(CombatError::ZoneNotFound(zone_id))?;
        if zone.is_full() {
            return Err(CombatError::ZoneFull(zone_id));
        }

        zone.members.push(die.id);
        self.locations.insert(die.id, zone_id);
        self.dice.insert(die.id, die);
        Ok(())
    }

    /// Take a die out of play
    pub fn remove_die(&mut self, die_id: DieId) -> Result<Die> {
        let zone_id = self
            .locations
            .remove(&die_id)
            .ok_or(CombatError::DieNotFound(die_id))?;
        if let Some(zone) = self.zones.get_mut(&zone_id) {
            if let Some(pos) = zone.position(die_id) {
                zone.members.remove(pos);
            }
        }
        self.dice
            .remove(&die_id)
            .ok_or(CombatError::DieNotFound(die_id))
    }

    /// Move a die into another zone, appending it to the zone's slots
    ///
    /// Moving a die to the zone it is already in does nothing.
    pub fn move_die(&mut self, to_zone: ZoneId, die_id: DieId) -> Result<()> {
        let from_zone = *self
            .locations
            .get(&die_id)
            .ok_or(CombatError::DieNotFound(die_id))?;
        let target = self
            .zones
            .get(&to_zone)
            .ok_or(CombatError::ZoneNotFound(to_zone))?;

        if from_zone == to_zone {
            return Ok(());
        }
        if target.is_full() {
            return Err(CombatError::ZoneFull(to_zone));
        }

        // All checks passed; from here on nothing can fail.
        if let Some(source) = self.zones.get_mut(&from_zone) {
            if let Some(pos) = source.position(die_id) {
                source.members.remove(pos);
            }
        }
        if let Some(target) = self.zones.get_mut(&to_zone) {
            target.members.push(die_id);
        }
        self.locations.insert(die_id, to_zone);

        debug_assert!(self.is_consistent());
        Ok(())
    }

    /// Exchange the slots of two dice
    ///
    /// Values and ids stay with their dice; only their zones and slot
    /// positions change. Zone sizes are unchanged, so capacity is never
    /// exceeded.
    pub fn swap_dice(&mut self, a: DieId, b: DieId) -> Result<()> {
        let zone_a = *self.locations.get(&a).ok_or(CombatError::DieNotFound(a))?;
        let zone_b = *self.locations.get(&b).ok_or(CombatError::DieNotFound(b))?;

        if a == b {
            return Ok(());
        }

        if zone_a == zone_b {
            if let Some(zone) = self.zones.get_mut(&zone_a) {
                if let (Some(pa), Some(pb)) = (zone.position(a), zone.position(b)) {
                    zone.members.swap(pa, pb);
                }
            }
        } else {
            if let Some(zone) = self.zones.get_mut(&zone_a) {
                if let Some(pa) = zone.position(a) {
                    zone.members[pa] = b;
                }
            }
            if let Some(zone) = self.zones.get_mut(&zone_b) {
                if let Some(pb) = zone.position(b) {
                    zone.members[pb] = a;
                }
            }
            self.locations.insert(a, zone_b);
            self.locations.insert(b, zone_a);
        }

        debug_assert!(self.is_consistent());
        Ok(())
    }

    pub fn get_die(&self, die_id: DieId) -> Option<&Die> {
        self.dice.get(&die_id)
    }

    pub fn zone_of(&self, die_id: DieId) -> Option<ZoneId> {
        self.locations.get(&die_id).copied()
    }

    /// Dice in a zone, in slot order
    pub fn dice_in(&self, zone_id: ZoneId) -> impl Iterator<Item = &Die> {
        self.zones
            .get(&zone_id)
            .map(|z| z.members.as_slice())
            .unwrap_or(&[])
            .iter()
            .filter_map(|id| self.dice.get(id))
    }

    pub fn die_count(&self) -> usize {
        self.dice.len()
    }

    /// Destroy every die; zones stay registered
    pub fn clear(&mut self) {
        for zone in self.zones.values_mut() {
            zone.members.clear();
        }
        self.dice.clear();
        self.locations.clear();
    }

    /// Check the single-location invariant
    ///
    /// Every live die has exactly one location, that zone lists it exactly
    /// once, no other zone lists it, and no zone exceeds its capacity.
    pub fn is_consistent(&self) -> bool {
        if self.locations.len() != self.dice.len() {
            return false;
        }

        let mut seen = 0usize;
        for zone in self.zones.values() {
            if zone.capacity.is_some_and(|cap| zone.members.len() > cap) {
                return false;
            }
            for id in &zone.members {
                if self.locations.get(id) != Some(&zone.id) || !self.dice.contains_key(id) {
                    return false;
                }
                seen += 1;
            }
        }
        seen == self.dice.len()
    }
}
