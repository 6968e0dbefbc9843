//! Mutable state of one combat encounter
//!
//! The context owns everything the turn handlers and player commands touch:
//! both combatants, the zone registry, the live tiles, the RNG, the logger
//! and the outgoing notification queue. Handlers and commands receive it
//! by `&mut`, so there is never more than one writer.

use crate::core::{Combatant, Die, DieTemplate, IdAllocator, Side, Tile, ZoneId};
use crate::game::enemy::Enemy;
use crate::game::logger::log_if_verbose;
use crate::game::{CombatEvent, CombatLogger};
use crate::loader::Catalog;
use crate::zones::{ZoneKind, ZoneRegistry};
use crate::{CombatConfig, CombatError, Result};
use rand::SeedableRng;
use rand_chacha::ChaCha12Rng;
use std::collections::BTreeMap;

pub struct CombatContext {
    pub config: CombatConfig,
    pub player: Combatant,
    pub enemy: Enemy,
    pub zones: ZoneRegistry,

    /// Live tiles keyed by their slot zone
    tiles: BTreeMap<ZoneId, Tile>,

    catalog: Catalog,
    pub rng: ChaCha12Rng,
    pub logger: CombatLogger,

    events: Vec<CombatEvent>,
    ids: IdAllocator,

    /// Set by the player's end-turn command, consumed by the machine
    turn_ended: bool,

    /// Player turns started so far
    pub round: u32,
}

impl CombatContext {
    /// Set up an encounter against the enemy named `enemy_name`
    ///
    /// Tiles and the pool are not created until the machine runs `Start`.
    pub fn new(catalog: Catalog, enemy_name: &str, config: CombatConfig) -> Result<Self> {
        let archetype = catalog
            .enemy(enemy_name)
            .cloned()
            .ok_or_else(|| CombatError::TemplateNotFound(enemy_name.to_string()))?;

        let inventory = &catalog.inventory;
        let player = Combatant::new("Player", Side::Player, inventory.max_health)
            .with_health(inventory.health.unwrap_or(inventory.max_health));

        let rng = match config.seed {
            Some(seed) => ChaCha12Rng::seed_from_u64(seed),
            None => ChaCha12Rng::from_entropy(),
        };
        let logger = CombatLogger::with_verbosity(config.verbosity);

        Ok(CombatContext {
            config,
            player,
            enemy: Enemy::new(archetype),
            zones: ZoneRegistry::new(),
            tiles: BTreeMap::new(),
            catalog,
            rng,
            logger,
            events: Vec::new(),
            ids: IdAllocator::new(),
            turn_ended: false,
            round: 0,
        })
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Copy the inventory into live combat state
    ///
    /// Registers the dice pool and one slot zone per inventory tile. Does
    /// nothing if the pool already exists. Every inventory key is looked up
    /// before anything is registered, so a failed load leaves no zones.
    pub fn load_inventory(&mut self) -> Result<()> {
        if self.zones.pool().is_some() {
            return Ok(());
        }

        if let Some(key) = self.catalog.inventory.dice.iter().find(|k| self.catalog.die(k).is_none()) {
            return Err(CombatError::TemplateNotFound(key.clone()));
        }
        let templates = self
            .catalog
            .inventory
            .tiles
            .iter()
            .map(|key| {
                self.catalog
                    .tile(key)
                    .ok_or_else(|| CombatError::TemplateNotFound(key.clone()))
            })
            .collect::<Result<Vec<_>>>()?;

        let pool: ZoneId = self.ids.next_id();
        self.zones.add_zone(pool, ZoneKind::Pool, self.config.pool_capacity);

        for template in templates {
            let zone: ZoneId = self.ids.next_id();
            self.zones.add_zone(zone, ZoneKind::Tile, Some(template.dice_slots));
            self.tiles.insert(zone, template.copy(zone));
            log_if_verbose!(self.logger, "Tile {} ({}) on zone {zone}", template.key, template.kind);
        }
        Ok(())
    }

    pub fn tile(&self, zone: ZoneId) -> Option<&Tile> {
        self.tiles.get(&zone)
    }

    /// Live tiles in zone order
    pub fn tiles(&self) -> impl Iterator<Item = &Tile> {
        self.tiles.values()
    }

    pub fn pool(&self) -> Option<ZoneId> {
        self.zones.pool()
    }

    /// Die templates the player may roll this encounter
    pub fn available_dice(&self) -> impl Iterator<Item = &DieTemplate> {
        self.catalog
            .inventory
            .dice
            .iter()
            .filter_map(|key| self.catalog.die(key))
    }

    /// Roll a die from the inventory and put it in the pool
    ///
    /// Energy is not checked or spent here.
    pub fn roll_into_pool(&mut self, template_key: &str) -> Result<Die> {
        if !self.catalog.inventory.dice.iter().any(|k| k == template_key) {
            return Err(CombatError::TemplateNotFound(template_key.to_string()));
        }
        let template = self
            .catalog
            .die(template_key)
            .ok_or_else(|| CombatError::TemplateNotFound(template_key.to_string()))?;
        let pool = self
            .zones
            .pool()
            .ok_or(CombatError::InvalidTransition {
                state: crate::game::CombatState::PlayerMidTurn,
                reason: "dice pool not loaded",
            })?;

        let pool_zone = self.zones.zone(pool).ok_or(CombatError::ZoneNotFound(pool))?;
        if pool_zone.is_full() {
            return Err(CombatError::ZoneFull(pool));
        }

        let die = template.roll(self.ids.next_id(), &mut self.rng);
        self.zones.add_die(pool, die.clone())?;
        Ok(die)
    }

    /// Queue a notification for the host and log it
    pub fn emit(&mut self, event: CombatEvent) {
        self.logger.event(&event);
        self.events.push(event);
    }

    pub fn notify_health(&mut self, side: Side) {
        let combatant = match side {
            Side::Player => &self.player,
            Side::Enemy => &self.enemy.combatant,
        };
        let event = CombatEvent::HealthChanged {
            side,
            name: combatant.name.clone(),
            health: combatant.health,
            max_health: combatant.max_health,
        };
        self.emit(event);
    }

    pub fn notify_energy(&mut self) {
        self.emit(CombatEvent::energy(self.player.energy()));
    }

    /// Take every notification queued since the last drain
    pub fn drain_events(&mut self) -> Vec<CombatEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn pending_events(&self) -> &[CombatEvent] {
        &self.events
    }

    pub fn signal_turn_end(&mut self) {
        self.turn_ended = true;
    }

    pub fn turn_end_signalled(&self) -> bool {
        self.turn_ended
    }

    /// Consume the end-turn signal
    pub fn take_turn_end(&mut self) -> bool {
        std::mem::take(&mut self.turn_ended)
    }

    pub fn combatant(&self, side: Side) -> &Combatant {
        match side {
            Side::Player => &self.player,
            Side::Enemy => &self.enemy.combatant,
        }
    }

    pub fn combatant_mut(&mut self, side: Side) -> &mut Combatant {
        match side {
            Side::Player => &mut self.player,
            Side::Enemy => &mut self.enemy.combatant,
        }
    }
}

impl std::fmt::Debug for CombatContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CombatContext")
            .field("player", &self.player)
            .field("enemy", &self.enemy)
            .field("tiles", &self.tiles.len())
            .field("dice", &self.zones.die_count())
            .field("round", &self.round)
            .finish()
    }
}
