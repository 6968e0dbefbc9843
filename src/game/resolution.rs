//! Tile activation: dice sum, filter pipeline, effect dispatch
//!
//! Resolving a tile sums the dice placed on it, adds the tile's bonus,
//! runs the actor's filters then the recipient's filters, applies the
//! effect and finally consumes the dice. A failure at any step before the
//! effect leaves every die where it was.

use crate::core::{apply_filters_of_type, ActionFilter, DieId, FilterOp, FilterType, Side, TileKind, ZoneId};
use crate::game::context::CombatContext;
use crate::game::logger::log_if_verbose;
use crate::game::CombatEvent;
use crate::{CombatError, Result};
use smallvec::SmallVec;

/// Resolved behaviour of a recognised tile kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TileEffect {
    /// Damage the enemy
    Attack,
    /// Heal the player
    Heal,
    /// Heal the player and harden them against later attacks
    Fortify,
}

impl TileEffect {
    pub fn for_kind(kind: &TileKind) -> Result<Self> {
        match kind {
            TileKind::Attack => Ok(TileEffect::Attack),
            TileKind::Heal => Ok(TileEffect::Heal),
            TileKind::Fortify => Ok(TileEffect::Fortify),
            TileKind::Unrecognized(name) => Err(CombatError::UnknownTileKind(name.clone())),
        }
    }

    /// (acting side, actor filter type, receiving side, recipient filter type)
    pub fn roles(&self) -> (Side, FilterType, Side, FilterType) {
        match self {
            TileEffect::Attack => (
                Side::Player,
                FilterType::AttackActor,
                Side::Enemy,
                FilterType::AttackRecipient,
            ),
            TileEffect::Heal | TileEffect::Fortify => (
                Side::Player,
                FilterType::HealActor,
                Side::Player,
                FilterType::HealRecipient,
            ),
        }
    }
}

/// What a tile activation did
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub zone: ZoneId,
    pub effect: TileEffect,
    /// Dice sum plus tile bonus, before filters
    pub base: i32,
    /// Amount actually applied
    pub magnitude: i32,
    pub consumed: SmallVec<[DieId; 4]>,
}

/// Run the filter pipeline: actor chain, then recipient chain
pub fn compute_magnitude(
    base: i32,
    actor_filters: &[ActionFilter],
    actor_type: FilterType,
    recipient_filters: &[ActionFilter],
    recipient_type: FilterType,
) -> i32 {
    let outgoing = apply_filters_of_type(base, actor_filters, actor_type);
    apply_filters_of_type(outgoing, recipient_filters, recipient_type)
}

/// Activate the tile on `tile_zone` with the dice referenced by `slots`
///
/// Empty slots and ids that are no longer in play contribute 0. Only dice
/// sitting in the tile's own zone count, and each counts once. The counted
/// dice are consumed after the effect has been applied.
pub fn resolve_tile(ctx: &mut CombatContext, tile_zone: ZoneId, slots: &[Option<DieId>]) -> Result<Resolution> {
    let tile = ctx.tile(tile_zone).ok_or(CombatError::ZoneNotFound(tile_zone))?;
    let effect = TileEffect::for_kind(&tile.kind)?;
    let bonus = tile.bonus();

    let mut counted: SmallVec<[DieId; 4]> = SmallVec::new();
    let mut sum = 0;
    for id in slots.iter().flatten() {
        if counted.contains(id) || ctx.zones.zone_of(*id) != Some(tile_zone) {
            continue;
        }
        if let Some(die) = ctx.zones.get_die(*id) {
            sum += die.value;
            counted.push(*id);
        }
    }
    let base = sum + bonus;

    let (actor, actor_type, recipient, recipient_type) = effect.roles();
    let magnitude = compute_magnitude(
        base,
        ctx.combatant(actor).filters(),
        actor_type,
        ctx.combatant(recipient).filters(),
        recipient_type,
    );

    let magnitude = match effect {
        TileEffect::Attack => magnitude.max(0),
        TileEffect::Heal | TileEffect::Fortify => magnitude,
    };

    match effect {
        TileEffect::Attack => ctx.enemy.combatant.take_damage(magnitude),
        TileEffect::Heal => ctx.player.heal(magnitude),
        TileEffect::Fortify => {
            ctx.player.heal(magnitude);
            ctx.player
                .add_filter(ActionFilter::new(FilterType::AttackRecipient, FilterOp::Add(-magnitude)));
        }
    }

    for id in &counted {
        ctx.zones.remove_die(*id)?;
    }

    log_if_verbose!(
        ctx.logger,
        "Resolved {:?} on zone {tile_zone}: base {base}, applied {magnitude}, {} dice consumed",
        effect,
        counted.len()
    );
    let kind = ctx.tile(tile_zone).map(|t| t.kind.to_string()).unwrap_or_default();
    ctx.emit(CombatEvent::TileResolved {
        zone: tile_zone,
        kind,
        base,
        magnitude,
    });
    ctx.notify_health(recipient);

    Ok(Resolution {
        zone: tile_zone,
        effect,
        base,
        magnitude,
        consumed: counted,
    })
}
