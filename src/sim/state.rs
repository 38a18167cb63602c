//! Simulation state and equipped weapon instances
//!
//! Everything the tick mutates lives in [`SimState`], which is passed by `&mut`
//! into [`super::tick::tick`]. Archetype runtime state starts as
//! [`RuntimeState::Uninitialized`] and is created by the owning logic the first
//! time it observes the weapon, never by acquisition.

use std::sync::Arc;

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::aura::AuraState;
use super::catalog::{
    AuraParams, LaserCrossParams, MineFieldParams, ShockwaveParams, StrikeParams, WeaponCatalog,
    WeaponDefinition, WeaponId,
};
use super::laser_cross::LaserCrossState;
use super::mine_field::MineFieldState;
use super::projectile::ProjectilePool;
use super::shockwave::ShockwaveState;
use super::strike::StrikeState;
use crate::error::{SimError, SimResult};
use crate::rewards::choice::RewardChoice;
use crate::rewards::pool::RewardKind;
use crate::rewards::rarity::Rarity;
use crate::rewards::upgrade::{UpgradeRoll, UpgradeStat};
use crate::settings::Settings;

/// Per-instance stat multipliers accumulated from upgrades
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Multipliers {
    pub damage: f32,
    pub cooldown: f32,
    pub area: f32,
    pub knockback: f32,
    /// Added to the base crit chance (0.04 = +4 percentage points)
    pub crit_bonus: f32,
}

impl Default for Multipliers {
    fn default() -> Self {
        Self {
            damage: 1.0,
            cooldown: 1.0,
            area: 1.0,
            knockback: 1.0,
            crit_bonus: 0.0,
        }
    }
}

impl Multipliers {
    /// Fold an upgrade of `magnitude` percent into the multipliers.
    ///
    /// Damage, cooldown, area and knockback compound multiplicatively (two +25%
    /// damage upgrades give x1.5625). Crit is percentage points, capped so the total
    /// crit chance never exceeds 100%.
    pub fn apply(&mut self, stat: UpgradeStat, magnitude: f32, base_crit_chance: f32) {
        let factor = (1.0 + magnitude / 100.0).max(0.0);
        match stat {
            UpgradeStat::Damage => self.damage *= factor,
            UpgradeStat::Cooldown => self.cooldown *= factor,
            UpgradeStat::Area => self.area *= factor,
            UpgradeStat::Knockback => self.knockback *= factor,
            UpgradeStat::Crit => {
                let headroom = (1.0 - base_crit_chance).max(0.0);
                self.crit_bonus = (self.crit_bonus + magnitude / 100.0).clamp(0.0, headroom);
            }
        }
    }
}

/// Flat overrides stamped at acquisition time from the offer's rarity
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Overrides {
    pub damage: Option<f32>,
    pub cooldown: Option<f32>,
}

impl Overrides {
    /// Rarity-derived overrides; COMMON keeps the catalog values
    pub fn for_rarity(def: &WeaponDefinition, rarity: Rarity) -> Self {
        let bonus = rarity.bonus_multiplier();
        if rarity == Rarity::Common {
            return Self::default();
        }
        Self {
            damage: Some(def.base_damage * bonus),
            cooldown: Some(def.base_cooldown / bonus),
        }
    }
}

/// Spawn ring phase for orbital emitters
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct OrbitalState {
    pub phase: f32,
}

/// Archetype-private runtime state, created lazily by the owning logic
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub enum RuntimeState {
    #[default]
    Uninitialized,
    Orbital(OrbitalState),
    Aura(AuraState),
    LaserCross(LaserCrossState),
    MineField(MineFieldState),
    Shockwave(ShockwaveState),
    TacticalStrike(StrikeState),
}

macro_rules! runtime_accessor {
    (
        $(#[$meta:meta])* $name:ident, $variant:ident, $state:ty,
        |$params:ident: $params_ty:ty| $init:expr
    ) => {
        $(#[$meta])*
        pub fn $name(&mut self, $params: $params_ty) -> &mut $state {
            if !matches!(self, RuntimeState::$variant(_)) {
                log::debug!("Initializing {} runtime state", stringify!($variant));
                *self = RuntimeState::$variant($init);
            }
            match self {
                RuntimeState::$variant(state) => state,
                _ => unreachable!("runtime state initialized above"),
            }
        }
    };
}

impl RuntimeState {
    pub fn is_initialized(&self) -> bool {
        !matches!(self, RuntimeState::Uninitialized)
    }

    /// Orbital spawn ring, created on first observation
    pub fn orbital(&mut self) -> &mut OrbitalState {
        if !matches!(self, RuntimeState::Orbital(_)) {
            *self = RuntimeState::Orbital(OrbitalState::default());
        }
        match self {
            RuntimeState::Orbital(state) => state,
            _ => unreachable!("runtime state initialized above"),
        }
    }

    runtime_accessor!(aura, Aura, AuraState, |params: &AuraParams| AuraState::new(params));
    runtime_accessor!(
        /// Laser-cross duty cycle, starting in the active phase
        laser_cross,
        LaserCross,
        LaserCrossState,
        |params: &LaserCrossParams| LaserCrossState::new(params)
    );
    runtime_accessor!(
        mine_field,
        MineField,
        MineFieldState,
        |params: &MineFieldParams| MineFieldState::new(params)
    );
    runtime_accessor!(
        shockwave,
        Shockwave,
        ShockwaveState,
        |params: &ShockwaveParams| ShockwaveState::new(params)
    );
    runtime_accessor!(
        tactical_strike,
        TacticalStrike,
        StrikeState,
        |params: &StrikeParams| StrikeState::new(params)
    );
}

/// An equipped weapon
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActiveWeapon {
    pub weapon_id: WeaponId,
    /// 1..=9, never decreases
    pub level: u32,
    /// Seconds until the next volley (projectile archetypes only)
    pub cooldown_timer: f32,
    pub multipliers: Multipliers,
    pub overrides: Overrides,
    pub runtime: RuntimeState,
}

impl ActiveWeapon {
    pub fn new(weapon_id: impl Into<WeaponId>) -> Self {
        Self {
            weapon_id: weapon_id.into(),
            level: 1,
            cooldown_timer: 0.0,
            multipliers: Multipliers::default(),
            overrides: Overrides::default(),
            runtime: RuntimeState::Uninitialized,
        }
    }

    /// Damage before external buffs and crits
    pub fn damage(&self, def: &WeaponDefinition) -> f32 {
        self.overrides.damage.unwrap_or(def.base_damage) * self.multipliers.damage
    }

    /// Cooldown before any multipliers
    pub fn base_cooldown(&self, def: &WeaponDefinition) -> f32 {
        self.overrides.cooldown.unwrap_or(def.base_cooldown)
    }
}

/// Complete simulation state
#[derive(Debug, Clone)]
pub struct SimState {
    pub settings: Settings,
    pub catalog: Arc<WeaponCatalog>,
    /// Equipped weapons in acquisition order
    pub weapons: Vec<ActiveWeapon>,
    pub projectiles: ProjectilePool,
    pub rng: Pcg32,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Elapsed simulated seconds
    pub elapsed: f32,
}

impl SimState {
    pub fn new(settings: Settings, catalog: Arc<WeaponCatalog>) -> Self {
        Self {
            projectiles: ProjectilePool::new(settings.max_projectiles),
            rng: Pcg32::seed_from_u64(settings.seed),
            settings,
            catalog,
            weapons: Vec::new(),
            time_ticks: 0,
            elapsed: 0.0,
        }
    }

    pub fn weapon(&self, id: &str) -> Option<&ActiveWeapon> {
        self.weapons.iter().find(|w| w.weapon_id == id)
    }

    pub fn weapon_mut(&mut self, id: &str) -> Option<&mut ActiveWeapon> {
        self.weapons.iter_mut().find(|w| w.weapon_id == id)
    }

    pub fn free_slots(&self) -> usize {
        self.settings.max_weapon_slots.saturating_sub(self.weapons.len())
    }

    /// Equip a new weapon at level 1 with rarity-derived overrides
    pub fn acquire_weapon(&mut self, id: &str, rarity: Option<Rarity>) -> SimResult<()> {
        let def = self
            .catalog
            .get(id)
            .ok_or_else(|| SimError::UnknownWeapon(id.to_string()))?;
        if self.weapon(id).is_some() {
            return Err(SimError::AlreadyEquipped(id.to_string()));
        }
        if self.free_slots() == 0 {
            return Err(SimError::NoFreeSlot {
                max: self.settings.max_weapon_slots,
            });
        }

        let mut weapon = ActiveWeapon::new(id);
        if let Some(rarity) = rarity {
            weapon.overrides = Overrides::for_rarity(def, rarity);
        }
        log::info!("Acquired {} ({:?})", id, rarity.unwrap_or(Rarity::Common));
        self.weapons.push(weapon);
        Ok(())
    }

    /// Apply a rolled upgrade: fold the multiplier and bump the level
    pub fn apply_upgrade(&mut self, roll: &UpgradeRoll) -> SimResult<()> {
        let max_level = self.settings.max_weapon_level;
        let base_crit = self.settings.base_crit_chance;
        let weapon = self
            .weapon_mut(&roll.weapon_id)
            .ok_or_else(|| SimError::NotEquipped(roll.weapon_id.clone()))?;
        if weapon.level >= max_level {
            return Err(SimError::MaxLevel {
                id: roll.weapon_id.clone(),
                max: max_level,
            });
        }
        weapon
            .multipliers
            .apply(roll.stat, roll.final_magnitude, base_crit);
        weapon.level += 1;
        log::info!(
            "Upgraded {} to level {}: {:?} {:+.2}%",
            roll.weapon_id,
            weapon.level,
            roll.stat,
            roll.final_magnitude
        );
        Ok(())
    }

    /// Apply the weapon side of a picked reward.
    ///
    /// Returns `Ok(false)` for boon and filler choices, which belong to other
    /// collaborators.
    pub fn apply_choice(&mut self, choice: &RewardChoice) -> SimResult<bool> {
        match choice.kind {
            RewardKind::NewWeapon => {
                self.acquire_weapon(&choice.id, choice.rarity)?;
                Ok(true)
            }
            RewardKind::WeaponUpgrade => match &choice.upgrade {
                Some(roll) => {
                    self.apply_upgrade(roll)?;
                    Ok(true)
                }
                None => Ok(false),
            },
            RewardKind::NewBoon | RewardKind::BoonUpgrade | RewardKind::StatBoost => Ok(false),
        }
    }

    /// Roll for a critical hit, returning (damage, is_crit)
    pub fn roll_crit<R: Rng + ?Sized>(
        rng: &mut R,
        damage: f32,
        crit_chance: f32,
        crit_multiplier: f32,
    ) -> (f32, bool) {
        if crit_chance > 0.0 && rng.random::<f32>() < crit_chance {
            (damage * crit_multiplier, true)
        } else {
            (damage, false)
        }
    }
}
