//! Per-frame simulation tick
//!
//! Advances the simulation by one frame: projectile integration, the firing
//! engine (which also drives laser-cross rotation), then the archetypes that need
//! live target positions (aura, mine-field, shockwave, tactical strike).

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::catalog::{Archetype, WeaponDefinition};
use super::firing::fire_weapons;
use super::state::{ActiveWeapon, SimState};
use super::{aura, laser_cross, mine_field, shockwave, strike};
use crate::settings::Settings;

/// Temporary buffs applied on top of per-instance multipliers
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TickModifiers {
    pub cooldown: f32,
    pub projectile_speed: f32,
    pub damage: f32,
    /// Zone multiplier on tactical-strike splash radius
    pub zone: f32,
}

impl Default for TickModifiers {
    fn default() -> Self {
        Self {
            cooldown: 1.0,
            projectile_speed: 1.0,
            damage: 1.0,
            zone: 1.0,
        }
    }
}

/// Something weapons can hit (supplied by the orchestrating caller)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Target {
    pub id: u32,
    pub pos: Vec2,
}

/// Damage dealt to a target this tick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hit {
    pub target_id: u32,
    pub weapon_id: String,
    pub damage: f32,
    pub is_crit: bool,
    /// Unit push direction (zero when the source sits on the target)
    pub direction: Vec2,
    pub knockback: f32,
}

/// Inputs for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Player position
    pub origin: Vec2,
    /// Player facing (radians)
    pub heading: f32,
    pub modifiers: TickModifiers,
    /// Live enemy positions
    pub targets: Vec<Target>,
}

/// What happened during a tick
#[derive(Debug, Clone, Default)]
pub struct TickReport {
    /// Projectiles admitted to the pool
    pub spawned: usize,
    pub hits: Vec<Hit>,
}

/// Resolved combat numbers for one weapon during one tick
#[derive(Debug, Clone)]
pub struct HitProfile {
    pub weapon_id: String,
    pub damage: f32,
    pub knockback: f32,
    pub area: f32,
    pub crit_chance: f32,
    pub crit_multiplier: f32,
    /// Cooldown after every multiplier and the floor
    pub cooldown: f32,
    /// The floored multiplier behind `cooldown`
    pub cooldown_multiplier: f32,
}

impl HitProfile {
    pub fn new(
        weapon: &ActiveWeapon,
        def: &WeaponDefinition,
        settings: &Settings,
        modifiers: &TickModifiers,
    ) -> Self {
        let cooldown_multiplier = settings
            .effective_cooldown_multiplier(weapon.multipliers.cooldown, modifiers.cooldown);
        Self {
            weapon_id: weapon.weapon_id.clone(),
            damage: weapon.damage(def) * modifiers.damage,
            knockback: def.knockback * weapon.multipliers.knockback,
            area: weapon.multipliers.area,
            crit_chance: settings.crit_chance(weapon.multipliers.crit_bonus),
            crit_multiplier: settings.crit_damage_multiplier,
            cooldown: weapon.base_cooldown(def) * cooldown_multiplier,
            cooldown_multiplier,
        }
    }

    /// Full damage with a crit roll
    pub fn roll<R: Rng + ?Sized>(&self, rng: &mut R) -> (f32, bool) {
        SimState::roll_crit(rng, self.damage, self.crit_chance, self.crit_multiplier)
    }

    pub fn hit(&self, target_id: u32, damage: f32, is_crit: bool, direction: Vec2) -> Hit {
        Hit {
            target_id,
            weapon_id: self.weapon_id.clone(),
            damage,
            is_crit,
            direction,
            knockback: self.knockback,
        }
    }
}

/// Advance the simulation by one frame
pub fn tick(state: &mut SimState, input: &TickInput, dt: f32) -> TickReport {
    state.time_ticks += 1;
    state.elapsed += dt;

    state.projectiles.advance(dt);

    let spawned = fire_weapons(
        state,
        dt,
        input.origin,
        input.heading,
        &input.modifiers,
    );

    let mut hits = Vec::new();
    run_target_archetypes(state, input, dt, &mut hits);

    if !hits.is_empty() {
        log::trace!("Tick {}: {} hits", state.time_ticks, hits.len());
    }

    TickReport { spawned, hits }
}

/// Drive the archetypes that query live target positions
pub fn run_target_archetypes(
    state: &mut SimState,
    input: &TickInput,
    dt: f32,
    hits: &mut Vec<Hit>,
) {
    let SimState {
        settings,
        catalog,
        weapons,
        rng,
        ..
    } = state;

    for weapon in weapons.iter_mut() {
        // Stale equip references are skipped
        let Some(def) = catalog.get(&weapon.weapon_id) else {
            continue;
        };
        let profile = HitProfile::new(weapon, def, settings, &input.modifiers);

        match &def.archetype {
            Archetype::Projectile { .. } => {}
            Archetype::Aura(params) => {
                let aura = weapon.runtime.aura(params);
                aura::tick_aura(
                    aura,
                    params,
                    &profile,
                    rng,
                    input.origin,
                    &input.targets,
                    dt,
                    hits,
                );
            }
            Archetype::LaserCross(params) => {
                let cross = weapon.runtime.laser_cross(params);
                laser_cross::apply_beam_damage(
                    cross,
                    params,
                    &profile,
                    input.origin,
                    &input.targets,
                    dt,
                    hits,
                );
            }
            Archetype::MineField(params) => {
                let field = weapon.runtime.mine_field(params);
                mine_field::tick_mine_field(
                    field,
                    params,
                    &profile,
                    rng,
                    input.origin,
                    &input.targets,
                    dt,
                    hits,
                );
            }
            Archetype::Shockwave(params) => {
                let waves = weapon.runtime.shockwave(params);
                shockwave::tick_shockwave(
                    waves,
                    params,
                    &profile,
                    rng,
                    input.origin,
                    input.heading,
                    &input.targets,
                    dt,
                    hits,
                );
            }
            Archetype::TacticalStrike(params) => {
                let strikes = weapon.runtime.tactical_strike(params);
                strike::tick_strike(
                    strikes,
                    params,
                    &profile,
                    rng,
                    input.origin,
                    &input.targets,
                    dt,
                    input.modifiers.zone,
                    hits,
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::catalog::WeaponCatalog;
    use crate::sim::state::RuntimeState;
    use std::sync::Arc;

    fn state_with(ids: &[&str]) -> SimState {
        let mut state = SimState::new(Settings::default(), Arc::new(WeaponCatalog::builtin()));
        for id in ids {
            state.acquire_weapon(id, None).unwrap();
        }
        state
    }

    fn ring(n: u32, radius: f32) -> Vec<Target> {
        (0..n)
            .map(|i| Target {
                id: i,
                pos: crate::polar_to_cartesian(radius, i as f32 * std::f32::consts::TAU / n as f32),
            })
            .collect()
    }

    #[test]
    fn test_tick_advances_clock() {
        let mut state = state_with(&["LASER_FRONT"]);
        let report = tick(&mut state, &TickInput::default(), 0.5);
        assert_eq!(state.time_ticks, 1);
        assert_eq!(state.elapsed, 0.5);
        assert_eq!(report.spawned, 1);
        assert!(report.hits.is_empty());
    }

    #[test]
    fn test_runtime_state_created_on_first_tick() {
        let mut state = state_with(&["STATIC_FIELD", "MINE_FIELD", "SHOCKWAVE", "ORBITAL_STRIKE"]);
        assert!(state.weapons.iter().all(|w| w.runtime == RuntimeState::Uninitialized));
        tick(&mut state, &TickInput::default(), 0.016);
        assert!(state.weapons.iter().all(|w| w.runtime.is_initialized()));
    }

    #[test]
    fn test_target_archetypes_report_hits() {
        let mut state = state_with(&["STATIC_FIELD", "ORBITAL_STRIKE"]);
        let input = TickInput {
            targets: ring(4, 2.0),
            ..TickInput::default()
        };
        let report = tick(&mut state, &input, 0.016);

        let aura_hits = report.hits.iter().filter(|h| h.weapon_id == "STATIC_FIELD").count();
        assert_eq!(aura_hits, 4);
        let strike = report
            .hits
            .iter()
            .find(|h| h.weapon_id == "ORBITAL_STRIKE")
            .unwrap();
        assert_eq!(strike.knockback, 3.0);
        assert!(strike.damage == 30.0 || strike.damage == 60.0);
    }

    #[test]
    fn test_damage_modifier_applies_to_hits() {
        let mut state = state_with(&["STATIC_FIELD"]);
        state.settings.base_crit_chance = 0.0;
        let input = TickInput {
            targets: ring(1, 1.0),
            modifiers: TickModifiers {
                damage: 2.0,
                ..TickModifiers::default()
            },
            ..TickInput::default()
        };
        let report = tick(&mut state, &input, 0.016);
        assert_eq!(report.hits.len(), 1);
        assert_eq!(report.hits[0].damage, 6.0);
        assert!(!report.hits[0].is_crit);
    }

    #[test]
    fn test_same_seed_same_outcome() {
        let run = || {
            let mut state = state_with(
                &["SCATTER_CANNON", "MINE_FIELD", "SHOCKWAVE", "ORBITAL_STRIKE"],
            );
            let input = TickInput {
                targets: ring(6, 4.0),
                ..TickInput::default()
            };
            let mut hits = Vec::new();
            for _ in 0..120 {
                hits.extend(tick(&mut state, &input, crate::consts::SIM_DT).hits);
            }
            (hits, state.projectiles.snapshot().to_vec())
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn test_hit_profile_resolves_multipliers() {
        let catalog = WeaponCatalog::builtin();
        let def = catalog.get("SHOCKWAVE").unwrap();
        let mut weapon = ActiveWeapon::new("SHOCKWAVE");
        weapon.multipliers.damage = 1.5;
        weapon.multipliers.cooldown = 0.1;
        weapon.multipliers.crit_bonus = 0.2;
        let profile = HitProfile::new(
            &weapon,
            def,
            &Settings::default(),
            &TickModifiers::default(),
        );

        assert_eq!(profile.damage, 9.0 * 1.5);
        assert!((profile.crit_chance - 0.25).abs() < 1e-6);
        assert_eq!(profile.cooldown_multiplier, 0.15);
        assert!((profile.cooldown - 2.5 * 0.15).abs() < 1e-6);
    }
}
