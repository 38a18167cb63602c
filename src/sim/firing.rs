//! Weapon firing engine
//!
//! Advances cooldowns and spawns projectiles for the projectile-driven
//! archetypes. Aura, mine-field, shockwave and tactical-strike are skipped here
//! (their cooldown fields are never touched) because they need live target
//! positions; laser-cross only advances its rotation and duty cycle.

use glam::Vec2;
use rand::Rng;

use super::catalog::{Archetype, FirePattern, ShotParams};
use super::laser_cross;
use super::projectile::{Projectile, ProjectileKind, ProjectilePool};
use super::state::{ActiveWeapon, SimState};
use super::tick::TickModifiers;
use crate::{heading_dir, normalize_angle, polar_to_cartesian};

/// Spawn position and direction of one projectile in a volley
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Muzzle {
    pub pos: Vec2,
    pub dir: Vec2,
}

/// Lay out a volley for a pattern.
///
/// `orbit_phase` is only read by the orbital pattern.
pub fn plan_volley<R: Rng + ?Sized>(
    pattern: &FirePattern,
    origin: Vec2,
    heading: f32,
    orbit_phase: f32,
    rng: &mut R,
) -> Vec<Muzzle> {
    let forward = Muzzle {
        pos: origin,
        dir: heading_dir(heading),
    };
    match *pattern {
        FirePattern::Forward
        | FirePattern::Beam
        | FirePattern::Piercing { .. }
        | FirePattern::Explosion { .. } => vec![forward],
        FirePattern::Spread { count, angle } => {
            if count <= 1 {
                return vec![forward; count as usize];
            }
            let last = (count - 1) as f32;
            (0..count)
                .map(|i| {
                    // t runs -1..=1; an odd count puts the middle projectile at exactly 0
                    let t = 2.0 * (i as f32 / last) - 1.0;
                    Muzzle {
                        pos: origin,
                        dir: heading_dir(heading + angle * t),
                    }
                })
                .collect()
        }
        FirePattern::Pellet { count, angle } => (0..count)
            .map(|_| {
                let offset = (rng.random::<f32>() * 2.0 - 1.0) * angle;
                Muzzle {
                    pos: origin,
                    dir: heading_dir(heading + offset),
                }
            })
            .collect(),
        FirePattern::Orbital { radius, .. } => vec![Muzzle {
            pos: origin + polar_to_cartesian(radius, orbit_phase),
            dir: heading_dir(orbit_phase),
        }],
        FirePattern::Drone { offset } => vec![Muzzle {
            pos: origin + Vec2::from_angle(heading).rotate(offset),
            dir: heading_dir(heading),
        }],
    }
}

/// Advance every equipped weapon's firing logic; returns projectiles spawned.
///
/// A ready weapon resets to its effective cooldown once its volley admits at
/// least one projectile. If the pool is full and nothing is admitted, the
/// timer stays at 0 and the weapon fires again on the next tick that has room.
pub fn fire_weapons(
    state: &mut SimState,
    dt: f32,
    origin: Vec2,
    heading: f32,
    modifiers: &TickModifiers,
) -> usize {
    let SimState {
        settings,
        catalog,
        weapons,
        projectiles,
        rng,
        ..
    } = state;

    let mut spawned = 0;
    for weapon in weapons.iter_mut() {
        let Some(def) = catalog.get(&weapon.weapon_id) else {
            continue;
        };

        match &def.archetype {
            Archetype::Projectile { pattern, shot } => {
                // Orbital rings keep turning between volleys
                let orbit_phase = match pattern {
                    FirePattern::Orbital { orbit_speed, .. } => {
                        let orbit = weapon.runtime.orbital();
                        orbit.phase = normalize_angle(orbit.phase + orbit_speed * dt);
                        orbit.phase
                    }
                    _ => 0.0,
                };

                weapon.cooldown_timer -= dt;
                if weapon.cooldown_timer > 0.0 {
                    continue;
                }

                let volley = plan_volley(pattern, origin, heading, orbit_phase, rng);
                let admitted = emit_volley(
                    projectiles,
                    weapon,
                    pattern,
                    shot,
                    &volley,
                    def.base_damage,
                    modifiers,
                );
                spawned += admitted;

                if admitted == 0 && !volley.is_empty() {
                    // Pool is full: stay ready and retry next tick
                    weapon.cooldown_timer = 0.0;
                } else {
                    let multiplier = settings.effective_cooldown_multiplier(
                        weapon.multipliers.cooldown,
                        modifiers.cooldown,
                    );
                    weapon.cooldown_timer = weapon.base_cooldown(def) * multiplier;
                }
            }
            Archetype::LaserCross(params) => {
                let cross = weapon.runtime.laser_cross(params);
                laser_cross::advance(cross, params, dt, modifiers);
            }
            Archetype::Aura(_)
            | Archetype::MineField(_)
            | Archetype::Shockwave(_)
            | Archetype::TacticalStrike(_) => {}
        }
    }

    if spawned > 0 {
        log::trace!("Spawned {} projectiles ({} live)", spawned, projectiles.len());
    }
    spawned
}

/// Push as much of a volley as the pool admits; returns the admitted count
fn emit_volley(
    pool: &mut ProjectilePool,
    weapon: &ActiveWeapon,
    pattern: &FirePattern,
    shot: &ShotParams,
    volley: &[Muzzle],
    base_damage: f32,
    modifiers: &TickModifiers,
) -> usize {
    let damage = weapon.overrides.damage.unwrap_or(base_damage)
        * weapon.multipliers.damage
        * modifiers.damage;
    let area = weapon.multipliers.area;
    let kind = match *pattern {
        FirePattern::Piercing { pierce_count } => ProjectileKind::Piercing {
            pierce_count,
            pierce_hits: 0,
        },
        FirePattern::Explosion {
            explosion_radius,
            explosion_damage,
        } => ProjectileKind::Explosive {
            radius: explosion_radius * area,
            damage: explosion_damage * weapon.multipliers.damage * modifiers.damage,
        },
        _ => ProjectileKind::Plain,
    };

    let mut admitted = 0;
    for muzzle in volley {
        if pool.is_full() {
            break;
        }
        let projectile = Projectile {
            id: pool.next_projectile_id(),
            weapon_id: weapon.weapon_id.clone(),
            pos: muzzle.pos,
            dir: muzzle.dir,
            speed: shot.speed * modifiers.projectile_speed,
            damage,
            radius: shot.radius * area,
            lifetime: shot.lifetime,
            color: shot.color,
            mesh_scale: shot.mesh_scale,
            active: true,
            kind,
        };
        if pool.try_push(projectile) {
            admitted += 1;
        }
    }
    admitted
}
