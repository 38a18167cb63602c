//! Static weapon and boon tables
//!
//! Definitions are read-only inputs: the firing engine, the archetype state
//! machines and the reward pool builder all borrow them and never mutate them.
//! Each archetype carries only its own parameters, so dispatch is an exhaustive
//! `match` instead of probing for optional fields.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::error::{SimError, SimResult};

/// Catalog key for a weapon definition
pub type WeaponId = String;

/// Which slot a weapon may occupy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlotKind {
    /// Any free weapon slot
    #[default]
    Any,
    /// Fixed starter slot (cannot be banished)
    Fixed,
}

/// Projectile shape shared by every projectile-emitting pattern
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShotParams {
    /// Units per second
    pub speed: f32,
    /// Collision radius
    pub radius: f32,
    /// Seconds before the projectile expires
    pub lifetime: f32,
    /// Display hint (0xRRGGBB)
    #[serde(default = "default_color")]
    pub color: u32,
    /// Display hint
    #[serde(default = "default_mesh_scale")]
    pub mesh_scale: f32,
}

fn default_color() -> u32 {
    0x00ff_ffff
}

fn default_mesh_scale() -> f32 {
    1.0
}

/// How a projectile weapon lays out a volley
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "pattern", rename_all = "snake_case")]
pub enum FirePattern {
    /// One projectile along the heading
    Forward,
    /// `count` projectiles evenly spanning ±`angle` (radians)
    Spread { count: u32, angle: f32 },
    /// `count` projectiles at independent random offsets within ±`angle`
    Pellet { count: u32, angle: f32 },
    /// One projectile that survives `pierce_count` hits
    Piercing { pierce_count: u32 },
    /// Spawns from a point rotating around the origin, firing outward
    Orbital { radius: f32, orbit_speed: f32 },
    /// Spawns from a heading-relative offset (x = forward, y = left)
    Drone { offset: Vec2 },
    /// Forward fire with a near-continuous cooldown
    Beam,
    /// Forward projectile that detonates on impact
    Explosion {
        explosion_radius: f32,
        explosion_damage: f32,
    },
}

/// Damage field around the player
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AuraParams {
    pub radius: f32,
    /// Seconds between damage pulses
    pub pulse_interval: f32,
}

/// Two rotating beams with an on/off duty cycle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LaserCrossParams {
    /// Radians per second
    pub rotation_speed: f32,
    pub active_duration: f32,
    pub inactive_duration: f32,
    pub beam_length: f32,
    pub beam_width: f32,
}

/// Proximity mines orbiting the player
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MineFieldParams {
    pub mine_count: usize,
    pub orbit_radius: f32,
    /// Radians per second (ignores projectile-speed buffs)
    pub orbital_speed: f32,
    pub detection_radius: f32,
    pub blast_radius: f32,
    pub respawn_time: f32,
}

/// Staggered burst of expanding sector arcs
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShockwaveParams {
    pub wave_count: u32,
    /// Seconds between consecutive waves of one burst
    pub wave_delay: f32,
    pub max_radius: f32,
    pub expand_speed: f32,
    /// Angular width of each arc (radians)
    pub sector_angle: f32,
    /// Maximum simultaneously active arcs
    pub pool_limit: usize,
}

/// Targeted strike from above with splash
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StrikeParams {
    pub detection_radius: f32,
    pub strike_aoe_radius: f32,
    pub splash_damage_ratio: f32,
    pub vfx_duration: f32,
    /// Maximum simultaneous strike VFX entries
    pub pool_limit: usize,
}

/// Behavioral category of a weapon
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "archetype", rename_all = "snake_case")]
pub enum Archetype {
    /// Cooldown-driven projectile emitter
    Projectile { pattern: FirePattern, shot: ShotParams },
    Aura(AuraParams),
    LaserCross(LaserCrossParams),
    MineField(MineFieldParams),
    Shockwave(ShockwaveParams),
    TacticalStrike(StrikeParams),
}

/// Flat archetype tag (for logging, UI and filtering)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArchetypeKind {
    Forward,
    Spread,
    Pellet,
    Piercing,
    Orbital,
    Drone,
    Beam,
    Explosion,
    Aura,
    LaserCross,
    MineField,
    Shockwave,
    TacticalStrike,
}

impl Archetype {
    pub fn kind(&self) -> ArchetypeKind {
        match self {
            Archetype::Projectile { pattern, .. } => match pattern {
                FirePattern::Forward => ArchetypeKind::Forward,
                FirePattern::Spread { .. } => ArchetypeKind::Spread,
                FirePattern::Pellet { .. } => ArchetypeKind::Pellet,
                FirePattern::Piercing { .. } => ArchetypeKind::Piercing,
                FirePattern::Orbital { .. } => ArchetypeKind::Orbital,
                FirePattern::Drone { .. } => ArchetypeKind::Drone,
                FirePattern::Beam => ArchetypeKind::Beam,
                FirePattern::Explosion { .. } => ArchetypeKind::Explosion,
            },
            Archetype::Aura(_) => ArchetypeKind::Aura,
            Archetype::LaserCross(_) => ArchetypeKind::LaserCross,
            Archetype::MineField(_) => ArchetypeKind::MineField,
            Archetype::Shockwave(_) => ArchetypeKind::Shockwave,
            Archetype::TacticalStrike(_) => ArchetypeKind::TacticalStrike,
        }
    }

    /// True for archetypes whose generic cooldown timer is driven by the firing engine
    pub fn is_projectile_driven(&self) -> bool {
        matches!(self, Archetype::Projectile { .. })
    }
}

/// A weapon definition (static)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeaponDefinition {
    pub id: WeaponId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(flatten)]
    pub archetype: Archetype,
    pub base_damage: f32,
    /// Seconds between shots (or between bursts / strikes)
    pub base_cooldown: f32,
    #[serde(default)]
    pub knockback: f32,
    /// Relative weight in new-weapon draws; 0 disables acquisition offers
    #[serde(default = "default_rarity_weight")]
    pub rarity_weight: f32,
    #[serde(default)]
    pub slot: SlotKind,
}

fn default_rarity_weight() -> f32 {
    1.0
}

impl WeaponDefinition {
    /// The radius that area upgrades scale (used for upgrade previews)
    pub fn base_area(&self) -> f32 {
        match &self.archetype {
            Archetype::Projectile { pattern, shot } => match pattern {
                FirePattern::Explosion {
                    explosion_radius, ..
                } => *explosion_radius,
                _ => shot.radius,
            },
            Archetype::Aura(p) => p.radius,
            Archetype::LaserCross(p) => p.beam_length,
            Archetype::MineField(p) => p.blast_radius,
            Archetype::Shockwave(p) => p.max_radius,
            Archetype::TacticalStrike(p) => p.strike_aoe_radius,
        }
    }

    /// Reject definitions that would stall or divide by zero in the tick loop
    pub fn validate(&self) -> SimResult<()> {
        let invalid = |reason: &str| {
            Err(SimError::InvalidDefinition {
                id: self.id.clone(),
                reason: reason.to_string(),
            })
        };

        if self.id.is_empty() {
            return invalid("empty id");
        }
        if self.base_damage < 0.0 {
            return invalid("negative base_damage");
        }
        if self.rarity_weight < 0.0 {
            return invalid("negative rarity_weight");
        }
        match &self.archetype {
            Archetype::Projectile { pattern, shot } => {
                if self.base_cooldown <= 0.0 {
                    return invalid("projectile weapons need a positive base_cooldown");
                }
                if shot.lifetime <= 0.0 {
                    return invalid("projectile lifetime must be positive");
                }
                match pattern {
                    FirePattern::Spread { count, .. } | FirePattern::Pellet { count, .. }
                        if *count == 0 =>
                    {
                        return invalid("volley count must be at least 1");
                    }
                    _ => {}
                }
            }
            Archetype::Aura(p) if p.pulse_interval <= 0.0 => {
                return invalid("aura pulse_interval must be positive");
            }
            Archetype::LaserCross(p) if p.active_duration <= 0.0 || p.inactive_duration <= 0.0 => {
                return invalid("laser-cross phase durations must be positive");
            }
            Archetype::MineField(p) if p.mine_count == 0 => {
                return invalid("mine_count must be at least 1");
            }
            Archetype::Shockwave(p) if p.pool_limit == 0 || p.expand_speed <= 0.0 => {
                return invalid("shockwave needs a pool_limit and positive expand_speed");
            }
            Archetype::TacticalStrike(p) if p.pool_limit == 0 => {
                return invalid("strike pool_limit must be at least 1");
            }
            _ => {}
        }
        Ok(())
    }
}

/// Immutable weapon table keyed by id (definition order is preserved)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WeaponCatalog {
    pub weapons: Vec<WeaponDefinition>,
}

impl WeaponCatalog {
    pub fn new(weapons: Vec<WeaponDefinition>) -> SimResult<Self> {
        for (i, weapon) in weapons.iter().enumerate() {
            weapon.validate()?;
            if weapons[..i].iter().any(|w| w.id == weapon.id) {
                return Err(SimError::InvalidDefinition {
                    id: weapon.id.clone(),
                    reason: "duplicate id".to_string(),
                });
            }
        }
        Ok(Self { weapons })
    }

    /// Parse a catalog from a JSON array of definitions
    pub fn from_json(json: &str) -> SimResult<Self> {
        let weapons: Vec<WeaponDefinition> =
            serde_json::from_str(json).map_err(|source| SimError::Parse {
                what: "weapon catalog",
                source,
            })?;
        Self::new(weapons)
    }

    pub fn get(&self, id: &str) -> Option<&WeaponDefinition> {
        self.weapons.iter().find(|w| w.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &WeaponDefinition> {
        self.weapons.iter()
    }

    pub fn len(&self) -> usize {
        self.weapons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weapons.is_empty()
    }

    /// Built-in arsenal: one weapon per archetype
    pub fn builtin() -> Self {
        use std::f32::consts::{FRAC_PI_2, FRAC_PI_4, PI};

        let shot = |speed: f32, radius: f32, lifetime: f32, color: u32| ShotParams {
            speed,
            radius,
            lifetime,
            color,
            mesh_scale: 1.0,
        };
        let def = |id: &str,
                   name: &str,
                   description: &str,
                   archetype: Archetype,
                   base_damage: f32,
                   base_cooldown: f32,
                   knockback: f32,
                   rarity_weight: f32| WeaponDefinition {
            id: id.to_string(),
            name: name.to_string(),
            description: description.to_string(),
            archetype,
            base_damage,
            base_cooldown,
            knockback,
            rarity_weight,
            slot: SlotKind::Any,
        };

        let mut weapons = vec![
            def(
                "LASER_FRONT",
                "Front Laser",
                "Fires a bolt straight ahead",
                Archetype::Projectile {
                    pattern: FirePattern::Forward,
                    shot: shot(28.0, 0.25, 1.5, 0x00ff_ff00),
                },
                10.0,
                0.45,
                1.0,
                1.0,
            ),
            def(
                "SPREAD_SHOT",
                "Spread Shot",
                "Fans three bolts across the front arc",
                Archetype::Projectile {
                    pattern: FirePattern::Spread {
                        count: 3,
                        angle: 0.35,
                    },
                    shot: shot(24.0, 0.25, 1.2, 0x00ff_aa00),
                },
                7.0,
                0.8,
                1.0,
                1.0,
            ),
            def(
                "SCATTER_CANNON",
                "Scatter Cannon",
                "Blasts a cloud of pellets at close range",
                Archetype::Projectile {
                    pattern: FirePattern::Pellet {
                        count: 7,
                        angle: 0.3,
                    },
                    shot: shot(22.0, 0.18, 0.5, 0x00ff_dd55),
                },
                4.0,
                1.1,
                2.0,
                0.9,
            ),
            def(
                "RAILGUN",
                "Railgun",
                "A slug that punches through several enemies",
                Archetype::Projectile {
                    pattern: FirePattern::Piercing { pierce_count: 3 },
                    shot: shot(45.0, 0.2, 1.0, 0x0055_88ff),
                },
                22.0,
                1.6,
                3.0,
                0.7,
            ),
            def(
                "ORBIT_BLADES",
                "Orbit Blades",
                "Launches blades outward from a rotating ring",
                Archetype::Projectile {
                    pattern: FirePattern::Orbital {
                        radius: 2.0,
                        orbit_speed: PI,
                    },
                    shot: shot(14.0, 0.35, 0.9, 0x00cc_66ff),
                },
                8.0,
                0.5,
                1.5,
                0.8,
            ),
            def(
                "COMBAT_DRONE",
                "Combat Drone",
                "A wingman drone that fires from your side",
                Archetype::Projectile {
                    pattern: FirePattern::Drone {
                        offset: Vec2::new(-0.5, 1.5),
                    },
                    shot: shot(26.0, 0.2, 1.4, 0x0066_ff66),
                },
                6.0,
                0.6,
                0.5,
                0.8,
            ),
            def(
                "PLASMA_BEAM",
                "Plasma Beam",
                "A near-continuous stream of plasma",
                Archetype::Projectile {
                    pattern: FirePattern::Beam,
                    shot: shot(40.0, 0.15, 0.35, 0x00ff_44ff),
                },
                2.0,
                0.06,
                0.2,
                0.6,
            ),
            def(
                "ROCKET_POD",
                "Rocket Pod",
                "Rockets that explode on impact",
                Archetype::Projectile {
                    pattern: FirePattern::Explosion {
                        explosion_radius: 2.5,
                        explosion_damage: 12.0,
                    },
                    shot: shot(16.0, 0.3, 2.0, 0x00ff_6600),
                },
                14.0,
                1.8,
                4.0,
                0.7,
            ),
            def(
                "STATIC_FIELD",
                "Static Field",
                "Shocks everything close to you",
                Archetype::Aura(AuraParams {
                    radius: 3.0,
                    pulse_interval: 0.5,
                }),
                3.0,
                0.5,
                0.3,
                0.8,
            ),
            def(
                "LASER_CROSS",
                "Laser Cross",
                "Two crossed beams sweep around you in bursts",
                Archetype::LaserCross(LaserCrossParams {
                    rotation_speed: FRAC_PI_2,
                    active_duration: 3.0,
                    inactive_duration: 2.0,
                    beam_length: 9.0,
                    beam_width: 0.4,
                }),
                5.0,
                2.0,
                0.5,
                0.6,
            ),
            def(
                "MINE_FIELD",
                "Mine Field",
                "Orbiting proximity mines",
                Archetype::MineField(MineFieldParams {
                    mine_count: 4,
                    orbit_radius: 3.5,
                    orbital_speed: 0.8,
                    detection_radius: 1.2,
                    blast_radius: 2.0,
                    respawn_time: 3.0,
                }),
                18.0,
                3.0,
                5.0,
                0.6,
            ),
            def(
                "SHOCKWAVE",
                "Shockwave",
                "Staggered waves that ripple toward the nearest threat",
                Archetype::Shockwave(ShockwaveParams {
                    wave_count: 3,
                    wave_delay: 0.2,
                    max_radius: 8.0,
                    expand_speed: 12.0,
                    sector_angle: FRAC_PI_4 * 1.5,
                    pool_limit: 6,
                }),
                9.0,
                2.5,
                6.0,
                0.5,
            ),
            def(
                "ORBITAL_STRIKE",
                "Orbital Strike",
                "Calls down a strike on a nearby enemy",
                Archetype::TacticalStrike(StrikeParams {
                    detection_radius: 12.0,
                    strike_aoe_radius: 2.5,
                    splash_damage_ratio: 0.5,
                    vfx_duration: 0.6,
                    pool_limit: 8,
                }),
                30.0,
                2.2,
                3.0,
                0.4,
            ),
        ];
        // The starter weapon lives in the fixed slot
        weapons[0].slot = SlotKind::Fixed;

        Self { weapons }
    }
}

/// How a boon's magnitude is displayed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MagnitudeUnit {
    #[default]
    Percent,
    Flat,
    Seconds,
}

/// A passive boon definition (static)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoonDefinition {
    pub id: String,
    pub name: String,
    /// Display template; `{value}` is replaced at presentation time
    pub description: String,
    /// Magnitude granted per boon level
    pub per_level: f32,
    #[serde(default)]
    pub unit: MagnitudeUnit,
    pub max_level: u32,
}

impl BoonDefinition {
    /// Total magnitude at a given level
    pub fn magnitude_at(&self, level: u32) -> f32 {
        self.per_level * level as f32
    }
}

/// Immutable boon table
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BoonCatalog {
    pub boons: Vec<BoonDefinition>,
}

impl BoonCatalog {
    pub fn new(boons: Vec<BoonDefinition>) -> SimResult<Self> {
        for (i, boon) in boons.iter().enumerate() {
            if boon.max_level == 0 {
                return Err(SimError::InvalidDefinition {
                    id: boon.id.clone(),
                    reason: "max_level must be at least 1".to_string(),
                });
            }
            if boons[..i].iter().any(|b| b.id == boon.id) {
                return Err(SimError::InvalidDefinition {
                    id: boon.id.clone(),
                    reason: "duplicate id".to_string(),
                });
            }
        }
        Ok(Self { boons })
    }

    pub fn from_json(json: &str) -> SimResult<Self> {
        let boons: Vec<BoonDefinition> =
            serde_json::from_str(json).map_err(|source| SimError::Parse {
                what: "boon catalog",
                source,
            })?;
        Self::new(boons)
    }

    pub fn get(&self, id: &str) -> Option<&BoonDefinition> {
        self.boons.iter().find(|b| b.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &BoonDefinition> {
        self.boons.iter()
    }

    pub fn builtin() -> Self {
        use MagnitudeUnit::{Flat, Percent, Seconds};

        let boon = |id: &str, name: &str, description: &str, per_level: f32, unit, max_level| {
            BoonDefinition {
                id: id.to_string(),
                name: name.to_string(),
                description: description.to_string(),
                per_level,
                unit,
                max_level,
            }
        };
        Self {
            boons: vec![
                boon("THRUSTERS", "Thrusters", "Move speed +{value}", 8.0, Percent, 5),
                boon("HULL_PLATING", "Hull Plating", "Max hull +{value}", 20.0, Flat, 5),
                boon("MAGNET", "Tractor Beam", "Pickup range +{value}", 15.0, Percent, 5),
                boon("OVERCLOCK", "Overclock", "Weapon cooldowns -{value}", 5.0, Percent, 5),
                boon("LUCKY_CHARM", "Lucky Charm", "Luck +{value}", 1.0, Flat, 3),
                boon(
                    "REPAIR_DRONES",
                    "Repair Drones",
                    "Regenerate 1 hull every {value}",
                    4.0,
                    Seconds,
                    3,
                ),
            ],
        }
    }
}
