//! Weapon upgrade rolls
//!
//! An upgrade picks a stat uniformly, a rarity through the rarity roll, then
//! perturbs the tier's base magnitude by a luck-skewed variance in [-3, +3].
//! Magnitudes are percentages (crit: percentage points).

use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::rarity::{Rarity, roll_rarity};
use crate::sim::catalog::WeaponDefinition;
use crate::sim::state::{Multipliers, Overrides};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpgradeStat {
    Damage,
    Area,
    Cooldown,
    Knockback,
    Crit,
}

impl UpgradeStat {
    pub const ALL: [UpgradeStat; 5] = [
        UpgradeStat::Damage,
        UpgradeStat::Area,
        UpgradeStat::Cooldown,
        UpgradeStat::Knockback,
        UpgradeStat::Crit,
    ];

    pub fn label(self) -> &'static str {
        match self {
            UpgradeStat::Damage => "Damage",
            UpgradeStat::Area => "Area",
            UpgradeStat::Cooldown => "Cooldown",
            UpgradeStat::Knockback => "Knockback",
            UpgradeStat::Crit => "Crit",
        }
    }
}

/// Base magnitude per rarity (rows) and stat (columns, in `UpgradeStat::ALL` order)
const MAGNITUDE_TABLE: [[f32; 5]; 4] = [
    [10.0, 8.0, -6.0, 10.0, 3.0],
    [15.0, 12.0, -9.0, 15.0, 5.0],
    [22.0, 18.0, -13.0, 22.0, 8.0],
    [32.0, 25.0, -18.0, 32.0, 12.0],
];

/// Half-width of the variance band
const VARIANCE: f32 = 3.0;

pub fn base_magnitude(rarity: Rarity, stat: UpgradeStat) -> f32 {
    MAGNITUDE_TABLE[rarity as usize][stat as usize]
}

/// Map a uniform draw to [-3, +3], skewed upward by luck
pub fn variance_roll(u: f32, luck: f32) -> f32 {
    let pow = (1.0 - luck * 0.06).max(0.1);
    u.powf(pow) * 2.0 * VARIANCE - VARIANCE
}

/// Apply the variance roll to a base magnitude; crit never lands below its
/// tier's base
pub fn final_magnitude(stat: UpgradeStat, base: f32, roll: f32) -> f32 {
    match stat {
        UpgradeStat::Crit => (base + roll).max(base),
        _ => base + roll,
    }
}

/// Weapon context for absolute previews
#[derive(Debug, Clone, Copy)]
pub struct UpgradeContext<'a> {
    pub def: &'a WeaponDefinition,
    pub multipliers: Multipliers,
    pub overrides: Overrides,
    pub global_damage: f32,
    pub global_cooldown: f32,
    pub min_cooldown_multiplier: f32,
    pub base_crit_chance: f32,
}

impl UpgradeContext<'_> {
    /// Current and post-upgrade values of a stat
    fn absolute(&self, stat: UpgradeStat, magnitude: f32) -> (f32, f32) {
        let factor = 1.0 + magnitude / 100.0;
        let m = &self.multipliers;
        match stat {
            UpgradeStat::Damage => {
                let base =
                    self.overrides.damage.unwrap_or(self.def.base_damage) * self.global_damage;
                (base * m.damage, base * m.damage * factor)
            }
            UpgradeStat::Cooldown => {
                let base = self.overrides.cooldown.unwrap_or(self.def.base_cooldown);
                let floor = self.min_cooldown_multiplier;
                let effective = |mult: f32| base * (mult * self.global_cooldown).max(floor);
                (effective(m.cooldown), effective(m.cooldown * factor))
            }
            UpgradeStat::Area => {
                let base = self.def.base_area();
                (base * m.area, base * m.area * factor)
            }
            UpgradeStat::Knockback => (m.knockback, m.knockback * factor),
            UpgradeStat::Crit => {
                let current = (self.base_crit_chance + m.crit_bonus).min(1.0);
                let next = (current + magnitude / 100.0).min(1.0);
                (current * 100.0, next * 100.0)
            }
        }
    }
}

/// What the player sees for an upgrade offer
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum StatPreview {
    Absolute {
        stat: UpgradeStat,
        current: f32,
        next: f32,
    },
    Relative {
        stat: UpgradeStat,
        percent: f32,
    },
}

impl StatPreview {
    pub fn new(stat: UpgradeStat, magnitude: f32, ctx: Option<&UpgradeContext>) -> Self {
        match ctx {
            Some(ctx) => {
                let (current, next) = ctx.absolute(stat, magnitude);
                StatPreview::Absolute { stat, current, next }
            }
            None => StatPreview::Relative {
                stat,
                percent: magnitude,
            },
        }
    }
}

impl fmt::Display for StatPreview {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            StatPreview::Absolute { stat, current, next } => {
                let label = stat.label();
                match stat {
                    UpgradeStat::Damage | UpgradeStat::Area => {
                        write!(f, "{label}: {current:.1} → {next:.1}")
                    }
                    UpgradeStat::Cooldown => write!(f, "{label}: {current:.2}s → {next:.2}s"),
                    UpgradeStat::Knockback => write!(f, "{label}: x{current:.2} → x{next:.2}"),
                    UpgradeStat::Crit => write!(f, "{label}: {current:.0}% → {next:.0}%"),
                }
            }
            StatPreview::Relative { stat, percent } => {
                write!(f, "{} {:+.2}%", stat.label(), percent)
            }
        }
    }
}

/// A rolled upgrade offer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpgradeRoll {
    pub weapon_id: String,
    pub stat: UpgradeStat,
    pub base_magnitude: f32,
    pub final_magnitude: f32,
    pub rarity: Rarity,
    pub preview: StatPreview,
}

impl UpgradeRoll {
    /// Re-tier the roll, keeping its variance offset
    pub fn promote_to(&mut self, rarity: Rarity, ctx: Option<&UpgradeContext>) {
        let offset = self.final_magnitude - self.base_magnitude;
        let base = base_magnitude(rarity, self.stat);
        self.base_magnitude = base;
        self.final_magnitude = match self.stat {
            UpgradeStat::Crit => (base + offset).max(base),
            _ => base + offset,
        };
        self.rarity = rarity;
        self.preview = StatPreview::new(self.stat, self.final_magnitude, ctx);
    }
}

/// Roll an upgrade for an equipped weapon.
///
/// Draw order is stat, rarity, then variance.
pub fn roll_upgrade<R: Rng + ?Sized>(
    rng: &mut R,
    weapon_id: &str,
    luck: f32,
    ctx: Option<&UpgradeContext>,
) -> UpgradeRoll {
    let stat = UpgradeStat::ALL[rng.random_range(0..UpgradeStat::ALL.len())];
    let rarity = roll_rarity(rng, luck);
    let base = base_magnitude(rarity, stat);
    let roll = variance_roll(rng.random::<f32>(), luck);
    let magnitude = final_magnitude(stat, base, roll);

    UpgradeRoll {
        weapon_id: weapon_id.to_string(),
        stat,
        base_magnitude: base,
        final_magnitude: magnitude,
        rarity,
        preview: StatPreview::new(stat, magnitude, ctx),
    }
}
