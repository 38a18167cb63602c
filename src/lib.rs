//! Arena Arsenal - weapon simulation and reward engine for a top-down arena shooter
//!
//! Core modules:
//! - `sim`: Tick-driven weapon simulation (firing patterns, archetype state machines, pools)
//! - `rewards`: Rarity rolls, upgrade rolls, reward pools and choice selection
//! - `settings`: Data-driven tuning loaded from JSON
//! - `error`: Error types for the fallible edges (catalog loading, equip mutators)
//!
//! All positions live on the ground plane: `Vec2::x` is world X, `Vec2::y` is world Z.

pub mod error;
pub mod rewards;
pub mod settings;
pub mod sim;

pub use error::{SimError, SimResult};
pub use settings::Settings;

use glam::Vec2;

/// Simulation configuration constants
pub mod consts {
    /// Reference simulation timestep (60 Hz); callers may pass any delta
    pub const SIM_DT: f32 = 1.0 / 60.0;

    /// Weapon slots available to the player
    pub const MAX_WEAPON_SLOTS: usize = 4;
    /// Weapons cap out at this level
    pub const MAX_WEAPON_LEVEL: u32 = 9;

    /// Global projectile pool capacity
    pub const MAX_PROJECTILES: usize = 400;
    /// Effective cooldown multiplier never drops below this (prevents runaway fire rate)
    pub const MIN_COOLDOWN_MULTIPLIER: f32 = 0.15;

    /// Crit chance every weapon starts with (before crit upgrades)
    pub const BASE_CRIT_CHANCE: f32 = 0.05;
    /// Damage multiplier on a critical hit
    pub const CRIT_DAMAGE_MULTIPLIER: f32 = 2.0;

    /// Reward choices offered on a normal level-up
    pub const BASE_CHOICE_COUNT: usize = 3;
    /// Reward choices offered when the luck roll succeeds
    pub const BONUS_CHOICE_COUNT: usize = 4;
    /// Ceiling on the chance of a fourth choice
    pub const MAX_BONUS_CHOICE_CHANCE: f32 = 0.85;
}

/// Normalized angle to [-π, π)
#[inline]
pub fn normalize_angle(mut angle: f32) -> f32 {
    use std::f32::consts::PI;
    while angle >= PI {
        angle -= 2.0 * PI;
    }
    while angle < -PI {
        angle += 2.0 * PI;
    }
    angle
}

/// Convert polar (r, theta) to cartesian (x, z)
#[inline]
pub fn polar_to_cartesian(r: f32, theta: f32) -> Vec2 {
    Vec2::new(r * theta.cos(), r * theta.sin())
}

/// Convert cartesian (x, z) to polar (r, theta)
#[inline]
pub fn cartesian_to_polar(pos: Vec2) -> (f32, f32) {
    (pos.length(), pos.y.atan2(pos.x))
}

/// Unit direction for a heading angle (0 = +X, counter-clockwise)
#[inline]
pub fn heading_dir(heading: f32) -> Vec2 {
    polar_to_cartesian(1.0, heading)
}

/// Chance of a fourth reward choice for a given luck stat (0 at luck 0)
pub fn bonus_choice_chance(luck: f32) -> f32 {
    let luck = luck.max(0.0);
    if luck == 0.0 {
        return 0.0;
    }
    (luck / (luck + 8.0)).min(consts::MAX_BONUS_CHOICE_CHANCE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    #[test]
    fn test_normalize_angle_wraps() {
        // 3π lands on the ±π seam; either side is the same direction
        assert!((normalize_angle(3.0 * PI).abs() - PI).abs() < 1e-4);
        assert!((normalize_angle(2.5 * PI) - PI / 2.0).abs() < 1e-4);
        assert!((normalize_angle(-PI / 2.0) - (-PI / 2.0)).abs() < 1e-6);
        assert!((normalize_angle(2.0 * PI + 0.25) - 0.25).abs() < 1e-5);
    }

    #[test]
    fn test_heading_dir_is_unit() {
        for i in 0..16 {
            let dir = heading_dir(i as f32 * 0.4);
            assert!((dir.length() - 1.0).abs() < 1e-5);
        }
        assert!((heading_dir(0.0) - Vec2::X).length() < 1e-6);
    }

    #[test]
    fn test_bonus_choice_chance() {
        assert_eq!(bonus_choice_chance(0.0), 0.0);
        assert!((bonus_choice_chance(8.0) - 0.5).abs() < 1e-6);
        // Ceiling kicks in at high luck
        assert!((bonus_choice_chance(1000.0) - 0.85).abs() < 1e-6);
    }
}
