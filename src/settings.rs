//! Simulation tuning
//!
//! Loaded from a JSON file at startup; any key missing from the file falls back to
//! the compile-time default in [`crate::consts`].

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::{SimError, SimResult};

/// Runtime-tunable simulation settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Run seed for reproducibility
    pub seed: u64,

    // === Pools ===
    /// Global projectile pool capacity
    pub max_projectiles: usize,

    // === Equip limits ===
    /// Weapon slots available to the player
    pub max_weapon_slots: usize,
    /// Weapon level cap
    pub max_weapon_level: u32,

    // === Combat ===
    /// Floor on the effective cooldown multiplier
    pub min_cooldown_multiplier: f32,
    /// Crit chance before crit upgrades
    pub base_crit_chance: f32,
    /// Damage multiplier on a critical hit
    pub crit_damage_multiplier: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            seed: 0x5eed,

            max_projectiles: MAX_PROJECTILES,

            max_weapon_slots: MAX_WEAPON_SLOTS,
            max_weapon_level: MAX_WEAPON_LEVEL,

            min_cooldown_multiplier: MIN_COOLDOWN_MULTIPLIER,
            base_crit_chance: BASE_CRIT_CHANCE,
            crit_damage_multiplier: CRIT_DAMAGE_MULTIPLIER,
        }
    }
}

impl Settings {
    /// Parse settings from a JSON string
    pub fn from_json(json: &str) -> SimResult<Self> {
        let settings: Settings = serde_json::from_str(json).map_err(|source| SimError::Parse {
            what: "settings",
            source,
        })?;
        Ok(settings.sanitized())
    }

    /// Read settings from a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> SimResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| SimError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// Load settings from a file, falling back to defaults on any error
    pub fn load(path: impl AsRef<Path>) -> Self {
        match Self::from_file(path.as_ref()) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.as_ref().display());
                settings
            }
            Err(e) => {
                log::warn!("{e}; using default settings");
                Self::default()
            }
        }
    }

    /// Clamp values that would break pool or slot invariants
    fn sanitized(mut self) -> Self {
        self.max_weapon_slots = self.max_weapon_slots.clamp(1, MAX_WEAPON_SLOTS);
        self.max_weapon_level = self.max_weapon_level.clamp(1, MAX_WEAPON_LEVEL);
        self.min_cooldown_multiplier = self.min_cooldown_multiplier.max(MIN_COOLDOWN_MULTIPLIER);
        self.base_crit_chance = self.base_crit_chance.clamp(0.0, 1.0);
        self.crit_damage_multiplier = self.crit_damage_multiplier.max(1.0);
        self
    }

    /// Crit chance for a weapon with the given accumulated crit bonus
    pub fn crit_chance(&self, crit_bonus: f32) -> f32 {
        (self.base_crit_chance + crit_bonus).clamp(0.0, 1.0)
    }

    /// Effective cooldown multiplier with the runaway-fire-rate floor applied
    pub fn effective_cooldown_multiplier(&self, instance: f32, external: f32) -> f32 {
        (instance * external).max(self.min_cooldown_multiplier)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_uses_defaults() {
        let settings = Settings::from_json(r#"{ "seed": 42, "max_projectiles": 16 }"#).unwrap();
        assert_eq!(settings.seed, 42);
        assert_eq!(settings.max_projectiles, 16);
        assert_eq!(settings.max_weapon_slots, MAX_WEAPON_SLOTS);
        assert_eq!(settings.max_weapon_level, MAX_WEAPON_LEVEL);
    }

    #[test]
    fn test_invalid_json_is_error() {
        assert!(matches!(
            Settings::from_json("{ seed: nope"),
            Err(SimError::Parse { .. })
        ));
    }

    #[test]
    fn test_missing_file_falls_back() {
        let settings = Settings::load("/definitely/not/here/settings.json");
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_cooldown_floor_cannot_be_lowered() {
        let settings = Settings::from_json(r#"{ "min_cooldown_multiplier": 0.01 }"#).unwrap();
        assert_eq!(settings.min_cooldown_multiplier, MIN_COOLDOWN_MULTIPLIER);
        assert!((settings.effective_cooldown_multiplier(0.1, 0.5) - 0.15).abs() < 1e-6);
        assert!((settings.effective_cooldown_multiplier(0.8, 0.5) - 0.4).abs() < 1e-6);
    }
}
