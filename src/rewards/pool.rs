//! Reward pool construction
//!
//! Deterministic set construction: no randomness, stable catalog order.

use serde::{Deserialize, Serialize};

use crate::sim::catalog::{BoonCatalog, WeaponCatalog};
use crate::sim::state::ActiveWeapon;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RewardKind {
    WeaponUpgrade,
    NewWeapon,
    NewBoon,
    BoonUpgrade,
    StatBoost,
}

impl RewardKind {
    /// New acquisitions carry no level
    pub fn is_new(self) -> bool {
        matches!(self, RewardKind::NewWeapon | RewardKind::NewBoon)
    }
}

/// A boon the player holds
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EquippedBoon {
    pub id: String,
    pub level: u32,
}

/// A candidate reward before selection
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PoolEntry {
    pub kind: RewardKind,
    pub id: String,
    /// Current level for upgrades
    pub level: Option<u32>,
}

impl PoolEntry {
    fn new(kind: RewardKind, id: &str, level: Option<u32>) -> Self {
        Self {
            kind,
            id: id.to_string(),
            level,
        }
    }
}

/// Every reward the player could be offered right now.
///
/// Equipped ids missing from the catalogs are skipped.
pub fn build_reward_pool(
    weapons: &WeaponCatalog,
    boons: &BoonCatalog,
    equipped_weapons: &[ActiveWeapon],
    equipped_boons: &[EquippedBoon],
    banished: &[String],
    max_weapon_level: u32,
) -> Vec<PoolEntry> {
    let is_banished = |id: &str| banished.iter().any(|b| b == id);
    let mut pool = Vec::new();

    for weapon in equipped_weapons {
        if weapons.get(&weapon.weapon_id).is_some() && weapon.level < max_weapon_level {
            pool.push(PoolEntry::new(
                RewardKind::WeaponUpgrade,
                &weapon.weapon_id,
                Some(weapon.level),
            ));
        }
    }

    for def in weapons.iter() {
        let equipped = equipped_weapons.iter().any(|w| w.weapon_id == def.id);
        if !equipped && !is_banished(&def.id) && def.rarity_weight > 0.0 {
            pool.push(PoolEntry::new(RewardKind::NewWeapon, &def.id, None));
        }
    }

    for def in boons.iter() {
        let equipped = equipped_boons.iter().any(|b| b.id == def.id);
        if !equipped && !is_banished(&def.id) {
            pool.push(PoolEntry::new(RewardKind::NewBoon, &def.id, None));
        }
    }

    for boon in equipped_boons {
        if let Some(def) = boons.get(&boon.id) {
            if boon.level < def.max_level {
                pool.push(PoolEntry::new(RewardKind::BoonUpgrade, &boon.id, Some(boon.level)));
            }
        }
    }

    pool
}

#[cfg(test)]
mod tests {
    use super::*;

    fn weapon(id: &str, level: u32) -> ActiveWeapon {
        ActiveWeapon {
            level,
            ..ActiveWeapon::new(id)
        }
    }

    fn count(pool: &[PoolEntry], kind: RewardKind) -> usize {
        pool.iter().filter(|e| e.kind == kind).count()
    }

    #[test]
    fn test_fresh_run_pool() {
        let weapons = WeaponCatalog::builtin();
        let boons = BoonCatalog::builtin();
        let pool = build_reward_pool(&weapons, &boons, &[weapon("LASER_FRONT", 1)], &[], &[], 9);

        assert_eq!(count(&pool, RewardKind::WeaponUpgrade), 1);
        assert_eq!(count(&pool, RewardKind::NewWeapon), 12);
        assert_eq!(count(&pool, RewardKind::NewBoon), 6);
        assert_eq!(count(&pool, RewardKind::BoonUpgrade), 0);
        assert!(!pool.iter().any(|e| e.kind == RewardKind::NewWeapon && e.id == "LASER_FRONT"));
    }

    #[test]
    fn test_caps_banish_and_stale_ids() {
        let weapons = WeaponCatalog::builtin();
        let boons = BoonCatalog::builtin();
        let equipped = [weapon("LASER_FRONT", 9), weapon("GONE", 1)];
        let equipped_boons = [
            EquippedBoon {
                id: "LUCKY_CHARM".to_string(),
                level: 3,
            },
            EquippedBoon {
                id: "THRUSTERS".to_string(),
                level: 2,
            },
            EquippedBoon {
                id: "MISSING".to_string(),
                level: 1,
            },
        ];
        let banished = vec!["RAILGUN".to_string(), "MAGNET".to_string()];
        let pool = build_reward_pool(&weapons, &boons, &equipped, &equipped_boons, &banished, 9);

        assert_eq!(count(&pool, RewardKind::WeaponUpgrade), 0);
        assert_eq!(count(&pool, RewardKind::NewWeapon), 11);
        assert_eq!(count(&pool, RewardKind::NewBoon), 3);
        assert_eq!(
            pool.iter()
                .filter(|e| e.kind == RewardKind::BoonUpgrade)
                .map(|e| e.id.as_str())
                .collect::<Vec<_>>(),
            vec!["THRUSTERS"]
        );
    }

    #[test]
    fn test_zero_weight_weapons_are_never_offered() {
        let mut weapons = WeaponCatalog::builtin();
        for def in weapons.weapons.iter_mut() {
            if def.id != "MINE_FIELD" {
                def.rarity_weight = 0.0;
            }
        }
        let pool = build_reward_pool(&weapons, &BoonCatalog::default(), &[], &[], &[], 9);
        assert_eq!(pool, vec![PoolEntry::new(RewardKind::NewWeapon, "MINE_FIELD", None)]);
    }
}
