//! Planet reward tiers
//!
//! Planets are fixed-size offers built on the same reward pool as level-ups:
//! - standard: 2 choices biased to upgrades and boons, luck ignored
//! - rare: 3 choices from the full pool
//! - legendary: 3 or 4 choices, always something new, never all COMMON

use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use super::choice::{RewardChoice, RewardContext, annotate, pad_choices, target_choice_count};
use super::pool::{PoolEntry, RewardKind};
use super::rarity::Rarity;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanetTier {
    Standard,
    Rare,
    Legendary,
}

const STANDARD_CHOICES: usize = 2;
const RARE_CHOICES: usize = 3;

pub fn generate_planet_reward<R: Rng + ?Sized>(
    rng: &mut R,
    tier: PlanetTier,
    luck: f32,
    ctx: &RewardContext,
) -> Vec<RewardChoice> {
    let mut pool = ctx.pool();

    let choices = match tier {
        PlanetTier::Standard => {
            let biased: Vec<_> = pool
                .iter()
                .filter(|e| e.kind != RewardKind::NewWeapon)
                .cloned()
                .collect();
            if biased.len() >= STANDARD_CHOICES {
                pool = biased;
            }
            pool.shuffle(rng);
            let mut choices: Vec<RewardChoice> = pool
                .iter()
                .take(STANDARD_CHOICES)
                .map(|entry| annotate(rng, entry, 0.0, ctx))
                .collect();
            pad_choices(&mut choices, STANDARD_CHOICES);
            choices
        }
        PlanetTier::Rare => {
            pool.shuffle(rng);
            let mut choices: Vec<RewardChoice> = pool
                .iter()
                .take(RARE_CHOICES)
                .map(|entry| annotate(rng, entry, luck, ctx))
                .collect();
            pad_choices(&mut choices, RARE_CHOICES);
            choices
        }
        PlanetTier::Legendary => legendary(rng, pool, luck, ctx),
    };

    log::debug!("{:?} planet reward: {} choices", tier, choices.len());
    choices
}

fn legendary<R: Rng + ?Sized>(
    rng: &mut R,
    mut pool: Vec<PoolEntry>,
    luck: f32,
    ctx: &RewardContext,
) -> Vec<RewardChoice> {
    // Unclamped: a short pool is padded instead
    let target = target_choice_count(rng, luck, usize::MAX);
    pool.shuffle(rng);

    let take = target.min(pool.len());
    let has_new = pool[..take].iter().any(|e| e.kind.is_new());
    if !has_new {
        if let Some(offset) = pool[take..].iter().position(|e| e.kind.is_new()) {
            let entry = pool.remove(take + offset);
            pool.insert(0, entry);
        }
    }

    let mut choices: Vec<RewardChoice> = pool
        .iter()
        .take(take)
        .map(|entry| annotate(rng, entry, luck, ctx))
        .collect();

    let all_common = !choices.is_empty()
        && choices
            .iter()
            .all(|c| c.rarity.is_none_or(|r| r == Rarity::Common));
    if all_common {
        let upgrade_ctx = ctx.upgrade_context(&choices[0].id);
        choices[0].promote(Rarity::Rare, upgrade_ctx.as_ref());
    }

    pad_choices(&mut choices, target);
    choices
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rewards::pool::EquippedBoon;
    use crate::settings::Settings;
    use crate::sim::catalog::{BoonCatalog, WeaponCatalog};
    use crate::sim::state::ActiveWeapon;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    struct Run {
        weapons: WeaponCatalog,
        boons: BoonCatalog,
        equipped: Vec<ActiveWeapon>,
        equipped_boons: Vec<EquippedBoon>,
        settings: Settings,
    }

    impl Run {
        fn new(equipped: &[&str]) -> Self {
            Self {
                weapons: WeaponCatalog::builtin(),
                boons: BoonCatalog::builtin(),
                equipped: equipped.iter().map(|id| ActiveWeapon::new(*id)).collect(),
                equipped_boons: Vec::new(),
                settings: Settings::default(),
            }
        }

        fn ctx(&self) -> RewardContext<'_> {
            RewardContext {
                weapons: &self.weapons,
                boons: &self.boons,
                equipped_weapons: &self.equipped,
                equipped_boons: &self.equipped_boons,
                banished: &[],
                settings: &self.settings,
                global_damage: 1.0,
                global_cooldown: 1.0,
            }
        }
    }

    #[test]
    fn test_standard_prefers_upgrades_and_boons() {
        let run = Run::new(&["LASER_FRONT"]);
        for seed in 0..30 {
            let mut rng = Pcg32::seed_from_u64(seed);
            let choices = generate_planet_reward(&mut rng, PlanetTier::Standard, 50.0, &run.ctx());
            assert_eq!(choices.len(), 2);
            assert!(choices.iter().all(|c| c.kind != RewardKind::NewWeapon));
        }
    }

    #[test]
    fn test_standard_falls_back_to_full_pool() {
        let mut run = Run::new(&[]);
        run.boons = BoonCatalog::default();
        let mut rng = Pcg32::seed_from_u64(2);
        let choices = generate_planet_reward(&mut rng, PlanetTier::Standard, 0.0, &run.ctx());
        assert_eq!(choices.len(), 2);
        assert!(choices.iter().all(|c| c.kind == RewardKind::NewWeapon));
    }

    #[test]
    fn test_legendary_promotes_something_new() {
        // Plenty of upgrades and boon upgrades, exactly one new option
        let mut run = Run::new(&["LASER_FRONT", "SPREAD_SHOT", "RAILGUN"]);
        run.weapons.weapons.retain(|w| {
            ["LASER_FRONT", "SPREAD_SHOT", "RAILGUN"].contains(&w.id.as_str())
        });
        run.equipped_boons = run
            .boons
            .iter()
            .map(|b| EquippedBoon {
                id: b.id.clone(),
                level: 1,
            })
            .collect();
        run.boons.boons.push(crate::sim::catalog::BoonDefinition {
            id: "SHIELD".to_string(),
            name: "Shield".to_string(),
            description: "Shield +{value}".to_string(),
            per_level: 10.0,
            unit: crate::sim::catalog::MagnitudeUnit::Flat,
            max_level: 3,
        });

        for seed in 0..40 {
            let mut rng = Pcg32::seed_from_u64(seed);
            let choices = generate_planet_reward(&mut rng, PlanetTier::Legendary, 0.0, &run.ctx());
            assert!((3..=4).contains(&choices.len()));
            assert!(choices.iter().any(|c| c.kind.is_new()), "seed {seed}");
        }
    }

    #[test]
    fn test_empty_pool_pads() {
        let mut run = Run::new(&[]);
        run.weapons = WeaponCatalog::default();
        run.boons = BoonCatalog::default();
        let mut rng = Pcg32::seed_from_u64(2);
        let rare = generate_planet_reward(&mut rng, PlanetTier::Rare, 0.0, &run.ctx());
        assert_eq!(rare.len(), 3);
        assert!(rare.iter().all(|c| c.kind == RewardKind::StatBoost));
    }

    proptest! {
        #[test]
        fn prop_tier_sizes(seed in any::<u64>(), luck in 0.0f32..20.0) {
            let run = Run::new(&["LASER_FRONT", "MINE_FIELD"]);
            let ctx = run.ctx();
            let mut rng = Pcg32::seed_from_u64(seed);
            prop_assert_eq!(
                generate_planet_reward(&mut rng, PlanetTier::Standard, luck, &ctx).len(),
                2
            );
            prop_assert_eq!(
                generate_planet_reward(&mut rng, PlanetTier::Rare, luck, &ctx).len(),
                3
            );
            let legendary = generate_planet_reward(&mut rng, PlanetTier::Legendary, luck, &ctx);
            prop_assert!((3..=4).contains(&legendary.len()));
            prop_assert!(legendary.iter().any(|c| c.rarity.is_some_and(|r| r != Rarity::Common)));
        }
    }
}
