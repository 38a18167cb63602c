//! Procedural reward engine
//!
//! Pure functions over the catalogs and equip state. The only side effect is
//! consuming the caller's RNG, so a seeded RNG gives reproducible offers.

pub mod choice;
pub mod planet;
pub mod pool;
pub mod rarity;
pub mod upgrade;

pub use choice::{ChoiceMagnitude, RewardChoice, RewardContext, generate_choices};
pub use planet::{PlanetTier, generate_planet_reward};
pub use pool::{EquippedBoon, PoolEntry, RewardKind, build_reward_pool};
pub use rarity::{Rarity, RarityTier, rarity_distribution, rarity_tier, roll_rarity};
pub use upgrade::{StatPreview, UpgradeContext, UpgradeRoll, UpgradeStat, roll_upgrade};
