//! Rarity tiers and the luck-biased rarity roll

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Reward rarity, ordered from most to least common
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Rarity {
    #[default]
    Common,
    Rare,
    Epic,
    Legendary,
}

impl Rarity {
    /// Tier order used by the cumulative walk
    pub const ALL: [Rarity; 4] = [Rarity::Common, Rarity::Rare, Rarity::Epic, Rarity::Legendary];

    pub fn id(self) -> &'static str {
        self.tier().id
    }

    pub fn from_id(id: &str) -> Option<Self> {
        RARITY_TIERS.iter().find(|t| t.id == id).map(|t| t.rarity)
    }

    pub fn tier(self) -> &'static RarityTier {
        &RARITY_TIERS[self as usize]
    }

    pub fn bonus_multiplier(self) -> f32 {
        self.tier().bonus_multiplier
    }
}

/// Static presentation and scaling data for a rarity
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RarityTier {
    pub rarity: Rarity,
    pub id: &'static str,
    pub name: &'static str,
    pub bonus_multiplier: f32,
    /// 0 (none) to 3 (strongest)
    pub glow_intensity: u8,
    /// 0xRRGGBB
    pub color: u32,
}

pub const RARITY_TIERS: [RarityTier; 4] = [
    RarityTier {
        rarity: Rarity::Common,
        id: "COMMON",
        name: "Common",
        bonus_multiplier: 1.0,
        glow_intensity: 0,
        color: 0x9ca3af,
    },
    RarityTier {
        rarity: Rarity::Rare,
        id: "RARE",
        name: "Rare",
        bonus_multiplier: 1.15,
        glow_intensity: 1,
        color: 0x3b82f6,
    },
    RarityTier {
        rarity: Rarity::Epic,
        id: "EPIC",
        name: "Epic",
        bonus_multiplier: 1.30,
        glow_intensity: 2,
        color: 0xa855f7,
    },
    RarityTier {
        rarity: Rarity::Legendary,
        id: "LEGENDARY",
        name: "Legendary",
        bonus_multiplier: 1.50,
        glow_intensity: 3,
        color: 0xf59e0b,
    },
];

/// Rarity odds at zero luck (COMMON, RARE, EPIC, LEGENDARY)
pub const BASE_RARITY_PROBABILITIES: [f32; 4] = [0.60, 0.25, 0.12, 0.03];

/// Distribution shift per point of luck
const LUCK_SHIFT_PER_POINT: f32 = 0.005;

/// Luck-shifted rarity odds, renormalized to sum to 1
pub fn rarity_distribution(luck: f32) -> [f32; 4] {
    let shift = luck * LUCK_SHIFT_PER_POINT;
    let [common, rare, epic, legendary] = BASE_RARITY_PROBABILITIES;
    let mut dist = [
        (common - 3.0 * shift).max(0.0),
        (rare + 1.5 * shift).max(0.0),
        (epic + 1.0 * shift).max(0.0),
        (legendary + 0.5 * shift).max(0.0),
    ];
    let total: f32 = dist.iter().sum();
    if total > 0.0 {
        for p in dist.iter_mut() {
            *p /= total;
        }
    } else {
        dist = BASE_RARITY_PROBABILITIES;
    }
    dist
}

/// Walk the cumulative distribution; drift past the end falls back to COMMON
pub fn rarity_from_draw(dist: &[f32; 4], draw: f32) -> Rarity {
    let mut cumulative = 0.0;
    for (rarity, p) in Rarity::ALL.iter().zip(dist) {
        cumulative += p;
        if draw < cumulative {
            return *rarity;
        }
    }
    Rarity::Common
}

pub fn roll_rarity<R: Rng + ?Sized>(rng: &mut R, luck: f32) -> Rarity {
    let dist = rarity_distribution(luck);
    rarity_from_draw(&dist, rng.random::<f32>())
}

/// Tier lookup by id; unknown or missing ids resolve to COMMON
pub fn rarity_tier(id: Option<&str>) -> &'static RarityTier {
    id.and_then(Rarity::from_id).unwrap_or_default().tier()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_base_distribution_at_zero_luck() {
        let dist = rarity_distribution(0.0);
        for (p, base) in dist.iter().zip(BASE_RARITY_PROBABILITIES) {
            assert!((p - base).abs() < 1e-6);
        }
    }

    #[test]
    fn test_empirical_rates_at_zero_luck() {
        let mut rng = Pcg32::seed_from_u64(42);
        let n = 10_000;
        let mut counts = [0usize; 4];
        for _ in 0..n {
            counts[roll_rarity(&mut rng, 0.0) as usize] += 1;
        }
        for (count, base) in counts.iter().zip(BASE_RARITY_PROBABILITIES) {
            let rate = *count as f32 / n as f32;
            assert!((rate - base).abs() < 0.02, "rate {} vs {}", rate, base);
        }
    }

    #[test]
    fn test_luck_shifts_empirical_rates() {
        let n = 10_000;
        let rates = |luck: f32| {
            let mut rng = Pcg32::seed_from_u64(7);
            let mut counts = [0usize; 4];
            for _ in 0..n {
                counts[roll_rarity(&mut rng, luck) as usize] += 1;
            }
            counts
        };
        let unlucky = rates(0.0);
        let lucky = rates(10.0);
        assert!(lucky[Rarity::Common as usize] < unlucky[Rarity::Common as usize]);
        assert!(lucky[Rarity::Legendary as usize] > unlucky[Rarity::Legendary as usize]);
    }

    #[test]
    fn test_extreme_luck_floors_common() {
        let dist = rarity_distribution(1000.0);
        assert_eq!(dist[0], 0.0);
        assert!((dist.iter().sum::<f32>() - 1.0).abs() < 1e-5);
        assert!(dist[1] > dist[2] && dist[2] > dist[3]);
    }

    #[test]
    fn test_draw_fallback_is_common() {
        let dist = [0.25, 0.25, 0.25, 0.2499];
        assert_eq!(rarity_from_draw(&dist, 0.99995), Rarity::Common);
        assert_eq!(rarity_from_draw(&dist, 0.0), Rarity::Common);
        assert_eq!(rarity_from_draw(&dist, 0.3), Rarity::Rare);
    }

    #[test]
    fn test_tier_lookup() {
        assert_eq!(rarity_tier(Some("EPIC")).bonus_multiplier, 1.30);
        assert_eq!(rarity_tier(Some("MYTHIC")).rarity, Rarity::Common);
        assert_eq!(rarity_tier(None).rarity, Rarity::Common);
        assert_eq!(Rarity::Legendary.id(), "LEGENDARY");
        assert_eq!(serde_json::to_string(&Rarity::Rare).unwrap(), "\"RARE\"");
    }

    proptest! {
        #[test]
        fn prop_distribution_sums_to_one(luck in 0.0f32..500.0) {
            let dist = rarity_distribution(luck);
            prop_assert!((dist.iter().sum::<f32>() - 1.0).abs() < 1e-5);
            prop_assert!(dist.iter().all(|p| *p >= 0.0));
        }

        #[test]
        fn prop_luck_shifts_away_from_common(a in 0.0f32..100.0, b in 0.0f32..100.0) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            let low = rarity_distribution(lo);
            let high = rarity_distribution(hi);
            prop_assert!(high[0] <= low[0] + 1e-6);
            prop_assert!(high[3] >= low[3] - 1e-6);
        }
    }
}
