//! Level-up choice selection
//!
//! Draws 3 (sometimes 4) duplicate-free offers from the reward pool, balancing
//! upgrades against new weapons, then annotates each with a rarity. Values stay
//! structured; display text is only produced by [`RewardChoice::display_text`].

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::pool::{EquippedBoon, PoolEntry, RewardKind, build_reward_pool};
use super::rarity::{Rarity, roll_rarity};
use super::upgrade::{UpgradeContext, UpgradeRoll, roll_upgrade};
use crate::bonus_choice_chance;
use crate::consts::{BASE_CHOICE_COUNT, BONUS_CHOICE_COUNT};
use crate::settings::Settings;
use crate::sim::catalog::{BoonCatalog, MagnitudeUnit, WeaponCatalog};
use crate::sim::state::{ActiveWeapon, SimState};

/// Everything reward generation reads about the current run
#[derive(Debug, Clone, Copy)]
pub struct RewardContext<'a> {
    pub weapons: &'a WeaponCatalog,
    pub boons: &'a BoonCatalog,
    pub equipped_weapons: &'a [ActiveWeapon],
    pub equipped_boons: &'a [EquippedBoon],
    pub banished: &'a [String],
    pub settings: &'a Settings,
    /// Run-wide multipliers shown in upgrade previews
    pub global_damage: f32,
    pub global_cooldown: f32,
}

impl<'a> RewardContext<'a> {
    pub fn from_state(
        state: &'a SimState,
        boons: &'a BoonCatalog,
        equipped_boons: &'a [EquippedBoon],
        banished: &'a [String],
    ) -> Self {
        Self {
            weapons: &state.catalog,
            boons,
            equipped_weapons: &state.weapons,
            equipped_boons,
            banished,
            settings: &state.settings,
            global_damage: 1.0,
            global_cooldown: 1.0,
        }
    }

    pub fn has_free_slot(&self) -> bool {
        self.equipped_weapons.len() < self.settings.max_weapon_slots
    }

    /// The reward pool, without new weapons when every slot is taken
    pub fn pool(&self) -> Vec<PoolEntry> {
        let mut pool = build_reward_pool(
            self.weapons,
            self.boons,
            self.equipped_weapons,
            self.equipped_boons,
            self.banished,
            self.settings.max_weapon_level,
        );
        if !self.has_free_slot() {
            pool.retain(|e| e.kind != RewardKind::NewWeapon);
        }
        pool
    }

    /// Preview context for an equipped weapon
    pub fn upgrade_context(&self, weapon_id: &str) -> Option<UpgradeContext<'a>> {
        let weapon = self.equipped_weapons.iter().find(|w| w.weapon_id == weapon_id)?;
        let def = self.weapons.get(weapon_id)?;
        Some(UpgradeContext {
            def,
            multipliers: weapon.multipliers,
            overrides: weapon.overrides,
            global_damage: self.global_damage,
            global_cooldown: self.global_cooldown,
            min_cooldown_multiplier: self.settings.min_cooldown_multiplier,
            base_crit_chance: self.settings.base_crit_chance,
        })
    }
}

/// Structured number behind a choice's description
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChoiceMagnitude {
    /// Current value for upgrades
    pub from: Option<f32>,
    /// Offered value before the rarity multiplier
    pub to: f32,
    pub unit: MagnitudeUnit,
}

/// One offer on the level-up screen
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RewardChoice {
    pub kind: RewardKind,
    pub id: String,
    pub name: String,
    /// Template; `{value}` is filled in by `display_text`
    pub description: String,
    /// None for new acquisitions and fillers
    pub level: Option<u32>,
    pub rarity: Option<Rarity>,
    pub upgrade: Option<UpgradeRoll>,
    pub magnitude: Option<ChoiceMagnitude>,
}

impl RewardChoice {
    /// Inert padding entry
    pub fn filler(index: usize) -> Self {
        Self {
            kind: RewardKind::StatBoost,
            id: format!("stat_boost_{index}"),
            name: "Salvage".to_string(),
            description: "Nothing left to improve".to_string(),
            level: None,
            rarity: None,
            upgrade: None,
            magnitude: None,
        }
    }

    pub fn rarity_multiplier(&self) -> f32 {
        self.rarity.map_or(1.0, Rarity::bonus_multiplier)
    }

    /// Offered value with the rarity multiplier applied
    pub fn scaled_value(&self) -> Option<f32> {
        self.magnitude.map(|m| m.to * self.rarity_multiplier())
    }

    /// Presentation text; only the offered value is rarity-scaled
    pub fn display_text(&self) -> String {
        if let Some(roll) = &self.upgrade {
            return roll.preview.to_string();
        }
        let Some(magnitude) = self.magnitude else {
            return self.description.clone();
        };
        let to = format_value(magnitude.to * self.rarity_multiplier(), magnitude.unit);
        let value = match magnitude.from {
            Some(from) => format!("{} → {}", format_value(from, magnitude.unit), to),
            None => to,
        };
        self.description.replace("{value}", &value)
    }

    /// Re-tier the choice (upgrade rolls keep their variance)
    pub fn promote(&mut self, rarity: Rarity, ctx: Option<&UpgradeContext>) {
        self.rarity = Some(rarity);
        if let Some(roll) = &mut self.upgrade {
            roll.promote_to(rarity, ctx);
        }
    }
}

fn format_value(value: f32, unit: MagnitudeUnit) -> String {
    let text = format!("{value:.1}");
    let number = text.strip_suffix(".0").unwrap_or(&text);
    match unit {
        MagnitudeUnit::Percent => format!("{number}%"),
        MagnitudeUnit::Flat => number.to_string(),
        MagnitudeUnit::Seconds => format!("{number}s"),
    }
}

/// 3, or 4 with the luck-driven bonus chance, never above `max(3, pool_size)`
pub fn target_choice_count<R: Rng + ?Sized>(rng: &mut R, luck: f32, pool_size: usize) -> usize {
    let target = if rng.random::<f32>() < bonus_choice_chance(luck) {
        BONUS_CHOICE_COUNT
    } else {
        BASE_CHOICE_COUNT
    };
    target.min(BASE_CHOICE_COUNT.max(pool_size))
}

/// Chance that a slot draws from the upgrade-like subset
pub fn upgrade_probability(level: u32, luck: f32, has_free_slot: bool) -> f32 {
    if !has_free_slot {
        return 1.0;
    }
    let x = if level % 2 == 0 { 2.0 } else { 1.0 };
    (0.5 + 0.1 * x - luck * 0.04).max(0.10)
}

pub(crate) fn draw_uniform<R: Rng + ?Sized>(
    rng: &mut R,
    entries: &mut Vec<PoolEntry>,
) -> Option<PoolEntry> {
    if entries.is_empty() {
        return None;
    }
    let index = rng.random_range(0..entries.len());
    Some(entries.remove(index))
}

/// Cumulative walk over `rarity_weight`; uniform when every weight is zero
pub(crate) fn draw_weighted<R: Rng + ?Sized>(
    rng: &mut R,
    entries: &mut Vec<PoolEntry>,
    weapons: &WeaponCatalog,
) -> Option<PoolEntry> {
    if entries.is_empty() {
        return None;
    }
    let weights: Vec<f32> = entries
        .iter()
        .map(|e| weapons.get(&e.id).map_or(0.0, |d| d.rarity_weight.max(0.0)))
        .collect();
    let total: f32 = weights.iter().sum();
    if total <= 0.0 {
        return draw_uniform(rng, entries);
    }
    let index = weighted_index(&weights, rng.random::<f32>() * total);
    Some(entries.remove(index))
}

/// Index whose cumulative weight band contains `point`
fn weighted_index(weights: &[f32], point: f32) -> usize {
    let mut remaining = point;
    for (i, weight) in weights.iter().enumerate() {
        remaining -= weight;
        if remaining < 0.0 {
            return i;
        }
    }
    // Rounding left `point` past the last band: never land on a zero weight
    weights.iter().rposition(|w| *w > 0.0).unwrap_or(0)
}

/// Attach rarity and structured values to a pool entry
pub(crate) fn annotate<R: Rng + ?Sized>(
    rng: &mut R,
    entry: &PoolEntry,
    luck: f32,
    ctx: &RewardContext,
) -> RewardChoice {
    let mut choice = RewardChoice {
        kind: entry.kind,
        id: entry.id.clone(),
        name: entry.id.clone(),
        description: String::new(),
        level: entry.level,
        rarity: None,
        upgrade: None,
        magnitude: None,
    };

    match entry.kind {
        RewardKind::WeaponUpgrade => {
            // The upgrade roll carries its own rarity draw
            let upgrade_ctx = ctx.upgrade_context(&entry.id);
            let roll = roll_upgrade(rng, &entry.id, luck, upgrade_ctx.as_ref());
            if let Some(def) = ctx.weapons.get(&entry.id) {
                choice.name = def.name.clone();
                choice.description = def.description.clone();
            }
            choice.rarity = Some(roll.rarity);
            choice.upgrade = Some(roll);
        }
        RewardKind::NewWeapon => {
            if let Some(def) = ctx.weapons.get(&entry.id) {
                choice.name = def.name.clone();
                choice.description = format!("{} ({{value}} damage)", def.description);
                choice.magnitude = Some(ChoiceMagnitude {
                    from: None,
                    to: def.base_damage,
                    unit: MagnitudeUnit::Flat,
                });
            }
            choice.rarity = Some(roll_rarity(rng, luck));
        }
        RewardKind::NewBoon | RewardKind::BoonUpgrade => {
            if let Some(def) = ctx.boons.get(&entry.id) {
                choice.name = def.name.clone();
                choice.description = def.description.clone();
                let level = entry.level.unwrap_or(0);
                choice.magnitude = Some(ChoiceMagnitude {
                    from: entry.level.map(|l| def.magnitude_at(l)),
                    to: def.magnitude_at(level + 1),
                    unit: def.unit,
                });
            }
            choice.rarity = Some(roll_rarity(rng, luck));
        }
        RewardKind::StatBoost => {}
    }
    choice
}

/// Pad with fillers up to `count`
pub(crate) fn pad_choices(choices: &mut Vec<RewardChoice>, count: usize) {
    let mut index = 0;
    while choices.len() < count {
        choices.push(RewardChoice::filler(index));
        index += 1;
    }
}

/// Build the level-up offer for reaching `level`
pub fn generate_choices<R: Rng + ?Sized>(
    rng: &mut R,
    level: u32,
    luck: f32,
    ctx: &RewardContext,
) -> Vec<RewardChoice> {
    let pool = ctx.pool();
    let target = target_choice_count(rng, luck, pool.len());
    let (mut upgrades, mut new_weapons): (Vec<PoolEntry>, Vec<PoolEntry>) = pool
        .into_iter()
        .partition(|e| e.kind != RewardKind::NewWeapon);
    let p_upgrade = upgrade_probability(level, luck, ctx.has_free_slot());

    let mut picked = Vec::with_capacity(target);
    while picked.len() < target {
        let entry = if rng.random::<f32>() < p_upgrade {
            draw_uniform(rng, &mut upgrades)
                .or_else(|| draw_weighted(rng, &mut new_weapons, ctx.weapons))
        } else {
            draw_weighted(rng, &mut new_weapons, ctx.weapons)
                .or_else(|| draw_uniform(rng, &mut upgrades))
        };
        match entry {
            Some(entry) => picked.push(entry),
            None => break,
        }
    }

    let mut choices: Vec<RewardChoice> = picked
        .iter()
        .map(|entry| annotate(rng, entry, luck, ctx))
        .collect();
    pad_choices(&mut choices, BASE_CHOICE_COUNT);

    log::debug!(
        "Level {} offer: {:?}",
        level,
        choices.iter().map(|c| c.id.as_str()).collect::<Vec<_>>()
    );
    choices
}
