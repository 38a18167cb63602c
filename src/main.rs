//! Arena Arsenal headless demo
//!
//! Loads settings, equips a loadout, runs a few seconds of simulation against
//! orbiting dummy targets, then prints a level-up offer as JSON.

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    native::run()
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The library is driven by the host game on the web; nothing to run here
}

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::collections::HashMap;
    use std::sync::Arc;

    use anyhow::Context;
    use glam::Vec2;

    use arena_arsenal::consts::SIM_DT;
    use arena_arsenal::rewards::{
        EquippedBoon, PlanetTier, RewardContext, generate_choices, generate_planet_reward,
    };
    use arena_arsenal::sim::{BoonCatalog, SimState, Target, TickInput, WeaponCatalog, tick};
    use arena_arsenal::{Settings, polar_to_cartesian};

    const DEMO_TICKS: u32 = 600;
    const LOADOUT: [&str; 4] = ["LASER_FRONT", "MINE_FIELD", "SHOCKWAVE", "ORBITAL_STRIKE"];

    pub fn run() -> anyhow::Result<()> {
        env_logger::init();
        log::info!("Arena Arsenal (headless) starting...");

        let settings_path = std::env::args().nth(1).unwrap_or_else(|| "settings.json".to_string());
        let settings = Settings::load(&settings_path);
        log::info!("Simulation seed: {:#x}", settings.seed);

        let mut state = SimState::new(settings, Arc::new(WeaponCatalog::builtin()));
        for id in LOADOUT {
            state
                .acquire_weapon(id, None)
                .with_context(|| format!("equipping {id}"))?;
        }

        let mut damage_by_weapon: HashMap<String, f32> = HashMap::new();
        let mut crits = 0usize;
        let mut spawned = 0usize;
        for frame in 0..DEMO_TICKS {
            let input = TickInput {
                origin: Vec2::ZERO,
                heading: frame as f32 * SIM_DT * 0.5,
                targets: dummy_targets(frame as f32 * SIM_DT),
                ..TickInput::default()
            };
            let report = tick(&mut state, &input, SIM_DT);
            spawned += report.spawned;
            for hit in report.hits {
                crits += usize::from(hit.is_crit);
                *damage_by_weapon.entry(hit.weapon_id).or_default() += hit.damage;
            }
        }

        log::info!(
            "Simulated {:.1}s: {} projectiles spawned, {} live, {} crits",
            state.elapsed,
            spawned,
            state.projectiles.len(),
            crits
        );
        let mut totals: Vec<_> = damage_by_weapon.into_iter().collect();
        totals.sort_by(|a, b| b.1.total_cmp(&a.1));
        for (weapon_id, damage) in &totals {
            log::info!("  {weapon_id}: {damage:.1} damage");
        }

        let boons = BoonCatalog::builtin();
        let equipped_boons = vec![EquippedBoon {
            id: "THRUSTERS".to_string(),
            level: 1,
        }];
        let banished: Vec<String> = Vec::new();
        let luck = 2.0;

        let mut rng = state.rng.clone();
        let (choices, planet) = {
            let ctx = RewardContext::from_state(&state, &boons, &equipped_boons, &banished);
            (
                generate_choices(&mut rng, 2, luck, &ctx),
                generate_planet_reward(&mut rng, PlanetTier::Legendary, luck, &ctx),
            )
        };
        state.rng = rng;

        for choice in &choices {
            log::info!("Offer: [{:?}] {}", choice.rarity, choice.display_text());
        }
        if let Some(first) = choices.first() {
            let applied = state.apply_choice(first).context("applying first offer")?;
            log::info!("Picked {} (weapon change: {})", first.id, applied);
        }

        let output = serde_json::json!({
            "level_up": choices,
            "legendary_planet": planet,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        Ok(())
    }

    /// A ring of targets slowly circling the player
    fn dummy_targets(t: f32) -> Vec<Target> {
        (0..8)
            .map(|i| {
                let radius = 3.0 + i as f32 * 1.2;
                let angle = t * 0.4 + i as f32 * std::f32::consts::TAU / 8.0;
                Target {
                    id: i,
                    pos: polar_to_cartesian(radius, angle),
                }
            })
            .collect()
    }
}
