//! Tactical-strike archetype
//!
//! On its own cooldown, picks a random target within detection range (avoiding
//! an immediate repeat), strikes it, and splashes nearby eligible targets.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::catalog::StrikeParams;
use super::tick::{Hit, HitProfile, Target};

/// Impact marker for the rendering collaborator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrikeVfx {
    pub x: f32,
    pub z: f32,
    pub timer: f32,
    pub max_duration: f32,
    pub splash_radius: f32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StrikeState {
    pub vfx: Vec<StrikeVfx>,
    pub cooldown: f32,
    pub last_target_id: Option<u32>,
}

impl StrikeState {
    pub fn new(_params: &StrikeParams) -> Self {
        Self::default()
    }
}

/// Anti-repeat pick: with more than one candidate, never choose `last` twice in a row
pub fn pick_strike_target(eligible_ids: &[u32], rolled: usize, last: Option<u32>) -> usize {
    let n = eligible_ids.len();
    if n == 0 {
        return 0;
    }
    let pick = rolled % n;
    if n > 1 && Some(eligible_ids[pick]) == last {
        (pick + 1) % n
    } else {
        pick
    }
}

#[allow(clippy::too_many_arguments)]
pub fn tick_strike<R: Rng + ?Sized>(
    state: &mut StrikeState,
    params: &StrikeParams,
    profile: &HitProfile,
    rng: &mut R,
    origin: Vec2,
    targets: &[Target],
    dt: f32,
    zone: f32,
    hits: &mut Vec<Hit>,
) {
    for i in (0..state.vfx.len()).rev() {
        state.vfx[i].timer -= dt;
        if state.vfx[i].timer <= 0.0 {
            state.vfx.remove(i);
        }
    }

    state.cooldown = (state.cooldown - dt).max(0.0);
    if state.cooldown > 0.0 {
        return;
    }
    state.cooldown = profile.cooldown;

    let detection_sq = params.detection_radius * params.detection_radius;
    let eligible: Vec<&Target> = targets
        .iter()
        .filter(|t| t.pos.distance_squared(origin) <= detection_sq)
        .collect();
    if eligible.is_empty() {
        return;
    }

    let ids: Vec<u32> = eligible.iter().map(|t| t.id).collect();
    let rolled = rng.random_range(0..ids.len());
    let chosen = eligible[pick_strike_target(&ids, rolled, state.last_target_id)];

    let (damage, is_crit) = profile.roll(rng);
    hits.push(profile.hit(
        chosen.id,
        damage,
        is_crit,
        (chosen.pos - origin).normalize_or_zero(),
    ));

    let splash_radius = params.strike_aoe_radius * zone;
    let splash_damage = profile.damage * params.splash_damage_ratio;
    for other in eligible.iter().filter(|t| t.id != chosen.id) {
        let offset = other.pos - chosen.pos;
        if offset.length_squared() <= splash_radius * splash_radius {
            hits.push(profile.hit(other.id, splash_damage, false, offset.normalize_or_zero()));
        }
    }

    if state.vfx.len() < params.pool_limit {
        state.vfx.push(StrikeVfx {
            x: chosen.pos.x,
            z: chosen.pos.y,
            timer: params.vfx_duration,
            max_duration: params.vfx_duration,
            splash_radius,
        });
    }
    state.last_target_id = Some(chosen.id);
    log::trace!("Strike on target {}", chosen.id);
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn params() -> StrikeParams {
        StrikeParams {
            detection_radius: 12.0,
            strike_aoe_radius: 2.5,
            splash_damage_ratio: 0.5,
            vfx_duration: 0.6,
            pool_limit: 2,
        }
    }

    fn profile() -> HitProfile {
        HitProfile {
            weapon_id: "ORBITAL_STRIKE".to_string(),
            damage: 30.0,
            knockback: 3.0,
            area: 1.0,
            crit_chance: 0.0,
            crit_multiplier: 2.0,
            cooldown: 2.2,
            cooldown_multiplier: 1.0,
        }
    }

    #[test]
    fn test_pick_avoids_repeat() {
        assert_eq!(pick_strike_target(&[4, 7, 9], 1, Some(7)), 2);
        assert_eq!(pick_strike_target(&[4, 7, 9], 2, Some(9)), 0);
        assert_eq!(pick_strike_target(&[4, 7, 9], 0, Some(7)), 0);
        // A lone candidate may repeat
        assert_eq!(pick_strike_target(&[7], 0, Some(7)), 0);
    }

    #[test]
    fn test_no_eligible_still_resets_cooldown() {
        let mut state = StrikeState::new(&params());
        let mut rng = Pcg32::seed_from_u64(1);
        let far = [Target { id: 1, pos: Vec2::new(20.0, 0.0) }];
        let mut hits = Vec::new();
        tick_strike(
            &mut state,
            &params(),
            &profile(),
            &mut rng,
            Vec2::ZERO,
            &far,
            0.1,
            1.0,
            &mut hits,
        );
        assert!(hits.is_empty());
        assert_eq!(state.cooldown, 2.2);
        assert!(state.vfx.is_empty());
        assert_eq!(state.last_target_id, None);
    }

    #[test]
    fn test_detection_radius_inclusive() {
        let mut state = StrikeState::new(&params());
        let mut rng = Pcg32::seed_from_u64(1);
        let edge = [Target { id: 3, pos: Vec2::new(0.0, 12.0) }];
        let mut hits = Vec::new();
        tick_strike(
            &mut state,
            &params(),
            &profile(),
            &mut rng,
            Vec2::ZERO,
            &edge,
            0.1,
            1.0,
            &mut hits,
        );
        assert_eq!(hits.len(), 1);
        assert_eq!(state.last_target_id, Some(3));
        assert_eq!(state.vfx[0].z, 12.0);
    }

    #[test]
    fn test_splash_hits_neighbors_without_crit() {
        let mut state = StrikeState::new(&params());
        let mut rng = Pcg32::seed_from_u64(1);
        let targets = [
            Target { id: 1, pos: Vec2::new(5.0, 0.0) },
            Target { id: 2, pos: Vec2::new(5.0, 1.0) },
        ];
        let mut hits = Vec::new();
        let crit_profile = HitProfile {
            crit_chance: 1.0,
            ..profile()
        };
        tick_strike(
            &mut state,
            &params(),
            &crit_profile,
            &mut rng,
            Vec2::ZERO,
            &targets,
            0.1,
            1.0,
            &mut hits,
        );
        assert_eq!(hits.len(), 2);
        assert!(hits[0].is_crit);
        assert_eq!(hits[0].damage, 60.0);
        assert!(!hits[1].is_crit);
        assert_eq!(hits[1].damage, 15.0);
    }

    #[test]
    fn test_zone_multiplier_shrinks_splash() {
        let mut state = StrikeState::new(&params());
        let mut rng = Pcg32::seed_from_u64(1);
        let targets = [
            Target { id: 1, pos: Vec2::new(5.0, 0.0) },
            Target { id: 2, pos: Vec2::new(5.0, 2.0) },
        ];
        let mut hits = Vec::new();
        tick_strike(
            &mut state,
            &params(),
            &profile(),
            &mut rng,
            Vec2::ZERO,
            &targets,
            0.1,
            0.5,
            &mut hits,
        );
        assert_eq!(hits.len(), 1);
    }

    #[test]
    fn test_consecutive_strikes_alternate_and_vfx_capped() {
        let mut state = StrikeState::new(&params());
        let mut rng = Pcg32::seed_from_u64(11);
        let targets = [
            Target { id: 1, pos: Vec2::new(6.0, 0.0) },
            Target { id: 2, pos: Vec2::new(-6.0, 0.0) },
        ];
        let mut previous = None;
        for _ in 0..5 {
            let mut hits = Vec::new();
            state.cooldown = 0.0;
            tick_strike(
                &mut state,
                &params(),
                &profile(),
                &mut rng,
                Vec2::ZERO,
                &targets,
                0.0,
                1.0,
                &mut hits,
            );
            assert_ne!(Some(hits[0].target_id), previous);
            previous = Some(hits[0].target_id);
        }
        assert_eq!(state.vfx.len(), 2);

        // VFX expire via the reverse scan
        let mut hits = Vec::new();
        tick_strike(
            &mut state,
            &params(),
            &profile(),
            &mut rng,
            Vec2::ZERO,
            &[],
            0.7,
            1.0,
            &mut hits,
        );
        assert!(state.vfx.is_empty());
    }
}
