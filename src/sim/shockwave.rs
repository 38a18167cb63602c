//! Shockwave archetype
//!
//! Each burst queues `wave_count` staggered arcs aimed at the nearest target.
//! Active arcs grow outward as sectors and damage each target at most once.

use std::collections::HashSet;

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::arc::Sector;
use super::catalog::ShockwaveParams;
use super::tick::{Hit, HitProfile, Target};
use crate::cartesian_to_polar;

/// An arc waiting for its stagger delay
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PendingArc {
    pub remaining_delay: f32,
    pub aim_angle: f32,
    pub damage: f32,
    pub is_crit: bool,
    pub effective_max_radius: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShockArc {
    pub center: Vec2,
    pub aim_angle: f32,
    pub sector_angle: f32,
    pub current_radius: f32,
    pub max_radius: f32,
    pub expand_speed: f32,
    pub damage: f32,
    pub is_crit: bool,
    /// Targets already damaged by this arc
    pub hit_targets: HashSet<u32>,
    pub active: bool,
}

impl ShockArc {
    pub fn sector(&self) -> Sector {
        Sector::around(self.center, self.current_radius, self.aim_angle, self.sector_angle)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ShockwaveState {
    pub pending: Vec<PendingArc>,
    pub arcs: Vec<ShockArc>,
    /// Seconds until the next burst
    pub burst_timer: f32,
}

impl ShockwaveState {
    pub fn new(_params: &ShockwaveParams) -> Self {
        Self::default()
    }

    pub fn active_count(&self) -> usize {
        self.arcs.iter().filter(|a| a.active).count()
    }

    /// Add an arc, evicting the oldest active one when at `limit`
    pub fn push_arc(&mut self, arc: ShockArc, limit: usize) {
        if limit > 0 && self.active_count() >= limit {
            if let Some(oldest) = self.arcs.iter_mut().find(|a| a.active) {
                oldest.active = false;
            }
        }
        self.arcs.push(arc);
    }

    /// Queue a burst of staggered arcs
    pub fn queue_burst<R: Rng + ?Sized>(
        &mut self,
        params: &ShockwaveParams,
        profile: &HitProfile,
        rng: &mut R,
        aim_angle: f32,
    ) {
        for i in 0..params.wave_count {
            let (damage, is_crit) = profile.roll(rng);
            self.pending.push(PendingArc {
                remaining_delay: params.wave_delay * i as f32,
                aim_angle,
                damage,
                is_crit,
                effective_max_radius: params.max_radius * profile.area,
            });
        }
    }
}

/// Aim at the nearest target, else straight ahead
fn aim_angle(origin: Vec2, heading: f32, targets: &[Target]) -> f32 {
    targets
        .iter()
        .filter(|t| t.pos != origin)
        .min_by(|a, b| {
            a.pos
                .distance_squared(origin)
                .total_cmp(&b.pos.distance_squared(origin))
        })
        .map(|t| cartesian_to_polar(t.pos - origin).1)
        .unwrap_or(heading)
}

#[allow(clippy::too_many_arguments)]
pub fn tick_shockwave<R: Rng + ?Sized>(
    state: &mut ShockwaveState,
    params: &ShockwaveParams,
    profile: &HitProfile,
    rng: &mut R,
    origin: Vec2,
    heading: f32,
    targets: &[Target],
    dt: f32,
    hits: &mut Vec<Hit>,
) {
    state.arcs.retain(|a| a.active);

    state.burst_timer = (state.burst_timer - dt).max(0.0);
    if state.burst_timer <= 0.0 {
        let aim = aim_angle(origin, heading, targets);
        state.queue_burst(params, profile, rng, aim);
        state.burst_timer = profile.cooldown;
    }

    // Promote due arcs
    let mut due = Vec::new();
    state.pending.retain_mut(|p| {
        p.remaining_delay -= dt;
        if p.remaining_delay <= 0.0 {
            due.push(p.clone());
            false
        } else {
            true
        }
    });
    for p in due {
        state.push_arc(
            ShockArc {
                center: origin,
                aim_angle: p.aim_angle,
                sector_angle: params.sector_angle,
                current_radius: 0.0,
                max_radius: p.effective_max_radius,
                expand_speed: params.expand_speed,
                damage: p.damage,
                is_crit: p.is_crit,
                hit_targets: HashSet::new(),
                active: true,
            },
            params.pool_limit,
        );
    }

    for arc in state.arcs.iter_mut().filter(|a| a.active) {
        arc.current_radius = (arc.current_radius + arc.expand_speed * dt).min(arc.max_radius);
        let sector = arc.sector();
        for target in targets {
            if arc.hit_targets.contains(&target.id) || !sector.contains_point(target.pos) {
                continue;
            }
            arc.hit_targets.insert(target.id);
            let direction = (target.pos - arc.center).normalize_or_zero();
            hits.push(profile.hit(target.id, arc.damage, arc.is_crit, direction));
        }
        if arc.current_radius >= arc.max_radius {
            arc.active = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;
    use std::f32::consts::FRAC_PI_2;

    fn params() -> ShockwaveParams {
        ShockwaveParams {
            wave_count: 3,
            wave_delay: 0.2,
            max_radius: 8.0,
            expand_speed: 12.0,
            sector_angle: FRAC_PI_2,
            pool_limit: 6,
        }
    }

    fn profile() -> HitProfile {
        HitProfile {
            weapon_id: "SHOCKWAVE".to_string(),
            damage: 9.0,
            knockback: 6.0,
            area: 1.0,
            crit_chance: 0.0,
            crit_multiplier: 2.0,
            cooldown: 2.5,
            cooldown_multiplier: 1.0,
        }
    }

    fn arc(id: usize) -> ShockArc {
        ShockArc {
            center: Vec2::ZERO,
            aim_angle: id as f32 * 0.1,
            sector_angle: 1.0,
            current_radius: 0.0,
            max_radius: 5.0,
            expand_speed: 1.0,
            damage: 1.0,
            is_crit: false,
            hit_targets: HashSet::new(),
            active: true,
        }
    }

    #[test]
    fn test_burst_staggers_waves() {
        let mut state = ShockwaveState::new(&params());
        let mut rng = Pcg32::seed_from_u64(1);
        let mut hits = Vec::new();
        tick_shockwave(
            &mut state,
            &params(),
            &profile(),
            &mut rng,
            Vec2::ZERO,
            0.0,
            &[],
            0.01,
            &mut hits,
        );

        // First wave promoted immediately, two still pending
        assert_eq!(state.arcs.len(), 1);
        assert_eq!(state.pending.len(), 2);
        assert!((state.pending[0].remaining_delay - 0.19).abs() < 1e-5);
        assert!((state.pending[1].remaining_delay - 0.39).abs() < 1e-5);
        assert_eq!(state.burst_timer, 2.5);

        tick_shockwave(
            &mut state,
            &params(),
            &profile(),
            &mut rng,
            Vec2::ZERO,
            0.0,
            &[],
            0.2,
            &mut hits,
        );
        assert_eq!(state.arcs.len(), 2);
        assert_eq!(state.pending.len(), 1);
    }

    #[test]
    fn test_aims_at_nearest_target() {
        let targets = [
            Target { id: 1, pos: Vec2::new(10.0, 0.0) },
            Target { id: 2, pos: Vec2::new(0.0, 3.0) },
        ];
        let aim = aim_angle(Vec2::ZERO, 0.0, &targets);
        assert!((aim - FRAC_PI_2).abs() < 1e-5);
        assert_eq!(aim_angle(Vec2::ZERO, 1.25, &[]), 1.25);
    }

    #[test]
    fn test_each_arc_hits_target_once() {
        let mut state = ShockwaveState::new(&params());
        let mut rng = Pcg32::seed_from_u64(1);
        let targets = [Target { id: 5, pos: Vec2::new(1.0, 0.0) }];
        let mut hits = Vec::new();
        for _ in 0..10 {
            tick_shockwave(
                &mut state,
                &params(),
                &profile(),
                &mut rng,
                Vec2::ZERO,
                0.0,
                &targets,
                0.1,
                &mut hits,
            );
        }
        // Three waves from one burst, one hit each
        assert_eq!(hits.len(), 3);
        assert!(hits.iter().all(|h| h.target_id == 5 && h.damage == 9.0));
    }

    #[test]
    fn test_arc_deactivates_at_max_radius() {
        let mut state = ShockwaveState::new(&params());
        let mut rng = Pcg32::seed_from_u64(1);
        let mut hits = Vec::new();
        let one_wave = ShockwaveParams {
            wave_count: 1,
            ..params()
        };
        tick_shockwave(
            &mut state,
            &one_wave,
            &profile(),
            &mut rng,
            Vec2::ZERO,
            0.0,
            &[],
            0.5,
            &mut hits,
        );
        assert!(state.arcs[0].active);
        assert_eq!(state.arcs[0].current_radius, 6.0);
        tick_shockwave(
            &mut state,
            &one_wave,
            &profile(),
            &mut rng,
            Vec2::ZERO,
            0.0,
            &[],
            0.5,
            &mut hits,
        );
        assert_eq!(state.arcs[0].current_radius, 8.0);
        assert!(!state.arcs[0].active);
    }

    #[test]
    fn test_pool_limit_evicts_lowest_index() {
        let limit = 4;
        let mut state = ShockwaveState::default();
        for i in 0..limit {
            state.push_arc(arc(i), limit);
        }
        state.push_arc(arc(limit), limit);

        assert!(!state.arcs[0].active);
        assert!(state.arcs[1..limit].iter().all(|a| a.active));
        assert!(state.arcs[limit].active);
        assert_eq!(state.active_count(), limit);
    }
}
