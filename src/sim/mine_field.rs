//! Mine-field archetype
//!
//! A ring of proximity mines orbits the player. A mine that detects a target
//! detonates, damaging everything in its blast, then respawns after a delay.

use std::collections::HashSet;

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::catalog::MineFieldParams;
use super::tick::{Hit, HitProfile, Target};
use crate::{normalize_angle, polar_to_cartesian};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MineSlot {
    pub slot_index: usize,
    pub active: bool,
    /// Seconds until an inactive mine re-arms
    pub respawn_timer: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MineFieldState {
    pub mines: Vec<MineSlot>,
    /// Shared orbit offset for the whole ring
    pub orbital_angle: f32,
}

impl MineFieldState {
    pub fn new(params: &MineFieldParams) -> Self {
        Self {
            mines: (0..params.mine_count)
                .map(|slot_index| MineSlot {
                    slot_index,
                    active: true,
                    respawn_timer: 0.0,
                })
                .collect(),
            orbital_angle: 0.0,
        }
    }

    /// World position of a mine slot
    pub fn mine_position(&self, params: &MineFieldParams, origin: Vec2, slot_index: usize) -> Vec2 {
        let count = params.mine_count.max(1) as f32;
        let angle = self.orbital_angle + std::f32::consts::TAU * slot_index as f32 / count;
        origin + polar_to_cartesian(params.orbit_radius, angle)
    }
}

#[allow(clippy::too_many_arguments)]
pub fn tick_mine_field<R: Rng + ?Sized>(
    state: &mut MineFieldState,
    params: &MineFieldParams,
    profile: &HitProfile,
    rng: &mut R,
    origin: Vec2,
    targets: &[Target],
    dt: f32,
    hits: &mut Vec<Hit>,
) {
    state.orbital_angle = normalize_angle(state.orbital_angle + params.orbital_speed * dt);

    let detection_sq = params.detection_radius * params.detection_radius;
    let blast = (params.blast_radius * profile.area).max(params.detection_radius);
    let mut hit_this_tick: HashSet<u32> = HashSet::new();

    for i in 0..state.mines.len() {
        let slot_index = state.mines[i].slot_index;
        let mine = &mut state.mines[i];
        if !mine.active {
            mine.respawn_timer -= dt;
            if mine.respawn_timer > 0.0 {
                continue;
            }
            mine.active = true;
            mine.respawn_timer = 0.0;
        }

        let pos = state.mine_position(params, origin, slot_index);
        let triggered = targets
            .iter()
            .any(|t| t.pos.distance_squared(pos) <= detection_sq);
        if !triggered {
            continue;
        }

        let mine = &mut state.mines[i];
        mine.active = false;
        mine.respawn_timer = params.respawn_time;

        let (damage, is_crit) = profile.roll(rng);
        for target in targets {
            let offset = target.pos - pos;
            if offset.length_squared() <= blast * blast && hit_this_tick.insert(target.id) {
                hits.push(profile.hit(target.id, damage, is_crit, offset.normalize_or_zero()));
            }
        }
        log::trace!("Mine {} detonated", slot_index);
    }
}
