//! Laser-cross archetype
//!
//! Two perpendicular beams centered on the player rotate continuously and run
//! on a duty cycle: damage only applies during the active phase.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::catalog::LaserCrossParams;
use super::tick::{Hit, HitProfile, Target, TickModifiers};
use crate::{heading_dir, normalize_angle};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LaserCrossState {
    /// Rotation of the first beam (radians)
    pub angle: f32,
    pub active: bool,
    /// Seconds left in the current phase
    pub cycle_timer: f32,
}

impl LaserCrossState {
    pub fn new(params: &LaserCrossParams) -> Self {
        Self {
            angle: 0.0,
            active: true,
            cycle_timer: params.active_duration,
        }
    }

    /// Unit directions of the two beams
    pub fn beam_dirs(&self) -> [Vec2; 2] {
        let dir = heading_dir(self.angle);
        [dir, dir.perp()]
    }
}

/// Rotate the cross and step the duty cycle
pub fn advance(
    state: &mut LaserCrossState,
    params: &LaserCrossParams,
    dt: f32,
    modifiers: &TickModifiers,
) {
    let spin = params.rotation_speed * modifiers.projectile_speed;
    state.angle = normalize_angle(state.angle + spin * dt);

    state.cycle_timer -= dt;
    while state.cycle_timer <= 0.0 {
        let next = if state.active {
            params.inactive_duration * modifiers.cooldown
        } else {
            params.active_duration
        };
        if next <= 0.0 {
            // Zero-length phase: no time to carry into
            state.cycle_timer = 0.0;
            break;
        }
        state.active = !state.active;
        state.cycle_timer += next;
    }
}

/// Continuous damage (`profile.damage` per second) to targets on either beam
pub fn apply_beam_damage(
    state: &LaserCrossState,
    params: &LaserCrossParams,
    profile: &HitProfile,
    origin: Vec2,
    targets: &[Target],
    dt: f32,
    hits: &mut Vec<Hit>,
) {
    if !state.active {
        return;
    }
    let length = params.beam_length * profile.area;
    let half_width = params.beam_width * profile.area / 2.0;
    let beams = state.beam_dirs();

    for target in targets {
        let offset = target.pos - origin;
        let on_beam = beams.iter().find(|dir| {
            let along = offset.dot(**dir);
            along.abs() <= length && dir.perp_dot(offset).abs() <= half_width
        });
        if let Some(dir) = on_beam {
            // Push away from the beam line
            let side = dir.perp() * dir.perp_dot(offset).signum();
            hits.push(profile.hit(target.id, profile.damage * dt, false, side));
        }
    }
}
