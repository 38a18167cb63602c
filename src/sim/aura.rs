//! Aura archetype: periodic pulse around the player

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::catalog::AuraParams;
use super::tick::{Hit, HitProfile, Target};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AuraState {
    /// Seconds until the next pulse (first pulse is immediate)
    pub pulse_timer: f32,
}

impl AuraState {
    pub fn new(_params: &AuraParams) -> Self {
        Self::default()
    }
}

#[allow(clippy::too_many_arguments)]
pub fn tick_aura<R: Rng + ?Sized>(
    state: &mut AuraState,
    params: &AuraParams,
    profile: &HitProfile,
    rng: &mut R,
    origin: Vec2,
    targets: &[Target],
    dt: f32,
    hits: &mut Vec<Hit>,
) {
    state.pulse_timer = (state.pulse_timer - dt).max(0.0);
    if state.pulse_timer > 0.0 {
        return;
    }
    state.pulse_timer = params.pulse_interval * profile.cooldown_multiplier;

    let radius = params.radius * profile.area;
    let (damage, is_crit) = profile.roll(rng);
    for target in targets {
        let offset = target.pos - origin;
        if offset.length_squared() <= radius * radius {
            hits.push(profile.hit(target.id, damage, is_crit, offset.normalize_or_zero()));
        }
    }
}
