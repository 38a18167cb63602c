//! Deterministic weapon simulation
//!
//! All combat logic lives here. This module must be pure and deterministic:
//! - Caller-supplied timestep
//! - Seeded RNG only
//! - Stable iteration order (weapons in acquisition order)
//! - No rendering, input or platform dependencies

pub mod arc;
pub mod aura;
pub mod catalog;
pub mod firing;
pub mod laser_cross;
pub mod mine_field;
pub mod projectile;
pub mod shockwave;
pub mod state;
pub mod strike;
pub mod tick;

pub use arc::Sector;
pub use catalog::{
    Archetype, ArchetypeKind, BoonCatalog, BoonDefinition, FirePattern, WeaponCatalog,
    WeaponDefinition, WeaponId,
};
pub use firing::{fire_weapons, plan_volley};
pub use projectile::{Projectile, ProjectileKind, ProjectilePool};
pub use state::{ActiveWeapon, Multipliers, Overrides, RuntimeState, SimState};
pub use tick::{Hit, HitProfile, Target, TickInput, TickModifiers, TickReport, tick};
