//! Projectiles and the global capped projectile pool
//!
//! Projectiles are destroyed by clearing `active` and compacted at the end of
//! integration. The pool hands out an `Arc<[Projectile]>` snapshot that is only
//! rebuilt when its contents changed, so observers can skip work with `Arc::ptr_eq`.

use std::sync::Arc;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::catalog::WeaponId;

/// Extra behavior carried by a projectile
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ProjectileKind {
    Plain,
    /// Survives `pierce_count` hits; `pierce_hits` counts hits so far
    Piercing { pierce_count: u32, pierce_hits: u32 },
    /// Detonates on impact (applied by the collision collaborator)
    Explosive { radius: f32, damage: f32 },
}

/// A live projectile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Projectile {
    /// Unique for the lifetime of the pool
    pub id: u32,
    pub weapon_id: WeaponId,
    pub pos: Vec2,
    /// Unit vector
    pub dir: Vec2,
    pub speed: f32,
    pub damage: f32,
    pub radius: f32,
    /// Seconds remaining
    pub lifetime: f32,
    pub color: u32,
    pub mesh_scale: f32,
    pub active: bool,
    pub kind: ProjectileKind,
}

/// Capped pool of projectiles shared by every weapon
#[derive(Debug, Clone)]
pub struct ProjectilePool {
    capacity: usize,
    projectiles: Vec<Projectile>,
    next_id: u32,
    snapshot: Arc<[Projectile]>,
    dirty: bool,
}

impl ProjectilePool {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            projectiles: Vec::with_capacity(capacity),
            next_id: 1,
            snapshot: Arc::from(Vec::new()),
            dirty: false,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.projectiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.projectiles.is_empty()
    }

    /// Slots left before the pool is full
    pub fn remaining(&self) -> usize {
        self.capacity.saturating_sub(self.projectiles.len())
    }

    pub fn is_full(&self) -> bool {
        self.remaining() == 0
    }

    /// Allocate an id for a projectile about to be spawned
    pub fn next_projectile_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id = self.next_id.wrapping_add(1);
        id
    }

    /// Admit a projectile; returns false (and drops it) when the pool is full
    pub fn try_push(&mut self, projectile: Projectile) -> bool {
        if self.is_full() {
            return false;
        }
        self.projectiles.push(projectile);
        self.dirty = true;
        true
    }

    pub fn iter(&self) -> impl Iterator<Item = &Projectile> {
        self.projectiles.iter()
    }

    pub fn get(&self, id: u32) -> Option<&Projectile> {
        self.projectiles.iter().find(|p| p.id == id)
    }

    /// Move projectiles, age them, and compact out the expired ones
    pub fn advance(&mut self, dt: f32) {
        if self.projectiles.is_empty() {
            return;
        }
        for p in self.projectiles.iter_mut().filter(|p| p.active) {
            p.pos += p.dir * p.speed * dt;
            p.lifetime -= dt;
            if p.lifetime <= 0.0 {
                p.active = false;
            }
        }
        self.compact();
        self.dirty = true;
    }

    /// Record a hit for the collision collaborator.
    ///
    /// Plain and explosive projectiles are consumed by their first hit; piercing
    /// projectiles survive until `pierce_hits` exceeds `pierce_count`.
    pub fn register_hit(&mut self, id: u32) {
        let Some(p) = self.projectiles.iter_mut().find(|p| p.id == id && p.active) else {
            return;
        };
        match &mut p.kind {
            ProjectileKind::Piercing {
                pierce_count,
                pierce_hits,
            } => {
                *pierce_hits += 1;
                if *pierce_hits > *pierce_count {
                    p.active = false;
                }
            }
            ProjectileKind::Plain | ProjectileKind::Explosive { .. } => p.active = false,
        }
        self.dirty = true;
    }

    /// Drop deactivated projectiles
    pub fn compact(&mut self) {
        let before = self.projectiles.len();
        self.projectiles.retain(|p| p.active);
        if self.projectiles.len() != before {
            self.dirty = true;
        }
    }

    pub fn clear(&mut self) {
        if !self.projectiles.is_empty() {
            self.projectiles.clear();
            self.dirty = true;
        }
    }

    /// Read-only snapshot for collision / rendering collaborators.
    ///
    /// Returns the same `Arc` until the pool changes.
    pub fn snapshot(&mut self) -> Arc<[Projectile]> {
        if self.dirty {
            self.snapshot = Arc::from(self.projectiles.as_slice());
            self.dirty = false;
        }
        Arc::clone(&self.snapshot)
    }
}
