//! Sector geometry for shockwave arcs
//!
//! A sector is defined by:
//! - center: apex on the ground plane
//! - radius: how far the wavefront has travelled
//! - theta_start, theta_end: angular extent (counter-clockwise from start to end)

use std::f32::consts::{PI, TAU};

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::{cartesian_to_polar, normalize_angle};

/// A pie-slice region anchored at `center`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sector {
    pub center: Vec2,
    pub radius: f32,
    /// Start angle (radians, normalized to [-π, π))
    pub theta_start: f32,
    /// End angle (radians, normalized to [-π, π), or π for a full circle)
    pub theta_end: f32,
}

impl Sector {
    /// Sector of angular width `width` centered on `aim`; a width of a full
    /// turn or more covers every direction
    pub fn around(center: Vec2, radius: f32, aim: f32, width: f32) -> Self {
        if width >= TAU {
            return Self {
                center,
                radius,
                theta_start: -PI,
                theta_end: PI,
            };
        }
        let half = (width / 2.0).max(0.0);
        Self {
            center,
            radius,
            theta_start: normalize_angle(aim - half),
            theta_end: normalize_angle(aim + half),
        }
    }

    /// Angular span of the sector (handles wraparound)
    pub fn angular_span(&self) -> f32 {
        let mut span = self.theta_end - self.theta_start;
        if span < 0.0 {
            span += TAU;
        }
        span
    }

    /// Check if an angle is within the sector's angular extent
    pub fn contains_angle(&self, theta: f32) -> bool {
        let theta = normalize_angle(theta);
        let start = self.theta_start;
        let end = self.theta_end;

        if start <= end {
            theta >= start && theta <= end
        } else {
            // Wraparound case (e.g., start=170°, end=-170°)
            theta >= start || theta <= end
        }
    }

    /// Check if a point is inside the sector (boundary inclusive)
    pub fn contains_point(&self, point: Vec2) -> bool {
        let offset = point - self.center;
        if offset.length_squared() > self.radius * self.radius {
            return false;
        }
        // The apex belongs to every direction
        if offset.length_squared() < 1e-8 {
            return true;
        }
        let (_, theta) = cartesian_to_polar(offset);
        self.contains_angle(theta)
    }
}
