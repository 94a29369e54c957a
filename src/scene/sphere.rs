use glam::Vec3;
use serde::{Deserialize, Serialize};

/// World-space bounding sphere of a scene, as written by the offline bounds
/// pass: `{"center": [x, y, z], "radius": r}`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingSphere {
    /// Sphere center in world space.
    pub center: Vec3,
    /// Sphere radius in world units.
    pub radius: f32,
}

impl BoundingSphere {
    /// Fallback for scenes without a manifest entry.
    pub const DEFAULT: Self = Self {
        center: Vec3::ZERO,
        radius: 50.0,
    };

    /// Sphere from center and radius.
    #[must_use]
    pub const fn new(center: Vec3, radius: f32) -> Self {
        Self { center, radius }
    }

    /// Linear interpolation of center and radius.
    #[must_use]
    pub fn lerp(&self, other: &Self, t: f32) -> Self {
        Self {
            center: self.center.lerp(other.center, t),
            radius: self.radius + (other.radius - self.radius) * t,
        }
    }

    /// Whether center and radius are finite and the radius non-negative.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.center.is_finite() && self.radius.is_finite() && self.radius >= 0.0
    }
}

impl Default for BoundingSphere {
    fn default() -> Self {
        Self::DEFAULT
    }
}
