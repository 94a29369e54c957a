//! Bounding-sphere camera framing.
//!
//! The camera sits on an elevated orbit around the current sphere center, at
//! the distance where the sphere just fills the vertical field of view. The
//! orbit angle is a pure function of session time, so scene swaps never
//! reset it.

use glam::Vec3;

use crate::options::CameraOptions;
use crate::scene::BoundingSphere;

/// Lens of the renderer's camera, read once per session.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraLens {
    /// Horizontal field of view in degrees.
    pub horizontal_fov: f32,
    /// Output width / height, when the render target is known.
    pub aspect: Option<f32>,
}

/// Vertical FOV (degrees) from a horizontal FOV (degrees) and aspect ratio:
/// `2·atan(tan(h/2) / aspect)`.
#[must_use]
pub fn vertical_fov(horizontal_fov: f32, aspect: f32) -> f32 {
    let half = (horizontal_fov.to_radians() * 0.5).tan();
    2.0 * (half / aspect).atan().to_degrees()
}

/// Camera placement for one tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraPose {
    /// Eye position relative to the sphere center.
    pub position: Vec3,
    /// Rotation about X in degrees (negative looks down).
    pub pitch: f32,
    /// Rotation about Y in degrees; equals the orbit angle.
    pub yaw: f32,
    /// Sphere center the camera orbits.
    pub target: Vec3,
}

impl CameraPose {
    /// Eye position in world space.
    #[must_use]
    pub fn world_position(&self) -> Vec3 {
        self.target + self.position
    }
}

/// Maps a bounding sphere and session time to a camera pose.
#[derive(Debug, Clone, PartialEq)]
pub struct CameraFraming {
    /// Vertical field of view in degrees.
    pub vertical_fov: f32,
    /// Elevation above the orbit plane in degrees.
    pub elevation: f32,
    /// Orbit speed in degrees per second.
    pub orbit_speed: f32,
    /// Fractional margin added to the fit distance.
    pub margin: f32,
    /// Scale for the published reach radius.
    pub reach_scale: f32,
}

impl CameraFraming {
    /// Framing with an explicit vertical FOV and the other parameters from
    /// options.
    #[must_use]
    pub fn new(vertical_fov: f32, options: &CameraOptions) -> Self {
        Self {
            vertical_fov,
            elevation: options.elevation,
            orbit_speed: options.orbit_speed,
            margin: options.margin,
            reach_scale: options.reach_scale,
        }
    }

    /// Framing for the renderer's lens, falling back to the configured
    /// vertical FOV when no usable lens is reported.
    #[must_use]
    pub fn from_lens(lens: Option<CameraLens>, options: &CameraOptions) -> Self {
        Self::new(resolve_vertical_fov(lens, options), options)
    }

    /// Distance at which `radius` fills the vertical FOV, plus margin.
    #[must_use]
    pub fn distance(&self, radius: f32) -> f32 {
        let half = (self.vertical_fov.to_radians() * 0.5).tan();
        radius / half * (1.0 + self.margin)
    }

    /// Orbit angle in degrees at `time` seconds, wrapped to `[0, 360)`.
    #[must_use]
    pub fn orbit_angle(&self, time: f64) -> f32 {
        let angle = (time * f64::from(self.orbit_speed)).rem_euclid(360.0);
        angle as f32
    }

    /// Reach radius handed to the displacement system.
    #[must_use]
    pub fn reach_radius(&self, radius: f32) -> f32 {
        radius * self.reach_scale
    }

    /// Camera pose framing `sphere` at `time`.
    #[must_use]
    pub fn pose(&self, sphere: &BoundingSphere, time: f64) -> CameraPose {
        let distance = self.distance(sphere.radius);
        let elevation = self.elevation.to_radians();
        let orbit_deg = self.orbit_angle(time);
        let orbit = orbit_deg.to_radians();
        let horizontal = distance * elevation.cos();

        CameraPose {
            position: Vec3::new(
                horizontal * orbit.sin(),
                distance * elevation.sin(),
                horizontal * orbit.cos(),
            ),
            pitch: -self.elevation,
            yaw: orbit_deg,
            target: sphere.center,
        }
    }
}

fn resolve_vertical_fov(
    lens: Option<CameraLens>,
    options: &CameraOptions,
) -> f32 {
    let Some(lens) = lens else {
        log::warn!(
            "no render camera; using {}° vertical FOV",
            options.fallback_vertical_fov
        );
        return options.fallback_vertical_fov;
    };
    if !(lens.horizontal_fov.is_finite()
        && lens.horizontal_fov > 0.0
        && lens.horizontal_fov < 180.0)
    {
        log::warn!(
            "unusable camera FOV {}; using {}° vertical FOV",
            lens.horizontal_fov,
            options.fallback_vertical_fov
        );
        return options.fallback_vertical_fov;
    }
    let aspect = lens
        .aspect
        .filter(|a| a.is_finite() && *a > 0.0)
        .unwrap_or(options.fallback_aspect);
    vertical_fov(lens.horizontal_fov, aspect)
}
