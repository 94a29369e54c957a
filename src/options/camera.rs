use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Camera", inline)]
#[serde(default)]
/// Camera framing parameters.
pub struct CameraOptions {
    /// Vertical field of view in degrees, used when the renderer reports no
    /// camera lens.
    #[schemars(title = "Fallback FOV", range(min = 5.0, max = 120.0), extend("step" = 1.0))]
    pub fallback_vertical_fov: f32,
    /// Aspect ratio used when the renderer reports no output size.
    #[schemars(skip)]
    pub fallback_aspect: f32,
    /// Camera elevation above the orbit plane in degrees.
    #[schemars(title = "Elevation", range(min = -89.0, max = 89.0), extend("step" = 1.0))]
    pub elevation: f32,
    /// Orbit speed in degrees per second.
    #[schemars(title = "Orbit Speed", range(min = 0.0, max = 90.0), extend("step" = 0.5))]
    pub orbit_speed: f32,
    /// Extra margin around the bounding sphere (0.1 = 10% padding).
    #[schemars(title = "Framing Margin", range(min = 0.0, max = 1.0), extend("step" = 0.01))]
    pub margin: f32,
    /// Scale applied to the published sphere radius for displacement reach.
    #[schemars(title = "Reach Scale", range(min = 0.0, max = 4.0), extend("step" = 0.05))]
    pub reach_scale: f32,
}

impl Default for CameraOptions {
    fn default() -> Self {
        Self {
            fallback_vertical_fov: 26.0,
            fallback_aspect: 16.0 / 9.0,
            elevation: 20.0,
            orbit_speed: 10.0,
            margin: 0.01,
            reach_scale: 1.5,
        }
    }
}
