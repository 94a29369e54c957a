use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use web_time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Rotation", inline)]
#[serde(default)]
/// Cycle, preload and crossfade timing.
pub struct RotationOptions {
    /// Wall-clock length of the crossfade in seconds.
    #[schemars(title = "Blend Duration", range(min = 0.0, max = 30.0), extend("step" = 0.5))]
    pub blend_duration: f32,
    /// Length of one rotation cycle in seconds (drives the built-in timer).
    #[schemars(title = "Cycle Length", range(min = 5.0, max = 600.0), extend("step" = 1.0))]
    pub cycle_seconds: f32,
    /// Cycle position after which the next scene may be preloaded.
    #[schemars(skip)]
    pub preload_threshold: f32,
    /// Cycle position below which the blend trigger re-arms.
    #[schemars(skip)]
    pub arm_threshold: f32,
    /// Cycle position at which an armed, preloaded blend starts.
    #[schemars(skip)]
    pub blend_start: f32,
    /// Backward cycle-position drop that counts as a timer restart.
    #[schemars(skip)]
    pub jitter_tolerance: f32,
    /// Tick rate of the standalone driver (0 = unlimited).
    #[schemars(skip)]
    pub target_fps: u32,
}

impl Default for RotationOptions {
    fn default() -> Self {
        Self {
            blend_duration: 5.0,
            cycle_seconds: 60.0,
            preload_threshold: 0.05,
            arm_threshold: 0.5,
            blend_start: 0.9,
            jitter_tolerance: 0.1,
            target_fps: 60,
        }
    }
}

impl RotationOptions {
    /// `cycle_seconds` as a timer period. Values a [`Duration`] cannot hold
    /// (negative, NaN, infinite, overflowing) fall back to the default.
    #[must_use]
    pub fn cycle_period(&self) -> Duration {
        Duration::try_from_secs_f32(self.cycle_seconds).unwrap_or_else(|_| {
            let fallback = Self::default().cycle_seconds;
            log::warn!(
                "cycle length {} s is unusable, using {fallback} s",
                self.cycle_seconds
            );
            Duration::from_secs_f32(fallback)
        })
    }
}
