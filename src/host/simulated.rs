//! In-process stand-in for the renderer.
//!
//! Used by the headless binary and the tests. Downstream point data is
//! synthesized from whichever slot the last observed settled frame showed,
//! so it lags a swap by exactly the tick that published it, the same way a
//! renderer's lazily recomputed data does.

use std::hash::BuildHasher;

use glam::Vec3;
use rustc_hash::{FxBuildHasher, FxHashSet};

use super::{Host, HostError};
use crate::camera::CameraLens;
use crate::rotation::{OutputFrame, Slot};
use crate::scene::Scene;

/// Golden angle in radians.
const GOLDEN_ANGLE: f32 = 2.399_963_2;

/// Points synthesized per scene unless overridden.
pub const DEFAULT_POINT_COUNT: usize = 2048;

/// Counters of host calls.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HostStats {
    /// Successful scene loads.
    pub loads: u32,
    /// Scene loads that failed.
    pub failed_loads: u32,
    /// Rest-position regenerations.
    pub rest_position_requests: u32,
    /// Feedback resets.
    pub feedback_resets: u32,
}

/// Simulated renderer.
#[derive(Debug, Clone)]
pub struct SimulatedHost {
    slots: [Option<Scene>; 2],
    live: Slot,
    frozen: bool,
    point_count: usize,
    missing: FxHashSet<String>,
    lens: Option<CameraLens>,
    rest_source: Option<String>,
    stats: HostStats,
}

impl Default for SimulatedHost {
    fn default() -> Self {
        Self::new()
    }
}

impl SimulatedHost {
    /// Empty host showing slot A.
    #[must_use]
    pub fn new() -> Self {
        Self::with_point_count(DEFAULT_POINT_COUNT)
    }

    /// Empty host synthesizing `point_count` points per scene.
    #[must_use]
    pub fn with_point_count(point_count: usize) -> Self {
        Self {
            slots: [None, None],
            live: Slot::A,
            frozen: false,
            point_count,
            missing: FxHashSet::default(),
            lens: None,
            rest_source: None,
            stats: HostStats::default(),
        }
    }

    /// Attach a camera lens.
    #[must_use]
    pub fn with_lens(mut self, lens: CameraLens) -> Self {
        self.lens = Some(lens);
        self
    }

    /// Make loads of `scene_id` fail with [`HostError::NotFound`].
    pub fn set_missing(&mut self, scene_id: &str, missing: bool) {
        if missing {
            let _ = self.missing.insert(scene_id.to_owned());
        } else {
            let _ = self.missing.remove(scene_id);
        }
    }

    /// Hold the downstream data where it is, ignoring published frames.
    pub fn freeze(&mut self, frozen: bool) {
        self.frozen = frozen;
    }

    /// Take in a published frame. A settled frame moves the downstream
    /// data to the slot it shows; a mid-crossfade frame keeps the old data.
    pub fn observe(&mut self, frame: &OutputFrame) {
        if self.frozen {
            return;
        }
        if let Some(slot) = frame.settled_slot() {
            self.live = slot;
        }
    }

    /// Slot the downstream data currently comes from.
    #[must_use]
    pub fn live_slot(&self) -> Slot {
        self.live
    }

    /// Scene loaded into `slot`.
    #[must_use]
    pub fn slot_scene(&self, slot: Slot) -> Option<&Scene> {
        self.slots[slot.index()].as_ref()
    }

    /// Scene whose data the last rest-position regeneration read.
    #[must_use]
    pub fn rest_source(&self) -> Option<&str> {
        self.rest_source.as_deref()
    }

    /// Call counters.
    #[must_use]
    pub fn stats(&self) -> HostStats {
        self.stats
    }

    fn live_scene(&self) -> Option<&Scene> {
        self.slot_scene(self.live)
    }
}

impl Host for SimulatedHost {
    fn load_scene(
        &mut self,
        slot: Slot,
        scene: &Scene,
    ) -> Result<(), HostError> {
        if self.missing.contains(&scene.id) {
            self.stats.failed_loads += 1;
            return Err(HostError::NotFound(scene.path.display().to_string()));
        }
        self.slots[slot.index()] = Some(scene.clone());
        self.stats.loads += 1;
        log::debug!("{slot} <- {}", scene.id);
        Ok(())
    }

    fn request_rest_positions(&mut self) -> Result<(), HostError> {
        let id = self
            .live_scene()
            .map(|scene| scene.id.clone())
            .ok_or_else(|| {
                HostError::Rejected(format!("{} is empty", self.live))
            })?;
        self.rest_source = Some(id);
        self.stats.rest_position_requests += 1;
        Ok(())
    }

    fn reset_feedback(&mut self) -> Result<(), HostError> {
        self.stats.feedback_resets += 1;
        Ok(())
    }

    fn point_count(&self) -> usize {
        if self.live_scene().is_some() {
            self.point_count
        } else {
            0
        }
    }

    fn point(&self, index: usize) -> Option<Vec3> {
        let scene = self.live_scene()?;
        if index >= self.point_count {
            return None;
        }
        // Fibonacci sphere, phase-shifted per scene id
        let phase = (FxBuildHasher.hash_one(&scene.id) % 3600) as f32 / 10.0;
        let n = self.point_count as f32;
        let i = index as f32;
        let y = 1.0 - 2.0 * (i + 0.5) / n;
        let ring = (1.0 - y * y).max(0.0).sqrt();
        let theta = i * GOLDEN_ANGLE + phase.to_radians();
        let unit = Vec3::new(ring * theta.cos(), y, ring * theta.sin());
        Some(scene.sphere.center + unit * scene.sphere.radius)
    }

    fn camera_lens(&self) -> Option<CameraLens> {
        self.lens
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;
    use crate::camera::CameraFraming;
    use crate::options::CameraOptions;
    use crate::rotation::gate::Fingerprint;
    use crate::scene::{BoundingSphere, BoundsManifest, SceneCatalog};

    fn catalog() -> SceneCatalog {
        let mut manifest = BoundsManifest::default();
        manifest.insert(
            "two.ply",
            BoundingSphere::new(Vec3::new(10.0, 0.0, 0.0), 20.0),
        );
        SceneCatalog::from_ids(
            Path::new("gallery"),
            ["one.ply", "two.ply"],
            &manifest,
        )
    }

    fn frame(blend: f32) -> OutputFrame {
        let framing = CameraFraming::new(26.0, &CameraOptions::default());
        let mut frame = OutputFrame::disabled(&framing, 0.0);
        frame.blend_control = blend;
        frame
    }

    #[test]
    fn empty_host_has_no_points() {
        let host = SimulatedHost::new();
        assert_eq!(host.point_count(), 0);
        assert_eq!(host.point(0), None);
        assert_eq!(Fingerprint::capture(&host), None);
    }

    #[test]
    fn points_lie_on_scene_sphere() {
        let catalog = catalog();
        let mut host = SimulatedHost::with_point_count(64);
        host.load_scene(Slot::A, catalog.get(0).unwrap()).unwrap();
        let sphere = catalog.sphere(0);
        for i in 0..64 {
            let p = host.point(i).unwrap();
            let r = (p - sphere.center).length();
            assert!((r - sphere.radius).abs() < 1e-2, "point {i} at {r}");
        }
        assert_eq!(host.point(64), None);
    }

    #[test]
    fn live_data_follows_settled_frames_only() {
        let catalog = catalog();
        let mut host = SimulatedHost::new();
        host.load_scene(Slot::A, catalog.get(0).unwrap()).unwrap();
        host.load_scene(Slot::B, catalog.get(1).unwrap()).unwrap();
        let before = Fingerprint::capture(&host);

        host.observe(&frame(0.4));
        assert_eq!(host.live_slot(), Slot::A);
        assert_eq!(Fingerprint::capture(&host), before);

        host.observe(&frame(1.0));
        assert_eq!(host.live_slot(), Slot::B);
        assert_ne!(Fingerprint::capture(&host), before);
    }

    #[test]
    fn frozen_host_ignores_frames() {
        let mut host = SimulatedHost::new();
        host.freeze(true);
        host.observe(&frame(1.0));
        assert_eq!(host.live_slot(), Slot::A);
        host.freeze(false);
        host.observe(&frame(1.0));
        assert_eq!(host.live_slot(), Slot::B);
    }

    #[test]
    fn missing_scene_fails_to_load() {
        let catalog = catalog();
        let mut host = SimulatedHost::new();
        host.set_missing("two.ply", true);
        let err = host
            .load_scene(Slot::B, catalog.get(1).unwrap())
            .unwrap_err();
        assert!(matches!(err, HostError::NotFound(_)));
        assert_eq!(host.stats().failed_loads, 1);
        assert!(host.slot_scene(Slot::B).is_none());

        host.set_missing("two.ply", false);
        host.load_scene(Slot::B, catalog.get(1).unwrap()).unwrap();
        assert_eq!(host.stats().loads, 1);
    }

    #[test]
    fn rest_positions_read_live_scene() {
        let catalog = catalog();
        let mut host = SimulatedHost::new();
        assert!(host.request_rest_positions().is_err());

        host.load_scene(Slot::A, catalog.get(0).unwrap()).unwrap();
        host.request_rest_positions().unwrap();
        assert_eq!(host.rest_source(), Some("one.ply"));
        assert_eq!(host.stats().rest_position_requests, 1);
    }

    #[test]
    fn lens_is_reported() {
        let lens = CameraLens {
            horizontal_fov: 40.0,
            aspect: Some(1.5),
        };
        assert_eq!(SimulatedHost::new().camera_lens(), None);
        let host = SimulatedHost::new().with_lens(lens);
        assert_eq!(host.camera_lens(), Some(lens));
    }
}
