//! Per-tick output frame and its atomic publication.
//!
//! A frame is always built completely before it is published, and
//! publication is a single triple-buffer write. Readers therefore see the
//! previous frame or the new one, never an empty or half-filled channel
//! set.

use glam::Vec3;
use serde::Serialize;

use super::buffer::Slot;
use crate::camera::CameraFraming;
use crate::scene::BoundingSphere;

/// Channel names in publication order, as bound on the renderer side.
pub const CHANNEL_NAMES: [&str; 12] = [
    "switchIndex",
    "sceneIndex",
    "nextSceneIndex",
    "camTx",
    "camTy",
    "camTz",
    "camRx",
    "camRy",
    "sceneCenterX",
    "sceneCenterY",
    "sceneCenterZ",
    "sceneRadius",
];

/// Everything the scheduler publishes for one tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct OutputFrame {
    /// Slot mix in `[0, 2)`: integer part is a slot id, fractional part the
    /// crossfade progress.
    pub blend_control: f32,
    /// Catalog index of the scene on screen.
    pub scene_index: usize,
    /// Catalog index of the scene that plays next.
    pub next_scene_index: usize,
    /// Camera position relative to `sphere_center`.
    pub camera_position: Vec3,
    /// Camera pitch in degrees.
    pub camera_pitch: f32,
    /// Camera yaw (orbit angle) in degrees.
    pub camera_yaw: f32,
    /// Center of the (interpolated) framing sphere.
    pub sphere_center: Vec3,
    /// Framing radius scaled for displacement reach.
    pub reach_radius: f32,
}

impl OutputFrame {
    /// Build a frame from the scheduling results and the framing sphere.
    #[must_use]
    pub fn compose(
        blend_control: f32,
        scene_index: usize,
        next_scene_index: usize,
        sphere: &BoundingSphere,
        framing: &CameraFraming,
        time: f64,
    ) -> Self {
        let pose = framing.pose(sphere, time);
        Self {
            blend_control,
            scene_index,
            next_scene_index,
            camera_position: pose.position,
            camera_pitch: pose.pitch,
            camera_yaw: pose.yaw,
            sphere_center: sphere.center,
            reach_radius: framing.reach_radius(sphere.radius),
        }
    }

    /// Idle output: slot 0, scene 0, camera on the default sphere.
    #[must_use]
    pub fn disabled(framing: &CameraFraming, time: f64) -> Self {
        Self::compose(0.0, 0, 0, &BoundingSphere::DEFAULT, framing, time)
    }

    /// Slot fully on screen, or `None` mid-crossfade.
    #[must_use]
    pub fn settled_slot(&self) -> Option<Slot> {
        Slot::from_blend(self.blend_control)
    }

    /// Named channel values in [`CHANNEL_NAMES`] order.
    #[must_use]
    pub fn channels(&self) -> [(&'static str, f32); 12] {
        let values = [
            self.blend_control,
            self.scene_index as f32,
            self.next_scene_index as f32,
            self.camera_position.x,
            self.camera_position.y,
            self.camera_position.z,
            self.camera_pitch,
            self.camera_yaw,
            self.sphere_center.x,
            self.sphere_center.y,
            self.sphere_center.z,
            self.reach_radius,
        ];
        let mut channels = [("", 0.0); 12];
        for ((slot, name), value) in
            channels.iter_mut().zip(CHANNEL_NAMES).zip(values)
        {
            *slot = (name, value);
        }
        channels
    }
}

/// Producer half: owned by the scheduler.
pub struct OutputPublisher {
    input: triple_buffer::Input<OutputFrame>,
    published: u64,
}

impl OutputPublisher {
    /// Replace the published frame in one step.
    pub fn publish(&mut self, frame: OutputFrame) {
        self.input.write(frame);
        self.published += 1;
    }

    /// Number of frames published so far.
    #[must_use]
    pub fn published(&self) -> u64 {
        self.published
    }
}

/// Consumer half: may live on another thread.
pub struct OutputReader {
    output: triple_buffer::Output<OutputFrame>,
}

impl OutputReader {
    /// Most recently published frame.
    pub fn latest(&mut self) -> OutputFrame {
        let _ = self.output.update();
        *self.output.output_buffer_mut()
    }
}

/// Publisher/reader pair seeded with `initial`.
#[must_use]
pub fn output_channel(initial: OutputFrame) -> (OutputPublisher, OutputReader) {
    let (input, output) = triple_buffer::triple_buffer(&initial);
    (
        OutputPublisher {
            input,
            published: 0,
        },
        OutputReader { output },
    )
}
