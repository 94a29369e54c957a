//! Renderer-side collaborator seam.
//!
//! The scheduler never touches splat data itself. Loading files into a
//! slot, resetting temporal feedback, regenerating rest positions, and
//! reading back the downstream point data all go through [`Host`].
//! Failures are reported as [`HostError`] and the scheduler logs and
//! carries on; nothing on the tick path aborts.

mod simulated;

use std::fmt;

use glam::Vec3;
pub use simulated::{HostStats, SimulatedHost};

use crate::camera::CameraLens;
use crate::rotation::Slot;
use crate::scene::Scene;

/// Error reported by a [`Host`] operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostError {
    /// The scene asset does not exist.
    NotFound(String),
    /// The host refused the request (not ready, no data, ...).
    Rejected(String),
}

impl fmt::Display for HostError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound(what) => write!(f, "not found: {what}"),
            Self::Rejected(why) => write!(f, "rejected: {why}"),
        }
    }
}

impl std::error::Error for HostError {}

/// The renderer the scheduler drives.
pub trait Host {
    /// Load `scene` into `slot`. Completion is synchronous from the
    /// scheduler's point of view.
    fn load_scene(
        &mut self,
        slot: Slot,
        scene: &Scene,
    ) -> Result<(), HostError>;

    /// Recompute rest positions from the current downstream point data.
    fn request_rest_positions(&mut self) -> Result<(), HostError>;

    /// Clear offset and velocity feedback so no motion carries across a
    /// scene swap.
    fn reset_feedback(&mut self) -> Result<(), HostError>;

    /// Number of points in the downstream data. Until the host has seen a
    /// settled frame this is slot A's data.
    fn point_count(&self) -> usize;

    /// Downstream point at `index`.
    fn point(&self, index: usize) -> Option<Vec3>;

    /// Viewing lens, if the host has a camera attached.
    fn camera_lens(&self) -> Option<CameraLens> {
        None
    }
}
