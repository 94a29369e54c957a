//! Persisted rotation state.
//!
//! Owned by the scheduler and passed around explicitly. Snapshots are
//! versioned: a snapshot whose version differs from [`STATE_VERSION`] is
//! discarded wholesale and the session starts fresh. There is no partial
//! migration.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::buffer::DoubleBuffer;
use super::crossfade::Crossfade;
use super::deferred::DeferredQueue;
use super::gate::ConsistencyGate;
use crate::error::GalleryError;
use crate::scene::{BoundingSphere, SceneCatalog};

/// Bump when the catalog or blend contract changes shape.
pub const STATE_VERSION: u32 = 1;

/// Everything the scheduler carries from one tick to the next.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RotationState {
    /// Schema version of this snapshot.
    pub version: u32,
    /// Scene ids in the session's rotation order.
    pub scene_order: Vec<String>,
    /// Slot bookkeeping.
    pub buffer: DoubleBuffer,
    /// Catalog index of the scene on screen.
    pub current_scene: usize,
    /// Cycle position seen on the previous tick.
    pub prev_cycle_position: f32,
    /// Crossfade phase.
    pub crossfade: Crossfade,
    /// Pending rest-position consistency check.
    pub gate: ConsistencyGate,
    /// Actions due on the next tick.
    pub deferred: DeferredQueue,
    /// Framing sphere of the scene on screen.
    pub active_sphere: BoundingSphere,
    /// Framing sphere of the preloaded scene.
    pub target_sphere: BoundingSphere,
    /// Vertical FOV cached for the session, in degrees.
    pub vertical_fov: f32,
}

/// Just enough of a snapshot to check its version before a full parse.
#[derive(Deserialize)]
struct VersionProbe {
    version: u32,
}

impl RotationState {
    /// Fresh state for `catalog` before any scene is loaded.
    #[must_use]
    pub fn fresh(catalog: &SceneCatalog, vertical_fov: f32) -> Self {
        Self {
            version: STATE_VERSION,
            scene_order: catalog.ids(),
            buffer: DoubleBuffer::new(),
            current_scene: 0,
            prev_cycle_position: 0.0,
            crossfade: Crossfade::new(),
            gate: ConsistencyGate::Clear,
            deferred: DeferredQueue::new(),
            active_sphere: catalog.sphere(0),
            target_sphere: catalog.sphere(catalog.next_index(0)),
            vertical_fov,
        }
    }

    /// Parse a snapshot. `Ok(None)` when its version is not
    /// [`STATE_VERSION`].
    ///
    /// # Errors
    ///
    /// Returns [`GalleryError::StateParse`] for malformed JSON.
    pub fn from_json(json: &str) -> Result<Option<Self>, GalleryError> {
        let probe: VersionProbe = serde_json::from_str(json)?;
        if probe.version != STATE_VERSION {
            log::info!(
                "discarding rotation state v{} (current v{STATE_VERSION})",
                probe.version
            );
            return Ok(None);
        }
        Ok(Some(serde_json::from_str(json)?))
    }

    /// Load a snapshot file. `Ok(None)` when the file does not exist or has
    /// another version.
    ///
    /// # Errors
    ///
    /// Returns [`GalleryError`] when the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Option<Self>, GalleryError> {
        if !path.exists() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Write the snapshot as pretty JSON.
    ///
    /// # Errors
    ///
    /// Returns [`GalleryError`] on serialization or write failure.
    pub fn save(&self, path: &Path) -> Result<(), GalleryError> {
        let content = serde_json::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Whether indices in this state fit a catalog of `len` scenes.
    #[must_use]
    pub fn fits(&self, len: usize) -> bool {
        self.version == STATE_VERSION
            && self.scene_order.len() == len
            && self.current_scene < len
    }
}

/// Writes the state file each time a new scene settles on screen.
///
/// A failed write is not retried until the scene changes again or
/// [`StateCheckpoint::save`] is called.
#[derive(Debug, Clone)]
pub struct StateCheckpoint {
    path: PathBuf,
    saved_scene: Option<usize>,
}

impl StateCheckpoint {
    /// Checkpoint into `path`. Nothing is written until the first call.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            saved_scene: None,
        }
    }

    /// State file location.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Save when `state` shows a different scene than the last save.
    /// Returns whether a save was attempted and succeeded.
    ///
    /// # Errors
    ///
    /// Propagates [`RotationState::save`] failures.
    pub fn update(
        &mut self,
        state: &RotationState,
    ) -> Result<bool, GalleryError> {
        if self.saved_scene == Some(state.current_scene) {
            return Ok(false);
        }
        self.save(state)?;
        Ok(true)
    }

    /// Save unconditionally.
    ///
    /// # Errors
    ///
    /// Propagates [`RotationState::save`] failures.
    pub fn save(&mut self, state: &RotationState) -> Result<(), GalleryError> {
        self.saved_scene = Some(state.current_scene);
        state.save(&self.path)
    }
}

#[cfg(test)]
mod tests {
    use std::path::{Path, PathBuf};

    use glam::Vec3;

    use super::*;
    use crate::rotation::gate::Fingerprint;
    use crate::scene::BoundsManifest;

    fn catalog() -> SceneCatalog {
        let mut manifest = BoundsManifest::default();
        manifest.insert("a.ply", BoundingSphere::new(Vec3::ONE, 5.0));
        SceneCatalog::from_ids(Path::new("g"), ["a.ply", "b.ply"], &manifest)
    }

    #[test]
    fn fresh_state_frames_first_two_scenes() {
        let state = RotationState::fresh(&catalog(), 26.0);
        assert_eq!(state.version, STATE_VERSION);
        assert_eq!(state.scene_order, vec!["a.ply", "b.ply"]);
        assert_eq!(state.active_sphere, BoundingSphere::new(Vec3::ONE, 5.0));
        assert_eq!(state.target_sphere, BoundingSphere::DEFAULT);
        assert!(state.fits(2));
        assert!(!state.fits(3));
    }

    #[test]
    fn json_round_trip_keeps_gate_and_buffer() {
        let mut state = RotationState::fresh(&catalog(), 30.0);
        state.buffer.record_load(crate::rotation::Slot::B, "b.ply");
        state.buffer.set_preloaded(true);
        state
            .gate
            .arm(Fingerprint::from_slice(&[Vec3::new(0.5, 1.0, 2.0)]));
        state.current_scene = 1;

        let json = serde_json::to_string(&state).unwrap();
        let parsed = RotationState::from_json(&json).unwrap().unwrap();
        assert_eq!(parsed, state);
    }

    #[test]
    fn other_version_is_discarded() {
        let mut state = RotationState::fresh(&catalog(), 26.0);
        state.version = STATE_VERSION + 1;
        let json = serde_json::to_string(&state).unwrap();
        assert!(RotationState::from_json(&json).unwrap().is_none());

        // Older snapshots may not even share the current shape
        let legacy = r#"{"version": 0, "activeInput": 1}"#;
        assert!(RotationState::from_json(legacy).unwrap().is_none());
    }

    #[test]
    fn malformed_snapshot_is_an_error() {
        assert!(matches!(
            RotationState::from_json("{\"version\": 1, \"buffer\": 3"),
            Err(GalleryError::StateParse(_))
        ));
    }

    #[test]
    fn load_missing_file_is_none() {
        let path =
            std::env::temp_dir().join("splat-gallery-no-such-state.json");
        assert!(RotationState::load(&path).unwrap().is_none());
    }

    #[test]
    fn save_then_load() {
        let path = std::env::temp_dir()
            .join(format!("splat-gallery-state-{}", std::process::id()))
            .join("state.json");
        let state = RotationState::fresh(&catalog(), 26.0);
        state.save(&path).unwrap();
        assert_eq!(RotationState::load(&path).unwrap(), Some(state));
    }

    #[test]
    fn checkpoint_writes_once_per_scene() {
        let path = std::env::temp_dir()
            .join(format!("splat-gallery-checkpoint-{}", std::process::id()))
            .join("state.json");
        let mut checkpoint = StateCheckpoint::new(&path);
        let mut state = RotationState::fresh(&catalog(), 26.0);

        assert!(checkpoint.update(&state).unwrap());
        assert!(!checkpoint.update(&state).unwrap());

        state.current_scene = 1;
        state.prev_cycle_position = 0.25;
        assert!(checkpoint.update(&state).unwrap());
        assert_eq!(RotationState::load(&path).unwrap(), Some(state.clone()));

        // Same scene: the file keeps the earlier snapshot
        state.prev_cycle_position = 0.75;
        assert!(!checkpoint.update(&state).unwrap());
        let on_disk = RotationState::load(&path).unwrap().unwrap();
        assert_eq!(on_disk.prev_cycle_position, 0.25);

        checkpoint.save(&state).unwrap();
        let on_disk = RotationState::load(checkpoint.path()).unwrap();
        assert_eq!(on_disk, Some(state));
    }
}
