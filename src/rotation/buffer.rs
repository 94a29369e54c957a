//! Two-slot scene buffer.
//!
//! One slot is on screen while the other receives the next scene. The
//! controller only decides *when* to load and *what*; the scheduler
//! dispatches the command to the host and commits it on success.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::scene::{BoundingSphere, SceneCatalog};

/// One of the two renderer inputs.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize,
)]
pub enum Slot {
    /// Slot 0.
    #[default]
    A,
    /// Slot 1.
    B,
}

impl Slot {
    /// Slot id as published on the blend channel.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::A => 0,
            Self::B => 1,
        }
    }

    /// The other slot.
    #[must_use]
    pub const fn other(self) -> Self {
        match self {
            Self::A => Self::B,
            Self::B => Self::A,
        }
    }

    /// Slot id as a blend value.
    #[must_use]
    pub fn as_f32(self) -> f32 {
        self.index() as f32
    }

    /// Slot for a blend value that sits exactly on a slot id.
    #[must_use]
    pub fn from_blend(value: f32) -> Option<Self> {
        if value == 0.0 {
            Some(Self::A)
        } else if value == 1.0 {
            Some(Self::B)
        } else {
            None
        }
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "slot {}", self.index())
    }
}

/// "Load scene X into slot N".
#[derive(Debug, Clone, PartialEq)]
pub struct LoadCommand {
    /// Destination slot (always the inactive one for preloads).
    pub slot: Slot,
    /// Catalog index of the scene.
    pub scene_index: usize,
    /// Scene id, for logging and bookkeeping.
    pub scene_id: String,
    /// Framing sphere of the scene, becomes the pending target sphere.
    pub sphere: BoundingSphere,
}

/// Active/inactive slot bookkeeping.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DoubleBuffer {
    active: Slot,
    preloaded: bool,
    loaded: [Option<String>; 2],
}

impl DoubleBuffer {
    /// Empty buffer with slot A active.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Slot currently on screen.
    #[must_use]
    pub fn active(&self) -> Slot {
        self.active
    }

    /// Slot receiving the next scene.
    #[must_use]
    pub fn inactive(&self) -> Slot {
        self.active.other()
    }

    /// Whether the inactive slot holds the next scene.
    #[must_use]
    pub fn is_preloaded(&self) -> bool {
        self.preloaded
    }

    /// Forget what the slots hold. Used when a new host takes over.
    pub fn clear_loads(&mut self) {
        self.loaded = [None, None];
    }

    /// Scene id last loaded into `slot`.
    #[must_use]
    pub fn loaded(&self, slot: Slot) -> Option<&str> {
        self.loaded[slot.index()].as_deref()
    }

    /// Decide whether to preload this tick.
    ///
    /// Fires at most once per cycle: not while already preloaded, blending,
    /// or waiting on the consistency gate, and only once the cycle is past
    /// `threshold` so a fresh swap is not immediately followed by a load.
    #[must_use]
    pub fn maybe_preload(
        &self,
        cycle_position: f32,
        blending: bool,
        waiting: bool,
        catalog: &SceneCatalog,
        current_scene: usize,
        threshold: f32,
    ) -> Option<LoadCommand> {
        if self.preloaded || blending || waiting || cycle_position <= threshold
        {
            return None;
        }
        let scene_index = catalog.next_index(current_scene);
        let scene = catalog.get(scene_index)?;
        Some(LoadCommand {
            slot: self.inactive(),
            scene_index,
            scene_id: scene.id.clone(),
            sphere: scene.sphere,
        })
    }

    /// Record a successfully dispatched preload.
    pub fn commit(&mut self, command: &LoadCommand) {
        self.record_load(command.slot, &command.scene_id);
        self.preloaded = command.slot == self.inactive();
    }

    /// Record that `slot` now holds `scene_id`, without touching the
    /// preload flag.
    pub fn record_load(&mut self, slot: Slot, scene_id: &str) {
        self.loaded[slot.index()] = Some(scene_id.to_owned());
    }

    /// Set the preload flag directly (session start and resume).
    pub fn set_preloaded(&mut self, preloaded: bool) {
        self.preloaded = preloaded;
    }

    /// Detect a timer restart and clear the preload flag for it.
    ///
    /// A restart is a drop of more than `tolerance` below the previous
    /// position; smaller backward steps are clock jitter. While blending the
    /// blend owns the upcoming swap, so the flag is left alone. Returns
    /// whether a restart was seen.
    pub fn on_cycle_reset(
        &mut self,
        cycle_position: f32,
        prev_cycle_position: f32,
        blending: bool,
        tolerance: f32,
    ) -> bool {
        let reset = cycle_position < prev_cycle_position - tolerance;
        if reset && !blending {
            self.preloaded = false;
        }
        reset
    }

    /// Complete a crossfade: the inactive slot goes on screen and the
    /// preload flag clears. Returns the new active slot.
    pub fn swap(&mut self) -> Slot {
        self.active = self.active.other();
        self.preloaded = false;
        self.active
    }
}
