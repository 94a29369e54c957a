//! Scene rotation: double buffering, crossfade, and the consistency gate.
//!
//! [`RotationScheduler`] is the entry point. Each call to
//! [`RotationScheduler::tick`] runs, in order:
//!
//! 1. actions deferred from the previous tick
//! 2. the consistency gate poll
//! 3. cycle-reset detection and the preload decision
//! 4. the crossfade step (and the slot swap when it completes)
//! 5. camera framing
//! 6. publication of the finished [`OutputFrame`]
//!
//! All persisted state lives in [`RotationState`], which can be saved
//! between sessions.

pub mod buffer;
pub mod crossfade;
pub mod deferred;
pub mod gate;
pub mod output;
pub mod scheduler;
pub mod state;


pub use buffer::{DoubleBuffer, LoadCommand, Slot};
pub use crossfade::{blend_control, BlendStep, Crossfade, CrossfadePhase};
pub use deferred::{DeferredAction, DeferredQueue};
pub use gate::{ConsistencyGate, Fingerprint};
pub use output::{output_channel, OutputFrame, OutputReader, CHANNEL_NAMES};
pub use scheduler::{RotationScheduler, TickInput};
pub use state::{RotationState, StateCheckpoint, STATE_VERSION};
