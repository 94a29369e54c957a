//! Camera framing for gallery scenes.
//!
//! Converts each scene's bounding sphere into an orbiting camera pose so
//! framing adapts to scene size.

pub mod framing;

pub use framing::{vertical_fov, CameraFraming, CameraLens, CameraPose};
