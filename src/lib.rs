// -- Lint policy ---------------------------------------------------------
// This is the single source of truth for crate-wide lints.

// Broad lint groups
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![deny(clippy::nursery)]
// Documentation
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]
#![deny(rustdoc::bare_urls)]
// No panicking in library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]
// No debug/print artifacts
#![deny(clippy::dbg_macro)]
#![deny(clippy::print_stdout)]
#![deny(clippy::print_stderr)]
// Import hygiene
#![deny(clippy::wildcard_imports)]
// Complexity limits (thresholds in clippy.toml)
#![deny(clippy::cognitive_complexity)]
#![deny(clippy::too_many_lines)]
#![deny(clippy::excessive_nesting)]
// Function signature hygiene
#![deny(clippy::too_many_arguments)]
#![deny(clippy::fn_params_excessive_bools)]
// Clone / pass-by-value hygiene
#![deny(clippy::needless_pass_by_value)]
#![deny(clippy::implicit_clone)]
// String hygiene
#![deny(clippy::inefficient_to_string)]
#![deny(clippy::redundant_closure_for_method_calls)]
#![deny(clippy::manual_string_new)]
#![deny(clippy::str_to_string)]
// Cargo lints (warn, not deny since cargo lints can be noisy)
#![warn(clippy::cargo)]
// Unused / redundant code
#![deny(unused_results)]
#![deny(unused_qualifications)]
// Cast hygiene
#![deny(trivial_casts)]
#![deny(trivial_numeric_casts)]

//! Double-buffered scene rotation for live Gaussian-splat installations.
//!
//! A gallery of pre-padded splat scenes is streamed into a renderer one
//! scene at a time. While one scene is on screen the next is preloaded into
//! the idle buffer slot; at the end of every timer cycle the two slots are
//! cross-faded and the camera re-frames itself around the incoming scene's
//! bounding sphere.
//!
//! # Key entry points
//!
//! - [`rotation::RotationScheduler`] - the per-tick state machine
//! - [`scene::SceneCatalog`] - scene list plus bounding-sphere manifest
//! - [`camera::CameraFraming`] - sphere to camera pose mapping
//! - [`host::Host`] - the renderer-side collaborator interface
//! - [`options::Options`] - TOML configuration
//!
//! # Architecture
//!
//! The scheduler is ticked once per rendered frame with the wall-clock time
//! and the normalized position of an external cycle timer. It never blocks
//! and never fails: collaborator errors are logged and retried on a later
//! tick. Each tick builds a complete [`rotation::OutputFrame`] and publishes
//! it through a lock-free triple buffer, so readers never observe a
//! half-written set of channels.
//!
//! Work that depends on the renderer's lazily recomputed data (rest-position
//! regeneration after a swap) goes through a change-detection gate and a
//! one-tick deferred queue instead of firing inline.

pub mod camera;
pub mod error;
pub mod host;
pub mod options;
pub mod rotation;
pub mod scene;
pub mod util;
