//! Gallery scenes and their framing spheres.
//!
//! [`SceneCatalog`] holds the rotation order for a session; every
//! [`Scene`] carries the [`BoundingSphere`] the camera frames it with.

pub mod catalog;
mod sphere;

pub use catalog::{BoundsManifest, Scene, SceneCatalog};
pub use sphere::BoundingSphere;
