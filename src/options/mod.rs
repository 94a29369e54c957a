//! Centralized gallery options with TOML file support.
//!
//! All tweakable settings (gallery source, rotation timing, camera framing)
//! are consolidated here. Options serialize to/from TOML so an installation
//! can be retuned without rebuilding.

mod camera;
mod gallery;
mod rotation;

use std::path::Path;

pub use camera::CameraOptions;
pub use gallery::GalleryOptions;
pub use rotation::RotationOptions;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::GalleryError;

/// Top-level options container. All sub-structs use `#[serde(default)]` so
/// partial TOML files (e.g. only overriding `[rotation]`) work correctly.
#[derive(
    Debug, Clone, Serialize, Deserialize, PartialEq, Default, JsonSchema,
)]
#[serde(default)]
pub struct Options {
    /// Scene source and ordering.
    pub gallery: GalleryOptions,
    /// Cycle and crossfade timing.
    pub rotation: RotationOptions,
    /// Camera framing parameters.
    pub camera: CameraOptions,
}

impl Options {
    /// Generate JSON Schema describing the tunable options.
    #[must_use]
    pub fn json_schema() -> schemars::Schema {
        schemars::schema_for!(Options)
    }

    /// Load options from a TOML file. Missing fields use defaults.
    ///
    /// # Errors
    ///
    /// Returns [`GalleryError::Io`] when the file cannot be read and
    /// [`GalleryError::OptionsParse`] when it is not valid options TOML.
    pub fn load(path: &Path) -> Result<Self, GalleryError> {
        let content = std::fs::read_to_string(path).map_err(GalleryError::Io)?;
        toml::from_str(&content)
            .map_err(|e| GalleryError::OptionsParse(e.to_string()))
    }

    /// Load options if the file exists, otherwise defaults.
    ///
    /// # Errors
    ///
    /// Same as [`load`](Self::load) for a file that exists.
    pub fn load_or_default(path: &Path) -> Result<Self, GalleryError> {
        if path.exists() {
            Self::load(path)
        } else {
            log::info!(
                "options file {} not found, using defaults",
                path.display()
            );
            Ok(Self::default())
        }
    }

    /// Save options to a TOML file (pretty-printed).
    ///
    /// # Errors
    ///
    /// Returns [`GalleryError`] on serialization or write failure.
    pub fn save(&self, path: &Path) -> Result<(), GalleryError> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| GalleryError::OptionsParse(e.to_string()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(GalleryError::Io)?;
        }
        std::fs::write(path, content).map_err(GalleryError::Io)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_round_trips_through_toml() {
        let opts = Options::default();
        let toml_str = toml::to_string_pretty(&opts).unwrap();
        let parsed: Options = toml::from_str(&toml_str).unwrap();
        assert_eq!(opts, parsed);
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let toml_str = r"
[rotation]
blend_duration = 8.0
";
        let opts: Options = toml::from_str(toml_str).unwrap();
        assert_eq!(opts.rotation.blend_duration, 8.0);
        // Everything else should be default
        assert_eq!(opts.rotation.jitter_tolerance, 0.1);
        assert_eq!(opts.camera.elevation, 20.0);
        assert!(opts.gallery.shuffle);
    }

    #[test]
    fn gallery_section_parses_paths_and_seed() {
        let toml_str = r#"
[gallery]
directory = "/srv/splats"
shuffle = false
seed = 42
"#;
        let opts: Options = toml::from_str(toml_str).unwrap();
        assert_eq!(opts.gallery.seed, Some(42));
        assert!(!opts.gallery.shuffle);
        assert_eq!(
            opts.gallery.manifest_path(),
            Path::new("/srv/splats/bounds.json")
        );
    }

    #[test]
    fn invalid_toml_is_options_parse_error() {
        let dir = std::env::temp_dir().join(format!(
            "splat-gallery-options-{}",
            std::process::id()
        ));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("broken.toml");
        std::fs::write(&path, "[rotation\nblend_duration = ").unwrap();
        assert!(matches!(
            Options::load(&path),
            Err(GalleryError::OptionsParse(_))
        ));
    }

    #[test]
    fn save_then_load() {
        let dir = std::env::temp_dir().join(format!(
            "splat-gallery-options-save-{}",
            std::process::id()
        ));
        let path = dir.join("nested").join("gallery.toml");
        let mut opts = Options::default();
        opts.camera.orbit_speed = 4.0;
        opts.gallery.seed = Some(9);
        opts.save(&path).unwrap();
        assert_eq!(Options::load(&path).unwrap(), opts);
    }

    #[test]
    fn schema_has_expected_properties() {
        let schema_value =
            serde_json::to_value(Options::json_schema()).unwrap();
        let props = schema_value["properties"].as_object().unwrap();

        assert!(props.contains_key("gallery"));
        assert!(props.contains_key("rotation"));
        assert!(props.contains_key("camera"));

        // Internal thresholds are skipped from the schema
        let rotation = &props["rotation"]["properties"];
        assert!(rotation.get("blend_duration").is_some());
        assert!(rotation.get("jitter_tolerance").is_none());
    }
}
