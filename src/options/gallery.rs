use std::path::PathBuf;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Gallery", inline)]
#[serde(default)]
/// Where scenes come from and in which order they play.
pub struct GalleryOptions {
    /// Directory holding the padded scene files.
    pub directory: PathBuf,
    /// Bounds manifest; defaults to `bounds.json` inside `directory`.
    pub manifest: Option<PathBuf>,
    /// Scene file extension (case-insensitive).
    pub extension: String,
    /// Shuffle the rotation order when a fresh session starts.
    #[schemars(title = "Shuffle")]
    pub shuffle: bool,
    /// Seed for a reproducible shuffle.
    pub seed: Option<u64>,
    /// Where the rotation state snapshot is kept between runs.
    pub state_file: Option<PathBuf>,
}

impl GalleryOptions {
    /// Resolved manifest path.
    #[must_use]
    pub fn manifest_path(&self) -> PathBuf {
        self.manifest
            .clone()
            .unwrap_or_else(|| self.directory.join("bounds.json"))
    }
}

impl Default for GalleryOptions {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("assets/gallery_padded"),
            manifest: None,
            extension: "ply".to_owned(),
            shuffle: true,
            seed: None,
            state_file: None,
        }
    }
}
