//! Scene list and bounding-sphere manifest.
//!
//! The catalog is built once per session from a directory of pre-padded
//! splat files and the `bounds.json` manifest produced by the offline
//! padding pass. Every failure here is soft: a missing directory gives an
//! empty catalog, and a missing or corrupt manifest gives every scene the
//! default sphere.

use std::path::{Path, PathBuf};

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rustc_hash::FxHashMap;

use super::BoundingSphere;
use crate::options::GalleryOptions;

/// One gallery entry.
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    /// File name inside the gallery directory; also the manifest key.
    pub id: String,
    /// Position in the (possibly shuffled) rotation order.
    pub index: usize,
    /// Full path to the asset.
    pub path: PathBuf,
    /// Framing sphere, or [`BoundingSphere::DEFAULT`] when the manifest has
    /// no entry.
    pub sphere: BoundingSphere,
}

/// Bounding spheres keyed by scene file name.
#[derive(Debug, Clone, Default)]
pub struct BoundsManifest {
    spheres: FxHashMap<String, BoundingSphere>,
}

impl BoundsManifest {
    /// Parse manifest JSON (`{"scene.ply": {"center": [..], "radius": r}}`).
    ///
    /// # Errors
    ///
    /// Returns the JSON error when the document is not a map of spheres.
    pub fn parse(json: &str) -> Result<Self, serde_json::Error> {
        let spheres: FxHashMap<String, BoundingSphere> =
            serde_json::from_str(json)?;
        Ok(Self { spheres })
    }

    /// Load a manifest file, falling back to an empty manifest (and a
    /// warning) when it is missing or unreadable.
    #[must_use]
    pub fn load(path: &Path) -> Self {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                log::warn!(
                    "could not read bounds manifest {}: {e}; using default \
                     spheres",
                    path.display()
                );
                return Self::default();
            }
        };
        match Self::parse(&content) {
            Ok(manifest) => {
                log::debug!(
                    "loaded {} bounding spheres from {}",
                    manifest.len(),
                    path.display()
                );
                manifest
            }
            Err(e) => {
                log::warn!(
                    "corrupt bounds manifest {}: {e}; using default spheres",
                    path.display()
                );
                Self::default()
            }
        }
    }

    /// Add or replace one entry.
    pub fn insert(&mut self, id: impl Into<String>, sphere: BoundingSphere) {
        let _ = self.spheres.insert(id.into(), sphere);
    }

    /// Raw entry lookup.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<BoundingSphere> {
        self.spheres.get(id).copied()
    }

    /// Sphere for a scene, falling back to the default when the entry is
    /// absent or not a usable sphere.
    #[must_use]
    pub fn sphere_for(&self, id: &str) -> BoundingSphere {
        match self.get(id) {
            Some(sphere) if sphere.is_valid() => sphere,
            Some(_) => {
                log::warn!("invalid bounding sphere for {id}; using default");
                BoundingSphere::DEFAULT
            }
            None => BoundingSphere::DEFAULT,
        }
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.spheres.len()
    }

    /// Whether the manifest has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.spheres.is_empty()
    }
}

/// Ordered list of scenes for one session. Read-only once built, apart from
/// [`apply_order`](Self::apply_order) when resuming a persisted order.
#[derive(Debug, Clone, Default)]
pub struct SceneCatalog {
    scenes: Vec<Scene>,
}

impl SceneCatalog {
    /// List `dir` for files with `extension`, sort them, optionally shuffle,
    /// and attach spheres from the manifest at `manifest_path`.
    ///
    /// With `shuffle` set, `seed` makes the permutation reproducible; without
    /// a seed the process RNG is used.
    #[must_use]
    pub fn load(
        dir: &Path,
        manifest_path: &Path,
        extension: &str,
        shuffle: bool,
        seed: Option<u64>,
    ) -> Self {
        let mut ids = list_scene_files(dir, extension);
        if ids.is_empty() {
            return Self::default();
        }
        if shuffle {
            shuffle_ids(&mut ids, seed);
        }
        let manifest = BoundsManifest::load(manifest_path);
        if !manifest.is_empty() {
            for id in ids.iter().filter(|id| manifest.get(id).is_none()) {
                log::warn!("no bounding sphere for {id}; using default");
            }
        }
        let catalog = Self::from_ids(dir, ids, &manifest);
        log::info!(
            "gallery catalog: {} scenes from {}",
            catalog.len(),
            dir.display()
        );
        catalog
    }

    /// Catalog described by the gallery section of the options.
    #[must_use]
    pub fn from_options(options: &GalleryOptions) -> Self {
        Self::load(
            &options.directory,
            &options.manifest_path(),
            &options.extension,
            options.shuffle,
            options.seed,
        )
    }

    /// Catalog over explicit ids in the given order.
    pub fn from_ids<I, S>(dir: &Path, ids: I, manifest: &BoundsManifest) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let scenes = ids
            .into_iter()
            .enumerate()
            .map(|(index, id)| {
                let id = id.into();
                Scene {
                    path: dir.join(&id),
                    sphere: manifest.sphere_for(&id),
                    index,
                    id,
                }
            })
            .collect();
        Self { scenes }
    }

    /// Reorder to a previously persisted order. Applies only when `order`
    /// names exactly the scenes in this catalog; returns whether it did.
    pub fn apply_order(&mut self, order: &[String]) -> bool {
        if order.len() != self.scenes.len() {
            return false;
        }
        let mut current: Vec<&str> =
            self.scenes.iter().map(|s| s.id.as_str()).collect();
        let mut wanted: Vec<&str> = order.iter().map(String::as_str).collect();
        current.sort_unstable();
        wanted.sort_unstable();
        if current != wanted {
            return false;
        }

        let mut by_id: FxHashMap<String, Scene> = self
            .scenes
            .drain(..)
            .map(|scene| (scene.id.clone(), scene))
            .collect();
        for (index, id) in order.iter().enumerate() {
            if let Some(mut scene) = by_id.remove(id) {
                scene.index = index;
                self.scenes.push(scene);
            }
        }
        true
    }

    /// Scene ids in rotation order.
    #[must_use]
    pub fn ids(&self) -> Vec<String> {
        self.scenes.iter().map(|s| s.id.clone()).collect()
    }

    /// Scene at a rotation index.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Scene> {
        self.scenes.get(index)
    }

    /// Index after `index`, wrapping. Zero for an empty catalog.
    #[must_use]
    pub fn next_index(&self, index: usize) -> usize {
        if self.scenes.is_empty() {
            0
        } else {
            (index + 1) % self.scenes.len()
        }
    }

    /// Sphere for the scene at `index`, or the default.
    #[must_use]
    pub fn sphere(&self, index: usize) -> BoundingSphere {
        self.get(index).map_or(BoundingSphere::DEFAULT, |s| s.sphere)
    }

    /// Rotation needs at least two scenes.
    #[must_use]
    pub fn can_rotate(&self) -> bool {
        self.scenes.len() >= 2
    }

    /// Iterate scenes in rotation order.
    pub fn iter(&self) -> std::slice::Iter<'_, Scene> {
        self.scenes.iter()
    }

    /// Number of scenes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.scenes.len()
    }

    /// Whether the catalog has no scenes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.scenes.is_empty()
    }
}

impl<'a> IntoIterator for &'a SceneCatalog {
    type Item = &'a Scene;
    type IntoIter = std::slice::Iter<'a, Scene>;

    fn into_iter(self) -> Self::IntoIter {
        self.scenes.iter()
    }
}

/// Sorted file names in `dir` whose extension matches (case-insensitive).
fn list_scene_files(dir: &Path, extension: &str) -> Vec<String> {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            log::warn!("gallery dir not found: {} ({e})", dir.display());
            return Vec::new();
        }
    };

    let mut names = Vec::new();
    for entry in entries.flatten() {
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let matches = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case(extension));
        if !matches {
            continue;
        }
        if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
            names.push(name.to_owned());
        }
    }
    names.sort();
    names
}

fn shuffle_ids(ids: &mut [String], seed: Option<u64>) {
    match seed {
        Some(seed) => ids.shuffle(&mut StdRng::seed_from_u64(seed)),
        None => ids.shuffle(&mut rand::rng()),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use glam::Vec3;

    use super::*;

    /// Fresh scratch directory under the system temp dir.
    fn scratch_dir(tag: &str) -> PathBuf {
        static COUNTER: AtomicUsize = AtomicUsize::new(0);
        let n = COUNTER.fetch_add(1, Ordering::Relaxed);
        let dir = std::env::temp_dir().join(format!(
            "splat-gallery-catalog-{tag}-{}-{n}",
            std::process::id()
        ));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn touch(dir: &Path, name: &str) {
        std::fs::write(dir.join(name), b"ply\n").unwrap();
    }

    #[test]
    fn lists_sorted_by_extension() {
        let dir = scratch_dir("list");
        touch(&dir, "c.ply");
        touch(&dir, "a.PLY");
        touch(&dir, "b.ply");
        touch(&dir, "notes.txt");
        touch(&dir, "bounds.json");

        let catalog = SceneCatalog::load(
            &dir,
            &dir.join("bounds.json"),
            "ply",
            false,
            None,
        );
        assert_eq!(catalog.ids(), vec!["a.PLY", "b.ply", "c.ply"]);
        assert_eq!(catalog.get(2).unwrap().index, 2);
        assert_eq!(catalog.get(1).unwrap().path, dir.join("b.ply"));
    }

    #[test]
    fn missing_directory_gives_empty_catalog() {
        let dir = std::env::temp_dir().join("splat-gallery-does-not-exist");
        let catalog =
            SceneCatalog::load(&dir, &dir.join("bounds.json"), "ply", true, None);
        assert!(catalog.is_empty());
        assert!(!catalog.can_rotate());
    }

    #[test]
    fn manifest_spheres_attach_with_default_fallback() {
        let dir = scratch_dir("manifest");
        touch(&dir, "a.ply");
        touch(&dir, "b.ply");
        std::fs::write(
            dir.join("bounds.json"),
            r#"{"a.ply": {"center": [1.0, 2.0, 3.0], "radius": 7.5}}"#,
        )
        .unwrap();

        let catalog = SceneCatalog::load(
            &dir,
            &dir.join("bounds.json"),
            "ply",
            false,
            None,
        );
        assert_eq!(
            catalog.sphere(0),
            BoundingSphere::new(Vec3::new(1.0, 2.0, 3.0), 7.5)
        );
        assert_eq!(catalog.sphere(1), BoundingSphere::DEFAULT);
    }

    #[test]
    fn corrupt_manifest_falls_back_to_defaults() {
        let dir = scratch_dir("corrupt");
        touch(&dir, "a.ply");
        touch(&dir, "b.ply");
        std::fs::write(dir.join("bounds.json"), "{ not json").unwrap();

        let catalog = SceneCatalog::load(
            &dir,
            &dir.join("bounds.json"),
            "ply",
            false,
            None,
        );
        assert_eq!(catalog.len(), 2);
        assert!(catalog.iter().all(|s| s.sphere == BoundingSphere::DEFAULT));
    }

    #[test]
    fn seeded_shuffle_is_reproducible_permutation() {
        let dir = scratch_dir("shuffle");
        for i in 0..12 {
            touch(&dir, &format!("scene_{i:02}.ply"));
        }
        let manifest = dir.join("bounds.json");
        let a = SceneCatalog::load(&dir, &manifest, "ply", true, Some(7));
        let b = SceneCatalog::load(&dir, &manifest, "ply", true, Some(7));
        assert_eq!(a.ids(), b.ids());

        let mut sorted = a.ids();
        sorted.sort();
        let plain = SceneCatalog::load(&dir, &manifest, "ply", false, None);
        assert_eq!(sorted, plain.ids());
        for (i, scene) in a.iter().enumerate() {
            assert_eq!(scene.index, i);
        }
    }

    #[test]
    fn apply_order_requires_same_scene_set() {
        let manifest = BoundsManifest::default();
        let mut catalog =
            SceneCatalog::from_ids(Path::new("g"), ["a", "b", "c"], &manifest);

        let reordered = vec!["c".to_owned(), "a".to_owned(), "b".to_owned()];
        assert!(catalog.apply_order(&reordered));
        assert_eq!(catalog.ids(), reordered);
        assert_eq!(catalog.get(0).unwrap().index, 0);
        assert_eq!(catalog.get(0).unwrap().id, "c");

        let foreign = vec!["c".to_owned(), "a".to_owned(), "z".to_owned()];
        assert!(!catalog.apply_order(&foreign));
        assert!(!catalog.apply_order(&["a".to_owned()]));
        assert_eq!(catalog.ids(), reordered);
    }

    #[test]
    fn next_index_wraps() {
        let manifest = BoundsManifest::default();
        let catalog =
            SceneCatalog::from_ids(Path::new("g"), ["a", "b", "c"], &manifest);
        assert_eq!(catalog.next_index(0), 1);
        assert_eq!(catalog.next_index(2), 0);
        assert_eq!(SceneCatalog::default().next_index(5), 0);
    }

    #[test]
    fn invalid_manifest_sphere_uses_default() {
        let mut manifest = BoundsManifest::default();
        manifest.insert("bad", BoundingSphere::new(Vec3::ZERO, -3.0));
        assert_eq!(manifest.sphere_for("bad"), BoundingSphere::DEFAULT);
        assert_eq!(manifest.sphere_for("missing"), BoundingSphere::DEFAULT);
    }
}
