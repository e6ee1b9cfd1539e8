//! Application asset store
//!
//! Both playback backends resolve tracks by logical name against a store of
//! bundled assets. Two stores exist: [`AssetPack`], a single packaged file
//! whose table of contents maps names to offset + length regions, and
//! [`DirAssets`], plain files under a directory. The backends only require
//! "given a name, obtain the bytes"; which store is in use is a deployment
//! decision.

mod pack;

pub use pack::{pack_bytes, write_pack, AssetPack, PackRegion};

use crate::{MusicError, Result};
use std::path::{Path, PathBuf};

/// A source of bundled application assets, addressed by logical name.
pub trait AssetSource {
    /// Read the full contents of the named asset.
    fn read(&self, name: &str) -> Result<Vec<u8>>;

    /// Check whether the named asset exists in this store.
    fn contains(&self, name: &str) -> bool;
}

/// Asset store backed by loose files under a directory.
#[derive(Debug, Clone)]
pub struct DirAssets {
    root: PathBuf,
}

impl DirAssets {
    /// Create a store rooted at `root`. The directory is not scanned up
    /// front; names are resolved on each read.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        DirAssets { root: root.into() }
    }

    /// The directory this store reads from.
    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl AssetSource for DirAssets {
    fn read(&self, name: &str) -> Result<Vec<u8>> {
        let path = self.root.join(name);
        std::fs::read(&path)
            .map_err(|e| MusicError::Asset(format!("Failed to read '{}': {}", path.display(), e)))
    }

    fn contains(&self, name: &str) -> bool {
        self.root.join(name).is_file()
    }
}

/// Resolve a track name prefix against a store by trying candidate
/// extensions in order.
///
/// Returns the first matching asset name and its bytes. Resolution happens
/// fresh on every call; nothing is cached across calls.
pub fn resolve_track(
    assets: &dyn AssetSource,
    track: &str,
    extensions: &[&str],
) -> Result<(String, Vec<u8>)> {
    for ext in extensions {
        let name = format!("{track}{ext}");
        if assets.contains(&name) {
            let data = assets.read(&name)?;
            return Ok((name, data));
        }
    }
    Err(MusicError::Asset(format!(
        "No asset found for track '{}' (tried extensions: {})",
        track,
        extensions.join(", ")
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    struct MapAssets(Vec<(String, Vec<u8>)>);

    impl AssetSource for MapAssets {
        fn read(&self, name: &str) -> Result<Vec<u8>> {
            self.0
                .iter()
                .find(|(n, _)| n == name)
                .map(|(_, d)| d.clone())
                .ok_or_else(|| MusicError::Asset(format!("missing '{name}'")))
        }

        fn contains(&self, name: &str) -> bool {
            self.0.iter().any(|(n, _)| n == name)
        }
    }

    #[test]
    fn resolve_track_tries_extensions_in_order() {
        let assets = MapAssets(vec![
            ("level 1.mp3".to_string(), vec![1]),
            ("level 1.ogg".to_string(), vec![2]),
        ]);

        let (name, data) = resolve_track(&assets, "level 1", &[".ogg", ".mp3"]).unwrap();
        assert_eq!(name, "level 1.ogg");
        assert_eq!(data, vec![2]);
    }

    #[test]
    fn resolve_track_reports_missing() {
        let assets = MapAssets(vec![]);
        let err = resolve_track(&assets, "level 9", &[".ogg"]).unwrap_err();
        assert!(matches!(err, MusicError::Asset(_)));
    }

    #[test]
    fn dir_assets_reports_missing_file() {
        let assets = DirAssets::new("this/path/does/not/exist");
        assert!(!assets.contains("level 1.ogg"));
        assert!(assets.read("level 1.ogg").is_err());
    }
}
