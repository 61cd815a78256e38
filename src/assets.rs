//! Asset catalog: the fixed (class, id) -> PNG path mapping
//!
//! The catalog is built once at startup and verifies that every declared
//! asset file exists, so a missing sprite fails the boot instead of
//! surfacing as a runtime decode error.

use image::RgbaImage;
use std::collections::HashMap;
use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Error type for catalog construction and asset loading
#[derive(Debug, Error)]
pub enum AssetError {
    /// A declared asset file does not exist on disk
    #[error("missing asset file: {0}")]
    Missing(PathBuf),
    /// An id outside the declared range was requested
    #[error("unknown {class:?} asset id {id}")]
    UnknownId { class: AssetClass, id: i64 },
    /// PNG decode failed
    #[error("failed to decode {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

/// The two sprite families the service knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssetClass {
    Icon,
    Overlay,
}

impl AssetClass {
    /// Inclusive id range of the class.
    pub fn id_range(self) -> RangeInclusive<i64> {
        match self {
            AssetClass::Icon => -4..=8,
            AssetClass::Overlay => 1..=14,
        }
    }

    fn dir(self) -> &'static str {
        match self {
            AssetClass::Icon => "icons",
            AssetClass::Overlay => "overlays",
        }
    }
}

/// Immutable mapping from (class, id) to an on-disk PNG, shared read-only
/// across requests.
#[derive(Debug, Clone)]
pub struct AssetCatalog {
    paths: HashMap<(AssetClass, i64), PathBuf>,
}

impl AssetCatalog {
    /// Build the catalog under `assets_dir`, verifying every declared id's
    /// file exists.
    pub fn open(assets_dir: &Path) -> Result<Self, AssetError> {
        let mut paths = HashMap::new();
        for class in [AssetClass::Icon, AssetClass::Overlay] {
            for id in class.id_range() {
                let path = assets_dir.join(class.dir()).join(format!("{id}.png"));
                if !path.is_file() {
                    return Err(AssetError::Missing(path));
                }
                paths.insert((class, id), path);
            }
        }
        Ok(Self { paths })
    }

    /// Path of a declared asset, if the id is in range.
    pub fn path(&self, class: AssetClass, id: i64) -> Option<&Path> {
        self.paths.get(&(class, id)).map(PathBuf::as_path)
    }

    /// Decode an asset into a fresh RGBA buffer owned by the caller.
    pub fn load(&self, class: AssetClass, id: i64) -> Result<RgbaImage, AssetError> {
        let path = self
            .path(class, id)
            .ok_or(AssetError::UnknownId { class, id })?;
        let image = image::open(path)
            .map_err(|source| AssetError::Decode {
                path: path.to_path_buf(),
                source,
            })?
            .to_rgba8();
        Ok(image)
    }
}
