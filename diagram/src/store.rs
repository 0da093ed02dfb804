use std::fs;
use std::path::PathBuf;

use diagram_core::{AssetError, AssetName, AssetStore};

/// Reads `<dir>/<file_name>` for each asset.
pub struct DirAssets {
    dir: PathBuf,
}

impl DirAssets {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        DirAssets { dir: dir.into() }
    }
}

impl AssetStore for DirAssets {
    fn load(&self, name: AssetName) -> Result<String, AssetError> {
        let path = self.dir.join(name.file_name());
        fs::read_to_string(&path).map_err(|e| AssetError::Load {
            name: path.display().to_string(),
            reason: e.to_string(),
        })
    }
}
