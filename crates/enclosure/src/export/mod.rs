//! Export artifacts: STL solids and the placement manifest.

mod manifest;
pub mod stl;

pub use manifest::{build_manifest, manifest_json, write_manifest};
pub use stl::encode_solid;

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::state::ExportNames;

/// Serialized output of one export request.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportBundle {
    pub enclosure: Vec<u8>,
    pub lid: Vec<u8>,
    pub manifest: String,
}

impl ExportBundle {
    /// Write the three artifacts into `dir`, creating it if needed.
    pub fn write_to_dir(&self, dir: &Path, names: &ExportNames) -> Result<Vec<PathBuf>> {
        fs::create_dir_all(dir)?;
        let files = [
            (dir.join(&names.enclosure), self.enclosure.as_slice()),
            (dir.join(&names.lid), self.lid.as_slice()),
            (dir.join(&names.manifest), self.manifest.as_bytes()),
        ];
        let mut written = Vec::with_capacity(files.len());
        for (path, bytes) in files {
            fs::write(&path, bytes)?;
            tracing::info!("Wrote {} ({} bytes)", path.display(), bytes.len());
            written.push(path);
        }
        Ok(written)
    }
}
