//! Workspace configuration

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use shared::{DesignParameters, StlFormat};

use crate::error::Result;

/// File names written by an export
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportNames {
    pub enclosure: String,
    pub lid: String,
    pub manifest: String,
}

impl Default for ExportNames {
    fn default() -> Self {
        Self {
            enclosure: "enclosure.stl".into(),
            lid: "enclosureLid.stl".into(),
            manifest: "positions.txt".into(),
        }
    }
}

/// Enclosure workspace settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnclosureConfig {
    /// Parameters a new workspace starts from
    #[serde(default)]
    pub defaults: DesignParameters,
    /// Directory holding the component STL library
    pub assets_root: PathBuf,
    /// Directory exports are written to
    pub output_dir: PathBuf,
    /// STL encoding for exported solids
    #[serde(default)]
    pub stl_format: StlFormat,
    #[serde(default)]
    pub export_names: ExportNames,
}

impl Default for EnclosureConfig {
    fn default() -> Self {
        Self {
            defaults: DesignParameters::default(),
            assets_root: PathBuf::from("stlfiles"),
            output_dir: PathBuf::from("."),
            stl_format: StlFormat::Binary,
            export_names: ExportNames::default(),
        }
    }
}

impl EnclosureConfig {
    /// Per-user config file location
    pub fn config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "enclosure", "enclosure")
            .map(|dirs| dirs.config_dir().join("config.json"))
    }

    /// Load settings from the per-user file, or return default if not found
    pub fn load() -> Self {
        if let Some(path) = Self::config_path() {
            match Self::load_from(&path) {
                Ok(config) => return config,
                Err(e) if path.exists() => {
                    tracing::warn!("Ignoring unreadable config {}: {e}", path.display());
                }
                Err(_) => {}
            }
        }
        Self::default()
    }

    /// Load settings from an explicit file
    pub fn load_from(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }

    /// Save settings to the per-user file
    pub fn save(&self) -> Result<()> {
        match Self::config_path() {
            Some(path) => self.save_to(&path),
            None => Ok(()),
        }
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }
}
