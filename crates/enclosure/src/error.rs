//! Error taxonomy for the enclosure core.

use std::path::PathBuf;

use shared::{ParameterError, VolumeId};
use thiserror::Error;

/// Top-level error type for enclosure modeling, import and export.
#[derive(Debug, Error)]
pub enum EnclosureError {
    /// Parameters that would produce a degenerate or inverted enclosure.
    #[error("invalid parameters: {0}")]
    InvalidParameters(String),

    /// A bounded setter rejected its input.
    #[error(transparent)]
    Parameter(#[from] ParameterError),

    #[error("boolean evaluation failed on '{operand}': {reason}")]
    BooleanEvaluation { operand: String, reason: String },

    #[error("import of '{}' failed: {reason}", path.display())]
    Import { path: PathBuf, reason: String },

    /// Operation on a volume that was never registered or was already removed.
    #[error("stale volume reference: {0}")]
    StaleReference(VolumeId),

    #[error("unknown component group: {0}")]
    UnknownGroup(String),

    #[error("component group {0} already exists")]
    DuplicateGroup(String),

    #[error("no component asset source is attached")]
    NoAssetSource,

    #[error("volume {0} is already registered")]
    DuplicateVolume(VolumeId),

    #[error("volume {id} of kind {kind} cannot join a boolean set")]
    NotRegistrable { id: VolumeId, kind: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl EnclosureError {
    pub(crate) fn boolean(operand: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::BooleanEvaluation {
            operand: operand.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn import(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::Import {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

/// Convenience type alias for results using [`EnclosureError`].
pub type Result<T> = std::result::Result<T, EnclosureError>;
