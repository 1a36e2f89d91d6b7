//! Placement manifest

use std::io::Write;

use shared::{ComponentKind, ComponentPlacement, DesignParameters, EnclosureRecord, ManifestEntry};

use crate::error::Result;
use crate::state::ComponentGroup;

/// One placement per device group, then the enclosure record.
///
/// Additional-geometry boxes are part of the enclosure, not placed devices.
pub fn build_manifest(groups: &[ComponentGroup], params: &DesignParameters) -> Vec<ManifestEntry> {
    groups
        .iter()
        .filter(|group| group.component != ComponentKind::AdditionalCube)
        .map(|group| {
            ManifestEntry::Component(ComponentPlacement {
                name: group.name.clone(),
                position: group.transform.position,
                rotation: group.transform.rotation,
            })
        })
        .chain(std::iter::once(ManifestEntry::Enclosure(EnclosureRecord::from(params))))
        .collect()
}

/// Pretty JSON text of a manifest
pub fn manifest_json(entries: &[ManifestEntry]) -> Result<String> {
    Ok(serde_json::to_string_pretty(entries)?)
}

/// Write a manifest verbatim to an external sink
pub fn write_manifest<W: Write>(sink: &mut W, entries: &[ManifestEntry]) -> Result<()> {
    serde_json::to_writer_pretty(&mut *sink, entries)?;
    sink.flush()?;
    Ok(())
}
