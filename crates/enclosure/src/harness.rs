//! Headless test harness for programmatic enclosure manipulation.
//!
//! Wraps a [`Workspace`] with an in-memory component library so imports resolve
//! synchronously. Used by the command protocol and the integration tests.

use shared::{ComponentKind, DesignParameters, GroupId, ScrewClass, StlFormat, Transform, VolumeId};

use crate::error::Result;
use crate::export::ExportBundle;
use crate::fixtures;
use crate::import::{load_component, MemoryMeshSource};
use crate::state::NewGroup;
use crate::validation::SolidValidator;
use crate::workspace::Workspace;

/// Headless test harness: workspace, asset library and last tick/export results
pub struct TestHarness {
    pub workspace: Workspace,
    source: MemoryMeshSource,
    last_error: Option<String>,
    last_export: Option<ExportBundle>,
}

impl TestHarness {
    /// Reference enclosure with the fixture component library.
    pub fn new() -> Result<Self> {
        Self::with_params(DesignParameters::default())
    }

    pub fn with_params(params: DesignParameters) -> Result<Self> {
        Ok(Self {
            workspace: Workspace::new(params)?,
            source: fixtures::library_source(),
            last_error: None,
            last_export: None,
        })
    }

    /// Replace the asset library used by later imports.
    pub fn set_source(&mut self, source: MemoryMeshSource) {
        self.source = source;
    }

    // ── Parameters ────────────────────────────────────────────

    pub fn set_parameter(&mut self, name: &str, value: f64) -> Result<()> {
        self.workspace.parameters_mut().set(name, value)
    }

    pub fn set_screw(&mut self, screw: ScrewClass) {
        self.workspace.parameters_mut().set_screw(screw);
    }

    pub fn params(&self) -> &DesignParameters {
        self.workspace.parameters().params()
    }

    // ── Scene manipulation ────────────────────────────────────

    /// Load a library component and add it to the scene in one step.
    pub fn import_component(&mut self, component: ComponentKind) -> Result<GroupId> {
        let id = uuid::Uuid::new_v4().to_string();
        let group = load_component(&self.source, component, &id)?;
        self.add_group(group)
    }

    pub fn add_group(&mut self, group: NewGroup) -> Result<GroupId> {
        self.workspace.scene_mut().add_group(group)
    }

    pub fn remove_group(&mut self, group_id: &str) -> Result<Vec<VolumeId>> {
        self.workspace.remove_group(group_id)
    }

    pub fn toggle_volume(&mut self, volume_id: &str) -> Result<bool> {
        self.workspace.scene_mut().toggle_volume(volume_id)
    }

    pub fn set_group_transform(&mut self, group_id: &str, transform: Transform) -> Result<()> {
        self.workspace.set_group_transform(group_id, transform)
    }

    pub fn set_extra_box_size(
        &mut self,
        group_id: &str,
        length: f64,
        width: f64,
        height: f64,
    ) -> Result<()> {
        self.workspace
            .scene_mut()
            .set_extra_box_size(group_id, length, width, height)
    }

    // ── Tick + export ─────────────────────────────────────────

    /// Run one tick, remembering its error for inspection.
    pub fn tick(&mut self) -> Result<()> {
        let result = self.workspace.tick();
        self.last_error = result.as_ref().err().map(ToString::to_string);
        result
    }

    pub fn export(&mut self, format: StlFormat) -> Result<&ExportBundle> {
        let bundle = self.workspace.export(format)?;
        Ok(&*self.last_export.insert(bundle))
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn last_export(&self) -> Option<&ExportBundle> {
        self.last_export.as_ref()
    }

    // ── Inspection ────────────────────────────────────────────

    pub fn group_count(&self) -> usize {
        self.workspace.scene().groups().len()
    }

    /// Number of volumes in the active subtract set
    pub fn subtract_count(&self) -> usize {
        self.workspace.scene().registry().subtract_ids().len()
    }

    /// Number of volumes in the active add set
    pub fn add_count(&self) -> usize {
        self.workspace.scene().registry().add_ids().len()
    }

    pub fn preview_volume(&self) -> Option<f64> {
        self.workspace.preview().map(|p| p.volume())
    }

    pub fn cavity_extents(&self) -> Option<[f64; 3]> {
        self.workspace
            .enclosure()
            .and_then(|state| state.cavity.geometry.extents())
    }

    /// Errors reported by [`SolidValidator`] for the current preview
    pub fn preview_errors(&self) -> Vec<String> {
        match self.workspace.preview() {
            Some(preview) => SolidValidator::new(preview).validate_all(),
            None => vec!["No preview".to_string()],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_harness_new() {
        let h = TestHarness::new().unwrap();
        assert_eq!(h.group_count(), 0);
        assert_eq!(h.subtract_count(), 4);
        assert_eq!(h.add_count(), 0);
        assert!(h.preview_errors().is_empty());
    }

    #[test]
    fn test_harness_import_and_remove() {
        let mut h = TestHarness::new().unwrap();
        let id = h.import_component(ComponentKind::ArduinoUno).unwrap();
        assert_eq!(h.group_count(), 1);
        assert_eq!(h.subtract_count(), 4 + 6);
        assert_eq!(h.add_count(), 1);

        let removed = h.remove_group(&id).unwrap();
        assert_eq!(removed.len(), 8);
        assert_eq!(h.subtract_count(), 4);
        assert_eq!(h.add_count(), 0);
    }

    #[test]
    fn test_harness_records_tick_error() {
        let mut h = TestHarness::new().unwrap();
        h.set_parameter("wall_thickness", 60.0).unwrap();
        assert!(h.tick().is_err());
        assert!(h.last_error().unwrap().contains("invalid parameters"));
        h.set_parameter("wall_thickness", 4.0).unwrap();
        h.tick().unwrap();
        assert!(h.last_error().is_none());
    }
}
