//! Tick pipeline.
//!
//! [`Workspace`] owns the parameter store, the scene, the derived enclosure and the
//! preview solid. Each [`Workspace::tick`] applies finished imports, re-derives the
//! enclosure, disposes the previous geometry, re-binds the screw posts in the
//! registry, stretches wall bosses and evaluates the preview. Exports read the
//! state left by the last tick and never mutate it.

use std::sync::Arc;

use shared::{
    ComponentKind, DesignParameters, GroupId, ScrewWarning, StlFormat, Transform, VolumeId,
};
use tokio::runtime::Handle;

use crate::attachment::AttachmentScaler;
use crate::build::{BooleanComposer, Operand, Solid};
use crate::error::{EnclosureError, Result};
use crate::export::{build_manifest, encode_solid, manifest_json, ExportBundle};
use crate::geometry::{EnclosureGeometryBuilder, EnclosureState, Volume};
use crate::import::{ImportOutcome, ImportQueue, MeshSource};
use crate::state::{ParameterStore, Scene};

/// An import that finished but could not be applied.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportFailure {
    pub group_id: GroupId,
    pub component: ComponentKind,
    pub error: String,
}

pub struct Workspace {
    parameters: ParameterStore,
    scene: Scene,
    enclosure: Option<EnclosureState>,
    preview: Option<Solid>,
    composer: BooleanComposer,
    imports: Option<ImportQueue>,
    import_failures: Vec<ImportFailure>,
    last_warning: Option<ScrewWarning>,
    ticks: u64,
}

impl Workspace {
    /// Derive the enclosure for `params`, register its screw posts and run a first tick.
    pub fn new(params: DesignParameters) -> Result<Self> {
        let mut parameters = ParameterStore::default();
        parameters.replace(params)?;
        let state = EnclosureGeometryBuilder::derive(parameters.params())?;

        let mut scene = Scene::default();
        for post in &state.screw_posts {
            scene.registry_mut().register(post.clone(), None, false)?;
        }

        let mut workspace = Self {
            parameters,
            scene,
            enclosure: None,
            preview: None,
            composer: BooleanComposer::new(),
            imports: None,
            import_failures: Vec::new(),
            last_warning: None,
            ticks: 0,
        };
        workspace.tick()?;
        Ok(workspace)
    }

    /// Attach an asset source; component imports run on `handle`'s blocking pool.
    pub fn with_imports(mut self, source: Arc<dyn MeshSource>, handle: Handle) -> Self {
        self.imports = Some(ImportQueue::new(source, handle));
        self
    }

    // ── Accessors ─────────────────────────────────────────────

    pub fn parameters(&self) -> &ParameterStore {
        &self.parameters
    }

    /// Setters take effect on the next tick.
    pub fn parameters_mut(&mut self) -> &mut ParameterStore {
        &mut self.parameters
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    /// Enclosure volumes derived by the last successful tick
    pub fn enclosure(&self) -> Option<&EnclosureState> {
        self.enclosure.as_ref()
    }

    /// Shell minus cavity from the last successful tick
    pub fn preview(&self) -> Option<&Solid> {
        self.preview.as_ref()
    }

    pub fn composer(&self) -> &BooleanComposer {
        &self.composer
    }

    pub fn import_failures(&self) -> &[ImportFailure] {
        &self.import_failures
    }

    /// Drain the failures recorded since the last call.
    pub fn take_import_failures(&mut self) -> Vec<ImportFailure> {
        std::mem::take(&mut self.import_failures)
    }

    pub fn screw_warning(&self) -> Option<&ScrewWarning> {
        self.last_warning.as_ref()
    }

    /// Number of completed ticks
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    // ── Tick ──────────────────────────────────────────────────

    /// Run one pass of the pipeline.
    ///
    /// Every fallible step runs before anything is swapped, so a failing tick leaves
    /// the previous enclosure, preview and registry bindings in place.
    pub fn tick(&mut self) -> Result<()> {
        self.drain_imports();

        let mut state = EnclosureGeometryBuilder::derive(self.parameters.params())?;
        let preview = self
            .composer
            .preview_tick(&mut state.shell, &mut state.cavity)?;
        let scales = self.attachment_scales()?;
        self.update_warning();

        self.rebind_posts(&state)?;
        for (id, scale) in scales {
            let current = self
                .scene
                .registry()
                .get(&id)
                .map(|entry| entry.volume.transform.scale);
            if current != Some(scale) {
                tracing::debug!("Attachment {} extrudes to {}", id, scale[2]);
                self.scene.registry_mut().set_scale(&id, scale)?;
            }
        }

        if let Some(old) = self.enclosure.replace(state) {
            old.dispose();
        }
        self.preview = Some(preview);
        self.ticks += 1;
        Ok(())
    }

    fn update_warning(&mut self) {
        let warning = self.parameters.screw_warning();
        if warning != self.last_warning {
            if let Some(w) = &warning {
                tracing::warn!("{}", w);
            }
            self.last_warning = warning;
        }
    }

    /// Point the post slots at freshly derived geometry.
    ///
    /// A slot that was unregistered comes back visible.
    fn rebind_posts(&mut self, state: &EnclosureState) -> Result<()> {
        let registry = self.scene.registry_mut();
        for post in &state.screw_posts {
            if registry.contains(&post.id) {
                registry.replace_geometry(
                    &post.id,
                    post.geometry.clone(),
                    post.transform.clone(),
                )?;
            } else {
                tracing::info!("Restoring screw post {}", post.id);
                registry.register(post.clone(), None, false)?;
            }
        }
        Ok(())
    }

    /// Extrusion scale of every attached volume for its current world pose.
    fn attachment_scales(&self) -> Result<Vec<(VolumeId, [f64; 3])>> {
        let scaler = AttachmentScaler::for_params(self.parameters.params());
        self.scene
            .registry()
            .attached_ids()
            .into_iter()
            .map(|id| {
                let pose = self.scene.world_pose(&id)?;
                Ok((id, [1.0, 1.0, scaler.resolve(&pose)]))
            })
            .collect()
    }

    // ── Imports ───────────────────────────────────────────────

    /// Start loading a library component; it joins the scene on a later tick.
    pub fn request_import(&mut self, component: ComponentKind) -> Result<GroupId> {
        let queue = self.imports.as_mut().ok_or(EnclosureError::NoAssetSource)?;
        Ok(queue.request(component))
    }

    pub fn is_import_pending(&self, group_id: &str) -> bool {
        self.imports
            .as_ref()
            .is_some_and(|queue| queue.is_pending(group_id))
    }

    pub fn pending_imports(&self) -> usize {
        self.imports.as_ref().map_or(0, ImportQueue::pending_count)
    }

    /// Remove a group, or cancel it if its import has not finished yet.
    ///
    /// Returns the identities of the unregistered volumes.
    pub fn remove_group(&mut self, group_id: &str) -> Result<Vec<VolumeId>> {
        if let Some(queue) = self.imports.as_mut() {
            if queue.cancel(group_id) {
                return Ok(Vec::new());
            }
        }
        self.scene.remove_group(group_id)
    }

    /// Apply a finished load if its group is still wanted.
    ///
    /// Returns true when the group was added to the scene.
    pub fn apply_import(&mut self, outcome: ImportOutcome) -> bool {
        let wanted = self
            .imports
            .as_mut()
            .is_some_and(|queue| queue.claim(&outcome));
        if !wanted {
            tracing::debug!(
                "Discarding {} import for removed group {}",
                outcome.component.display_name(),
                outcome.group_id
            );
            return false;
        }

        let ImportOutcome {
            group_id,
            component,
            result,
        } = outcome;
        let applied = result.and_then(|group| self.scene.add_group(group));
        match applied {
            Ok(id) => {
                tracing::info!("Added {} as group {}", component.display_name(), id);
                true
            }
            Err(e) => {
                tracing::warn!("Import of {} failed: {}", component.display_name(), e);
                self.import_failures.push(ImportFailure {
                    group_id,
                    component,
                    error: e.to_string(),
                });
                false
            }
        }
    }

    /// Wait until every still-wanted import has been applied or has failed.
    pub async fn wait_for_imports(&mut self) {
        loop {
            let Some(queue) = self.imports.as_mut() else {
                return;
            };
            if queue.pending_count() == 0 {
                return;
            }
            let Some(outcome) = queue.next().await else {
                return;
            };
            self.apply_import(outcome);
        }
    }

    fn drain_imports(&mut self) {
        while let Some(outcome) = self.imports.as_mut().and_then(ImportQueue::try_next) {
            self.apply_import(outcome);
        }
    }

    // ── Export ────────────────────────────────────────────────

    /// Full evaluation of enclosure and lid plus the placement manifest.
    pub fn export(&self, format: StlFormat) -> Result<ExportBundle> {
        let (enclosure, lid) = self.compose()?;
        let entries = build_manifest(self.scene.groups(), self.parameters.params());
        Ok(ExportBundle {
            enclosure: encode_solid(&enclosure, format)?,
            lid: encode_solid(&lid, format)?,
            manifest: manifest_json(&entries)?,
        })
    }

    /// Composed enclosure and lid solids for the current state.
    ///
    /// Attached volumes are stretched for the current group poses even when a group
    /// moved after the last tick; the registry itself is left untouched.
    pub fn compose(&self) -> Result<(Solid, Solid)> {
        let (Some(preview), Some(state)) = (self.preview.as_ref(), self.enclosure.as_ref()) else {
            return Err(EnclosureError::boolean(
                "preview",
                "the enclosure has not been evaluated",
            ));
        };

        let registry = self.scene.registry();
        let stretched: Vec<Volume> = self
            .attachment_scales()?
            .into_iter()
            .filter_map(|(id, scale)| {
                let volume = &registry.get(&id)?.volume;
                (volume.transform.scale != scale).then(|| {
                    let mut volume = volume.clone();
                    volume.transform.scale = scale;
                    volume
                })
            })
            .collect();

        let add_set = self.operands(registry.active_add_set(), &stretched);
        let subtract_set = self.operands(registry.active_subtract_set(), &stretched);

        let enclosure = self
            .composer
            .export_enclosure(preview, &add_set, &subtract_set)?;
        let lid = self.composer.export_lid(&state.lid, &subtract_set)?;
        Ok((enclosure, lid))
    }

    fn operands<'a>(
        &'a self,
        volumes: Vec<&'a Volume>,
        stretched: &'a [Volume],
    ) -> Vec<Operand<'a>> {
        volumes
            .into_iter()
            .map(|volume| {
                let current = stretched.iter().find(|v| v.id == volume.id).unwrap_or(volume);
                Operand::new(current, self.scene.owner_transform(&volume.id))
            })
            .collect()
    }

    /// Gizmo write-back for a group's transform.
    pub fn set_group_transform(&mut self, group_id: &str, transform: Transform) -> Result<()> {
        self.scene.set_group_transform(group_id, transform)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;
    use crate::geometry::SCREW_POST_IDS;
    use approx::assert_relative_eq;

    #[test]
    fn test_new_registers_posts_and_previews() {
        let ws = Workspace::new(DesignParameters::default()).unwrap();
        assert_eq!(ws.scene().registry().subtract_ids().len(), 4);
        for id in SCREW_POST_IDS {
            assert!(ws.scene().registry().contains(id));
        }
        assert_eq!(ws.ticks(), 1);
        let preview = ws.preview().unwrap();
        assert_relative_eq!(
            preview.volume(),
            100.0 * 100.0 * 100.0 - 92.0 * 92.0 * 97.0,
            max_relative = 1e-6
        );
    }

    #[test]
    fn test_invalid_tick_keeps_previous_state() {
        let mut ws = Workspace::new(DesignParameters::default()).unwrap();
        ws.parameters_mut().set_wall_thickness(60.0).unwrap();
        let err = ws.tick().unwrap_err();
        assert!(matches!(err, EnclosureError::InvalidParameters(_)));
        assert!(err.to_string().contains("-20"));

        let state = ws.enclosure().unwrap();
        assert_eq!(state.cavity.geometry.extents(), Some([92.0, 100.0, 92.0]));
        assert!(ws.preview().is_some());
        assert_eq!(ws.ticks(), 1);
    }

    #[test]
    fn test_tick_rebinds_posts() {
        let mut ws = Workspace::new(DesignParameters::default()).unwrap();
        ws.parameters_mut().set_length(140.0).unwrap();
        ws.parameters_mut().set_screw(shared::ScrewClass::M2);
        ws.tick().unwrap();

        let post = &ws.scene().registry().get(SCREW_POST_IDS[0]).unwrap().volume;
        assert_relative_eq!(post.transform.position[0], 68.25);
        assert_eq!(post.geometry.extents().map(|e| e[0]), Some(2.5));
        assert_eq!(ws.scene().registry().subtract_ids().len(), 4);
    }

    #[test]
    fn test_toggled_post_stays_hidden_across_ticks() {
        let mut ws = Workspace::new(DesignParameters::default()).unwrap();
        assert!(!ws.scene_mut().toggle_volume(SCREW_POST_IDS[2]).unwrap());
        ws.tick().unwrap();
        assert_eq!(ws.scene().registry().subtract_ids().len(), 3);
    }

    #[test]
    fn test_screw_warning_tracks_parameters() {
        let mut ws = Workspace::new(fixtures::thin_wall_params()).unwrap();
        assert!(ws.screw_warning().is_some());
        ws.parameters_mut().set_screw(shared::ScrewClass::M2);
        ws.tick().unwrap();
        assert!(ws.screw_warning().is_none());
    }

    #[test]
    fn test_request_import_without_source() {
        let mut ws = Workspace::new(DesignParameters::default()).unwrap();
        assert!(matches!(
            ws.request_import(ComponentKind::Esp32),
            Err(EnclosureError::NoAssetSource)
        ));
    }

    #[test]
    fn test_export_does_not_mutate() {
        let ws = Workspace::new(DesignParameters::default()).unwrap();
        let version = ws.scene().version();
        let bundle = ws.export(StlFormat::Binary).unwrap();
        assert!(!bundle.enclosure.is_empty());
        assert!(!bundle.lid.is_empty());
        assert_eq!(ws.scene().version(), version);
    }

    #[test]
    fn test_unregistered_post_is_restored() {
        let mut ws = Workspace::new(DesignParameters::default()).unwrap();
        assert!(ws.scene_mut().unregister_volume(SCREW_POST_IDS[0]).is_some());
        assert_eq!(ws.scene().registry().subtract_ids().len(), 3);

        ws.tick().unwrap();
        assert!(ws.scene().registry().contains(SCREW_POST_IDS[0]));
        assert_eq!(ws.scene().registry().subtract_ids().len(), 4);
        assert_eq!(ws.ticks(), 2);
        assert!(ws.compose().is_ok());
    }

    #[test]
    fn test_failed_tick_keeps_post_bindings() {
        let mut ws = Workspace::new(DesignParameters::default()).unwrap();
        ws.parameters_mut().set_length(140.0).unwrap();
        ws.parameters_mut().set_wall_thickness(80.0).unwrap();
        assert!(ws.tick().is_err());

        let post = &ws.scene().registry().get(SCREW_POST_IDS[0]).unwrap().volume;
        assert_relative_eq!(post.transform.position[0].abs(), 48.25);
        assert!(ws.compose().is_ok());
    }

    #[test]
    fn test_compose_uses_current_group_pose() {
        let mut moved = Workspace::new(DesignParameters::default()).unwrap();
        let group = fixtures::component_group("uno", ComponentKind::ArduinoUno).unwrap();
        moved.scene_mut().add_group(group).unwrap();
        moved.set_group_transform("uno", Transform::at(0.0, 40.0, 0.0)).unwrap();
        moved.tick().unwrap();
        moved.set_group_transform("uno", Transform::at(0.0, 20.0, 0.0)).unwrap();
        let version = moved.scene().version();
        let (before_tick, _) = moved.compose().unwrap();
        assert_eq!(moved.scene().version(), version);

        moved.tick().unwrap();
        let (after_tick, _) = moved.compose().unwrap();
        assert_relative_eq!(before_tick.volume(), after_tick.volume(), max_relative = 1e-9);
    }

    #[test]
    fn test_take_import_failures_drains() {
        let mut ws = Workspace::new(DesignParameters::default()).unwrap();
        ws.import_failures.push(ImportFailure {
            group_id: "g".into(),
            component: ComponentKind::Esp32,
            error: "asset not found".into(),
        });
        assert_eq!(ws.take_import_failures().len(), 1);
        assert!(ws.import_failures().is_empty());
    }
}
