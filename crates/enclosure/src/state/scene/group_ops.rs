//! Component group lifecycle

use std::collections::HashSet;

use shared::{ComponentKind, GroupId, ParameterName, Transform, VolumeId};

use super::{ComponentGroup, Scene};
use crate::error::{EnclosureError, Result};
use crate::geometry::Volume;
use crate::registry::RegistryEntry;

/// A boolean volume contributed by a new group.
#[derive(Debug, Clone)]
pub struct ExtraVolume {
    pub volume: Volume,
    pub attached: bool,
}

/// Everything needed to insert a fully loaded group in one step.
#[derive(Debug, Clone)]
pub struct NewGroup {
    pub id: GroupId,
    pub name: String,
    pub component: ComponentKind,
    pub transform: Transform,
    pub decor: Vec<Volume>,
    pub extras: Vec<ExtraVolume>,
}

impl Scene {
    /// Insert a group and register all of its extras, or nothing at all.
    pub fn add_group(&mut self, group: NewGroup) -> Result<GroupId> {
        if self.group(&group.id).is_some() {
            return Err(EnclosureError::DuplicateGroup(group.id));
        }

        let mut seen = HashSet::new();
        for extra in &group.extras {
            self.registry.check_registrable(&extra.volume)?;
            if !seen.insert(extra.volume.id.clone()) {
                return Err(EnclosureError::DuplicateVolume(extra.volume.id.clone()));
            }
        }

        let NewGroup {
            id,
            name,
            component,
            transform,
            decor,
            extras,
        } = group;

        let mut extra_ids = Vec::with_capacity(extras.len());
        for extra in extras {
            let volume_id = self
                .registry
                .register(extra.volume, Some(id.clone()), extra.attached)?;
            extra_ids.push(volume_id);
        }

        tracing::info!(
            "Added group '{}' ({}) with {} decor and {} boolean volumes",
            name,
            id,
            decor.len(),
            extra_ids.len()
        );

        self.groups.push(ComponentGroup {
            id: id.clone(),
            name,
            component,
            transform,
            decor,
            extras: extra_ids,
        });
        self.version += 1;
        Ok(id)
    }

    /// Remove a group, cascading to its decor and registry members.
    ///
    /// Returns the identities of every volume that was released.
    pub fn remove_group(&mut self, group_id: &str) -> Result<Vec<VolumeId>> {
        let index = self
            .groups
            .iter()
            .position(|g| g.id == group_id)
            .ok_or_else(|| EnclosureError::UnknownGroup(group_id.to_string()))?;
        let group = self.groups.remove(index);

        let mut removed = Vec::with_capacity(group.decor.len() + group.extras.len());
        for volume_id in &group.extras {
            if let Some(entry) = self.registry.unregister(volume_id) {
                entry.volume.dispose();
            }
            removed.push(volume_id.clone());
        }
        for volume in group.decor {
            removed.push(volume.id.clone());
            volume.dispose();
        }

        tracing::info!("Removed group '{}' ({} volumes)", group.name, removed.len());
        self.version += 1;
        Ok(removed)
    }

    /// Remove one registered volume from the registry and its owning group.
    ///
    /// Unknown identities are a no-op.
    pub fn unregister_volume(&mut self, volume_id: &str) -> Option<RegistryEntry> {
        let entry = self.registry.unregister(volume_id)?;
        if let Some(owner) = &entry.owner {
            if let Some(group) = self.group_mut(owner) {
                group.extras.retain(|id| id != volume_id);
            }
        }
        self.version += 1;
        Some(entry)
    }

    /// Flip a registered volume's visibility and set membership.
    pub fn toggle_volume(&mut self, volume_id: &str) -> Result<bool> {
        let visible = self.registry.toggle_membership(volume_id)?;
        self.version += 1;
        Ok(visible)
    }

    /// Resize the box of an additional-geometry group.
    ///
    /// The box keeps unit geometry; the size lives in its scale.
    pub fn set_extra_box_size(
        &mut self,
        group_id: &str,
        length: f64,
        width: f64,
        height: f64,
    ) -> Result<()> {
        for (name, value) in [
            (ParameterName::Length, length),
            (ParameterName::Width, width),
            (ParameterName::Height, height),
        ] {
            let range = name.range();
            if !range.contains(value) {
                return Err(shared::ParameterError::OutOfRange {
                    name: name.as_str(),
                    value,
                    range,
                }
                .into());
            }
        }

        let group = self
            .group(group_id)
            .ok_or_else(|| EnclosureError::UnknownGroup(group_id.to_string()))?;
        let targets = group.extras.clone();
        for volume_id in &targets {
            self.registry.set_scale(volume_id, [length, height, width])?;
        }
        self.version += 1;
        Ok(())
    }
}
