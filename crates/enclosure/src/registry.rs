//! Add/subtract volume registry.
//!
//! The registry owns every volume that can take part in export booleans and keeps
//! two ordered, duplicate-free identity lists: one for subtraction and one for
//! union. A volume is a member of its set exactly while it is visible. Insertion
//! order is preserved because it decides the fold order at export.

use std::collections::HashMap;

use shared::{BooleanOp, GroupId, Transform, VolumeId};

use crate::error::{EnclosureError, Result};
use crate::geometry::{Volume, VolumeGeometry};

/// A registered volume with its boolean role and ownership.
#[derive(Debug, Clone, PartialEq)]
pub struct RegistryEntry {
    pub volume: Volume,
    pub role: BooleanOp,
    /// Component group the volume belongs to, if any.
    pub owner: Option<GroupId>,
    /// Wall boss whose length follows its owner's pose.
    pub attached: bool,
}

#[derive(Debug, Default)]
pub struct VolumeRegistry {
    entries: HashMap<VolumeId, RegistryEntry>,
    subtract: Vec<VolumeId>,
    add: Vec<VolumeId>,
}

impl VolumeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check that `volume` could be registered without mutating anything.
    pub fn check_registrable(&self, volume: &Volume) -> Result<BooleanOp> {
        let role = volume
            .kind
            .boolean_role()
            .ok_or_else(|| EnclosureError::NotRegistrable {
                id: volume.id.clone(),
                kind: format!("{:?}", volume.kind),
            })?;
        if self.entries.contains_key(&volume.id) {
            return Err(EnclosureError::DuplicateVolume(volume.id.clone()));
        }
        Ok(role)
    }

    /// Take ownership of `volume`. Its kind decides the set it joins.
    pub fn register(
        &mut self,
        volume: Volume,
        owner: Option<GroupId>,
        attached: bool,
    ) -> Result<VolumeId> {
        let role = self.check_registrable(&volume)?;
        let id = volume.id.clone();
        if volume.visible {
            self.set_for(role).push(id.clone());
        }
        tracing::debug!("register {} '{}' as {:?}", id, volume.name, role);
        self.entries.insert(
            id.clone(),
            RegistryEntry {
                volume,
                role,
                owner,
                attached,
            },
        );
        Ok(id)
    }

    /// Flip visibility and move the volume into or out of its set.
    ///
    /// Returns the new visibility.
    pub fn toggle_membership(&mut self, id: &str) -> Result<bool> {
        let visible = !self.entry(id)?.volume.visible;
        self.set_visible(id, visible)?;
        Ok(visible)
    }

    /// Show or hide a member. Re-showing appends it to the end of its set.
    pub fn set_visible(&mut self, id: &str, visible: bool) -> Result<()> {
        let entry = self
            .entries
            .get_mut(id)
            .ok_or_else(|| EnclosureError::StaleReference(id.to_string()))?;
        if entry.volume.visible == visible {
            return Ok(());
        }
        entry.volume.visible = visible;
        let role = entry.role;
        let set = self.set_for(role);
        set.retain(|member| member != id);
        if visible {
            set.push(id.to_string());
        }
        Ok(())
    }

    /// Remove a volume entirely. Unknown identities are a no-op.
    pub fn unregister(&mut self, id: &str) -> Option<RegistryEntry> {
        let entry = self.entries.remove(id)?;
        self.subtract.retain(|member| member != id);
        self.add.retain(|member| member != id);
        tracing::debug!("unregister {}", id);
        Some(entry)
    }

    /// Swap in new geometry for a member, disposing the old buffers first.
    pub fn replace_geometry(
        &mut self,
        id: &str,
        geometry: VolumeGeometry,
        transform: Transform,
    ) -> Result<()> {
        let entry = self
            .entries
            .get_mut(id)
            .ok_or_else(|| EnclosureError::StaleReference(id.to_string()))?;
        let old = std::mem::replace(&mut entry.volume.geometry, geometry);
        drop(old);
        entry.volume.transform = transform;
        Ok(())
    }

    pub fn set_transform(&mut self, id: &str, transform: Transform) -> Result<()> {
        self.entry_mut(id)?.volume.transform = transform;
        Ok(())
    }

    /// Overwrite only the local scale of a member.
    pub fn set_scale(&mut self, id: &str, scale: [f64; 3]) -> Result<()> {
        self.entry_mut(id)?.volume.transform.scale = scale;
        Ok(())
    }

    pub fn get(&self, id: &str) -> Option<&RegistryEntry> {
        self.entries.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Visible subtraction members in insertion order.
    pub fn active_subtract_set(&self) -> Vec<&Volume> {
        self.resolve(&self.subtract)
    }

    /// Visible union members in insertion order.
    pub fn active_add_set(&self) -> Vec<&Volume> {
        self.resolve(&self.add)
    }

    /// Identities of subtraction members in order.
    pub fn subtract_ids(&self) -> &[VolumeId] {
        &self.subtract
    }

    /// Identities of union members in order.
    pub fn add_ids(&self) -> &[VolumeId] {
        &self.add
    }

    /// Identities of wall-attached members, in stable order.
    pub fn attached_ids(&self) -> Vec<VolumeId> {
        let mut ids: Vec<VolumeId> = self
            .entries
            .iter()
            .filter(|(_, e)| e.attached)
            .map(|(id, _)| id.clone())
            .collect();
        ids.sort();
        ids
    }

    pub fn entries(&self) -> impl Iterator<Item = &RegistryEntry> {
        self.entries.values()
    }

    fn entry(&self, id: &str) -> Result<&RegistryEntry> {
        self.entries
            .get(id)
            .ok_or_else(|| EnclosureError::StaleReference(id.to_string()))
    }

    fn entry_mut(&mut self, id: &str) -> Result<&mut RegistryEntry> {
        self.entries
            .get_mut(id)
            .ok_or_else(|| EnclosureError::StaleReference(id.to_string()))
    }

    fn set_for(&mut self, role: BooleanOp) -> &mut Vec<VolumeId> {
        match role {
            BooleanOp::Difference => &mut self.subtract,
            BooleanOp::Union => &mut self.add,
        }
    }

    fn resolve<'a>(&'a self, ids: &[VolumeId]) -> Vec<&'a Volume> {
        ids.iter()
            .filter_map(|id| self.entries.get(id))
            .map(|entry| &entry.volume)
            .filter(|volume| volume.visible)
            .collect()
    }
}
