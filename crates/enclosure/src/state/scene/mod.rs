//! Scene state: component groups and the volume registry they feed.

mod group_ops;
mod transform_ops;

pub use group_ops::{ExtraVolume, NewGroup};
pub use transform_ops::WorldPose;

use shared::{ComponentKind, GroupId, Transform, VolumeId};

use crate::geometry::Volume;
use crate::registry::VolumeRegistry;

/// A named cluster of volumes imported together (one device).
#[derive(Debug, Clone, PartialEq)]
pub struct ComponentGroup {
    pub id: GroupId,
    pub name: String,
    pub component: ComponentKind,
    pub transform: Transform,
    /// Display-only meshes owned directly by the group.
    pub decor: Vec<Volume>,
    /// Add/subtract volumes held by the registry on the group's behalf.
    pub extras: Vec<VolumeId>,
}

/// Component groups plus the registry, with a mutation counter.
#[derive(Debug, Default)]
pub struct Scene {
    registry: VolumeRegistry,
    groups: Vec<ComponentGroup>,
    /// Monotonically increasing version counter
    version: u64,
}

impl Scene {
    /// Current scene version (increments on every mutation)
    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn registry(&self) -> &VolumeRegistry {
        &self.registry
    }

    pub(crate) fn registry_mut(&mut self) -> &mut VolumeRegistry {
        self.version += 1;
        &mut self.registry
    }

    /// Groups in insertion order
    pub fn groups(&self) -> &[ComponentGroup] {
        &self.groups
    }

    pub fn group(&self, group_id: &str) -> Option<&ComponentGroup> {
        self.groups.iter().find(|g| g.id == group_id)
    }

    pub(crate) fn group_mut(&mut self, group_id: &str) -> Option<&mut ComponentGroup> {
        self.groups.iter_mut().find(|g| g.id == group_id)
    }

    /// Transform of the group owning a registered volume
    pub fn owner_transform(&self, volume_id: &str) -> Option<&Transform> {
        let owner = self.registry.get(volume_id)?.owner.as_ref()?;
        self.group(owner).map(|g| &g.transform)
    }

    /// Bump version without other changes
    pub fn notify_mutated(&mut self) {
        self.version += 1;
    }
}
