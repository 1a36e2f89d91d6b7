//! Transform and world-pose operations

use glam::{DAffine3, DMat3, DQuat, DVec3};
use shared::Transform;

use super::Scene;
use crate::error::{EnclosureError, Result};

/// World-space position and orientation of a volume.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorldPose {
    pub position: DVec3,
    pub rotation: DQuat,
}

impl WorldPose {
    /// Pose described by a local transform, with XYZ Euler degrees.
    pub fn from_transform(transform: &Transform) -> Self {
        Self {
            position: DVec3::from_array(transform.position),
            rotation: rotation_of(transform),
        }
    }

    /// This pose expressed in the frame of `parent`.
    pub fn within(&self, parent: &Transform) -> Self {
        let parent_rotation = rotation_of(parent);
        let affine = DAffine3::from_scale_rotation_translation(
            DVec3::from_array(parent.scale),
            parent_rotation,
            DVec3::from_array(parent.position),
        );
        Self {
            position: affine.transform_point3(self.position),
            rotation: (parent_rotation * self.rotation).normalize(),
        }
    }

    /// XYZ Euler angles in degrees.
    ///
    /// At the Y = ±90 singularity the whole remaining rotation is reported on X
    /// and Z is zero.
    pub fn euler_degrees(&self) -> [f64; 3] {
        let m = DMat3::from_quat(self.rotation);
        let m13 = m.z_axis.x.clamp(-1.0, 1.0);
        let y = m13.asin();
        let (x, z) = if m13.abs() < GIMBAL_LIMIT {
            (
                (-m.z_axis.y).atan2(m.z_axis.z),
                (-m.y_axis.x).atan2(m.x_axis.x),
            )
        } else {
            (m.y_axis.z.atan2(m.y_axis.y), 0.0)
        };
        [x.to_degrees(), y.to_degrees(), z.to_degrees()]
    }
}

const GIMBAL_LIMIT: f64 = 0.999_999_9;

fn rotation_of(transform: &Transform) -> DQuat {
    let [rx, ry, rz] = transform.rotation;
    DQuat::from_rotation_x(rx.to_radians())
        * DQuat::from_rotation_y(ry.to_radians())
        * DQuat::from_rotation_z(rz.to_radians())
}

impl Scene {
    /// World pose of a registered volume, including its group transform.
    pub fn world_pose(&self, volume_id: &str) -> Result<WorldPose> {
        let entry = self
            .registry
            .get(volume_id)
            .ok_or_else(|| EnclosureError::StaleReference(volume_id.to_string()))?;
        let local = WorldPose::from_transform(&entry.volume.transform);
        Ok(match self.owner_transform(volume_id) {
            Some(parent) => local.within(parent),
            None => local,
        })
    }

    /// Replace a group's transform (gizmo write-back).
    pub fn set_group_transform(&mut self, group_id: &str, transform: Transform) -> Result<()> {
        let group = self
            .group_mut(group_id)
            .ok_or_else(|| EnclosureError::UnknownGroup(group_id.to_string()))?;
        group.transform = transform;
        self.version += 1;
        Ok(())
    }

    /// Move a group by a translation delta.
    pub fn translate_group(&mut self, group_id: &str, delta: [f64; 3]) -> Result<()> {
        let group = self
            .group_mut(group_id)
            .ok_or_else(|| EnclosureError::UnknownGroup(group_id.to_string()))?;
        for (axis, d) in delta.iter().enumerate() {
            group.transform.position[axis] += d;
        }
        self.version += 1;
        Ok(())
    }
}
