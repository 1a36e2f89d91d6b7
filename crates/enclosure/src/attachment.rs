//! Wall attachment of mounting bosses.
//!
//! A boss is modeled as a unit-length extrusion along its local -Z axis. When its
//! owner is rotated to face one of the enclosure walls (or the floor), the boss is
//! stretched so it spans exactly from the owner to that wall. Any other orientation
//! leaves it at unit length.

use shared::DesignParameters;

use crate::state::WorldPose;

/// Wall an owner can be aligned to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WallPlane {
    /// Y = 0
    Floor,
    /// Z = -width/2
    Back,
    /// Z = +width/2
    Front,
    /// X = -length/2
    Left,
    /// X = +length/2
    Right,
}

/// Recomputes boss extrusion lengths against the current enclosure footprint.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AttachmentScaler {
    length: f64,
    width: f64,
}

impl AttachmentScaler {
    pub fn new(length: f64, width: f64) -> Self {
        Self { length, width }
    }

    pub fn for_params(params: &DesignParameters) -> Self {
        Self::new(params.length, params.width)
    }

    /// Wall matching the pose's rounded XYZ Euler angles, if any.
    pub fn classify(pose: &WorldPose) -> Option<WallPlane> {
        let [x, y, z] = pose.euler_degrees().map(|a| a.round() as i64);
        match (x, y, z) {
            (-90, 0, 0) => Some(WallPlane::Floor),
            (0, 0, 0) => Some(WallPlane::Back),
            (180, 0, 0) | (-180, 0, 0) => Some(WallPlane::Front),
            (0, 90, 0) => Some(WallPlane::Left),
            (0, -90, 0) => Some(WallPlane::Right),
            _ => None,
        }
    }

    /// Extrusion scale spanning from `pose` to `wall`; 1 when unattached or behind the wall.
    pub fn recompute(&self, pose: &WorldPose, wall: Option<WallPlane>) -> f64 {
        let p = pose.position;
        let span = match wall {
            Some(WallPlane::Floor) => p.y,
            Some(WallPlane::Back) => p.z + self.width / 2.0,
            Some(WallPlane::Front) => self.width / 2.0 - p.z,
            Some(WallPlane::Left) => p.x + self.length / 2.0,
            Some(WallPlane::Right) => self.length / 2.0 - p.x,
            None => return 1.0,
        };
        if span > 0.0 && span.is_finite() {
            span
        } else {
            1.0
        }
    }

    /// Classify and recompute in one step.
    pub fn resolve(&self, pose: &WorldPose) -> f64 {
        self.recompute(pose, Self::classify(pose))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::Transform;

    fn pose(position: [f64; 3], rotation: [f64; 3]) -> WorldPose {
        WorldPose::from_transform(
            &Transform::at(position[0], position[1], position[2])
                .with_rotation(rotation[0], rotation[1], rotation[2]),
        )
    }

    fn scaler() -> AttachmentScaler {
        AttachmentScaler::new(100.0, 80.0)
    }

    #[test]
    fn test_floor_span_is_height() {
        let p = pose([5.0, 40.0, -3.0], [-90.0, 0.0, 0.0]);
        assert_eq!(AttachmentScaler::classify(&p), Some(WallPlane::Floor));
        assert!((scaler().resolve(&p) - 40.0).abs() < 1e-9);
    }

    #[test]
    fn test_side_walls() {
        let s = scaler();
        let back = pose([0.0, 10.0, -30.0], [0.0, 0.0, 0.0]);
        assert_eq!(AttachmentScaler::classify(&back), Some(WallPlane::Back));
        assert!((s.resolve(&back) - 10.0).abs() < 1e-9);

        let front = pose([0.0, 10.0, 25.0], [180.0, 0.0, 0.0]);
        assert_eq!(AttachmentScaler::classify(&front), Some(WallPlane::Front));
        assert!((s.resolve(&front) - 15.0).abs() < 1e-9);

        let left = pose([-20.0, 10.0, 0.0], [0.0, 90.0, 0.0]);
        assert_eq!(AttachmentScaler::classify(&left), Some(WallPlane::Left));
        assert!((s.resolve(&left) - 30.0).abs() < 1e-9);

        let right = pose([20.0, 10.0, 0.0], [0.0, -90.0, 0.0]);
        assert_eq!(AttachmentScaler::classify(&right), Some(WallPlane::Right));
        assert!((s.resolve(&right) - 30.0).abs() < 1e-9);
    }

    #[test]
    fn test_rounding_tolerates_small_drift() {
        let p = pose([0.0, 12.0, 0.0], [-90.3, 0.2, -0.4]);
        assert_eq!(AttachmentScaler::classify(&p), Some(WallPlane::Floor));
    }

    #[test]
    fn test_past_wall_collapses_to_unit() {
        let s = scaler();
        let below_floor = pose([0.0, -5.0, 0.0], [-90.0, 0.0, 0.0]);
        assert_eq!(s.resolve(&below_floor), 1.0);

        let beyond_front = pose([0.0, 10.0, 45.0], [180.0, 0.0, 0.0]);
        assert_eq!(s.resolve(&beyond_front), 1.0);

        let on_wall = pose([50.0, 10.0, 0.0], [0.0, -90.0, 0.0]);
        assert_eq!(s.resolve(&on_wall), 1.0);
    }

    #[test]
    fn test_unrecognized_orientation_is_unattached() {
        let p = pose([0.0, 40.0, 0.0], [-45.0, 0.0, 0.0]);
        assert_eq!(AttachmentScaler::classify(&p), None);
        assert_eq!(scaler().resolve(&p), 1.0);

        let tilted = pose([0.0, 40.0, 0.0], [0.0, 0.0, 90.0]);
        assert_eq!(AttachmentScaler::classify(&tilted), None);
    }

    #[test]
    fn test_y_rotation_not_shadowed_by_zero_x() {
        // A pure yaw has X = 0 but must still reach the side wall branch.
        let p = pose([10.0, 5.0, 0.0], [0.0, 90.0, 0.0]);
        assert_eq!(AttachmentScaler::classify(&p), Some(WallPlane::Left));
    }
}
