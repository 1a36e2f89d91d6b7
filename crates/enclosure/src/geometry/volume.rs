//! Volumes: tagged solids that take part in enclosure composition.

use shared::{Transform, VolumeId, VolumeKind};

/// Circle resolution used for screw posts and other round primitives.
pub const DEFAULT_SEGMENTS: u32 = 32;

/// Triangulated solid supplied by the import collaborator.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ImportedMesh {
    pub positions: Vec<[f32; 3]>,
    pub triangles: Vec<[u32; 3]>,
}

impl ImportedMesh {
    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty() || self.triangles.is_empty()
    }

    /// Axis-aligned bounds as (min, max), or `None` for an empty mesh.
    pub fn bounds(&self) -> Option<([f32; 3], [f32; 3])> {
        let first = *self.positions.first()?;
        let mut min = first;
        let mut max = first;
        for p in &self.positions[1..] {
            for axis in 0..3 {
                min[axis] = min[axis].min(p[axis]);
                max[axis] = max[axis].max(p[axis]);
            }
        }
        Some((min, max))
    }

    /// Flatten into the buffers `manifold_rs::Mesh::new` expects.
    pub fn to_buffers(&self) -> (Vec<f32>, Vec<u32>) {
        let vertices = self.positions.iter().flatten().copied().collect();
        let indices = self.triangles.iter().flatten().copied().collect();
        (vertices, indices)
    }
}

/// Source geometry of a volume, before its transform is applied.
#[derive(Debug, Clone, PartialEq)]
pub enum VolumeGeometry {
    /// Box centred on the origin with extents (x, y, z).
    Box { size: [f64; 3] },
    /// Cylinder centred on the origin with its axis along Y.
    Cylinder {
        radius: f64,
        height: f64,
        segments: u32,
    },
    Mesh(ImportedMesh),
}

impl VolumeGeometry {
    pub fn cuboid(x: f64, y: f64, z: f64) -> Self {
        VolumeGeometry::Box { size: [x, y, z] }
    }

    pub fn cylinder(radius: f64, height: f64) -> Self {
        VolumeGeometry::Cylinder {
            radius,
            height,
            segments: DEFAULT_SEGMENTS,
        }
    }

    /// Untransformed extents for analytic primitives.
    pub fn extents(&self) -> Option<[f64; 3]> {
        match self {
            VolumeGeometry::Box { size } => Some(*size),
            VolumeGeometry::Cylinder { radius, height, .. } => {
                Some([radius * 2.0, *height, radius * 2.0])
            }
            VolumeGeometry::Mesh(mesh) => mesh.bounds().map(|(min, max)| {
                [
                    f64::from(max[0] - min[0]),
                    f64::from(max[1] - min[1]),
                    f64::from(max[2] - min[2]),
                ]
            }),
        }
    }
}

/// A solid with identity, role and placement.
#[derive(Debug, Clone, PartialEq)]
pub struct Volume {
    pub id: VolumeId,
    pub name: String,
    pub kind: VolumeKind,
    pub transform: Transform,
    pub geometry: VolumeGeometry,
    pub visible: bool,
}

impl Volume {
    /// Create a volume with a fresh unique identity.
    pub fn new(kind: VolumeKind, name: impl Into<String>, geometry: VolumeGeometry) -> Self {
        Self::with_id(uuid::Uuid::new_v4().to_string(), kind, name, geometry)
    }

    pub fn with_id(
        id: impl Into<VolumeId>,
        kind: VolumeKind,
        name: impl Into<String>,
        geometry: VolumeGeometry,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind,
            transform: Transform::new(),
            geometry,
            visible: true,
        }
    }

    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    /// Extents after local scale, ignoring rotation.
    pub fn scaled_extents(&self) -> Option<[f64; 3]> {
        let e = self.geometry.extents()?;
        let s = self.transform.scale;
        Some([e[0] * s[0].abs(), e[1] * s[1].abs(), e[2] * s[2].abs()])
    }

    /// Release the volume and its geometry.
    pub fn dispose(self) {
        tracing::trace!("dispose volume {} ({:?})", self.id, self.kind);
    }
}
