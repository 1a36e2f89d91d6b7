//! Composed solids and triangle extraction

use std::sync::Arc;

use glam::{DVec3, Vec3};
use vcad::Part;

use crate::error::{EnclosureError, Result};

/// One triangle with a face normal, in world space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    pub normal: [f32; 3],
    pub vertices: [[f32; 3]; 3],
}

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: DVec3,
    pub max: DVec3,
}

impl Aabb {
    pub fn size(&self) -> DVec3 {
        self.max - self.min
    }

    pub fn center(&self) -> DVec3 {
        (self.min + self.max) * 0.5
    }
}

/// Result of a boolean composition, cheap to clone.
#[derive(Clone)]
pub struct Solid {
    label: String,
    part: Arc<Part>,
    triangles: Arc<Vec<Triangle>>,
}

impl std::fmt::Debug for Solid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Solid")
            .field("label", &self.label)
            .field("triangles", &self.triangles.len())
            .finish()
    }
}

impl Solid {
    /// Wrap a boolean result, rejecting empty or non-finite output.
    ///
    /// `operand` names the volume blamed when the result is unusable.
    pub fn checked(label: impl Into<String>, part: Part, operand: &str) -> Result<Self> {
        let triangles = extract_triangles(&part);
        if triangles.is_empty() {
            return Err(EnclosureError::boolean(operand, "operation produced empty result"));
        }
        let finite = triangles
            .iter()
            .all(|t| t.vertices.iter().flatten().all(|c| c.is_finite()));
        if !finite {
            return Err(EnclosureError::boolean(operand, "operation produced non-finite vertices"));
        }
        let solid = Self {
            label: label.into(),
            part: Arc::new(part),
            triangles: Arc::new(triangles),
        };
        if solid.volume() <= 0.0 {
            return Err(EnclosureError::boolean(operand, "operation produced zero volume"));
        }
        Ok(solid)
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn part(&self) -> &Part {
        &self.part
    }

    pub fn triangles(&self) -> &[Triangle] {
        &self.triangles
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    /// Enclosed volume via the divergence theorem.
    pub fn volume(&self) -> f64 {
        let signed: f64 = self
            .triangles
            .iter()
            .map(|t| {
                let [a, b, c] = t.vertices.map(|v| DVec3::new(v[0].into(), v[1].into(), v[2].into()));
                a.dot(b.cross(c))
            })
            .sum();
        signed.abs() / 6.0
    }

    pub fn bounds(&self) -> Aabb {
        let mut min = DVec3::splat(f64::MAX);
        let mut max = DVec3::splat(f64::MIN);
        for v in self.triangles.iter().flat_map(|t| t.vertices.iter()) {
            let p = DVec3::new(v[0].into(), v[1].into(), v[2].into());
            min = min.min(p);
            max = max.max(p);
        }
        Aabb { min, max }
    }
}

/// Flatten a vcad Part into world-space triangles with face normals
pub fn extract_triangles(part: &Part) -> Vec<Triangle> {
    let mesh = part.to_mesh();
    let positions = mesh.vertices();
    let indices = mesh.indices();

    if positions.is_empty() || indices.is_empty() {
        tracing::warn!("extract_triangles: empty mesh");
        return Vec::new();
    }

    let vertex = |i: u32| {
        let i = i as usize * 3;
        Vec3::new(positions[i], positions[i + 1], positions[i + 2])
    };

    let triangles: Vec<Triangle> = indices
        .chunks_exact(3)
        .map(|tri| {
            let p0 = vertex(tri[0]);
            let p1 = vertex(tri[1]);
            let p2 = vertex(tri[2]);
            let normal = (p1 - p0).cross(p2 - p0).normalize_or_zero();
            Triangle {
                normal: normal.to_array(),
                vertices: [p0.to_array(), p1.to_array(), p2.to_array()],
            }
        })
        .collect();

    tracing::debug!(
        "extract_triangles: {} vertices, {} tris",
        positions.len() / 3,
        triangles.len()
    );
    triangles
}
