//! Solid validation utilities.
//!
//! `SolidValidator` checks composed solids: finite vertices, unit normals, closed
//! edges, positive volume and AABB dimensions.

use std::collections::HashMap;

use crate::build::{Aabb, Solid};
use crate::export::stl::{BINARY_HEADER_LEN, BINARY_TRIANGLE_LEN};

/// Validator for [`Solid`] integrity checks.
pub struct SolidValidator<'a> {
    solid: &'a Solid,
}

impl<'a> SolidValidator<'a> {
    /// Create a new validator for the given solid.
    pub fn new(solid: &'a Solid) -> Self {
        Self { solid }
    }

    pub fn triangle_count(&self) -> usize {
        self.solid.triangle_count()
    }

    /// Check that every vertex coordinate is finite.
    pub fn are_vertices_finite(&self) -> bool {
        self.solid
            .triangles()
            .iter()
            .all(|t| t.vertices.iter().flatten().all(|c| c.is_finite()))
    }

    /// Check that all face normals have unit length (within epsilon).
    /// Degenerate slivers carry a zero normal and are skipped.
    pub fn are_normals_normalized(&self, epsilon: f32) -> bool {
        self.solid.triangles().iter().all(|t| {
            let [x, y, z] = t.normal;
            let len = (x * x + y * y + z * z).sqrt();
            len == 0.0 || (len - 1.0).abs() <= epsilon
        })
    }

    /// Edges not shared by exactly two triangles.
    pub fn open_edge_count(&self) -> usize {
        let mut edges: HashMap<([u32; 3], [u32; 3]), usize> = HashMap::new();
        for t in self.solid.triangles() {
            let keys = t.vertices.map(|v| v.map(f32::to_bits));
            for i in 0..3 {
                let (a, b) = (keys[i], keys[(i + 1) % 3]);
                let edge = if a <= b { (a, b) } else { (b, a) };
                *edges.entry(edge).or_default() += 1;
            }
        }
        edges.values().filter(|&&n| n != 2).count()
    }

    /// Check that the surface is closed.
    pub fn is_watertight(&self) -> bool {
        self.open_edge_count() == 0
    }

    pub fn aabb(&self) -> Aabb {
        self.solid.bounds()
    }

    /// Compute the dimensions (x, y, z) of the bounding box.
    pub fn dimensions(&self) -> [f64; 3] {
        self.aabb().size().to_array()
    }

    /// Check that the AABB dimensions are approximately equal to `expected`.
    pub fn assert_dimensions_approx(&self, expected: [f64; 3], tolerance: f64) -> bool {
        self.dimensions()
            .iter()
            .zip(expected)
            .all(|(d, e)| (d - e).abs() < tolerance)
    }

    /// Run all validation checks and return a list of error messages.
    /// An empty list means the solid is valid.
    pub fn validate_all(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.triangle_count() == 0 {
            errors.push("Solid has no triangles".to_string());
            return errors;
        }

        if !self.are_vertices_finite() {
            errors.push("Solid has non-finite vertex coordinates".to_string());
        }

        if !self.are_normals_normalized(1e-3) {
            errors.push("Solid has non-unit face normals".to_string());
        }

        let open = self.open_edge_count();
        if open > 0 {
            errors.push(format!("Solid has {open} open edges"));
        }

        let volume = self.solid.volume();
        if volume <= 0.0 {
            errors.push(format!("Solid volume {volume} is not positive"));
        }

        errors
    }
}

/// Triangle count of a binary STL buffer, if its length agrees with the header.
pub fn binary_stl_triangle_count(bytes: &[u8]) -> Option<u32> {
    let count_bytes = bytes.get(BINARY_HEADER_LEN..BINARY_HEADER_LEN + 4)?;
    let count = u32::from_le_bytes(count_bytes.try_into().ok()?);
    let expected = BINARY_HEADER_LEN + 4 + count as usize * BINARY_TRIANGLE_LEN;
    (bytes.len() == expected).then_some(count)
}
