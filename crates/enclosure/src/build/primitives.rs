//! Volume to vcad Part conversion and transform helpers

use manifold_rs::Mesh;
use shared::Transform;
use vcad::{centered_cube, centered_cylinder, Part};

use crate::error::{EnclosureError, Result};
use crate::geometry::{ImportedMesh, Volume, VolumeGeometry};

/// Create an untransformed vcad Part from a volume's geometry
pub fn create_part(volume: &Volume) -> Result<Part> {
    let id = volume.id.as_str();
    match &volume.geometry {
        VolumeGeometry::Box { size } => Ok(centered_cube(id, size[0], size[1], size[2])),
        VolumeGeometry::Cylinder {
            radius,
            height,
            segments,
        } => {
            // vcad cylinders run along Z; volumes keep their axis on Y.
            Ok(centered_cylinder(id, *radius, *height, *segments).rotate(90.0, 0.0, 0.0))
        }
        VolumeGeometry::Mesh(mesh) => mesh_part(id, &volume.name, mesh),
    }
}

fn mesh_part(id: &str, name: &str, mesh: &ImportedMesh) -> Result<Part> {
    if mesh.is_empty() {
        return Err(EnclosureError::boolean(name, "mesh has no triangles"));
    }
    let (vertices, indices) = mesh.to_buffers();
    let manifold = Mesh::new(&vertices, &indices).to_manifold();
    if manifold.is_empty() {
        return Err(EnclosureError::boolean(name, "mesh is not a closed manifold"));
    }
    Ok(Part::new(id, manifold))
}

/// Apply a Transform to a vcad Part: scale, then XYZ Euler rotation, then translation
pub fn apply_transform(part: Part, transform: &Transform) -> Part {
    let [tx, ty, tz] = transform.position;
    let [rx, ry, rz] = transform.rotation;
    let [sx, sy, sz] = transform.scale;

    let mut p = part;
    if sx != 1.0 || sy != 1.0 || sz != 1.0 {
        p = p.scale(sx, sy, sz);
    }
    if rz != 0.0 {
        p = p.rotate(0.0, 0.0, rz);
    }
    if ry != 0.0 {
        p = p.rotate(0.0, ry, 0.0);
    }
    if rx != 0.0 {
        p = p.rotate(rx, 0.0, 0.0);
    }
    if tx != 0.0 || ty != 0.0 || tz != 0.0 {
        p = p.translate(tx, ty, tz);
    }
    p
}

/// Build a volume in world space, applying its owning group's transform last
pub fn build_world_part(volume: &Volume, parent: Option<&Transform>) -> Result<Part> {
    let part = apply_transform(create_part(volume)?, &volume.transform);
    Ok(match parent {
        Some(parent) => apply_transform(part, parent),
        None => part,
    })
}
