//! Factory functions for creating test data.
//!
//! Provides closed box meshes, an in-memory component library that mirrors the
//! real asset layout, and a few parameter presets used by tests and the harness.

use shared::*;

use crate::error::Result;
use crate::geometry::{ImportedMesh, Volume, VolumeGeometry};
use crate::import::{layout, load_component, MemoryMeshSource};
use crate::state::NewGroup;

// ── Meshes ──────────────────────────────────────────────────────

/// Closed, outward-wound box mesh with the given size and center.
pub fn box_mesh(size: [f32; 3], center: [f32; 3]) -> ImportedMesh {
    let half = size.map(|s| s / 2.0);
    // Corner i takes +half on x for bit 0, y for bit 1, z for bit 2.
    let positions = (0..8)
        .map(|i| {
            [
                center[0] + if i & 1 == 0 { -half[0] } else { half[0] },
                center[1] + if i & 2 == 0 { -half[1] } else { half[1] },
                center[2] + if i & 4 == 0 { -half[2] } else { half[2] },
            ]
        })
        .collect();
    let triangles = vec![
        [0, 2, 1],
        [1, 2, 3],
        [4, 5, 6],
        [5, 7, 6],
        [0, 1, 4],
        [1, 5, 4],
        [2, 6, 3],
        [3, 6, 7],
        [0, 4, 2],
        [2, 4, 6],
        [1, 3, 5],
        [3, 7, 5],
    ];
    ImportedMesh {
        positions,
        triangles,
    }
}

/// Unit-length boss extruding from the origin along -Z, towards the wall it faces.
pub fn boss_mesh(side: f32) -> ImportedMesh {
    box_mesh([side, side, 1.0], [0.0, 0.0, -0.5])
}

/// A single open triangle, rejected by the kernel as non-manifold.
pub fn open_mesh() -> ImportedMesh {
    ImportedMesh {
        positions: vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
        triangles: vec![[0, 1, 2]],
    }
}

// ── Component library ───────────────────────────────────────────

/// In-memory library with a small box for every asset of every component.
pub fn library_source() -> MemoryMeshSource {
    let mut source = MemoryMeshSource::new();
    for kind in ComponentKind::all() {
        let Some(layout) = layout(*kind) else {
            continue;
        };
        for part in layout.parts {
            let mesh = if part.attached {
                boss_mesh(3.0)
            } else {
                box_mesh([8.0, 4.0, 6.0], [0.0, 0.0, 0.0])
            };
            source.insert(layout.asset_path(part), mesh);
        }
    }
    source
}

/// Fully loaded group for `kind` from [`library_source`].
pub fn component_group(id: &str, kind: ComponentKind) -> Result<NewGroup> {
    load_component(&library_source(), kind, id)
}

/// Group with one subtract box of `size` at `position`.
pub fn cutout_group(id: &str, size: [f64; 3], position: [f64; 3]) -> NewGroup {
    NewGroup {
        id: id.to_string(),
        name: format!("Cutout {id}"),
        component: ComponentKind::AdditionalCube,
        transform: Transform::at(position[0], position[1], position[2]),
        decor: Vec::new(),
        extras: vec![crate::state::ExtraVolume {
            volume: Volume::new(
                VolumeKind::SubtractExtra,
                "Cutout",
                VolumeGeometry::cuboid(size[0], size[1], size[2]),
            ),
            attached: false,
        }],
    }
}

// ── Parameters ──────────────────────────────────────────────────

/// The 100 mm reference enclosure.
pub fn reference_params() -> DesignParameters {
    DesignParameters::default()
}

/// 3 mm walls with the default M3 screw, which triggers the screw advisory.
pub fn thin_wall_params() -> DesignParameters {
    DesignParameters {
        wall_thickness: 3.0,
        ..DesignParameters::default()
    }
}

/// Long, flat enclosure.
pub fn flat_params() -> DesignParameters {
    DesignParameters {
        length: 160.0,
        width: 80.0,
        height: 30.0,
        ..DesignParameters::default()
    }
}

/// Walls so thick the cavity would be inverted.
pub fn inverted_params() -> DesignParameters {
    DesignParameters {
        wall_thickness: 60.0,
        ..DesignParameters::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_box_mesh_bounds() {
        let mesh = box_mesh([2.0, 4.0, 6.0], [1.0, 0.0, 0.0]);
        assert_eq!(mesh.triangle_count(), 12);
        let (min, max) = mesh.bounds().unwrap();
        assert_eq!(min, [0.0, -2.0, -3.0]);
        assert_eq!(max, [2.0, 2.0, 3.0]);
    }

    #[test]
    fn test_library_covers_all_layouts() {
        let source = library_source();
        for kind in ComponentKind::all() {
            assert!(load_component(&source, *kind, "g").is_ok(), "{kind:?}");
        }
    }

    #[test]
    fn test_presets() {
        assert!(reference_params().screw_warning().is_none());
        assert!(thin_wall_params().screw_warning().is_some());
        assert!(inverted_params().cavity_length() < 0.0);
    }
}
