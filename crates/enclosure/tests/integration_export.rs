//! Integration tests for export artifacts.
//!
//! STL encodings, the manifest and writing the bundle to disk.

use std::fs::File;
use std::io::BufReader;

use enclosure_lib::fixtures;
use enclosure_lib::import::read_stl;
use enclosure_lib::state::ExportNames;
use enclosure_lib::validation::binary_stl_triangle_count;
use enclosure_lib::Workspace;
use shared::{ComponentKind, ManifestEntry, StlFormat, Transform};

fn populated_workspace() -> Workspace {
    let mut ws = Workspace::new(fixtures::reference_params()).unwrap();
    let group = fixtures::component_group("uno", ComponentKind::ArduinoUno).unwrap();
    ws.scene_mut().add_group(group).unwrap();
    ws.set_group_transform("uno", Transform::at(0.0, 20.0, 0.0)).unwrap();
    ws.tick().unwrap();
    ws
}

#[test]
fn test_binary_bundle_matches_solids() {
    let ws = populated_workspace();
    let (enclosure, lid) = ws.compose().unwrap();
    let bundle = ws.export(StlFormat::Binary).unwrap();

    assert_eq!(
        binary_stl_triangle_count(&bundle.enclosure),
        Some(enclosure.triangle_count() as u32)
    );
    assert_eq!(
        binary_stl_triangle_count(&bundle.lid),
        Some(lid.triangle_count() as u32)
    );
}

#[test]
fn test_manifest_lists_groups_then_parameters() {
    let ws = populated_workspace();
    let bundle = ws.export(StlFormat::Binary).unwrap();
    let entries: Vec<ManifestEntry> = serde_json::from_str(&bundle.manifest).unwrap();
    assert_eq!(entries.len(), 2);

    match &entries[0] {
        ManifestEntry::Component(p) => {
            assert_eq!(p.name, "Arduino Uno");
            assert_eq!(p.position, [0.0, 20.0, 0.0]);
        }
        other => panic!("unexpected {other:?}"),
    }
    match &entries[1] {
        ManifestEntry::Enclosure(r) => {
            assert_eq!(r.height, 100.0);
            assert_eq!(r.wall_thickness, 4.0);
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn test_written_files_read_back() {
    let ws = populated_workspace();
    let dir = std::env::temp_dir().join(format!("enclosure-it-{}", uuid::Uuid::new_v4()));
    let names = ExportNames::default();

    for format in [StlFormat::Binary, StlFormat::Ascii] {
        let bundle = ws.export(format).unwrap();
        let written = bundle.write_to_dir(&dir, &names).unwrap();
        assert_eq!(written.len(), 3);

        let (enclosure, lid) = ws.compose().unwrap();
        for (name, solid) in [(&names.enclosure, &enclosure), (&names.lid, &lid)] {
            let path = dir.join(name);
            let mut reader = BufReader::new(File::open(&path).unwrap());
            let mesh = read_stl(&path, &mut reader).unwrap();
            assert!(mesh.triangle_count() <= solid.triangle_count());
            assert!(mesh.triangle_count() > 0);
        }
    }

    let manifest = std::fs::read_to_string(dir.join(&names.manifest)).unwrap();
    assert!(manifest.contains("\"name\": \"Arduino Uno\""));
    std::fs::remove_dir_all(&dir).unwrap();
}
