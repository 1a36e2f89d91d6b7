//! Integration tests for asynchronous component import.
//!
//! Loads run on the blocking pool; the workspace applies them on tick.

use std::sync::Arc;
use std::time::Duration;

use enclosure_lib::fixtures;
use enclosure_lib::import::MemoryMeshSource;
use enclosure_lib::Workspace;
use shared::{ComponentKind, DesignParameters};
use tokio::runtime::Handle;

fn workspace(source: MemoryMeshSource) -> Workspace {
    Workspace::new(DesignParameters::default())
        .unwrap()
        .with_imports(Arc::new(source), Handle::current())
}

#[tokio::test]
async fn test_import_joins_scene() {
    let mut ws = workspace(fixtures::library_source());
    let id = ws.request_import(ComponentKind::Esp32).unwrap();
    assert!(ws.is_import_pending(&id));
    assert!(ws.scene().group(&id).is_none());

    ws.wait_for_imports().await;
    assert_eq!(ws.pending_imports(), 0);

    let group = ws.scene().group(&id).unwrap();
    assert_eq!(group.name, "ESP32");
    assert_eq!(group.transform.rotation, [0.0, -90.0, 90.0]);
    assert_eq!(group.decor.len(), 1);
    assert_eq!(group.extras.len(), 3);
    assert_eq!(ws.scene().registry().subtract_ids().len(), 4 + 2);
    assert_eq!(ws.scene().registry().add_ids().len(), 1);
    ws.tick().unwrap();
}

#[tokio::test]
async fn test_completed_loads_apply_on_tick() {
    let mut ws = workspace(fixtures::library_source());
    let id = ws.request_import(ComponentKind::LedRgb).unwrap();

    for _ in 0..200 {
        ws.tick().unwrap();
        if ws.scene().group(&id).is_some() {
            break;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    assert!(ws.scene().group(&id).is_some());
    assert!(!ws.is_import_pending(&id));
}

#[tokio::test]
async fn test_removed_before_completion_never_registers() {
    let mut ws = workspace(fixtures::library_source());
    let id = ws.request_import(ComponentKind::ArduinoUno).unwrap();

    // Cancelling a pending import releases nothing yet.
    assert!(ws.remove_group(&id).unwrap().is_empty());
    assert!(!ws.is_import_pending(&id));

    for _ in 0..40 {
        tokio::time::sleep(Duration::from_millis(5)).await;
        ws.tick().unwrap();
        assert!(ws.scene().group(&id).is_none());
    }
    assert!(ws.scene().groups().is_empty());
    assert_eq!(ws.scene().registry().len(), 4);
    assert!(ws.import_failures().is_empty());
}

#[tokio::test]
async fn test_failed_import_registers_nothing() {
    let mut ws = workspace(MemoryMeshSource::new());
    let id = ws.request_import(ComponentKind::LcdI2c16x2).unwrap();
    ws.wait_for_imports().await;

    assert!(ws.scene().group(&id).is_none());
    assert_eq!(ws.scene().registry().len(), 4);
    let failures = ws.import_failures();
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].group_id, id);
    assert!(failures[0].error.contains("asset not found"));
}

#[tokio::test]
async fn test_additional_cube_needs_no_assets() {
    let mut ws = workspace(MemoryMeshSource::new());
    let id = ws.request_import(ComponentKind::AdditionalCube).unwrap();
    ws.wait_for_imports().await;

    ws.scene_mut().set_extra_box_size(&id, 20.0, 10.0, 5.0).unwrap();
    let cube_id = ws.scene().group(&id).unwrap().extras[0].clone();
    let cube = &ws.scene().registry().get(&cube_id).unwrap().volume;
    assert_eq!(cube.transform.scale, [20.0, 5.0, 10.0]);

    assert!(ws.scene_mut().set_extra_box_size(&id, 200.0, 10.0, 5.0).is_err());
    assert!(ws.scene_mut().set_extra_box_size(&id, 20.0, 10.0, 1.0).is_err());
}
