//! Integration tests for the enclosure pipeline.
//!
//! Derivation, attachment, group removal and export determinism through the
//! public workspace API.

use approx::assert_relative_eq;
use enclosure_lib::fixtures;
use enclosure_lib::geometry::{EnclosureGeometryBuilder, SCREW_POST_IDS};
use enclosure_lib::harness::TestHarness;
use enclosure_lib::validation::SolidValidator;
use enclosure_lib::{EnclosureError, Workspace};
use shared::{ComponentKind, DesignParameters, ScrewClass, Transform};

#[test]
fn test_reference_enclosure_dimensions() {
    let state = EnclosureGeometryBuilder::derive(&fixtures::reference_params()).unwrap();
    assert_eq!(state.cavity.geometry.extents(), Some([92.0, 100.0, 92.0]));

    for post in &state.screw_posts {
        let [x, _, z] = post.transform.position;
        assert_relative_eq!(x.abs(), 48.25);
        assert_relative_eq!(z.abs(), 48.25);
        assert_eq!(post.geometry.extents().map(|e| e[0]), Some(3.3));
    }
}

#[test]
fn test_inverted_cavity_is_rejected() {
    let err = Workspace::new(fixtures::inverted_params()).err().unwrap();
    match err {
        EnclosureError::InvalidParameters(msg) => assert!(msg.contains("-20"), "{msg}"),
        other => panic!("unexpected error {other:?}"),
    }
}

#[test]
fn test_floor_boss_reaches_floor() {
    let mut ws = Workspace::new(DesignParameters::default()).unwrap();
    let group = fixtures::component_group("uno", ComponentKind::ArduinoUno).unwrap();
    ws.scene_mut().add_group(group).unwrap();
    ws.set_group_transform("uno", Transform::at(0.0, 40.0, 0.0)).unwrap();
    ws.tick().unwrap();

    let attached = ws.scene().registry().attached_ids();
    assert_eq!(attached.len(), 1);
    let boss = &ws.scene().registry().get(&attached[0]).unwrap().volume;
    assert_relative_eq!(boss.transform.scale[2], 40.0, epsilon = 1e-9);
    assert_eq!(boss.transform.scale[0], 1.0);

    // Rotated off the floor, the boss falls back to unit length.
    ws.set_group_transform(
        "uno",
        Transform::at(0.0, 40.0, 0.0).with_rotation(0.0, 0.0, 45.0),
    )
    .unwrap();
    ws.tick().unwrap();
    let boss = &ws.scene().registry().get(&attached[0]).unwrap().volume;
    assert_eq!(boss.transform.scale, [1.0, 1.0, 1.0]);
}

#[test]
fn test_removed_group_leaves_export() {
    let mut ws = Workspace::new(DesignParameters::default()).unwrap();
    let (baseline, _) = ws.compose().unwrap();

    // 10 mm cube straddling the +X wall removes a 4 x 10 x 10 plug.
    let group = fixtures::cutout_group("cut", [10.0, 10.0, 10.0], [50.0, 50.0, 0.0]);
    let extras = group.extras.len();
    ws.scene_mut().add_group(group).unwrap();
    assert_eq!(ws.scene().registry().subtract_ids().len(), 4 + extras);

    let (cut, _) = ws.compose().unwrap();
    assert_relative_eq!(cut.volume(), baseline.volume() - 400.0, max_relative = 1e-4);

    let removed = ws.remove_group("cut").unwrap();
    assert_eq!(removed.len(), extras);
    for id in &removed {
        assert!(!ws.scene().registry().contains(id));
        assert!(!ws.scene().registry().subtract_ids().contains(id));
        assert!(!ws.scene().registry().add_ids().contains(id));
    }

    let (after, _) = ws.compose().unwrap();
    assert_relative_eq!(after.volume(), baseline.volume(), max_relative = 1e-9);
}

#[test]
fn test_repeated_exports_are_identical() {
    let mut h = TestHarness::new().unwrap();
    h.import_component(ComponentKind::LedRgb).unwrap();
    h.tick().unwrap();

    let (a_enclosure, a_lid) = h.workspace.compose().unwrap();
    let (b_enclosure, b_lid) = h.workspace.compose().unwrap();

    assert_eq!(a_enclosure.triangle_count(), b_enclosure.triangle_count());
    assert_eq!(a_lid.triangle_count(), b_lid.triangle_count());
    assert_relative_eq!(a_enclosure.volume(), b_enclosure.volume(), max_relative = 1e-12);
    assert_relative_eq!(a_lid.volume(), b_lid.volume(), max_relative = 1e-12);
    assert_eq!(a_enclosure.bounds(), b_enclosure.bounds());
}

#[test]
fn test_derivation_is_idempotent_and_positive() {
    let lengths = [20.0, 100.0, 180.0];
    let walls = [3.0, 4.0, 8.0];
    let screws = [ScrewClass::M2, ScrewClass::M3, ScrewClass::M4];
    for length in lengths {
        for wall in walls {
            for screw in screws {
                let params = DesignParameters {
                    length,
                    width: length,
                    wall_thickness: wall,
                    screw,
                    ..DesignParameters::default()
                };
                let a = EnclosureGeometryBuilder::derive(&params).unwrap();
                let b = EnclosureGeometryBuilder::derive(&params).unwrap();
                assert_eq!(a, b);
                for volume in a.volumes() {
                    let extents = volume.geometry.extents().unwrap();
                    assert!(extents.iter().all(|e| *e > 0.0), "{} {extents:?}", volume.id);
                }
            }
        }
    }
}

#[test]
fn test_exported_solids_are_closed() {
    let mut ws = Workspace::new(fixtures::flat_params()).unwrap();
    let group = fixtures::component_group("lcd", ComponentKind::LcdI2c16x2).unwrap();
    ws.scene_mut().add_group(group).unwrap();
    ws.set_group_transform("lcd", Transform::at(0.0, 15.0, 0.0)).unwrap();
    ws.tick().unwrap();

    let (enclosure, lid) = ws.compose().unwrap();
    for solid in [&enclosure, &lid] {
        let errors = SolidValidator::new(solid).validate_all();
        assert!(errors.is_empty(), "{}: {errors:?}", solid.label());
    }
    assert!(SolidValidator::new(&lid).assert_dimensions_approx([160.0, 1.0, 80.0], 1e-3));
}

#[test]
fn test_hidden_post_is_not_drilled() {
    let mut ws = Workspace::new(DesignParameters::default()).unwrap();
    let (_, drilled) = ws.compose().unwrap();

    ws.scene_mut().toggle_volume(SCREW_POST_IDS[0]).unwrap();
    let (_, fewer) = ws.compose().unwrap();
    assert!(fewer.volume() > drilled.volume());

    ws.scene_mut().toggle_volume(SCREW_POST_IDS[0]).unwrap();
    let (_, again) = ws.compose().unwrap();
    assert_relative_eq!(again.volume(), drilled.volume(), max_relative = 1e-9);
}
