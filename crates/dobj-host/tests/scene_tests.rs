//! Integration tests for scene snapshots: generation, JSON files and the
//! data they feed to overlays.

use dobj_host::prelude::*;
use tempfile::TempDir;

fn same_objects(a: &ObjectTable, b: &ObjectTable) -> bool {
    a.iter().eq(b.iter())
}

#[test]
fn scene_file_round_trip() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("scene.json");
    let scene = generate_scene(7, 64);

    std::fs::write(&path, scene.to_json_pretty().unwrap()).unwrap();
    let loaded = SceneSnapshot::load(&path).unwrap();

    assert!(same_objects(&loaded.objects, &scene.objects));
    assert_eq!(loaded.sheets, scene.sheets);
    assert_eq!(loaded.camera, scene.camera);
}

#[test]
fn missing_file_is_an_io_error() {
    let dir = TempDir::new().unwrap();
    let err = SceneSnapshot::load(&dir.path().join("nope.json")).unwrap_err();
    assert!(matches!(err, HostError::Io { .. }), "{err}");
    assert!(err.to_string().contains("nope.json"));
}

#[test]
fn malformed_file_is_a_parse_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("scene.json");
    std::fs::write(&path, "[{\"kind\": \"Player\"").unwrap();
    assert!(matches!(SceneSnapshot::load(&path), Err(HostError::Parse(_))));
}

#[test]
fn minimal_document_fills_defaults() {
    let json = r#"{
        "objects": [
            { "game_object_id": 5, "name": "Coffer", "kind": "Treasure",
              "position": { "x": 1.0, "y": 2.0, "z": 3.0 } }
        ]
    }"#;
    let scene = SceneSnapshot::from_json_str(json).unwrap();
    assert!(scene.camera.is_none());
    assert_eq!(scene.sheets, SheetSet::new());

    let coffer = scene.objects.get(5).unwrap();
    assert_eq!(coffer.kind, ObjectKind::Treasure);
    assert!(coffer.is_targetable);
    assert!(!coffer.is_dead);
    assert!(coffer.character.is_none());
    assert_eq!(coffer.position, Vec3::new(1.0, 2.0, 3.0));
}

#[test]
fn generated_scenes_are_reproducible() {
    let a = generate_scene(99, 200);
    let b = generate_scene(99, 200);
    assert_eq!(a.objects.len(), 200);
    assert!(same_objects(&a.objects, &b.objects));

    let c = generate_scene(100, 200);
    assert!(!same_objects(&a.objects, &c.objects));
}

#[test]
fn generated_scene_is_internally_consistent() {
    let scene = generate_scene(3, 500);
    let mut ids: Vec<u64> = scene.objects.iter().map(|e| e.game_object_id).collect();
    ids.sort_unstable();
    ids.dedup();
    assert_eq!(ids.len(), 500);

    for entity in scene.objects.iter() {
        assert_ne!(entity.kind, ObjectKind::None);
        assert_eq!(entity.character.is_some(), entity.kind.is_character(), "{entity:?}");
        if entity.kind != ObjectKind::BattleNpc {
            assert_eq!(entity.sub_kind, 0);
        }
    }

    // Known aetherytes resolve against the generated sheets; the rest miss.
    for crystal in scene.objects.iter().filter(|e| e.kind == ObjectKind::Aetheryte) {
        let info = resolve_aetheryte(&scene.sheets, crystal.data_id);
        assert_eq!(info.is_some(), crystal.data_id == 8, "{}", crystal.data_id);
    }
}

#[test]
fn generated_camera_sees_part_of_the_scene() {
    let scene = generate_scene(5, 300);
    let camera = scene.camera.clone().unwrap();
    let visible = scene
        .objects
        .iter()
        .filter_map(|e| camera.world_to_screen(e.position))
        .inspect(|p| {
            assert!((0.0..=camera.viewport.x).contains(&p.x), "{p:?}");
            assert!((0.0..=camera.viewport.y).contains(&p.y), "{p:?}");
        })
        .count();
    assert!(visible > 0);
}

#[test]
fn table_replaces_by_id_and_keeps_order() {
    let mut table = ObjectTable::new();
    table.insert(Entity::new(1, ObjectKind::Player, "a", Vec3::ZERO));
    table.insert(Entity::new(2, ObjectKind::Treasure, "b", Vec3::ZERO));
    let old = table.insert(Entity::new(1, ObjectKind::Player, "c", Vec3::ZERO));

    assert_eq!(old.map(|e| e.name), Some("a".to_owned()));
    let names: Vec<String> = table.entities().map(|e| e.name).collect();
    assert_eq!(names, vec!["c", "b"]);
    assert_eq!(table.count_kind(ObjectKind::Player), 1);

    assert!(table.remove(1).is_some());
    assert!(table.remove(1).is_none());
    assert_eq!(table.len(), 1);
}
