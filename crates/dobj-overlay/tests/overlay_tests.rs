//! Integration tests for the per-frame overlay.
//!
//! Most tests use a projector that maps world `(x, y)` straight to screen
//! `(x, y)` so marker positions are easy to reason about, and a 1x glyph
//! font so text sizes are small whole numbers.

use dobj_host::prelude::*;
use dobj_overlay::prelude::*;
use dobj_overlay::tooltip;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn flat(world: Vec3) -> Option<Vec2> {
    Some(Vec2::new(world.x, world.y))
}

fn renderer() -> EntityOverlayRenderer<GlyphFont> {
    EntityOverlayRenderer::new(GlyphFont::new(1.0))
}

fn all_kinds() -> Preferences {
    Preferences::with_visible_kinds(ObjectKind::toggleable())
}

fn limsa() -> SheetSet {
    let mut sheets = SheetSet::new();
    sheets.add_action(141, "Fire");
    sheets.add_place_name(22, "La Noscea");
    sheets.add_place_name(27, "Limsa Lominsa");
    sheets.add_place_name(28, "Limsa Lominsa Lower Decks");
    sheets.add_place_name(41, "Limsa Lominsa Aetheryte Plaza");
    sheets.add_territory(TerritoryRow {
        row_id: 129,
        place_name: 28,
        place_name_zone: 27,
        place_name_region: 22,
    });
    sheets.add_aetheryte(AetheryteRow {
        row_id: 8,
        place_name: 41,
        territory: 129,
    });
    sheets
}

fn casting_player(pos: Vec3) -> Entity {
    Entity::new(0x1000_0001, ObjectKind::Player, "Y'shtola Rhul", pos)
        .with_ids(0x4000_0001, 0)
        .with_character(CharacterState {
            company_tag: "Crys".into(),
            level: 100,
            hp: Gauge::new(40_000, 52_000),
            mp: Gauge::full(10_000),
            status: StatusFlags::IN_COMBAT | StatusFlags::IS_CASTING,
            cast: Some(CastInfo {
                action_id: 141,
                action_type: 1,
                current_time: 0.5,
                total_time: 2.5,
                interruptible: true,
            }),
            ..Default::default()
        })
}

// ---------------------------------------------------------------------------
// Mode selection and layout
// ---------------------------------------------------------------------------

#[test]
fn hover_within_twenty_shows_full_tooltip_and_detail() {
    let entity = casting_player(Vec3::new(200.0, 150.0, 0.0));
    let entities = vec![entity.clone()];
    let sheets = limsa();
    let prefs = all_kinds();
    let cursor = Vec2::new(210.0, 150.0);
    let r = renderer();

    let list = r.render_frame(&prefs, &entities, &flat, &sheets, cursor);

    let full = tooltip::full_tooltip(&entity);
    let detail = tooltip::detail_tooltip(&entity, &sheets);
    assert!(detail.contains("Casting Fire [141]"), "{detail}");

    let pad = prefs.tooltip_padding;
    let s = r.metrics().calc_text_size(&full);
    let d = r.metrics().calc_text_size(&detail);
    let bg = Color::BLACK.with_alpha(0.33);

    let expected = vec![
        DrawCommand::CircleFilled {
            center: Vec2::new(200.0, 150.0),
            radius: 3.5,
            color: Color::RED,
        },
        DrawCommand::RectFilled {
            min: Vec2::new(cursor.x + pad, cursor.y + pad),
            max: Vec2::new(cursor.x + 3.0 * pad + s.x, cursor.y + 3.0 * pad + s.y),
            color: bg,
            rounding: pad,
        },
        DrawCommand::Text {
            pos: Vec2::new(cursor.x + 2.0 * pad, cursor.y + 2.0 * pad),
            color: Color::WHITE,
            text: full,
        },
        DrawCommand::RectFilled {
            min: Vec2::new(cursor.x + 4.0 * pad + s.x, cursor.y + pad),
            max: Vec2::new(
                cursor.x + 6.0 * pad + s.x + d.x,
                cursor.y + 3.0 * pad + d.y,
            ),
            color: bg,
            rounding: pad,
        },
        DrawCommand::Text {
            pos: Vec2::new(cursor.x + 5.0 * pad + s.x, cursor.y + 2.0 * pad),
            color: Color::WHITE,
            text: detail,
        },
    ];
    assert_eq!(list.commands(), expected.as_slice());
}

#[test]
fn cursor_at_twenty_five_is_ambient() {
    let entity = casting_player(Vec3::new(200.0, 150.0, 0.0));
    let entities = vec![entity.clone()];
    let list = renderer().render_frame(
        &all_kinds(),
        &entities,
        &flat,
        &limsa(),
        Vec2::new(225.0, 150.0),
    );

    assert_eq!(list.len(), 3);
    assert_eq!(
        list.texts().collect::<Vec<_>>(),
        vec!["Y'shtola Rhul <Crys>\n[Player]"]
    );
    // Ambient tooltips hang off the marker, not the cursor.
    match &list.commands()[2] {
        DrawCommand::Text { pos, .. } => assert_eq!(*pos, Vec2::new(210.0, 160.0)),
        other => panic!("expected text, got {other:?}"),
    }
}

#[test]
fn hover_disabled_falls_back_to_ambient() {
    let entities = vec![casting_player(Vec3::new(200.0, 150.0, 0.0))];
    let prefs = Preferences {
        mouseover_tooltip: false,
        ..all_kinds()
    };
    let list = renderer().render_frame(&prefs, &entities, &flat, &limsa(), Vec2::new(200.0, 150.0));
    assert_eq!(list.texts().count(), 1);
    assert!(list.texts().all(|t| t.ends_with("[Player]")));
}

#[test]
fn hover_without_detail_draws_single_tooltip() {
    let coffer = Entity::new(9, ObjectKind::Treasure, "Treasure Coffer", Vec3::new(50.0, 50.0, 0.0));
    let entities = vec![coffer.clone()];
    let list = renderer().render_frame(&all_kinds(), &entities, &flat, &limsa(), Vec2::new(55.0, 55.0));

    assert_eq!(list.len(), 3);
    assert_eq!(list.texts().collect::<Vec<_>>(), vec![tooltip::full_tooltip(&coffer)]);
}

#[test]
fn hovered_aetheryte_shows_location_names() {
    let crystal =
        Entity::new(3, ObjectKind::Aetheryte, "aetheryte", Vec3::new(400.0, 300.0, 0.0)).with_ids(0, 8);
    let entities = vec![crystal];
    let list = renderer().render_frame(&all_kinds(), &entities, &flat, &limsa(), Vec2::new(400.0, 300.0));

    let texts: Vec<_> = list.texts().collect();
    assert_eq!(texts.len(), 2);
    assert_eq!(
        texts[1],
        "Zone: Limsa Lominsa\nRegion: La Noscea\nTerritory: Limsa Lominsa Lower Decks [129]\nAetheryte: Limsa Lominsa Aetheryte Plaza [8]"
    );
}

#[test]
fn hovered_aetheryte_with_missing_rows_has_no_detail() {
    let crystal =
        Entity::new(3, ObjectKind::Aetheryte, "aetheryte", Vec3::new(400.0, 300.0, 0.0)).with_ids(0, 77);
    let entities = vec![crystal];
    let list = renderer().render_frame(&all_kinds(), &entities, &flat, &limsa(), Vec2::new(400.0, 300.0));
    assert_eq!(list.len(), 3);
}

#[test]
fn no_tooltip_when_both_modes_off() {
    let prefs = Preferences {
        always_show_tooltip: false,
        mouseover_tooltip: false,
        ..all_kinds()
    };
    let entities = vec![casting_player(Vec3::new(10.0, 10.0, 0.0))];
    let list = renderer().render_frame(&prefs, &entities, &flat, &limsa(), Vec2::new(10.0, 10.0));
    assert_eq!(list.len(), 1);
}

#[test]
fn marker_uses_configured_radius() {
    let prefs = Preferences {
        marker_radius: 8.0,
        always_show_tooltip: false,
        ..all_kinds()
    };
    let entities = vec![Entity::new(1, ObjectKind::Housing, "", Vec3::new(1.0, 2.0, 0.0))];
    let list = renderer().render_frame(&prefs, &entities, &flat, &limsa(), Vec2::new(900.0, 900.0));
    assert_eq!(
        list.commands(),
        &[DrawCommand::CircleFilled {
            center: Vec2::new(1.0, 2.0),
            radius: 8.0,
            color: Color::RED,
        }]
    );
}

// ---------------------------------------------------------------------------
// Filtering
// ---------------------------------------------------------------------------

#[test]
fn disabled_kinds_are_skipped() {
    let entities = vec![
        Entity::new(1, ObjectKind::Player, "Visible", Vec3::new(10.0, 10.0, 0.0)),
        Entity::new(2, ObjectKind::BattleNpc, "Hidden", Vec3::new(20.0, 20.0, 0.0)),
        Entity::new(3, ObjectKind::None, "Never", Vec3::new(30.0, 30.0, 0.0)),
    ];
    let prefs = Preferences::with_visible_kinds([ObjectKind::Player]);
    let list = renderer().render_frame(&prefs, &entities, &flat, &limsa(), Vec2::new(900.0, 900.0));

    assert_eq!(list.markers().collect::<Vec<_>>(), vec![Vec2::new(10.0, 10.0)]);
    assert!(list.texts().all(|t| !t.contains("Hidden") && !t.contains("Never")));
}

#[test]
fn none_kind_is_skipped_even_if_flag_is_set() {
    let mut prefs = all_kinds();
    prefs.enabled_kinds[0] = true;
    let entities = vec![Entity::new(1, ObjectKind::None, "", Vec3::ZERO)];
    let list = renderer().render_frame(&prefs, &entities, &flat, &limsa(), Vec2::ZERO);
    assert!(list.is_empty());
}

#[test]
fn failed_projection_draws_nothing() {
    let entities = vec![
        Entity::new(1, ObjectKind::Player, "Front", Vec3::new(10.0, 10.0, 0.0)),
        Entity::new(2, ObjectKind::Player, "Behind", Vec3::new(-10.0, 10.0, 0.0)),
    ];
    let front_only = |w: Vec3| (w.x >= 0.0).then(|| Vec2::new(w.x, w.y));
    let list = renderer().render_frame(&all_kinds(), &entities, &front_only, &limsa(), Vec2::new(10.0, 10.0));

    assert_eq!(list.markers().count(), 1);
    assert!(list.texts().all(|t| !t.contains("Behind")));
}

#[test]
fn perspective_camera_culls_objects_behind() {
    let camera = PerspectiveCamera::looking_at(Vec3::ZERO, Vec3::new(0.0, 0.0, 1.0), Vec2::new(800.0, 600.0));
    let mut objects = ObjectTable::new();
    objects.insert(Entity::new(1, ObjectKind::Treasure, "", Vec3::new(0.0, 0.0, 10.0)));
    objects.insert(Entity::new(2, ObjectKind::Treasure, "", Vec3::new(0.0, 0.0, -10.0)));

    let list = renderer().render_frame(&all_kinds(), &objects, &camera, &limsa(), Vec2::ZERO);
    assert_eq!(list.markers().collect::<Vec<_>>(), vec![Vec2::new(400.0, 300.0)]);
}

// ---------------------------------------------------------------------------
// Determinism
// ---------------------------------------------------------------------------

#[test]
fn identical_inputs_give_identical_frames() {
    let scene = generate_scene(11, 300);
    let camera = scene.camera.clone().unwrap();
    let r = EntityOverlayRenderer::default();
    let prefs = all_kinds();
    let cursor = Vec2::new(640.0, 360.0);

    let a = r.render_frame(&prefs, &scene.objects, &camera, &scene.sheets, cursor);
    let b = r.render_frame(&prefs, &scene.objects, &camera, &scene.sheets, cursor);
    assert!(!a.is_empty());
    assert_eq!(a, b);
    assert_eq!(a.digest(), b.digest());
}

#[test]
fn moving_the_cursor_changes_the_digest() {
    let entities = vec![casting_player(Vec3::new(200.0, 150.0, 0.0))];
    let r = renderer();
    let near = r.render_frame(&all_kinds(), &entities, &flat, &limsa(), Vec2::new(201.0, 150.0));
    let far = r.render_frame(&all_kinds(), &entities, &flat, &limsa(), Vec2::new(600.0, 150.0));
    assert_ne!(near.digest(), far.digest());
}

#[test]
fn entities_are_drawn_in_source_order() {
    let entities: Vec<Entity> = (0..5)
        .map(|i| Entity::new(i, ObjectKind::EventObj, "", Vec3::new(i as f32 * 100.0, 0.0, 0.0)))
        .collect();
    let list = renderer().render_frame(&all_kinds(), &entities, &flat, &limsa(), Vec2::new(-500.0, -500.0));
    let xs: Vec<f32> = list.markers().map(|p| p.x).collect();
    assert_eq!(xs, vec![0.0, 100.0, 200.0, 300.0, 400.0]);
}
