//! Property tests for the overlay.
//!
//! Random object tables, preferences and command sequences are generated and
//! checked against simple models of what the overlay should draw or store.

use dobj_host::prelude::*;
use dobj_overlay::prelude::*;
use proptest::prelude::*;

// ---------------------------------------------------------------------------
// Strategies
// ---------------------------------------------------------------------------

fn kind_strategy() -> impl Strategy<Value = ObjectKind> {
    (0..KIND_COUNT).prop_map(|i| ObjectKind::from_index(i).unwrap())
}

fn entities_strategy() -> impl Strategy<Value = Vec<Entity>> {
    proptest::collection::vec((kind_strategy(), 0u16..800, 0u16..600), 0..40).prop_map(|rows| {
        rows.into_iter()
            .enumerate()
            .map(|(i, (kind, x, y))| {
                Entity::new(i as u64, kind, "obj", Vec3::new(f32::from(x), f32::from(y), 0.0))
            })
            .collect()
    })
}

/// Multiples of 0.25 survive a JSON round trip exactly.
fn quarter(max: u16) -> impl Strategy<Value = f32> {
    (0..=max).prop_map(|v| f32::from(v) / 4.0)
}

fn prefs_strategy() -> impl Strategy<Value = Preferences> {
    (
        proptest::collection::vec(any::<bool>(), KIND_COUNT),
        any::<[bool; 3]>(),
        quarter(80),
        quarter(80),
    )
        .prop_map(|(kinds, [enabled, always, mouseover], radius, padding)| {
            let mut prefs = Preferences::default();
            for (kind, visible) in ObjectKind::toggleable().zip(kinds.into_iter().skip(1)) {
                prefs.set_kind_visible(kind, visible);
            }
            prefs.enabled = enabled;
            prefs.always_show_tooltip = always;
            prefs.mouseover_tooltip = mouseover;
            prefs.marker_radius = radius;
            prefs.tooltip_padding = padding;
            prefs
        })
}

fn args_strategy() -> impl Strategy<Value = &'static str> {
    prop_oneof![
        Just("on"),
        Just("off"),
        Just("config"),
        Just(""),
        Just(" on "),
        Just("flip"),
    ]
}

fn flat(world: Vec3) -> Option<Vec2> {
    Some(Vec2::new(world.x, world.y))
}

const FAR: Vec2 = Vec2::new(-1000.0, -1000.0);

// ---------------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    /// One marker per visible entity, in table order.
    #[test]
    fn markers_follow_kind_filter(entities in entities_strategy(), prefs in prefs_strategy()) {
        let list = EntityOverlayRenderer::default()
            .render_frame(&prefs, &entities, &flat, &SheetSet::new(), FAR);

        let expected: Vec<Vec2> = entities
            .iter()
            .filter(|e| prefs.is_kind_visible(e.kind))
            .map(|e| Vec2::new(e.position.x, e.position.y))
            .collect();
        prop_assert_eq!(list.markers().collect::<Vec<_>>(), expected);
    }

    /// Away from the cursor every marker gets exactly one ambient tooltip,
    /// or none at all.
    #[test]
    fn ambient_tooltips_match_markers(entities in entities_strategy(), prefs in prefs_strategy()) {
        let list = EntityOverlayRenderer::default()
            .render_frame(&prefs, &entities, &flat, &SheetSet::new(), FAR);

        let markers = list.markers().count();
        let texts = list.texts().count();
        if prefs.always_show_tooltip {
            prop_assert_eq!(texts, markers);
            prop_assert!(list.texts().all(|t| t.starts_with("obj\n[")));
        } else {
            prop_assert_eq!(texts, 0);
            prop_assert_eq!(list.len(), markers);
        }
    }

    /// Entities the projector rejects leave no trace.
    #[test]
    fn rejected_projections_are_skipped(
        entities in entities_strategy(),
        prefs in prefs_strategy(),
        cutoff in 0u16..800,
    ) {
        let cutoff = f32::from(cutoff);
        let clip = move |w: Vec3| (w.x >= cutoff).then(|| Vec2::new(w.x, w.y));
        let list = EntityOverlayRenderer::default()
            .render_frame(&prefs, &entities, &clip, &SheetSet::new(), FAR);

        let expected = entities
            .iter()
            .filter(|e| prefs.is_kind_visible(e.kind) && e.position.x >= cutoff)
            .count();
        prop_assert_eq!(list.markers().count(), expected);
        prop_assert!(list.markers().all(|p| p.x >= cutoff));
    }

    /// The same inputs always record the same frame.
    #[test]
    fn frames_are_deterministic(
        entities in entities_strategy(),
        prefs in prefs_strategy(),
        cx in 0u16..800,
        cy in 0u16..600,
    ) {
        let cursor = Vec2::new(f32::from(cx), f32::from(cy));
        let renderer = EntityOverlayRenderer::default();
        let a = renderer.render_frame(&prefs, &entities, &flat, &SheetSet::new(), cursor);
        let b = renderer.render_frame(&prefs, &entities, &flat, &SheetSet::new(), cursor);
        prop_assert_eq!(a.digest(), b.digest());
        prop_assert_eq!(a, b);
    }

    /// Saved preferences load back unchanged.
    #[test]
    fn preferences_json_round_trip(prefs in prefs_strategy()) {
        let json = serde_json::to_string(&prefs).unwrap();
        let back: Preferences = serde_json::from_str(&json).unwrap();
        prop_assert_eq!(back, prefs);
    }

    /// `/pobj` sequences agree with a two-line model and save once per
    /// mutating command.
    #[test]
    fn command_sequences_match_model(args in proptest::collection::vec(args_strategy(), 0..30)) {
        let router = CommandRouter::new();
        let mut prefs = Preferences::default();
        let mut store = MemoryPreferencesStore::new();
        let mut enabled = true;
        let mut saves = 0;

        for arg in &args {
            let action = router.dispatch(COMMAND_NAME, arg, &mut prefs, &mut store);
            match arg.trim() {
                "on" => enabled = true,
                "off" => enabled = false,
                "config" => {}
                _ => enabled = !enabled,
            }
            if arg.trim() != "config" {
                saves += 1;
            }
            prop_assert!(action.is_some());
            prop_assert_eq!(prefs.enabled, enabled);
        }
        prop_assert_eq!(store.saves(), saves);
    }

    /// Glyph pixels never leave the measured text box.
    #[test]
    fn rasterized_text_fits_its_size(text in "[A-Za-z0-9 :,./()<>\\[\\]\t\n-]{0,40}", scale in 1u8..4) {
        let font = GlyphFont::new(f32::from(scale));
        let size = font.calc_text_size(&text);
        let origin = Vec2::new(10.0, 20.0);
        for px in font.rasterize(&text, origin) {
            prop_assert!(px.min.x >= origin.x && px.min.y >= origin.y);
            prop_assert!(px.max.x <= origin.x + size.x + 1e-3);
            prop_assert!(px.max.y <= origin.y + size.y + 1e-3);
        }
    }
}
