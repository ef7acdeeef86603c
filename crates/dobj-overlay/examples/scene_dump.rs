//! Render one overlay frame headless and print it as JSON.
//!
//! Run with: `cargo run -p dobj-overlay --example scene_dump -- [seed] [count]`
//!
//! The cursor is placed on the first visible marker so the output includes
//! a full tooltip and its detail block. The BLAKE3 digest of the draw list
//! goes to stderr.

use dobj_host::prelude::*;
use dobj_overlay::logging::{init_tracing, DEFAULT_FILTER};
use dobj_overlay::prelude::*;

fn main() -> Result<(), anyhow::Error> {
    init_tracing(DEFAULT_FILTER);

    let mut args = std::env::args().skip(1);
    let seed: u64 = args.next().map(|s| s.parse()).transpose()?.unwrap_or(7);
    let count: usize = args.next().map(|s| s.parse()).transpose()?.unwrap_or(40);

    let scene = generate_scene(seed, count);
    let camera = scene
        .camera
        .clone()
        .ok_or_else(|| anyhow::anyhow!("generated scene has no camera"))?;

    let defaults = Preferences::with_visible_kinds(ObjectKind::toggleable());
    let host = HostServices::new();
    let mut plugin = DisplayObjectsPlugin::load(&host, MemoryPreferencesStore::with_defaults(defaults));
    host.frames.borrow_mut().tick(camera.viewport);

    let cursor = scene
        .objects
        .iter()
        .find_map(|e| camera.world_to_screen(e.position))
        .unwrap_or(Vec2::ZERO);

    let frame = HostFrame {
        objects: &scene.objects,
        projector: &camera,
        data: &scene.sheets,
        cursor,
    };
    let font = GlyphFont::default();
    let mut ui = DrawListUi::begin("", Vec2::ZERO, &font, None);
    let list = plugin.draw(&frame, &mut ui);
    plugin.dispose();

    println!("{}", serde_json::to_string_pretty(&list)?);
    eprintln!(
        "{} commands, {} markers, digest {}",
        list.len(),
        list.markers().count(),
        list.digest()
    );
    Ok(())
}
