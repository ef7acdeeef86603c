//! Display Objects overlay in a window.
//!
//! Run with: `cargo run -p dobj-overlay --example overlay_visual --features renderer`
//!
//! Optional arguments: a scene JSON file to load instead of a generated one,
//! or `--seed N` and `--count N` for the generator. Preferences are kept in
//! a `display-objects` directory under the system temp dir.
//!
//! Keys: `c` config window, `o` toggle overlay, `m` toggle main window.

use dobj_host::kind::ObjectKind;
use dobj_host::scene::{generate_scene, SceneSnapshot};
use dobj_overlay::logging::{init_tracing, DEFAULT_FILTER};
use dobj_overlay::preferences::JsonPreferencesStore;
use dobj_overlay::render::{run_windowed, OverlayDemo};

fn main() -> Result<(), anyhow::Error> {
    init_tracing(DEFAULT_FILTER);

    let mut seed = 7u64;
    let mut count = 150usize;
    let mut scene_path = None;
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--seed" => seed = args.next().unwrap_or_default().parse()?,
            "--count" => count = args.next().unwrap_or_default().parse()?,
            path => scene_path = Some(std::path::PathBuf::from(path)),
        }
    }

    let scene = match scene_path {
        Some(path) => SceneSnapshot::load(&path)?,
        None => generate_scene(seed, count),
    };

    let store = JsonPreferencesStore::in_dir(std::env::temp_dir().join("display-objects"))
        .with_defaults([
            ObjectKind::Player,
            ObjectKind::BattleNpc,
            ObjectKind::EventNpc,
            ObjectKind::Treasure,
            ObjectKind::Aetheryte,
        ]);

    run_windowed(
        OverlayDemo {
            scene,
            store,
            orbit_speed: 0.002,
        },
        "Display Objects",
        1280,
        720,
    )
}
