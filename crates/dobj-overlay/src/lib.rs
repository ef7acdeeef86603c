//! Display Objects -- an in-game overlay that marks world objects and shows
//! their state in tooltips.
//!
//! Every frame the overlay walks the host's object table, keeps the kinds the
//! user enabled, projects each object to the screen and records a red marker
//! plus a tooltip into a backend-independent [`DrawList`](draw::DrawList).
//! Hovering a marker expands the tooltip and adds a detail block built from
//! the object's character state or the game's data sheets.
//!
//! Around that core sit the usual addon pieces: JSON preferences, the `/pobj`
//! chat command, a configuration window and the plugin lifecycle that
//! registers all of it with the host. With the `renderer` feature the draw
//! list can be shown in a wgpu window.
//!
//! # Quick Start
//!
//! ```
//! use dobj_host::prelude::*;
//! use dobj_overlay::prelude::*;
//!
//! let mut objects = ObjectTable::new();
//! objects.insert(Entity::new(1, ObjectKind::Treasure, "Treasure Coffer", Vec3::new(0.0, 0.0, 10.0)));
//!
//! let camera = PerspectiveCamera::looking_at(Vec3::ZERO, Vec3::new(0.0, 0.0, 1.0), Vec2::new(800.0, 600.0));
//! let prefs = Preferences::with_visible_kinds([ObjectKind::Treasure]);
//!
//! let renderer = EntityOverlayRenderer::default();
//! let list = renderer.render_frame(&prefs, &objects, &camera, &SheetSet::new(), Vec2::ZERO);
//!
//! assert_eq!(list.markers().collect::<Vec<_>>(), vec![Vec2::new(400.0, 300.0)]);
//! assert_eq!(list.texts().collect::<Vec<_>>(), vec!["Treasure Coffer\n[Treasure]"]);
//! ```

#![deny(unsafe_code)]

pub mod command;
pub mod draw;
pub mod frame;
pub mod logging;
pub mod overlay;
pub mod panel;
pub mod plugin;
pub mod preferences;
pub mod render;
pub mod text;
pub mod tooltip;

/// Re-export the host model crate.
pub use dobj_host;

// ---------------------------------------------------------------------------
// Prelude
// ---------------------------------------------------------------------------

/// Convenience re-exports for embedding the overlay.
pub mod prelude {
    pub use crate::command::{CommandAction, CommandRegistry, CommandRouter, COMMAND_NAME};
    pub use crate::draw::{Color, DrawCommand, DrawList};
    pub use crate::frame::{FrameClock, FrameDiagnostics, FrameInfo, FrameListener, ListenerId};
    pub use crate::overlay::{
        EntityOverlayRenderer, OverlayStyle, OverlaySurface, TooltipMode, WindowFlags,
    };
    pub use crate::panel::{ConfigWindow, DrawListUi, Ui};
    pub use crate::plugin::{DisplayObjectsPlugin, HostFrame, HostServices, OverlayWindow};
    pub use crate::preferences::{
        JsonPreferencesStore, MemoryPreferencesStore, Preferences, PreferencesError,
        PreferencesStore,
    };
    pub use crate::text::{GlyphFont, TextMetrics};
}
