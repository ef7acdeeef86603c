//! Addon lifecycle.
//!
//! [`DisplayObjectsPlugin::load`] wires the addon into the host: it loads
//! preferences, registers the `/pobj` command and attaches the overlay
//! window to the host's frame clock. [`DisplayObjectsPlugin::dispose`] undoes
//! all of that. Dropping the plugin disposes it if that has not happened yet.
//!
//! Each frame the host first ticks its [`FrameClock`], which resizes the
//! overlay surface and syncs its visibility, then calls
//! [`DisplayObjectsPlugin::draw`] with borrowed views of its object table,
//! camera and data sheets.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use dobj_host::math::Vec2;
use dobj_host::projection::WorldToScreen;
use dobj_host::sheets::GameData;
use dobj_host::table::EntitySource;

use crate::command::{CommandAction, CommandRegistry, CommandRouter};
use crate::draw::DrawList;
use crate::frame::{FrameClock, FrameInfo, FrameListener, ListenerId};
use crate::overlay::{EntityOverlayRenderer, OverlaySurface};
use crate::panel::{ConfigWindow, Ui};
use crate::preferences::{Preferences, PreferencesStore};

// ---------------------------------------------------------------------------
// Host services
// ---------------------------------------------------------------------------

/// Host services the addon registers itself with.
#[derive(Debug, Clone, Default)]
pub struct HostServices {
    pub frames: Rc<RefCell<FrameClock>>,
    pub commands: Rc<RefCell<CommandRegistry>>,
}

impl HostServices {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Borrowed host state for one frame.
#[derive(Clone, Copy)]
pub struct HostFrame<'a> {
    pub objects: &'a dyn EntitySource,
    pub projector: &'a dyn WorldToScreen,
    pub data: &'a dyn GameData,
    /// Mouse position in screen units.
    pub cursor: Vec2,
}

// ---------------------------------------------------------------------------
// OverlayWindow
// ---------------------------------------------------------------------------

/// The full-screen overlay: a surface plus the renderer that fills it.
#[derive(Debug)]
pub struct OverlayWindow {
    surface: OverlaySurface,
    renderer: EntityOverlayRenderer,
    prefs: Rc<RefCell<Preferences>>,
}

impl OverlayWindow {
    fn new(prefs: Rc<RefCell<Preferences>>) -> Self {
        Self {
            surface: OverlaySurface::default(),
            renderer: EntityOverlayRenderer::default(),
            prefs,
        }
    }

    pub fn surface(&self) -> &OverlaySurface {
        &self.surface
    }

    pub fn renderer(&self) -> &EntityOverlayRenderer {
        &self.renderer
    }

    pub fn toggle(&mut self) {
        self.surface.visible = !self.surface.visible;
    }

    /// Markers and tooltips for this frame; empty while the surface is hidden.
    pub fn draw(&self, frame: &HostFrame<'_>) -> DrawList {
        if !self.surface.visible {
            return DrawList::new();
        }
        let prefs = self.prefs.borrow();
        self.renderer
            .render_frame(&prefs, frame.objects, frame.projector, frame.data, frame.cursor)
    }
}

impl FrameListener for OverlayWindow {
    fn on_frame(&mut self, frame: &FrameInfo) {
        let prefs = self.prefs.borrow();
        self.surface.fit_to_viewport(&prefs, frame.viewport);
    }
}

// ---------------------------------------------------------------------------
// DisplayObjectsPlugin
// ---------------------------------------------------------------------------

/// The loaded addon.
pub struct DisplayObjectsPlugin<S: PreferencesStore> {
    store: S,
    prefs: Rc<RefCell<Preferences>>,
    router: CommandRouter,
    config_window: ConfigWindow,
    main_window: Rc<RefCell<OverlayWindow>>,
    frames: Weak<RefCell<FrameClock>>,
    commands: Weak<RefCell<CommandRegistry>>,
    listener: Option<ListenerId>,
}

impl<S: PreferencesStore> DisplayObjectsPlugin<S> {
    /// Load preferences from `store` and register with `host`.
    pub fn load(host: &HostServices, mut store: S) -> Self {
        let prefs = Rc::new(RefCell::new(store.load()));
        let main_window = Rc::new(RefCell::new(OverlayWindow::new(prefs.clone())));
        let router = CommandRouter::new();

        host.commands
            .borrow_mut()
            .add_handler(router.name(), router.help());
        let listener = host
            .frames
            .borrow_mut()
            .attach(crate::overlay::OVERLAY_WINDOW_NAME, main_window.clone());

        tracing::info!(
            command = router.name(),
            enabled = prefs.borrow().enabled,
            "display objects loaded"
        );

        Self {
            store,
            prefs,
            router,
            config_window: ConfigWindow::new(),
            main_window,
            frames: Rc::downgrade(&host.frames),
            commands: Rc::downgrade(&host.commands),
            listener: Some(listener),
        }
    }

    /// Handle a chat command. Returns `None` for commands that are not ours.
    pub fn on_command(&mut self, command: &str, args: &str) -> Option<CommandAction> {
        let action = {
            let mut prefs = self.prefs.borrow_mut();
            self.router
                .dispatch(command, args, &mut prefs, &mut self.store)?
        };
        if action == CommandAction::ToggleConfigUi {
            self.toggle_config_ui();
        }
        Some(action)
    }

    pub fn toggle_config_ui(&mut self) {
        self.config_window.toggle();
    }

    pub fn toggle_main_ui(&mut self) {
        self.main_window.borrow_mut().toggle();
    }

    /// Record this frame's overlay and draw the config window through `ui`.
    pub fn draw(&mut self, frame: &HostFrame<'_>, ui: &mut dyn Ui) -> DrawList {
        let list = self.main_window.borrow().draw(frame);
        let mut prefs = self.prefs.borrow_mut();
        self.config_window.draw(ui, &mut prefs, &mut self.store);
        list
    }

    /// Current preferences.
    pub fn preferences(&self) -> Preferences {
        self.prefs.borrow().clone()
    }

    pub fn config_window(&self) -> &ConfigWindow {
        &self.config_window
    }

    pub fn main_window(&self) -> std::cell::Ref<'_, OverlayWindow> {
        self.main_window.borrow()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn is_loaded(&self) -> bool {
        self.listener.is_some()
    }

    /// Detach from the frame clock and unregister the command. Calling it
    /// again does nothing.
    pub fn dispose(&mut self) {
        let Some(listener) = self.listener.take() else {
            return;
        };
        if let Some(frames) = self.frames.upgrade() {
            frames.borrow_mut().detach(listener);
        }
        if let Some(commands) = self.commands.upgrade() {
            commands.borrow_mut().remove_handler(self.router.name());
        }
        self.config_window.set_open(false);
        tracing::info!("display objects disposed");
    }
}

impl<S: PreferencesStore> Drop for DisplayObjectsPlugin<S> {
    fn drop(&mut self) {
        self.dispose();
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preferences::MemoryPreferencesStore;

    #[test]
    fn load_registers_and_dispose_unregisters() {
        let host = HostServices::new();
        let mut plugin = DisplayObjectsPlugin::load(&host, MemoryPreferencesStore::new());
        assert!(plugin.is_loaded());
        assert!(host.commands.borrow().is_registered("/pobj"));
        assert_eq!(host.frames.borrow().listener_count(), 1);

        plugin.dispose();
        assert!(!plugin.is_loaded());
        assert!(!host.commands.borrow().is_registered("/pobj"));
        assert_eq!(host.frames.borrow().listener_count(), 0);

        plugin.dispose();
        assert_eq!(host.frames.borrow().listener_count(), 0);
    }

    #[test]
    fn drop_detaches() {
        let host = HostServices::new();
        {
            let _plugin = DisplayObjectsPlugin::load(&host, MemoryPreferencesStore::new());
            assert_eq!(host.frames.borrow().listener_count(), 1);
        }
        assert_eq!(host.frames.borrow().listener_count(), 0);
        assert!(host.commands.borrow().is_empty());
    }

    #[test]
    fn frame_tick_syncs_surface() {
        let host = HostServices::new();
        let mut plugin = DisplayObjectsPlugin::load(&host, MemoryPreferencesStore::new());
        host.frames.borrow_mut().tick(Vec2::new(640.0, 480.0));
        assert!(plugin.main_window().surface().visible);
        assert_eq!(plugin.main_window().surface().size, Vec2::new(640.0, 480.0));

        plugin.on_command("/pobj", "off");
        host.frames.borrow_mut().tick(Vec2::new(640.0, 480.0));
        assert!(!plugin.main_window().surface().visible);
    }

    #[test]
    fn config_command_toggles_window_without_saving() {
        let host = HostServices::new();
        let mut plugin = DisplayObjectsPlugin::load(&host, MemoryPreferencesStore::new());
        assert!(!plugin.config_window().is_open());
        assert_eq!(
            plugin.on_command("/pobj", " config "),
            Some(CommandAction::ToggleConfigUi)
        );
        assert!(plugin.config_window().is_open());
        assert_eq!(plugin.store().saves(), 0);
        assert_eq!(plugin.on_command("/other", "on"), None);
    }
}
