//! The configuration window.
//!
//! Widgets are immediate-mode: [`ConfigWindow::draw`] is called every frame
//! and asks a [`Ui`] to show each checkbox, mutating preferences on the
//! frame a checkbox is toggled. [`DrawListUi`] is a minimal `Ui` that lays
//! rows out top to bottom into a [`DrawList`] and hit-tests a single click.

use dobj_host::kind::ObjectKind;
use dobj_host::math::Vec2;

use crate::draw::{Color, DrawList};
use crate::overlay::WindowFlags;
use crate::preferences::{Preferences, PreferencesStore};
use crate::text::{GlyphFont, TextMetrics};

/// Title of the configuration window.
pub const CONFIG_WINDOW_TITLE: &str = "Display objects configurations";

// ---------------------------------------------------------------------------
// Ui
// ---------------------------------------------------------------------------

/// Immediate-mode widget calls used by the configuration window.
pub trait Ui {
    /// Show a checkbox bound to `value`. Returns `true` on the frame the
    /// user toggles it, after `value` has been updated.
    fn checkbox(&mut self, label: &str, value: &mut bool) -> bool;

    /// Show a line of static text.
    fn text(&mut self, text: &str);
}

// ---------------------------------------------------------------------------
// ConfigWindow
// ---------------------------------------------------------------------------

/// Checkboxes for every preference the user can toggle.
#[derive(Debug, Clone)]
pub struct ConfigWindow {
    title: String,
    flags: WindowFlags,
    open: bool,
}

impl ConfigWindow {
    /// A closed configuration window.
    pub fn new() -> Self {
        Self {
            title: CONFIG_WINDOW_TITLE.to_owned(),
            flags: WindowFlags::NO_COLLAPSE,
            open: false,
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn flags(&self) -> WindowFlags {
        self.flags
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn set_open(&mut self, open: bool) {
        self.open = open;
    }

    pub fn toggle(&mut self) {
        self.open = !self.open;
        tracing::debug!(open = self.open, "config window toggled");
    }

    /// Draw the window if it is open. Each toggled checkbox saves the
    /// preferences once. Returns whether anything changed.
    pub fn draw(
        &mut self,
        ui: &mut dyn Ui,
        prefs: &mut Preferences,
        store: &mut dyn PreferencesStore,
    ) -> bool {
        if !self.open {
            return false;
        }
        let mut changed = false;
        let mut save_if = |toggled: bool, prefs: &Preferences| {
            if toggled {
                store.save(prefs);
                changed = true;
            }
        };

        let toggled = ui.checkbox("Enabled", &mut prefs.enabled);
        save_if(toggled, prefs);
        let toggled = ui.checkbox("Always show tooltip", &mut prefs.always_show_tooltip);
        save_if(toggled, prefs);
        let toggled = ui.checkbox("Show details when mouseover", &mut prefs.mouseover_tooltip);
        save_if(toggled, prefs);

        ui.text("Enable for object types:");
        for kind in ObjectKind::toggleable() {
            let mut visible = prefs.is_kind_visible(kind);
            if ui.checkbox(&kind.to_string(), &mut visible) {
                prefs.set_kind_visible(kind, visible);
                save_if(true, prefs);
            }
        }
        changed
    }
}

impl Default for ConfigWindow {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// DrawListUi
// ---------------------------------------------------------------------------

const ROW_GAP: f32 = 4.0;
const PANEL_PADDING: f32 = 8.0;

/// Lays widgets out as rows in a [`DrawList`].
#[derive(Debug)]
pub struct DrawListUi<'a> {
    font: &'a GlyphFont,
    origin: Vec2,
    cursor_y: f32,
    width: f32,
    click: Option<Vec2>,
    content: DrawList,
}

impl<'a> DrawListUi<'a> {
    /// Start a panel titled `title` with its top-left corner at `origin`.
    /// `click` is the position of a click this frame, if any.
    pub fn begin(title: &str, origin: Vec2, font: &'a GlyphFont, click: Option<Vec2>) -> Self {
        let mut ui = Self {
            font,
            origin,
            cursor_y: origin.y + PANEL_PADDING,
            width: 0.0,
            click,
            content: DrawList::new(),
        };
        ui.text(title);
        ui
    }

    fn row_height(&self) -> f32 {
        self.font.line_height() + ROW_GAP
    }

    fn box_size(&self) -> f32 {
        self.font.calc_text_size("X").y
    }

    /// Finish the panel: a background rectangle followed by its rows.
    pub fn finish(self) -> DrawList {
        let mut list = DrawList::new();
        list.add_rect_filled(
            self.origin,
            Vec2::new(
                self.origin.x + self.width + 2.0 * PANEL_PADDING,
                self.cursor_y + PANEL_PADDING - ROW_GAP,
            ),
            Color::rgba(0.1, 0.1, 0.12, 0.9),
            4.0,
        );
        list.extend(self.content);
        list
    }
}

impl Ui for DrawListUi<'_> {
    fn checkbox(&mut self, label: &str, value: &mut bool) -> bool {
        let x = self.origin.x + PANEL_PADDING;
        let y = self.cursor_y;
        let side = self.box_size();
        let label_x = x + side + ROW_GAP * 2.0;
        let label_size = self.font.calc_text_size(label);
        let row_max = Vec2::new(label_x + label_size.x, y + side);

        let toggled = self.click.is_some_and(|c| {
            c.x >= x && c.x <= row_max.x && c.y >= y && c.y <= row_max.y
        });
        if toggled {
            *value = !*value;
            self.click = None;
        }

        self.content.add_rect_filled(
            Vec2::new(x, y),
            Vec2::new(x + side, y + side),
            Color::rgba(0.3, 0.3, 0.35, 1.0),
            1.0,
        );
        if *value {
            let inset = side * 0.25;
            self.content.add_rect_filled(
                Vec2::new(x + inset, y + inset),
                Vec2::new(x + side - inset, y + side - inset),
                Color::WHITE,
                0.0,
            );
        }
        self.content.add_text(Vec2::new(label_x, y), Color::WHITE, label);

        self.width = self.width.max(row_max.x - x);
        self.cursor_y += self.row_height();
        toggled
    }

    fn text(&mut self, text: &str) {
        let pos = Vec2::new(self.origin.x + PANEL_PADDING, self.cursor_y);
        let size = self.font.calc_text_size(text);
        self.content.add_text(pos, Color::WHITE, text);
        self.width = self.width.max(size.x);
        self.cursor_y += size.y + ROW_GAP;
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
