//! The per-frame entity overlay.
//!
//! [`EntityOverlayRenderer::render_frame`] is the core of the addon. For
//! every entity in the host's object table it:
//!
//! 1. skips the entity unless its kind is visible in [`Preferences`];
//! 2. projects the world position to the screen, skipping the entity when
//!    projection fails;
//! 3. draws a filled marker circle at the projected point;
//! 4. picks a [`TooltipMode`] from the preferences and the cursor distance;
//! 5. lays out the basic tooltip and, under the cursor, the detail block.
//!
//! The renderer keeps no state between frames. Given the same inputs it
//! records the same [`DrawList`].
//!
//! The full-screen surface the overlay draws on is described by
//! [`OverlaySurface`]; its visibility follows [`Preferences::enabled`] and
//! callers skip `render_frame` entirely while it is hidden.

use bitflags::bitflags;
use dobj_host::entity::Entity;
use dobj_host::math::Vec2;
use dobj_host::projection::WorldToScreen;
use dobj_host::sheets::GameData;
use dobj_host::table::EntitySource;

use crate::draw::{Color, DrawList};
use crate::preferences::Preferences;
use crate::text::{GlyphFont, TextMetrics};
use crate::tooltip;

/// Name of the overlay surface.
pub const OVERLAY_WINDOW_NAME: &str = "DisplayObjects";

/// Cursor distance, in screen units, under which a marker counts as hovered.
pub const MOUSEOVER_DISTANCE: f32 = 20.0;

// ---------------------------------------------------------------------------
// Surface
// ---------------------------------------------------------------------------

bitflags! {
    /// Window behavior flags understood by the host GUI layer.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct WindowFlags: u32 {
        const NO_TITLE_BAR = 1;
        const NO_SCROLLBAR = 1 << 1;
        const NO_BACKGROUND = 1 << 2;
        const NO_INPUTS = 1 << 3;
        const NO_COLLAPSE = 1 << 4;
    }
}

impl WindowFlags {
    /// A transparent, click-through window.
    pub const OVERLAY: WindowFlags = WindowFlags::NO_TITLE_BAR
        .union(WindowFlags::NO_SCROLLBAR)
        .union(WindowFlags::NO_BACKGROUND)
        .union(WindowFlags::NO_INPUTS);
}

/// The window the overlay draws into.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlaySurface {
    pub name: String,
    pub position: Vec2,
    pub size: Vec2,
    pub flags: WindowFlags,
    pub visible: bool,
}

impl OverlaySurface {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_owned(),
            position: Vec2::ZERO,
            size: Vec2::ZERO,
            flags: WindowFlags::OVERLAY,
            visible: false,
        }
    }

    /// Cover the whole viewport and follow the master switch.
    pub fn fit_to_viewport(&mut self, prefs: &Preferences, viewport: Vec2) {
        if self.size != viewport {
            tracing::debug!(
                window = %self.name,
                width = viewport.x,
                height = viewport.y,
                "overlay surface resized"
            );
        }
        self.visible = prefs.enabled;
        self.position = Vec2::ZERO;
        self.size = viewport;
    }
}

impl Default for OverlaySurface {
    fn default() -> Self {
        Self::new(OVERLAY_WINDOW_NAME)
    }
}

// ---------------------------------------------------------------------------
// Style
// ---------------------------------------------------------------------------

/// Colors and thresholds used when drawing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverlayStyle {
    pub marker_color: Color,
    pub tooltip_background: Color,
    pub tooltip_text: Color,
    /// See [`MOUSEOVER_DISTANCE`].
    pub mouseover_distance: f32,
}

impl Default for OverlayStyle {
    fn default() -> Self {
        Self {
            marker_color: Color::RED,
            tooltip_background: Color::BLACK.with_alpha(0.33),
            tooltip_text: Color::WHITE,
            mouseover_distance: MOUSEOVER_DISTANCE,
        }
    }
}

// ---------------------------------------------------------------------------
// Tooltip mode
// ---------------------------------------------------------------------------

/// How much tooltip an entity gets this frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TooltipMode {
    Hidden,
    /// Name and kind next to the marker.
    Ambient,
    /// Full tooltip and detail block next to the cursor.
    MouseOver,
}

impl TooltipMode {
    /// Hovering wins over always-show. The distance is measured on screen.
    pub fn select(prefs: &Preferences, cursor: Vec2, point: Vec2, distance: f32) -> TooltipMode {
        if prefs.mouseover_tooltip && cursor.distance(point) < distance {
            TooltipMode::MouseOver
        } else if prefs.always_show_tooltip {
            TooltipMode::Ambient
        } else {
            TooltipMode::Hidden
        }
    }
}

// ---------------------------------------------------------------------------
// Renderer
// ---------------------------------------------------------------------------

/// Records the overlay for one frame.
#[derive(Debug, Clone)]
pub struct EntityOverlayRenderer<M = GlyphFont> {
    style: OverlayStyle,
    metrics: M,
}

impl Default for EntityOverlayRenderer<GlyphFont> {
    fn default() -> Self {
        Self::new(GlyphFont::default())
    }
}

impl<M: TextMetrics> EntityOverlayRenderer<M> {
    pub fn new(metrics: M) -> Self {
        Self {
            style: OverlayStyle::default(),
            metrics,
        }
    }

    pub fn with_style(mut self, style: OverlayStyle) -> Self {
        self.style = style;
        self
    }

    pub fn style(&self) -> &OverlayStyle {
        &self.style
    }

    pub fn metrics(&self) -> &M {
        &self.metrics
    }

    /// Draw markers and tooltips for every visible entity.
    pub fn render_frame(
        &self,
        prefs: &Preferences,
        entities: &dyn EntitySource,
        projector: &dyn WorldToScreen,
        data: &dyn GameData,
        cursor: Vec2,
    ) -> DrawList {
        let mut list = DrawList::new();
        let mut drawn = 0usize;
        for entity in entities.entities() {
            if !prefs.is_kind_visible(entity.kind) {
                continue;
            }
            let Some(point) = projector.world_to_screen(entity.position) else {
                continue;
            };
            self.draw_entity(&mut list, prefs, &entity, point, data, cursor);
            drawn += 1;
        }
        tracing::trace!(drawn, commands = list.len(), "overlay frame recorded");
        list
    }

    /// Draw one entity whose screen position is already known.
    pub fn draw_entity(
        &self,
        list: &mut DrawList,
        prefs: &Preferences,
        entity: &Entity,
        point: Vec2,
        data: &dyn GameData,
        cursor: Vec2,
    ) {
        list.add_circle_filled(point, prefs.marker_radius, self.style.marker_color);

        let mode = TooltipMode::select(prefs, cursor, point, self.style.mouseover_distance);
        match mode {
            TooltipMode::Hidden => {}
            TooltipMode::Ambient => {
                let text = tooltip::ambient_tooltip(entity);
                self.draw_tooltips(list, point, prefs.tooltip_padding, &text, "");
            }
            TooltipMode::MouseOver => {
                let text = tooltip::full_tooltip(entity);
                let detail = tooltip::detail_tooltip(entity, data);
                self.draw_tooltips(list, cursor, prefs.tooltip_padding, &text, &detail);
            }
        }
    }

    /// Basic tooltip below-right of `anchor`, detail block to its right.
    fn draw_tooltips(&self, list: &mut DrawList, anchor: Vec2, pad: f32, text: &str, detail: &str) {
        let size = self.metrics.calc_text_size(text);
        list.add_rect_filled(
            Vec2::new(anchor.x + pad, anchor.y + pad),
            Vec2::new(anchor.x + 3.0 * pad + size.x, anchor.y + 3.0 * pad + size.y),
            self.style.tooltip_background,
            pad,
        );
        list.add_text(
            Vec2::new(anchor.x + 2.0 * pad, anchor.y + 2.0 * pad),
            self.style.tooltip_text,
            text,
        );

        if detail.is_empty() {
            return;
        }
        let detail_size = self.metrics.calc_text_size(detail);
        list.add_rect_filled(
            Vec2::new(anchor.x + 4.0 * pad + size.x, anchor.y + pad),
            Vec2::new(
                anchor.x + 6.0 * pad + size.x + detail_size.x,
                anchor.y + 3.0 * pad + detail_size.y,
            ),
            self.style.tooltip_background,
            pad,
        );
        list.add_text(
            Vec2::new(anchor.x + 5.0 * pad + size.x, anchor.y + 2.0 * pad),
            self.style.tooltip_text,
            detail,
        );
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
