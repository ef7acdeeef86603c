//! Backend-independent draw list.
//!
//! The overlay never talks to a GPU directly. Each frame it records a
//! [`DrawList`] of immediate-mode primitives (filled circles, rounded
//! rectangles, text) in screen coordinates. A backend -- the host's GUI layer
//! or the optional wgpu renderer -- replays the list.
//!
//! Because the list is plain data it doubles as the observable output of a
//! frame: tests inspect it directly and [`DrawList::digest`] gives a stable
//! BLAKE3 fingerprint for determinism checks.

use dobj_host::math::Vec2;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Color
// ---------------------------------------------------------------------------

/// Straight-alpha RGBA color, each channel 0.0..1.0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const RED: Color = Color::rgba(1.0, 0.0, 0.0, 1.0);
    pub const WHITE: Color = Color::rgba(1.0, 1.0, 1.0, 1.0);
    pub const BLACK: Color = Color::rgba(0.0, 0.0, 0.0, 1.0);

    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Same color with a different alpha.
    pub const fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }

    /// Pack as `0xAABBGGRR`, the layout immediate-mode GUI draw lists use.
    pub fn to_u32(self) -> u32 {
        let channel = |v: f32| (v.clamp(0.0, 1.0) * 255.0 + 0.5) as u32;
        channel(self.a) << 24 | channel(self.b) << 16 | channel(self.g) << 8 | channel(self.r)
    }

    pub fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

// ---------------------------------------------------------------------------
// DrawCommand
// ---------------------------------------------------------------------------

/// A single recorded primitive. All coordinates are screen units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum DrawCommand {
    CircleFilled {
        center: Vec2,
        radius: f32,
        color: Color,
    },
    RectFilled {
        min: Vec2,
        max: Vec2,
        color: Color,
        /// Corner radius.
        rounding: f32,
    },
    Text {
        /// Top-left corner of the first line.
        pos: Vec2,
        color: Color,
        text: String,
    },
}

// ---------------------------------------------------------------------------
// DrawList
// ---------------------------------------------------------------------------

/// An ordered list of draw commands for one frame.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DrawList {
    commands: Vec<DrawCommand>,
}

impl DrawList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_circle_filled(&mut self, center: Vec2, radius: f32, color: Color) {
        self.commands.push(DrawCommand::CircleFilled {
            center,
            radius,
            color,
        });
    }

    pub fn add_rect_filled(&mut self, min: Vec2, max: Vec2, color: Color, rounding: f32) {
        self.commands.push(DrawCommand::RectFilled {
            min,
            max,
            color,
            rounding,
        });
    }

    pub fn add_text(&mut self, pos: Vec2, color: Color, text: &str) {
        self.commands.push(DrawCommand::Text {
            pos,
            color,
            text: text.to_owned(),
        });
    }

    /// Append every command of `other`, preserving order.
    pub fn extend(&mut self, other: DrawList) {
        self.commands.extend(other.commands);
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }

    /// Text payloads in recording order.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.commands.iter().filter_map(|cmd| match cmd {
            DrawCommand::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }

    /// Centers of all filled circles in recording order.
    pub fn markers(&self) -> impl Iterator<Item = Vec2> + '_ {
        self.commands.iter().filter_map(|cmd| match cmd {
            DrawCommand::CircleFilled { center, .. } => Some(*center),
            _ => None,
        })
    }

    /// BLAKE3 hex digest of the exact command sequence.
    ///
    /// Floats are hashed by bit pattern, so two lists share a digest only
    /// if they are bit-for-bit identical.
    pub fn digest(&self) -> String {
        let mut hasher = blake3::Hasher::new();
        let put_vec2 = |h: &mut blake3::Hasher, v: Vec2| {
            h.update(&v.x.to_bits().to_le_bytes());
            h.update(&v.y.to_bits().to_le_bytes());
        };
        for cmd in &self.commands {
            match cmd {
                DrawCommand::CircleFilled {
                    center,
                    radius,
                    color,
                } => {
                    hasher.update(&[0]);
                    put_vec2(&mut hasher, *center);
                    hasher.update(&radius.to_bits().to_le_bytes());
                    hasher.update(&color.to_u32().to_le_bytes());
                }
                DrawCommand::RectFilled {
                    min,
                    max,
                    color,
                    rounding,
                } => {
                    hasher.update(&[1]);
                    put_vec2(&mut hasher, *min);
                    put_vec2(&mut hasher, *max);
                    hasher.update(&color.to_u32().to_le_bytes());
                    hasher.update(&rounding.to_bits().to_le_bytes());
                }
                DrawCommand::Text { pos, color, text } => {
                    hasher.update(&[2]);
                    put_vec2(&mut hasher, *pos);
                    hasher.update(&color.to_u32().to_le_bytes());
                    hasher.update(&(text.len() as u64).to_le_bytes());
                    hasher.update(text.as_bytes());
                }
            }
        }
        hasher.finalize().to_hex().to_string()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
