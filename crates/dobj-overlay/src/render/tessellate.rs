//! Draw list tessellation.
//!
//! Every primitive becomes a triangle list in screen pixels:
//!
//! | Command        | Triangles                                       |
//! |----------------|-------------------------------------------------|
//! | `CircleFilled` | fan around the center, 12..64 segments          |
//! | `RectFilled`   | two triangles, or a fan around a rounded outline |
//! | `Text`         | one quad per lit glyph pixel                    |

use dobj_host::math::Vec2;

use crate::draw::{DrawCommand, DrawList};
use crate::text::GlyphFont;

/// Segments per rounded corner.
const CORNER_SEGMENTS: usize = 6;

// ---------------------------------------------------------------------------
// ColorVertex
// ---------------------------------------------------------------------------

/// A vertex with a screen-pixel position and straight-alpha RGBA color.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(
    feature = "renderer",
    derive(bytemuck_derive::Pod, bytemuck_derive::Zeroable)
)]
pub struct ColorVertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

// ---------------------------------------------------------------------------
// Projection
// ---------------------------------------------------------------------------

/// Column-major matrix mapping screen pixels (origin top-left, y down) to
/// clip space.
pub fn pixel_projection(viewport: Vec2) -> [f32; 16] {
    let width = if viewport.x > 0.0 { viewport.x } else { 1.0 };
    let height = if viewport.y > 0.0 { viewport.y } else { 1.0 };
    let sx = 2.0 / width;
    let sy = -2.0 / height;
    [
        sx, 0.0, 0.0, 0.0, // column 0
        0.0, sy, 0.0, 0.0, // column 1
        0.0, 0.0, 1.0, 0.0, // column 2
        -1.0, 1.0, 0.0, 1.0, // column 3
    ]
}

// ---------------------------------------------------------------------------
// Tessellation
// ---------------------------------------------------------------------------

struct Mesh {
    vertices: Vec<ColorVertex>,
}

impl Mesh {
    fn vertex(&mut self, p: Vec2, color: [f32; 4]) {
        self.vertices.push(ColorVertex {
            position: [p.x, p.y],
            color,
        });
    }

    fn quad(&mut self, min: Vec2, max: Vec2, color: [f32; 4]) {
        let (a, b, c, d) = (
            min,
            Vec2::new(max.x, min.y),
            max,
            Vec2::new(min.x, max.y),
        );
        for p in [a, b, c, a, c, d] {
            self.vertex(p, color);
        }
    }

    /// Triangles from `center` to each edge of the closed `outline`.
    fn fan(&mut self, center: Vec2, outline: &[Vec2], color: [f32; 4]) {
        for (i, p) in outline.iter().enumerate() {
            let next = outline[(i + 1) % outline.len()];
            self.vertex(center, color);
            self.vertex(*p, color);
            self.vertex(next, color);
        }
    }
}

/// Segments used for a circle of `radius` pixels.
pub fn circle_segments(radius: f32) -> usize {
    ((radius * 2.0).ceil() as usize).clamp(12, 64)
}

fn arc(center: Vec2, radius: f32, start: f32, segments: usize, out: &mut Vec<Vec2>) {
    let step = std::f32::consts::FRAC_PI_2 / segments as f32;
    for i in 0..=segments {
        let (sin, cos) = (start + step * i as f32).sin_cos();
        out.push(Vec2::new(center.x + radius * cos, center.y + radius * sin));
    }
}

fn rounded_rect(mesh: &mut Mesh, min: Vec2, max: Vec2, rounding: f32, color: [f32; 4]) {
    let w = max.x - min.x;
    let h = max.y - min.y;
    if w <= 0.0 || h <= 0.0 {
        return;
    }
    let r = rounding.min(w * 0.5).min(h * 0.5);
    if r <= 0.0 {
        mesh.quad(min, max, color);
        return;
    }

    use std::f32::consts::{FRAC_PI_2, PI};
    let mut outline = Vec::with_capacity(4 * (CORNER_SEGMENTS + 1));
    // Clockwise on screen (y down), starting at the top-left corner.
    arc(Vec2::new(min.x + r, min.y + r), r, PI, CORNER_SEGMENTS, &mut outline);
    arc(Vec2::new(max.x - r, min.y + r), r, PI + FRAC_PI_2, CORNER_SEGMENTS, &mut outline);
    arc(Vec2::new(max.x - r, max.y - r), r, 0.0, CORNER_SEGMENTS, &mut outline);
    arc(Vec2::new(min.x + r, max.y - r), r, FRAC_PI_2, CORNER_SEGMENTS, &mut outline);

    let center = Vec2::new(min.x + w * 0.5, min.y + h * 0.5);
    mesh.fan(center, &outline, color);
}

fn circle(mesh: &mut Mesh, center: Vec2, radius: f32, color: [f32; 4]) {
    if radius <= 0.0 {
        return;
    }
    let segments = circle_segments(radius);
    let step = std::f32::consts::TAU / segments as f32;
    let outline: Vec<Vec2> = (0..segments)
        .map(|i| {
            let (sin, cos) = (step * i as f32).sin_cos();
            Vec2::new(center.x + radius * cos, center.y + radius * sin)
        })
        .collect();
    mesh.fan(center, &outline, color);
}

/// Triangle list for every command in `list`, in recording order.
pub fn tessellate(list: &DrawList, font: &GlyphFont) -> Vec<ColorVertex> {
    let mut mesh = Mesh {
        vertices: Vec::with_capacity(list.len() * 36),
    };
    for cmd in list.commands() {
        match cmd {
            DrawCommand::CircleFilled {
                center,
                radius,
                color,
            } => circle(&mut mesh, *center, *radius, color.to_array()),
            DrawCommand::RectFilled {
                min,
                max,
                color,
                rounding,
            } => rounded_rect(&mut mesh, *min, *max, *rounding, color.to_array()),
            DrawCommand::Text { pos, color, text } => {
                let rgba = color.to_array();
                for px in font.rasterize(text, *pos) {
                    mesh.quad(px.min, px.max, rgba);
                }
            }
        }
    }
    mesh.vertices
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
