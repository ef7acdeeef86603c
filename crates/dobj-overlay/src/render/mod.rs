//! Debug backend for showing the overlay outside the game client.
//!
//! [`tessellate`] turns a [`DrawList`](crate::draw::DrawList) into colored
//! triangles in screen space. It has no GPU dependency, so it is always
//! compiled and tested headless.
//!
//! The GPU half is feature-gated behind `renderer`: [`gpu`] uploads the
//! triangles with wgpu and [`app`] runs the plugin in a winit window driven
//! by a perspective camera and the OS cursor.

pub mod tessellate;

#[cfg(feature = "renderer")]
pub mod app;
#[cfg(feature = "renderer")]
pub mod gpu;

pub use tessellate::{pixel_projection, tessellate, ColorVertex};

#[cfg(feature = "renderer")]
pub use app::{run_windowed, OverlayDemo};
#[cfg(feature = "renderer")]
pub use gpu::OverlayGpu;
