//! Windowed runner for the overlay.
//!
//! [`run_windowed`] loads a [`DisplayObjectsPlugin`] against an in-memory
//! host built from a [`SceneSnapshot`] and drives it inside a winit event
//! loop. Each `RedrawRequested` event:
//!
//! 1. orbits the camera a little and ticks the host frame clock;
//! 2. draws the plugin with the OS cursor as the mouse position;
//! 3. appends the configuration panel when it is open;
//! 4. presents everything through [`OverlayGpu`].
//!
//! Keys: `c` runs `/pobj config`, `o` runs `/pobj` (toggle), `m` toggles the
//! main window. Left click toggles configuration checkboxes.

use std::sync::Arc;

use dobj_host::math::{Vec2, Vec3};
use dobj_host::projection::PerspectiveCamera;
use dobj_host::scene::SceneSnapshot;
use dobj_host::sheets::SheetSet;
use dobj_host::table::ObjectTable;
use winit::application::ApplicationHandler;
use winit::event::{ElementState, MouseButton, WindowEvent};
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::keyboard::Key;
use winit::window::{WindowAttributes, WindowId};

use super::gpu::OverlayGpu;
use crate::command::COMMAND_NAME;
use crate::panel::{DrawListUi, CONFIG_WINDOW_TITLE};
use crate::plugin::{DisplayObjectsPlugin, HostFrame, HostServices};
use crate::preferences::JsonPreferencesStore;
use crate::text::GlyphFont;

/// What to show in the window.
#[derive(Debug, Clone)]
pub struct OverlayDemo {
    pub scene: SceneSnapshot,
    pub store: JsonPreferencesStore,
    /// Camera yaw per frame in radians.
    pub orbit_speed: f32,
}

/// Run the overlay in a window until it is closed.
///
/// # Errors
///
/// Returns an error if the event loop cannot be created or the window or
/// GPU cannot be initialized.
pub fn run_windowed(
    demo: OverlayDemo,
    window_title: &str,
    width: u32,
    height: u32,
) -> Result<(), anyhow::Error> {
    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(winit::event_loop::ControlFlow::Poll);

    let host = HostServices::new();
    let plugin = DisplayObjectsPlugin::load(&host, demo.store);
    let camera = demo.scene.camera.clone().unwrap_or_else(|| {
        PerspectiveCamera::looking_at(
            Vec3::new(0.0, 25.0, -60.0),
            Vec3::ZERO,
            Vec2::new(width as f32, height as f32),
        )
    });

    let mut app = App {
        host,
        plugin,
        objects: demo.scene.objects,
        sheets: demo.scene.sheets,
        camera,
        orbit_speed: demo.orbit_speed,
        cursor: Vec2::ZERO,
        click: None,
        font: GlyphFont::default(),
        state: AppState::Pending {
            title: window_title.to_owned(),
            width,
            height,
        },
        init_failed: false,
    };

    event_loop.run_app(&mut app)?;
    app.plugin.dispose();

    if app.init_failed {
        return Err(anyhow::anyhow!(
            "failed to initialize overlay window (see logs for details)"
        ));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Internal state machine
// ---------------------------------------------------------------------------

/// Winit 0.30 creates windows in `resumed`, so the GPU comes up late.
enum AppState {
    Pending {
        title: String,
        width: u32,
        height: u32,
    },
    Running {
        gpu: OverlayGpu,
    },
    Failed,
}

struct App {
    host: HostServices,
    plugin: DisplayObjectsPlugin<JsonPreferencesStore>,
    objects: ObjectTable,
    sheets: SheetSet,
    camera: PerspectiveCamera,
    orbit_speed: f32,
    cursor: Vec2,
    click: Option<Vec2>,
    font: GlyphFont,
    state: AppState,
    init_failed: bool,
}

impl App {
    fn fail(&mut self, event_loop: &ActiveEventLoop) {
        self.init_failed = true;
        self.state = AppState::Failed;
        event_loop.exit();
    }

    fn on_key(&mut self, key: &str) {
        match key {
            "c" => {
                self.plugin.on_command(COMMAND_NAME, "config");
            }
            "o" => {
                self.plugin.on_command(COMMAND_NAME, "");
            }
            "m" => self.plugin.toggle_main_ui(),
            _ => {}
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        let AppState::Pending {
            title,
            width,
            height,
        } = &self.state
        else {
            return;
        };
        let attrs = WindowAttributes::default()
            .with_title(title.clone())
            .with_inner_size(winit::dpi::PhysicalSize::new(*width, *height));

        let window = match event_loop.create_window(attrs) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                tracing::error!(error = %e, "failed to create window -- exiting");
                self.fail(event_loop);
                return;
            }
        };
        match pollster::block_on(OverlayGpu::new(window.clone(), self.font.clone())) {
            Ok(gpu) => {
                tracing::info!(
                    width = gpu.viewport().x,
                    height = gpu.viewport().y,
                    objects = self.objects.len(),
                    "overlay window created"
                );
                window.request_redraw();
                self.state = AppState::Running { gpu };
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to initialize GPU -- exiting");
                self.fail(event_loop);
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        if let WindowEvent::KeyboardInput { event: key, .. } = &event {
            if key.state == ElementState::Pressed {
                if let Key::Character(ch) = &key.logical_key {
                    self.on_key(ch.as_str());
                }
            }
            return;
        }

        let AppState::Running { gpu } = &mut self.state else {
            return;
        };
        match event {
            WindowEvent::CloseRequested => {
                tracing::info!(
                    frames = self.host.frames.borrow().frame_count(),
                    "window close requested -- shutting down"
                );
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => {
                tracing::debug!(
                    width = new_size.width,
                    height = new_size.height,
                    "window resized"
                );
                gpu.resize(new_size);
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.cursor = Vec2::new(position.x as f32, position.y as f32);
            }
            WindowEvent::MouseInput {
                state: ElementState::Pressed,
                button: MouseButton::Left,
                ..
            } => {
                self.click = Some(self.cursor);
            }
            WindowEvent::RedrawRequested => {
                let viewport = gpu.viewport();
                self.camera.viewport = viewport;
                self.camera.orbit(self.orbit_speed);
                self.host.frames.borrow_mut().tick(viewport);

                let frame = HostFrame {
                    objects: &self.objects,
                    projector: &self.camera,
                    data: &self.sheets,
                    cursor: self.cursor,
                };
                let mut ui = DrawListUi::begin(
                    CONFIG_WINDOW_TITLE,
                    Vec2::new(16.0, 16.0),
                    &self.font,
                    self.click.take(),
                );
                let mut list = self.plugin.draw(&frame, &mut ui);
                if self.plugin.config_window().is_open() {
                    list.extend(ui.finish());
                }

                match gpu.render(&list) {
                    Ok(()) => {}
                    Err(wgpu::SurfaceError::Lost) => {
                        let size = gpu.window().inner_size();
                        gpu.resize(size);
                    }
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        tracing::error!("GPU out of memory -- exiting");
                        event_loop.exit();
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "surface error during render");
                    }
                }
                gpu.window().request_redraw();
            }
            _ => {}
        }
    }
}
