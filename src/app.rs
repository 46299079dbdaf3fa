//! The interactive viewer application.
//!
//! Owns the winit event loop, the GPU context, the scene and the renderer,
//! and wires drag-and-drop file events into the import pipeline. Everything
//! runs on the event-loop thread; a model drop imports synchronously
//! between frames, which stalls one frame on large assets.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use winit::application::ApplicationHandler;
use winit::event::{DeviceEvent, DeviceId, ElementState, MouseButton, WindowEvent};
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::keyboard::PhysicalKey;
use winit::window::{Window, WindowId};

use crate::console::Console;
use crate::context::Context;
use crate::render::Renderer;
use crate::resources::importer::ImportConfig;
use crate::scene::scene::Scene;

/// What kind of asset a dropped file is.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DroppedKind {
    Model,
    Texture,
}

/// One drag-and-drop event, as handed to the frame loop.
#[derive(Clone, Debug)]
pub struct DroppedFile {
    pub path: PathBuf,
    pub kind: DroppedKind,
}

/// Classify a dropped file by extension. Unsupported files return `None`.
pub fn classify_drop(path: &Path) -> Option<DroppedKind> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "gltf" | "glb" => Some(DroppedKind::Model),
        "png" | "jpg" | "jpeg" | "bmp" | "tga" | "gif" | "webp" => Some(DroppedKind::Texture),
        _ => None,
    }
}

struct ViewerState {
    ctx: Context,
    renderer: Renderer,
    scene: Scene,
    is_surface_configured: bool,
}

pub struct App {
    state: Option<ViewerState>,
    console: Console,
    import_config: ImportConfig,
    pending_drop: Option<DroppedFile>,
    mouse_look: bool,
    last_time: Instant,
}

impl App {
    pub fn new() -> Self {
        Self {
            state: None,
            console: Console::new(),
            import_config: ImportConfig::default(),
            pending_drop: None,
            mouse_look: false,
            last_time: Instant::now(),
        }
    }

    /// Handle the pending drop, if any. The stored event is taken (cleared)
    /// before processing so a stale drop can never run twice.
    fn process_pending_drop(&mut self) {
        let Some(drop) = self.pending_drop.take() else {
            return;
        };
        let Some(state) = &mut self.state else {
            return;
        };
        match drop.kind {
            DroppedKind::Model => {
                let result = state.scene.load_model(
                    &drop.path,
                    &self.import_config,
                    &state.ctx.device,
                    &state.ctx.queue,
                    state.renderer.material_layout(),
                    &mut self.console,
                );
                if let Err(e) = result {
                    log::error!("import of {:?} failed: {}", drop.path, e);
                    self.console
                        .log(format!("Failed to load model: {}", e));
                }
            }
            DroppedKind::Texture => {
                let path = drop.path.to_string_lossy().to_string();
                let applied = state.scene.apply_texture(
                    &path,
                    &state.ctx.device,
                    &state.ctx.queue,
                    state.renderer.material_layout(),
                    &mut self.console,
                );
                if applied == 0 {
                    state.renderer.apply_texture_to_default(
                        &path,
                        &state.ctx.device,
                        &state.ctx.queue,
                        &mut self.console,
                    );
                }
            }
        }
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        self.process_pending_drop();

        let Some(state) = &mut self.state else {
            return;
        };

        state.ctx.window.request_redraw();
        if !state.is_surface_configured {
            return;
        }

        let dt = self.last_time.elapsed();
        self.last_time = Instant::now();

        // all tree updates complete before any draw call of the same frame
        state
            .ctx
            .camera
            .update(&state.ctx.queue, &state.ctx.projection, dt);
        state.scene.update();

        match state.renderer.render_to_surface(&state.ctx, &state.scene) {
            Ok(_stats) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                let size = state.ctx.window.inner_size();
                state.ctx.resize(size.width, size.height);
            }
            Err(wgpu::SurfaceError::Timeout) => {
                log::warn!("surface frame timed out");
            }
            Err(e) => {
                log::error!("cannot acquire surface frame: {}", e);
                event_loop.exit();
            }
        }
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        let window_attributes = Window::default_attributes()
            .with_title("vantage")
            .with_inner_size(winit::dpi::PhysicalSize::new(1280, 720));
        let window = Arc::new(
            event_loop
                .create_window(window_attributes)
                .expect("could not create the viewer window"),
        );

        let ctx = match pollster::block_on(Context::new(window)) {
            Ok(ctx) => ctx,
            Err(e) => panic!("App initialization failed. Cannot create the main context: {}", e),
        };
        let renderer = Renderer::new(
            &ctx.device,
            &ctx.queue,
            &ctx.config,
            &ctx.camera.bind_group_layout,
        );
        let scene = Scene::new();

        self.console.log("Scene ready");
        self.console
            .log("Drop a .gltf/.glb model or an image file onto the window");

        self.state = Some(ViewerState {
            ctx,
            renderer,
            scene,
            is_surface_configured: false,
        });
        self.last_time = Instant::now();
        if let Some(state) = &self.state {
            state.ctx.window.request_redraw();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                if let Some(state) = &mut self.state {
                    state.scene.clear(&mut self.console);
                    state.renderer.release_gpu_resources();
                }
                event_loop.exit();
            }
            WindowEvent::Resized(size) => {
                if let Some(state) = &mut self.state {
                    state.ctx.resize(size.width, size.height);
                    state.is_surface_configured = size.width > 0 && size.height > 0;
                }
            }
            WindowEvent::DroppedFile(path) => match classify_drop(&path) {
                Some(kind) => {
                    log::debug!("file dropped: {:?} ({:?})", path, kind);
                    self.pending_drop = Some(DroppedFile { path, kind });
                }
                None => {
                    self.console
                        .log(format!("Unsupported file type: {}", path.display()));
                }
            },
            WindowEvent::KeyboardInput { event, .. } => {
                if let (Some(state), PhysicalKey::Code(code)) =
                    (&mut self.state, event.physical_key)
                {
                    state
                        .ctx
                        .camera
                        .controller
                        .process_keyboard(code, event.state);
                }
            }
            WindowEvent::MouseInput { state, button, .. } => {
                if button == MouseButton::Right {
                    self.mouse_look = state == ElementState::Pressed;
                }
            }
            WindowEvent::MouseWheel { delta, .. } => {
                if let Some(state) = &mut self.state {
                    state.ctx.camera.controller.process_scroll(&delta);
                }
            }
            WindowEvent::RedrawRequested => self.redraw(event_loop),
            _ => {}
        }
    }

    fn device_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _device_id: DeviceId,
        event: DeviceEvent,
    ) {
        if let DeviceEvent::MouseMotion { delta: (dx, dy) } = event {
            if self.mouse_look {
                if let Some(state) = &mut self.state {
                    state.ctx.camera.controller.process_mouse(dx, dy);
                }
            }
        }
    }
}

/// Run the viewer until the window is closed.
pub fn run() -> anyhow::Result<()> {
    let event_loop = EventLoop::new()?;
    let mut app = App::new();
    event_loop.run_app(&mut app)?;
    Ok(())
}
