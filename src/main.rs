use std::sync::Arc;

use anyhow::{Context, Result};
use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::{DeviceEvent, ElementState, MouseButton, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

use glam::Vec2;

mod config;
mod memo;
mod mesh;
mod renderer;
mod sculpt;
mod ui;
mod viewer;

use config::ViewerConfig;
use mesh::{LoadResult, MeshLoader};
use renderer::{Camera, GpuState};
use ui::{UiActions, UiState, apply_theme, draw_dialogs, draw_help_overlay, draw_side_panel};
use viewer::{ViewerEvent, ViewerState};

#[derive(Default)]
struct InputState {
    cursor: Vec2,
    orbiting: bool,
    mouse_delta: Vec2,
}

struct App {
    config: ViewerConfig,

    window: Option<Arc<Window>>,
    gpu: Option<GpuState>,
    egui_state: Option<egui_winit::State>,
    egui_renderer: Option<egui_wgpu::Renderer>,
    egui_ctx: egui::Context,

    camera: Camera,
    loader: MeshLoader,
    viewer: ViewerState,
    ui_state: UiState,
    input: InputState,

    uploaded_revision: Option<u64>,
    startup_error: Option<anyhow::Error>,
}

impl App {
    fn new(config: ViewerConfig) -> Self {
        let camera = Camera::new(config.camera_distance, config.camera_fov_deg);
        Self {
            config,

            window: None,
            gpu: None,
            egui_state: None,
            egui_renderer: None,
            egui_ctx: egui::Context::default(),

            camera,
            loader: MeshLoader::new(),
            viewer: ViewerState::default(),
            ui_state: UiState::default(),
            input: InputState::default(),

            uploaded_revision: None,
            startup_error: None,
        }
    }

    fn init_gpu(&mut self, window: Arc<Window>) -> Result<()> {
        let gpu = pollster::block_on(GpuState::new(window.clone(), &self.config))
            .context("failed to initialise renderer")?;

        let egui_state = egui_winit::State::new(
            self.egui_ctx.clone(),
            self.egui_ctx.viewport_id(),
            &window,
            Some(window.scale_factor() as f32),
            None,
            Some(2048),
        );

        let egui_renderer =
            egui_wgpu::Renderer::new(&gpu.device, gpu.config.format, None, 1, false);

        apply_theme(&self.egui_ctx);

        let size = window.inner_size();
        self.camera
            .set_aspect(size.width as f32, size.height as f32);

        self.window = Some(window);
        self.gpu = Some(gpu);
        self.egui_state = Some(egui_state);
        self.egui_renderer = Some(egui_renderer);
        Ok(())
    }

    fn dispatch(&mut self, event: ViewerEvent) {
        self.viewer = std::mem::take(&mut self.viewer).apply(event);
    }

    fn update(&mut self) {
        if self.input.orbiting {
            self.camera.process_mouse_movement(self.input.mouse_delta);
        }
        self.input.mouse_delta = Vec2::ZERO;

        while let Some(result) = self.loader.try_recv_result() {
            match result {
                LoadResult::Loaded { name, mesh } => {
                    self.camera.reset();
                    self.dispatch(ViewerEvent::MeshLoaded { name, mesh });
                }
                LoadResult::Failed { name, error } => {
                    log::warn!("ignoring {name}: {error}");
                }
            }
        }

        let Some(gpu) = &mut self.gpu else { return };

        if self.uploaded_revision != Some(self.viewer.mesh_revision) {
            gpu.upload_mesh(self.viewer.mesh.as_deref().map(|m| &m.mesh));
            self.uploaded_revision = Some(self.viewer.mesh_revision);
        }
        gpu.upload_markers(&self.viewer.memos);
        gpu.update_scene(&self.config, self.viewer.view.opacity);
    }

    fn pick_at_cursor(&mut self) {
        if self.viewer.is_modal() {
            return;
        }
        let Some(gpu) = &self.gpu else { return };

        let viewport = Vec2::new(gpu.size.width as f32, gpu.size.height as f32);
        let ray = self.camera.screen_ray(self.input.cursor, viewport);
        let hit = mesh::pick(
            &ray,
            self.viewer.mesh.as_deref(),
            &self.viewer.memos,
            self.config.marker_radius,
        );

        if let Some(hit) = hit {
            log::debug!("pick {hit:?}");
            self.dispatch(ViewerEvent::Picked(hit));
        }
    }

    fn render(&mut self) {
        let (Some(window), Some(egui_state)) = (&self.window, &mut self.egui_state) else {
            return;
        };

        let raw_input = egui_state.take_egui_input(window);

        let loading = self.loader.in_flight();
        let mut ui_actions = UiActions::default();

        let full_output = self.egui_ctx.run(raw_input, |ctx| {
            ui_actions = draw_side_panel(ctx, &mut self.ui_state, &self.viewer, loading.as_deref());
            ui_actions.events.extend(draw_dialogs(ctx, &self.viewer));

            if self.ui_state.show_help {
                draw_help_overlay(ctx, &self.viewer);
            }
        });

        self.handle_ui_actions(ui_actions);

        let Some(gpu) = &mut self.gpu else { return };
        let Some(window) = &self.window else { return };
        let Some(egui_state) = &mut self.egui_state else {
            return;
        };
        let Some(egui_renderer) = &mut self.egui_renderer else {
            return;
        };

        egui_state.handle_platform_output(window, full_output.platform_output);

        let output = match gpu.surface.get_current_texture() {
            Ok(t) => t,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                gpu.resize(gpu.size);
                return;
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                panic!("Out of GPU memory");
            }
            Err(wgpu::SurfaceError::Timeout) => {
                return;
            }
        };

        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        gpu.update_camera(&self.camera);

        let paint_jobs = self
            .egui_ctx
            .tessellate(full_output.shapes, full_output.pixels_per_point);

        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [gpu.config.width, gpu.config.height],
            pixels_per_point: full_output.pixels_per_point,
        };

        for (id, delta) in full_output.textures_delta.set {
            egui_renderer.update_texture(&gpu.device, &gpu.queue, id, &delta);
        }

        let mut encoder = gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Main Encoder"),
            });

        egui_renderer.update_buffers(
            &gpu.device,
            &gpu.queue,
            &mut encoder,
            &paint_jobs,
            &screen_descriptor,
        );

        gpu.render_scene(&view, &mut encoder);

        {
            let render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("egui Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Load,
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            let mut render_pass = render_pass.forget_lifetime();
            egui_renderer.render(&mut render_pass, &paint_jobs, &screen_descriptor);
        }

        for id in full_output.textures_delta.free {
            egui_renderer.free_texture(&id);
        }

        gpu.queue.submit(std::iter::once(encoder.finish()));
        output.present();
    }

    fn handle_ui_actions(&mut self, actions: UiActions) {
        if let Some(path) = actions.open_file {
            log::info!("loading {}", path.display());
            self.loader.load(path);
        }

        for event in actions.events {
            self.dispatch(event);
        }
    }

    fn set_orbiting(&mut self, orbiting: bool) {
        self.input.orbiting = orbiting;
        if let Some(window) = &self.window {
            if orbiting {
                let _ = window.set_cursor_grab(winit::window::CursorGrabMode::Confined);
                window.set_cursor_visible(false);
            } else {
                let _ = window.set_cursor_grab(winit::window::CursorGrabMode::None);
                window.set_cursor_visible(true);
            }
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let (width, height) = self.config.window_size;
        let window_attrs = Window::default_attributes()
            .with_title(self.config.window_title)
            .with_inner_size(PhysicalSize::new(width, height));

        let started = event_loop
            .create_window(window_attrs)
            .context("failed to create window")
            .and_then(|window| self.init_gpu(Arc::new(window)));

        if let Err(e) = started {
            self.startup_error = Some(e);
            event_loop.exit();
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        if let WindowEvent::CursorMoved { position, .. } = &event {
            self.input.cursor = Vec2::new(position.x as f32, position.y as f32);
        }

        if let Some(egui_state) = &mut self.egui_state {
            if let Some(window) = &self.window {
                let response = egui_state.on_window_event(window, &event);
                if response.repaint {
                    window.request_redraw();
                }
                if response.consumed {
                    return;
                }
            }
        }

        match event {
            WindowEvent::CloseRequested => {
                self.loader.stop();
                event_loop.exit();
            }

            WindowEvent::Resized(size) => {
                if let Some(gpu) = &mut self.gpu {
                    gpu.resize(size);
                    self.camera
                        .set_aspect(size.width as f32, size.height as f32);
                }
            }

            WindowEvent::DroppedFile(path) => {
                log::info!("loading {}", path.display());
                self.loader.load(path);
            }

            WindowEvent::KeyboardInput { event, .. } => {
                if event.state == ElementState::Pressed
                    && event.physical_key == PhysicalKey::Code(KeyCode::KeyR)
                {
                    self.camera.reset();
                }
            }

            WindowEvent::MouseInput {
                button: MouseButton::Left,
                state: ElementState::Pressed,
                ..
            } => self.pick_at_cursor(),

            WindowEvent::MouseInput {
                button: MouseButton::Right,
                state,
                ..
            } => self.set_orbiting(state == ElementState::Pressed),

            WindowEvent::MouseWheel { delta, .. } => {
                let scroll = match delta {
                    winit::event::MouseScrollDelta::LineDelta(_, y) => y,
                    winit::event::MouseScrollDelta::PixelDelta(pos) => pos.y as f32 / 50.0,
                };
                self.camera.process_scroll(scroll);
            }

            WindowEvent::RedrawRequested => {
                self.update();
                self.render();
            }

            _ => {}
        }
    }

    fn device_event(&mut self, _: &ActiveEventLoop, _: winit::event::DeviceId, event: DeviceEvent) {
        if let DeviceEvent::MouseMotion { delta } = event {
            if self.input.orbiting {
                self.input.mouse_delta.x += delta.0 as f32;
                self.input.mouse_delta.y += delta.1 as f32;
            }
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

fn main() -> Result<()> {
    let config = ViewerConfig::default();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(config.log_filter))
        .init();

    let event_loop = EventLoop::new().context("failed to create event loop")?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new(config);
    event_loop.run_app(&mut app).context("event loop terminated abnormally")?;

    match app.startup_error.take() {
        Some(e) => {
            log::error!("{e:#}");
            Err(e)
        }
        None => Ok(()),
    }
}
