use std::sync::Arc;
use std::time::{Duration, Instant};
use winit::application::ApplicationHandler;
use winit::event::{ElementState, MouseButton, WindowEvent};
use winit::event_loop::ActiveEventLoop;
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

use ripple_net::config::{
    CanvasConfig, DEFAULT_CIRCLE_COUNT, DEFAULT_CIRCLE_RADIUS, DEFAULT_COOLDOWN_MS, PALETTE,
};
use ripple_net::{Entity, LineBatch, Point, RippleSystem};

use crate::gpu::{build_vertices, GpuContext, LineBuffers, LinePipeline, LineVertex};

/// Ticks allowed per frame before the backlog is dropped
const MAX_TICKS_PER_FRAME: u32 = 5;

/// Step for keyboard adjustments
const GROWTH_RATE_STEP: f32 = 0.1;
const CONNECTION_DISTANCE_STEP: f32 = 5.0;

/// Mouse pointer as a ripple anchor
struct Cursor {
    position: Point,
}

impl Entity for Cursor {
    fn id(&self) -> u64 {
        0
    }

    fn position(&self) -> Point {
        self.position
    }
}

/// Application state
pub struct App {
    window: Option<Arc<Window>>,
    gpu: Option<GpuContext>,
    line_buffers: Option<LineBuffers>,
    line_pipeline: Option<LinePipeline>,
    system: RippleSystem,
    canvas: CanvasConfig,
    batch: LineBatch,
    vertices: Vec<LineVertex>,
    cursor: Cursor,
    dragging: bool,
    started: Instant,
    last_frame: Instant,
    tick_interval: Duration,
    tick_backlog: Duration,
    fps_counter: FpsCounter,
}

impl App {
    pub fn new(system: RippleSystem, canvas: CanvasConfig) -> Self {
        let tick_interval = Duration::from_secs_f64(1.0 / canvas.tick_hz.max(1) as f64);
        let cursor = Cursor {
            position: Point::new(canvas.width as f32 / 2.0, canvas.height as f32 / 2.0),
        };
        Self {
            window: None,
            gpu: None,
            line_buffers: None,
            line_pipeline: None,
            system,
            canvas,
            batch: LineBatch::new(),
            vertices: Vec::new(),
            cursor,
            dragging: false,
            started: Instant::now(),
            last_frame: Instant::now(),
            tick_interval,
            tick_backlog: Duration::ZERO,
            fps_counter: FpsCounter::new(),
        }
    }

    fn now_ms(&self) -> u64 {
        self.started.elapsed().as_millis() as u64
    }

    /// Run as many fixed ticks as have accumulated since the last frame
    fn step_simulation(&mut self) {
        let now = Instant::now();
        self.tick_backlog += now - self.last_frame;
        self.last_frame = now;

        let mut ticks = 0;
        while self.tick_backlog >= self.tick_interval {
            if ticks == MAX_TICKS_PER_FRAME {
                self.tick_backlog = Duration::ZERO;
                break;
            }
            self.tick_backlog -= self.tick_interval;
            self.system.tick();
            ticks += 1;
        }
    }

    fn render(&mut self) {
        self.step_simulation();

        self.batch.clear();
        self.system.render(&mut self.batch);
        build_vertices(self.batch.segments(), &mut self.vertices);

        let (Some(gpu), Some(buffers), Some(pipeline)) = (
            self.gpu.as_ref(),
            self.line_buffers.as_mut(),
            self.line_pipeline.as_ref(),
        ) else {
            return;
        };

        buffers.upload(&gpu.device, &gpu.queue, &self.vertices);

        let Some(output) = gpu.acquire_frame() else {
            return;
        };

        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("frame-encoder"),
            });

        let bind_group = pipeline.create_bind_group(&gpu.device, &buffers.view_params_buffer);
        pipeline.draw(&mut encoder, &view, &bind_group, buffers);

        gpu.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        if let Some(fps) = self.fps_counter.tick() {
            if let Some(window) = &self.window {
                window.set_title(&format!(
                    "Ripple Net - {:.0} FPS - {}/{} ripples - {} lines",
                    fps,
                    self.system.active_count(),
                    self.system.config().max_active,
                    self.batch.len()
                ));
            }
        }
    }

    /// Map a window position in physical pixels to canvas coordinates
    fn to_canvas(&self, x: f64, y: f64) -> Point {
        let (width, height) = self
            .gpu
            .as_ref()
            .map(|gpu| gpu.size())
            .unwrap_or((self.canvas.width * self.canvas.scale, self.canvas.height * self.canvas.scale));
        Point::new(
            (x / width.max(1) as f64 * self.canvas.width as f64) as f32,
            (y / height.max(1) as f64 * self.canvas.height as f64) as f32,
        )
    }

    fn handle_mouse(&mut self, button: MouseButton, state: ElementState) {
        let pressed = state == ElementState::Pressed;
        match button {
            MouseButton::Left => {
                self.dragging = pressed;
                if pressed {
                    let now = self.now_ms();
                    self.system
                        .create_ripple_with_cooldown(Some(&self.cursor), now, DEFAULT_COOLDOWN_MS);
                }
            }
            MouseButton::Right if pressed => {
                let at = self.cursor.position;
                let admitted = self.system.create_ripple_circle(
                    at.x,
                    at.y,
                    DEFAULT_CIRCLE_COUNT,
                    DEFAULT_CIRCLE_RADIUS,
                );
                log::debug!("Ripple circle at ({:.0}, {:.0}): {} admitted", at.x, at.y, admitted);
            }
            _ => {}
        }
    }

    /// Cursor left the window: stop dragging and drop its cooldown record
    fn handle_cursor_left(&mut self) {
        self.dragging = false;
        self.system.forget_entity(self.cursor.id());
    }

    fn handle_key(&mut self, key_code: KeyCode) {
        let config = self.system.config().clone();
        match key_code {
            // Drop a ripple at the cursor, ignoring the cooldown
            KeyCode::Space => {
                let at = self.cursor.position;
                self.system.create_ripple(at.x, at.y);
            }

            KeyCode::KeyC => {
                self.system.clear_all();
                log::info!("Ripples cleared");
            }

            KeyCode::ArrowUp => {
                self.system.set_max_active(config.max_active + 1);
                log::info!("Max ripples: {}", self.system.config().max_active);
            }
            KeyCode::ArrowDown => {
                self.system.set_max_active(config.max_active.saturating_sub(1));
                log::info!("Max ripples: {}", self.system.config().max_active);
            }

            KeyCode::Equal => {
                self.system.set_growth_rate(config.growth_rate + GROWTH_RATE_STEP);
                log::info!("Ripple speed: {:.1}", self.system.config().growth_rate);
            }
            KeyCode::Minus => {
                self.system.set_growth_rate(config.growth_rate - GROWTH_RATE_STEP);
                log::info!("Ripple speed: {:.1}", self.system.config().growth_rate);
            }

            KeyCode::BracketRight => {
                self.system
                    .set_connection_distance(config.connection_distance + CONNECTION_DISTANCE_STEP);
                log::info!("Connection distance: {:.0}", self.system.config().connection_distance);
            }
            KeyCode::BracketLeft => {
                self.system
                    .set_connection_distance(config.connection_distance - CONNECTION_DISTANCE_STEP);
                log::info!("Connection distance: {:.0}", self.system.config().connection_distance);
            }

            // Cycle through the opaque palette entries
            KeyCode::KeyN => {
                let next = (config.color as usize % (PALETTE.len() - 1)) + 1;
                self.system.set_color(next as u8);
                log::info!("Ripple color: {}", next);
            }

            _ => {}
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        log::info!("Initializing Ripple Net...");
        log::info!("Canvas: {}x{}", self.canvas.width, self.canvas.height);

        let window_attrs = Window::default_attributes()
            .with_title("Ripple Net - Initializing...")
            .with_inner_size(winit::dpi::LogicalSize::new(
                self.canvas.width * self.canvas.scale,
                self.canvas.height * self.canvas.scale,
            ));

        let window = Arc::new(
            event_loop
                .create_window(window_attrs)
                .expect("Failed to create window"),
        );

        log::info!("Creating GPU context...");
        let gpu = pollster::block_on(GpuContext::new(window.clone()));

        let line_buffers =
            LineBuffers::new(&gpu.device, &gpu.queue, self.canvas.width, self.canvas.height);
        let line_pipeline = LinePipeline::new(&gpu.device, gpu.format());

        log::info!("Initialization complete!");
        log::info!("Controls:");
        log::info!("  Left click/drag: Ripple at cursor ({} ms cooldown)", DEFAULT_COOLDOWN_MS);
        log::info!("  Right click: Circle of {} ripples", DEFAULT_CIRCLE_COUNT);
        log::info!("  Space: Ripple at cursor");
        log::info!("  C: Clear ripples");
        log::info!("  Up/Down: Max ripples");
        log::info!("  +/-: Ripple speed");
        log::info!("  [/]: Connection distance");
        log::info!("  N: Next color");
        log::info!("  Escape: Quit");

        self.window = Some(window);
        self.gpu = Some(gpu);
        self.line_buffers = Some(line_buffers);
        self.line_pipeline = Some(line_pipeline);
        self.last_frame = Instant::now();
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                log::info!("Close requested, exiting...");
                event_loop.exit();
            }
            WindowEvent::KeyboardInput { event, .. } => {
                if event.state.is_pressed() {
                    if let PhysicalKey::Code(key_code) = event.physical_key {
                        if key_code == KeyCode::Escape {
                            log::info!("Escape pressed, exiting...");
                            event_loop.exit();
                        } else {
                            self.handle_key(key_code);
                        }
                    }
                }
            }
            WindowEvent::MouseInput { state, button, .. } => {
                self.handle_mouse(button, state);
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.cursor.position = self.to_canvas(position.x, position.y);
                if self.dragging {
                    let now = self.now_ms();
                    self.system
                        .create_ripple_with_cooldown(Some(&self.cursor), now, DEFAULT_COOLDOWN_MS);
                }
            }
            WindowEvent::CursorLeft { .. } => {
                self.handle_cursor_left();
            }
            WindowEvent::Resized(new_size) => {
                if let Some(gpu) = &mut self.gpu {
                    log::info!("Window resized to {}x{}", new_size.width, new_size.height);
                    gpu.resize(new_size);
                }
            }
            WindowEvent::RedrawRequested => {
                self.render();
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }
            _ => {}
        }
    }
}

/// Simple FPS counter
struct FpsCounter {
    last_update: Instant,
    frame_count: u32,
}

impl FpsCounter {
    fn new() -> Self {
        Self {
            last_update: Instant::now(),
            frame_count: 0,
        }
    }

    /// Tick the counter, returns Some(fps) every second
    fn tick(&mut self) -> Option<f64> {
        self.frame_count += 1;
        let elapsed = self.last_update.elapsed();

        if elapsed.as_secs_f64() >= 1.0 {
            let fps = self.frame_count as f64 / elapsed.as_secs_f64();
            self.frame_count = 0;
            self.last_update = Instant::now();
            Some(fps)
        } else {
            None
        }
    }
}
