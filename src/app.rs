//! Windowed host for a [`DialSession`].

use std::sync::mpsc::Receiver;
use std::time::{Duration, Instant};

use pixels::{Pixels, SurfaceTexture};
use tracing::{debug, error, info};
use winit::dpi::{LogicalSize, PhysicalPosition};
use winit::event::{ElementState, Event, MouseButton, Touch, TouchPhase, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::window::{CursorGrabMode, Window, WindowBuilder};

use crate::config::DialConfig;
use crate::connection::Connector;
use crate::error::DialError;
use crate::geometry::{DialBounds, Point, Ring};
use crate::options::FilterSelection;
use crate::render::{render_dial, Canvas, DialView, RingNeedle};
use crate::session::{DialSession, PressResult};

pub struct DialApp<C: Connector> {
    config: DialConfig,
    session: DialSession<C>,
}

/// Pointer state that only matters to the window.
#[derive(Default)]
struct PointerTracker {
    cursor: Option<Point>,
    touch_id: Option<u64>,
    captured: bool,
}

impl PointerTracker {
    /// Holds the cursor grab exactly while a ring is being dragged.
    fn sync_capture(&mut self, window: &Window, dragging: bool) {
        if dragging == self.captured {
            return;
        }
        let mode = if dragging {
            CursorGrabMode::Confined
        } else {
            CursorGrabMode::None
        };
        if let Err(e) = window.set_cursor_grab(mode) {
            debug!(error = %e, ?mode, "cursor grab unavailable");
        }
        self.captured = dragging;
    }
}

impl<C: Connector> DialApp<C> {
    pub fn new(config: DialConfig, connector: C) -> Self {
        let session = DialSession::new(&config, connector);
        Self { config, session }
    }

    pub fn session(&self) -> &DialSession<C> {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut DialSession<C> {
        &mut self.session
    }

    pub fn run(mut self) -> Result<(), DialError> {
        let size = f64::from(self.config.window_size);
        let event_loop = EventLoop::new()?;
        let window = WindowBuilder::new()
            .with_title(&self.config.title)
            .with_inner_size(LogicalSize::new(size, size))
            .with_resizable(false)
            .build(&event_loop)?;

        let window = std::sync::Arc::new(window);
        let window_clone = window.clone();

        let inner = window.inner_size();
        let mut fb_width = inner.width as usize;
        let mut fb_height = inner.height as usize;
        let surface_texture = SurfaceTexture::new(inner.width, inner.height, &window);
        let mut pixels = Pixels::new(inner.width, inner.height, surface_texture)?;

        let selections = self.session.dial_mut().subscribe();
        let mut title = TitleState::default();
        let mut needles = [RingNeedle::default(); 3];
        let mut pointer = PointerTracker::default();

        let frame_duration = Duration::from_secs_f64(1.0 / self.config.max_framerate.max(1.0));
        let mut last_frame = Instant::now();

        event_loop.run(move |event, window_target| {
            window_target.set_control_flow(ControlFlow::Poll);
            let bounds = DialBounds::new(0.0, 0.0, fb_width as f64, fb_height as f64);

            match event {
                Event::WindowEvent { event, .. } => match event {
                    WindowEvent::CloseRequested => {
                        self.session.disconnect();
                        window_target.exit();
                    }
                    WindowEvent::Resized(new_size) => {
                        fb_width = new_size.width as usize;
                        fb_height = new_size.height as usize;
                        let _ = pixels.resize_buffer(new_size.width, new_size.height);
                        let _ = pixels.resize_surface(new_size.width, new_size.height);
                    }
                    WindowEvent::CursorMoved { position, .. } => {
                        let point = to_point(position);
                        pointer.cursor = Some(point);
                        self.session.drag(Some(&bounds), point);
                    }
                    WindowEvent::MouseInput {
                        state,
                        button: MouseButton::Left,
                        ..
                    } => match state {
                        ElementState::Pressed => {
                            if let Some(point) = pointer.cursor {
                                self.press(&window_clone, &mut pointer, &bounds, point);
                            }
                        }
                        ElementState::Released => self.release(&window_clone, &mut pointer),
                    },
                    WindowEvent::Touch(Touch {
                        phase, location, id, ..
                    }) => {
                        self.touch(&window_clone, &mut pointer, &bounds, phase, id, to_point(location));
                    }
                    WindowEvent::Focused(false) => self.release(&window_clone, &mut pointer),
                    WindowEvent::RedrawRequested => {
                        self.session.pump();
                        title.update(&window_clone, &self.config.title, &selections, &self.session);

                        let dial = self.session.dial();
                        let active = dial.active_ring();
                        for (needle, (ring, angle)) in needles.iter_mut().zip(dial.angles().iter()) {
                            needle.set_target(angle);
                            needle.update(active == Some(ring), self.config.ease_factor);
                        }

                        let view = DialView {
                            angles: needles.map(|n| n.pos()),
                            active,
                            connected: self.session.connection_state().is_connected(),
                            data: dial.data(),
                            tick_counts: self.config.tick_counts,
                            activation_radius: self.config.activation_radius,
                        };
                        let frame = pixels.frame_mut();
                        let mut canvas = Canvas::new(frame, fb_width, fb_height);
                        render_dial(&mut canvas, &view);
                        if let Err(e) = pixels.render() {
                            error!(error = %e, "render failed");
                            window_target.exit();
                        }
                    }
                    _ => {}
                },
                Event::AboutToWait => {
                    if last_frame.elapsed() >= frame_duration {
                        window_clone.request_redraw();
                        last_frame = Instant::now();
                    }
                }
                _ => {}
            }
        })?;

        Ok(())
    }

    fn press(&mut self, window: &Window, pointer: &mut PointerTracker, bounds: &DialBounds, point: Point) {
        let result = self.session.press(Some(bounds), point);
        if result == PressResult::Toggled {
            info!(status = %self.session.connection_state(), "activation button");
        }
        pointer.sync_capture(window, matches!(result, PressResult::Dragging(_)));
    }

    fn release(&mut self, window: &Window, pointer: &mut PointerTracker) {
        self.session.release();
        pointer.touch_id = None;
        pointer.sync_capture(window, false);
    }

    /// Only the first finger down steers the dial.
    fn touch(
        &mut self,
        window: &Window,
        pointer: &mut PointerTracker,
        bounds: &DialBounds,
        phase: TouchPhase,
        id: u64,
        point: Point,
    ) {
        match phase {
            TouchPhase::Started if pointer.touch_id.is_none() => {
                pointer.touch_id = Some(id);
                self.press(window, pointer, bounds, point);
            }
            TouchPhase::Moved if pointer.touch_id == Some(id) => {
                self.session.drag(Some(bounds), point);
            }
            TouchPhase::Ended | TouchPhase::Cancelled if pointer.touch_id == Some(id) => {
                self.release(window, pointer);
            }
            _ => {}
        }
    }
}

fn to_point(position: PhysicalPosition<f64>) -> Point {
    Point::new(position.x, position.y)
}

/// Mirrors the active outer option and link status into the window title.
#[derive(Default)]
struct TitleState {
    last: Option<String>,
    selection: FilterSelection,
}

impl TitleState {
    fn update<C: Connector>(
        &mut self,
        window: &Window,
        base: &str,
        selections: &Receiver<FilterSelection>,
        session: &DialSession<C>,
    ) {
        if let Some(latest) = selections.try_iter().last() {
            if latest != self.selection {
                debug!(
                    outer = latest.outer.as_ref().map(|o| o.label.as_str()),
                    middle = latest.middle.as_ref().map(|o| o.label.as_str()),
                    inner = latest.inner.as_ref().map(|o| o.label.as_str()),
                    "filter changed"
                );
            }
            self.selection = latest;
        }

        let label = self
            .selection
            .get(Ring::Outer)
            .map_or("none", |o| o.label.as_str());
        let title = format!("{base} | {label} | {}", session.link().status());
        if self.last.as_deref() != Some(title.as_str()) {
            window.set_title(&title);
            self.last = Some(title);
        }
    }
}
