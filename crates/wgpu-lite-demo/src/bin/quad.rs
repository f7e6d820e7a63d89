//! Opens a window and draws a color-cornered quad whose brightness pulses
//! through the auxiliary buffer.

use std::time::Instant;

use anyhow::{Context, Result};
use ouroboros::self_referencing;
use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

use wgpu_lite::logging::{init_logging, LoggingConfig};
use wgpu_lite::{quad_to_triangles, ColorRgba, Session, SessionConfig, SubmitError, SurfaceErrorAction};

const SHADER: &str = include_str!("../shaders/quad.wgsl");

/// Corners as XYZW + RGBA: bottom-left, bottom-right, top-left, top-right.
#[rustfmt::skip]
const CORNERS: [f32; 32] = [
    -0.6, -0.6, 0.0, 1.0,   1.0, 0.2, 0.2, 1.0,
     0.6, -0.6, 0.0, 1.0,   0.2, 1.0, 0.2, 1.0,
    -0.6,  0.6, 0.0, 1.0,   0.2, 0.2, 1.0, 1.0,
     0.6,  0.6, 0.0, 1.0,   1.0, 1.0, 0.2, 1.0,
];

#[self_referencing]
struct QuadWindow {
    window: Window,

    #[borrows(window)]
    #[covariant]
    session: Session<'this>,
}

struct QuadApp {
    entry: Option<QuadWindow>,
    vertices: Vec<f32>,
    started: Instant,
    clear: ColorRgba,
}

impl QuadApp {
    fn new() -> Result<Self> {
        Ok(Self {
            entry: None,
            vertices: quad_to_triangles(&CORNERS)?,
            started: Instant::now(),
            clear: ColorRgba::new(0.05, 0.05, 0.08, 1.0),
        })
    }

    fn create_window(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let attrs = Window::default_attributes()
            .with_title("wgpu-lite quad")
            .with_inner_size(LogicalSize::new(640.0, 480.0));

        let window = event_loop
            .create_window(attrs)
            .context("failed to create window")?;

        let entry = QuadWindowTryBuilder {
            window,
            session_builder: |w: &Window| {
                let config = SessionConfig {
                    label: "quad".into(),
                    ..Default::default()
                };
                pollster::block_on(Session::init_render(SHADER, Some(w), true, config))
            },
        }
        .try_build()?;

        entry.with_window(|w| w.request_redraw());
        self.entry = Some(entry);
        Ok(())
    }

    /// Draws one frame. Returns `false` when the app should exit.
    fn redraw(&self) -> bool {
        let Some(entry) = self.entry.as_ref() else {
            return true;
        };

        let t = self.started.elapsed().as_secs_f32();
        let pulse = [0.6 + 0.4 * (t * 2.0).sin()];

        let result = entry.with_session(|s| s.render(&self.vertices, self.clear, Some(&pulse)));
        match result {
            Ok(()) => true,
            Err(e) => match e.downcast_ref::<SubmitError>() {
                Some(SubmitError::Surface {
                    action: SurfaceErrorAction::Fatal,
                    ..
                }) => {
                    log::error!("fatal surface error: {e:#}");
                    false
                }
                Some(SubmitError::Surface { .. }) => {
                    log::debug!("skipping frame: {e:#}");
                    true
                }
                _ => {
                    log::error!("render failed: {e:#}");
                    false
                }
            },
        }
    }
}

impl ApplicationHandler for QuadApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.entry.is_some() {
            return;
        }

        if let Err(e) = self.create_window(event_loop) {
            log::error!("failed to create window: {e:#}");
            event_loop.exit();
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        event_loop.set_control_flow(ControlFlow::Wait);

        // Continuous redraw to animate the pulse.
        if let Some(entry) = self.entry.as_ref() {
            entry.with_window(|w| w.request_redraw());
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                self.entry = None;
                event_loop.exit();
            }

            WindowEvent::Resized(new_size) => {
                if let Some(entry) = self.entry.as_mut() {
                    entry.with_session_mut(|s| s.resize(new_size));
                    entry.with_window(|w| w.request_redraw());
                }
            }

            WindowEvent::ScaleFactorChanged { .. } => {
                if let Some(entry) = self.entry.as_mut() {
                    let new_size = entry.with_window(|w| w.inner_size());
                    entry.with_session_mut(|s| s.resize(new_size));
                }
            }

            WindowEvent::RedrawRequested => {
                if !self.redraw() {
                    self.entry = None;
                    event_loop.exit();
                }
            }

            _ => {}
        }
    }
}

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    let event_loop = EventLoop::new().context("failed to create winit EventLoop")?;
    let mut app = QuadApp::new()?;

    event_loop
        .run_app(&mut app)
        .context("winit event loop terminated with error")?;

    Ok(())
}
