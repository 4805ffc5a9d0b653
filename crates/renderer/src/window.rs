use anyhow::{anyhow, Context, Result};
use tracing::{debug, info, warn};
use winit::dpi::PhysicalSize;
use winit::event::{Event, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::window::{Window, WindowBuilder};

use crate::backend::{FrameError, RenderBackend};
use crate::console::{self, Console, DEVICE_FAILURE_MESSAGE, DEVICE_SUCCESS_MESSAGE};
use crate::gpu::{ContextError, GpuBackend};
use crate::scene::RenderScene;
use crate::types::{RedrawMode, RendererConfig, SceneConfig};

/// What the loop does after one display call.
#[derive(Debug, Clone, PartialEq, Eq)]
enum FrameAction {
    Presented,
    /// Surface went stale; rebuild it and draw again.
    Reconfigure,
    /// Frame was dropped; draw again on the next loop turn.
    Retry,
    Fatal(FrameError),
}

impl FrameAction {
    fn from_result(result: Result<(), FrameError>) -> Self {
        match result {
            Ok(()) => FrameAction::Presented,
            Err(FrameError::Lost) => FrameAction::Reconfigure,
            Err(FrameError::Timeout) | Err(FrameError::Other(_)) => FrameAction::Retry,
            Err(err @ FrameError::OutOfMemory) => FrameAction::Fatal(err),
        }
    }

    fn requests_redraw(&self) -> bool {
        matches!(self, FrameAction::Reconfigure | FrameAction::Retry)
    }
}

/// Render scene bound to the window it presents into.
///
/// Field order matters: the scene owns the surface, which must be dropped
/// before the window it was created from.
struct WindowState {
    scene: RenderScene<GpuBackend>,
    window: Window,
}

impl WindowState {
    fn redraw(&mut self) -> Result<(), FrameError> {
        let result = self.scene.display();
        if let Err(err) = &result {
            warn!(error = %err, "frame not presented");
        }

        let action = FrameAction::from_result(result);
        if action == FrameAction::Reconfigure {
            let size = self.window.inner_size();
            debug!(
                width = size.width,
                height = size.height,
                "surface lost; reconfiguring"
            );
            self.scene.reconfigure_surface(size.width, size.height);
        }
        if action.requests_redraw() {
            self.window.request_redraw();
        }

        match action {
            FrameAction::Fatal(err) => Err(err),
            _ => Ok(()),
        }
    }
}

/// Brings up the device through `connect`, then initialises the scene.
///
/// A failing `connect` is fatal and returns before any shader file is read.
fn start_scene<B, F>(
    connect: F,
    config: &SceneConfig,
    console: &mut Console<'_>,
) -> Result<RenderScene<B>>
where
    B: RenderBackend,
    F: FnOnce() -> Result<B, ContextError>,
{
    let backend = match connect() {
        Ok(backend) => backend,
        Err(err) => {
            console.err_line(DEVICE_FAILURE_MESSAGE);
            return Err(err).context("GPU initialisation failed");
        }
    };

    console.out_line(DEVICE_SUCCESS_MESSAGE);
    console.out_line(&format!("Using adapter: {}", backend.adapter_summary()));

    let scene = RenderScene::initialise(backend, config, console)
        .context("failed to initialise render scene")?;
    if scene.report().is_degraded() {
        warn!(report = ?scene.report(), "running with degraded shaders");
    }
    Ok(scene)
}

/// Opens the window, initialises the scene and runs the event loop until the
/// window is closed.
pub(crate) fn run_window(config: RendererConfig) -> Result<()> {
    let event_loop = EventLoop::new().context("failed to create event loop")?;
    let (width, height) = config.window_size();
    let window = WindowBuilder::new()
        .with_title(config.title.as_str())
        .with_inner_size(PhysicalSize::new(width, height))
        .with_resizable(false)
        .build(&event_loop)
        .map_err(|err| anyhow!("failed to create window: {err}"))?;

    let scene = console::with_stdio(|console| {
        start_scene(
            || GpuBackend::new(&window, window.inner_size(), config.profile),
            &config.scene,
            console,
        )
    })?;

    let adapter = scene.backend().adapter_profile();
    info!(
        adapter = %adapter.name,
        backend = ?adapter.backend,
        profile = %config.profile,
        "GPU device ready"
    );

    let mut state = WindowState { scene, window };
    let redraw_mode = config.redraw;
    state.window.request_redraw();

    let mut failure: Option<FrameError> = None;
    let failure_slot = &mut failure;
    event_loop
        .run(move |event, elwt| {
            elwt.set_control_flow(ControlFlow::Wait);
            match event {
                Event::WindowEvent { window_id, event } if window_id == state.window.id() => {
                    match event {
                        WindowEvent::CloseRequested | WindowEvent::Destroyed => {
                            elwt.exit();
                        }
                        WindowEvent::Resized(size) => {
                            state.scene.reconfigure_surface(size.width, size.height);
                        }
                        WindowEvent::RedrawRequested => {
                            if let Err(err) = state.redraw() {
                                *failure_slot = Some(err);
                                elwt.exit();
                            }
                        }
                        _ => {}
                    }
                }
                Event::AboutToWait => {
                    if redraw_mode == RedrawMode::Continuous {
                        state.window.request_redraw();
                    }
                }
                Event::LoopExiting => {
                    debug!(frames = state.scene.frames(), "event loop exiting");
                }
                _ => {}
            }
        })
        .map_err(|err| anyhow!("window event loop error: {err}"))?;

    match failure {
        Some(err) => Err(err).context("frame presentation failed"),
        None => Ok(()),
    }
}
