//! Spawn a winit window and run the game loop.

use std::sync::Arc;

use miette::{IntoDiagnostic, Report, Result, WrapErr};
use web_time::Instant;
use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, ControlFlow},
    window::{Fullscreen, Window, WindowId},
};

use crate::{
    canvas::Canvas,
    display::Display,
    graphics::state::MainRenderState,
    input::Input,
    letterbox::Letterbox,
    scene::Scene,
    timing::{self, FrameClock},
    Config,
};

/// Everything acquired once the window exists.
///
/// Fields are dropped in declaration order, the window is released last.
struct Running {
    /// GPU state drawing to the window.
    render_state: MainRenderState<'static>,
    /// Offscreen surface the scene is drawn to.
    canvas: Canvas,
    /// Placeholder game state.
    scene: Scene,
    /// Live display state.
    display: Display,
    /// Keyboard state.
    input: Input,
    /// Frame timings.
    clock: FrameClock,
    /// Window instance.
    window: Arc<Window>,
}

impl Running {
    /// Open the window and acquire all GPU resources.
    fn new(config: &Config, event_loop: &ActiveEventLoop) -> Result<Self> {
        // Use the monitor the window will open on
        let monitor = event_loop
            .primary_monitor()
            .or_else(|| event_loop.available_monitors().next());
        let monitor_size = monitor.as_ref().map(|monitor| {
            let PhysicalSize { width, height } = monitor.size();

            (width, height)
        });

        let display = Display::new(config, monitor_size);
        log::debug!(
            "Opening window of ({}x{})",
            display.screen_width,
            display.screen_height
        );

        // Define the properties of the window
        let window_attributes = Window::default_attributes()
            .with_title(&config.title)
            .with_resizable(true)
            .with_inner_size(PhysicalSize::new(
                display.screen_width,
                display.screen_height,
            ))
            // Don't allow the window to be smaller than the pixel size
            .with_min_inner_size(PhysicalSize::new(
                config.render_width,
                config.render_height,
            ))
            .with_fullscreen(
                display
                    .fullscreen
                    .then(|| Fullscreen::Borderless(monitor.clone())),
            );

        // Spawn a new window using the event loop
        let window = Arc::new(
            event_loop
                .create_window(window_attributes)
                .into_diagnostic()
                .wrap_err("Error creating window")?,
        );

        // Target the refresh rate of the monitor when the presentation doesn't wait for it
        let target_frame_time = if config.vsync {
            None
        } else {
            monitor
                .as_ref()
                .and_then(winit::monitor::MonitorHandle::refresh_rate_millihertz)
                .and_then(timing::frame_time_from_refresh_rate)
        };

        let PhysicalSize { width, height } = window.inner_size();

        // Because pollster returns the value we can set it immediately
        let render_state = pollster::block_on(MainRenderState::new(
            config,
            Arc::clone(&window),
            (width, height),
        ))
        .wrap_err("Error setting up the rendering pipeline")?;

        log::info!(
            "Running at {}x{} upscaled to {width}x{height}",
            config.render_width,
            config.render_height
        );

        Ok(Self {
            render_state,
            canvas: Canvas::new(config.render_width, config.render_height),
            scene: Scene::new(config),
            display,
            input: Input::new(),
            clock: FrameClock::new(target_frame_time)
                .with_max_frame_time_secs(config.max_frame_time_secs),
            window,
        })
    }

    /// Run a single iteration of the game loop.
    fn frame(&mut self) -> Result<()> {
        profiling::scope!("Frame");

        let delta_time = self.clock.tick();

        // The window can be resized at any moment
        let PhysicalSize { width, height } = self.window.inner_size();
        self.display.set_screen_size(width, height);

        let outcome = self.scene.step(&mut self.display, &self.input, delta_time);
        if outcome.fullscreen_toggled {
            self.apply_fullscreen();
        }

        // All input of this frame has been handled
        self.input.update();

        self.scene.draw(
            &self.display,
            self.clock.frames_per_second(),
            &mut self.canvas,
        );

        // Nothing to present to
        if self.display.is_minimized() {
            return Ok(());
        }

        self.render_state.resize(self.display.screen_size());

        let letterbox = Letterbox::fit(self.canvas.size(), self.display.screen_size());
        self.render_state
            .render(&self.canvas, &letterbox, self.display.use_shader)?;

        profiling::finish_frame!();

        Ok(())
    }

    /// Apply the fullscreen flag of the display to the window.
    fn apply_fullscreen(&self) {
        log::info!(
            "Switching to {} mode",
            if self.display.fullscreen {
                "fullscreen"
            } else {
                "windowed"
            }
        );

        self.window.set_fullscreen(
            self.display
                .fullscreen
                // Borderless on the monitor the window is currently on
                .then(|| Fullscreen::Borderless(self.window.current_monitor())),
        );
    }
}

/// Window state that can still be uninitialized.
///
/// All optional fields are tied to the window creation flow of winit.
pub(crate) struct App {
    /// `None` until the event loop resumes for the first time, and after exiting.
    running: Option<Running>,
    /// User supplied configuration.
    config: Config,
    /// Error that stopped the game loop.
    error: Option<Report>,
}

impl App {
    /// Prepare the application, nothing is acquired until the event loop starts.
    pub(crate) const fn new(config: Config) -> Self {
        Self {
            running: None,
            config,
            error: None,
        }
    }

    /// Result of running the game loop.
    ///
    /// # Errors
    ///
    /// - When setting up the window or the GPU failed.
    /// - When drawing a frame failed.
    pub(crate) fn into_result(self) -> Result<()> {
        self.error.map_or(Ok(()), Err)
    }

    /// Remember the error and stop the game loop.
    fn fail(&mut self, event_loop: &ActiveEventLoop, error: Report) {
        // The first error is the cause of the rest
        if self.error.is_none() {
            self.error = Some(error);
        }

        event_loop.exit();
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        // Only setup the window once
        if self.running.is_some() || self.error.is_some() {
            return;
        }

        match Running::new(&self.config, event_loop) {
            Ok(running) => self.running = Some(running),
            Err(err) => self.fail(event_loop, err),
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        // Do nothing if the window is not set up yet
        let Some(running) = &mut self.running else {
            return;
        };

        match event {
            // Handle the game loop
            WindowEvent::RedrawRequested => {
                if let Err(err) = running.frame() {
                    self.fail(event_loop, err);
                }
            }
            // The surface is resized at the start of the next frame
            WindowEvent::Resized(_) => running.window.request_redraw(),
            // Close the window if requested, this is the only way to exit
            WindowEvent::CloseRequested => event_loop.exit(),
            // Handle keyboard events with the input manager
            WindowEvent::KeyboardInput { .. } | WindowEvent::Focused(_) => {
                running.input.handle_event(&event);
            }
            // Ignore the rest of the events
            _ => (),
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        let Some(running) = &self.running else {
            return;
        };

        match running.clock.next_frame_deadline() {
            // Too early for the next frame, sleep until it's time
            Some(deadline) if Instant::now() < deadline => {
                event_loop.set_control_flow(ControlFlow::WaitUntil(deadline));
            }
            // Presenting the frame paces the loop
            _ => {
                event_loop.set_control_flow(ControlFlow::Poll);
                running.window.request_redraw();
            }
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        log::debug!("Releasing GPU resources and closing the window");

        self.running = None;
    }
}
