#![forbid(unsafe_code)]

//! AGPL licensed scaffold for a 2D pixel-art game loop.
//!
//! # Features
//!
//! - Window sized to the monitor, optionally borderless fullscreen, toggled with `F11` or `Alt+Enter`.
//! - Fixed low-resolution offscreen surface, upscaled to the window with letterboxing so the aspect ratio is kept.
//! - Post-processing WGSL shader receiving the resolution of the offscreen surface, loaded from disk with a built-in fallback.
//! - Frame-rate independent movement of a placeholder rectangle.
//! - Optional frames per second readout drawn with a built-in bitmap font.
//!
//! # Usage
//!
//! ```no_run
//! use letterbox::Config;
//!
//! # fn try_main() -> miette::Result<()> {
//! let config = Config::default()
//!     .with_title("My Game")
//!     .with_fullscreen(false);
//!
//! letterbox::run(config)?;
//! # Ok(())
//! # }
//! ```
//!
//! # Shaders
//!
//! The post-processing shader only has to define the fragment stage, the bindings are prepended to it:
//!
//! ```wgsl
//! struct ScreenInfo {
//!     resolution: vec2<f32>,
//!     output_size: vec2<f32>,
//! }
//!
//! @group(0) @binding(0) var source: texture_2d<f32>;
//! @group(0) @binding(1) var source_sampler: sampler;
//! @group(1) @binding(0) var<uniform> screen: ScreenInfo;
//! ```
//!
//! Its entry point must be `@fragment fn fs_main(in: VertexOutput) -> @location(0) vec4<f32>`.
//!
//! # Install Requirements
//!
//! On Linux you need the development headers of X11 or Wayland, depending on the enabled features.

pub mod canvas;
pub mod config;
pub mod display;
pub mod font;
mod graphics;
pub mod input;
pub mod letterbox;
pub mod rectangle;
pub mod scene;
pub mod timing;
mod window;

pub use canvas::Canvas;
pub use config::Config;
pub use display::Display;
pub use font::Font;
pub use input::{Input, KeyCode};
pub use letterbox::Letterbox;
use miette::{IntoDiagnostic, Result, WrapErr};
pub use rectangle::Rectangle;
pub use scene::{Scene, StepOutcome};
pub use timing::FrameClock;
use winit::event_loop::EventLoop;

/// Open the window and run the game loop until the window is closed.
///
/// All GPU resources and the window are released before returning.
///
/// # Arguments
///
/// * `config` - Configuration for the window and the rendering.
///
/// # Errors
///
/// - When the configuration is invalid.
/// - When the event loop, the window or the GPU can't be set up.
/// - When rendering a frame fails in a way that can't be recovered from.
#[inline]
pub fn run(config: Config) -> Result<()> {
    config.validate()?;

    // Setup the event loop for the window
    let event_loop = EventLoop::new()
        .into_diagnostic()
        .wrap_err("Error setting up event loop for window")?;

    let mut app = window::App::new(config);
    event_loop
        .run_app(&mut app)
        .into_diagnostic()
        .wrap_err("Error running game loop")?;

    app.into_result()
}
