//! Placeholder game state, replace this with the actual game.

use crate::{
    canvas::Canvas, display::Display, font::Font, input::Input, rectangle::Rectangle, Config,
};

/// Horizontal position the rectangle restarts at after leaving the surface on the right.
pub const RECTANGLE_RESET_X: f32 = -10.0;

/// Position of the FPS readout on the offscreen surface.
const FPS_POSITION: (i32, i32) = (2, 2);

/// Format the FPS readout.
///
/// The value is rounded to a whole number and never truncated.
#[inline]
#[must_use]
pub fn fps_label(frames_per_second: f32) -> String {
    format!("FPS: {}", frames_per_second.round() as u64)
}

/// Move a rectangle to the right, wrapping back to the left once it reaches the edge.
///
/// The wrap check happens after moving: `x >= wrap_width` resets `x` to [`RECTANGLE_RESET_X`].
#[inline]
pub fn advance_rectangle(rect: &mut Rectangle, delta_time: f32, speed: f32, wrap_width: f32) {
    rect.x += speed * delta_time;

    if rect.x >= wrap_width {
        rect.x = RECTANGLE_RESET_X;
    }
}

/// What changed during a single frame step.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[allow(clippy::exhaustive_structs)]
pub struct StepOutcome {
    /// The fullscreen flag of the display flipped and must be applied to the window.
    pub fullscreen_toggled: bool,
}

/// Everything that's simulated and drawn.
#[derive(Debug, Clone)]
pub struct Scene {
    /// Placeholder entity moving from left to right.
    pub rectangle: Rectangle,
    /// Horizontal speed of the rectangle in pixels per second.
    speed: f32,
    /// Horizontal size of the offscreen surface.
    render_width: f32,
    /// Clear color of the offscreen surface.
    background_color: u32,
    /// Color of the rectangle and the text.
    foreground_color: u32,
    /// Font for the FPS readout.
    font: Font,
}

impl Scene {
    /// Setup the initial state.
    #[inline]
    #[must_use]
    pub fn new(config: &Config) -> Self {
        Self {
            rectangle: Rectangle::new(0.0, 20.0, 10.0, 10.0),
            speed: config.rectangle_speed,
            render_width: config.render_width as f32,
            background_color: config.background_color,
            foreground_color: config.foreground_color,
            font: Font::builtin(),
        }
    }

    /// Advance the simulation a single frame.
    ///
    /// Handles the fullscreen hotkey on the display and moves the rectangle.
    ///
    /// # Arguments
    ///
    /// * `display` - Display state, only the fullscreen flag can change.
    /// * `input` - Keyboard state of this frame.
    /// * `delta_time` - Seconds since the previous frame.
    #[inline]
    pub fn step(&mut self, display: &mut Display, input: &Input, delta_time: f32) -> StepOutcome {
        profiling::scope!("Scene step");

        let fullscreen_toggled = input.fullscreen_toggle_requested();
        if fullscreen_toggled {
            display.toggle_fullscreen();
        }

        advance_rectangle(
            &mut self.rectangle,
            delta_time,
            self.speed,
            self.render_width,
        );

        StepOutcome { fullscreen_toggled }
    }

    /// Draw the current state on the offscreen surface.
    #[inline]
    pub fn draw(&self, display: &Display, frames_per_second: f32, canvas: &mut Canvas) {
        profiling::scope!("Scene draw");

        canvas.fill(self.background_color);

        if display.show_fps {
            canvas.draw_text(
                &self.font,
                FPS_POSITION.0,
                FPS_POSITION.1,
                &fps_label(frames_per_second),
                self.foreground_color,
            );
        }

        canvas.fill_rect(&self.rectangle, self.foreground_color);
    }
}
