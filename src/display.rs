//! Window and display state.

use crate::Config;

/// Display state of the window, mutated by the frame loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(clippy::struct_excessive_bools, clippy::exhaustive_structs)]
pub struct Display {
    /// Width of the drawable part of the window in pixels.
    pub screen_width: u32,
    /// Height of the drawable part of the window in pixels.
    pub screen_height: u32,
    /// Whether the window is in borderless fullscreen mode.
    pub fullscreen: bool,
    /// Whether the offscreen surface is drawn through the post-processing shader.
    pub use_shader: bool,
    /// Whether the frames per second are drawn.
    pub show_fps: bool,
}

impl Display {
    /// Setup the display state from the monitor resolution.
    ///
    /// # Arguments
    ///
    /// * `config` - Initial flags.
    /// * `monitor_size` - Resolution of the monitor the window opens on, `None` falls back to the render size.
    #[inline]
    #[must_use]
    pub fn new(config: &Config, monitor_size: Option<(u32, u32)>) -> Self {
        let (screen_width, screen_height) =
            monitor_size.unwrap_or((config.render_width, config.render_height));

        Self {
            screen_width,
            screen_height,
            fullscreen: config.fullscreen,
            use_shader: config.use_shader,
            show_fps: config.show_fps,
        }
    }

    /// Update the size with the live size of the window.
    #[inline]
    pub fn set_screen_size(&mut self, screen_width: u32, screen_height: u32) {
        self.screen_width = screen_width;
        self.screen_height = screen_height;
    }

    /// Size of the drawable part of the window in pixels.
    #[inline]
    #[must_use]
    pub const fn screen_size(&self) -> (u32, u32) {
        (self.screen_width, self.screen_height)
    }

    /// Whether nothing can be drawn because the window has no area, when minimized for example.
    #[inline]
    #[must_use]
    pub const fn is_minimized(&self) -> bool {
        self.screen_width == 0 || self.screen_height == 0
    }

    /// Flip the fullscreen flag.
    ///
    /// # Returns
    ///
    /// - The new fullscreen state.
    #[inline]
    pub fn toggle_fullscreen(&mut self) -> bool {
        self.fullscreen = !self.fullscreen;

        self.fullscreen
    }
}

#[cfg(test)]
mod tests {
    use super::Display;
    use crate::Config;

    #[test]
    fn sized_to_monitor() {
        let display = Display::new(&Config::default(), Some((1920, 1080)));

        assert_eq!(display.screen_size(), (1920, 1080));
        assert!(display.fullscreen);
    }

    #[test]
    fn no_monitor_falls_back_to_render_size() {
        let display = Display::new(&Config::default().with_fullscreen(false), None);

        assert_eq!(display.screen_size(), (320, 180));
        assert!(!display.fullscreen);
    }

    #[test]
    fn toggle_only_flips_fullscreen() {
        let mut display = Display::new(&Config::default(), Some((800, 600)));
        let before = display;

        assert!(!display.toggle_fullscreen());
        assert_eq!(
            display,
            Display {
                fullscreen: false,
                ..before
            }
        );
        assert!(display.toggle_fullscreen());
        assert_eq!(display, before);
    }

    #[test]
    fn minimized() {
        let mut display = Display::new(&Config::default(), Some((800, 600)));
        assert!(!display.is_minimized());

        display.set_screen_size(0, 600);
        assert!(display.is_minimized());
    }
}
