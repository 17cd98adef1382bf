//! Game configuration.

use std::path::{Path, PathBuf};

use miette::{Context, IntoDiagnostic, Result};
use serde::Deserialize;

/// Largest horizontal or vertical amount of pixels of the offscreen surface.
///
/// Matches the texture size every GPU supports.
pub const MAX_RENDER_SIZE: u32 = 8192;

/// Initial configuration passed to [`crate::run`].
///
/// Constructed once at startup, after which it's only read.
///
/// There's three ways to initialize the config:
///
/// # Example
///
/// ```rust
/// # use letterbox::Config;
/// Config {
///   title: "My Game".to_owned(),
///   ..Default::default()
/// };
/// ```
///
/// # Example
///
/// ```rust
/// # use letterbox::Config;
/// Config::default().with_title("My Game");
/// ```
///
/// # Example
///
/// ```rust
/// # use letterbox::Config;
/// let config = Config::from_toml_str(r#"
///   title = "My Game"
///   fullscreen = false
/// "#)?;
///
/// assert!(!config.fullscreen);
/// # Ok::<(), miette::Report>(())
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
#[allow(clippy::struct_excessive_bools, clippy::exhaustive_structs)]
pub struct Config {
    /// Name in the title bar.
    ///
    /// Defaults to `"Letterbox"`.
    pub title: String,
    /// Horizontal amount of pixels of the offscreen surface.
    ///
    /// Defaults to `320`.
    pub render_width: u32,
    /// Vertical amount of pixels of the offscreen surface.
    ///
    /// Defaults to `180`.
    pub render_height: u32,
    /// Start in borderless fullscreen mode.
    ///
    /// Defaults to `true`.
    pub fullscreen: bool,
    /// Draw the offscreen surface to the window through the post-processing shader.
    ///
    /// When disabled the surface is copied as is.
    ///
    /// Defaults to `true`.
    pub use_shader: bool,
    /// Overlay the frames per second in the top-left corner.
    ///
    /// Defaults to `true`.
    pub show_fps: bool,
    /// Wait for the vertical blank of the monitor before presenting a frame.
    ///
    /// When disabled the frame rate is capped at the refresh rate of the monitor.
    ///
    /// Defaults to `true`.
    pub vsync: bool,
    /// WGSL file with the fragment stage of the post-processing shader.
    ///
    /// When `None`, or when the file can't be loaded, the built-in shader is used.
    ///
    /// Defaults to `"shader.wgsl"`.
    pub shader_path: Option<PathBuf>,
    /// Horizontal speed of the placeholder rectangle in pixels per second.
    ///
    /// Defaults to `50.0`.
    pub rectangle_speed: f32,
    /// Maximum time a single frame is allowed to take in seconds.
    ///
    /// Dragging or resizing the window can block the loop for a long time, capping the frame time keeps the rectangle from jumping.
    /// When `None` the real elapsed time is always used.
    ///
    /// Defaults to `None`.
    pub max_frame_time_secs: Option<f32>,
    /// Color of the background of the offscreen surface.
    ///
    /// Defaults to `0xFFFFFFFF` (white).
    pub background_color: u32,
    /// Color of everything drawn on the offscreen surface.
    ///
    /// Defaults to `0xFF000000` (black).
    pub foreground_color: u32,
    /// Color of the viewport.
    ///
    /// The viewport is the area outside of the letterboxed surface.
    ///
    /// Defaults to `0xFF000000` (black).
    pub viewport_color: u32,
}

impl Config {
    /// Parse a configuration from a TOML document.
    ///
    /// Missing keys take their default value.
    ///
    /// # Errors
    ///
    /// - When the document is not valid TOML.
    /// - When the document contains unknown keys.
    /// - When [`Self::validate`] fails.
    #[inline]
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let config: Self = toml::from_str(source)
            .into_diagnostic()
            .wrap_err("Error parsing configuration")?;

        config.validate()?;

        Ok(config)
    }

    /// Read a TOML configuration file, or use the defaults when it doesn't exist.
    ///
    /// # Errors
    ///
    /// - When the file exists but can't be read.
    /// - When [`Self::from_toml_str`] fails.
    #[inline]
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            log::debug!(
                "No configuration file at '{}', using defaults",
                path.display()
            );

            return Ok(Self::default());
        }

        log::debug!("Loading configuration from '{}'", path.display());

        let source = std::fs::read_to_string(path)
            .into_diagnostic()
            .wrap_err_with(|| format!("Error reading configuration file '{}'", path.display()))?;

        Self::from_toml_str(&source)
            .wrap_err_with(|| format!("Invalid configuration file '{}'", path.display()))
    }

    /// Check the values that can't be expressed by the types.
    ///
    /// # Errors
    ///
    /// - When the offscreen surface has no pixels.
    /// - When the offscreen surface is bigger than [`MAX_RENDER_SIZE`] on any axis.
    /// - When the rectangle speed is not a finite number.
    /// - When the maximum frame time is not a positive number.
    #[inline]
    pub fn validate(&self) -> Result<()> {
        if self.render_width == 0 || self.render_height == 0 {
            miette::bail!(
                "Render size must be at least 1x1 pixels, got {}x{}",
                self.render_width,
                self.render_height
            );
        }

        if self.render_width > MAX_RENDER_SIZE || self.render_height > MAX_RENDER_SIZE {
            miette::bail!(
                "Render size can be at most {MAX_RENDER_SIZE}x{MAX_RENDER_SIZE} pixels, got {}x{}",
                self.render_width,
                self.render_height
            );
        }

        if !self.rectangle_speed.is_finite() {
            miette::bail!(
                "Rectangle speed must be a finite number, got {}",
                self.rectangle_speed
            );
        }

        if let Some(max_frame_time_secs) = self.max_frame_time_secs {
            if !(max_frame_time_secs.is_finite() && max_frame_time_secs > 0.0) {
                miette::bail!(
                    "Maximum frame time must be a positive number of seconds, got {max_frame_time_secs}"
                );
            }
        }

        Ok(())
    }

    /// Set the name in the title bar.
    #[inline]
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();

        self
    }

    /// Set the amount of pixels of the offscreen surface.
    #[inline]
    #[must_use]
    pub const fn with_render_size(mut self, render_width: u32, render_height: u32) -> Self {
        self.render_width = render_width;
        self.render_height = render_height;

        self
    }

    /// Set whether to start in fullscreen mode.
    #[inline]
    #[must_use]
    pub const fn with_fullscreen(mut self, fullscreen: bool) -> Self {
        self.fullscreen = fullscreen;

        self
    }

    /// Set whether to draw through the post-processing shader.
    #[inline]
    #[must_use]
    pub const fn with_shader(mut self, use_shader: bool) -> Self {
        self.use_shader = use_shader;

        self
    }

    /// Set whether to overlay the frames per second.
    #[inline]
    #[must_use]
    pub const fn with_show_fps(mut self, show_fps: bool) -> Self {
        self.show_fps = show_fps;

        self
    }

    /// Set whether to wait for the vertical blank before presenting.
    #[inline]
    #[must_use]
    pub const fn with_vsync(mut self, vsync: bool) -> Self {
        self.vsync = vsync;

        self
    }

    /// Set the fragment shader file, `None` for the built-in shader.
    #[inline]
    #[must_use]
    pub fn with_shader_path(mut self, shader_path: Option<impl Into<PathBuf>>) -> Self {
        self.shader_path = shader_path.map(Into::into);

        self
    }

    /// Set the horizontal speed of the placeholder rectangle.
    #[inline]
    #[must_use]
    pub const fn with_rectangle_speed(mut self, rectangle_speed: f32) -> Self {
        self.rectangle_speed = rectangle_speed;

        self
    }

    /// Set the maximum time a single frame is allowed to take, `None` for no limit.
    #[inline]
    #[must_use]
    pub const fn with_max_frame_time_secs(mut self, max_frame_time_secs: Option<f32>) -> Self {
        self.max_frame_time_secs = max_frame_time_secs;

        self
    }

    /// Set the color of the background of the offscreen surface.
    #[inline]
    #[must_use]
    pub const fn with_background_color(mut self, background_color: u32) -> Self {
        self.background_color = background_color;

        self
    }

    /// Set the color of everything drawn on the offscreen surface.
    #[inline]
    #[must_use]
    pub const fn with_foreground_color(mut self, foreground_color: u32) -> Self {
        self.foreground_color = foreground_color;

        self
    }

    /// Set the color of the area outside of the letterboxed surface.
    #[inline]
    #[must_use]
    pub const fn with_viewport_color(mut self, viewport_color: u32) -> Self {
        self.viewport_color = viewport_color;

        self
    }
}

impl Default for Config {
    #[inline]
    fn default() -> Self {
        Self {
            title: "Letterbox".to_owned(),
            render_width: 320,
            render_height: 180,
            fullscreen: true,
            use_shader: true,
            show_fps: true,
            vsync: true,
            shader_path: Some(PathBuf::from("shader.wgsl")),
            rectangle_speed: 50.0,
            max_frame_time_secs: None,
            background_color: 0xFFFF_FFFF,
            foreground_color: 0xFF00_0000,
            viewport_color: 0xFF00_0000,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::Config;

    #[test]
    fn defaults_match_template() {
        let config = Config::default();

        assert_eq!((config.render_width, config.render_height), (320, 180));
        assert!(config.fullscreen && config.use_shader && config.show_fps);
        assert_eq!(config.shader_path, Some(PathBuf::from("shader.wgsl")));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config = Config::from_toml_str(
            r#"
            title = "Scaffold"
            show_fps = false
            background_color = 0xFF102030
            "#,
        )
        .unwrap();

        assert_eq!(config.title, "Scaffold");
        assert!(!config.show_fps);
        assert_eq!(config.background_color, 0xFF10_2030);
        assert_eq!(config.render_width, 320);
        assert!((config.rectangle_speed - 50.0).abs() < f32::EPSILON);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(Config::from_toml_str("fulscreen = false").is_err());
    }

    #[test]
    fn empty_render_size_is_rejected() {
        assert!(Config::from_toml_str("render_width = 0").is_err());
        assert!(Config::default()
            .with_render_size(320, 0)
            .validate()
            .is_err());
    }

    #[test]
    fn oversized_render_size_is_rejected() {
        assert!(Config::from_toml_str("render_width = 100000").is_err());
        assert!(Config::default()
            .with_render_size(320, super::MAX_RENDER_SIZE + 1)
            .validate()
            .is_err());
        assert!(Config::default()
            .with_render_size(super::MAX_RENDER_SIZE, super::MAX_RENDER_SIZE)
            .validate()
            .is_ok());
    }

    #[test]
    fn frame_time_is_uncapped_by_default() {
        assert_eq!(Config::default().max_frame_time_secs, None);

        let config = Config::from_toml_str("max_frame_time_secs = 0.25").unwrap();
        assert_eq!(config.max_frame_time_secs, Some(0.25));

        assert!(Config::from_toml_str("max_frame_time_secs = 0.0").is_err());
        assert!(Config::from_toml_str("max_frame_time_secs = -1.0").is_err());
    }

    #[test]
    fn missing_file_uses_defaults() {
        let config =
            Config::load_or_default("this-configuration-file-does-not-exist.toml").unwrap();

        assert_eq!(config, Config::default());
    }

    #[test]
    fn builder() {
        let config = Config::default()
            .with_title("Builder")
            .with_fullscreen(false)
            .with_shader_path(None::<PathBuf>)
            .with_rectangle_speed(10.0);

        assert_eq!(config.title, "Builder");
        assert!(!config.fullscreen);
        assert_eq!(config.shader_path, None);
        assert!((config.rectangle_speed - 10.0).abs() < f32::EPSILON);
    }
}
