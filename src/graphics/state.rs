//! Main rendering state.

use std::borrow::Cow;

use miette::Result;

use super::{
    data::ScreenInfo, gpu::Gpu, post_processing::PostProcessingState,
    render_target::RenderTarget, shader, uniform::UniformState,
};
use crate::{canvas::Canvas, letterbox::Letterbox, Config};

/// Main render state holding the GPU information.
///
/// Fields are dropped in declaration order, releasing the pipelines before the texture they sample and the texture before the surface.
pub(crate) struct MainRenderState<'window> {
    /// Pipeline drawing through the configured post-processing shader.
    shaded: PostProcessingState,
    /// Pipeline drawing the offscreen surface unaltered.
    passthrough: PostProcessingState,
    /// Uniform screen info (resolution and output size) for the shaders.
    screen_info: UniformState<ScreenInfo>,
    /// Last value written to the screen info uniform.
    current_screen_info: ScreenInfo,
    /// Low-resolution texture the canvas is uploaded to.
    render_target: RenderTarget,
    /// Color of the area outside of the letterbox.
    viewport_color: wgpu::Color,
    /// GPU state.
    gpu: Gpu<'window>,
}

impl<'window> MainRenderState<'window> {
    /// Create a GPU surface on the window with the offscreen surface and the shaders.
    ///
    /// A shader the GPU rejects is replaced with the built-in shader.
    ///
    /// # Errors
    ///
    /// - When no GPU can draw to the window.
    /// - When the render size exceeds the texture limits of the GPU.
    /// - When the built-in shader is rejected.
    pub(crate) async fn new<W>(config: &Config, window: W, screen_size: (u32, u32)) -> Result<Self>
    where
        W: wgpu::WindowHandle + 'window,
    {
        // Setup the GPU and attach it to the window surface
        let gpu = Gpu::new(window, screen_size, config.vsync).await?;

        // The device can have stricter limits than the configuration allows
        let max_texture_size = gpu.device.limits().max_texture_dimension_2d;
        if config.render_width > max_texture_size || config.render_height > max_texture_size {
            miette::bail!(
                "Render size {}x{} is bigger than the maximum texture size {max_texture_size}x{max_texture_size} of the GPU",
                config.render_width,
                config.render_height
            );
        }

        // Allocate the offscreen surface
        let render_target = RenderTarget::new(&gpu.device, config.render_width, config.render_height);

        // Bind the size of the offscreen surface for the shaders
        let current_screen_info = ScreenInfo::new(config.render_width, config.render_height);
        let screen_info = UniformState::new(&gpu.device, &current_screen_info);

        // Load the shader, falling back to the built-in one when it's broken
        let shader_source = shader::resolve(config.shader_path.as_deref());

        let surface_format = gpu.surface_format();

        // Capture what the driver rejects beyond the shader validation
        gpu.device.push_error_scope(wgpu::ErrorFilter::Validation);
        let shaded = PostProcessingState::new(
            &gpu.device,
            &render_target.view,
            &screen_info,
            &shader_source,
            surface_format,
            "Post Processing Shader",
        );
        let shaded = match (gpu.device.pop_error_scope().await, shader_source) {
            (None, _) => shaded,
            (Some(err), Cow::Owned(_)) => {
                log::error!("Error creating post processing pipeline: {err}");
                log::warn!("Falling back to the built-in shader");

                PostProcessingState::new(
                    &gpu.device,
                    &render_target.view,
                    &screen_info,
                    shader::BUILTIN,
                    surface_format,
                    "Post Processing Shader",
                )
            }
            (Some(err), Cow::Borrowed(_)) => {
                miette::bail!("Error creating built-in post processing pipeline: {err}");
            }
        };
        let passthrough = PostProcessingState::new(
            &gpu.device,
            &render_target.view,
            &screen_info,
            shader::PASSTHROUGH,
            surface_format,
            "Passthrough Shader",
        );

        let viewport_color =
            super::u32_to_wgpu_color(config.viewport_color, surface_format.is_srgb());

        Ok(Self {
            shaded,
            passthrough,
            screen_info,
            current_screen_info,
            render_target,
            viewport_color,
            gpu,
        })
    }

    /// Upscale the canvas into the letterbox of the window.
    ///
    /// # Arguments
    ///
    /// * `canvas` - Offscreen surface with the drawn scene.
    /// * `letterbox` - Where in the window to draw it.
    /// * `use_shader` - Draw through the post-processing shader, or copy it as is.
    ///
    /// # Errors
    ///
    /// - When the next surface texture can't be acquired.
    pub(crate) fn render(
        &mut self,
        canvas: &Canvas,
        letterbox: &Letterbox,
        use_shader: bool,
    ) -> Result<()> {
        profiling::scope!("Render");

        // Copy the scene to the GPU
        self.render_target.upload(canvas, &self.gpu.queue);

        // Tell the shaders how big the letterbox is now
        let screen_info = ScreenInfo {
            output_size: [letterbox.dest.width, letterbox.dest.height],
            ..self.current_screen_info
        };
        if screen_info != self.current_screen_info {
            log::debug!(
                "Letterbox changed to ({}x{}) at ({}, {}) with scale {}",
                letterbox.dest.width,
                letterbox.dest.height,
                letterbox.dest.x,
                letterbox.dest.y,
                letterbox.scale
            );

            self.screen_info.write(&screen_info, &self.gpu.queue);
            self.current_screen_info = screen_info;
        }

        let Some(mut frame) = self.gpu.start()? else {
            return Ok(());
        };

        let pipeline = if use_shader {
            &self.shaded
        } else {
            &self.passthrough
        };
        pipeline.render(&mut frame, &self.screen_info, letterbox, self.viewport_color);

        frame.present();

        Ok(())
    }

    /// Resize the surface when the window size changed.
    pub(crate) fn resize(&mut self, screen_size: (u32, u32)) {
        if self.gpu.screen_size() != screen_size {
            self.gpu.resize(screen_size);
        }
    }
}
