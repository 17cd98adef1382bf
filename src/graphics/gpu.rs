//! Abstractions over GPU calls which can be profiled.

use miette::{Context, IntoDiagnostic, Result};

/// GPU state abstracted so GPU calls can be profiled if the feature flags are enabled.
pub(crate) struct Gpu<'window> {
    /// GPU device.
    pub(crate) device: wgpu::Device,
    /// GPU queue.
    pub(crate) queue: wgpu::Queue,
    /// GPU surface.
    surface: wgpu::Surface<'window>,
    /// GPU surface configuration.
    config: wgpu::SurfaceConfiguration,
}

impl<'window> Gpu<'window> {
    /// Create a GPU surface on the window.
    ///
    /// # Arguments
    ///
    /// * `window` - Window to draw on.
    /// * `screen_size` - Initial size of the drawable part of the window.
    /// * `vsync` - Whether presenting a frame waits for the vertical blank.
    pub(crate) async fn new<W>(window: W, screen_size: (u32, u32), vsync: bool) -> Result<Self>
    where
        W: wgpu::WindowHandle + 'window,
    {
        // Get a handle to our GPU
        let instance = wgpu::Instance::default();

        log::debug!("Creating GPU surface on the window");

        // Create a GPU surface on the window
        let surface = instance
            .create_surface(window)
            .into_diagnostic()
            .wrap_err("Error creating surface on window")?;

        log::debug!("Requesting adapter");

        // Request an adapter
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptionsBase {
                // The scene is tiny, don't wake up a discrete GPU for it
                power_preference: wgpu::PowerPreference::LowPower,
                force_fallback_adapter: false,
                // Request an adaptar which can render to our surface
                compatible_surface: Some(&surface),
            })
            .await
            .ok_or_else(|| miette::miette!("Error getting GPU adapter for window"))?;

        log::debug!("Using GPU adapter '{}'", adapter.get_info().name);

        // Get the surface capabilities
        let swapchain_capabilities = surface.get_capabilities(&adapter);

        // Prefer an sRGB surface so colors are converted automatically
        let format = swapchain_capabilities
            .formats
            .iter()
            .copied()
            .find(wgpu::TextureFormat::is_srgb)
            .or_else(|| swapchain_capabilities.formats.first().copied())
            .ok_or_else(|| miette::miette!("Window surface doesn't support any texture format"))?;

        // Create the logical device and command queue
        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: None,
                    required_features: wgpu::Features::empty(),
                    // Use the lowest limits so the game runs on old hardware too
                    required_limits: wgpu::Limits::downlevel_webgl2_defaults()
                        .using_resolution(adapter.limits()),
                },
                None,
            )
            .await
            .into_diagnostic()
            .wrap_err("Error getting logical GPU device for surface")?;

        // Configure the render surface
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            // Ensure that the render surface is at least 1 pixel big, otherwise an error would occur
            width: screen_size.0.max(1),
            height: screen_size.1.max(1),
            present_mode: if vsync {
                wgpu::PresentMode::AutoVsync
            } else {
                wgpu::PresentMode::AutoNoVsync
            },
            desired_maximum_frame_latency: 2,
            alpha_mode: swapchain_capabilities
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
        };
        surface.configure(&device, &config);

        Ok(Self {
            device,
            queue,
            surface,
            config,
        })
    }

    /// Start a new rendering event.
    ///
    /// # Returns
    ///
    /// - `None` when this frame must be skipped, the surface is reconfigured if needed.
    ///
    /// # Errors
    ///
    /// - When the GPU ran out of memory.
    #[inline]
    pub(crate) fn start(&mut self) -> Result<Option<Frame<'_>>> {
        profiling::scope!("Create command encoder");

        // Get the main render texture
        let surface_texture = {
            profiling::scope!("Retrieve surface texture");

            match self.surface.get_current_texture() {
                Ok(surface_texture) => surface_texture,
                Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                    log::debug!("Surface lost or outdated, reconfiguring");
                    self.surface.configure(&self.device, &self.config);

                    return Ok(None);
                }
                Err(wgpu::SurfaceError::Timeout) => {
                    log::warn!("Timeout acquiring the next surface texture, skipping frame");

                    return Ok(None);
                }
                Err(err) => {
                    return Err(err)
                        .into_diagnostic()
                        .wrap_err("Error acquiring next swap chain texture");
                }
            }
        };

        // Create the encoder
        let encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Letterbox Command Encoder"),
            });

        // Create a texture view from the main render texture
        let surface_view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        Ok(Some(Frame {
            encoder,
            surface_view,
            surface_texture,
            queue: &self.queue,
        }))
    }

    /// Resize the surface.
    pub(crate) fn resize(&mut self, screen_size: (u32, u32)) {
        log::debug!(
            "Resizing the surface to ({}x{})",
            screen_size.0,
            screen_size.1
        );

        // Ensure that the render surface is at least 1 pixel big, otherwise an error would occur
        self.config.width = screen_size.0.max(1);
        self.config.height = screen_size.1.max(1);
        self.surface.configure(&self.device, &self.config);
    }

    /// Size of the surface in pixels.
    #[inline]
    pub(crate) const fn screen_size(&self) -> (u32, u32) {
        (self.config.width, self.config.height)
    }

    /// Texture format of the surface.
    #[inline]
    pub(crate) const fn surface_format(&self) -> wgpu::TextureFormat {
        self.config.format
    }
}

/// Rendering state for a single frame.
pub(crate) struct Frame<'gpu> {
    /// GPU command encoder.
    pub(crate) encoder: wgpu::CommandEncoder,
    /// GPU surface view.
    pub(crate) surface_view: wgpu::TextureView,
    /// GPU surface texture.
    surface_texture: wgpu::SurfaceTexture,
    /// GPU queue.
    queue: &'gpu wgpu::Queue,
}

impl<'gpu> Frame<'gpu> {
    /// Finish rendering event.
    #[inline]
    pub(crate) fn present(self) {
        // Draw to the texture
        {
            profiling::scope!("Submit queue");

            self.queue.submit(Some(self.encoder.finish()));
        }

        // Show the texture in the window
        {
            profiling::scope!("Present surface texture");

            self.surface_texture.present();
        }
    }
}
