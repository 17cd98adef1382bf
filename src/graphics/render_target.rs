//! Low-resolution texture the canvas is uploaded to before being upscaled.

use crate::canvas::Canvas;

/// Texture format of the offscreen surface.
///
/// We choose sRGB since colors are picked by eye, otherwise everything will be quite dark.
pub(crate) const RENDER_TARGET_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8UnormSrgb;

/// GPU side of the offscreen surface.
pub(crate) struct RenderTarget {
    /// Texture holding the pixels.
    texture: wgpu::Texture,
    /// View sampled by the post-processing pass.
    pub(crate) view: wgpu::TextureView,
    /// Reusable buffer for converting the canvas colors to bytes.
    staging: Vec<u8>,
}

impl RenderTarget {
    /// Allocate the texture.
    pub(crate) fn new(device: &wgpu::Device, width: u32, height: u32) -> Self {
        log::debug!("Creating offscreen render target of ({width}x{height})");

        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Offscreen Render Target"),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: RENDER_TARGET_FORMAT,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        let staging = Vec::with_capacity(width as usize * height as usize * 4);

        Self {
            texture,
            view,
            staging,
        }
    }

    /// Copy the pixels of the canvas to the texture.
    ///
    /// # Panics
    ///
    /// - When the canvas size doesn't match the texture size.
    pub(crate) fn upload(&mut self, canvas: &Canvas, queue: &wgpu::Queue) {
        profiling::scope!("Upload render target");

        let size = self.texture.size();
        assert_eq!(
            canvas.size(),
            (size.width, size.height),
            "Canvas size doesn't match the render target"
        );

        canvas.write_rgba(&mut self.staging);

        queue.write_texture(
            wgpu::ImageCopyTexture {
                texture: &self.texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            &self.staging,
            wgpu::ImageDataLayout {
                offset: 0,
                bytes_per_row: Some(size.width * 4),
                rows_per_image: Some(size.height),
            },
            size,
        );
    }
}
