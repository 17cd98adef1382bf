//! State for the post-processing pass upscaling the offscreen surface to the window.

use std::borrow::Cow;

use bytemuck::NoUninit;

use super::{gpu::Frame, uniform::UniformState};
use crate::letterbox::Letterbox;

/// Pipeline drawing a source texture into the letterboxed area of the window through a shader.
pub(crate) struct PostProcessingState {
    bind_group: wgpu::BindGroup,
    render_pipeline: wgpu::RenderPipeline,
}

impl PostProcessingState {
    /// Upload a new post processing effect.
    ///
    /// # Arguments
    ///
    /// * `source` - Texture view sampled by the shader as `source`.
    /// * `uniform` - Uniform bound as `screen`.
    /// * `shader` - Complete WGSL program with `vs_main` and `fs_main` entry points.
    /// * `target_format` - Texture format of the window surface.
    /// * `label` - Name to show in GPU debuggers.
    pub(crate) fn new<T: NoUninit>(
        device: &wgpu::Device,
        source: &wgpu::TextureView,
        uniform: &UniformState<T>,
        shader: &str,
        target_format: wgpu::TextureFormat,
        label: &str,
    ) -> Self {
        log::debug!("Creating post processing pipeline '{label}'");

        // Create the bind group layout for the texture before it has been upscaled
        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Post Processing Bind Group Layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        // Sample with nearest neighbor so the pixels stay crisp
        let input_sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("Post Processing Input Sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Nearest,
            min_filter: wgpu::FilterMode::Nearest,
            mipmap_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        // Create the bind group binding the layout with the texture view
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Post Processing Bind Group"),
            layout: &bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(source),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&input_sampler),
                },
            ],
        });

        let render_pipeline_layout =
            device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("Post Processing Render Pipeline Layout"),
                bind_group_layouts: &[&bind_group_layout, &uniform.bind_group_layout],
                push_constant_ranges: &[],
            });

        // Load the shader
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(label),
            source: wgpu::ShaderSource::Wgsl(Cow::Borrowed(shader)),
        });

        let render_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some(label),
            layout: Some(&render_pipeline_layout),
            vertex: wgpu::VertexState {
                buffers: &[],
                module: &shader,
                entry_point: "vs_main",
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: "fs_main",
                targets: &[Some(wgpu::ColorTargetState {
                    format: target_format,
                    blend: Some(wgpu::BlendState {
                        color: wgpu::BlendComponent::REPLACE,
                        alpha: wgpu::BlendComponent::REPLACE,
                    }),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            primitive: wgpu::PrimitiveState::default(),
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
        });

        Self {
            bind_group,
            render_pipeline,
        }
    }

    /// Clear the window with the viewport color and draw the source texture inside the letterbox.
    pub(crate) fn render<T: NoUninit>(
        &self,
        frame: &mut Frame,
        uniform: &UniformState<T>,
        letterbox: &Letterbox,
        viewport_color: wgpu::Color,
    ) {
        profiling::scope!("Post processing pass");

        let mut upscaled_render_pass =
            frame
                .encoder
                .begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("Post Processing Render Pass"),
                    color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                        view: &frame.surface_view,
                        resolve_target: None,
                        ops: wgpu::Operations {
                            load: wgpu::LoadOp::Clear(viewport_color),
                            store: wgpu::StoreOp::Store,
                        },
                    })],
                    depth_stencil_attachment: None,
                    timestamp_writes: None,
                    occlusion_query_set: None,
                });

        // Nothing fits, only show the viewport color
        if letterbox.is_empty() {
            return;
        }

        upscaled_render_pass.set_pipeline(&self.render_pipeline);

        // Only draw in the calculated letterbox, everything outside keeps the viewport color
        let dest = letterbox.dest;
        upscaled_render_pass.set_viewport(dest.x, dest.y, dest.width, dest.height, 0.0, 1.0);

        // Bind the source texture
        upscaled_render_pass.set_bind_group(0, &self.bind_group, &[]);

        // Bind the screen info uniform
        upscaled_render_pass.set_bind_group(1, &uniform.bind_group, &[]);

        // Draw the triangle defined in the vertex shader
        upscaled_render_pass.draw(0..3, 0..1);
    }
}
