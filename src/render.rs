//! The per-frame render pass over the mesh registry.
//!
//! The renderer clears the frame, binds the camera and the active material,
//! then walks the registry in insertion order and draws every uploaded
//! record. An empty registry draws a single built-in pyramid instead, so the
//! viewport is never blank while nothing is loaded.

use crate::console::Console;
use crate::context::Context;
use crate::resources::mesh::MeshRecord;
use crate::resources::{primitives, texture};
use crate::scene::material::Material;
use crate::scene::scene::Scene;

/// What a frame actually drew; used by callers and tests to observe the
/// registry/fallback split.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub registry_draws: u32,
    pub fallback_draws: u32,
    pub skipped: u32,
}

pub struct Renderer {
    pipeline: wgpu::RenderPipeline,
    material_layout: wgpu::BindGroupLayout,
    default_material: Material,
    fallback: MeshRecord,
    clear_colour: wgpu::Color,
}

impl Renderer {
    pub fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        config: &wgpu::SurfaceConfiguration,
        camera_bind_group_layout: &wgpu::BindGroupLayout,
    ) -> Self {
        let material_layout = texture::material_bind_group_layout(device);
        let pipeline = crate::pipelines::mk_viewer_pipeline(
            device,
            config,
            camera_bind_group_layout,
            &material_layout,
        );

        let mut default_material = Material::new();
        default_material.upload(device, queue, &material_layout);

        let mut fallback = primitives::pyramid();
        if let Err(e) = fallback.upload(device) {
            log::error!("could not upload fallback primitive: {}", e);
        }

        Self {
            pipeline,
            material_layout,
            default_material,
            fallback,
            clear_colour: wgpu::Color {
                r: 0.08,
                g: 0.08,
                b: 0.1,
                a: 1.0,
            },
        }
    }

    /// Layout shared by every material texture bind group.
    pub fn material_layout(&self) -> &wgpu::BindGroupLayout {
        &self.material_layout
    }

    pub fn default_material(&self) -> &Material {
        &self.default_material
    }

    /// Load a dropped texture into the active default material (used when no
    /// model is loaded).
    pub fn apply_texture_to_default(
        &mut self,
        path: &str,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        console: &mut Console,
    ) -> bool {
        if self.default_material.load_texture(path, console) {
            self.default_material
                .upload(device, queue, &self.material_layout);
            true
        } else {
            false
        }
    }

    /// Record and submit one frame into `color_view`/`depth_view`.
    pub fn render(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        color_view: &wgpu::TextureView,
        depth_view: &wgpu::TextureView,
        camera_bind_group: &wgpu::BindGroup,
        scene: &Scene,
    ) -> FrameStats {
        let mut stats = FrameStats::default();

        let Some(default_bind_group) = self.default_material.bind_group() else {
            // without the default material there is nothing valid to bind
            log::error!("default material has no GPU resources, skipping frame");
            return stats;
        };

        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Render Encoder"),
        });
        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: color_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.clear_colour),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
                multiview_mask: None,
            });

            render_pass.set_pipeline(&self.pipeline);
            render_pass.set_bind_group(0, camera_bind_group, &[]);
            render_pass.set_bind_group(1, &default_bind_group, &[]);

            if scene.registry().is_empty() {
                if self.fallback.draw(&mut render_pass) {
                    stats.fallback_draws += 1;
                }
            } else {
                for entry in scene.registry().entries() {
                    let material_bind_group = entry
                        .material
                        .as_ref()
                        .and_then(|material| material.borrow().bind_group());
                    match &material_bind_group {
                        Some(bind_group) => render_pass.set_bind_group(1, bind_group, &[]),
                        None => render_pass.set_bind_group(1, &default_bind_group, &[]),
                    }
                    if entry.mesh.borrow_mut().draw(&mut render_pass) {
                        stats.registry_draws += 1;
                    } else {
                        stats.skipped += 1;
                    }
                }
            }
        }
        queue.submit(std::iter::once(encoder.finish()));

        stats
    }

    /// Acquire the surface frame, render into it and present.
    pub fn render_to_surface(
        &mut self,
        ctx: &Context,
        scene: &Scene,
    ) -> Result<FrameStats, wgpu::SurfaceError> {
        let output = ctx.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let stats = self.render(
            &ctx.device,
            &ctx.queue,
            &view,
            &ctx.depth_texture.view,
            &ctx.camera.bind_group,
            scene,
        );
        output.present();
        Ok(stats)
    }

    /// Release the GPU resources the renderer itself owns.
    pub fn release_gpu_resources(&mut self) {
        self.fallback.release();
        self.default_material.release_gpu();
    }
}
