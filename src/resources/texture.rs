//! Texture decoding and GPU texture resources.
//!
//! A [`Texture`] keeps its decoded RGBA pixels on the CPU side and an
//! optional set of GPU objects created on upload. The GPU side is either
//! fully absent (not uploaded) or fully present; release tears it down
//! exactly once and returns the texture to the not-uploaded state.

use image::GenericImageView;
use thiserror::Error;

/// Side length of the generated checkerboard fallback texture.
const CHECKERS_SIZE: u32 = 64;

/// Standard depth buffer texture format (32-bit float).
pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

#[derive(Debug, Error)]
pub enum TextureLoadError {
    #[error("could not read texture file: {0}")]
    Io(#[from] std::io::Error),
    #[error("could not decode texture: {0}")]
    Decode(#[from] image::ImageError),
}

/// GPU objects backing an uploaded texture.
#[derive(Debug)]
pub struct TextureGpu {
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
    pub sampler: wgpu::Sampler,
    pub bind_group: wgpu::BindGroup,
}

/// A decoded RGBA image plus its optional GPU-side objects.
#[derive(Debug)]
pub struct Texture {
    rgba: Vec<u8>,
    width: u32,
    height: u32,
    gpu: Option<TextureGpu>,
}

impl Texture {
    /// Load and decode an image file from disk.
    pub fn load(path: &str) -> Result<Self, TextureLoadError> {
        let bytes = std::fs::read(path)?;
        Self::from_bytes(&bytes)
    }

    /// Decode an image from raw file bytes (PNG, JPEG, ...).
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, TextureLoadError> {
        let img = image::load_from_memory(bytes)?;
        let (width, height) = img.dimensions();
        Ok(Self {
            rgba: img.to_rgba8().into_raw(),
            width,
            height,
            gpu: None,
        })
    }

    /// Generate the black-and-white checkerboard used as the default
    /// material texture: 8-pixel squares over a 64x64 image.
    pub fn checkerboard() -> Self {
        let mut rgba = Vec::with_capacity((CHECKERS_SIZE * CHECKERS_SIZE * 4) as usize);
        for i in 0..CHECKERS_SIZE {
            for j in 0..CHECKERS_SIZE {
                let c = if ((i & 0x8) == 0) ^ ((j & 0x8) == 0) {
                    255
                } else {
                    0
                };
                rgba.extend_from_slice(&[c, c, c, 255]);
            }
        }
        Self {
            rgba,
            width: CHECKERS_SIZE,
            height: CHECKERS_SIZE,
            gpu: None,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn is_uploaded(&self) -> bool {
        self.gpu.is_some()
    }

    pub fn bind_group(&self) -> Option<&wgpu::BindGroup> {
        self.gpu.as_ref().map(|gpu| &gpu.bind_group)
    }

    /// Create the GPU texture, copy the pixels and build the bind group.
    ///
    /// Uploading an already-uploaded texture keeps the existing GPU objects
    /// and only logs a warning.
    pub fn upload(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        layout: &wgpu::BindGroupLayout,
        label: &str,
    ) {
        if self.gpu.is_some() {
            log::warn!(
                "texture {:?} is already uploaded, keeping existing GPU objects",
                label
            );
            return;
        }

        let size = wgpu::Extent3d {
            width: self.width,
            height: self.height,
            depth_or_array_layers: 1,
        };
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                aspect: wgpu::TextureAspect::All,
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
            },
            &self.rgba,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(4 * self.width),
                rows_per_image: Some(self.height),
            },
            size,
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            address_mode_u: wgpu::AddressMode::Repeat,
            address_mode_v: wgpu::AddressMode::Repeat,
            address_mode_w: wgpu::AddressMode::Repeat,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::MipmapFilterMode::Linear,
            ..Default::default()
        });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(label),
            layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&sampler),
                },
            ],
        });

        self.gpu = Some(TextureGpu {
            texture,
            view,
            sampler,
            bind_group,
        });
    }

    /// Destroy the GPU objects and return to the not-uploaded state.
    /// Releasing a texture that was never uploaded is a no-op.
    pub fn release(&mut self) {
        if let Some(gpu) = self.gpu.take() {
            gpu.texture.destroy();
        }
    }
}

/// The bind group layout shared by every material texture.
pub fn material_bind_group_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("material_bind_group_layout"),
        entries: &[
            wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Texture {
                    multisampled: false,
                    view_dimension: wgpu::TextureViewDimension::D2,
                    sample_type: wgpu::TextureSampleType::Float { filterable: true },
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
    })
}

/// Depth attachment used by the main render pass.
#[derive(Debug)]
pub struct DepthTexture {
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
}

impl DepthTexture {
    pub fn create(device: &wgpu::Device, size: [u32; 2], label: &str) -> Self {
        let size = wgpu::Extent3d {
            width: size[0].max(1),
            height: size[1].max(1),
            depth_or_array_layers: 1,
        };
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
            view_formats: &[DEPTH_FORMAT],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        Self { texture, view }
    }
}
