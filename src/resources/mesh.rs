//! Mesh records and their GPU buffer lifecycle.
//!
//! A [`MeshRecord`] is the unit of renderable geometry: immutable CPU-side
//! vertex data set once at load, plus GPU buffers that exist only between
//! [`MeshRecord::upload`] and [`MeshRecord::release`]. The GPU side is a
//! single `Option` so the handles are either all absent or all valid; a
//! partially uploaded record cannot be represented.
//!
//! The [`MeshRegistry`] is the scene-wide ordered list of records that are
//! live for drawing. Insertion order is draw order. Clearing the registry
//! releases every GPU handle before the backing geometry is dropped.

use std::cell::RefCell;
use std::rc::Rc;

use thiserror::Error;
use wgpu::util::DeviceExt;

use crate::scene::material::MaterialHandle;

/// Shared handle to a mesh record. The record is owned by the scene node's
/// mesh component and referenced by the registry; GPU release is effective
/// exactly once regardless of which holder triggers it.
pub type MeshHandle = Rc<RefCell<MeshRecord>>;

#[derive(Debug, Error)]
pub enum UploadError {
    #[error("mesh {0:?} has no vertices")]
    NoVertices(String),
    #[error("mesh {0:?} has no indices")]
    NoIndices(String),
    #[error("mesh {name:?} index {index} out of range for {vertices} vertices")]
    IndexOutOfRange {
        name: String,
        index: u32,
        vertices: usize,
    },
}

pub trait Vertex {
    fn desc() -> wgpu::VertexBufferLayout<'static>;
}

/// Interleaved vertex layout consumed by the viewer pipeline.
#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MeshVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

impl Vertex for MeshVertex {
    fn desc() -> wgpu::VertexBufferLayout<'static> {
        use std::mem;
        wgpu::VertexBufferLayout {
            array_stride: mem::size_of::<MeshVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 6]>() as wgpu::BufferAddress,
                    shader_location: 2,
                    format: wgpu::VertexFormat::Float32x2,
                },
            ],
        }
    }
}

/// GPU buffers backing an uploaded mesh record.
#[derive(Debug)]
pub struct MeshGpu {
    pub vertex_buffer: wgpu::Buffer,
    pub index_buffer: wgpu::Buffer,
    pub index_count: u32,
}

#[derive(Debug)]
pub struct MeshRecord {
    name: String,
    positions: Vec<[f32; 3]>,
    normals: Option<Vec<[f32; 3]>>,
    uvs: Option<Vec<[f32; 2]>>,
    indices: Vec<u32>,
    gpu: Option<MeshGpu>,
    // tracks the one-time "drawing an unuploaded mesh" warning
    draw_warned: bool,
}

impl MeshRecord {
    pub fn new(
        name: impl Into<String>,
        positions: Vec<[f32; 3]>,
        normals: Option<Vec<[f32; 3]>>,
        uvs: Option<Vec<[f32; 2]>>,
        indices: Vec<u32>,
    ) -> Self {
        Self {
            name: name.into(),
            positions,
            normals,
            uvs,
            indices,
            gpu: None,
            draw_warned: false,
        }
    }

    pub fn into_handle(self) -> MeshHandle {
        Rc::new(RefCell::new(self))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn index_count(&self) -> usize {
        self.indices.len()
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    pub fn positions(&self) -> &[[f32; 3]] {
        &self.positions
    }

    pub fn normals(&self) -> Option<&[[f32; 3]]> {
        self.normals.as_deref()
    }

    pub fn uvs(&self) -> Option<&[[f32; 2]]> {
        self.uvs.as_deref()
    }

    pub fn is_uploaded(&self) -> bool {
        self.gpu.is_some()
    }

    pub fn gpu(&self) -> Option<&MeshGpu> {
        self.gpu.as_ref()
    }

    /// Interleave positions, normals and texture coordinates into the vertex
    /// layout the pipeline expects. Missing normals default to +Y, missing
    /// texture coordinates to (0, 0).
    fn interleave(&self) -> Vec<MeshVertex> {
        (0..self.positions.len())
            .map(|i| MeshVertex {
                position: self.positions[i],
                normal: self
                    .normals
                    .as_ref()
                    .and_then(|n| n.get(i).copied())
                    .unwrap_or([0.0, 1.0, 0.0]),
                uv: self
                    .uvs
                    .as_ref()
                    .and_then(|uv| uv.get(i).copied())
                    .unwrap_or([0.0, 0.0]),
            })
            .collect()
    }

    /// Allocate GPU buffers and copy the geometry into them.
    ///
    /// Uploading an already-uploaded record keeps the existing buffers and
    /// only logs a warning; the stored handles never change under a caller's
    /// feet.
    pub fn upload(&mut self, device: &wgpu::Device) -> Result<(), UploadError> {
        if self.gpu.is_some() {
            log::warn!(
                "mesh {:?} is already uploaded, keeping existing buffers",
                self.name
            );
            return Ok(());
        }
        if self.positions.is_empty() {
            return Err(UploadError::NoVertices(self.name.clone()));
        }
        if self.indices.is_empty() {
            return Err(UploadError::NoIndices(self.name.clone()));
        }
        if let Some(&bad) = self
            .indices
            .iter()
            .find(|&&i| i as usize >= self.positions.len())
        {
            return Err(UploadError::IndexOutOfRange {
                name: self.name.clone(),
                index: bad,
                vertices: self.positions.len(),
            });
        }

        let vertices = self.interleave();
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{:?} Vertex Buffer", self.name)),
            contents: bytemuck::cast_slice(&vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{:?} Index Buffer", self.name)),
            contents: bytemuck::cast_slice(&self.indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        self.gpu = Some(MeshGpu {
            vertex_buffer,
            index_buffer,
            index_count: self.indices.len() as u32,
        });
        Ok(())
    }

    /// Issue an indexed triangle-list draw for this record.
    ///
    /// Returns `false` without drawing when the record is not uploaded; the
    /// violation is logged once per record, never a panic.
    pub fn draw(&mut self, render_pass: &mut wgpu::RenderPass<'_>) -> bool {
        let Some(gpu) = &self.gpu else {
            if !self.draw_warned {
                log::warn!("attempted to draw mesh {:?} before upload, skipping", self.name);
                self.draw_warned = true;
            }
            return false;
        };
        render_pass.set_vertex_buffer(0, gpu.vertex_buffer.slice(..));
        render_pass.set_index_buffer(gpu.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        render_pass.draw_indexed(0..gpu.index_count, 0, 0..1);
        true
    }

    /// Destroy the GPU buffers and return to the not-uploaded state.
    ///
    /// Must run before the record (and its backing geometry) goes away.
    /// Releasing a record that was never uploaded is a no-op, so release is
    /// effective exactly once per upload.
    pub fn release(&mut self) {
        if let Some(gpu) = self.gpu.take() {
            gpu.vertex_buffer.destroy();
            gpu.index_buffer.destroy();
        }
    }
}

/// One registry slot: a live mesh record and, when the importer attached
/// one, the material to bind while drawing it.
#[derive(Clone)]
pub struct RegistryEntry {
    pub mesh: MeshHandle,
    pub material: Option<MaterialHandle>,
}

/// Scene-wide ordered list of mesh records that are live for drawing.
#[derive(Default)]
pub struct MeshRegistry {
    entries: Vec<RegistryEntry>,
}

impl MeshRegistry {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub fn register(&mut self, mesh: MeshHandle, material: Option<MaterialHandle>) {
        self.entries.push(RegistryEntry { mesh, material });
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[RegistryEntry] {
        &self.entries
    }

    /// Release the GPU handles of every entry, then drop the entries.
    /// GPU objects always go before the backing geometry memory.
    pub fn clear(&mut self) {
        for entry in &self.entries {
            entry.mesh.borrow_mut().release();
            if let Some(material) = &entry.material {
                material.borrow_mut().release_gpu();
            }
        }
        self.entries.clear();
    }
}
