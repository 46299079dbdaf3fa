/**
 * This module contains all logic for getting meshes and textures into (and
 * back out of) the viewer: the glTF importer, the mesh record / registry
 * lifecycle, texture decoding and the built-in primitive shapes.
 */
pub mod importer;
pub mod mesh;
pub mod primitives;
pub mod texture;

pub use importer::{import, ImportConfig, ImportError, Preset};
pub use mesh::{MeshHandle, MeshRecord, MeshRegistry, UploadError};
pub use texture::{Texture, TextureLoadError};
