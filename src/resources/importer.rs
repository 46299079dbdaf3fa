//! Model import: glTF scene graph to [`GameObject`] tree.
//!
//! The importer is CPU-only; it builds the node tree with mesh, material and
//! transform components attached, and a later upload pass creates the GPU
//! resources. Import runs synchronously to completion; a failure returns an
//! error and no partial tree escapes.

use std::path::{Path, PathBuf};

use cgmath::Vector3;
use gltf::Gltf;
use thiserror::Error;

use crate::console::Console;
use crate::resources::mesh::MeshRecord;
use crate::resources::texture::Texture;
use crate::scene::component::{ComponentKind, Transform};
use crate::scene::material::EMBEDDED_TEXTURE_PATH;
use crate::scene::node::GameObject;

/// Placeholder name for external nodes that carry no name.
pub const UNNAMED: &str = "Unnamed";

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("could not read model file: {0}")]
    Io(#[from] std::io::Error),
    #[error("could not parse model file: {0}")]
    Parse(#[from] gltf::Error),
    #[error("model contains no meshes")]
    NoMeshes,
}

/// Import quality/axis presets, passed through opaquely by callers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Preset {
    /// Realtime max quality: geometry is taken as authored.
    #[default]
    Realtime,
    /// Convert handedness: mirror the Z axis and flip triangle winding.
    LeftHanded,
}

#[derive(Clone, Copy, Debug)]
pub struct ImportConfig {
    pub preset: Preset,
    /// Uniform factor applied to vertex positions and node translations.
    /// Source assets are commonly authored in centimeters at FBX-era scales;
    /// 0.005 brings them into the viewer's working range.
    pub unit_scale: f32,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            preset: Preset::Realtime,
            unit_scale: 0.005,
        }
    }
}

/// Resolve a texture/buffer URI stored in a model file. A bare file name
/// (no directory separator) is looked up next to the model file itself;
/// anything carrying a directory is kept as stored.
pub fn resolve_asset_path(model_path: &Path, uri: &str) -> PathBuf {
    if uri.contains('/') || uri.contains('\\') {
        return PathBuf::from(uri);
    }
    match model_path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir.join(uri),
        _ => PathBuf::from(uri),
    }
}

/// Convert the model file at `path` into a scene-node tree.
///
/// Fails when the file cannot be read or parsed, or when no mesh is
/// reachable from the document's scene roots. Texture problems are not
/// fatal: they are reported to the console and the affected node keeps the
/// default checkerboard.
pub fn import(
    path: &Path,
    config: &ImportConfig,
    console: &mut Console,
) -> Result<GameObject, ImportError> {
    log::debug!("importing {:?} with preset {:?}", path, config.preset);

    let bytes = std::fs::read(path)?;
    let gltf = Gltf::from_slice(&bytes)?;

    // Buffer payloads: GLB blob or sibling .bin files.
    let mut buffer_data: Vec<Vec<u8>> = Vec::new();
    for buffer in gltf.buffers() {
        match buffer.source() {
            gltf::buffer::Source::Bin => {
                if let Some(blob) = gltf.blob.as_deref() {
                    buffer_data.push(blob.to_vec());
                }
            }
            gltf::buffer::Source::Uri(uri) => {
                let bin = std::fs::read(resolve_asset_path(path, uri))?;
                buffer_data.push(bin);
            }
        }
    }

    let Some(scene) = gltf.default_scene().or_else(|| gltf.scenes().next()) else {
        return Err(ImportError::NoMeshes);
    };

    let mut mesh_count = 0usize;
    let mut roots = Vec::new();
    for node in scene.nodes() {
        roots.push(convert_node(
            &node,
            &buffer_data,
            path,
            config,
            &mut mesh_count,
            console,
        ));
    }

    if mesh_count == 0 {
        return Err(ImportError::NoMeshes);
    }

    // A single scene root becomes the returned node; multiple roots get
    // wrapped in a container named after the file.
    if roots.len() == 1 {
        return Ok(roots.remove(0));
    }
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(UNNAMED);
    let container = GameObject::new(stem);
    container.create_component(ComponentKind::Transform);
    for child in &roots {
        if let Err(e) = container.add_child(child) {
            log::warn!("dropping scene root {:?}: {}", child.name(), e);
        }
    }
    Ok(container)
}

fn convert_node(
    node: &gltf::Node,
    buffers: &[Vec<u8>],
    model_path: &Path,
    config: &ImportConfig,
    mesh_count: &mut usize,
    console: &mut Console,
) -> GameObject {
    let name = match node.name() {
        Some(n) if !n.is_empty() => n.to_string(),
        _ => UNNAMED.to_string(),
    };
    let object = GameObject::new(&name);

    // The decomposed rotation is discarded: imported nodes always start at
    // the identity orientation, countering rotations baked into the asset.
    let (translation, _rotation, scale) = node.transform().decomposed();
    let mut transform = Transform::new();
    transform.position = Vector3::from(translation) * config.unit_scale;
    transform.scale = Vector3::from(scale);
    if config.preset == Preset::LeftHanded {
        transform.position.z = -transform.position.z;
    }
    object.create_component(ComponentKind::Transform);
    object.set_transform(transform);

    if let Some(mesh) = node.mesh() {
        for (index, primitive) in mesh.primitives().enumerate() {
            let Some(record) = convert_primitive(&name, index, &primitive, buffers, config) else {
                log::warn!("primitive {} of node {:?} has no positions, skipping", index, name);
                continue;
            };
            // One mesh component per node: the first primitive lands on the
            // node itself, the rest on generated child nodes.
            let target = if index == 0 {
                object.clone()
            } else {
                let child = GameObject::new(&format!("{}.{}", name, index));
                child.create_component(ComponentKind::Transform);
                if let Err(e) = object.add_child(&child) {
                    log::warn!("could not attach generated node {:?}: {}", child.name(), e);
                    continue;
                }
                child
            };
            if !target.attach_mesh(record.into_handle()) {
                continue;
            }
            *mesh_count += 1;
            attach_material(&target, &primitive, buffers, model_path, console);
        }
    }

    for child in node.children() {
        let imported = convert_node(&child, buffers, model_path, config, mesh_count, console);
        if let Err(e) = object.add_child(&imported) {
            // a failed child is omitted; its siblings still import
            log::warn!("dropping child {:?} of {:?}: {}", imported.name(), name, e);
        }
    }

    object
}

fn convert_primitive(
    node_name: &str,
    index: usize,
    primitive: &gltf::Primitive,
    buffers: &[Vec<u8>],
    config: &ImportConfig,
) -> Option<MeshRecord> {
    let left_handed = config.preset == Preset::LeftHanded;
    let reader = primitive.reader(|buffer| buffers.get(buffer.index()).map(Vec::as_slice));

    let mut positions: Vec<[f32; 3]> = reader.read_positions()?.collect();
    for p in positions.iter_mut() {
        p[0] *= config.unit_scale;
        p[1] *= config.unit_scale;
        p[2] *= config.unit_scale;
        if left_handed {
            p[2] = -p[2];
        }
    }

    let normals = reader.read_normals().map(|iter| {
        iter.map(|mut n| {
            if left_handed {
                n[2] = -n[2];
            }
            n
        })
        .collect::<Vec<_>>()
    });
    let uvs = reader
        .read_tex_coords(0)
        .map(|tc| tc.into_f32().collect::<Vec<_>>());

    let mut indices: Vec<u32> = match reader.read_indices() {
        Some(raw) => raw.into_u32().collect(),
        None => (0..positions.len() as u32).collect(),
    };
    if left_handed {
        for tri in indices.chunks_exact_mut(3) {
            tri.swap(1, 2);
        }
    }

    Some(MeshRecord::new(
        format!("{}.{}", node_name, index),
        positions,
        normals,
        uvs,
        indices,
    ))
}

/// Wire up the primitive's diffuse texture, when it has one. Load failures
/// are reported and leave the node's material on its default texture.
fn attach_material(
    target: &GameObject,
    primitive: &gltf::Primitive,
    buffers: &[Vec<u8>],
    model_path: &Path,
    console: &mut Console,
) {
    let material = primitive.material();
    let Some(info) = material.pbr_metallic_roughness().base_color_texture() else {
        return;
    };
    match info.texture().source().source() {
        gltf::image::Source::Uri { uri, .. } => {
            let resolved = resolve_asset_path(model_path, uri);
            let component = target.ensure_material();
            component
                .borrow_mut()
                .load_texture(&resolved.to_string_lossy(), console);
        }
        gltf::image::Source::View { view, .. } => {
            let start = view.offset();
            let end = start + view.length();
            let bytes = buffers
                .get(view.buffer().index())
                .and_then(|b| b.get(start..end));
            let Some(bytes) = bytes else {
                console.log("Failed to load embedded texture");
                return;
            };
            match Texture::from_bytes(bytes) {
                Ok(texture) => {
                    let component = target.ensure_material();
                    component
                        .borrow_mut()
                        .adopt_texture(texture, EMBEDDED_TEXTURE_PATH);
                }
                Err(e) => {
                    log::warn!("embedded texture decode failed: {}", e);
                    console.log(format!("Failed to load embedded texture: {}", e));
                }
            }
        }
    }
}
