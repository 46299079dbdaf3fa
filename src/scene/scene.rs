//! The scene: one root node, the mesh registry, and the load/replace cycle.

use std::path::Path;

use cgmath::{Matrix4, SquareMatrix};

use crate::console::Console;
use crate::resources::importer::{self, ImportConfig, ImportError};
use crate::resources::mesh::MeshRegistry;
use crate::scene::node::GameObject;

pub struct Scene {
    root: GameObject,
    registry: MeshRegistry,
    // the subtree created by the last successful import, if any
    model_root: Option<GameObject>,
}

impl Scene {
    pub fn new() -> Self {
        Self {
            root: GameObject::new("Root"),
            registry: MeshRegistry::new(),
            model_root: None,
        }
    }

    pub fn root(&self) -> &GameObject {
        &self.root
    }

    pub fn registry(&self) -> &MeshRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut MeshRegistry {
        &mut self.registry
    }

    pub fn model_root(&self) -> Option<GameObject> {
        self.model_root.clone()
    }

    /// Create an empty node attached directly under the root and hand back
    /// its handle for further configuration.
    pub fn create_game_object(&mut self, name: &str) -> GameObject {
        let object = GameObject::new(name);
        if let Err(e) = self.root.add_child(&object) {
            log::error!("could not attach {:?} under the scene root: {}", name, e);
        }
        object
    }

    /// Per-frame update entry point: one recursive pass from the root.
    pub fn update(&mut self) {
        self.root.update(Matrix4::identity());
    }

    /// Import a model and make it the scene's current model.
    ///
    /// Runs synchronously to completion. The previously loaded model is only
    /// torn down once the import has succeeded, so a failed import leaves
    /// the scene exactly as it was. Teardown releases GPU handles before the
    /// replaced subtree's memory goes away.
    pub fn load_model(
        &mut self,
        path: &Path,
        config: &ImportConfig,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        material_layout: &wgpu::BindGroupLayout,
        console: &mut Console,
    ) -> Result<(), ImportError> {
        let model = importer::import(path, config, console)?;

        self.clear_model();
        if let Err(e) = self.root.add_child(&model) {
            log::error!("could not adopt imported model: {}", e);
        }

        let mut uploaded = 0usize;
        let registry = &mut self.registry;
        model.visit(&mut |node| {
            let material = node.material();
            if let Some(material) = &material {
                material.borrow_mut().upload(device, queue, material_layout);
            }
            if let Some(mesh) = node.mesh() {
                let result = mesh.borrow_mut().upload(device);
                match result {
                    Ok(()) => {
                        registry.register(mesh.clone(), material.clone());
                        uploaded += 1;
                    }
                    Err(e) => {
                        log::error!("mesh upload failed: {}", e);
                        console.log(format!("Failed to upload mesh: {}", e));
                    }
                }
            }
        });

        log::debug!("imported hierarchy:\n{}", model.describe());
        console.log(format!(
            "Model loaded: {} ({} meshes)",
            path.display(),
            uploaded
        ));
        self.model_root = Some(model);
        Ok(())
    }

    /// Drop the current model and every registry entry, releasing all GPU
    /// resources first.
    pub fn clear(&mut self, console: &mut Console) {
        self.clear_model();
        console.log("Scene cleared");
    }

    fn clear_model(&mut self) {
        if let Some(old) = self.model_root.take() {
            old.release_gpu_resources();
            self.root.remove_child(&old);
        }
        self.registry.clear();
    }

    /// Load a dropped texture into every material referenced by the
    /// registry. Returns how many materials it reached; with no model loaded
    /// that is zero and the caller applies the texture to the renderer's
    /// default material instead.
    pub fn apply_texture(
        &mut self,
        path: &str,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        material_layout: &wgpu::BindGroupLayout,
        console: &mut Console,
    ) -> usize {
        let mut applied = 0usize;
        let mut seen: Vec<crate::scene::material::MaterialHandle> = Vec::new();
        for entry in self.registry.entries() {
            let Some(material) = &entry.material else {
                continue;
            };
            if seen.iter().any(|m| std::rc::Rc::ptr_eq(m, material)) {
                continue;
            }
            seen.push(material.clone());
            let mut material = material.borrow_mut();
            if material.load_texture(path, console) {
                material.upload(device, queue, material_layout);
                applied += 1;
            }
        }
        applied
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}
