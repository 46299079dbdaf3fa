//! The material component: texture ownership and the restore policy.

use std::cell::RefCell;
use std::rc::Rc;

use crate::console::Console;
use crate::resources::texture::Texture;

/// Reported as the texture path while the generated checkerboard is active.
pub const CHECKERBOARD_PATH: &str = "[Checkerboard Pattern]";

/// Reported as the texture path for textures embedded in a model file.
pub const EMBEDDED_TEXTURE_PATH: &str = "[Embedded Texture]";

/// Shared handle to a material. The owning scene node and the mesh registry
/// entries drawing with it reference the same component.
pub type MaterialHandle = Rc<RefCell<Material>>;

/// A material always owns exactly one texture; freshly created materials
/// carry the generated checkerboard. Loading a texture from a file records
/// its path as the "original" so the user can revert to it later.
pub struct Material {
    texture: Texture,
    texture_path: String,
    original_texture_path: Option<String>,
}

impl Material {
    pub fn new() -> Self {
        Self {
            texture: Texture::checkerboard(),
            texture_path: CHECKERBOARD_PATH.to_string(),
            original_texture_path: None,
        }
    }

    pub fn into_handle(self) -> MaterialHandle {
        Rc::new(RefCell::new(self))
    }

    pub fn texture_path(&self) -> &str {
        &self.texture_path
    }

    pub fn has_original_texture(&self) -> bool {
        self.original_texture_path.is_some()
    }

    pub fn original_texture_path(&self) -> Option<&str> {
        self.original_texture_path.as_deref()
    }

    pub fn texture_width(&self) -> u32 {
        self.texture.width()
    }

    pub fn texture_height(&self) -> u32 {
        self.texture.height()
    }

    /// Load a texture file into this material.
    ///
    /// On success the previous texture's GPU objects are released, the new
    /// texture becomes current and its path is remembered as the original.
    /// On failure the current texture is kept; the caller re-triggers if it
    /// wants a retry. The new texture is not GPU-resident until the next
    /// upload pass.
    pub fn load_texture(&mut self, path: &str, console: &mut Console) -> bool {
        log::debug!("loading texture from {:?}", path);
        match Texture::load(path) {
            Ok(texture) => {
                self.texture.release();
                self.texture = texture;
                self.texture_path = path.to_string();
                self.original_texture_path = Some(path.to_string());
                console.log(format!("Texture loaded: {}", path));
                true
            }
            Err(e) => {
                log::warn!("failed to load texture {:?}: {}", path, e);
                console.log(format!("Failed to load texture: {}", path));
                false
            }
        }
    }

    /// Take ownership of an already-decoded texture (e.g. one embedded in a
    /// model file). Embedded textures have no path to reload from, so the
    /// original path is left untouched.
    pub fn adopt_texture(&mut self, texture: Texture, label: &str) {
        self.texture.release();
        self.texture = texture;
        self.texture_path = label.to_string();
    }

    /// Revert to the original texture recorded by the last successful file
    /// load. If the reload fails the material falls back to a fresh
    /// checkerboard.
    pub fn restore_original_texture(&mut self, console: &mut Console) {
        let Some(original) = self.original_texture_path.clone() else {
            console.log("No original texture available to restore");
            return;
        };
        match Texture::load(&original) {
            Ok(texture) => {
                self.texture.release();
                self.texture = texture;
                self.texture_path = original.clone();
                console.log(format!("Original texture restored: {}", original));
            }
            Err(e) => {
                log::warn!("failed to restore original texture {:?}: {}", original, e);
                console.log("Failed to restore original texture");
                self.texture.release();
                self.texture = Texture::checkerboard();
                self.texture_path = CHECKERBOARD_PATH.to_string();
            }
        }
    }

    pub fn is_uploaded(&self) -> bool {
        self.texture.is_uploaded()
    }

    /// Upload the owned texture; a no-op when already resident.
    pub fn upload(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        layout: &wgpu::BindGroupLayout,
    ) {
        if !self.texture.is_uploaded() {
            let label = self.texture_path.clone();
            self.texture.upload(device, queue, layout, &label);
        }
    }

    /// Bind group of the owned texture, if it has been uploaded. Cloning is
    /// cheap; wgpu resources are reference counted.
    pub fn bind_group(&self) -> Option<wgpu::BindGroup> {
        self.texture.bind_group().cloned()
    }

    /// Release the owned texture's GPU objects. Effective exactly once.
    pub fn release_gpu(&mut self) {
        self.texture.release();
    }
}

impl Default for Material {
    fn default() -> Self {
        Self::new()
    }
}
