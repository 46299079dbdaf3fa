//! vantage
//!
//! A small real-time 3D scene viewer: drop a glTF model onto the window and
//! fly through it. The crate is organized around a component scene graph
//! whose GPU resources are created on import and released exactly once on
//! removal, replacement or shutdown.
//!
//! High-level modules
//! - `app`: winit event loop, drag-and-drop handling and the frame loop
//! - `camera`: fly camera, projection and camera uniforms
//! - `console`: user-facing console sink (capped ring buffer)
//! - `context`: central GPU and window context owning device/queue/surface
//! - `pipelines`: render pipeline construction and the viewer shader
//! - `render`: per-frame render pass over the live mesh registry
//! - `resources`: importer, mesh records, primitive shapes, textures
//! - `scene`: scene nodes, components, and the scene itself
//!

pub mod app;
pub mod camera;
pub mod console;
pub mod context;
pub mod pipelines;
pub mod render;
pub mod resources;
pub mod scene;

// Re-exports commonly used types for convenience in downstream code.
pub use console::Console;
pub use render::{FrameStats, Renderer};
pub use resources::importer::{ImportConfig, ImportError, Preset};
pub use resources::mesh::{MeshHandle, MeshRecord, MeshRegistry, UploadError};
pub use resources::texture::{Texture, TextureLoadError};
pub use scene::{Component, ComponentKind, GameObject, Material, Scene, SceneError, Transform};
