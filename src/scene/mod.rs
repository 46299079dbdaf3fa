//! Scene graph: nodes, components, and the scene that owns them.
//!
//! - `node` holds [`GameObject`], the recursive owner of components and
//!   child nodes
//! - `component` defines the component kinds and the transform component
//! - `material` is the material component (texture ownership and revert)
//! - `scene` ties one root node to the mesh registry and the model
//!   load/replace cycle

pub mod component;
pub mod material;
pub mod node;
pub mod scene;

pub use component::{Component, ComponentKind, Transform};
pub use material::{Material, MaterialHandle};
pub use node::{GameObject, SceneError};
pub use scene::Scene;
