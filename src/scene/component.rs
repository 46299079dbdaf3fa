//! Components attachable to scene nodes.
//!
//! A node carries at most one component per [`ComponentKind`]; the kind acts
//! as a unique key within the node's component set. Components are stored as
//! a tagged enum, so access is typed and no downcasting is involved.

use cgmath::{InnerSpace, Matrix4, One, Quaternion, SquareMatrix, Vector3};

use crate::resources::mesh::{MeshHandle, MeshRecord};
use crate::scene::material::{Material, MaterialHandle};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ComponentKind {
    Transform,
    Mesh,
    Material,
}

/// Local position/rotation/scale plus the world matrix derived from them
/// during the scene update pass.
#[derive(Clone, Copy, Debug)]
pub struct Transform {
    pub position: Vector3<f32>,
    pub rotation: Quaternion<f32>,
    pub scale: Vector3<f32>,
    world: Matrix4<f32>,
}

impl Transform {
    pub fn new() -> Self {
        Self {
            position: Vector3::new(0.0, 0.0, 0.0),
            rotation: Quaternion::one(),
            scale: Vector3::new(1.0, 1.0, 1.0),
            world: Matrix4::identity(),
        }
    }

    pub fn local_matrix(&self) -> Matrix4<f32> {
        Matrix4::from_translation(self.position)
            * Matrix4::from(self.rotation)
            * Matrix4::from_nonuniform_scale(self.scale.x, self.scale.y, self.scale.z)
    }

    pub fn world_matrix(&self) -> Matrix4<f32> {
        self.world
    }

    /// Recompute the world matrix from the parent's. The rotation is
    /// renormalized here so accumulated user edits cannot drift it away
    /// from unit length.
    pub fn update(&mut self, parent_world: Matrix4<f32>) {
        self.rotation = self.rotation.normalize();
        self.world = parent_world * self.local_matrix();
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::new()
    }
}

/// A component attached to a scene node. Mesh and material components hold
/// shared handles because the mesh registry references the same records
/// while they are live for drawing.
pub enum Component {
    Transform(Transform),
    Mesh(MeshHandle),
    Material(MaterialHandle),
}

impl Component {
    /// Construct a default component of the requested kind.
    pub fn new(kind: ComponentKind) -> Self {
        match kind {
            ComponentKind::Transform => Component::Transform(Transform::new()),
            ComponentKind::Mesh => {
                Component::Mesh(MeshRecord::new("mesh", Vec::new(), None, None, Vec::new()).into_handle())
            }
            ComponentKind::Material => Component::Material(Material::new().into_handle()),
        }
    }

    pub fn kind(&self) -> ComponentKind {
        match self {
            Component::Transform(_) => ComponentKind::Transform,
            Component::Mesh(_) => ComponentKind::Mesh,
            Component::Material(_) => ComponentKind::Material,
        }
    }

    /// Per-frame component update. Mesh and material components currently
    /// have no frame behaviour; the transform derives its world matrix.
    pub fn update(&mut self, parent_world: Matrix4<f32>) {
        match self {
            Component::Transform(transform) => transform.update(parent_world),
            Component::Mesh(_) | Component::Material(_) => {}
        }
    }

    /// One-line summary for hierarchy inspection.
    pub fn inspect(&self) -> String {
        match self {
            Component::Transform(t) => format!(
                "Transform position=({:.3}, {:.3}, {:.3}) scale=({:.3}, {:.3}, {:.3})",
                t.position.x, t.position.y, t.position.z, t.scale.x, t.scale.y, t.scale.z
            ),
            Component::Mesh(mesh) => {
                let mesh = mesh.borrow();
                format!(
                    "Mesh {:?} ({} vertices, {} indices)",
                    mesh.name(),
                    mesh.vertex_count(),
                    mesh.index_count()
                )
            }
            Component::Material(material) => {
                format!("Material {:?}", material.borrow().texture_path().to_string())
            }
        }
    }
}
