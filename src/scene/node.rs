//! Scene nodes (game objects).
//!
//! A [`GameObject`] is the recursive unit of the scene: it owns its attached
//! components and its child nodes, and keeps a non-owning back-reference to
//! its parent for traversal. Handles are cheap clones of a shared pointer;
//! ownership of the node data flows strictly parent to child through the
//! child list, never the reverse.

use std::cell::RefCell;
use std::fmt::Write as _;
use std::rc::{Rc, Weak};

use cgmath::Matrix4;
use thiserror::Error;

use crate::resources::mesh::MeshHandle;
use crate::scene::component::{Component, ComponentKind, Transform};
use crate::scene::material::{Material, MaterialHandle};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SceneError {
    #[error("node already has a parent; detach it before re-attaching")]
    AlreadyParented,
    #[error("cannot attach a node to itself or to one of its descendants")]
    CycleDetected,
}

struct NodeData {
    name: String,
    parent: Option<Weak<RefCell<NodeData>>>,
    components: Vec<Component>,
    children: Vec<GameObject>,
}

/// Handle to a scene node. Cloning the handle does not clone the node.
#[derive(Clone)]
pub struct GameObject {
    data: Rc<RefCell<NodeData>>,
}

impl GameObject {
    pub fn new(name: &str) -> Self {
        Self {
            data: Rc::new(RefCell::new(NodeData {
                name: name.to_string(),
                parent: None,
                components: Vec::new(),
                children: Vec::new(),
            })),
        }
    }

    pub fn name(&self) -> String {
        self.data.borrow().name.clone()
    }

    pub fn set_name(&self, name: &str) {
        self.data.borrow_mut().name = name.to_string();
    }

    /// Whether two handles refer to the same node.
    pub fn ptr_eq(&self, other: &GameObject) -> bool {
        Rc::ptr_eq(&self.data, &other.data)
    }

    pub fn parent(&self) -> Option<GameObject> {
        self.data
            .borrow()
            .parent
            .as_ref()
            .and_then(Weak::upgrade)
            .map(|data| GameObject { data })
    }

    pub fn children(&self) -> Vec<GameObject> {
        self.data.borrow().children.clone()
    }

    pub fn child_count(&self) -> usize {
        self.data.borrow().children.len()
    }

    /// Take ownership of `child`. The child's parent back-reference is set
    /// to this node; afterwards `child.parent()` is this node and the child
    /// appears in the child list exactly once.
    ///
    /// A node that already has a parent is rejected (re-adding the same
    /// child included), as is any attachment that would close a cycle.
    pub fn add_child(&self, child: &GameObject) -> Result<(), SceneError> {
        if self.ptr_eq(child) {
            return Err(SceneError::CycleDetected);
        }
        if child.data.borrow().parent.as_ref().and_then(Weak::upgrade).is_some() {
            return Err(SceneError::AlreadyParented);
        }
        let mut cursor = self.parent();
        while let Some(node) = cursor {
            if node.ptr_eq(child) {
                return Err(SceneError::CycleDetected);
            }
            cursor = node.parent();
        }

        self.data.borrow_mut().children.push(child.clone());
        child.data.borrow_mut().parent = Some(Rc::downgrade(&self.data));
        Ok(())
    }

    /// Detach `child` from this node. Returns `false` if it was not a child.
    /// The caller is responsible for releasing the child's GPU resources
    /// before letting the detached subtree go out of scope.
    pub fn remove_child(&self, child: &GameObject) -> bool {
        let mut data = self.data.borrow_mut();
        let Some(index) = data.children.iter().position(|c| c.ptr_eq(child)) else {
            return false;
        };
        data.children.remove(index);
        drop(data);
        child.data.borrow_mut().parent = None;
        true
    }

    /// Attach a default component of `kind`. Returns `false` (and leaves the
    /// node unchanged) when a component of that kind already exists; callers
    /// wanting get-or-create check with [`GameObject::has_component`] first.
    pub fn create_component(&self, kind: ComponentKind) -> bool {
        let mut data = self.data.borrow_mut();
        if data.components.iter().any(|c| c.kind() == kind) {
            log::warn!("node {:?} already has a {:?} component", data.name, kind);
            return false;
        }
        data.components.push(Component::new(kind));
        true
    }

    pub fn has_component(&self, kind: ComponentKind) -> bool {
        self.data.borrow().components.iter().any(|c| c.kind() == kind)
    }

    pub fn component_count(&self) -> usize {
        self.data.borrow().components.len()
    }

    /// Copy of the transform component, if any.
    pub fn transform(&self) -> Option<Transform> {
        self.data.borrow().components.iter().find_map(|c| match c {
            Component::Transform(t) => Some(*t),
            _ => None,
        })
    }

    /// Overwrite the transform component. Returns `false` when the node has
    /// none.
    pub fn set_transform(&self, transform: Transform) -> bool {
        let mut data = self.data.borrow_mut();
        for component in &mut data.components {
            if let Component::Transform(t) = component {
                *t = transform;
                return true;
            }
        }
        false
    }

    pub fn world_matrix(&self) -> Option<Matrix4<f32>> {
        self.data.borrow().components.iter().find_map(|c| match c {
            Component::Transform(t) => Some(t.world_matrix()),
            _ => None,
        })
    }

    /// Attach `mesh` as this node's mesh component. Returns `false` when a
    /// mesh component already exists.
    pub fn attach_mesh(&self, mesh: MeshHandle) -> bool {
        let mut data = self.data.borrow_mut();
        if data.components.iter().any(|c| c.kind() == ComponentKind::Mesh) {
            log::warn!("node {:?} already has a mesh component", data.name);
            return false;
        }
        data.components.push(Component::Mesh(mesh));
        true
    }

    pub fn mesh(&self) -> Option<MeshHandle> {
        self.data.borrow().components.iter().find_map(|c| match c {
            Component::Mesh(mesh) => Some(mesh.clone()),
            _ => None,
        })
    }

    /// Existing material component, or a freshly attached default one.
    pub fn ensure_material(&self) -> MaterialHandle {
        if let Some(material) = self.material() {
            return material;
        }
        let handle = Material::new().into_handle();
        self.data
            .borrow_mut()
            .components
            .push(Component::Material(handle.clone()));
        handle
    }

    pub fn material(&self) -> Option<MaterialHandle> {
        self.data.borrow().components.iter().find_map(|c| match c {
            Component::Material(material) => Some(material.clone()),
            _ => None,
        })
    }

    /// Per-frame update: components first, in attachment order, then the
    /// children in child-list order. No short-circuiting; a component cannot
    /// stop its siblings from updating.
    pub fn update(&self, parent_world: Matrix4<f32>) {
        let (world, children) = {
            let mut data = self.data.borrow_mut();
            for component in &mut data.components {
                component.update(parent_world);
            }
            let world = data
                .components
                .iter()
                .find_map(|c| match c {
                    Component::Transform(t) => Some(t.world_matrix()),
                    _ => None,
                })
                .unwrap_or(parent_world);
            (world, data.children.clone())
        };
        for child in &children {
            child.update(world);
        }
    }

    /// Release every GPU resource owned by this node's components and by
    /// all descendants. Runs before the subtree's memory is dropped so no
    /// live handle can outlast its node.
    pub fn release_gpu_resources(&self) {
        let children = {
            let data = self.data.borrow();
            for component in &data.components {
                match component {
                    Component::Mesh(mesh) => mesh.borrow_mut().release(),
                    Component::Material(material) => material.borrow_mut().release_gpu(),
                    Component::Transform(_) => {}
                }
            }
            data.children.clone()
        };
        for child in &children {
            child.release_gpu_resources();
        }
    }

    /// Depth-first visit over this node and all descendants.
    pub fn visit(&self, f: &mut impl FnMut(&GameObject)) {
        f(self);
        let children = self.data.borrow().children.clone();
        for child in &children {
            child.visit(f);
        }
    }

    /// Human-readable hierarchy dump with component summaries.
    pub fn describe(&self) -> String {
        let mut out = String::new();
        self.describe_into(0, &mut out);
        out
    }

    fn describe_into(&self, depth: usize, out: &mut String) {
        let children = {
            let data = self.data.borrow();
            let _ = writeln!(out, "{}{}", "  ".repeat(depth), data.name);
            for component in &data.components {
                let _ = writeln!(out, "{}- {}", "  ".repeat(depth + 1), component.inspect());
            }
            data.children.clone()
        };
        for child in &children {
            child.describe_into(depth + 1, out);
        }
    }
}
