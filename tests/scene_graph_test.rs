use cgmath::{Quaternion, Rotation3, Vector3};
use vantage::scene::component::ComponentKind;
use vantage::scene::node::{GameObject, SceneError};
use vantage::scene::scene::Scene;

#[test]
fn add_child_keeps_parent_and_child_list_consistent() {
    let parent = GameObject::new("parent");
    let child = GameObject::new("child");

    parent.add_child(&child).expect("fresh child should attach");

    let back = child.parent().expect("child should know its parent");
    assert!(back.ptr_eq(&parent));
    let children = parent.children();
    assert_eq!(children.len(), 1);
    assert!(children[0].ptr_eq(&child));
}

#[test]
fn re_adding_the_same_child_is_rejected() {
    let parent = GameObject::new("parent");
    let child = GameObject::new("child");

    parent.add_child(&child).expect("first attach");
    assert_eq!(parent.add_child(&child), Err(SceneError::AlreadyParented));
    // the child list still holds the child exactly once
    assert_eq!(parent.child_count(), 1);
}

#[test]
fn adopting_a_node_owned_elsewhere_is_rejected() {
    let a = GameObject::new("a");
    let b = GameObject::new("b");
    let child = GameObject::new("child");

    a.add_child(&child).expect("attach under a");
    assert_eq!(b.add_child(&child), Err(SceneError::AlreadyParented));
    assert!(child.parent().expect("still owned by a").ptr_eq(&a));
}

#[test]
fn self_and_ancestor_adoption_are_rejected() {
    let root = GameObject::new("root");
    let middle = GameObject::new("middle");
    let leaf = GameObject::new("leaf");
    root.add_child(&middle).expect("attach middle");
    middle.add_child(&leaf).expect("attach leaf");

    assert_eq!(root.add_child(&root), Err(SceneError::CycleDetected));
    // attaching an ancestor under its descendant would close a cycle
    assert_eq!(leaf.add_child(&root), Err(SceneError::CycleDetected));
}

#[test]
fn detached_child_can_be_reattached() {
    let a = GameObject::new("a");
    let b = GameObject::new("b");
    let child = GameObject::new("child");

    a.add_child(&child).expect("attach under a");
    assert!(a.remove_child(&child));
    assert!(child.parent().is_none());
    b.add_child(&child).expect("reattach under b");
    assert!(child.parent().expect("owned by b").ptr_eq(&b));
}

#[test]
fn one_component_per_kind() {
    let node = GameObject::new("node");
    assert!(node.create_component(ComponentKind::Transform));
    assert!(!node.create_component(ComponentKind::Transform));
    assert_eq!(node.component_count(), 1);

    assert!(node.create_component(ComponentKind::Material));
    assert!(!node.create_component(ComponentKind::Material));
    assert_eq!(node.component_count(), 2);
}

#[test]
fn transform_defaults_to_identity() {
    let node = GameObject::new("node");
    node.create_component(ComponentKind::Transform);
    let transform = node.transform().expect("transform exists");
    assert_eq!(transform.rotation, Quaternion::new(1.0, 0.0, 0.0, 0.0));
    assert_eq!(transform.position, Vector3::new(0.0, 0.0, 0.0));
    assert_eq!(transform.scale, Vector3::new(1.0, 1.0, 1.0));
}

#[test]
fn update_propagates_world_transforms_down_the_tree() {
    let mut scene = Scene::new();
    let parent = scene.create_game_object("parent");
    parent.create_component(ComponentKind::Transform);
    let mut t = parent.transform().expect("transform");
    t.position = Vector3::new(1.0, 2.0, 3.0);
    parent.set_transform(t);

    let child = GameObject::new("child");
    child.create_component(ComponentKind::Transform);
    let mut t = child.transform().expect("transform");
    t.position = Vector3::new(10.0, 0.0, 0.0);
    child.set_transform(t);
    parent.add_child(&child).expect("attach child");

    scene.update();

    let world = child.world_matrix().expect("world matrix");
    assert_eq!(world.w.x, 11.0);
    assert_eq!(world.w.y, 2.0);
    assert_eq!(world.w.z, 3.0);
}

#[test]
fn update_renormalizes_rotation() {
    let node = GameObject::new("node");
    node.create_component(ComponentKind::Transform);
    let mut t = node.transform().expect("transform");
    // deliberately non-unit quaternion
    t.rotation = Quaternion::from_angle_y(cgmath::Deg(90.0)) * 2.0;
    node.set_transform(t);

    node.update(cgmath::Matrix4::from_scale(1.0));

    let rotation = node.transform().expect("transform").rotation;
    let magnitude = (rotation.s * rotation.s + rotation.v.x * rotation.v.x
        + rotation.v.y * rotation.v.y
        + rotation.v.z * rotation.v.z)
        .sqrt();
    assert!((magnitude - 1.0).abs() < 1e-5);
}

#[test]
fn create_game_object_attaches_under_root() {
    let mut scene = Scene::new();
    let object = scene.create_game_object("thing");
    assert!(object.parent().expect("parent is root").ptr_eq(scene.root()));
    assert_eq!(scene.root().child_count(), 1);
}

#[test]
fn releasing_an_unuploaded_tree_is_harmless() {
    let root = GameObject::new("root");
    let child = GameObject::new("child");
    root.add_child(&child).expect("attach");
    child.attach_mesh(vantage::resources::primitives::cube().into_handle());
    child.ensure_material();

    root.release_gpu_resources();
    root.release_gpu_resources();

    let mesh = child.mesh().expect("mesh");
    assert!(!mesh.borrow().is_uploaded());
    let material = child.material().expect("material");
    assert!(!material.borrow().is_uploaded());
}
