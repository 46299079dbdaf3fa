use vantage::console::Console;
use vantage::resources::mesh::MeshRegistry;
use vantage::resources::primitives;

#[test]
fn registry_preserves_insertion_order() {
    let mut registry = MeshRegistry::new();
    registry.register(primitives::pyramid().into_handle(), None);
    registry.register(primitives::cube().into_handle(), None);
    registry.register(primitives::triangle().into_handle(), None);

    let names: Vec<String> = registry
        .entries()
        .iter()
        .map(|entry| entry.mesh.borrow().name().to_string())
        .collect();
    assert_eq!(names, ["pyramid", "cube", "triangle"]);
}

#[test]
fn clear_empties_the_registry_and_releases_records() {
    let mut registry = MeshRegistry::new();
    let pyramid = primitives::pyramid().into_handle();
    registry.register(pyramid.clone(), None);

    registry.clear();

    assert!(registry.is_empty());
    // the shared record survives through its other handle, fully released
    assert!(!pyramid.borrow().is_uploaded());
}

#[test]
fn release_is_effective_once() {
    let mut record = primitives::cube();
    record.release();
    record.release();
    assert!(!record.is_uploaded());
}

#[test]
fn primitive_geometry_is_consistent() {
    let cases = [
        (primitives::triangle(), 3, 3),
        (primitives::cube(), 8, 36),
        (primitives::pyramid(), 5, 18),
        (primitives::plane(2.0, 2.0), 4, 6),
        (primitives::sphere(1.0, 8, 8), 64, 294),
        (primitives::cylinder(1.0, 2.0, 8), 20, 96),
    ];
    for (record, vertices, indices) in cases {
        assert_eq!(record.vertex_count(), vertices, "{}", record.name());
        assert_eq!(record.index_count(), indices, "{}", record.name());
        assert!(
            record
                .indices()
                .iter()
                .all(|&i| (i as usize) < record.vertex_count()),
            "{} has out-of-range indices",
            record.name()
        );
        assert_eq!(record.index_count() % 3, 0, "{}", record.name());
    }
}

#[test]
fn console_caps_at_one_thousand_messages() {
    let mut console = Console::new();
    for i in 0..1005 {
        console.log(format!("message {}", i));
    }
    assert_eq!(console.len(), 1000);
    // the oldest five were evicted first
    assert_eq!(console.entries().next(), Some("message 5"));
    assert_eq!(console.entries().last(), Some("message 1004"));
}

#[test]
fn console_clear_empties_the_buffer() {
    let mut console = Console::new();
    console.log("one");
    console.clear();
    assert!(console.is_empty());
}
