//! Procedurally generated primitive meshes.
//!
//! These are the built-in shapes the viewer can show without any imported
//! asset, including the pyramid the render pass falls back to when the mesh
//! registry is empty. Primitives carry positions and indices only; normals
//! and texture coordinates fall back to the record's defaults at upload.

use std::f32::consts::PI;

use crate::resources::mesh::MeshRecord;

pub fn triangle() -> MeshRecord {
    MeshRecord::new(
        "triangle",
        vec![[-0.5, -0.5, 0.0], [0.5, -0.5, 0.0], [0.0, 0.5, 0.0]],
        None,
        None,
        vec![0, 1, 2],
    )
}

pub fn cube() -> MeshRecord {
    let positions = vec![
        [-0.5, -0.5, 0.5],
        [0.5, -0.5, 0.5],
        [0.5, 0.5, 0.5],
        [-0.5, 0.5, 0.5],
        [-0.5, -0.5, -0.5],
        [0.5, -0.5, -0.5],
        [0.5, 0.5, -0.5],
        [-0.5, 0.5, -0.5],
    ];
    let indices = vec![
        0, 1, 2, 2, 3, 0, // front
        5, 4, 7, 7, 6, 5, // back
        4, 0, 3, 3, 7, 4, // left
        1, 5, 6, 6, 2, 1, // right
        3, 2, 6, 6, 7, 3, // top
        4, 5, 1, 1, 0, 4, // bottom
    ];
    MeshRecord::new("cube", positions, None, None, indices)
}

pub fn pyramid() -> MeshRecord {
    let positions = vec![
        [-0.5, -0.5, 0.5],
        [0.5, -0.5, 0.5],
        [0.5, -0.5, -0.5],
        [-0.5, -0.5, -0.5],
        [0.0, 0.5, 0.0],
    ];
    let indices = vec![
        0, 1, 4, // front
        1, 2, 4, // right
        2, 3, 4, // back
        3, 0, 4, // left
        0, 2, 1, // base
        0, 3, 2, // base
    ];
    MeshRecord::new("pyramid", positions, None, None, indices)
}

pub fn plane(width: f32, height: f32) -> MeshRecord {
    let half_w = width * 0.5;
    let half_h = height * 0.5;
    let positions = vec![
        [-half_w, 0.0, -half_h],
        [half_w, 0.0, -half_h],
        [half_w, 0.0, half_h],
        [-half_w, 0.0, half_h],
    ];
    MeshRecord::new("plane", positions, None, None, vec![0, 1, 2, 2, 3, 0])
}

pub fn sphere(radius: f32, rings: u32, sectors: u32) -> MeshRecord {
    let mut positions = Vec::new();
    let mut indices = Vec::new();

    let r_step = 1.0 / (rings - 1) as f32;
    let s_step = 1.0 / (sectors - 1) as f32;

    for r in 0..rings {
        for s in 0..sectors {
            let y = (-PI / 2.0 + PI * r as f32 * r_step).sin();
            let x = (2.0 * PI * s as f32 * s_step).cos() * (PI * r as f32 * r_step).sin();
            let z = (2.0 * PI * s as f32 * s_step).sin() * (PI * r as f32 * r_step).sin();
            positions.push([x * radius, y * radius, z * radius]);
        }
    }

    for r in 0..rings - 1 {
        for s in 0..sectors - 1 {
            indices.push(r * sectors + s);
            indices.push(r * sectors + (s + 1));
            indices.push((r + 1) * sectors + (s + 1));

            indices.push(r * sectors + s);
            indices.push((r + 1) * sectors + (s + 1));
            indices.push((r + 1) * sectors + s);
        }
    }

    MeshRecord::new("sphere", positions, None, None, indices)
}

pub fn cylinder(radius: f32, height: f32, segments: u32) -> MeshRecord {
    let mut positions = Vec::new();
    let mut indices = Vec::new();

    let half_height = height * 0.5;

    // top and bottom centers
    positions.push([0.0, half_height, 0.0]);
    positions.push([0.0, -half_height, 0.0]);

    for i in 0..=segments {
        let angle = 2.0 * PI * i as f32 / segments as f32;
        let x = angle.cos() * radius;
        let z = angle.sin() * radius;
        positions.push([x, half_height, z]);
        positions.push([x, -half_height, z]);
    }

    // top cap
    for i in 0..segments {
        indices.push(0);
        indices.push(2 + i * 2);
        indices.push(2 + (i + 1) * 2);
    }

    // bottom cap
    for i in 0..segments {
        indices.push(1);
        indices.push(3 + (i + 1) * 2);
        indices.push(3 + i * 2);
    }

    // side faces
    for i in 0..segments {
        let top_current = 2 + i * 2;
        let bottom_current = 3 + i * 2;
        let top_next = 2 + (i + 1) * 2;
        let bottom_next = 3 + (i + 1) * 2;

        indices.push(top_current);
        indices.push(bottom_current);
        indices.push(top_next);

        indices.push(top_next);
        indices.push(bottom_current);
        indices.push(bottom_next);
    }

    MeshRecord::new("cylinder", positions, None, None, indices)
}
