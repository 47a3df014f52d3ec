//! Procedural source geometry for headless sessions and tests.

use std::f32::consts::{PI, TAU};

use glam::Vec3;

use crate::source::TriangleData;

/// A flat grid in the XY plane spanning `[0, nx * cell] x [0, ny * cell]`,
/// facing +Z. Each cell is split along its (0,0)-(1,1) diagonal.
pub fn grid(nx: u32, ny: u32, cell: f32) -> TriangleData {
    let nx = nx.max(1);
    let ny = ny.max(1);
    let mut positions = Vec::with_capacity(((nx + 1) * (ny + 1)) as usize);
    for y in 0..=ny {
        for x in 0..=nx {
            positions.push(Vec3::new(x as f32 * cell, y as f32 * cell, 0.0));
        }
    }

    let row = nx + 1;
    let mut triangles = Vec::with_capacity((nx * ny * 2) as usize);
    for y in 0..ny {
        for x in 0..nx {
            let v00 = y * row + x;
            let v10 = v00 + 1;
            let v01 = v00 + row;
            let v11 = v01 + 1;
            triangles.push([v00, v10, v11]);
            triangles.push([v00, v11, v01]);
        }
    }
    TriangleData { positions, triangles }
}

/// An axis-aligned cube of edge length `size` centered on the origin, with
/// shared corners and outward winding
pub fn cube(size: f32) -> TriangleData {
    let h = size * 0.5;
    // corner i has x = bit 0, y = bit 1, z = bit 2
    let positions = (0..8)
        .map(|i| {
            Vec3::new(
                if i & 1 == 0 { -h } else { h },
                if i & 2 == 0 { -h } else { h },
                if i & 4 == 0 { -h } else { h },
            )
        })
        .collect();
    let triangles = vec![
        [0, 2, 3],
        [0, 3, 1],
        [4, 5, 7],
        [4, 7, 6],
        [0, 1, 5],
        [0, 5, 4],
        [2, 6, 7],
        [2, 7, 3],
        [0, 4, 6],
        [0, 6, 2],
        [1, 3, 7],
        [1, 7, 5],
    ];
    TriangleData { positions, triangles }
}

/// A UV sphere centered on the origin with poles on the Z axis
pub fn uv_sphere(radius: f32, segments: u32, rings: u32) -> TriangleData {
    let segments = segments.max(3);
    let rings = rings.max(2);

    let mut positions = vec![Vec3::new(0.0, 0.0, radius)];
    for i in 1..rings {
        let theta = PI * i as f32 / rings as f32;
        let (sin_t, cos_t) = theta.sin_cos();
        for j in 0..segments {
            let phi = TAU * j as f32 / segments as f32;
            let (sin_p, cos_p) = phi.sin_cos();
            positions.push(Vec3::new(sin_t * cos_p, sin_t * sin_p, cos_t) * radius);
        }
    }
    let bottom = positions.len() as u32;
    positions.push(Vec3::new(0.0, 0.0, -radius));

    let ring_vertex = |i: u32, j: u32| 1 + (i - 1) * segments + j % segments;

    let mut triangles = Vec::new();
    for j in 0..segments {
        triangles.push([0, ring_vertex(1, j), ring_vertex(1, j + 1)]);
    }
    for i in 1..rings - 1 {
        for j in 0..segments {
            let a = ring_vertex(i, j);
            let b = ring_vertex(i, j + 1);
            let c = ring_vertex(i + 1, j);
            let d = ring_vertex(i + 1, j + 1);
            triangles.push([a, c, d]);
            triangles.push([a, d, b]);
        }
    }
    for j in 0..segments {
        triangles.push([ring_vertex(rings - 1, j), bottom, ring_vertex(rings - 1, j + 1)]);
    }
    TriangleData { positions, triangles }
}
