//! # Primitive Shape Generation
//!
//! This module contains functions to generate the primitive shapes.
//! All shapes are Y-up and generated with outward normals and texture
//! coordinates whose origin is the bottom-left of the image.

use super::{GeometryData, Primitive};
use std::f32::consts::PI;

const ROUND_SEGMENTS: u32 = 36;
const SPHERE_RINGS: u32 = 18;
const TORUS_TUBE_SEGMENTS: u32 = 18;
const TORUS_MAIN_RADIUS: f32 = 1.0;
const TORUS_TUBE_RADIUS: f32 = 0.2;
const TAPER_TOP_RADIUS: f32 = 0.5;

/// Generates `primitive` at its default resolution
pub fn generate_primitive(primitive: Primitive) -> GeometryData {
    match primitive {
        Primitive::Box => generate_box(),
        Primitive::Cone => generate_frustum(1.0, 0.0, ROUND_SEGMENTS, true),
        Primitive::Cylinder => generate_frustum(1.0, 1.0, ROUND_SEGMENTS, true),
        Primitive::Plane => generate_plane(2.0, 2.0, 1, 1),
        Primitive::Prism => generate_frustum(1.0, 1.0, 3, false),
        Primitive::Sphere => generate_sphere(ROUND_SEGMENTS, SPHERE_RINGS),
        Primitive::TaperedCylinder => {
            generate_frustum(1.0, TAPER_TOP_RADIUS, ROUND_SEGMENTS, true)
        }
        Primitive::Torus => generate_torus(
            TORUS_MAIN_RADIUS,
            TORUS_TUBE_RADIUS,
            ROUND_SEGMENTS,
            TORUS_TUBE_SEGMENTS,
        ),
    }
}

/// Generate a unit box centered at the origin
///
/// Returns a box with vertices from -0.5 to 0.5 on all axes.
/// Each face has its own vertices so normals stay flat, with UVs from 0 to 1.
pub fn generate_box() -> GeometryData {
    let mut data = GeometryData::new();

    let positions = [
        // Front face
        [-0.5, -0.5,  0.5], [ 0.5, -0.5,  0.5], [ 0.5,  0.5,  0.5], [-0.5,  0.5,  0.5],
        // Back face
        [-0.5, -0.5, -0.5], [-0.5,  0.5, -0.5], [ 0.5,  0.5, -0.5], [ 0.5, -0.5, -0.5],
        // Left face
        [-0.5, -0.5, -0.5], [-0.5, -0.5,  0.5], [-0.5,  0.5,  0.5], [-0.5,  0.5, -0.5],
        // Right face
        [ 0.5, -0.5,  0.5], [ 0.5, -0.5, -0.5], [ 0.5,  0.5, -0.5], [ 0.5,  0.5,  0.5],
        // Top face
        [-0.5,  0.5,  0.5], [ 0.5,  0.5,  0.5], [ 0.5,  0.5, -0.5], [-0.5,  0.5, -0.5],
        // Bottom face
        [-0.5, -0.5, -0.5], [ 0.5, -0.5, -0.5], [ 0.5, -0.5,  0.5], [-0.5, -0.5,  0.5],
    ];

    let tex_coords = [
        [0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0],
        [1.0, 0.0], [1.0, 1.0], [0.0, 1.0], [0.0, 0.0],
        [0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0],
        [0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0],
        [0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0],
        [0.0, 1.0], [1.0, 1.0], [1.0, 0.0], [0.0, 0.0],
    ];

    let face_normals = [
        [0.0, 0.0, 1.0],
        [0.0, 0.0, -1.0],
        [-1.0, 0.0, 0.0],
        [1.0, 0.0, 0.0],
        [0.0, 1.0, 0.0],
        [0.0, -1.0, 0.0],
    ];

    data.vertices = positions.to_vec();
    data.tex_coords = tex_coords.to_vec();
    data.normals = face_normals
        .iter()
        .flat_map(|normal| [*normal; 4])
        .collect();

    for face in 0..6u32 {
        let base = face * 4;
        data.indices
            .extend_from_slice(&[base, base + 1, base + 2, base + 2, base + 3, base]);
    }

    data
}

/// Generate a UV sphere of radius 1 centered at the origin
///
/// # Arguments
/// * `longitude_segments` - Number of vertical segments (longitude lines)
/// * `latitude_segments` - Number of horizontal segments (latitude lines)
pub fn generate_sphere(longitude_segments: u32, latitude_segments: u32) -> GeometryData {
    let mut data = GeometryData::new();

    let long_segs = longitude_segments.max(3);
    let lat_segs = latitude_segments.max(2);

    for lat in 0..=lat_segs {
        let theta = lat as f32 * PI / lat_segs as f32; // 0 at the north pole
        let (sin_theta, cos_theta) = theta.sin_cos();

        for long in 0..=long_segs {
            let phi = long as f32 * 2.0 * PI / long_segs as f32;
            let (sin_phi, cos_phi) = phi.sin_cos();

            let position = [sin_theta * cos_phi, cos_theta, sin_theta * sin_phi];
            let uv = [
                long as f32 / long_segs as f32,
                1.0 - lat as f32 / lat_segs as f32,
            ];
            // Normal is same as position for unit sphere
            data.push_vertex(position, position, uv);
        }
    }

    for lat in 0..lat_segs {
        for long in 0..long_segs {
            let first = lat * (long_segs + 1) + long;
            let second = first + long_segs + 1;

            data.indices.extend_from_slice(&[first, first + 1, second]);
            data.indices.extend_from_slice(&[second, first + 1, second + 1]);
        }
    }

    data
}

/// Generate a plane in the XZ plane facing +Y
///
/// # Arguments
/// * `width` - Size along X
/// * `depth` - Size along Z
/// * `width_segments` - Number of subdivisions along width
/// * `depth_segments` - Number of subdivisions along depth
pub fn generate_plane(width: f32, depth: f32, width_segments: u32, depth_segments: u32) -> GeometryData {
    let mut data = GeometryData::new();

    let w_segs = width_segments.max(1);
    let d_segs = depth_segments.max(1);

    for z in 0..=d_segs {
        let v = z as f32 / d_segs as f32;
        let pos_z = (v - 0.5) * depth;

        for x in 0..=w_segs {
            let u = x as f32 / w_segs as f32;
            let pos_x = (u - 0.5) * width;

            // Far edge (negative Z) maps to the top of the texture
            data.push_vertex([pos_x, 0.0, pos_z], [0.0, 1.0, 0.0], [u, 1.0 - v]);
        }
    }

    for z in 0..d_segs {
        for x in 0..w_segs {
            let i = z * (w_segs + 1) + x;
            let next_row = i + w_segs + 1;

            data.indices.extend_from_slice(&[i, next_row, i + 1]);
            data.indices.extend_from_slice(&[next_row, next_row + 1, i + 1]);
        }
    }

    data
}

/// Generate a capped frustum standing on the XZ plane, from y = 0 to y = 1
///
/// Cylinders, cones, tapered cylinders and prisms are all frustums.
///
/// # Arguments
/// * `bottom_radius` - Radius of the base ring
/// * `top_radius` - Radius of the top ring; 0 collapses it to an apex
/// * `segments` - Number of side faces around the axis
/// * `smooth` - Interpolate normals around the axis, or keep each side flat
pub fn generate_frustum(bottom_radius: f32, top_radius: f32, segments: u32, smooth: bool) -> GeometryData {
    let mut data = GeometryData::new();

    let segs = segments.max(3);
    let slope = bottom_radius - top_radius;
    let side_normal = |angle: f32| -> [f32; 3] {
        let (sin_a, cos_a) = angle.sin_cos();
        let length = (1.0 + slope * slope).sqrt();
        [cos_a / length, slope / length, sin_a / length]
    };
    let angle_of = |i: u32| i as f32 * 2.0 * PI / segs as f32;

    // Side faces, four vertices each
    for i in 0..segs {
        let (a0, a1) = (angle_of(i), angle_of(i + 1));
        let (n0, n1) = if smooth {
            (side_normal(a0), side_normal(a1))
        } else {
            let n = side_normal((a0 + a1) * 0.5);
            (n, n)
        };
        let (u0, u1) = (i as f32 / segs as f32, (i + 1) as f32 / segs as f32);

        let b0 = data.push_vertex(ring_point(bottom_radius, a0, 0.0), n0, [u0, 0.0]);
        let t0 = data.push_vertex(ring_point(top_radius, a0, 1.0), n0, [u0, 1.0]);
        let b1 = data.push_vertex(ring_point(bottom_radius, a1, 0.0), n1, [u1, 0.0]);
        let t1 = data.push_vertex(ring_point(top_radius, a1, 1.0), n1, [u1, 1.0]);

        data.indices.extend_from_slice(&[b0, t0, b1]);
        data.indices.extend_from_slice(&[t0, t1, b1]);
    }

    if bottom_radius > 0.0 {
        add_cap(&mut data, bottom_radius, 0.0, segs, false);
    }
    if top_radius > 0.0 {
        add_cap(&mut data, top_radius, 1.0, segs, true);
    }

    data
}

fn ring_point(radius: f32, angle: f32, y: f32) -> [f32; 3] {
    let (sin_a, cos_a) = angle.sin_cos();
    [radius * cos_a, y, radius * sin_a]
}

fn add_cap(data: &mut GeometryData, radius: f32, y: f32, segs: u32, facing_up: bool) {
    let normal = if facing_up { [0.0, 1.0, 0.0] } else { [0.0, -1.0, 0.0] };
    let center = data.push_vertex([0.0, y, 0.0], normal, [0.5, 0.5]);

    let first_ring = data.vertices.len() as u32;
    for i in 0..=segs {
        let angle = i as f32 * 2.0 * PI / segs as f32;
        let (sin_a, cos_a) = angle.sin_cos();
        data.push_vertex(
            ring_point(radius, angle, y),
            normal,
            [0.5 + 0.5 * cos_a, 0.5 + 0.5 * sin_a],
        );
    }

    for i in 0..segs {
        let current = first_ring + i;
        let next = current + 1;
        if facing_up {
            data.indices.extend_from_slice(&[center, next, current]);
        } else {
            data.indices.extend_from_slice(&[center, current, next]);
        }
    }
}

/// Generate a torus lying in the XY plane, centered at the origin
///
/// # Arguments
/// * `main_radius` - Distance from the center to the middle of the tube
/// * `tube_radius` - Radius of the tube
/// * `main_segments` - Segments around the ring
/// * `tube_segments` - Segments around the tube
pub fn generate_torus(
    main_radius: f32,
    tube_radius: f32,
    main_segments: u32,
    tube_segments: u32,
) -> GeometryData {
    let mut data = GeometryData::new();

    let main_segs = main_segments.max(3);
    let tube_segs = tube_segments.max(3);

    for i in 0..=main_segs {
        let u = i as f32 * 2.0 * PI / main_segs as f32;
        let (sin_u, cos_u) = u.sin_cos();

        for j in 0..=tube_segs {
            let v = j as f32 * 2.0 * PI / tube_segs as f32;
            let (sin_v, cos_v) = v.sin_cos();

            let normal = [cos_v * cos_u, cos_v * sin_u, sin_v];
            let position = [
                main_radius * cos_u + tube_radius * normal[0],
                main_radius * sin_u + tube_radius * normal[1],
                tube_radius * normal[2],
            ];
            let uv = [
                i as f32 / main_segs as f32,
                j as f32 / tube_segs as f32,
            ];
            data.push_vertex(position, normal, uv);
        }
    }

    let row = tube_segs + 1;
    for i in 0..main_segs {
        for j in 0..tube_segs {
            let current = i * row + j;
            let next_ring = current + row;

            data.indices.extend_from_slice(&[current, next_ring, current + 1]);
            data.indices.extend_from_slice(&[next_ring, next_ring + 1, current + 1]);
        }
    }

    data
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sub(a: [f32; 3], b: [f32; 3]) -> [f32; 3] {
        [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
    }

    fn cross(a: [f32; 3], b: [f32; 3]) -> [f32; 3] {
        [
            a[1] * b[2] - a[2] * b[1],
            a[2] * b[0] - a[0] * b[2],
            a[0] * b[1] - a[1] * b[0],
        ]
    }

    fn dot(a: [f32; 3], b: [f32; 3]) -> f32 {
        a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
    }

    /// Every non-degenerate triangle winds counter-clockwise around its vertex normals
    fn assert_outward_winding(data: &GeometryData) {
        for triangle in data.indices.chunks(3) {
            let [a, b, c] = [triangle[0], triangle[1], triangle[2]].map(|i| i as usize);
            let face = cross(
                sub(data.vertices[b], data.vertices[a]),
                sub(data.vertices[c], data.vertices[a]),
            );
            if dot(face, face) < 1e-10 {
                continue;
            }
            assert!(
                dot(face, data.normals[a]) > 0.0,
                "triangle {:?} winds against its normal",
                triangle
            );
        }
    }

    fn assert_consistent(data: &GeometryData) {
        assert!(data.vertex_count() > 0);
        assert_eq!(data.vertices.len(), data.normals.len());
        assert_eq!(data.vertices.len(), data.tex_coords.len());
        assert_eq!(data.indices.len() % 3, 0);
        assert!(data
            .indices
            .iter()
            .all(|&i| (i as usize) < data.vertex_count()));
    }

    #[test]
    fn test_box_generation() {
        let cube = generate_box();
        assert_eq!(cube.vertices.len(), 24); // 6 faces * 4 vertices
        assert_eq!(cube.indices.len(), 36); // 6 faces * 2 triangles * 3 indices
        assert_eq!(cube.triangle_count(), 12);
        assert_outward_winding(&cube);
    }

    #[test]
    fn test_sphere_generation() {
        let sphere = generate_sphere(8, 6);
        assert_consistent(&sphere);
        assert_outward_winding(&sphere);
    }

    #[test]
    fn test_plane_generation() {
        let plane = generate_plane(2.0, 2.0, 2, 2);
        assert_eq!(plane.vertices.len(), 9); // 3x3 grid
        assert_eq!(plane.indices.len(), 24); // 4 quads * 2 triangles * 3 indices
        assert!(plane.vertices.iter().all(|v| v[1] == 0.0));
        assert_outward_winding(&plane);
    }

    #[test]
    fn test_frustum_shapes() {
        let cylinder = generate_frustum(1.0, 1.0, 12, true);
        assert_consistent(&cylinder);
        assert_outward_winding(&cylinder);
        // Side faces plus two caps
        assert_eq!(cylinder.triangle_count(), 12 * 2 + 12 * 2);

        let cone = generate_frustum(1.0, 0.0, 12, true);
        assert_consistent(&cone);
        assert_outward_winding(&cone);
        // No top cap on a cone
        assert_eq!(cone.triangle_count(), 12 * 2 + 12);

        let prism = generate_frustum(1.0, 1.0, 3, false);
        assert_consistent(&prism);
        assert_outward_winding(&prism);
    }

    #[test]
    fn test_frustum_spans_unit_height() {
        let tapered = generate_primitive(Primitive::TaperedCylinder);
        let (min_y, max_y) = tapered
            .vertices
            .iter()
            .fold((f32::MAX, f32::MIN), |(lo, hi), v| (lo.min(v[1]), hi.max(v[1])));
        assert_eq!((min_y, max_y), (0.0, 1.0));
    }

    #[test]
    fn test_torus_generation() {
        let torus = generate_torus(1.0, 0.25, 16, 8);
        assert_consistent(&torus);
        assert_outward_winding(&torus);
        assert!(torus.vertices.iter().all(|v| v[2].abs() <= 0.25 + 1e-6));
    }

    #[test]
    fn test_every_primitive_generates() {
        for primitive in Primitive::ALL {
            let data = generate_primitive(primitive);
            assert_consistent(&data);
        }
    }
}
