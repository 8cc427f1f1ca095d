//! # Procedural Geometry Generation
//!
//! This module generates the primitive shapes a scene is assembled from,
//! so no external model files are needed.
//!
//! ## Supported Primitives
//!
//! - **Box**: unit cube centered at the origin
//! - **Plane**: flat XZ plane facing +Y
//! - **Sphere**: UV sphere of radius 1
//! - **Cylinder**, **Cone**, **Tapered cylinder**, **Prism**: solids of
//!   revolution standing on the XZ plane, from y = 0 to y = 1
//! - **Torus**: ring lying in the XY plane
//!
//! ## Usage
//!
//! ```rust
//! use stillife::gfx::geometry::{generate_primitive, Primitive};
//!
//! let sphere = generate_primitive(Primitive::Sphere);
//! assert!(sphere.triangle_count() > 0);
//! ```

pub mod primitives;

pub use primitives::*;

use crate::gfx::scene::vertex::Vertex3D;

/// The primitive mesh types a scene can draw
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Primitive {
    Box,
    Cone,
    Cylinder,
    Plane,
    Prism,
    Sphere,
    TaperedCylinder,
    Torus,
}

impl Primitive {
    /// Every primitive, in the order meshes are uploaded
    pub const ALL: [Primitive; 8] = [
        Primitive::Box,
        Primitive::Cone,
        Primitive::Cylinder,
        Primitive::Plane,
        Primitive::Prism,
        Primitive::Sphere,
        Primitive::TaperedCylinder,
        Primitive::Torus,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Primitive::Box => "box",
            Primitive::Cone => "cone",
            Primitive::Cylinder => "cylinder",
            Primitive::Plane => "plane",
            Primitive::Prism => "prism",
            Primitive::Sphere => "sphere",
            Primitive::TaperedCylinder => "tapered cylinder",
            Primitive::Torus => "torus",
        }
    }
}

/// Represents generated geometry data ready for GPU upload
#[derive(Debug, Clone)]
pub struct GeometryData {
    /// Vertex positions (x, y, z)
    pub vertices: Vec<[f32; 3]>,
    /// Texture coordinates (u, v)
    pub tex_coords: Vec<[f32; 2]>,
    /// Normal vectors (x, y, z)
    pub normals: Vec<[f32; 3]>,
    /// Triangle indices (counter-clockwise winding seen from outside)
    pub indices: Vec<u32>,
}

impl GeometryData {
    /// Create a new empty geometry data structure
    pub fn new() -> Self {
        Self {
            vertices: Vec::new(),
            tex_coords: Vec::new(),
            normals: Vec::new(),
            indices: Vec::new(),
        }
    }

    /// Get the number of vertices in this geometry
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Get the number of triangles in this geometry
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    fn push_vertex(&mut self, position: [f32; 3], normal: [f32; 3], uv: [f32; 2]) -> u32 {
        let index = self.vertices.len() as u32;
        self.vertices.push(position);
        self.normals.push(normal);
        self.tex_coords.push(uv);
        index
    }

    /// Interleaves the attributes into the vertex format used by the renderer
    pub fn to_vertices(&self) -> Vec<Vertex3D> {
        (0..self.vertices.len())
            .map(|i| Vertex3D {
                position: self.vertices[i],
                normal: self.normals.get(i).copied().unwrap_or([0.0, 1.0, 0.0]),
                tex_coords: self.tex_coords.get(i).copied().unwrap_or([0.0, 0.0]),
            })
            .collect()
    }
}

impl Default for GeometryData {
    fn default() -> Self {
        Self::new()
    }
}
