//! GPU meshes for the primitive shapes
//!
//! One vertex and index buffer per primitive type, shared by every draw of
//! that primitive.

use std::collections::HashMap;

use crate::gfx::geometry::{generate_primitive, GeometryData, Primitive};

/// Uploaded vertex and index buffers of one mesh
pub struct GpuMesh {
    pub vertex_buffer: wgpu::Buffer,
    pub index_buffer: wgpu::Buffer,
    pub index_count: u32,
}

impl GpuMesh {
    pub fn from_geometry(device: &wgpu::Device, geometry: &GeometryData, label: &str) -> Self {
        let vertices = geometry.to_vertices();

        let vertex_buffer = wgpu::util::DeviceExt::create_buffer_init(
            device,
            &wgpu::util::BufferInitDescriptor {
                label: Some(&format!("{} Vertex Buffer", label)),
                contents: bytemuck::cast_slice(&vertices),
                usage: wgpu::BufferUsages::VERTEX,
            },
        );

        let index_buffer = wgpu::util::DeviceExt::create_buffer_init(
            device,
            &wgpu::util::BufferInitDescriptor {
                label: Some(&format!("{} Index Buffer", label)),
                contents: bytemuck::cast_slice(&geometry.indices),
                usage: wgpu::BufferUsages::INDEX,
            },
        );

        Self {
            vertex_buffer,
            index_buffer,
            index_count: geometry.indices.len() as u32,
        }
    }
}

/// Primitive meshes uploaded so far
#[derive(Default)]
pub struct MeshStore {
    meshes: HashMap<Primitive, GpuMesh>,
}

impl MeshStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Generates and uploads `primitive` unless it is already loaded
    pub fn load(&mut self, device: &wgpu::Device, primitive: Primitive) {
        if self.meshes.contains_key(&primitive) {
            return;
        }

        let geometry = generate_primitive(primitive);
        log::debug!(
            "Uploading {} mesh: {} vertices, {} triangles",
            primitive.name(),
            geometry.vertex_count(),
            geometry.triangle_count()
        );
        self.meshes
            .insert(primitive, GpuMesh::from_geometry(device, &geometry, primitive.name()));
    }

    pub fn get(&self, primitive: Primitive) -> Option<&GpuMesh> {
        self.meshes.get(&primitive)
    }

    pub fn is_loaded(&self, primitive: Primitive) -> bool {
        self.meshes.contains_key(&primitive)
    }

    pub fn len(&self) -> usize {
        self.meshes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.meshes.is_empty()
    }
}

pub trait DrawMesh {
    fn draw_gpu_mesh(&mut self, mesh: &GpuMesh);
}

impl DrawMesh for wgpu::RenderPass<'_> {
    fn draw_gpu_mesh(&mut self, mesh: &GpuMesh) {
        self.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
        self.set_index_buffer(mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        self.draw_indexed(0..mesh.index_count, 0, 0..1);
    }
}
