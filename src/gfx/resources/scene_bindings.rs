//! Bind groups of the scene shader
//!
//! Group 0 holds the per-draw [`UniformBlock`], selected through a dynamic
//! offset. Group 1 holds the sampled texture and its sampler; every uploaded
//! texture gets its own bind group.

use super::texture_resource::TextureResource;
use crate::{
    gfx::shader::UniformBlock,
    wgpu_utils::{binding_types, DynamicUniformBuffer},
};

/// Type alias for the per-draw uniform storage
pub type SceneUniformBuffer = DynamicUniformBuffer<UniformBlock>;

/// Layouts and the uniform bind group shared by every scene draw
pub struct SceneBindings {
    uniform_layout: wgpu::BindGroupLayout,
    texture_layout: wgpu::BindGroupLayout,
    uniform_bind_group: wgpu::BindGroup,
}

impl SceneBindings {
    /// Creates both layouts and binds `uniforms` to group 0
    ///
    /// # Arguments
    /// * `device` - WGPU device for creating resources
    /// * `uniforms` - Per-draw uniform buffer
    pub fn new(device: &wgpu::Device, uniforms: &SceneUniformBuffer) -> Self {
        let uniform_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Scene Uniform Layout"),
            entries: &[binding_types::rendering_entry(
                0,
                binding_types::uniform_dynamic::<UniformBlock>(),
            )],
        });

        let texture_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Scene Texture Layout"),
            entries: &[
                binding_types::rendering_entry(0, binding_types::texture_2d()),
                binding_types::rendering_entry(
                    1,
                    binding_types::sampler(wgpu::SamplerBindingType::Filtering),
                ),
            ],
        });

        let uniform_bind_group = Self::create_uniform_bind_group(device, &uniform_layout, uniforms);

        SceneBindings {
            uniform_layout,
            texture_layout,
            uniform_bind_group,
        }
    }

    fn create_uniform_bind_group(
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        uniforms: &SceneUniformBuffer,
    ) -> wgpu::BindGroup {
        device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Scene Uniform Bind Group"),
            layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniforms.binding_resource(),
            }],
        })
    }

    /// Rebinds group 0 after the uniform buffer was recreated
    pub fn rebind_uniforms(&mut self, device: &wgpu::Device, uniforms: &SceneUniformBuffer) {
        self.uniform_bind_group =
            Self::create_uniform_bind_group(device, &self.uniform_layout, uniforms);
    }

    /// Creates the group 1 bind group sampling `texture`
    pub fn create_texture_bind_group(
        &self,
        device: &wgpu::Device,
        texture: &TextureResource,
        label: &str,
    ) -> wgpu::BindGroup {
        device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(label),
            layout: &self.texture_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&texture.view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&texture.sampler),
                },
            ],
        })
    }

    /// Returns the layouts in group order, for pipeline creation
    pub fn bind_group_layouts(&self) -> Vec<wgpu::BindGroupLayout> {
        vec![self.uniform_layout.clone(), self.texture_layout.clone()]
    }

    pub fn uniform_bind_group(&self) -> &wgpu::BindGroup {
        &self.uniform_bind_group
    }
}
