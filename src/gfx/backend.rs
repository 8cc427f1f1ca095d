//! Collaborator seams between the scene layer and the GPU
//!
//! The scene layer never touches the graphics API directly. It drives a
//! [`RenderBackend`], which bundles the four things a scene needs from the
//! GPU: named uniform writes, texture objects bound to units, mesh upload
//! and draw, and face-culling state.

use std::fmt::Debug;

use crate::gfx::{
    geometry::Primitive,
    resources::{image_loader::DecodedImage, texture_registry::TextureError},
    shader::ShaderProgram,
};

/// Which polygon faces are discarded while culling is enabled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CullFace {
    Front,
    Back,
}

/// Creates, binds and releases GPU texture objects
pub trait TextureBackend {
    /// Opaque GPU texture identifier
    type TextureHandle: Copy + Debug + PartialEq;

    /// Uploads decoded pixels as a 2D texture with repeat wrapping, linear
    /// filtering and a full mip chain.
    ///
    /// # Errors
    /// `TextureError::TooLarge` when either side exceeds the largest texture
    /// the GPU accepts. Nothing is allocated in that case.
    fn create_texture(
        &mut self,
        image: &DecodedImage,
        label: &str,
    ) -> Result<Self::TextureHandle, TextureError>;

    /// Makes `handle` the texture sampled through texture unit `slot`
    fn bind_texture_unit(&mut self, slot: usize, handle: Self::TextureHandle);

    fn release_texture(&mut self, handle: Self::TextureHandle);
}

/// One shared set of primitive meshes
pub trait MeshLibrary {
    /// Uploads the vertex data for `primitive`. Loading the same primitive
    /// again is a no-op.
    fn load_mesh(&mut self, primitive: Primitive);

    /// Draws `primitive` with the currently bound shader state
    fn draw_mesh(&mut self, primitive: Primitive);
}

/// Fixed-function rasterizer state toggled around individual draws
pub trait RasterState {
    /// `None` disables face culling
    fn set_face_culling(&mut self, face: Option<CullFace>);
}

/// Everything the scene layer needs from the GPU
pub trait RenderBackend: ShaderProgram + TextureBackend + MeshLibrary + RasterState {}

impl<T> RenderBackend for T where T: ShaderProgram + TextureBackend + MeshLibrary + RasterState {}
