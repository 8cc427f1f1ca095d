//! Scene content: the ordered list of objects a scene draws each frame
//!
//! Each [`RenderStep`] describes one draw call and the state pushed to the
//! shader right before it. Steps are plain data; the
//! [`SceneManager`](super::scene::SceneManager) replays them in order.

use std::path::PathBuf;

use cgmath::Vector3;

use super::transform::TransformSpec;
use crate::gfx::{backend::CullFace, geometry::Primitive, resources::lighting::LightSource};

/// One draw call with the object state it needs
#[derive(Debug, Clone, PartialEq)]
pub struct RenderStep {
    /// Name used in log messages
    pub label: String,
    pub primitive: Primitive,
    pub transform: TransformSpec,
    /// RGBA in 0-255, uploaded before the texture (if any)
    pub color: Option<[i32; 4]>,
    pub texture: Option<String>,
    pub uv_scale: Option<(f32, f32)>,
    pub material: Option<String>,
    /// Faces culled for this draw only
    pub cull: Option<CullFace>,
}

impl RenderStep {
    /// Creates a step drawing `primitive` with an identity transform and no
    /// state overrides
    pub fn new(label: &str, primitive: Primitive) -> Self {
        Self {
            label: label.to_string(),
            primitive,
            transform: TransformSpec::default(),
            color: None,
            texture: None,
            uv_scale: None,
            material: None,
            cull: None,
        }
    }

    /// Builder pattern: Set scale
    pub fn with_scale(mut self, x: f32, y: f32, z: f32) -> Self {
        self.transform.scale = Vector3::new(x, y, z);
        self
    }

    /// Builder pattern: Set rotation about each axis, in degrees
    pub fn with_rotation(mut self, x: f32, y: f32, z: f32) -> Self {
        self.transform.rotation_degrees = Vector3::new(x, y, z);
        self
    }

    /// Builder pattern: Set position
    pub fn with_position(mut self, x: f32, y: f32, z: f32) -> Self {
        self.transform.translation = Vector3::new(x, y, z);
        self
    }

    /// Builder pattern: Set an opaque solid color
    pub fn with_color(self, r: i32, g: i32, b: i32) -> Self {
        self.with_color_rgba(r, g, b, 255)
    }

    pub fn with_color_rgba(mut self, r: i32, g: i32, b: i32, a: i32) -> Self {
        self.color = Some([r, g, b, a]);
        self
    }

    pub fn with_texture(mut self, tag: &str) -> Self {
        self.texture = Some(tag.to_string());
        self
    }

    pub fn with_uv_scale(mut self, u: f32, v: f32) -> Self {
        self.uv_scale = Some((u, v));
        self
    }

    pub fn with_material(mut self, tag: &str) -> Self {
        self.material = Some(tag.to_string());
        self
    }

    /// Builder pattern: Cull `face` while this step draws
    pub fn with_cull(mut self, face: CullFace) -> Self {
        self.cull = Some(face);
        self
    }
}

/// An image file registered under a tag during preparation
#[derive(Debug, Clone, PartialEq)]
pub struct TextureSource {
    pub path: PathBuf,
    pub tag: String,
}

impl TextureSource {
    pub fn new(path: impl Into<PathBuf>, tag: &str) -> Self {
        Self {
            path: path.into(),
            tag: tag.to_string(),
        }
    }
}

/// Everything a scene needs: textures to load, lights and the draw list
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SceneDescription {
    pub textures: Vec<TextureSource>,
    pub lights: Vec<LightSource>,
    pub steps: Vec<RenderStep>,
}

impl SceneDescription {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_texture(mut self, path: impl Into<PathBuf>, tag: &str) -> Self {
        self.textures.push(TextureSource::new(path, tag));
        self
    }

    pub fn with_light(mut self, light: LightSource) -> Self {
        self.lights.push(light);
        self
    }

    pub fn with_step(mut self, step: RenderStep) -> Self {
        self.steps.push(step);
        self
    }
}
