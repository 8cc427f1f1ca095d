//! # Shader Uniform Interface
//!
//! The scene layer talks to the shader program through one narrow contract:
//! "set this named uniform to this value". The names below are the wire
//! format between the scene layer and the fragment/vertex shader and must
//! be honored exactly.
//!
//! - [`ShaderProgram`] - the set-by-name contract implemented by backends
//! - [`UniformValue`] - the typed payload of a single uniform write
//! - [`ShaderUniformState`] - CPU mirror of every uniform the scene shader reads

pub mod uniforms;

pub use uniforms::{ShaderUniformState, UniformBlock};

use cgmath::{Matrix4, Vector2, Vector3, Vector4};
use thiserror::Error;

pub const MODEL: &str = "model";
pub const VIEW: &str = "view";
pub const PROJECTION: &str = "projection";
pub const VIEW_POSITION: &str = "viewPosition";
pub const OBJECT_COLOR: &str = "objectColor";
pub const OBJECT_TEXTURE: &str = "objectTexture";
pub const USE_TEXTURE: &str = "bUseTexture";
pub const USE_LIGHTING: &str = "bUseLighting";
pub const UV_SCALE: &str = "UVscale";

pub const MATERIAL_AMBIENT_COLOR: &str = "material.ambientColor";
pub const MATERIAL_AMBIENT_STRENGTH: &str = "material.ambientStrength";
pub const MATERIAL_DIFFUSE_COLOR: &str = "material.diffuseColor";
pub const MATERIAL_SPECULAR_COLOR: &str = "material.specularColor";
pub const MATERIAL_SHININESS: &str = "material.shininess";

/// Uniform name of one field of the light source at `index`,
/// e.g. `lightSources[1].focalStrength`.
pub fn light_source_uniform(index: usize, field: &str) -> String {
    format!("lightSources[{}].{}", index, field)
}

/// Value carried by a single uniform write
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UniformValue {
    Mat4(Matrix4<f32>),
    Vec4(Vector4<f32>),
    Vec3(Vector3<f32>),
    Vec2(Vector2<f32>),
    Float(f32),
    Int(i32),
    Bool(bool),
    /// Texture unit index a sampler reads from; -1 means unresolved
    Sampler2D(i32),
}

impl UniformValue {
    /// Short GLSL-style type name, used in diagnostics
    pub fn type_name(&self) -> &'static str {
        match self {
            UniformValue::Mat4(_) => "mat4",
            UniformValue::Vec4(_) => "vec4",
            UniformValue::Vec3(_) => "vec3",
            UniformValue::Vec2(_) => "vec2",
            UniformValue::Float(_) => "float",
            UniformValue::Int(_) => "int",
            UniformValue::Bool(_) => "bool",
            UniformValue::Sampler2D(_) => "sampler2D",
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum ShaderError {
    #[error("shader has no uniform named '{0}'")]
    UnknownUniform(String),
    #[error("uniform '{name}' expects a {expected} value, got {actual}")]
    TypeMismatch {
        name: String,
        expected: &'static str,
        actual: &'static str,
    },
}

/// A shader program that accepts uniform writes by name.
///
/// Writes take effect for every draw call issued after them and stay in
/// place until overwritten. Implementations never fail loudly: a write the
/// program cannot accept is reported through the log and dropped.
pub trait ShaderProgram {
    fn set_uniform(&mut self, name: &str, value: UniformValue);

    fn set_mat4(&mut self, name: &str, value: Matrix4<f32>) {
        self.set_uniform(name, UniformValue::Mat4(value));
    }

    fn set_vec4(&mut self, name: &str, value: Vector4<f32>) {
        self.set_uniform(name, UniformValue::Vec4(value));
    }

    fn set_vec3(&mut self, name: &str, value: Vector3<f32>) {
        self.set_uniform(name, UniformValue::Vec3(value));
    }

    fn set_vec2(&mut self, name: &str, value: Vector2<f32>) {
        self.set_uniform(name, UniformValue::Vec2(value));
    }

    fn set_float(&mut self, name: &str, value: f32) {
        self.set_uniform(name, UniformValue::Float(value));
    }

    fn set_int(&mut self, name: &str, value: i32) {
        self.set_uniform(name, UniformValue::Int(value));
    }

    fn set_bool(&mut self, name: &str, value: bool) {
        self.set_uniform(name, UniformValue::Bool(value));
    }

    fn set_sampler2d(&mut self, name: &str, unit: i32) {
        self.set_uniform(name, UniformValue::Sampler2D(unit));
    }
}
