//! CPU-side mirror of the scene shader's uniforms
//!
//! Every uniform write is parsed by name into a typed field. When a draw is
//! issued the backend snapshots the mirror into a [`UniformBlock`] whose
//! layout matches the `SceneUniforms` struct in `scene.wgsl` exactly.

use cgmath::{Matrix4, SquareMatrix, Vector2, Vector3, Vector4};

use super::{ShaderError, ShaderProgram, UniformValue};
use crate::gfx::resources::lighting::MAX_LIGHT_SOURCES;

/// Material coefficients as laid out in the uniform block (48 bytes)
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MaterialBlock {
    pub ambient_color: [f32; 3],
    pub ambient_strength: f32,
    pub diffuse_color: [f32; 3],
    pub shininess: f32,
    pub specular_color: [f32; 3],
    _padding: f32,
}

/// One light source as laid out in the uniform block (64 bytes)
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct LightBlock {
    pub position: [f32; 3],
    pub focal_strength: f32,
    pub ambient_color: [f32; 3],
    pub specular_intensity: f32,
    pub diffuse_color: [f32; 3],
    _padding0: f32,
    pub specular_color: [f32; 3],
    _padding1: f32,
}

/// Uniform buffer content for one draw call.
/// MUST match the SceneUniforms struct in scene.wgsl exactly.
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct UniformBlock {
    pub model: [[f32; 4]; 4],
    pub view: [[f32; 4]; 4],
    pub projection: [[f32; 4]; 4],
    pub object_color: [f32; 4],
    pub view_position: [f32; 3],
    pub use_texture: u32,
    pub uv_scale: [f32; 2],
    pub use_lighting: u32,
    pub light_count: u32,
    pub material: MaterialBlock,
    pub lights: [LightBlock; MAX_LIGHT_SOURCES],
}
// 3 * 64 + 16 + 16 + 16 + 48 + 4 * 64 = 544 bytes

/// Every uniform the scene shader reads, in typed form
#[derive(Debug, Clone, PartialEq)]
pub struct ShaderUniformState {
    pub model: Matrix4<f32>,
    pub view: Matrix4<f32>,
    pub projection: Matrix4<f32>,
    pub view_position: Vector3<f32>,
    pub object_color: Vector4<f32>,
    /// Texture unit the sampler reads from, -1 when unresolved
    pub object_texture: i32,
    pub use_texture: bool,
    pub use_lighting: bool,
    pub uv_scale: Vector2<f32>,
    pub material: MaterialBlock,
    pub lights: [LightBlock; MAX_LIGHT_SOURCES],
    /// Number of leading light slots that have received at least one write
    pub light_count: usize,
}

impl Default for ShaderUniformState {
    fn default() -> Self {
        Self {
            model: Matrix4::identity(),
            view: Matrix4::identity(),
            projection: Matrix4::identity(),
            view_position: Vector3::new(0.0, 0.0, 0.0),
            object_color: Vector4::new(1.0, 1.0, 1.0, 1.0),
            object_texture: -1,
            use_texture: false,
            use_lighting: false,
            uv_scale: Vector2::new(1.0, 1.0),
            material: MaterialBlock::default(),
            lights: [LightBlock::default(); MAX_LIGHT_SOURCES],
            light_count: 0,
        }
    }
}

impl ShaderUniformState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies one uniform write, rejecting unknown names and mismatched types
    pub fn set(&mut self, name: &str, value: UniformValue) -> Result<(), ShaderError> {
        if let Some(field) = name.strip_prefix("material.") {
            return self.set_material_field(name, field, value);
        }
        if name.starts_with("lightSources[") {
            return self.set_light_field(name, value);
        }

        match name {
            super::MODEL => self.model = expect_mat4(name, value)?,
            super::VIEW => self.view = expect_mat4(name, value)?,
            super::PROJECTION => self.projection = expect_mat4(name, value)?,
            super::VIEW_POSITION => self.view_position = expect_vec3(name, value)?,
            super::OBJECT_COLOR => self.object_color = expect_vec4(name, value)?,
            super::OBJECT_TEXTURE => self.object_texture = expect_sampler(name, value)?,
            super::USE_TEXTURE => self.use_texture = expect_bool(name, value)?,
            super::USE_LIGHTING => self.use_lighting = expect_bool(name, value)?,
            super::UV_SCALE => self.uv_scale = expect_vec2(name, value)?,
            _ => return Err(ShaderError::UnknownUniform(name.to_string())),
        }
        Ok(())
    }

    fn set_material_field(
        &mut self,
        name: &str,
        field: &str,
        value: UniformValue,
    ) -> Result<(), ShaderError> {
        let material = &mut self.material;
        match field {
            "ambientColor" => material.ambient_color = expect_vec3(name, value)?.into(),
            "ambientStrength" => material.ambient_strength = expect_float(name, value)?,
            "diffuseColor" => material.diffuse_color = expect_vec3(name, value)?.into(),
            "specularColor" => material.specular_color = expect_vec3(name, value)?.into(),
            "shininess" => material.shininess = expect_float(name, value)?,
            _ => return Err(ShaderError::UnknownUniform(name.to_string())),
        }
        Ok(())
    }

    fn set_light_field(&mut self, name: &str, value: UniformValue) -> Result<(), ShaderError> {
        let unknown = || ShaderError::UnknownUniform(name.to_string());

        let rest = &name["lightSources[".len()..];
        let (index, field) = rest.split_once("].").ok_or_else(unknown)?;
        let index: usize = index.parse().map_err(|_| unknown())?;
        if index >= MAX_LIGHT_SOURCES {
            return Err(unknown());
        }

        let light = &mut self.lights[index];
        match field {
            "position" => light.position = expect_vec3(name, value)?.into(),
            "ambientColor" => light.ambient_color = expect_vec3(name, value)?.into(),
            "diffuseColor" => light.diffuse_color = expect_vec3(name, value)?.into(),
            "specularColor" => light.specular_color = expect_vec3(name, value)?.into(),
            "focalStrength" => light.focal_strength = expect_float(name, value)?,
            "specularIntensity" => light.specular_intensity = expect_float(name, value)?,
            _ => return Err(unknown()),
        }

        self.light_count = self.light_count.max(index + 1);
        Ok(())
    }

    /// Snapshots the current state into GPU layout
    pub fn uniform_block(&self) -> UniformBlock {
        UniformBlock {
            model: self.model.into(),
            view: self.view.into(),
            projection: self.projection.into(),
            object_color: self.object_color.into(),
            view_position: self.view_position.into(),
            use_texture: self.use_texture as u32,
            uv_scale: self.uv_scale.into(),
            use_lighting: self.use_lighting as u32,
            light_count: self.light_count as u32,
            material: self.material,
            lights: self.lights,
        }
    }
}

impl ShaderProgram for ShaderUniformState {
    fn set_uniform(&mut self, name: &str, value: UniformValue) {
        if let Err(err) = self.set(name, value) {
            log::warn!("Dropped uniform write: {}", err);
        }
    }
}

fn mismatch(name: &str, expected: &'static str, value: UniformValue) -> ShaderError {
    ShaderError::TypeMismatch {
        name: name.to_string(),
        expected,
        actual: value.type_name(),
    }
}

fn expect_mat4(name: &str, value: UniformValue) -> Result<Matrix4<f32>, ShaderError> {
    match value {
        UniformValue::Mat4(m) => Ok(m),
        other => Err(mismatch(name, "mat4", other)),
    }
}

fn expect_vec4(name: &str, value: UniformValue) -> Result<Vector4<f32>, ShaderError> {
    match value {
        UniformValue::Vec4(v) => Ok(v),
        other => Err(mismatch(name, "vec4", other)),
    }
}

fn expect_vec3(name: &str, value: UniformValue) -> Result<Vector3<f32>, ShaderError> {
    match value {
        UniformValue::Vec3(v) => Ok(v),
        other => Err(mismatch(name, "vec3", other)),
    }
}

fn expect_vec2(name: &str, value: UniformValue) -> Result<Vector2<f32>, ShaderError> {
    match value {
        UniformValue::Vec2(v) => Ok(v),
        other => Err(mismatch(name, "vec2", other)),
    }
}

fn expect_float(name: &str, value: UniformValue) -> Result<f32, ShaderError> {
    match value {
        UniformValue::Float(f) => Ok(f),
        other => Err(mismatch(name, "float", other)),
    }
}

// Boolean flags are also written as ints (0/1), the way GLSL bools are fed.
fn expect_bool(name: &str, value: UniformValue) -> Result<bool, ShaderError> {
    match value {
        UniformValue::Bool(b) => Ok(b),
        UniformValue::Int(i) => Ok(i != 0),
        other => Err(mismatch(name, "bool", other)),
    }
}

fn expect_sampler(name: &str, value: UniformValue) -> Result<i32, ShaderError> {
    match value {
        UniformValue::Sampler2D(unit) | UniformValue::Int(unit) => Ok(unit),
        other => Err(mismatch(name, "sampler2D", other)),
    }
}
