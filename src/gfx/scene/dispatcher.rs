//! Shader state dispatcher
//!
//! Pushes per-object color, texture, UV scale and material state into the
//! shader's named uniforms. The dispatcher holds the only mutable borrow of
//! the shader while it exists, so every write between two draw calls goes
//! through one writer in program order.

use std::fmt::Debug;

use cgmath::{Vector2, Vector4};

use super::scene::SceneError;
use crate::gfx::{
    resources::{
        lighting::{LightSource, MAX_LIGHT_SOURCES},
        material::MaterialRegistry,
        texture_registry::TextureRegistry,
    },
    shader::{self, light_source_uniform, ShaderProgram},
};

/// Texture unit uploaded when a texture tag does not resolve
pub const UNRESOLVED_TEXTURE_SLOT: i32 = -1;

/// Writes object state into a shader, resolving tags through the registries
pub struct ShaderStateDispatcher<'a, S: ?Sized, H> {
    shader: &'a mut S,
    textures: &'a TextureRegistry<H>,
    materials: &'a MaterialRegistry,
}

impl<'a, S, H> ShaderStateDispatcher<'a, S, H>
where
    S: ShaderProgram + ?Sized,
    H: Copy + Debug + PartialEq,
{
    pub fn new(
        shader: &'a mut S,
        textures: &'a TextureRegistry<H>,
        materials: &'a MaterialRegistry,
    ) -> Self {
        Self {
            shader,
            textures,
            materials,
        }
    }

    /// Gives the composer and other direct writers access to the shader
    pub fn shader(&mut self) -> &mut S {
        &mut *self.shader
    }

    /// Switches the next draw to a solid color
    ///
    /// # Arguments
    /// * `r`, `g`, `b`, `a` - Channels in 0-255; out of range values are clamped
    ///
    /// # Returns
    /// The normalized color that was uploaded
    pub fn set_color(&mut self, r: i32, g: i32, b: i32, a: i32) -> Vector4<f32> {
        let color = Vector4::new(
            normalize_channel(r),
            normalize_channel(g),
            normalize_channel(b),
            normalize_channel(a),
        );

        self.shader.set_bool(shader::USE_TEXTURE, false);
        self.shader.set_vec4(shader::OBJECT_COLOR, color);
        color
    }

    /// Opaque solid color
    pub fn set_color_rgb(&mut self, r: i32, g: i32, b: i32) -> Vector4<f32> {
        self.set_color(r, g, b, 255)
    }

    /// Switches the next draw to the texture registered under `tag`
    ///
    /// An unknown tag uploads [`UNRESOLVED_TEXTURE_SLOT`]; the renderer then
    /// falls back to the current solid color.
    ///
    /// # Returns
    /// The texture unit uploaded, if the tag resolved
    pub fn set_texture(&mut self, tag: &str) -> Option<usize> {
        let slot = self.textures.find_slot(tag);
        if slot.is_none() {
            log::warn!("No texture registered under '{}', drawing untextured", tag);
        }

        self.shader.set_bool(shader::USE_TEXTURE, true);
        self.shader.set_sampler2d(
            shader::OBJECT_TEXTURE,
            slot.map_or(UNRESOLVED_TEXTURE_SLOT, |slot| slot as i32),
        );
        slot
    }

    pub fn set_uv_scale(&mut self, u: f32, v: f32) {
        self.shader.set_vec2(shader::UV_SCALE, Vector2::new(u, v));
    }

    /// Uploads the material registered under `tag`
    ///
    /// A miss leaves the previously uploaded material in place.
    ///
    /// # Returns
    /// Whether the tag resolved
    pub fn set_material(&mut self, tag: &str) -> bool {
        let Some(material) = self.materials.find(tag) else {
            log::warn!(
                "No material registered under '{}', keeping the previous material",
                tag
            );
            return false;
        };

        self.shader
            .set_vec3(shader::MATERIAL_AMBIENT_COLOR, material.ambient_color);
        self.shader
            .set_float(shader::MATERIAL_AMBIENT_STRENGTH, material.ambient_strength);
        self.shader
            .set_vec3(shader::MATERIAL_DIFFUSE_COLOR, material.diffuse_color);
        self.shader
            .set_vec3(shader::MATERIAL_SPECULAR_COLOR, material.specular_color);
        self.shader
            .set_float(shader::MATERIAL_SHININESS, material.shininess);
        true
    }

    /// Uploads every light to its `lightSources[i]` slot and enables lighting
    ///
    /// # Errors
    /// `TooManyLights` when `lights` has more entries than the shader declares.
    /// Nothing is uploaded in that case.
    pub fn setup_lights(&mut self, lights: &[LightSource]) -> Result<(), SceneError> {
        if lights.len() > MAX_LIGHT_SOURCES {
            return Err(SceneError::TooManyLights {
                count: lights.len(),
                max: MAX_LIGHT_SOURCES,
            });
        }

        for (index, light) in lights.iter().enumerate() {
            let name = |field: &str| light_source_uniform(index, field);
            self.shader.set_vec3(&name("position"), light.position);
            self.shader.set_vec3(&name("ambientColor"), light.ambient_color);
            self.shader.set_vec3(&name("diffuseColor"), light.diffuse_color);
            self.shader.set_vec3(&name("specularColor"), light.specular_color);
            self.shader.set_float(&name("focalStrength"), light.focal_strength);
            self.shader
                .set_float(&name("specularIntensity"), light.specular_intensity);
        }

        self.shader.set_bool(shader::USE_LIGHTING, true);
        log::debug!("Uploaded {} light sources", lights.len());
        Ok(())
    }
}

fn normalize_channel(value: i32) -> f32 {
    value.clamp(0, 255) as f32 / 255.0
}
