//! Light source definitions
//!
//! Lights are uploaded once while the scene is prepared and stay bound for
//! every frame that follows.

use cgmath::Vector3;

/// Number of `lightSources[i]` slots the scene shader declares
pub const MAX_LIGHT_SOURCES: usize = 4;

/// A point light as consumed by the scene shader
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightSource {
    pub position: Vector3<f32>,
    pub ambient_color: Vector3<f32>,
    pub diffuse_color: Vector3<f32>,
    pub specular_color: Vector3<f32>,
    /// Specular exponent of the highlight
    pub focal_strength: f32,
    pub specular_intensity: f32,
}

impl LightSource {
    pub fn new(position: Vector3<f32>) -> Self {
        Self {
            position,
            ambient_color: Vector3::new(0.0, 0.0, 0.0),
            diffuse_color: Vector3::new(1.0, 1.0, 1.0),
            specular_color: Vector3::new(1.0, 1.0, 1.0),
            focal_strength: 32.0,
            specular_intensity: 0.1,
        }
    }

    pub fn with_ambient(mut self, r: f32, g: f32, b: f32) -> Self {
        self.ambient_color = Vector3::new(r, g, b);
        self
    }

    pub fn with_diffuse(mut self, r: f32, g: f32, b: f32) -> Self {
        self.diffuse_color = Vector3::new(r, g, b);
        self
    }

    pub fn with_specular(mut self, r: f32, g: f32, b: f32) -> Self {
        self.specular_color = Vector3::new(r, g, b);
        self
    }

    pub fn with_focal_strength(mut self, focal_strength: f32) -> Self {
        self.focal_strength = focal_strength;
        self
    }

    pub fn with_specular_intensity(mut self, intensity: f32) -> Self {
        self.specular_intensity = intensity;
        self
    }
}

/// The two lights of the desk scene: a warm overhead key light and a cool
/// fill light from the back left that adds no ambient or specular term.
pub fn desk_lights() -> Vec<LightSource> {
    vec![
        LightSource::new(Vector3::new(3.0, 14.0, 0.0))
            .with_ambient(0.85, 0.75, 0.65)
            .with_diffuse(0.95, 0.85, 0.75)
            .with_specular(0.95, 0.85, 0.75)
            .with_focal_strength(32.0)
            .with_specular_intensity(0.05),
        LightSource::new(Vector3::new(-5.0, 10.0, 5.0))
            .with_ambient(0.0, 0.0, 0.0)
            .with_diffuse(0.75, 0.75, 0.85)
            .with_specular(0.0, 0.0, 0.0)
            .with_focal_strength(1.0)
            .with_specular_intensity(0.1),
    ]
}
