//! Transformation composer
//!
//! Builds an object's model matrix from scale, per-axis rotation and
//! translation. The composition order is fixed at `T * Rx * Ry * Rz * S`:
//! scale first, then rotation about Z, Y and X, then translation. Authored
//! scene content depends on this order.

use cgmath::{Deg, Matrix4, Vector3};

use crate::gfx::shader::{self, ShaderProgram};

/// Scale, rotation and translation of one drawn object
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransformSpec {
    pub scale: Vector3<f32>,
    /// Independent rotations about the X, Y and Z axes, in degrees
    pub rotation_degrees: Vector3<f32>,
    pub translation: Vector3<f32>,
}

impl Default for TransformSpec {
    fn default() -> Self {
        Self {
            scale: Vector3::new(1.0, 1.0, 1.0),
            rotation_degrees: Vector3::new(0.0, 0.0, 0.0),
            translation: Vector3::new(0.0, 0.0, 0.0),
        }
    }
}

impl TransformSpec {
    pub fn new(scale: Vector3<f32>, rotation_degrees: Vector3<f32>, translation: Vector3<f32>) -> Self {
        Self {
            scale,
            rotation_degrees,
            translation,
        }
    }

    pub fn model_matrix(&self) -> Matrix4<f32> {
        compose(self.scale, self.rotation_degrees, self.translation)
    }
}

/// Composes `T * Rx * Ry * Rz * S`
pub fn compose(
    scale: Vector3<f32>,
    rotation_degrees: Vector3<f32>,
    translation: Vector3<f32>,
) -> Matrix4<f32> {
    let s = Matrix4::from_nonuniform_scale(scale.x, scale.y, scale.z);
    let rx = Matrix4::from_angle_x(Deg(rotation_degrees.x));
    let ry = Matrix4::from_angle_y(Deg(rotation_degrees.y));
    let rz = Matrix4::from_angle_z(Deg(rotation_degrees.z));
    let t = Matrix4::from_translation(translation);

    t * rx * ry * rz * s // Order matters
}

/// Composes the model matrix for `spec` and uploads it to the `model` uniform
pub fn set_transformations<S>(shader: &mut S, spec: &TransformSpec) -> Matrix4<f32>
where
    S: ShaderProgram + ?Sized,
{
    let model = spec.model_matrix();
    shader.set_mat4(shader::MODEL, model);
    model
}
