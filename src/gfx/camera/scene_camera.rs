use cgmath::*;

use crate::gfx::shader::{self, ShaderProgram};

/// Maps OpenGL clip space (z in [-1, 1]) to wgpu clip space (z in [0, 1])
#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: cgmath::Matrix4<f32> = cgmath::Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.5,
    0.0, 0.0, 0.0, 1.0,
);

/// Fixed perspective camera looking at the scene
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneCamera {
    pub eye: Point3<f32>,
    pub target: Point3<f32>,
    pub up: Vector3<f32>,
    pub fovy: Deg<f32>,
    pub aspect: f32,
    pub znear: f32,
    pub zfar: f32,
}

impl SceneCamera {
    pub fn new(eye: Point3<f32>, target: Point3<f32>, aspect: f32) -> Self {
        Self {
            eye,
            target,
            up: Vector3::unit_y(),
            fovy: Deg(45.0),
            aspect,
            znear: 0.1,
            zfar: 100.0,
        }
    }

    /// Camera framing the desk scene from the front and slightly above
    pub fn desk(aspect: f32) -> Self {
        Self::new(Point3::new(0.0, 6.0, 14.0), Point3::new(-1.0, 0.5, 0.0), aspect)
    }

    /// Updates the aspect ratio after a resize; zero-sized surfaces are ignored
    pub fn set_aspect(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.aspect = width as f32 / height as f32;
        }
    }

    pub fn view_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_at_rh(self.eye, self.target, self.up)
    }

    pub fn projection_matrix(&self) -> Matrix4<f32> {
        OPENGL_TO_WGPU_MATRIX * perspective(self.fovy, self.aspect, self.znear, self.zfar)
    }

    /// Uploads `view`, `projection` and `viewPosition`
    pub fn upload<S: ShaderProgram + ?Sized>(&self, shader: &mut S) {
        shader.set_mat4(shader::VIEW, self.view_matrix());
        shader.set_mat4(shader::PROJECTION, self.projection_matrix());
        shader.set_vec3(shader::VIEW_POSITION, self.eye.to_vec());
    }
}
