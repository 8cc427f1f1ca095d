//! Test support: a backend that records every call the scene layer makes

use std::{
    cell::RefCell,
    path::{Path, PathBuf},
    rc::Rc,
};

use image::{Rgb, RgbImage};

use crate::gfx::{
    backend::{CullFace, MeshLibrary, RasterState, TextureBackend},
    geometry::Primitive,
    resources::{image_loader::DecodedImage, texture_registry::TextureError},
    shader::{ShaderProgram, ShaderUniformState, UniformValue},
};

/// Texture size limit of a fresh [`RecordingBackend`]
pub const RECORDING_MAX_TEXTURE_DIMENSION: u32 = 4096;

#[derive(Debug, Clone, PartialEq)]
pub enum BackendCall {
    Uniform { name: String, value: UniformValue },
    CreateTexture { label: String, width: u32, height: u32 },
    BindTexture { slot: usize, handle: u32 },
    ReleaseTexture(u32),
    LoadMesh(Primitive),
    DrawMesh(Primitive),
    FaceCulling(Option<CullFace>),
}

/// Call log that outlives the backend it was taken from
pub type SharedCallLog = Rc<RefCell<Vec<BackendCall>>>;

/// Records calls in order and mirrors uniform writes into a
/// [`ShaderUniformState`]
#[derive(Debug)]
pub struct RecordingBackend {
    calls: Vec<BackendCall>,
    shared: Option<SharedCallLog>,
    pub state: ShaderUniformState,
    next_handle: u32,
    max_texture_dimension: u32,
}

impl Default for RecordingBackend {
    fn default() -> Self {
        Self {
            calls: Vec::new(),
            shared: None,
            state: ShaderUniformState::default(),
            next_handle: 0,
            max_texture_dimension: RECORDING_MAX_TEXTURE_DIMENSION,
        }
    }
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rejects textures wider or taller than `max`, like a GPU with a
    /// smaller `max_texture_dimension_2d`
    pub fn with_max_texture_dimension(mut self, max: u32) -> Self {
        self.max_texture_dimension = max;
        self
    }

    /// Starts copying every later call into a log the caller keeps, so calls
    /// made while the backend is dropped stay observable
    pub fn share_log(&mut self) -> SharedCallLog {
        let log = SharedCallLog::default();
        self.shared = Some(log.clone());
        log
    }

    pub fn calls(&self) -> &[BackendCall] {
        &self.calls
    }

    pub fn clear_calls(&mut self) {
        self.calls.clear();
    }

    pub fn textures_created(&self) -> usize {
        self.calls
            .iter()
            .filter(|call| matches!(call, BackendCall::CreateTexture { .. }))
            .count()
    }

    pub fn draws(&self) -> Vec<Primitive> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                BackendCall::DrawMesh(primitive) => Some(*primitive),
                _ => None,
            })
            .collect()
    }

    /// Last value written to the uniform `name`
    pub fn last_uniform(&self, name: &str) -> Option<UniformValue> {
        self.calls.iter().rev().find_map(|call| match call {
            BackendCall::Uniform { name: n, value } if n == name => Some(*value),
            _ => None,
        })
    }

    pub fn uniform_writes(&self) -> usize {
        self.calls
            .iter()
            .filter(|call| matches!(call, BackendCall::Uniform { .. }))
            .count()
    }

    fn record(&mut self, call: BackendCall) {
        if let Some(shared) = &self.shared {
            shared.borrow_mut().push(call.clone());
        }
        self.calls.push(call);
    }
}

impl ShaderProgram for RecordingBackend {
    fn set_uniform(&mut self, name: &str, value: UniformValue) {
        self.state.set_uniform(name, value);
        self.record(BackendCall::Uniform {
            name: name.to_string(),
            value,
        });
    }
}

impl TextureBackend for RecordingBackend {
    type TextureHandle = u32;

    fn create_texture(&mut self, image: &DecodedImage, label: &str) -> Result<u32, TextureError> {
        if image.width > self.max_texture_dimension || image.height > self.max_texture_dimension {
            return Err(TextureError::TooLarge {
                label: label.to_string(),
                width: image.width,
                height: image.height,
                max: self.max_texture_dimension,
            });
        }

        self.next_handle += 1;
        self.record(BackendCall::CreateTexture {
            label: label.to_string(),
            width: image.width,
            height: image.height,
        });
        Ok(self.next_handle)
    }

    fn bind_texture_unit(&mut self, slot: usize, handle: u32) {
        self.record(BackendCall::BindTexture { slot, handle });
    }

    fn release_texture(&mut self, handle: u32) {
        self.record(BackendCall::ReleaseTexture(handle));
    }
}

impl MeshLibrary for RecordingBackend {
    fn load_mesh(&mut self, primitive: Primitive) {
        self.record(BackendCall::LoadMesh(primitive));
    }

    fn draw_mesh(&mut self, primitive: Primitive) {
        self.record(BackendCall::DrawMesh(primitive));
    }
}

impl RasterState for RecordingBackend {
    fn set_face_culling(&mut self, face: Option<CullFace>) {
        self.record(BackendCall::FaceCulling(face));
    }
}

/// Writes a small 4x2 RGB image named `name` into `dir`
pub fn write_rgb_image(dir: &Path, name: &str) -> PathBuf {
    let path = dir.join(name);
    RgbImage::from_fn(4, 2, |x, y| Rgb([x as u8 * 60, y as u8 * 120, 200]))
        .save(&path)
        .expect("fixture image should be writable");
    path
}
