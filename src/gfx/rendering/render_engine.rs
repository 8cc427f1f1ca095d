//! WGPU-based rendering backend
//!
//! The scene layer writes uniforms by name and issues draws one at a time,
//! the way an immediate-mode API works. wgpu records whole passes instead,
//! so every `draw_mesh` snapshots the current uniform state, the texture it
//! samples and the cull mode into a [`DrawRecord`]. `present_frame` uploads
//! all snapshots into one dynamic-offset uniform buffer and replays them in
//! order inside a single render pass.

use std::{collections::HashMap, sync::Arc};

use thiserror::Error;
use wgpu::TextureFormat;

use crate::gfx::{
    backend::{CullFace, MeshLibrary, RasterState, TextureBackend},
    geometry::Primitive,
    resources::{
        image_loader::DecodedImage,
        scene_bindings::{SceneBindings, SceneUniformBuffer},
        texture_registry::{TextureError, MAX_TEXTURE_UNITS},
        texture_resource::TextureResource,
    },
    shader::{ShaderProgram, ShaderUniformState, UniformBlock, UniformValue},
};

use super::mesh_store::{DrawMesh, MeshStore};
use super::pipeline_manager::{PipelineConfig, PipelineError, PipelineManager};

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to create window surface: {0}")]
    CreateSurface(#[from] wgpu::CreateSurfaceError),
    #[error("no compatible GPU adapter: {0}")]
    RequestAdapter(#[from] wgpu::RequestAdapterError),
    #[error("failed to open GPU device: {0}")]
    RequestDevice(#[from] wgpu::RequestDeviceError),
    #[error("surface supports no texture formats on this adapter")]
    NoSurfaceFormat,
    #[error("failed to acquire the next frame: {0}")]
    Surface(#[from] wgpu::SurfaceError),
    #[error("failed to build render pipelines: {0:?}")]
    Pipelines(Vec<PipelineError>),
}

/// Handle of a texture owned by the [`RenderEngine`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureId(u32);

struct GpuTexture {
    resource: TextureResource,
    bind_group: wgpu::BindGroup,
}

/// Everything one recorded draw call needs at replay time
#[derive(Debug, Clone, Copy)]
pub struct DrawRecord {
    pub primitive: Primitive,
    pub uniforms: UniformBlock,
    /// Sampled texture; `None` samples the white fallback
    pub texture: Option<TextureId>,
    pub cull: Option<CullFace>,
}

/// Core rendering engine managing GPU resources and draw calls
pub struct RenderEngine {
    surface: wgpu::Surface<'static>,
    device: Arc<wgpu::Device>,
    queue: Arc<wgpu::Queue>,
    config: wgpu::SurfaceConfiguration,
    depth_texture: TextureResource,
    format: TextureFormat,
    pipeline_manager: PipelineManager,
    bindings: SceneBindings,
    uniforms: SceneUniformBuffer,
    clear_color: wgpu::Color,

    state: ShaderUniformState,
    cull: Option<CullFace>,
    texture_units: [Option<TextureId>; MAX_TEXTURE_UNITS],
    textures: HashMap<TextureId, GpuTexture>,
    next_texture_id: u32,
    white: GpuTexture,
    meshes: MeshStore,
    draws: Vec<DrawRecord>,
}

impl RenderEngine {
    /// Creates a new render engine for the given window
    ///
    /// # Arguments
    /// * `window` - Window surface target for rendering
    /// * `width` - Initial surface width in pixels
    /// * `height` - Initial surface height in pixels
    ///
    /// # Errors
    /// Fails when no adapter or device is available for the surface, or the
    /// scene pipelines cannot be built.
    pub async fn new(
        window: impl Into<wgpu::SurfaceTarget<'static>>,
        width: u32,
        height: u32,
    ) -> Result<RenderEngine, RenderError> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });
        let surface = instance.create_surface(window)?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await?;
        log::info!("Using adapter {:?}", adapter.get_info().name);

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("WGPU Device"),
                required_features: wgpu::Features::default(),
                required_limits: wgpu::Limits {
                    max_texture_dimension_2d: 4096,
                    ..wgpu::Limits::downlevel_defaults()
                },
                memory_hints: wgpu::MemoryHints::default(),
                trace: wgpu::Trace::Off,
            })
            .await?;

        let surface_capabilities = surface.get_capabilities(&adapter);
        let format = surface_capabilities
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .or_else(|| surface_capabilities.formats.first().copied())
            .ok_or(RenderError::NoSurfaceFormat)?;

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: width.max(1),
            height: height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: surface_capabilities
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let depth_texture =
            TextureResource::create_depth_texture(&device, &config, "depth_texture");

        let uniforms = SceneUniformBuffer::new(&device, 16);
        let bindings = SceneBindings::new(&device, &uniforms);

        let white_resource = TextureResource::white(&device, &queue);
        let white = GpuTexture {
            bind_group: bindings.create_texture_bind_group(&device, &white_resource, "White Fallback"),
            resource: white_resource,
        };

        let device_handle: Arc<wgpu::Device> = device.into();
        let queue_handle: Arc<wgpu::Queue> = queue.into();
        let mut pipeline_manager = PipelineManager::new(device_handle.clone());
        pipeline_manager.load_shader("scene", include_str!("scene.wgsl"));

        for cull in [None, Some(CullFace::Front), Some(CullFace::Back)] {
            pipeline_manager.register_pipeline(
                pipeline_name(cull),
                PipelineConfig::default()
                    .with_label(pipeline_name(cull))
                    .with_shader("scene")
                    .with_cull_mode(cull.map(wgpu_face))
                    .with_depth_format(TextureResource::DEPTH_FORMAT)
                    .with_bind_group_layouts(bindings.bind_group_layouts())
                    .with_color_targets(vec![Some(wgpu::ColorTargetState {
                        format,
                        blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                        write_mask: wgpu::ColorWrites::ALL,
                    })]),
            );
        }
        pipeline_manager
            .create_all_pipelines()
            .map_err(RenderError::Pipelines)?;

        Ok(RenderEngine {
            surface,
            device: device_handle,
            queue: queue_handle,
            config,
            depth_texture,
            format,
            pipeline_manager,
            bindings,
            uniforms,
            clear_color: wgpu::Color {
                r: 0.1,
                g: 0.1,
                b: 0.12,
                a: 1.0,
            },
            state: ShaderUniformState::new(),
            cull: None,
            texture_units: [None; MAX_TEXTURE_UNITS],
            textures: HashMap::new(),
            next_texture_id: 0,
            white,
            meshes: MeshStore::new(),
            draws: Vec::new(),
        })
    }

    /// Replays every draw recorded since the last frame and presents it
    ///
    /// A frame that cannot be acquired is dropped; a lost or outdated surface
    /// is reconfigured first. Only running out of memory is an error.
    pub fn present_frame(&mut self) -> Result<(), RenderError> {
        let surface_texture = match self.surface.get_current_texture() {
            Ok(texture) => texture,
            Err(err) => {
                self.draws.clear();
                return match surface_recovery(&err) {
                    SurfaceRecovery::Reconfigure => {
                        log::warn!("Reconfiguring surface: {}", err);
                        self.surface.configure(&self.device, &self.config);
                        Ok(())
                    }
                    SurfaceRecovery::SkipFrame => {
                        log::warn!("Skipping frame: {}", err);
                        Ok(())
                    }
                    SurfaceRecovery::Fatal => Err(err.into()),
                };
            }
        };

        let surface_texture_view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let blocks: Vec<UniformBlock> = self.draws.iter().map(|draw| draw.uniforms).collect();
        if self.uniforms.write_all(&self.device, &self.queue, &blocks) {
            log::debug!("Grew uniform buffer to {} draws", self.uniforms.capacity());
            self.bindings.rebind_uniforms(&self.device, &self.uniforms);
        }

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Scene Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &surface_texture_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.clear_color),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_texture.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            for (index, draw) in self.draws.iter().enumerate() {
                let Some(pipeline) = self.pipeline_manager.get_pipeline(pipeline_name(draw.cull)) else {
                    continue;
                };
                let Some(mesh) = self.meshes.get(draw.primitive) else {
                    continue;
                };
                let texture = draw
                    .texture
                    .and_then(|id| self.textures.get(&id))
                    .unwrap_or(&self.white);

                render_pass.set_pipeline(pipeline);
                render_pass.set_bind_group(
                    0,
                    self.bindings.uniform_bind_group(),
                    &[self.uniforms.offset(index)],
                );
                render_pass.set_bind_group(1, &texture.bind_group, &[]);
                render_pass.draw_gpu_mesh(mesh);
            }
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        surface_texture.present();

        log::trace!("Presented frame with {} draws", self.draws.len());
        self.draws.clear();
        Ok(())
    }

    /// Handles window resize events
    ///
    /// Zero-sized surfaces (minimized windows) are ignored. Recreates the
    /// depth texture to match new dimensions.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }

        self.config.width = width;
        self.config.height = height;
        self.surface.configure(&self.device, &self.config);
        self.depth_texture =
            TextureResource::create_depth_texture(&self.device, &self.config, "depth_texture");
    }

    pub fn set_clear_color(&mut self, r: f64, g: f64, b: f64) {
        self.clear_color = wgpu::Color { r, g, b, a: 1.0 };
    }

    /// Returns current surface dimensions
    pub fn get_surface_size(&self) -> (u32, u32) {
        (self.config.width, self.config.height)
    }

    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.format
    }

    /// Current CPU-side uniform state
    pub fn uniform_state(&self) -> &ShaderUniformState {
        &self.state
    }

    /// Draws recorded for the next frame
    pub fn pending_draws(&self) -> &[DrawRecord] {
        &self.draws
    }
}

impl ShaderProgram for RenderEngine {
    fn set_uniform(&mut self, name: &str, value: UniformValue) {
        self.state.set_uniform(name, value);
    }
}

impl TextureBackend for RenderEngine {
    type TextureHandle = TextureId;

    fn create_texture(&mut self, image: &DecodedImage, label: &str) -> Result<TextureId, TextureError> {
        let max = self.device.limits().max_texture_dimension_2d;
        if image.width > max || image.height > max {
            return Err(TextureError::TooLarge {
                label: label.to_string(),
                width: image.width,
                height: image.height,
                max,
            });
        }

        let resource = TextureResource::from_decoded_image(&self.device, &self.queue, image, label);
        let bind_group = self
            .bindings
            .create_texture_bind_group(&self.device, &resource, label);

        let id = TextureId(self.next_texture_id);
        self.next_texture_id += 1;
        self.textures.insert(id, GpuTexture { resource, bind_group });
        Ok(id)
    }

    fn bind_texture_unit(&mut self, slot: usize, handle: TextureId) {
        match self.texture_units.get_mut(slot) {
            Some(unit) => *unit = Some(handle),
            None => log::warn!("Texture unit {} does not exist", slot),
        }
    }

    fn release_texture(&mut self, handle: TextureId) {
        for unit in self.texture_units.iter_mut() {
            if *unit == Some(handle) {
                *unit = None;
            }
        }
        if let Some(texture) = self.textures.remove(&handle) {
            texture.resource.texture.destroy();
        }
    }
}

impl MeshLibrary for RenderEngine {
    fn load_mesh(&mut self, primitive: Primitive) {
        self.meshes.load(&self.device, primitive);
    }

    fn draw_mesh(&mut self, primitive: Primitive) {
        if !self.meshes.is_loaded(primitive) {
            log::warn!("Skipping draw of {}: mesh not loaded", primitive.name());
            return;
        }

        let texture = resolve_texture(&self.state, &self.texture_units);
        let mut uniforms = self.state.uniform_block();
        if texture.is_none() {
            uniforms.use_texture = 0;
        }

        self.draws.push(DrawRecord {
            primitive,
            uniforms,
            texture,
            cull: self.cull,
        });
    }
}

impl RasterState for RenderEngine {
    fn set_face_culling(&mut self, face: Option<CullFace>) {
        self.cull = face;
    }
}

/// Texture a draw with `state` samples: the one bound to the unit in
/// `objectTexture`, if texturing is on and that unit holds a texture
pub fn resolve_texture<H: Copy>(state: &ShaderUniformState, units: &[Option<H>]) -> Option<H> {
    if !state.use_texture {
        return None;
    }
    usize::try_from(state.object_texture)
        .ok()
        .and_then(|slot| units.get(slot).copied().flatten())
}

/// What `present_frame` does when the next surface texture is unavailable
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SurfaceRecovery {
    Reconfigure,
    SkipFrame,
    Fatal,
}

fn surface_recovery(err: &wgpu::SurfaceError) -> SurfaceRecovery {
    match err {
        wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated => SurfaceRecovery::Reconfigure,
        wgpu::SurfaceError::Timeout | wgpu::SurfaceError::Other => SurfaceRecovery::SkipFrame,
        _ => SurfaceRecovery::Fatal,
    }
}

fn pipeline_name(cull: Option<CullFace>) -> &'static str {
    match cull {
        None => "Scene",
        Some(CullFace::Front) => "Scene Cull Front",
        Some(CullFace::Back) => "Scene Cull Back",
    }
}

fn wgpu_face(face: CullFace) -> wgpu::Face {
    match face {
        CullFace::Front => wgpu::Face::Front,
        CullFace::Back => wgpu::Face::Back,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn textured_state(slot: i32) -> ShaderUniformState {
        let mut state = ShaderUniformState::new();
        state.set_uniform("bUseTexture", UniformValue::Bool(true));
        state.set_uniform("objectTexture", UniformValue::Sampler2D(slot));
        state
    }

    #[test]
    fn test_resolve_bound_unit() {
        let units = [Some(7u32), Some(9u32), None];
        assert_eq!(resolve_texture(&textured_state(1), &units), Some(9));
    }

    #[test]
    fn test_unresolved_slot_falls_back_to_color() {
        let units = [Some(7u32), None];
        assert_eq!(resolve_texture(&textured_state(-1), &units), None);
        assert_eq!(resolve_texture(&textured_state(1), &units), None);
        assert_eq!(resolve_texture(&textured_state(5), &units), None);
    }

    #[test]
    fn test_texturing_disabled_ignores_units() {
        let mut state = textured_state(0);
        state.set_uniform("bUseTexture", UniformValue::Bool(false));
        assert_eq!(resolve_texture(&state, &[Some(1u32)]), None);
    }

    #[test]
    fn test_only_out_of_memory_stops_rendering() {
        use wgpu::SurfaceError;

        assert_eq!(surface_recovery(&SurfaceError::Lost), SurfaceRecovery::Reconfigure);
        assert_eq!(surface_recovery(&SurfaceError::Outdated), SurfaceRecovery::Reconfigure);
        assert_eq!(surface_recovery(&SurfaceError::Timeout), SurfaceRecovery::SkipFrame);
        assert_eq!(surface_recovery(&SurfaceError::Other), SurfaceRecovery::SkipFrame);
        assert_eq!(surface_recovery(&SurfaceError::OutOfMemory), SurfaceRecovery::Fatal);
    }

    #[test]
    fn test_pipeline_per_cull_mode() {
        let names = [
            pipeline_name(None),
            pipeline_name(Some(CullFace::Front)),
            pipeline_name(Some(CullFace::Back)),
        ];
        assert_eq!(names, ["Scene", "Scene Cull Front", "Scene Cull Back"]);
        assert_eq!(wgpu_face(CullFace::Front), wgpu::Face::Front);
    }
}
