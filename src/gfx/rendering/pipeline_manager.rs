//! Render pipeline management system for wgpu
//!
//! Provides pipeline creation and caching with shared shader modules. The
//! scene needs one pipeline per face-culling mode, all built from the same
//! shader.

use std::{collections::HashMap, sync::Arc};

use thiserror::Error;
use wgpu::*;

use crate::gfx::scene::vertex::Vertex3D;

#[derive(Debug, Error, PartialEq)]
pub enum PipelineError {
    #[error("shader '{0}' has not been loaded")]
    MissingShader(String),
    #[error("pipeline '{0}' has not been registered")]
    UnknownPipeline(String),
}

/// Configuration for creating a render pipeline
///
/// Defines all parameters needed to create a wgpu render pipeline,
/// including shaders, bind group layouts, and render state.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub label: String,
    pub shader: String,
    pub bind_group_layouts: Vec<BindGroupLayout>,
    pub primitive_topology: PrimitiveTopology,
    pub cull_mode: Option<Face>,
    pub depth_format: Option<TextureFormat>,
    pub color_targets: Vec<Option<ColorTargetState>>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            label: "Default Pipeline".to_string(),
            shader: "scene".to_string(),
            bind_group_layouts: Vec::new(),
            primitive_topology: PrimitiveTopology::TriangleList,
            cull_mode: None,
            depth_format: None,
            color_targets: vec![Some(ColorTargetState {
                format: TextureFormat::Bgra8Unorm,
                blend: Some(BlendState::ALPHA_BLENDING),
                write_mask: ColorWrites::ALL,
            })],
        }
    }
}

impl PipelineConfig {
    pub fn with_label(mut self, label: &str) -> Self {
        self.label = label.to_owned();
        self
    }

    pub fn with_cull_mode(mut self, face: Option<Face>) -> Self {
        self.cull_mode = face;
        self
    }

    /// Sets the shader for this pipeline (builder pattern)
    ///
    /// # Arguments
    /// * `shader` - Shader identifier
    pub fn with_shader(mut self, shader: &str) -> Self {
        self.shader = shader.to_string();
        self
    }

    /// Sets all bind group layouts at once (builder pattern)
    ///
    /// # Arguments
    /// * `layouts` - Vector of bind group layouts to use
    pub fn with_bind_group_layouts(mut self, layouts: Vec<BindGroupLayout>) -> Self {
        self.bind_group_layouts = layouts;
        self
    }

    /// Enables depth testing against a buffer of `format` (builder pattern)
    pub fn with_depth_format(mut self, format: TextureFormat) -> Self {
        self.depth_format = Some(format);
        self
    }

    /// Sets color targets for this pipeline (builder pattern)
    ///
    /// # Arguments
    /// * `targets` - Vector of color target states
    pub fn with_color_targets(mut self, targets: Vec<Option<ColorTargetState>>) -> Self {
        self.color_targets = targets;
        self
    }
}

/// Manages render pipelines and the shader modules they are built from
pub struct PipelineManager {
    device: Arc<Device>,
    pipelines: HashMap<String, RenderPipeline>,
    pipeline_configs: HashMap<String, PipelineConfig>,
    shader_modules: HashMap<String, ShaderModule>,
}

impl PipelineManager {
    /// Creates a new pipeline manager
    ///
    /// # Arguments
    /// * `device` - Shared wgpu device for creating resources
    pub fn new(device: Arc<Device>) -> Self {
        Self {
            device,
            pipelines: HashMap::new(),
            pipeline_configs: HashMap::new(),
            shader_modules: HashMap::new(),
        }
    }

    /// Compiles a WGSL shader module
    ///
    /// # Arguments
    /// * `name` - Shader identifier
    /// * `source` - WGSL shader source code
    pub fn load_shader(&mut self, name: &str, source: &str) {
        let shader_module = self.device.create_shader_module(ShaderModuleDescriptor {
            label: Some(name),
            source: ShaderSource::Wgsl(source.into()),
        });

        self.shader_modules.insert(name.to_string(), shader_module);
    }

    /// Registers a pipeline configuration without creating it
    ///
    /// # Arguments
    /// * `name` - Unique identifier for this pipeline
    /// * `config` - Pipeline configuration
    pub fn register_pipeline(&mut self, name: &str, config: PipelineConfig) {
        self.pipelines.remove(name);
        self.pipeline_configs.insert(name.to_string(), config);
    }

    /// Creates every registered pipeline that does not exist yet
    ///
    /// # Returns
    /// The pipelines that could not be created
    pub fn create_all_pipelines(&mut self) -> Result<(), Vec<PipelineError>> {
        let mut errors = Vec::new();
        let pending: Vec<String> = self
            .pipeline_configs
            .keys()
            .filter(|name| !self.pipelines.contains_key(*name))
            .cloned()
            .collect();

        for name in pending {
            match self.create_pipeline(&name) {
                Ok(pipeline) => {
                    self.pipelines.insert(name, pipeline);
                }
                Err(e) => errors.push(e),
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Gets a created pipeline
    ///
    /// # Arguments
    /// * `name` - Pipeline identifier
    pub fn get_pipeline(&self, name: &str) -> Option<&RenderPipeline> {
        self.pipelines.get(name)
    }

    /// Checks if a pipeline is registered
    pub fn has_pipeline(&self, name: &str) -> bool {
        self.pipeline_configs.contains_key(name)
    }

    /// Creates a render pipeline from its registered configuration
    fn create_pipeline(&self, name: &str) -> Result<RenderPipeline, PipelineError> {
        let config = self
            .pipeline_configs
            .get(name)
            .ok_or_else(|| PipelineError::UnknownPipeline(name.to_string()))?;
        let shader = self
            .shader_modules
            .get(&config.shader)
            .ok_or_else(|| PipelineError::MissingShader(config.shader.clone()))?;

        let bind_group_layout_refs: Vec<&BindGroupLayout> =
            config.bind_group_layouts.iter().collect();
        let pipeline_layout = self
            .device
            .create_pipeline_layout(&PipelineLayoutDescriptor {
                label: Some(&format!("{} Layout", name)),
                bind_group_layouts: &bind_group_layout_refs,
                push_constant_ranges: &[],
            });

        let depth_stencil = config.depth_format.map(|format| DepthStencilState {
            format,
            depth_write_enabled: true,
            depth_compare: CompareFunction::Less,
            stencil: StencilState::default(),
            bias: DepthBiasState::default(),
        });

        Ok(self
            .device
            .create_render_pipeline(&RenderPipelineDescriptor {
                label: Some(&config.label),
                layout: Some(&pipeline_layout),
                vertex: VertexState {
                    module: shader,
                    entry_point: Some("vs_main"),
                    buffers: &[Vertex3D::desc()],
                    compilation_options: PipelineCompilationOptions::default(),
                },
                fragment: Some(FragmentState {
                    module: shader,
                    entry_point: Some("fs_main"),
                    targets: &config.color_targets,
                    compilation_options: PipelineCompilationOptions::default(),
                }),
                primitive: PrimitiveState {
                    topology: config.primitive_topology,
                    strip_index_format: None,
                    front_face: FrontFace::Ccw,
                    cull_mode: config.cull_mode,
                    polygon_mode: PolygonMode::Fill,
                    unclipped_depth: false,
                    conservative: false,
                },
                depth_stencil,
                multisample: MultisampleState::default(),
                multiview: None,
                cache: None,
            }))
    }
}
