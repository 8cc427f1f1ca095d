// src/gfx/rendering/mod.rs
//! Core rendering functionality
//!
//! The wgpu backend the scene layer draws through: render pipelines, GPU
//! meshes, and frame recording and presentation.

pub mod mesh_store;
pub mod pipeline_manager;
pub mod render_engine;

// Re-export main types
pub use mesh_store::{GpuMesh, MeshStore};
pub use pipeline_manager::{PipelineConfig, PipelineError, PipelineManager};
pub use render_engine::{DrawRecord, RenderEngine, RenderError, TextureId};
