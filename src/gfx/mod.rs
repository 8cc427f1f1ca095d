//! # Graphics Module
//!
//! This module contains all graphics-related functionality for Stillife,
//! including the backend seams, the wgpu renderer, procedural meshes,
//! textures and materials, and scene assembly.
//!
//! ## Architecture Overview
//!
//! - **Backend seams** ([`backend`]) - Traits the scene layer drives: uniforms, textures, meshes, culling
//! - **Shader state** ([`shader`]) - Named uniform contract and its CPU mirror
//! - **Geometry** ([`geometry`]) - Procedural primitive meshes
//! - **Resources** ([`resources`]) - Image decoding, texture and material registries, lights
//! - **Scene** ([`scene`]) - Transform composition, state dispatch, two-phase scene manager
//! - **Rendering** ([`rendering`]) - The wgpu implementation of [`backend::RenderBackend`]
//! - **Camera** ([`camera`]) - Fixed look-at camera
//!
//! ## Usage
//!
//! ```no_run
//! use stillife::gfx::{RenderEngine, SceneManager, scene::desk_scene};
//!
//! # async fn build(window: std::sync::Arc<winit::window::Window>) -> anyhow::Result<()> {
//! let engine = RenderEngine::new(window, 1000, 800).await?;
//! let mut scene = SceneManager::new(engine, desk_scene("textures".as_ref()));
//! scene.prepare()?;
//! scene.render()?;
//! scene.backend_mut().present_frame()?;
//! # Ok(())
//! # }
//! ```

pub mod backend;
pub mod camera;
pub mod geometry;
pub mod rendering;
pub mod resources;
pub mod scene;
pub mod shader;

#[cfg(test)]
pub(crate) mod testing;

// Re-export commonly used types
pub use backend::{CullFace, RenderBackend};
pub use camera::SceneCamera;
pub use rendering::render_engine::RenderEngine;
pub use scene::SceneManager;
