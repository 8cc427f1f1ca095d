//! # Scene Management Module
//!
//! Assembles a static scene from primitive meshes and replays it once per
//! frame. Each object is one [`RenderStep`]: its model transform, color or
//! texture and material are pushed into the shader, then its mesh is drawn.
//!
//! ## Key Components
//!
//! - [`SceneManager`] - Owns the backend and registries, prepares and renders the scene
//! - [`ShaderStateDispatcher`] - Pushes color, texture, UV scale, material and light state
//! - [`TransformSpec`] - Scale, rotation and translation composed into a model matrix
//! - [`SceneDescription`] - Textures, lights and the ordered draw list
//! - [`Vertex3D`] - 3D vertex data structure with position, normal, and texture coordinates
//!
//! ## Usage
//!
//! ```no_run
//! use std::path::Path;
//! use stillife::gfx::scene::{desk_scene, SceneManager};
//! # fn run<B: stillife::gfx::backend::RenderBackend>(backend: B) {
//! let mut scene = SceneManager::new(backend, desk_scene(Path::new("Textures")));
//! let report = scene.prepare().unwrap();
//! for failure in &report.failures {
//!     eprintln!("{}: {}", failure.source.tag, failure.error);
//! }
//! scene.render().unwrap();
//! # }
//! ```

pub mod desk;
pub mod dispatcher;
pub mod object;
pub mod scene;
pub mod transform;
pub mod vertex;

// Re-export main types
pub use desk::desk_scene;
pub use dispatcher::ShaderStateDispatcher;
pub use object::{RenderStep, SceneDescription, TextureSource};
pub use scene::{PreparationReport, SceneError, SceneManager, ScenePhase};
pub use transform::{compose, set_transformations, TransformSpec};
pub use vertex::Vertex3D;
