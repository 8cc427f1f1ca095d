//! # Stillife Prelude
//!
//! Commonly used types for describing and rendering a scene.
//!
//! ```no_run
//! use stillife::prelude::*;
//!
//! let scene = SceneDescription::new()
//!     .with_light(desk_lights()[0])
//!     .with_step(
//!         RenderStep::new("table", Primitive::Plane)
//!             .with_scale(20.0, 1.0, 10.0)
//!             .with_color(120, 80, 40)
//!             .with_material("bronze"),
//!     );
//! ```

// Application
pub use crate::app::StillifeApp;
pub use crate::config::AppConfig;
pub use crate::logging::{init_logging, LoggingConfig};

// Scene description and assembly
pub use crate::gfx::scene::{
    desk_scene, PreparationReport, RenderStep, SceneDescription, SceneError, SceneManager,
    TextureSource, TransformSpec,
};

// Backend seams and the wgpu renderer
pub use crate::gfx::backend::{CullFace, MeshLibrary, RasterState, RenderBackend, TextureBackend};
pub use crate::gfx::rendering::{RenderEngine, RenderError};
pub use crate::gfx::shader::{ShaderProgram, UniformValue};

// Resources
pub use crate::gfx::camera::SceneCamera;
pub use crate::gfx::geometry::{GeometryData, Primitive};
pub use crate::gfx::resources::{desk_lights, LightSource, MaterialRecord, TextureError};

// Re-export common external dependencies
pub use cgmath::{Deg, Point3, Vector2, Vector3, Vector4};
