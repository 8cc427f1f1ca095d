// src/lib.rs
//! Stillife
//!
//! A static 3D still-life renderer built on wgpu and winit. Scenes are
//! ordered lists of primitive draws, each preceded by a model transform,
//! a color or texture, and a material, with lighting set up once.

pub mod app;
pub mod config;
pub mod gfx;
pub mod logging;
pub mod prelude;
pub mod wgpu_utils;

// Re-export main types for convenience
pub use app::StillifeApp;
pub use config::AppConfig;

/// Creates the desk demo application with settings taken from the environment
pub fn default() -> anyhow::Result<StillifeApp> {
    StillifeApp::new(AppConfig::from_env())
}
