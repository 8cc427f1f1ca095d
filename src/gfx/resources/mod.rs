// src/gfx/resources/mod.rs
//! GPU resource management
//!
//! Handles textures, materials, lights, and bind groups for rendering.

pub mod image_loader;
pub mod lighting;
pub mod material;
pub mod scene_bindings;
pub mod texture_registry;
pub mod texture_resource;

// Re-export main types
pub use image_loader::{decode_image, DecodedImage};
pub use lighting::{desk_lights, LightSource, MAX_LIGHT_SOURCES};
pub use material::{MaterialRecord, MaterialRegistry};
pub use scene_bindings::SceneBindings;
pub use texture_registry::{TextureEntry, TextureError, TextureRegistry, MAX_TEXTURE_UNITS};
pub use texture_resource::TextureResource;
