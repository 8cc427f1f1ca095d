pub mod scene_camera;

// Re-export main types
pub use scene_camera::SceneCamera;
