//! The desk still life: a coffee cup, a laptop, a mouse and a remote on a
//! wooden floor, lit by a warm key light and a cool fill light.

use std::path::Path;

use super::object::{RenderStep, SceneDescription};
use crate::gfx::{backend::CullFace, geometry::Primitive, resources::lighting::desk_lights};

/// Image files of the desk scene, relative to the texture directory
pub const DESK_TEXTURES: [(&str, &str); 5] = [
    ("floor.jpg", "floor"),
    ("coffee_body.jpg", "coffeeBody"),
    ("coffee_liquid.jpg", "coffeeLiquid"),
    ("laptop.jpg", "laptop"),
    ("mouse.jpg", "mouse"),
];

/// Builds the desk scene, loading its textures from `texture_dir`
pub fn desk_scene(texture_dir: &Path) -> SceneDescription {
    let mut scene = SceneDescription::new();
    for (file, tag) in DESK_TEXTURES {
        scene = scene.with_texture(texture_dir.join(file), tag);
    }
    for light in desk_lights() {
        scene = scene.with_light(light);
    }

    scene
        .with_step(
            RenderStep::new("floor", Primitive::Plane)
                .with_scale(20.0, 1.0, 10.0)
                .with_color(255, 255, 255)
                .with_texture("floor")
                .with_material("porcelain"),
        )
        // Culling the front faces leaves the inside of the cup visible
        .with_step(
            RenderStep::new("coffee cup", Primitive::Cylinder)
                .with_scale(1.0, 4.0, 1.0)
                .with_color(221, 204, 176)
                .with_texture("coffeeBody")
                .with_material("porcelain")
                .with_cull(CullFace::Front),
        )
        .with_step(
            RenderStep::new("coffee", Primitive::Cylinder)
                .with_scale(0.9, 3.5, 0.9)
                .with_color(108, 88, 76)
                .with_texture("coffeeLiquid")
                .with_material("porcelain"),
        )
        .with_step(
            // The handle's Y angle is 90 converted to radians, applied as degrees
            RenderStep::new("cup handle", Primitive::Torus)
                .with_scale(0.6, 1.0, 0.4)
                .with_rotation(0.0, 90f32.to_radians(), 0.0)
                .with_position(0.8, 2.0, 0.0)
                .with_color(221, 204, 176)
                .with_material("porcelain"),
        )
        .with_step(
            RenderStep::new("laptop base", Primitive::Box)
                .with_scale(12.0, 0.75, 6.0)
                .with_rotation(0.0, 35.0, 0.0)
                .with_position(-8.0, 0.0, 0.0)
                .with_color(206, 212, 218)
                .with_material("silver"),
        )
        .with_step(
            RenderStep::new("laptop lid", Primitive::Plane)
                .with_scale(6.0, 0.75, 3.0)
                .with_rotation(0.0, 35.0, 0.0)
                .with_position(-8.0, 0.4, 0.0)
                .with_color(206, 212, 218)
                .with_texture("laptop")
                .with_material("silver"),
        )
        .with_step(
            RenderStep::new("mouse", Primitive::Sphere)
                .with_scale(1.0, 0.75, 2.0)
                .with_rotation(0.0, 35.0, 0.0)
                .with_position(4.0, 0.0, 0.0)
                .with_color(100, 100, 100)
                .with_texture("mouse")
                .with_material("gold"),
        )
        .with_step(
            RenderStep::new("remote", Primitive::Box)
                .with_scale(1.0, 0.45, 4.0)
                .with_rotation(0.0, 35.0, 0.0)
                .with_position(-4.0, 0.75, -3.0)
                .with_color(0, 0, 0)
                .with_material("bronze"),
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::{
        resources::material::MaterialRegistry,
        scene::scene::SceneManager,
        testing::{write_rgb_image, RecordingBackend},
    };

    #[test]
    fn test_desk_scene_references_known_tags() {
        let scene = desk_scene(Path::new("Textures"));
        let mut materials = MaterialRegistry::new();
        materials.define_all();

        assert_eq!(scene.textures.len(), 5);
        assert_eq!(scene.lights.len(), 2);
        assert_eq!(scene.steps.len(), 8);
        assert_eq!(scene.textures[0].path, Path::new("Textures").join("floor.jpg"));

        for step in &scene.steps {
            if let Some(tag) = &step.texture {
                assert!(scene.textures.iter().any(|t| &t.tag == tag), "{}", tag);
            }
            let material = step.material.as_deref().unwrap();
            assert!(materials.find(material).is_some(), "{}", material);
        }
    }

    #[test]
    fn test_only_cup_is_culled() {
        let scene = desk_scene(Path::new("Textures"));
        let culled: Vec<&str> = scene
            .steps
            .iter()
            .filter(|step| step.cull.is_some())
            .map(|step| step.label.as_str())
            .collect();
        assert_eq!(culled, vec!["coffee cup"]);
    }

    #[test]
    fn test_cup_handle_keeps_authored_angle() {
        let scene = desk_scene(Path::new("Textures"));
        let handle = scene
            .steps
            .iter()
            .find(|step| step.label == "cup handle")
            .unwrap();

        assert!((handle.transform.rotation_degrees.y - std::f32::consts::FRAC_PI_2).abs() < 1e-6);
        assert_eq!(handle.transform.rotation_degrees.x, 0.0);
        assert_eq!(handle.transform.rotation_degrees.z, 0.0);
    }

    #[test]
    fn test_desk_scene_renders_with_missing_textures() {
        let dir = tempfile::tempdir().unwrap();
        write_rgb_image(dir.path(), "floor.jpg");
        write_rgb_image(dir.path(), "mouse.jpg");

        let mut manager = SceneManager::new(RecordingBackend::new(), desk_scene(dir.path()));
        let report = manager.prepare().unwrap();

        assert_eq!(report.loaded, vec!["floor".to_string(), "mouse".to_string()]);
        assert_eq!(report.failures.len(), 3);
        assert_eq!(manager.render().unwrap(), 8);
        assert_eq!(
            manager.backend().draws(),
            vec![
                Primitive::Plane,
                Primitive::Cylinder,
                Primitive::Cylinder,
                Primitive::Torus,
                Primitive::Box,
                Primitive::Plane,
                Primitive::Sphere,
                Primitive::Box,
            ]
        );
    }
}
