use thiserror::Error;

use super::{
    dispatcher::ShaderStateDispatcher,
    object::{RenderStep, SceneDescription, TextureSource},
    transform::set_transformations,
};
use crate::gfx::{
    backend::RenderBackend,
    geometry::Primitive,
    resources::{
        material::MaterialRegistry,
        texture_registry::{TextureError, TextureRegistry},
    },
};

#[derive(Debug, Error)]
pub enum SceneError {
    #[error("scene must be prepared before it is rendered")]
    NotPrepared,
    #[error("scene has already been prepared")]
    AlreadyPrepared,
    #[error("{count} light sources requested but the shader supports {max}")]
    TooManyLights { count: usize, max: usize },
    #[error(transparent)]
    Texture(#[from] TextureError),
}

/// Lifecycle of a [`SceneManager`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScenePhase {
    /// Created, nothing uploaded yet
    Pending,
    /// Textures, lights and meshes are uploaded; frames can be rendered
    Prepared,
}

/// A texture that could not be loaded during preparation
#[derive(Debug)]
pub struct TextureFailure {
    pub source: TextureSource,
    pub error: TextureError,
}

/// Outcome of [`SceneManager::prepare`]
#[derive(Debug, Default)]
pub struct PreparationReport {
    /// Tags of the textures that were registered, in slot order
    pub loaded: Vec<String>,
    /// Textures skipped; objects using them render with their solid color
    pub failures: Vec<TextureFailure>,
}

impl PreparationReport {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Owns a render backend and the registries, and replays the scene's draw
/// list once per frame
pub struct SceneManager<B: RenderBackend> {
    backend: B,
    description: SceneDescription,
    textures: TextureRegistry<B::TextureHandle>,
    materials: MaterialRegistry,
    phase: ScenePhase,
}

impl<B: RenderBackend> SceneManager<B> {
    pub fn new(backend: B, description: SceneDescription) -> Self {
        Self {
            backend,
            description,
            textures: TextureRegistry::new(),
            materials: MaterialRegistry::new(),
            phase: ScenePhase::Pending,
        }
    }

    /// Loads textures, binds them to their units, defines materials, uploads
    /// lights and loads every primitive mesh once.
    ///
    /// Textures that fail to decode are logged and reported; the scene still
    /// prepares without them.
    ///
    /// # Errors
    /// `AlreadyPrepared` on a second call. Registering more textures than
    /// there are texture units, or more lights than the shader declares,
    /// aborts preparation.
    pub fn prepare(&mut self) -> Result<PreparationReport, SceneError> {
        if self.phase == ScenePhase::Prepared {
            return Err(SceneError::AlreadyPrepared);
        }

        let mut report = PreparationReport::default();
        for source in &self.description.textures {
            match self
                .textures
                .load(&mut self.backend, &source.path, &source.tag)
            {
                Ok(slot) => {
                    log::debug!("Texture '{}' bound to unit {}", source.tag, slot);
                    report.loaded.push(source.tag.clone());
                }
                Err(err @ TextureError::CapacityExceeded { .. }) => return Err(err.into()),
                Err(err) => {
                    log::error!("Skipping texture '{}': {}", source.tag, err);
                    report.failures.push(TextureFailure {
                        source: source.clone(),
                        error: err,
                    });
                }
            }
        }
        self.textures.bind_all(&mut self.backend);

        self.materials.define_all();

        ShaderStateDispatcher::new(&mut self.backend, &self.textures, &self.materials)
            .setup_lights(&self.description.lights)?;

        for primitive in Primitive::ALL {
            self.backend.load_mesh(primitive);
        }

        self.phase = ScenePhase::Prepared;
        log::info!(
            "Scene prepared: {} textures loaded, {} failed, {} objects",
            report.loaded.len(),
            report.failures.len(),
            self.description.steps.len()
        );
        Ok(report)
    }

    /// Draws every step of the scene in order
    ///
    /// # Returns
    /// The number of draw calls issued
    pub fn render(&mut self) -> Result<usize, SceneError> {
        if self.phase != ScenePhase::Prepared {
            return Err(SceneError::NotPrepared);
        }

        for step in &self.description.steps {
            render_step(&mut self.backend, &self.textures, &self.materials, step);
        }

        log::trace!("Rendered {} objects", self.description.steps.len());
        Ok(self.description.steps.len())
    }

    pub fn phase(&self) -> ScenePhase {
        self.phase
    }

    pub fn description(&self) -> &SceneDescription {
        &self.description
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    pub fn textures(&self) -> &TextureRegistry<B::TextureHandle> {
        &self.textures
    }

    pub fn materials(&self) -> &MaterialRegistry {
        &self.materials
    }

    fn release_textures(&mut self) {
        if !self.textures.is_empty() {
            log::debug!("Releasing {} textures", self.textures.len());
        }
        self.textures.destroy(&mut self.backend);
    }
}

/// Pushes one object's state and issues its draw call.
///
/// Order: transform, color, texture, UV scale, material, then the draw with
/// face culling enabled around it when requested.
fn render_step<B: RenderBackend>(
    backend: &mut B,
    textures: &TextureRegistry<B::TextureHandle>,
    materials: &MaterialRegistry,
    step: &RenderStep,
) {
    let mut dispatcher = ShaderStateDispatcher::new(&mut *backend, textures, materials);

    set_transformations(dispatcher.shader(), &step.transform);
    if let Some([r, g, b, a]) = step.color {
        dispatcher.set_color(r, g, b, a);
    }
    if let Some(tag) = &step.texture {
        dispatcher.set_texture(tag);
    }
    if let Some((u, v)) = step.uv_scale {
        dispatcher.set_uv_scale(u, v);
    }
    if let Some(tag) = &step.material {
        dispatcher.set_material(tag);
    }

    if let Some(face) = step.cull {
        backend.set_face_culling(Some(face));
    }
    backend.draw_mesh(step.primitive);
    if step.cull.is_some() {
        backend.set_face_culling(None);
    }
}

impl<B: RenderBackend> Drop for SceneManager<B> {
    fn drop(&mut self) {
        self.release_textures();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::{
        backend::CullFace,
        resources::{lighting::desk_lights, texture_registry::MAX_TEXTURE_UNITS},
        shader::UniformValue,
        testing::{write_rgb_image, BackendCall, RecordingBackend},
    };
    use cgmath::{Vector2, Vector4};

    fn textured_description(dir: &std::path::Path) -> SceneDescription {
        SceneDescription::new()
            .with_texture(write_rgb_image(dir, "floor.png"), "floor")
            .with_texture(dir.join("missing.png"), "missing")
            .with_texture(write_rgb_image(dir, "mug.png"), "mug")
            .with_light(desk_lights()[0])
            .with_step(
                RenderStep::new("floor", Primitive::Plane)
                    .with_scale(20.0, 1.0, 10.0)
                    .with_color(255, 255, 255)
                    .with_texture("floor")
                    .with_uv_scale(4.0, 2.0)
                    .with_material("porcelain"),
            )
            .with_step(
                RenderStep::new("mug", Primitive::Cylinder)
                    .with_color(221, 204, 176)
                    .with_texture("missing")
                    .with_material("porcelain")
                    .with_cull(CullFace::Front),
            )
    }

    #[test]
    fn test_prepare_reports_decode_failures() {
        let dir = tempfile::tempdir().unwrap();
        let mut scene = SceneManager::new(RecordingBackend::new(), textured_description(dir.path()));

        let report = scene.prepare().unwrap();

        assert_eq!(report.loaded, vec!["floor".to_string(), "mug".to_string()]);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].source.tag, "missing");
        assert!(matches!(report.failures[0].error, TextureError::Decode { .. }));
        assert!(!report.is_complete());
        assert_eq!(scene.textures().len(), 2);
        assert_eq!(scene.textures().find_slot("mug"), Some(1));
        assert_eq!(scene.backend().textures_created(), 2);
        assert_eq!(scene.phase(), ScenePhase::Prepared);
    }

    #[test]
    fn test_oversized_texture_renders_untextured() {
        let dir = tempfile::tempdir().unwrap();
        let backend = RecordingBackend::new().with_max_texture_dimension(2);
        let mut scene = SceneManager::new(backend, textured_description(dir.path()));

        let report = scene.prepare().unwrap();

        assert!(report.loaded.is_empty());
        let tags: Vec<&str> = report
            .failures
            .iter()
            .map(|failure| failure.source.tag.as_str())
            .collect();
        assert_eq!(tags, vec!["floor", "missing", "mug"]);
        assert!(matches!(
            report.failures[0].error,
            TextureError::TooLarge { width: 4, height: 2, max: 2, .. }
        ));
        assert_eq!(scene.phase(), ScenePhase::Prepared);

        assert_eq!(scene.render().unwrap(), 2);
        assert_eq!(scene.backend().state.object_texture, -1);
        assert_eq!(scene.backend().textures_created(), 0);
    }

    #[test]
    fn test_prepare_sequence() {
        let dir = tempfile::tempdir().unwrap();
        let mut scene = SceneManager::new(RecordingBackend::new(), textured_description(dir.path()));
        scene.prepare().unwrap();

        let calls = scene.backend().calls();
        let position = |wanted: &BackendCall| calls.iter().position(|call| call == wanted).unwrap();

        let last_create = calls
            .iter()
            .rposition(|call| matches!(call, BackendCall::CreateTexture { .. }))
            .unwrap();
        let first_bind = position(&BackendCall::BindTexture { slot: 0, handle: 1 });
        let second_bind = position(&BackendCall::BindTexture { slot: 1, handle: 2 });
        let lighting = position(&BackendCall::Uniform {
            name: "bUseLighting".to_string(),
            value: UniformValue::Bool(true),
        });
        let first_mesh = position(&BackendCall::LoadMesh(Primitive::Box));

        assert!(last_create < first_bind);
        assert!(first_bind < second_bind);
        assert!(second_bind < lighting);
        assert!(lighting < first_mesh);

        let meshes: Vec<Primitive> = calls
            .iter()
            .filter_map(|call| match call {
                BackendCall::LoadMesh(primitive) => Some(*primitive),
                _ => None,
            })
            .collect();
        assert_eq!(meshes, Primitive::ALL.to_vec());
    }

    #[test]
    fn test_render_step_order() {
        let dir = tempfile::tempdir().unwrap();
        let mut scene = SceneManager::new(RecordingBackend::new(), textured_description(dir.path()));
        scene.prepare().unwrap();
        scene.backend_mut().clear_calls();

        assert_eq!(scene.render().unwrap(), 2);

        let names: Vec<String> = scene
            .backend()
            .calls()
            .iter()
            .map(|call| match call {
                BackendCall::Uniform { name, .. } => name.clone(),
                BackendCall::DrawMesh(primitive) => format!("draw {}", primitive.name()),
                BackendCall::FaceCulling(Some(_)) => "cull on".to_string(),
                BackendCall::FaceCulling(None) => "cull off".to_string(),
                other => format!("{:?}", other),
            })
            .collect();

        let per_object = |draw: &str, uv: bool, cull: bool| {
            let mut expected = vec!["model", "bUseTexture", "objectColor", "bUseTexture", "objectTexture"];
            if uv {
                expected.push("UVscale");
            }
            expected.extend([
                "material.ambientColor",
                "material.ambientStrength",
                "material.diffuseColor",
                "material.specularColor",
                "material.shininess",
            ]);
            if cull {
                expected.push("cull on");
            }
            expected.push(draw);
            if cull {
                expected.push("cull off");
            }
            expected.into_iter().map(String::from).collect::<Vec<_>>()
        };
        let mut expected = per_object("draw plane", true, false);
        expected.extend(per_object("draw cylinder", false, true));

        assert_eq!(names, expected);
        assert_eq!(
            scene.backend().last_uniform("UVscale"),
            Some(UniformValue::Vec2(Vector2::new(4.0, 2.0)))
        );
    }

    #[test]
    fn test_missing_texture_uploads_sentinel_slot() {
        let dir = tempfile::tempdir().unwrap();
        let mut scene = SceneManager::new(RecordingBackend::new(), textured_description(dir.path()));
        scene.prepare().unwrap();
        scene.render().unwrap();

        let state = &scene.backend().state;
        assert_eq!(state.object_texture, -1);
        assert_eq!(
            state.object_color,
            Vector4::new(221.0 / 255.0, 204.0 / 255.0, 176.0 / 255.0, 1.0)
        );
    }

    #[test]
    fn test_render_requires_prepare() {
        let mut scene = SceneManager::new(RecordingBackend::new(), SceneDescription::new());
        assert!(matches!(scene.render(), Err(SceneError::NotPrepared)));
        assert!(scene.backend().calls().is_empty());
    }

    #[test]
    fn test_prepare_only_once() {
        let mut scene = SceneManager::new(RecordingBackend::new(), SceneDescription::new());
        scene.prepare().unwrap();
        assert!(matches!(scene.prepare(), Err(SceneError::AlreadyPrepared)));
        assert_eq!(scene.render().unwrap(), 0);
    }

    #[test]
    fn test_texture_capacity_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_rgb_image(dir.path(), "tile.png");
        let mut description = SceneDescription::new();
        for i in 0..=MAX_TEXTURE_UNITS {
            description = description.with_texture(&path, &format!("tile{}", i));
        }
        let mut scene = SceneManager::new(RecordingBackend::new(), description);

        let err = scene.prepare().unwrap_err();

        assert!(matches!(
            err,
            SceneError::Texture(TextureError::CapacityExceeded { max: 16 })
        ));
        assert_eq!(scene.textures().len(), MAX_TEXTURE_UNITS);
        assert_eq!(scene.phase(), ScenePhase::Pending);
    }

    #[test]
    fn test_too_many_lights_is_fatal() {
        let description = SceneDescription {
            lights: vec![desk_lights()[0]; 5],
            ..SceneDescription::default()
        };
        let mut scene = SceneManager::new(RecordingBackend::new(), description);
        assert!(matches!(
            scene.prepare(),
            Err(SceneError::TooManyLights { count: 5, max: 4 })
        ));
    }

    #[test]
    fn test_drop_releases_textures() {
        let dir = tempfile::tempdir().unwrap();
        let log = {
            let mut scene =
                SceneManager::new(RecordingBackend::new(), textured_description(dir.path()));
            scene.prepare().unwrap();
            scene.render().unwrap();
            let log = scene.backend_mut().share_log();
            log
        };

        assert_eq!(
            *log.borrow(),
            vec![BackendCall::ReleaseTexture(1), BackendCall::ReleaseTexture(2)]
        );
    }

    #[test]
    fn test_drop_before_prepare_releases_nothing() {
        let log = {
            let mut scene = SceneManager::new(RecordingBackend::new(), SceneDescription::new());
            let log = scene.backend_mut().share_log();
            log
        };
        assert!(log.borrow().is_empty());
    }
}
