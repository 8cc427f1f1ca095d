use std::sync::Arc;

use anyhow::Context;
use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowAttributes, WindowId},
};

use crate::{
    config::AppConfig,
    gfx::{
        camera::SceneCamera,
        rendering::RenderEngine,
        scene::{desk_scene, SceneManager},
    },
};

pub struct StillifeApp {
    event_loop: Option<EventLoop<()>>,
    app_state: AppState,
}

struct AppState {
    config: AppConfig,
    window: Option<Arc<Window>>,
    scene: Option<SceneManager<RenderEngine>>,
    camera: SceneCamera,
    /// First fatal error; ends the event loop and is returned from `run`
    fatal: Option<anyhow::Error>,
}

impl StillifeApp {
    pub fn new(config: AppConfig) -> anyhow::Result<Self> {
        let event_loop = EventLoop::new().context("failed to create event loop")?;
        let camera = SceneCamera::desk(config.aspect_ratio());

        Ok(Self {
            event_loop: Some(event_loop),
            app_state: AppState {
                config,
                window: None,
                scene: None,
                camera,
                fatal: None,
            },
        })
    }

    /// Run the application (consumes self and starts the event loop)
    pub fn run(mut self) -> anyhow::Result<()> {
        let event_loop = self
            .event_loop
            .take()
            .context("event loop already consumed")?;
        event_loop.set_control_flow(ControlFlow::Poll);
        event_loop
            .run_app(&mut self.app_state)
            .context("event loop terminated abnormally")?;

        // Release scene textures while the device is still alive
        self.app_state.scene = None;

        match self.app_state.fatal.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

impl AppState {
    fn init_scene(&mut self, window: Arc<Window>) -> anyhow::Result<()> {
        let PhysicalSize { width, height } = window.inner_size();
        let mut engine = pollster::block_on(RenderEngine::new(window, width, height))
            .context("failed to initialize the renderer")?;

        let [r, g, b] = self.config.clear_color;
        engine.set_clear_color(r, g, b);
        self.camera.set_aspect(width, height);

        let mut scene = SceneManager::new(engine, desk_scene(&self.config.texture_dir));
        let report = scene.prepare().context("failed to prepare the desk scene")?;
        for failure in &report.failures {
            log::error!(
                "Texture '{}' unavailable, drawing solid color instead: {}",
                failure.source.tag,
                failure.error
            );
        }
        if !report.is_complete() {
            log::warn!(
                "{} of {} textures loaded from {}",
                report.loaded.len(),
                report.loaded.len() + report.failures.len(),
                self.config.texture_dir.display()
            );
        }

        self.scene = Some(scene);
        Ok(())
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: anyhow::Error) {
        log::error!("{:#}", err);
        if self.fatal.is_none() {
            self.fatal = Some(err);
        }
        event_loop.exit();
    }

    fn redraw(&mut self) -> anyhow::Result<()> {
        let Some(scene) = self.scene.as_mut() else {
            return Ok(());
        };

        self.camera.upload(scene.backend_mut());
        let draws = scene.render()?;
        log::trace!("Recorded {} draws", draws);
        scene.backend_mut().present_frame()?;
        Ok(())
    }
}

impl ApplicationHandler for AppState {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let attributes = WindowAttributes::default()
            .with_title(self.config.title.clone())
            .with_inner_size(winit::dpi::LogicalSize::new(
                self.config.width,
                self.config.height,
            ));

        let window = match event_loop.create_window(attributes) {
            Ok(window) => Arc::new(window),
            Err(err) => {
                self.fail(event_loop, anyhow::Error::new(err).context("failed to create window"));
                return;
            }
        };
        self.window = Some(window.clone());

        if let Err(err) = self.init_scene(window) {
            self.fail(event_loop, err);
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::KeyboardInput {
                event:
                    winit::event::KeyEvent {
                        physical_key: PhysicalKey::Code(KeyCode::Escape),
                        ..
                    },
                ..
            }
            | WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(PhysicalSize { width, height }) => {
                self.camera.set_aspect(width, height);
                if let Some(scene) = self.scene.as_mut() {
                    scene.backend_mut().resize(width, height);
                }
            }
            WindowEvent::RedrawRequested => {
                if let Err(err) = self.redraw() {
                    self.fail(event_loop, err);
                }
            }
            _ => (),
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(ref window) = self.window {
            window.request_redraw();
        }
    }
}
