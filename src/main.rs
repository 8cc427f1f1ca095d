use stillife::{app::StillifeApp, config::AppConfig, logging::init_logging};

fn main() -> anyhow::Result<()> {
    let config = AppConfig::from_env();
    init_logging(config.logging.clone());

    log::info!("Loading desk textures from {}", config.texture_dir.display());
    StillifeApp::new(config)?.run()
}
