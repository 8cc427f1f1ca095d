//! Window and scene settings for the demo application

use std::path::PathBuf;

use crate::logging::LoggingConfig;

/// Overrides the directory desk textures are read from
pub const TEXTURE_DIR_VAR: &str = "STILLIFE_TEXTURE_DIR";
/// Overrides the log filter, taking precedence over `RUST_LOG`
pub const LOG_FILTER_VAR: &str = "STILLIFE_LOG";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub texture_dir: PathBuf,
    /// Linear RGB clear color
    pub clear_color: [f64; 3],
    pub logging: LoggingConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            title: "Stillife".to_string(),
            width: 1000,
            height: 800,
            texture_dir: PathBuf::from("textures"),
            clear_color: [0.0, 0.0, 0.0],
            logging: LoggingConfig::default(),
        }
    }
}

impl AppConfig {
    /// Default settings with environment overrides applied
    pub fn from_env() -> Self {
        Self::default().with_overrides(|key| std::env::var(key).ok())
    }

    /// Applies overrides looked up through `lookup`. Empty values are ignored.
    pub fn with_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        if let Some(dir) = lookup(TEXTURE_DIR_VAR) {
            self.texture_dir = PathBuf::from(dir);
        }
        if let Some(filter) = lookup(LOG_FILTER_VAR) {
            self.logging.env_filter = Some(filter);
        }
        self
    }

    pub fn aspect_ratio(&self) -> f32 {
        self.width as f32 / self.height.max(1) as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.texture_dir, PathBuf::from("textures"));
        assert!(config.logging.env_filter.is_none());
        assert!((config.aspect_ratio() - 1.25).abs() < 1e-6);
    }

    #[test]
    fn test_overrides_apply() {
        let config = AppConfig::default().with_overrides(lookup_from(&[
            (TEXTURE_DIR_VAR, "/srv/assets"),
            (LOG_FILTER_VAR, "stillife=debug"),
        ]));
        assert_eq!(config.texture_dir, PathBuf::from("/srv/assets"));
        assert_eq!(config.logging.env_filter.as_deref(), Some("stillife=debug"));
    }

    #[test]
    fn test_blank_override_is_ignored() {
        let config = AppConfig::default().with_overrides(lookup_from(&[(TEXTURE_DIR_VAR, "  ")]));
        assert_eq!(config.texture_dir, PathBuf::from("textures"));
    }

    #[test]
    fn test_zero_height_aspect() {
        let config = AppConfig {
            height: 0,
            ..AppConfig::default()
        };
        assert_eq!(config.aspect_ratio(), 1000.0);
    }
}
