//! Configuration structs with sensible defaults and RON persistence.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// File name of the persisted configuration inside the config directory.
pub const CONFIG_FILE_NAME: &str = "config.ron";

/// Top-level viewer configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Window settings.
    pub window: WindowConfig,
    /// Rendering settings.
    pub render: RenderConfig,
    /// Remote texture sources and loader settings.
    pub textures: TextureConfig,
    /// Starfield generation settings.
    pub starfield: StarfieldConfig,
    /// Debug/development settings.
    pub debug: DebugConfig,
}

/// Window configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WindowConfig {
    /// Window width in logical pixels.
    pub width: u32,
    /// Window height in logical pixels.
    pub height: u32,
    /// Start in borderless fullscreen.
    pub fullscreen: bool,
    /// Window title.
    pub title: String,
}

/// Rendering configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RenderConfig {
    /// Enable vsync (PresentMode::Fifo). The frame loop is paced by presentation.
    pub vsync: bool,
    /// MSAA sample count (1 or 4).
    pub msaa_samples: u32,
    /// Upper bound applied to the display's device pixel ratio.
    pub max_pixel_ratio: f64,
}

/// Texture sources for the four planet maps.
///
/// `http://` and `https://` URLs are fetched over the network; anything else
/// is read as a local file path.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TextureConfig {
    /// Planet colour map.
    pub diffuse_url: String,
    /// Planet bump map.
    pub bump_url: String,
    /// Planet specular (ocean shine) map.
    pub specular_url: String,
    /// Cloud shell map.
    pub cloud_url: String,
    /// Skip all fetches; every channel fails and the procedural planet is shown.
    pub offline: bool,
    /// Number of loader worker threads.
    pub worker_count: usize,
    /// Maximum accepted response body size in bytes.
    pub max_bytes: u64,
}

/// Starfield generation configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct StarfieldConfig {
    /// RNG seed. `None` draws a fresh seed at every start.
    pub seed: Option<u64>,
}

/// Debug/development configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DebugConfig {
    /// Log the measured frame rate once per second.
    pub show_fps: bool,
    /// Log level override (e.g., "debug", "info", "warn").
    pub log_level: String,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
            fullscreen: false,
            title: "Globe".to_string(),
        }
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            vsync: true,
            msaa_samples: 4,
            max_pixel_ratio: 2.0,
        }
    }
}

impl Default for TextureConfig {
    fn default() -> Self {
        Self {
            diffuse_url: "https://threejs.org/examples/textures/planets/earth_atmos_2048.jpg"
                .to_string(),
            bump_url: "https://threejs.org/examples/textures/planets/earth_normal_2048.jpg"
                .to_string(),
            specular_url: "https://threejs.org/examples/textures/planets/earth_specular_2048.jpg"
                .to_string(),
            cloud_url: "https://threejs.org/examples/textures/planets/earth_clouds_1024.png"
                .to_string(),
            offline: false,
            worker_count: 4,
            max_bytes: 32 * 1024 * 1024,
        }
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            show_fps: false,
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    /// Path of the config file inside `config_dir`.
    pub fn path_in(config_dir: &Path) -> PathBuf {
        config_dir.join(CONFIG_FILE_NAME)
    }

    /// Reads `config.ron` from `config_dir`. A missing file is written out
    /// with defaults first so users have something to edit.
    pub fn load_or_create(config_dir: &Path) -> Result<Self, ConfigError> {
        let path = Self::path_in(config_dir);
        if !path.exists() {
            let defaults = Self::default();
            defaults.save(config_dir)?;
            log::info!("Wrote default config to {}", path.display());
            return Ok(defaults);
        }
        let config = Self::read(&path)?;
        log::info!("Using config {}", path.display());
        Ok(config)
    }

    /// Writes pretty-printed RON to `config_dir`, creating the directory.
    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        std::fs::create_dir_all(config_dir).map_err(write_error(config_dir.to_path_buf()))?;

        let text = ron::ser::to_string_pretty(
            self,
            ron::ser::PrettyConfig::new()
                .depth_limit(3)
                .enumerate_arrays(false),
        )?;
        let path = Self::path_in(config_dir);
        std::fs::write(&path, text).map_err(write_error(path.clone()))
    }

    /// Reject values the viewer cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.window.width == 0 || self.window.height == 0 {
            return Err(ConfigError::Invalid {
                field: "window",
                reason: format!(
                    "size must be non-zero, got {}x{}",
                    self.window.width, self.window.height
                ),
            });
        }
        if !matches!(self.render.msaa_samples, 1 | 4) {
            return Err(ConfigError::Invalid {
                field: "render.msaa_samples",
                reason: format!("expected 1 or 4, got {}", self.render.msaa_samples),
            });
        }
        if self.render.max_pixel_ratio.is_nan() || self.render.max_pixel_ratio < 1.0 {
            return Err(ConfigError::Invalid {
                field: "render.max_pixel_ratio",
                reason: format!("must be at least 1.0, got {}", self.render.max_pixel_ratio),
            });
        }
        if self.textures.worker_count == 0 {
            return Err(ConfigError::Invalid {
                field: "textures.worker_count",
                reason: "at least one loader thread is required".to_string(),
            });
        }
        Ok(())
    }

    fn read(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(ron::from_str(&text)?)
    }
}

fn write_error(path: PathBuf) -> impl FnOnce(std::io::Error) -> ConfigError {
    move |source| ConfigError::Write { path, source }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_serializes() {
        let config = Config::default();
        let ron_str =
            ron::ser::to_string_pretty(&config, ron::ser::PrettyConfig::new().depth_limit(3))
                .unwrap();
        assert!(ron_str.contains("width: 1280"));
        assert!(ron_str.contains("earth_atmos_2048.jpg"));
    }

    #[test]
    fn test_config_roundtrip() {
        let mut config = Config::default();
        config.starfield.seed = Some(7);
        let ron_str = ron::to_string(&config).unwrap();
        let deserialized: Config = ron::from_str(&ron_str).unwrap();
        assert_eq!(config, deserialized);
    }

    #[test]
    fn test_missing_section_uses_default() {
        let ron_str = "(window: (width: 800))";
        let config: Config = ron::from_str(ron_str).unwrap();
        assert_eq!(config.window.width, 800);
        assert_eq!(config.window.height, 720);
        assert_eq!(config.textures, TextureConfig::default());
    }

    #[test]
    fn test_extra_field_ignored() {
        let result: Result<Config, _> = ron::from_str("(future_setting: true)");
        assert!(result.is_ok());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.window.width = 1920;
        config.textures.offline = true;
        config.textures.diffuse_url = "assets/earth.jpg".to_string();

        config.save(dir.path()).unwrap();
        let loaded = Config::load_or_create(dir.path()).unwrap();
        assert_eq!(config, loaded);
    }

    #[test]
    fn test_load_or_create_writes_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_or_create(dir.path()).unwrap();
        assert_eq!(config, Config::default());
        assert!(Config::path_in(dir.path()).exists());
    }

    #[test]
    fn test_invalid_ron_produces_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE_NAME), "{{not valid}}").unwrap();
        let result = Config::load_or_create(dir.path());
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_default_config_validates() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = Config::default();
        config.render.msaa_samples = 3;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid {
                field: "render.msaa_samples",
                ..
            })
        ));

        let mut config = Config::default();
        config.textures.worker_count = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.window.height = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_low_or_nan_pixel_ratio() {
        for ratio in [0.5, f64::NAN] {
            let mut config = Config::default();
            config.render.max_pixel_ratio = ratio;
            assert!(matches!(
                config.validate(),
                Err(ConfigError::Invalid {
                    field: "render.max_pixel_ratio",
                    ..
                })
            ));
        }
        let mut config = Config::default();
        config.render.max_pixel_ratio = 1.0;
        assert!(config.validate().is_ok());
    }
}
