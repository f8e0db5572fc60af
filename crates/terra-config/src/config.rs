//! Configuration structs with sensible defaults and RON persistence.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::color::SrgbColor;
use crate::error::ConfigError;

const CONFIG_FILE: &str = "config.ron";

/// Top-level viewer configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Window settings.
    pub window: WindowConfig,
    /// Rendering settings.
    pub render: RenderConfig,
    /// Initial camera placement and projection.
    pub camera: CameraConfig,
    /// Orbit controls.
    pub controls: ControlsConfig,
    /// Globe appearance, assets and animation.
    pub globe: GlobeConfig,
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
    /// Start in fullscreen mode.
    pub fullscreen: bool,
    /// Enable vsync (PresentMode::Fifo).
    pub vsync: bool,
    pub title: String,
}

/// Rendering configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RenderConfig {
    /// Upper bound on the device pixel ratio used for the render target.
    pub max_pixel_ratio: f64,
    /// Background color behind the globe.
    pub clear_color: SrgbColor,
    /// Anisotropic filtering level for the earth textures (1 disables it).
    pub anisotropy: u16,
    /// Longitude and latitude segment count of the globe mesh.
    pub sphere_segments: u32,
}

/// Initial camera placement and perspective projection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CameraConfig {
    /// Vertical field of view in degrees.
    pub fov_y_degrees: f32,
    pub near: f32,
    pub far: f32,
    /// Starting eye position in world units.
    pub position: [f32; 3],
    /// Point the camera orbits around.
    pub target: [f32; 3],
}

/// Drag-to-orbit controls.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ControlsConfig {
    /// Keep rotating with decaying velocity after the pointer is released.
    pub enable_damping: bool,
    /// Fraction of the pending rotation applied per frame when damping.
    pub damping_factor: f32,
    pub rotate_speed: f32,
    pub zoom_speed: f32,
    pub min_distance: f32,
    pub max_distance: f32,
}

/// Globe appearance, texture assets and rotation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GlobeConfig {
    /// Spin rate of the globe and its pins in radians per second.
    pub rotation_rate: f64,
    /// Direction towards the sun in world space (normalized on use).
    pub sun_direction: [f32; 3],
    pub atmosphere_day_color: SrgbColor,
    pub atmosphere_twilight_color: SrgbColor,
    /// Atmosphere shell radius relative to the globe.
    pub atmosphere_scale: f32,
    pub pin_radius: f32,
    pub pin_segments: u32,
    pub pin_color: SrgbColor,
    /// Root directory for texture assets. Relative paths resolve against
    /// the working directory.
    pub asset_dir: PathBuf,
    /// Daytime surface color map, relative to `asset_dir`.
    pub day_texture: PathBuf,
    /// Night-side city lights, relative to `asset_dir`.
    pub night_texture: PathBuf,
    /// Specular mask in R and cloud cover in G, relative to `asset_dir`.
    pub specular_clouds_texture: PathBuf,
}

/// Debug/development configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DebugConfig {
    /// Log level override (e.g., "debug", "info", "warn").
    pub log_level: String,
    /// Periodically log frame rate and rotation angle.
    pub log_frame_stats: bool,
}

// --- Default implementations ---

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
            fullscreen: false,
            vsync: true,
            title: "Terra".to_string(),
        }
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            max_pixel_ratio: 2.0,
            clear_color: SrgbColor::rgb(0x00, 0x00, 0x11),
            anisotropy: 8,
            sphere_segments: 64,
        }
    }
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_y_degrees: 25.0,
            near: 0.1,
            far: 100.0,
            position: [12.0, 5.0, 4.0],
            target: [0.0, 0.0, 0.0],
        }
    }
}

impl Default for ControlsConfig {
    fn default() -> Self {
        Self {
            enable_damping: true,
            damping_factor: 0.05,
            rotate_speed: 1.0,
            zoom_speed: 1.0,
            min_distance: 1.5,
            max_distance: 50.0,
        }
    }
}

impl Default for GlobeConfig {
    fn default() -> Self {
        Self {
            rotation_rate: 0.1,
            sun_direction: [0.0, 0.0, 1.0],
            atmosphere_day_color: SrgbColor::rgb(0x00, 0xaa, 0xff),
            atmosphere_twilight_color: SrgbColor::rgb(0xff, 0x66, 0x00),
            atmosphere_scale: 1.04,
            pin_radius: 0.01,
            pin_segments: 20,
            pin_color: SrgbColor::rgb(0x00, 0x00, 0xff),
            asset_dir: PathBuf::from("assets"),
            day_texture: PathBuf::from("earth/day.jpg"),
            night_texture: PathBuf::from("earth/night.jpg"),
            specular_clouds_texture: PathBuf::from("earth/specularClouds.jpg"),
        }
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_frame_stats: false,
        }
    }
}

impl GlobeConfig {
    pub fn day_texture_path(&self) -> PathBuf {
        self.asset_dir.join(&self.day_texture)
    }

    pub fn night_texture_path(&self) -> PathBuf {
        self.asset_dir.join(&self.night_texture)
    }

    pub fn specular_clouds_texture_path(&self) -> PathBuf {
        self.asset_dir.join(&self.specular_clouds_texture)
    }
}

// --- Load / Save / Reload ---

impl Config {
    /// Load config from the given directory, or create a default config file.
    pub fn load_or_create(config_dir: &Path) -> Result<Self, ConfigError> {
        let config_path = config_dir.join(CONFIG_FILE);

        if config_path.exists() {
            let config = Self::read(&config_path)?;
            log::info!("Loaded config from {}", config_path.display());
            Ok(config)
        } else {
            let config = Config::default();
            config.save(config_dir)?;
            log::info!("Created default config at {}", config_path.display());
            Ok(config)
        }
    }

    /// Save config to the given directory as `config.ron`.
    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        std::fs::create_dir_all(config_dir).map_err(|source| ConfigError::Write {
            path: config_dir.to_path_buf(),
            source,
        })?;

        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(3)
            .separate_tuple_members(true)
            .enumerate_arrays(false);

        let serialized =
            ron::ser::to_string_pretty(self, pretty).map_err(ConfigError::Serialize)?;

        let path = config_dir.join(CONFIG_FILE);
        std::fs::write(&path, serialized).map_err(|source| ConfigError::Write { path, source })
    }

    /// Re-read the file; returns `Some(new_config)` only if it differs from `self`.
    pub fn reload(&self, config_dir: &Path) -> Result<Option<Self>, ConfigError> {
        let new_config = Self::read(&config_dir.join(CONFIG_FILE))?;

        if &new_config != self {
            log::info!("Config reloaded with changes");
            Ok(Some(new_config))
        } else {
            Ok(None)
        }
    }

    fn read(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        ron::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
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
        assert!(ron_str.contains("\"#00aaff\""));
        assert!(ron_str.contains("\"#ff6600\""));
    }

    #[test]
    fn test_defaults_describe_the_reference_scene() {
        let config = Config::default();
        assert_eq!(config.camera.fov_y_degrees, 25.0);
        assert_eq!(config.camera.position, [12.0, 5.0, 4.0]);
        assert_eq!((config.camera.near, config.camera.far), (0.1, 100.0));
        assert_eq!(config.globe.rotation_rate, 0.1);
        assert_eq!(config.globe.sun_direction, [0.0, 0.0, 1.0]);
        assert_eq!(config.globe.atmosphere_scale, 1.04);
        assert_eq!(config.render.max_pixel_ratio, 2.0);
        assert_eq!(config.render.clear_color.to_string(), "#000011");
        assert!(config.controls.enable_damping);
    }

    #[test]
    fn test_config_roundtrip() {
        let config = Config::default();
        let ron_str = ron::to_string(&config).unwrap();
        let deserialized: Config = ron::from_str(&ron_str).unwrap();
        assert_eq!(config, deserialized);
    }

    #[test]
    fn test_missing_section_uses_default() {
        let ron_str = "(window: (), render: (), debug: ())";
        let config: Config = ron::from_str(ron_str).unwrap();
        assert_eq!(config.globe, GlobeConfig::default());
        assert_eq!(config.camera, CameraConfig::default());
    }

    #[test]
    fn test_partial_section_keeps_other_defaults() {
        let ron_str = "(globe: (rotation_rate: 0.25, atmosphere_day_color: \"white\"))";
        let config: Config = ron::from_str(ron_str).unwrap();
        assert_eq!(config.globe.rotation_rate, 0.25);
        assert_eq!(config.globe.atmosphere_day_color, SrgbColor::rgb(255, 255, 255));
        assert_eq!(
            config.globe.atmosphere_twilight_color,
            SrgbColor::rgb(0xff, 0x66, 0x00)
        );
    }

    #[test]
    fn test_invalid_color_is_a_parse_error() {
        let ron_str = "(globe: (pin_color: \"#12345\"))";
        let result: Result<Config, _> = ron::from_str(ron_str);
        assert!(result.is_err());
    }

    #[test]
    fn test_extra_field_ignored() {
        let result: Result<Config, _> = ron::from_str("(future_setting: true)");
        assert!(result.is_ok());
    }

    #[test]
    fn test_texture_paths_join_asset_dir() {
        let globe = GlobeConfig {
            asset_dir: PathBuf::from("/srv/terra"),
            ..GlobeConfig::default()
        };
        assert_eq!(
            globe.day_texture_path(),
            PathBuf::from("/srv/terra/earth/day.jpg")
        );
        assert_eq!(
            globe.specular_clouds_texture_path(),
            PathBuf::from("/srv/terra/earth/specularClouds.jpg")
        );
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.window.width = 1920;
        config.globe.atmosphere_twilight_color = SrgbColor::rgb(0xaa, 0x22, 0x11);

        config.save(dir.path()).unwrap();
        let loaded = Config::load_or_create(dir.path()).unwrap();
        assert_eq!(config, loaded);
    }

    #[test]
    fn test_load_or_create_writes_default_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_or_create(dir.path()).unwrap();
        assert_eq!(config, Config::default());
        assert!(dir.path().join("config.ron").exists());
    }

    #[test]
    fn test_reload_detects_changes() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::default();
        config.save(dir.path()).unwrap();

        let mut modified = config.clone();
        modified.globe.rotation_rate = 0.5;
        modified.save(dir.path()).unwrap();

        let result = config.reload(dir.path()).unwrap();
        assert_eq!(result.map(|c| c.globe.rotation_rate), Some(0.5));
    }

    #[test]
    fn test_reload_no_changes() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::default();
        config.save(dir.path()).unwrap();

        assert!(config.reload(dir.path()).unwrap().is_none());
    }

    #[test]
    fn test_reload_missing_file_is_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = Config::default().reload(dir.path());
        assert!(matches!(result, Err(ConfigError::Read { .. })));
    }
}
