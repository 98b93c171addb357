//! Application configuration
//!
//! Configuration is loaded from multiple sources with the following priority (lowest to highest):
//! 1. `config/default.toml` (version controlled)
//! 2. `config/user.toml` (gitignored, user overrides)
//! 3. Environment variables (`RH2D_SECTION__KEY`)

use figment::{Figment, providers::{Format, Toml, Env}};
use rehab_render::{LayerMask, OverrunPolicy, PumpConfig};
use serde::{Serialize, Deserialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Window configuration
    #[serde(default)]
    pub window: WindowConfig,
    /// Frame pump configuration
    #[serde(default)]
    pub render: RenderConfig,
    /// World tick configuration
    #[serde(default)]
    pub world: WorldConfig,
    /// Arena to load
    #[serde(default)]
    pub scene: SceneConfig,
    /// Debug configuration
    #[serde(default)]
    pub debug: DebugConfig,
}

impl AppConfig {
    /// Load configuration from default locations
    ///
    /// Priority (lowest to highest):
    /// 1. `config/default.toml`
    /// 2. `config/user.toml`
    /// 3. Environment variables (`RH2D_*`)
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from("config")
    }

    /// Load configuration from a specific config directory
    pub fn load_from<P: AsRef<Path>>(config_dir: P) -> Result<Self, ConfigError> {
        let config_dir = config_dir.as_ref();
        let default_path = config_dir.join("default.toml");
        let user_path = config_dir.join("user.toml");

        let mut figment = Figment::new();

        if default_path.exists() {
            figment = figment.merge(Toml::file(&default_path));
        }

        if user_path.exists() {
            figment = figment.merge(Toml::file(&user_path));
        }

        // RH2D_RENDER__FPS=30 -> render.fps = 30
        figment = figment.merge(Env::prefixed("RH2D_").split("__"));

        figment.extract().map_err(ConfigError::from)
    }

    /// Frame pump settings derived from the window and render sections
    pub fn pump_config(&self) -> PumpConfig {
        let paint_layers = if self.render.paint_all_layers {
            LayerMask::first(self.render.layer_count)
        } else {
            LayerMask::BASE
        };
        PumpConfig {
            fps: self.render.fps,
            width: self.window.width,
            height: self.window.height,
            layer_count: self.render.layer_count,
            clear_color: self.render.clear_color,
            paint_layers,
            overrun: self.render.overrun_policy,
        }
    }
}

/// Window configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    /// Window title
    pub title: String,
    /// Surface width in pixels
    pub width: u32,
    /// Surface height in pixels
    pub height: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Rehab 2D".to_string(),
            width: 720,
            height: 480,
        }
    }
}

/// Frame pump configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Target frames per second
    pub fps: u32,
    /// Number of compositing layers (1 to 8)
    pub layer_count: usize,
    /// ARGB fill at the start of each frame
    pub clear_color: u32,
    /// Paint every layer instead of layer 0 only
    pub paint_all_layers: bool,
    /// `catch_up` or `legacy`
    pub overrun_policy: OverrunPolicy,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            fps: 60,
            layer_count: 3,
            clear_color: rehab_render::CLEAR_GREY,
            paint_all_layers: false,
            overrun_policy: OverrunPolicy::CatchUp,
        }
    }
}

/// World tick configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// World updates per second
    pub tick_rate: u32,
    /// Gravity in pixels per second squared (negative = downward)
    pub gravity: f64,
    /// Height of the floor top; falling bodies rest with their bottom edge here
    pub floor_y: f64,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            tick_rate: 60,
            gravity: -600.0,
            floor_y: 32.0,
        }
    }
}

/// Arena configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// Arena file (RON)
    pub path: PathBuf,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("scenes/basic_test.ron"),
        }
    }
}

/// Debug configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DebugConfig {
    /// Log level (error, warn, info, debug, trace)
    pub log_level: String,
    /// Stop both loops after this many seconds; 0 runs until killed
    pub run_for_secs: u64,
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            run_for_secs: 0,
        }
    }
}

impl DebugConfig {
    pub fn run_for(&self) -> Option<Duration> {
        (self.run_for_secs > 0).then(|| Duration::from_secs(self.run_for_secs))
    }
}

/// Configuration error
#[derive(Debug)]
pub struct ConfigError {
    message: String,
}

impl From<figment::Error> for ConfigError {
    fn from(e: figment::Error) -> Self {
        ConfigError {
            message: e.to_string(),
        }
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Configuration error: {}", self.message)
    }
}

impl std::error::Error for ConfigError {}
