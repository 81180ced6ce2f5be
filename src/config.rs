use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::menu::{MenuStyle, Rgb, StepItem, StepperType, TextStyle};
use crate::stepper::TransitionMode;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub stepper: StepperConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub ui: UiConfig,
    #[serde(default)]
    pub paths: PathsConfig,
}

/// Declarative stepper construction options
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepperConfig {
    /// One of `tab`, `tab-numbered`, `progress`, `fleets`
    #[serde(rename = "type", default)]
    pub kind: StepperType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub widget_color: Option<Rgb>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_color: Option<Rgb>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon_size: Option<u16>,
    /// Unset keeps the per-type default label size
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_size: Option<u16>,
    #[serde(default)]
    pub text_style: TextStyle,
    /// How long each fleet stays before advancing (default: 5000)
    #[serde(default = "default_fleet_duration_ms")]
    pub fleet_duration_ms: u64,
    #[serde(default)]
    pub mode: TransitionMode,
    /// Steps, in any order; they are sorted by `order` when added
    #[serde(default)]
    pub items: Vec<StepItem>,
}

fn default_fleet_duration_ms() -> u64 {
    5000
}

impl Default for StepperConfig {
    fn default() -> Self {
        Self {
            kind: StepperType::default(),
            widget_color: None,
            text_color: None,
            icon_size: None,
            text_size: None,
            text_style: TextStyle::default(),
            fleet_duration_ms: default_fleet_duration_ms(),
            mode: TransitionMode::default(),
            items: Vec::new(),
        }
    }
}

impl StepperConfig {
    /// Resolve unset style options against the defaults of the configured type
    pub fn style(&self) -> MenuStyle {
        let defaults = MenuStyle::defaults_for(self.kind);
        MenuStyle {
            widget_color: self.widget_color.unwrap_or(defaults.widget_color),
            text_color: self.text_color.unwrap_or(defaults.text_color),
            icon_size: self.icon_size.unwrap_or(defaults.icon_size),
            text_size: self.text_size,
            text_style: self.text_style,
        }
    }

    pub fn fleet_duration(&self) -> Duration {
        Duration::from_millis(self.fleet_duration_ms)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (default: "info"); `RUST_LOG` takes precedence
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Write logs to a file in TUI mode instead of stderr (default: true)
    #[serde(default = "default_log_to_file")]
    pub to_file: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_to_file() -> bool {
    true
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            to_file: default_log_to_file(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Event poll interval; also the fleet timer tick (default: 50)
    #[serde(default = "default_tick_rate_ms")]
    pub tick_rate_ms: u64,
}

fn default_tick_rate_ms() -> u64 {
    50
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            tick_rate_ms: default_tick_rate_ms(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    #[serde(default = "default_state_dir")]
    pub state: String,
}

fn default_state_dir() -> String {
    ".stepper".to_string()
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            state: default_state_dir(),
        }
    }
}

impl Config {
    /// Global user config in ~/.config/stepper/
    pub fn user_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("stepper").join("config.toml"))
    }

    pub fn load(config_path: Option<&str>) -> Result<Self> {
        let user_config = Self::user_config_path();
        Self::load_from(user_config.as_deref(), config_path.map(Path::new))
    }

    /// Layer embedded defaults, the user config, an explicit file and
    /// `STEPPER__` environment variables, lowest precedence first.
    pub fn load_from(user_config: Option<&Path>, explicit: Option<&Path>) -> Result<Self> {
        let defaults = Config::default();
        let defaults_json =
            serde_json::to_string(&defaults).context("Failed to serialize default config")?;

        let mut builder = config::Config::builder().add_source(config::File::from_str(
            &defaults_json,
            config::FileFormat::Json,
        ));

        if let Some(path) = user_config {
            if path.exists() {
                builder = builder.add_source(config::File::from(path));
            }
        }

        if let Some(path) = explicit {
            builder = builder.add_source(config::File::from(path));
        }

        builder = builder.add_source(
            config::Environment::with_prefix("STEPPER")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build().context("Failed to load configuration")?;
        config
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let toml_str = self.to_toml()?;
        std::fs::write(path, toml_str).context("Failed to write config file")?;

        Ok(())
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize config to TOML")
    }

    /// Get absolute path to state directory
    pub fn state_path(&self) -> PathBuf {
        let path = PathBuf::from(&self.paths.state);
        if path.is_absolute() {
            path
        } else {
            std::env::current_dir().unwrap_or_default().join(path)
        }
    }

    pub fn logs_path(&self) -> PathBuf {
        self.state_path().join("logs")
    }

    pub fn tick_rate(&self) -> Duration {
        Duration::from_millis(self.ui.tick_rate_ms)
    }
}
