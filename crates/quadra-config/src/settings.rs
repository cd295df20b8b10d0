//! Settings file format and operations.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::Result;
use crate::error::ConfigError;
use quadra_core::{
    DEFAULT_BLOCK_SIZE, DEFAULT_OVERLAP, FilterConfig, LogicSteeringConfig, WindowType,
};

/// Settings for the SQ encoder and decoder.
///
/// # TOML Format
///
/// ```toml
/// [filter]
/// block_size = 1024
/// overlap = 512
/// window = "hann"
///
/// [steering]
/// enabled = true
/// attack = 0.01
/// release = 0.2
/// threshold = 0.55
/// max_boost = 1.6
/// min_gain = 0.4
///
/// [output]
/// format = "pcm16"
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Settings {
    /// Hilbert filter geometry.
    pub filter: FilterSettings,
    /// Decoder logic steering.
    pub steering: SteeringSettings,
    /// Output file encoding.
    pub output: OutputSettings,
}

/// `[filter]` section.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FilterSettings {
    /// FFT block size (power of two).
    pub block_size: usize,
    /// Hop length and kernel footprint.
    pub overlap: usize,
    /// Window name (`hann`, `hamming`, `blackman`, `rectangular`).
    pub window: String,
}

impl Default for FilterSettings {
    fn default() -> Self {
        Self {
            block_size: DEFAULT_BLOCK_SIZE,
            overlap: DEFAULT_OVERLAP,
            window: WindowType::default().name().to_string(),
        }
    }
}

/// `[steering]` section.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SteeringSettings {
    /// Steering on or off.
    pub enabled: bool,
    /// Attack time in seconds.
    pub attack: f64,
    /// Release time in seconds.
    pub release: f64,
    /// Dominance threshold.
    pub threshold: f64,
    /// Maximum boost of the dominant channel.
    pub max_boost: f64,
    /// Minimum gain of the other channels.
    pub min_gain: f64,
}

impl Default for SteeringSettings {
    fn default() -> Self {
        LogicSteeringConfig::default().into()
    }
}

impl From<LogicSteeringConfig> for SteeringSettings {
    fn from(config: LogicSteeringConfig) -> Self {
        Self {
            enabled: config.enabled,
            attack: config.attack_time,
            release: config.release_time,
            threshold: config.dominance_threshold,
            max_boost: config.max_boost,
            min_gain: config.min_gain,
        }
    }
}

/// Output sample encoding.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// 16-bit integer PCM.
    #[default]
    Pcm16,
    /// 24-bit integer PCM.
    Pcm24,
    /// 32-bit IEEE float.
    Float32,
}

/// `[output]` section.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct OutputSettings {
    /// Sample encoding of written files.
    pub format: OutputFormat,
}

impl Settings {
    /// Load settings from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content =
            std::fs::read_to_string(path).map_err(|e| ConfigError::read_file(path, e))?;
        Self::from_toml(&content)
    }

    /// Parse settings from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Save the settings to a TOML file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let content = self.to_toml()?;
        std::fs::write(path, content).map_err(|e| ConfigError::write_file(path, e))?;
        Ok(())
    }

    /// Convert the settings to a TOML string.
    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Parsed window type.
    pub fn window(&self) -> Result<WindowType> {
        self.filter
            .window
            .parse()
            .map_err(|_| ConfigError::UnknownWindow(self.filter.window.clone()))
    }

    /// Validated filter geometry.
    pub fn filter_config(&self) -> Result<FilterConfig> {
        let window = self.window()?;
        Ok(FilterConfig::new(
            self.filter.block_size,
            self.filter.overlap,
            window,
        )?)
    }

    /// Validated steering parameters.
    pub fn steering_config(&self) -> Result<LogicSteeringConfig> {
        let s = &self.steering;
        let config = LogicSteeringConfig {
            enabled: s.enabled,
            attack_time: s.attack,
            release_time: s.release,
            dominance_threshold: s.threshold,
            max_boost: s.max_boost,
            min_gain: s.min_gain,
        };
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_gives_defaults() {
        let settings = Settings::from_toml("").unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.filter_config().unwrap(), FilterConfig::default());
        assert_eq!(
            settings.steering_config().unwrap(),
            LogicSteeringConfig::default()
        );
        assert_eq!(settings.output.format, OutputFormat::Pcm16);
    }

    #[test]
    fn full_file() {
        let toml = r#"
[filter]
block_size = 2048
overlap = 1024
window = "blackman"

[steering]
enabled = true
attack = 0.005
release = 0.5
threshold = 0.6
max_boost = 2.0
min_gain = 0.3

[output]
format = "float32"
"#;
        let settings = Settings::from_toml(toml).unwrap();
        let filter = settings.filter_config().unwrap();
        assert_eq!(filter.block_size(), 2048);
        assert_eq!(filter.overlap(), 1024);
        assert_eq!(filter.window(), WindowType::Blackman);

        let steering = settings.steering_config().unwrap();
        assert!(steering.enabled);
        assert_eq!(steering.attack_time, 0.005);
        assert_eq!(steering.max_boost, 2.0);
        assert_eq!(settings.output.format, OutputFormat::Float32);
    }

    #[test]
    fn partial_section_keeps_other_defaults() {
        let settings = Settings::from_toml("[steering]\nenabled = true\n").unwrap();
        let steering = settings.steering_config().unwrap();
        assert!(steering.enabled);
        assert_eq!(steering.dominance_threshold, 0.55);
        assert_eq!(settings.filter.block_size, 1024);
    }

    #[test]
    fn invalid_geometry_is_reported() {
        let settings = Settings::from_toml("[filter]\nblock_size = 1000\n").unwrap();
        assert!(matches!(
            settings.filter_config(),
            Err(ConfigError::Invalid(quadra_core::Error::InvalidBlockSize(1000)))
        ));
    }

    #[test]
    fn invalid_steering_is_reported() {
        let settings = Settings::from_toml("[steering]\nmin_gain = 0.0\n").unwrap();
        assert!(matches!(
            settings.steering_config(),
            Err(ConfigError::Invalid(quadra_core::Error::InvalidSteering(_)))
        ));
    }

    #[test]
    fn unknown_window_is_reported() {
        let settings = Settings::from_toml("[filter]\nwindow = \"kaiser\"\n").unwrap();
        assert!(matches!(
            settings.filter_config(),
            Err(ConfigError::UnknownWindow(ref w)) if w == "kaiser"
        ));
    }

    #[test]
    fn unknown_format_fails_to_parse() {
        assert!(matches!(
            Settings::from_toml("[output]\nformat = \"mp3\"\n"),
            Err(ConfigError::TomlParse(_))
        ));
    }

    #[test]
    fn to_toml_round_trips() {
        let mut settings = Settings::default();
        settings.steering.enabled = true;
        settings.output.format = OutputFormat::Pcm24;
        let text = settings.to_toml().unwrap();
        assert!(text.contains("format = \"pcm24\""), "{text}");
        assert_eq!(Settings::from_toml(&text).unwrap(), settings);
    }
}
