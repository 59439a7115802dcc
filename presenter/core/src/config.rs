//! Presenter Configuration
//!
//! Timing and avatar settings for the presentation engine, loaded from a TOML
//! file at `~/.config/typewriter-presenter/presenter.toml`.
//!
//! # Configuration Priority
//!
//! Values are applied with the following priority (highest first):
//! 1. CLI arguments (via [`ConfigOverrides`])
//! 2. Environment variables (`PRESENTER_*`)
//! 3. TOML configuration file
//! 4. Default values
//!
//! # Example Configuration
//!
//! ```toml
//! [typewriter]
//! delay_ms = 50
//!
//! [avatar]
//! name = "Yollayah"
//! mouth_interval_ms = 150
//! image_root = "/static/images"
//! idle_image = "avatar_idle.png"
//! talk_image = "avatar_talk.png"
//!
//! [tone]
//! frequency_hz = 800.0
//! start_volume = 0.1
//! end_volume = 0.01
//! duration_ms = 50
//! ```

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::audio::ToneSpec;
use crate::avatar::MouthState;

// =============================================================================
// Error Types
// =============================================================================

/// Errors that can occur when loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read config file
    #[error("Failed to read config file at {path}: {source}")]
    ReadError {
        /// The path that was attempted
        path: PathBuf,
        /// The underlying IO error
        source: std::io::Error,
    },

    /// Failed to parse TOML
    #[error("Failed to parse TOML config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Invalid configuration value
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

// =============================================================================
// Configuration Source Tracking
// =============================================================================

/// Tracks where a configuration value came from
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfigSource {
    /// Value from command-line argument
    Cli,
    /// Value from environment variable
    Env,
    /// Value from TOML configuration file
    File,
    /// Default value
    Default,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Cli => write!(f, "CLI"),
            Self::Env => write!(f, "environment"),
            Self::File => write!(f, "config file"),
            Self::Default => write!(f, "default"),
        }
    }
}

// =============================================================================
// Runtime Configuration
// =============================================================================

/// Pacing and tone parameters for one presentation engine
///
/// The engine copies this at construction and never mutates it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TimingConfig {
    /// Delay between two revealed characters
    pub inter_character_delay: Duration,
    /// Interval between two mouth frame toggles
    pub mouth_toggle_interval: Duration,
    /// Beep pitch
    pub tone_frequency_hz: f32,
    /// Beep gain at onset
    pub tone_start_volume: f32,
    /// Beep gain at the end of the decay
    pub tone_end_volume: f32,
    /// Beep length
    pub tone_duration: Duration,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            inter_character_delay: Duration::from_millis(50),
            mouth_toggle_interval: Duration::from_millis(150),
            tone_frequency_hz: 800.0,
            tone_start_volume: 0.1,
            tone_end_volume: 0.01,
            tone_duration: Duration::from_millis(50),
        }
    }
}

impl TimingConfig {
    /// The beep described by this configuration
    #[must_use]
    pub fn tone(&self) -> ToneSpec {
        ToneSpec {
            frequency_hz: self.tone_frequency_hz,
            start_volume: self.tone_start_volume,
            end_volume: self.tone_end_volume,
            duration: self.tone_duration,
        }
    }

    /// Check that every duration is positive and the tone is playable
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ValidationError`] naming the first bad field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.inter_character_delay.is_zero() {
            return Err(ConfigError::ValidationError(
                "typewriter delay must be greater than zero".to_string(),
            ));
        }
        if self.mouth_toggle_interval.is_zero() {
            return Err(ConfigError::ValidationError(
                "mouth animation interval must be greater than zero".to_string(),
            ));
        }
        self.tone()
            .validate()
            .map_err(|e| ConfigError::ValidationError(e.to_string()))
    }
}

/// Avatar identity and image assets
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AvatarConfig {
    /// Name shown in front of AI lines
    pub name: String,
    /// Directory the avatar images are served from
    pub image_root: String,
    /// Mouth-closed (idle) image file name
    pub idle_image: String,
    /// Mouth-open (talking) image file name
    pub talk_image: String,
}

impl Default for AvatarConfig {
    fn default() -> Self {
        Self {
            name: "AI".to_string(),
            image_root: "/static/images".to_string(),
            idle_image: "avatar_idle.png".to_string(),
            talk_image: "avatar_talk.png".to_string(),
        }
    }
}

impl AvatarConfig {
    /// Image path for a mouth frame; a closed mouth is the idle image
    #[must_use]
    pub fn image_path(&self, mouth: MouthState) -> String {
        let file = match mouth {
            MouthState::Closed => &self.idle_image,
            MouthState::Open => &self.talk_image,
        };
        format!("{}/{}", self.image_root.trim_end_matches('/'), file)
    }
}

/// Complete presenter configuration with provenance
#[derive(Clone, Debug)]
pub struct PresenterConfig {
    /// Reveal pacing and beep parameters
    pub timing: TimingConfig,
    /// Avatar identity and images
    pub avatar: AvatarConfig,
    /// Path to the config file that was loaded (if any)
    pub config_file_path: Option<PathBuf>,
    /// Source of configuration values
    source: ConfigSource,
}

impl Default for PresenterConfig {
    fn default() -> Self {
        Self {
            timing: TimingConfig::default(),
            avatar: AvatarConfig::default(),
            config_file_path: None,
            source: ConfigSource::Default,
        }
    }
}

impl PresenterConfig {
    /// Create a new configuration with default values
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the primary source of this configuration
    #[must_use]
    pub fn source(&self) -> ConfigSource {
        self.source
    }
}

// =============================================================================
// TOML Configuration Structures
// =============================================================================

/// `[typewriter]` section
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TypewriterToml {
    /// Delay between characters in milliseconds
    pub delay_ms: Option<u64>,
}

/// `[avatar]` section
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AvatarToml {
    /// Mouth toggle interval in milliseconds
    pub mouth_interval_ms: Option<u64>,
    /// Avatar display name
    pub name: Option<String>,
    /// Image directory
    pub image_root: Option<String>,
    /// Idle image file name
    pub idle_image: Option<String>,
    /// Talking image file name
    pub talk_image: Option<String>,
}

/// `[tone]` section
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ToneToml {
    /// Beep pitch in hertz
    pub frequency_hz: Option<f32>,
    /// Gain at onset
    pub start_volume: Option<f32>,
    /// Gain at the end of the decay
    pub end_volume: Option<f32>,
    /// Beep length in milliseconds
    pub duration_ms: Option<u64>,
}

/// Top-level TOML configuration structure
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PresenterToml {
    /// Typewriter section
    pub typewriter: TypewriterToml,
    /// Avatar section
    pub avatar: AvatarToml,
    /// Tone section
    pub tone: ToneToml,
}

// =============================================================================
// Configuration Loading
// =============================================================================

/// Get the default configuration file path
///
/// Returns `$XDG_CONFIG_HOME/typewriter-presenter/presenter.toml`.
#[must_use]
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("typewriter-presenter").join("presenter.toml"))
}

/// Load configuration from the default path, the environment and defaults
///
/// # Errors
///
/// Returns an error if the config file exists but cannot be parsed, or if the
/// resulting timing values are invalid.
pub fn load_config() -> Result<PresenterConfig, ConfigError> {
    load_config_from_path(default_config_path())
}

/// Load configuration from a specific path
///
/// A missing file is not an error; defaults and environment values are used.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed, or if the resulting
/// timing values are invalid.
pub fn load_config_from_path(path: Option<PathBuf>) -> Result<PresenterConfig, ConfigError> {
    let mut config = PresenterConfig::default();

    if let Some(ref config_path) = path {
        if config_path.exists() {
            let toml_content =
                std::fs::read_to_string(config_path).map_err(|e| ConfigError::ReadError {
                    path: config_path.clone(),
                    source: e,
                })?;

            let toml_config: PresenterToml = toml::from_str(&toml_content)?;
            apply_toml_config(&mut config, &toml_config);
            config.config_file_path = Some(config_path.clone());
            config.source = ConfigSource::File;

            tracing::info!(
                path = %config_path.display(),
                "Loaded presenter configuration from file"
            );
        } else {
            tracing::debug!(
                path = %config_path.display(),
                "Config file not found, using defaults"
            );
        }
    }

    apply_env_config(&mut config, |key| std::env::var(key).ok());

    config.timing.validate()?;
    Ok(config)
}

fn apply_toml_config(config: &mut PresenterConfig, toml: &PresenterToml) {
    if let Some(ms) = toml.typewriter.delay_ms {
        config.timing.inter_character_delay = Duration::from_millis(ms);
    }

    if let Some(ms) = toml.avatar.mouth_interval_ms {
        config.timing.mouth_toggle_interval = Duration::from_millis(ms);
    }
    if let Some(ref name) = toml.avatar.name {
        config.avatar.name.clone_from(name);
    }
    if let Some(ref root) = toml.avatar.image_root {
        config.avatar.image_root.clone_from(root);
    }
    if let Some(ref image) = toml.avatar.idle_image {
        config.avatar.idle_image.clone_from(image);
    }
    if let Some(ref image) = toml.avatar.talk_image {
        config.avatar.talk_image.clone_from(image);
    }

    if let Some(hz) = toml.tone.frequency_hz {
        config.timing.tone_frequency_hz = hz;
    }
    if let Some(volume) = toml.tone.start_volume {
        config.timing.tone_start_volume = volume;
    }
    if let Some(volume) = toml.tone.end_volume {
        config.timing.tone_end_volume = volume;
    }
    if let Some(ms) = toml.tone.duration_ms {
        config.timing.tone_duration = Duration::from_millis(ms);
    }
}

/// Apply `PRESENTER_*` overrides read through `lookup`
fn apply_env_config<F>(config: &mut PresenterConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    let millis = |key: &str| lookup(key).and_then(|v| v.trim().parse::<u64>().ok());
    let float = |key: &str| lookup(key).and_then(|v| v.trim().parse::<f32>().ok());

    if let Some(ms) = millis("PRESENTER_TYPEWRITER_DELAY_MS") {
        config.timing.inter_character_delay = Duration::from_millis(ms);
        config.source = ConfigSource::Env;
    }
    if let Some(ms) = millis("PRESENTER_MOUTH_INTERVAL_MS") {
        config.timing.mouth_toggle_interval = Duration::from_millis(ms);
        config.source = ConfigSource::Env;
    }
    if let Some(hz) = float("PRESENTER_TONE_FREQUENCY_HZ") {
        config.timing.tone_frequency_hz = hz;
        config.source = ConfigSource::Env;
    }
    if let Some(volume) = float("PRESENTER_TONE_VOLUME") {
        config.timing.tone_start_volume = volume;
        config.source = ConfigSource::Env;
    }
    if let Some(volume) = float("PRESENTER_TONE_VOLUME_END") {
        config.timing.tone_end_volume = volume;
        config.source = ConfigSource::Env;
    }
    if let Some(ms) = millis("PRESENTER_TONE_DURATION_MS") {
        config.timing.tone_duration = Duration::from_millis(ms);
        config.source = ConfigSource::Env;
    }
    if let Some(name) = lookup("PRESENTER_AVATAR_NAME") {
        config.avatar.name = name;
        config.source = ConfigSource::Env;
    }
}

// =============================================================================
// CLI Override Support
// =============================================================================

/// Builder for applying CLI overrides to configuration
///
/// Use this after [`load_config`] to apply command-line argument overrides.
#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    /// Typewriter delay override (milliseconds)
    pub delay_ms: Option<u64>,

    /// Mouth interval override (milliseconds)
    pub mouth_interval_ms: Option<u64>,

    /// Avatar name override
    pub avatar_name: Option<String>,
}

impl ConfigOverrides {
    /// Create a new empty set of overrides
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set typewriter delay override
    #[must_use]
    pub fn with_delay_ms(mut self, ms: u64) -> Self {
        self.delay_ms = Some(ms);
        self
    }

    /// Set mouth interval override
    #[must_use]
    pub fn with_mouth_interval_ms(mut self, ms: u64) -> Self {
        self.mouth_interval_ms = Some(ms);
        self
    }

    /// Set avatar name override
    #[must_use]
    pub fn with_avatar_name(mut self, name: impl Into<String>) -> Self {
        self.avatar_name = Some(name.into());
        self
    }

    /// Apply overrides to a configuration and re-validate it
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ValidationError`] if an override makes the
    /// timing invalid (for example a zero delay).
    pub fn apply(&self, config: &mut PresenterConfig) -> Result<(), ConfigError> {
        if self.delay_ms.is_some() || self.mouth_interval_ms.is_some() || self.avatar_name.is_some()
        {
            config.source = ConfigSource::Cli;
        }

        if let Some(ms) = self.delay_ms {
            config.timing.inter_character_delay = Duration::from_millis(ms);
        }
        if let Some(ms) = self.mouth_interval_ms {
            config.timing.mouth_toggle_interval = Duration::from_millis(ms);
        }
        if let Some(ref name) = self.avatar_name {
            config.avatar.name.clone_from(name);
        }

        config.timing.validate()
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = PresenterConfig::default();

        assert_eq!(config.timing.inter_character_delay, Duration::from_millis(50));
        assert_eq!(config.timing.mouth_toggle_interval, Duration::from_millis(150));
        assert!((config.timing.tone_frequency_hz - 800.0).abs() < f32::EPSILON);
        assert_eq!(config.avatar.name, "AI");
        assert_eq!(config.source(), ConfigSource::Default);
        assert!(config.timing.validate().is_ok());
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let config =
            load_config_from_path(Some(PathBuf::from("/nonexistent/presenter.toml"))).unwrap();
        assert!(config.config_file_path.is_none());
        assert_eq!(config.timing.inter_character_delay, Duration::from_millis(50));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[typewriter]
delay_ms = 30

[avatar]
name = "Yollayah"
mouth_interval_ms = 120
talk_image = "yolla_talk.png"

[tone]
frequency_hz = 440.0
duration_ms = 80
"#
        )
        .unwrap();

        let config = load_config_from_path(Some(file.path().to_path_buf())).unwrap();

        assert_eq!(config.config_file_path.as_deref(), Some(file.path()));
        assert_eq!(config.timing.inter_character_delay, Duration::from_millis(30));
        assert_eq!(config.timing.mouth_toggle_interval, Duration::from_millis(120));
        assert_eq!(config.timing.tone_duration, Duration::from_millis(80));
        assert!((config.timing.tone_frequency_hz - 440.0).abs() < f32::EPSILON);
        assert_eq!(config.avatar.name, "Yollayah");
        assert_eq!(config.avatar.talk_image, "yolla_talk.png");
        assert_eq!(config.avatar.idle_image, "avatar_idle.png");
    }

    #[test]
    fn test_invalid_toml_is_parse_error() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[typewriter\ndelay_ms = ").unwrap();

        let err = load_config_from_path(Some(file.path().to_path_buf())).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn test_zero_delay_rejected() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[typewriter]\ndelay_ms = 0").unwrap();

        let err = load_config_from_path(Some(file.path().to_path_buf())).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn test_silent_end_volume_rejected() {
        let timing = TimingConfig {
            tone_end_volume: 0.0,
            ..TimingConfig::default()
        };
        assert!(timing.validate().is_err());
    }

    #[test]
    fn test_env_overrides_file_values() {
        let mut config = PresenterConfig::default();
        apply_toml_config(
            &mut config,
            &PresenterToml {
                typewriter: TypewriterToml { delay_ms: Some(30) },
                ..PresenterToml::default()
            },
        );

        apply_env_config(
            &mut config,
            env_from(&[
                ("PRESENTER_TYPEWRITER_DELAY_MS", "12"),
                ("PRESENTER_TONE_VOLUME", "0.5"),
                ("PRESENTER_AVATAR_NAME", "Axo"),
            ]),
        );

        assert_eq!(config.timing.inter_character_delay, Duration::from_millis(12));
        assert!((config.timing.tone_start_volume - 0.5).abs() < f32::EPSILON);
        assert_eq!(config.avatar.name, "Axo");
        assert_eq!(config.source(), ConfigSource::Env);
    }

    #[test]
    fn test_unparseable_env_value_ignored() {
        let mut config = PresenterConfig::default();
        apply_env_config(
            &mut config,
            env_from(&[("PRESENTER_MOUTH_INTERVAL_MS", "fast")]),
        );

        assert_eq!(config.timing.mouth_toggle_interval, Duration::from_millis(150));
        assert_eq!(config.source(), ConfigSource::Default);
    }

    #[test]
    fn test_cli_overrides() {
        let mut config = PresenterConfig::default();
        ConfigOverrides::new()
            .with_delay_ms(5)
            .with_avatar_name("Yollayah")
            .apply(&mut config)
            .unwrap();

        assert_eq!(config.timing.inter_character_delay, Duration::from_millis(5));
        assert_eq!(config.avatar.name, "Yollayah");
        assert_eq!(config.source(), ConfigSource::Cli);

        let err = ConfigOverrides::new()
            .with_mouth_interval_ms(0)
            .apply(&mut config)
            .unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn test_avatar_image_path() {
        let avatar = AvatarConfig {
            image_root: "/static/images/".to_string(),
            ..AvatarConfig::default()
        };

        assert_eq!(
            avatar.image_path(MouthState::Closed),
            "/static/images/avatar_idle.png"
        );
        assert_eq!(
            avatar.image_path(MouthState::Open),
            "/static/images/avatar_talk.png"
        );
    }
}
