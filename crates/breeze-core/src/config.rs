use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::rhythm::get_rhythm;
use crate::sensory::VoiceSettings;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct BreezeConfig {
    pub session: SessionConfig,
    pub rhythm: RhythmConfig,
    pub guide: GuideConfig,
    pub audio: AudioConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Preselected session length in minutes
    pub default_minutes: u32,
    /// Lengths offered by the duration selector
    pub minute_options: Vec<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RhythmConfig {
    /// Id of the rhythm preselected at startup
    pub default_rhythm: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuideConfig {
    /// Narrate phase labels on phase changes
    pub voice_enabled: bool,
    /// Play the ambient noise bed while a session runs
    pub sound_enabled: bool,
    pub voice: VoiceSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudioConfig {
    /// Low-pass cutoff for the noise bed
    pub filter_cutoff_hz: f32,
    /// Output gain in [0, 1]
    pub gain: f32,
    /// Fade-out length on stop
    pub fade_secs: f32,
    pub sample_rate_hz: f32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            default_minutes: 5,
            minute_options: vec![1, 3, 5, 10, 20],
        }
    }
}

impl Default for RhythmConfig {
    fn default() -> Self {
        Self {
            default_rhythm: "3-6".to_string(),
        }
    }
}

impl Default for GuideConfig {
    fn default() -> Self {
        Self {
            voice_enabled: false,
            sound_enabled: false,
            voice: VoiceSettings::default(),
        }
    }
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            filter_cutoff_hz: 400.0,
            gain: 0.5,
            fade_secs: 0.5,
            sample_rate_hz: 44_100.0,
        }
    }
}

impl BreezeConfig {
    /// Load configuration from TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        let config: BreezeConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration with environment variable overrides.
    /// Example: BREEZE_SESSION_DEFAULT_MINUTES=10
    pub fn from_file_with_env<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let mut config = Self::from_file(path)?;
        config.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    pub(crate) fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        use std::env;

        if let Ok(val) = env::var("BREEZE_SESSION_DEFAULT_MINUTES") {
            self.session.default_minutes = val.parse().map_err(|_| {
                ConfigError::Validation("Invalid BREEZE_SESSION_DEFAULT_MINUTES".to_string())
            })?;
        }
        if let Ok(val) = env::var("BREEZE_RHYTHM_DEFAULT") {
            self.rhythm.default_rhythm = val;
        }
        if let Ok(val) = env::var("BREEZE_GUIDE_VOICE_ENABLED") {
            self.guide.voice_enabled = val.parse().map_err(|_| {
                ConfigError::Validation("Invalid BREEZE_GUIDE_VOICE_ENABLED".to_string())
            })?;
        }
        if let Ok(val) = env::var("BREEZE_GUIDE_SOUND_ENABLED") {
            self.guide.sound_enabled = val.parse().map_err(|_| {
                ConfigError::Validation("Invalid BREEZE_GUIDE_SOUND_ENABLED".to_string())
            })?;
        }
        if let Ok(val) = env::var("BREEZE_AUDIO_GAIN") {
            self.audio.gain = val
                .parse()
                .map_err(|_| ConfigError::Validation("Invalid BREEZE_AUDIO_GAIN".to_string()))?;
        }

        Ok(())
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.session.minute_options.is_empty() {
            return Err(ConfigError::Validation(
                "session.minute_options must not be empty".to_string(),
            ));
        }
        if self.session.minute_options.iter().any(|&m| m == 0) {
            return Err(ConfigError::Validation(
                "session.minute_options must be positive".to_string(),
            ));
        }
        if !self
            .session
            .minute_options
            .contains(&self.session.default_minutes)
        {
            return Err(ConfigError::Validation(
                "session.default_minutes must be one of minute_options".to_string(),
            ));
        }
        if get_rhythm(&self.rhythm.default_rhythm).is_none() {
            return Err(ConfigError::Validation(format!(
                "rhythm.default_rhythm references unknown rhythm '{}'",
                self.rhythm.default_rhythm
            )));
        }
        if !(0.0..=1.0).contains(&self.audio.gain) {
            return Err(ConfigError::Validation(
                "audio.gain must be in [0, 1]".to_string(),
            ));
        }
        if self.audio.filter_cutoff_hz <= 0.0 {
            return Err(ConfigError::Validation(
                "audio.filter_cutoff_hz must be positive".to_string(),
            ));
        }
        if self.audio.fade_secs < 0.0 {
            return Err(ConfigError::Validation(
                "audio.fade_secs must be non-negative".to_string(),
            ));
        }
        if self.audio.sample_rate_hz <= 0.0 {
            return Err(ConfigError::Validation(
                "audio.sample_rate_hz must be positive".to_string(),
            ));
        }
        if self.guide.voice.rate <= 0.0 {
            return Err(ConfigError::Validation(
                "guide.voice.rate must be positive".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.guide.voice.volume) {
            return Err(ConfigError::Validation(
                "guide.voice.volume must be in [0, 1]".to_string(),
            ));
        }
        Ok(())
    }

    /// Export configuration to TOML string
    pub fn to_toml_string(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Save configuration to file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let content = self
            .to_toml_string()
            .map_err(|e| ConfigError::Validation(format!("TOML serialization error: {}", e)))?;
        fs::write(path, content)?;
        Ok(())
    }
}
