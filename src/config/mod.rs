//! Configuration module for the lip-sync engine
//!
//! Settings come from YAML files and environment variables. YAML values take
//! precedence over environment variables, which take precedence over defaults.
//!
//! # Modules
//! - `yaml`: YAML configuration file loading
//! - `env`: Environment variable loading
//! - `merge`: Merging YAML and environment configurations
//! - `validation`: Range checks on the merged values
//! - `utils`: Utility functions for configuration parsing
//!
//! # Example
//! ```rust,no_run
//! use lipsync::config::LipSyncConfig;
//! use std::path::PathBuf;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! // Load from environment variables only
//! let config = LipSyncConfig::from_env()?;
//!
//! // Load from YAML file, falling back to environment variables
//! let config_path = PathBuf::from("lipsync.yaml");
//! let config = LipSyncConfig::from_file(&config_path)?;
//!
//! println!("Speaking {} at {}x", config.default_language, config.speaking_rate);
//! # Ok(())
//! # }
//! ```

use std::path::PathBuf;

use serde::Serialize;

use crate::core::blendshape::DEFAULT_INTERPOLATION_RATE;
use crate::core::playback::MAX_VOLUME;
use crate::core::tts::OutputFormat;

mod env;
mod merge;
mod utils;
mod validation;
mod yaml;

pub use validation::validate_config;

/// Default language for requests that do not name one.
pub const DEFAULT_LANGUAGE: &str = "en-US";

/// Engine configuration
///
/// Groups the settings a host application usually wants to tune:
/// - Synthesis request defaults (language, voice, format, prosody)
/// - Playback output (volume, speed, mute)
/// - Animation smoothing
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LipSyncConfig {
    // Synthesis defaults
    pub default_language: String,
    /// Voice for `default_language`; other languages use the voice table
    pub default_voice: Option<String>,
    pub output_format: OutputFormat,
    pub speaking_rate: f32,
    /// Pitch adjustment in percent
    pub pitch: i32,

    // Animation
    pub interpolation_rate: f32,

    // Playback
    pub volume: u8,
    pub playback_speed: f32,
    pub muted: bool,
}

impl Default for LipSyncConfig {
    fn default() -> Self {
        Self {
            default_language: DEFAULT_LANGUAGE.to_string(),
            default_voice: None,
            output_format: OutputFormat::default(),
            speaking_rate: 1.0,
            pitch: 0,
            interpolation_rate: DEFAULT_INTERPOLATION_RATE,
            volume: MAX_VOLUME,
            playback_speed: 1.0,
            muted: false,
        }
    }
}

impl LipSyncConfig {
    /// Load configuration from a YAML file with environment variable fallbacks
    ///
    /// Priority order (highest to lowest):
    /// 1. YAML file values
    /// 2. Environment variables
    /// 3. Default values
    ///
    /// # Errors
    /// Returns an error if:
    /// - The YAML file cannot be read or is malformed
    /// - Environment variables have invalid formats
    /// - A value is out of range
    pub fn from_file(path: &PathBuf) -> Result<Self, Box<dyn std::error::Error>> {
        // No .env loading here: the YAML file is the source of truth and only
        // real environment variables fill its gaps.
        let yaml_config = yaml::YamlConfig::from_file(path)?;
        let config = merge::merge_config(Some(yaml_config))?;
        validate_config(&config)?;
        Ok(config)
    }
}
