use super::LipSyncConfig;
use super::merge::merge_config;
use super::validation::validate_config;

impl LipSyncConfig {
    /// Load configuration from environment variables
    ///
    /// Reads the `LIPSYNC_*` variables, with sensible defaults for anything
    /// unset. Also loads from a .env file if present using dotenvy.
    ///
    /// | Variable | Field |
    /// |----------|-------|
    /// | `LIPSYNC_DEFAULT_LANGUAGE` | `default_language` |
    /// | `LIPSYNC_DEFAULT_VOICE` | `default_voice` |
    /// | `LIPSYNC_OUTPUT_FORMAT` | `output_format` |
    /// | `LIPSYNC_SPEAKING_RATE` | `speaking_rate` |
    /// | `LIPSYNC_PITCH` | `pitch` |
    /// | `LIPSYNC_INTERPOLATION_RATE` | `interpolation_rate` |
    /// | `LIPSYNC_VOLUME` | `volume` |
    /// | `LIPSYNC_PLAYBACK_SPEED` | `playback_speed` |
    /// | `LIPSYNC_MUTED` | `muted` |
    ///
    /// # Errors
    /// Returns an error if a variable is malformed or a value is out of range.
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error>> {
        // Load .env file if it exists
        let _ = dotenvy::dotenv();

        let config = merge_config(None)?;
        validate_config(&config)?;
        Ok(config)
    }
}
