use std::env;

use super::utils::{env_parse, parse_bool};
use super::yaml::YamlConfig;
use super::{DEFAULT_LANGUAGE, LipSyncConfig};
use crate::core::tts::OutputFormat;

/// Sample rate assumed when a loose format name ("pcm", "mp3") is configured.
const DEFAULT_FORMAT_SAMPLE_RATE: u32 = 24000;

/// Merge YAML configuration with environment variables
///
/// Priority order (highest to lowest):
/// 1. YAML configuration values
/// 2. Environment variables
/// 3. Default values
///
/// # Arguments
/// * `yaml_config` - Optional YAML configuration to use as overrides
pub fn merge_config(
    yaml_config: Option<YamlConfig>,
) -> Result<LipSyncConfig, Box<dyn std::error::Error>> {
    let yaml = yaml_config.unwrap_or_default();
    let defaults = LipSyncConfig::default();

    // Helper macro to get value with priority: YAML > ENV > Default
    macro_rules! get_value {
        ($env_var:expr, $yaml_value:expr, $default:expr) => {
            $yaml_value
                .or_else(|| env::var($env_var).ok())
                .unwrap_or_else(|| $default.to_string())
        };
    }

    // Helper macro for optional values: YAML > ENV
    macro_rules! get_optional {
        ($env_var:expr, $yaml_value:expr) => {
            $yaml_value.or_else(|| env::var($env_var).ok())
        };
    }

    // Helper macro for parsed values: YAML > ENV (parsed) > Default
    macro_rules! get_parsed {
        ($env_var:expr, $yaml_value:expr, $default:expr) => {
            match $yaml_value {
                Some(value) => value,
                None => env_parse($env_var)?.unwrap_or($default),
            }
        };
    }

    let synthesis = yaml.synthesis.as_ref();
    let playback = yaml.playback.as_ref();
    let animation = yaml.animation.as_ref();

    // Synthesis defaults
    let default_language = get_value!(
        "LIPSYNC_DEFAULT_LANGUAGE",
        synthesis.and_then(|s| s.language.clone()),
        DEFAULT_LANGUAGE
    );

    let default_voice = get_optional!(
        "LIPSYNC_DEFAULT_VOICE",
        synthesis.and_then(|s| s.voice.clone())
    )
    .filter(|voice| !voice.trim().is_empty());

    let output_format = match get_optional!(
        "LIPSYNC_OUTPUT_FORMAT",
        synthesis.and_then(|s| s.output_format.clone())
    ) {
        Some(raw) => OutputFormat::from_format_string(&raw, DEFAULT_FORMAT_SAMPLE_RATE)
            .ok_or_else(|| {
                format!(
                    "Invalid LIPSYNC_OUTPUT_FORMAT / synthesis.output_format '{raw}': expected \
                     linear16, pcm, wav, mp3, opus or a full service format string"
                )
            })?,
        None => defaults.output_format,
    };

    let speaking_rate = get_parsed!(
        "LIPSYNC_SPEAKING_RATE",
        synthesis.and_then(|s| s.speaking_rate),
        defaults.speaking_rate
    );

    let pitch = get_parsed!(
        "LIPSYNC_PITCH",
        synthesis.and_then(|s| s.pitch),
        defaults.pitch
    );

    // Animation
    let interpolation_rate = get_parsed!(
        "LIPSYNC_INTERPOLATION_RATE",
        animation.and_then(|a| a.interpolation_rate),
        defaults.interpolation_rate
    );

    // Playback
    let volume = get_parsed!(
        "LIPSYNC_VOLUME",
        playback.and_then(|p| p.volume),
        defaults.volume
    );

    let playback_speed = get_parsed!(
        "LIPSYNC_PLAYBACK_SPEED",
        playback.and_then(|p| p.speed),
        defaults.playback_speed
    );

    let muted = match playback.and_then(|p| p.muted) {
        Some(muted) => muted,
        None => match env::var("LIPSYNC_MUTED") {
            Ok(raw) => parse_bool(&raw)
                .ok_or_else(|| format!("Invalid LIPSYNC_MUTED environment variable '{raw}'"))?,
            Err(_) => defaults.muted,
        },
    };

    Ok(LipSyncConfig {
        default_language,
        default_voice,
        output_format,
        speaking_rate,
        pitch,
        interpolation_rate,
        volume,
        playback_speed,
        muted,
    })
}
