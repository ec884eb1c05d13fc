use super::LipSyncConfig;
use crate::core::playback::{MAX_PLAYBACK_SPEED, MAX_VOLUME, MIN_PLAYBACK_SPEED};
use crate::core::tts::{MAX_PITCH, MIN_PITCH};

pub const MIN_SPEAKING_RATE: f32 = 0.5;
pub const MAX_SPEAKING_RATE: f32 = 2.0;

/// Validate a merged configuration
///
/// Checks that:
/// - default_language is non-empty
/// - speaking_rate is within 0.5..=2.0
/// - pitch is within -50..=50 percent
/// - interpolation_rate is finite and positive
/// - volume is within 0..=100
/// - playback_speed is within 0.5..=2.0
pub fn validate_config(config: &LipSyncConfig) -> Result<(), Box<dyn std::error::Error>> {
    if config.default_language.trim().is_empty() {
        return Err("default_language cannot be empty".into());
    }

    validate_range(
        "speaking_rate",
        config.speaking_rate,
        MIN_SPEAKING_RATE,
        MAX_SPEAKING_RATE,
    )?;

    if !(MIN_PITCH..=MAX_PITCH).contains(&config.pitch) {
        return Err(format!(
            "pitch must be between {MIN_PITCH} and {MAX_PITCH} percent, got {}",
            config.pitch
        )
        .into());
    }

    if !config.interpolation_rate.is_finite() || config.interpolation_rate <= 0.0 {
        return Err(format!(
            "interpolation_rate must be a positive number, got {}",
            config.interpolation_rate
        )
        .into());
    }

    if config.volume > MAX_VOLUME {
        return Err(format!(
            "volume must be between 0 and {MAX_VOLUME}, got {}",
            config.volume
        )
        .into());
    }

    validate_range(
        "playback_speed",
        config.playback_speed,
        MIN_PLAYBACK_SPEED,
        MAX_PLAYBACK_SPEED,
    )?;

    Ok(())
}

fn validate_range(
    name: &str,
    value: f32,
    min: f32,
    max: f32,
) -> Result<(), Box<dyn std::error::Error>> {
    if !(min..=max).contains(&value) {
        return Err(format!("{name} must be between {min} and {max}, got {value}").into());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_default() {
        assert!(validate_config(&LipSyncConfig::default()).is_ok());
    }

    #[test]
    fn test_validate_range_edges() {
        let config = LipSyncConfig {
            speaking_rate: 0.5,
            pitch: -50,
            volume: 0,
            playback_speed: 2.0,
            ..Default::default()
        };
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_validate_speaking_rate() {
        let config = LipSyncConfig {
            speaking_rate: 0.25,
            ..Default::default()
        };
        let err = validate_config(&config).unwrap_err();
        assert!(err.to_string().contains("speaking_rate"));

        let config = LipSyncConfig {
            speaking_rate: f32::NAN,
            ..Default::default()
        };
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_pitch() {
        let config = LipSyncConfig {
            pitch: 51,
            ..Default::default()
        };
        let err = validate_config(&config).unwrap_err();
        assert!(err.to_string().contains("pitch"));
    }

    #[test]
    fn test_validate_interpolation_rate() {
        for rate in [0.0, -1.0, f32::INFINITY] {
            let config = LipSyncConfig {
                interpolation_rate: rate,
                ..Default::default()
            };
            assert!(validate_config(&config).is_err(), "rate {rate} accepted");
        }
    }

    #[test]
    fn test_validate_volume() {
        let config = LipSyncConfig {
            volume: 101,
            ..Default::default()
        };
        let err = validate_config(&config).unwrap_err();
        assert!(err.to_string().contains("volume"));
    }

    #[test]
    fn test_validate_playback_speed() {
        let config = LipSyncConfig {
            playback_speed: 0.4,
            ..Default::default()
        };
        let err = validate_config(&config).unwrap_err();
        assert!(err.to_string().contains("playback_speed"));
    }

    #[test]
    fn test_validate_empty_language() {
        let config = LipSyncConfig {
            default_language: "  ".to_string(),
            ..Default::default()
        };
        assert!(validate_config(&config).is_err());
    }
}
