use serde::Deserialize;
use std::path::PathBuf;

/// Complete YAML configuration structure
///
/// All fields are optional to allow partial configuration. Missing values
/// fall back to environment variables, then to defaults.
///
/// # Example YAML structure
/// ```yaml
/// synthesis:
///   language: "en-US"
///   voice: "en-US-JennyNeural"
///   output_format: "raw-24khz-16bit-mono-pcm"
///   speaking_rate: 1.0
///   pitch: 0
///
/// playback:
///   volume: 100
///   speed: 1.0
///   muted: false
///
/// animation:
///   interpolation_rate: 10.0
/// ```
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct YamlConfig {
    pub synthesis: Option<SynthesisYaml>,
    pub playback: Option<PlaybackYaml>,
    pub animation: Option<AnimationYaml>,
}

/// Synthesis request defaults from YAML
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct SynthesisYaml {
    pub language: Option<String>,
    pub voice: Option<String>,
    /// Loose name ("pcm", "mp3", "opus") or a full service format string
    pub output_format: Option<String>,
    pub speaking_rate: Option<f32>,
    pub pitch: Option<i32>,
}

/// Playback output settings from YAML
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct PlaybackYaml {
    pub volume: Option<u8>,
    pub speed: Option<f32>,
    pub muted: Option<bool>,
}

/// Animation settings from YAML
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct AnimationYaml {
    pub interpolation_rate: Option<f32>,
}

impl YamlConfig {
    /// Load configuration from a YAML file
    ///
    /// # Errors
    /// Returns an error if:
    /// - The file cannot be read
    /// - The YAML is malformed
    /// - Fields have invalid types
    pub fn from_file(path: &PathBuf) -> Result<Self, Box<dyn std::error::Error>> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file {}: {e}", path.display()))?;

        let config: YamlConfig = serde_yaml::from_str(&contents)
            .map_err(|e| format!("Failed to parse YAML config: {e}"))?;

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_yaml_config_full() {
        let yaml = r#"
synthesis:
  language: "ja-JP"
  voice: "ja-JP-KeitaNeural"
  output_format: "opus"
  speaking_rate: 0.9
  pitch: 10

playback:
  volume: 55
  speed: 0.75
  muted: false

animation:
  interpolation_rate: 8.5
"#;

        let config: YamlConfig = serde_yaml::from_str(yaml).unwrap();

        let synthesis = config.synthesis.as_ref().unwrap();
        assert_eq!(synthesis.language, Some("ja-JP".to_string()));
        assert_eq!(synthesis.voice, Some("ja-JP-KeitaNeural".to_string()));
        assert_eq!(synthesis.output_format, Some("opus".to_string()));
        assert_eq!(synthesis.speaking_rate, Some(0.9));
        assert_eq!(synthesis.pitch, Some(10));

        let playback = config.playback.as_ref().unwrap();
        assert_eq!(playback.volume, Some(55));
        assert_eq!(playback.speed, Some(0.75));
        assert_eq!(playback.muted, Some(false));

        assert_eq!(
            config.animation.as_ref().unwrap().interpolation_rate,
            Some(8.5)
        );
    }

    #[test]
    fn test_yaml_config_partial() {
        let yaml = r#"
playback:
  volume: 20
"#;

        let config: YamlConfig = serde_yaml::from_str(yaml).unwrap();
        assert!(config.synthesis.is_none());
        assert!(config.animation.is_none());
        let playback = config.playback.unwrap();
        assert_eq!(playback.volume, Some(20));
        assert!(playback.speed.is_none());
    }

    #[test]
    fn test_yaml_config_empty() {
        let config: YamlConfig = serde_yaml::from_str("{}").unwrap();
        assert!(config.synthesis.is_none());
        assert!(config.playback.is_none());
    }

    #[test]
    fn test_yaml_config_invalid_type() {
        let yaml = "playback:\n  volume: loud\n";
        assert!(serde_yaml::from_str::<YamlConfig>(yaml).is_err());
    }

    #[test]
    fn test_yaml_from_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.yaml");
        fs::write(&path, "animation:\n  interpolation_rate: 20\n").unwrap();

        let config = YamlConfig::from_file(&path).unwrap();
        assert_eq!(config.animation.unwrap().interpolation_rate, Some(20.0));
    }

    #[test]
    fn test_yaml_from_file_malformed() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.yaml");
        fs::write(&path, "synthesis: [unclosed").unwrap();

        let err = YamlConfig::from_file(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse YAML config"));
    }
}
