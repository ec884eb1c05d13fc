//! Request configuration for speech synthesis.
//!
//! This module contains:
//! - Audio output format specifications
//! - The per-request [`SynthesisConfig`]
//! - SSML generation utilities

use serde::{Deserialize, Serialize};

use crate::core::voices::DEFAULT_VOICE;

/// Pitch adjustment bounds in percent.
pub const MIN_PITCH: i32 = -50;
pub const MAX_PITCH: i32 = 50;

// =============================================================================
// Audio Encoding
// =============================================================================

/// Audio output format requested from the synthesis service.
///
/// # Example
///
/// ```rust
/// use lipsync::core::tts::OutputFormat;
///
/// let format = OutputFormat::Raw24Khz16BitMonoPcm;
/// assert_eq!(format.as_str(), "raw-24khz-16bit-mono-pcm");
/// assert_eq!(format.sample_rate(), 24000);
/// assert!(format.is_pcm());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum OutputFormat {
    /// 16kHz, 16-bit PCM mono
    #[serde(rename = "raw-16khz-16bit-mono-pcm")]
    Raw16Khz16BitMonoPcm,
    /// 24kHz, 16-bit PCM mono
    #[default]
    #[serde(rename = "raw-24khz-16bit-mono-pcm")]
    Raw24Khz16BitMonoPcm,
    /// 48kHz, 16-bit PCM mono
    #[serde(rename = "raw-48khz-16bit-mono-pcm")]
    Raw48Khz16BitMonoPcm,
    /// 16kHz, 32kbps MP3 mono
    #[serde(rename = "audio-16khz-32kbitrate-mono-mp3")]
    Audio16Khz32KbitrateMonoMp3,
    /// 24kHz, 96kbps MP3 mono
    #[serde(rename = "audio-24khz-96kbitrate-mono-mp3")]
    Audio24Khz96KbitrateMonoMp3,
    /// 48kHz, 192kbps MP3 mono
    #[serde(rename = "audio-48khz-192kbitrate-mono-mp3")]
    Audio48Khz192KbitrateMonoMp3,
    /// 24kHz, 16-bit, 48kbps Opus mono
    #[serde(rename = "audio-24khz-16bit-48kbps-mono-opus")]
    Audio24Khz16Bit48KbpsMonoOpus,
}

impl OutputFormat {
    /// Service format string, e.g. `raw-24khz-16bit-mono-pcm`.
    #[inline]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Raw16Khz16BitMonoPcm => "raw-16khz-16bit-mono-pcm",
            Self::Raw24Khz16BitMonoPcm => "raw-24khz-16bit-mono-pcm",
            Self::Raw48Khz16BitMonoPcm => "raw-48khz-16bit-mono-pcm",
            Self::Audio16Khz32KbitrateMonoMp3 => "audio-16khz-32kbitrate-mono-mp3",
            Self::Audio24Khz96KbitrateMonoMp3 => "audio-24khz-96kbitrate-mono-mp3",
            Self::Audio48Khz192KbitrateMonoMp3 => "audio-48khz-192kbitrate-mono-mp3",
            Self::Audio24Khz16Bit48KbpsMonoOpus => "audio-24khz-16bit-48kbps-mono-opus",
        }
    }

    #[inline]
    pub fn sample_rate(&self) -> u32 {
        match self {
            Self::Raw16Khz16BitMonoPcm | Self::Audio16Khz32KbitrateMonoMp3 => 16000,
            Self::Raw24Khz16BitMonoPcm
            | Self::Audio24Khz96KbitrateMonoMp3
            | Self::Audio24Khz16Bit48KbpsMonoOpus => 24000,
            Self::Raw48Khz16BitMonoPcm | Self::Audio48Khz192KbitrateMonoMp3 => 48000,
        }
    }

    #[inline]
    pub fn is_pcm(&self) -> bool {
        matches!(
            self,
            Self::Raw16Khz16BitMonoPcm | Self::Raw24Khz16BitMonoPcm | Self::Raw48Khz16BitMonoPcm
        )
    }

    /// Map a loose format name plus sample rate onto a supported format.
    ///
    /// - "linear16", "pcm", "wav" → raw PCM at the closest supported rate
    /// - "mp3" → MP3 at the closest supported rate
    /// - "opus" → 24kHz Opus
    /// - a full service string such as `raw-16khz-16bit-mono-pcm` is accepted as-is
    ///
    /// Returns `None` for any other name.
    pub fn from_format_string(format: &str, sample_rate: u32) -> Option<Self> {
        let format = format.trim().to_lowercase();
        if let Some(exact) = Self::all().iter().find(|f| f.as_str() == format) {
            return Some(*exact);
        }

        let format = match format.as_str() {
            "linear16" | "pcm" | "wav" => match sample_rate {
                0..=19999 => Self::Raw16Khz16BitMonoPcm,
                20000..=35999 => Self::Raw24Khz16BitMonoPcm,
                _ => Self::Raw48Khz16BitMonoPcm,
            },
            "mp3" => match sample_rate {
                0..=19999 => Self::Audio16Khz32KbitrateMonoMp3,
                20000..=35999 => Self::Audio24Khz96KbitrateMonoMp3,
                _ => Self::Audio48Khz192KbitrateMonoMp3,
            },
            "opus" => Self::Audio24Khz16Bit48KbpsMonoOpus,
            _ => return None,
        };
        Some(format)
    }

    fn all() -> &'static [Self] {
        &[
            Self::Raw16Khz16BitMonoPcm,
            Self::Raw24Khz16BitMonoPcm,
            Self::Raw48Khz16BitMonoPcm,
            Self::Audio16Khz32KbitrateMonoMp3,
            Self::Audio24Khz96KbitrateMonoMp3,
            Self::Audio48Khz192KbitrateMonoMp3,
            Self::Audio24Khz16Bit48KbpsMonoOpus,
        ]
    }
}

// =============================================================================
// Request Configuration
// =============================================================================

/// Parameters for one synthesis request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SynthesisConfig {
    /// Neural voice name (e.g., "en-US-JennyNeural")
    pub voice: String,
    /// BCP-47 language code (e.g., "en-US")
    pub language: String,
    pub output_format: OutputFormat,
    /// Speaking rate multiplier, 1.0 is normal
    pub rate: f32,
    /// Pitch adjustment in percent, 0 is the voice's natural pitch
    pub pitch: i32,
}

impl Default for SynthesisConfig {
    fn default() -> Self {
        Self {
            voice: DEFAULT_VOICE.to_string(),
            language: "en-US".to_string(),
            output_format: OutputFormat::default(),
            rate: 1.0,
            pitch: 0,
        }
    }
}

impl SynthesisConfig {
    pub fn for_voice(voice: &str, language: &str) -> Self {
        Self {
            voice: voice.to_string(),
            language: language.to_string(),
            ..Default::default()
        }
    }
}

// =============================================================================
// SSML Utilities
// =============================================================================

/// Escapes special XML characters in text for safe inclusion in SSML.
///
/// # Example
///
/// ```rust
/// use lipsync::core::tts::escape_xml;
///
/// assert_eq!(escape_xml("Tom & Jerry"), "Tom &amp; Jerry");
/// assert_eq!(escape_xml("<b>"), "&lt;b&gt;");
/// ```
pub fn escape_xml(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&apos;"),
            _ => result.push(c),
        }
    }
    result
}

/// Builds an SSML document that asks for the 22-id viseme stream.
///
/// A `<prosody>` element is added only when the rate differs from 1.0 or the
/// pitch is non-zero. Rate is rendered as a percentage of normal speed and
/// pitch as a signed percentage.
pub fn build_ssml(text: &str, config: &SynthesisConfig) -> String {
    let escaped_text = escape_xml(text);

    let rate = (config.rate.is_finite() && (config.rate - 1.0).abs() > 0.01)
        .then(|| format!(" rate='{}%'", (config.rate * 100.0).round() as i32));
    let pitch = (config.pitch != 0).then(|| {
        format!(
            " pitch='{:+}%'",
            config.pitch.clamp(MIN_PITCH, MAX_PITCH)
        )
    });

    let inner_content = if rate.is_some() || pitch.is_some() {
        format!(
            "<prosody{}{}>{escaped_text}</prosody>",
            rate.unwrap_or_default(),
            pitch.unwrap_or_default()
        )
    } else {
        escaped_text
    };

    format!(
        r#"<speak version='1.0' xmlns='http://www.w3.org/2001/10/synthesis' xmlns:mstts='http://www.w3.org/2001/mstts' xml:lang='{language}'>
    <voice name='{voice}'>
        <mstts:viseme type='redlips_front'/>
        {inner_content}
    </voice>
</speak>"#,
        language = config.language,
        voice = config.voice,
    )
}
