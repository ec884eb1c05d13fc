use bytes::Bytes;

/// A decoded audio buffer ready for playback.
///
/// The engine never inspects `data`; it only needs the duration to drive the
/// playback clock. Cloning is cheap since the samples live in a shared [`Bytes`].
#[derive(Debug, Clone, PartialEq)]
pub struct AudioClip {
    /// Audio bytes in the format reported by `format`
    pub data: Bytes,
    /// Sample rate of the audio
    pub sample_rate: u32,
    /// Audio format (e.g., "pcm", "mp3")
    pub format: String,
    /// Duration of the clip in milliseconds of source audio
    pub duration_ms: f64,
}

impl AudioClip {
    pub fn new(data: impl Into<Bytes>, sample_rate: u32, format: &str, duration_ms: f64) -> Self {
        Self {
            data: data.into(),
            sample_rate,
            format: format.to_string(),
            duration_ms,
        }
    }

    /// Build a clip from mono 16-bit little-endian PCM, deriving the duration
    /// from the sample count.
    pub fn from_pcm16(data: impl Into<Bytes>, sample_rate: u32) -> Self {
        let data = data.into();
        let samples = data.len() / 2;
        let duration_ms = if sample_rate == 0 {
            0.0
        } else {
            samples as f64 * 1000.0 / sample_rate as f64
        };

        Self {
            data,
            sample_rate,
            format: "pcm".to_string(),
            duration_ms,
        }
    }

    /// A clip can be played when it carries audio and a positive, finite duration.
    pub fn is_playable(&self) -> bool {
        !self.data.is_empty() && self.duration_ms.is_finite() && self.duration_ms > 0.0
    }
}
