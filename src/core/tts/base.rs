//! # Speech Synthesis Boundary
//!
//! This module defines the contract between the lip-sync engine and a
//! text-to-speech service. A synthesizer turns text into one [`AudioClip`]
//! plus the viseme timeline that was produced alongside the audio.
//!
//! ## Usage Example
//!
//! ```rust,ignore
//! use lipsync::core::tts::{SpeechSynthesizer, SynthesisConfig, SynthesisOutput, SpeechResult};
//! use async_trait::async_trait;
//!
//! struct MySynthesizer;
//!
//! #[async_trait]
//! impl SpeechSynthesizer for MySynthesizer {
//!     async fn synthesize(
//!         &self,
//!         text: &str,
//!         config: &SynthesisConfig,
//!         is_ssml: bool,
//!     ) -> SpeechResult<SynthesisOutput> {
//!         // Call the remote service and collect its viseme events here
//!         todo!()
//!     }
//! }
//! ```

use async_trait::async_trait;

use super::config::SynthesisConfig;
use crate::core::playback::AudioClip;
use crate::core::viseme::VisemeEvent;

/// Errors reported by a speech synthesizer
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SpeechError {
    #[error("Invalid key: {0}")]
    InvalidKey(String),

    #[error("Invalid region: {0}")]
    InvalidRegion(String),

    #[error("Invalid voice: {0}")]
    InvalidVoice(String),

    #[error("Synthesis failed: {0}")]
    SynthesisFailed(String),

    #[error("Network error: {0}")]
    NetworkError(String),
}

impl SpeechError {
    /// Stable error code as reported by the synthesis service.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidKey(_) => "INVALID_KEY",
            Self::InvalidRegion(_) => "INVALID_REGION",
            Self::InvalidVoice(_) => "INVALID_VOICE",
            Self::SynthesisFailed(_) => "SYNTHESIS_FAILED",
            Self::NetworkError(_) => "NETWORK_ERROR",
        }
    }

    /// Short message suitable for showing to an end user.
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::InvalidKey(_) => "The speech service rejected the configured key.",
            Self::InvalidRegion(_) => "The speech service region is not configured correctly.",
            Self::InvalidVoice(_) => "The selected voice is not available.",
            Self::SynthesisFailed(_) => "Speech could not be generated for this message.",
            Self::NetworkError(_) => "The speech service could not be reached.",
        }
    }
}

/// Result type for synthesis operations
pub type SpeechResult<T> = Result<T, SpeechError>;

/// Audio plus the viseme timeline produced for it.
#[derive(Debug, Clone)]
pub struct SynthesisOutput {
    pub audio: AudioClip,
    pub visemes: Vec<VisemeEvent>,
}

/// Text-to-speech service that also reports viseme timing.
///
/// Implementations must be cancel-safe in the sense that a caller may stop
/// caring about the returned future's result; the engine never aborts a call.
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    /// Synthesize `text` (plain text, or an SSML document when `is_ssml` is set).
    async fn synthesize(
        &self,
        text: &str,
        config: &SynthesisConfig,
        is_ssml: bool,
    ) -> SpeechResult<SynthesisOutput>;

    /// Provider-specific information (name, supported formats, ...).
    fn provider_info(&self) -> serde_json::Value {
        serde_json::json!({
            "provider": "unknown",
            "version": "1.0.0"
        })
    }
}
