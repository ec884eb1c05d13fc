//! Error types for SynthesisOrchestrator operations

use crate::core::tts::SpeechError;

/// Error types for SynthesisOrchestrator operations
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SynthesisError {
    #[error("Speech error: {0}")]
    Speech(#[from] SpeechError),
    #[error("Superseded by a newer request")]
    Superseded,
    #[error("Orchestrator has been disposed")]
    Disposed,
    #[error("Nothing to synthesize: text is empty")]
    EmptyText,
}

impl SynthesisError {
    /// Stable error code for callers that render their own messages.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Speech(err) => err.code(),
            Self::Superseded => "SUPERSEDED",
            Self::Disposed => "DISPOSED",
            Self::EmptyText => "EMPTY_TEXT",
        }
    }
}

/// Result type for SynthesisOrchestrator operations
pub type SynthesisResult<T> = Result<T, SynthesisError>;
