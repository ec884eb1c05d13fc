//! # lipsync
//!
//! Audio and viseme synchronization engine for speaking avatars.
//!
//! A [`SynthesisOrchestrator`](core::synthesis::SynthesisOrchestrator) asks a
//! [`SpeechSynthesizer`](core::tts::SpeechSynthesizer) for audio plus a viseme
//! timeline, plays the audio on a
//! [`PlaybackManager`](core::playback::PlaybackManager) and resolves the mouth
//! shape for every rendered frame with a
//! [`VisemeScheduler`](core::viseme::VisemeScheduler). A
//! [`MouthAnimator`](core::blendshape::MouthAnimator) turns that into smooth
//! blendshape weights.

pub mod config;
pub mod core;
pub mod utils;

// Re-export commonly used items for convenience
pub use config::LipSyncConfig;
pub use core::*;
