pub mod blendshape;
pub mod playback;
pub mod synthesis;
pub mod tts;
pub mod viseme;
pub mod voices;

// Re-export commonly used types for convenience
pub use blendshape::{BlendshapeInterpolator, BlendshapeWeights, MouthAnimator};

pub use playback::{AudioClip, PlaybackManager, PlaybackState, PlaybackTransition};

pub use synthesis::{SessionInfo, SynthesisError, SynthesisOrchestrator, SynthesisResult};

pub use tts::{
    OfflineSynthesizer, OutputFormat, SpeechError, SpeechResult, SpeechSynthesizer,
    SynthesisConfig, SynthesisOutput,
};

pub use viseme::{
    NEUTRAL_VISEME, VISEME_BLENDSHAPES, VisemeEvent, VisemeScheduler, VisemeSnapshot,
    blendshape_name,
};

pub use voices::{DEFAULT_VOICE, supported_languages, voice_for_language};
