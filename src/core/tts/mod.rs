mod base;
mod config;
pub mod offline;

pub use base::{SpeechError, SpeechResult, SpeechSynthesizer, SynthesisOutput};
pub use config::{
    MAX_PITCH, MIN_PITCH, OutputFormat, SynthesisConfig, build_ssml, escape_xml,
};
pub use offline::{OfflineSynthesizer, text_to_visemes};
