//! # Playback
//!
//! Audio clip queue, playback state machine and the source-audio clock that the
//! viseme scheduler reads every frame.

mod clip;
mod manager;
mod state;

pub use clip::AudioClip;
pub use manager::{
    MAX_PLAYBACK_SPEED, MAX_VOLUME, MIN_PLAYBACK_SPEED, MIN_VOLUME, PlaybackManager,
};
pub use state::{PlaybackState, PlaybackTransition};
