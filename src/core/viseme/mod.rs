//! # Visemes
//!
//! Viseme events, the static viseme-to-blendshape table and the scheduler that
//! resolves the active viseme from the playback clock.

mod event;
mod scheduler;

pub use event::{
    NEUTRAL_VISEME, VISEME_BLENDSHAPES, VISEME_COUNT, VisemeEvent, VisemeSnapshot,
    blendshape_name,
};
pub use scheduler::{VisemeChange, VisemeScheduler, viseme_at};
