//! Playback state machine.
//!
//! ```text
//! [Idle] ──play──► [Playing] ──pause──► [Paused]
//!   ▲                │   ▲                 │
//!   │                │   └──────resume─────┘
//!   └──stop / clip end with empty queue────┘
//!
//! any ──shutdown──► [Stopped] (terminal)
//! ```

use serde::{Deserialize, Serialize};

/// State of the [`PlaybackManager`](super::PlaybackManager).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaybackState {
    /// Nothing is playing; queued clips (if any) wait for the next `play`
    #[default]
    Idle,
    /// A clip is playing and the clock advances
    Playing,
    /// A clip is loaded but the clock is frozen
    Paused,
    /// The manager has been shut down and refuses new clips
    Stopped,
}

impl PlaybackState {
    /// Whether a clip is loaded (playing or paused).
    #[inline]
    pub fn has_active_clip(&self) -> bool {
        matches!(self, Self::Playing | Self::Paused)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Playing => "playing",
            Self::Paused => "paused",
            Self::Stopped => "stopped",
        }
    }
}

impl std::fmt::Display for PlaybackState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single state change delivered to playback observers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaybackTransition {
    pub from: PlaybackState,
    pub to: PlaybackState,
}
