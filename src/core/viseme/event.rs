use serde::{Deserialize, Serialize};

/// Number of viseme ids produced by the synthesis service (0-21).
pub const VISEME_COUNT: usize = 22;

/// Viseme id for silence; the mouth at rest.
pub const NEUTRAL_VISEME: u8 = 0;

/// Blendshape target name for each viseme id, indexed by id.
///
/// Consumed verbatim by the renderer; ids 15-21 reuse the vowel shapes.
pub const VISEME_BLENDSHAPES: [&str; VISEME_COUNT] = [
    "viseme_sil",
    "viseme_PP",
    "viseme_FF",
    "viseme_TH",
    "viseme_DD",
    "viseme_kk",
    "viseme_CH",
    "viseme_SS",
    "viseme_nn",
    "viseme_RR",
    "viseme_aa",
    "viseme_E",
    "viseme_I",
    "viseme_O",
    "viseme_U",
    "viseme_aa",
    "viseme_E",
    "viseme_I",
    "viseme_O",
    "viseme_U",
    "viseme_aa",
    "viseme_E",
];

/// Blendshape target name for a viseme id, `None` for ids outside 0-21.
pub fn blendshape_name(viseme_id: u8) -> Option<&'static str> {
    VISEME_BLENDSHAPES.get(viseme_id as usize).copied()
}

/// A timed mouth-shape target returned by the synthesis service.
///
/// Timeline events always have a positive duration. The same type carries
/// change notifications to orchestrator subscribers, where a return to rest
/// is reported as the neutral viseme with `duration_ms == 0.0`: it lasts
/// until the next change. [`is_valid`](Self::is_valid) describes timeline
/// input and is false for those rest notifications.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VisemeEvent {
    pub viseme_id: u8,
    /// Start of the viseme relative to the start of the audio clip
    pub audio_offset_ms: f64,
    pub duration_ms: f64,
}

impl VisemeEvent {
    pub fn new(viseme_id: u8, audio_offset_ms: f64, duration_ms: f64) -> Self {
        Self {
            viseme_id,
            audio_offset_ms,
            duration_ms,
        }
    }

    /// Id in range, non-negative finite offset, positive finite duration.
    /// Checked on scheduler input.
    pub fn is_valid(&self) -> bool {
        (self.viseme_id as usize) < VISEME_COUNT
            && self.audio_offset_ms.is_finite()
            && self.audio_offset_ms >= 0.0
            && self.duration_ms.is_finite()
            && self.duration_ms > 0.0
    }

    /// End of the viseme window in clip time.
    #[inline]
    pub fn end_ms(&self) -> f64 {
        self.audio_offset_ms + self.duration_ms
    }

    pub fn blendshape(&self) -> Option<&'static str> {
        blendshape_name(self.viseme_id)
    }
}

/// The scheduler's answer to "which viseme is active right now".
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VisemeSnapshot {
    pub viseme_id: u8,
    /// Offset of the active event, or the query time for the neutral viseme
    pub timestamp_ms: f64,
    /// Duration of the active event, 0 for the neutral viseme
    pub duration_ms: f64,
}

impl VisemeSnapshot {
    /// Mouth at rest at time `timestamp_ms`.
    pub fn neutral(timestamp_ms: f64) -> Self {
        Self {
            viseme_id: NEUTRAL_VISEME,
            timestamp_ms,
            duration_ms: 0.0,
        }
    }

    pub fn is_neutral(&self) -> bool {
        self.viseme_id == NEUTRAL_VISEME
    }

    pub fn blendshape(&self) -> Option<&'static str> {
        blendshape_name(self.viseme_id)
    }
}

impl From<&VisemeEvent> for VisemeSnapshot {
    fn from(event: &VisemeEvent) -> Self {
        Self {
            viseme_id: event.viseme_id,
            timestamp_ms: event.audio_offset_ms,
            duration_ms: event.duration_ms,
        }
    }
}

impl From<VisemeSnapshot> for VisemeEvent {
    fn from(snapshot: VisemeSnapshot) -> Self {
        Self {
            viseme_id: snapshot.viseme_id,
            audio_offset_ms: snapshot.timestamp_ms,
            duration_ms: snapshot.duration_ms,
        }
    }
}
