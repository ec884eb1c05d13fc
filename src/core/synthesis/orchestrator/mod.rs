//! Main SynthesisOrchestrator implementation
//!
//! Split into submodules by concern: construction and wiring, the
//! synthesis request path, and session control (stop, dispose, frame ticks).

mod constructors;
mod lifecycle;
mod session;

use std::sync::Arc;
use std::sync::atomic::AtomicBool;

use parking_lot::{Mutex, ReentrantMutex};
use serde::Serialize;

use crate::config::LipSyncConfig;
use crate::core::playback::PlaybackManager;
use crate::core::tts::SpeechSynthesizer;
use crate::core::viseme::{VisemeEvent, VisemeScheduler};
use crate::utils::observers::{ObserverRegistry, Subscription};

use super::epoch::SessionEpoch;

/// Summary of a session that started playing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionInfo {
    pub epoch: u64,
    pub voice: String,
    pub duration_ms: f64,
    pub viseme_count: usize,
}

/// Owns the active speaking session: one clip, one viseme timeline, one epoch.
///
/// A request asks the synthesizer for audio and visemes, then hands the clip
/// to the [`PlaybackManager`] and the timeline to the [`VisemeScheduler`].
/// Scheduler notifications are forwarded to viseme subscribers only while
/// their epoch is still current.
pub struct SynthesisOrchestrator {
    pub(super) synthesizer: Arc<dyn SpeechSynthesizer>,
    pub(super) playback: Arc<PlaybackManager>,
    pub(super) scheduler: Arc<VisemeScheduler>,
    pub(super) epoch: Arc<SessionEpoch>,

    // Public viseme stream, fed by the forwarder installed at construction
    pub(super) viseme_observers: ObserverRegistry<VisemeEvent>,

    // Wiring into the playback manager and scheduler, released by dispose()
    pub(super) internal_subscriptions: Mutex<Vec<Subscription>>,

    // Serializes session teardown and start. Reentrant so observer callbacks
    // may call back into the orchestrator.
    pub(super) session_lock: ReentrantMutex<()>,

    pub(super) disposed: AtomicBool,
    pub(super) config: LipSyncConfig,
}

// Compile-time assertion that SynthesisOrchestrator is Send + Sync.
const _: () = {
    const fn assert_send_sync<T: Send + Sync>() {}
    let _ = assert_send_sync::<SynthesisOrchestrator>;
};
