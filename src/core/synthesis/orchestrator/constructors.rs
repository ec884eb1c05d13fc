//! SynthesisOrchestrator constructors and internal wiring.

use std::sync::Arc;
use std::sync::atomic::AtomicBool;

use parking_lot::{Mutex, ReentrantMutex};
use tracing::debug;

use crate::config::LipSyncConfig;
use crate::core::playback::{PlaybackManager, PlaybackState};
use crate::core::tts::SpeechSynthesizer;
use crate::core::viseme::{VisemeEvent, VisemeScheduler};
use crate::utils::observers::ObserverRegistry;

use super::super::epoch::SessionEpoch;
use super::SynthesisOrchestrator;

impl SynthesisOrchestrator {
    /// Create an orchestrator with default settings.
    ///
    /// # Example
    /// ```rust
    /// use std::sync::Arc;
    /// use lipsync::core::synthesis::SynthesisOrchestrator;
    /// use lipsync::core::tts::OfflineSynthesizer;
    ///
    /// let orchestrator = SynthesisOrchestrator::new(Arc::new(OfflineSynthesizer::new()));
    /// assert_eq!(orchestrator.current_time_ms(), 0.0);
    /// ```
    pub fn new(synthesizer: Arc<dyn SpeechSynthesizer>) -> Self {
        Self::with_config(synthesizer, LipSyncConfig::default())
    }

    /// Create an orchestrator whose playback volume/speed and request
    /// defaults come from `config`.
    pub fn with_config(synthesizer: Arc<dyn SpeechSynthesizer>, config: LipSyncConfig) -> Self {
        let playback = Arc::new(PlaybackManager::with_settings(
            config.volume,
            config.playback_speed,
        ));
        if config.muted {
            playback.mute();
        }
        let scheduler = Arc::new(VisemeScheduler::new());
        let epoch = Arc::new(SessionEpoch::new());
        let viseme_observers = ObserverRegistry::<VisemeEvent>::new();

        // Stale-epoch filter, checked at dispatch time.
        let forward_epoch = epoch.clone();
        let forward_observers = viseme_observers.clone();
        let forwarder = scheduler.subscribe_to_viseme_changes(move |change| {
            if !forward_epoch.is_current(change.epoch) {
                debug!(
                    stale_epoch = change.epoch,
                    current_epoch = forward_epoch.current(),
                    "Dropping viseme notification from a superseded session"
                );
                return;
            }
            forward_observers.notify(&VisemeEvent::from(change.snapshot));
        });

        // Audio ran out: return the mouth to rest and close the timeline.
        let finish_scheduler = scheduler.clone();
        let clip_end = playback.subscribe_to_playback_state(move |transition| {
            if transition.to == PlaybackState::Idle {
                finish_scheduler.finish();
            }
        });

        debug!(
            volume = config.volume,
            playback_speed = config.playback_speed,
            muted = config.muted,
            "Synthesis orchestrator created"
        );

        Self {
            synthesizer,
            playback,
            scheduler,
            epoch,
            viseme_observers,
            internal_subscriptions: Mutex::new(vec![forwarder, clip_end]),
            session_lock: ReentrantMutex::new(()),
            disposed: AtomicBool::new(false),
            config,
        }
    }
}
