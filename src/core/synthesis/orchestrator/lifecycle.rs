//! Session control, frame ticks and teardown.

use std::sync::Arc;
use std::sync::atomic::Ordering;
use std::time::Duration;

use tracing::info;

use crate::config::LipSyncConfig;
use crate::core::playback::{PlaybackManager, PlaybackTransition};
use crate::core::viseme::{VisemeEvent, VisemeScheduler, VisemeSnapshot};
use crate::utils::observers::Subscription;

use super::SynthesisOrchestrator;

impl SynthesisOrchestrator {
    /// Halt the current session.
    ///
    /// Playback stops, the mouth returns to rest and any request still waiting
    /// on the synthesizer will be discarded when it answers. The orchestrator
    /// stays usable for new requests.
    pub fn stop(&self) {
        if self.is_disposed() {
            return;
        }
        let _session = self.session_lock.lock();
        self.teardown_session();
        let epoch = self.epoch.advance();
        info!(epoch, "Speech session stopped");
    }

    /// Release everything taken at construction: internal subscriptions,
    /// viseme and playback-state listeners, and the playback session.
    ///
    /// Safe to call more than once; only the first call has an effect. Also
    /// runs when the orchestrator is dropped.
    pub fn dispose(&self) {
        if self.disposed.swap(true, Ordering::AcqRel) {
            return;
        }

        let _session = self.session_lock.lock();
        let epoch = self.epoch.advance();

        let subscriptions = std::mem::take(&mut *self.internal_subscriptions.lock());
        for mut subscription in subscriptions {
            subscription.unsubscribe();
        }

        self.scheduler.stop();
        self.playback.shutdown();
        self.viseme_observers.clear();

        info!(epoch, "Synthesis orchestrator disposed");
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed.load(Ordering::Acquire)
    }

    /// Per-frame driver: advance the playback clock by `elapsed` wall time,
    /// then update the scheduler at the new source-audio position.
    ///
    /// Returns the viseme to render this frame. Viseme subscribers are
    /// notified from inside this call when the active viseme changes.
    pub fn tick(&self, elapsed: Duration) -> VisemeSnapshot {
        if self.is_disposed() {
            return VisemeSnapshot::neutral(0.0);
        }
        let _session = self.session_lock.lock();
        self.playback.advance(elapsed);
        self.scheduler.update(self.playback.current_time_ms())
    }

    /// Read-only pull of the viseme at the current playback position.
    pub fn current_viseme(&self) -> VisemeSnapshot {
        self.scheduler
            .current_viseme_at(self.playback.current_time_ms())
    }

    /// Playback position in source-audio milliseconds, 0 when idle.
    pub fn current_time_ms(&self) -> f64 {
        self.playback.current_time_ms()
    }

    /// Epoch of the newest request or stop.
    pub fn current_epoch(&self) -> u64 {
        self.epoch.current()
    }

    /// Register for viseme changes of the current session.
    ///
    /// Notifications from superseded sessions are never delivered. A return
    /// to rest arrives as [`NEUTRAL_VISEME`](crate::core::viseme::NEUTRAL_VISEME)
    /// with a zero duration and the clip time at which it took effect.
    pub fn subscribe_to_visemes<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&VisemeEvent) + Send + Sync + 'static,
    {
        self.viseme_observers.subscribe(callback)
    }

    pub fn subscribe_to_playback_state<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&PlaybackTransition) + Send + Sync + 'static,
    {
        self.playback.subscribe_to_playback_state(callback)
    }

    /// Direct access to transport and output controls (pause, volume, ...).
    pub fn playback(&self) -> &Arc<PlaybackManager> {
        &self.playback
    }

    pub fn scheduler(&self) -> &Arc<VisemeScheduler> {
        &self.scheduler
    }

    pub fn config(&self) -> &LipSyncConfig {
        &self.config
    }

    /// Provider information reported by the synthesizer.
    pub fn provider_info(&self) -> serde_json::Value {
        self.synthesizer.provider_info()
    }
}

impl Drop for SynthesisOrchestrator {
    fn drop(&mut self) {
        self.dispose();
    }
}
