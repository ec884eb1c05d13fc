//! Playback manager: one clip queue, one state machine, one logical clock.
//!
//! The clock only moves when the frame driver calls [`PlaybackManager::advance`].
//! Elapsed wall time is scaled by the playback speed before it is added to the
//! clip position, so [`PlaybackManager::current_time_ms`] is always expressed in
//! source-audio time and viseme offsets stay aligned at any speed.

use std::collections::VecDeque;
use std::time::Duration;

use parking_lot::Mutex;
use tracing::{debug, info};

use super::clip::AudioClip;
use super::state::{PlaybackState, PlaybackTransition};
use crate::utils::observers::{ObserverRegistry, Subscription};

pub const MIN_VOLUME: u8 = 0;
pub const MAX_VOLUME: u8 = 100;
pub const MIN_PLAYBACK_SPEED: f32 = 0.5;
pub const MAX_PLAYBACK_SPEED: f32 = 2.0;

/// The clip currently loaded and its position in source-audio milliseconds.
struct ActiveClip {
    clip: AudioClip,
    position_ms: f64,
}

struct PlaybackInner {
    state: PlaybackState,
    current: Option<ActiveClip>,
    queue: VecDeque<AudioClip>,
    volume: u8,
    muted: bool,
    speed: f32,
}

impl PlaybackInner {
    /// Switch state and report the transition, or `None` when nothing changed.
    fn transition(&mut self, to: PlaybackState) -> Option<PlaybackTransition> {
        if self.state == to {
            return None;
        }
        let from = self.state;
        self.state = to;
        Some(PlaybackTransition { from, to })
    }

    /// End the current clip and load the next queued one, or go idle.
    ///
    /// The next clip inherits the transport state: a paused manager stays
    /// paused on it, so handing over is never a transition.
    fn advance_to_next(&mut self, carry_ms: f64) -> Option<PlaybackTransition> {
        match self.queue.pop_front() {
            Some(next) => {
                let position_ms = carry_ms.min(next.duration_ms);
                self.current = Some(ActiveClip {
                    clip: next,
                    position_ms,
                });
                None
            }
            None => {
                self.current = None;
                self.transition(PlaybackState::Idle)
            }
        }
    }
}

/// Owns the audio clip queue and the playback state machine.
///
/// All methods take `&self`; state lives behind a `parking_lot` mutex and
/// observers are notified after the lock is released, so callbacks may call
/// back into the manager.
pub struct PlaybackManager {
    inner: Mutex<PlaybackInner>,
    state_observers: ObserverRegistry<PlaybackTransition>,
}

impl Default for PlaybackManager {
    fn default() -> Self {
        Self::new()
    }
}

impl PlaybackManager {
    pub fn new() -> Self {
        Self::with_settings(MAX_VOLUME, 1.0)
    }

    /// Create a manager with an initial volume (0-100) and playback speed (0.5-2.0).
    pub fn with_settings(volume: u8, speed: f32) -> Self {
        let manager = Self {
            inner: Mutex::new(PlaybackInner {
                state: PlaybackState::Idle,
                current: None,
                queue: VecDeque::new(),
                volume: MAX_VOLUME,
                muted: false,
                speed: 1.0,
            }),
            state_observers: ObserverRegistry::new(),
        };
        manager.set_volume(volume);
        manager.set_playback_speed(speed);
        manager
    }

    fn emit(&self, transition: Option<PlaybackTransition>) {
        if let Some(transition) = transition {
            debug!(
                from = %transition.from,
                to = %transition.to,
                "Playback state changed"
            );
            self.state_observers.notify(&transition);
        }
    }

    /// Start playing `clip`, or queue it behind the clip already loaded.
    ///
    /// Clips without audio or without a positive duration are ignored.
    pub fn play(&self, clip: AudioClip) {
        if !clip.is_playable() {
            debug!(
                bytes = clip.data.len(),
                duration_ms = clip.duration_ms,
                "Ignoring play() with an unplayable clip"
            );
            return;
        }

        let transition = {
            let mut inner = self.inner.lock();
            match inner.state {
                PlaybackState::Stopped => {
                    debug!("Ignoring play() after shutdown");
                    None
                }
                PlaybackState::Playing | PlaybackState::Paused => {
                    inner.queue.push_back(clip);
                    debug!(queued = inner.queue.len(), "Clip queued");
                    None
                }
                PlaybackState::Idle => {
                    inner.current = Some(ActiveClip {
                        clip,
                        position_ms: 0.0,
                    });
                    inner.transition(PlaybackState::Playing)
                }
            }
        };

        self.emit(transition);
    }

    pub fn pause(&self) {
        let transition = {
            let mut inner = self.inner.lock();
            if inner.state == PlaybackState::Playing {
                inner.transition(PlaybackState::Paused)
            } else {
                None
            }
        };
        self.emit(transition);
    }

    pub fn resume(&self) {
        let transition = {
            let mut inner = self.inner.lock();
            if inner.state == PlaybackState::Paused {
                inner.transition(PlaybackState::Playing)
            } else {
                None
            }
        };
        self.emit(transition);
    }

    /// Halt the current clip and go idle. The queue is left untouched;
    /// call [`clear_queue`](Self::clear_queue) to drop it.
    pub fn stop(&self) {
        let transition = {
            let mut inner = self.inner.lock();
            if inner.state.has_active_clip() {
                inner.current = None;
                inner.transition(PlaybackState::Idle)
            } else {
                None
            }
        };
        self.emit(transition);
    }

    /// End the current clip early, as if it had finished.
    ///
    /// When paused, the next queued clip is loaded paused at its start.
    pub fn skip(&self) {
        let transition = {
            let mut inner = self.inner.lock();
            if inner.state.has_active_clip() {
                inner.advance_to_next(0.0)
            } else {
                None
            }
        };
        self.emit(transition);
    }

    pub fn clear_queue(&self) {
        let mut inner = self.inner.lock();
        if !inner.queue.is_empty() {
            debug!(dropped = inner.queue.len(), "Clearing playback queue");
            inner.queue.clear();
        }
    }

    /// Move the playback clock forward by `elapsed` wall time.
    ///
    /// Clips that finish during the step hand over to the next queued clip,
    /// carrying the leftover time; the manager goes idle when the queue runs dry.
    pub fn advance(&self, elapsed: Duration) {
        let mut transitions = Vec::new();
        {
            let mut inner = self.inner.lock();
            if inner.state != PlaybackState::Playing {
                return;
            }

            let step_ms = elapsed.as_secs_f64() * 1000.0 * inner.speed as f64;
            let Some(active) = inner.current.as_mut() else {
                return;
            };
            active.position_ms += step_ms;

            loop {
                let Some(active) = inner.current.as_ref() else {
                    break;
                };
                if active.position_ms < active.clip.duration_ms {
                    break;
                }
                let carry_ms = active.position_ms - active.clip.duration_ms;
                debug!(duration_ms = active.clip.duration_ms, "Clip finished");
                if let Some(transition) = inner.advance_to_next(carry_ms) {
                    transitions.push(transition);
                }
            }
        }

        for transition in transitions {
            self.emit(Some(transition));
        }
    }

    /// Position of the active clip in source-audio milliseconds, 0 when idle.
    pub fn current_time_ms(&self) -> f64 {
        self.inner
            .lock()
            .current
            .as_ref()
            .map(|active| active.position_ms)
            .unwrap_or(0.0)
    }

    /// Duration of the active clip in milliseconds, 0 when idle.
    pub fn duration_ms(&self) -> f64 {
        self.inner
            .lock()
            .current
            .as_ref()
            .map(|active| active.clip.duration_ms)
            .unwrap_or(0.0)
    }

    pub fn state(&self) -> PlaybackState {
        self.inner.lock().state
    }

    pub fn queue_len(&self) -> usize {
        self.inner.lock().queue.len()
    }

    /// Set the output volume, clamped to 0-100.
    pub fn set_volume(&self, volume: u8) {
        self.inner.lock().volume = volume.clamp(MIN_VOLUME, MAX_VOLUME);
    }

    pub fn volume(&self) -> u8 {
        self.inner.lock().volume
    }

    pub fn mute(&self) {
        self.inner.lock().muted = true;
    }

    pub fn unmute(&self) {
        self.inner.lock().muted = false;
    }

    pub fn is_muted(&self) -> bool {
        self.inner.lock().muted
    }

    /// Gain to hand to the audio output: 0.0 when muted, otherwise volume / 100.
    pub fn effective_gain(&self) -> f32 {
        let inner = self.inner.lock();
        if inner.muted {
            0.0
        } else {
            inner.volume as f32 / MAX_VOLUME as f32
        }
    }

    /// Set the playback speed, clamped to 0.5-2.0. Non-finite values are ignored.
    pub fn set_playback_speed(&self, speed: f32) {
        if !speed.is_finite() {
            debug!(speed, "Ignoring non-finite playback speed");
            return;
        }
        self.inner.lock().speed = speed.clamp(MIN_PLAYBACK_SPEED, MAX_PLAYBACK_SPEED);
    }

    pub fn playback_speed(&self) -> f32 {
        self.inner.lock().speed
    }

    /// Register for state changes. The callback fires once per real transition.
    pub fn subscribe_to_playback_state<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&PlaybackTransition) + Send + Sync + 'static,
    {
        self.state_observers.subscribe(callback)
    }

    /// Enter the terminal `Stopped` state: drop the clip and the queue, deliver
    /// the final transition, then release every state observer.
    pub fn shutdown(&self) {
        let transition = {
            let mut inner = self.inner.lock();
            inner.current = None;
            inner.queue.clear();
            inner.transition(PlaybackState::Stopped)
        };
        if transition.is_some() {
            info!("Playback manager shut down");
        }
        self.emit(transition);
        self.state_observers.clear();
    }
}
