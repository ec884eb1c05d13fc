//! Viseme scheduler: maps a playback-clock timestamp to the active viseme.
//!
//! Events are sorted once when a session starts and never mutated afterwards,
//! so each per-frame lookup is a binary search over an immutable slice.
//! Change notifications are deduplicated on the viseme id: a render loop
//! querying at 60 Hz only produces a notification when the mouth shape
//! actually changes.

use parking_lot::Mutex;
use tracing::{debug, warn};

use super::event::{NEUTRAL_VISEME, VisemeEvent, VisemeSnapshot};
use crate::core::playback::AudioClip;
use crate::utils::observers::{ObserverRegistry, Subscription};

/// A viseme change, tagged with the session epoch it was started under.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisemeChange {
    pub epoch: u64,
    pub snapshot: VisemeSnapshot,
}

#[derive(Default)]
struct SchedulerInner {
    active: bool,
    epoch: u64,
    clip_duration_ms: f64,
    events: Vec<VisemeEvent>,
    last_notified: Option<u8>,
}

impl SchedulerInner {
    fn reset(&mut self) {
        self.active = false;
        self.clip_duration_ms = 0.0;
        self.events.clear();
        self.last_notified = None;
    }

    /// Record `snapshot` and return a change if its id differs from the last one sent.
    fn track(&mut self, snapshot: VisemeSnapshot) -> Option<VisemeChange> {
        if self.last_notified == Some(snapshot.viseme_id) {
            return None;
        }
        self.last_notified = Some(snapshot.viseme_id);
        Some(VisemeChange {
            epoch: self.epoch,
            snapshot,
        })
    }
}

/// Find the viseme active at `time_ms` in an offset-sorted event list.
///
/// The active event is the last one whose offset is `<= time_ms`. When
/// `time_ms` precedes every event or lies past that event's window, the
/// neutral viseme is returned.
pub fn viseme_at(events: &[VisemeEvent], time_ms: f64) -> VisemeSnapshot {
    if !time_ms.is_finite() {
        return VisemeSnapshot::neutral(0.0);
    }

    let upper = events.partition_point(|event| event.audio_offset_ms <= time_ms);
    let Some(event) = upper.checked_sub(1).map(|index| &events[index]) else {
        return VisemeSnapshot::neutral(time_ms);
    };

    if time_ms > event.end_ms() {
        VisemeSnapshot::neutral(time_ms)
    } else {
        VisemeSnapshot::from(event)
    }
}

/// Holds the viseme timeline of one playback session.
pub struct VisemeScheduler {
    inner: Mutex<SchedulerInner>,
    observers: ObserverRegistry<VisemeChange>,
}

impl Default for VisemeScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl VisemeScheduler {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(SchedulerInner::default()),
            observers: ObserverRegistry::new(),
        }
    }

    /// Begin a session for `clip` with its viseme timeline.
    ///
    /// Events are sorted by offset with a stable sort, so events sharing an
    /// offset keep their input order and the later one wins at lookup time.
    /// Invalid events (id > 21, negative offset, non-positive duration) are dropped.
    pub fn start(&self, epoch: u64, clip: &AudioClip, events: Vec<VisemeEvent>) {
        let received = events.len();
        let mut events: Vec<VisemeEvent> = events.into_iter().filter(|e| e.is_valid()).collect();
        if events.len() != received {
            warn!(
                dropped = received - events.len(),
                "Dropping invalid viseme events"
            );
        }
        events.sort_by(|a, b| a.audio_offset_ms.total_cmp(&b.audio_offset_ms));

        debug!(
            epoch,
            events = events.len(),
            clip_duration_ms = clip.duration_ms,
            "Viseme session started"
        );

        let mut inner = self.inner.lock();
        inner.active = true;
        inner.epoch = epoch;
        inner.clip_duration_ms = clip.duration_ms;
        inner.events = events;
        inner.last_notified = None;
    }

    /// Drop the timeline without any further notification.
    pub fn stop(&self) {
        let mut inner = self.inner.lock();
        if inner.active {
            debug!(epoch = inner.epoch, "Viseme session stopped");
        }
        inner.reset();
    }

    /// End the session because its audio finished: return the mouth to rest
    /// with one last neutral notification (unless already neutral), then clear.
    pub fn finish(&self) {
        let change = {
            let mut inner = self.inner.lock();
            if !inner.active {
                return;
            }
            let at = inner.clip_duration_ms;
            let change = inner.track(VisemeSnapshot::neutral(at));
            debug!(epoch = inner.epoch, "Viseme session finished");
            inner.reset();
            change
        };

        if let Some(change) = change {
            self.observers.notify(&change);
        }
    }

    /// The viseme active at `time_ms`, without notifying anyone.
    pub fn current_viseme_at(&self, time_ms: f64) -> VisemeSnapshot {
        let inner = self.inner.lock();
        if !inner.active {
            return VisemeSnapshot::neutral(time_ms);
        }
        viseme_at(&inner.events, time_ms)
    }

    /// Per-frame update: compute the viseme at `time_ms` and notify observers
    /// if its id differs from the last one delivered this session.
    pub fn update(&self, time_ms: f64) -> VisemeSnapshot {
        let (snapshot, change) = {
            let mut inner = self.inner.lock();
            if !inner.active {
                return VisemeSnapshot::neutral(time_ms);
            }
            let snapshot = viseme_at(&inner.events, time_ms);
            let change = inner.track(snapshot);
            (snapshot, change)
        };

        if let Some(change) = change {
            self.observers.notify(&change);
        }
        snapshot
    }

    pub fn subscribe_to_viseme_changes<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&VisemeChange) + Send + Sync + 'static,
    {
        self.observers.subscribe(callback)
    }

    pub fn is_active(&self) -> bool {
        self.inner.lock().active
    }

    /// Epoch of the running session, if any.
    pub fn session_epoch(&self) -> Option<u64> {
        let inner = self.inner.lock();
        inner.active.then_some(inner.epoch)
    }

    pub fn event_count(&self) -> usize {
        self.inner.lock().events.len()
    }

    /// Id of the last viseme delivered to observers this session.
    pub fn last_notified(&self) -> Option<u8> {
        self.inner.lock().last_notified
    }

    /// True when the last delivered viseme is the neutral one (or nothing was sent).
    pub fn is_at_rest(&self) -> bool {
        matches!(self.last_notified(), None | Some(NEUTRAL_VISEME))
    }
}
