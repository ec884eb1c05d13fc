//! End-to-end tests for a speaking session
//!
//! These tests drive the engine only through its public API, the way an
//! avatar front end would: request speech, then tick the frame clock and
//! watch the mouth shapes that come out.
//!
//! ## Key Test Scenarios
//!
//! 1. **Offline session**: the offline synthesizer's timeline is delivered in
//!    order and the mouth returns to rest when the audio ends.
//! 2. **Supersession**: a newer request wins over one still in flight.
//! 3. **Queueing**: the playback manager hands over between queued clips.
//! 4. **Dispose**: a disposed orchestrator refuses work and stays silent.
//! 5. **Configuration**: settings loaded from YAML reach playback and animation.
//!
//! ```bash
//! cargo test --test lipsync_session
//! ```

use std::fs;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tempfile::TempDir;

use lipsync::utils::observers::Subscription;
use lipsync::{
    AudioClip, LipSyncConfig, MouthAnimator, NEUTRAL_VISEME, OfflineSynthesizer, PlaybackManager,
    PlaybackState, SynthesisError, SynthesisOrchestrator,
};

const FRAME: Duration = Duration::from_millis(20);

fn record_visemes(orchestrator: &SynthesisOrchestrator) -> (Arc<Mutex<Vec<u8>>>, Subscription) {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();
    let subscription = orchestrator.subscribe_to_visemes(move |event| {
        sink.lock().push(event.viseme_id);
    });
    (seen, subscription)
}

/// Tick until playback goes idle, with an upper bound on frames.
fn run_until_idle(orchestrator: &SynthesisOrchestrator) -> usize {
    let mut frames = 0;
    while orchestrator.playback().state() != PlaybackState::Idle && frames < 1000 {
        orchestrator.tick(FRAME);
        frames += 1;
    }
    frames
}

#[tokio::test]
async fn test_offline_session_plays_timeline_in_order() {
    let orchestrator = SynthesisOrchestrator::new(Arc::new(OfflineSynthesizer::new()));
    let (seen, _subscription) = record_visemes(&orchestrator);

    // "hello": h/e are open vowels, the doubled l merges, o rounds.
    let session = orchestrator
        .synthesize_speech("Hello", None, "")
        .await
        .unwrap();
    assert_eq!(session.voice, "en-US-JennyNeural");
    assert_eq!(session.viseme_count, 4);
    assert!(session.duration_ms > 0.0);
    assert_eq!(orchestrator.playback().state(), PlaybackState::Playing);

    let frames = run_until_idle(&orchestrator);
    assert!(frames < 1000, "playback never finished");

    assert_eq!(*seen.lock(), vec![10, 11, 4, 13, NEUTRAL_VISEME]);
    assert!(!orchestrator.scheduler().is_active());
    assert_eq!(orchestrator.current_viseme().viseme_id, NEUTRAL_VISEME);
}

#[tokio::test]
async fn test_animator_follows_session_and_settles_at_rest() {
    let orchestrator = SynthesisOrchestrator::new(Arc::new(OfflineSynthesizer::new()));
    let mut animator = MouthAnimator::from_config(orchestrator.config());

    orchestrator
        .synthesize_speech("Ma", None, "en-US")
        .await
        .unwrap();

    // "ma" starts on the closed-lips viseme.
    let snapshot = orchestrator.tick(FRAME);
    assert_eq!(snapshot.viseme_id, 1);
    for _ in 0..3 {
        animator.apply(&snapshot, FRAME.as_secs_f32());
    }
    assert!(animator.weight(1) > 0.0);
    assert!(animator.weight(NEUTRAL_VISEME) < 1.0);

    run_until_idle(&orchestrator);
    let rest = orchestrator.tick(FRAME);
    for _ in 0..200 {
        animator.apply(&rest, FRAME.as_secs_f32());
    }
    assert_eq!(animator.dominant(), NEUTRAL_VISEME);
    assert!(animator.weight(1) < 0.01);
}

#[tokio::test(start_paused = true)]
async fn test_newer_request_supersedes_one_in_flight() {
    let orchestrator = SynthesisOrchestrator::new(Arc::new(OfflineSynthesizer::with_latency(
        Duration::from_millis(50),
    )));
    let (seen, _subscription) = record_visemes(&orchestrator);

    let (first, second) = tokio::join!(
        orchestrator.synthesize_speech("Hello", None, ""),
        async {
            tokio::time::sleep(Duration::from_millis(10)).await;
            orchestrator.synthesize_speech("Bob", None, "").await
        }
    );

    assert_eq!(first.unwrap_err(), SynthesisError::Superseded);
    let second = second.unwrap();
    assert_eq!(orchestrator.current_epoch(), second.epoch);

    run_until_idle(&orchestrator);
    // Only the second request's timeline ("bob") is ever shown.
    assert_eq!(*seen.lock(), vec![1, 13, 1, NEUTRAL_VISEME]);
}

#[tokio::test]
async fn test_stop_returns_mouth_to_rest_and_allows_new_sessions() {
    let orchestrator = SynthesisOrchestrator::new(Arc::new(OfflineSynthesizer::new()));
    let (seen, _subscription) = record_visemes(&orchestrator);

    orchestrator
        .synthesize_speech("Hello", None, "")
        .await
        .unwrap();
    orchestrator.tick(FRAME);
    orchestrator.stop();

    assert_eq!(orchestrator.playback().state(), PlaybackState::Idle);
    assert_eq!(orchestrator.tick(FRAME).viseme_id, NEUTRAL_VISEME);

    orchestrator
        .synthesize_speech("Bob", None, "")
        .await
        .unwrap();
    orchestrator.tick(FRAME);
    assert_eq!(*seen.lock(), vec![10, NEUTRAL_VISEME, 1]);
}

#[test]
fn test_playback_queue_hands_over_with_carry() {
    let manager = PlaybackManager::new();
    let transitions = Arc::new(Mutex::new(Vec::new()));
    let sink = transitions.clone();
    let _subscription = manager.subscribe_to_playback_state(move |transition| {
        sink.lock().push(transition.to);
    });

    // 100ms and 200ms of 16kHz mono PCM.
    manager.play(AudioClip::from_pcm16(vec![0u8; 3200], 16000));
    manager.play(AudioClip::from_pcm16(vec![0u8; 6400], 16000));
    assert_eq!(manager.queue_len(), 1);

    manager.advance(Duration::from_millis(130));
    assert_eq!(manager.state(), PlaybackState::Playing);
    assert_eq!(manager.queue_len(), 0);
    assert!((manager.current_time_ms() - 30.0).abs() < 1e-6);
    assert!((manager.duration_ms() - 200.0).abs() < 1e-6);

    manager.advance(Duration::from_millis(500));
    assert_eq!(manager.state(), PlaybackState::Idle);
    assert_eq!(manager.current_time_ms(), 0.0);

    // The handover between clips is not a state change.
    assert_eq!(
        *transitions.lock(),
        vec![PlaybackState::Playing, PlaybackState::Idle]
    );
}

#[tokio::test]
async fn test_dispose_refuses_work_and_stays_silent() {
    let orchestrator = SynthesisOrchestrator::new(Arc::new(OfflineSynthesizer::new()));
    let (seen, _subscription) = record_visemes(&orchestrator);

    orchestrator
        .synthesize_speech("Hello", None, "")
        .await
        .unwrap();
    orchestrator.tick(FRAME);

    orchestrator.dispose();
    orchestrator.dispose();

    assert!(orchestrator.is_disposed());
    assert_eq!(orchestrator.playback().state(), PlaybackState::Stopped);
    assert_eq!(
        orchestrator
            .synthesize_speech("Hello", None, "")
            .await
            .unwrap_err(),
        SynthesisError::Disposed
    );

    let before = seen.lock().len();
    for _ in 0..10 {
        assert_eq!(orchestrator.tick(FRAME).viseme_id, NEUTRAL_VISEME);
    }
    assert_eq!(seen.lock().len(), before);
}

#[tokio::test]
async fn test_config_file_reaches_playback() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("lipsync.yaml");
    fs::write(
        &path,
        r#"
synthesis:
  language: "fr-FR"
playback:
  volume: 40
  speed: 2.0
  muted: true
animation:
  interpolation_rate: 12.0
"#,
    )
    .unwrap();

    let config = LipSyncConfig::from_file(&path).unwrap();
    assert_eq!(config.default_language, "fr-FR");

    let orchestrator =
        SynthesisOrchestrator::with_config(Arc::new(OfflineSynthesizer::new()), config);
    assert_eq!(orchestrator.playback().volume(), 40);
    assert!(orchestrator.playback().is_muted());
    assert_eq!(orchestrator.playback().effective_gain(), 0.0);

    // The configured language picks the voice when none is given.
    let session = orchestrator
        .synthesize_speech("Bonjour", None, "")
        .await
        .unwrap();
    assert_eq!(session.voice, "fr-FR-DeniseNeural");

    // At double speed one frame covers twice as much source audio.
    orchestrator.tick(Duration::from_millis(50));
    assert!((orchestrator.current_time_ms() - 100.0).abs() < 1e-6);
}

#[test]
fn test_config_file_rejects_out_of_range_values() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("lipsync.yaml");
    fs::write(&path, "playback:\n  speed: 3.0\n").unwrap();

    let err = LipSyncConfig::from_file(&path).unwrap_err();
    assert!(err.to_string().contains("playback_speed"));
}
