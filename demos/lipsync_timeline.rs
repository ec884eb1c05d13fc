//! Speak a sentence with the offline synthesizer and print the mouth timeline.
//!
//! ```text
//! cargo run --example lipsync_timeline -- "Hello there" --language en-GB
//! cargo run --example lipsync_timeline -- "Bonjour" --config lipsync.yaml
//! ```

use std::env;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::anyhow;
use tracing::info;

use lipsync::{
    LipSyncConfig, MouthAnimator, OfflineSynthesizer, PlaybackState, SynthesisOrchestrator,
    blendshape_name,
};

const FRAME: Duration = Duration::from_micros(16_667);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let mut text = String::from("Hello, I am a talking head.");
    let mut language = String::new();
    let mut config_path: Option<PathBuf> = None;

    let mut args = env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-l" | "--language" => {
                language = args
                    .next()
                    .ok_or_else(|| anyhow!("--language requires a value"))?;
            }
            "-c" | "--config" => {
                let path = args
                    .next()
                    .ok_or_else(|| anyhow!("--config requires a file path"))?;
                config_path = Some(PathBuf::from(path));
            }
            other if other.starts_with('-') => {
                anyhow::bail!("Unknown option '{other}'. Use --language <code> or --config <file>");
            }
            other => text = other.to_string(),
        }
    }

    let config = match &config_path {
        Some(path) => LipSyncConfig::from_file(path),
        None => LipSyncConfig::from_env(),
    }
    .map_err(|e| anyhow!("Failed to load configuration: {e}"))?;

    let mut animator = MouthAnimator::from_config(&config);
    let orchestrator = SynthesisOrchestrator::with_config(Arc::new(OfflineSynthesizer::new()), config);

    let _visemes = orchestrator.subscribe_to_visemes(|event| {
        println!(
            "{:>8.1} ms  viseme {:>2}  {}",
            event.audio_offset_ms,
            event.viseme_id,
            blendshape_name(event.viseme_id).unwrap_or("?")
        );
    });
    let _states = orchestrator.subscribe_to_playback_state(|transition| {
        info!(from = %transition.from, to = %transition.to, "Playback");
    });

    let session = orchestrator
        .synthesize_speech(&text, None, &language)
        .await
        .map_err(|e| anyhow!("{} ({})", e, e.code()))?;
    info!(
        voice = %session.voice,
        duration_ms = session.duration_ms,
        visemes = session.viseme_count,
        "Speaking"
    );

    let mut interval = tokio::time::interval(FRAME);
    let mut last_dominant = animator.dominant();
    loop {
        interval.tick().await;
        let snapshot = orchestrator.tick(FRAME);
        let weights = animator.apply(&snapshot, FRAME.as_secs_f32());

        let dominant = animator.dominant();
        if dominant != last_dominant {
            let name = blendshape_name(dominant).unwrap_or("?");
            info!(
                time_ms = orchestrator.current_time_ms(),
                blendshape = name,
                weight = weights.get(name).copied().unwrap_or(0.0),
                "Dominant mouth shape"
            );
            last_dominant = dominant;
        }

        if orchestrator.playback().state() == PlaybackState::Idle {
            break;
        }
    }

    orchestrator.dispose();
    Ok(())
}
