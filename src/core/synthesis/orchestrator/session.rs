//! The synthesis request path.

use std::sync::atomic::Ordering;

use tracing::{debug, info, warn};

use crate::core::tts::{SpeechError, SynthesisConfig};
use crate::core::voices::voice_for_language;

use super::super::errors::{SynthesisError, SynthesisResult};
use super::{SessionInfo, SynthesisOrchestrator};

impl SynthesisOrchestrator {
    /// Synthesize `text` and start speaking it.
    ///
    /// Any previous session, playing or still waiting on the synthesizer, is
    /// invalidated before the request is sent. When this call loses to a newer
    /// request (or to [`stop`](Self::stop)) it returns
    /// [`SynthesisError::Superseded`] and leaves the newer session alone.
    ///
    /// `voice` may be `None` or empty, in which case a voice is chosen from
    /// `language` (or the configured defaults when `language` is empty too).
    /// Text starting with `<speak` is sent as SSML.
    ///
    /// Synthesizer failures are returned as [`SynthesisError::Speech`]; no
    /// playback or viseme session is created for a failed request.
    pub async fn synthesize_speech(
        &self,
        text: &str,
        voice: Option<&str>,
        language: &str,
    ) -> SynthesisResult<SessionInfo> {
        if self.disposed.load(Ordering::Acquire) {
            return Err(SynthesisError::Disposed);
        }
        if text.trim().is_empty() {
            return Err(SynthesisError::EmptyText);
        }

        let request = self.build_request(voice, language);

        // The old session's rest notification must go out under its own epoch.
        let epoch = {
            let _session = self.session_lock.lock();
            self.teardown_session();
            self.epoch.advance()
        };

        debug!(
            epoch,
            voice = %request.voice,
            language = %request.language,
            chars = text.len(),
            "Requesting speech synthesis"
        );

        let is_ssml = text.trim_start().starts_with("<speak");
        let result = self.synthesizer.synthesize(text, &request, is_ssml).await;

        let _session = self.session_lock.lock();

        if self.disposed.load(Ordering::Acquire) {
            debug!(epoch, "Discarding synthesis result after dispose");
            return Err(SynthesisError::Disposed);
        }
        if !self.epoch.is_current(epoch) {
            debug!(
                epoch,
                current_epoch = self.epoch.current(),
                "Discarding synthesis result from a superseded request"
            );
            return Err(SynthesisError::Superseded);
        }

        let output = match result {
            Ok(output) => output,
            Err(e) => {
                warn!(epoch, code = e.code(), "Speech synthesis failed: {}", e);
                return Err(e.into());
            }
        };

        if !output.audio.is_playable() {
            warn!(epoch, "Synthesizer returned no playable audio");
            return Err(SpeechError::SynthesisFailed(
                "synthesizer returned no audio".to_string(),
            )
            .into());
        }

        let info = SessionInfo {
            epoch,
            voice: request.voice,
            duration_ms: output.audio.duration_ms,
            viseme_count: output.visemes.len(),
        };

        self.scheduler.start(epoch, &output.audio, output.visemes);
        self.playback.play(output.audio);

        info!(
            epoch,
            voice = %info.voice,
            duration_ms = info.duration_ms,
            visemes = info.viseme_count,
            "Speech session started"
        );

        Ok(info)
    }

    /// Resolve voice and language against the configured defaults.
    fn build_request(&self, voice: Option<&str>, language: &str) -> SynthesisConfig {
        let language = match language.trim() {
            "" => self.config.default_language.clone(),
            other => other.to_string(),
        };

        let voice = match voice.map(str::trim).filter(|v| !v.is_empty()) {
            Some(voice) => voice.to_string(),
            None => match self.config.default_voice.as_deref() {
                Some(default) if language == self.config.default_language => default.to_string(),
                _ => voice_for_language(&language).to_string(),
            },
        };

        SynthesisConfig {
            voice,
            language,
            output_format: self.config.output_format,
            rate: self.config.speaking_rate,
            pitch: self.config.pitch,
        }
    }

    /// Stop playback, drop queued clips and close the viseme timeline.
    /// Callers must hold the session lock.
    pub(super) fn teardown_session(&self) {
        self.playback.stop();
        self.playback.clear_queue();
        self.scheduler.stop();
    }
}
