//! Network-free synthesizer.
//!
//! Produces silent 16-bit PCM together with a viseme timeline estimated from
//! the spelling of the input. Good enough to drive an avatar in demos and
//! tests without a speech service.

use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use super::base::{SpeechError, SpeechResult, SpeechSynthesizer, SynthesisOutput};
use super::config::{SynthesisConfig, build_ssml};
use crate::core::playback::AudioClip;
use crate::core::viseme::{NEUTRAL_VISEME, VisemeEvent};

/// Base duration of one letter at rate 1.0.
pub const BASE_LETTER_MS: f64 = 80.0;

/// Gap left for a space between words.
const WORD_GAP_MS: f64 = 60.0;

/// Gap left for sentence punctuation.
const PUNCTUATION_GAP_MS: f64 = 200.0;

/// Silence appended after the last viseme.
const TRAILING_SILENCE_MS: f64 = 100.0;

fn is_vowel_viseme(viseme_id: u8) -> bool {
    (10..=14).contains(&viseme_id)
}

/// Viseme for a letter, looking one character ahead for digraphs.
/// Returns the id and how many characters were consumed.
fn letter_viseme(current: char, next: Option<char>) -> Option<(u8, usize)> {
    let digraph = match (current, next) {
        ('t', Some('h')) => Some(3),
        ('c' | 's', Some('h')) => Some(6),
        ('n', Some('g')) => Some(5),
        _ => None,
    };
    if let Some(id) = digraph {
        return Some((id, 2));
    }

    let id = match current {
        'p' | 'b' | 'm' => 1,
        'f' | 'v' => 2,
        't' | 'd' | 'l' => 4,
        'k' | 'g' | 'c' | 'q' | 'x' => 5,
        'j' => 6,
        's' | 'z' => 7,
        'n' => 8,
        'r' => 9,
        'a' | 'h' => 10,
        'e' => 11,
        'i' | 'y' => 12,
        'o' => 13,
        'u' | 'w' => 14,
        _ => return None,
    };
    Some((id, 1))
}

/// Drop markup from an SSML document, keeping the spoken text with
/// whitespace runs collapsed to single spaces.
fn strip_markup(ssml: &str) -> String {
    let mut text = String::with_capacity(ssml.len());
    let mut in_tag = false;
    for c in ssml.chars() {
        match c {
            '<' => in_tag = true,
            '>' => {
                in_tag = false;
                text.push(' ');
            }
            _ if !in_tag => text.push(c),
            _ => {}
        }
    }
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}

/// Estimate a viseme timeline from spelling.
///
/// Vowels last 1.5x the letter duration and consonants 0.8x; the letter
/// duration is [`BASE_LETTER_MS`] divided by `rate`. Consecutive letters
/// mapping to the same viseme are merged into one event.
pub fn text_to_visemes(text: &str, rate: f32) -> Vec<VisemeEvent> {
    let rate = if rate.is_finite() && rate > 0.0 {
        f64::from(rate.clamp(0.5, 2.0))
    } else {
        1.0
    };
    let letter_ms = BASE_LETTER_MS / rate;

    let chars: Vec<char> = text.to_lowercase().chars().collect();
    let mut events: Vec<VisemeEvent> = Vec::new();
    let mut cursor_ms = 0.0;
    let mut index = 0;

    while index < chars.len() {
        let current = chars[index];

        if current.is_whitespace() {
            cursor_ms += WORD_GAP_MS / rate;
            index += 1;
            continue;
        }
        if matches!(current, '.' | ',' | '!' | '?' | ';' | ':') {
            cursor_ms += PUNCTUATION_GAP_MS / rate;
            index += 1;
            continue;
        }

        let Some((viseme_id, consumed)) = letter_viseme(current, chars.get(index + 1).copied())
        else {
            index += 1;
            continue;
        };
        index += consumed;

        let duration_ms = if is_vowel_viseme(viseme_id) {
            letter_ms * 1.5
        } else {
            letter_ms * 0.8
        };

        if let Some(last) = events.last_mut()
            && last.viseme_id == viseme_id
            && (last.end_ms() - cursor_ms).abs() < f64::EPSILON
        {
            last.duration_ms += duration_ms;
        } else {
            events.push(VisemeEvent::new(viseme_id, cursor_ms, duration_ms));
        }
        cursor_ms += duration_ms;
    }

    events
}

/// Synthesizer that needs no network and no credentials.
#[derive(Debug, Clone, Default)]
pub struct OfflineSynthesizer {
    latency: Option<Duration>,
}

impl OfflineSynthesizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulate a service round trip of `latency` before answering.
    pub fn with_latency(latency: Duration) -> Self {
        Self {
            latency: Some(latency),
        }
    }
}

#[async_trait]
impl SpeechSynthesizer for OfflineSynthesizer {
    async fn synthesize(
        &self,
        text: &str,
        config: &SynthesisConfig,
        is_ssml: bool,
    ) -> SpeechResult<SynthesisOutput> {
        if config.voice.trim().is_empty() {
            return Err(SpeechError::InvalidVoice("voice name is empty".to_string()));
        }

        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }

        // Plain text is wrapped in the SSML a service request would carry.
        let ssml = if is_ssml {
            text.to_string()
        } else {
            build_ssml(text, config)
        };
        let spoken = strip_markup(&ssml);

        let visemes = text_to_visemes(&spoken, config.rate);
        let Some(last) = visemes.last() else {
            return Err(SpeechError::SynthesisFailed(
                "input contains no speakable text".to_string(),
            ));
        };

        let duration_ms = last.end_ms() + TRAILING_SILENCE_MS;
        let sample_rate = config.output_format.sample_rate();
        let samples = (duration_ms * f64::from(sample_rate) / 1000.0).ceil() as usize;
        let audio = AudioClip::from_pcm16(vec![0u8; samples * 2], sample_rate);

        debug!(
            voice = %config.voice,
            visemes = visemes.len(),
            duration_ms = audio.duration_ms,
            "Offline synthesis complete"
        );

        Ok(SynthesisOutput { audio, visemes })
    }

    fn provider_info(&self) -> serde_json::Value {
        serde_json::json!({
            "provider": "offline",
            "version": "1.0.0",
            "audio": "silent pcm16",
            "viseme_source": "spelling",
            "neutral_viseme": NEUTRAL_VISEME,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_to_visemes_basic() {
        let events = text_to_visemes("mama", 1.0);
        let ids: Vec<u8> = events.iter().map(|e| e.viseme_id).collect();
        assert_eq!(ids, vec![1, 10, 1, 10]);

        assert_eq!(events[0].audio_offset_ms, 0.0);
        assert!((events[0].duration_ms - 64.0).abs() < 1e-9);
        assert!((events[1].audio_offset_ms - 64.0).abs() < 1e-9);
        assert!((events[1].duration_ms - 120.0).abs() < 1e-9);
    }

    #[test]
    fn test_digraphs_and_merging() {
        let ids: Vec<u8> = text_to_visemes("the", 1.0)
            .iter()
            .map(|e| e.viseme_id)
            .collect();
        assert_eq!(ids, vec![3, 11]);

        // "ll" collapses into a single event
        let events = text_to_visemes("ll", 1.0);
        assert_eq!(events.len(), 1);
        assert!((events[0].duration_ms - 128.0).abs() < 1e-9);
    }

    #[test]
    fn test_word_gap_is_silent() {
        let events = text_to_visemes("a a", 1.0);
        assert_eq!(events.len(), 2);
        assert!(events[1].audio_offset_ms > events[0].end_ms());
    }

    #[test]
    fn test_rate_shortens_timeline() {
        let normal = text_to_visemes("hello there", 1.0);
        let fast = text_to_visemes("hello there", 2.0);
        let normal_end = normal.last().unwrap().end_ms();
        let fast_end = fast.last().unwrap().end_ms();
        assert!((normal_end / fast_end - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_events_are_valid_and_ordered() {
        let events = text_to_visemes("Quick brown fox, jumps! Over 12 lazy dogs.", 1.3);
        assert!(!events.is_empty());
        assert!(events.iter().all(VisemeEvent::is_valid));
        assert!(
            events
                .windows(2)
                .all(|w| w[0].audio_offset_ms <= w[1].audio_offset_ms)
        );
    }

    #[test]
    fn test_strip_markup() {
        let config = SynthesisConfig {
            rate: 1.5,
            ..Default::default()
        };
        let ssml = build_ssml("Fish & chips", &config);
        assert_eq!(strip_markup(&ssml), "Fish & chips");
    }

    #[test]
    fn test_plain_text_and_ssml_give_same_timeline() {
        let synth = OfflineSynthesizer::new();
        let config = SynthesisConfig::default();
        let plain = tokio_test::block_on(synth.synthesize("Tom & Jerry", &config, false)).unwrap();
        let ssml = build_ssml("Tom & Jerry", &config);
        let marked = tokio_test::block_on(synth.synthesize(&ssml, &config, true)).unwrap();

        assert_eq!(plain.visemes, marked.visemes);
        // No leading silence from the surrounding markup
        assert_eq!(plain.visemes[0].audio_offset_ms, 0.0);
    }

    #[test]
    fn test_synthesize_produces_covering_clip() {
        let synth = OfflineSynthesizer::new();
        let config = SynthesisConfig::default();
        let output =
            tokio_test::block_on(synth.synthesize("Hello world", &config, false)).unwrap();

        assert!(output.audio.is_playable());
        assert_eq!(output.audio.sample_rate, 24000);
        let last = output.visemes.last().unwrap();
        assert!(output.audio.duration_ms >= last.end_ms());
    }

    #[test]
    fn test_synthesize_rejects_unspeakable_text() {
        let synth = OfflineSynthesizer::new();
        let result = tokio_test::block_on(synth.synthesize(" ... ", &SynthesisConfig::default(), false));
        assert!(matches!(result, Err(SpeechError::SynthesisFailed(_))));
    }

    #[test]
    fn test_synthesize_rejects_empty_voice() {
        let synth = OfflineSynthesizer::new();
        let config = SynthesisConfig::for_voice("", "en-US");
        let result = tokio_test::block_on(synth.synthesize("hi", &config, false));
        assert!(matches!(result, Err(SpeechError::InvalidVoice(_))));
    }

    #[tokio::test(start_paused = true)]
    async fn test_latency_is_simulated() {
        let synth = OfflineSynthesizer::with_latency(Duration::from_millis(250));
        let started = tokio::time::Instant::now();
        synth
            .synthesize("ok", &SynthesisConfig::default(), false)
            .await
            .unwrap();
        assert!(started.elapsed() >= Duration::from_millis(250));
        assert_eq!(synth.provider_info()["provider"], "offline");
    }
}
