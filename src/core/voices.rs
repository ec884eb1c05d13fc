//! Language to neural voice lookup.

use std::collections::HashMap;

use once_cell::sync::Lazy;

/// Voice used when a language has no mapping.
pub const DEFAULT_VOICE: &str = "en-US-JennyNeural";

static VOICES: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("en", "en-US-JennyNeural"),
        ("en-us", "en-US-JennyNeural"),
        ("en-gb", "en-GB-SoniaNeural"),
        ("en-au", "en-AU-NatashaNeural"),
        ("en-ca", "en-CA-ClaraNeural"),
        ("en-in", "en-IN-NeerjaNeural"),
        ("de", "de-DE-KatjaNeural"),
        ("de-de", "de-DE-KatjaNeural"),
        ("de-at", "de-AT-IngridNeural"),
        ("de-ch", "de-CH-LeniNeural"),
        ("fr", "fr-FR-DeniseNeural"),
        ("fr-fr", "fr-FR-DeniseNeural"),
        ("fr-ca", "fr-CA-SylvieNeural"),
        ("es", "es-ES-ElviraNeural"),
        ("es-es", "es-ES-ElviraNeural"),
        ("es-mx", "es-MX-DaliaNeural"),
        ("it", "it-IT-ElsaNeural"),
        ("it-it", "it-IT-ElsaNeural"),
        ("pt", "pt-BR-FranciscaNeural"),
        ("pt-br", "pt-BR-FranciscaNeural"),
        ("pt-pt", "pt-PT-RaquelNeural"),
        ("nl", "nl-NL-ColetteNeural"),
        ("nl-nl", "nl-NL-ColetteNeural"),
        ("pl", "pl-PL-ZofiaNeural"),
        ("pl-pl", "pl-PL-ZofiaNeural"),
        ("sv", "sv-SE-SofieNeural"),
        ("sv-se", "sv-SE-SofieNeural"),
        ("ru", "ru-RU-SvetlanaNeural"),
        ("ru-ru", "ru-RU-SvetlanaNeural"),
        ("tr", "tr-TR-EmelNeural"),
        ("tr-tr", "tr-TR-EmelNeural"),
        ("ja", "ja-JP-NanamiNeural"),
        ("ja-jp", "ja-JP-NanamiNeural"),
        ("ko", "ko-KR-SunHiNeural"),
        ("ko-kr", "ko-KR-SunHiNeural"),
        ("zh", "zh-CN-XiaoxiaoNeural"),
        ("zh-cn", "zh-CN-XiaoxiaoNeural"),
        ("zh-tw", "zh-TW-HsiaoChenNeural"),
        ("ar", "ar-SA-ZariyahNeural"),
        ("ar-sa", "ar-SA-ZariyahNeural"),
        ("hi", "hi-IN-SwaraNeural"),
        ("hi-in", "hi-IN-SwaraNeural"),
    ])
});

fn normalize(language: &str) -> String {
    language.trim().replace('_', "-").to_lowercase()
}

/// Voice for a BCP-47 language code.
///
/// Matching ignores case and accepts `_` as a separator. An unknown region
/// falls back to the primary language (`fr-BE` → `fr`), and an unknown
/// language falls back to [`DEFAULT_VOICE`].
///
/// ```rust
/// use lipsync::core::voices::voice_for_language;
///
/// assert_eq!(voice_for_language("de-DE"), "de-DE-KatjaNeural");
/// assert_eq!(voice_for_language("fr_BE"), "fr-FR-DeniseNeural");
/// assert_eq!(voice_for_language("xx"), "en-US-JennyNeural");
/// ```
pub fn voice_for_language(language: &str) -> &'static str {
    let tag = normalize(language);
    if let Some(voice) = VOICES.get(tag.as_str()) {
        return voice;
    }

    tag.split('-')
        .next()
        .and_then(|primary| VOICES.get(primary))
        .copied()
        .unwrap_or(DEFAULT_VOICE)
}

/// Language codes with a dedicated voice, sorted.
pub fn supported_languages() -> Vec<&'static str> {
    let mut languages: Vec<&'static str> = VOICES.keys().copied().collect();
    languages.sort_unstable();
    languages
}
