pub mod command;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use command::CommandSpeech;

#[derive(Debug, Error)]
pub enum SpeechError {
    #[error("speech synthesis is not supported on this system")]
    Unsupported,
    #[error("failed to start {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
}

/// Fixed parameters applied to every utterance.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpeechParams {
    pub lang: String,
    pub voice: Option<String>,
    /// 1.0 is the platform's normal speed.
    pub rate: f32,
    /// 1.0 is the voice's normal pitch.
    pub pitch: f32,
}

impl Default for SpeechParams {
    fn default() -> Self {
        Self {
            lang: "en-US".to_string(),
            voice: Some("Samantha".to_string()),
            rate: 1.0,
            pitch: 1.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Voice {
    /// Identifier passed back to the backend.
    pub id: String,
    pub name: String,
    pub lang: String,
}

/// Something that can read text aloud.
pub trait SpeechService {
    fn is_available(&self) -> bool;

    fn voices(&self) -> Vec<Voice>;

    /// Start speaking `text` and return without waiting for it to finish.
    /// Anything still playing from a previous call is cut off.
    fn speak(&mut self, text: &str) -> Result<(), SpeechError>;

    fn set_params(&mut self, params: SpeechParams);
}

/// Pick a voice: language and name both match, then language alone, then
/// whatever comes first.
pub fn select_voice<'a>(voices: &'a [Voice], lang: &str, name: Option<&str>) -> Option<&'a Voice> {
    let wanted = normalize_lang(lang);
    let lang_matches = |v: &&Voice| normalize_lang(&v.lang) == wanted;

    if let Some(name) = name {
        let by_name = voices
            .iter()
            .filter(lang_matches)
            .find(|v| v.name.eq_ignore_ascii_case(name) || v.id.eq_ignore_ascii_case(name));
        if by_name.is_some() {
            return by_name;
        }
    }
    voices.iter().find(lang_matches).or_else(|| voices.first())
}

fn normalize_lang(tag: &str) -> String {
    tag.trim().replace('_', "-").to_ascii_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn voice(id: &str, name: &str, lang: &str) -> Voice {
        Voice {
            id: id.to_string(),
            name: name.to_string(),
            lang: lang.to_string(),
        }
    }

    fn sample_voices() -> Vec<Voice> {
        vec![
            voice("Thomas", "Thomas", "fr_FR"),
            voice("Daniel", "Daniel", "en_GB"),
            voice("Alex", "Alex", "en_US"),
            voice("Samantha", "Samantha", "en_US"),
        ]
    }

    #[test]
    fn prefers_language_and_name() {
        let voices = sample_voices();
        let chosen = select_voice(&voices, "en-US", Some("Samantha")).unwrap();
        assert_eq!(chosen.name, "Samantha");
    }

    #[test]
    fn name_in_wrong_language_falls_back_to_language() {
        let voices = sample_voices();
        let chosen = select_voice(&voices, "en-US", Some("Daniel")).unwrap();
        assert_eq!(chosen.name, "Alex");
    }

    #[test]
    fn unknown_name_falls_back_to_first_language_match() {
        let voices = sample_voices();
        let chosen = select_voice(&voices, "en-GB", Some("Nobody")).unwrap();
        assert_eq!(chosen.name, "Daniel");
    }

    #[test]
    fn no_language_match_takes_first_voice() {
        let voices = sample_voices();
        let chosen = select_voice(&voices, "ja-JP", None).unwrap();
        assert_eq!(chosen.name, "Thomas");
    }

    #[test]
    fn empty_voice_list_selects_nothing() {
        assert!(select_voice(&[], "en-US", Some("Samantha")).is_none());
    }

    #[test]
    fn language_tags_compare_loosely() {
        let voices = vec![voice("en-us", "English_(America)", "en-us")];
        assert!(select_voice(&voices, "EN_US", None).is_some());
        assert_eq!(normalize_lang(" en_US "), "en-us");
    }
}
