use std::fs;
use std::path::PathBuf;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::speech::SpeechParams;
use crate::vocab::FilterMode;

pub const SPEECH_LANGUAGES: [&str; 4] = ["en-US", "en-GB", "en-AU", "en-CA"];

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_theme")]
    pub theme: String,
    /// `bundled:<name>`, a file path or an http(s) URL. Unset means the
    /// bundled sample list.
    #[serde(default)]
    pub dataset: Option<String>,
    #[serde(default)]
    pub default_filter: FilterMode,
    #[serde(default = "default_speech_lang")]
    pub speech_lang: String,
    #[serde(default = "default_speech_voice")]
    pub speech_voice: String,
    #[serde(default = "default_speech_rate")]
    pub speech_rate: f32,
    #[serde(default = "default_speech_pitch")]
    pub speech_pitch: f32,
}

fn default_theme() -> String {
    "catppuccin-mocha".to_string()
}
fn default_speech_lang() -> String {
    "en-US".to_string()
}
fn default_speech_voice() -> String {
    "Samantha".to_string()
}
fn default_speech_rate() -> f32 {
    1.0
}
fn default_speech_pitch() -> f32 {
    1.0
}

impl Default for Config {
    fn default() -> Self {
        Self {
            theme: default_theme(),
            dataset: None,
            default_filter: FilterMode::All,
            speech_lang: default_speech_lang(),
            speech_voice: default_speech_voice(),
            speech_rate: default_speech_rate(),
            speech_pitch: default_speech_pitch(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let path = Self::config_path();
        if path.exists() {
            let content = fs::read_to_string(&path)?;
            let mut config: Config = toml::from_str(&content)?;
            config.validate();
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(&path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("vocabview")
            .join("config.toml")
    }

    /// Clamp speech settings into the range the backends accept.
    pub fn validate(&mut self) {
        self.speech_rate = clamp_or_default(self.speech_rate, 0.5, 2.0, default_speech_rate());
        self.speech_pitch = clamp_or_default(self.speech_pitch, 0.0, 2.0, default_speech_pitch());
        if self.speech_lang.trim().is_empty() {
            self.speech_lang = default_speech_lang();
        }
        if self.theme.trim().is_empty() {
            self.theme = default_theme();
        }
    }

    pub fn speech_params(&self) -> SpeechParams {
        let voice = self.speech_voice.trim();
        SpeechParams {
            lang: self.speech_lang.clone(),
            voice: (!voice.is_empty()).then(|| voice.to_string()),
            rate: self.speech_rate,
            pitch: self.speech_pitch,
        }
    }
}

fn clamp_or_default(value: f32, min: f32, max: f32, default: f32) -> f32 {
    if value.is_finite() {
        value.clamp(min, max)
    } else {
        default
    }
}
