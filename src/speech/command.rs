use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};

use crate::speech::{SpeechError, SpeechParams, SpeechService, Voice, select_voice};

const BASE_WPM: f32 = 175.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Backend {
    /// macOS `say`.
    Say,
    /// `espeak-ng` or classic `espeak`; same flags.
    Espeak,
}

impl Backend {
    const CANDIDATES: [(&'static str, Backend); 3] = [
        ("say", Backend::Say),
        ("espeak-ng", Backend::Espeak),
        ("espeak", Backend::Espeak),
    ];
}

/// Speaks by launching a platform speech program per utterance.
pub struct CommandSpeech {
    backend: Option<(Backend, PathBuf)>,
    params: SpeechParams,
    voices: Vec<Voice>,
    voice: Option<Voice>,
    current: Option<Child>,
}

impl CommandSpeech {
    /// Look for a speech program on PATH and query its voices.
    pub fn detect(params: SpeechParams) -> Self {
        let found = Backend::CANDIDATES
            .iter()
            .find_map(|(program, backend)| which::which(program).ok().map(|p| (*backend, p)));

        match found {
            Some((backend, path)) => {
                let voices = list_voices(backend, &path);
                tracing::info!(
                    program = %path.display(),
                    voices = voices.len(),
                    "speech backend detected"
                );
                Self::with_backend(backend, path, voices, params)
            }
            None => {
                tracing::info!("no speech program found; speech disabled");
                Self::unavailable(params)
            }
        }
    }

    pub fn unavailable(params: SpeechParams) -> Self {
        Self {
            backend: None,
            params,
            voices: Vec::new(),
            voice: None,
            current: None,
        }
    }

    pub fn with_backend(
        backend: Backend,
        program: PathBuf,
        voices: Vec<Voice>,
        params: SpeechParams,
    ) -> Self {
        let mut speech = Self {
            backend: Some((backend, program)),
            params,
            voices,
            voice: None,
            current: None,
        };
        speech.choose_voice();
        speech
    }

    pub fn selected_voice(&self) -> Option<&Voice> {
        self.voice.as_ref()
    }

    fn choose_voice(&mut self) {
        self.voice = select_voice(&self.voices, &self.params.lang, self.params.voice.as_deref())
            .cloned();
        if let Some(ref voice) = self.voice {
            tracing::debug!(voice = %voice.name, lang = %voice.lang, "selected voice");
        }
    }

    /// Build the command line for one utterance.
    pub fn command_for(&self, text: &str) -> Option<Command> {
        let (backend, program) = self.backend.as_ref()?;
        let mut cmd = Command::new(program);
        if let Some(ref voice) = self.voice {
            cmd.arg("-v").arg(&voice.id);
        }
        match backend {
            Backend::Say => {
                cmd.arg("-r").arg(words_per_minute(self.params.rate).to_string());
            }
            Backend::Espeak => {
                cmd.arg("-s").arg(words_per_minute(self.params.rate).to_string());
                cmd.arg("-p").arg(espeak_pitch(self.params.pitch).to_string());
            }
        }
        // Text starting with '-' must not be read as an option.
        cmd.arg("--").arg(text);
        Some(cmd)
    }

    fn cancel_current(&mut self) {
        if let Some(mut child) = self.current.take() {
            if let Ok(None) = child.try_wait() {
                let _ = child.kill();
            }
            let _ = child.wait();
        }
    }
}

impl SpeechService for CommandSpeech {
    fn is_available(&self) -> bool {
        self.backend.is_some()
    }

    fn voices(&self) -> Vec<Voice> {
        self.voices.clone()
    }

    fn speak(&mut self, text: &str) -> Result<(), SpeechError> {
        let mut cmd = self.command_for(text).ok_or(SpeechError::Unsupported)?;
        let program = cmd.get_program().to_string_lossy().to_string();
        self.cancel_current();

        let child = cmd
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|source| SpeechError::Spawn { program, source })?;
        self.current = Some(child);
        Ok(())
    }

    fn set_params(&mut self, params: SpeechParams) {
        self.params = params;
        self.choose_voice();
    }
}

impl Drop for CommandSpeech {
    fn drop(&mut self) {
        self.cancel_current();
    }
}

fn list_voices(backend: Backend, program: &Path) -> Vec<Voice> {
    let args: &[&str] = match backend {
        Backend::Say => &["-v", "?"],
        Backend::Espeak => &["--voices"],
    };
    let output = match Command::new(program).args(args).stderr(Stdio::null()).output() {
        Ok(output) if output.status.success() => output,
        Ok(output) => {
            tracing::warn!(status = %output.status, "voice listing failed");
            return Vec::new();
        }
        Err(err) => {
            tracing::warn!(%err, "could not list voices");
            return Vec::new();
        }
    };
    let text = String::from_utf8_lossy(&output.stdout);
    match backend {
        Backend::Say => parse_say_voices(&text),
        Backend::Espeak => parse_espeak_voices(&text),
    }
}

/// Lines look like `Bad News            en_US    # The light you see...`.
pub fn parse_say_voices(output: &str) -> Vec<Voice> {
    output
        .lines()
        .filter_map(|line| {
            let spec = line.split('#').next()?.trim_end();
            let (name, lang) = spec.rsplit_once(char::is_whitespace)?;
            let name = name.trim();
            if name.is_empty() || lang.is_empty() {
                return None;
            }
            Some(Voice {
                id: name.to_string(),
                name: name.to_string(),
                lang: lang.to_string(),
            })
        })
        .collect()
}

/// Table with a header row:
/// `Pty Language Age/Gender VoiceName File Other Languages`.
pub fn parse_espeak_voices(output: &str) -> Vec<Voice> {
    output
        .lines()
        .skip(1)
        .filter_map(|line| {
            let cols: Vec<&str> = line.split_whitespace().collect();
            if cols.len() < 5 {
                return None;
            }
            Some(Voice {
                id: cols[1].to_string(),
                name: cols[3].to_string(),
                lang: cols[1].to_string(),
            })
        })
        .collect()
}

fn words_per_minute(rate: f32) -> u32 {
    (BASE_WPM * rate).round().clamp(80.0, 450.0) as u32
}

/// espeak pitch runs 0-99 with 50 as normal.
fn espeak_pitch(pitch: f32) -> u32 {
    (pitch * 50.0).round().clamp(0.0, 99.0) as u32
}
