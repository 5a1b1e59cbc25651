use std::cell::Cell;
use std::sync::mpsc;
use std::time::{Duration, Instant};

use crate::config::{Config, SPEECH_LANGUAGES};
use crate::dataset::{Dataset, DatasetError, DatasetSource};
use crate::event::{AppEvent, spawn_dataset_load};
use crate::speech::{SpeechError, SpeechService};
use crate::store::KeyValueStore;
use crate::ui::line_input::LineInput;
use crate::ui::theme::Theme;
use crate::vocab::{FilterMode, VocabRecord, VocabState};

const NOTICE_TTL: Duration = Duration::from_secs(4);
const RATE_STEP: f32 = 0.1;
const PITCH_STEP: f32 = 0.1;

pub const SETTINGS_FIELDS: usize = 5;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AppScreen {
    Browse,
    Settings,
}

/// What keystrokes on the browse screen are routed to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Search,
    OpenDataset,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Warning,
    Error,
}

#[derive(Clone, Debug)]
pub struct Notice {
    pub text: String,
    pub level: NoticeLevel,
    shown_at: Instant,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DatasetStatus {
    Loading(String),
    Ready(String),
    Failed(String),
}

impl DatasetStatus {
    pub fn label(&self) -> &str {
        match self {
            DatasetStatus::Loading(l) | DatasetStatus::Ready(l) | DatasetStatus::Failed(l) => l,
        }
    }
}

pub struct App {
    pub screen: AppScreen,
    pub input_mode: InputMode,
    pub vocab: VocabState,
    pub search: LineInput,
    pub path_input: LineInput,
    pub selected: usize,
    pub list_offset: Cell<usize>,
    pub theme: &'static Theme,
    pub config: Config,
    pub speech: Box<dyn SpeechService>,
    pub notice: Option<Notice>,
    pub dataset_status: DatasetStatus,
    pub settings_selected: usize,
    /// Write config.toml when leaving settings.
    pub persist_config: bool,
    pub should_quit: bool,
    pending: Option<DatasetSource>,
}

impl App {
    pub fn new(config: Config, store: Box<dyn KeyValueStore>, speech: Box<dyn SpeechService>) -> Self {
        let loaded_theme = Theme::load(&config.theme).unwrap_or_default();
        let theme: &'static Theme = Box::leak(Box::new(loaded_theme));

        let mut vocab = VocabState::new(store);
        vocab.restore_learned();
        vocab.set_filter_mode(config.default_filter);

        let mut app = Self {
            screen: AppScreen::Browse,
            input_mode: InputMode::Normal,
            vocab,
            search: LineInput::new(""),
            path_input: LineInput::new("").with_path_completion(),
            selected: 0,
            list_offset: Cell::new(0),
            theme,
            config,
            speech,
            notice: None,
            dataset_status: DatasetStatus::Ready(String::new()),
            settings_selected: 0,
            persist_config: true,
            should_quit: false,
            pending: None,
        };

        if !app.speech.is_available() {
            app.notify(
                NoticeLevel::Warning,
                "Speech is not supported on this system (install say or espeak-ng)",
            );
        }
        app
    }

    pub fn visible(&self) -> Vec<&VocabRecord> {
        self.vocab.visible_records()
    }

    pub fn selected_record(&self) -> Option<&VocabRecord> {
        self.vocab.visible_records().get(self.selected).copied()
    }

    pub fn notify(&mut self, level: NoticeLevel, text: impl Into<String>) {
        self.notice = Some(Notice {
            text: text.into(),
            level,
            shown_at: Instant::now(),
        });
    }

    pub fn tick(&mut self) {
        if self
            .notice
            .as_ref()
            .is_some_and(|n| n.shown_at.elapsed() >= NOTICE_TTL)
        {
            self.notice = None;
        }
    }

    pub fn is_loading(&self) -> bool {
        self.pending.is_some()
    }

    /// Start loading `source` in the background. Only the most recent
    /// request is applied when results arrive.
    pub fn begin_load(&mut self, source: DatasetSource, tx: mpsc::Sender<AppEvent>) {
        tracing::info!(%source, "loading dataset");
        self.dataset_status = DatasetStatus::Loading(source.label());
        self.pending = Some(source.clone());
        spawn_dataset_load(source, tx);
    }

    pub fn on_dataset_loaded(
        &mut self,
        source: DatasetSource,
        result: Result<Dataset, DatasetError>,
    ) {
        if self.pending.as_ref() != Some(&source) {
            tracing::debug!(%source, "ignoring superseded dataset load");
            return;
        }
        self.pending = None;

        match result {
            Ok(dataset) => {
                let label = dataset.label;
                self.vocab.load(dataset.records);
                self.selected = 0;
                self.list_offset.set(0);
                let count = self.vocab.records().len();
                tracing::info!(dataset = %label, words = count, "dataset loaded");
                self.notify(NoticeLevel::Info, format!("Loaded {count} words from {label}"));
                self.dataset_status = DatasetStatus::Ready(label);
            }
            Err(err) => {
                tracing::error!(%source, error = %err, "dataset load failed");
                self.notify(
                    NoticeLevel::Error,
                    format!("Could not load {}: {err}", source.label()),
                );
                self.dataset_status = DatasetStatus::Failed(source.label());
            }
        }
    }

    pub fn move_selection(&mut self, delta: isize) {
        let len = self.visible().len();
        if len == 0 {
            self.selected = 0;
            return;
        }
        let target = self.selected as isize + delta;
        self.selected = target.clamp(0, len as isize - 1) as usize;
    }

    pub fn select_first(&mut self) {
        self.selected = 0;
    }

    pub fn select_last(&mut self) {
        self.selected = self.visible().len().saturating_sub(1);
    }

    /// Keep the selection inside the visible list after it changed shape.
    fn clamp_selection(&mut self) {
        let len = self.visible().len();
        if self.selected >= len {
            self.selected = len.saturating_sub(1);
        }
    }

    pub fn toggle_selected(&mut self) {
        let Some(word) = self.selected_record().map(|r| r.word.clone()) else {
            return;
        };
        let learned = self.vocab.toggle_learned(&word);
        tracing::debug!(%word, learned, "toggled learned flag");
        self.clamp_selection();
    }

    pub fn speak_selected_sentence(&mut self) {
        let Some(record) = self.selected_record() else {
            return;
        };
        if record.example_sentence.trim().is_empty() {
            self.notify(NoticeLevel::Info, "This word has no example sentence");
            return;
        }
        let text = record.example_sentence.clone();
        self.speak(&text);
    }

    pub fn speak_selected_word(&mut self) {
        if let Some(word) = self.selected_record().map(|r| r.word.clone()) {
            self.speak(&word);
        }
    }

    fn speak(&mut self, text: &str) {
        match self.speech.speak(text) {
            Ok(()) => {}
            Err(SpeechError::Unsupported) => {
                self.notify(NoticeLevel::Warning, "Speech is not supported on this system");
            }
            Err(err) => tracing::warn!(error = %err, "speech request failed"),
        }
    }

    pub fn set_filter(&mut self, mode: FilterMode) {
        self.vocab.set_filter_mode(mode);
        self.clamp_selection();
    }

    pub fn cycle_filter(&mut self) {
        self.set_filter(self.vocab.filter_mode().next());
    }

    pub fn cycle_filter_back(&mut self) {
        self.set_filter(self.vocab.filter_mode().prev());
    }

    /// Push the search box contents into the filter.
    pub fn apply_query(&mut self) {
        let query = self.search.value().to_string();
        if query != self.vocab.query() {
            self.vocab.set_query(&query);
            self.selected = 0;
            self.list_offset.set(0);
        }
    }

    pub fn clear_query(&mut self) {
        self.search.set_value("");
        self.apply_query();
    }

    pub fn start_open_dataset(&mut self) {
        let current = match self.config.dataset.as_deref() {
            Some(spec) if !spec.starts_with("bundled:") => spec.to_string(),
            _ => String::new(),
        };
        self.path_input.set_value(&current);
        self.input_mode = InputMode::OpenDataset;
    }

    /// Load whatever was typed into the open-dataset prompt.
    pub fn submit_open_dataset(&mut self, tx: mpsc::Sender<AppEvent>) {
        self.input_mode = InputMode::Normal;
        let spec = self.path_input.value().trim().to_string();
        if spec.is_empty() {
            return;
        }
        self.begin_load(DatasetSource::parse(&spec), tx);
    }

    pub fn go_to_settings(&mut self) {
        self.settings_selected = 0;
        self.input_mode = InputMode::Normal;
        self.screen = AppScreen::Settings;
    }

    pub fn leave_settings(&mut self) {
        self.config.validate();
        if self.persist_config
            && let Err(err) = self.config.save()
        {
            tracing::warn!(error = %err, "could not save config");
            self.notify(NoticeLevel::Error, format!("Could not save settings: {err}"));
        }
        self.speech.set_params(self.config.speech_params());
        self.screen = AppScreen::Browse;
    }

    pub fn settings_select_next(&mut self) {
        self.settings_selected = (self.settings_selected + 1).min(SETTINGS_FIELDS - 1);
    }

    pub fn settings_select_prev(&mut self) {
        self.settings_selected = self.settings_selected.saturating_sub(1);
    }

    /// Label/value pairs shown on the settings screen, in selection order.
    pub fn settings_fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("Theme", self.config.theme.clone()),
            ("Speech Language", self.config.speech_lang.clone()),
            ("Speech Rate", format!("{:.1}x", self.config.speech_rate)),
            ("Speech Pitch", format!("{:.1}", self.config.speech_pitch)),
            ("Default Filter", self.config.default_filter.label().to_string()),
        ]
    }

    pub fn settings_cycle_forward(&mut self) {
        match self.settings_selected {
            0 => self.cycle_theme(true),
            1 => {
                self.config.speech_lang = cycle_str(&SPEECH_LANGUAGES, &self.config.speech_lang, true);
            }
            2 => self.config.speech_rate = step(self.config.speech_rate, RATE_STEP, 0.5, 2.0),
            3 => self.config.speech_pitch = step(self.config.speech_pitch, PITCH_STEP, 0.0, 2.0),
            4 => self.config.default_filter = self.config.default_filter.next(),
            _ => {}
        }
    }

    pub fn settings_cycle_backward(&mut self) {
        match self.settings_selected {
            0 => self.cycle_theme(false),
            1 => {
                self.config.speech_lang =
                    cycle_str(&SPEECH_LANGUAGES, &self.config.speech_lang, false);
            }
            2 => self.config.speech_rate = step(self.config.speech_rate, -RATE_STEP, 0.5, 2.0),
            3 => self.config.speech_pitch = step(self.config.speech_pitch, -PITCH_STEP, 0.0, 2.0),
            4 => self.config.default_filter = self.config.default_filter.prev(),
            _ => {}
        }
    }

    fn cycle_theme(&mut self, forward: bool) {
        let themes = Theme::available_themes();
        let names: Vec<&str> = themes.iter().map(String::as_str).collect();
        self.config.theme = cycle_str(&names, &self.config.theme, forward);
        if let Some(new_theme) = Theme::load(&self.config.theme) {
            let theme: &'static Theme = Box::leak(Box::new(new_theme));
            self.theme = theme;
        }
    }
}

fn cycle_str(options: &[&str], current: &str, forward: bool) -> String {
    if options.is_empty() {
        return current.to_string();
    }
    let next = match options.iter().position(|o| *o == current) {
        Some(idx) if forward => (idx + 1) % options.len(),
        Some(idx) => (idx + options.len() - 1) % options.len(),
        None => 0,
    };
    options[next].to_string()
}

/// Move by `delta`, rounded to one decimal so repeated steps stay exact.
fn step(value: f32, delta: f32, min: f32, max: f32) -> f32 {
    (((value + delta) * 10.0).round() / 10.0).clamp(min, max)
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::speech::{SpeechParams, Voice};
    use crate::store::MemoryStore;

    #[derive(Default)]
    struct SpeechLog {
        spoken: Vec<String>,
        params: Option<SpeechParams>,
    }

    struct FakeSpeech {
        available: bool,
        log: Rc<RefCell<SpeechLog>>,
    }

    impl SpeechService for FakeSpeech {
        fn is_available(&self) -> bool {
            self.available
        }

        fn voices(&self) -> Vec<Voice> {
            Vec::new()
        }

        fn speak(&mut self, text: &str) -> Result<(), SpeechError> {
            if !self.available {
                return Err(SpeechError::Unsupported);
            }
            self.log.borrow_mut().spoken.push(text.to_string());
            Ok(())
        }

        fn set_params(&mut self, params: SpeechParams) {
            self.log.borrow_mut().params = Some(params);
        }
    }

    fn make_app(available: bool) -> (App, Rc<RefCell<SpeechLog>>) {
        let log = Rc::new(RefCell::new(SpeechLog::default()));
        let speech = FakeSpeech {
            available,
            log: Rc::clone(&log),
        };
        let mut app = App::new(
            Config::default(),
            Box::new(MemoryStore::new()),
            Box::new(speech),
        );
        app.persist_config = false;
        (app, log)
    }

    fn sample() -> Dataset {
        Dataset {
            label: "sample".to_string(),
            records: vec![
                VocabRecord::new("abate", "減少する", "The storm abated."),
                VocabRecord::new("zeal", "熱意", ""),
                VocabRecord::new("quell", "鎮める", "Police quelled the riot."),
            ],
        }
    }

    fn loaded_app(available: bool) -> (App, Rc<RefCell<SpeechLog>>) {
        let (mut app, log) = make_app(available);
        let source = DatasetSource::File("sample.csv".into());
        app.pending = Some(source.clone());
        app.on_dataset_loaded(source, Ok(sample()));
        (app, log)
    }

    #[test]
    fn dataset_load_populates_state() {
        let (app, _) = loaded_app(true);
        assert_eq!(app.vocab.records().len(), 3);
        assert_eq!(app.dataset_status, DatasetStatus::Ready("sample".to_string()));
        assert!(!app.is_loading());
        assert_eq!(app.selected_record().map(|r| r.word.as_str()), Some("abate"));
    }

    #[test]
    fn failed_reload_keeps_previous_records() {
        let (mut app, _) = loaded_app(true);
        let source = DatasetSource::File("missing.csv".into());
        app.pending = Some(source.clone());
        app.on_dataset_loaded(source, Err(DatasetError::UnknownBundle("missing".into())));

        assert_eq!(app.vocab.records().len(), 3);
        assert!(matches!(app.dataset_status, DatasetStatus::Failed(_)));
        assert_eq!(app.notice.as_ref().map(|n| n.level), Some(NoticeLevel::Error));
    }

    #[test]
    fn superseded_load_is_ignored() {
        let (mut app, _) = make_app(true);
        let first = DatasetSource::File("first.csv".into());
        let second = DatasetSource::File("second.csv".into());
        app.pending = Some(second.clone());
        app.on_dataset_loaded(first, Ok(sample()));
        assert!(app.vocab.records().is_empty());
        assert!(app.is_loading());

        app.on_dataset_loaded(second, Ok(sample()));
        assert_eq!(app.vocab.records().len(), 3);
    }

    #[test]
    fn begin_load_delivers_bundled_dataset() {
        let (mut app, _) = make_app(true);
        let (tx, rx) = mpsc::channel();
        app.begin_load(DatasetSource::default(), tx);
        assert!(app.is_loading());

        match rx.recv_timeout(Duration::from_secs(5)) {
            Ok(AppEvent::DatasetLoaded { source, result }) => {
                app.on_dataset_loaded(source, result)
            }
            _ => panic!("expected a DatasetLoaded event"),
        }
        assert!(!app.vocab.records().is_empty());
        assert!(!app.is_loading());
    }

    #[test]
    fn selection_is_clamped() {
        let (mut app, _) = loaded_app(true);
        app.move_selection(10);
        assert_eq!(app.selected, 2);
        app.move_selection(-10);
        assert_eq!(app.selected, 0);
        app.select_last();
        assert_eq!(app.selected, 2);
        app.select_first();
        assert_eq!(app.selected, 0);
    }

    #[test]
    fn toggling_under_unlearned_filter_keeps_selection_valid() {
        let (mut app, _) = loaded_app(true);
        app.set_filter(FilterMode::Unlearned);
        app.select_last();
        app.toggle_selected();
        assert!(app.vocab.is_learned("quell"));
        assert_eq!(app.visible().len(), 2);
        assert_eq!(app.selected, 1);
    }

    #[test]
    fn query_resets_selection() {
        let (mut app, _) = loaded_app(true);
        app.select_last();
        app.search.set_value("ZE");
        app.apply_query();
        assert_eq!(app.selected, 0);
        let words: Vec<_> = app.visible().iter().map(|r| r.word.clone()).collect();
        assert_eq!(words, vec!["zeal"]);

        app.clear_query();
        assert_eq!(app.visible().len(), 3);
    }

    #[test]
    fn speaks_sentence_and_word() {
        let (mut app, log) = loaded_app(true);
        app.speak_selected_sentence();
        app.speak_selected_word();
        assert_eq!(log.borrow().spoken, vec!["The storm abated.", "abate"]);
    }

    #[test]
    fn missing_sentence_is_not_spoken() {
        let (mut app, log) = loaded_app(true);
        app.move_selection(1);
        app.speak_selected_sentence();
        assert!(log.borrow().spoken.is_empty());
        assert!(app.notice.is_some());
    }

    #[test]
    fn unsupported_speech_shows_notice() {
        let (mut app, _) = loaded_app(false);
        app.notice = None;
        app.speak_selected_word();
        let notice = app.notice.as_ref().map(|n| (n.level, n.text.clone()));
        assert_eq!(
            notice,
            Some((
                NoticeLevel::Warning,
                "Speech is not supported on this system".to_string()
            ))
        );
    }

    #[test]
    fn cycle_filter_wraps() {
        let (mut app, _) = loaded_app(true);
        app.cycle_filter();
        assert_eq!(app.vocab.filter_mode(), FilterMode::Learned);
        app.cycle_filter_back();
        app.cycle_filter_back();
        assert_eq!(app.vocab.filter_mode(), FilterMode::Unlearned);
    }

    #[test]
    fn default_filter_applied_on_start() {
        let mut config = Config::default();
        config.default_filter = FilterMode::Unlearned;
        let app = App::new(
            config,
            Box::new(MemoryStore::with_entry("learned", r#"{"zeal":true}"#)),
            Box::new(crate::speech::CommandSpeech::unavailable(SpeechParams::default())),
        );
        assert_eq!(app.vocab.filter_mode(), FilterMode::Unlearned);
        assert!(app.vocab.is_learned("zeal"));
    }

    #[test]
    fn settings_adjust_speech_and_apply_on_leave() {
        let (mut app, log) = make_app(true);
        app.go_to_settings();
        app.settings_select_next();
        app.settings_cycle_forward();
        assert_eq!(app.config.speech_lang, "en-GB");
        app.settings_cycle_backward();
        app.settings_cycle_backward();
        assert_eq!(app.config.speech_lang, "en-CA");

        app.settings_select_next();
        for _ in 0..20 {
            app.settings_cycle_forward();
        }
        assert_eq!(app.config.speech_rate, 2.0);

        app.settings_select_next();
        app.settings_cycle_backward();
        assert_eq!(app.config.speech_pitch, 0.9);

        app.leave_settings();
        assert_eq!(app.screen, AppScreen::Browse);
        let params = log.borrow().params.clone();
        assert_eq!(params.map(|p| (p.lang, p.rate)), Some(("en-CA".to_string(), 2.0)));
    }

    #[test]
    fn theme_cycles_through_bundled_themes() {
        let (mut app, _) = make_app(true);
        app.go_to_settings();
        let before = app.config.theme.clone();
        app.settings_cycle_forward();
        assert_ne!(app.config.theme, before);
        assert_eq!(app.theme.name, app.config.theme);
        app.settings_cycle_backward();
        assert_eq!(app.config.theme, before);
    }

    #[test]
    fn settings_selection_stays_in_range() {
        let (mut app, _) = make_app(true);
        for _ in 0..10 {
            app.settings_select_next();
        }
        assert_eq!(app.settings_selected, SETTINGS_FIELDS - 1);
        assert_eq!(app.settings_fields().len(), SETTINGS_FIELDS);
    }

    #[test]
    fn cycle_str_wraps_and_recovers_unknown_values() {
        let opts = ["a", "b", "c"];
        assert_eq!(cycle_str(&opts, "c", true), "a");
        assert_eq!(cycle_str(&opts, "a", false), "c");
        assert_eq!(cycle_str(&opts, "zz", true), "a");
    }
}
