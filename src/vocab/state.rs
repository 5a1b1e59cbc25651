use crate::store::KeyValueStore;
use crate::store::schema::{self, LearnedData};
use crate::vocab::filter::{FilterMode, QueryMatcher};
use crate::vocab::record::VocabRecord;

/// Word -> learned flag. A missing word counts as not learned.
pub type LearnedSet = LearnedData;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Progress {
    pub learned: usize,
    pub total: usize,
    pub percent: f64,
}

impl Progress {
    pub fn ratio(&self) -> f64 {
        self.percent / 100.0
    }
}

/// Records, query, filter mode and learned flags for one session.
///
/// The learned flags are written through to the store on every toggle.
pub struct VocabState {
    records: Vec<VocabRecord>,
    query: String,
    filter_mode: FilterMode,
    learned: LearnedSet,
    store: Box<dyn KeyValueStore>,
}

impl VocabState {
    pub fn new(store: Box<dyn KeyValueStore>) -> Self {
        Self {
            records: Vec::new(),
            query: String::new(),
            filter_mode: FilterMode::All,
            learned: LearnedSet::new(),
            store,
        }
    }

    /// Replace the record set. Entries without a word are dropped.
    pub fn load(&mut self, records: Vec<VocabRecord>) {
        let before = records.len();
        self.records = records.into_iter().filter(|r| !r.word.is_empty()).collect();
        let dropped = before - self.records.len();
        if dropped > 0 {
            tracing::debug!(dropped, "skipped records without a word");
        }
    }

    pub fn load_learned(&mut self, initial: LearnedSet) {
        self.learned = initial;
    }

    /// Replace the learned flags with whatever the store holds.
    pub fn restore_learned(&mut self) {
        let learned = schema::read_learned(self.store.as_ref());
        tracing::debug!(entries = learned.len(), "restored learned flags");
        self.learned = learned;
    }

    pub fn set_query(&mut self, query: &str) {
        self.query = query.to_string();
    }

    pub fn set_filter_mode(&mut self, mode: FilterMode) {
        self.filter_mode = mode;
    }

    /// Flip the flag for `word` and persist the whole set.
    ///
    /// Returns the new value. A failed write is logged and otherwise ignored.
    pub fn toggle_learned(&mut self, word: &str) -> bool {
        let flag = self.learned.entry(word.to_string()).or_insert(false);
        *flag = !*flag;
        let now = *flag;

        if let Err(err) = schema::write_learned(self.store.as_ref(), &self.learned) {
            tracing::warn!(error = %err, word, "failed to persist learned flags");
        }
        now
    }

    pub fn is_learned(&self, word: &str) -> bool {
        self.learned.get(word).copied().unwrap_or(false)
    }

    pub fn visible_records(&self) -> Vec<&VocabRecord> {
        self.matching(self.filter_mode).collect()
    }

    /// Number of records matching the current query under `mode`.
    pub fn mode_count(&self, mode: FilterMode) -> usize {
        self.matching(mode).count()
    }

    fn matching(&self, mode: FilterMode) -> impl Iterator<Item = &VocabRecord> {
        let matcher = QueryMatcher::new(&self.query);
        self.records
            .iter()
            .filter(move |r| matcher.matches(r) && mode.admits(self.is_learned(&r.word)))
    }

    pub fn progress(&self) -> Progress {
        let total = self.records.len();
        let learned = self
            .records
            .iter()
            .filter(|r| self.is_learned(&r.word))
            .count();
        let percent = if total == 0 {
            0.0
        } else {
            100.0 * learned as f64 / total as f64
        };
        Progress {
            learned,
            total,
            percent,
        }
    }

    pub fn records(&self) -> &[VocabRecord] {
        &self.records
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn filter_mode(&self) -> FilterMode {
        self.filter_mode
    }

    pub fn learned(&self) -> &LearnedSet {
        &self.learned
    }
}
