use serde::{Deserialize, Serialize};

use crate::vocab::record::VocabRecord;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum FilterMode {
    #[default]
    All,
    Learned,
    Unlearned,
}

impl FilterMode {
    pub const ALL_MODES: [FilterMode; 3] =
        [FilterMode::All, FilterMode::Learned, FilterMode::Unlearned];

    pub fn admits(self, learned: bool) -> bool {
        match self {
            FilterMode::All => true,
            FilterMode::Learned => learned,
            FilterMode::Unlearned => !learned,
        }
    }

    pub fn next(self) -> Self {
        match self {
            FilterMode::All => FilterMode::Learned,
            FilterMode::Learned => FilterMode::Unlearned,
            FilterMode::Unlearned => FilterMode::All,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            FilterMode::All => FilterMode::Unlearned,
            FilterMode::Learned => FilterMode::All,
            FilterMode::Unlearned => FilterMode::Learned,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            FilterMode::All => "All",
            FilterMode::Learned => "Learned",
            FilterMode::Unlearned => "Unlearned",
        }
    }
}

/// Free-text query against a record.
///
/// The word is compared case-insensitively; the Japanese meaning is a plain
/// case-sensitive substring match.
pub struct QueryMatcher<'q> {
    raw: &'q str,
    lowered: String,
}

impl<'q> QueryMatcher<'q> {
    pub fn new(query: &'q str) -> Self {
        Self {
            raw: query,
            lowered: query.to_lowercase(),
        }
    }

    pub fn matches(&self, record: &VocabRecord) -> bool {
        record.word.to_lowercase().contains(&self.lowered)
            || record.japanese_meaning.contains(self.raw)
    }
}
