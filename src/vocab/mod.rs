pub mod filter;
pub mod record;
pub mod state;

pub use filter::{FilterMode, QueryMatcher};
pub use record::VocabRecord;
pub use state::{LearnedSet, Progress, VocabState};
