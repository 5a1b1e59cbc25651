use criterion::{Criterion, black_box, criterion_group, criterion_main};

use vocabview::store::MemoryStore;
use vocabview::vocab::{FilterMode, VocabRecord, VocabState};

const WORD_COUNT: usize = 1240;

fn make_state() -> VocabState {
    let stems = ["abate", "zeal", "quell", "ardent", "lucid", "tenacious", "wane", "vex"];
    let meanings = ["減少する", "熱意", "鎮める", "熱烈な", "明快な", "粘り強い", "衰える", "悩ませる"];
    let records = (0..WORD_COUNT)
        .map(|i| {
            let k = i % stems.len();
            VocabRecord::new(
                &format!("{}{i}", stems[k]),
                meanings[k],
                "An example sentence long enough to look like real data.",
            )
        })
        .collect();

    let mut state = VocabState::new(Box::new(MemoryStore::new()));
    state.load(records);
    // Every third word learned.
    for i in (0..WORD_COUNT).step_by(3) {
        let word = state.records()[i].word.clone();
        state.toggle_learned(&word);
    }
    state
}

fn bench_visible_records(c: &mut Criterion) {
    let mut state = make_state();

    c.bench_function("visible_records all, empty query (1240 words)", |b| {
        b.iter(|| black_box(state.visible_records().len()))
    });

    state.set_query("ZEAL");
    c.bench_function("visible_records all, word query (1240 words)", |b| {
        b.iter(|| black_box(state.visible_records().len()))
    });

    state.set_query("熱");
    state.set_filter_mode(FilterMode::Unlearned);
    c.bench_function("visible_records unlearned, meaning query (1240 words)", |b| {
        b.iter(|| black_box(state.visible_records().len()))
    });
}

fn bench_progress(c: &mut Criterion) {
    let state = make_state();

    c.bench_function("progress (1240 words)", |b| {
        b.iter(|| black_box(state.progress()))
    });
}

fn bench_mode_counts(c: &mut Criterion) {
    let mut state = make_state();
    state.set_query("a");

    c.bench_function("filter tab counts (1240 words)", |b| {
        b.iter(|| {
            FilterMode::ALL_MODES
                .iter()
                .map(|m| state.mode_count(black_box(*m)))
                .sum::<usize>()
        })
    });
}

criterion_group!(benches, bench_visible_records, bench_progress, bench_mode_counts);
criterion_main!(benches);
