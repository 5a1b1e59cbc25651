use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use rust_embed::Embed;

use crate::dataset::{DEFAULT_BUNDLE, DatasetError};
use crate::vocab::VocabRecord;

#[derive(Embed)]
#[folder = "assets/datasets/"]
struct DatasetAssets;

/// Where a word list comes from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DatasetSource {
    Bundled(String),
    File(PathBuf),
    Url(String),
}

impl DatasetSource {
    /// `bundled:<name>`, an http(s) URL, or anything else as a file path.
    pub fn parse(spec: &str) -> Self {
        let spec = spec.trim();
        if let Some(name) = spec.strip_prefix("bundled:") {
            DatasetSource::Bundled(name.to_string())
        } else if spec.starts_with("http://") || spec.starts_with("https://") {
            DatasetSource::Url(spec.to_string())
        } else {
            DatasetSource::File(expand_home(spec))
        }
    }

    pub fn label(&self) -> String {
        match self {
            DatasetSource::Bundled(name) => name.clone(),
            DatasetSource::File(path) => path
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_else(|| path.display().to_string()),
            DatasetSource::Url(url) => url.rsplit('/').next().unwrap_or(url).to_string(),
        }
    }
}

impl Default for DatasetSource {
    fn default() -> Self {
        DatasetSource::Bundled(DEFAULT_BUNDLE.to_string())
    }
}

impl fmt::Display for DatasetSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DatasetSource::Bundled(name) => write!(f, "bundled:{name}"),
            DatasetSource::File(path) => write!(f, "{}", path.display()),
            DatasetSource::Url(url) => f.write_str(url),
        }
    }
}

fn expand_home(spec: &str) -> PathBuf {
    if let Some(rest) = spec.strip_prefix("~/")
        && let Some(home) = dirs::home_dir()
    {
        return home.join(rest);
    }
    PathBuf::from(spec)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DatasetFormat {
    Csv,
    Json,
}

impl DatasetFormat {
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "csv" => Some(DatasetFormat::Csv),
            "json" => Some(DatasetFormat::Json),
            _ => None,
        }
    }

    /// Guess from content: a leading `[` means a JSON array.
    pub fn sniff(text: &str) -> Self {
        match strip_bom(text).trim_start().chars().next() {
            Some('[') => DatasetFormat::Json,
            _ => DatasetFormat::Csv,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Dataset {
    pub label: String,
    pub records: Vec<VocabRecord>,
}

pub fn load(source: &DatasetSource) -> Result<Dataset, DatasetError> {
    let (text, format) = match source {
        DatasetSource::Bundled(name) => {
            let file = DatasetAssets::get(&format!("{name}.json"))
                .ok_or_else(|| DatasetError::UnknownBundle(name.clone()))?;
            let text = String::from_utf8_lossy(file.data.as_ref()).into_owned();
            (text, Some(DatasetFormat::Json))
        }
        DatasetSource::File(path) => {
            let text = fs::read_to_string(path).map_err(|source| DatasetError::Io {
                path: path.clone(),
                source,
            })?;
            (text, DatasetFormat::from_path(path))
        }
        DatasetSource::Url(url) => {
            let text = fetch_url(url)?;
            let path_part = url.split(['?', '#']).next().unwrap_or(url);
            (text, DatasetFormat::from_path(Path::new(path_part)))
        }
    };

    let format = format.unwrap_or_else(|| DatasetFormat::sniff(&text));
    let records = parse(&text, format)?;
    tracing::info!(source = %source, count = records.len(), ?format, "parsed word list");
    Ok(Dataset {
        label: source.label(),
        records,
    })
}

pub fn parse(text: &str, format: DatasetFormat) -> Result<Vec<VocabRecord>, DatasetError> {
    let text = strip_bom(text);
    match format {
        DatasetFormat::Csv => parse_csv(text),
        DatasetFormat::Json => Ok(serde_json::from_str(text)?),
    }
}

fn parse_csv(text: &str) -> Result<Vec<VocabRecord>, DatasetError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(text.as_bytes());
    let headers = reader.headers()?.clone();
    let column = |name: &str| headers.iter().position(|h| h.trim() == name);
    let (word, meaning, sentence) = (
        column("Word"),
        column("JapaneseMeaning"),
        column("ExampleSentence"),
    );
    if word.is_none() {
        tracing::warn!(?headers, "CSV has no Word column");
    }

    // Short rows leave the missing trailing columns empty.
    let field = |row: &csv::StringRecord, idx: Option<usize>| {
        idx.and_then(|i| row.get(i)).unwrap_or("").to_string()
    };

    let mut records = Vec::new();
    let mut skipped = 0usize;
    for row in reader.records() {
        match row {
            Ok(row) => records.push(VocabRecord {
                word: field(&row, word),
                japanese_meaning: field(&row, meaning),
                example_sentence: field(&row, sentence),
            }),
            Err(err) => {
                skipped += 1;
                tracing::warn!(%err, "skipping unreadable CSV row");
            }
        }
    }
    if skipped > 0 {
        tracing::warn!(skipped, "some CSV rows could not be read");
    }
    Ok(records)
}

fn strip_bom(text: &str) -> &str {
    text.strip_prefix('\u{feff}').unwrap_or(text)
}

pub fn bundled_names() -> Vec<String> {
    DatasetAssets::iter()
        .filter_map(|f| f.strip_suffix(".json").map(|n| n.to_string()))
        .collect()
}

#[cfg(feature = "network")]
fn fetch_url(url: &str) -> Result<String, DatasetError> {
    let fetch_err = |reason: String| DatasetError::Fetch {
        url: url.to_string(),
        reason,
    };
    let client = reqwest::blocking::Client::builder()
        .timeout(std::time::Duration::from_secs(10))
        .build()
        .map_err(|e| fetch_err(e.to_string()))?;
    let response = client.get(url).send().map_err(|e| fetch_err(e.to_string()))?;
    if !response.status().is_success() {
        return Err(fetch_err(format!("HTTP {}", response.status())));
    }
    response.text().map_err(|e| fetch_err(e.to_string()))
}

#[cfg(not(feature = "network"))]
fn fetch_url(url: &str) -> Result<String, DatasetError> {
    Err(DatasetError::NetworkDisabled(url.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const CSV: &str = "Word,JapaneseMeaning,ExampleSentence\n\
abate,減少する,Prices abated.\n\
zeal,熱意,\"His zeal, frankly, impressed us.\"\n";

    #[test]
    fn parse_csv_with_header_and_quoted_commas() {
        let records = parse(CSV, DatasetFormat::Csv).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0], VocabRecord::new("abate", "減少する", "Prices abated."));
        assert_eq!(records[1].example_sentence, "His zeal, frankly, impressed us.");
    }

    #[test]
    fn parse_csv_tolerates_reordered_and_missing_columns() {
        let text = "JapaneseMeaning,Word\n熱意,zeal\n減少する\n";
        let records = parse(text, DatasetFormat::Csv).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].word, "zeal");
        assert!(records[0].example_sentence.is_empty());
        // Short row: word left empty, dropped later by VocabState::load.
        assert!(records[1].word.is_empty());
    }

    #[test]
    fn parse_csv_keeps_rows_missing_trailing_columns() {
        let text = "Word,JapaneseMeaning,ExampleSentence\nabate,減少する\nzeal,熱意,s\nquell\n";
        let records = parse(text, DatasetFormat::Csv).unwrap();
        assert_eq!(
            records,
            vec![
                VocabRecord::new("abate", "減少する", ""),
                VocabRecord::new("zeal", "熱意", "s"),
                VocabRecord::new("quell", "", ""),
            ]
        );
    }

    #[test]
    fn parse_csv_without_word_column_yields_wordless_records() {
        let text = "Meaning,Sentence\n熱意,s\n";
        let records = parse(text, DatasetFormat::Csv).unwrap();
        assert_eq!(records.len(), 1);
        assert!(records[0].word.is_empty());
    }

    #[test]
    fn parse_json_tolerates_null_fields() {
        let text = r#"[
            {"Word": null, "JapaneseMeaning": "空", "ExampleSentence": "x"},
            {"Word": "zeal", "JapaneseMeaning": "熱意", "ExampleSentence": null}
        ]"#;
        let records = parse(text, DatasetFormat::Json).unwrap();
        assert_eq!(
            records,
            vec![
                VocabRecord::new("", "空", "x"),
                VocabRecord::new("zeal", "熱意", ""),
            ]
        );
    }

    #[test]
    fn parse_csv_strips_byte_order_mark() {
        let text = format!("\u{feff}{CSV}");
        let records = parse(&text, DatasetFormat::Csv).unwrap();
        assert_eq!(records[0].word, "abate");
    }

    #[test]
    fn parse_json_array() {
        let text = r#"[
            {"Word": "abate", "JapaneseMeaning": "減少する", "ExampleSentence": "Prices abated."},
            {"Word": "zeal", "JapaneseMeaning": "熱意", "Extra": 1}
        ]"#;
        let records = parse(text, DatasetFormat::Json).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].japanese_meaning, "熱意");
        assert!(records[1].example_sentence.is_empty());
    }

    #[test]
    fn parse_json_rejects_non_array() {
        let err = parse(r#"{"Word": "abate"}"#, DatasetFormat::Json).unwrap_err();
        assert!(matches!(err, DatasetError::Json(_)));
    }

    #[test]
    fn sniff_detects_json_array() {
        assert_eq!(DatasetFormat::sniff("  \n[{}]"), DatasetFormat::Json);
        assert_eq!(DatasetFormat::sniff("Word,JapaneseMeaning"), DatasetFormat::Csv);
        assert_eq!(DatasetFormat::sniff(""), DatasetFormat::Csv);
    }

    #[test]
    fn format_from_extension_is_case_insensitive() {
        assert_eq!(
            DatasetFormat::from_path(Path::new("words.CSV")),
            Some(DatasetFormat::Csv)
        );
        assert_eq!(
            DatasetFormat::from_path(Path::new("/tmp/words.json")),
            Some(DatasetFormat::Json)
        );
        assert_eq!(DatasetFormat::from_path(Path::new("words.txt")), None);
        assert_eq!(DatasetFormat::from_path(Path::new("words")), None);
    }

    #[test]
    fn source_parse_variants() {
        assert_eq!(
            DatasetSource::parse("bundled:eiken-grade1-sample"),
            DatasetSource::Bundled("eiken-grade1-sample".to_string())
        );
        assert_eq!(
            DatasetSource::parse("https://example.com/words.csv"),
            DatasetSource::Url("https://example.com/words.csv".to_string())
        );
        assert_eq!(
            DatasetSource::parse(" words.csv "),
            DatasetSource::File(PathBuf::from("words.csv"))
        );
    }

    #[test]
    fn source_labels() {
        assert_eq!(DatasetSource::parse("/data/eiken.csv").label(), "eiken.csv");
        assert_eq!(
            DatasetSource::parse("https://example.com/lists/eiken.json").label(),
            "eiken.json"
        );
        assert_eq!(DatasetSource::default().label(), DEFAULT_BUNDLE);
    }

    #[test]
    fn load_default_bundle() {
        let dataset = load(&DatasetSource::default()).unwrap();
        assert!(!dataset.records.is_empty());
        assert!(dataset.records.iter().all(|r| !r.word.is_empty()));
        assert!(bundled_names().contains(&DEFAULT_BUNDLE.to_string()));
    }

    #[test]
    fn load_unknown_bundle_fails() {
        let err = load(&DatasetSource::Bundled("nope".to_string())).unwrap_err();
        assert!(matches!(err, DatasetError::UnknownBundle(name) if name == "nope"));
    }

    #[test]
    fn load_file_by_extension_and_by_sniffing() {
        let dir = TempDir::new().unwrap();
        let csv_path = dir.path().join("words.csv");
        fs::write(&csv_path, CSV).unwrap();
        let sniffed_path = dir.path().join("words.list");
        fs::write(&sniffed_path, r#"[{"Word": "zeal"}]"#).unwrap();

        let dataset = load(&DatasetSource::File(csv_path)).unwrap();
        assert_eq!(dataset.label, "words.csv");
        assert_eq!(dataset.records.len(), 2);

        let dataset = load(&DatasetSource::File(sniffed_path)).unwrap();
        assert_eq!(dataset.records[0].word, "zeal");
    }

    #[test]
    fn load_missing_file_reports_path() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("absent.csv");
        let err = load(&DatasetSource::File(path.clone())).unwrap_err();
        match err {
            DatasetError::Io { path: reported, .. } => assert_eq!(reported, path),
            other => panic!("unexpected error: {other}"),
        }
    }
}
