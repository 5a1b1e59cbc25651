use serde::{Deserialize, Deserializer, Serialize};

/// One entry of the word list. Field names follow the dataset columns.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VocabRecord {
    #[serde(rename = "Word", default, deserialize_with = "null_as_empty")]
    pub word: String,
    #[serde(rename = "JapaneseMeaning", default, deserialize_with = "null_as_empty")]
    pub japanese_meaning: String,
    #[serde(rename = "ExampleSentence", default, deserialize_with = "null_as_empty")]
    pub example_sentence: String,
}

impl VocabRecord {
    pub fn new(word: &str, japanese_meaning: &str, example_sentence: &str) -> Self {
        Self {
            word: word.to_string(),
            japanese_meaning: japanese_meaning.to_string(),
            example_sentence: example_sentence.to_string(),
        }
    }
}

/// A `null` field reads the same as a missing one.
fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}
