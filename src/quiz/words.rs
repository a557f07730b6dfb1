use std::path::Path;

use serde_json::{Map, Value};

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct WordEntry {
    #[serde(rename = "German")]
    pub german: String,
    #[serde(rename = "Arabic")]
    pub arabic: String,
}

impl WordEntry {
    #[cfg(test)]
    pub fn new(german: impl Into<String>, arabic: impl Into<String>) -> Self {
        Self {
            german: german.into(),
            arabic: arabic.into(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum WordsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid format: {0}")]
    InvalidFormat(String),
}

/// The words of the quiz, in the order they appear in the asset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WordList {
    words: Vec<WordEntry>,
}

impl WordList {
    pub fn new(words: Vec<WordEntry>) -> Self {
        Self { words }
    }

    /// Parses the bundled asset: a JSON object whose values are word entries.
    /// The keys carry no meaning, only their order is kept.
    pub fn from_json(json: &str) -> Result<Self, WordsError> {
        let object: Map<String, Value> = match serde_json::from_str::<Value>(json)? {
            Value::Object(object) => object,
            other => {
                return Err(WordsError::InvalidFormat(format!(
                    "expected an object of words, found {}",
                    kind_of(&other)
                )))
            }
        };

        let words = object
            .into_iter()
            .map(|(_, value)| serde_json::from_value::<WordEntry>(value))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self::new(words))
    }

    pub fn get(&self, index: usize) -> Option<&WordEntry> {
        self.words.get(index)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn last_index(&self) -> Option<usize> {
        self.words.len().checked_sub(1)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, WordEntry> {
        self.words.iter()
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

pub fn load_words(path: impl AsRef<Path>) -> Result<WordList, WordsError> {
    let content = std::fs::read_to_string(path)?;
    WordList::from_json(&content)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_asset_order() {
        let json = r#"{
            "zeta": { "German": "Hallo", "Arabic": "مرحبا" },
            "alpha": { "German": "Danke", "Arabic": "شكرا" },
            "10": { "German": "Ja", "Arabic": "نعم" }
        }"#;

        let words = WordList::from_json(json).unwrap();
        let german: Vec<_> = words.iter().map(|w| w.german.as_str()).collect();
        assert_eq!(german, vec!["Hallo", "Danke", "Ja"]);
        assert_eq!(words.last_index(), Some(2));
    }

    #[test]
    fn rejects_non_object_asset() {
        let result = WordList::from_json(r#"[{ "German": "Ja", "Arabic": "نعم" }]"#);
        assert!(matches!(result, Err(WordsError::InvalidFormat(_))));
    }

    #[test]
    fn rejects_entry_without_translation() {
        let result = WordList::from_json(r#"{ "a": { "German": "Ja" } }"#);
        assert!(matches!(result, Err(WordsError::Parse(_))));
    }

    #[test]
    fn missing_file_is_io_error() {
        let result = load_words("/definitely/not/here/words.json");
        assert!(matches!(result, Err(WordsError::Io(_))));
    }

    #[test]
    fn bundled_asset_loads() {
        let words = load_words(concat!(env!("CARGO_MANIFEST_DIR"), "/assets/words.json")).unwrap();

        assert_eq!(words.len(), 10);
        assert_eq!(words.get(0), Some(&WordEntry::new("Hallo", "مرحبا")));
    }

    #[test]
    fn empty_list_has_no_last_index() {
        assert_eq!(WordList::default().last_index(), None);
    }
}
