use crate::quiz::{WordEntry, INCORRECT_ANSWERS_KEY};
use crate::storage::{KeyValueStore, StorageError};

pub const NO_MISTAKES_TEXT: &str = "No incorrect answers recorded.";

/// A wrong answer: the word that was asked and what was picked instead.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct MistakeRecord {
    #[serde(rename = "German")]
    pub german: String,
    #[serde(rename = "Arabic")]
    pub arabic: String,
    #[serde(rename = "selectedAnswer")]
    pub selected_answer: String,
}

impl MistakeRecord {
    pub fn new(word: &WordEntry, selected_answer: impl Into<String>) -> Self {
        Self {
            german: word.german.clone(),
            arabic: word.arabic.clone(),
            selected_answer: selected_answer.into(),
        }
    }
}

pub type MistakeLog = Vec<MistakeRecord>;

/// Reads the log stored under `incorrectAnswers`, telling a failed read apart
/// from an empty one. Nothing stored gives an empty log. A stored value that
/// doesn't parse is logged and treated as empty, so the next write replaces it.
pub async fn try_load_mistake_log<S: KeyValueStore + ?Sized>(
    store: &S,
) -> Result<MistakeLog, StorageError> {
    let Some(json) = store.get(INCORRECT_ANSWERS_KEY).await? else {
        return Ok(MistakeLog::new());
    };

    match serde_json::from_str(&json) {
        Ok(mistakes) => Ok(mistakes),
        Err(e) => {
            log::error!("Error parsing incorrect answers: {}", e);
            Ok(MistakeLog::new())
        }
    }
}

/// Like [`try_load_mistake_log`], but a failing store also gives an empty log.
/// Only for display, never as the base of a write.
pub async fn load_mistake_log<S: KeyValueStore + ?Sized>(store: &S) -> MistakeLog {
    match try_load_mistake_log(store).await {
        Ok(mistakes) => mistakes,
        Err(e) => {
            log::error!("Error loading incorrect answers: {}", e);
            MistakeLog::new()
        }
    }
}

/// Overwrites the stored log with `log`.
pub async fn persist_mistake_log<S: KeyValueStore + ?Sized>(
    store: &S,
    log: &[MistakeRecord],
) -> Result<(), StorageError> {
    let json = serde_json::to_string(log)?;
    store.set(INCORRECT_ANSWERS_KEY, &json).await
}

/// Read-only view of the persisted mistakes. Loads fresh every time.
#[derive(Debug, Clone, Default)]
pub struct MistakeViewer {
    mistakes: MistakeLog,
}

impl MistakeViewer {
    pub async fn load<S: KeyValueStore + ?Sized>(store: &S) -> Self {
        Self {
            mistakes: load_mistake_log(store).await,
        }
    }

    pub fn render(&self) -> String {
        let mut text = String::from("Incorrect Answers\n");

        if self.mistakes.is_empty() {
            text.push('\n');
            text.push_str(NO_MISTAKES_TEXT);
            return text;
        }

        for mistake in &self.mistakes {
            text.push_str(&format!(
                "\nGerman: {}\nCorrect Arabic: {}\nYour Answer: {}\n",
                mistake.german, mistake.arabic, mistake.selected_answer
            ));
        }
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use async_trait::async_trait;

    struct FailingStore;

    #[async_trait]
    impl KeyValueStore for FailingStore {
        async fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Err(std::io::Error::other("storage offline").into())
        }

        async fn set(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
            Err(std::io::Error::other("storage offline").into())
        }
    }

    fn record(german: &str, arabic: &str, selected: &str) -> MistakeRecord {
        MistakeRecord::new(&WordEntry::new(german, arabic), selected)
    }

    #[tokio::test]
    async fn round_trip_keeps_order_and_fields() {
        let store = MemoryStore::new();
        let log = vec![
            record("Hallo", "مرحبا", "شكرا"),
            record("Ja", "نعم", "مرحبا"),
            record("Hallo", "مرحبا", "نعم"),
        ];

        persist_mistake_log(&store, &log).await.unwrap();
        assert_eq!(load_mistake_log(&store).await, log);
    }

    #[tokio::test]
    async fn stored_json_uses_camel_case_field_names() {
        let store = MemoryStore::new();
        persist_mistake_log(&store, &[record("Danke", "شكرا", "نعم")])
            .await
            .unwrap();

        let json = store.get(INCORRECT_ANSWERS_KEY).await.unwrap().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(
            value,
            serde_json::json!([{ "German": "Danke", "Arabic": "شكرا", "selectedAnswer": "نعم" }])
        );
    }

    #[tokio::test]
    async fn missing_key_loads_empty() {
        assert!(load_mistake_log(&MemoryStore::new()).await.is_empty());
    }

    #[tokio::test]
    async fn malformed_json_loads_empty() {
        let store = MemoryStore::new();
        store.set(INCORRECT_ANSWERS_KEY, "{not json").await.unwrap();

        assert!(load_mistake_log(&store).await.is_empty());
    }

    #[tokio::test]
    async fn failed_read_is_told_apart_from_missing_key() {
        let store = FailingStore;

        assert!(matches!(
            try_load_mistake_log(&store).await,
            Err(StorageError::Io(_))
        ));
        assert!(load_mistake_log(&store).await.is_empty());
        assert!(try_load_mistake_log(&MemoryStore::new()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn viewer_without_mistakes_shows_empty_message() {
        let viewer = MistakeViewer::load(&MemoryStore::new()).await;

        assert_eq!(
            viewer.render(),
            format!("Incorrect Answers\n\n{}", NO_MISTAKES_TEXT)
        );
    }

    #[tokio::test]
    async fn viewer_lists_every_mistake() {
        let store = MemoryStore::new();
        persist_mistake_log(
            &store,
            &[record("Hallo", "مرحبا", "شكرا"), record("Ja", "نعم", "شكرا")],
        )
        .await
        .unwrap();

        let rendered = MistakeViewer::load(&store).await.render();
        assert!(rendered.starts_with("Incorrect Answers\n"));
        assert!(rendered.contains("German: Hallo\nCorrect Arabic: مرحبا\nYour Answer: شكرا"));
        assert!(rendered.contains("German: Ja\nCorrect Arabic: نعم\nYour Answer: شكرا"));
        assert!(!rendered.contains(NO_MISTAKES_TEXT));
    }
}
