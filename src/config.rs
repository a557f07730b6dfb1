use std::path::PathBuf;

const DEFAULT_WORDS_PATH: &str = "assets/words.json";
const DEFAULT_STORE_DIR: &str = "store";
const DEFAULT_DIALOGUE_DB: &str = "db.sqlite";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// JSON object of `{ "German": ..., "Arabic": ... }` entries.
    pub words_path: PathBuf,
    /// Root of the per-chat key-value files.
    pub store_dir: PathBuf,
    pub dialogue_db: String,
}

impl Config {
    /// `TELOXIDE_TOKEN` is not part of this, `Bot::from_env` reads it itself.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let var = |key: &str, default: &str| {
            lookup(key)
                .filter(|value| !value.trim().is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        Self {
            words_path: var("WORDS_PATH", DEFAULT_WORDS_PATH).into(),
            store_dir: var("STORE_DIR", DEFAULT_STORE_DIR).into(),
            dialogue_db: var("DIALOGUE_DB", DEFAULT_DIALOGUE_DB),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn defaults_when_unset() {
        let config = Config::from_lookup(|_| None);

        assert_eq!(config.words_path, PathBuf::from("assets/words.json"));
        assert_eq!(config.store_dir, PathBuf::from("store"));
        assert_eq!(config.dialogue_db, "db.sqlite");
    }

    #[test]
    fn overrides_and_blank_values() {
        let env: HashMap<&str, &str> = [
            ("WORDS_PATH", "/srv/quiz/words.json"),
            ("STORE_DIR", "  "),
            ("DIALOGUE_DB", "/tmp/dialogues.sqlite"),
        ]
        .into_iter()
        .collect();

        let config = Config::from_lookup(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.words_path, PathBuf::from("/srv/quiz/words.json"));
        assert_eq!(config.store_dir, PathBuf::from("store"));
        assert_eq!(config.dialogue_db, "/tmp/dialogues.sqlite");
    }
}
