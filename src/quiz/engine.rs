use std::sync::Arc;

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::quiz::mistakes::{load_mistake_log, persist_mistake_log, try_load_mistake_log};
use crate::quiz::options::generate_options;
use crate::quiz::{MistakeLog, MistakeRecord, OptionSet, WordEntry, WordList};
use crate::storage::{KeyValueStore, StorageError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizState {
    AtQuestion(usize),
    /// The last word was answered correctly. Only `restart` leaves this state.
    Completed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Correct { next: usize },
    Completed,
    Incorrect(MistakeRecord),
}

#[derive(Debug, thiserror::Error)]
pub enum QuizError {
    #[error("No words loaded")]
    NoWords,

    #[error("Quiz already completed")]
    Completed,

    #[error("Failed to read incorrect answers before saving: {0}")]
    Load(StorageError),

    #[error("Failed to save incorrect answer: {0}")]
    Persist(StorageError),
}

/// One quiz session over a shared word list.
///
/// The mistake log is written through to `store` on every wrong answer. Each
/// write re-reads the stored log first and appends to that, so a read that
/// failed earlier can't shrink what is stored.
pub struct QuizEngine<S> {
    words: Arc<WordList>,
    store: S,
    state: QuizState,
    options: OptionSet,
    mistakes: MistakeLog,
    rng: StdRng,
}

impl<S: KeyValueStore> QuizEngine<S> {
    /// Fresh session at the first word, with the mistakes already in `store`.
    pub async fn start(words: Arc<WordList>, store: S) -> Self {
        Self::resume(words, store, QuizState::AtQuestion(0), None).await
    }

    /// Picks a session back up. Passing `options` keeps the answers the user
    /// is already looking at, otherwise new ones are drawn.
    pub async fn resume(
        words: Arc<WordList>,
        store: S,
        state: QuizState,
        options: Option<OptionSet>,
    ) -> Self {
        let mistakes = load_mistake_log(&store).await;
        Self::with_rng(words, store, state, options, mistakes, StdRng::from_entropy())
    }

    pub fn with_rng(
        words: Arc<WordList>,
        store: S,
        state: QuizState,
        options: Option<OptionSet>,
        mistakes: MistakeLog,
        rng: StdRng,
    ) -> Self {
        let state = match (state, words.last_index()) {
            (QuizState::AtQuestion(index), Some(last)) => QuizState::AtQuestion(index.min(last)),
            (state, _) => state,
        };

        let mut engine = Self {
            words,
            store,
            state,
            options: OptionSet::default(),
            mistakes,
            rng,
        };

        match options {
            Some(options) if engine.options_fit(&options) => engine.options = options,
            _ => engine.regenerate_options(),
        }
        engine
    }

    /// Index of the current question. Stays on the last word once completed.
    pub fn index(&self) -> usize {
        match self.state {
            QuizState::AtQuestion(index) => index,
            QuizState::Completed => self.words.last_index().unwrap_or(0),
        }
    }

    pub fn current(&self) -> Option<&WordEntry> {
        match self.state {
            QuizState::AtQuestion(index) => self.words.get(index),
            QuizState::Completed => None,
        }
    }

    pub fn options(&self) -> &OptionSet {
        &self.options
    }

    pub fn mistakes(&self) -> &[MistakeRecord] {
        &self.mistakes
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_completed(&self) -> bool {
        self.state == QuizState::Completed
    }

    pub async fn submit_answer(&mut self, selected: &str) -> Result<Outcome, QuizError> {
        let index = match self.state {
            QuizState::Completed => return Err(QuizError::Completed),
            QuizState::AtQuestion(index) => index,
        };
        let word = self.words.get(index).ok_or(QuizError::NoWords)?;

        if selected == word.arabic {
            log::debug!("Correct answer for \"{}\"", word.german);

            if Some(index) == self.words.last_index() {
                log::info!("Quiz completed");
                self.state = QuizState::Completed;
                self.options = OptionSet::default();
                return Ok(Outcome::Completed);
            }

            let next = index + 1;
            self.state = QuizState::AtQuestion(next);
            self.regenerate_options();
            return Ok(Outcome::Correct { next });
        }

        let record = MistakeRecord::new(word, selected);
        log::debug!(
            "Wrong answer for \"{}\": picked \"{}\"",
            record.german,
            record.selected_answer
        );

        let mut mistakes = try_load_mistake_log(&self.store)
            .await
            .map_err(QuizError::Load)?;
        mistakes.push(record.clone());
        persist_mistake_log(&self.store, &mistakes)
            .await
            .map_err(QuizError::Persist)?;

        self.mistakes = mistakes;
        Ok(Outcome::Incorrect(record))
    }

    /// Jumps to `index`, clamped to the word list. Returns where it landed.
    pub fn seek(&mut self, index: usize) -> Result<usize, QuizError> {
        if self.is_completed() {
            return Err(QuizError::Completed);
        }
        let last = self.words.last_index().ok_or(QuizError::NoWords)?;

        let index = index.min(last);
        log::debug!("Seeking to question {}", index);
        self.state = QuizState::AtQuestion(index);
        self.regenerate_options();
        Ok(index)
    }

    /// Back to the first word. The mistake log is kept.
    pub fn restart(&mut self) {
        self.state = QuizState::AtQuestion(0);
        self.regenerate_options();
    }

    fn regenerate_options(&mut self) {
        self.options = match self.state {
            QuizState::AtQuestion(index) => generate_options(&self.words, index, &mut self.rng),
            QuizState::Completed => OptionSet::default(),
        };
    }

    fn options_fit(&self, options: &OptionSet) -> bool {
        match self.current() {
            Some(word) => options.contains(&word.arabic),
            None => options.is_empty(),
        }
    }
}
