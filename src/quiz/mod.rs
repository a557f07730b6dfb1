pub mod engine;
pub mod mistakes;
pub mod options;
pub mod words;

pub use engine::{Outcome, QuizEngine, QuizError, QuizState};
pub use mistakes::{MistakeLog, MistakeRecord, MistakeViewer};
pub use options::OptionSet;
pub use words::{WordEntry, WordList};

/// Storage key holding the JSON array of mistakes.
pub const INCORRECT_ANSWERS_KEY: &str = "incorrectAnswers";

/// How many answers a question offers, the correct one included.
pub const OPTIONS_PER_QUESTION: usize = 3;

#[cfg(test)]
pub(crate) fn sample_words() -> WordList {
    WordList::new(vec![
        WordEntry::new("Hallo", "مرحبا"),
        WordEntry::new("Danke", "شكرا"),
        WordEntry::new("Ja", "نعم"),
    ])
}
