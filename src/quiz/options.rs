use rand::seq::SliceRandom;
use rand::Rng;

use crate::quiz::{WordEntry, WordList, OPTIONS_PER_QUESTION};

/// The answers offered for one question, already in display order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OptionSet(Vec<String>);

impl OptionSet {
    pub fn contains(&self, answer: &str) -> bool {
        self.0.iter().any(|option| option == answer)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.0.iter()
    }

    pub fn into_inner(self) -> Vec<String> {
        self.0
    }
}

impl From<Vec<String>> for OptionSet {
    fn from(options: Vec<String>) -> Self {
        Self(options)
    }
}

/// Builds the options for `words[index]`: the correct translation plus up to two
/// distinct distractors, shuffled.
///
/// Distractors come from visiting the words in random order, so a
/// translation shared by several words is proportionally more likely, like
/// drawing random indices until enough new values turn up. The walk is finite:
/// with fewer than three distinct translations in the list the set is simply
/// smaller. An out-of-range index gives an empty set.
pub fn generate_options<R: Rng + ?Sized>(words: &WordList, index: usize, rng: &mut R) -> OptionSet {
    let correct = match words.get(index) {
        Some(word) => word.arabic.clone(),
        None => return OptionSet::default(),
    };

    let mut options = vec![correct];

    let mut candidates: Vec<&WordEntry> = words.iter().collect();
    candidates.shuffle(rng);

    for word in candidates {
        if options.len() >= OPTIONS_PER_QUESTION {
            break;
        }
        if !options.contains(&word.arabic) {
            options.push(word.arabic.clone());
        }
    }

    if options.len() < OPTIONS_PER_QUESTION {
        log::warn!(
            "Only {} distinct translation(s) available for question {}",
            options.len(),
            index
        );
    }

    options.shuffle(rng);
    OptionSet(options)
}
