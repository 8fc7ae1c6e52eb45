use std::thread;
use std::time::Duration;

use crate::error::SourceError;

/// A target word and the category it was filed under
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Word {
    pub text: String,
    pub category: String,
}

impl Word {
    /// Words are normalized to uppercase here, at the source boundary
    pub fn new(text: &str, category: &str) -> Self {
        Self {
            text: text.trim().to_uppercase(),
            category: category.to_string(),
        }
    }
}

/// Read-only catalog of categorized words.
///
/// Every call may answer [`SourceError::NotReady`] while the backing store
/// is still initializing; callers retry in that case.
pub trait WordSource {
    fn categories(&self) -> Result<Vec<String>, SourceError>;
    fn words_by_category(&self, category: &str) -> Result<Vec<String>, SourceError>;
    fn category_for_word(&self, word: &str) -> Result<Option<String>, SourceError>;
    /// Single random word, for the legacy one-word-at-a-time mode
    fn random_word(&self) -> Result<Option<String>, SourceError>;
}

/// Word source backed by an in-memory list, categories in first-seen order
#[derive(Debug, Clone, Default)]
pub struct MemoryWordSource {
    words: Vec<Word>,
}

impl MemoryWordSource {
    pub fn new(words: Vec<Word>) -> Self {
        Self { words }
    }

    pub fn from_pairs(pairs: &[(&str, &str)]) -> Self {
        Self::new(pairs.iter().map(|(w, c)| Word::new(w, c)).collect())
    }
}

impl WordSource for MemoryWordSource {
    fn categories(&self) -> Result<Vec<String>, SourceError> {
        let mut categories: Vec<String> = Vec::new();
        for word in &self.words {
            if !categories.contains(&word.category) {
                categories.push(word.category.clone());
            }
        }
        Ok(categories)
    }

    fn words_by_category(&self, category: &str) -> Result<Vec<String>, SourceError> {
        Ok(self
            .words
            .iter()
            .filter(|w| w.category == category)
            .map(|w| w.text.clone())
            .collect())
    }

    fn category_for_word(&self, word: &str) -> Result<Option<String>, SourceError> {
        Ok(self
            .words
            .iter()
            .find(|w| w.text == word)
            .map(|w| w.category.clone()))
    }

    fn random_word(&self) -> Result<Option<String>, SourceError> {
        use rand::seq::SliceRandom;
        Ok(self
            .words
            .choose(&mut rand::thread_rng())
            .map(|w| w.text.clone()))
    }
}

/// How long to keep asking a source that is not ready yet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            delay: Duration::from_millis(1000),
        }
    }
}

impl RetryPolicy {
    /// Run `op`, retrying with a fixed delay while it reports `NotReady`.
    /// Other errors are returned immediately.
    pub fn run<T>(
        &self,
        mut op: impl FnMut() -> Result<T, SourceError>,
    ) -> Result<T, SourceError> {
        let attempts = self.max_attempts.max(1);
        for attempt in 1..=attempts {
            match op() {
                Err(SourceError::NotReady) if attempt < attempts => {
                    log::debug!("word source not ready (attempt {attempt}/{attempts}), retrying");
                    thread::sleep(self.delay);
                }
                result => return result,
            }
        }
        Err(SourceError::NotReady)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn sample() -> MemoryWordSource {
        MemoryWordSource::from_pairs(&[
            ("ladybug", "regular"),
            ("quickly", "review"),
            ("popcorn", "regular"),
            ("sandcastle", "challenge"),
        ])
    }

    #[test]
    fn test_word_is_normalized() {
        let w = Word::new(" ladybug ", "regular");
        assert_eq!(w.text, "LADYBUG");
        assert_eq!(w.category, "regular");
    }

    #[test]
    fn test_categories_in_first_seen_order() {
        assert_eq!(
            sample().categories().unwrap(),
            vec!["regular", "review", "challenge"]
        );
    }

    #[test]
    fn test_words_by_category() {
        let source = sample();
        assert_eq!(
            source.words_by_category("regular").unwrap(),
            vec!["LADYBUG", "POPCORN"]
        );
        assert!(source.words_by_category("missing").unwrap().is_empty());
    }

    #[test]
    fn test_category_for_word() {
        let source = sample();
        assert_eq!(
            source.category_for_word("QUICKLY").unwrap().as_deref(),
            Some("review")
        );
        assert_eq!(source.category_for_word("NOPE").unwrap(), None);
    }

    #[test]
    fn test_random_word() {
        let source = sample();
        let word = source.random_word().unwrap().unwrap();
        assert!(source.category_for_word(&word).unwrap().is_some());

        assert_eq!(MemoryWordSource::default().random_word().unwrap(), None);
    }

    #[test]
    fn test_retry_until_ready() {
        let calls = Cell::new(0);
        let policy = RetryPolicy {
            max_attempts: 5,
            delay: Duration::ZERO,
        };

        let result = policy.run(|| {
            calls.set(calls.get() + 1);
            if calls.get() < 3 {
                Err(SourceError::NotReady)
            } else {
                Ok(42)
            }
        });

        assert_eq!(result, Ok(42));
        assert_eq!(calls.get(), 3);
    }

    #[test]
    fn test_retry_gives_up() {
        let calls = Cell::new(0);
        let policy = RetryPolicy {
            max_attempts: 4,
            delay: Duration::ZERO,
        };

        let result: Result<(), _> = policy.run(|| {
            calls.set(calls.get() + 1);
            Err(SourceError::NotReady)
        });

        assert_eq!(result, Err(SourceError::NotReady));
        assert_eq!(calls.get(), 4);
    }

    #[test]
    fn test_retry_does_not_repeat_backend_errors() {
        let calls = Cell::new(0);
        let result: Result<(), _> = RetryPolicy::default().run(|| {
            calls.set(calls.get() + 1);
            Err(SourceError::Backend("boom".into()))
        });

        assert_eq!(result, Err(SourceError::Backend("boom".into())));
        assert_eq!(calls.get(), 1);
    }
}
