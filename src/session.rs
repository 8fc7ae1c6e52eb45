use serde::{Deserialize, Serialize};

use crate::util::is_permutation;
use crate::validator::is_spellable;

/// Points awarded for each correctly spelled word
pub const POINTS_PER_WORD: u32 = 10;

/// Lifecycle phase of a drill session
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum Phase {
    Idle,
    Building,
    InProgress,
    WordComplete,
    SessionComplete,
}

/// Committed progress through one shuffled word queue.
///
/// This is also the persisted snapshot; field names follow the stored
/// JSON layout.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionState {
    pub score: u32,
    pub completed_words: Vec<String>,
    pub session_words: Vec<String>,
    pub all_words: Vec<String>,
    pub current_word_index: usize,
}

impl SessionState {
    /// A fresh session over `all_words` played in `session_words` order
    pub fn new(all_words: Vec<String>, session_words: Vec<String>) -> Self {
        Self {
            score: 0,
            completed_words: Vec::new(),
            session_words,
            all_words,
            current_word_index: 0,
        }
    }

    pub fn current_word(&self) -> Option<&str> {
        self.session_words
            .get(self.current_word_index)
            .map(String::as_str)
    }

    pub fn is_complete(&self) -> bool {
        self.current_word_index == self.session_words.len()
    }

    pub fn remaining(&self) -> usize {
        self.session_words
            .len()
            .saturating_sub(self.current_word_index)
    }

    /// Commit the current word: score it, log it, and move the cursor on.
    /// Returns the committed word, or `None` once the queue is exhausted.
    pub fn complete_current(&mut self) -> Option<String> {
        let word = self.session_words.get(self.current_word_index)?.clone();
        self.score += POINTS_PER_WORD;
        self.completed_words.push(word.clone());
        self.current_word_index += 1;
        Some(word)
    }

    /// Whether every session invariant holds. A queue must hold at least
    /// one word, and every word must be typeable.
    pub fn check_invariants(&self) -> bool {
        !self.session_words.is_empty()
            && self.session_words.iter().all(|w| is_spellable(w))
            && self.current_word_index <= self.session_words.len()
            && self.completed_words.len() == self.current_word_index
            && self.score as usize == POINTS_PER_WORD as usize * self.completed_words.len()
            && is_permutation(&self.session_words, &self.all_words)
    }
}
