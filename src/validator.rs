/// Result of feeding one key to an [`InputValidator`]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    LetterAccepted,
    LetterRejected(char),
    LetterRemoved,
    WordComplete,
}

/// Whether a word can be typed to completion: non-empty and `A..=Z` only
pub fn is_spellable(word: &str) -> bool {
    !word.is_empty() && word.chars().all(|c| c.is_ascii_uppercase())
}

/// Tracks how much of a single target word has been spelled correctly.
///
/// Only a correct letter moves the prefix forward; a wrong letter is
/// reported and remembered for display, but never committed.
#[derive(Debug, Clone)]
pub struct InputValidator {
    target: Vec<char>,
    entered: usize,
    last_rejected: Option<char>,
}

impl InputValidator {
    pub fn new(target_word: &str) -> Self {
        Self {
            target: target_word.chars().collect(),
            entered: 0,
            last_rejected: None,
        }
    }

    pub fn target_word(&self) -> String {
        self.target.iter().collect()
    }

    pub fn entered_prefix_len(&self) -> usize {
        self.entered
    }

    pub fn entered_prefix(&self) -> String {
        self.target[..self.entered].iter().collect()
    }

    pub fn last_rejected(&self) -> Option<char> {
        self.last_rejected
    }

    pub fn is_complete(&self) -> bool {
        self.entered == self.target.len()
    }

    /// Expected letter at the cursor, if the word is not finished
    pub fn expected(&self) -> Option<char> {
        self.target.get(self.entered).copied()
    }

    /// Feed one letter. Anything other than `A..=Z` is ignored, as is every
    /// letter after the word is complete.
    pub fn submit(&mut self, letter: char) -> Option<Outcome> {
        if !letter.is_ascii_uppercase() {
            return None;
        }
        let expected = self.expected()?;

        if letter == expected {
            self.entered += 1;
            self.last_rejected = None;
            if self.is_complete() {
                Some(Outcome::WordComplete)
            } else {
                Some(Outcome::LetterAccepted)
            }
        } else {
            self.last_rejected = Some(letter);
            Some(Outcome::LetterRejected(letter))
        }
    }

    pub fn backspace(&mut self) -> Option<Outcome> {
        if self.entered > 0 {
            self.entered -= 1;
            self.last_rejected = None;
            Some(Outcome::LetterRemoved)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_is_spellable() {
        assert!(is_spellable("CAT"));
        assert!(!is_spellable(""));
        assert!(!is_spellable("cat"));
        assert!(!is_spellable("ICE CREAM"));
        assert!(!is_spellable("X-RAY"));
        assert!(!is_spellable("NAÏVE"));
    }

    #[test]
    fn test_new_validator() {
        let v = InputValidator::new("CAT");

        assert_eq!(v.target_word(), "CAT");
        assert_eq!(v.entered_prefix_len(), 0);
        assert_eq!(v.expected(), Some('C'));
        assert_eq!(v.last_rejected(), None);
        assert!(!v.is_complete());
    }

    #[test]
    fn test_exact_letters_complete_word() {
        let mut v = InputValidator::new("DOG");

        assert_eq!(v.submit('D'), Some(Outcome::LetterAccepted));
        assert_eq!(v.submit('O'), Some(Outcome::LetterAccepted));
        assert_eq!(v.submit('G'), Some(Outcome::WordComplete));
        assert_eq!(v.entered_prefix_len(), 3);
        assert_eq!(v.entered_prefix(), "DOG");
        assert!(v.is_complete());
        assert_eq!(v.expected(), None);
    }

    #[test]
    fn test_wrong_letter_does_not_move_prefix() {
        let mut v = InputValidator::new("CAT");
        v.submit('C');

        assert_matches!(v.submit('X'), Some(Outcome::LetterRejected('X')));
        assert_eq!(v.entered_prefix_len(), 1);
        assert_eq!(v.last_rejected(), Some('X'));

        assert_eq!(v.submit('A'), Some(Outcome::LetterAccepted));
        assert_eq!(v.entered_prefix_len(), 2);
        assert_eq!(v.last_rejected(), None);
    }

    #[test]
    fn test_non_uppercase_input_is_ignored() {
        let mut v = InputValidator::new("CAT");

        assert_eq!(v.submit('c'), None);
        assert_eq!(v.submit('1'), None);
        assert_eq!(v.submit(' '), None);
        assert_eq!(v.submit('É'), None);
        assert_eq!(v.entered_prefix_len(), 0);
        assert_eq!(v.last_rejected(), None);
    }

    #[test]
    fn test_submit_after_completion_is_ignored() {
        let mut v = InputValidator::new("HI");
        v.submit('H');
        assert_eq!(v.submit('I'), Some(Outcome::WordComplete));

        assert_eq!(v.submit('I'), None);
        assert_eq!(v.submit('X'), None);
        assert_eq!(v.entered_prefix_len(), 2);
    }

    #[test]
    fn test_backspace() {
        let mut v = InputValidator::new("CAT");
        v.submit('C');
        v.submit('A');

        assert_eq!(v.backspace(), Some(Outcome::LetterRemoved));
        assert_eq!(v.entered_prefix_len(), 1);
        assert_eq!(v.backspace(), Some(Outcome::LetterRemoved));
        assert_eq!(v.entered_prefix_len(), 0);
    }

    #[test]
    fn test_backspace_at_start() {
        let mut v = InputValidator::new("CAT");

        assert_eq!(v.backspace(), None);
        assert_eq!(v.backspace(), None);
        assert_eq!(v.entered_prefix_len(), 0);
    }

    #[test]
    fn test_backspace_clears_rejected_letter() {
        let mut v = InputValidator::new("CAT");
        v.submit('C');
        v.submit('Q');
        assert_eq!(v.last_rejected(), Some('Q'));

        v.backspace();
        assert_eq!(v.last_rejected(), None);
    }

    #[test]
    fn test_repeated_letters() {
        let mut v = InputValidator::new("BOOK");
        for c in ['B', 'O', 'O'] {
            assert_eq!(v.submit(c), Some(Outcome::LetterAccepted));
        }
        assert_eq!(v.submit('K'), Some(Outcome::WordComplete));
    }
}
