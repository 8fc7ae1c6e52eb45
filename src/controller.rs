//! Session lifecycle: queue building, word advance, scoring, persistence.

use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use std::time::Duration;

use crate::config::Config;
use crate::error::{DrillError, SourceError};
use crate::feedback::{swallow, Feedback, SoundTag};
use crate::session::{Phase, SessionState};
use crate::snapshot::{clear_snapshot, load_snapshot, save_snapshot, StateStore};
use crate::util::shuffle;
use crate::validator::{is_spellable, InputValidator, Outcome};
use crate::word_source::{RetryPolicy, WordSource};

pub const REJECTED_PHRASE: &str = "Nope!";
pub const FINAL_PHRASE: &str = "Congratulations! You spelled every word!";

/// What a controller call did, for whoever renders the session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    Ignored,
    Started,
    Resumed,
    LetterAccepted,
    LetterRejected(char),
    LetterRemoved,
    WordComplete { word: String, score: u32 },
    NextWord(String),
    SessionComplete { score: u32 },
}

/// Owns the session state and drives it from learner input.
pub struct SessionController<W: WordSource, S: StateStore, F: Feedback> {
    source: W,
    store: S,
    feedback: F,
    rng: Box<dyn RngCore>,
    retry: RetryPolicy,
    advance_delay: Duration,
    phase: Phase,
    state: SessionState,
    validator: Option<InputValidator>,
    pending_advance: Option<Duration>,
    current_category: Option<String>,
    last_error: Option<DrillError>,
}

impl<W: WordSource, S: StateStore, F: Feedback> SessionController<W, S, F> {
    pub fn new(source: W, store: S, feedback: F, config: &Config) -> Self {
        Self {
            source,
            store,
            feedback,
            rng: Box::new(StdRng::from_entropy()),
            retry: config.retry_policy(),
            advance_delay: config.advance_delay(),
            phase: Phase::Idle,
            state: SessionState::default(),
            validator: None,
            pending_advance: None,
            current_category: None,
            last_error: None,
        }
    }

    /// Replace the random source used for shuffling
    pub fn with_rng(mut self, rng: impl RngCore + 'static) -> Self {
        self.rng = Box::new(rng);
        self
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn validator(&self) -> Option<&InputValidator> {
        self.validator.as_ref()
    }

    /// The word being spelled, only while one is active
    pub fn current_word(&self) -> Option<&str> {
        match self.phase {
            Phase::InProgress => self.state.current_word(),
            _ => None,
        }
    }

    pub fn current_category(&self) -> Option<&str> {
        self.current_category.as_deref()
    }

    pub fn last_error(&self) -> Option<&DrillError> {
        self.last_error.as_ref()
    }

    pub fn feedback(&self) -> &F {
        &self.feedback
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Resume the saved session if there is a valid one, otherwise build a
    /// fresh shuffled queue from the word source.
    pub fn start_session(&mut self) -> Result<SessionEvent, DrillError> {
        if !matches!(self.phase, Phase::Idle | Phase::SessionComplete) {
            log::debug!("ignoring start_session while {}", self.phase);
            return Ok(SessionEvent::Ignored);
        }
        self.last_error = None;
        self.validator = None;
        self.pending_advance = None;

        if let Some(saved) = load_snapshot(&self.store) {
            log::debug!(
                "resuming session at word {} of {}",
                saved.current_word_index,
                saved.session_words.len()
            );
            self.state = saved;
            self.enter_current_word();
            return Ok(SessionEvent::Resumed);
        }

        self.phase = Phase::Building;
        let all_words = match self.fetch_all_words() {
            Ok(words) => words,
            Err(e) => {
                log::warn!("could not build a session: {e}");
                self.phase = Phase::Idle;
                self.last_error = Some(e.clone());
                return Err(e);
            }
        };

        let mut session_words = all_words.clone();
        shuffle(&mut session_words, &mut *self.rng);
        log::debug!("built session of {} words", session_words.len());

        self.state = SessionState::new(all_words, session_words);
        self.persist();
        self.enter_current_word();
        Ok(SessionEvent::Started)
    }

    /// Discard the saved session and start over
    pub fn reset_session(&mut self) -> Result<SessionEvent, DrillError> {
        if self.phase == Phase::Building {
            return Ok(SessionEvent::Ignored);
        }
        if let Err(e) = clear_snapshot(&mut self.store) {
            log::warn!("could not clear saved session: {e}");
        }
        self.state = SessionState::default();
        self.current_category = None;
        self.phase = Phase::Idle;
        self.start_session()
    }

    pub fn submit_letter(&mut self, letter: char) -> SessionEvent {
        let Some(validator) = self.validator.as_mut() else {
            return SessionEvent::Ignored;
        };

        match validator.submit(letter) {
            None => SessionEvent::Ignored,
            Some(Outcome::LetterAccepted) => SessionEvent::LetterAccepted,
            Some(Outcome::LetterRejected(c)) => {
                swallow(self.feedback.speak_feedback(REJECTED_PHRASE));
                SessionEvent::LetterRejected(c)
            }
            Some(Outcome::LetterRemoved) => SessionEvent::LetterRemoved,
            Some(Outcome::WordComplete) => self.complete_word(),
        }
    }

    /// Remove the last correct letter. Score is never touched.
    pub fn backspace(&mut self) -> SessionEvent {
        match self.validator.as_mut().and_then(InputValidator::backspace) {
            Some(_) => SessionEvent::LetterRemoved,
            None => SessionEvent::Ignored,
        }
    }

    /// Let time pass; moves on to the next word once the advance delay
    /// after a completed word has run out.
    pub fn on_tick(&mut self, elapsed: Duration) -> SessionEvent {
        let Some(remaining) = self.pending_advance else {
            return SessionEvent::Ignored;
        };

        let remaining = remaining.saturating_sub(elapsed);
        if !remaining.is_zero() {
            self.pending_advance = Some(remaining);
            return SessionEvent::Ignored;
        }

        self.pending_advance = None;
        self.enter_current_word();
        match self.state.current_word() {
            Some(word) => SessionEvent::NextWord(word.to_string()),
            None => SessionEvent::Ignored,
        }
    }

    /// Say the current word again
    pub fn replay_word(&mut self) {
        if let Some(validator) = &self.validator {
            let word = validator.target_word();
            swallow(self.feedback.play_word(&word));
        }
    }

    fn complete_word(&mut self) -> SessionEvent {
        self.validator = None;
        let Some(word) = self.state.complete_current() else {
            return SessionEvent::Ignored;
        };
        let score = self.state.score;
        self.persist();

        if self.state.is_complete() {
            swallow(self.feedback.play_sound(SoundTag::Success));
            // the closing message finishes before the session is marked done
            swallow(self.feedback.speak_feedback(FINAL_PHRASE));
            self.phase = Phase::SessionComplete;
            self.current_category = None;
            log::debug!("session complete with score {score}");
            return SessionEvent::SessionComplete { score };
        }

        swallow(self.feedback.speak_feedback(SoundTag::Correct.phrase()));
        if self.advance_delay.is_zero() {
            self.enter_current_word();
        } else {
            self.phase = Phase::WordComplete;
            self.pending_advance = Some(self.advance_delay);
        }
        SessionEvent::WordComplete { word, score }
    }

    fn enter_current_word(&mut self) {
        let Some(word) = self.state.current_word().map(str::to_string) else {
            self.validator = None;
            self.current_category = None;
            self.phase = Phase::SessionComplete;
            return;
        };

        self.current_category = match self.source.category_for_word(&word) {
            Ok(category) => category,
            Err(e) => {
                log::debug!("no category for {word}: {e}");
                None
            }
        };
        self.validator = Some(InputValidator::new(&word));
        self.phase = Phase::InProgress;
        swallow(self.feedback.play_word(&word));
    }

    fn fetch_all_words(&self) -> Result<Vec<String>, DrillError> {
        let categories = fetch(&self.retry, "categories", || self.source.categories())?;

        let mut all_words = Vec::new();
        for category in &categories {
            let words = fetch(&self.retry, category, || {
                self.source.words_by_category(category)
            })?;
            for word in words {
                if is_spellable(&word) {
                    all_words.push(word);
                } else {
                    log::warn!("skipping unspellable word {word:?} in {category}");
                }
            }
        }

        if all_words.is_empty() {
            return Err(DrillError::EmptyCatalog);
        }
        Ok(all_words)
    }

    fn persist(&mut self) {
        if let Err(e) = save_snapshot(&mut self.store, &self.state) {
            log::warn!("could not save session: {e}");
        }
    }
}

/// One word-source query with retry. A backend failure is logged and read
/// as an empty answer; only running out of retries is an error.
fn fetch(
    retry: &RetryPolicy,
    what: &str,
    op: impl FnMut() -> Result<Vec<String>, SourceError>,
) -> Result<Vec<String>, DrillError> {
    match retry.run(op) {
        Ok(items) => Ok(items),
        Err(SourceError::NotReady) => Err(DrillError::SourceUnavailable {
            attempts: retry.max_attempts.max(1),
        }),
        Err(e) => {
            log::warn!("fetching {what}: {e}");
            Ok(Vec::new())
        }
    }
}
