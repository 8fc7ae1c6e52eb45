use crate::error::FeedbackError;

/// Short sound cues
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
#[strum(serialize_all = "lowercase")]
pub enum SoundTag {
    Correct,
    Success,
}

impl SoundTag {
    /// Phrase spoken for the cue
    pub fn phrase(&self) -> &'static str {
        match self {
            SoundTag::Correct => "Correct!",
            SoundTag::Success => "Great job!",
        }
    }
}

/// Audio and speech playback. Every call is best-effort.
pub trait Feedback {
    fn play_word(&mut self, word: &str) -> Result<(), FeedbackError>;
    fn speak_feedback(&mut self, text: &str) -> Result<(), FeedbackError>;
    fn play_sound(&mut self, tag: SoundTag) -> Result<(), FeedbackError>;
}

/// Feedback sink that only logs what would have been played
#[derive(Debug, Clone, Default)]
pub struct LogFeedback;

impl Feedback for LogFeedback {
    fn play_word(&mut self, word: &str) -> Result<(), FeedbackError> {
        log::info!("play word {word}");
        Ok(())
    }

    fn speak_feedback(&mut self, text: &str) -> Result<(), FeedbackError> {
        log::info!("speak {text:?}");
        Ok(())
    }

    fn play_sound(&mut self, tag: SoundTag) -> Result<(), FeedbackError> {
        log::info!("sound {tag} ({})", tag.phrase());
        Ok(())
    }
}

/// Log and drop a playback failure
pub(crate) fn swallow(result: Result<(), FeedbackError>) {
    if let Err(e) = result {
        log::warn!("{e}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sound_tag_display() {
        assert_eq!(SoundTag::Correct.to_string(), "correct");
        assert_eq!(SoundTag::Success.to_string(), "success");
    }

    #[test]
    fn test_sound_tag_phrase() {
        assert_eq!(SoundTag::Correct.phrase(), "Correct!");
        assert_eq!(SoundTag::Success.phrase(), "Great job!");
    }

    #[test]
    fn test_log_feedback_never_fails() {
        let mut fb = LogFeedback;
        assert!(fb.play_word("CAT").is_ok());
        assert!(fb.speak_feedback("Nope!").is_ok());
        assert!(fb.play_sound(SoundTag::Correct).is_ok());
    }
}
