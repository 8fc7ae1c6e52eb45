use std::sync::mpsc;
use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use rand::rngs::mock::StepRng;

use spelldrill::config::Config;
use spelldrill::feedback::LogFeedback;
use spelldrill::runtime::{ChannelEventSource, DrillEvent, Runner};
use spelldrill::snapshot::MemoryStateStore;
use spelldrill::word_source::MemoryWordSource;
use spelldrill::{Phase, SessionController, SessionEvent};

fn key(c: char) -> DrillEvent {
    DrillEvent::Key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE))
}

// Headless run of the event loop: keys and ticks drive the controller
// through a whole session without a terminal.
#[test]
fn headless_session_completes_through_runner() {
    let config = Config {
        advance_delay_ms: 20,
        source_retry_delay_ms: 0,
        ..Config::default()
    };
    let source = MemoryWordSource::from_pairs(&[("cat", "regular"), ("dog", "review")]);
    let mut controller =
        SessionController::new(source, MemoryStateStore::new(), LogFeedback, &config)
            .with_rng(StepRng::new(0, 0));
    controller.start_session().unwrap();
    assert_eq!(controller.current_word(), Some("DOG"));
    assert_eq!(controller.current_category(), Some("review"));

    let (tx, rx) = mpsc::channel();
    let mut runner = Runner::new(ChannelEventSource::new(rx), Duration::from_millis(5));

    // lowercase keys are uppercased by the front end, as a keyboard would be
    for c in "dxogcat".chars() {
        tx.send(key(c)).unwrap();
    }

    let mut events = Vec::new();
    for _ in 0..500u32 {
        match runner.step() {
            DrillEvent::Tick(elapsed) => {
                controller.on_tick(elapsed);
            }
            DrillEvent::Resize => {}
            DrillEvent::Key(key) => {
                if let KeyCode::Char(c) = key.code {
                    // letters typed during the pause after a word are dropped,
                    // so hold them back until the next word is up
                    while controller.phase() == Phase::WordComplete {
                        std::thread::sleep(Duration::from_millis(5));
                        controller.on_tick(Duration::from_millis(5));
                    }
                    events.push(controller.submit_letter(c.to_ascii_uppercase()));
                }
            }
        }
        if controller.phase() == Phase::SessionComplete {
            break;
        }
    }

    assert_eq!(controller.phase(), Phase::SessionComplete);
    assert_eq!(controller.state().score, 20);
    assert_eq!(controller.state().completed_words, vec!["DOG", "CAT"]);
    assert!(events.contains(&SessionEvent::LetterRejected('X')));
    assert_eq!(
        events.last(),
        Some(&SessionEvent::SessionComplete { score: 20 })
    );
}

#[test]
fn headless_typing_before_start_is_dropped() {
    let source = MemoryWordSource::from_pairs(&[("hi", "regular")]);
    let mut controller = SessionController::new(
        source,
        MemoryStateStore::new(),
        LogFeedback,
        &Config::default(),
    );

    assert_eq!(controller.submit_letter('H'), SessionEvent::Ignored);
    controller.start_session().unwrap();
    assert_eq!(controller.submit_letter('H'), SessionEvent::LetterAccepted);
    assert_eq!(
        controller.submit_letter('I'),
        SessionEvent::SessionComplete { score: 10 }
    );
}
