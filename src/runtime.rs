use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::time::{Duration, Instant};

use crossterm::event::{self, Event as CtEvent, KeyEvent, KeyEventKind};

/// Unified event type consumed by the app loop
#[derive(Clone, Debug)]
pub enum DrillEvent {
    Key(KeyEvent),
    Resize,
    /// Time passed since the previous tick
    Tick(Duration),
}

/// Source of terminal events (keyboard, resize, etc.)
pub trait DrillEventSource: Send + 'static {
    /// Block for up to `timeout` waiting for an event.
    fn recv_timeout(&self, timeout: Duration) -> Result<DrillEvent, RecvTimeoutError>;
}

/// Production event source: a reader thread forwarding crossterm events
pub struct CrosstermEventSource {
    rx: Receiver<DrillEvent>,
}

impl CrosstermEventSource {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();

        std::thread::spawn(move || loop {
            let forwarded = match event::read() {
                // only presses; some terminals also report releases
                Ok(CtEvent::Key(key)) if key.kind == KeyEventKind::Press => {
                    Some(DrillEvent::Key(key))
                }
                Ok(CtEvent::Resize(_, _)) => Some(DrillEvent::Resize),
                Ok(_) => None,
                Err(e) => {
                    log::warn!("terminal event reader stopped: {e}");
                    break;
                }
            };
            if let Some(ev) = forwarded {
                if tx.send(ev).is_err() {
                    break;
                }
            }
        });

        Self { rx }
    }
}

impl Default for CrosstermEventSource {
    fn default() -> Self {
        Self::new()
    }
}

impl DrillEventSource for CrosstermEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<DrillEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

/// Event source fed by a channel, for tests and scripted runs
pub struct ChannelEventSource {
    rx: Receiver<DrillEvent>,
}

impl ChannelEventSource {
    pub fn new(rx: Receiver<DrillEvent>) -> Self {
        Self { rx }
    }
}

impl DrillEventSource for ChannelEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<DrillEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

/// Interleaves input events with ticks at a fixed interval
pub struct Runner<E: DrillEventSource> {
    events: E,
    tick: Duration,
    last_tick: Instant,
}

impl<E: DrillEventSource> Runner<E> {
    pub fn new(events: E, tick: Duration) -> Self {
        Self {
            events,
            tick,
            last_tick: Instant::now(),
        }
    }

    /// Next input event, or a tick once the interval has run out.
    /// A steady stream of keys cannot starve ticks.
    pub fn step(&mut self) -> DrillEvent {
        let since = self.last_tick.elapsed();
        if since >= self.tick {
            return self.take_tick();
        }

        match self.events.recv_timeout(self.tick - since) {
            Ok(ev) => ev,
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => {
                self.take_tick()
            }
        }
    }

    fn take_tick(&mut self) -> DrillEvent {
        let now = Instant::now();
        let elapsed = now.duration_since(self.last_tick);
        self.last_tick = now;
        DrillEvent::Tick(elapsed)
    }
}
