use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::time::Duration;

use crossterm::event::{self, Event as CtEvent, KeyEvent, MouseEvent};

/// One frame at roughly 60fps; animations sample on every frame
pub const FRAME_INTERVAL: Duration = Duration::from_millis(16);

/// Unified event type consumed by the app runner
#[derive(Clone, Debug)]
pub enum AppEvent {
    Key(KeyEvent),
    Mouse(MouseEvent),
    Resize(u16, u16),
    Tick,
}

/// Source of terminal events (keyboard, mouse, resize)
pub trait AppEventSource: Send + 'static {
    /// Block for up to `timeout` waiting for an event.
    /// Returns Ok(event) if an event arrives before the timeout, or Err(Timeout) if it expires.
    fn recv_timeout(&self, timeout: Duration) -> Result<AppEvent, RecvTimeoutError>;
}

/// Production event source using crossterm
pub struct CrosstermEventSource {
    rx: Receiver<AppEvent>,
}

impl CrosstermEventSource {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();

        std::thread::spawn(move || loop {
            let forwarded = match event::read() {
                Ok(CtEvent::Key(key)) => Some(AppEvent::Key(key)),
                Ok(CtEvent::Mouse(mouse)) => Some(AppEvent::Mouse(mouse)),
                Ok(CtEvent::Resize(w, h)) => Some(AppEvent::Resize(w, h)),
                Ok(_) => None,
                Err(_) => break,
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

impl AppEventSource for CrosstermEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<AppEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

/// Configurable ticker interface
pub trait Ticker: Send + Sync + 'static {
    fn interval(&self) -> Duration;
}

/// Fixed interval ticker
#[derive(Clone, Copy, Debug)]
pub struct FixedTicker {
    interval: Duration,
}

impl FixedTicker {
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }
}

impl Default for FixedTicker {
    fn default() -> Self {
        Self::new(FRAME_INTERVAL)
    }
}

impl Ticker for FixedTicker {
    fn interval(&self) -> Duration {
        self.interval
    }
}

/// Test event source for unit tests
pub struct TestEventSource {
    rx: Receiver<AppEvent>,
}

impl TestEventSource {
    pub fn new(rx: Receiver<AppEvent>) -> Self {
        Self { rx }
    }
}

impl AppEventSource for TestEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<AppEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

/// Runner that advances the application one event/frame at a time
pub struct Runner<E: AppEventSource, T: Ticker> {
    event_source: E,
    ticker: T,
}

impl<E: AppEventSource, T: Ticker> Runner<E, T> {
    pub fn new(event_source: E, ticker: T) -> Self {
        Self {
            event_source,
            ticker,
        }
    }

    /// Blocks up to one frame and returns the next event, or Tick on timeout
    pub fn step(&self) -> AppEvent {
        match self.event_source.recv_timeout(self.ticker.interval()) {
            Ok(ev) => ev,
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => AppEvent::Tick,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyModifiers, MouseButton, MouseEventKind};
    use std::sync::mpsc;

    #[test]
    fn step_returns_tick_on_timeout() {
        let (_tx, rx) = mpsc::channel();
        let es = TestEventSource::new(rx);
        let ticker = FixedTicker::new(Duration::from_millis(1));
        let runner = Runner::new(es, ticker);

        // With no events available, step should yield Tick
        let ev = runner.step();
        match ev {
            AppEvent::Tick => {}
            _ => panic!("expected Tick on timeout"),
        }
    }

    #[test]
    fn step_passes_through_events() {
        let (tx, rx) = mpsc::channel();
        tx.send(AppEvent::Resize(80, 24)).unwrap();
        tx.send(AppEvent::Key(KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE)))
            .unwrap();
        tx.send(AppEvent::Mouse(MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column: 3,
            row: 4,
            modifiers: KeyModifiers::NONE,
        }))
        .unwrap();
        let es = TestEventSource::new(rx);
        let runner = Runner::new(es, FixedTicker::new(Duration::from_millis(10)));

        assert!(matches!(runner.step(), AppEvent::Resize(80, 24)));
        assert!(matches!(runner.step(), AppEvent::Key(k) if k.code == KeyCode::Enter));
        assert!(matches!(runner.step(), AppEvent::Mouse(m) if m.column == 3 && m.row == 4));
    }

    #[test]
    fn disconnected_source_keeps_ticking() {
        let (tx, rx) = mpsc::channel::<AppEvent>();
        drop(tx);
        let runner = Runner::new(TestEventSource::new(rx), FixedTicker::default());
        assert!(matches!(runner.step(), AppEvent::Tick));
    }

    #[test]
    fn default_ticker_runs_at_frame_rate() {
        assert_eq!(FixedTicker::default().interval(), FRAME_INTERVAL);
    }
}
