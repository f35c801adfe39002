use std::collections::HashMap;
use std::time::Duration;

use rand::{rngs::StdRng, SeedableRng};
use tracing::{info, trace};

use crate::page::Anchor;
use crate::scheduler::{TimerHandle, TimerQueue};
use crate::session::{Effect, Phase, Session, SessionConfig, Target, TargetId, Timer};

/// Requests the controller hands back to whoever owns the page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    ScrollTo(Anchor),
}

/// Timer payload: the session epoch it was issued in plus what to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Scheduled {
    epoch: u64,
    timer: Timer,
}

/// Drives a [`Session`] from a timer queue.
///
/// Every handle the queue issues is kept in `handles`, keyed by the timer it
/// represents, so a restart or teardown can cancel all of them.
#[derive(Debug)]
pub struct GameController {
    session: Session,
    queue: TimerQueue<Scheduled>,
    handles: HashMap<Timer, TimerHandle>,
    rng: StdRng,
    epoch: u64,
    torn_down: bool,
    stage_entered_at: Duration,
    ended_at: Duration,
    score_changed_at: Option<Duration>,
    countdown_changed_at: Option<Duration>,
}

impl GameController {
    pub fn new(config: SessionConfig, rng: StdRng) -> Self {
        Self {
            session: Session::new(config),
            queue: TimerQueue::new(),
            handles: HashMap::new(),
            rng,
            epoch: 0,
            torn_down: false,
            stage_entered_at: Duration::ZERO,
            ended_at: Duration::ZERO,
            score_changed_at: None,
            countdown_changed_at: None,
        }
    }

    pub fn with_seed(config: SessionConfig, seed: u64) -> Self {
        Self::new(config, StdRng::seed_from_u64(seed))
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn phase(&self) -> Phase {
        self.session.phase
    }

    pub fn now(&self) -> Duration {
        self.queue.now()
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    /// Number of timers still waiting to fire
    pub fn pending_timers(&self) -> usize {
        self.queue.len()
    }

    pub fn has_pending(&self, timer: Timer) -> bool {
        self.handles
            .get(&timer)
            .is_some_and(|h| self.queue.is_pending(*h))
    }

    /// When the current end-sequence stage (or the session) began
    pub fn stage_entered_at(&self) -> Duration {
        self.stage_entered_at
    }

    /// When the countdown last reached zero
    pub fn ended_at(&self) -> Duration {
        self.ended_at
    }

    pub fn score_changed_at(&self) -> Option<Duration> {
        self.score_changed_at
    }

    pub fn countdown_changed_at(&self) -> Option<Duration> {
        self.countdown_changed_at
    }

    pub fn start(&mut self, now: Duration) {
        if self.torn_down {
            return;
        }
        self.queue.advance_to(now);
        self.epoch += 1;
        self.stage_entered_at = self.queue.now();
        self.score_changed_at = None;
        self.countdown_changed_at = None;
        let effects = self.session.start(&mut self.rng);
        self.apply(effects);
    }

    /// Dismiss a target by id. Returns the target when the hit counted.
    pub fn dismiss(&mut self, id: TargetId) -> Option<Target> {
        if self.torn_down {
            return None;
        }
        let target = self.session.target(id).cloned()?;
        let effects = self.session.dismiss(id);
        if effects.is_empty() {
            return None;
        }
        self.score_changed_at = Some(self.queue.now());
        self.apply(effects);
        Some(target)
    }

    /// Fire every timer due at or before `now`, in deadline order.
    pub fn advance_to(&mut self, now: Duration) -> Vec<Signal> {
        let mut signals = Vec::new();
        if self.torn_down {
            return signals;
        }

        while let Some((_, scheduled)) = self.queue.pop_due(now) {
            if scheduled.epoch != self.epoch {
                trace!(timer = ?scheduled.timer, "dropping timer from a previous session");
                continue;
            }
            self.handles.remove(&scheduled.timer);
            signals.extend(self.fire(scheduled.timer));
        }
        self.queue.advance_to(now);
        signals
    }

    /// Cancel everything. Nothing fires and nothing mutates afterwards.
    pub fn teardown(&mut self) {
        if self.torn_down {
            return;
        }
        self.cancel_all();
        self.torn_down = true;
        info!("game torn down");
    }

    fn fire(&mut self, timer: Timer) -> Vec<Signal> {
        let at = self.queue.now();
        let effects = match timer {
            Timer::Countdown => {
                self.countdown_changed_at = Some(at);
                let effects = self.session.tick();
                if self.session.phase == Phase::Ended {
                    self.stage_entered_at = at;
                    self.ended_at = at;
                }
                effects
            }
            Timer::Spawn => self.session.spawn(&mut self.rng),
            Timer::Expire(id) => self.session.expire(id),
            Timer::RevealMessage => {
                self.stage_entered_at = at;
                self.session.reveal_message()
            }
            Timer::RevealCallToAction => {
                self.stage_entered_at = at;
                self.session.reveal_call_to_action()
            }
        };
        self.apply(effects)
    }

    fn apply(&mut self, effects: Vec<Effect>) -> Vec<Signal> {
        let mut signals = Vec::new();
        for effect in effects {
            match effect {
                Effect::Schedule(timer, after) => {
                    let handle = self.queue.after(
                        after,
                        Scheduled {
                            epoch: self.epoch,
                            timer,
                        },
                    );
                    if let Some(previous) = self.handles.insert(timer, handle) {
                        self.queue.cancel(previous);
                    }
                }
                Effect::Cancel(timer) => {
                    if let Some(handle) = self.handles.remove(&timer) {
                        self.queue.cancel(handle);
                    }
                }
                Effect::CancelAll => self.cancel_all(),
                Effect::ScrollTo(anchor) => signals.push(Signal::ScrollTo(anchor)),
            }
        }
        signals
    }

    fn cancel_all(&mut self) {
        for (_, handle) in self.handles.drain() {
            self.queue.cancel(handle);
        }
        // anything not tracked is stale by definition
        self.queue.clear();
    }
}
