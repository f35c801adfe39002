use std::fmt;
use std::ops::Range;
use std::time::Duration;

use rand::Rng;
use tracing::{debug, info};

use crate::page::Anchor;

pub const SESSION_SECS: u32 = 15;
pub const POINTS_PER_HIT: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum Phase {
    Idle,
    Running,
    Ended,
}

/// How far the end-of-session reveal has progressed
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum EndStage {
    /// "Game Over!" and the final score
    Summary,
    /// tagline revealed
    Message,
    /// call-to-action revealed, page scrolling to the projects
    Closing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TargetId(pub u64);

impl fmt::Display for TargetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Percentages of the play area, measured from its top-left corner
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum TargetColor {
    Amber,
    Blue,
    Emerald,
    Violet,
    Red,
}

impl TargetColor {
    pub const PALETTE: [TargetColor; 5] = [
        TargetColor::Amber,
        TargetColor::Blue,
        TargetColor::Emerald,
        TargetColor::Violet,
        TargetColor::Red,
    ];

    pub fn hex(self) -> &'static str {
        match self {
            TargetColor::Amber => "#F59E0B",
            TargetColor::Blue => "#3B82F6",
            TargetColor::Emerald => "#10B981",
            TargetColor::Violet => "#8B5CF6",
            TargetColor::Red => "#EF4444",
        }
    }

    pub fn rgb(self) -> (u8, u8, u8) {
        match self {
            TargetColor::Amber => (0xF5, 0x9E, 0x0B),
            TargetColor::Blue => (0x3B, 0x82, 0xF6),
            TargetColor::Emerald => (0x10, 0xB9, 0x81),
            TargetColor::Violet => (0x8B, 0x5C, 0xF6),
            TargetColor::Red => (0xEF, 0x44, 0x44),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Target {
    pub id: TargetId,
    pub position: Position,
    pub color: TargetColor,
    pub lifetime: Duration,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SessionConfig {
    pub length_secs: u32,
    pub points_per_hit: u32,
    pub spawn_interval_ms: Range<u64>,
    pub lifetime_ms: Range<u64>,
    pub x_bounds: Range<f64>,
    pub y_bounds: Range<f64>,
    pub message_delay: Duration,
    pub call_to_action_delay: Duration,
}

impl SessionConfig {
    pub fn with_length(length_secs: u32) -> Self {
        Self {
            length_secs: length_secs.max(1),
            ..Self::default()
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            length_secs: SESSION_SECS,
            points_per_hit: POINTS_PER_HIT,
            spawn_interval_ms: 800..1200,
            lifetime_ms: 2000..4000,
            x_bounds: 10.0..90.0,
            y_bounds: 20.0..80.0,
            message_delay: Duration::from_millis(1000),
            call_to_action_delay: Duration::from_millis(3000),
        }
    }
}

/// Every timer the game can have outstanding. Each value maps to at most one
/// live handle in the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Timer {
    Countdown,
    Spawn,
    Expire(TargetId),
    RevealMessage,
    RevealCallToAction,
}

/// Side effects requested by a session transition
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    Schedule(Timer, Duration),
    Cancel(Timer),
    CancelAll,
    ScrollTo(Anchor),
}

const ONE_SECOND: Duration = Duration::from_secs(1);

/// State of one bug smashing run. Transitions mutate the record and hand back
/// the timers to start or cancel; they never touch a clock themselves.
#[derive(Debug, Clone)]
pub struct Session {
    pub config: SessionConfig,
    pub countdown: u32,
    pub score: u32,
    pub phase: Phase,
    pub end_stage: Option<EndStage>,
    targets: Vec<Target>,
    next_id: u64,
    hits: u32,
}

impl Session {
    pub fn new(config: SessionConfig) -> Self {
        Self {
            countdown: config.length_secs,
            config,
            score: 0,
            phase: Phase::Idle,
            end_stage: None,
            targets: Vec::new(),
            next_id: 0,
            hits: 0,
        }
    }

    pub fn targets(&self) -> &[Target] {
        &self.targets
    }

    pub fn target(&self, id: TargetId) -> Option<&Target> {
        self.targets.iter().find(|t| t.id == id)
    }

    pub fn hits(&self) -> u32 {
        self.hits
    }

    pub fn is_running(&self) -> bool {
        self.phase == Phase::Running
    }

    pub fn start<R: Rng>(&mut self, rng: &mut R) -> Vec<Effect> {
        self.countdown = self.config.length_secs;
        self.score = 0;
        self.hits = 0;
        self.targets.clear();
        self.next_id = 0;
        self.end_stage = None;
        self.phase = Phase::Running;
        info!(length_secs = self.config.length_secs, "session started");

        vec![
            Effect::CancelAll,
            Effect::Schedule(Timer::Countdown, ONE_SECOND),
            Effect::Schedule(Timer::Spawn, self.spawn_interval(rng)),
        ]
    }

    pub fn tick(&mut self) -> Vec<Effect> {
        if self.phase != Phase::Running {
            return vec![];
        }

        self.countdown = self.countdown.saturating_sub(1);
        if self.countdown > 0 {
            return vec![Effect::Schedule(Timer::Countdown, ONE_SECOND)];
        }

        self.phase = Phase::Ended;
        self.end_stage = Some(EndStage::Summary);
        info!(score = self.score, hits = self.hits, "session ended");

        // targets left on the field can't be hit anymore
        let mut effects = vec![Effect::Cancel(Timer::Spawn)];
        effects.extend(
            self.targets
                .drain(..)
                .map(|t| Effect::Cancel(Timer::Expire(t.id))),
        );
        effects.push(Effect::Schedule(Timer::RevealMessage, self.config.message_delay));
        effects
    }

    pub fn spawn<R: Rng>(&mut self, rng: &mut R) -> Vec<Effect> {
        if self.phase != Phase::Running {
            return vec![];
        }

        let target = Target {
            id: TargetId(self.next_id),
            position: Position {
                x: rng.gen_range(self.config.x_bounds.clone()),
                y: rng.gen_range(self.config.y_bounds.clone()),
            },
            color: TargetColor::PALETTE[rng.gen_range(0..TargetColor::PALETTE.len())],
            lifetime: Duration::from_millis(rng.gen_range(self.config.lifetime_ms.clone())),
        };
        self.next_id += 1;
        debug!(
            id = %target.id,
            x = target.position.x,
            y = target.position.y,
            color = %target.color,
            lifetime_ms = target.lifetime.as_millis() as u64,
            "target spawned"
        );

        let effects = vec![
            Effect::Schedule(Timer::Expire(target.id), target.lifetime),
            Effect::Schedule(Timer::Spawn, self.spawn_interval(rng)),
        ];
        self.targets.push(target);
        effects
    }

    /// Remove a target the user hit. Absent ids are the expected race with
    /// self-expiry and are ignored.
    pub fn dismiss(&mut self, id: TargetId) -> Vec<Effect> {
        if self.phase != Phase::Running {
            return vec![];
        }
        if self.remove(id).is_none() {
            return vec![];
        }

        self.score += self.config.points_per_hit;
        self.hits += 1;
        debug!(id = %id, score = self.score, "target dismissed");
        vec![Effect::Cancel(Timer::Expire(id))]
    }

    pub fn expire(&mut self, id: TargetId) -> Vec<Effect> {
        if self.remove(id).is_some() {
            debug!(id = %id, "target expired");
        }
        vec![]
    }

    pub fn reveal_message(&mut self) -> Vec<Effect> {
        if self.phase != Phase::Ended || self.end_stage != Some(EndStage::Summary) {
            return vec![];
        }
        self.end_stage = Some(EndStage::Message);
        vec![Effect::Schedule(Timer::RevealCallToAction, self.config.call_to_action_delay)]
    }

    pub fn reveal_call_to_action(&mut self) -> Vec<Effect> {
        if self.phase != Phase::Ended || self.end_stage != Some(EndStage::Message) {
            return vec![];
        }
        self.end_stage = Some(EndStage::Closing);
        vec![Effect::ScrollTo(Anchor::Projects)]
    }

    fn remove(&mut self, id: TargetId) -> Option<Target> {
        let idx = self.targets.iter().position(|t| t.id == id)?;
        Some(self.targets.remove(idx))
    }

    fn spawn_interval<R: Rng>(&self, rng: &mut R) -> Duration {
        Duration::from_millis(rng.gen_range(self.config.spawn_interval_ms.clone()))
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(SessionConfig::default())
    }
}
